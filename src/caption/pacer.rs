/// Delay between the last revealed word and the completion signal.
pub const SETTLE_DELAY_MS: u64 = 500;
/// Durations at or below this skip word-by-word animation entirely.
pub const INSTANT_THRESHOLD_MS: u64 = 100;
/// Completion delay used in instant mode (already-spoken audio).
pub const INSTANT_SETTLE_DELAY_MS: u64 = 100;

/// Snapshot handed to the rendering surface. The surface draws the joined
/// prefix of `words[..revealed_count]` plus any progress indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionFrame {
    pub words: Vec<String>,
    pub revealed_count: usize,
    pub animating: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Animating,
    Settled,
}

/// What the host should schedule next. Each action carries the generation it
/// was computed for; events delivered with an older generation are ignored,
/// which is how replacing the text cancels an in-flight timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Sleep `delay_ms`, then call [`SubtitlePacer::tick`].
    Tick { generation: u64, delay_ms: u64 },
    /// Sleep `delay_ms`, then call [`SubtitlePacer::settle_elapsed`].
    Settle { generation: u64, delay_ms: u64 },
    /// Nothing scheduled; wait for the next input change.
    Wait,
}

/// Reveals a block of text word by word at an even pace over a requested
/// total duration, then signals completion exactly once per text assignment.
///
/// The pacer never touches a real clock. It answers [`next_action`] with the
/// delay it wants, and the host delivers `tick`/`settle_elapsed` events back.
/// At most one timer per instance is ever outstanding because the host only
/// schedules what the latest `next_action` asked for.
///
/// [`next_action`]: SubtitlePacer::next_action
#[derive(Debug)]
pub struct SubtitlePacer {
    words: Vec<String>,
    revealed_count: usize,
    phase: Phase,
    visible: bool,
    duration_ms: u64,
    generation: u64,
    completion_fired: bool,
}

impl SubtitlePacer {
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            revealed_count: 0,
            phase: Phase::Idle,
            visible: true,
            duration_ms: 0,
            generation: 0,
            completion_fired: false,
        }
    }

    /// Replaces the caption text. Bumps the generation so any tick or settle
    /// event scheduled against the previous text is discarded on arrival.
    pub fn set_text(&mut self, text: &str, duration_ms: u64) {
        self.generation += 1;
        self.words = text.split_whitespace().map(str::to_string).collect();
        self.revealed_count = 0;
        self.completion_fired = false;
        self.duration_ms = duration_ms;
        self.phase = if self.words.is_empty() {
            Phase::Idle
        } else {
            Phase::Animating
        };
    }

    /// Hiding pauses scheduling but preserves all internal state.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn instant_mode(&self) -> bool {
        self.duration_ms <= INSTANT_THRESHOLD_MS
    }

    pub fn next_action(&self) -> NextAction {
        if !self.visible || self.words.is_empty() {
            return NextAction::Wait;
        }
        match self.phase {
            Phase::Animating => {
                let delay_ms = if self.instant_mode() {
                    0
                } else {
                    self.duration_ms / self.words.len() as u64
                };
                NextAction::Tick {
                    generation: self.generation,
                    delay_ms,
                }
            }
            Phase::Settled if !self.completion_fired => NextAction::Settle {
                generation: self.generation,
                delay_ms: if self.instant_mode() {
                    INSTANT_SETTLE_DELAY_MS
                } else {
                    SETTLE_DELAY_MS
                },
            },
            _ => NextAction::Wait,
        }
    }

    /// Advances the reveal by one word (or all words in instant mode).
    /// Returns whether the event was applied; stale generations and events
    /// arriving while hidden or idle are no-ops.
    pub fn tick(&mut self, generation: u64) -> bool {
        if generation != self.generation || !self.visible || self.phase != Phase::Animating {
            return false;
        }
        if self.instant_mode() {
            self.revealed_count = self.words.len();
        } else {
            self.revealed_count += 1;
        }
        if self.revealed_count >= self.words.len() {
            self.phase = Phase::Settled;
        }
        true
    }

    /// Called when the settle delay elapses. Returns true exactly once per
    /// text assignment, telling the host to deliver the completion callback.
    pub fn settle_elapsed(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.phase != Phase::Settled || self.completion_fired {
            return false;
        }
        self.completion_fired = true;
        true
    }

    /// `None` while hidden or with no text, so nothing leaks to the surface.
    pub fn render(&self) -> Option<CaptionFrame> {
        if !self.visible || self.words.is_empty() {
            return None;
        }
        Some(CaptionFrame {
            words: self.words.clone(),
            revealed_count: self.revealed_count,
            animating: self.phase == Phase::Animating,
        })
    }
}

impl Default for SubtitlePacer {
    fn default() -> Self {
        Self::new()
    }
}
