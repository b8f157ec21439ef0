use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info};

use crate::caption::pacer::{CaptionFrame, NextAction, SubtitlePacer};

#[derive(Debug)]
pub enum CaptionCommand {
    SetText { text: String, duration_ms: u64 },
    SetVisible(bool),
    Shutdown,
}

/// Spawns the host task that drives one [`SubtitlePacer`] against real time.
///
/// The task sleeps for whatever the pacer asks next, forwarding frames to
/// `on_frame` and the single completion signal per text to `on_complete`.
/// A command arriving mid-sleep drops the pending sleep, so a text change
/// cancels the in-flight tick at the host level as well.
pub fn spawn_caption_driver<F, C>(mut on_frame: F, mut on_complete: C) -> mpsc::Sender<CaptionCommand>
where
    F: FnMut(CaptionFrame) + Send + 'static,
    C: FnMut() + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<CaptionCommand>(16);

    tokio::spawn(async move {
        let mut pacer = SubtitlePacer::new();
        loop {
            match pacer.next_action() {
                NextAction::Wait => match rx.recv().await {
                    Some(cmd) => {
                        if !apply_command(&mut pacer, cmd, &mut on_frame) {
                            break;
                        }
                    }
                    None => break,
                },
                NextAction::Tick {
                    generation,
                    delay_ms,
                } => {
                    tokio::select! {
                        cmd = rx.recv() => match cmd {
                            Some(cmd) => {
                                if !apply_command(&mut pacer, cmd, &mut on_frame) {
                                    break;
                                }
                            }
                            None => break,
                        },
                        _ = time::sleep(Duration::from_millis(delay_ms)) => {
                            if pacer.tick(generation) {
                                if let Some(frame) = pacer.render() {
                                    on_frame(frame);
                                }
                            }
                        }
                    }
                }
                NextAction::Settle {
                    generation,
                    delay_ms,
                } => {
                    tokio::select! {
                        cmd = rx.recv() => match cmd {
                            Some(cmd) => {
                                if !apply_command(&mut pacer, cmd, &mut on_frame) {
                                    break;
                                }
                            }
                            None => break,
                        },
                        _ = time::sleep(Duration::from_millis(delay_ms)) => {
                            if pacer.settle_elapsed(generation) {
                                debug!("Caption reveal complete");
                                on_complete();
                            }
                        }
                    }
                }
            }
        }
        info!("Caption driver stopped");
    });

    tx
}

fn apply_command<F>(pacer: &mut SubtitlePacer, cmd: CaptionCommand, on_frame: &mut F) -> bool
where
    F: FnMut(CaptionFrame) + Send + 'static,
{
    match cmd {
        CaptionCommand::SetText { text, duration_ms } => {
            info!(duration_ms, "Caption text replaced");
            pacer.set_text(&text, duration_ms);
            if let Some(frame) = pacer.render() {
                on_frame(frame);
            }
            true
        }
        CaptionCommand::SetVisible(visible) => {
            pacer.set_visible(visible);
            if let Some(frame) = pacer.render() {
                on_frame(frame);
            }
            true
        }
        CaptionCommand::Shutdown => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::pacer::SETTLE_DELAY_MS;

    #[tokio::test(start_paused = true)]
    async fn driver_reveals_all_words_then_completes_once() {
        let (frame_tx, mut frame_rx) = mpsc::channel::<CaptionFrame>(32);
        let (done_tx, mut done_rx) = mpsc::channel::<()>(4);

        let cmd_tx = spawn_caption_driver(
            move |frame| {
                let _ = frame_tx.try_send(frame);
            },
            move || {
                let _ = done_tx.try_send(());
            },
        );

        let start = time::Instant::now();
        cmd_tx
            .send(CaptionCommand::SetText {
                text: "i rest my case".to_string(),
                duration_ms: 2000,
            })
            .await
            .unwrap();

        done_rx.recv().await.expect("completion should arrive");
        let elapsed = start.elapsed().as_millis() as u64;
        assert!(elapsed >= 2000 && elapsed <= 2000 + SETTLE_DELAY_MS + 50);

        let mut counts = Vec::new();
        while let Ok(frame) = frame_rx.try_recv() {
            counts.push(frame.revealed_count);
        }
        assert_eq!(counts, vec![0, 1, 2, 3, 4]);

        cmd_tx.send(CaptionCommand::Shutdown).await.unwrap();
        assert!(done_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn replacing_text_mid_reveal_restarts_from_zero() {
        let (frame_tx, mut frame_rx) = mpsc::channel::<CaptionFrame>(64);
        let (done_tx, mut done_rx) = mpsc::channel::<()>(4);

        let cmd_tx = spawn_caption_driver(
            move |frame| {
                let _ = frame_tx.try_send(frame);
            },
            move || {
                let _ = done_tx.try_send(());
            },
        );

        cmd_tx
            .send(CaptionCommand::SetText {
                text: "a very long opening statement indeed".to_string(),
                duration_ms: 6000,
            })
            .await
            .unwrap();
        time::sleep(Duration::from_millis(1500)).await;

        cmd_tx
            .send(CaptionCommand::SetText {
                text: "short reply".to_string(),
                duration_ms: 1000,
            })
            .await
            .unwrap();

        done_rx.recv().await.expect("completion should arrive");

        let frames: Vec<CaptionFrame> = std::iter::from_fn(|| frame_rx.try_recv().ok()).collect();
        let last = frames.last().expect("at least one frame");
        assert_eq!(last.words, vec!["short", "reply"]);
        assert_eq!(last.revealed_count, 2);
        assert!(!last.animating);

        // Only one completion in total: the first text never finished.
        assert!(done_rx.try_recv().is_err());
        cmd_tx.send(CaptionCommand::Shutdown).await.unwrap();
    }
}
