use std::cmp::Ordering;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::leaderboard::entry::{LeaderboardEntry, NewEntry};
use crate::leaderboard::recovery::{self, LoadOutcome};
use crate::leaderboard::store::BlobStore;
use crate::util::ids;

/// Fixed key the whole board is persisted under.
pub const STORAGE_KEY: &str = "eduverse_leaderboard";
/// Each category view keeps at most this many entries.
pub const CATEGORY_CAPACITY: usize = 10;
/// Scores above this count as a win and qualify for the fastest-wins view.
pub const WIN_SCORE_THRESHOLD: f64 = 20.0;
/// Accuracies above this qualify for the best-accuracy view.
pub const HIGH_ACCURACY_THRESHOLD: f64 = 0.75;

/// The three independently ranked views. Sorted per category at all times:
/// ascending time for fastest wins, descending score and accuracy for the
/// other two.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Leaderboard {
    pub fastest_wins: Vec<LeaderboardEntry>,
    pub highest_scores: Vec<LeaderboardEntry>,
    pub best_accuracy: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    FastestWins,
    HighestScores,
    BestAccuracy,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::FastestWins,
        Category::HighestScores,
        Category::BestAccuracy,
    ];

    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "fastest-wins" | "fastestWins" => Some(Category::FastestWins),
            "highest-scores" | "highestScores" => Some(Category::HighestScores),
            "best-accuracy" | "bestAccuracy" => Some(Category::BestAccuracy),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::FastestWins => "Fastest Wins",
            Category::HighestScores => "Highest Scores",
            Category::BestAccuracy => "Best Accuracy",
        }
    }
}

impl Leaderboard {
    pub fn view(&self, category: Category) -> &[LeaderboardEntry] {
        match category {
            Category::FastestWins => &self.fastest_wins,
            Category::HighestScores => &self.highest_scores,
            Category::BestAccuracy => &self.best_accuracy,
        }
    }

    /// Restores the per-category sort order and capacity bound. Sorts are
    /// stable, so entries tied on the key keep their insertion order.
    pub(crate) fn sort_and_trim(&mut self) {
        sort_ascending(&mut self.fastest_wins, |e| e.time_elapsed);
        sort_descending(&mut self.highest_scores, |e| e.score);
        sort_descending(&mut self.best_accuracy, |e| e.accuracy);
    }
}

fn sort_ascending(entries: &mut Vec<LeaderboardEntry>, key: fn(&LeaderboardEntry) -> f64) {
    entries.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal));
    entries.truncate(CATEGORY_CAPACITY);
}

fn sort_descending(entries: &mut Vec<LeaderboardEntry>, key: fn(&LeaderboardEntry) -> f64) {
    entries.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    entries.truncate(CATEGORY_CAPACITY);
}

/// What [`LeaderboardManager::record_entry`] produced: the finalized entry
/// and the views it is actually on after trimming.
#[derive(Debug)]
pub struct RecordOutcome {
    pub entry: LeaderboardEntry,
    pub admitted: Vec<Category>,
}

/// Owns the board and its storage handle. Constructed once at startup and
/// passed to whoever needs it; the board loads lazily on first use and every
/// mutation is written back as a single blob, so readers never observe one
/// category updated without the others.
pub struct LeaderboardManager {
    store: Box<dyn BlobStore>,
    board: Option<Leaderboard>,
}

impl LeaderboardManager {
    pub fn new(store: Box<dyn BlobStore>) -> Self {
        Self { store, board: None }
    }

    pub fn board(&mut self) -> &Leaderboard {
        self.board_mut()
    }

    /// Records a play result. The entry always lands on the highest-scores
    /// view; fastest-wins and best-accuracy take it only when the win/accuracy
    /// thresholds are cleared. A failed storage write is logged and the
    /// in-memory board kept, per the degrade-never-fail contract.
    pub fn record_entry(&mut self, new: NewEntry) -> RecordOutcome {
        let entry = LeaderboardEntry {
            id: ids::new_entry_id(),
            player_name: new.player_name,
            case_id: new.case_id,
            case_name: new.case_name,
            time_elapsed: new.time_elapsed,
            score: new.score,
            accuracy: new.accuracy,
            difficulty: new.difficulty,
            role: new.role,
            completed_at: Utc::now(),
        };

        let board = self.board_mut();
        if entry.score > WIN_SCORE_THRESHOLD {
            board.fastest_wins.push(entry.clone());
        }
        board.highest_scores.push(entry.clone());
        if entry.accuracy > HIGH_ACCURACY_THRESHOLD {
            board.best_accuracy.push(entry.clone());
        }
        board.sort_and_trim();

        let admitted: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| board.view(*c).iter().any(|e| e.id == entry.id))
            .collect();

        self.persist();
        info!(
            player = %entry.player_name,
            score = entry.score,
            accuracy = entry.accuracy,
            time_elapsed = entry.time_elapsed,
            views = admitted.len(),
            "Recorded leaderboard entry"
        );

        RecordOutcome { entry, admitted }
    }

    /// 1-based position of the player's best-ranked entry in the category
    /// view, or `None` if the player is not on it. Read-only.
    pub fn get_player_rank(&mut self, player_name: &str, category: Category) -> Option<u32> {
        self.board_mut()
            .view(category)
            .iter()
            .position(|e| e.player_name == player_name)
            .map(|i| i as u32 + 1)
    }

    /// Clears all three views and persists the empty board.
    pub fn reset(&mut self) {
        self.board = Some(Leaderboard::default());
        self.persist();
    }

    fn board_mut(&mut self) -> &mut Leaderboard {
        if self.board.is_none() {
            self.board = Some(load_board(&*self.store));
        }
        self.board.as_mut().expect("board loaded above")
    }

    fn persist(&mut self) {
        let Some(board) = self.board.as_ref() else {
            return;
        };
        match serde_json::to_string(board) {
            Ok(blob) => {
                if !self.store.set(STORAGE_KEY, &blob) {
                    warn!("Leaderboard write failed, keeping in-memory state");
                }
            }
            Err(e) => warn!(error = %e, "Could not serialize leaderboard"),
        }
    }
}

fn load_board(store: &dyn BlobStore) -> Leaderboard {
    let Some(blob) = store.get(STORAGE_KEY) else {
        info!("No persisted leaderboard, starting empty");
        return Leaderboard::default();
    };
    match recovery::classify_blob(&blob) {
        LoadOutcome::Valid(board) => board,
        LoadOutcome::Recovered(board) => {
            warn!(
                fastest_wins = board.fastest_wins.len(),
                highest_scores = board.highest_scores.len(),
                best_accuracy = board.best_accuracy.len(),
                "Leaderboard blob was partially recovered"
            );
            board
        }
        LoadOutcome::Invalid => {
            warn!("Leaderboard blob unreadable, resetting to empty");
            Leaderboard::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::entry::{Difficulty, Role};
    use crate::leaderboard::store::MemoryStore;

    fn manager() -> (LeaderboardManager, MemoryStore) {
        let store = MemoryStore::default();
        (LeaderboardManager::new(Box::new(store.clone())), store)
    }

    fn result(player: &str, score: f64, accuracy: f64, time_elapsed: f64) -> NewEntry {
        NewEntry {
            player_name: player.to_string(),
            case_id: "case-01".to_string(),
            case_name: "The Missing Ledger".to_string(),
            time_elapsed,
            score,
            accuracy,
            difficulty: Difficulty::Intermediate,
            role: Role::Defense,
        }
    }

    fn names(view: &[LeaderboardEntry]) -> Vec<&str> {
        view.iter().map(|e| e.player_name.as_str()).collect()
    }

    #[test]
    fn worked_example_lands_entries_on_the_right_views() {
        let (mut mgr, _) = manager();
        mgr.record_entry(result("A", 30.0, 0.9, 50.0));
        mgr.record_entry(result("B", 25.0, 0.6, 40.0));
        mgr.record_entry(result("C", 10.0, 0.8, 30.0));

        let board = mgr.board();
        assert_eq!(names(&board.highest_scores), vec!["A", "B", "C"]);
        assert_eq!(names(&board.fastest_wins), vec!["B", "A"]);
        assert_eq!(names(&board.best_accuracy), vec!["A", "C"]);
    }

    #[test]
    fn win_and_accuracy_thresholds_are_strict() {
        let (mut mgr, _) = manager();
        let win = mgr.record_entry(result("Edge", 21.0, 0.5, 10.0));
        assert_eq!(
            win.admitted,
            vec![Category::FastestWins, Category::HighestScores]
        );

        let no_win = mgr.record_entry(result("Edge", 20.0, 0.5, 10.0));
        assert_eq!(no_win.admitted, vec![Category::HighestScores]);

        let sharp = mgr.record_entry(result("Edge", 5.0, 0.76, 10.0));
        assert_eq!(
            sharp.admitted,
            vec![Category::HighestScores, Category::BestAccuracy]
        );

        let blunt = mgr.record_entry(result("Edge", 5.0, 0.75, 10.0));
        assert_eq!(blunt.admitted, vec![Category::HighestScores]);
    }

    #[test]
    fn views_stay_sorted_and_capped_at_capacity() {
        let (mut mgr, _) = manager();
        for i in 0..12 {
            mgr.record_entry(result(
                &format!("p{i}"),
                30.0 + i as f64,
                0.8,
                100.0 - i as f64,
            ));
        }

        let board = mgr.board();
        for category in Category::ALL {
            assert_eq!(board.view(category).len(), CATEGORY_CAPACITY);
        }
        assert!(board
            .fastest_wins
            .windows(2)
            .all(|w| w[0].time_elapsed <= w[1].time_elapsed));
        assert!(board
            .highest_scores
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
        // Trimming dropped the slowest wins and the lowest scores.
        assert_eq!(board.fastest_wins[0].time_elapsed, 89.0);
        assert_eq!(board.highest_scores[0].score, 41.0);
    }

    #[test]
    fn tied_scores_keep_insertion_order() {
        let (mut mgr, _) = manager();
        mgr.record_entry(result("First", 25.0, 0.5, 10.0));
        mgr.record_entry(result("Second", 25.0, 0.5, 10.0));
        assert_eq!(names(&mgr.board().highest_scores), vec!["First", "Second"]);
    }

    #[test]
    fn player_rank_is_one_based_and_best_entry_wins() {
        let (mut mgr, _) = manager();
        assert_eq!(mgr.get_player_rank("Alice", Category::HighestScores), None);

        mgr.record_entry(result("Alice", 15.0, 0.5, 10.0));
        mgr.record_entry(result("Bob", 30.0, 0.5, 10.0));
        mgr.record_entry(result("Alice", 22.0, 0.5, 10.0));

        assert_eq!(
            mgr.get_player_rank("Alice", Category::HighestScores),
            Some(2)
        );
        assert_eq!(mgr.get_player_rank("Bob", Category::HighestScores), Some(1));
        assert_eq!(mgr.get_player_rank("Alice", Category::BestAccuracy), None);
    }

    #[test]
    fn every_record_is_persisted_as_one_blob() {
        let (mut mgr, store) = manager();
        mgr.record_entry(result("Alice", 30.0, 0.9, 50.0));

        // A second manager over the same storage sees the full board.
        let mut fresh = LeaderboardManager::new(Box::new(store));
        let board = fresh.board();
        assert_eq!(board.highest_scores.len(), 1);
        assert_eq!(board.fastest_wins.len(), 1);
        assert_eq!(board.best_accuracy.len(), 1);
    }

    #[test]
    fn corrupt_storage_degrades_to_an_empty_board() {
        let mut store = MemoryStore::default();
        store.set(STORAGE_KEY, "][ definitely not json");
        let mut mgr = LeaderboardManager::new(Box::new(store));

        let board = mgr.board();
        assert!(board.fastest_wins.is_empty());
        assert!(board.highest_scores.is_empty());
        assert!(board.best_accuracy.is_empty());
    }

    #[test]
    fn reset_clears_and_persists() {
        let (mut mgr, store) = manager();
        mgr.record_entry(result("Alice", 30.0, 0.9, 50.0));
        mgr.reset();
        assert!(mgr.board().highest_scores.is_empty());

        let mut fresh = LeaderboardManager::new(Box::new(store));
        assert!(fresh.board().highest_scores.is_empty());
    }
}
