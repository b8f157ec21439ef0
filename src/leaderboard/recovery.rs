use serde_json::Value;

use crate::leaderboard::entry::LeaderboardEntry;
use crate::leaderboard::ranker::Leaderboard;

/// Classification of a persisted leaderboard blob. Loading never raises;
/// the worst case is falling back to the empty board.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The blob deserialized cleanly.
    Valid(Leaderboard),
    /// The top-level shape was readable JSON; entries that individually
    /// deserialized were salvaged, the rest dropped.
    Recovered(Leaderboard),
    /// Not JSON, or not an object. Caller substitutes the empty board.
    Invalid,
}

pub fn classify_blob(blob: &str) -> LoadOutcome {
    if let Ok(mut board) = serde_json::from_str::<Leaderboard>(blob) {
        // Re-establish sort/capacity invariants in case the blob predates them.
        board.sort_and_trim();
        return LoadOutcome::Valid(board);
    }

    let Ok(value) = serde_json::from_str::<Value>(blob) else {
        return LoadOutcome::Invalid;
    };
    let Some(object) = value.as_object() else {
        return LoadOutcome::Invalid;
    };

    let mut board = Leaderboard {
        fastest_wins: salvage_entries(object.get("fastestWins")),
        highest_scores: salvage_entries(object.get("highestScores")),
        best_accuracy: salvage_entries(object.get("bestAccuracy")),
    };
    board.sort_and_trim();
    LoadOutcome::Recovered(board)
}

fn salvage_entries(value: Option<&Value>) -> Vec<LeaderboardEntry> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}
