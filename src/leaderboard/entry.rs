use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded play result. Immutable once created; the same entry may sit in
/// up to three category views at once. Field names follow the persisted wire
/// format, so blobs written by older builds keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: String,
    pub player_name: String,
    pub case_id: String,
    pub case_name: String,
    /// Seconds from case start to verdict.
    pub time_elapsed: f64,
    pub score: f64,
    /// Fraction in [0, 1].
    pub accuracy: f64,
    pub difficulty: Difficulty,
    pub role: Role,
    pub completed_at: DateTime<Utc>,
}

/// Caller-supplied shape for [`record_entry`]; the ranker assigns `id` and
/// `completed_at` itself.
///
/// [`record_entry`]: crate::leaderboard::ranker::LeaderboardManager::record_entry
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub player_name: String,
    pub case_id: String,
    pub case_name: String,
    pub time_elapsed: f64,
    pub score: f64,
    pub accuracy: f64,
    pub difficulty: Difficulty,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Defense,
    Prosecution,
}

impl Role {
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "defense" => Some(Role::Defense),
            "prosecution" => Some(Role::Prosecution),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Defense => "Defense",
            Role::Prosecution => "Prosecution",
        }
    }
}
