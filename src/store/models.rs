use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregation::GuessCounts;

/// Guess counts preserved when a prompt session closes, for historical display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrozenSnapshot {
    pub counts: GuessCounts,
    pub total_players: u64,
    pub total_guesses: u64,
    pub frozen_at: DateTime<Utc>,
}

impl FrozenSnapshot {
    pub fn new(counts: GuessCounts, total_players: u64) -> Self {
        let total_guesses = counts.values().sum();
        Self {
            counts,
            total_players,
            total_guesses,
            frozen_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_guesses_is_sum_of_counts() {
        let counts: GuessCounts = [("squid".to_string(), 3), ("octopus".to_string(), 2)]
            .into_iter()
            .collect();
        let snapshot = FrozenSnapshot::new(counts, 5);
        assert_eq!(snapshot.total_guesses, 5);
        assert_eq!(snapshot.total_players, 5);
    }

    #[test]
    fn test_snapshot_survives_json() {
        let counts: GuessCounts = [("jelly fish".to_string(), 1)].into_iter().collect();
        let snapshot = FrozenSnapshot::new(counts, 1);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("totalPlayers"));
        let restored: FrozenSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
