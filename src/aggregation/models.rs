use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// One raw spelling inside a group and how many players typed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessVariant {
    pub guess: String,
    pub count: u64,
}

/// Near-duplicate spellings merged under their most popular member.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedGuess {
    pub primary_guess: String,
    pub combined_count: u64,
    /// Every member, primary first.
    pub variants: Vec<GuessVariant>,
}

/// A grouped guess placed on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub guess: String,
    pub count: u64,
    pub percentage: f64,
    pub is_player_guess: bool,
    pub is_creator_answer: bool,
    pub rank: usize,
    /// Other spellings folded into this entry, absent for single-member groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<GuessVariant>>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    Majority,
    Common,
    Uncommon,
    Rare,
    Unique,
}

impl Tier {
    /// Tier for the share of players that gave an answer.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 50.0 {
            Tier::Majority
        } else if percentage >= 20.0 {
            Tier::Common
        } else if percentage >= 5.0 {
            Tier::Uncommon
        } else if percentage >= 1.0 {
            Tier::Rare
        } else {
            Tier::Unique
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            Tier::Majority => 100,
            Tier::Common => 50,
            Tier::Uncommon => 25,
            Tier::Rare => 10,
            Tier::Unique => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusScore {
    pub points_earned: u32,
    pub match_percentage: f64,
    pub tier: Tier,
}

impl Default for ConsensusScore {
    fn default() -> Self {
        Self {
            points_earned: 0,
            match_percentage: 0.0,
            tier: Tier::Unique,
        }
    }
}

/// Everything a client needs to render the leaderboard for one prompt session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResults {
    pub aggregation: Vec<RankedEntry>,
    /// The creator's answer when it did not place in the displayed entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_answer_data: Option<RankedEntry>,
    pub total_players: u64,
    pub total_guesses: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_guess: Option<String>,
    pub score: ConsensusScore,
}

impl AggregatedResults {
    pub fn empty(player_guess: Option<String>) -> Self {
        Self {
            aggregation: Vec::new(),
            creator_answer_data: None,
            total_players: 0,
            total_guesses: 0,
            player_guess,
            score: ConsensusScore::default(),
        }
    }
}

/// Tunables for grouping, close matching and leaderboard length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregationConfig {
    pub group_threshold: f64,
    pub close_match_threshold: f64,
    pub top_n: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            group_threshold: 85.0,
            close_match_threshold: 70.0,
            top_n: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(100.0, Tier::Majority)]
    #[case(50.0, Tier::Majority)]
    #[case(49.9, Tier::Common)]
    #[case(20.0, Tier::Common)]
    #[case(19.9, Tier::Uncommon)]
    #[case(5.0, Tier::Uncommon)]
    #[case(4.9, Tier::Rare)]
    #[case(1.0, Tier::Rare)]
    #[case(0.9, Tier::Unique)]
    #[case(0.0, Tier::Unique)]
    fn test_tier_boundaries_are_inclusive_below(#[case] percentage: f64, #[case] expected: Tier) {
        assert_eq!(Tier::from_percentage(percentage), expected);
    }

    #[test]
    fn test_points_decrease_with_rarity() {
        let points: Vec<u32> = Tier::iter().map(|tier| tier.points()).collect();
        assert_eq!(points, vec![100, 50, 25, 10, 0]);
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Tier::Majority).unwrap(), "\"majority\"");
        assert_eq!(Tier::Uncommon.to_string(), "uncommon");
    }

    #[test]
    fn test_ranked_entry_omits_absent_variants() {
        let entry = RankedEntry {
            guess: "squid".to_string(),
            count: 3,
            percentage: 30.0,
            is_player_guess: false,
            is_creator_answer: true,
            rank: 2,
            variants: None,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["isCreatorAnswer"], true);
        assert!(json.get("variants").is_none());
    }

    #[test]
    fn test_default_score_is_unique_with_no_points() {
        let score = ConsensusScore::default();
        assert_eq!(score.points_earned, 0);
        assert_eq!(score.match_percentage, 0.0);
        assert_eq!(score.tier, Tier::Unique);
    }
}
