use super::{
    models::{ConsensusScore, RankedEntry, Tier},
    normalizer::normalize,
    similarity::similarity,
};

/// Points awarded when a guess only resembles a leaderboard entry.
pub const CLOSE_MATCH_POINTS: u32 = 5;

/// Scores a player's guess against the ranked leaderboard.
///
/// The first entry whose primary guess equals the player's guess decides
/// the tier from its percentage. Failing that, the first entry at least
/// `close_match_threshold` similar earns a flat close-match bonus.
/// An exact match below the rare cutoff scores the same as no match.
pub fn score(player_guess: &str, ranked: &[RankedEntry], close_match_threshold: f64) -> ConsensusScore {
    let guess = normalize(player_guess);

    if let Some(entry) = ranked.iter().find(|e| normalize(&e.guess) == guess) {
        let tier = Tier::from_percentage(entry.percentage);
        if tier == Tier::Unique {
            return ConsensusScore::default();
        }
        return ConsensusScore {
            points_earned: tier.points(),
            match_percentage: entry.percentage,
            tier,
        };
    }

    if let Some(entry) = ranked
        .iter()
        .find(|e| similarity(&guess, &e.guess) >= close_match_threshold)
    {
        return ConsensusScore {
            points_earned: CLOSE_MATCH_POINTS,
            match_percentage: entry.percentage,
            tier: Tier::Rare,
        };
    }

    ConsensusScore::default()
}
