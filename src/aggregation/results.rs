use super::{
    grouping::group_similar,
    models::{AggregatedResults, AggregationConfig, GroupedGuess, RankedEntry},
    normalizer::normalize,
    scoring,
    GuessCounts,
};

/// Inputs for assembling one leaderboard.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub counts: &'a GuessCounts,
    pub creator_answer: &'a str,
    pub total_players: u64,
    /// The requesting player's stored guess, if they have one.
    pub player_guess: Option<&'a str>,
}

/// Percentage of players, rounded to one decimal place. Zero players gives 0.
pub fn percentage_of(count: u64, total_players: u64) -> f64 {
    if total_players == 0 {
        return 0.0;
    }
    (count as f64 / total_players as f64 * 1000.0).round() / 10.0
}

/// Groups, ranks and scores a guess multiset into the leaderboard response.
pub fn assemble(input: AssemblyInput<'_>, config: &AggregationConfig) -> AggregatedResults {
    let player_guess = input.player_guess.map(normalize);

    if input.total_players == 0 && input.counts.is_empty() {
        return AggregatedResults::empty(player_guess);
    }

    let creator_answer = normalize(input.creator_answer);
    let total_guesses: u64 = input.counts.values().sum();

    let mut entries: Vec<RankedEntry> = group_similar(input.counts, config.group_threshold)
        .into_iter()
        .map(|group| to_entry(group, input.total_players, player_guess.as_deref(), &creator_answer))
        .collect();

    // stable: equal counts keep grouping order
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index + 1;
    }

    let creator_answer_data = if entries
        .iter()
        .take(config.top_n)
        .any(|e| e.is_creator_answer)
    {
        None
    } else {
        entries.iter().find(|e| e.is_creator_answer).cloned()
    };

    entries.truncate(config.top_n);

    let score = match &player_guess {
        Some(guess) => scoring::score(guess, &entries, config.close_match_threshold),
        None => Default::default(),
    };

    AggregatedResults {
        aggregation: entries,
        creator_answer_data,
        total_players: input.total_players,
        total_guesses,
        player_guess,
        score,
    }
}

fn to_entry(
    group: GroupedGuess,
    total_players: u64,
    player_guess: Option<&str>,
    creator_answer: &str,
) -> RankedEntry {
    let has_member = |target: &str| group.variants.iter().any(|v| normalize(&v.guess) == target);

    let is_player_guess = player_guess.is_some_and(|guess| has_member(guess));
    let is_creator_answer = has_member(creator_answer);

    let GroupedGuess {
        primary_guess,
        combined_count,
        variants,
    } = group;

    let variants = (variants.len() > 1).then(|| variants.into_iter().skip(1).collect());

    RankedEntry {
        guess: primary_guess,
        count: combined_count,
        percentage: percentage_of(combined_count, total_players),
        is_player_guess,
        is_creator_answer,
        rank: 0,
        variants,
    }
}
