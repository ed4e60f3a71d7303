use super::{
    models::{GroupedGuess, GuessVariant},
    similarity::similarity,
    GuessCounts,
};

/// Partitions guess counts into groups of near-duplicate spellings.
///
/// Guesses are visited by count descending (ties in key order). Each
/// unassigned guess anchors a new group and pulls in every later
/// unassigned guess whose similarity to the anchor is at least
/// `threshold`. Membership is decided against the anchor only, in a
/// single pass; a guess close to a member but not to the anchor stays out.
///
/// Output order follows anchor order and is not re-sorted by combined count.
pub fn group_similar(counts: &GuessCounts, threshold: f64) -> Vec<GroupedGuess> {
    let mut sorted: Vec<(&String, u64)> = counts.iter().map(|(g, c)| (g, *c)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    let mut assigned = vec![false; sorted.len()];
    let mut groups = Vec::new();

    for i in 0..sorted.len() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;

        let (anchor, anchor_count) = sorted[i];
        let mut variants = vec![GuessVariant {
            guess: anchor.clone(),
            count: anchor_count,
        }];

        for j in (i + 1)..sorted.len() {
            if assigned[j] {
                continue;
            }
            let (candidate, count) = sorted[j];
            if similarity(anchor, candidate) >= threshold {
                assigned[j] = true;
                variants.push(GuessVariant {
                    guess: candidate.clone(),
                    count,
                });
            }
        }

        groups.push(GroupedGuess {
            primary_guess: anchor.clone(),
            combined_count: variants.iter().map(|v| v.count).sum(),
            variants,
        });
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, u64)]) -> GuessCounts {
        entries
            .iter()
            .map(|(guess, count)| (guess.to_string(), *count))
            .collect()
    }

    #[test]
    fn test_groups_jellyfish_spellings_together() {
        let input = counts(&[
            ("jellyfish", 100),
            ("jelly fish", 50),
            ("jellyf1sh", 30),
            ("squid", 20),
        ]);

        let groups = group_similar(&input, 85.0);

        assert_eq!(groups.len(), 2);
        let jelly = &groups[0];
        assert_eq!(jelly.primary_guess, "jellyfish");
        assert_eq!(jelly.combined_count, 180);
        assert_eq!(jelly.variants.len(), 3);

        let squid = &groups[1];
        assert_eq!(squid.primary_guess, "squid");
        assert_eq!(squid.combined_count, 20);
        assert_eq!(squid.variants.len(), 1);
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        assert!(group_similar(&GuessCounts::new(), 85.0).is_empty());
    }

    #[test]
    fn test_single_entry_forms_single_group() {
        let groups = group_similar(&counts(&[("octopus", 4)]), 85.0);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].combined_count, 4);
        assert_eq!(groups[0].variants[0].guess, "octopus");
    }

    #[test]
    fn test_highest_count_spelling_becomes_primary() {
        let groups = group_similar(&counts(&[("jely fish", 3), ("jelly fish", 9)]), 85.0);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].primary_guess, "jelly fish");
        assert_eq!(groups[0].variants[1].guess, "jely fish");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // "house" vs "hous" is exactly 80
        let input = counts(&[("house", 5), ("hous", 1)]);
        assert_eq!(group_similar(&input, 80.0).len(), 1);
        assert_eq!(group_similar(&input, 80.1).len(), 2);
    }

    #[test]
    fn test_grouping_is_single_pass_and_not_transitive() {
        // "abcd" ~ "abce" (75) and "abce" ~ "abfe" (75), but "abcd" ~ "abfe" is 50.
        let input = counts(&[("abcd", 10), ("abce", 5), ("abfe", 1)]);

        let groups = group_similar(&input, 75.0);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].primary_guess, "abcd");
        assert_eq!(groups[0].combined_count, 15);
        assert_eq!(groups[1].primary_guess, "abfe");
        assert_eq!(groups[1].combined_count, 1);
    }

    #[test]
    fn test_grouping_conserves_counts_and_partitions_guesses() {
        let input = counts(&[
            ("cat", 7),
            ("cats", 6),
            ("hat", 5),
            ("house", 4),
            ("mouse", 4),
            ("horse", 2),
            ("", 1),
        ]);

        let groups = group_similar(&input, 60.0);

        let total: u64 = groups.iter().map(|g| g.combined_count).sum();
        assert_eq!(total, input.values().sum::<u64>());

        let mut seen: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.variants.iter().map(|v| v.guess.as_str()))
            .collect();
        seen.sort_unstable();
        let mut expected: Vec<&str> = input.keys().map(String::as_str).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);

        for group in &groups {
            let sum: u64 = group.variants.iter().map(|v| v.count).sum();
            assert_eq!(group.combined_count, sum);
            assert_eq!(group.variants[0].guess, group.primary_guess);
        }
    }
}
