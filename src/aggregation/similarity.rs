use super::normalizer::normalize;

/// Similarity of two guesses as a percentage in `[0, 100]`.
///
/// Both sides are normalized first. Equal strings (including two empty
/// ones) score 100, a single empty side scores 0, everything else is
/// `(max_len - edit_distance) / max_len * 100` over characters.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let max_len = a.len().max(b.len());
    let distance = edit_distance(&a, &b);

    (max_len - distance) as f64 / max_len as f64 * 100.0
}

/// Levenshtein distance with unit costs, two-row table.
fn edit_distance(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
