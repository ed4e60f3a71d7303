/// Canonical comparison key for a raw guess.
///
/// Lower-cases and trims surrounding whitespace. Inner whitespace,
/// punctuation and non-ASCII characters are kept as typed, so
/// "jelly  fish" and "jelly fish" stay distinct keys.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}
