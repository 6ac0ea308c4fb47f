/// Normalized edit proximity of two strings, in `[0, 1]`.
///
/// Both sides are lower-cased first. Two empty strings are identical (`1.0`);
/// exactly one empty side scores `0.0`. Otherwise the score is
/// `1 - levenshtein / max_len`, so fewer edits always means a higher score.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    match (a.is_empty(), b.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => strsim::normalized_levenshtein(&a, &b),
    }
}
