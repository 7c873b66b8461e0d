//! Length-adjusted, normalized Levenshtein distance.

/// Strings shorter than this are treated as if they had this many characters,
/// so two very short tokens cannot match on a handful of shared characters.
pub const MIN_EFFECTIVE_LEN: usize = 4;

/// Normalized edit distance in `[0, 1]`; lower is more similar.
///
/// The edit distance is first reduced by the unavoidable length difference and
/// then scaled by the largest distance still possible once that difference is
/// paid:
///
/// ```text
/// (lev - |la - lb|) / (max(la, lb) - |la - lb|)    where l = max(chars, 4)
/// ```
pub fn normalized_distance(a: &str, b: &str) -> f64 {
    let lev = strsim::levenshtein(a, b);
    let la = a.chars().count().max(MIN_EFFECTIVE_LEN);
    let lb = b.chars().count().max(MIN_EFFECTIVE_LEN);

    let min_diff = la.abs_diff(lb);
    let denominator = la.max(lb) - min_diff;
    if denominator == 0 {
        return if a == b { 0.0 } else { 1.0 };
    }

    let numerator = lev.saturating_sub(min_diff);
    (numerator as f64 / denominator as f64).clamp(0.0, 1.0)
}
