use crate::similarity::normalized_distance;
use crate::types::{CandidatePair, MatchThreshold};
use std::collections::BTreeSet;

/// Deduplicate and sort strings into the canonical lexicographic order.
pub fn sorted_unique<I, S>(strings: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    strings
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// All pairs of distinct strings whose normalized distance passes `threshold`.
///
/// Each string is compared only with the strings after it in sorted order, so
/// every unordered pair is evaluated once and `left < right` holds for every
/// emitted pair.
pub fn generate_pairs<I, S>(strings: I, threshold: MatchThreshold) -> Vec<CandidatePair>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let sorted = sorted_unique(strings);
    let mut pairs = Vec::new();
    let mut comparisons = 0usize;

    for (i, left) in sorted.iter().enumerate() {
        for right in &sorted[i + 1..] {
            comparisons += 1;
            let distance = normalized_distance(left, right);
            if threshold.accepts(distance) {
                pairs.push(CandidatePair {
                    left: left.clone(),
                    right: right.clone(),
                    distance,
                });
            }
        }
    }

    log::debug!(
        "Candidate pairs: {} strings, {} comparisons, {} matches (threshold {})",
        sorted.len(),
        comparisons,
        pairs.len(),
        threshold.value()
    );

    pairs
}
