use crate::pairs::{generate_pairs, sorted_unique};
use crate::types::{CandidatePair, CanonicalIds, MatchThreshold, SimilarityGraph};
use std::collections::BTreeMap;

/// Assign a component id to every distinct string.
///
/// Nodes are inserted in sorted order and components are numbered from 1 in
/// discovery order, i.e. by the sorted position of their smallest member. When
/// `pairs` is empty no graph is built and strings are numbered by sorted
/// position directly; both paths therefore agree on the same ordering.
pub fn consolidate<I, S>(strings: I, pairs: &[CandidatePair]) -> CanonicalIds
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let sorted = sorted_unique(strings);

    if pairs.is_empty() {
        let count = sorted.len();
        let ids = sorted
            .into_iter()
            .enumerate()
            .map(|(i, value)| (value, i + 1))
            .collect();
        return CanonicalIds::from_parts(ids, count);
    }

    let mut graph = SimilarityGraph::new();
    for value in &sorted {
        graph.add_node(value);
    }
    for pair in pairs {
        graph.add_pair(pair);
    }

    let components = graph.connected_components();
    let mut ids = BTreeMap::new();
    for (i, component) in components.iter().enumerate() {
        for &node in component {
            if let Some(value) = graph.get_node(node) {
                ids.insert(value.to_string(), i + 1);
            }
        }
    }

    log::debug!(
        "Consolidated {} strings into {} components ({} edges)",
        graph.node_count(),
        components.len(),
        graph.edge_count()
    );

    CanonicalIds::from_parts(ids, components.len())
}

/// Pair generation followed by consolidation, at a fixed threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct Consolidator {
    threshold: MatchThreshold,
}

impl Consolidator {
    pub fn new(threshold: MatchThreshold) -> Self {
        Self { threshold }
    }

    pub fn run<I, S>(&self, strings: I) -> CanonicalIds
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sorted = sorted_unique(strings);
        let pairs = generate_pairs(&sorted, self.threshold);
        consolidate(&sorted, &pairs)
    }
}
