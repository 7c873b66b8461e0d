use crate::error::{GraphError, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Maximum normalized distance at which two strings count as the same entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchThreshold(f64);

impl MatchThreshold {
    pub const DEFAULT: f64 = 0.2;

    pub fn new(value: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(GraphError::InvalidThreshold(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn accepts(self, distance: f64) -> bool {
        distance <= self.0
    }
}

impl Default for MatchThreshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Two distinct strings judged close enough to be merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePair {
    /// Lexicographically smaller string
    pub left: String,
    pub right: String,
    pub distance: f64,
}

/// Undirected graph over distinct surface strings of one category.
pub struct SimilarityGraph {
    /// Nodes are surface strings, edge weights are distances
    pub graph: UnGraph<String, f64>,

    /// Surface string -> NodeIndex mapping for fast lookup
    pub node_index: HashMap<String, NodeIndex>,
}

impl SimilarityGraph {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            node_index: HashMap::new(),
        }
    }

    /// Add a node, returning the existing index if the string is already present
    pub fn add_node(&mut self, value: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(value) {
            return idx;
        }
        let idx = self.graph.add_node(value.to_string());
        self.node_index.insert(value.to_string(), idx);
        idx
    }

    /// Add an edge for a candidate pair, creating missing endpoints
    pub fn add_pair(&mut self, pair: &CandidatePair) {
        let left = self.add_node(&pair.left);
        let right = self.add_node(&pair.right);
        self.graph.add_edge(left, right, pair.distance);
    }

    pub fn get_node(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for SimilarityGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Mapping from every distinct surface string to its component id (1-based).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalIds {
    ids: BTreeMap<String, usize>,
    component_count: usize,
}

impl CanonicalIds {
    pub(crate) fn from_parts(ids: BTreeMap<String, usize>, component_count: usize) -> Self {
        Self {
            ids,
            component_count,
        }
    }

    pub fn get(&self, value: &str) -> Option<usize> {
        self.ids.get(value).copied()
    }

    /// Number of distinct strings
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn component_count(&self) -> usize {
        self.component_count
    }

    /// (string, id) pairs in sorted string order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.ids.iter().map(|(value, id)| (value.as_str(), *id))
    }

    /// Strings assigned to `id`, sorted
    pub fn members(&self, id: usize) -> Vec<&str> {
        self.iter()
            .filter(|(_, member_id)| *member_id == id)
            .map(|(value, _)| value)
            .collect()
    }
}
