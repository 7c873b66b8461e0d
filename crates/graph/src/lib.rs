//! # Deid Graph
//!
//! Reduces the surface variants of one entity ("Andy Wheeler", "andy wheeler")
//! to a single canonical id.
//!
//! ## Architecture
//!
//! ```text
//! distinct surface strings (one category, whole batch)
//!     │
//!     ├──> Candidate Pair Generator
//!     │      ├─ sort + dedup
//!     │      └─ compare i < j with normalized Levenshtein distance
//!     │
//!     ├──> Similarity Graph (petgraph)
//!     │      ├─ Nodes: surface strings
//!     │      └─ Edges: pairs with distance <= threshold
//!     │
//!     └──> Connected components
//!            └─ 1-based id per component, numbered in sorted order
//! ```

mod consolidate;
mod error;
mod graph;
mod pairs;
pub mod similarity;
mod types;

pub use consolidate::{consolidate, Consolidator};
pub use error::{GraphError, Result};
pub use pairs::{generate_pairs, sorted_unique};
pub use similarity::normalized_distance;
pub use types::{CandidatePair, CanonicalIds, MatchThreshold, SimilarityGraph};
