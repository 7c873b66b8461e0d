use crate::types::SimilarityGraph;
use petgraph::graph::NodeIndex;
use petgraph::visit::Bfs;
use std::collections::HashSet;

impl SimilarityGraph {
    /// Connected components in discovery order.
    ///
    /// Traversal starts from each unvisited node in insertion order, so a
    /// component's position is that of its earliest-inserted member. Members
    /// within a component are listed in insertion order as well.
    pub fn connected_components(&self) -> Vec<Vec<NodeIndex>> {
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut components = Vec::new();

        for start in self.graph.node_indices() {
            if visited.contains(&start) {
                continue;
            }

            let mut members = Vec::new();
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(node) = bfs.next(&self.graph) {
                visited.insert(node);
                members.push(node);
            }
            members.sort();
            components.push(members);
        }

        components
    }
}
