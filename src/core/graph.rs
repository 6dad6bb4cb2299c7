use std::collections::BTreeMap;

use crate::models::{Preference, StudentId};

/// Directed, weighted nomination between two students
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreferenceEdge {
    pub from: StudentId,
    pub to: StudentId,
    pub rank: i32,
}

impl PreferenceEdge {
    pub fn new(from: StudentId, to: StudentId, rank: i32) -> Self {
        Self { from, to, rank }
    }

    /// Inverse of the declared rank
    pub fn weight(&self) -> f64 {
        1.0 / self.rank as f64
    }
}

impl From<&Preference> for PreferenceEdge {
    fn from(value: &Preference) -> Self {
        Self::new(value.student, value.preferred_student, value.rank)
    }
}

/// Directed preference graph of one cohort
///
/// Nodes are exactly the roster handed to [`PreferenceGraph::build`]; a student
/// without any preference is still a node. Outgoing edges are kept per node in
/// a sorted map so iteration order never depends on insertion order.
///
/// Edge weights are stored but partitioning ignores them.
#[derive(Debug, Clone, Default)]
pub struct PreferenceGraph {
    adjacency: BTreeMap<StudentId, BTreeMap<StudentId, f64>>,
    dropped_edges: usize,
}

impl PreferenceGraph {
    /// Build the graph from a roster and the preferences declared by its members
    ///
    /// Edges touching a student outside the roster and self-loops are dropped.
    /// A repeated ordered pair keeps the weight of the last record seen.
    pub fn build<R, E>(roster: R, edges: E) -> Self
    where
        R: IntoIterator<Item = StudentId>,
        E: IntoIterator<Item = PreferenceEdge>,
    {
        let mut graph = Self {
            adjacency: roster.into_iter().map(|id| (id, BTreeMap::new())).collect(),
            dropped_edges: 0,
        };

        for edge in edges {
            if !graph.add_edge(edge) {
                tracing::debug!(
                    "Dropping preference edge {} -> {} outside the roster",
                    edge.from,
                    edge.to
                );
                graph.dropped_edges += 1;
            }
        }

        graph
    }

    fn add_edge(&mut self, edge: PreferenceEdge) -> bool {
        if edge.from == edge.to || !self.adjacency.contains_key(&edge.to) {
            return false;
        }

        match self.adjacency.get_mut(&edge.from) {
            Some(out) => {
                out.insert(edge.to, edge.weight());
                true
            }
            None => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum()
    }

    /// Number of input edges rejected while building
    pub fn dropped_edges(&self) -> usize {
        self.dropped_edges
    }

    pub fn contains(&self, student: StudentId) -> bool {
        self.adjacency.contains_key(&student)
    }

    /// Student ids in ascending order
    pub fn nodes(&self) -> impl Iterator<Item = StudentId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Every directed edge as `(from, to, weight)`, ordered by `(from, to)`
    pub fn edges(&self) -> impl Iterator<Item = (StudentId, StudentId, f64)> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(from, out)| out.iter().map(move |(to, w)| (*from, *to, *w)))
    }

    pub fn weight(&self, from: StudentId, to: StudentId) -> Option<f64> {
        self.adjacency.get(&from).and_then(|out| out.get(&to)).copied()
    }

    pub fn out_degree(&self, student: StudentId) -> usize {
        self.adjacency.get(&student).map_or(0, BTreeMap::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_students_are_nodes() {
        let graph = PreferenceGraph::build(vec![3, 1, 2], vec![]);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_weight_is_inverse_rank() {
        let graph = PreferenceGraph::build(vec![1, 2], vec![PreferenceEdge::new(1, 2, 4)]);

        assert_eq!(graph.weight(1, 2), Some(0.25));
        assert_eq!(graph.weight(2, 1), None);
    }

    #[test]
    fn test_edges_outside_roster_are_dropped() {
        let edges = vec![
            PreferenceEdge::new(1, 2, 1),
            PreferenceEdge::new(1, 99, 1),
            PreferenceEdge::new(99, 1, 1),
            PreferenceEdge::new(2, 2, 1),
        ];
        let graph = PreferenceGraph::build(vec![1, 2], edges);

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.dropped_edges(), 3);
        assert!(!graph.contains(99));
    }

    #[test]
    fn test_repeated_pair_keeps_last_weight() {
        let edges = vec![PreferenceEdge::new(1, 2, 1), PreferenceEdge::new(1, 2, 2)];
        let graph = PreferenceGraph::build(vec![1, 2], edges);

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight(1, 2), Some(0.5));
        assert_eq!(graph.out_degree(1), 1);
    }
}
