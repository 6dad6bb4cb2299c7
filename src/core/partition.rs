use std::collections::BTreeMap;

use crate::core::graph::PreferenceGraph;
use crate::models::StudentId;

/// Union-find over dense indices with path halving and union by rank
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets holding `a` and `b`; returns false if already joined
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }

        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Weakly-connected components of the preference graph
///
/// Edge direction is ignored. Members of each component are sorted ascending
/// and components are ordered by their smallest member, so identical input
/// always yields identical output.
pub fn connected_components(graph: &PreferenceGraph) -> Vec<Vec<StudentId>> {
    let index: BTreeMap<StudentId, usize> = graph
        .nodes()
        .enumerate()
        .map(|(i, id)| (id, i))
        .collect();

    let mut sets = DisjointSet::new(index.len());
    for (from, to, _) in graph.edges() {
        sets.union(index[&from], index[&to]);
    }

    // Nodes come out ascending, so every component is filled in sorted order
    // and the first time a root shows up is at its smallest member.
    let mut slot_of_root: BTreeMap<usize, usize> = BTreeMap::new();
    let mut components: Vec<Vec<StudentId>> = Vec::new();
    for (id, i) in &index {
        let root = sets.find(*i);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(*id);
    }

    components
}
