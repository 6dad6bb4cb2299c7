use crate::core::{
    graph::{PreferenceEdge, PreferenceGraph},
    partition::connected_components,
};
use crate::models::StudentId;

/// A team to be persisted, before it has an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTeam {
    /// 1-based position within this run
    pub index: usize,
    pub name: String,
    pub members: Vec<StudentId>,
}

/// Result of the team matching process
#[derive(Debug, Clone, Default)]
pub struct TeamAssignment {
    pub teams: Vec<PlannedTeam>,
    pub student_count: usize,
    pub edge_count: usize,
    pub dropped_edges: usize,
}

impl TeamAssignment {
    /// Team index a student landed in, if the student was on the roster
    pub fn team_of(&self, student: StudentId) -> Option<usize> {
        self.teams
            .iter()
            .find(|team| team.members.binary_search(&student).is_ok())
            .map(|team| team.index)
    }
}

/// Team matching orchestrator
///
/// # Pipeline Stages
/// 1. Build the directed preference graph over the cohort roster
/// 2. Partition the undirected projection into connected components
/// 3. Name each component by its 1-based position
#[derive(Debug, Clone)]
pub struct TeamMatcher {
    name_prefix: String,
}

impl TeamMatcher {
    pub fn new(name_prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into(),
        }
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    pub fn team_name(&self, index: usize) -> String {
        format!("{} {}", self.name_prefix, index)
    }

    /// Partition a cohort roster into teams from its preference edges
    ///
    /// # Arguments
    /// * `roster` - Profile ids of every student currently in the cohort
    /// * `edges` - Preferences declared by those students
    pub fn assign<R, E>(&self, roster: R, edges: E) -> TeamAssignment
    where
        R: IntoIterator<Item = StudentId>,
        E: IntoIterator<Item = PreferenceEdge>,
    {
        let graph = PreferenceGraph::build(roster, edges);

        let teams: Vec<PlannedTeam> = connected_components(&graph)
            .into_iter()
            .enumerate()
            .map(|(i, members)| PlannedTeam {
                index: i + 1,
                name: self.team_name(i + 1),
                members,
            })
            .collect();

        TeamAssignment {
            teams,
            student_count: graph.node_count(),
            edge_count: graph.edge_count(),
            dropped_edges: graph.dropped_edges(),
        }
    }
}

impl Default for TeamMatcher {
    fn default() -> Self {
        Self::new("Team")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: StudentId, to: StudentId) -> PreferenceEdge {
        PreferenceEdge::new(from, to, 1)
    }

    #[test]
    fn test_no_preferences_gives_singletons() {
        let matcher = TeamMatcher::default();
        let result = matcher.assign(1..=6, Vec::new());

        assert_eq!(result.teams.len(), 6);
        assert!(result.teams.iter().all(|t| t.members.len() == 1));
        assert_eq!(result.teams[0].name, "Team 1");
        assert_eq!(result.teams[5].name, "Team 6");
    }

    #[test]
    fn test_cliques_and_isolated_student() {
        let matcher = TeamMatcher::default();
        let edges = vec![edge(1, 2), edge(2, 3), edge(3, 1), edge(4, 5)];
        let result = matcher.assign(1..=6, edges);

        let sizes: Vec<usize> = result.teams.iter().map(|t| t.members.len()).collect();
        assert_eq!(sizes, vec![3, 2, 1]);
        assert_eq!(result.team_of(1), result.team_of(3));
        assert_eq!(result.team_of(4), Some(2));
        assert_eq!(result.team_of(6), Some(3));
        assert_eq!(result.team_of(42), None);
    }

    #[test]
    fn test_custom_prefix() {
        let matcher = TeamMatcher::new("Squad");
        let result = matcher.assign(vec![7], Vec::new());

        assert_eq!(result.teams[0].name, "Squad 1");
        assert_eq!(matcher.name_prefix(), "Squad");
    }
}
