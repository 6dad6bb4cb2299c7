// Unit tests for Capstone Teams

use capstone_teams::core::{
    connected_components, validate_cohort, validate_preference, DisjointSet, PreferenceEdge,
    PreferenceError, PreferenceGraph, ProfileBlueprint, TeamMatcher, UserBlueprint,
};
use capstone_teams::models::{CreateUserRequest, ProfileFields, Role, StudentProfile};
use chrono::NaiveDate;
use uuid::Uuid;

fn student(id: i64, cohort: Option<i64>) -> StudentProfile {
    StudentProfile {
        id,
        user_id: Uuid::new_v4(),
        student_id: format!("S{:03}", id),
        cohort_id: cohort,
        team_id: None,
        enrollment_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        graduation_year: None,
    }
}

fn edge(from: i64, to: i64) -> PreferenceEdge {
    PreferenceEdge::new(from, to, 1)
}

#[test]
fn test_no_preferences_gives_singletons() {
    let assignment = TeamMatcher::default().assign(1..=4, Vec::new());

    assert_eq!(assignment.teams.len(), 4);
    for team in &assignment.teams {
        assert_eq!(team.members.len(), 1);
    }
    let names: Vec<&str> = assignment.teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Team 1", "Team 2", "Team 3", "Team 4"]);
}

#[test]
fn test_every_student_in_exactly_one_team() {
    let roster: Vec<i64> = (1..=12).collect();
    let edges = vec![edge(1, 2), edge(3, 4), edge(4, 5), edge(9, 1), edge(11, 12)];

    let assignment = TeamMatcher::default().assign(roster.clone(), edges);

    let mut seen: Vec<i64> = assignment
        .teams
        .iter()
        .flat_map(|t| t.members.iter().copied())
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, roster);
    assert!(assignment.teams.iter().all(|t| !t.members.is_empty()));
    assert_eq!(assignment.student_count, 12);
}

#[test]
fn test_cycle_forms_one_team() {
    let edges = vec![edge(1, 2), edge(2, 3), edge(3, 1)];
    let assignment = TeamMatcher::default().assign(vec![1, 2, 3], edges);

    assert_eq!(assignment.teams.len(), 1);
    assert_eq!(assignment.teams[0].members, vec![1, 2, 3]);
}

#[test]
fn test_two_cliques_and_an_isolated_student() {
    let edges = vec![
        edge(1, 2),
        edge(2, 1),
        edge(1, 3),
        edge(3, 2),
        edge(4, 5),
        edge(5, 4),
    ];

    let assignment = TeamMatcher::default().assign(1..=6, edges);

    let mut sizes: Vec<usize> = assignment.teams.iter().map(|t| t.members.len()).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![1, 2, 3]);
    assert_eq!(assignment.team_of(6).map(|i| assignment.teams[i - 1].members.len()), Some(1));
}

#[test]
fn test_one_directional_preference_is_enough() {
    let assignment = TeamMatcher::default().assign(vec![10, 20], vec![edge(20, 10)]);

    assert_eq!(assignment.teams.len(), 1);
    assert_eq!(assignment.team_of(10), assignment.team_of(20));
}

#[test]
fn test_rerun_is_deterministic() {
    let matcher = TeamMatcher::default();
    let edges = vec![edge(7, 3), edge(5, 1), edge(2, 8), edge(8, 7)];

    let first = matcher.assign(1..=8, edges.clone());
    let mut reversed = edges;
    reversed.reverse();
    let second = matcher.assign((1..=8).rev(), reversed);

    assert_eq!(first.teams, second.teams);
}

#[test]
fn test_edges_outside_roster_are_dropped() {
    let graph = PreferenceGraph::build(vec![1, 2], vec![edge(1, 2), edge(2, 99), edge(1, 1)]);

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.dropped_edges(), 2);
    assert!(!graph.contains(99));
}

#[test]
fn test_weight_is_reciprocal_rank() {
    let edges = vec![PreferenceEdge::new(1, 2, 1), PreferenceEdge::new(1, 3, 4)];
    let graph = PreferenceGraph::build(vec![1, 2, 3], edges);

    assert_eq!(graph.weight(1, 2), Some(1.0));
    assert_eq!(graph.weight(1, 3), Some(0.25));
    assert_eq!(graph.weight(2, 1), None);
    assert_eq!(graph.out_degree(1), 2);
}

#[test]
fn test_components_ordered_by_smallest_member() {
    let graph = PreferenceGraph::build(vec![30, 10, 20, 40], vec![edge(40, 10), edge(30, 20)]);

    let components = connected_components(&graph);
    assert_eq!(components, vec![vec![10, 40], vec![20, 30]]);
}

#[test]
fn test_disjoint_set_union() {
    let mut set = DisjointSet::new(5);

    assert!(set.union(0, 1));
    assert!(set.union(3, 4));
    assert!(!set.union(1, 0));
    assert_eq!(set.find(0), set.find(1));
    assert_ne!(set.find(1), set.find(3));
    assert_eq!(set.find(2), 2);
}

#[test]
fn test_preference_rejects_self() {
    let a = student(1, Some(1));
    assert_eq!(validate_preference(&a, &a, 1), Err(PreferenceError::SelfPreference));
}

#[test]
fn test_preference_rejects_cross_cohort() {
    let a = student(1, Some(1));
    let b = student(2, Some(2));

    assert_eq!(
        validate_preference(&a, &b, 1),
        Err(PreferenceError::CohortMismatch {
            student_cohort: 1,
            preferred_cohort: 2,
        })
    );
}

#[test]
fn test_preference_rejects_missing_cohort() {
    let a = student(1, Some(1));
    let b = student(2, None);

    assert_eq!(validate_preference(&a, &b, 1), Err(PreferenceError::MissingCohort(2)));
}

#[test]
fn test_preference_accepts_classmates() {
    let a = student(1, Some(3));
    let b = student(2, Some(3));

    assert!(validate_preference(&a, &b, 2).is_ok());
    assert_eq!(validate_preference(&a, &b, 0), Err(PreferenceError::InvalidRank(0)));
}

#[test]
fn test_cohort_window() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    assert!(validate_cohort("Cohort A", start, end).is_ok());
    assert!(validate_cohort("Cohort A", start, start).is_ok());
    assert!(validate_cohort("Cohort A", end, start).is_err());
    assert!(validate_cohort("   ", start, end).is_err());
}

#[test]
fn test_blueprint_matches_role() {
    let req = CreateUserRequest {
        email: "  Prof@Example.com ".to_string(),
        username: None,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        role: Role::Professor,
        profile: ProfileFields {
            student_id: Some("ignored".to_string()),
            department: Some("CS".to_string()),
            ..ProfileFields::default()
        },
    };

    let blueprint = UserBlueprint::from_request(&req);

    assert_eq!(blueprint.email, "prof@example.com");
    assert!(blueprint.username.starts_with("prof"));
    assert_eq!(blueprint.profile.role(), Role::Professor);
    assert!(matches!(
        blueprint.profile,
        ProfileBlueprint::Professor { ref department, .. } if department == "CS"
    ));
}

#[test]
fn test_only_admin_is_privileged() {
    assert!(Role::Admin.is_privileged());
    assert!(!Role::Professor.is_privileged());
    assert!(!Role::Student.is_privileged());
}
