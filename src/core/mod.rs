// Core algorithm exports
pub mod graph;
pub mod matcher;
pub mod partition;
pub mod profiles;
pub mod validation;

pub use graph::{PreferenceEdge, PreferenceGraph};
pub use matcher::{PlannedTeam, TeamAssignment, TeamMatcher};
pub use partition::{connected_components, DisjointSet};
pub use profiles::{ProfileBlueprint, UserBlueprint};
pub use validation::{validate_cohort, validate_preference, CohortError, PreferenceError};
