//! Capstone Teams - cohort team matching service for the capstone platform
//!
//! Students nominate classmates they want to work with. Admins then turn a
//! cohort's nominations into teams: every group of students linked by any
//! chain of nominations, in either direction, becomes one team.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    connected_components, PreferenceEdge, PreferenceGraph, TeamAssignment, TeamMatcher,
};
pub use error::ApiError;
pub use models::{
    Cohort, GenerateTeamsResponse, Preference, Role, StudentProfile, Team, TeamResponse,
};
