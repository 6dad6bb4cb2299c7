// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Cohort, CohortId, Preference, Role, StudentId, StudentProfile, StudentSummary, Team, TeamId,
    User,
};
pub use requests::{
    AssignCohortRequest, CreateCohortRequest, CreatePreferenceRequest, CreateUserRequest,
    GenerateTeamsRequest, ProfileFields, TeamsQuery, UpdatePreferenceRequest,
};
pub use responses::{
    ErrorResponse, GenerateTeamsResponse, HealthResponse, PreferenceResponse, TeamResponse,
};
