use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{CohortId, Preference, StudentId, StudentSummary, Team, TeamId};

/// Team with its current members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamResponse {
    pub id: TeamId,
    pub name: String,
    pub cohort: CohortId,
    pub members: Vec<StudentSummary>,
    pub created_at: DateTime<Utc>,
}

impl TeamResponse {
    pub fn new(team: Team, members: Vec<StudentSummary>) -> Self {
        Self {
            id: team.id,
            name: team.name,
            cohort: team.cohort_id,
            members,
            created_at: team.created_at,
        }
    }
}

/// Response for the team generation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTeamsResponse {
    pub message: String,
    pub count: usize,
    pub teams: Vec<TeamResponse>,
}

impl GenerateTeamsResponse {
    pub fn new(teams: Vec<TeamResponse>) -> Self {
        Self {
            message: format!("Generated {} teams", teams.len()),
            count: teams.len(),
            teams,
        }
    }
}

/// Preference with the nominated classmate expanded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceResponse {
    pub id: i64,
    pub student: StudentId,
    pub preferred_student: StudentId,
    pub preferred_student_details: StudentSummary,
    pub rank: i32,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
}

impl PreferenceResponse {
    pub fn new(preference: Preference, details: StudentSummary) -> Self {
        Self {
            id: preference.id,
            student: preference.student,
            preferred_student: preference.preferred_student,
            preferred_student_details: details,
            rank: preference.rank,
            weight: preference.weight(),
            created_at: preference.created_at,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_response_counts_teams() {
        let team = Team {
            id: 1,
            name: "Team 1".to_string(),
            cohort_id: 4,
            created_at: Utc::now(),
        };
        let response = GenerateTeamsResponse::new(vec![TeamResponse::new(team, vec![])]);

        assert_eq!(response.count, 1);
        assert_eq!(response.message, "Generated 1 teams");
        assert_eq!(response.teams[0].cohort, 4);
    }
}
