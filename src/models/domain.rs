use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Primary key of a student profile
pub type StudentId = i64;

/// Primary key of a cohort
pub type CohortId = i64;

/// Primary key of a team
pub type TeamId = i64;

/// Platform role carried by every user and by the JWT `role` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
    Professor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Professor => "professor",
        }
    }

    /// Only admins may regenerate teams or manage rosters
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_verified: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

/// Time-bounded group of students eligible to be matched together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cohort {
    pub id: CohortId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Student-specific profile attached to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: StudentId,
    pub user_id: Uuid,
    /// Institution-facing student code, distinct from the profile key
    pub student_id: String,
    pub cohort_id: Option<CohortId>,
    pub team_id: Option<TeamId>,
    pub enrollment_date: NaiveDate,
    pub graduation_year: Option<i32>,
}

/// Ranked, directed nomination from one student toward another
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preference {
    pub id: i64,
    pub student: StudentId,
    pub preferred_student: StudentId,
    pub rank: i32,
    pub created_at: DateTime<Utc>,
}

impl Preference {
    /// Lower rank means a stronger preference
    pub fn weight(&self) -> f64 {
        1.0 / self.rank as f64
    }
}

/// Persisted group of students, regenerated wholesale on each run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub cohort_id: CohortId,
    pub created_at: DateTime<Utc>,
}

/// Student identity plus the display fields borrowed from its user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: StudentId,
    pub student_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub team: Option<TeamId>,
}
