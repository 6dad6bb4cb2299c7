use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::domain::{CohortId, Role, StudentId};

/// Request to regenerate the teams of a cohort
///
/// `cohort_id` is optional at the serde level so a missing field is reported
/// as a validation error instead of a JSON payload error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateTeamsRequest {
    #[serde(default, alias = "cohortId", deserialize_with = "lenient_id")]
    pub cohort_id: Option<CohortId>,
}

/// Query string for listing the teams of a cohort
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamsQuery {
    #[serde(default, alias = "cohortId", deserialize_with = "lenient_id")]
    pub cohort_id: Option<CohortId>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

/// Accept an id as a number or a numeric string
///
/// `null`, an empty string and ids below 1 all read as absent.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<CohortId>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Option::<RawId>::deserialize(deserializer)? {
        None => None,
        Some(RawId::Number(n)) => Some(n),
        Some(RawId::Text(text)) if text.trim().is_empty() => None,
        Some(RawId::Text(text)) => Some(text.trim().parse::<i64>().map_err(|_| {
            <D::Error as de::Error>::invalid_value(de::Unexpected::Str(&text), &"an integer id")
        })?),
    };

    Ok(id.filter(|id| *id > 0))
}

/// Request to nominate a classmate as a desired teammate
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePreferenceRequest {
    #[serde(alias = "preferredStudent")]
    pub preferred_student: StudentId,
    #[validate(range(min = 1))]
    #[serde(default = "default_rank")]
    pub rank: i32,
}

fn default_rank() -> i32 {
    1
}

/// Partial change to an existing preference
///
/// `PUT` requires `preferred_student`; `PATCH` accepts either field alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePreferenceRequest {
    #[serde(default, alias = "preferredStudent")]
    pub preferred_student: Option<StudentId>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub rank: Option<i32>,
}

/// Request to create a user together with its role-specific profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub profile: ProfileFields,
}

/// Optional role-specific fields; those not relevant to the role are ignored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFields {
    pub student_id: Option<String>,
    pub cohort_id: Option<CohortId>,
    pub enrollment_date: Option<NaiveDate>,
    pub graduation_year: Option<i32>,
    pub employee_id: Option<String>,
    pub department: Option<String>,
    pub specialization: Option<String>,
    pub permissions_level: Option<String>,
}

/// Request to create a cohort
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCohortRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Request to move a student into a cohort, or out of every cohort with `null`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignCohortRequest {
    #[serde(default, alias = "cohortId")]
    pub cohort_id: Option<CohortId>,
}
