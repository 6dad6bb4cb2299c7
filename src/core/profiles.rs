//! Explicit construction of the role-specific profile that accompanies a new user.
//!
//! The role is passed in by the caller creating the user; nothing fires on
//! its own when a user row is written.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{CohortId, CreateUserRequest, ProfileFields, Role};

const GENERATED_ID_LEN: usize = 8;
const DEFAULT_PERMISSIONS_LEVEL: &str = "standard";

/// Everything needed to insert a user and its profile
#[derive(Debug, Clone, PartialEq)]
pub struct UserBlueprint {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub profile: ProfileBlueprint,
}

/// The profile row created alongside a user, one variant per role
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileBlueprint {
    Student {
        student_id: String,
        cohort_id: Option<CohortId>,
        enrollment_date: NaiveDate,
        graduation_year: Option<i32>,
    },
    Professor {
        employee_id: String,
        department: String,
        specialization: String,
    },
    Admin {
        department: String,
        permissions_level: String,
    },
}

impl ProfileBlueprint {
    /// Build the profile for `role`, generating identifiers that were not supplied
    pub fn for_role(role: Role, fields: &ProfileFields) -> Self {
        match role {
            Role::Student => ProfileBlueprint::Student {
                student_id: non_blank(&fields.student_id).unwrap_or_else(short_id),
                cohort_id: fields.cohort_id,
                enrollment_date: fields
                    .enrollment_date
                    .unwrap_or_else(|| Utc::now().date_naive()),
                graduation_year: fields.graduation_year,
            },
            Role::Professor => ProfileBlueprint::Professor {
                employee_id: non_blank(&fields.employee_id).unwrap_or_else(short_id),
                department: fields.department.clone().unwrap_or_default(),
                specialization: fields.specialization.clone().unwrap_or_default(),
            },
            Role::Admin => ProfileBlueprint::Admin {
                department: fields.department.clone().unwrap_or_default(),
                permissions_level: non_blank(&fields.permissions_level)
                    .unwrap_or_else(|| DEFAULT_PERMISSIONS_LEVEL.to_string()),
            },
        }
    }

    pub fn role(&self) -> Role {
        match self {
            ProfileBlueprint::Student { .. } => Role::Student,
            ProfileBlueprint::Professor { .. } => Role::Professor,
            ProfileBlueprint::Admin { .. } => Role::Admin,
        }
    }
}

impl UserBlueprint {
    pub fn from_request(req: &CreateUserRequest) -> Self {
        let email = req.email.trim().to_lowercase();
        let username = non_blank(&req.username).unwrap_or_else(|| default_username(&email));

        Self {
            id: Uuid::new_v4(),
            username,
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            role: req.role,
            profile: ProfileBlueprint::for_role(req.role, &req.profile),
            email,
        }
    }
}

/// Email local part followed by a short random suffix
pub fn default_username(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    format!("{}{}", local, short_id())
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..GENERATED_ID_LEN].to_string()
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
