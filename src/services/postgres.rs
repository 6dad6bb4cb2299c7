use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::core::PreferenceError;
use crate::models::{Cohort, Preference, StudentProfile, StudentSummary, Team, User};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid preference: {0}")]
    InvalidPreference(#[from] PreferenceError),
}

impl PostgresError {
    /// Turn a unique-constraint violation into a `Conflict`, pass anything else through
    pub(crate) fn conflict_on_unique(err: sqlx::Error, message: impl Into<String>) -> Self {
        let unique = err
            .as_database_error()
            .map_or(false, |db| db.is_unique_violation());

        if unique {
            PostgresError::Conflict(message.into())
        } else {
            PostgresError::SqlxError(err)
        }
    }
}

/// PostgreSQL client holding every persistent record of the platform
///
/// Query methods are grouped by concern in sibling modules (`cohorts`,
/// `users`, `preferences`, `teams`), each adding an `impl PostgresClient`
/// block.
pub struct PostgresClient {
    pub(crate) pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Build a client whose connections are only opened on first use
    pub fn connect_lazy(database_url: &str) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new().connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

pub(crate) fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        username: row.get("username"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        role: row.get("role"),
        is_verified: row.get("is_verified"),
        is_active: row.get("is_active"),
        date_joined: row.get("date_joined"),
    }
}

pub(crate) fn cohort_from_row(row: &PgRow) -> Cohort {
    Cohort {
        id: row.get("id"),
        name: row.get("name"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

pub(crate) fn student_from_row(row: &PgRow) -> StudentProfile {
    StudentProfile {
        id: row.get("id"),
        user_id: row.get("user_id"),
        student_id: row.get("student_id"),
        cohort_id: row.get("cohort_id"),
        team_id: row.get("team_id"),
        enrollment_date: row.get("enrollment_date"),
        graduation_year: row.get("graduation_year"),
    }
}

/// Expects the profile columns plus `email`, `first_name` and `last_name` from `users`
pub(crate) fn summary_from_row(row: &PgRow) -> StudentSummary {
    StudentSummary {
        id: row.get("id"),
        student_id: row.get("student_id"),
        email: row.get("email"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        team: row.get("team_id"),
    }
}

pub(crate) fn team_from_row(row: &PgRow) -> Team {
    Team {
        id: row.get("id"),
        name: row.get("name"),
        cohort_id: row.get("cohort_id"),
        created_at: row.get("created_at"),
    }
}

pub(crate) fn preference_from_row(row: &PgRow) -> Preference {
    Preference {
        id: row.get("id"),
        student: row.get("student_id"),
        preferred_student: row.get("preferred_student_id"),
        rank: row.get("rank"),
        created_at: row.get("created_at"),
    }
}

/// Column list read by [`student_from_row`]
pub(crate) const STUDENT_COLUMNS: &str =
    "id, user_id, student_id, cohort_id, team_id, enrollment_date, graduation_year";

/// Column list shared by every query returning a [`StudentSummary`]
pub(crate) const SUMMARY_COLUMNS: &str =
    "sp.id, sp.student_id, sp.team_id, u.email, u.first_name, u.last_name";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PostgresError::NotFound("Cohort 9 not found".to_string());
        assert_eq!(err.to_string(), "Not found: Cohort 9 not found");

        let err = PostgresError::conflict_on_unique(sqlx::Error::RowNotFound, "duplicate");
        assert!(matches!(err, PostgresError::SqlxError(sqlx::Error::RowNotFound)));
    }
}
