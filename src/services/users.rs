use uuid::Uuid;

use super::postgres::{
    student_from_row, user_from_row, PostgresClient, PostgresError, STUDENT_COLUMNS,
};
use crate::core::{ProfileBlueprint, UserBlueprint};
use crate::models::{StudentProfile, User};

const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, role, is_verified, is_active, date_joined";

impl PostgresClient {
    /// Insert a user together with the profile its role calls for
    ///
    /// Both rows are written in one transaction, so a user never exists
    /// without its profile.
    pub async fn create_user(&self, blueprint: &UserBlueprint) -> Result<User, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO users (id, email, username, first_name, last_name, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        );
        let row = sqlx::query(&query)
            .bind(blueprint.id)
            .bind(&blueprint.email)
            .bind(&blueprint.username)
            .bind(&blueprint.first_name)
            .bind(&blueprint.last_name)
            .bind(blueprint.role)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                PostgresError::conflict_on_unique(
                    e,
                    "A user with this email or username already exists",
                )
            })?;
        let user = user_from_row(&row);

        match &blueprint.profile {
            ProfileBlueprint::Student {
                student_id,
                cohort_id,
                enrollment_date,
                graduation_year,
            } => {
                if let Some(id) = cohort_id {
                    let exists = sqlx::query("SELECT id FROM cohorts WHERE id = $1")
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await?;
                    if exists.is_none() {
                        return Err(PostgresError::NotFound(format!("Cohort {} not found", id)));
                    }
                }

                sqlx::query(
                    r#"
                    INSERT INTO student_profiles
                        (user_id, student_id, cohort_id, enrollment_date, graduation_year)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(user.id)
                .bind(student_id)
                .bind(cohort_id)
                .bind(enrollment_date)
                .bind(graduation_year)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    let message = format!("Student code {} is already taken", student_id);
                    PostgresError::conflict_on_unique(e, message)
                })?;
            }
            ProfileBlueprint::Professor {
                employee_id,
                department,
                specialization,
            } => {
                sqlx::query(
                    r#"
                    INSERT INTO professor_profiles
                        (user_id, employee_id, department, specialization)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(user.id)
                .bind(employee_id)
                .bind(department)
                .bind(specialization)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    let message = format!("Employee id {} is already taken", employee_id);
                    PostgresError::conflict_on_unique(e, message)
                })?;
            }
            ProfileBlueprint::Admin {
                department,
                permissions_level,
            } => {
                sqlx::query(
                    r#"
                    INSERT INTO admin_profiles (user_id, department, permissions_level)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(user.id)
                .bind(department)
                .bind(permissions_level)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        tracing::info!("Created {} user {}", user.role, user.id);
        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, PostgresError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, PostgresError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query(&query)
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Student profile owned by a user, if the user is a student
    pub async fn student_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<StudentProfile>, PostgresError> {
        let query = format!("SELECT {STUDENT_COLUMNS} FROM student_profiles WHERE user_id = $1");
        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(student_from_row))
    }
}
