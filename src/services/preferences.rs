use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};

use super::postgres::{
    preference_from_row, student_from_row, summary_from_row, PostgresClient, PostgresError,
    STUDENT_COLUMNS, SUMMARY_COLUMNS,
};
use crate::core::validate_preference;
use crate::models::{
    Preference, PreferenceResponse, StudentId, StudentProfile, StudentSummary,
    UpdatePreferenceRequest,
};

/// Preference joined with the nominated classmate; callers append the filter
fn preference_view(filter: &str) -> String {
    format!(
        r#"
        SELECT p.id AS preference_id, p.student_id AS declaring_student,
               p.preferred_student_id, p.rank, p.created_at, {SUMMARY_COLUMNS}
        FROM student_preferences p
        JOIN student_profiles sp ON sp.id = p.preferred_student_id
        JOIN users u ON u.id = sp.user_id
        {filter}
        "#
    )
}

fn response_from_row(row: &PgRow) -> PreferenceResponse {
    let preference = Preference {
        id: row.get("preference_id"),
        student: row.get("declaring_student"),
        preferred_student: row.get("preferred_student_id"),
        rank: row.get("rank"),
        created_at: row.get("created_at"),
    };
    PreferenceResponse::new(preference, summary_from_row(row))
}

impl PostgresClient {
    /// Preferences declared by a student, strongest first
    pub async fn list_preferences(
        &self,
        student: StudentId,
    ) -> Result<Vec<PreferenceResponse>, PostgresError> {
        let query = preference_view("WHERE p.student_id = $1 ORDER BY p.rank, p.id");
        let rows = sqlx::query(&query)
            .bind(student)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(response_from_row).collect())
    }

    /// One of the student's own preferences
    pub async fn get_preference(
        &self,
        student: StudentId,
        preference_id: i64,
    ) -> Result<Option<PreferenceResponse>, PostgresError> {
        let query = preference_view("WHERE p.id = $1 AND p.student_id = $2");
        let row = sqlx::query(&query)
            .bind(preference_id)
            .bind(student)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(response_from_row))
    }

    /// Record a nomination after checking the cohort and self-reference rules
    ///
    /// The ordered pair is unique; a second nomination of the same classmate
    /// is a `Conflict`.
    pub async fn create_preference(
        &self,
        student: &StudentProfile,
        preferred_student: StudentId,
        rank: i32,
    ) -> Result<PreferenceResponse, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let (declaring, target) = lock_pair(&mut tx, student.id, preferred_student).await?;
        validate_preference(&declaring, &target, rank)?;

        let row = sqlx::query(
            r#"
            INSERT INTO student_preferences (student_id, preferred_student_id, rank)
            VALUES ($1, $2, $3)
            ON CONFLICT (student_id, preferred_student_id) DO NOTHING
            RETURNING id, student_id, preferred_student_id, rank, created_at
            "#,
        )
        .bind(declaring.id)
        .bind(target.id)
        .bind(rank)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            PostgresError::Conflict(format!(
                "Student {} is already in your preferences",
                target.id
            ))
        })?;
        let preference = preference_from_row(&row);

        let details = summary_in(&mut tx, target.id).await?;

        tx.commit().await?;

        tracing::debug!(
            "Recorded preference: {} -> {} (rank {})",
            preference.student,
            preference.preferred_student,
            preference.rank
        );

        Ok(PreferenceResponse::new(preference, details))
    }

    /// Change the rank or the nominated classmate of one of the student's preferences
    ///
    /// Fields left out keep their stored value. The result is checked against
    /// the same rules as a new nomination.
    pub async fn update_preference(
        &self,
        student: &StudentProfile,
        preference_id: i64,
        changes: &UpdatePreferenceRequest,
    ) -> Result<PreferenceResponse, PostgresError> {
        let not_found =
            || PostgresError::NotFound(format!("Preference {} not found", preference_id));
        let mut tx = self.pool.begin().await?;

        let stored = sqlx::query(
            r#"
            SELECT preferred_student_id, rank
            FROM student_preferences
            WHERE id = $1 AND student_id = $2
            "#,
        )
        .bind(preference_id)
        .bind(student.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(not_found)?;
        let stored_target: StudentId = stored.get("preferred_student_id");
        let stored_rank: i32 = stored.get("rank");

        let target_id = changes.preferred_student.unwrap_or(stored_target);
        let rank = changes.rank.unwrap_or(stored_rank);

        // Profiles before the preference row, the order cohort moves lock in
        let (declaring, target) = lock_pair(&mut tx, student.id, target_id).await?;
        validate_preference(&declaring, &target, rank)?;

        let row = sqlx::query(
            r#"
            UPDATE student_preferences
            SET preferred_student_id = $3, rank = $4
            WHERE id = $1 AND student_id = $2
            RETURNING id, student_id, preferred_student_id, rank, created_at
            "#,
        )
        .bind(preference_id)
        .bind(declaring.id)
        .bind(target.id)
        .bind(rank)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            let message = format!("Student {} is already in your preferences", target.id);
            PostgresError::conflict_on_unique(e, message)
        })?
        .ok_or_else(not_found)?;
        let preference = preference_from_row(&row);

        let details = summary_in(&mut tx, target.id).await?;

        tx.commit().await?;

        tracing::debug!(
            "Updated preference {}: {} -> {} (rank {})",
            preference.id,
            preference.student,
            preference.preferred_student,
            preference.rank
        );

        Ok(PreferenceResponse::new(preference, details))
    }

    /// Delete one of the student's own preferences; false when none matched
    pub async fn delete_preference(
        &self,
        student: StudentId,
        preference_id: i64,
    ) -> Result<bool, PostgresError> {
        let result =
            sqlx::query("DELETE FROM student_preferences WHERE id = $1 AND student_id = $2")
                .bind(preference_id)
                .bind(student)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Classmates the student may nominate: same cohort, excluding self
    pub async fn list_candidates(
        &self,
        student: &StudentProfile,
    ) -> Result<Vec<StudentSummary>, PostgresError> {
        let Some(cohort_id) = student.cohort_id else {
            return Ok(Vec::new());
        };

        let query = format!(
            r#"
            SELECT {SUMMARY_COLUMNS}
            FROM student_profiles sp
            JOIN users u ON u.id = sp.user_id
            WHERE sp.cohort_id = $1 AND sp.id <> $2
            ORDER BY sp.id
            "#
        );
        let rows = sqlx::query(&query)
            .bind(cohort_id)
            .bind(student.id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(summary_from_row).collect())
    }
}

/// Share-lock the declaring and nominated profiles so a concurrent cohort
/// move waits for the write
async fn lock_pair(
    conn: &mut PgConnection,
    student: StudentId,
    preferred_student: StudentId,
) -> Result<(StudentProfile, StudentProfile), PostgresError> {
    let query = format!(
        "SELECT {STUDENT_COLUMNS} FROM student_profiles WHERE id = ANY($1) ORDER BY id FOR SHARE"
    );
    let pair: Vec<StudentProfile> = sqlx::query(&query)
        .bind(vec![student, preferred_student])
        .fetch_all(&mut *conn)
        .await?
        .iter()
        .map(student_from_row)
        .collect();

    let find = |id: StudentId| {
        pair.iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| PostgresError::NotFound(format!("Student {} not found", id)))
    };

    Ok((find(student)?, find(preferred_student)?))
}

async fn summary_in(
    conn: &mut PgConnection,
    student: StudentId,
) -> Result<StudentSummary, PostgresError> {
    let query = format!(
        r#"
        SELECT {SUMMARY_COLUMNS}
        FROM student_profiles sp
        JOIN users u ON u.id = sp.user_id
        WHERE sp.id = $1
        "#
    );
    let row = sqlx::query(&query)
        .bind(student)
        .fetch_one(&mut *conn)
        .await?;

    Ok(summary_from_row(&row))
}
