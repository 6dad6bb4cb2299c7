use super::postgres::{
    cohort_from_row, student_from_row, PostgresClient, PostgresError, STUDENT_COLUMNS,
};
use crate::models::{Cohort, CohortId, CreateCohortRequest, StudentId, StudentProfile};

/// Lock attempts before a concurrently moving student is reported as a conflict
const MOVE_ATTEMPTS: usize = 3;

impl PostgresClient {
    /// All cohorts, latest start date first
    pub async fn list_cohorts(&self) -> Result<Vec<Cohort>, PostgresError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, start_date, end_date, is_active, created_at
            FROM cohorts
            ORDER BY start_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(cohort_from_row).collect())
    }

    pub async fn get_cohort(&self, cohort_id: CohortId) -> Result<Option<Cohort>, PostgresError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, start_date, end_date, is_active, created_at
            FROM cohorts
            WHERE id = $1
            "#,
        )
        .bind(cohort_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(cohort_from_row))
    }

    pub async fn find_cohort_by_name(&self, name: &str) -> Result<Option<Cohort>, PostgresError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, start_date, end_date, is_active, created_at
            FROM cohorts
            WHERE name = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(cohort_from_row))
    }

    pub async fn create_cohort(&self, req: &CreateCohortRequest) -> Result<Cohort, PostgresError> {
        crate::core::validate_cohort(&req.name, req.start_date, req.end_date)
            .map_err(|e| PostgresError::InvalidInput(e.to_string()))?;

        let row = sqlx::query(
            r#"
            INSERT INTO cohorts (name, start_date, end_date, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, start_date, end_date, is_active, created_at
            "#,
        )
        .bind(req.name.trim())
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.is_active)
        .fetch_one(&self.pool)
        .await?;

        let cohort = cohort_from_row(&row);
        tracing::info!("Created cohort {} ({})", cohort.id, cohort.name);
        Ok(cohort)
    }

    /// Move a student into `cohort_id`, or out of every cohort with `None`
    ///
    /// Changing cohort clears the student's team and deletes every preference
    /// the student declared or received, since those would now cross cohorts.
    ///
    /// Both cohort rows are share-locked before the student row, the same
    /// order team generation takes its locks in, so a move never interleaves
    /// with a generation run of either cohort.
    pub async fn assign_cohort(
        &self,
        student: StudentId,
        cohort_id: Option<CohortId>,
    ) -> Result<StudentProfile, PostgresError> {
        for _ in 0..MOVE_ATTEMPTS {
            if let Some(moved) = self.try_assign_cohort(student, cohort_id).await? {
                return Ok(moved);
            }
        }

        Err(PostgresError::Conflict(format!(
            "Student {} is being moved by another request",
            student
        )))
    }

    /// One locking attempt; `None` when the student changed cohort between
    /// the unlocked read and the row lock
    async fn try_assign_cohort(
        &self,
        student: StudentId,
        cohort_id: Option<CohortId>,
    ) -> Result<Option<StudentProfile>, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let seen: Option<CohortId> =
            sqlx::query_scalar("SELECT cohort_id FROM student_profiles WHERE id = $1")
                .bind(student)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| PostgresError::NotFound(format!("Student {} not found", student)))?;

        let wanted: Vec<CohortId> = seen.into_iter().chain(cohort_id).collect();
        let locked: Vec<CohortId> = sqlx::query_scalar(
            "SELECT id FROM cohorts WHERE id = ANY($1) ORDER BY id FOR SHARE",
        )
        .bind(wanted.as_slice())
        .fetch_all(&mut *tx)
        .await?;

        if let Some(id) = cohort_id {
            if !locked.contains(&id) {
                return Err(PostgresError::NotFound(format!("Cohort {} not found", id)));
            }
        }

        let current = sqlx::query(&format!(
            "SELECT {STUDENT_COLUMNS} FROM student_profiles WHERE id = $1 FOR UPDATE"
        ))
        .bind(student)
        .fetch_optional(&mut *tx)
        .await?
        .map(|row| student_from_row(&row))
        .ok_or_else(|| PostgresError::NotFound(format!("Student {} not found", student)))?;

        if current.cohort_id != seen {
            tracing::debug!("Student {} changed cohort while locking, retrying", student);
            return Ok(None);
        }
        if current.cohort_id == cohort_id {
            return Ok(Some(current));
        }

        let removed = sqlx::query(
            "DELETE FROM student_preferences WHERE student_id = $1 OR preferred_student_id = $1",
        )
        .bind(student)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let row = sqlx::query(&format!(
            r#"
            UPDATE student_profiles
            SET cohort_id = $2, team_id = NULL
            WHERE id = $1
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(student)
        .bind(cohort_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Moved student {} from cohort {:?} to {:?} ({} preferences removed)",
            student,
            current.cohort_id,
            cohort_id,
            removed
        );

        Ok(Some(student_from_row(&row)))
    }
}
