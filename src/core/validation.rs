use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{CohortId, StudentId, StudentProfile};

/// Reasons a preference may not be recorded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceError {
    #[error("A student cannot nominate themselves")]
    SelfPreference,

    #[error("Student {0} is not assigned to a cohort")]
    MissingCohort(StudentId),

    #[error("Students belong to different cohorts ({student_cohort} and {preferred_cohort})")]
    CohortMismatch {
        student_cohort: CohortId,
        preferred_cohort: CohortId,
    },

    #[error("Rank must be at least 1, got {0}")]
    InvalidRank(i32),
}

/// Check the write-time rules for a preference
///
/// Uniqueness of the ordered pair is enforced by the store.
pub fn validate_preference(
    student: &StudentProfile,
    preferred: &StudentProfile,
    rank: i32,
) -> Result<(), PreferenceError> {
    if rank < 1 {
        return Err(PreferenceError::InvalidRank(rank));
    }

    if student.id == preferred.id {
        return Err(PreferenceError::SelfPreference);
    }

    let student_cohort = student
        .cohort_id
        .ok_or(PreferenceError::MissingCohort(student.id))?;
    let preferred_cohort = preferred
        .cohort_id
        .ok_or(PreferenceError::MissingCohort(preferred.id))?;

    if student_cohort != preferred_cohort {
        return Err(PreferenceError::CohortMismatch {
            student_cohort,
            preferred_cohort,
        });
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CohortError {
    #[error("Cohort name must not be blank")]
    BlankName,

    #[error("Cohort ends ({end}) before it starts ({start})")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },
}

pub fn validate_cohort(name: &str, start: NaiveDate, end: NaiveDate) -> Result<(), CohortError> {
    if name.trim().is_empty() {
        return Err(CohortError::BlankName);
    }
    if end < start {
        return Err(CohortError::InvertedWindow { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn student(id: StudentId, cohort: Option<CohortId>) -> StudentProfile {
        StudentProfile {
            id,
            user_id: Uuid::new_v4(),
            student_id: format!("S{}", id),
            cohort_id: cohort,
            team_id: None,
            enrollment_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            graduation_year: None,
        }
    }

    #[test]
    fn test_same_cohort_is_accepted() {
        assert!(validate_preference(&student(1, Some(1)), &student(2, Some(1)), 1).is_ok());
    }

    #[test]
    fn test_self_preference_rejected() {
        let s = student(1, Some(1));
        assert_eq!(
            validate_preference(&s, &s, 1),
            Err(PreferenceError::SelfPreference)
        );
    }

    #[test]
    fn test_cross_cohort_rejected() {
        let err = validate_preference(&student(1, Some(1)), &student(2, Some(2)), 1).unwrap_err();
        assert_eq!(
            err,
            PreferenceError::CohortMismatch {
                student_cohort: 1,
                preferred_cohort: 2
            }
        );
    }

    #[test]
    fn test_missing_cohort_rejected() {
        assert_eq!(
            validate_preference(&student(1, None), &student(2, None), 1),
            Err(PreferenceError::MissingCohort(1))
        );
        assert_eq!(
            validate_preference(&student(1, Some(3)), &student(2, None), 1),
            Err(PreferenceError::MissingCohort(2))
        );
    }

    #[test]
    fn test_rank_must_be_positive() {
        assert_eq!(
            validate_preference(&student(1, Some(1)), &student(2, Some(1)), 0),
            Err(PreferenceError::InvalidRank(0))
        );
    }

    #[test]
    fn test_cohort_window() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let jun = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        assert!(validate_cohort("Cohort A", jan, jun).is_ok());
        assert!(validate_cohort("Cohort A", jan, jan).is_ok());
        assert_eq!(validate_cohort("  ", jan, jun), Err(CohortError::BlankName));
        assert!(matches!(
            validate_cohort("Cohort A", jun, jan),
            Err(CohortError::InvertedWindow { .. })
        ));
    }
}
