use actix_web::{web, HttpResponse};
use validator::Validate;

use super::{AppState, AuthenticatedUser};
use crate::error::ApiError;
use crate::models::{AssignCohortRequest, CreateCohortRequest};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/cohorts", web::get().to(list_cohorts))
        .route("/cohorts", web::post().to(create_cohort))
        .route("/cohorts/{id}", web::get().to(get_cohort))
        .route("/students/{id}/cohort", web::put().to(assign_cohort));
}

/// GET /api/v1/cohorts
async fn list_cohorts(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    user.active(&state).await?;

    let cohorts = state.postgres.list_cohorts().await?;
    Ok(HttpResponse::Ok().json(cohorts))
}

/// GET /api/v1/cohorts/{id}
async fn get_cohort(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    user.active(&state).await?;

    let cohort_id = path.into_inner();
    let cohort = state
        .postgres
        .get_cohort(cohort_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Cohort {} not found", cohort_id)))?;

    Ok(HttpResponse::Ok().json(cohort))
}

/// POST /api/v1/cohorts
async fn create_cohort(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateCohortRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_privileged()?;
    req.validate()?;
    user.active(&state).await?;

    let cohort = state.postgres.create_cohort(&req).await?;
    Ok(HttpResponse::Created().json(cohort))
}

/// Move a student between cohorts
///
/// PUT /api/v1/students/{id}/cohort
///
/// Request body:
/// ```json
/// { "cohort_id": 2 }
/// ```
/// A `null` cohort removes the student from every cohort.
async fn assign_cohort(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    req: web::Json<AssignCohortRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_privileged()?;
    user.active(&state).await?;

    let student = state
        .postgres
        .assign_cohort(path.into_inner(), req.cohort_id)
        .await?;

    Ok(HttpResponse::Ok().json(student))
}
