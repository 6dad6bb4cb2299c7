use actix_web::{web, HttpResponse};
use validator::Validate;

use super::{AppState, AuthenticatedUser};
use crate::error::ApiError;
use crate::models::{CreatePreferenceRequest, Role, UpdatePreferenceRequest};

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Registered before `/preferences/{id}` so the literal segment wins
    cfg.route("/preferences/candidates", web::get().to(list_candidates))
        .route("/preferences", web::get().to(list_preferences))
        .route("/preferences", web::post().to(create_preference))
        .route("/preferences/{id}", web::get().to(get_preference))
        .route("/preferences/{id}", web::put().to(replace_preference))
        .route("/preferences/{id}", web::patch().to(update_preference))
        .route("/preferences/{id}", web::delete().to(delete_preference));
}

/// GET /api/v1/preferences
async fn list_preferences(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Role::Student)?;
    let student = user.student_profile(&state).await?;

    let preferences = state.postgres.list_preferences(student.id).await?;
    Ok(HttpResponse::Ok().json(preferences))
}

/// Nominate a classmate
///
/// POST /api/v1/preferences
///
/// Request body:
/// ```json
/// { "preferred_student": 12, "rank": 1 }
/// ```
async fn create_preference(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreatePreferenceRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Role::Student)?;
    req.validate()?;

    let student = user.student_profile(&state).await?;
    let preference = state
        .postgres
        .create_preference(&student, req.preferred_student, req.rank)
        .await?;

    Ok(HttpResponse::Created().json(preference))
}

/// GET /api/v1/preferences/{id}
async fn get_preference(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Role::Student)?;
    let student = user.student_profile(&state).await?;
    let preference_id = path.into_inner();

    let preference = state
        .postgres
        .get_preference(student.id, preference_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Preference {} not found", preference_id)))?;

    Ok(HttpResponse::Ok().json(preference))
}

/// Replace the nominated classmate and optionally the rank
///
/// PUT /api/v1/preferences/{id}
///
/// Request body:
/// ```json
/// { "preferred_student": 14, "rank": 2 }
/// ```
async fn replace_preference(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    req: web::Json<UpdatePreferenceRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Role::Student)?;
    req.validate()?;
    if req.preferred_student.is_none() {
        return Err(ApiError::validation("preferred_student is required"));
    }

    apply_update(&state, &user, path.into_inner(), &req).await
}

/// Change the rank or the nominated classmate
///
/// PATCH /api/v1/preferences/{id}
///
/// Request body:
/// ```json
/// { "rank": 3 }
/// ```
async fn update_preference(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    req: web::Json<UpdatePreferenceRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Role::Student)?;
    req.validate()?;

    apply_update(&state, &user, path.into_inner(), &req).await
}

async fn apply_update(
    state: &AppState,
    user: &AuthenticatedUser,
    preference_id: i64,
    changes: &UpdatePreferenceRequest,
) -> Result<HttpResponse, ApiError> {
    let student = user.student_profile(state).await?;
    let preference = state
        .postgres
        .update_preference(&student, preference_id, changes)
        .await?;

    Ok(HttpResponse::Ok().json(preference))
}

/// DELETE /api/v1/preferences/{id}
async fn delete_preference(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Role::Student)?;
    let student = user.student_profile(&state).await?;
    let preference_id = path.into_inner();

    if state.postgres.delete_preference(student.id, preference_id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ApiError::not_found(format!(
            "Preference {} not found",
            preference_id
        )))
    }
}

/// Potential teammates: same cohort, excluding the caller
///
/// GET /api/v1/preferences/candidates
async fn list_candidates(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Role::Student)?;
    let student = user.student_profile(&state).await?;

    let candidates = state.postgres.list_candidates(&student).await?;
    Ok(HttpResponse::Ok().json(candidates))
}
