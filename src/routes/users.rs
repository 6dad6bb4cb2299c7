use actix_web::{web, HttpResponse};
use validator::Validate;

use super::{AppState, AuthenticatedUser};
use crate::core::UserBlueprint;
use crate::error::ApiError;
use crate::models::CreateUserRequest;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users", web::post().to(create_user));
}

/// Create a user and the profile matching its role
///
/// POST /api/v1/users
///
/// Request body:
/// ```json
/// {
///   "email": "student@example.com",
///   "first_name": "Test",
///   "last_name": "Student",
///   "role": "student",
///   "profile": { "student_id": "SA001", "cohort_id": 1 }
/// }
/// ```
async fn create_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_privileged()?;
    req.validate()?;
    user.active(&state).await?;

    let blueprint = UserBlueprint::from_request(&req);
    let created = state.postgres.create_user(&blueprint).await?;

    Ok(HttpResponse::Created().json(created))
}
