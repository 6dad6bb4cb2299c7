use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest, HttpResponse};
use std::future::{ready, Ready};

use super::AppState;
use crate::error::ApiError;
use crate::models::{Role, StudentProfile, User};
use crate::services::Principal;

/// Caller resolved from the `Authorization: Bearer` header
///
/// Extraction fails with 401 when the header is missing or the token does not
/// validate.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Principal);

impl AuthenticatedUser {
    pub fn principal(&self) -> &Principal {
        &self.0
    }

    /// Reject callers whose role is not `role`
    pub fn require_role(&self, role: Role) -> Result<(), ApiError> {
        if self.0.role == role {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "This action requires the {} role",
                role
            )))
        }
    }

    /// Reject callers without the elevated role
    pub fn require_privileged(&self) -> Result<(), ApiError> {
        if self.0.role.is_privileged() {
            Ok(())
        } else {
            Err(ApiError::forbidden("You do not have permission to perform this action"))
        }
    }

    /// Stored record of the caller, rejected when it is gone, disabled or no
    /// longer holds the role the token was issued for
    ///
    /// Handlers call this after their token-only checks, before reading or
    /// writing anything on the caller's behalf.
    pub async fn active(&self, state: &AppState) -> Result<User, ApiError> {
        let stored = state.postgres.get_user(self.0.user_id).await?;
        ensure_active(&self.0, stored)
    }

    /// Student profile of an active caller, 403 when there is none
    pub async fn student_profile(&self, state: &AppState) -> Result<StudentProfile, ApiError> {
        self.active(state).await?;

        state
            .postgres
            .student_for_user(self.0.user_id)
            .await?
            .ok_or_else(|| ApiError::forbidden("User does not have a student profile"))
    }
}

fn ensure_active(principal: &Principal, stored: Option<User>) -> Result<User, ApiError> {
    let user = stored.ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    if !user.is_active {
        tracing::info!("Rejected request from disabled user {}", user.id);
        return Err(ApiError::forbidden("Account is disabled"));
    }
    if user.role != principal.role {
        return Err(ApiError::Unauthorized(
            "Token role does not match the account".to_string(),
        ));
    }

    Ok(user)
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("Application state is not configured".to_string()))?;

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let principal = state.auth.authenticate(header)?;
    Ok(AuthenticatedUser(principal))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/me", web::get().to(current_user));
}

/// Current user
///
/// GET /api/v1/auth/me
async fn current_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let record = user.active(&state).await?;
    Ok(HttpResponse::Ok().json(record))
}
