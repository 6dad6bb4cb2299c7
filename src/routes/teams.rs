use actix_web::{web, HttpResponse};

use super::{AppState, AuthenticatedUser};
use crate::error::ApiError;
use crate::models::{GenerateTeamsRequest, GenerateTeamsResponse, TeamsQuery};

/// Configure all team-matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/team-matching/generate", web::post().to(generate_teams))
        .route("/team-matching/teams", web::get().to(list_teams));
}

/// Generate teams endpoint
///
/// POST /api/v1/team-matching/generate
///
/// Request body:
/// ```json
/// { "cohort_id": 1 }
/// ```
///
/// Replaces every team of the cohort with one team per connected component
/// of its preference graph.
async fn generate_teams(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<GenerateTeamsRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_privileged()?;

    let cohort_id = req
        .cohort_id
        .ok_or_else(|| ApiError::validation("cohort_id is required"))?;
    user.active(&state).await?;

    tracing::info!(
        "Generating teams for cohort {} (requested by {})",
        cohort_id,
        user.principal().user_id
    );

    let teams = state.postgres.generate_teams(cohort_id, &state.matcher).await?;

    Ok(HttpResponse::Ok().json(GenerateTeamsResponse::new(teams)))
}

/// List teams endpoint
///
/// GET /api/v1/team-matching/teams?cohort_id={cohortId}
///
/// Returns the teams currently stored for the cohort without recomputing them.
async fn list_teams(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<TeamsQuery>,
) -> Result<HttpResponse, ApiError> {
    user.require_privileged()?;

    let cohort_id = query
        .cohort_id
        .ok_or_else(|| ApiError::validation("cohort_id is required"))?;
    user.active(&state).await?;

    let teams = state.postgres.list_teams(cohort_id).await?;

    Ok(HttpResponse::Ok().json(teams))
}
