// Route exports
pub mod auth;
pub mod cohorts;
pub mod preferences;
pub mod teams;
pub mod users;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::TeamMatcher;
use crate::models::HealthResponse;
use crate::services::{JwtAuthenticator, PostgresClient};

pub use auth::AuthenticatedUser;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub auth: Arc<JwtAuthenticator>,
    pub matcher: TeamMatcher,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(auth::configure)
            .configure(users::configure)
            .configure(cohorts::configure)
            .configure(preferences::configure)
            .configure(teams::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
