use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use capstone_teams::config::{LoggingSettings, Settings};
use capstone_teams::core::TeamMatcher;
use capstone_teams::error::{
    handle_json_payload_error, handle_path_error, handle_query_payload_error,
};
use capstone_teams::routes::{self, AppState};
use capstone_teams::services::{JwtAuthenticator, PostgresClient};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // LOG_LEVEL / LOG_FORMAT still win over the config file
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting Capstone Teams service...");

    let auth = JwtAuthenticator::new(
        &settings.auth.jwt_secret,
        settings.auth.issuer.as_deref(),
        settings.auth.audience.as_deref(),
    )
    .map_err(|e| {
        error!("Invalid auth configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let db_max_conn = settings.database.max_connections.unwrap_or(10);

    let postgres = PostgresClient::from_settings(
        &settings.database.url,
        Some(db_max_conn),
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await
    .map_err(|e| {
        error!("Failed to connect to PostgreSQL: {}", e);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
    })?;

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    let matcher = TeamMatcher::new(settings.matching.team_name_prefix.clone());

    let app_state = AppState {
        postgres: Arc::new(postgres),
        auth: Arc::new(auth),
        matcher,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
