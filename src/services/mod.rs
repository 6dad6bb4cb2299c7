// Service exports
pub mod auth;
pub mod cohorts;
pub mod postgres;
pub mod preferences;
pub mod teams;
pub mod users;

pub use auth::{AuthError, Claims, JwtAuthenticator, Principal};
pub use postgres::{PostgresClient, PostgresError};
