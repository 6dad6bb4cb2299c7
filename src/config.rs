use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_team_name_prefix")]
    pub team_name_prefix: String,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            team_name_prefix: default_team_name_prefix(),
        }
    }
}

fn default_team_name_prefix() -> String { "Team".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CAPSTONE__)
    /// 5. DATABASE_URL and JWT_SECRET
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CAPSTONE__SERVER__PORT -> server.port
            .add_source(capstone_env())
            .build()?;

        apply_well_known_env(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(capstone_env())
            .build()?;

        apply_well_known_env(settings)?.try_deserialize()
    }
}

fn capstone_env() -> Environment {
    Environment::with_prefix("CAPSTONE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Let the conventional unprefixed variables win over everything else
fn apply_well_known_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Ok(secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matching() {
        assert_eq!(MatchingSettings::default().team_name_prefix, "Team");
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("capstone-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [database]
            url = "postgres://localhost/test"

            [auth]
            jwt_secret = "0123456789abcdef0123456789abcdef"

            [matching]
            team_name_prefix = "Group"
            "#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.matching.team_name_prefix, "Group");
        assert_eq!(settings.logging.format, "json");
        assert!(settings.server.workers.is_none());
    }
}
