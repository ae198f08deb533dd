use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Application configuration, sourced from defaults plus `APP__`-prefixed
/// environment overrides (e.g. `APP__DATABASE_URL`, `APP__PORT`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub auto_migrate: bool,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub request_timeout_secs: u64,
    /// Comma-separated list of allowed CORS origins; unset means permissive
    /// CORS in development and an error in production.
    pub cors_allowed_origins: Option<String>,
}

impl AppConfig {
    pub fn new(database_url: String, host: String, port: u16, environment: String) -> Self {
        Self {
            database_url,
            host,
            port,
            environment,
            log_level: "info".to_string(),
            log_json: false,
            auto_migrate: false,
            db_max_connections: 10,
            db_min_connections: 1,
            request_timeout_secs: 30,
            cors_allowed_origins: None,
        }
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn is_development(&self) -> bool {
        matches!(self.environment.as_str(), "development" | "dev" | "test")
    }
}

/// Loads configuration from defaults and the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let cfg = Config::builder()
        .set_default("database_url", "postgres://localhost/rentalops")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", 8080_i64)?
        .set_default("environment", "development")?
        .set_default("log_level", "info")?
        .set_default("log_json", false)?
        .set_default("auto_migrate", false)?
        .set_default("db_max_connections", 10_i64)?
        .set_default("db_min_connections", 1_i64)?
        .set_default("request_timeout_secs", 30_i64)?
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    cfg.try_deserialize()
}

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rentalops_api={0},tower_http={0}", log_level)));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}
