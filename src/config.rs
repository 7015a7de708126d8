//! Environment-driven application configuration.

use std::env;

use tracing::{info, warn};

/// TCP port the HTTP server binds to when `PORT` is unset.
const DEFAULT_PORT: u16 = 4000;
/// MongoDB connection string used when `MONGO_URL` is unset.
const DEFAULT_MONGO_URL: &str = "mongodb://localhost:27017";
/// MongoDB database name used when `MONGO_DB_NAME` is unset.
const DEFAULT_DB_NAME: &str = "pelada";
/// Browser origins allowed by CORS when `CORS_ORIGINS` is unset.
const DEFAULT_CORS_ORIGINS: &str = "http://127.0.0.1:5500,http://localhost:5500";
/// Value of `APP_ENV` that switches the server into production behavior.
const PRODUCTION_ENV: &str = "production";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// MongoDB connection string.
    pub mongo_url: String,
    /// Name of the MongoDB database holding all collections.
    pub db_name: String,
    /// Exact browser origins allowed to send credentialed requests.
    pub cors_origins: Vec<String>,
    /// Optional domain attribute stamped on the session cookie.
    pub cookie_domain: Option<String>,
    /// Whether the server runs with production cookie hardening.
    pub production: bool,
}

impl AppConfig {
    /// Assemble the configuration from environment variables, falling back to
    /// development defaults for anything unset.
    pub fn from_env() -> Self {
        let port = match env::var("PORT") {
            Ok(raw) => parse_port(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "invalid PORT value; using default");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let mongo_url = env::var("MONGO_URL").unwrap_or_else(|_| DEFAULT_MONGO_URL.to_owned());
        let db_name = env::var("MONGO_DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_owned());

        let cors_origins = parse_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_owned()),
        );

        let cookie_domain = env::var("COOKIE_DOMAIN")
            .ok()
            .filter(|domain| !domain.trim().is_empty());

        let production = env::var("APP_ENV")
            .map(|value| value.eq_ignore_ascii_case(PRODUCTION_ENV))
            .unwrap_or(false);

        let config = Self {
            port,
            mongo_url,
            db_name,
            cors_origins,
            cookie_domain,
            production,
        };

        info!(
            port = config.port,
            db = %config.db_name,
            origins = config.cors_origins.len(),
            production = config.production,
            "configuration resolved"
        );

        config
    }
}

/// Parse a port number, rejecting `0` since the server must bind a fixed port.
fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|port| *port != 0)
}

/// Split a comma-separated origins list, discarding empty entries.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}
