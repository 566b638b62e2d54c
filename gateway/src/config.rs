use std::path::PathBuf;

use auth::JwtConfig;
use db::DbConfig;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// HTTP listen address
    pub http_addr: String,

    /// Token signing configuration; the secret must be non-empty
    pub jwt: JwtConfig,

    /// Database connection settings
    pub db: DbConfig,

    /// SQL script applied at startup
    pub migration_path: PathBuf,

    /// Directory served for paths no API route matches
    pub static_dir: PathBuf,

    /// Service version
    pub version: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            jwt: JwtConfig::new(String::new()),
            db: DbConfig::default(),
            migration_path: PathBuf::from("./migrations/001_init.sql"),
            static_dir: PathBuf::from("./static"),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl GatewayConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("HTTP_ADDR") {
            config.http_addr = addr;
        }

        if let Some(secret) = lookup("JWT_SECRET_KEY") {
            config.jwt.secret = secret;
        }

        if let Some(host) = lookup("DB_HOST") {
            config.db.host = host;
        }

        if let Some(port) = lookup("DB_PORT").and_then(|p| p.parse().ok()) {
            config.db.port = port;
        }

        if let Some(name) = lookup("DB_NAME") {
            config.db.database = name;
        }

        if let Some(user) = lookup("DB_USER") {
            config.db.username = user;
        }

        if let Some(password) = lookup("DB_PASSWORD") {
            config.db.password = password;
        }

        if let Some(max) = lookup("DB_MAX_CONNECTIONS").and_then(|n| n.parse().ok()) {
            config.db = config.db.with_max_connections(max);
        }

        let attempts = lookup("DB_CONNECT_ATTEMPTS")
            .and_then(|n| n.parse().ok())
            .unwrap_or(config.db.connect_attempts);
        let delay = lookup("DB_RETRY_DELAY_SECS")
            .and_then(|n| n.parse().ok())
            .unwrap_or(config.db.retry_delay_secs);
        config.db = config.db.with_retry(attempts, delay);

        if let Some(path) = lookup("MIGRATION_PATH") {
            config.migration_path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        config
    }
}
