//! Configuration module for the volunteer backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret used to sign and verify JWT auth cookies (required in production)
    pub jwt_secret: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Browser origins allowed to make credentialed CORS requests
    pub allowed_origins: Vec<String>,
    /// Whether auth cookies are marked Secure (HTTPS-only)
    pub secure_cookies: bool,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("VOLUNTEER_JWT_SECRET").ok();

        let db_path = env::var("VOLUNTEER_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let bind_addr = env::var("VOLUNTEER_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid VOLUNTEER_BIND_ADDR format");

        let allowed_origins = env::var("VOLUNTEER_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://localhost:5174".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let secure_cookies = env::var("VOLUNTEER_SECURE_COOKIES")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let log_level = env::var("VOLUNTEER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            jwt_secret,
            db_path,
            bind_addr,
            allowed_origins,
            secure_cookies,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("VOLUNTEER_JWT_SECRET");
        env::remove_var("VOLUNTEER_DB_PATH");
        env::remove_var("VOLUNTEER_BIND_ADDR");
        env::remove_var("VOLUNTEER_ALLOWED_ORIGINS");
        env::remove_var("VOLUNTEER_SECURE_COOKIES");
        env::remove_var("VOLUNTEER_LOG_LEVEL");

        let config = Config::from_env();

        assert!(config.jwt_secret.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/app.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:5173", "http://localhost:5174"]
        );
        assert!(!config.secure_cookies);
        assert_eq!(config.log_level, "info");
    }
}
