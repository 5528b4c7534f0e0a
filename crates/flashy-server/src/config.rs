//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use flashy_shared::constants::DEFAULT_HTTP_PORT;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: none, i.e. the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Whether starter decks are seeded at startup.
    /// Env: `SEED_STARTER_DECKS` (true/false)
    /// Default: `true`
    pub seed_starter_decks: bool,

    /// JSON file with the starter decks to seed.
    /// Env: `STARTER_DECKS_PATH`
    /// Default: none, i.e. the built-in set.
    pub starter_decks_path: Option<PathBuf>,

    /// Titles of starter decks to delete at startup, after seeding.
    /// Env: `REMOVE_STARTER_DECKS` (comma-separated)
    /// Default: empty
    pub remove_starter_decks: Vec<String>,

    /// Whether any origin may call the API.
    /// Env: `CORS_ALLOW_ANY` (true/false)
    /// Default: `true`
    pub cors_allow_any: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: None,
            seed_starter_decks: true,
            starter_decks_path: None,
            remove_starter_decks: Vec::new(),
            cors_allow_any: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Some(path) = lookup("DATABASE_PATH").filter(|p| !p.is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(val) = lookup("SEED_STARTER_DECKS") {
            config.seed_starter_decks = parse_flag(&val);
        }

        if let Some(path) = lookup("STARTER_DECKS_PATH").filter(|p| !p.is_empty()) {
            config.starter_decks_path = Some(PathBuf::from(path));
        }

        if let Some(titles) = lookup("REMOVE_STARTER_DECKS") {
            config.remove_starter_decks = titles
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(val) = lookup("CORS_ALLOW_ANY") {
            config.cors_allow_any = parse_flag(&val);
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

fn parse_flag(val: &str) -> bool {
    val != "false" && val != "0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ServerConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = load(&[]);
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert!(config.database_path.is_none());
        assert!(config.seed_starter_decks);
        assert!(config.remove_starter_decks.is_empty());
        assert!(config.cors_allow_any);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("HTTP_ADDR", "127.0.0.1:9000"),
            ("DATABASE_PATH", "/tmp/flashy.db"),
            ("SEED_STARTER_DECKS", "false"),
            ("STARTER_DECKS_PATH", "decks.json"),
            ("CORS_ALLOW_ANY", "0"),
        ]);
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 9000).into());
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/flashy.db")));
        assert!(!config.seed_starter_decks);
        assert_eq!(config.starter_decks_path, Some(PathBuf::from("decks.json")));
        assert!(!config.cors_allow_any);
    }

    #[test]
    fn test_remove_starter_decks_list() {
        let config = load(&[("REMOVE_STARTER_DECKS", " Spanish Essentials, ,Chemical Elements ")]);
        assert_eq!(
            config.remove_starter_decks,
            vec!["Spanish Essentials".to_string(), "Chemical Elements".to_string()]
        );
        assert!(load(&[("REMOVE_STARTER_DECKS", "")])
            .remove_starter_decks
            .is_empty());
    }

    #[test]
    fn test_invalid_addr_falls_back() {
        let config = load(&[("HTTP_ADDR", "not-an-addr")]);
        assert_eq!(config.http_addr, ServerConfig::default().http_addr);
    }
}
