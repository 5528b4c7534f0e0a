use std::path::PathBuf;

use flashy_shared::constants::DEFAULT_HTTP_PORT;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Flashy API.
    /// Env: `FLASHY_API_URL`
    pub base_url: String,

    /// File holding the device identity.
    /// Env: `FLASHY_DEVICE_ID_PATH`
    /// Default: none, i.e. the platform config directory.
    pub device_id_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: format!("http://127.0.0.1:{DEFAULT_HTTP_PORT}"),
            device_id_path: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("FLASHY_API_URL") {
            if !url.trim().is_empty() {
                config.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(path) = std::env::var("FLASHY_DEVICE_ID_PATH") {
            if !path.is_empty() {
                config.device_id_path = Some(PathBuf::from(path));
            }
        }
        config
    }
}
