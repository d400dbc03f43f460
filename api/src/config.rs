//! API configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the HTTP API server.
///
/// # Example
///
/// ```rust
/// use sam_audio_api::ApiConfig;
///
/// let config = ApiConfig {
///     host: "127.0.0.1".to_string(),
///     port: 8765,
/// };
/// assert_eq!(config.bind_addr(), "127.0.0.1:8765");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind. Localhost by default.
    pub host: String,

    /// Port to bind.
    ///
    /// Default: 8765
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8765,
        }
    }
}

impl ApiConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
