//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8765";
pub const DEFAULT_TARGET_OBJECT: &str = "audioin_target";
pub const DEFAULT_RESIDUAL_OBJECT: &str = "audioin_residual";

/// Settings for [`RemoteClient`](crate::RemoteClient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the separation server, without a trailing slash.
    pub server_url: String,

    /// Directory the server writes artifacts into. `None` lets the server use
    /// the input file's directory.
    pub work_dir: Option<PathBuf>,

    /// Playback object that receives the isolated sound.
    pub target_object: String,

    /// Playback object that receives everything else.
    pub residual_object: String,

    /// Ceiling for one `/separate` call.
    ///
    /// Default: 300s
    pub separate_timeout: Duration,

    /// Ceiling for one `/health` call.
    ///
    /// Default: 10s
    pub health_timeout: Duration,

    /// Frames to wait after a job completes before its result is applied.
    ///
    /// Default: 1
    pub finish_delay_frames: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            work_dir: None,
            target_object: DEFAULT_TARGET_OBJECT.to_string(),
            residual_object: DEFAULT_RESIDUAL_OBJECT.to_string(),
            separate_timeout: Duration::from_secs(300),
            health_timeout: Duration::from_secs(10),
            finish_delay_frames: 1,
        }
    }
}

impl ClientConfig {
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.server_url, "http://127.0.0.1:8765");
        assert_eq!(config.target_object, "audioin_target");
        assert_eq!(config.residual_object, "audioin_residual");
        assert_eq!(config.separate_timeout, Duration::from_secs(300));
        assert_eq!(config.health_timeout, Duration::from_secs(10));
        assert_eq!(config.finish_delay_frames, 1);
        assert!(config.work_dir.is_none());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::default().with_server_url("http://localhost:9000/");
        assert_eq!(config.endpoint("/health"), "http://localhost:9000/health");
    }
}
