//! Configuration system for the separation server.
//!
//! Supports:
//! - CLI arguments (highest priority)
//! - Environment variables
//! - TOML config file
//! - Defaults (lowest priority)
//!
//! Clap folds the first two together: every argument is optional and falls
//! back to its environment variable, so anything still unset after parsing is
//! taken from the file and then from the defaults.

use std::path::{Path, PathBuf};

use appstate::{DevicePreference, ServerStateConfig, PASSTHROUGH_MODEL_ID};
use clap::Parser;
use sam_audio_api::ApiConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8765;

/// Command-line arguments for the separation server.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "sam-audio-server")]
#[command(about = "SAM-Audio separation server - text-prompted source separation over HTTP")]
#[command(version)]
pub struct CliArgs {
    /// Model identifier passed to the model loader
    #[arg(long, short = 'm', env = "SAM_MODEL")]
    pub model: Option<String>,

    /// HTTP port
    #[arg(long, short = 'p', env = "SAM_PORT")]
    pub port: Option<u16>,

    /// Interface to bind
    #[arg(long, env = "SAM_HOST")]
    pub host: Option<String>,

    /// Compute device: auto, cpu or cuda
    #[arg(long, short = 'd', env = "SAM_DEVICE")]
    pub device: Option<DevicePreference>,

    /// Optional TOML configuration file
    #[arg(long, short = 'c', env = "SAM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `sam_audio_server=debug`
    #[arg(long, env = "RUST_LOG")]
    pub log_level: Option<String>,
}

/// Server settings as they appear in the TOML file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub model: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub device: Option<DevicePreference>,
}

impl FileConfig {
    /// Load a TOML file.
    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ServerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ServerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Full server configuration (merged from all sources).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub model: String,
    pub host: String,
    pub port: u16,
    pub device: DevicePreference,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model: PASSTHROUGH_MODEL_ID.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            device: DevicePreference::Auto,
        }
    }
}

impl ServerConfig {
    /// Load configuration from CLI args and the optional config file.
    ///
    /// Priority: CLI args > Environment > Config file > Defaults
    pub fn load(args: &CliArgs) -> ServerResult<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(args, file))
    }

    fn merge(args: &CliArgs, file: FileConfig) -> Self {
        let defaults = Self::default();
        Self {
            model: args.model.clone().or(file.model).unwrap_or(defaults.model),
            host: args.host.clone().or(file.host).unwrap_or(defaults.host),
            port: args.port.or(file.port).unwrap_or(defaults.port),
            device: args.device.or(file.device).unwrap_or(defaults.device),
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }

    pub fn state_config(&self) -> ServerStateConfig {
        ServerStateConfig {
            model_id: self.model.clone(),
            device: self.device,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::load(&CliArgs::default()).unwrap();
        assert_eq!(config.port, 8765);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.model, "passthrough");
        assert_eq!(config.device, DevicePreference::Auto);
    }

    #[test]
    fn test_cli_flags_parse() {
        let args = CliArgs::try_parse_from([
            "sam-audio-server",
            "--model",
            "facebook/sam-audio-large",
            "--port",
            "9000",
            "--device",
            "cpu",
        ])
        .unwrap();
        assert_eq!(args.model.as_deref(), Some("facebook/sam-audio-large"));
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.device, Some(DevicePreference::Cpu));
    }

    #[test]
    fn test_bad_device_rejected() {
        assert!(CliArgs::try_parse_from(["sam-audio-server", "--device", "tpu"]).is_err());
    }

    #[test]
    fn test_cli_args_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = \"from-file\"\nport = 7000\nhost = \"0.0.0.0\"\ndevice = \"cuda\"").unwrap();

        let args = CliArgs {
            port: Some(9000),
            device: Some(DevicePreference::Cpu),
            config: Some(file.path().to_path_buf()),
            ..CliArgs::default()
        };

        let config = ServerConfig::load(&args).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.device, DevicePreference::Cpu);
        assert_eq!(config.model, "from-file");
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 7000").unwrap();

        let args = CliArgs {
            config: Some(file.path().to_path_buf()),
            ..CliArgs::default()
        };

        let config = ServerConfig::load(&args).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.model, "passthrough");
        assert_eq!(config.api_config().bind_addr(), "127.0.0.1:7000");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = CliArgs {
            config: Some(PathBuf::from("/nonexistent/sam-audio.toml")),
            ..CliArgs::default()
        };
        assert!(matches!(ServerConfig::load(&args), Err(ServerError::ConfigRead { .. })));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prot = 7000").unwrap();

        let args = CliArgs {
            config: Some(file.path().to_path_buf()),
            ..CliArgs::default()
        };
        assert!(matches!(ServerConfig::load(&args), Err(ServerError::ConfigParse { .. })));
    }
}
