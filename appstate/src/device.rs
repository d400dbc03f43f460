/*!
Compute device selection.

The device is chosen once at startup (GPU if available, else CPU) and is fixed
for the lifetime of the process.
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::Command;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::ModelError;

/// Device the model is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cpu,
    Cuda,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Cuda => "cuda",
        }
    }

    /// Resolve a preference against GPU availability.
    pub fn select(preference: DevicePreference, cuda_available: bool) -> Result<Self, ModelError> {
        match (preference, cuda_available) {
            (DevicePreference::Auto, true) | (DevicePreference::Cuda, true) => Ok(Self::Cuda),
            (DevicePreference::Auto, false) | (DevicePreference::Cpu, _) => Ok(Self::Cpu),
            (DevicePreference::Cuda, false) => Err(ModelError::DeviceUnavailable(
                "cuda requested but no CUDA GPU was detected".to_string(),
            )),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested device, as configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    #[default]
    Auto,
    Cpu,
    Cuda,
}

impl FromStr for DevicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "cpu" => Ok(Self::Cpu),
            "cuda" | "gpu" => Ok(Self::Cuda),
            other => Err(format!("unknown device '{}', expected auto, cpu or cuda", other)),
        }
    }
}

/// Whether a CUDA GPU is visible to this process.
///
/// Probed once with `nvidia-smi -L`; later calls return the cached answer.
pub fn cuda_available() -> bool {
    static CUDA: OnceLock<bool> = OnceLock::new();
    *CUDA.get_or_init(probe_nvidia_smi)
}

fn probe_nvidia_smi() -> bool {
    match Command::new("nvidia-smi").arg("-L").output() {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let found = stdout.lines().any(|line| line.trim_start().starts_with("GPU "));
            tracing::debug!(found, "nvidia-smi probe finished");
            found
        }
        Ok(output) => {
            tracing::debug!(status = %output.status, "nvidia-smi returned failure");
            false
        }
        Err(e) => {
            tracing::debug!("nvidia-smi not available: {}", e);
            false
        }
    }
}
