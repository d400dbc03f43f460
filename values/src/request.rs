//! Request types.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use utoipa::ToSchema;

/// Body of `POST /separate`.
///
/// Immutable once received. Paths are interpreted on the server's filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeparateRequest {
    /// Audio file to separate.
    pub audio_path: String,
    /// Text description of the sound to isolate, e.g. `"drums"`.
    pub prompt: String,
    /// Directory for `target.wav` / `residual.wav`. Defaults to the input file's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

impl SeparateRequest {
    pub fn new(audio_path: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            audio_path: audio_path.into(),
            prompt: prompt.into(),
            output_dir: None,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<String>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// The directory the two artifacts are written to.
    ///
    /// An input path with no parent component resolves to the current directory.
    pub fn resolved_output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => PathBuf::from(dir),
            None => match Path::new(&self.audio_path).parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        }
    }
}
