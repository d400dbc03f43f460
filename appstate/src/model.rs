//! Contract with the pretrained model library.
//!
//! The library is an external collaborator. All this server needs from it is
//! `load(model_id) -> (model, processor)` and
//! `model.separate(processor.prepare(audio, text)) -> (target, residual)`.

use std::path::Path;

use crate::audio::Waveform;
use crate::device::Device;
use crate::error::ModelError;

/// Model input: one clip plus its text description, at the model's native rate.
#[derive(Debug, Clone)]
pub struct Batch {
    pub audio: Waveform,
    pub description: String,
    pub sample_rate: u32,
}

/// Fixed inference options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparateOptions {
    pub predict_spans: bool,
    pub reranking_candidates: u32,
}

impl Default for SeparateOptions {
    fn default() -> Self {
        Self {
            predict_spans: false,
            reranking_candidates: 1,
        }
    }
}

/// Model output.
#[derive(Debug, Clone)]
pub struct Separation {
    /// Isolated sound matching the description.
    pub target: Waveform,
    /// Everything else.
    pub residual: Waveform,
}

/// A loaded separation model.
///
/// Weights are read-only during inference. Implementations are only ever
/// invoked by one request at a time (the admission gate serializes callers).
pub trait SeparationModel: Send + Sync {
    fn separate(&self, batch: &Batch, options: &SeparateOptions) -> Result<Separation, ModelError>;
}

/// Builds model batches from files on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioProcessor {
    sampling_rate: u32,
}

impl AudioProcessor {
    pub fn new(sampling_rate: u32) -> Self {
        Self { sampling_rate }
    }

    /// Native sampling rate of the model. Output files are written at this rate.
    pub fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    /// Decode `audio_path` and resample it to the native rate.
    pub fn prepare(&self, audio_path: &Path, description: &str) -> Result<Batch, ModelError> {
        let (audio, source_rate) = Waveform::read_wav(audio_path)?;
        if source_rate != self.sampling_rate {
            tracing::debug!(
                from = source_rate,
                to = self.sampling_rate,
                "Resampling input to native rate"
            );
        }
        Ok(Batch {
            audio: audio.resample(source_rate, self.sampling_rate),
            description: description.to_string(),
            sample_rate: self.sampling_rate,
        })
    }
}

/// Result of a successful load.
pub struct LoadedModel {
    pub model: Box<dyn SeparationModel>,
    pub processor: AudioProcessor,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("model", &"<dyn SeparationModel>")
            .field("processor", &self.processor)
            .finish()
    }
}

/// Fetches a model and its processor and places the model on a device.
pub trait ModelLoader: Send + Sync {
    fn load(&self, model_id: &str, device: Device) -> Result<LoadedModel, ModelError>;
}
