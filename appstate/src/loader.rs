//! Built-in model loader.
//!
//! Knows a single reference model, `passthrough`, which needs no external
//! weights: the target is the input and the residual is silence. It keeps the
//! server runnable end to end without a model library installed. Any other
//! identifier fails to load.

use crate::audio::Waveform;
use crate::device::Device;
use crate::error::ModelError;
use crate::model::{AudioProcessor, Batch, LoadedModel, ModelLoader, SeparateOptions, Separation, SeparationModel};

pub const PASSTHROUGH_MODEL_ID: &str = "passthrough";
pub const PASSTHROUGH_SAMPLE_RATE: u32 = 16_000;

#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinLoader;

impl ModelLoader for BuiltinLoader {
    fn load(&self, model_id: &str, device: Device) -> Result<LoadedModel, ModelError> {
        match model_id {
            PASSTHROUGH_MODEL_ID => {
                tracing::info!(model_id, %device, "Loading built-in model");
                Ok(LoadedModel {
                    model: Box::new(PassthroughModel),
                    processor: AudioProcessor::new(PASSTHROUGH_SAMPLE_RATE),
                })
            }
            other => Err(ModelError::UnknownModel(other.to_string())),
        }
    }
}

#[derive(Debug)]
struct PassthroughModel;

impl SeparationModel for PassthroughModel {
    fn separate(&self, batch: &Batch, _options: &SeparateOptions) -> Result<Separation, ModelError> {
        Ok(Separation {
            target: batch.audio.clone(),
            residual: Waveform::silence(batch.audio.num_channels(), batch.audio.num_frames()),
        })
    }
}
