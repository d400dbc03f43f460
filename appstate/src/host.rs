//! Model host.
//!
//! Holds exactly one model/processor pair and the device it runs on. The model
//! identity is fixed for the process lifetime; there is no hot-swap.

use std::sync::Arc;

use crate::device::Device;
use crate::error::ModelError;
use crate::model::{AudioProcessor, ModelLoader, SeparationModel};

pub struct ModelHost {
    model_id: String,
    device: Device,
    cuda: bool,
    model: Option<Arc<dyn SeparationModel>>,
    processor: Option<Arc<AudioProcessor>>,
}

impl ModelHost {
    /// An empty host. Nothing is loaded until [`ModelHost::load`].
    pub fn new(model_id: impl Into<String>, device: Device, cuda: bool) -> Self {
        Self {
            model_id: model_id.into(),
            device,
            cuda,
            model: None,
            processor: None,
        }
    }

    /// Fetch the model and processor and place the model on the device.
    ///
    /// A failure leaves the host empty; the caller is expected to abort startup.
    pub fn load(&mut self, loader: &dyn ModelLoader) -> Result<(), ModelError> {
        if self.is_loaded() {
            tracing::warn!(model_id = %self.model_id, "Model already loaded, ignoring reload");
            return Ok(());
        }
        tracing::info!("Loading {} on {}...", self.model_id, self.device);
        let loaded = loader.load(&self.model_id, self.device)?;
        self.model = Some(Arc::from(loaded.model));
        self.processor = Some(Arc::new(loaded.processor));
        Ok(())
    }

    /// Drop the model references. Idempotent.
    ///
    /// A separation already in flight keeps its own handles and finishes.
    pub fn unload(&mut self) {
        if self.model.take().is_some() {
            tracing::info!(model_id = %self.model_id, "Model unloaded");
        }
        self.processor = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some() && self.processor.is_some()
    }

    /// Shared handles for one inference, or `None` when nothing is loaded.
    pub fn handles(&self) -> Option<(Arc<dyn SeparationModel>, Arc<AudioProcessor>)> {
        Some((self.model.clone()?, self.processor.clone()?))
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn cuda_available(&self) -> bool {
        self.cuda
    }
}

impl std::fmt::Debug for ModelHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHost")
            .field("model_id", &self.model_id)
            .field("device", &self.device)
            .field("cuda", &self.cuda)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
