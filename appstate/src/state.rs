//! Central server state.
//!
//! `ServerState` replaces process-global model/lock variables with one owned
//! object that has an explicit lifecycle:
//!
//! 1. [`ServerState::init`] selects the device and loads the model (fatal on failure)
//! 2. request handlers call [`AppStateProvider`] methods through a shared reference
//! 3. [`ServerState::shutdown`] unloads the model
//!
//! A separation walks `Received → Validated → Admitted → Processing →
//! Completed | Failed`. The gate is only touched once the request is valid,
//! and it is released on every exit path by dropping the permit.

use std::path::Path;
use std::time::Instant;

use parking_lot::RwLock;
use tempfile::NamedTempFile;
use sam_audio_values::{AppStateProvider, BackendError, BackendResult, HealthResponse, SeparateRequest, SeparateResponse};

use crate::audio::Waveform;
use crate::device::{cuda_available, Device, DevicePreference};
use crate::error::{ModelError, ProcessingError};
use crate::gate::AdmissionGate;
use crate::host::ModelHost;
use crate::model::{AudioProcessor, ModelLoader, SeparateOptions, SeparationModel};

/// Artifact file names, written inside the output directory.
pub const TARGET_FILE: &str = "target.wav";
pub const RESIDUAL_FILE: &str = "residual.wav";

/// Configuration for `ServerState` initialization.
#[derive(Debug, Clone)]
pub struct ServerStateConfig {
    pub model_id: String,
    pub device: DevicePreference,
}

/// Shared state behind every request handler.
#[derive(Debug)]
pub struct ServerState {
    host: RwLock<ModelHost>,
    gate: AdmissionGate,
}

impl ServerState {
    /// Select the device and load the model.
    ///
    /// The process cannot become ready if this fails.
    pub fn init(config: ServerStateConfig, loader: &dyn ModelLoader) -> Result<Self, ModelError> {
        let cuda = cuda_available();
        let device = Device::select(config.device, cuda)?;
        let mut host = ModelHost::new(config.model_id, device, cuda);
        host.load(loader)?;
        tracing::info!(model_id = %host.model_id(), %device, "Separation server ready");
        Ok(Self::with_host(host))
    }

    /// Wrap an already prepared host.
    pub fn with_host(host: ModelHost) -> Self {
        Self {
            host: RwLock::new(host),
            gate: AdmissionGate::new(),
        }
    }

    /// Unload the model. Idempotent; later separations answer `ModelNotReady`.
    pub fn shutdown(&self) {
        self.host.write().unload();
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    pub fn is_ready(&self) -> bool {
        self.host.read().is_loaded()
    }

    pub fn model_id(&self) -> String {
        self.host.read().model_id().to_string()
    }

    pub fn device(&self) -> Device {
        self.host.read().device()
    }
}

impl AppStateProvider for ServerState {
    fn health(&self) -> HealthResponse {
        let host = self.host.read();
        HealthResponse {
            status: "ok".to_string(),
            model: host.is_loaded().then(|| host.model_id().to_string()),
            device: host.device().to_string(),
            cuda: host.cuda_available(),
            busy: self.gate.is_held(),
        }
    }

    fn separate(&self, request: &SeparateRequest) -> BackendResult<SeparateResponse> {
        // Received
        let (model, processor) = self.host.read().handles().ok_or(BackendError::ModelNotReady)?;

        // Validated
        let audio_path = Path::new(&request.audio_path);
        if !audio_path.is_file() {
            return Err(BackendError::invalid_input(
                "audio_path",
                format!("Audio file not found: {}", audio_path.display()),
            ));
        }

        // Admitted
        let Some(_permit) = self.gate.try_acquire() else {
            tracing::info!(audio_path = %request.audio_path, "Rejecting separation: gate held");
            return Err(BackendError::ServerBusy);
        };

        // Processing; the permit is dropped on every return below
        let started = Instant::now();
        tracing::info!(audio_path = %request.audio_path, prompt = %request.prompt, "Separation admitted");
        match run_separation(model.as_ref(), &processor, audio_path, request) {
            Ok(response) => {
                tracing::info!(
                    target_path = %response.target_path,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Separation completed"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::error!(error = %e, "Separation failed");
                Err(BackendError::processing(e))
            }
        }
    }
}

fn run_separation(
    model: &dyn SeparationModel,
    processor: &AudioProcessor,
    audio_path: &Path,
    request: &SeparateRequest,
) -> Result<SeparateResponse, ProcessingError> {
    let out_dir = request.resolved_output_dir();
    std::fs::create_dir_all(&out_dir).map_err(|source| ProcessingError::OutputDir {
        path: out_dir.clone(),
        source,
    })?;

    let batch = processor.prepare(audio_path, &request.prompt)?;
    let separation = model.separate(&batch, &SeparateOptions::default())?;

    let sample_rate = processor.sampling_rate();
    let target_path = out_dir.join(TARGET_FILE);
    let residual_path = out_dir.join(RESIDUAL_FILE);
    let target = stage_artifact(&separation.target, &out_dir, sample_rate)?;
    let residual = stage_artifact(&separation.residual, &out_dir, sample_rate)?;
    commit_artifacts((target, &target_path), (residual, &residual_path))?;

    Ok(SeparateResponse {
        target_path: target_path.to_string_lossy().into_owned(),
        residual_path: residual_path.to_string_lossy().into_owned(),
        sample_rate,
    })
}

/// Write `wave` to a hidden temporary file in `dir`. The file is deleted if
/// it is dropped without being committed.
fn stage_artifact(wave: &Waveform, dir: &Path, sample_rate: u32) -> Result<NamedTempFile, ProcessingError> {
    let staged = tempfile::Builder::new()
        .prefix(".sam-")
        .suffix(".wav.part")
        .tempfile_in(dir)
        .map_err(|source| ProcessingError::Stage {
            path: dir.to_path_buf(),
            source,
        })?;
    wave.write_wav(staged.path(), sample_rate)
        .map_err(|source| ProcessingError::Write {
            path: staged.path().to_path_buf(),
            source,
        })?;
    Ok(staged)
}

/// Move both staged files to their final names. Either both names end up
/// holding this job's output or neither does.
fn commit_artifacts(
    (target, target_path): (NamedTempFile, &Path),
    (residual, residual_path): (NamedTempFile, &Path),
) -> Result<(), ProcessingError> {
    target.persist(target_path).map_err(|e| ProcessingError::Commit {
        path: target_path.to_path_buf(),
        source: e.error,
    })?;

    if let Err(e) = residual.persist(residual_path) {
        if let Err(cleanup) = std::fs::remove_file(target_path) {
            tracing::warn!(path = %target_path.display(), error = %cleanup, "Failed to roll back target artifact");
        }
        return Err(ProcessingError::Commit {
            path: residual_path.to_path_buf(),
            source: e.error,
        });
    }
    Ok(())
}
