//! Application state for the SAM-Audio separation server.
//!
//! This crate owns everything behind the HTTP layer:
//!
//! ```text
//! Transport Layer (sam-audio-api)
//!          ↓  AppStateProvider
//!     ServerState (this crate)
//!      ├── AdmissionGate   single-flight, non-blocking
//!      └── ModelHost       model + processor + device, fixed for process lifetime
//!                ↓
//!          ModelLoader / SeparationModel (pretrained model library)
//! ```
//!
//! # Dependency Flow
//!
//! - `appstate` depends on: values
//! - Transport crates depend on: values (and appstate only in tests)
//! - Server binary depends on: appstate, transport crates

pub mod audio;
pub mod device;
pub mod error;
pub mod gate;
pub mod host;
pub mod loader;
pub mod model;
pub mod state;

pub use audio::Waveform;
pub use device::{cuda_available, Device, DevicePreference};
pub use error::{AudioError, ModelError, ProcessingError};
pub use gate::{AdmissionGate, GatePermit};
pub use host::ModelHost;
pub use loader::{BuiltinLoader, PASSTHROUGH_MODEL_ID, PASSTHROUGH_SAMPLE_RATE};
pub use model::{AudioProcessor, Batch, LoadedModel, ModelLoader, SeparateOptions, Separation, SeparationModel};
pub use state::{ServerState, ServerStateConfig};
