//! # SAM-Audio Values
//!
//! Shared request/response types for the separation service.
//!
//! Both sides of the wire use these types:
//! - the HTTP layer (`sam-audio-api`) deserializes [`SeparateRequest`] and
//!   serializes [`SeparateResponse`] / [`HealthResponse`]
//! - the backend (`appstate`) implements [`AppStateProvider`] and reports
//!   failures as [`BackendError`]
//! - the remote client (`sam-audio-client`) sends and parses the same JSON
//!
//! ```rust
//! use sam_audio_values::SeparateRequest;
//!
//! let req: SeparateRequest = serde_json::from_str(
//!     r#"{"audio_path": "clip.wav", "prompt": "drums"}"#,
//! ).unwrap();
//! assert!(req.output_dir.is_none());
//! ```

pub mod backend;
pub mod error;
pub mod request;
pub mod response;

pub use backend::AppStateProvider;
pub use error::{BackendError, BackendResult};
pub use request::SeparateRequest;
pub use response::{ErrorBody, HealthResponse, SeparateResponse};
