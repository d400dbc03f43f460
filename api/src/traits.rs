//! Backend trait re-exports.

use std::sync::Arc;

pub use sam_audio_values::AppStateProvider;

/// Concrete router state: the backend behind a shared pointer.
pub type AppStateWrapper = Arc<dyn AppStateProvider>;
