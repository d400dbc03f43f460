//! Admission gate.
//!
//! A single non-blocking lock in front of the inference path. A request that
//! cannot take the gate immediately is rejected, never queued: the service runs
//! one model on one device, so a second concurrent request has nothing useful
//! to do and the caller gets a fast "busy" instead of an unbounded wait.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Single-flight gate guarding the model.
///
/// Cloning yields another handle to the same gate.
#[derive(Debug, Clone, Default)]
pub struct AdmissionGate {
    held: Arc<AtomicBool>,
}

impl AdmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the gate without waiting.
    ///
    /// Returns `None` immediately if another permit is live. The gate is
    /// released when the returned permit is dropped, so every exit path of the
    /// critical section (including `?` and panics) releases it exactly once.
    pub fn try_acquire(&self) -> Option<GatePermit> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GatePermit {
                held: Arc::clone(&self.held),
            })
    }

    /// Read-only probe for health reporting. Does not acquire.
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Proof of admission. Dropping it releases the gate.
#[derive(Debug)]
#[must_use = "the gate is released as soon as the permit is dropped"]
pub struct GatePermit {
    held: Arc<AtomicBool>,
}

impl GatePermit {
    /// Release explicitly. Equivalent to dropping the permit.
    pub fn release(self) {}
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}
