//! Job ids and the table that hands results from worker threads to the main thread.
//!
//! Each key is written once by its worker and removed once by `finish`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use sam_audio_values::SeparateResponse;

use crate::error::ClientError;

/// Identifier of one submitted job. Strictly increasing within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(u64);

impl JobId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// What a worker produced for its job.
pub type JobOutcome = Result<SeparateResponse, ClientError>;

#[derive(Debug)]
pub struct JobTable {
    next_id: AtomicU64,
    outcomes: DashMap<JobId, JobOutcome>,
}

impl JobTable {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            outcomes: DashMap::new(),
        }
    }

    /// Allocate a fresh id.
    pub fn allocate(&self) -> JobId {
        JobId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Record the outcome of a job. Called from the worker thread.
    pub fn complete(&self, id: JobId, outcome: JobOutcome) {
        self.outcomes.insert(id, outcome);
    }

    /// Remove and return the outcome of a job, if it is present.
    pub fn take(&self, id: JobId) -> Option<JobOutcome> {
        self.outcomes.remove(&id).map(|(_, outcome)| outcome)
    }

    /// Completed jobs whose outcome has not been taken yet.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new()
    }
}
