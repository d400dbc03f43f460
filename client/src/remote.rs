//! The client a frame-driven host talks to.
//!
//! ```text
//!  main thread                       worker thread (one per job)
//!  ───────────                       ───────────────────────────
//!  submit() ── export buffer
//!          ── allocate JobId
//!          ── spawn ───────────────▶ transport.separate()
//!                                    jobs.complete(id, outcome)
//!                                    queue.schedule(delay, id)
//!  tick()   ◀── queue.advance() ────┘
//!   └ finish(id) ── jobs.take(id) ── set_file + reload on both playback objects
//! ```
//!
//! Jobs finish in whatever order their requests return. Every result is keyed
//! by its own id, so out-of-order completion needs no coordination.

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use sam_audio_values::{HealthResponse, SeparateRequest};
use tracing::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::deferred::DeferredQueue;
use crate::error::{ClientError, SubmitError};
use crate::host::Host;
use crate::jobs::{JobId, JobOutcome, JobTable};
use crate::transport::{HttpTransport, Transport};

pub struct RemoteClient<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: Arc<T>,
    jobs: Arc<JobTable>,
    queue: Arc<DeferredQueue<JobId>>,
}

impl RemoteClient<HttpTransport> {
    /// Client over HTTP. Must be created outside any async runtime.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> RemoteClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
            jobs: Arc::new(JobTable::new()),
            queue: Arc::new(DeferredQueue::new()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Query `/health` and log the result. Blocks for at most the health timeout.
    pub fn check_server(&self) -> Result<HealthResponse, ClientError> {
        match self.transport.health() {
            Ok(health) => {
                info!(
                    "Server OK - model: {}  device: {}  busy: {}",
                    health.model.as_deref().unwrap_or("<none>"),
                    health.device,
                    health.busy
                );
                Ok(health)
            }
            Err(e) => {
                match &e {
                    ClientError::Unreachable(_) => {
                        warn!("{} (is the separation server running at {}?)", e, self.config.server_url)
                    }
                    _ => error!("Health check failed: {}", e),
                }
                Err(e)
            }
        }
    }

    /// Start a separation without blocking the caller.
    ///
    /// When `source` names a host audio buffer, it is written to `audio_path`
    /// first. The result is applied by [`tick`](Self::tick) on a later frame.
    pub fn submit(
        &self,
        host: &dyn Host,
        audio_path: &str,
        prompt: &str,
        source: Option<&str>,
    ) -> Result<JobId, SubmitError> {
        let audio_path = audio_path.replace('\\', "/");

        if let Some(buffer_name) = source {
            export_buffer(host, buffer_name, Path::new(&audio_path))?;
        }

        let job_id = self.jobs.allocate();
        let mut request = SeparateRequest::new(audio_path.as_str(), prompt);
        if let Some(dir) = &self.config.work_dir {
            request = request.with_output_dir(dir.to_string_lossy());
        }

        let transport = Arc::clone(&self.transport);
        let jobs = Arc::clone(&self.jobs);
        let queue = Arc::clone(&self.queue);
        let delay = self.config.finish_delay_frames;

        thread::Builder::new()
            .name(format!("sam-audio-{}", job_id))
            .spawn(move || {
                let outcome = transport.separate(&request);
                debug!(%job_id, ok = outcome.is_ok(), "Worker finished");
                jobs.complete(job_id, outcome);
                queue.schedule(delay, job_id);
            })
            .map_err(SubmitError::Spawn)?;

        info!(%job_id, "Separating '{}' from {} ...", prompt, audio_path);
        Ok(job_id)
    }

    /// Advance one frame and finish every job that came due.
    ///
    /// Call once per host frame from the main thread.
    pub fn tick(&self, host: &mut dyn Host) -> Vec<JobId> {
        let ready = self.queue.advance();
        for &job_id in &ready {
            self.finish(host, job_id);
        }
        ready
    }

    /// Run frames every `frame` until `job_id` is finished or `timeout` elapses.
    ///
    /// Returns `false` on timeout. A worker that dies without reporting (a
    /// panic) never schedules its job, so callers that block on one job need
    /// this bound.
    pub fn wait_for(&self, host: &mut dyn Host, job_id: JobId, frame: Duration, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.tick(host).contains(&job_id) {
                return true;
            }
            if Instant::now() >= deadline {
                warn!(%job_id, "Gave up waiting after {:?}", timeout);
                return false;
            }
            thread::sleep(frame);
        }
    }

    /// Apply the outcome of `job_id` to the host.
    ///
    /// On success both playback objects are pointed at the new files and
    /// reloaded. On failure nothing in the host changes. Returns `None` when the
    /// job has no stored outcome, including when it was already finished.
    pub fn finish(&self, host: &mut dyn Host, job_id: JobId) -> Option<JobOutcome> {
        let outcome = self.jobs.take(job_id)?;

        match &outcome {
            Ok(response) => {
                load_playback(host, &self.config.target_object, &response.target_path);
                load_playback(host, &self.config.residual_object, &response.residual_path);
                info!(%job_id, "Done - sample rate: {} Hz", response.sample_rate);
            }
            Err(e @ ClientError::Unreachable(_)) => warn!(%job_id, "{}", e),
            Err(e @ ClientError::Http { .. }) => error!(%job_id, "{}", e),
            Err(e) => error!(%job_id, "Separation failed: {}", e),
        }

        Some(outcome)
    }
}

fn export_buffer(host: &dyn Host, name: &str, path: &Path) -> Result<(), SubmitError> {
    let Some(buffer) = host.audio_buffer(name) else {
        warn!("Audio buffer not found: {}", name);
        return Err(SubmitError::BufferNotFound(name.to_string()));
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| SubmitError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    buffer.write_wav(path)?;
    debug!(buffer = name, path = %path.display(), frames = buffer.num_frames(), "Exported audio buffer");
    Ok(())
}

fn load_playback(host: &mut dyn Host, name: &str, path: &str) {
    match host.playback(name) {
        Some(object) => {
            object.set_file(path);
            object.reload();
        }
        None => warn!("Playback object '{}' not found", name),
    }
}
