//! Client for the SAM-Audio separation server.
//!
//! Built for hosts with a single-threaded frame loop that must never block on
//! the network. [`RemoteClient::submit`] hands the HTTP call to a worker
//! thread and returns a [`JobId`] at once; [`RemoteClient::tick`], called
//! every frame, applies finished results to the host's playback objects.
//!
//! # Example
//!
//! ```no_run
//! use sam_audio_client::{AudioBuffer, ClientConfig, Host, PlaybackObject, RemoteClient};
//!
//! struct Player(Option<String>);
//!
//! impl PlaybackObject for Player {
//!     fn set_file(&mut self, path: &str) {
//!         self.0 = Some(path.to_string());
//!     }
//!     fn reload(&mut self) {}
//! }
//!
//! struct App {
//!     target: Player,
//!     residual: Player,
//! }
//!
//! impl Host for App {
//!     fn playback(&mut self, name: &str) -> Option<&mut dyn PlaybackObject> {
//!         match name {
//!             "audioin_target" => Some(&mut self.target),
//!             "audioin_residual" => Some(&mut self.residual),
//!             _ => None,
//!         }
//!     }
//!     fn audio_buffer(&self, _name: &str) -> Option<AudioBuffer> {
//!         None
//!     }
//! }
//!
//! let client = RemoteClient::new(ClientConfig::default())?;
//! let mut app = App { target: Player(None), residual: Player(None) };
//!
//! client.check_server()?;
//! let job = client.submit(&app, "C:\\audio\\mix.wav", "drums", None)?;
//!
//! while !client.tick(&mut app).contains(&job) {
//!     std::thread::sleep(std::time::Duration::from_millis(16));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod deferred;
pub mod error;
pub mod host;
pub mod jobs;
pub mod remote;
pub mod transport;

pub use config::ClientConfig;
pub use deferred::DeferredQueue;
pub use error::{ClientError, SubmitError};
pub use host::{AudioBuffer, Host, PlaybackObject};
pub use jobs::{JobId, JobOutcome, JobTable};
pub use remote::RemoteClient;
pub use transport::{HttpTransport, Transport};
