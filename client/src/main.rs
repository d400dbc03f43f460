//! Command-line driver for the separation client.
//!
//! Runs a minimal frame loop with console playback objects, so the same
//! submit/tick path a host would use can be exercised from a terminal.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sam_audio_client::config::DEFAULT_SERVER_URL;
use sam_audio_client::{AudioBuffer, ClientConfig, Host, PlaybackObject, RemoteClient};

const WAIT_MARGIN: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "sam-audio-client")]
#[command(about = "Submit separations to a SAM-Audio server")]
#[command(version)]
struct Cli {
    /// Server base URL
    #[arg(long, env = "SAM_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,

    /// Directory the server writes target.wav / residual.wav into
    #[arg(long, env = "SAM_WORK_DIR")]
    work_dir: Option<PathBuf>,

    /// Frame interval of the polling loop, in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up and print its model and device
    Health,
    /// Separate the sound described by PROMPT out of AUDIO_PATH
    Separate { audio_path: String, prompt: String },
}

/// Playback object that only remembers and logs the file it was given.
#[derive(Debug, Default)]
struct ConsolePlayer {
    name: String,
    file: Option<String>,
}

impl PlaybackObject for ConsolePlayer {
    fn set_file(&mut self, path: &str) {
        self.file = Some(path.to_string());
    }

    fn reload(&mut self) {
        info!("{} -> {}", self.name, self.file.as_deref().unwrap_or("<unset>"));
    }
}

struct ConsoleHost {
    players: HashMap<String, ConsolePlayer>,
}

impl ConsoleHost {
    fn new(config: &ClientConfig) -> Self {
        let players = [&config.target_object, &config.residual_object]
            .into_iter()
            .map(|name| {
                let player = ConsolePlayer {
                    name: name.clone(),
                    file: None,
                };
                (name.clone(), player)
            })
            .collect();
        Self { players }
    }

    fn loaded(&self, name: &str) -> bool {
        self.players.get(name).is_some_and(|p| p.file.is_some())
    }
}

impl Host for ConsoleHost {
    fn playback(&mut self, name: &str) -> Option<&mut dyn PlaybackObject> {
        self.players.get_mut(name).map(|p| p as &mut dyn PlaybackObject)
    }

    fn audio_buffer(&self, _name: &str) -> Option<AudioBuffer> {
        None
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "sam_audio_client=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::default().with_server_url(cli.server_url);
    config.work_dir = cli.work_dir;

    let client = RemoteClient::new(config).context("Failed to create client")?;

    match cli.command {
        Command::Health => {
            client.check_server()?;
        }
        Command::Separate { audio_path, prompt } => {
            let mut host = ConsoleHost::new(client.config());
            let job_id = client.submit(&host, &audio_path, &prompt, None)?;

            // the transport gives up at separate_timeout; the margin covers the finish delay
            let frame = Duration::from_millis(cli.frame_ms);
            let timeout = client.config().separate_timeout + WAIT_MARGIN;
            if !client.wait_for(&mut host, job_id, frame, timeout) {
                bail!("Separation {} did not finish within {:?}", job_id, timeout);
            }

            if !host.loaded(&client.config().target_object) {
                bail!("Separation {} failed", job_id);
            }
        }
    }

    Ok(())
}
