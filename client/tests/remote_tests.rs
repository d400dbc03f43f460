//! Tests for the submit / tick / finish handoff.
//!
//! A scripted transport holds each request until the test releases it, which
//! lets jobs complete in any order the test chooses.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use sam_audio_client::{
    AudioBuffer, ClientConfig, ClientError, Host, JobId, PlaybackObject, RemoteClient, SubmitError, Transport,
};
use sam_audio_values::{HealthResponse, SeparateRequest, SeparateResponse};

type Reply = Result<SeparateResponse, ClientError>;

#[derive(Default)]
struct Script {
    replies: Mutex<HashMap<String, Receiver<Reply>>>,
    seen: Mutex<Vec<SeparateRequest>>,
}

#[derive(Clone, Default)]
struct ScriptedTransport(Arc<Script>);

impl ScriptedTransport {
    /// Requests with this prompt block until a reply is sent on the returned channel.
    fn expect(&self, prompt: &str) -> Sender<Reply> {
        let (tx, rx) = mpsc::channel();
        self.0.replies.lock().insert(prompt.to_string(), rx);
        tx
    }

    fn seen(&self) -> Vec<SeparateRequest> {
        self.0.seen.lock().clone()
    }
}

impl Transport for ScriptedTransport {
    fn health(&self) -> Result<HealthResponse, ClientError> {
        Ok(HealthResponse {
            status: "ok".into(),
            model: Some("passthrough".into()),
            device: "cpu".into(),
            cuda: false,
            busy: false,
        })
    }

    fn separate(&self, request: &SeparateRequest) -> Reply {
        self.0.seen.lock().push(request.clone());
        let reply = self.0.replies.lock().remove(&request.prompt);
        match reply {
            Some(rx) => rx
                .recv()
                .unwrap_or_else(|_| Err(ClientError::Other("reply dropped".into()))),
            None => Err(ClientError::Other(format!("unscripted prompt {}", request.prompt))),
        }
    }
}

#[derive(Debug, Default)]
struct Recorder {
    file: Option<String>,
    history: Vec<String>,
    reloads: usize,
}

impl PlaybackObject for Recorder {
    fn set_file(&mut self, path: &str) {
        self.file = Some(path.to_string());
        self.history.push(path.to_string());
    }

    fn reload(&mut self) {
        self.reloads += 1;
    }
}

#[derive(Default)]
struct TestHost {
    target: Option<Recorder>,
    residual: Option<Recorder>,
    buffers: HashMap<String, AudioBuffer>,
}

impl TestHost {
    fn with_players() -> Self {
        Self {
            target: Some(Recorder::default()),
            residual: Some(Recorder::default()),
            buffers: HashMap::new(),
        }
    }

    fn target(&self) -> &Recorder {
        self.target.as_ref().unwrap()
    }

    fn residual(&self) -> &Recorder {
        self.residual.as_ref().unwrap()
    }
}

impl Host for TestHost {
    fn playback(&mut self, name: &str) -> Option<&mut dyn PlaybackObject> {
        let object = match name {
            "audioin_target" => self.target.as_mut(),
            "audioin_residual" => self.residual.as_mut(),
            _ => None,
        };
        object.map(|r| r as &mut dyn PlaybackObject)
    }

    fn audio_buffer(&self, name: &str) -> Option<AudioBuffer> {
        self.buffers.get(name).cloned()
    }
}

fn response(tag: &str) -> SeparateResponse {
    SeparateResponse {
        target_path: format!("/work/{}/target.wav", tag),
        residual_path: format!("/work/{}/residual.wav", tag),
        sample_rate: 16_000,
    }
}

fn client(transport: &ScriptedTransport) -> RemoteClient<ScriptedTransport> {
    RemoteClient::with_transport(ClientConfig::default().with_work_dir("/work"), transport.clone())
}

/// Run frames until `job` is finished.
fn tick_until(client: &RemoteClient<ScriptedTransport>, host: &mut TestHost, job: JobId) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if client.tick(host).contains(&job) {
            return;
        }
        thread::sleep(Duration::from_millis(2));
    }
    panic!("{} did not finish", job);
}

#[test]
fn test_out_of_order_completion_routes_by_job_id() {
    let transport = ScriptedTransport::default();
    let reply_a = transport.expect("a");
    let reply_b = transport.expect("b");
    let client = client(&transport);
    let mut host = TestHost::with_players();

    let job_a = client.submit(&host, "/audio/a.wav", "a", None).unwrap();
    let job_b = client.submit(&host, "/audio/b.wav", "b", None).unwrap();
    assert!(job_b > job_a);

    reply_b.send(Ok(response("b"))).unwrap();
    tick_until(&client, &mut host, job_b);
    assert_eq!(host.target().file.as_deref(), Some("/work/b/target.wav"));
    assert_eq!(host.residual().file.as_deref(), Some("/work/b/residual.wav"));

    reply_a.send(Ok(response("a"))).unwrap();
    tick_until(&client, &mut host, job_a);

    assert_eq!(host.target().history, vec!["/work/b/target.wav", "/work/a/target.wav"]);
    assert_eq!(host.residual().history, vec!["/work/b/residual.wav", "/work/a/residual.wav"]);
    assert_eq!(host.target().reloads, 2);
    assert_eq!(host.residual().reloads, 2);
}

#[test]
fn test_failed_job_leaves_playback_untouched() {
    let transport = ScriptedTransport::default();
    let reply = transport.expect("drums");
    let client = client(&transport);
    let mut host = TestHost::with_players();
    host.target.as_mut().unwrap().file = Some("previous_target.wav".into());
    host.residual.as_mut().unwrap().file = Some("previous_residual.wav".into());

    let job = client.submit(&host, "/audio/mix.wav", "drums", None).unwrap();
    reply
        .send(Err(ClientError::Http {
            status: 503,
            body: "Server busy".into(),
        }))
        .unwrap();
    tick_until(&client, &mut host, job);

    assert_eq!(host.target().file.as_deref(), Some("previous_target.wav"));
    assert_eq!(host.residual().file.as_deref(), Some("previous_residual.wav"));
    assert!(host.target().history.is_empty());
    assert_eq!(host.target().reloads, 0);
    assert_eq!(host.residual().reloads, 0);
}

#[test]
fn test_finish_is_idempotent() {
    let transport = ScriptedTransport::default();
    let reply = transport.expect("voice");
    let client = client(&transport);
    let mut host = TestHost::with_players();

    let job = client.submit(&host, "/audio/mix.wav", "voice", None).unwrap();
    reply.send(Ok(response("voice"))).unwrap();
    tick_until(&client, &mut host, job);

    assert!(client.finish(&mut host, job).is_none());
    assert_eq!(host.target().history.len(), 1);
    assert_eq!(host.target().reloads, 1);
}

#[test]
fn test_missing_playback_object_still_updates_the_other() {
    let transport = ScriptedTransport::default();
    let reply = transport.expect("drums");
    let client = client(&transport);
    let mut host = TestHost {
        target: Some(Recorder::default()),
        residual: None,
        buffers: HashMap::new(),
    };

    let job = client.submit(&host, "/audio/mix.wav", "drums", None).unwrap();
    reply.send(Ok(response("drums"))).unwrap();
    tick_until(&client, &mut host, job);

    assert_eq!(host.target().file.as_deref(), Some("/work/drums/target.wav"));
}

#[test]
fn test_request_normalizes_path_and_uses_work_dir() {
    let transport = ScriptedTransport::default();
    let reply = transport.expect("drums");
    let client = client(&transport);
    let mut host = TestHost::with_players();

    let job = client.submit(&host, "C:\\audio\\mix.wav", "drums", None).unwrap();
    reply.send(Ok(response("drums"))).unwrap();
    tick_until(&client, &mut host, job);

    let seen = transport.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].audio_path, "C:/audio/mix.wav");
    assert_eq!(seen[0].prompt, "drums");
    assert_eq!(seen[0].output_dir.as_deref(), Some("/work"));
}

#[test]
fn test_source_buffer_exported_before_request() {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::default();
    let reply = transport.expect("drums");
    let client = client(&transport);
    let mut host = TestHost::with_players();
    host.buffers.insert(
        "mic".into(),
        AudioBuffer {
            sample_rate: 44_100,
            channels: vec![vec![0.0, 0.5, -0.5, 0.25]],
        },
    );

    let audio_path = format!("{}\\capture\\mic.wav", dir.path().display());
    let job = client.submit(&host, &audio_path, "drums", Some("mic")).unwrap();

    let exported: PathBuf = dir.path().join("capture").join("mic.wav");
    let reader = hound::WavReader::open(&exported).unwrap();
    assert_eq!(reader.spec().sample_rate, 44_100);
    assert_eq!(reader.len(), 4);

    reply.send(Ok(response("drums"))).unwrap();
    tick_until(&client, &mut host, job);
    assert_eq!(transport.seen()[0].audio_path, exported.to_string_lossy());
}

#[test]
fn test_missing_source_buffer_allocates_no_job() {
    let transport = ScriptedTransport::default();
    let reply = transport.expect("drums");
    let client = client(&transport);
    let mut host = TestHost::with_players();

    let err = client.submit(&host, "/audio/mix.wav", "drums", Some("nope")).unwrap_err();
    assert!(matches!(err, SubmitError::BufferNotFound(ref name) if name == "nope"));
    assert!(transport.seen().is_empty());

    let job = client.submit(&host, "/audio/mix.wav", "drums", None).unwrap();
    assert_eq!(job.get(), 1);
    reply.send(Ok(response("drums"))).unwrap();
    tick_until(&client, &mut host, job);
}

#[test]
fn test_check_server_returns_health() {
    let transport = ScriptedTransport::default();
    let health = client(&transport).check_server().unwrap();
    assert_eq!(health.model.as_deref(), Some("passthrough"));
    assert!(!health.busy);
}

#[test]
fn test_http_transport_reports_unreachable_server() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = ClientConfig::default().with_server_url(format!("http://127.0.0.1:{}", port));
    let client = RemoteClient::new(config).unwrap();

    let err = client.check_server().unwrap_err();
    assert!(matches!(err, ClientError::Unreachable(_)), "got {:?}", err);
}

/// Transport whose worker dies mid-request without reporting an outcome.
struct CrashingTransport;

impl Transport for CrashingTransport {
    fn health(&self) -> Result<HealthResponse, ClientError> {
        Err(ClientError::Other("not used".into()))
    }

    fn separate(&self, _request: &SeparateRequest) -> Reply {
        panic!("worker crashed");
    }
}

#[test]
fn test_wait_for_gives_up_when_worker_dies() {
    let client = RemoteClient::with_transport(ClientConfig::default(), CrashingTransport);
    let mut host = TestHost::with_players();

    let job = client.submit(&host, "/audio/mix.wav", "drums", None).unwrap();

    let started = Instant::now();
    let finished = client.wait_for(&mut host, job, Duration::from_millis(2), Duration::from_millis(200));

    assert!(!finished);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(host.target().history.is_empty());
    assert!(client.finish(&mut host, job).is_none());
}

#[test]
fn test_wait_for_returns_once_job_is_applied() {
    let transport = ScriptedTransport::default();
    let reply = transport.expect("drums");
    let client = client(&transport);
    let mut host = TestHost::with_players();

    let job = client.submit(&host, "/audio/mix.wav", "drums", None).unwrap();
    reply.send(Ok(response("drums"))).unwrap();

    assert!(client.wait_for(&mut host, job, Duration::from_millis(2), Duration::from_secs(5)));
    assert_eq!(host.target().file.as_deref(), Some("/work/drums/target.wav"));
}
