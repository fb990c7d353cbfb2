//! Test helpers for queue daemon integration tests
//!
//! Provides reusable fakes for the engine's three external seams:
//! - FakeProvider: in-memory media provider with failure injection
//! - FakeVoice: voice output that records joins, plays, and stops
//! - RecordingMessenger: report channel that records sends and edits
//!
//! Plus the Rig, which wires a full engine onto a temp directory.

#![allow(dead_code)]

use async_trait::async_trait;
use spinq_common::{Event, EventBus, TrackId, TrackInfo};
use spinq_qd::config::Config;
use spinq_qd::playback::EngineHandle;
use spinq_qd::provider::{MediaProvider, MediaStream};
use spinq_qd::transport::{MessageHandle, Messenger, VoiceOutput};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::{broadcast, Semaphore};

/// Default wait for real-clock tests.
pub const WAIT: Duration = Duration::from_secs(5);

/// Wait for simulated-clock tests; must exceed any armed track timer.
pub const SIM_WAIT: Duration = Duration::from_secs(600);

#[derive(Clone)]
pub struct FakeTrack {
    pub title: String,
    pub length_seconds: u64,
    pub payload: Vec<u8>,
    /// When set, the payload stream errors partway through.
    pub fail_stream: bool,
}

impl FakeTrack {
    pub fn new(title: &str, length_seconds: u64) -> Self {
        Self {
            title: title.to_string(),
            length_seconds,
            payload: format!("payload-of-{}", title).into_bytes(),
            fail_stream: false,
        }
    }

    pub fn failing(title: &str, length_seconds: u64) -> Self {
        Self {
            fail_stream: true,
            ..Self::new(title, length_seconds)
        }
    }
}

/// In-memory media provider with call counters and an optional stream gate.
pub struct FakeProvider {
    tracks: Mutex<HashMap<TrackId, FakeTrack>>,
    pub info_calls: AtomicU64,
    pub stream_calls: AtomicU64,
    /// When present, `open_stream` consumes one permit before returning, so
    /// a test can hold a fetch in flight and release it on demand.
    gate: Option<Arc<Semaphore>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            tracks: Mutex::new(HashMap::new()),
            info_calls: AtomicU64::new(0),
            stream_calls: AtomicU64::new(0),
            gate: None,
        }
    }

    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn insert(&self, id: &str, track: FakeTrack) {
        self.tracks
            .lock()
            .unwrap()
            .insert(TrackId::new(id), track);
    }

    fn get(&self, id: &TrackId) -> Option<FakeTrack> {
        self.tracks.lock().unwrap().get(id).cloned()
    }
}

/// Reader that fails with a connection error on the first poll.
struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        _buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "stream dropped",
        )))
    }
}

#[async_trait]
impl MediaProvider for FakeProvider {
    async fn track_info(&self, id: &TrackId) -> anyhow::Result<TrackInfo> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        let track = self
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("no such track: {}", id))?;
        Ok(TrackInfo {
            id: id.clone(),
            title: track.title,
            length_seconds: track.length_seconds,
        })
    }

    async fn open_stream(&self, id: &TrackId) -> anyhow::Result<MediaStream> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await?.forget();
        }

        let track = self
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("no such track: {}", id))?;
        let info = TrackInfo {
            id: id.clone(),
            title: track.title.clone(),
            length_seconds: track.length_seconds,
        };

        let reader: Box<dyn AsyncRead + Send + Unpin> = if track.fail_stream {
            Box::new(std::io::Cursor::new(track.payload).chain(BrokenReader))
        } else {
            Box::new(std::io::Cursor::new(track.payload))
        };

        Ok(MediaStream { info, reader })
    }
}

/// Voice output that records activity and captures played payloads.
#[derive(Default)]
pub struct FakeVoice {
    pub joins: AtomicU64,
    pub stops: AtomicU64,
    pub played: Mutex<Vec<Vec<u8>>>,
    /// Number of upcoming `join` calls that should fail.
    pub fail_joins: AtomicU64,
}

#[async_trait]
impl VoiceOutput for FakeVoice {
    async fn join(&self) -> anyhow::Result<()> {
        if self.fail_joins.load(Ordering::SeqCst) > 0 {
            self.fail_joins.fetch_sub(1, Ordering::SeqCst);
            anyhow::bail!("join refused");
        }
        self.joins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn play(&self, mut audio: Box<dyn AsyncRead + Send + Unpin>) -> anyhow::Result<()> {
        let mut bytes = Vec::new();
        audio.read_to_end(&mut bytes).await?;
        self.played.lock().unwrap().push(bytes);
        Ok(())
    }

    async fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

impl FakeVoice {
    pub fn play_count(&self) -> usize {
        self.played.lock().unwrap().len()
    }
}

/// Report channel that records every send and edit.
#[derive(Default)]
pub struct RecordingMessenger {
    counter: AtomicU64,
    pub sends: Mutex<Vec<String>>,
    pub edits: Mutex<Vec<(u64, String)>>,
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, text: &str) -> anyhow::Result<MessageHandle> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        self.sends.lock().unwrap().push(text.to_string());
        Ok(MessageHandle(id))
    }

    async fn edit(&self, handle: &MessageHandle, text: &str) -> anyhow::Result<()> {
        self.edits
            .lock()
            .unwrap()
            .push((handle.0, text.to_string()));
        Ok(())
    }
}

impl RecordingMessenger {
    pub fn sent_lines(&self) -> Vec<String> {
        self.sends.lock().unwrap().clone()
    }
}

/// A fully wired engine on a temp directory.
pub struct Rig {
    pub handle: EngineHandle,
    pub events: broadcast::Receiver<Event>,
    pub provider: Arc<FakeProvider>,
    pub voice: Arc<FakeVoice>,
    pub messenger: Arc<RecordingMessenger>,
    pub config: Config,
    pub dir: tempfile::TempDir,
}

impl Rig {
    /// Start an engine in a fresh temp directory and bring the session up.
    pub async fn start(provider: FakeProvider, autoplay: bool) -> Rig {
        let dir = tempfile::tempdir().unwrap();
        let mut rig = Self::start_in(dir, provider, autoplay).await;
        rig.connect().await;
        rig
    }

    /// Start an engine without connecting; `dir` may carry a pre-written
    /// state file.
    pub async fn start_in(dir: tempfile::TempDir, provider: FakeProvider, autoplay: bool) -> Rig {
        let config = Config {
            music_dir: dir.path().join("music"),
            state_file: dir.path().join("data.json"),
            provider_url: String::new(),
            max_track_seconds: 10_950,
            progress_interval_secs: 2,
            autoplay,
        };

        let provider = Arc::new(provider);
        let voice = Arc::new(FakeVoice::default());
        let messenger = Arc::new(RecordingMessenger::default());
        let bus = Arc::new(EventBus::new(1000));
        let events = bus.subscribe();

        let (engine, handle) = spinq_qd::playback::Engine::new(
            &config,
            Arc::clone(&provider) as Arc<dyn MediaProvider>,
            Arc::clone(&voice) as Arc<dyn VoiceOutput>,
            Arc::clone(&messenger) as Arc<dyn Messenger>,
            bus,
        )
        .await
        .unwrap();
        tokio::spawn(engine.run());

        Rig {
            handle,
            events,
            provider,
            voice,
            messenger,
            config,
            dir,
        }
    }

    /// Bring the session up and wait until the engine has processed it.
    pub async fn connect(&mut self) {
        self.handle.notify_connected(false);
        wait_for_event(&mut self.events, WAIT, |e| {
            matches!(e, Event::Notification { text, .. } if text == "Ready to rock.")
        })
        .await;
    }

    pub fn track_path(&self, id: &str) -> std::path::PathBuf {
        self.config.music_dir.join(format!("{}.track", id))
    }

    pub fn marker_path(&self, id: &str) -> std::path::PathBuf {
        self.config.music_dir.join(format!("{}.complete", id))
    }
}

/// Receive events until one matches, or panic after `timeout`.
pub async fn wait_for_event<F>(
    rx: &mut broadcast::Receiver<Event>,
    timeout: Duration,
    mut pred: F,
) -> Event
where
    F: FnMut(&Event) -> bool,
{
    tokio::time::timeout(timeout, async {
        loop {
            let event = rx.recv().await.expect("event bus closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

/// Drain every event currently buffered.
pub fn drain_events(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}
