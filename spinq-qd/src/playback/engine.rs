//! Queue engine orchestration
//!
//! One engine task owns every piece of mutable queue state: backlog,
//! metadata library, preloading set, player state, and progress tracking.
//! Frontends talk to it through `EngineHandle` with a closed command enum;
//! spawned I/O tasks (metadata lookups, cache probes, downloads, the advance
//! timer, voice session setup) report back over the internal channel. No two
//! mutations ever race, and every callback re-validates the state it expects
//! before acting, because a skip or disconnect may have invalidated it while
//! the I/O was in flight.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::persist::{Snapshot, StateStore, StoreHandle};
use crate::playback::progress::{quantize, render_bar, ProgressTracker};
use crate::playback::queue::Queue;
use crate::playback::state::{CurrentTrack, PlayerState};
use crate::preload::Preloader;
use crate::provider::MediaProvider;
use crate::resolver::Resolver;
use crate::transport::{MessageHandle, Messenger, VoiceOutput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use spinq_common::{Event, EventBus, QueueEndReason, TrackId, TrackInfo};
use spinq_common::human_time::format_track_time;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Lines per page for backlog listings.
pub const BACKLOG_PAGE_SIZE: usize = 10;

/// Requests accepted from frontends.
#[derive(Debug)]
pub(crate) enum Command {
    Enqueue {
        id: TrackId,
        automatic: bool,
        play_now: bool,
    },
    Advance,
    ListBacklog {
        reply: oneshot::Sender<Vec<String>>,
    },
    SetAutoplay(bool),
    Connected {
        resumed: bool,
    },
    Disconnected,
}

/// Why a cache probe was issued; decides what its answer triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProbeIntent {
    /// Selection is gated on this track: start on hit, preload on miss.
    Blocking,
    /// Speculative preload request: signal readiness on hit, fetch on miss.
    Preload { eager: bool },
}

/// Results reported back by spawned tasks.
#[derive(Debug)]
pub(crate) enum Internal {
    Resolved {
        id: TrackId,
        result: Result<TrackInfo>,
        automatic: bool,
        play_now: bool,
    },
    Probe {
        id: TrackId,
        cached: bool,
        intent: ProbeIntent,
    },
    FetchFinished {
        id: TrackId,
    },
    FetchFailed {
        id: TrackId,
        reason: String,
    },
    AdvanceElapsed {
        epoch: u64,
    },
    SessionStarted {
        epoch: u64,
    },
    SessionFailed {
        epoch: u64,
        reason: String,
    },
    ProgressMessage {
        epoch: u64,
        handle: MessageHandle,
    },
}

/// Cloneable front door to the engine task.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl EngineHandle {
    fn send(&self, cmd: Command) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("engine task is gone, dropping request");
        }
    }

    /// Resolve and append a track to the backlog.
    ///
    /// `play_now` inserts at the front and interrupts current playback;
    /// `automatic` marks autoplay-originated requests in notifications.
    pub fn enqueue(&self, id: TrackId, automatic: bool, play_now: bool) {
        self.send(Command::Enqueue {
            id,
            automatic,
            play_now,
        });
    }

    /// Skip the current track and re-enter selection.
    pub fn request_advance(&self) {
        self.send(Command::Advance);
    }

    /// Formatted backlog listing: current track, blocking track, pending
    /// entries, and total remaining playtime.
    pub async fn list_backlog(&self) -> Result<Vec<String>> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::ListBacklog { reply })
            .map_err(|_| Error::Internal("engine task is gone".into()))?;
        rx.await
            .map_err(|_| Error::Internal("engine task is gone".into()))
    }

    /// Help text for the fixed request table.
    pub fn describe_commands(&self) -> String {
        crate::request::describe_commands()
    }

    /// Enable or disable the autoplay fallback.
    pub fn set_autoplay(&self, enabled: bool) {
        self.send(Command::SetAutoplay(enabled));
    }

    /// Transport session is up; `resumed` distinguishes a reconnect.
    pub fn notify_connected(&self, resumed: bool) {
        self.send(Command::Connected { resumed });
    }

    /// Transport session dropped: stop timers and playback, keep queue state.
    pub fn notify_disconnected(&self) {
        self.send(Command::Disconnected);
    }
}

/// Queue engine: single task owning all orchestrator state.
pub struct Engine {
    bus: Arc<EventBus>,
    voice: Arc<dyn VoiceOutput>,
    messenger: Arc<dyn Messenger>,
    resolver: Resolver,
    preloader: Preloader,
    store: StoreHandle,

    queue: Queue,
    library: HashMap<TrackId, TrackInfo>,
    preloading: HashSet<TrackId>,
    state: PlayerState,
    progress: ProgressTracker,
    autoplay: bool,
    connected: bool,

    /// Playback generation counter. Bumped on every start/stop/disconnect;
    /// timer and session callbacks carry the epoch they were armed under and
    /// are discarded when it no longer matches.
    epoch: u64,

    progress_interval: Duration,
    rng: StdRng,

    cmd_rx: mpsc::UnboundedReceiver<Command>,
    internal_rx: mpsc::UnboundedReceiver<Internal>,
    internal_tx: mpsc::UnboundedSender<Internal>,
}

impl Engine {
    /// Create the engine: ensure the cache directory exists, load the
    /// persisted snapshot, and start the snapshot writer.
    pub async fn new(
        config: &Config,
        provider: Arc<dyn MediaProvider>,
        voice: Arc<dyn VoiceOutput>,
        messenger: Arc<dyn Messenger>,
        bus: Arc<EventBus>,
    ) -> Result<(Engine, EngineHandle)> {
        tokio::fs::create_dir_all(&config.music_dir).await?;

        let store = StateStore::new(&config.state_file);
        let snapshot = store.load().await;
        info!(
            backlog = snapshot.backlog.len(),
            playlist = snapshot.playlist.len(),
            tracks = snapshot.track_info.len(),
            "loaded queue snapshot"
        );

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();

        let engine = Engine {
            bus,
            voice,
            messenger,
            resolver: Resolver::new(Arc::clone(&provider), config.max_track_seconds),
            preloader: Preloader::new(
                config.music_dir.clone(),
                provider,
                config.max_track_seconds,
                internal_tx.clone(),
            ),
            store: store.spawn_writer(),
            queue: Queue::from_parts(snapshot.backlog, snapshot.playlist),
            library: snapshot.track_info,
            preloading: HashSet::new(),
            state: PlayerState::Idle,
            progress: ProgressTracker::new(),
            autoplay: config.autoplay,
            connected: false,
            epoch: 0,
            progress_interval: Duration::from_secs(config.progress_interval_secs),
            rng: StdRng::from_entropy(),
            cmd_rx,
            internal_rx,
            internal_tx,
        };

        Ok((engine, EngineHandle { cmd_tx }))
    }

    /// Process commands, internal callbacks, and progress ticks until every
    /// handle is dropped.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.progress_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("queue engine running");
        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                Some(msg) = self.internal_rx.recv() => self.handle_internal(msg),
                _ = ticker.tick() => self.progress_tick(false),
            }
        }
        info!("queue engine stopped: all handles dropped");
    }

    // ---- command handling ----

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Enqueue {
                id,
                automatic,
                play_now,
            } => {
                // Cache-first: a known id never touches the provider again.
                if let Some(info) = self.library.get(&id).cloned() {
                    debug!(%id, "metadata cached, skipping provider lookup");
                    self.enqueue_resolved(info, automatic, play_now);
                } else {
                    let resolver = self.resolver.clone();
                    let tx = self.internal_tx.clone();
                    tokio::spawn(async move {
                        let result = resolver.fetch(&id).await;
                        let _ = tx.send(Internal::Resolved {
                            id,
                            result,
                            automatic,
                            play_now,
                        });
                    });
                }
            }
            Command::Advance => {
                info!("advance requested");
                self.stop_current(false);
                self.select_next();
            }
            Command::ListBacklog { reply } => {
                let _ = reply.send(self.backlog_lines());
            }
            Command::SetAutoplay(enabled) => {
                info!(autoplay = enabled, "autoplay changed");
                self.autoplay = enabled;
                if enabled {
                    self.try_start_if_stopped();
                }
            }
            Command::Connected { resumed } => {
                self.connected = true;
                self.notify(
                    if resumed {
                        "Reconnected after the connection was lost."
                    } else {
                        "Ready to rock."
                    }
                    .to_string(),
                );
                if self.state.blocking().is_some() || !self.queue.is_empty() {
                    self.select_next();
                }
            }
            Command::Disconnected => {
                info!("session disconnected");
                self.connected = false;
                self.epoch += 1;
                self.progress.clear();
                match std::mem::replace(&mut self.state, PlayerState::Idle) {
                    PlayerState::Playing { current } => {
                        self.bus.emit(Event::PlaybackFinished {
                            id: current.info.id,
                            completed: false,
                            timestamp: chrono::Utc::now(),
                        });
                    }
                    PlayerState::Joining { info } => {
                        // Back to the blocking slot; reconnect retries it.
                        self.state = PlayerState::AwaitingPreload { id: info.id };
                    }
                    other => self.state = other,
                }
                // No re-selection until the session is back.
            }
        }
    }

    // ---- internal callbacks ----

    fn handle_internal(&mut self, msg: Internal) {
        match msg {
            Internal::Resolved {
                id,
                result,
                automatic,
                play_now,
            } => match result {
                Ok(info) => {
                    self.library.insert(info.id.clone(), info.clone());
                    self.persist();
                    self.enqueue_resolved(info, automatic, play_now);
                }
                Err(e) => {
                    let verb = if automatic { "auto-queue" } else { "queue" };
                    self.notify(format!("Could not {} {}: {}", verb, id, e));
                }
            },
            Internal::Probe { id, cached, intent } => self.handle_probe(id, cached, intent),
            Internal::FetchFinished { id } => {
                self.preloading.remove(&id);
                if self.state.blocking() == Some(&id) {
                    debug!(%id, "preload finished for the blocking track, starting");
                    self.start_playback(&id);
                } else {
                    debug!(%id, "preload finished for a non-blocking track");
                }
            }
            Internal::FetchFailed { id, reason } => self.handle_fetch_failed(id, reason),
            Internal::AdvanceElapsed { epoch } => {
                if epoch != self.epoch {
                    debug!("stale advance timer, ignoring");
                    return;
                }
                self.finish_current();
            }
            Internal::SessionStarted { epoch } => {
                if epoch != self.epoch {
                    debug!("stale session start, ignoring");
                    return;
                }
                match std::mem::replace(&mut self.state, PlayerState::Idle) {
                    PlayerState::Joining { info } => self.begin_playing(info),
                    other => self.state = other,
                }
            }
            Internal::SessionFailed { epoch, reason } => {
                if epoch != self.epoch {
                    debug!("stale session failure, ignoring");
                    return;
                }
                warn!("voice session failed: {}", reason);
                self.notify(format!("Could not join the voice channel: {}", reason));
                // The unjoined track is dropped; selection moves on so the
                // rest of the backlog still plays.
                if matches!(self.state, PlayerState::Joining { .. }) {
                    self.state = PlayerState::Idle;
                }
                self.select_next();
            }
            Internal::ProgressMessage { epoch, handle } => {
                if epoch == self.epoch {
                    self.progress.bind(handle);
                }
            }
        }
    }

    fn handle_probe(&mut self, id: TrackId, cached: bool, intent: ProbeIntent) {
        match intent {
            ProbeIntent::Blocking => {
                // A skip or failure may have replaced the blocking track
                // while the probe was in flight.
                if self.state.blocking() != Some(&id) {
                    debug!(%id, "stale blocking probe, ignoring");
                    return;
                }
                if cached {
                    self.start_playback(&id);
                } else {
                    self.request_preload(&id, false);
                }
            }
            ProbeIntent::Preload { eager } => {
                if cached {
                    debug!(%id, "already cached, no preload necessary");
                    self.try_start_if_stopped();
                    return;
                }
                // Re-check membership: another request may have claimed the
                // id while this probe was suspended.
                if self.preloading.contains(&id) {
                    debug!(%id, "already preloading");
                    return;
                }
                let Some(info) = self.library.get(&id).cloned() else {
                    warn!(%id, "no metadata for preload candidate, skipping");
                    return;
                };
                self.preloading.insert(id.clone());
                self.bus.emit(Event::PreloadStarted {
                    id: id.clone(),
                    timestamp: chrono::Utc::now(),
                });
                debug!(%id, eager, "starting preload");
                self.notify(format!("Preloading track: {} ({}).", info.title, id));
                self.preloader.spawn_fetch(info);
            }
        }
    }

    fn handle_fetch_failed(&mut self, id: TrackId, reason: String) {
        self.preloading.remove(&id);

        let title = self
            .library
            .get(&id)
            .map(|i| i.title.clone())
            .unwrap_or_else(|| id.to_string());
        warn!(%id, %reason, "preload failed, sweeping track from backlog");

        // The failing id is unplayable right now: drop every queued
        // occurrence, not just the head.
        if self.queue.sweep_remove(&id) > 0 {
            self.bus.emit(Event::QueueChanged {
                timestamp: chrono::Utc::now(),
            });
        }

        self.bus.emit(Event::PreloadFailed {
            id: id.clone(),
            reason,
            timestamp: chrono::Utc::now(),
        });
        self.notify(format!("Failed to preload track: {} ({}).", title, id));

        if self.state.blocking() == Some(&id) {
            self.state = PlayerState::Idle;
            self.select_next();
        }
    }

    // ---- queue operations ----

    fn enqueue_resolved(&mut self, info: TrackInfo, automatic: bool, play_now: bool) {
        let id = info.id.clone();

        let position = if play_now {
            self.queue.push_front(id.clone());
            self.notify(format!("Queued for instant play: {} ({})", info.title, id));
            0
        } else {
            self.queue.push_back(id.clone());
            let position = self.queue.len();
            let verb = if automatic { "Auto-queued" } else { "Queued" };
            self.notify(format!(
                "{}: {} ({}) to position {}",
                verb, info.title, id, position
            ));
            position
        };

        self.bus.emit(Event::TrackQueued {
            id: id.clone(),
            title: info.title.clone(),
            position,
            automatic,
            timestamp: chrono::Utc::now(),
        });
        self.bus.emit(Event::QueueChanged {
            timestamp: chrono::Utc::now(),
        });
        self.persist();

        if play_now {
            // The interrupted track is discarded, not re-queued.
            self.stop_current(false);
            self.select_next();
        } else {
            self.try_start_if_stopped();
        }

        // Hide fetch latency whenever the enqueued track became the head.
        if self.queue.head() == Some(&id) {
            self.request_preload(&id, true);
        }
    }

    /// Core scheduling decision: invoked whenever the controller is idle or
    /// an advance was requested.
    fn select_next(&mut self) {
        match &self.state {
            PlayerState::Playing { .. } => {
                // Callers stop playback before re-selecting.
            }
            PlayerState::AwaitingPreload { id } => {
                // Never re-pop while a blocking track is pending.
                let id = id.clone();
                if self.preloading.contains(&id) {
                    debug!(%id, "blocked behind an active preload");
                } else {
                    self.preloader.spawn_probe(id, ProbeIntent::Blocking);
                }
            }
            PlayerState::Joining { .. } => {
                // Session handoff in flight; its callback decides what
                // happens next.
            }
            PlayerState::Idle => {
                if let Some(id) = self.queue.pop_front() {
                    self.persist();
                    self.bus.emit(Event::QueueChanged {
                        timestamp: chrono::Utc::now(),
                    });
                    self.state = PlayerState::AwaitingPreload { id: id.clone() };

                    if self.preloading.contains(&id) {
                        let title = self
                            .library
                            .get(&id)
                            .map(|i| i.title.clone())
                            .unwrap_or_else(|| id.to_string());
                        self.notify(format!("Waiting for preload: {} ({})", title, id));
                    } else {
                        self.preloader.spawn_probe(id, ProbeIntent::Blocking);
                    }
                } else if self.autoplay {
                    match self.queue.pick_autoplay(&mut self.rng) {
                        Some(pick) => {
                            info!(%pick, "backlog empty, autoplay selected a track");
                            self.handle_command(Command::Enqueue {
                                id: pick,
                                automatic: true,
                                play_now: false,
                            });
                        }
                        None => {
                            self.bus.emit(Event::QueueEnded {
                                reason: QueueEndReason::EmptyPlaylist,
                                timestamp: chrono::Utc::now(),
                            });
                            self.notify("Queue ended, no tracks in playlist.".to_string());
                        }
                    }
                } else {
                    self.bus.emit(Event::QueueEnded {
                        reason: QueueEndReason::AutoplayDisabled,
                        timestamp: chrono::Utc::now(),
                    });
                    self.notify("Queue ended, autoplay disabled.".to_string());
                }
            }
        }
    }

    fn try_start_if_stopped(&mut self) {
        if !self.state.is_playing() {
            self.select_next();
        }
    }

    /// Speculative preload request; bounces off the preloading-set guard.
    fn request_preload(&mut self, id: &TrackId, eager: bool) {
        if self.preloading.contains(id) {
            debug!(%id, "already preloading");
            return;
        }
        self.preloader
            .spawn_probe(id.clone(), ProbeIntent::Preload { eager });
    }

    fn preload_next(&mut self) {
        if let Some(head) = self.queue.head().cloned() {
            self.request_preload(&head, true);
        }
    }

    // ---- playback transitions ----

    fn start_playback(&mut self, id: &TrackId) {
        // Idempotent under the Playing/Joining guard: no double-join of the
        // output channel.
        match self.state {
            PlayerState::Playing { .. } => {
                debug!(%id, "already playing, ignoring start request");
                return;
            }
            PlayerState::Joining { .. } => {
                debug!(%id, "session handoff already in flight");
                return;
            }
            _ => {}
        }
        if !self.connected {
            debug!(%id, "no session, deferring playback start");
            return;
        }
        let Some(info) = self.library.get(id).cloned() else {
            warn!(%id, "no metadata for selected track, dropping it");
            self.state = PlayerState::Idle;
            return;
        };

        self.epoch += 1;
        let epoch = self.epoch;
        self.progress.clear();
        self.state = PlayerState::Joining { info: info.clone() };

        // Session handoff: join, then hand over the cached payload stream.
        // Playing is entered only once the transport accepts the stream.
        let voice = Arc::clone(&self.voice);
        let path = self.preloader.track_path(&info.id);
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            let result: Result<()> = async {
                voice
                    .join()
                    .await
                    .map_err(|e| Error::Join(e.to_string()))?;
                let file = tokio::fs::File::open(&path).await?;
                voice
                    .play(Box::new(file))
                    .await
                    .map_err(|e| Error::Join(e.to_string()))?;
                Ok(())
            }
            .await;
            let msg = match result {
                Ok(()) => Internal::SessionStarted { epoch },
                Err(e) => Internal::SessionFailed {
                    epoch,
                    reason: e.to_string(),
                },
            };
            let _ = tx.send(msg);
        });
    }

    /// The transport accepted the stream: enter Playing and start the
    /// timers and reports tied to it.
    fn begin_playing(&mut self, info: TrackInfo) {
        let epoch = self.epoch;
        self.progress.clear();
        self.state = PlayerState::Playing {
            current: CurrentTrack {
                info: info.clone(),
                started: Instant::now(),
            },
        };

        info!(id = %info.id, title = %info.title, length = info.length_seconds, "starting playback");
        self.bus.emit(Event::PlaybackStarted {
            id: info.id.clone(),
            title: info.title.clone(),
            length_seconds: info.length_seconds,
            timestamp: chrono::Utc::now(),
        });
        self.bus.emit(Event::Notification {
            text: format!("Now playing: {} ({})", info.title, info.id),
            timestamp: chrono::Utc::now(),
        });

        // Now-playing report, then the progress message it will edit.
        let messenger = Arc::clone(&self.messenger);
        let tx = self.internal_tx.clone();
        let announce = format!("Now playing: {} ({})", info.title, info.id);
        tokio::spawn(async move {
            if let Err(e) = messenger.send(&announce).await {
                warn!("could not send now-playing message: {}", e);
            }
            match messenger.send(&render_bar(0)).await {
                Ok(handle) => {
                    let _ = tx.send(Internal::ProgressMessage { epoch, handle });
                }
                Err(e) => warn!("could not create progress message: {}", e),
            }
        });

        // Advance timer: duration authority is the cached metadata.
        let tx = self.internal_tx.clone();
        let length = info.length_seconds;
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(length)).await;
            let _ = tx.send(Internal::AdvanceElapsed { epoch });
        });

        self.preload_next();
    }

    /// Natural track end: final progress update, then advance.
    fn finish_current(&mut self) {
        self.progress_tick(true);
        self.stop_current(true);
        self.select_next();
    }

    /// Stop playback if any, cancelling timers and pending session handoffs
    /// via an epoch bump. A pending blocking track is left untouched.
    fn stop_current(&mut self, completed: bool) {
        self.epoch += 1;
        self.progress.clear();

        match std::mem::replace(&mut self.state, PlayerState::Idle) {
            PlayerState::Playing { current } => {
                info!(id = %current.info.id, completed, "stopping playback");
                self.bus.emit(Event::PlaybackFinished {
                    id: current.info.id,
                    completed,
                    timestamp: chrono::Utc::now(),
                });
                let voice = Arc::clone(&self.voice);
                tokio::spawn(async move {
                    voice.stop().await;
                });
            }
            PlayerState::Joining { info } => {
                // Never reached Playing, so nothing finished and nothing to
                // stop on the transport.
                debug!(id = %info.id, "discarding pending session handoff");
            }
            other => self.state = other,
        }
    }

    // ---- progress ----

    fn progress_tick(&mut self, ended: bool) {
        let PlayerState::Playing { current } = &self.state else {
            return;
        };
        let Some(handle) = self.progress.handle().cloned() else {
            return;
        };

        let total_ms = current.info.length_seconds * 1000;
        let elapsed_ms = if ended {
            total_ms
        } else {
            (current.started.elapsed().as_millis() as u64).min(total_ms)
        };
        let Some(step) = quantize(elapsed_ms, total_ms) else {
            return;
        };
        if !self.progress.advance_to(step) {
            return;
        }

        self.bus.emit(Event::ProgressStep {
            id: current.info.id.clone(),
            step,
            timestamp: chrono::Utc::now(),
        });

        let messenger = Arc::clone(&self.messenger);
        let bar = render_bar(step);
        tokio::spawn(async move {
            if let Err(e) = messenger.edit(&handle, &bar).await {
                warn!("could not edit progress message: {}", e);
            }
        });
    }

    // ---- reporting ----

    /// Emit one human-readable notification: onto the event bus and to the
    /// bound report channel.
    fn notify(&self, text: String) {
        self.bus.emit(Event::Notification {
            text: text.clone(),
            timestamp: chrono::Utc::now(),
        });
        let messenger = Arc::clone(&self.messenger);
        tokio::spawn(async move {
            if let Err(e) = messenger.send(&text).await {
                warn!("could not send report: {}", e);
            }
        });
    }

    fn backlog_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut total_seconds: u64 = 0;

        match &self.state {
            PlayerState::Playing { current } => {
                let elapsed = current.started.elapsed().as_secs();
                let left = current
                    .info
                    .length_seconds
                    .saturating_sub(elapsed)
                    .max(1);
                lines.push(format!(
                    "Now: [{}] {} ({} remaining)",
                    current.info.id,
                    current.info.title,
                    format_track_time(left)
                ));
                total_seconds += left;
            }
            PlayerState::AwaitingPreload { id } => {
                if let Some(info) = self.library.get(id) {
                    lines.push(format!(
                        "Preparing: [{}] {} ({})",
                        info.id,
                        info.title,
                        format_track_time(info.length_seconds)
                    ));
                    total_seconds += info.length_seconds;
                }
            }
            PlayerState::Joining { info } => {
                lines.push(format!(
                    "Preparing: [{}] {} ({})",
                    info.id,
                    info.title,
                    format_track_time(info.length_seconds)
                ));
                total_seconds += info.length_seconds;
            }
            PlayerState::Idle => {}
        }

        for (index, id) in self.queue.iter().enumerate() {
            if let Some(info) = self.library.get(id) {
                lines.push(format!(
                    "{}. [{}] {} ({})",
                    index + 1,
                    info.id,
                    info.title,
                    format_track_time(info.length_seconds)
                ));
                total_seconds += info.length_seconds;
            }
        }

        lines.push(format!(
            "Total remaining playtime: {}",
            format_track_time(total_seconds)
        ));
        lines
    }

    fn persist(&self) {
        self.store.save(Snapshot {
            playlist: self.queue.playlist().to_vec(),
            track_info: self.library.clone(),
            backlog: self.queue.backlog_ids(),
        });
    }
}

/// Join lines into pages of `page_size` lines each, for report channels
/// that cap message length.
pub fn paginate(lines: &[String], page_size: usize) -> Vec<String> {
    lines
        .chunks(page_size.max(1))
        .map(|chunk| chunk.join("\n"))
        .collect()
}
