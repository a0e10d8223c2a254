//! Live stream player
//!
//! Coordinates:
//! - Source selection from a live resource's egress map
//! - State machine transitions driven by engine signals
//! - Fixed-interval reconnect while the stream is down
//! - Listener fan-out through the event dispatcher

use super::{
    EventDispatcher, ListenerId, MediaEngine, MediaErrorKind, MediaSignal, PlayerEvent,
    PlayerListener, PlayerState, TouchEvent, TouchPhase, VideoPlayer,
};
use crate::resources::LiveResource;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// How a player retries after losing the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Wait between losing the stream and the next connection attempt
    pub delay: Duration,
    /// Attempts per outage before the player gives up and ends playback;
    /// `None` retries forever
    pub max_attempts: Option<u32>,
}

impl ReconnectPolicy {
    /// Fixed retry interval used by default.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(5000);
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
            max_attempts: None,
        }
    }
}

enum Command {
    Attach(LiveResource),
    Play,
    Pause,
    Seek(Duration),
    Signal(MediaSignal),
    Touch(TouchEvent),
    Reconnect { epoch: u64 },
    QueryPosition(oneshot::Sender<Duration>),
    QueryDuration(oneshot::Sender<Option<Duration>>),
    QueryIsPlaying(oneshot::Sender<bool>),
    QueryResource(oneshot::Sender<Option<LiveResource>>),
}

/// Plays a live video resource through a host-provided [`MediaEngine`].
///
/// The player is a cheap, cloneable handle. A single driver task owns the
/// engine, the attached resource, the state and the pending reconnect, and
/// processes commands in submission order; there is no shared mutable
/// state. The host forwards its widget callbacks through [`signal`] and
/// touch input through [`touch`].
///
/// [`signal`]: LivePlayer::signal
/// [`touch`]: LivePlayer::touch
#[derive(Clone)]
pub struct LivePlayer {
    commands: mpsc::UnboundedSender<Command>,
    state_rx: watch::Receiver<PlayerState>,
    dispatcher: EventDispatcher,
}

impl LivePlayer {
    /// Create a player with the default reconnect policy.
    ///
    /// Must be called inside a Tokio runtime; the player spawns the driver
    /// task that owns the engine.
    pub fn new(engine: impl MediaEngine + 'static) -> Self {
        Self::with_policy(engine, ReconnectPolicy::default())
    }

    /// Create a player with an explicit reconnect policy.
    pub fn with_policy(engine: impl MediaEngine + 'static, policy: ReconnectPolicy) -> Self {
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PlayerState::Idle);
        let dispatcher = EventDispatcher::new();

        let driver = Driver {
            engine,
            policy,
            dispatcher: dispatcher.clone(),
            state_tx,
            timer_commands: commands.downgrade(),
            state: PlayerState::Idle,
            resource: None,
            pending_reconnect: None,
            reconnect_epoch: 0,
            attempts: 0,
        };
        tokio::spawn(driver.run(commands_rx));

        Self {
            commands,
            state_rx,
            dispatcher,
        }
    }

    /// Attach a live resource and connect to its preferred egress endpoint.
    ///
    /// Enters `Preparing` from any state, cancels a pending reconnect and
    /// resets the attempt count.
    pub fn attach(&self, resource: LiveResource) {
        self.send(Command::Attach(resource));
    }

    /// Begin or resume playback. Always transitions to `Playing`.
    pub fn play(&self) {
        self.send(Command::Play);
    }

    /// Pause playback. Always transitions to `Idle`.
    pub fn pause(&self) {
        self.send(Command::Pause);
    }

    /// Seek to a playback position.
    pub fn seek(&self, position: Duration) {
        self.send(Command::Seek(position));
    }

    /// Deliver a callback from the platform media widget.
    pub fn signal(&self, signal: MediaSignal) {
        self.send(Command::Signal(signal));
    }

    /// Forward a touch on the playback surface. A `Down` phase toggles
    /// between play and pause.
    pub fn touch(&self, event: TouchEvent) {
        self.send(Command::Touch(event));
    }

    /// Current player state.
    pub fn state(&self) -> PlayerState {
        *self.state_rx.borrow()
    }

    /// Subscribe to state changes.
    pub fn subscribe_state(&self) -> watch::Receiver<PlayerState> {
        self.state_rx.clone()
    }

    /// Register a listener for player events.
    pub fn add_listener(&self, listener: impl PlayerListener + 'static) -> ListenerId {
        self.dispatcher.register(Box::new(listener))
    }

    /// Remove a previously registered listener.
    pub fn remove_listener(&self, id: ListenerId) {
        self.dispatcher.deregister(id);
    }

    /// Current playback position reported by the engine.
    pub async fn position(&self) -> Duration {
        self.query(Command::QueryPosition)
            .await
            .unwrap_or(Duration::ZERO)
    }

    /// Total clip duration reported by the engine; not useful for live
    /// streams.
    pub async fn duration(&self) -> Option<Duration> {
        self.query(Command::QueryDuration).await.flatten()
    }

    /// True while the engine is rendering frames.
    pub async fn is_playing(&self) -> bool {
        self.query(Command::QueryIsPlaying).await.unwrap_or(false)
    }

    /// The currently attached resource, if any.
    pub async fn resource(&self) -> Option<LiveResource> {
        self.query(Command::QueryResource).await.flatten()
    }

    fn send(&self, command: Command) {
        let _ = self.commands.send(command);
    }

    async fn query<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Option<T> {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(make(tx)).is_err() {
            return None;
        }
        rx.await.ok()
    }
}

#[async_trait]
impl VideoPlayer for LivePlayer {
    type Resource = LiveResource;

    fn attach(&self, resource: LiveResource) {
        LivePlayer::attach(self, resource);
    }

    fn play(&self) {
        LivePlayer::play(self);
    }

    fn pause(&self) {
        LivePlayer::pause(self);
    }

    fn seek(&self, position: Duration) {
        LivePlayer::seek(self, position);
    }

    async fn position(&self) -> Duration {
        LivePlayer::position(self).await
    }

    async fn duration(&self) -> Option<Duration> {
        LivePlayer::duration(self).await
    }
}

struct Driver<E> {
    engine: E,
    policy: ReconnectPolicy,
    dispatcher: EventDispatcher,
    state_tx: watch::Sender<PlayerState>,
    timer_commands: mpsc::WeakUnboundedSender<Command>,
    state: PlayerState,
    resource: Option<LiveResource>,
    pending_reconnect: Option<JoinHandle<()>>,
    reconnect_epoch: u64,
    attempts: u32,
}

impl<E: MediaEngine> Driver<E> {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = commands.recv().await {
            self.handle(command);
        }
        self.cancel_reconnect();
        debug!("Live player driver stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Attach(resource) => self.attach(resource),
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::Seek(position) => self.seek(position),
            Command::Signal(signal) => self.signal(signal),
            Command::Touch(event) => self.touch(event),
            Command::Reconnect { epoch } => self.reconnect(epoch),
            Command::QueryPosition(reply) => {
                let _ = reply.send(self.engine.position());
            }
            Command::QueryDuration(reply) => {
                let _ = reply.send(self.engine.duration());
            }
            Command::QueryIsPlaying(reply) => {
                let _ = reply.send(self.engine.is_playing());
            }
            Command::QueryResource(reply) => {
                let _ = reply.send(self.resource.clone());
            }
        }
    }

    fn attach(&mut self, resource: LiveResource) {
        info!(identifier = resource.identifier(), "Attaching live resource");
        self.cancel_reconnect();
        self.attempts = 0;
        self.resource = Some(resource);
        self.connect();
    }

    /// The attach sequence: enter `Preparing`, point the engine at the
    /// preferred egress endpoint and start it. Reconnect attempts re-run
    /// this with the retained resource.
    fn connect(&mut self) {
        self.handle_preparing();

        let Some(resource) = self.resource.as_ref() else {
            return;
        };
        let Some((kind, point)) = resource.preferred_egress() else {
            warn!(
                identifier = resource.identifier(),
                "No egress endpoint configured; leaving source unset"
            );
            return;
        };
        debug!(
            identifier = resource.identifier(),
            egress = %kind,
            endpoint = point,
            "Connecting to egress endpoint"
        );
        let point = point.to_string();
        self.engine.set_source(&point);
        self.engine.start();
    }

    fn play(&mut self) {
        self.handle_play();
        self.engine.start();
    }

    fn pause(&mut self) {
        self.handle_pause();
        self.engine.pause();
    }

    fn seek(&mut self, to: Duration) {
        let from = self.engine.position();
        self.engine.seek_to(to);
        self.dispatcher.post(PlayerEvent::Seek { from, to });
    }

    fn touch(&mut self, event: TouchEvent) {
        self.dispatcher.post(PlayerEvent::Touch(event));
        if event.phase == TouchPhase::Down {
            if self.engine.is_playing() {
                self.pause();
            } else {
                self.play();
            }
        }
    }

    fn signal(&mut self, signal: MediaSignal) {
        debug!(?signal, state = %self.state, "Media signal");
        match signal {
            MediaSignal::Prepared => self.handle_ready(),
            MediaSignal::RenderingStarted => self.rendering_started(),
            MediaSignal::BufferingStarted | MediaSignal::Error(MediaErrorKind::Io) => {
                self.stream_interrupted();
            }
            MediaSignal::Completed => self.handle_end(),
            MediaSignal::Error(kind) => {
                warn!(kind = %kind, "Unhandled media error");
            }
        }
    }

    fn rendering_started(&mut self) {
        self.cancel_reconnect();
        self.attempts = 0;
        if self.state == PlayerState::Buffering {
            self.handle_buffering_complete();
        } else if self.state != PlayerState::Playing {
            self.handle_play();
        }
    }

    fn stream_interrupted(&mut self) {
        // Back-to-back stall signals collapse into the one pending attempt
        if self.state == PlayerState::Buffering {
            return;
        }
        self.handle_buffering_start();
        self.schedule_reconnect();
    }

    fn schedule_reconnect(&mut self) {
        if let Some(limit) = self.policy.max_attempts {
            if self.attempts >= limit {
                warn!(
                    attempts = self.attempts,
                    "Reconnect attempts exhausted; ending playback"
                );
                self.handle_end();
                return;
            }
        }
        self.attempts += 1;
        self.cancel_reconnect();

        let epoch = self.reconnect_epoch;
        let delay = self.policy.delay;
        let commands = self.timer_commands.clone();
        debug!(
            attempt = self.attempts,
            delay_ms = delay.as_millis() as u64,
            "Scheduling reconnect attempt"
        );
        self.pending_reconnect = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(commands) = commands.upgrade() {
                let _ = commands.send(Command::Reconnect { epoch });
            }
        }));
    }

    fn reconnect(&mut self, epoch: u64) {
        // A timer that was cancelled after its sleep completed still gets
        // its message into the queue; the epoch check drops it.
        if epoch != self.reconnect_epoch {
            debug!("Ignoring stale reconnect timer");
            return;
        }
        self.pending_reconnect = None;
        info!(attempt = self.attempts, "Attempting to reconnect to the stream");
        self.connect();
    }

    fn cancel_reconnect(&mut self) {
        self.reconnect_epoch += 1;
        if let Some(handle) = self.pending_reconnect.take() {
            handle.abort();
        }
    }

    fn handle_preparing(&mut self) {
        let duration = self.engine.duration();
        self.set_state(PlayerState::Preparing);
        self.dispatcher.post(PlayerEvent::Preparing { duration });
    }

    fn handle_ready(&mut self) {
        self.set_state(PlayerState::Ready);
        self.dispatcher.post(PlayerEvent::Ready);
    }

    fn handle_play(&mut self) {
        let position = self.engine.position();
        self.set_state(PlayerState::Playing);
        self.dispatcher.post(PlayerEvent::Play { position });
    }

    fn handle_pause(&mut self) {
        let position = self.engine.position();
        self.set_state(PlayerState::Idle);
        self.dispatcher.post(PlayerEvent::Pause { position });
    }

    fn handle_buffering_start(&mut self) {
        let position = self.engine.position();
        self.set_state(PlayerState::Buffering);
        self.dispatcher.post(PlayerEvent::BufferingStart { position });
    }

    fn handle_buffering_complete(&mut self) {
        let position = self.engine.position();
        self.set_state(PlayerState::Playing);
        self.dispatcher.post(PlayerEvent::BufferingComplete { position });
    }

    fn handle_end(&mut self) {
        let duration = self.engine.duration();
        self.set_state(PlayerState::Ended);
        self.dispatcher.post(PlayerEvent::End { duration });
    }

    /// Enter a new state and notify; a no-op when the state is unchanged.
    fn set_state(&mut self, new_state: PlayerState) {
        if new_state == self.state {
            return;
        }
        let from = self.state;
        self.state = new_state;
        let _ = self.state_tx.send(new_state);
        info!(from = %from, to = %new_state, "State transition");
        self.dispatcher
            .post(PlayerEvent::StateChange { from, to: new_state });
    }
}
