//! Single-consumer event dispatch
//!
//! Listener registration and event delivery all travel through one queue
//! consumed by one task, so the listener set is only ever touched from that
//! task. Delivery order equals post order, and delivery is decoupled from
//! the call that produced the event.

use super::{PlayerEvent, PlayerListener};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Handle for removing a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

enum DispatchMessage {
    Register(ListenerId, Box<dyn PlayerListener>),
    Deregister(ListenerId),
    Deliver(PlayerEvent),
}

/// Posts player events to registered listeners.
///
/// Cheap to clone; all clones feed the same dispatch task. Must be created
/// inside a Tokio runtime.
#[derive(Clone)]
pub struct EventDispatcher {
    queue: mpsc::UnboundedSender<DispatchMessage>,
    next_id: Arc<AtomicU64>,
}

impl EventDispatcher {
    /// Create a dispatcher and spawn its dispatch task.
    pub fn new() -> Self {
        let (queue, mut rx) = mpsc::unbounded_channel::<DispatchMessage>();

        tokio::spawn(async move {
            let mut listeners: Vec<(ListenerId, Box<dyn PlayerListener>)> = Vec::new();
            while let Some(message) = rx.recv().await {
                match message {
                    DispatchMessage::Register(id, listener) => {
                        listeners.push((id, listener));
                    }
                    DispatchMessage::Deregister(id) => {
                        listeners.retain(|(listener_id, _)| *listener_id != id);
                    }
                    DispatchMessage::Deliver(event) => {
                        for (_, listener) in listeners.iter_mut() {
                            deliver(listener.as_mut(), &event);
                        }
                    }
                }
            }
            debug!("Event dispatcher stopped");
        });

        Self {
            queue,
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Register a listener; events posted after this call reach it.
    pub fn register(&self, listener: Box<dyn PlayerListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let _ = self.queue.send(DispatchMessage::Register(id, listener));
        id
    }

    /// Remove a listener; events posted after this call no longer reach it.
    pub fn deregister(&self, id: ListenerId) {
        let _ = self.queue.send(DispatchMessage::Deregister(id));
    }

    /// Queue an event for delivery to all registered listeners.
    pub fn post(&self, event: PlayerEvent) {
        let _ = self.queue.send(DispatchMessage::Deliver(event));
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn deliver(listener: &mut dyn PlayerListener, event: &PlayerEvent) {
    match event {
        PlayerEvent::StateChange { from, to } => listener.on_state_change(*from, *to),
        PlayerEvent::Preparing { duration } => listener.on_preparing(*duration),
        PlayerEvent::Ready => listener.on_ready(),
        PlayerEvent::Play { position } => listener.on_play(*position),
        PlayerEvent::Pause { position } => listener.on_pause(*position),
        PlayerEvent::End { duration } => listener.on_end(*duration),
        PlayerEvent::Seek { from, to } => listener.on_seek(*from, *to),
        PlayerEvent::BufferingStart { position } => listener.on_buffering_start(*position),
        PlayerEvent::BufferingComplete { position } => listener.on_buffering_complete(*position),
        PlayerEvent::Touch(touch) => listener.on_touch(*touch),
    }
}
