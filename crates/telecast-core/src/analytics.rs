//! Analytics plumbing
//!
//! - [`AnalyticsEvent`]: a named event with text/number properties
//! - [`AnalyticsSink`]: where events go; hosts usually bring their own
//! - [`AnalyticsRelay`]: a player listener that turns callbacks into events
//! - [`AnalyticsEmitter`]: buffering sink with an optional HTTP beacon

use crate::player::PlayerListener;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// A property value on an analytics event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Number(f64),
}

/// A named analytics event with string/double properties.
///
/// Properties keep their insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub properties: Vec<(String, PropertyValue)>,
}

impl AnalyticsEvent {
    /// Start building an event with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Add a text property.
    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties
            .push((key.into(), PropertyValue::Text(value.into())));
        self
    }

    /// Add a numeric property.
    pub fn with_number(mut self, key: impl Into<String>, value: f64) -> Self {
        self.properties
            .push((key.into(), PropertyValue::Number(value)));
        self
    }

    /// Look up a property by key.
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

/// Receives analytics events.
pub trait AnalyticsSink: Send + Sync {
    /// Record one event.
    fn record(&self, event: AnalyticsEvent);
}

/// A player listener that forwards playback milestones to an analytics
/// sink.
///
/// Every event carries the live resource identifier as
/// `LiveStreamIdentifier`; positions and durations are reported in seconds.
/// Register it on the player like any other listener:
///
/// ```no_run
/// # use std::sync::Arc;
/// # use telecast_core::analytics::{AnalyticsEmitter, AnalyticsRelay};
/// # fn demo(player: &telecast_core::player::LivePlayer) {
/// let sink = Arc::new(AnalyticsEmitter::new());
/// player.add_listener(AnalyticsRelay::new(sink, "myStream"));
/// # }
/// ```
pub struct AnalyticsRelay {
    sink: Arc<dyn AnalyticsSink>,
    identifier: String,
}

impl AnalyticsRelay {
    /// Create a relay for one live resource.
    pub fn new(sink: Arc<dyn AnalyticsSink>, identifier: impl Into<String>) -> Self {
        Self {
            sink,
            identifier: identifier.into(),
        }
    }

    fn event(&self, name: &str) -> AnalyticsEvent {
        AnalyticsEvent::named(name).with_text("LiveStreamIdentifier", self.identifier.as_str())
    }
}

impl PlayerListener for AnalyticsRelay {
    fn on_preparing(&mut self, duration: Option<Duration>) {
        let mut event = self.event("LiveStreamPreparing");
        if let Some(duration) = duration {
            event = event.with_number("TotalDuration", duration.as_secs_f64());
        }
        self.sink.record(event);
    }

    fn on_ready(&mut self) {
        self.sink.record(self.event("LiveStreamReady"));
    }

    fn on_play(&mut self, position: Duration) {
        self.sink.record(
            self.event("LiveStreamPlay")
                .with_number("CurrentPosition", position.as_secs_f64()),
        );
    }

    fn on_pause(&mut self, position: Duration) {
        self.sink.record(
            self.event("LiveStreamPause")
                .with_number("CurrentPosition", position.as_secs_f64()),
        );
    }

    fn on_end(&mut self, duration: Option<Duration>) {
        let mut event = self.event("LiveStreamEnd");
        if let Some(duration) = duration {
            event = event.with_number("TotalDuration", duration.as_secs_f64());
        }
        self.sink.record(event);
    }

    fn on_seek(&mut self, from: Duration, to: Duration) {
        self.sink.record(
            self.event("LiveStreamSeek")
                .with_number("OldPosition", from.as_secs_f64())
                .with_number("NewPosition", to.as_secs_f64()),
        );
    }

    fn on_buffering_start(&mut self, position: Duration) {
        self.sink.record(
            self.event("LiveStreamBufferingStart")
                .with_number("CurrentPosition", position.as_secs_f64()),
        );
    }

    fn on_buffering_complete(&mut self, position: Duration) {
        self.sink.record(
            self.event("LiveStreamBufferingComplete")
                .with_number("CurrentPosition", position.as_secs_f64()),
        );
    }
}

/// A recorded event with delivery metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    /// Unique record ID
    pub id: Uuid,
    /// When the event was recorded
    pub timestamp: DateTime<Utc>,
    /// Position in the emitter's stream, starting at 1
    pub sequence: u64,
    /// The event
    #[serde(flatten)]
    pub event: AnalyticsEvent,
}

/// The library-provided sink.
///
/// Stamps each event with an ID, a timestamp and a sequence number, and
/// buffers it in memory. A full buffer is flushed: POSTed to the beacon
/// endpoint when one is configured, dropped otherwise. Beacon delivery is
/// fire-and-forget on the ambient Tokio runtime.
pub struct AnalyticsEmitter {
    sequence: AtomicU64,
    buffer: Mutex<Vec<AnalyticsRecord>>,
    max_buffer_size: usize,
    beacon_url: Option<String>,
}

impl AnalyticsEmitter {
    /// Create an emitter with no beacon endpoint.
    pub fn new() -> Self {
        Self {
            sequence: AtomicU64::new(0),
            buffer: Mutex::new(Vec::new()),
            max_buffer_size: 50,
            beacon_url: None,
        }
    }

    /// Create an emitter that POSTs full buffers to a beacon endpoint.
    pub fn with_beacon(beacon_url: impl Into<String>) -> Self {
        let mut emitter = Self::new();
        emitter.beacon_url = Some(beacon_url.into());
        emitter
    }

    /// All buffered records.
    pub fn records(&self) -> Vec<AnalyticsRecord> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop all buffered records.
    pub fn clear(&self) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn flush(&self, records: Vec<AnalyticsRecord>) {
        if records.is_empty() {
            return;
        }
        info!(count = records.len(), "Flushing analytics records");

        if let Some(url) = self.beacon_url.clone() {
            tokio::spawn(async move {
                let client = reqwest::Client::new();
                let _ = client.post(&url).json(&records).send().await;
            });
        }
    }
}

impl AnalyticsSink for AnalyticsEmitter {
    fn record(&self, event: AnalyticsEvent) {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let record = AnalyticsRecord {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            sequence,
            event,
        };
        debug!(name = %record.event.name, sequence, "Analytics event");

        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        buffer.push(record);
        if buffer.len() >= self.max_buffer_size {
            let records: Vec<_> = buffer.drain(..).collect();
            drop(buffer);
            self.flush(records);
        }
    }
}

impl Default for AnalyticsEmitter {
    fn default() -> Self {
        Self::new()
    }
}
