//! Event types and EventBus
//!
//! The client core never renders anything itself. It publishes events on
//! the EventBus and whatever presentation layer is attached (terminal
//! printer, GUI binding, test harness) subscribes and draws.

use crate::types::{ClassificationResult, HistoryView};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// EcoScan event types
///
/// Events are broadcast via EventBus and serialize with a `type` tag so they
/// can be forwarded to a web front end unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EcoScanEvent {
    /// An image was chosen and is about to be classified
    ImageSelected {
        file_name: String,
        size_bytes: usize,
        mime_type: String,
    },

    /// A classification request was issued
    ClassificationStarted {
        request_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A classification finished (success or sentinel failure result)
    ResultReady {
        request_id: Uuid,
        result: ClassificationResult,
    },

    /// The history ledger changed or was reloaded
    HistoryUpdated { view: HistoryView },

    /// User-visible location status line changed
    LocationStatusChanged { status: String },
}

/// Central event distribution bus
///
/// Uses tokio::broadcast internally:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use ecoscan_common::events::{EcoScanEvent, EventBus};
///
/// let event_bus = EventBus::new(16);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(EcoScanEvent::LocationStatusChanged {
///     status: "Getting location...".to_string(),
/// });
///
/// assert!(matches!(
///     rx.try_recv(),
///     Ok(EcoScanEvent::LocationStatusChanged { .. })
/// ));
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EcoScanEvent>,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<EcoScanEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: EcoScanEvent) {
        let _ = self.tx.send(event);
    }
}
