//! Location capability wrapper
//!
//! A request resolves to one of three outcomes: the platform has no position
//! source (Unsupported), the source produced coordinates (Obtained), or it
//! refused or timed out (Denied). Cancelling a request through its token
//! leaves the previous state untouched.
//!
//! Requests are numbered. Only the most recently issued request may update
//! the stored state; a slower, older request resolving afterwards is ignored.

use async_trait::async_trait;
use ecoscan_common::events::{EcoScanEvent, EventBus};
use ecoscan_common::Coordinates;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub const STATUS_PENDING: &str = "Getting location...";
pub const STATUS_DENIED: &str = "Location access denied.";
pub const STATUS_UNSUPPORTED: &str = "Geolocation not supported.";

/// Why a position source produced no coordinates
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error("Permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    Unavailable(String),
}

/// "Get current position" capability
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, PositionError>;
}

/// Source that always reports the same coordinates
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Ok(self.0)
    }
}

/// Result of one `request_location` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationOutcome {
    Unsupported,
    Obtained(Coordinates),
    Denied,
    Cancelled,
}

/// What the provider currently shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationState {
    Idle,
    Pending,
    Unsupported,
    Obtained(Coordinates),
    Denied,
}

impl LocationState {
    /// User-visible status line (none while idle)
    pub fn status_text(&self) -> Option<String> {
        match self {
            LocationState::Idle => None,
            LocationState::Pending => Some(STATUS_PENDING.to_string()),
            LocationState::Unsupported => Some(STATUS_UNSUPPORTED.to_string()),
            LocationState::Denied => Some(STATUS_DENIED.to_string()),
            LocationState::Obtained(c) => Some(format!("Lat: {:.2}, Lon: {:.2}", c.lat, c.lon)),
        }
    }
}

struct Inner {
    generation: u64,
    state: LocationState,
    /// Last obtained position; survives later denials
    coordinates: Option<Coordinates>,
}

pub struct LocationProvider {
    source: Option<Arc<dyn PositionSource>>,
    inner: Mutex<Inner>,
    event_bus: EventBus,
}

impl LocationProvider {
    /// `source` is `None` when the platform has no position capability
    pub fn new(source: Option<Arc<dyn PositionSource>>, event_bus: EventBus) -> Self {
        Self {
            source,
            inner: Mutex::new(Inner {
                generation: 0,
                state: LocationState::Idle,
                coordinates: None,
            }),
            event_bus,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.source.is_some()
    }

    pub fn state(&self) -> LocationState {
        self.lock().state
    }

    /// Last obtained coordinates, if any
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.lock().coordinates
    }

    /// Ask the position source for the current position
    ///
    /// Resolves to Denied if the source refuses or `timeout` elapses.
    pub async fn request_location(
        &self,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> LocationOutcome {
        let Some(source) = self.source.clone() else {
            self.lock().state = LocationState::Unsupported;
            self.publish(LocationState::Unsupported);
            return LocationOutcome::Unsupported;
        };

        let (generation, previous) = {
            let mut inner = self.lock();
            inner.generation += 1;
            let previous = inner.state;
            inner.state = LocationState::Pending;
            (inner.generation, previous)
        };
        self.publish(LocationState::Pending);

        let outcome = tokio::select! {
            _ = cancel.cancelled() => LocationOutcome::Cancelled,
            resolved = tokio::time::timeout(timeout, source.current_position()) => match resolved {
                Ok(Ok(coords)) => LocationOutcome::Obtained(coords),
                Ok(Err(e)) => {
                    debug!("Position source refused: {}", e);
                    LocationOutcome::Denied
                }
                Err(_) => {
                    debug!("Position request timed out after {:?}", timeout);
                    LocationOutcome::Denied
                }
            },
        };

        self.apply(generation, previous, outcome);
        outcome
    }

    fn apply(&self, generation: u64, previous: LocationState, outcome: LocationOutcome) {
        let state = {
            let mut inner = self.lock();
            if inner.generation != generation {
                debug!(
                    generation,
                    current = inner.generation,
                    "Ignoring stale location resolution"
                );
                return;
            }

            inner.state = match outcome {
                LocationOutcome::Obtained(coords) => {
                    inner.coordinates = Some(coords);
                    LocationState::Obtained(coords)
                }
                LocationOutcome::Denied => LocationState::Denied,
                LocationOutcome::Unsupported => LocationState::Unsupported,
                LocationOutcome::Cancelled => previous,
            };
            inner.state
        };

        if let LocationState::Obtained(coords) = state {
            info!(lat = coords.lat, lon = coords.lon, "Location obtained");
        }
        self.publish(state);
    }

    fn publish(&self, state: LocationState) {
        if let Some(status) = state.status_text() {
            self.event_bus
                .emit_lossy(EcoScanEvent::LocationStatusChanged { status });
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
