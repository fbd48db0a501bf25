//! Classification session
//!
//! One `submit` call is one request lifecycle:
//! preview event → POST → normalize → publish result → record → publish history.
//!
//! Transport and protocol failures never escape `submit`; they surface as the
//! sentinel result and are recorded like any other outcome. `submit` only
//! returns `Err` when the history store itself cannot be read or written.
//!
//! Concurrent submissions are independent. Each records when it completes,
//! so history order follows completion order, not issue order.

use crate::classifier::{Classifier, ImageUpload};
use crate::ledger::HistoryLedger;
use crate::location::LocationProvider;
use crate::normalizer::normalize;
use ecoscan_common::events::{EcoScanEvent, EventBus};
use ecoscan_common::{ClassificationResult, Coordinates, HistoryView, Result};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub struct ClassificationSession {
    classifier: Arc<dyn Classifier>,
    ledger: HistoryLedger,
    location: Arc<LocationProvider>,
    event_bus: EventBus,
}

impl ClassificationSession {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        ledger: HistoryLedger,
        location: Arc<LocationProvider>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            classifier,
            ledger,
            location,
            event_bus,
        }
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn location(&self) -> &Arc<LocationProvider> {
        &self.location
    }

    /// Classify an image using whatever coordinates the location provider holds
    pub async fn classify(&self, image: ImageUpload) -> Result<ClassificationResult> {
        let coordinates = self.location.coordinates();
        self.submit(image, coordinates).await
    }

    /// Classify an image with explicit (optional) coordinates
    pub async fn submit(
        &self,
        image: ImageUpload,
        coordinates: Option<Coordinates>,
    ) -> Result<ClassificationResult> {
        let request_id = Uuid::new_v4();

        self.event_bus.emit_lossy(EcoScanEvent::ImageSelected {
            file_name: image.file_name.clone(),
            size_bytes: image.size_bytes(),
            mime_type: image.mime_type.clone(),
        });
        self.event_bus.emit_lossy(EcoScanEvent::ClassificationStarted {
            request_id,
            timestamp: chrono::Utc::now(),
        });

        let outcome = self.classifier.classify(&image, coordinates).await;
        match &outcome {
            Ok(_) => info!(%request_id, file_name = %image.file_name, "Classification received"),
            Err(e) => warn!(%request_id, error = %e, "Error classifying image"),
        }

        let result = normalize(outcome);
        self.event_bus.emit_lossy(EcoScanEvent::ResultReady {
            request_id,
            result: result.clone(),
        });

        self.ledger.record(&result).await?;
        self.refresh_history().await?;

        Ok(result)
    }

    /// Reload history from storage and publish it
    pub async fn refresh_history(&self) -> Result<HistoryView> {
        let view = self.ledger.view().await?;
        self.event_bus
            .emit_lossy(EcoScanEvent::HistoryUpdated { view: view.clone() });
        Ok(view)
    }

    /// Remove all history and publish the empty view
    pub async fn clear_history(&self) -> Result<HistoryView> {
        self.ledger.clear().await?;
        self.refresh_history().await
    }
}
