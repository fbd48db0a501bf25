//! History ledger
//!
//! A capped, newest-first list of past results persisted as one JSON array
//! under [`HISTORY_KEY`]. Every operation re-reads the store, so changes made
//! by another writer between calls are picked up.
//!
//! `record` and `clear` are read-modify-write sequences serialized by a lock
//! shared between clones of one ledger. Nothing coordinates separate
//! processes: two of them recording at the same moment can lose an update.

use chrono::{DateTime, Local};
use ecoscan_common::{
    Aggregates, ClassificationResult, HistoryEntry, HistoryView, KeyValueStore, Result,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Storage key holding the JSON-encoded history
pub const HISTORY_KEY: &str = "ecoScanHistory";

/// Default ledger capacity
pub const MAX_HISTORY: usize = 10;

/// Wall clock format used for entry timestamps (e.g. "3:04:05 PM")
pub const TIMESTAMP_FORMAT: &str = "%-I:%M:%S %p";

const RECYCLE_KEYWORD: &str = "Recycle";
const COMPOST_KEYWORD: &str = "Compost";

#[derive(Clone)]
pub struct HistoryLedger {
    store: Arc<dyn KeyValueStore>,
    max_entries: usize,
    write_lock: Arc<Mutex<()>>,
}

impl HistoryLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_capacity(store, MAX_HISTORY)
    }

    /// Ledger keeping at most `max_entries` (minimum 1)
    pub fn with_capacity(store: Arc<dyn KeyValueStore>, max_entries: usize) -> Self {
        Self {
            store,
            max_entries: max_entries.max(1),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Record a result stamped with the current local time
    pub async fn record(&self, result: &ClassificationResult) -> Result<HistoryEntry> {
        self.record_at(result, Local::now()).await
    }

    /// Record a result with an explicit capture time
    pub async fn record_at(
        &self,
        result: &ClassificationResult,
        captured_at: DateTime<Local>,
    ) -> Result<HistoryEntry> {
        let entry = HistoryEntry {
            name: result.name.clone(),
            category: result.category.clone(),
            timestamp: captured_at.format(TIMESTAMP_FORMAT).to_string(),
        };

        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_all().await?;
        entries.insert(0, entry.clone());
        if entries.len() > self.max_entries {
            debug!(
                evicted = entries.len() - self.max_entries,
                "History over capacity, evicting oldest"
            );
            entries.truncate(self.max_entries);
        }

        let encoded = serde_json::to_string(&entries)?;
        self.store.set(HISTORY_KEY, &encoded).await?;

        debug!(entries = entries.len(), name = %entry.name, "Recorded history entry");
        Ok(entry)
    }

    /// Current entries, newest first
    ///
    /// Stored data that does not decode is treated as an empty history.
    pub async fn load_all(&self) -> Result<Vec<HistoryEntry>> {
        let Some(raw) = self.store.get(HISTORY_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("Stored history is not valid JSON, treating as empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(HISTORY_KEY).await?;
        debug!("History cleared");
        Ok(())
    }

    pub async fn aggregates(&self) -> Result<Aggregates> {
        Ok(aggregate(&self.load_all().await?))
    }

    /// Summaries and counters for the presentation layer
    pub async fn view(&self) -> Result<HistoryView> {
        let entries = self.load_all().await?;
        Ok(HistoryView {
            summaries: entries.iter().map(HistoryEntry::summary).collect(),
            aggregates: aggregate(&entries),
        })
    }
}

/// Count entries whose category contains "Recycle" / "Compost" (case-sensitive)
pub fn aggregate(entries: &[HistoryEntry]) -> Aggregates {
    entries.iter().fold(Aggregates::default(), |mut acc, entry| {
        if entry.category.contains(RECYCLE_KEYWORD) {
            acc.recycled_count += 1;
        }
        if entry.category.contains(COMPOST_KEYWORD) {
            acc.composted_count += 1;
        }
        acc
    })
}
