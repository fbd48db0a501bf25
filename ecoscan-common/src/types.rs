//! Data model shared by the client and the presentation layer

use serde::{Deserialize, Serialize};

/// One classification outcome as shown to the user
///
/// Failures are represented by a sentinel value of this same shape, so a
/// renderer never needs a separate error path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Item label
    pub name: String,
    /// Disposal category label, e.g. "Recycle ♻️"
    pub category: String,
    /// Styling tag, opaque to the client logic
    #[serde(rename = "className")]
    pub class_name: String,
    pub instructions: String,
    pub tip: String,
}

/// One persisted history record
///
/// The timestamp is a locale-style wall clock string captured at record time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, alias = "date")]
    pub timestamp: String,
}

impl HistoryEntry {
    /// `"{name} ({first word of category}) - {timestamp}"`
    pub fn summary(&self) -> String {
        let keyword = self.category.split(' ').next().unwrap_or_default();
        format!("{} ({}) - {}", self.name, keyword, self.timestamp)
    }
}

/// Derived counters over the history ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregates {
    pub recycled_count: usize,
    pub composted_count: usize,
}

/// History as handed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryView {
    /// Newest first
    pub summaries: Vec<String>,
    pub aggregates: Aggregates,
}

/// Position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}
