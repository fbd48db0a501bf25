//! # EcoScan Common Library
//!
//! Shared code for the EcoScan client:
//! - Error and result types
//! - Configuration loading (TOML + environment + defaults)
//! - Key-value persistence (SQLite settings table, in-memory)
//! - Data model shared by the client and the presentation layer
//! - Event types and the EventBus that feeds the presentation layer

pub mod config;
pub mod error;
pub mod events;
pub mod store;
pub mod types;

pub use error::{Error, Result};
pub use events::{EcoScanEvent, EventBus};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use types::{Aggregates, ClassificationResult, Coordinates, HistoryEntry, HistoryView};
