//! EcoScan client core
//!
//! Submits images to a remote waste classifier and keeps a short local
//! history of what the user was shown:
//! - [`classifier`]: multipart HTTP client for the classification endpoint
//! - [`normalizer`]: success/failure → one renderable result shape
//! - [`ledger`]: capped, persisted, newest-first history with counters
//! - [`location`]: optional position capability with explicit timeout/cancel
//! - [`session`]: orchestrates one submit lifecycle

pub mod classifier;
pub mod ledger;
pub mod location;
pub mod normalizer;
pub mod session;

pub use classifier::{Classifier, ClassifierResponse, ClassifyError, HttpClassifier, ImageUpload};
pub use ledger::{HistoryLedger, HISTORY_KEY, MAX_HISTORY};
pub use location::{FixedPosition, LocationOutcome, LocationProvider, LocationState, PositionSource};
pub use session::ClassificationSession;
