//! serveiq-common: shared types, errors and process helpers used across the Serve IQ crates.

pub mod error;
pub mod record;
pub mod shutdown;

// Re-export commonly used types
pub use error::ApiError;
pub use record::{DetectedObject, InferenceRecord, Summary, SummaryCounter, RECENT_LIMIT};
