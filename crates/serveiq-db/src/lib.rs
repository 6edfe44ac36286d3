//! Serve IQ Database Layer
//!
//! Read-only access to the MongoDB collection the detection pipeline writes
//! inference results into.
//!
//! # Example
//!
//! ```rust,no_run
//! use serveiq_config::DatabaseConfig;
//! use serveiq_db::{Database, InferenceRepository, InferenceStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Failure is logged, not returned
//!     let db = Database::connect(&DatabaseConfig::default()).await;
//!
//!     let repo = InferenceRepository::new(std::sync::Arc::new(db));
//!     let _latest = repo.recent(20).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod inferences;
pub mod schema;

pub use database::{ConnectionState, Database};
pub use error::{DbError, Result};
pub use inferences::{InferenceRepository, InferenceStore};
pub use schema::{StoredInference, FIELD_ID, FIELD_UPLOAD_TIME};
