//! Shared application state for the web server.

use serveiq_config::DatabaseConfig;
use serveiq_db::{ConnectionState, Database, InferenceRepository, InferenceStore};
use std::sync::Arc;

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide store handle, opened once at startup
    pub store: Arc<dyn InferenceStore>,
    /// Outcome of the startup handshake
    pub connection: ConnectionState,
}

impl AppState {
    pub fn new(store: Arc<dyn InferenceStore>, connection: ConnectionState) -> Self {
        Self { store, connection }
    }

    /// Connect to MongoDB. A failed handshake still yields a usable state
    /// whose queries fail individually.
    pub async fn connect(config: &DatabaseConfig) -> Self {
        let db = Arc::new(Database::connect(config).await);
        let connection = db.state().clone();
        Self::new(Arc::new(InferenceRepository::new(db)), connection)
    }
}

pub type SharedState = Arc<AppState>;
