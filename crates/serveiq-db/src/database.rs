//! Database connection lifecycle.
//!
//! One client is opened at startup and shared for the life of the process.
//! The connection goes `disconnected -> connected` when the startup `ping`
//! succeeds, or `disconnected -> failed` otherwise. A failed connection is
//! logged and kept: the service still starts, and every query against it
//! fails on its own.

use crate::error::{DbError, Result};
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serveiq_config::DatabaseConfig;
use tracing::{error, info};

/// Observable outcome of the startup handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Failed(String),
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connected => "connected",
            ConnectionState::Failed(_) => "failed",
        }
    }
}

/// Main database handle.
#[derive(Clone)]
pub struct Database {
    client: Option<Client>,
    db_name: String,
    collection: String,
    state: ConnectionState,
}

impl Database {
    /// Open the client and run the startup handshake.
    ///
    /// Never fails: a handshake error moves the handle to
    /// [`ConnectionState::Failed`].
    pub async fn connect(config: &DatabaseConfig) -> Self {
        match Self::handshake(config).await {
            Ok(client) => {
                info!("Connected to MongoDB: {}", config.name);
                Self {
                    client: Some(client),
                    db_name: config.name.clone(),
                    collection: config.collection.clone(),
                    state: ConnectionState::Connected,
                }
            }
            Err(e) => {
                error!("Database connection error: {}", e);
                Self::unavailable(config, e.to_string())
            }
        }
    }

    /// A handle in the failed state, without touching the network.
    pub fn unavailable(config: &DatabaseConfig, reason: impl Into<String>) -> Self {
        Self {
            client: None,
            db_name: config.name.clone(),
            collection: config.collection.clone(),
            state: ConnectionState::Failed(reason.into()),
        }
    }

    async fn handshake(config: &DatabaseConfig) -> Result<Client> {
        let mut options = ClientOptions::parse(config.uri.expose_secret()).await?;
        options.app_name = Some(config.app_name.clone());

        let client = Client::with_options(options)?;
        client
            .database(&config.name)
            .run_command(doc! { "ping": 1 })
            .await?;

        Ok(client)
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// Typed handle to the inference collection.
    pub fn collection<T>(&self) -> Result<Collection<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        match (&self.client, &self.state) {
            (Some(client), ConnectionState::Connected) => {
                Ok(client.database(&self.db_name).collection::<T>(&self.collection))
            }
            (_, ConnectionState::Failed(reason)) => Err(DbError::NotConnected(reason.clone())),
            (None, ConnectionState::Connected) => {
                Err(DbError::NotConnected("no client".to_string()))
            }
        }
    }
}
