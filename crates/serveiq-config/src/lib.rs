//! Configuration loading for Serve IQ.
//! Reads serveiq.toml from the current directory or the path in SERVEIQ_CONFIG,
//! then applies environment overrides. Every field has a default, so a missing
//! file is not an error.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Query endpoint the dashboard reads from unless configured otherwise.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/data";

/// Image shown for records without an `image` payload.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/200";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_host()        -> String { "0.0.0.0".to_string() }
fn default_server_port() -> u16    { 5000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_server_port() }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// May carry credentials; never logged.
    #[serde(default = "default_mongo_uri", deserialize_with = "secret_string")]
    pub uri: SecretString,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

fn default_mongo_uri()  -> SecretString { SecretString::from("mongodb://localhost:27017".to_string()) }
fn default_db_name()    -> String { "GardenTest".to_string() }
fn default_collection() -> String { "inferenceData".to_string() }
fn default_app_name()   -> String { "serveiq".to_string() }

fn secret_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: default_mongo_uri(),
            name: default_db_name(),
            collection: default_collection(),
            app_name: default_app_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_placeholder")]
    pub placeholder_image: String,
}

fn default_dashboard_port() -> u16    { 3000 }
fn default_api_url()        -> String { DEFAULT_API_URL.to_string() }
fn default_placeholder()    -> String { PLACEHOLDER_IMAGE_URL.to_string() }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_dashboard_port(),
            api_url: default_api_url(),
            placeholder_image: default_placeholder(),
        }
    }
}

impl DashboardConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when RUST_LOG is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}


impl Config {
    /// Load configuration from serveiq.toml and the environment.
    /// Checks SERVEIQ_CONFIG first, then the current directory.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is the normal case.
        let _ = dotenvy::dotenv();

        let path = std::env::var("SERVEIQ_CONFIG")
            .unwrap_or_else(|_| "serveiq.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
            info!("Loaded config from {}", path);
            Self::from_toml_str(&content)?
        } else {
            info!("Config file {} not found, using defaults", path);
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply SERVEIQ_* overrides. `lookup` abstracts the environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup("SERVEIQ_MONGO_URI") {
            self.database.uri = SecretString::from(uri);
        }
        if let Some(port) = lookup("SERVEIQ_PORT") {
            self.server.port = parse_port("SERVEIQ_PORT", port)?;
        }
        if let Some(port) = lookup("SERVEIQ_DASHBOARD_PORT") {
            self.dashboard.port = parse_port("SERVEIQ_DASHBOARD_PORT", port)?;
        }
        if let Some(url) = lookup("SERVEIQ_API_URL") {
            self.dashboard.api_url = url;
        }
        Ok(())
    }
}

fn parse_port(key: &str, value: String) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| {
        warn!("Invalid {key} value: {value}");
        ConfigError::InvalidEnv { key: key.to_string(), value }
    })
}
