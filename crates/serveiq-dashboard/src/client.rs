//! HTTP client for the query service.

use async_trait::async_trait;
use serveiq_common::InferenceRecord;
use crate::error::ClientError;

/// Where a dashboard session gets its records from.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_recent(&self) -> Result<Vec<InferenceRecord>, ClientError>;
}

/// Calls `GET /api/data` on the query service.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    url: String,
}

impl ApiClient {
    /// `url` is the full endpoint, e.g. `http://localhost:5000/api/data`.
    pub fn new(url: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RecordSource for ApiClient {
    async fn fetch_recent(&self) -> Result<Vec<InferenceRecord>, ClientError> {
        let res = self.http.get(&self.url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(res.json().await?)
    }
}
