//! Test doubles and fixtures shared by the Serve IQ crates.
//!
//! `MemoryStore` behaves like the MongoDB repository: newest `upload_time`
//! first, ties in insertion order. `FailingStore` fails every call the way a
//! store that never finished its handshake does.

use async_trait::async_trait;
use serveiq_common::{DetectedObject, InferenceRecord, Summary};
use serveiq_db::{DbError, InferenceStore, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

pub use pretty_assertions;

/// In-memory [`InferenceStore`].
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<InferenceRecord>>,
    queries: AtomicUsize,
}

impl MemoryStore {
    pub fn new(records: Vec<InferenceRecord>) -> Self {
        Self { records: RwLock::new(records), queries: AtomicUsize::new(0) }
    }

    /// Number of store calls served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceStore for MemoryStore {
    async fn recent(&self, limit: usize) -> Result<Vec<InferenceRecord>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.read().await.clone();
        // sort_by is stable, so equal timestamps keep store order
        records.sort_by(|a, b| b.upload_time.cmp(&a.upload_time));
        records.truncate(limit);
        Ok(records)
    }

    async fn count(&self) -> Result<u64> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.read().await.len() as u64)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<InferenceRecord>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if id.len() != 24 || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DbError::InvalidId(id.to_string()));
        }
        Ok(self.records.read().await.iter().find(|r| r.id == id).cloned())
    }
}

/// Store whose every call fails.
pub struct FailingStore;

#[async_trait]
impl InferenceStore for FailingStore {
    async fn recent(&self, _limit: usize) -> Result<Vec<InferenceRecord>> {
        Err(DbError::NotConnected("connection refused".to_string()))
    }

    async fn count(&self) -> Result<u64> {
        Err(DbError::NotConnected("connection refused".to_string()))
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<InferenceRecord>> {
        Err(DbError::NotConnected("connection refused".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 24-char hex id derived from `n`.
pub fn object_id(n: u64) -> String {
    format!("{:024x}", n)
}

/// Minimal processed record.
pub fn record(n: u64, upload_time: i64) -> InferenceRecord {
    InferenceRecord {
        id: object_id(n),
        location: Some(format!("Site {}", n)),
        image_data: None,
        upload_time,
        processed: true,
        detected_objects: vec![DetectedObject::new("Garbage", 90.0)],
        image: None,
        summary: Summary { garbage: Some(1), tilted_bin: None, upright_bin: None },
    }
}

/// `count` records with distinct, shuffled-looking timestamps.
pub fn records(count: u64) -> Vec<InferenceRecord> {
    (0..count)
        .map(|n| record(n + 1, 1_700_000_000 + ((n * 7919) % 1000) as i64 * 60))
        .collect()
}
