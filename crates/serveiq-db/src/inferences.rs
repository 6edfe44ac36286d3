//! Inference repository.
//!
//! Read-only queries over the inference collection.

use crate::database::Database;
use crate::error::{DbError, Result};
use crate::schema::{StoredInference, FIELD_ID, FIELD_UPLOAD_TIME};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use serveiq_common::InferenceRecord;
use std::sync::Arc;

/// Read access to stored inference records.
#[async_trait]
pub trait InferenceStore: Send + Sync {
    /// Up to `limit` records, newest `upload_time` first.
    async fn recent(&self, limit: usize) -> Result<Vec<InferenceRecord>>;

    /// Total number of stored records.
    async fn count(&self) -> Result<u64>;

    /// Look up a single record by its hex id.
    async fn find_by_id(&self, id: &str) -> Result<Option<InferenceRecord>>;
}

/// Repository for inference operations.
#[derive(Clone)]
pub struct InferenceRepository {
    db: Arc<Database>,
}

impl InferenceRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InferenceStore for InferenceRepository {
    async fn recent(&self, limit: usize) -> Result<Vec<InferenceRecord>> {
        let collection = self.db.collection::<StoredInference>()?;

        let cursor = collection
            .find(doc! {})
            .sort(doc! { FIELD_UPLOAD_TIME: -1 })
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await?;

        let docs: Vec<StoredInference> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(InferenceRecord::from).collect())
    }

    async fn count(&self) -> Result<u64> {
        let collection = self.db.collection::<StoredInference>()?;
        Ok(collection.count_documents(doc! {}).await?)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<InferenceRecord>> {
        let oid = ObjectId::parse_str(id).map_err(|_| DbError::InvalidId(id.to_string()))?;

        let collection = self.db.collection::<StoredInference>()?;
        let found = collection.find_one(doc! { FIELD_ID: oid }).await?;

        Ok(found.map(InferenceRecord::from))
    }
}
