//! Stored document shape for the inference collection.
//!
//! The store-side type keeps `_id` as an `ObjectId`; it is converted into the
//! shared [`InferenceRecord`] before leaving this crate.

use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serveiq_common::record::lenient;
use serveiq_common::{DetectedObject, InferenceRecord, Summary};

pub const FIELD_ID: &str = "_id";
pub const FIELD_UPLOAD_TIME: &str = "upload_time";

/// One document as written by the upload and detection services.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredInference {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(rename = "imageData", default)]
    pub image_data: Option<String>,

    #[serde(default, deserialize_with = "lenient::int")]
    pub upload_time: i64,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub processed: bool,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub detected_objects: Vec<DetectedObject>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub summary: Summary,
}

impl From<StoredInference> for InferenceRecord {
    fn from(doc: StoredInference) -> Self {
        InferenceRecord {
            id: doc.id.to_hex(),
            location: doc.location,
            image_data: doc.image_data,
            upload_time: doc.upload_time,
            processed: doc.processed,
            detected_objects: doc.detected_objects,
            image: doc.image,
            summary: doc.summary,
        }
    }
}
