//! Inference record model as served by `GET /api/data`.
//!
//! Field names follow the stored documents (`upload_time`, `detected_objects`,
//! `Tilted_Bin`, ...) so the JSON payload matches what the store holds.
//! Records are produced by an external ingestion process and only ever read
//! here.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};

/// Number of records returned by the recent-inferences query.
pub const RECENT_LIMIT: usize = 20;

// ---------------------------------------------------------------------------
// InferenceRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRecord {
    /// Store-assigned identifier, hex encoded.
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Raw upload payload. Passed through, never rendered.
    #[serde(rename = "imageData", default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,

    /// Unix seconds.
    #[serde(default, deserialize_with = "lenient::int")]
    pub upload_time: i64,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub processed: bool,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub detected_objects: Vec<DetectedObject>,

    /// Base64 image with detections drawn in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub summary: Summary,
}

impl InferenceRecord {
    /// Only the detections that carry both a label and a non-zero confidence.
    pub fn displayable_objects(&self) -> impl Iterator<Item = &DetectedObject> {
        self.detected_objects.iter().filter(|o| o.is_displayable())
    }
}

// ---------------------------------------------------------------------------
// DetectedObject
// ---------------------------------------------------------------------------

/// One `[label, confidence]` pair from the detector.
///
/// Stored as a two-element array whose elements may be null. The wire shape is
/// kept, but the fields are typed so the display rule can be checked.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectedObject {
    pub label: Option<String>,
    /// Percentage, usually an integer in `0..=100`.
    pub confidence: Option<f64>,
}

impl DetectedObject {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self { label: Some(label.into()), confidence: Some(confidence) }
    }

    /// A pair is shown only with a non-empty label and a present, non-zero
    /// confidence. A confidence of exactly 0 is dropped like a missing one.
    pub fn is_displayable(&self) -> bool {
        let has_label = self.label.as_deref().is_some_and(|l| !l.is_empty());
        let has_confidence = self.confidence.is_some_and(|c| c != 0.0 && !c.is_nan());
        has_label && has_confidence
    }
}

impl Serialize for DetectedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(&self.label)?;
        match self.confidence {
            Some(c) if is_integral(c) => pair.serialize_element(&Some(c as i64))?,
            other => pair.serialize_element(&other)?,
        }
        pair.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PairValue {
    Text(String),
    Number(f64),
    Other(de::IgnoredAny),
}

impl<'de> Deserialize<'de> for DetectedObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut values = Vec::<Option<PairValue>>::deserialize(deserializer)?.into_iter();

        let label = match values.next().flatten() {
            Some(PairValue::Text(s)) => Some(s),
            // A zero or NaN label counts as missing, like an empty string.
            Some(PairValue::Number(n)) if n != 0.0 && !n.is_nan() => Some(format_number(n)),
            _ => None,
        };
        let confidence = match values.next().flatten() {
            Some(PairValue::Number(n)) => Some(n),
            Some(PairValue::Text(s)) => s.trim().parse().ok(),
            _ => None,
        };

        Ok(Self { label, confidence })
    }
}

fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15
}

/// Formats a stored number the way it was written: `91` rather than `91.0`.
pub fn format_number(value: f64) -> String {
    if is_integral(value) {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Per-class detection counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "Garbage", default, deserialize_with = "lenient::opt_int", skip_serializing_if = "Option::is_none")]
    pub garbage: Option<i64>,

    #[serde(rename = "Tilted_Bin", default, deserialize_with = "lenient::opt_int", skip_serializing_if = "Option::is_none")]
    pub tilted_bin: Option<i64>,

    #[serde(rename = "Upright_Bin", default, deserialize_with = "lenient::opt_int", skip_serializing_if = "Option::is_none")]
    pub upright_bin: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryCounter {
    Garbage,
    TiltedBin,
    UprightBin,
}

impl SummaryCounter {
    pub const ALL: [SummaryCounter; 3] = [
        SummaryCounter::Garbage,
        SummaryCounter::TiltedBin,
        SummaryCounter::UprightBin,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            SummaryCounter::Garbage    => "Garbage",
            SummaryCounter::TiltedBin  => "Tilted Bin",
            SummaryCounter::UprightBin => "Upright Bin",
        }
    }
}

impl Summary {
    pub fn get(&self, counter: SummaryCounter) -> Option<i64> {
        match counter {
            SummaryCounter::Garbage    => self.garbage,
            SummaryCounter::TiltedBin  => self.tilted_bin,
            SummaryCounter::UprightBin => self.upright_bin,
        }
    }

    /// Counters that are present and non-zero, in display order.
    pub fn visible_counts(&self) -> Vec<(SummaryCounter, i64)> {
        SummaryCounter::ALL
            .into_iter()
            .filter_map(|c| self.get(c).filter(|n| *n != 0).map(|n| (c, n)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

/// Deserializers tolerant of how the ingestion side writes numbers and nulls.
pub mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Numeric {
        Int(i64),
        Float(f64),
    }

    impl Numeric {
        fn truncate(self) -> i64 {
            match self {
                Numeric::Int(v) => v,
                Numeric::Float(v) => v as i64,
            }
        }
    }

    /// Integer field that may have been stored as a double. Null reads as 0.
    pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Option::<Numeric>::deserialize(deserializer).map(|n| n.map_or(0, Numeric::truncate))
    }

    pub fn opt_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        Option::<Numeric>::deserialize(deserializer).map(|n| n.map(Numeric::truncate))
    }

    /// Treats an explicit null like a missing field.
    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
    }
}
