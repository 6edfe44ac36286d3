//! Per-record view model: the strings a tile or the detail modal shows.

use chrono::TimeZone;
use serde::Serialize;
use serveiq_common::record::format_number;
use serveiq_common::{InferenceRecord, Summary};
use std::fmt::Display;

pub const UNKNOWN_LOCATION: &str = "Unknown";
pub const NO_OBJECTS: &str = "None";

/// Shown when the timestamp is outside the representable range.
pub const INVALID_DATE: &str = "Invalid Date";

/// Everything the template needs for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileView {
    pub index: usize,
    pub id: String,
    pub image_src: String,
    pub uploaded_at: String,
    pub location: String,
    pub objects: String,
    pub summary: Vec<String>,
}

impl TileView {
    pub fn from_record<Tz>(index: usize, record: &InferenceRecord, placeholder: &str, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            index,
            id: record.id.clone(),
            image_src: image_src(record, placeholder),
            uploaded_at: format_upload_time(record.upload_time, tz),
            location: location_label(record).to_string(),
            objects: objects_label(record),
            summary: summary_lines(&record.summary),
        }
    }
}

pub fn image_src(record: &InferenceRecord, placeholder: &str) -> String {
    match record.image.as_deref() {
        Some(b64) if !b64.is_empty() => format!("data:image/png;base64,{}", b64),
        _ => placeholder.to_string(),
    }
}

pub fn location_label(record: &InferenceRecord) -> &str {
    match record.location.as_deref() {
        Some(loc) if !loc.is_empty() => loc,
        _ => UNKNOWN_LOCATION,
    }
}

/// `" (label, confidence%)"` for each displayable pair, comma-joined.
pub fn objects_label(record: &InferenceRecord) -> String {
    let pairs: Vec<String> = record
        .displayable_objects()
        .filter_map(|o| match (&o.label, o.confidence) {
            (Some(label), Some(conf)) => Some(format!(" ({}, {}%)", label, format_number(conf))),
            _ => None,
        })
        .collect();

    if pairs.is_empty() {
        NO_OBJECTS.to_string()
    } else {
        pairs.join(", ")
    }
}

pub fn summary_lines(summary: &Summary) -> Vec<String> {
    summary
        .visible_counts()
        .into_iter()
        .map(|(counter, n)| format!("{}: {}", counter.display_name(), n))
        .collect()
}

/// Local-style `M/D/YYYY, h:mm:ss AM` rendering of Unix seconds in `tz`.
pub fn format_upload_time<Tz>(secs: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match tz.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serveiq_common::DetectedObject;

    const PLACEHOLDER: &str = "https://via.placeholder.com/200";

    fn sample() -> InferenceRecord {
        InferenceRecord {
            id: "65f1c2a9e4b0a1b2c3d4e5f6".to_string(),
            location: None,
            image_data: None,
            upload_time: 1_710_000_000,
            processed: true,
            detected_objects: vec![
                DetectedObject::new("Garbage", 91.0),
                DetectedObject::default(),
                DetectedObject::new("Upright_Bin", 0.0),
            ],
            image: None,
            summary: Summary { garbage: Some(0), tilted_bin: Some(3), upright_bin: Some(0) },
        }
    }

    #[test]
    fn test_objects_label_drops_invalid_pairs() {
        assert_eq!(objects_label(&sample()), " (Garbage, 91%)");
    }

    #[test]
    fn test_objects_label_joins_and_falls_back_to_none() {
        let mut record = sample();
        record.detected_objects.push(DetectedObject::new("Tilted_Bin", 47.5));
        assert_eq!(objects_label(&record), " (Garbage, 91%),  (Tilted_Bin, 47.5%)");

        record.detected_objects.clear();
        assert_eq!(objects_label(&record), "None");
    }

    #[test]
    fn test_summary_shows_only_non_zero_counters() {
        assert_eq!(summary_lines(&sample().summary), vec!["Tilted Bin: 3".to_string()]);
        assert!(summary_lines(&Summary::default()).is_empty());
    }

    #[test]
    fn test_image_src_uses_placeholder_or_data_uri() {
        let mut record = sample();
        assert_eq!(image_src(&record, PLACEHOLDER), PLACEHOLDER);

        record.image = Some("iVBORw0KGgo".to_string());
        assert_eq!(image_src(&record, PLACEHOLDER), "data:image/png;base64,iVBORw0KGgo");
    }

    #[test]
    fn test_location_defaults_to_unknown() {
        let mut record = sample();
        assert_eq!(location_label(&record), "Unknown");
        record.location = Some("Block C".to_string());
        assert_eq!(location_label(&record), "Block C");
    }

    #[test]
    fn test_upload_time_formatting() {
        assert_eq!(format_upload_time(1_710_000_000, &Utc), "3/9/2024, 4:00:00 PM");
        assert_eq!(format_upload_time(i64::MAX, &Utc), INVALID_DATE);
    }

    #[test]
    fn test_tile_view_collects_all_fields() {
        let tile = TileView::from_record(4, &sample(), PLACEHOLDER, &Utc);
        assert_eq!(tile.index, 4);
        assert_eq!(tile.image_src, PLACEHOLDER);
        assert_eq!(tile.location, "Unknown");
        assert_eq!(tile.objects, " (Garbage, 91%)");
        assert_eq!(tile.summary, vec!["Tilted Bin: 3".to_string()]);
        assert_eq!(tile.uploaded_at, "3/9/2024, 4:00:00 PM");
    }
}
