//! Object detector results.

use cogniscript_common::clock::TimestampMs;
use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;

/// One object reported by the detector.
///
/// Sets of these are replaced wholesale on each refresh; no identity is
/// carried from one refresh to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Class label as the detector names it.
    #[serde(rename = "class")]
    pub label: String,

    /// Confidence in [0, 1].
    #[serde(default)]
    pub score: f64,

    /// Bounding box in source-frame pixels.
    pub bbox: BoundingBox,
}

impl DetectedObject {
    pub fn new(label: impl Into<String>, score: f64, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            score,
            bbox,
        }
    }
}

/// A recorded detector result, used to replay a session offline.
///
/// ```text
/// {"t":500,"objects":[{"class":"pencil","score":0.71,"bbox":[410,220,60,18]}]}
/// {"t":1000,"failed":true}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Frame time the detector ran on.
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,

    #[serde(default)]
    pub objects: Vec<DetectedObject>,

    /// The detector call failed for this frame.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
}

/// Parse detection records from JSONL content.
pub fn parse_detection_records(jsonl: &str) -> Result<Vec<DetectionRecord>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detected_object_uses_coco_field_names() {
        let raw = r#"{"class":"cell phone","score":0.8,"bbox":[1,2,3,4]}"#;
        let obj: DetectedObject = serde_json::from_str(raw).unwrap();
        assert_eq!(obj.label, "cell phone");
        assert_eq!(obj.bbox, BoundingBox::new(1.0, 2.0, 3.0, 4.0));

        let json = serde_json::to_string(&obj).unwrap();
        assert!(json.contains("\"class\":\"cell phone\""));
    }

    #[test]
    fn test_parse_detection_records() {
        let jsonl = "{\"t\":0,\"objects\":[]}\n\
                     {\"t\":500,\"objects\":[{\"class\":\"pencil\",\"bbox\":[0,0,10,10]}]}\n\
                     {\"t\":1000,\"failed\":true}\n";
        let records = parse_detection_records(jsonl).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].objects.is_empty());
        assert_eq!(records[1].objects[0].score, 0.0);
        assert!(records[2].failed);
        assert!(records[2].objects.is_empty());
    }
}
