//! Hand keypoints and hand-pose observations.
//!
//! Observations are stored one per line (JSONL) so a live session can be
//! recorded and replayed:
//!
//! ```text
//! {"t":0,"hand":[{"x":0.41,"y":0.52},{"x":0.44,"y":0.50}, ...]}
//! {"t":33,"hand":null}
//! ```
//!
//! The array index of a landmark is its anatomical role.

use cogniscript_common::clock::TimestampMs;
use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

/// Landmark indices, MediaPipe hand model convention.
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    /// Number of landmarks in a full hand.
    pub const COUNT: usize = 21;
}

/// One landmark as delivered by the hand-pose source.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized X in the source frame.
    pub x: f64,
    /// Normalized Y in the source frame.
    pub y: f64,
    /// Relative depth, when the source provides it.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub z: f64,
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// A single anatomical landmark for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// Anatomical role (see [`landmarks`]).
    pub index: usize,
    /// Normalized X in the source frame.
    pub x: f64,
    /// Normalized Y in the source frame.
    pub y: f64,
    /// Capture time.
    pub timestamp_ms: TimestampMs,
}

impl Keypoint {
    /// Normalized position.
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// Result of one hand-pose call: zero or one hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    /// Capture time.
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,

    /// Ordered landmarks, or `None` when no hand was found.
    #[serde(default)]
    pub hand: Option<Vec<Landmark>>,
}

impl HandObservation {
    /// Observation with a hand.
    pub fn with_hand(timestamp_ms: TimestampMs, hand: Vec<Landmark>) -> Self {
        Self {
            timestamp_ms,
            hand: Some(hand),
        }
    }

    /// Observation in which no hand was found.
    pub fn empty(timestamp_ms: TimestampMs) -> Self {
        Self {
            timestamp_ms,
            hand: None,
        }
    }

    /// Whether this frame yielded a usable hand.
    ///
    /// An empty landmark list counts as no hand.
    pub fn has_hand(&self) -> bool {
        self.hand.as_ref().is_some_and(|h| !h.is_empty())
    }

    /// Look up a landmark by index.
    pub fn keypoint(&self, index: usize) -> Option<Keypoint> {
        let lm = self.hand.as_ref()?.get(index)?;
        Some(Keypoint {
            index,
            x: lm.x,
            y: lm.y,
            timestamp_ms: self.timestamp_ms,
        })
    }

    /// All landmarks as keypoints, in index order.
    pub fn keypoints(&self) -> Vec<Keypoint> {
        self.hand
            .iter()
            .flatten()
            .enumerate()
            .map(|(index, lm)| Keypoint {
                index,
                x: lm.x,
                y: lm.y,
                timestamp_ms: self.timestamp_ms,
            })
            .collect()
    }
}

/// Parse observations from JSONL content (one JSON object per line).
///
/// Blank lines and `#` comment lines are skipped.
pub fn parse_observations(jsonl: &str) -> Result<Vec<HandObservation>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize observations to JSONL format.
pub fn serialize_observations(
    observations: &[HandObservation],
) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for obs in observations {
        output.push_str(&serde_json::to_string(obs)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_hand() -> Vec<Landmark> {
        (0..landmarks::COUNT)
            .map(|i| Landmark::new(i as f64 / 100.0, 0.5))
            .collect()
    }

    #[test]
    fn test_keypoint_lookup() {
        let obs = HandObservation::with_hand(1_000, full_hand());
        let tip = obs.keypoint(landmarks::INDEX_TIP).unwrap();
        assert_eq!(tip.index, 8);
        assert!((tip.x - 0.08).abs() < 1e-12);
        assert_eq!(tip.timestamp_ms, 1_000);
        assert!(obs.keypoint(42).is_none());
        assert_eq!(obs.keypoints().len(), landmarks::COUNT);
    }

    #[test]
    fn test_empty_observation_has_no_keypoints() {
        let obs = HandObservation::empty(5);
        assert!(!obs.has_hand());
        assert!(obs.keypoint(landmarks::WRIST).is_none());
        assert!(obs.keypoints().is_empty());

        let blank = HandObservation::with_hand(5, vec![]);
        assert!(!blank.has_hand());
    }

    #[test]
    fn test_parse_observations_handles_null_and_missing_hand() {
        let jsonl = "# recorded session\n\
                     {\"t\":0,\"hand\":[{\"x\":0.5,\"y\":0.25}]}\n\
                     \n\
                     {\"t\":33,\"hand\":null}\n\
                     {\"t\":66}\n";
        let parsed = parse_observations(jsonl).unwrap();
        assert_eq!(parsed.len(), 3);
        assert!(parsed[0].has_hand());
        assert!(!parsed[1].has_hand());
        assert!(!parsed[2].has_hand());
        assert_eq!(parsed[2].timestamp_ms, 66);
    }

    #[test]
    fn test_jsonl_format() {
        let obs = vec![HandObservation::with_hand(12, vec![Landmark::new(0.5, 0.3)])];
        let jsonl = serialize_observations(&obs).unwrap();
        assert!(jsonl.contains("\"t\":12"));
        assert!(!jsonl.contains("\"z\""));
        assert_eq!(parse_observations(&jsonl).unwrap(), obs);
    }
}
