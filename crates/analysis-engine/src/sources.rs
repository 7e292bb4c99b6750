//! Input sources: where hand observations and object detections come from.
//!
//! Live backends (a camera plus pose and detection models) sit outside this
//! crate. The replay sources here feed recorded JSONL streams through the
//! same interfaces.

use std::collections::VecDeque;
use std::path::Path;

use cogniscript_common::clock::TimestampMs;
use cogniscript_common::error::{CogniscriptError, CogniscriptResult};
use cogniscript_scene_model::detection::{parse_detection_records, DetectedObject, DetectionRecord};
use cogniscript_scene_model::geometry::FrameSize;
use cogniscript_scene_model::landmark::{parse_observations, HandObservation};

/// A stream of hand-pose results, delivered serially.
pub trait HandPoseSource: Send {
    /// Next observation, or `None` once the stream is exhausted.
    ///
    /// A frame with no hand is a normal observation, not an error.
    fn poll(&mut self) -> CogniscriptResult<Option<HandObservation>>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// The video frame a detection request runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRef {
    pub timestamp_ms: TimestampMs,
    pub size: FrameSize,
}

impl FrameRef {
    pub fn new(timestamp_ms: TimestampMs, size: FrameSize) -> Self {
        Self { timestamp_ms, size }
    }
}

/// An object detector. Comparatively slow; called at a throttled rate.
#[async_trait::async_trait]
pub trait ObjectDetector: Send + Sync {
    /// Detect objects in a frame. Boxes are in source-frame pixels.
    async fn detect(&self, frame: FrameRef) -> CogniscriptResult<Vec<DetectedObject>>;

    /// Detector name for logging.
    fn name(&self) -> &str;
}

fn read_replay_file(path: &Path) -> CogniscriptResult<String> {
    if !path.exists() {
        return Err(CogniscriptError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Replays hand observations recorded as JSONL.
#[derive(Debug)]
pub struct JsonlHandSource {
    name: String,
    pending: VecDeque<HandObservation>,
}

impl JsonlHandSource {
    /// Load a recording from disk.
    pub fn open(path: &Path) -> CogniscriptResult<Self> {
        let content = read_replay_file(path)?;
        let observations = parse_observations(&content).map_err(|e| {
            CogniscriptError::hand_pose(format!("{}: {e}", path.display()))
        })?;
        tracing::debug!(
            path = %path.display(),
            frames = observations.len(),
            "Loaded hand observations"
        );
        Ok(Self::from_observations(
            path.display().to_string(),
            observations,
        ))
    }

    pub fn from_observations(name: impl Into<String>, observations: Vec<HandObservation>) -> Self {
        Self {
            name: name.into(),
            pending: observations.into(),
        }
    }

    /// Observations not yet polled.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl HandPoseSource for JsonlHandSource {
    fn poll(&mut self) -> CogniscriptResult<Option<HandObservation>> {
        Ok(self.pending.pop_front())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Replays recorded detector output.
///
/// Answers each request with the latest record at or before the frame time.
/// A `failed` record reproduces the detector failure as an error.
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    name: String,
    records: Vec<DetectionRecord>,
}

impl ReplayDetector {
    pub fn open(path: &Path) -> CogniscriptResult<Self> {
        let content = read_replay_file(path)?;
        let records = parse_detection_records(&content).map_err(|e| {
            CogniscriptError::detection(format!("{}: {e}", path.display()))
        })?;
        tracing::debug!(
            path = %path.display(),
            records = records.len(),
            "Loaded detection records"
        );
        Ok(Self::from_records(path.display().to_string(), records))
    }

    pub fn from_records(name: impl Into<String>, mut records: Vec<DetectionRecord>) -> Self {
        // Stable sort keeps file order among equal timestamps.
        records.sort_by_key(|r| r.timestamp_ms);
        Self {
            name: name.into(),
            records,
        }
    }

    /// The record answering a request at `t`, if any.
    pub fn record_at(&self, t: TimestampMs) -> Option<&DetectionRecord> {
        let idx = self.records.partition_point(|r| r.timestamp_ms <= t);
        idx.checked_sub(1).map(|i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait::async_trait]
impl ObjectDetector for ReplayDetector {
    async fn detect(&self, frame: FrameRef) -> CogniscriptResult<Vec<DetectedObject>> {
        match self.record_at(frame.timestamp_ms) {
            None => Ok(Vec::new()),
            Some(record) if record.failed => Err(CogniscriptError::detection(format!(
                "recorded detector failure at t={}",
                record.timestamp_ms
            ))),
            Some(record) => Ok(record.objects.clone()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
