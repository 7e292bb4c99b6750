//! Scene snapshots and their publication.

use std::sync::Arc;

use tokio::sync::watch;

use cogniscript_processing_core::tool_proximity::{find_nearest_tool, ToolClassSet};
use cogniscript_scene_model::detection::DetectedObject;
use cogniscript_scene_model::geometry::Point2D;
use cogniscript_scene_model::status::{SceneStatus, ToolLabel};

/// Combine hand presence and a detection result into one snapshot.
///
/// The tool is only looked for while a hand is visible, measured from the
/// wrist in source pixels. The object list is carried over whole.
pub fn aggregate_scene(
    hand_visible: bool,
    wrist_px: Option<Point2D>,
    objects: Vec<DetectedObject>,
    classes: &ToolClassSet,
) -> SceneStatus {
    let tool = wrist_px
        .filter(|_| hand_visible)
        .and_then(|wrist| find_nearest_tool(&objects, wrist, classes))
        .map(|found| found.object.label.clone());

    SceneStatus {
        hand_visible,
        tool_visible: tool.is_some(),
        tool_label: tool.map_or(ToolLabel::NotSeen, |label| ToolLabel::identified(&label)),
        detected_objects: objects,
    }
}

/// Single-writer handoff of scene snapshots to any number of readers.
///
/// Readers always see a whole snapshot: each publish swaps in a new `Arc`.
#[derive(Debug)]
pub struct ScenePublisher {
    tx: watch::Sender<Arc<SceneStatus>>,
}

impl ScenePublisher {
    /// Start with the "searching" snapshot.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(SceneStatus::default()));
        Self { tx }
    }

    pub fn publish(&self, status: SceneStatus) -> Arc<SceneStatus> {
        let status = Arc::new(status);
        self.tx.send_replace(Arc::clone(&status));
        status
    }

    pub fn current(&self) -> Arc<SceneStatus> {
        Arc::clone(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<SceneStatus>> {
        self.tx.subscribe()
    }
}

impl Default for ScenePublisher {
    fn default() -> Self {
        Self::new()
    }
}
