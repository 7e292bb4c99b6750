//! Cogniscript Scene Model
//!
//! Defines the data contracts shared by the analysis pipeline:
//! - **Geometry:** points, frame sizes, and bounding boxes
//! - **Landmarks:** per-frame hand keypoints and observations
//! - **Detections:** object-detector results
//! - **Status:** scene snapshots, metrics, and the hand state machine
//!
//! Hand keypoints are normalized to `[0.0, 1.0]` relative to the source
//! frame. Object boxes are in source-frame pixels, as detectors report them.

pub mod detection;
pub mod geometry;
pub mod landmark;
pub mod status;

pub use detection::*;
pub use geometry::*;
pub use landmark::*;
pub use status::*;
