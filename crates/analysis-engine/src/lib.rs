//! Cogniscript Analysis Engine
//!
//! Drives the per-frame pipeline for one tracked hand and keeps the scene
//! snapshot current:
//!
//! - [`session`] owns the mutable state and runs each tracking pass
//! - [`scheduler`] throttles object detection and never blocks tracking
//! - [`scene`] builds and publishes scene snapshots
//! - [`sources`] defines the hand-pose and detector interfaces, with replay
//!   implementations over recorded JSONL
//! - [`replay`] runs a recorded session end to end

pub mod replay;
pub mod scene;
pub mod scheduler;
pub mod session;
pub mod sources;

pub use replay::replay_observations;
pub use scene::{aggregate_scene, ScenePublisher};
pub use scheduler::{DetectionRefresh, DetectionScheduler};
pub use session::{AnalysisSession, FrameReport, SessionSummary};
pub use sources::{FrameRef, HandPoseSource, JsonlHandSource, ObjectDetector, ReplayDetector};
