//! The analysis session: one tracked hand, one ink surface.
//!
//! Each hand observation makes a single synchronous pass:
//!
//! ```text
//! observation ── map (letterbox) ── smooth ──┬── stroke ── surface
//!      │                                     │
//!      ├── velocity / hesitation ── color ───┘
//!      └── pinch (display px) ── engaged ────┘
//! ```
//!
//! Detection refreshes arrive from the [`DetectionScheduler`]. A pass
//! collects a finished one before tracking and folds it in afterwards, so
//! the snapshot reflects the hand of that frame. Snapshots are published
//! through a [`ScenePublisher`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use cogniscript_common::clock::TimestampMs;
use cogniscript_common::config::{AnalysisConfig, OverlayConfig};
use cogniscript_processing_core::color::velocity_color;
use cogniscript_processing_core::kinematics::{HesitationAnalyzer, HesitationConfig, MotionSample};
use cogniscript_processing_core::letterbox::CoordinateMapper;
use cogniscript_processing_core::pinch::classify_pinch;
use cogniscript_processing_core::smoothing::KeypointSmoother;
use cogniscript_processing_core::tool_proximity::ToolClassSet;
use cogniscript_render_engine::overlay::{compose_overlay, OverlayFrame, OverlayInput};
use cogniscript_render_engine::stroke::{Segment, StrokeAccumulator, StrokeSurface};
use cogniscript_scene_model::geometry::{FrameSize, MirrorMode, Point2D};
use cogniscript_scene_model::landmark::{landmarks, HandObservation, Keypoint};
use cogniscript_scene_model::status::{HandState, MetricsState, SceneStatus};

use crate::scene::{aggregate_scene, ScenePublisher};
use crate::scheduler::{DetectionRefresh, DetectionScheduler};
use crate::sources::FrameRef;

/// What one tracking pass produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub timestamp_ms: TimestampMs,
    pub hand_state: HandState,
    pub metrics: MetricsState,
    /// Smoothed ink point in surface pixels.
    pub cursor: Option<Point2D>,
    /// Thumb to index distance in surface pixels.
    pub pinch_distance_px: Option<f64>,
    /// Ink drawn this frame.
    pub segment: Option<Segment>,
    /// A detection refresh was applied during this pass.
    pub scene_refreshed: bool,
    /// Mapping was not ready, so nothing was drawn.
    pub geometry_skipped: bool,
}

/// End-of-session totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub frames_processed: u64,
    pub hand_frames: u64,
    pub engaged_frames: u64,
    pub segments_drawn: u64,
    pub hesitation_count: u64,
    pub detection_refreshes: u64,
    pub failed_detections: u64,
    pub first_frame_ms: Option<TimestampMs>,
    pub last_frame_ms: Option<TimestampMs>,
    pub scene: SceneStatus,
}

impl SessionSummary {
    pub fn duration_ms(&self) -> u64 {
        match (self.first_frame_ms, self.last_frame_ms) {
            (Some(first), Some(last)) => last.saturating_sub(first),
            _ => 0,
        }
    }

    /// Share of frames in which a hand was tracked.
    pub fn hand_coverage(&self) -> f64 {
        if self.frames_processed == 0 {
            return 0.0;
        }
        self.hand_frames as f64 / self.frames_processed as f64
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SessionStats {
    frames: u64,
    hand_frames: u64,
    engaged_frames: u64,
    segments: u64,
    refreshes: u64,
    failed_refreshes: u64,
    first_ms: Option<TimestampMs>,
    last_ms: Option<TimestampMs>,
}

/// The landmarks every pass needs.
struct HandPoints {
    thumb_tip: Keypoint,
    index_tip: Keypoint,
}

impl HandPoints {
    fn from_observation(observation: &HandObservation) -> Option<Self> {
        Some(Self {
            thumb_tip: observation.keypoint(landmarks::THUMB_TIP)?,
            index_tip: observation.keypoint(landmarks::INDEX_TIP)?,
        })
    }
}

/// Owns all mutable per-session state and threads it through the pure
/// processing steps.
pub struct AnalysisSession {
    config: AnalysisConfig,
    mirror: MirrorMode,
    tool_classes: ToolClassSet,
    mapper: CoordinateMapper,
    smoother: KeypointSmoother,
    analyzer: HesitationAnalyzer,
    strokes: StrokeAccumulator,
    surface: StrokeSurface,
    metrics: MetricsState,
    hand_state: HandState,
    previous_motion: Option<MotionSample>,
    /// Latest frame that had a hand, for tool association.
    last_hand: Option<HandObservation>,
    cursor: Option<Point2D>,
    scheduler: Option<DetectionScheduler>,
    scene: ScenePublisher,
    stats: SessionStats,
    warned_not_ready: bool,
}

impl AnalysisSession {
    /// New session. Sizes start at zero; set them before expecting ink.
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            mirror: MirrorMode::from_flag(config.mirror_horizontal),
            tool_classes: ToolClassSet::new(config.tool_classes.iter().cloned()),
            mapper: CoordinateMapper::default(),
            smoother: KeypointSmoother::new(config.smoothing_alpha),
            analyzer: HesitationAnalyzer::new(HesitationConfig::from(&config)),
            strokes: StrokeAccumulator::new(config.stroke_width),
            surface: StrokeSurface::new(FrameSize::default()),
            metrics: MetricsState::default(),
            hand_state: HandState::NoHand,
            previous_motion: None,
            last_hand: None,
            cursor: None,
            scheduler: None,
            scene: ScenePublisher::new(),
            stats: SessionStats::default(),
            warned_not_ready: false,
            config,
        }
    }

    /// Attach a detection scheduler. Without one the scene stays "searching".
    pub fn with_scheduler(mut self, scheduler: DetectionScheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Video frame size changed (e.g. stream metadata arrived).
    pub fn set_source_size(&mut self, size: FrameSize) {
        if self.mapper.set_source(size) {
            self.restart_stroke();
        }
    }

    /// Drawing surface size changed. Clears the ink, like a canvas resize.
    pub fn resize_surface(&mut self, size: FrameSize) {
        if self.mapper.set_dest(size) {
            self.restart_stroke();
        }
        self.surface.resize(size);
    }

    pub fn source_size(&self) -> FrameSize {
        self.mapper.source()
    }

    pub fn surface_size(&self) -> FrameSize {
        self.mapper.dest()
    }

    /// Run one tracking pass.
    pub fn process_observation(
        &mut self,
        observation: &HandObservation,
        now_ms: TimestampMs,
    ) -> FrameReport {
        let refresh = self.poll_detection(now_ms);
        let mut report = self.track(observation, now_ms);
        if let Some(refresh) = refresh {
            self.apply_detection_refresh(refresh, now_ms);
            report.scene_refreshed = true;
        }
        report
    }

    fn track(&mut self, observation: &HandObservation, now_ms: TimestampMs) -> FrameReport {
        self.stats.frames += 1;
        self.stats.first_ms.get_or_insert(now_ms);
        self.stats.last_ms = Some(now_ms);

        let Some(points) = HandPoints::from_observation(observation) else {
            if observation.has_hand() {
                tracing::debug!(t = now_ms, "Hand without required landmarks, treating as absent");
            }
            self.hand_lost(now_ms);
            return self.report(now_ms, None, None, false);
        };

        self.stats.hand_frames += 1;
        self.last_hand = Some(observation.clone());

        let motion = MotionSample::from(points.index_tip);
        self.metrics = self
            .analyzer
            .step(&self.metrics, self.previous_motion.as_ref(), &motion);
        self.previous_motion = Some(motion);

        let Some(transform) = self.mapper.transform().copied() else {
            if !self.warned_not_ready {
                tracing::warn!(
                    source_w = self.mapper.source().width,
                    source_h = self.mapper.source().height,
                    surface_w = self.mapper.dest().width,
                    surface_h = self.mapper.dest().height,
                    "Frame geometry not ready, skipping drawing"
                );
                self.warned_not_ready = true;
            }
            self.metrics.engaged = false;
            self.set_hand_state(HandState::next(true, false), now_ms);
            self.restart_stroke();
            return self.report(now_ms, None, None, true);
        };
        self.warned_not_ready = false;

        let thumb_px = transform.map_normalized(points.thumb_tip.x, points.thumb_tip.y, self.mirror);
        let index_px = transform.map_normalized(points.index_tip.x, points.index_tip.y, self.mirror);
        let pinch = classify_pinch(thumb_px, index_px, self.config.pinch_threshold_px);
        self.metrics.engaged = pinch.engaged;
        self.set_hand_state(HandState::next(true, pinch.engaged), now_ms);

        let smoothed = self.smoother.update(index_px);
        self.cursor = Some(smoothed);

        let color = velocity_color(self.metrics.velocity, self.config.velocity_color_gain);
        let segment = self.strokes.apply(
            &mut self.surface,
            smoothed,
            self.hand_state.permits_ink(),
            color,
        );
        if self.hand_state.permits_ink() {
            self.stats.engaged_frames += 1;
        }
        if segment.is_some() {
            self.stats.segments += 1;
        }

        self.report(now_ms, segment, Some(pinch.distance_px), false)
    }

    /// Fold a detection result into a new scene snapshot and publish it.
    pub fn apply_detection_refresh(
        &mut self,
        refresh: DetectionRefresh,
        now_ms: TimestampMs,
    ) -> Arc<SceneStatus> {
        self.stats.refreshes += 1;
        if refresh.failed {
            self.stats.failed_refreshes += 1;
        }

        let hand_visible = self.hand_state.hand_present();
        let source = self.mapper.source();
        let wrist_px = self
            .last_hand
            .as_ref()
            .and_then(|obs| obs.keypoint(landmarks::WRIST))
            .map(|wrist| source.denormalize(wrist.x, wrist.y));

        let status = aggregate_scene(hand_visible, wrist_px, refresh.objects, &self.tool_classes);
        tracing::debug!(
            t = now_ms,
            requested = refresh.requested_ms,
            hand_visible = status.hand_visible,
            tool = %status.tool_label,
            objects = status.detected_objects.len(),
            "Scene refreshed"
        );
        self.scene.publish(status)
    }

    /// Wait for an in-flight detection and apply it.
    ///
    /// Offline replay uses this to make detection timing deterministic.
    pub async fn settle_detection(&mut self, now_ms: TimestampMs) -> Option<Arc<SceneStatus>> {
        let refresh = self.scheduler.as_mut()?.settle().await?;
        Some(self.apply_detection_refresh(refresh, now_ms))
    }

    pub fn metrics(&self) -> MetricsState {
        self.metrics
    }

    /// Latest published scene snapshot.
    pub fn scene(&self) -> Arc<SceneStatus> {
        self.scene.current()
    }

    pub fn subscribe_scene(&self) -> watch::Receiver<Arc<SceneStatus>> {
        self.scene.subscribe()
    }

    pub fn hand_state(&self) -> HandState {
        self.hand_state
    }

    pub fn cursor(&self) -> Option<Point2D> {
        self.cursor
    }

    pub fn surface(&self) -> &StrokeSurface {
        &self.surface
    }

    /// Wipe the ink. Tracking state is untouched, but the current stroke
    /// restarts so nothing bridges the cleared area.
    pub fn reset_surface(&mut self) {
        self.surface.clear();
        self.strokes.lift();
        tracing::info!("Stroke surface cleared");
    }

    /// Overlay instructions for the current state, `None` while the mapping
    /// is not ready.
    pub fn overlay_frame(&self, config: &OverlayConfig) -> Option<OverlayFrame> {
        let transform = self.mapper.transform()?;
        let scene = self.scene();
        Some(compose_overlay(&OverlayInput {
            transform,
            mirror: self.mirror,
            objects: &scene.detected_objects,
            tool_classes: &self.tool_classes,
            observation: self.last_hand.as_ref(),
            cursor: self.cursor,
            engaged: self.hand_state.permits_ink(),
            config,
        }))
    }

    /// Current totals, without ending anything.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            frames_processed: self.stats.frames,
            hand_frames: self.stats.hand_frames,
            engaged_frames: self.stats.engaged_frames,
            segments_drawn: self.stats.segments,
            hesitation_count: self.metrics.hesitation_count,
            detection_refreshes: self.stats.refreshes,
            failed_detections: self.stats.failed_refreshes,
            first_frame_ms: self.stats.first_ms,
            last_frame_ms: self.stats.last_ms,
            scene: (*self.scene()).clone(),
        }
    }

    /// Stop tracking. Metrics and the tracked point return to defaults;
    /// the ink stays on the surface for export.
    pub fn end_session(&mut self) -> SessionSummary {
        let summary = self.summary();
        self.metrics = MetricsState::default();
        self.hand_state = HandState::NoHand;
        self.previous_motion = None;
        self.last_hand = None;
        self.cursor = None;
        self.smoother.reset();
        self.strokes.lift();

        tracing::info!(
            frames = summary.frames_processed,
            hand_frames = summary.hand_frames,
            segments = summary.segments_drawn,
            hesitations = summary.hesitation_count,
            duration_ms = summary.duration_ms(),
            "Analysis session ended"
        );
        summary
    }

    fn poll_detection(&mut self, now_ms: TimestampMs) -> Option<DetectionRefresh> {
        let frame = FrameRef::new(now_ms, self.mapper.source());
        self.scheduler
            .as_mut()
            .and_then(|scheduler| scheduler.poll(now_ms, frame))
    }

    fn hand_lost(&mut self, now_ms: TimestampMs) {
        self.metrics = self.metrics.after_hand_lost();
        self.previous_motion = None;
        self.last_hand = None;
        self.cursor = None;
        self.smoother.reset();
        self.strokes.lift();
        self.set_hand_state(HandState::NoHand, now_ms);
    }

    fn restart_stroke(&mut self) {
        self.smoother.reset();
        self.strokes.lift();
        self.cursor = None;
    }

    fn set_hand_state(&mut self, next: HandState, now_ms: TimestampMs) {
        if next != self.hand_state {
            tracing::debug!(t = now_ms, from = ?self.hand_state, to = ?next, "Hand state changed");
            self.hand_state = next;
        }
    }

    fn report(
        &self,
        now_ms: TimestampMs,
        segment: Option<Segment>,
        pinch_distance_px: Option<f64>,
        geometry_skipped: bool,
    ) -> FrameReport {
        FrameReport {
            timestamp_ms: now_ms,
            hand_state: self.hand_state,
            metrics: self.metrics,
            cursor: self.cursor,
            pinch_distance_px,
            segment,
            scene_refreshed: false,
            geometry_skipped,
        }
    }
}
