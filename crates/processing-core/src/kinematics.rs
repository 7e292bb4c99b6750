//! Handwriting kinematics: velocity and hesitation events.
//!
//! Velocity is measured on the raw normalized index-tip position, so it is
//! independent of surface size and of the ink smoothing.
//!
//! Hesitation has two faces:
//! - `is_hesitating` follows velocity on every frame, no memory.
//! - the hesitation *count* is debounced: a long pause below threshold
//!   counts once per debounce window, not once per frame.

use cogniscript_common::clock::TimestampMs;
use cogniscript_common::config::AnalysisConfig;
use cogniscript_scene_model::landmark::Keypoint;
use cogniscript_scene_model::status::MetricsState;

/// Position and time of one velocity sample, in normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: TimestampMs,
}

impl MotionSample {
    pub fn new(x: f64, y: f64, timestamp_ms: TimestampMs) -> Self {
        Self { x, y, timestamp_ms }
    }
}

impl From<Keypoint> for MotionSample {
    fn from(kp: Keypoint) -> Self {
        Self::new(kp.x, kp.y, kp.timestamp_ms)
    }
}

/// Distance per millisecond between two samples.
///
/// Zero when either sample is missing or time did not advance
/// (duplicate or out-of-order timestamps).
pub fn calculate_velocity(previous: Option<&MotionSample>, current: Option<&MotionSample>) -> f64 {
    let (Some(prev), Some(cur)) = (previous, current) else {
        return 0.0;
    };
    if cur.timestamp_ms <= prev.timestamp_ms {
        return 0.0;
    }
    let dt = (cur.timestamp_ms - prev.timestamp_ms) as f64;
    (cur.x - prev.x).hypot(cur.y - prev.y) / dt
}

/// Below-threshold test. Strict: a velocity equal to the threshold is motion.
pub fn is_hesitating(velocity: f64, threshold: f64) -> bool {
    velocity < threshold
}

/// Thresholds for hesitation analysis.
#[derive(Debug, Clone, Copy)]
pub struct HesitationConfig {
    /// Normalized units per millisecond.
    pub velocity_threshold: f64,
    /// Minimum time between two counted events.
    pub debounce_ms: u64,
}

impl Default for HesitationConfig {
    fn default() -> Self {
        Self {
            velocity_threshold: 0.000_05,
            debounce_ms: 1_000,
        }
    }
}

impl From<&AnalysisConfig> for HesitationConfig {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            velocity_threshold: config.hesitation_velocity_threshold,
            debounce_ms: config.hesitation_debounce_ms,
        }
    }
}

/// Velocity and hesitation state machine.
///
/// Holds configuration only; the evolving [`MetricsState`] is passed in
/// and returned by the caller.
#[derive(Debug, Clone)]
pub struct HesitationAnalyzer {
    config: HesitationConfig,
}

impl HesitationAnalyzer {
    pub fn new(config: HesitationConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(HesitationConfig::default())
    }

    pub fn config(&self) -> &HesitationConfig {
        &self.config
    }

    /// Advance the metrics by one frame.
    ///
    /// Only velocity, `is_hesitating`, the count, and the last event time
    /// change; `engaged` belongs to the pinch classifier and is kept.
    pub fn step(
        &self,
        state: &MetricsState,
        previous: Option<&MotionSample>,
        current: &MotionSample,
    ) -> MetricsState {
        let velocity = calculate_velocity(previous, Some(current));
        let hesitating = is_hesitating(velocity, self.config.velocity_threshold);
        let now = current.timestamp_ms;

        let debounce_elapsed = state
            .last_hesitation_ms
            .map_or(true, |last| now.saturating_sub(last) >= self.config.debounce_ms);

        let mut next = MetricsState {
            velocity,
            is_hesitating: hesitating,
            ..*state
        };

        if hesitating && debounce_elapsed {
            next.hesitation_count += 1;
            next.last_hesitation_ms = Some(now);
            tracing::debug!(
                count = next.hesitation_count,
                t = now,
                velocity,
                "Hesitation event"
            );
        }

        next
    }
}
