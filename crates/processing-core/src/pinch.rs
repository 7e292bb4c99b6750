//! Pinch detection: the "pen down" gesture.
//!
//! Thumb tip and index tip closer than a pixel threshold means the user is
//! writing. There is no hysteresis here; a hand hovering right at the
//! threshold will flicker between states frame to frame.

use cogniscript_scene_model::geometry::Point2D;

/// Outcome of one pinch check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchReading {
    /// Distance between the two tips, in the pixel space they were given in.
    pub distance_px: f64,
    /// `distance_px < threshold`.
    pub engaged: bool,
}

/// Classify two fingertip positions that share one pixel space.
pub fn classify_pinch(thumb_tip: Point2D, index_tip: Point2D, threshold_px: f64) -> PinchReading {
    let distance_px = thumb_tip.distance_to(&index_tip);
    PinchReading {
        distance_px,
        engaged: distance_px < threshold_px,
    }
}
