//! Ink point smoothing.
//!
//! Hand landmarks jitter by a few pixels from frame to frame even when the
//! hand is still. A one-pole low-pass (exponential moving average) takes
//! the edge off before the point is used for ink.

use cogniscript_scene_model::geometry::Point2D;

/// One EMA step: `previous + alpha * (current - previous)`.
///
/// With no previous point the current one is returned unchanged (cold
/// start). `alpha` is clamped to `(0, 1]`; `1.0` passes `current` through.
pub fn smooth_point(current: Point2D, previous: Option<Point2D>, alpha: f64) -> Point2D {
    let Some(prev) = previous else {
        return current;
    };
    let alpha = clamp_alpha(alpha);
    if alpha >= 1.0 {
        return current;
    }
    Point2D::new(
        prev.x + alpha * (current.x - prev.x),
        prev.y + alpha * (current.y - prev.y),
    )
}

/// EMA state for one tracked point.
#[derive(Debug, Clone)]
pub struct KeypointSmoother {
    alpha: f64,
    previous: Option<Point2D>,
}

impl KeypointSmoother {
    /// Create a smoother with the given factor. Higher tracks faster.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: clamp_alpha(alpha),
            previous: None,
        }
    }

    /// Feed a raw point and get the smoothed one.
    pub fn update(&mut self, current: Point2D) -> Point2D {
        let smoothed = smooth_point(current, self.previous, self.alpha);
        self.previous = Some(smoothed);
        smoothed
    }

    /// Last smoothed point.
    pub fn previous(&self) -> Option<Point2D> {
        self.previous
    }

    /// Forget history; the next update is a cold start.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

fn clamp_alpha(alpha: f64) -> f64 {
    if alpha.is_nan() {
        return 1.0;
    }
    alpha.clamp(f64::EPSILON, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn jittery_points() -> Vec<Point2D> {
        // Hand held at roughly (500, 300) with tracking noise
        vec![
            Point2D::new(500.0, 300.0),
            Point2D::new(515.0, 290.0),
            Point2D::new(490.0, 310.0),
            Point2D::new(510.0, 295.0),
            Point2D::new(495.0, 305.0),
            Point2D::new(505.0, 300.0),
        ]
    }

    #[test]
    fn test_cold_start_returns_current() {
        let p = Point2D::new(12.0, 34.0);
        assert_eq!(smooth_point(p, None, 0.4), p);
    }

    #[test]
    fn test_single_step() {
        let out = smooth_point(Point2D::new(10.0, 0.0), Some(Point2D::new(0.0, 0.0)), 0.4);
        assert!((out.x - 4.0).abs() < 1e-12);
        assert_eq!(out.y, 0.0);
    }

    #[test]
    fn test_ema_reduces_jitter() {
        let mut smoother = KeypointSmoother::new(0.4);
        let smoothed: Vec<Point2D> = jittery_points()
            .into_iter()
            .map(|p| smoother.update(p))
            .collect();

        for p in &smoothed[2..] {
            assert!((p.x - 500.0).abs() < 10.0, "smoothed x={} too far", p.x);
            assert!((p.y - 300.0).abs() < 10.0, "smoothed y={} too far", p.y);
        }
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut smoother = KeypointSmoother::new(0.5);
        smoother.update(Point2D::new(0.0, 0.0));
        smoother.reset();
        assert_eq!(smoother.update(Point2D::new(8.0, 8.0)), Point2D::new(8.0, 8.0));
    }

    #[test]
    fn test_alpha_is_clamped() {
        assert_eq!(KeypointSmoother::new(3.0).alpha(), 1.0);
        assert!(KeypointSmoother::new(-1.0).alpha() > 0.0);
    }

    proptest! {
        #[test]
        fn prop_alpha_one_is_identity(
            cx in -1e4f64..1e4, cy in -1e4f64..1e4, px in -1e4f64..1e4, py in -1e4f64..1e4,
        ) {
            let current = Point2D::new(cx, cy);
            let out = smooth_point(current, Some(Point2D::new(px, py)), 1.0);
            prop_assert_eq!(out, current);
        }

        #[test]
        fn prop_output_between_previous_and_current(
            cx in -1e4f64..1e4, px in -1e4f64..1e4, alpha in 0.01f64..1.0,
        ) {
            let out = smooth_point(Point2D::new(cx, 0.0), Some(Point2D::new(px, 0.0)), alpha);
            prop_assert!(out.x >= cx.min(px) - 1e-9 && out.x <= cx.max(px) + 1e-9);
        }
    }
}
