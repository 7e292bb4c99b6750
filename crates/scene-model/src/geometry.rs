//! Points, frame sizes, and boxes.

use serde::{Deserialize, Serialize};

/// A 2D point. Units depend on context (normalized, source pixels, or
/// surface pixels); the owning type documents which.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation between two points.
    pub fn lerp(a: &Point2D, b: &Point2D, t: f64) -> Point2D {
        let t = t.clamp(0.0, 1.0);
        Point2D {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
        }
    }
}

/// Pixel dimensions of a video frame or drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A size with a zero side, e.g. a stream whose metadata has not loaded.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, or `None` when degenerate.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        Some(self.width as f64 / self.height as f64)
    }

    /// Scale a normalized point up to pixels of this frame.
    pub fn denormalize(&self, x: f64, y: f64) -> Point2D {
        Point2D::new(x * self.width as f64, y * self.height as f64)
    }
}

/// Horizontal mirroring applied before compositing.
///
/// Front cameras are usually shown mirrored. Whatever the choice, hand
/// points and object boxes must use the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorMode {
    /// Draw as the camera sees it.
    None,
    /// Flip left and right (selfie view).
    #[default]
    Horizontal,
}

impl MirrorMode {
    pub fn from_flag(mirror_horizontal: bool) -> Self {
        if mirror_horizontal {
            Self::Horizontal
        } else {
            Self::None
        }
    }

    /// Apply to a normalized x coordinate.
    pub fn apply_normalized_x(self, x: f64) -> f64 {
        match self {
            Self::None => x,
            Self::Horizontal => 1.0 - x,
        }
    }
}

/// Axis-aligned box in source-frame pixels: top-left corner plus extent.
///
/// Serialized as `[x, y, w, h]`, the layout COCO-SSD style detectors emit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Center point of the box.
    pub fn center(&self) -> Point2D {
        Point2D::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Flip horizontally inside a frame of the given pixel width.
    pub fn mirrored(&self, frame_width: f64) -> BoundingBox {
        BoundingBox::new(frame_width - self.x - self.w, self.y, self.w, self.h)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x, b.y, b.w, b.h]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point2d_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_size_degenerate() {
        assert!(FrameSize::new(0, 720).is_degenerate());
        assert!(FrameSize::new(1280, 0).is_degenerate());
        assert_eq!(FrameSize::new(0, 0).aspect_ratio(), None);
        let ratio = FrameSize::new(1280, 720).aspect_ratio().unwrap();
        assert!((ratio - 16.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_bbox_center_and_mirror() {
        let bbox = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(bbox.center(), Point2D::new(25.0, 40.0));

        let flipped = bbox.mirrored(100.0);
        assert_eq!(flipped.x, 60.0);
        assert_eq!(flipped.w, 30.0);
        // Mirroring twice is the identity
        assert_eq!(flipped.mirrored(100.0), bbox);
    }

    #[test]
    fn test_bbox_serializes_as_array() {
        let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,4.0]");
        let parsed: BoundingBox = serde_json::from_str("[0,0,10,10]").unwrap();
        assert_eq!(parsed, BoundingBox::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_mirror_mode() {
        assert_eq!(MirrorMode::None.apply_normalized_x(0.2), 0.2);
        assert!((MirrorMode::Horizontal.apply_normalized_x(0.2) - 0.8).abs() < 1e-12);
        assert_eq!(MirrorMode::from_flag(true), MirrorMode::Horizontal);
    }
}
