//! Letterbox mapping between the video frame and the drawing surface.
//!
//! The source frame is scaled proportionally to fit inside the surface
//! and centered along the axis with spare room. Every point and box drawn
//! for a frame goes through the same transform.

use cogniscript_scene_model::geometry::{BoundingBox, FrameSize, MirrorMode, Point2D};

/// Scale and offsets that fit a source frame inside a destination surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxTransform {
    /// Uniform scale from source pixels to surface pixels.
    pub scale: f64,
    /// Horizontal padding on each side, in surface pixels.
    pub offset_x: f64,
    /// Vertical padding on each side, in surface pixels.
    pub offset_y: f64,
    /// Source frame the transform was computed for.
    pub source: FrameSize,
    /// Destination surface the transform was computed for.
    pub dest: FrameSize,
}

impl LetterboxTransform {
    /// Compute the transform, or `None` while either size is degenerate
    /// (for instance before the stream has reported its dimensions).
    pub fn fit(source: FrameSize, dest: FrameSize) -> Option<Self> {
        let source_ratio = source.aspect_ratio()?;
        let dest_ratio = dest.aspect_ratio()?;

        let (ws, hs) = (source.width as f64, source.height as f64);
        let (wd, hd) = (dest.width as f64, dest.height as f64);

        let (scale, offset_x, offset_y) = if dest_ratio > source_ratio {
            // Surface is relatively wider: fit height, pad left and right.
            let scale = hd / hs;
            (scale, (wd - ws * scale) / 2.0, 0.0)
        } else {
            let scale = wd / ws;
            (scale, 0.0, (hd - hs * scale) / 2.0)
        };

        Some(Self {
            scale,
            offset_x,
            offset_y,
            source,
            dest,
        })
    }

    /// Map a source-pixel point onto the surface.
    pub fn map_pixel(&self, p: Point2D) -> Point2D {
        Point2D::new(
            p.x * self.scale + self.offset_x,
            p.y * self.scale + self.offset_y,
        )
    }

    /// Map a normalized source coordinate onto the surface.
    pub fn map_normalized(&self, x: f64, y: f64, mirror: MirrorMode) -> Point2D {
        let x = mirror.apply_normalized_x(x);
        self.map_pixel(self.source.denormalize(x, y))
    }

    /// Map a source-pixel box onto the surface.
    pub fn map_box(&self, bbox: &BoundingBox, mirror: MirrorMode) -> BoundingBox {
        let bbox = match mirror {
            MirrorMode::None => *bbox,
            MirrorMode::Horizontal => bbox.mirrored(self.source.width as f64),
        };
        let origin = self.map_pixel(Point2D::new(bbox.x, bbox.y));
        BoundingBox::new(
            origin.x,
            origin.y,
            bbox.w * self.scale,
            bbox.h * self.scale,
        )
    }

    /// The region of the surface covered by the whole source frame.
    pub fn content_rect(&self) -> BoundingBox {
        BoundingBox::new(
            self.offset_x,
            self.offset_y,
            self.source.width as f64 * self.scale,
            self.source.height as f64 * self.scale,
        )
    }
}

/// Caches the letterbox transform and recomputes it when a size changes.
#[derive(Debug, Clone, Default)]
pub struct CoordinateMapper {
    source: FrameSize,
    dest: FrameSize,
    transform: Option<LetterboxTransform>,
}

impl CoordinateMapper {
    pub fn new(source: FrameSize, dest: FrameSize) -> Self {
        Self {
            source,
            dest,
            transform: LetterboxTransform::fit(source, dest),
        }
    }

    /// Update both sizes. Returns true when the transform was recomputed.
    pub fn update(&mut self, source: FrameSize, dest: FrameSize) -> bool {
        if source == self.source && dest == self.dest {
            return false;
        }
        self.source = source;
        self.dest = dest;
        self.transform = LetterboxTransform::fit(source, dest);
        tracing::debug!(
            source_w = source.width,
            source_h = source.height,
            dest_w = dest.width,
            dest_h = dest.height,
            ready = self.transform.is_some(),
            "Letterbox transform recomputed"
        );
        true
    }

    pub fn set_source(&mut self, source: FrameSize) -> bool {
        self.update(source, self.dest)
    }

    pub fn set_dest(&mut self, dest: FrameSize) -> bool {
        self.update(self.source, dest)
    }

    /// Current transform, `None` while not ready.
    pub fn transform(&self) -> Option<&LetterboxTransform> {
        self.transform.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.transform.is_some()
    }

    pub fn source(&self) -> FrameSize {
        self.source
    }

    pub fn dest(&self) -> FrameSize {
        self.dest
    }
}
