//! The ink surface and the accumulator that draws on it.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;

use cogniscript_processing_core::color::HslColor;
use cogniscript_scene_model::geometry::{FrameSize, Point2D};

/// One ink segment in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point2D,
    pub to: Point2D,
    pub color: [u8; 3],
    pub width: f64,
}

impl Segment {
    pub fn length(&self) -> f64 {
        self.from.distance_to(&self.to)
    }
}

/// Persistent RGBA raster that ink accumulates on.
///
/// Transparent where nothing has been drawn, so it can sit on top of the
/// video like a canvas layer.
#[derive(Debug, Clone)]
pub struct StrokeSurface {
    image: RgbaImage,
    segments_drawn: u64,
}

impl StrokeSurface {
    pub fn new(size: FrameSize) -> Self {
        Self {
            image: RgbaImage::new(size.width, size.height),
            segments_drawn: 0,
        }
    }

    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Segments drawn since the surface was created or last cleared.
    pub fn segments_drawn(&self) -> u64 {
        self.segments_drawn
    }

    /// Wipe all ink.
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
        self.segments_drawn = 0;
    }

    /// Change dimensions. Like a canvas, resizing discards existing ink.
    pub fn resize(&mut self, size: FrameSize) {
        if size == self.size() {
            return;
        }
        self.image = RgbaImage::new(size.width, size.height);
        self.segments_drawn = 0;
    }

    /// Draw a round-capped line.
    ///
    /// The line is stamped as discs no more than half a pixel apart, which
    /// also gives a zero-length segment a round dot.
    pub fn draw_segment(&mut self, segment: &Segment) {
        let radius = (segment.width / 2.0).round().max(1.0) as i32;
        let [r, g, b] = segment.color;
        let color = Rgba([r, g, b, 255]);

        let steps = (segment.length() * 2.0).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let p = Point2D::lerp(&segment.from, &segment.to, i as f64 / steps as f64);
            draw_filled_circle_mut(
                &mut self.image,
                (p.x.round() as i32, p.y.round() as i32),
                radius,
                color,
            );
        }
        self.segments_drawn += 1;
    }

    /// Pixel at a position, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        Some(self.image.get_pixel(x, y).0)
    }

    /// Number of pixels carrying any ink.
    pub fn inked_pixel_count(&self) -> usize {
        self.image.pixels().filter(|p| p.0[3] > 0).count()
    }
}

/// Turns the per-frame ink point into continuous strokes.
///
/// While engaged, each frame connects the previous ink point to the current
/// one. Disengaging forgets the previous point, so the next stroke starts
/// where the pen comes down instead of bridging the gap.
#[derive(Debug, Clone)]
pub struct StrokeAccumulator {
    width: f64,
    last_ink: Option<Point2D>,
}

impl StrokeAccumulator {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            last_ink: None,
        }
    }

    /// Process one frame. Returns the segment drawn, if any.
    pub fn apply(
        &mut self,
        surface: &mut StrokeSurface,
        current: Point2D,
        engaged: bool,
        color: HslColor,
    ) -> Option<Segment> {
        if !engaged {
            self.last_ink = None;
            return None;
        }

        let segment = Segment {
            from: self.last_ink.unwrap_or(current),
            to: current,
            color: color.to_rgb(),
            width: self.width,
        };
        surface.draw_segment(&segment);
        self.last_ink = Some(current);
        Some(segment)
    }

    /// End of the current stroke (hand lost, session reset).
    pub fn lift(&mut self) {
        self.last_ink = None;
    }

    /// Where the current stroke last left ink.
    pub fn last_ink(&self) -> Option<Point2D> {
        self.last_ink
    }

    pub fn width(&self) -> f64 {
        self.width
    }
}
