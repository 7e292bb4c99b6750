//! Per-frame overlay: object boxes, hand skeleton, and the cursor ring.
//!
//! Composition is pure geometry and produces an [`OverlayFrame`] of draw
//! instructions in surface pixels. Rasterizing it is a separate step so the
//! instructions can be inspected without touching pixels.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use cogniscript_common::config::OverlayConfig;
use cogniscript_processing_core::letterbox::LetterboxTransform;
use cogniscript_processing_core::tool_proximity::ToolClassSet;
use cogniscript_scene_model::detection::DetectedObject;
use cogniscript_scene_model::geometry::{BoundingBox, FrameSize, MirrorMode, Point2D};
use cogniscript_scene_model::landmark::HandObservation;

pub const TOOL_BOX_COLOR: [u8; 3] = [34, 197, 94];
pub const OBJECT_BOX_COLOR: [u8; 3] = [37, 99, 235];
pub const LANDMARK_COLOR: [u8; 3] = [248, 250, 252];
pub const CURSOR_IDLE_COLOR: [u8; 3] = [148, 163, 184];

pub const TOOL_BOX_LINE_WIDTH: u32 = 3;
pub const OBJECT_BOX_LINE_WIDTH: u32 = 1;
pub const LANDMARK_RADIUS: i32 = 2;
pub const CURSOR_RADIUS: i32 = 10;

/// Everything the overlay needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct OverlayInput<'a> {
    pub transform: &'a LetterboxTransform,
    pub mirror: MirrorMode,
    /// Latest detection result, in source pixels.
    pub objects: &'a [DetectedObject],
    pub tool_classes: &'a ToolClassSet,
    pub observation: Option<&'a HandObservation>,
    /// Smoothed ink point in surface pixels.
    pub cursor: Option<Point2D>,
    pub engaged: bool,
    pub config: &'a OverlayConfig,
}

/// A detection box on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectOverlay {
    pub rect: BoundingBox,
    pub is_tool: bool,
    pub line_width: u32,
    pub color: [u8; 3],
}

/// The cursor ring marking the ink point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorOverlay {
    pub center: Point2D,
    pub radius: i32,
    pub color: [u8; 3],
}

/// Draw instructions for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayFrame {
    pub objects: Vec<ObjectOverlay>,
    pub landmarks: Vec<Point2D>,
    /// Green while the pen is down, like the cursor ring.
    pub landmark_color: [u8; 3],
    pub cursor: Option<CursorOverlay>,
}

impl OverlayFrame {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.landmarks.is_empty() && self.cursor.is_none()
    }
}

/// Build the overlay instructions for a frame.
pub fn compose_overlay(input: &OverlayInput<'_>) -> OverlayFrame {
    let mut frame = OverlayFrame::default();

    if input.config.show_objects {
        frame.objects = input
            .objects
            .iter()
            .map(|object| {
                let is_tool = input.tool_classes.contains(&object.label);
                let (line_width, color) = if is_tool {
                    (TOOL_BOX_LINE_WIDTH, TOOL_BOX_COLOR)
                } else {
                    (OBJECT_BOX_LINE_WIDTH, OBJECT_BOX_COLOR)
                };
                ObjectOverlay {
                    rect: input.transform.map_box(&object.bbox, input.mirror),
                    is_tool,
                    line_width,
                    color,
                }
            })
            .collect();
    }

    if input.config.show_skeleton {
        if let Some(observation) = input.observation.filter(|o| o.has_hand()) {
            frame.landmarks = observation
                .keypoints()
                .iter()
                .map(|kp| input.transform.map_normalized(kp.x, kp.y, input.mirror))
                .collect();
        }

        let (landmark_color, cursor_color) = if input.engaged {
            (TOOL_BOX_COLOR, TOOL_BOX_COLOR)
        } else {
            (LANDMARK_COLOR, CURSOR_IDLE_COLOR)
        };
        frame.landmark_color = landmark_color;
        frame.cursor = input.cursor.map(|center| CursorOverlay {
            center,
            radius: CURSOR_RADIUS,
            color: cursor_color,
        });
    }

    frame
}

fn rgba([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

fn to_pixel(p: Point2D) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

/// Rasterize overlay instructions onto a transparent image.
pub fn render_overlay(frame: &OverlayFrame, size: FrameSize) -> RgbaImage {
    let mut image = RgbaImage::new(size.width, size.height);

    for object in &frame.objects {
        let color = rgba(object.color);
        // Thick outlines are nested one-pixel rectangles growing inward.
        for inset in 0..object.line_width {
            let inset_f = inset as f64;
            let w = object.rect.w - 2.0 * inset_f;
            let h = object.rect.h - 2.0 * inset_f;
            if w < 1.0 || h < 1.0 {
                break;
            }
            let rect = Rect::at(
                (object.rect.x + inset_f).round() as i32,
                (object.rect.y + inset_f).round() as i32,
            )
            .of_size(w.round().max(1.0) as u32, h.round().max(1.0) as u32);
            draw_hollow_rect_mut(&mut image, rect, color);
        }
    }

    let landmark_color = rgba(frame.landmark_color);
    for point in &frame.landmarks {
        draw_filled_circle_mut(&mut image, to_pixel(*point), LANDMARK_RADIUS, landmark_color);
    }

    if let Some(cursor) = &frame.cursor {
        draw_hollow_circle_mut(
            &mut image,
            to_pixel(cursor.center),
            cursor.radius,
            rgba(cursor.color),
        );
    }

    image
}
