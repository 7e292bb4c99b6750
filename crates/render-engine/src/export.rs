//! PNG export of the ink surface and overlay layers.

use std::path::{Path, PathBuf};

use image::{imageops, RgbaImage};

use cogniscript_common::error::{CogniscriptError, CogniscriptResult};

use crate::stroke::StrokeSurface;

/// Which layers end up in an exported image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportLayers {
    /// The ink alone, transparent background.
    #[default]
    InkOnly,
    /// The overlay with ink drawn on top.
    InkOverOverlay,
}

/// Stack `top` over `bottom` with alpha blending.
///
/// Both layers must have the same dimensions.
pub fn composite_layers(bottom: &RgbaImage, top: &RgbaImage) -> CogniscriptResult<RgbaImage> {
    if bottom.dimensions() != top.dimensions() {
        return Err(CogniscriptError::render(format!(
            "Layer size mismatch: {:?} vs {:?}",
            bottom.dimensions(),
            top.dimensions()
        )));
    }
    let mut out = bottom.clone();
    imageops::overlay(&mut out, top, 0, 0);
    Ok(out)
}

/// Write an RGBA image as PNG, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> CogniscriptResult<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| CogniscriptError::render(format!("PNG export failed: {e}")))?;

    tracing::info!(
        output = %path.display(),
        width = image.width(),
        height = image.height(),
        "Exported PNG"
    );
    Ok(path.to_path_buf())
}

/// Export the ink surface, optionally over an overlay layer.
pub fn export_surface(
    surface: &StrokeSurface,
    overlay: Option<&RgbaImage>,
    layers: ExportLayers,
    path: &Path,
) -> CogniscriptResult<PathBuf> {
    match (layers, overlay) {
        (ExportLayers::InkOnly, _) => save_png(surface.image(), path),
        (ExportLayers::InkOverOverlay, Some(overlay)) => {
            let merged = composite_layers(overlay, surface.image())?;
            save_png(&merged, path)
        }
        (ExportLayers::InkOverOverlay, None) => Err(CogniscriptError::render(
            "Overlay export requested without an overlay layer",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::StrokeAccumulator;
    use cogniscript_processing_core::color::velocity_color;
    use cogniscript_scene_model::geometry::{FrameSize, Point2D};
    use image::Rgba;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("cogniscript-export-{}", std::process::id()))
            .join(name)
    }

    fn inked_surface() -> StrokeSurface {
        let mut surface = StrokeSurface::new(FrameSize::new(32, 24));
        let mut acc = StrokeAccumulator::new(4.0);
        let color = velocity_color(0.0, 2_000.0);
        acc.apply(&mut surface, Point2D::new(4.0, 12.0), true, color);
        acc.apply(&mut surface, Point2D::new(28.0, 12.0), true, color);
        surface
    }

    #[test]
    fn test_export_ink_roundtrips_through_png() {
        let surface = inked_surface();
        let path = temp_path("ink.png");

        let written = export_surface(&surface, None, ExportLayers::InkOnly, &path).unwrap();
        assert_eq!(written, path);

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (32, 24));
        assert_eq!(loaded.get_pixel(16, 12).0, [217, 38, 38, 255]);
        assert_eq!(loaded.get_pixel(16, 0).0[3], 0);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_ink_covers_overlay_when_composited() {
        let surface = inked_surface();
        let overlay = RgbaImage::from_pixel(32, 24, Rgba([0, 0, 255, 255]));

        let merged = composite_layers(&overlay, surface.image()).unwrap();
        assert_eq!(merged.get_pixel(16, 12).0, [217, 38, 38, 255]);
        assert_eq!(merged.get_pixel(16, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_layer_size_mismatch_is_an_error() {
        let a = RgbaImage::new(10, 10);
        let b = RgbaImage::new(10, 11);
        assert!(composite_layers(&a, &b).is_err());
    }

    #[test]
    fn test_overlay_export_needs_an_overlay() {
        let surface = inked_surface();
        let err = export_surface(
            &surface,
            None,
            ExportLayers::InkOverOverlay,
            &temp_path("missing.png"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("without an overlay"));
    }
}
