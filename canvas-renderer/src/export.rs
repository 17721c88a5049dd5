//! Canvas export to image formats.
//!
//! Renders a [`CanvasState`] through an [`SvgSurface`] and, when the `export`
//! feature is enabled, rasterizes that SVG to PNG with resvg/tiny-skia.

use canvas_core::CanvasState;

use crate::error::{RenderError, RenderResult};
use crate::{Renderer, RendererConfig, SvgSurface};

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// SVG vector graphics (returns the SVG XML string as UTF-8 bytes).
    Svg,
    /// PNG image. Requires the `export` feature.
    Png,
}

impl ExportFormat {
    /// Guess the format from a file extension, case-insensitively.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Configuration for canvas export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Renderer settings (background colour).
    pub renderer: RendererConfig,
    /// Scale factor (e.g. 2.0 for retina). Only affects raster output.
    pub scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            renderer: RendererConfig::default(),
            scale: 1.0,
        }
    }
}

/// Exports a [`CanvasState`] to image formats.
pub struct SceneExporter {
    config: ExportConfig,
}

impl SceneExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Export a canvas to the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas cannot be rendered or encoded, or if
    /// PNG is requested without the `export` feature.
    pub fn export(&self, state: &CanvasState, format: ExportFormat) -> RenderResult<Vec<u8>> {
        match format {
            ExportFormat::Svg => Ok(self.render_to_svg(state).into_bytes()),
            ExportFormat::Png => self.render_to_png(state),
        }
    }

    /// Export the canvas to an SVG string.
    ///
    /// Non-positive dimensions are clamped to one pixel so the document stays
    /// valid.
    #[must_use]
    pub fn render_to_svg(&self, state: &CanvasState) -> String {
        let mut sized = state.clone();
        sized.set_size(state.width.max(1.0), state.height.max(1.0));

        let mut surface = SvgSurface::new();
        Renderer::new(self.config.renderer.clone()).render(&sized, &mut surface);
        surface.finish()
    }

    /// Export the canvas to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    #[cfg(feature = "export")]
    pub fn render_to_png(&self, state: &CanvasState) -> RenderResult<Vec<u8>> {
        let svg_string = self.render_to_svg(state);
        let pixmap = self.rasterize_svg(&svg_string)?;

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Export the canvas to PNG bytes.
    ///
    /// # Errors
    ///
    /// Always fails: this build has no rasterizer.
    #[cfg(not(feature = "export"))]
    #[allow(clippy::unused_self)]
    pub fn render_to_png(&self, _state: &CanvasState) -> RenderResult<Vec<u8>> {
        Err(RenderError::UnsupportedFormat(
            "PNG export requires the `export` feature".to_string(),
        ))
    }

    /// Rasterize an SVG string to a tiny-skia Pixmap.
    #[cfg(feature = "export")]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize_svg(&self, svg_string: &str) -> RenderResult<tiny_skia::Pixmap> {
        let opt = usvg::Options::default();
        let tree = usvg::Tree::from_str(svg_string, &opt)
            .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

        let scale = self.config.scale.max(f32::EPSILON);
        let px_w = (tree.size().width() * scale).ceil() as u32;
        let px_h = (tree.size().height() * scale).ceil() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        Ok(pixmap)
    }
}
