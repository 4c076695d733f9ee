// renderer/record.rs
//
// Headless surface that records its op stream instead of rasterizing.
// Doubles as the reference backend for tests and for driving the engine in
// environments with no raster target at all.

use glam::Vec2;

use crate::api::types::Rect;
use crate::assets::provider::{ImageId, ImageSource};
use crate::components::style::{LineCap, LineJoin};
use crate::renderer::surface::Surface;

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Save,
    Restore,
    Clear(Rect),
    Transform([f32; 6]),
    Translate(f32, f32),
    MultiplyAlpha(f32),
    Fill(String),
    Stroke(String),
    Font(String),
    LineWidth(f32),
    LineCap(LineCap),
    LineJoin(LineJoin),
    MiterLimit(f32),
    DrawImage {
        image: ImageId,
        src: Option<Rect>,
        dst: Rect,
    },
    FillText(String, f32, f32),
    StrokeText(String, f32, f32),
    Blit { src: Rect, dst: Vec2 },
}

/// Op-recording implementation of [`Surface`].
#[derive(Debug, Clone)]
pub struct RecordSurface {
    pub size: Vec2,
    ops: Vec<SurfaceOp>,
    /// Fixed glyph advance used by `measure_text_width`.
    char_width: f32,
}

impl RecordSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            ops: Vec::new(),
            char_width: 8.0,
        }
    }

    /// Overrides the fixed glyph advance used for text measurement.
    pub fn with_char_width(mut self, char_width: f32) -> Self {
        self.char_width = char_width;
        self
    }

    /// Everything recorded so far, in order.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drains the recorded ops.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Surface for RecordSurface {
    fn save(&mut self) {
        self.ops.push(SurfaceOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(SurfaceOp::Restore);
    }

    fn clear_region(&mut self, region: Rect) {
        self.ops.push(SurfaceOp::Clear(region));
    }

    fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.ops.push(SurfaceOp::Transform([a, b, c, d, e, f]));
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.ops.push(SurfaceOp::Translate(x, y));
    }

    fn multiply_alpha(&mut self, alpha: f32) {
        self.ops.push(SurfaceOp::MultiplyAlpha(alpha));
    }

    fn set_fill(&mut self, style: &str) {
        self.ops.push(SurfaceOp::Fill(style.to_string()));
    }

    fn set_stroke(&mut self, style: &str) {
        self.ops.push(SurfaceOp::Stroke(style.to_string()));
    }

    fn set_font(&mut self, font: &str) {
        self.ops.push(SurfaceOp::Font(font.to_string()));
    }

    fn set_line_width(&mut self, width: f32) {
        self.ops.push(SurfaceOp::LineWidth(width));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ops.push(SurfaceOp::LineCap(cap));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.ops.push(SurfaceOp::LineJoin(join));
    }

    fn set_miter_limit(&mut self, limit: f32) {
        self.ops.push(SurfaceOp::MiterLimit(limit));
    }

    fn draw_image(&mut self, source: &ImageSource, src: Option<Rect>, dst: Rect) {
        self.ops.push(SurfaceOp::DrawImage {
            image: source.image,
            src,
            dst,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.ops.push(SurfaceOp::FillText(text.to_string(), x, y));
    }

    fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        self.ops.push(SurfaceOp::StrokeText(text.to_string(), x, y));
    }

    fn measure_text_width(&mut self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    fn create_region(&mut self, width: f32, height: f32) -> Self {
        Self::new(width, height).with_char_width(self.char_width)
    }

    fn blit(&mut self, _source: &Self, src: Rect, dst: Vec2) {
        self.ops.push(SurfaceOp::Blit { src, dst });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_call_order() {
        let mut surface = RecordSurface::new(100.0, 100.0);
        surface.save();
        surface.translate(5.0, 6.0);
        surface.restore();

        assert_eq!(
            surface.ops(),
            &[
                SurfaceOp::Save,
                SurfaceOp::Translate(5.0, 6.0),
                SurfaceOp::Restore,
            ]
        );
    }

    #[test]
    fn regions_record_independently() {
        let mut screen = RecordSurface::new(100.0, 100.0);
        let mut offscreen = screen.create_region(50.0, 50.0);
        offscreen.save();
        assert!(screen.ops().is_empty());
        assert_eq!(offscreen.ops().len(), 1);
    }

    #[test]
    fn text_measurement_uses_char_width() {
        let mut surface = RecordSurface::new(10.0, 10.0).with_char_width(7.0);
        assert_eq!(surface.measure_text_width("abc"), 21.0);
    }
}
