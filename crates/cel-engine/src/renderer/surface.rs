//! Drawing-surface capability.
//!
//! The engine never rasterizes anything itself. Every paint traversal talks
//! to an implementor of [`Surface`] — a canvas context, a software
//! framebuffer, or the recording backend in [`crate::renderer::record`].
//!
//! Implementors keep a save/restore state stack covering the transform,
//! global alpha, and all style attributes, mirroring 2D canvas semantics.

use glam::Vec2;

use crate::api::types::Rect;
use crate::assets::provider::ImageSource;
use crate::components::style::{LineCap, LineJoin};

/// Raster-surface capability consumed by the paint traversal.
pub trait Surface {
    /// Pushes the current drawing state (transform, alpha, styles).
    fn save(&mut self);

    /// Pops the drawing state pushed by the matching [`Surface::save`].
    fn restore(&mut self);

    /// Clears the pixels inside `region` to transparent.
    fn clear_region(&mut self, region: Rect);

    /// Right-multiplies the current transform by the given affine map.
    fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32);

    /// Appends a pure translation to the current transform.
    fn translate(&mut self, x: f32, y: f32);

    /// Multiplies the current global alpha.
    fn multiply_alpha(&mut self, alpha: f32);

    fn set_fill(&mut self, style: &str);
    fn set_stroke(&mut self, style: &str);
    fn set_font(&mut self, font: &str);
    fn set_line_width(&mut self, width: f32);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_miter_limit(&mut self, limit: f32);

    /// Blits `source` (optionally a sub-rectangle of it) into `dst`,
    /// transformed by the current state.
    fn draw_image(&mut self, source: &ImageSource, src: Option<Rect>, dst: Rect);

    fn fill_text(&mut self, text: &str, x: f32, y: f32);
    fn stroke_text(&mut self, text: &str, x: f32, y: f32);

    /// Width of `text` under the current font.
    fn measure_text_width(&mut self, text: &str) -> f32;

    /// Creates an offscreen region compatible with this surface.
    fn create_region(&mut self, width: f32, height: f32) -> Self
    where
        Self: Sized;

    /// Copies the `src` rectangle of another region onto this surface with
    /// its top-left corner at `dst`, ignoring the current transform.
    fn blit(&mut self, source: &Self, src: Rect, dst: Vec2)
    where
        Self: Sized;
}
