// components/visual.rs
//
// Leaf visual payloads. One closed union instead of runtime type sniffing:
// callers decide the kind at the call site.

use glam::Vec2;

use crate::api::types::Rect;
use crate::assets::provider::ImageSource;
use crate::renderer::surface::Surface;

/// A sub-rectangle of a sheet image, drawable as a leaf node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRegion {
    pub image: ImageSource,
    /// Source rectangle within the sheet image.
    pub src: Rect,
}

/// How a text block is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    /// Single line, filled.
    #[default]
    Fill,
    /// Single line, stroked.
    Stroke,
    /// Single line, filled then stroked.
    FillStroke,
    /// One filled line per `\n`-separated segment.
    Multiline,
}

/// Horizontal text alignment relative to the node position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Text payload for a leaf node.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub mode: TextMode,
    /// Vertical advance between lines in [`TextMode::Multiline`].
    pub line_height: f32,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: TextMode::Fill,
            line_height: 12.0,
        }
    }

    pub fn multiline(text: impl Into<String>, line_height: f32) -> Self {
        Self {
            text: text.into(),
            mode: TextMode::Multiline,
            line_height,
        }
    }

    pub fn with_mode(mut self, mode: TextMode) -> Self {
        self.mode = mode;
        self
    }

    /// Measures the widest line under `font` (ambient font when `None`),
    /// using `surface` as an injected scratch region.
    pub fn measure_width<S: Surface>(&self, font: Option<&str>, surface: &mut S) -> f32 {
        surface.save();
        if let Some(font) = font {
            surface.set_font(font);
        }

        let mut max = 0.0f32;
        for line in self.text.split('\n') {
            let w = surface.measure_text_width(line);
            if w > max {
                max = w;
            }
        }

        surface.restore();
        max
    }
}

/// Visual payload of a leaf node.
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    /// Draws nothing. Used by action and tween nodes.
    Blank,
    /// A whole decoded image, blitted at natural size.
    Bitmap(ImageSource),
    /// A sheet sub-rectangle, scaled to the node size.
    Sprite(SpriteRegion),
    /// A text block.
    Text(TextBlock),
}

impl Visual {
    /// Natural size of the payload, when it has one.
    pub fn natural_size(&self) -> Option<Vec2> {
        match self {
            Visual::Blank | Visual::Text(_) => None,
            Visual::Bitmap(src) => Some(src.size),
            Visual::Sprite(region) => Some(region.src.size()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::provider::ImageId;
    use crate::renderer::record::RecordSurface;

    #[test]
    fn natural_sizes() {
        let src = ImageSource::new(ImageId(0), 32.0, 16.0);
        assert_eq!(Visual::Bitmap(src).natural_size(), Some(Vec2::new(32.0, 16.0)));

        let region = SpriteRegion {
            image: src,
            src: Rect::new(8.0, 0.0, 8.0, 16.0),
        };
        assert_eq!(
            Visual::Sprite(region).natural_size(),
            Some(Vec2::new(8.0, 16.0))
        );
        assert_eq!(Visual::Blank.natural_size(), None);
    }

    #[test]
    fn measure_width_takes_widest_line() {
        let mut surface = RecordSurface::new(100.0, 100.0).with_char_width(10.0);
        let block = TextBlock::multiline("ab\nabcd\nc", 14.0);
        assert_eq!(block.measure_width(None, &mut surface), 40.0);
    }

    #[test]
    fn measure_width_restores_surface_state() {
        let mut surface = RecordSurface::new(100.0, 100.0);
        let block = TextBlock::new("hi");
        block.measure_width(Some("10px mono"), &mut surface);
        let ops = surface.ops();
        use crate::renderer::record::SurfaceOp;
        assert_eq!(ops.first(), Some(&SurfaceOp::Save));
        assert_eq!(ops.last(), Some(&SurfaceOp::Restore));
    }
}
