// components/style.rs
//
// Ambient drawing attributes. Every field is optional: an unset attribute
// inherits whatever the surface currently has, a set one overrides it for
// the node and its subtree.

/// Line cap applied to stroked paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Line join applied to stroked paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Optional per-node style attributes.
#[derive(Debug, Clone, Default)]
pub struct Style {
    /// Fill style (CSS-style color or gradient reference).
    pub fill: Option<String>,
    /// Stroke style.
    pub stroke: Option<String>,
    /// Font specification for text nodes in this subtree.
    pub font: Option<String>,
    pub line_width: Option<f32>,
    pub line_cap: Option<LineCap>,
    pub line_join: Option<LineJoin>,
    pub miter_limit: Option<f32>,
}

impl Style {
    /// True when no attribute is set (the node is fully ambient).
    pub fn is_empty(&self) -> bool {
        self.fill.is_none()
            && self.stroke.is_none()
            && self.font.is_none()
            && self.line_width.is_none()
            && self.line_cap.is_none()
            && self.line_join.is_none()
            && self.miter_limit.is_none()
    }
}

/// An `rgba(..)` CSS color string.
pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> String {
    format!("rgba({},{},{},{})", r, g, b, a)
}

/// An `hsla(..)` CSS color string.
pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> String {
    format!("hsla({},{}%,{}%,{})", h, s, l, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_is_empty() {
        assert!(Style::default().is_empty());
        let mut s = Style::default();
        s.fill = Some(rgba(255, 0, 0, 1.0));
        assert!(!s.is_empty());
    }

    #[test]
    fn color_helpers_format() {
        assert_eq!(rgba(10, 20, 30, 0.5), "rgba(10,20,30,0.5)");
        assert_eq!(hsla(180.0, 50.0, 25.0, 1.0), "hsla(180,50%,25%,1)");
    }
}
