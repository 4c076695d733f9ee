// core/transform.rs
//
// 2D affine transform math: a full six-component matrix for traversal and
// hit-testing, and a decomposed scale/rotation form owned by nodes.

use glam::Vec2;

use crate::api::error::{EngineError, EngineResult};

/// Full 2D affine map.
///
/// ```text
/// [ a c e ]
/// [ b d f ]
/// ```
///
/// Composition uses the pre-multiply convention throughout the engine:
/// `self.multiply(..)` appends a child transform to an accumulated parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Determinant of the linear part.
    pub fn det(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Right-multiplies by another affine map given as raw components,
    /// composing the linear parts and accumulating translation.
    pub fn multiply(&mut self, g: f32, h: f32, i: f32, j: f32, k: f32, l: f32) -> &mut Self {
        let (a, b, c, d) = (self.a, self.b, self.c, self.d);

        self.a = a * g + c * h;
        self.b = b * g + d * h;
        self.c = a * i + c * j;
        self.d = b * i + d * j;
        self.e += a * k + c * l;
        self.f += b * k + d * l;

        self
    }

    /// Returns `self × other` without mutating either operand.
    pub fn then(&self, other: &Self) -> Self {
        let mut m = *self;
        m.multiply(other.a, other.b, other.c, other.d, other.e, other.f);
        m
    }

    /// Effective matrix of a node under an accumulated parent matrix: the
    /// node's decomposed linear part plus its local offset. Called once per
    /// node per traversal level.
    pub fn compose(&self, local: &LocalTransform, offset: Vec2) -> Self {
        let mut m = *self;
        m.multiply(local.a, local.b, local.c, local.d, offset.x, offset.y);
        m
    }

    /// Returns the inverse transform, or [`EngineError::DegenerateTransform`]
    /// when the determinant is zero. Never produces NaN or infinite values.
    pub fn invert(&self) -> EngineResult<Self> {
        let det = self.det();
        if det == 0.0 {
            return Err(EngineError::DegenerateTransform);
        }

        Ok(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.d * self.e - self.c * self.f) / -det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    /// Maps a local point to world space.
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Solves the inverse mapping directly from the determinant, without
    /// materializing the inverse matrix. Hit-testing fast path.
    pub fn unapply(&self, p: Vec2) -> EngineResult<Vec2> {
        let det = self.det();
        if det == 0.0 {
            return Err(EngineError::DegenerateTransform);
        }

        Ok(Vec2::new(
            (self.d * p.x - self.c * p.y + self.c * self.f - self.d * self.e) / det,
            (-self.b * p.x + self.a * p.y + self.b * self.e - self.a * self.f) / det,
        ))
    }

    /// Appends a pure translation.
    pub fn translate(&mut self, offset: Vec2) -> &mut Self {
        self.multiply(1.0, 0.0, 0.0, 1.0, offset.x, offset.y)
    }
}

/// Decomposed linear transform: independent x/y scale and a rotation angle,
/// with the derived matrix coefficients kept in sync by the mutators.
///
/// Nodes own one of these; the full affine form only exists transiently
/// during traversal via [`Transform::compose`].
#[derive(Debug, Clone, Copy)]
pub struct LocalTransform {
    scale: Vec2,
    rotation: f32,
    cos: f32,
    sin: f32,
    pub(crate) a: f32,
    pub(crate) b: f32,
    pub(crate) c: f32,
    pub(crate) d: f32,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            scale: Vec2::ONE,
            rotation: 0.0,
            cos: 1.0,
            sin: 0.0,
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
        }
    }
}

impl LocalTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Sets the rotation angle in radians and recomputes the coefficients.
    pub fn set_rotation(&mut self, angle: f32) {
        self.rotation = angle;
        self.cos = angle.cos();
        self.sin = angle.sin();
        self.recompute();
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.recompute();
    }

    pub fn set_scale_x(&mut self, sx: f32) {
        self.scale.x = sx;
        self.recompute();
    }

    pub fn set_scale_y(&mut self, sy: f32) {
        self.scale.y = sy;
        self.recompute();
    }

    // a = sx·cosθ, b = sx·sinθ, c = -sy·sinθ, d = sy·cosθ
    fn recompute(&mut self) {
        self.a = self.scale.x * self.cos;
        self.b = self.scale.x * self.sin;
        self.c = -self.scale.y * self.sin;
        self.d = self.scale.y * self.cos;
    }

    /// Expands to a full affine map with the given translation.
    pub fn to_affine(&self, offset: Vec2) -> Transform {
        Transform::new(self.a, self.b, self.c, self.d, offset.x, offset.y)
    }
}
