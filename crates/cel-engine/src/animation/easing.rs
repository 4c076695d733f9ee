// animation/easing.rs
//
// Pure easing functions: progress remaps over [0, 1]. Each base curve is
// defined once in its ease-in form; the Out and InOut variants are derived
// mechanically by the Direction combinator rather than written per curve.

use std::f32::consts::PI;

/// Base easing curves, each given in its ease-in form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    /// p²
    Quad,
    /// p³
    Cubic,
    /// p⁴
    Quart,
    /// p⁵
    Quint,
    /// p⁶
    Expo,
    Sine,
    Circ,
    Elastic,
    Back,
    Bounce,
}

impl Curve {
    /// The raw ease-in map of the curve.
    fn base(self, p: f32) -> f32 {
        match self {
            Curve::Quad => p * p,
            Curve::Cubic => p.powi(3),
            Curve::Quart => p.powi(4),
            Curve::Quint => p.powi(5),
            Curve::Expo => p.powi(6),
            Curve::Sine => 1.0 - (p * PI / 2.0).cos(),
            Curve::Circ => 1.0 - (1.0 - p * p).sqrt(),
            Curve::Elastic => {
                if p == 0.0 || p == 1.0 {
                    p
                } else {
                    -(2.0f32.powf(8.0 * (p - 1.0)))
                        * (((p - 1.0) * 80.0 - 7.5) * PI / 15.0).sin()
                }
            }
            Curve::Back => p * p * (3.0 * p - 2.0),
            Curve::Bounce => {
                let mut exp = 4i32;
                let mut pow2;
                loop {
                    exp -= 1;
                    pow2 = 2.0f32.powi(exp);
                    if p >= (pow2 - 1.0) / 11.0 {
                        break;
                    }
                }
                1.0 / 4.0f32.powi(3 - exp) - 7.5625 * ((pow2 * 3.0 - 2.0) / 22.0 - p).powi(2)
            }
        }
    }
}

/// Directional variant, derived mechanically from any base curve `f`:
/// `In` is `f`, `Out` mirrors it, `InOut` splices both halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    In,
    Out,
    InOut,
}

impl Direction {
    /// Applies the directional derivation of `f` at progress `p`.
    pub fn derive(self, f: impl Fn(f32) -> f32, p: f32) -> f32 {
        match self {
            Direction::In => f(p),
            Direction::Out => 1.0 - f(1.0 - p),
            Direction::InOut => {
                if p < 0.5 {
                    f(p * 2.0) / 2.0
                } else {
                    f(p * -2.0 + 2.0) / -2.0 + 1.0
                }
            }
        }
    }
}

/// An easing function: a pure `[0,1] → [0,1]` progress remap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity.
    #[default]
    Linear,
    /// Half-cosine swing.
    Swing,
    /// A derived directional variant of a base curve.
    Ease(Direction, Curve),
}

impl Easing {
    pub fn ease_in(curve: Curve) -> Self {
        Easing::Ease(Direction::In, curve)
    }

    pub fn ease_out(curve: Curve) -> Self {
        Easing::Ease(Direction::Out, curve)
    }

    pub fn ease_in_out(curve: Curve) -> Self {
        Easing::Ease(Direction::InOut, curve)
    }

    /// Applies the easing at progress `t`, clamped to [0, 1].
    pub fn apply(self, t: f32) -> f32 {
        let p = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => p,
            Easing::Swing => -(p * PI).cos() / 2.0 + 0.5,
            Easing::Ease(direction, curve) => direction.derive(|q| curve.base(q), p),
        }
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}
