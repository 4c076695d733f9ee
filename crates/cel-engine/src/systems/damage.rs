// systems/damage.rs
//
// Dirty-region accounting. The stage accumulates one rectangle per frame;
// painting in dirty mode repaints only that rectangle and then resets the
// accumulator to an inverted sentinel so the next union starts fresh.

use glam::Vec2;

use crate::api::types::{NodeId, Rect};
use crate::core::scene::Scene;
use crate::core::transform::Transform;

/// Min/max accumulator for the damaged screen region.
///
/// The empty state is an inverted sentinel (min = +∞, max = -∞): any union
/// replaces it outright.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirtyRect {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
}

impl DirtyRect {
    pub const EMPTY: Self = Self {
        x0: f32::INFINITY,
        y0: f32::INFINITY,
        x1: f32::NEG_INFINITY,
        y1: f32::NEG_INFINITY,
    };

    /// A rectangle covering the whole area of the given size.
    pub fn full(size: Vec2) -> Self {
        Self {
            x0: 0.0,
            y0: 0.0,
            x1: size.x,
            y1: size.y,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Grows the accumulator to cover `rect`.
    pub fn union_rect(&mut self, rect: Rect) {
        self.x0 = self.x0.min(rect.x);
        self.y0 = self.y0.min(rect.y);
        self.x1 = self.x1.max(rect.x + rect.w);
        self.y1 = self.y1.max(rect.y + rect.h);
    }

    /// Clips the accumulator to `[0, size.x] × [0, size.y]`.
    pub fn clamp(&mut self, size: Vec2) {
        self.x0 = self.x0.max(0.0);
        self.y0 = self.y0.max(0.0);
        self.x1 = self.x1.min(size.x);
        self.y1 = self.y1.min(size.y);
    }

    /// The accumulated region, or `None` when nothing is dirty.
    pub fn as_rect(&self) -> Option<Rect> {
        if self.is_empty() {
            None
        } else {
            Some(Rect::new(
                self.x0,
                self.y0,
                self.x1 - self.x0,
                self.y1 - self.y0,
            ))
        }
    }
}

/// World-space axis-aligned bounding box of a node: the corners of its local
/// box (pivot to pivot + size) mapped through the transforms of the full
/// ancestor chain, including the pivot translation containers apply to their
/// children.
pub fn world_bounds(scene: &Scene, id: NodeId) -> Option<Rect> {
    let node = scene.get(id)?;

    // Collect the ancestor chain, root first.
    let mut chain = Vec::new();
    let mut cursor = node.parent;
    while let Some(ancestor) = cursor {
        chain.push(ancestor);
        cursor = scene.get(ancestor)?.parent;
    }

    let mut m = Transform::IDENTITY;
    for ancestor in chain.iter().rev() {
        let a = scene.get(*ancestor)?;
        m = m.compose(&a.transform, a.pos);
        m.translate(a.pivot);
    }
    m = m.compose(&node.transform, node.pos);

    let size = node.size.unwrap_or(Vec2::ZERO);
    let corners = [
        node.pivot,
        node.pivot + Vec2::new(size.x, 0.0),
        node.pivot + Vec2::new(0.0, size.y),
        node.pivot + size,
    ];

    let mut acc = DirtyRect::EMPTY;
    for corner in corners {
        let p = m.apply(corner);
        acc.union_rect(Rect::new(p.x, p.y, 0.0, 0.0));
    }
    Some(Rect::new(acc.x0, acc.y0, acc.x1 - acc.x0, acc.y1 - acc.y0))
}
