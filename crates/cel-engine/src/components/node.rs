// components/node.rs
//
// The positionable, transformable unit of the scene graph. A node is a fat
// struct: common state plus a closed Role union for the kind-specific parts.

use std::fmt;

use glam::Vec2;

use crate::animation::tween::Tween;
use crate::api::types::NodeId;
use crate::components::clip::ClipState;
use crate::components::emitter::EmitterState;
use crate::components::style::Style;
use crate::components::visual::{TextAlign, TextBlock, Visual};
use crate::core::scene::Scene;
use crate::core::transform::LocalTransform;

/// Per-tick logic hook. Runs with full scene access and the node's own id;
/// removing the node (or its siblings) from inside the hook is supported.
pub type UpdateFn = Box<dyn FnMut(&mut Scene, NodeId)>;

/// Kind-specific payload of a node.
pub enum Role {
    /// A drawable leaf.
    Leaf(Visual),
    /// A container of frames of child nodes.
    Clip(ClipState),
    /// A container that also spawns short-lived child subtrees.
    Emitter(ClipState, EmitterState),
    /// A property interpolator driven by the update traversal.
    Tween(Tween),
}

/// Point-containment strategy for hit testing, in local space.
#[derive(Debug, Clone, PartialEq)]
pub enum HitShape {
    /// Never hit (actions, tweens).
    None,
    /// Inside `[0, width) × [0, height)`.
    Rect,
    /// Within `radius` of the local origin.
    Circle { radius: f32 },
    /// Inside a convex polygon, tested against precomputed edge normals.
    Polygon { points: Vec<Vec2>, normals: Vec<Vec2> },
    /// Delegate to children, topmost first.
    Children,
}

impl HitShape {
    /// Builds a convex-polygon shape from vertices in screen-space clockwise
    /// order, precomputing one outward edge normal per vertex.
    pub fn polygon(points: Vec<Vec2>) -> Self {
        let n = points.len();
        let mut normals = Vec::with_capacity(n);
        for i in 0..n {
            let edge = points[(i + 1) % n] - points[i];
            normals.push(Vec2::new(edge.y, -edge.x));
        }
        Self::Polygon { points, normals }
    }
}

/// Named anchor modes for [`Node::align`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    /// Horizontal center: `x = container_width / 2`.
    Center,
    /// Vertical center: `y = container_height / 2`.
    Middle,
    CenterMiddle,
    /// Center the node's own box on its position.
    Origin,
    OriginTop,
    OriginBottom,
}

/// A scene-graph node.
///
/// Nodes are created detached, attached with `Scene::add`/`add_node`, and
/// belong to at most one frame ring at a time.
pub struct Node {
    /// Position within the parent.
    pub pos: Vec2,
    /// Rotation-pivot offset (applies before the node's own content).
    pub pivot: Vec2,
    /// Layout size. `None` means "not sized yet" (e.g. unmeasured text).
    pub size: Option<Vec2>,
    /// Opacity in [0, 1], multiplied down the subtree.
    pub alpha: f32,
    pub style: Style,
    pub transform: LocalTransform,
    pub(crate) parent: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    /// Optional per-tick hook; for containers this runs before the child pass.
    pub update: Option<UpdateFn>,
    /// Ticks left to live. Stamped by emitters; the update traversal removes
    /// the node when it reaches zero.
    pub remaining_life: Option<u32>,
    pub role: Role,
    pub hit: HitShape,
}

impl Node {
    fn with_role(role: Role, hit: HitShape) -> Self {
        Self {
            pos: Vec2::ZERO,
            pivot: Vec2::ZERO,
            size: None,
            alpha: 1.0,
            style: Style::default(),
            transform: LocalTransform::new(),
            parent: None,
            prev: None,
            next: None,
            update: None,
            remaining_life: None,
            role,
            hit,
        }
    }

    /// A drawable leaf, sized to the visual's natural size when it has one.
    pub fn leaf(visual: Visual) -> Self {
        let size = visual.natural_size();
        let mut node = Self::with_role(Role::Leaf(visual), HitShape::Rect);
        node.size = size;
        node
    }

    /// An invisible node wrapping a per-tick callback.
    pub fn action(update: impl FnMut(&mut Scene, NodeId) + 'static) -> Self {
        let mut node = Self::with_role(Role::Leaf(Visual::Blank), HitShape::None);
        node.update = Some(Box::new(update));
        node
    }

    /// A text leaf. Unsized until measured.
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_role(Role::Leaf(Visual::Text(TextBlock::new(text))), HitShape::Rect)
    }

    /// An empty container with one frame.
    pub fn clip() -> Self {
        Self::with_role(Role::Clip(ClipState::new()), HitShape::Children)
    }

    /// A particle-spawning container.
    pub fn emitter(emitter: EmitterState) -> Self {
        Self::with_role(
            Role::Emitter(ClipState::new(), emitter),
            HitShape::Children,
        )
    }

    /// A tween node; draws nothing and never hits.
    pub fn tween(tween: Tween) -> Self {
        Self::with_role(Role::Tween(tween), HitShape::None)
    }

    // -- Builder pattern --

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.pos = Vec2::new(x, y);
        self
    }

    pub fn with_size(mut self, w: f32, h: f32) -> Self {
        self.size = Some(Vec2::new(w, h));
        self
    }

    pub fn with_pivot(mut self, cx: f32, cy: f32) -> Self {
        self.pivot = Vec2::new(cx, cy);
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_hit(mut self, hit: HitShape) -> Self {
        self.hit = hit;
        self
    }

    pub fn with_update(mut self, update: impl FnMut(&mut Scene, NodeId) + 'static) -> Self {
        self.update = Some(Box::new(update));
        self
    }

    // -- State mutators --

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.pos += Vec2::new(dx, dy);
    }

    pub fn resize(&mut self, w: f32, h: f32) {
        self.size = Some(Vec2::new(w, h));
    }

    pub fn set_rotation(&mut self, angle: f32) {
        self.transform.set_rotation(angle);
    }

    /// Rotates relative to the current angle.
    pub fn rotate_by(&mut self, delta: f32) {
        self.transform.set_rotation(self.transform.rotation() + delta);
    }

    pub fn set_scale(&mut self, sx: f32, sy: f32) {
        self.transform.set_scale(Vec2::new(sx, sy));
    }

    /// Scales so the rendered size becomes `w × h`.
    pub fn stretch(&mut self, w: f32, h: f32) {
        if let Some(size) = self.size {
            if size.x != 0.0 && size.y != 0.0 {
                self.set_scale(w / size.x, h / size.y);
            }
        }
    }

    /// True when the node can contribute pixels.
    pub fn visible(&self) -> bool {
        self.alpha > 0.0
    }

    /// Positions the node inside a container of the given size.
    pub fn align(&mut self, mode: Align, container: Vec2) {
        let size = self.size.unwrap_or(Vec2::ZERO);
        match mode {
            Align::Left => self.pos.x = 0.0,
            Align::Right => self.pos.x = container.x - size.x,
            Align::Center => self.pos.x = container.x / 2.0,
            Align::Middle => self.pos.y = container.y / 2.0,
            Align::CenterMiddle => {
                self.pos = container / 2.0;
            }
            Align::Origin => self.pos = -size / 2.0,
            Align::OriginTop => self.pos = Vec2::new(-size.x / 2.0, -size.y),
            Align::OriginBottom => self.pos = Vec2::new(-size.x / 2.0, 0.0),
        }
    }

    /// Sets the horizontal pivot from a measured text width and records the
    /// width as the node size.
    pub fn align_text(&mut self, align: TextAlign, width: f32) {
        let h = self.size.map_or(0.0, |s| s.y);
        self.size = Some(Vec2::new(width, h));
        self.pivot.x = match align {
            TextAlign::Left => 0.0,
            TextAlign::Center => -width / 2.0,
            TextAlign::Right => -width,
        };
    }

    /// The owning container, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Frame bookkeeping, when the node is a container.
    pub fn clip_state(&self) -> Option<&ClipState> {
        match &self.role {
            Role::Clip(cs) | Role::Emitter(cs, _) => Some(cs),
            _ => None,
        }
    }

    pub fn clip_state_mut(&mut self) -> Option<&mut ClipState> {
        match &mut self.role {
            Role::Clip(cs) | Role::Emitter(cs, _) => Some(cs),
            _ => None,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match &self.role {
            Role::Leaf(_) => "leaf",
            Role::Clip(_) => "clip",
            Role::Emitter(..) => "emitter",
            Role::Tween(_) => "tween",
        };
        f.debug_struct("Node")
            .field("role", &role)
            .field("pos", &self.pos)
            .field("size", &self.size)
            .field("alpha", &self.alpha)
            .field("attached", &self.parent.is_some())
            .finish()
    }
}
