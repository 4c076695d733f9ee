// systems/paint.rs
//
// Paint traversal: begin (save state, apply alpha/styles/transform), paint
// by role, end (restore). The restore is held by an RAII guard so the state
// stack stays balanced on any exit path out of the paint step.

use crate::api::types::{NodeId, Rect};
use crate::components::node::{Node, Role};
use crate::components::visual::{TextBlock, TextMode, Visual};
use crate::core::scene::Scene;
use crate::renderer::surface::Surface;

/// Draws the subtree rooted at `id` onto `surface`.
///
/// Children paint front-to-back in insertion order: the first-added child
/// draws first and ends up below later siblings.
pub fn draw<S: Surface>(scene: &Scene, id: NodeId, surface: &mut S) {
    let Some(node) = scene.get(id) else { return };

    // Void draw: tweens and bare action nodes produce no output and skip
    // the whole begin/end bracket.
    match &node.role {
        Role::Tween(_) | Role::Leaf(Visual::Blank) => return,
        _ => {}
    }

    surface.save();
    let guard = RestoreGuard { surface };
    begin(node, &mut *guard.surface);
    paint(scene, node, &mut *guard.surface);
}

/// Pops the surface state pushed before `begin`, on every exit path.
struct RestoreGuard<'a, S: Surface> {
    surface: &'a mut S,
}

impl<S: Surface> Drop for RestoreGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

fn begin<S: Surface>(node: &Node, surface: &mut S) {
    if node.alpha != 1.0 {
        surface.multiply_alpha(node.alpha);
    }

    let style = &node.style;
    if let Some(fill) = &style.fill {
        surface.set_fill(fill);
    }
    if let Some(stroke) = &style.stroke {
        surface.set_stroke(stroke);
    }
    if let Some(font) = &style.font {
        surface.set_font(font);
    }
    if let Some(width) = style.line_width {
        surface.set_line_width(width);
    }
    if let Some(cap) = style.line_cap {
        surface.set_line_cap(cap);
    }
    if let Some(join) = style.line_join {
        surface.set_line_join(join);
    }
    if let Some(limit) = style.miter_limit {
        surface.set_miter_limit(limit);
    }

    let t = &node.transform;
    surface.transform(t.a, t.b, t.c, t.d, node.pos.x, node.pos.y);
}

fn paint<S: Surface>(scene: &Scene, node: &Node, surface: &mut S) {
    match &node.role {
        Role::Clip(cs) | Role::Emitter(cs, _) => {
            surface.translate(node.pivot.x, node.pivot.y);
            let mut cursor = cs.frame().head;
            while let Some(child) = cursor {
                draw(scene, child, surface);
                cursor = scene.get(child).and_then(|n| n.next);
            }
        }
        Role::Leaf(Visual::Bitmap(source)) => {
            // Bitmaps blit at natural size; scaling goes through the transform.
            let dst = Rect::new(node.pivot.x, node.pivot.y, source.size.x, source.size.y);
            surface.draw_image(source, None, dst);
        }
        Role::Leaf(Visual::Sprite(region)) => {
            let size = node.size.unwrap_or_else(|| region.src.size());
            let dst = Rect::new(node.pivot.x, node.pivot.y, size.x, size.y);
            surface.draw_image(&region.image, Some(region.src), dst);
        }
        Role::Leaf(Visual::Text(block)) => paint_text(node, block, surface),
        Role::Leaf(Visual::Blank) | Role::Tween(_) => {}
    }
}

fn paint_text<S: Surface>(node: &Node, block: &TextBlock, surface: &mut S) {
    let (x, y) = (node.pivot.x, node.pivot.y);
    match block.mode {
        TextMode::Fill => surface.fill_text(&block.text, x, y),
        TextMode::Stroke => surface.stroke_text(&block.text, x, y),
        TextMode::FillStroke => {
            surface.fill_text(&block.text, x, y);
            surface.stroke_text(&block.text, x, y);
        }
        TextMode::Multiline => {
            let mut dy = 0.0;
            for line in block.text.split('\n') {
                surface.fill_text(line, x, y + dy);
                dy += block.line_height;
            }
        }
    }
}
