// systems/hit.rs
//
// Point-containment queries. The query point stays in world space; each
// node maps it into local space through the accumulated inverse mapping
// (solved directly from the determinant, no inverse matrix materialized).

use glam::Vec2;

use crate::api::types::NodeId;
use crate::components::node::HitShape;
use crate::core::scene::Scene;
use crate::core::transform::Transform;

/// Returns the topmost node under the world-space point, starting the
/// search at `root`.
pub fn hit_test(scene: &Scene, root: NodeId, point: Vec2) -> Option<NodeId> {
    hit_node(scene, root, point, None)
}

fn hit_node(
    scene: &Scene,
    id: NodeId,
    point: Vec2,
    parent: Option<&Transform>,
) -> Option<NodeId> {
    let node = scene.get(id)?;
    let m = match parent {
        Some(pm) => pm.compose(&node.transform, node.pos),
        None => node.transform.to_affine(node.pos),
    };

    match &node.hit {
        HitShape::None => None,
        HitShape::Children => {
            // Reverse insertion order: the topmost-rendered child wins.
            let mut cursor = node.clip_state().and_then(|cs| cs.frame().tail);
            while let Some(child) = cursor {
                if let Some(hit) = hit_node(scene, child, point, Some(&m)) {
                    return Some(hit);
                }
                cursor = scene.get(child)?.prev;
            }
            None
        }
        HitShape::Rect => {
            // A degenerate accumulated matrix is a miss, not a failure.
            let local = m.unapply(point).ok()?;
            let size = node.size.unwrap_or(Vec2::ZERO);
            let inside = (0.0..size.x).contains(&local.x) && (0.0..size.y).contains(&local.y);
            inside.then_some(id)
        }
        HitShape::Circle { radius } => {
            let local = m.unapply(point).ok()?;
            (local.length_squared() <= radius * radius).then_some(id)
        }
        HitShape::Polygon { points, normals } => {
            let local = m.unapply(point).ok()?;
            points
                .iter()
                .zip(normals)
                .all(|(p, n)| n.dot(local - *p) <= 0.0)
                .then_some(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::node::Node;

    fn scene_with_root() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let root = scene.spawn(Node::clip());
        (scene, root)
    }

    #[test]
    fn rect_hit_and_miss() {
        let (mut scene, root) = scene_with_root();
        let rect = scene.spawn(Node::clip().with_size(10.0, 10.0).with_hit(HitShape::Rect));
        scene.add_node(root, rect).unwrap();

        assert_eq!(hit_test(&scene, root, Vec2::new(5.0, 5.0)), Some(rect));
        assert_eq!(hit_test(&scene, root, Vec2::new(15.0, 15.0)), None);
        // Half-open interval: the origin is inside, the far edge is not.
        assert_eq!(hit_test(&scene, root, Vec2::new(0.0, 0.0)), Some(rect));
        assert_eq!(hit_test(&scene, root, Vec2::new(10.0, 5.0)), None);
    }

    #[test]
    fn topmost_overlapping_child_wins() {
        let (mut scene, root) = scene_with_root();
        let a = scene.spawn(Node::clip().with_size(10.0, 10.0).with_hit(HitShape::Rect));
        let b = scene.spawn(Node::clip().with_size(10.0, 10.0).with_hit(HitShape::Rect));
        scene.add_node(root, a).unwrap();
        scene.add_node(root, b).unwrap();

        // B was added last, draws on top, and is tested first.
        assert_eq!(hit_test(&scene, root, Vec2::new(5.0, 5.0)), Some(b));

        scene.remove(b);
        assert_eq!(hit_test(&scene, root, Vec2::new(5.0, 5.0)), Some(a));
    }

    #[test]
    fn circle_uses_squared_distance() {
        let (mut scene, root) = scene_with_root();
        let circle = scene.spawn(
            Node::clip()
                .at(50.0, 50.0)
                .with_hit(HitShape::Circle { radius: 5.0 }),
        );
        scene.add_node(root, circle).unwrap();

        assert_eq!(hit_test(&scene, root, Vec2::new(53.0, 53.0)), Some(circle));
        assert_eq!(hit_test(&scene, root, Vec2::new(54.0, 54.0)), None);
    }

    #[test]
    fn polygon_short_circuits_on_first_violated_edge() {
        let (mut scene, root) = scene_with_root();
        let triangle = scene.spawn(Node::clip().with_hit(HitShape::polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 10.0),
        ])));
        scene.add_node(root, triangle).unwrap();

        assert_eq!(hit_test(&scene, root, Vec2::new(5.0, 4.0)), Some(triangle));
        assert_eq!(hit_test(&scene, root, Vec2::new(0.0, 9.0)), None);
    }

    #[test]
    fn transformed_node_hits_in_local_space() {
        let (mut scene, root) = scene_with_root();
        let rect = scene.spawn(
            Node::clip()
                .at(100.0, 0.0)
                .with_size(10.0, 10.0)
                .with_hit(HitShape::Rect),
        );
        scene.get_mut(rect).unwrap().set_scale(2.0, 2.0);
        scene.add_node(root, rect).unwrap();

        // World (115, 15) maps to local (7.5, 7.5).
        assert_eq!(hit_test(&scene, root, Vec2::new(115.0, 15.0)), Some(rect));
        assert_eq!(hit_test(&scene, root, Vec2::new(125.0, 5.0)), None);
    }

    #[test]
    fn zero_scale_is_a_miss_not_a_panic() {
        let (mut scene, root) = scene_with_root();
        let rect = scene.spawn(Node::clip().with_size(10.0, 10.0).with_hit(HitShape::Rect));
        scene.get_mut(rect).unwrap().set_scale(0.0, 0.0);
        scene.add_node(root, rect).unwrap();

        assert_eq!(hit_test(&scene, root, Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn nested_containers_compose_transforms() {
        let (mut scene, root) = scene_with_root();
        let inner = scene.spawn(Node::clip().at(100.0, 100.0));
        scene.add_node(root, inner).unwrap();

        let rect = scene.spawn(
            Node::clip()
                .at(10.0, 10.0)
                .with_size(10.0, 10.0)
                .with_hit(HitShape::Rect),
        );
        scene.add_node(inner, rect).unwrap();

        assert_eq!(hit_test(&scene, root, Vec2::new(115.0, 115.0)), Some(rect));
        assert_eq!(hit_test(&scene, root, Vec2::new(5.0, 5.0)), None);
    }
}
