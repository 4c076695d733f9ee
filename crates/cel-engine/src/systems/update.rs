// systems/update.rs
//
// Logic traversal. Free functions over &mut Scene, so node callbacks get
// full scene access while the walk is in flight.
//
// Traversal contract (relied on by self-removing nodes such as particles):
// the walk re-reads the current child's forward link after its update runs.
// A node that removed itself keeps its `next` pointer, so the walk steps to
// its old successor; a removed downstream sibling is already spliced out and
// is simply never reached. Nodes appended at the tail during the pass are
// visited when the walk gets there.

use crate::animation::tween::StepOutcome;
use crate::api::types::NodeId;
use crate::components::emitter::EmitterState;
use crate::components::node::Role;
use crate::core::scene::Scene;

/// Runs one logic tick over the subtree rooted at `root`.
pub fn update(scene: &mut Scene, root: NodeId) {
    update_node(scene, root);
}

fn update_node(scene: &mut Scene, id: NodeId) {
    // Particle lifetime gate: expired nodes remove themselves instead of
    // updating.
    let mut expired = false;
    match scene.get_mut(id) {
        None => return,
        Some(node) => match node.remaining_life {
            Some(0) => expired = true,
            Some(life) => node.remaining_life = Some(life - 1),
            None => {}
        },
    }
    if expired {
        scene.remove(id);
        return;
    }

    run_hook(scene, id);

    enum Kind {
        Leaf,
        Clip,
        Emitter,
        Tween,
    }
    let kind = match scene.get(id) {
        None => return,
        Some(node) => match node.role {
            Role::Leaf(_) => Kind::Leaf,
            Role::Clip(_) => Kind::Clip,
            Role::Emitter(..) => Kind::Emitter,
            Role::Tween(_) => Kind::Tween,
        },
    };

    match kind {
        Kind::Leaf => {}
        Kind::Tween => step_tween(scene, id),
        Kind::Clip => {
            update_children(scene, id);
            advance(scene, id);
        }
        Kind::Emitter => {
            emit(scene, id);
            update_children(scene, id);
            advance(scene, id);
        }
    }
}

/// Runs the node's own update callback, if any. The callback is moved out
/// for the call so it can freely mutate the scene, then restored unless it
/// replaced itself.
fn run_hook(scene: &mut Scene, id: NodeId) {
    let Some(mut callback) = scene.get_mut(id).and_then(|n| n.update.take()) else {
        return;
    };
    callback(scene, id);
    if let Some(node) = scene.get_mut(id) {
        if node.update.is_none() {
            node.update = Some(callback);
        }
    }
}

fn update_children(scene: &mut Scene, id: NodeId) {
    let mut cursor = scene
        .get(id)
        .and_then(|n| n.clip_state())
        .and_then(|cs| cs.frame().head);

    while let Some(child) = cursor {
        update_node(scene, child);
        cursor = scene.get(child).and_then(|n| n.next);
    }
}

fn advance(scene: &mut Scene, id: NodeId) {
    if let Some(cs) = scene.get_mut(id).and_then(|n| n.clip_state_mut()) {
        cs.advance();
    }
}

fn step_tween(scene: &mut Scene, id: NodeId) {
    // The tween is moved out for the step so it can write to its target
    // through the scene without aliasing its own node.
    let Some(mut tween) = scene.get_mut(id).and_then(|n| match &mut n.role {
        Role::Tween(t) => Some(std::mem::take(t)),
        _ => None,
    }) else {
        return;
    };

    let outcome = tween.step(scene);

    if let Some(node) = scene.get_mut(id) {
        if let Role::Tween(slot) = &mut node.role {
            *slot = tween;
        }
    }
    if outcome == StepOutcome::Remove {
        scene.remove(id);
    }
}

fn emit(scene: &mut Scene, id: NodeId) {
    let taken = scene.get_mut(id).and_then(|n| match &mut n.role {
        Role::Emitter(_, emitter) => {
            let spawn = std::mem::replace(&mut emitter.spawn, EmitterState::default_spawn());
            let on_emit = emitter.on_emit.take();
            Some((emitter.life, emitter.count, spawn, on_emit))
        }
        _ => None,
    });
    let Some((life, count, mut spawn, mut on_emit)) = taken else {
        return;
    };

    for _ in 0..count {
        let particle = spawn(scene);
        if let Some(node) = scene.get_mut(particle) {
            node.remaining_life = Some(life);
        }
        if let Err(err) = scene.add_node(id, particle) {
            log::warn!("emitter could not attach particle: {err}");
            scene.despawn(particle);
            break;
        }
        if let Some(f) = &mut on_emit {
            f(scene, particle);
        }
    }

    if let Some(node) = scene.get_mut(id) {
        if let Role::Emitter(_, emitter) = &mut node.role {
            emitter.spawn = spawn;
            if emitter.on_emit.is_none() {
                emitter.on_emit = on_emit;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::easing::Easing;
    use crate::animation::tween::{Repeat, Tween, TweenProp};
    use crate::components::node::Node;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn tick(scene: &mut Scene, root: NodeId) {
        update(scene, root);
        scene.sweep();
    }

    #[test]
    fn actions_run_in_insertion_order() {
        let mut scene = Scene::new();
        let root = scene.spawn(Node::clip());
        let seen = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let log = seen.clone();
            let action = scene.spawn(Node::action(move |_, _| log.borrow_mut().push(i)));
            scene.add_node(root, action).unwrap();
        }

        tick(&mut scene, root);
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn self_removal_does_not_break_traversal() {
        let mut scene = Scene::new();
        let root = scene.spawn(Node::clip());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        let first = scene.spawn(Node::action(move |scene, me| {
            log.borrow_mut().push("first");
            scene.remove(me);
        }));
        scene.add_node(root, first).unwrap();

        let log = seen.clone();
        let second = scene.spawn(Node::action(move |_, _| log.borrow_mut().push("second")));
        scene.add_node(root, second).unwrap();

        tick(&mut scene, root);
        assert_eq!(*seen.borrow(), vec!["first", "second"]);
        assert!(!scene.contains(first));

        // Next pass only sees the survivor.
        tick(&mut scene, root);
        assert_eq!(*seen.borrow(), vec!["first", "second", "second"]);
    }

    #[test]
    fn removing_a_downstream_sibling_skips_it() {
        let mut scene = Scene::new();
        let root = scene.spawn(Node::clip());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        let victim = scene.spawn(Node::action(move |_, _| log.borrow_mut().push("victim")));

        let log = seen.clone();
        let killer = scene.spawn(Node::action(move |scene, _| {
            log.borrow_mut().push("killer");
            scene.remove(victim);
        }));

        scene.add_node(root, killer).unwrap();
        scene.add_node(root, victim).unwrap();

        tick(&mut scene, root);
        assert_eq!(*seen.borrow(), vec!["killer"]);
    }

    #[test]
    fn tail_appends_are_visited_in_the_same_pass() {
        let mut scene = Scene::new();
        let root = scene.spawn(Node::clip());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        let inner = seen.clone();
        let appender = scene.spawn(Node::action(move |scene, _| {
            log.borrow_mut().push("appender");
            let inner = inner.clone();
            let late = scene.spawn(Node::action(move |scene, me| {
                inner.borrow_mut().push("late");
                scene.remove(me);
            }));
            scene.add_node(root, late).unwrap();
        }));
        scene.add_node(root, appender).unwrap();

        tick(&mut scene, root);
        assert_eq!(*seen.borrow(), vec!["appender", "late"]);
    }

    #[test]
    fn playing_clip_advances_frames() {
        let mut scene = Scene::new();
        let root = scene.spawn(Node::clip());
        let clip = scene.spawn(Node::clip());
        scene.add_node(root, clip).unwrap();
        scene.add_frame(clip).unwrap();
        scene.go_to_frame(clip, 0).unwrap();

        tick(&mut scene, root);
        assert_eq!(scene.current_frame(clip), Some(1));
        tick(&mut scene, root);
        assert_eq!(scene.current_frame(clip), Some(0));
    }

    #[test]
    fn stopped_clip_updates_children_without_advancing() {
        let mut scene = Scene::new();
        let root = scene.spawn(Node::clip());
        let clip = scene.spawn(Node::clip());
        scene.add_node(root, clip).unwrap();
        scene.add_frame(clip).unwrap();
        scene.go_to_frame(clip, 0).unwrap();
        scene.get_mut(clip).unwrap().clip_state_mut().unwrap().stop();

        let ran = Rc::new(RefCell::new(0));
        let log = ran.clone();
        let action = scene.spawn(Node::action(move |_, _| *log.borrow_mut() += 1));
        scene.add_node(clip, action).unwrap();

        tick(&mut scene, root);
        assert_eq!(scene.current_frame(clip), Some(0));
        assert_eq!(*ran.borrow(), 1);
    }

    #[test]
    fn only_the_current_frame_updates() {
        let mut scene = Scene::new();
        let root = scene.spawn(Node::clip());
        let ran = Rc::new(RefCell::new(0));

        let log = ran.clone();
        let hidden = scene.spawn(Node::action(move |_, _| *log.borrow_mut() += 1));
        scene.add_node(root, hidden).unwrap();

        // Frame 1 is empty and current; stop so the cursor stays there.
        scene.add_frame(root).unwrap();
        scene
            .get_mut(root)
            .unwrap()
            .clip_state_mut()
            .unwrap()
            .stop();

        tick(&mut scene, root);
        assert_eq!(*ran.borrow(), 0);
    }

    #[test]
    fn emitter_spawns_and_particles_expire() {
        let mut scene = Scene::new();
        let root = scene.spawn(Node::clip());
        let emitter = scene.spawn(Node::emitter(
            EmitterState::new().with_count(2).with_life(3),
        ));
        scene
            .get_mut(emitter)
            .unwrap()
            .clip_state_mut()
            .unwrap()
            .stop();
        scene.add_node(root, emitter).unwrap();

        tick(&mut scene, root);
        assert_eq!(scene.children(emitter).count(), 2);

        // Each pass spawns 2 more; the first batch dies after 3 updates.
        tick(&mut scene, root);
        tick(&mut scene, root);
        assert_eq!(scene.children(emitter).count(), 6);

        tick(&mut scene, root);
        // First batch expired and was swept; 2 fresh ones arrived.
        assert_eq!(scene.children(emitter).count(), 6);
    }

    #[test]
    fn on_emit_sees_each_particle() {
        let mut scene = Scene::new();
        let root = scene.spawn(Node::clip());
        let spawned = Rc::new(RefCell::new(Vec::new()));
        let log = spawned.clone();

        let emitter = scene.spawn(Node::emitter(
            EmitterState::new()
                .with_count(3)
                .with_on_emit(move |_, particle| log.borrow_mut().push(particle)),
        ));
        scene.add_node(root, emitter).unwrap();

        tick(&mut scene, root);
        let spawned = spawned.borrow();
        assert_eq!(spawned.len(), 3);
        for id in spawned.iter() {
            assert_eq!(scene.get(*id).unwrap().parent(), Some(emitter));
        }
    }

    #[test]
    fn tween_node_drives_its_target() {
        let mut scene = Scene::new();
        let root = scene.spawn(Node::clip());
        let target = scene.spawn(Node::clip());
        scene.add_node(root, target).unwrap();

        let tween = scene.spawn(Node::tween(
            Tween::new(target)
                .with_track_from(TweenProp::X, 0.0, 100.0)
                .with_duration(10)
                .with_easing(Easing::Linear)
                .with_repeat(Repeat::Count(0)),
        ));
        scene.add_node(root, tween).unwrap();

        for _ in 0..5 {
            tick(&mut scene, root);
        }
        assert_eq!(scene.get(target).unwrap().pos.x, 50.0);

        for _ in 0..5 {
            tick(&mut scene, root);
        }
        assert_eq!(scene.get(target).unwrap().pos.x, 100.0);
        assert!(scene.contains(tween));
    }

    #[test]
    fn auto_remove_tween_detaches_and_sweeps() {
        let mut scene = Scene::new();
        let root = scene.spawn(Node::clip());
        let target = scene.spawn(Node::clip());
        scene.add_node(root, target).unwrap();

        let tween = scene.spawn(Node::tween(
            Tween::new(target)
                .with_track_from(TweenProp::Alpha, 1.0, 0.0)
                .with_duration(2)
                .with_auto_remove(true),
        ));
        scene.add_node(root, tween).unwrap();

        tick(&mut scene, root);
        assert!(scene.contains(tween));
        tick(&mut scene, root);
        assert!(!scene.contains(tween));
        assert_eq!(scene.get(target).unwrap().alpha, 0.0);
    }
}
