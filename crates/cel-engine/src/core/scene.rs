// core/scene.rs
//
// Node storage and scene-graph surgery. Nodes live in a generational slot
// arena; containers reference their children through intrusive prev/next
// links forming one doubly-linked ring per frame. This keeps insert-at-tail
// and removal-given-node O(1) without raw back-pointers.
//
// Removal semantics are load-bearing for traversal: detaching clears the
// node's `parent` and `prev` but leaves its `next` untouched, so the update
// walk can step off a node that removed itself mid-callback. Detached nodes
// park in a graveyard and their slots are reclaimed by `sweep` after the
// update pass.

use glam::Vec2;

use crate::api::error::{EngineError, EngineResult};
use crate::api::types::NodeId;
use crate::components::clip::{ClipState, Frame};
use crate::components::node::{Align, HitShape, Node, Role, UpdateFn};
use crate::components::visual::Visual;

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// What `Scene::add` accepts: the closed union of addable things, decided at
/// the call site rather than by runtime type inspection.
pub enum Item {
    /// A bare callback, wrapped into an invisible action node.
    Action(UpdateFn),
    /// An already-spawned node, spliced in by handle.
    Node(NodeId),
    /// A visual payload, wrapped into a leaf node.
    Visual(Visual),
    /// A sequence, added individually in order.
    Many(Vec<Item>),
}

/// Arena of scene nodes plus the ring surgery connecting them.
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    graveyard: Vec<NodeId>,
    len: usize,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(256),
            free: Vec::new(),
            graveyard: Vec::new(),
            len: 0,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a detached node into the arena.
    pub fn spawn(&mut self, node: Node) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    // ── Attachment ───────────────────────────────────────────────────────

    /// Adds an item to the container's current frame.
    pub fn add(&mut self, container: NodeId, item: Item) -> EngineResult<()> {
        match item {
            Item::Action(update) => {
                let child = self.spawn(Node::action(update));
                self.add_node(container, child)?;
            }
            Item::Node(id) => {
                self.add_node(container, id)?;
            }
            Item::Visual(Visual::Blank) => {
                return Err(EngineError::invalid_argument(
                    "cannot add a blank visual to a container",
                ));
            }
            Item::Visual(visual) => {
                let child = self.spawn(Node::leaf(visual));
                self.add_node(container, child)?;
            }
            Item::Many(items) => {
                for item in items {
                    self.add(container, item)?;
                }
            }
        }
        Ok(())
    }

    /// O(1) fast path: detaches `child` from any prior parent and splices it
    /// at the tail of `container`'s current frame.
    pub fn add_node(&mut self, container: NodeId, child: NodeId) -> EngineResult<()> {
        if container == child {
            return Err(EngineError::invalid_argument(
                "cannot add a node to itself",
            ));
        }
        if !self.contains(child) {
            return Err(EngineError::invalid_argument("stale child handle"));
        }
        if self
            .get(container)
            .and_then(|n| n.clip_state())
            .is_none()
        {
            return Err(EngineError::invalid_argument(
                "target node is not a container",
            ));
        }
        // Splicing an ancestor under its own descendant would close a cycle.
        let mut ancestor = self.get(container).and_then(|n| n.parent);
        while let Some(a) = ancestor {
            if a == child {
                return Err(EngineError::invalid_argument(
                    "cannot add an ancestor to its descendant",
                ));
            }
            ancestor = self.get(a).and_then(|n| n.parent);
        }

        self.detach(child);

        let tail = self
            .get(container)
            .and_then(|n| n.clip_state())
            .map(|cs| cs.frame().tail)
            .unwrap_or(None);

        if let Some(t) = tail {
            if let Some(tail_node) = self.get_mut(t) {
                tail_node.next = Some(child);
            }
        }
        if let Some(cs) = self.get_mut(container).and_then(|n| n.clip_state_mut()) {
            let frame = cs.frame_mut();
            if frame.head.is_none() {
                frame.head = Some(child);
            }
            frame.tail = Some(child);
        }
        if let Some(node) = self.get_mut(child) {
            node.prev = tail;
            node.next = None;
            node.parent = Some(container);
        }
        Ok(())
    }

    /// Splices the node out of its ring. Idempotent: a detached node is left
    /// alone. The slot is reclaimed by the next [`Scene::sweep`].
    pub fn remove(&mut self, id: NodeId) {
        match self.get(id) {
            Some(node) if node.parent.is_some() => {}
            _ => return,
        }
        self.detach(id);
        self.graveyard.push(id);
    }

    /// Immediately frees a node and its whole subtree.
    pub fn despawn(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.detach(id);
        self.free_subtree(id);
        true
    }

    /// Reclaims slots of removed nodes. Nodes re-attached since their
    /// removal survive. Called by the stage at the end of each update pass.
    pub fn sweep(&mut self) {
        let dead = std::mem::take(&mut self.graveyard);
        for id in dead {
            if self.get(id).is_some_and(|n| n.parent.is_none()) {
                self.free_subtree(id);
            }
        }
    }

    fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let Some(parent) = node.parent else { return };
        let prev = node.prev;
        let next = node.next;

        match prev {
            Some(p) => {
                if let Some(prev_node) = self.get_mut(p) {
                    prev_node.next = next;
                }
            }
            None => {
                // Head of one of the parent's frames.
                if let Some(cs) = self.get_mut(parent).and_then(|n| n.clip_state_mut()) {
                    for frame in &mut cs.frames {
                        if frame.head == Some(id) {
                            frame.head = next;
                            break;
                        }
                    }
                }
            }
        }
        match next {
            Some(nx) => {
                if let Some(next_node) = self.get_mut(nx) {
                    next_node.prev = prev;
                }
            }
            None => {
                if let Some(cs) = self.get_mut(parent).and_then(|n| n.clip_state_mut()) {
                    for frame in &mut cs.frames {
                        if frame.tail == Some(id) {
                            frame.tail = prev;
                            break;
                        }
                    }
                }
            }
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
            node.prev = None;
            // `next` is deliberately kept: see the module header.
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let Some(slot) = self.slots.get_mut(id.index as usize) else {
            return;
        };
        if slot.generation != id.generation {
            return;
        }
        let Some(node) = slot.node.take() else { return };
        slot.generation += 1;
        self.free.push(id.index);
        self.len -= 1;

        if let Some(cs) = match node.role {
            Role::Clip(cs) | Role::Emitter(cs, _) => Some(cs),
            _ => None,
        } {
            for frame in cs.frames {
                let mut cursor = frame.head;
                while let Some(child) = cursor {
                    let next = self.get(child).and_then(|n| n.next);
                    self.free_subtree(child);
                    cursor = next;
                }
            }
        }
    }

    // ── Frames ───────────────────────────────────────────────────────────

    /// Appends an empty frame to the container and makes it current.
    /// Returns the new frame index.
    pub fn add_frame(&mut self, container: NodeId) -> EngineResult<usize> {
        let cs = self.clip_state_mut_checked(container)?;
        cs.frames.push(Frame::default());
        let index = cs.frames.len() - 1;
        cs.seek(index);
        Ok(index)
    }

    /// Appends a frame already populated with `item`.
    pub fn add_frame_with(&mut self, container: NodeId, item: Item) -> EngineResult<usize> {
        let index = self.add_frame(container)?;
        self.add(container, item)?;
        Ok(index)
    }

    /// Switches the container's current frame, bounds-checked.
    pub fn go_to_frame(&mut self, container: NodeId, index: usize) -> EngineResult<()> {
        let cs = self.clip_state_mut_checked(container)?;
        let len = cs.frames.len();
        if index >= len {
            return Err(EngineError::FrameIndexOutOfRange { index, len });
        }
        cs.seek(index);
        Ok(())
    }

    /// Deletes a frame (freeing its children) and re-targets the current
    /// frame to `max(index - 1, 0)`. The last frame cannot be removed.
    pub fn remove_frame(&mut self, container: NodeId, index: usize) -> EngineResult<()> {
        let head = {
            let cs = self.clip_state_mut_checked(container)?;
            let len = cs.frames.len();
            if index >= len {
                return Err(EngineError::FrameIndexOutOfRange { index, len });
            }
            if len == 1 {
                return Err(EngineError::CannotRemoveLastFrame);
            }
            let frame = cs.frames.remove(index);
            cs.seek(index.saturating_sub(1));
            frame.head
        };

        let mut cursor = head;
        while let Some(child) = cursor {
            let next = self.get(child).and_then(|n| n.next);
            self.free_subtree(child);
            cursor = next;
        }
        Ok(())
    }

    /// Index of the container's current frame.
    pub fn current_frame(&self, container: NodeId) -> Option<usize> {
        self.get(container)
            .and_then(|n| n.clip_state())
            .map(|cs| cs.current_frame())
    }

    /// True when the container's current frame has no children.
    pub fn is_frame_empty(&self, container: NodeId) -> bool {
        self.get(container)
            .and_then(|n| n.clip_state())
            .map_or(true, |cs| cs.frame().is_empty())
    }

    fn clip_state_mut_checked(&mut self, id: NodeId) -> EngineResult<&mut ClipState> {
        self.get_mut(id)
            .and_then(|n| n.clip_state_mut())
            .ok_or_else(|| EngineError::invalid_argument("node is not a container"))
    }

    // ── Iteration ────────────────────────────────────────────────────────

    /// Children of the container's current frame, in insertion order.
    pub fn children(&self, container: NodeId) -> Children<'_> {
        let head = self
            .get(container)
            .and_then(|n| n.clip_state())
            .and_then(|cs| cs.frame().head);
        Children {
            scene: self,
            cursor: head,
        }
    }

    /// Visits every child across all frames of the container.
    /// Order across frames is unspecified.
    pub fn each(&self, container: NodeId, mut f: impl FnMut(NodeId, &Node)) {
        let Some(cs) = self.get(container).and_then(|n| n.clip_state()) else {
            return;
        };
        for frame in &cs.frames {
            let mut cursor = frame.head;
            while let Some(id) = cursor {
                let Some(node) = self.get(id) else { break };
                f(id, node);
                cursor = node.next;
            }
        }
    }

    // ── Layout helpers ───────────────────────────────────────────────────

    /// Positions a node relative to its parent container.
    pub fn align(&mut self, id: NodeId, mode: Align) -> EngineResult<()> {
        let parent = self
            .get(id)
            .ok_or_else(|| EngineError::invalid_argument("stale node handle"))?
            .parent
            .ok_or_else(|| EngineError::invalid_argument("node has no parent"))?;
        let container = self
            .get(parent)
            .and_then(|n| n.size)
            .unwrap_or(Vec2::ZERO);
        if let Some(node) = self.get_mut(id) {
            node.align(mode, container);
        }
        Ok(())
    }

    /// Aligns every child (all frames) inside the container.
    pub fn align_children(&mut self, container: NodeId, mode: Align) -> EngineResult<()> {
        let size = self
            .get(container)
            .ok_or_else(|| EngineError::invalid_argument("stale node handle"))?
            .size
            .unwrap_or(Vec2::ZERO);
        let mut ids = Vec::new();
        self.each(container, |id, _| ids.push(id));
        for id in ids {
            if let Some(node) = self.get_mut(id) {
                node.align(mode, size);
            }
        }
        Ok(())
    }

    /// Wraps a node into a new clip of the same size and returns the clip.
    pub fn to_clip(&mut self, id: NodeId) -> EngineResult<NodeId> {
        let size = self
            .get(id)
            .ok_or_else(|| EngineError::invalid_argument("stale node handle"))?
            .size;
        let mut clip = Node::clip();
        clip.size = size;
        clip.hit = HitShape::Children;
        let wrapper = self.spawn(clip);
        self.add_node(wrapper, id)?;
        Ok(wrapper)
    }
}

/// Iterator over a frame ring, front to back.
pub struct Children<'a> {
    scene: &'a Scene,
    cursor: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cursor?;
        self.cursor = self.scene.get(id).and_then(|n| n.next);
        Some(id)
    }
}
