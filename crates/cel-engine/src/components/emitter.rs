// components/emitter.rs
//
// Particle emitter configuration. An emitter is a container that spawns
// `count` short-lived subtrees per tick; each spawned subtree carries its own
// remaining-lifetime counter, independent of the emitter's lifetime. The
// spawning itself happens in `systems::update`.

use std::fmt;

use crate::api::types::NodeId;
use crate::components::node::Node;
use crate::core::scene::Scene;

/// Factory producing a detached subtree for each spawned particle.
pub type SpawnFn = Box<dyn FnMut(&mut Scene) -> NodeId>;

/// Callback fired after each particle is spliced into the emitter.
pub type EmitFn = Box<dyn FnMut(&mut Scene, NodeId)>;

/// Emitter configuration carried by `Role::Emitter` nodes.
pub struct EmitterState {
    /// Particle lifetime in ticks.
    pub life: u32,
    /// Particles spawned per tick.
    pub count: u32,
    pub(crate) spawn: SpawnFn,
    pub(crate) on_emit: Option<EmitFn>,
}

impl Default for EmitterState {
    fn default() -> Self {
        Self::new()
    }
}

impl EmitterState {
    pub fn new() -> Self {
        Self {
            life: 10,
            count: 1,
            spawn: Self::default_spawn(),
            on_emit: None,
        }
    }

    /// The default source: an empty clip per particle.
    pub(crate) fn default_spawn() -> SpawnFn {
        Box::new(|scene: &mut Scene| scene.spawn(Node::clip()))
    }

    // -- Builder pattern --

    pub fn with_life(mut self, life: u32) -> Self {
        self.life = life;
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_spawn(mut self, spawn: impl FnMut(&mut Scene) -> NodeId + 'static) -> Self {
        self.spawn = Box::new(spawn);
        self
    }

    pub fn with_on_emit(mut self, on_emit: impl FnMut(&mut Scene, NodeId) + 'static) -> Self {
        self.on_emit = Some(Box::new(on_emit));
        self
    }
}

impl fmt::Debug for EmitterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitterState")
            .field("life", &self.life)
            .field("count", &self.count)
            .field("on_emit", &self.on_emit.is_some())
            .finish()
    }
}
