// core/stage.rs
//
// The root of the scene tree, bound to a raster surface. The stage owns the
// scene arena, the visible surface, an offscreen render region (which also
// serves as the engine-scoped scratch for text measurement), the resolution,
// and the accumulated dirty rectangle.

use glam::Vec2;

use crate::api::error::{EngineError, EngineResult};
use crate::api::types::{NodeId, Rect};
use crate::components::node::Node;
use crate::components::visual::TextBlock;
use crate::core::scene::{Item, Scene};
use crate::renderer::surface::Surface;
use crate::systems::damage::{world_bounds, DirtyRect};
use crate::systems::{paint, update};

/// How the stage presents a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootMode {
    /// Clear and repaint everything into the offscreen buffer, then blit the
    /// whole frame to the visible surface.
    #[default]
    Buffered,
    /// Repaint into the offscreen buffer but clear and blit only the
    /// accumulated dirty rectangle.
    DirtyOnly,
    /// Paint straight onto the visible surface.
    Direct,
}

/// Root container bound to a raster surface.
pub struct Stage<S: Surface> {
    scene: Scene,
    root: NodeId,
    screen: S,
    render: S,
    size: Vec2,
    mode: RootMode,
    dirty: DirtyRect,
}

impl<S: Surface> Stage<S> {
    /// Builds a stage over a visible surface. Zero or negative resolutions
    /// are rejected.
    pub fn new(mut screen: S, width: f32, height: f32) -> EngineResult<Self> {
        if width <= 0.0 || height <= 0.0 {
            return Err(EngineError::InvalidArgument(format!(
                "invalid stage resolution: {width}x{height}"
            )));
        }

        let render = screen.create_region(width, height);
        let mut scene = Scene::new();
        let root = scene.spawn(Node::clip().with_size(width, height));
        let size = Vec2::new(width, height);

        Ok(Self {
            scene,
            root,
            screen,
            render,
            size,
            mode: RootMode::default(),
            // Everything is dirty until the first frame lands.
            dirty: DirtyRect::full(size),
        })
    }

    pub fn with_mode(mut self, mode: RootMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_mode(&mut self, mode: RootMode) {
        self.mode = mode;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// The visible surface handle.
    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.screen
    }

    /// Changes the resolution, recreating the offscreen region and marking
    /// the whole stage dirty.
    pub fn set_resolution(&mut self, width: f32, height: f32) -> EngineResult<()> {
        if width <= 0.0 || height <= 0.0 {
            return Err(EngineError::InvalidArgument(format!(
                "invalid stage resolution: {width}x{height}"
            )));
        }

        log::debug!("stage resolution set to {width}x{height}");
        self.size = Vec2::new(width, height);
        self.render = self.screen.create_region(width, height);
        if let Some(root) = self.scene.get_mut(self.root) {
            root.resize(width, height);
        }
        self.dirty = DirtyRect::full(self.size);
        Ok(())
    }

    /// Adds an item to the root's current frame.
    pub fn add(&mut self, item: Item) -> EngineResult<()> {
        self.scene.add(self.root, item)
    }

    /// Runs one logic tick over the tree, then reclaims removed nodes.
    pub fn update(&mut self) {
        update::update(&mut self.scene, self.root);
        self.scene.sweep();
    }

    /// Marks damage. `None` dirties the whole stage; `Some(id)` unions the
    /// node's world-space bounding box, clamped to stage bounds.
    pub fn invalidate(&mut self, child: Option<NodeId>) {
        match child {
            None => self.dirty = DirtyRect::full(self.size),
            Some(id) => {
                if let Some(bounds) = world_bounds(&self.scene, id) {
                    self.dirty.union_rect(bounds);
                    self.dirty.clamp(self.size);
                }
            }
        }
    }

    /// The currently accumulated dirty rectangle, if any.
    pub fn dirty_rect(&self) -> Option<Rect> {
        self.dirty.as_rect()
    }

    /// Paints one frame according to the root mode.
    pub fn draw(&mut self) {
        match self.mode {
            RootMode::Direct => {
                self.screen.clear_region(Rect::from_size(self.size));
                paint::draw(&self.scene, self.root, &mut self.screen);
            }
            RootMode::Buffered => {
                let full = Rect::from_size(self.size);
                self.render.clear_region(full);
                paint::draw(&self.scene, self.root, &mut self.render);
                self.screen.clear_region(full);
                self.screen.blit(&self.render, full, Vec2::ZERO);
            }
            RootMode::DirtyOnly => {
                let Some(rect) = self.dirty.as_rect() else {
                    return;
                };
                self.render.clear_region(rect);
                paint::draw(&self.scene, self.root, &mut self.render);
                self.screen.clear_region(rect);
                self.screen.blit(&self.render, rect, rect.origin());
                self.dirty = DirtyRect::EMPTY;
            }
        }
    }

    /// Measures a text block on the stage's scratch region, applying `font`
    /// when given.
    pub fn measure_text(&mut self, block: &TextBlock, font: Option<&str>) -> f32 {
        block.measure_width(font, &mut self.render)
    }
}
