// api/engine.rs
//
// The scheduler. Two independent temporal loops over one stage: a
// fixed-period logic loop driving `stage.update()`, and a paint loop chained
// off the host's display-refresh signal driving `stage.draw()`. The loops
// are never locked together — paint may run more or less often than logic.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::api::error::{EngineError, EngineResult};
use crate::api::host::{HostLoop, LoopHandle};
use crate::core::stage::Stage;
use crate::renderer::surface::Surface;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Logic ticks per second.
    pub fps: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { fps: 32.0 }
    }
}

impl EngineConfig {
    /// Period of the logic loop.
    pub fn logic_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }
}

/// State shared with the in-flight paint callback chain.
struct Shared {
    logic: Cell<Option<LoopHandle>>,
    paint: Cell<Option<LoopHandle>>,
    /// When false, any in-flight paint callback becomes a no-op and the
    /// chain ends.
    painting: Cell<bool>,
}

/// Coordinates the logic and paint loops over a stage.
pub struct Engine<H: HostLoop + 'static, S: Surface + 'static> {
    host: Rc<RefCell<H>>,
    stage: Rc<RefCell<Stage<S>>>,
    shared: Rc<Shared>,
    config: EngineConfig,
    paused: bool,
    on_destroy: Option<Box<dyn FnOnce()>>,
}

impl<H: HostLoop + 'static, S: Surface + 'static> Engine<H, S> {
    pub fn new(host: H, stage: Stage<S>, config: EngineConfig) -> EngineResult<Self> {
        if !(config.fps > 0.0) {
            return Err(EngineError::InvalidArgument(format!(
                "fps must be positive, got {}",
                config.fps
            )));
        }

        Ok(Self {
            host: Rc::new(RefCell::new(host)),
            stage: Rc::new(RefCell::new(stage)),
            shared: Rc::new(Shared {
                logic: Cell::new(None),
                paint: Cell::new(None),
                painting: Cell::new(false),
            }),
            config,
            paused: true,
            on_destroy: None,
        })
    }

    /// Registers a teardown hook fired by [`Engine::destroy`].
    pub fn with_on_destroy(mut self, on_destroy: impl FnOnce() + 'static) -> Self {
        self.on_destroy = Some(Box::new(on_destroy));
        self
    }

    /// Shared handle to the stage.
    pub fn stage(&self) -> Rc<RefCell<Stage<S>>> {
        self.stage.clone()
    }

    /// Shared handle to the host loop.
    pub fn host(&self) -> Rc<RefCell<H>> {
        self.host.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn fps(&self) -> f32 {
        self.config.fps
    }

    /// Starts (or restarts) both loops. Paints one frame immediately, then
    /// chains off the host's refresh signal.
    pub fn run(&mut self) {
        self.cancel_handles();
        self.shared.painting.set(true);

        self.stage.borrow_mut().draw();
        schedule_paint(&self.host, &self.stage, &self.shared);

        let stage = self.stage.clone();
        let handle = self.host.borrow_mut().schedule_repeating(
            self.config.logic_period(),
            Box::new(move || stage.borrow_mut().update()),
        );
        self.shared.logic.set(Some(handle));

        self.paused = false;
        log::debug!("engine running at {} logic ticks/s", self.config.fps);
    }

    /// Cancels both loops, leaving all engine state intact. Idempotent; any
    /// already-scheduled paint callback degrades to a no-op.
    pub fn pause(&mut self) {
        self.shared.painting.set(false);
        self.cancel_handles();
        self.paused = true;
        log::debug!("engine paused");
    }

    /// Restarts the loops if paused.
    pub fn resume(&mut self) {
        if self.paused {
            self.run();
        }
    }

    /// Pauses, then fires the teardown hook.
    pub fn destroy(mut self) {
        self.pause();
        if let Some(on_destroy) = self.on_destroy.take() {
            on_destroy();
        }
        log::debug!("engine destroyed");
    }

    fn cancel_handles(&self) {
        if let Some(handle) = self.shared.logic.take() {
            self.host.borrow_mut().cancel_repeating(handle);
        }
        if let Some(handle) = self.shared.paint.take() {
            self.host.borrow_mut().cancel_paint(handle);
        }
    }
}

/// Arms the next link of the paint chain: draw, then reschedule.
fn schedule_paint<H: HostLoop + 'static, S: Surface + 'static>(
    host: &Rc<RefCell<H>>,
    stage: &Rc<RefCell<Stage<S>>>,
    shared: &Rc<Shared>,
) {
    let host_next = host.clone();
    let stage_next = stage.clone();
    let shared_next = shared.clone();

    let handle = host.borrow_mut().schedule_next_paint(Box::new(move || {
        if !shared_next.painting.get() {
            return;
        }
        stage_next.borrow_mut().draw();
        schedule_paint(&host_next, &stage_next, &shared_next);
    }));
    shared.paint.set(Some(handle));
}
