// animation/tween.rs
//
// Time-driven interpolation of node properties. A tween is itself a ring
// member (Role::Tween): the update traversal steps it once per logic tick
// and it writes eased values onto its target node.

use std::fmt;

use crate::api::types::NodeId;
use crate::components::node::Node;
use crate::core::rng::Rng;
use crate::core::scene::Scene;

use super::easing::Easing;

/// Property accessor pair. The closed set replaces name-string lookups:
/// tracks are validated by construction, not per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenProp {
    X,
    Y,
    Rotation,
    ScaleX,
    ScaleY,
    Alpha,
    Width,
    Height,
}

impl TweenProp {
    /// Reads the property's current value from a node.
    pub fn get(self, node: &Node) -> f32 {
        match self {
            TweenProp::X => node.pos.x,
            TweenProp::Y => node.pos.y,
            TweenProp::Rotation => node.transform.rotation(),
            TweenProp::ScaleX => node.transform.scale().x,
            TweenProp::ScaleY => node.transform.scale().y,
            TweenProp::Alpha => node.alpha,
            TweenProp::Width => node.size.map_or(0.0, |s| s.x),
            TweenProp::Height => node.size.map_or(0.0, |s| s.y),
        }
    }

    /// Writes a value through the property's mutator.
    pub fn set(self, node: &mut Node, value: f32) {
        match self {
            TweenProp::X => node.pos.x = value,
            TweenProp::Y => node.pos.y = value,
            TweenProp::Rotation => node.transform.set_rotation(value),
            TweenProp::ScaleX => node.transform.set_scale_x(value),
            TweenProp::ScaleY => node.transform.set_scale_y(value),
            TweenProp::Alpha => node.alpha = value.clamp(0.0, 1.0),
            TweenProp::Width => {
                let h = node.size.map_or(0.0, |s| s.y);
                node.resize(value, h);
            }
            TweenProp::Height => {
                let w = node.size.map_or(0.0, |s| s.x);
                node.resize(w, value);
            }
        }
    }
}

/// Completion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// Rewind this many more times, then stop.
    Count(u32),
    /// Rewind forever.
    Forever,
}

/// Playback phase. A fresh tween is `Playing`; natural completion without
/// repeats rests it in `Idle` until `play()` rewinds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenPhase {
    Idle,
    Playing,
    Paused,
}

/// One animated property: accessor, captured start, and end value.
#[derive(Debug, Clone, Copy)]
struct Track {
    prop: TweenProp,
    from: Option<f32>,
    to: f32,
}

/// How per-tick values are produced.
enum Sampler {
    /// `from + easing(t/duration) · (to - from)`.
    Eased(Easing),
    /// Uniform jitter around the captured start values; the final tick
    /// restores them. Used by [`Tween::shake`].
    Jitter { radius: f32, rng: Rng },
}

/// What the update traversal should do after stepping a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepOutcome {
    Keep,
    Remove,
}

/// Interpolates tracked properties of a target node over `duration` ticks.
/// The target is referenced, never owned — its lifetime is independent.
pub struct Tween {
    pub target: NodeId,
    tracks: Vec<Track>,
    sampler: Sampler,
    /// Duration in logic ticks.
    pub duration: u32,
    pub repeat: Repeat,
    /// Detach from the owning container on completion.
    pub auto_remove: bool,
    t: u32,
    phase: TweenPhase,
    started: bool,
    on_stop: Option<Box<dyn FnMut()>>,
    on_remove: Option<Box<dyn FnMut()>>,
}

impl Default for Tween {
    fn default() -> Self {
        Self::new(NodeId::DANGLING)
    }
}

impl Tween {
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            tracks: Vec::new(),
            sampler: Sampler::Eased(Easing::Linear),
            duration: 100,
            repeat: Repeat::Forever,
            auto_remove: false,
            t: 0,
            phase: TweenPhase::Playing,
            started: false,
            on_stop: None,
            on_remove: None,
        }
    }

    /// Screen-shake preset: jitters x/y within ±radius around the target's
    /// position at start, restores it on the final tick, then self-removes.
    pub fn shake(target: NodeId, radius: f32, duration: u32, seed: u64) -> Self {
        let mut tween = Self::new(target)
            .with_track(TweenProp::X, 0.0)
            .with_track(TweenProp::Y, 0.0)
            .with_duration(duration)
            .with_repeat(Repeat::Count(0))
            .with_auto_remove(true);
        tween.sampler = Sampler::Jitter {
            radius,
            rng: Rng::new(seed),
        };
        tween
    }

    // -- Builder pattern --

    /// Animate `prop` to `to`; the start value is captured lazily from the
    /// target on the first playing tick.
    pub fn with_track(mut self, prop: TweenProp, to: f32) -> Self {
        self.tracks.push(Track {
            prop,
            from: None,
            to,
        });
        self
    }

    /// Animate `prop` from an explicit start value to `to`.
    pub fn with_track_from(mut self, prop: TweenProp, from: f32, to: f32) -> Self {
        self.tracks.push(Track {
            prop,
            from: Some(from),
            to,
        });
        self
    }

    pub fn with_duration(mut self, ticks: u32) -> Self {
        self.duration = ticks;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.sampler = Sampler::Eased(easing);
        self
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_auto_remove(mut self, auto_remove: bool) -> Self {
        self.auto_remove = auto_remove;
        self
    }

    pub fn with_on_stop(mut self, on_stop: impl FnMut() + 'static) -> Self {
        self.on_stop = Some(Box::new(on_stop));
        self
    }

    pub fn with_on_remove(mut self, on_remove: impl FnMut() + 'static) -> Self {
        self.on_remove = Some(Box::new(on_remove));
        self
    }

    // -- Playback control --

    pub fn phase(&self) -> TweenPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == TweenPhase::Playing
    }

    /// Elapsed ticks in the current repeat cycle.
    pub fn elapsed(&self) -> u32 {
        self.t
    }

    /// Starts or resumes playback. From `Idle` this replays from t = 0.
    pub fn play(&mut self) {
        self.phase = TweenPhase::Playing;
    }

    /// Suspends playback, keeping all progress.
    pub fn pause(&mut self) {
        if self.phase == TweenPhase::Playing {
            self.phase = TweenPhase::Paused;
        }
    }

    /// Stops playback: rewinds, consumes one repeat, fires `on_stop`.
    pub fn stop(&mut self) {
        self.phase = TweenPhase::Idle;
        self.rewind();
        if let Some(f) = &mut self.on_stop {
            f();
        }
    }

    /// Stops then immediately replays from the beginning.
    pub fn restart(&mut self) {
        self.stop();
        self.play();
    }

    fn rewind(&mut self) {
        if let Repeat::Count(n) = &mut self.repeat {
            *n = n.saturating_sub(1);
        }
        self.t = 0;
    }

    fn repeats_remaining(&self) -> bool {
        match self.repeat {
            Repeat::Forever => true,
            Repeat::Count(n) => n > 0,
        }
    }

    /// Advances one tick: captures start values if needed, writes the eased
    /// values onto the target, and evaluates the completion policy.
    pub(crate) fn step(&mut self, scene: &mut Scene) -> StepOutcome {
        if self.phase != TweenPhase::Playing {
            return StepOutcome::Keep;
        }

        if !self.started {
            let Some(target) = scene.get(self.target) else {
                return StepOutcome::Keep;
            };
            for track in &mut self.tracks {
                if track.from.is_none() {
                    track.from = Some(track.prop.get(target));
                }
            }
            self.started = true;
        }

        self.t += 1;
        let v = if self.duration == 0 {
            1.0
        } else {
            (self.t as f32 / self.duration as f32).min(1.0)
        };

        if let Some(target) = scene.get_mut(self.target) {
            match &mut self.sampler {
                Sampler::Eased(easing) => {
                    let e = easing.apply(v);
                    for track in &self.tracks {
                        let from = track.from.unwrap_or(track.to);
                        track.prop.set(target, from + e * (track.to - from));
                    }
                }
                Sampler::Jitter { radius, rng } => {
                    for track in &self.tracks {
                        let from = track.from.unwrap_or(0.0);
                        let value = if v >= 1.0 {
                            from
                        } else {
                            from - *radius + rng.next_range(*radius * 2.0)
                        };
                        track.prop.set(target, value);
                    }
                }
            }
        }

        if self.t >= self.duration {
            if self.auto_remove {
                if let Some(f) = &mut self.on_remove {
                    f();
                }
                return StepOutcome::Remove;
            }
            if self.repeats_remaining() {
                self.rewind();
            } else {
                self.stop();
            }
        }

        StepOutcome::Keep
    }
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("target", &self.target)
            .field("tracks", &self.tracks.len())
            .field("duration", &self.duration)
            .field("t", &self.t)
            .field("phase", &self.phase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn scene_with_target() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let target = scene.spawn(Node::clip());
        (scene, target)
    }

    #[test]
    fn linear_track_reaches_midpoint_and_end() {
        let (mut scene, target) = scene_with_target();
        let mut tween = Tween::new(target)
            .with_track_from(TweenProp::X, 0.0, 100.0)
            .with_duration(10)
            .with_repeat(Repeat::Count(0));

        for _ in 0..5 {
            tween.step(&mut scene);
        }
        assert_eq!(scene.get(target).unwrap().pos.x, 50.0);

        for _ in 0..5 {
            tween.step(&mut scene);
        }
        assert_eq!(scene.get(target).unwrap().pos.x, 100.0);
        assert_eq!(tween.phase(), TweenPhase::Idle);

        // Stopped: further steps leave the target alone.
        tween.step(&mut scene);
        assert_eq!(scene.get(target).unwrap().pos.x, 100.0);
    }

    #[test]
    fn from_values_capture_lazily() {
        let (mut scene, target) = scene_with_target();
        scene.get_mut(target).unwrap().pos.x = 40.0;

        let mut tween = Tween::new(target)
            .with_track(TweenProp::X, 140.0)
            .with_duration(10)
            .with_repeat(Repeat::Count(0));

        for _ in 0..5 {
            tween.step(&mut scene);
        }
        assert_eq!(scene.get(target).unwrap().pos.x, 90.0);
    }

    #[test]
    fn repeat_rewinds_and_keeps_playing() {
        let (mut scene, target) = scene_with_target();
        let mut tween = Tween::new(target)
            .with_track_from(TweenProp::X, 0.0, 10.0)
            .with_duration(2)
            .with_repeat(Repeat::Count(1));

        tween.step(&mut scene);
        tween.step(&mut scene);
        // First cycle done, one repeat consumed.
        assert!(tween.is_playing());
        assert_eq!(tween.elapsed(), 0);

        tween.step(&mut scene);
        tween.step(&mut scene);
        assert_eq!(tween.phase(), TweenPhase::Idle);
    }

    #[test]
    fn auto_remove_requests_removal() {
        let (mut scene, target) = scene_with_target();
        let mut tween = Tween::new(target)
            .with_track_from(TweenProp::Alpha, 1.0, 0.0)
            .with_duration(1)
            .with_auto_remove(true);

        assert_eq!(tween.step(&mut scene), StepOutcome::Remove);
    }

    #[test]
    fn pause_holds_progress() {
        let (mut scene, target) = scene_with_target();
        let mut tween = Tween::new(target)
            .with_track_from(TweenProp::X, 0.0, 100.0)
            .with_duration(10);

        tween.step(&mut scene);
        tween.pause();
        tween.step(&mut scene);
        tween.step(&mut scene);
        assert_eq!(tween.elapsed(), 1);
        assert_eq!(scene.get(target).unwrap().pos.x, 10.0);

        tween.play();
        tween.step(&mut scene);
        assert_eq!(scene.get(target).unwrap().pos.x, 20.0);
    }

    #[test]
    fn on_stop_fires_on_natural_completion() {
        let (mut scene, target) = scene_with_target();
        let stopped = Rc::new(Cell::new(false));
        let flag = stopped.clone();

        let mut tween = Tween::new(target)
            .with_track_from(TweenProp::X, 0.0, 1.0)
            .with_duration(1)
            .with_repeat(Repeat::Count(0))
            .with_on_stop(move || flag.set(true));

        tween.step(&mut scene);
        assert!(stopped.get());
    }

    #[test]
    fn shake_restores_position() {
        let (mut scene, target) = scene_with_target();
        scene.get_mut(target).unwrap().pos.x = 30.0;
        scene.get_mut(target).unwrap().pos.y = 20.0;

        let mut tween = Tween::shake(target, 3.0, 5, 42);
        for _ in 0..4 {
            tween.step(&mut scene);
            let pos = scene.get(target).unwrap().pos;
            assert!((pos.x - 30.0).abs() <= 3.0);
            assert!((pos.y - 20.0).abs() <= 3.0);
        }

        assert_eq!(tween.step(&mut scene), StepOutcome::Remove);
        let pos = scene.get(target).unwrap().pos;
        assert_eq!(pos.x, 30.0);
        assert_eq!(pos.y, 20.0);
    }

    #[test]
    fn vanished_target_is_tolerated() {
        let (mut scene, target) = scene_with_target();
        let mut tween = Tween::new(target)
            .with_track(TweenProp::X, 10.0)
            .with_duration(5);

        tween.step(&mut scene);
        scene.despawn(target);
        // Steps against a dead target are no-ops, not panics.
        tween.step(&mut scene);
        assert_eq!(tween.elapsed(), 2);
    }
}
