pub mod animation;
pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use animation::easing::{ease, lerp, Curve, Direction, Easing};
pub use animation::tween::{Repeat, Tween, TweenPhase, TweenProp};
pub use api::engine::{Engine, EngineConfig};
pub use api::error::{EngineError, EngineResult};
pub use api::host::{HostLoop, LoopHandle};
pub use api::types::{NodeId, Rect};
pub use assets::manifest::{AssetManifest, SheetDescriptor, SoundDescriptor, SpriteDescriptor};
pub use assets::provider::{AssetProvider, AudioId, ImageId, ImageSource};
pub use assets::sheet::SpriteSheet;
pub use components::clip::ClipState;
pub use components::emitter::{EmitFn, EmitterState, SpawnFn};
pub use components::node::{Align, HitShape, Node, Role, UpdateFn};
pub use components::style::{hsla, rgba, LineCap, LineJoin, Style};
pub use components::visual::{SpriteRegion, TextAlign, TextBlock, TextMode, Visual};
pub use core::scene::{Children, Item, Scene};
pub use core::stage::{RootMode, Stage};
pub use core::transform::{LocalTransform, Transform};
pub use renderer::record::{RecordSurface, SurfaceOp};
pub use renderer::surface::Surface;
pub use systems::damage::DirtyRect;
pub use systems::hit::hit_test;
