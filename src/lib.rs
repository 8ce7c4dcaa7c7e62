//! Vitrine is a deterministic, tick-driven runtime for interactive reveal
//! scenes: looping image-sequence sprites composited over a themed viewport,
//! a radial reveal/hide transition, a cursor follower, and background-audio
//! control.
//!
//! The public API is scene-oriented:
//!
//! - Load and validate a [`Scene`]
//! - Create an [`App`] rooted at the scene's asset directory
//! - Feed it [`Event`]s, advance it with [`App::tick`], and read frames via
//!   [`App::render_frame`]
#![forbid(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod foundation;
pub mod render;
pub mod scene;

pub use animation::driver::FrameDriver;
pub use animation::ease::Ease;
pub use animation::tween::{Lerp, Tween, TweenUpdate};
pub use foundation::core::{Placement, Point, Rgba8Premul, Theme, Vec2, Viewport};
pub use foundation::error::{VitrineError, VitrineResult};

pub use assets::decode::PreparedImage;
pub use assets::loader::{FrameLoader, LoadCompletion, LoadRequest, LoadToken, SpriteId};
pub use assets::sequence::{ImageSequence, SequenceDescriptor};
pub use render::compose::FrameRgba;
pub use render::sprite::Sprite;
pub use scene::app::{App, Event};
pub use scene::audio::{AudioBackend, AudioHandle, NullAudio};
pub use scene::model::{AudioAsset, CursorTiming, RevealTiming, Scene};
pub use scene::reveal::{RevealController, RevealState};
