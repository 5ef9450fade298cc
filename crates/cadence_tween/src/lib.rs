//! Cadence Tween Engine
//!
//! Delta-driven tweens, timelines, and a pooled animation manager.
//!
//! # Features
//!
//! - **Tweens**: interpolate up to N numeric attributes of any target through an
//!   [`Animator`], with easing, waypoints and relative targets
//! - **Repeat & Yoyo**: delays, repeat delays, infinite repetition, back-and-forth play
//! - **Reversible**: negative deltas play every animation backward
//! - **Timelines**: sequence or parallelize tweens and nested timelines
//! - **Pooled**: reaped tweens are reset and their buffers reused
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use cadence_tween::{Accessor, Easing, TweenEngine};
//!
//! struct Opacity(f32);
//!
//! struct OpacityAccessor;
//!
//! impl Accessor<Opacity> for OpacityAccessor {
//!     fn retrieve(&self, target: &Opacity, _: i32, values: &mut [f32]) -> usize {
//!         values[0] = target.0;
//!         1
//!     }
//!
//!     fn animate(&self, target: &mut Opacity, _: i32, values: &[f32]) {
//!         target.0 = values[0];
//!     }
//! }
//!
//! let engine = TweenEngine::default();
//! engine.register::<Opacity, _>(OpacityAccessor);
//!
//! let fade = Rc::new(RefCell::new(Opacity(1.0)));
//! let mut manager = engine.manager();
//! manager.add(engine.to(&fade, 0, 0.5)?.target(&[0.0])?.ease(Easing::Linear))?;
//!
//! manager.update(0.25);
//! assert!((fade.borrow().0 - 0.5).abs() < 1e-5);
//! # Ok::<(), cadence_tween::TweenError>(())
//! ```

pub mod animation;
pub mod animator;
pub mod config;
pub mod easing;
pub mod engine;
pub mod error;
pub mod interpolation;
pub mod manager;
pub mod pool;
pub mod timeline;
pub mod tween;

pub use animation::{
    Animation, AnimationEvent, AnimationState, EventMask, Playback, MAX_REPEAT_COUNT,
    REPEAT_INFINITY,
};
pub use animator::{Accessor, Animator, AnimatorRegistry, SelfAnimated, TargetClass, TargetRef};
pub use config::EngineConfig;
pub use easing::Easing;
pub use engine::TweenEngine;
pub use error::{Result, TweenError};
pub use interpolation::Interpolation;
pub use manager::{AnimationId, AnimationManager};
pub use pool::TweenPool;
pub use timeline::{Timeline, TimelineMode};
pub use tween::{Tween, TweenLimits, TweenMode};
