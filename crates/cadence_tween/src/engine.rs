//! Tween factory
//!
//! [`TweenEngine`] ties together the animator registry, the configuration and the
//! tween pool. Every tween it builds shares the same registry, starts from the
//! configured defaults and comes out of (and eventually goes back into) the pool.

use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::{AnimationEvent, Playback};
use crate::animator::{Accessor, AnimatorRegistry, TargetRef};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::manager::AnimationManager;
use crate::pool::TweenPool;
use crate::timeline::Timeline;
use crate::tween::{Tween, TweenLimits, TweenMode};

/// Builds tweens, timelines and managers sharing one registry and pool
#[derive(Debug)]
pub struct TweenEngine {
    registry: Rc<AnimatorRegistry>,
    config: EngineConfig,
    pool: Rc<RefCell<TweenPool>>,
}

impl TweenEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_registry(Rc::new(AnimatorRegistry::new()), config)
    }

    pub fn with_registry(registry: Rc<AnimatorRegistry>, config: EngineConfig) -> Self {
        let pool = TweenPool::new(Some(registry.clone()), config.pool_capacity);
        Self {
            registry,
            config,
            pool: Rc::new(RefCell::new(pool)),
        }
    }

    pub fn registry(&self) -> &Rc<AnimatorRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pool(&self) -> &Rc<RefCell<TweenPool>> {
        &self.pool
    }

    /// Register a typed accessor for `T`
    pub fn register<T: 'static, A: Accessor<T> + 'static>(&self, accessor: A) {
        self.registry.register::<T, A>(accessor);
    }

    /// Animate `target` from its live values to the values given with
    /// [`Tween::target`].
    pub fn to(
        &self,
        target: impl Into<TargetRef>,
        tween_type: i32,
        duration: f32,
    ) -> Result<Tween> {
        self.tween(TweenMode::To, Some(target.into()), tween_type, duration)
    }

    /// Snap `target` to the given values, then animate back to its live values.
    pub fn from(
        &self,
        target: impl Into<TargetRef>,
        tween_type: i32,
        duration: f32,
    ) -> Result<Tween> {
        self.tween(TweenMode::From, Some(target.into()), tween_type, duration)
    }

    /// Assign the given values once the delay has elapsed.
    pub fn set(&self, target: impl Into<TargetRef>, tween_type: i32) -> Result<Tween> {
        self.tween(TweenMode::Set, Some(target.into()), tween_type, 0.0)
    }

    /// A tween without target firing `callback` when it starts
    pub fn call<F: FnMut(AnimationEvent) + 'static>(&self, callback: F) -> Tween {
        self.apply_flags(Tween::call(callback))
    }

    /// An empty tween, useful as a timeline spacer
    pub fn mark(&self) -> Tween {
        self.apply_flags(Tween::mark())
    }

    /// Build a tween with the configured limits
    pub fn tween(
        &self,
        mode: TweenMode,
        target: Option<TargetRef>,
        tween_type: i32,
        duration: f32,
    ) -> Result<Tween> {
        self.tween_with_limits(mode, target, tween_type, duration, self.config.limits)
    }

    /// Build a tween whose buffers are sized by `limits` instead of the configured ones
    pub fn tween_with_limits(
        &self,
        mode: TweenMode,
        target: Option<TargetRef>,
        tween_type: i32,
        duration: f32,
        limits: TweenLimits,
    ) -> Result<Tween> {
        let mut tween = self.pool.borrow_mut().obtain(limits)?;
        if let Err(err) = tween.setup(mode, target, tween_type, duration) {
            self.pool.borrow_mut().release(tween);
            return Err(err);
        }
        tween.set_easing(Some(self.config.easing));
        tween.set_interpolation(Some(self.config.interpolation));
        Ok(self.apply_flags(tween))
    }

    pub fn sequence(&self) -> Timeline {
        self.apply_flags(Timeline::sequence())
    }

    pub fn parallel(&self) -> Timeline {
        self.apply_flags(Timeline::parallel())
    }

    /// A manager recycling its reaped tweens into this engine's pool
    pub fn manager(&self) -> AnimationManager {
        AnimationManager::with_pool(self.pool.clone())
    }

    fn apply_flags<P: Playback>(&self, mut animation: P) -> P {
        animation.set_auto_remove(self.config.auto_remove);
        animation.set_auto_start(self.config.auto_start);
        animation
    }
}

impl Default for TweenEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
