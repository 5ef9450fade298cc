//! Tween recycling
//!
//! Reaped tweens are reset and parked here so their buffers can be reused by the
//! next tween obtained with the same limits.

use std::rc::Rc;

use crate::animation::{Animation, Playback};
use crate::animator::AnimatorRegistry;
use crate::error::Result;
use crate::tween::{Tween, TweenLimits};

/// Default number of idle tweens kept around
pub const DEFAULT_POOL_CAPACITY: usize = 64;

/// A free list of reset tweens
#[derive(Debug)]
pub struct TweenPool {
    free: Vec<Tween>,
    capacity: usize,
    registry: Option<Rc<AnimatorRegistry>>,
}

impl TweenPool {
    pub fn new(registry: Option<Rc<AnimatorRegistry>>, capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity.min(DEFAULT_POOL_CAPACITY)),
            capacity,
            registry,
        }
    }

    /// Take a pristine tween sized for `limits`.
    ///
    /// Buffers of a recycled tween are only reallocated when its limits differ.
    pub fn obtain(&mut self, limits: TweenLimits) -> Result<Tween> {
        let limits = limits.validate()?;
        match self.free.pop() {
            Some(mut tween) => {
                tween.reset_with_limits(limits)?;
                tween.set_registry(self.registry.clone());
                tracing::trace!(idle = self.free.len(), "reusing pooled tween");
                Ok(tween)
            }
            None => Tween::new(self.registry.clone(), limits),
        }
    }

    /// Reset `tween` and keep it if the pool has room.
    pub fn release(&mut self, mut tween: Tween) {
        tween.reset();
        if self.free.len() < self.capacity {
            self.free.push(tween);
        }
    }

    /// Release every tween inside `animation`, descending into timelines.
    pub fn release_animation(&mut self, animation: Animation) {
        match animation {
            Animation::Tween(tween) => self.release(*tween),
            Animation::Timeline(mut timeline) => {
                for child in timeline.take_children() {
                    self.release_animation(child);
                }
            }
        }
    }

    /// Number of idle tweens
    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.free.clear();
    }
}

impl Default for TweenPool {
    fn default() -> Self {
        Self::new(None, DEFAULT_POOL_CAPACITY)
    }
}
