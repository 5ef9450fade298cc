//! Animation manager
//!
//! Owns every running animation and advances them together each tick.

use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::{Animation, Playback};
use crate::animator::TargetRef;
use crate::error::Result;
use crate::pool::TweenPool;

new_key_type! {
    pub struct AnimationId;
}

/// The manager that ticks all of its animations
///
/// Each `update` first reaps the animations that are finished and auto-removed,
/// then advances the rest. Reaped tweens go back to the pool when one is attached.
pub struct AnimationManager {
    animations: SlotMap<AnimationId, Animation>,
    order: Vec<AnimationId>,
    paused: bool,
    pool: Option<Rc<RefCell<TweenPool>>>,
}

impl AnimationManager {
    pub fn new() -> Self {
        Self {
            animations: SlotMap::with_key(),
            order: Vec::new(),
            paused: false,
            pool: None,
        }
    }

    /// A manager that recycles reaped tweens into `pool`
    pub fn with_pool(pool: Rc<RefCell<TweenPool>>) -> Self {
        Self {
            pool: Some(pool),
            ..Self::new()
        }
    }

    /// Take ownership of `animation`, starting it when auto-start is on.
    ///
    /// If starting fails the animation is dropped and the error returned.
    pub fn add(&mut self, animation: impl Into<Animation>) -> Result<AnimationId> {
        let mut animation = animation.into();
        if animation.state().auto_start() {
            animation.start()?;
        }
        let id = self.animations.insert(animation);
        self.order.push(id);
        Ok(id)
    }

    /// Reap finished animations, then advance the others by `delta`.
    ///
    /// Negative deltas visit the animations in reverse insertion order.
    pub fn update(&mut self, delta: f32) {
        for index in (0..self.order.len()).rev() {
            let id = self.order[index];
            let reap = self
                .animations
                .get(id)
                .map_or(true, |animation| {
                    animation.is_finished() && animation.state().auto_remove()
                });
            if reap {
                self.order.remove(index);
                if let Some(animation) = self.animations.remove(id) {
                    self.recycle(animation);
                }
            }
        }

        if self.paused {
            return;
        }

        if delta >= 0.0 {
            for id in self.order.iter() {
                if let Some(animation) = self.animations.get_mut(*id) {
                    animation.update(delta);
                }
            }
        } else {
            for id in self.order.iter().rev() {
                if let Some(animation) = self.animations.get_mut(*id) {
                    animation.update(delta);
                }
            }
        }
    }

    fn recycle(&mut self, mut animation: Animation) {
        let kind = match animation {
            Animation::Tween(_) => "tween",
            Animation::Timeline(_) => "timeline",
        };
        tracing::debug!(kind, remaining = self.order.len(), "reaping animation");
        match &self.pool {
            Some(pool) => pool.borrow_mut().release_animation(animation),
            None => animation.reset(),
        }
    }

    /// Stop every animation; they are reaped on the next update.
    pub fn cancel_all(&mut self) {
        for (_, animation) in self.animations.iter_mut() {
            animation.stop();
        }
    }

    /// Stop whatever animates `target`, looking inside timelines. `None` matches
    /// every tween type. Returns whether anything was stopped.
    pub fn cancel_target(&mut self, target: &TargetRef, tween_type: Option<i32>) -> bool {
        let mut cancelled = false;
        for id in self.order.iter() {
            if let Some(animation) = self.animations.get_mut(*id) {
                cancelled |= animation.cancel_target(target, tween_type);
            }
        }
        cancelled
    }

    pub fn contains_target(&self, target: &TargetRef, tween_type: Option<i32>) -> bool {
        self.animations
            .values()
            .any(|animation| animation.contains_target(target, tween_type))
    }

    /// Number of tweens, counting those nested in timelines
    pub fn tweens_count(&self) -> usize {
        self.animations.values().map(count_tweens).sum()
    }

    /// Number of timelines, counting nested ones
    pub fn timelines_count(&self) -> usize {
        self.animations.values().map(count_timelines).sum()
    }

    /// Number of top-level animations
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: AnimationId) -> Option<&Animation> {
        self.animations.get(id)
    }

    pub fn get_mut(&mut self, id: AnimationId) -> Option<&mut Animation> {
        self.animations.get_mut(id)
    }

    /// Remove an animation without resetting it
    pub fn remove(&mut self, id: AnimationId) -> Option<Animation> {
        let animation = self.animations.remove(id)?;
        self.order.retain(|other| *other != id);
        Some(animation)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (AnimationId, &Animation)> {
        self.order
            .iter()
            .filter_map(|id| self.animations.get(*id).map(|animation| (*id, animation)))
    }

    /// Stop advancing time; finished animations are still reaped.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Drop every animation, returning tweens to the pool
    pub fn clear(&mut self) {
        self.order.clear();
        let drained: Vec<Animation> = self
            .animations
            .drain()
            .map(|(_, animation)| animation)
            .collect();
        for animation in drained {
            self.recycle(animation);
        }
    }
}

impl Default for AnimationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnimationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationManager")
            .field("animations", &self.order.len())
            .field("paused", &self.paused)
            .field("pooled", &self.pool.is_some())
            .finish()
    }
}

fn count_tweens(animation: &Animation) -> usize {
    match animation {
        Animation::Tween(_) => 1,
        Animation::Timeline(timeline) => timeline.children().iter().map(count_tweens).sum(),
    }
}

fn count_timelines(animation: &Animation) -> usize {
    match animation {
        Animation::Tween(_) => 0,
        Animation::Timeline(timeline) => {
            1 + timeline
                .children()
                .iter()
                .map(count_timelines)
                .sum::<usize>()
        }
    }
}
