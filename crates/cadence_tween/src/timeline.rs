//! Timeline orchestration for multiple animations

use std::fmt;

use crate::animation::{Animation, AnimationState, Playback};
use crate::animator::TargetRef;
use crate::error::{Result, TweenError};
use crate::tween::Tween;

/// How a timeline lays out its children
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineMode {
    /// Each child starts when the previous one ends
    Sequence,
    /// Every child starts with the timeline
    Parallel,
}

/// A timeline that orchestrates multiple animations
///
/// Children are laid out when the timeline is first started: in a sequence each
/// child's delay is shifted by the full duration of the children before it, and
/// the timeline's own duration becomes the sum (sequence) or the maximum
/// (parallel) of the children's full durations.
pub struct Timeline {
    state: AnimationState,
    mode: TimelineMode,
    children: Vec<Animation>,
    is_built: bool,
}

impl Timeline {
    pub fn new(mode: TimelineMode) -> Self {
        Self {
            state: AnimationState::new(),
            mode,
            children: Vec::new(),
            is_built: false,
        }
    }

    pub fn sequence() -> Self {
        Self::new(TimelineMode::Sequence)
    }

    pub fn parallel() -> Self {
        Self::new(TimelineMode::Parallel)
    }

    /// Append a child (a tween or a nested timeline)
    pub fn add(&mut self, child: impl Into<Animation>) -> Result<()> {
        if self.is_built {
            return Err(TweenError::TimelineBuilt);
        }
        self.children.push(child.into());
        Ok(())
    }

    /// Append an empty child lasting `time`
    pub fn add_pause(&mut self, time: f32) -> Result<()> {
        let pause = Tween::mark().delay(time)?;
        self.add(pause)
    }

    pub fn push(mut self, child: impl Into<Animation>) -> Result<Self> {
        self.add(child)?;
        Ok(self)
    }

    pub fn push_pause(mut self, time: f32) -> Result<Self> {
        self.add_pause(time)?;
        Ok(self)
    }

    pub fn mode(&self) -> TimelineMode {
        self.mode
    }

    pub fn children(&self) -> &[Animation] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_built(&self) -> bool {
        self.is_built
    }

    /// Detach the children, leaving the timeline empty and unbuilt
    pub(crate) fn take_children(&mut self) -> Vec<Animation> {
        self.is_built = false;
        std::mem::take(&mut self.children)
    }

    /// Lay the children out and compute the duration. Runs once.
    pub(crate) fn build(&mut self) -> Result<()> {
        if self.is_built {
            return Ok(());
        }
        if self.children.iter().any(|child| child.state().repeat_count() < 0) {
            return Err(TweenError::InfiniteRepeatInTimeline);
        }
        for child in self.children.iter_mut() {
            child.build()?;
        }

        let mut duration = 0.0_f32;
        for child in self.children.iter_mut() {
            let full = child.state().full_duration().unwrap_or(0.0);
            match self.mode {
                TimelineMode::Sequence => {
                    child.state_mut().delay += duration;
                    duration += full;
                }
                TimelineMode::Parallel => duration = duration.max(full),
            }
        }

        tracing::debug!(
            mode = ?self.mode,
            children = self.children.len(),
            duration,
            "timeline built"
        );
        self.state.duration = duration;
        self.is_built = true;
        Ok(())
    }

    fn update_children(&mut self, delta: f32, forward: bool) {
        if forward {
            for child in self.children.iter_mut() {
                child.update(delta);
            }
        } else {
            for child in self.children.iter_mut().rev() {
                child.update(delta);
            }
        }
    }
}

impl Playback for Timeline {
    fn state(&self) -> &AnimationState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AnimationState {
        &mut self.state
    }

    fn unstarted(&mut self) -> Result<()> {
        self.build()?;
        for child in self.children.iter_mut() {
            child.start()?;
        }
        Ok(())
    }

    fn update_override(&mut self, step: i32, last_step: i32, is_iteration_step: bool, delta: f32) {
        if !is_iteration_step {
            // Push every child well past the boundary so they all settle on it
            let reversed = self.state.is_reverse(last_step);
            if step > last_step {
                let dt = if reversed { -delta - 1.0 } else { delta + 1.0 };
                self.update_children(dt, true);
            } else if step < last_step {
                let dt = if reversed { -delta + 1.0 } else { delta - 1.0 };
                self.update_children(dt, false);
            }
            return;
        }

        if step != last_step {
            // Entering an iteration: resync the children onto the boundary, the
            // consumed time belongs to the repeat delay
            let reversed = self.state.is_reverse(step);
            if (step > last_step) != reversed {
                self.force_start_values();
            } else {
                self.force_end_values();
            }
            self.update_children(0.0, step > last_step);
            return;
        }

        let dt = if self.state.is_reverse(step) { -delta } else { delta };
        self.update_children(dt, dt >= 0.0);
    }

    fn force_start_values(&mut self) {
        for child in self.children.iter_mut().rev() {
            child.force_to_start();
        }
    }

    fn force_end_values(&mut self) {
        let duration = self.state.duration;
        for child in self.children.iter_mut() {
            child.force_to_end(duration);
        }
    }

    fn contains_target(&self, target: &TargetRef, tween_type: Option<i32>) -> bool {
        self.children
            .iter()
            .any(|child| child.contains_target(target, tween_type))
    }

    /// Forwards to the children so only the matching ones stop.
    fn cancel_target(&mut self, target: &TargetRef, tween_type: Option<i32>) -> bool {
        let mut cancelled = false;
        for child in self.children.iter_mut() {
            cancelled |= child.cancel_target(target, tween_type);
        }
        cancelled
    }

    fn reset_override(&mut self) {
        self.children.clear();
        self.is_built = false;
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::sequence()
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("children", &self.children)
            .field("is_built", &self.is_built)
            .finish()
    }
}
