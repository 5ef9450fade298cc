//! Animation state machine
//!
//! Every animation walks the same step sequence:
//!
//! ```text
//! step: -1      0       1        2       3   ...  2n      2n+1
//!       delay | run 0 | repeat | run 1 | ... ... | run n | finished
//!               delay            delay
//! ```
//!
//! Even steps are run iterations, odd steps are repeat delays. [`Playback`] owns the
//! stepping logic as provided methods and calls back into its implementor through
//! hooks (`unstarted`, `initialize_override`, `update_override`,
//! `force_start_values`, `force_end_values`) at well-defined points. Time is only
//! ever advanced by `update(delta)`; negative deltas play the machine backward.

use std::fmt;
use std::ops::BitOr;

use crate::animator::TargetRef;
use crate::error::{Result, TweenError};
use crate::timeline::Timeline;
use crate::tween::Tween;

/// Repeat count meaning "repeat forever"
pub const REPEAT_INFINITY: i32 = -1;

/// Largest finite repeat count; its finished step `2n + 1` still fits an `i32`
pub const MAX_REPEAT_COUNT: i32 = (i32::MAX - 1) / 2;

/// Fraction of a span within which its boundary counts as reached
const BOUNDARY_TOLERANCE: f32 = 1e-5;

/// Slack allowed when comparing accumulated time against `span`
fn tolerance(span: f32) -> f32 {
    span * BOUNDARY_TOLERANCE
}

/// State-change notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationEvent {
    /// First iteration begins, after the delay
    Begin,
    /// Any iteration starts
    Start,
    /// Any iteration ends
    End,
    /// Last iteration ended
    Complete,
    /// Played backward into the last iteration from the finished state
    BackBegin,
    /// Played backward into any iteration
    BackStart,
    /// Played backward out of any iteration
    BackEnd,
    /// Played backward out of the first iteration
    BackComplete,
}

impl AnimationEvent {
    pub const fn mask(self) -> EventMask {
        EventMask(1 << self as u8)
    }
}

/// Set of events a subscriber listens to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EventMask(u8);

impl EventMask {
    pub const NONE: Self = Self(0);
    pub const ANY_FORWARD: Self = Self(0b0000_1111);
    pub const ANY_BACKWARD: Self = Self(0b1111_0000);
    pub const ANY: Self = Self(0b1111_1111);

    pub const fn contains(self, event: AnimationEvent) -> bool {
        self.0 & event.mask().0 != 0
    }
}

impl BitOr for EventMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<AnimationEvent> for EventMask {
    type Output = Self;

    fn bitor(self, rhs: AnimationEvent) -> Self {
        self | rhs.mask()
    }
}

impl From<AnimationEvent> for EventMask {
    fn from(event: AnimationEvent) -> Self {
        event.mask()
    }
}

/// A subscriber callback
pub type Callback = Box<dyn FnMut(AnimationEvent)>;

struct Subscriber {
    mask: EventMask,
    callback: Callback,
}

/// Timing, counters and lifecycle flags shared by every animation.
pub struct AnimationState {
    pub(crate) delay: f32,
    pub(crate) duration: f32,
    pub(crate) repeat_count: i32,
    pub(crate) repeat_delay: f32,
    pub(crate) is_yoyo: bool,

    pub(crate) step: i32,
    pub(crate) last_step: i32,
    pub(crate) current_time: f32,
    pub(crate) delta_time: f32,
    pub(crate) is_iteration_step: bool,

    pub(crate) is_started: bool,
    pub(crate) is_initialized: bool,
    pub(crate) is_finished: bool,
    pub(crate) is_killed: bool,
    pub(crate) is_paused: bool,

    pub(crate) auto_remove: bool,
    pub(crate) auto_start: bool,

    subscribers: Vec<Subscriber>,
}

impl AnimationState {
    pub fn new() -> Self {
        Self {
            delay: 0.0,
            duration: 0.0,
            repeat_count: 0,
            repeat_delay: 0.0,
            is_yoyo: false,
            step: -2,
            last_step: -2,
            current_time: 0.0,
            delta_time: 0.0,
            is_iteration_step: false,
            is_started: false,
            is_initialized: false,
            is_finished: false,
            is_killed: false,
            is_paused: false,
            auto_remove: true,
            auto_start: true,
            subscribers: Vec::new(),
        }
    }

    /// Back to a pristine, unstarted state. Subscribers are dropped.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Counters back to "started, nothing played yet"
    fn rewind(&mut self) {
        self.step = -2;
        self.last_step = -2;
        self.current_time = 0.0;
        self.delta_time = 0.0;
        self.is_iteration_step = false;
        self.is_initialized = false;
        self.is_finished = false;
        self.is_killed = false;
        self.is_paused = false;
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn repeat_count(&self) -> i32 {
        self.repeat_count
    }

    pub fn repeat_delay(&self) -> f32 {
        self.repeat_delay
    }

    pub fn is_yoyo(&self) -> bool {
        self.is_yoyo
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    pub fn last_step(&self) -> i32 {
        self.last_step
    }

    /// Index of the run iteration the step belongs to
    pub fn iteration(&self) -> i32 {
        self.step.div_euclid(2)
    }

    /// Time elapsed within the current step
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    pub fn is_iteration_step(&self) -> bool {
        self.is_iteration_step
    }

    pub fn auto_remove(&self) -> bool {
        self.auto_remove
    }

    pub fn auto_start(&self) -> bool {
        self.auto_start
    }

    /// Whether the iteration at `step` plays from target back to start
    pub fn is_reverse(&self, step: i32) -> bool {
        self.is_yoyo && step.rem_euclid(4) == 2
    }

    /// Last valid step for finite repeat counts
    pub(crate) fn max_step(&self) -> i32 {
        self.repeat_count * 2
    }

    fn is_valid(&self, step: i32) -> bool {
        self.repeat_count < 0 || (0..=self.max_step()).contains(&step)
    }

    /// Delay plus every iteration and repeat delay; `None` when repeating forever.
    pub fn full_duration(&self) -> Option<f32> {
        if self.repeat_count < 0 {
            return None;
        }
        let repeats = self.repeat_count as f32;
        Some(self.delay + self.duration + (self.repeat_delay + self.duration) * repeats)
    }

    fn set_step(&mut self, step: i32) {
        self.last_step = self.step;
        self.step = step;
    }

    fn refresh_finished(&mut self) {
        self.is_finished =
            self.repeat_count >= 0 && (self.step > self.max_step() || self.step < 0);
    }

    pub(crate) fn subscribe(&mut self, mask: EventMask, callback: Callback) {
        self.subscribers.push(Subscriber { mask, callback });
    }

    pub(crate) fn emit(&mut self, event: AnimationEvent) {
        for subscriber in self.subscribers.iter_mut() {
            if subscriber.mask.contains(event) {
                (subscriber.callback)(event);
            }
        }
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationState")
            .field("delay", &self.delay)
            .field("duration", &self.duration)
            .field("repeat_count", &self.repeat_count)
            .field("repeat_delay", &self.repeat_delay)
            .field("is_yoyo", &self.is_yoyo)
            .field("step", &self.step)
            .field("current_time", &self.current_time)
            .field("is_started", &self.is_started)
            .field("is_finished", &self.is_finished)
            .field("is_killed", &self.is_killed)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// The animation contract: hooks implemented by tweens and timelines, and the
/// state machine that drives them.
pub trait Playback {
    fn state(&self) -> &AnimationState;
    fn state_mut(&mut self) -> &mut AnimationState;

    /// Called by `start` before the counters are reset
    fn unstarted(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called once the delay has elapsed, right before the first iteration
    fn initialize_override(&mut self) {}

    /// Called on every step crossing and on every update inside an iteration.
    ///
    /// `is_iteration_step` is false when the call reports leaving an iteration, so
    /// implementors can snap to the exact boundary value.
    fn update_override(&mut self, step: i32, last_step: i32, is_iteration_step: bool, delta: f32);

    fn force_start_values(&mut self);
    fn force_end_values(&mut self);

    /// Whether this animation (or one of its children) animates `target`.
    /// `None` matches every tween type.
    fn contains_target(&self, target: &TargetRef, tween_type: Option<i32>) -> bool;

    /// Stop whatever animates `target`. Returns whether anything was stopped.
    fn cancel_target(&mut self, target: &TargetRef, tween_type: Option<i32>) -> bool {
        if self.contains_target(target, tween_type) {
            self.stop();
            true
        } else {
            false
        }
    }

    /// Called by `reset` after the shared state is cleared
    fn reset_override(&mut self) {}

    // ------------------------------------------------------------------------
    // State machine
    // ------------------------------------------------------------------------

    /// Start (or restart) the animation.
    fn start(&mut self) -> Result<()> {
        self.unstarted()?;

        let state = self.state_mut();
        if state.repeat_count < 0 && state.duration + state.repeat_delay <= 0.0 {
            return Err(TweenError::UnboundedRepeat);
        }
        state.rewind();
        state.is_started = true;
        Ok(())
    }

    /// Advance by `delta`; negative values play backward.
    fn update(&mut self, delta: f32) {
        {
            let state = self.state();
            if !state.is_started || state.is_paused || state.is_killed {
                return;
            }
        }

        self.state_mut().delta_time = delta;

        if !self.state().is_initialized {
            initialize_if_due(self);
        }

        if self.state().is_initialized {
            relaunch_if_due(self);
            advance_steps(self);
            self.state_mut().refresh_finished();
        }

        let state = self.state_mut();
        state.current_time += state.delta_time;
        state.delta_time = 0.0;
    }

    /// Stop immediately; the animation reports finished without another tick.
    fn stop(&mut self) {
        self.state_mut().is_killed = true;
    }

    fn pause(&mut self) {
        self.state_mut().is_paused = true;
    }

    fn resume(&mut self) {
        self.state_mut().is_paused = false;
    }

    fn is_started(&self) -> bool {
        self.state().is_started
    }

    fn is_initialized(&self) -> bool {
        self.state().is_initialized
    }

    fn is_finished(&self) -> bool {
        let state = self.state();
        state.is_finished || state.is_killed
    }

    fn is_paused(&self) -> bool {
        self.state().is_paused
    }

    /// Jump before the first iteration and snap to the start values.
    fn force_to_start(&mut self) {
        let state = self.state_mut();
        state.current_time = -state.delay;
        state.set_step(-1);
        state.is_iteration_step = false;

        if self.state().is_reverse(0) {
            self.force_end_values();
        } else {
            self.force_start_values();
        }
    }

    /// Jump past the last iteration, `time` being the parent's time since this
    /// animation's own delay started, and snap to the end values.
    fn force_to_end(&mut self, time: f32) {
        let state = self.state_mut();
        state.current_time = time - state.full_duration().unwrap_or(0.0);
        let max_step = state.max_step();
        state.set_step(max_step + 1);
        state.is_iteration_step = false;

        if self.state().is_reverse(max_step) {
            self.force_start_values();
        } else {
            self.force_end_values();
        }
    }

    /// Back to a pristine, reusable state.
    fn reset(&mut self) {
        self.state_mut().reset();
        self.reset_override();
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    fn set_delay(&mut self, delay: f32) -> Result<()> {
        if delay < 0.0 {
            return Err(TweenError::NegativeDelay(delay));
        }
        self.state_mut().delay = delay;
        Ok(())
    }

    /// Repeat `count` extra times ([`REPEAT_INFINITY`] for forever).
    fn set_repeat(&mut self, count: i32, delay: f32, yoyo: bool) -> Result<()> {
        if delay < 0.0 {
            return Err(TweenError::NegativeRepeatDelay(delay));
        }
        if count > MAX_REPEAT_COUNT {
            return Err(TweenError::RepeatCountLimit {
                given: count,
                limit: MAX_REPEAT_COUNT,
            });
        }
        let state = self.state_mut();
        state.repeat_count = count.max(REPEAT_INFINITY);
        state.repeat_delay = delay;
        state.is_yoyo = yoyo;
        Ok(())
    }

    fn set_auto_remove(&mut self, enabled: bool) {
        self.state_mut().auto_remove = enabled;
    }

    fn set_auto_start(&mut self, enabled: bool) {
        self.state_mut().auto_start = enabled;
    }

    /// Subscribe to the events in `mask`. Subscribers run in registration order.
    fn subscribe(&mut self, mask: EventMask, callback: Callback) {
        self.state_mut().subscribe(mask, callback);
    }

    fn delay(mut self, delay: f32) -> Result<Self>
    where
        Self: Sized,
    {
        self.set_delay(delay)?;
        Ok(self)
    }

    fn repeat(mut self, count: i32, delay: f32) -> Result<Self>
    where
        Self: Sized,
    {
        self.set_repeat(count, delay, false)?;
        Ok(self)
    }

    /// Repeat with every other iteration played backward
    fn repeat_yoyo(mut self, count: i32, delay: f32) -> Result<Self>
    where
        Self: Sized,
    {
        self.set_repeat(count, delay, true)?;
        Ok(self)
    }

    fn auto_remove(mut self, enabled: bool) -> Self
    where
        Self: Sized,
    {
        self.set_auto_remove(enabled);
        self
    }

    fn auto_start(mut self, enabled: bool) -> Self
    where
        Self: Sized,
    {
        self.set_auto_start(enabled);
        self
    }

    fn on<F>(mut self, mask: impl Into<EventMask>, callback: F) -> Self
    where
        Self: Sized,
        F: FnMut(AnimationEvent) + 'static,
    {
        self.subscribe(mask.into(), Box::new(callback));
        self
    }
}

fn initialize_if_due<P: Playback + ?Sized>(anim: &mut P) {
    let state = anim.state();
    if state.current_time + state.delta_time < state.delay - tolerance(state.delay) {
        return;
    }

    anim.initialize_override();

    let state = anim.state_mut();
    state.is_initialized = true;
    state.is_iteration_step = true;
    state.set_step(0);
    state.delta_time = (state.delta_time - (state.delay - state.current_time)).max(0.0);
    state.current_time = 0.0;
    state.emit(AnimationEvent::Begin);
    state.emit(AnimationEvent::Start);
}

/// Re-enter a finished animation that is played back into its range.
fn relaunch_if_due<P: Playback + ?Sized>(anim: &mut P) {
    let state = anim.state();
    if state.is_iteration_step || state.repeat_count < 0 {
        return;
    }
    let reached = state.current_time + state.delta_time;

    if state.step < 0 && state.delta_time > 0.0 && reached >= 0.0 {
        let delta = -state.current_time;
        let state = anim.state_mut();
        state.is_iteration_step = true;
        state.set_step(0);
        state.delta_time -= delta;
        state.current_time = 0.0;
        state.emit(AnimationEvent::Begin);
        state.emit(AnimationEvent::Start);
        anim.update_override(0, -1, true, delta);
    } else if state.step > state.max_step() && state.delta_time < 0.0 && reached < 0.0 {
        let delta = -state.current_time;
        let max_step = state.max_step();
        let state = anim.state_mut();
        state.is_iteration_step = true;
        state.set_step(max_step);
        state.delta_time -= delta;
        state.current_time = state.duration;
        state.emit(AnimationEvent::BackBegin);
        state.emit(AnimationEvent::BackStart);
        anim.update_override(max_step, max_step + 1, true, delta);
    }
}

/// Walk step boundaries until the pending delta is consumed.
///
/// The direction is fixed by the sign of the delta on entry (zero is forward), and a
/// boundary reached exactly is crossed in that direction. Accumulated time within a
/// small fraction of a boundary counts as reaching it, so deltas summing to a span
/// cross it however they are sliced.
fn advance_steps<P: Playback + ?Sized>(anim: &mut P) {
    let backward = anim.state().delta_time < 0.0;

    while anim.state().is_valid(anim.state().step) {
        let state = anim.state();
        let step = state.step;
        let time = state.current_time;
        let reached = time + state.delta_time;
        let duration = state.duration;
        let repeat_delay = state.repeat_delay;
        let in_iteration = state.is_iteration_step;

        if !backward && !in_iteration && reached >= repeat_delay - tolerance(repeat_delay) {
            // Repeat delay elapsed, next iteration starts
            let delta = repeat_delay - time;
            let state = anim.state_mut();
            state.is_iteration_step = true;
            state.set_step(step + 1);
            state.delta_time = (state.delta_time - delta).max(0.0);
            state.current_time = 0.0;
            state.emit(AnimationEvent::Start);

            if anim.state().is_reverse(step + 1) {
                anim.force_end_values();
            } else {
                anim.force_start_values();
            }
            anim.update_override(step + 1, step, true, delta);
        } else if !backward && in_iteration && reached >= duration - tolerance(duration) {
            // Iteration ends
            let delta = duration - time;
            let state = anim.state_mut();
            state.is_iteration_step = false;
            state.set_step(step + 1);
            state.delta_time = (state.delta_time - delta).max(0.0);
            state.current_time = duration;

            tracing::trace!(step = step + 1, "iteration end");
            anim.update_override(step + 1, step, false, delta);

            let state = anim.state_mut();
            state.emit(AnimationEvent::End);
            if state.repeat_count >= 0 && step + 1 > state.max_step() {
                state.emit(AnimationEvent::Complete);
            }
            state.current_time = 0.0;
        } else if backward && !in_iteration && reached <= tolerance(repeat_delay) {
            // Played back through a repeat delay into the previous iteration
            let delta = -time;
            let state = anim.state_mut();
            state.is_iteration_step = true;
            state.set_step(step - 1);
            state.delta_time = (state.delta_time - delta).min(0.0);
            state.current_time = duration;
            state.emit(AnimationEvent::BackStart);

            if anim.state().is_reverse(step - 1) {
                anim.force_start_values();
            } else {
                anim.force_end_values();
            }
            anim.update_override(step - 1, step, true, delta);
        } else if backward && in_iteration && reached <= tolerance(duration) {
            // Played back out of the iteration start
            let delta = -time;
            let state = anim.state_mut();
            state.is_iteration_step = false;
            state.set_step(step - 1);
            state.delta_time = (state.delta_time - delta).min(0.0);
            state.current_time = 0.0;

            tracing::trace!(step = step - 1, "iteration back end");
            anim.update_override(step - 1, step, false, delta);

            let state = anim.state_mut();
            state.emit(AnimationEvent::BackEnd);
            if step - 1 < 0 && state.repeat_count >= 0 {
                state.emit(AnimationEvent::BackComplete);
            } else {
                state.current_time = state.repeat_delay;
            }
        } else {
            // Delta fits inside the current step
            let state = anim.state_mut();
            let delta = state.delta_time;
            state.delta_time = 0.0;
            state.current_time += delta;
            state.last_step = step;

            if in_iteration {
                anim.update_override(step, step, true, delta);
            }
            break;
        }
    }
}

/// Any animation the engine can schedule.
#[derive(Debug)]
pub enum Animation {
    Tween(Box<Tween>),
    Timeline(Timeline),
}

impl Animation {
    pub fn as_tween(&self) -> Option<&Tween> {
        match self {
            Animation::Tween(tween) => Some(tween),
            Animation::Timeline(_) => None,
        }
    }

    pub fn as_tween_mut(&mut self) -> Option<&mut Tween> {
        match self {
            Animation::Tween(tween) => Some(tween),
            Animation::Timeline(_) => None,
        }
    }

    pub fn as_timeline(&self) -> Option<&Timeline> {
        match self {
            Animation::Timeline(timeline) => Some(timeline),
            Animation::Tween(_) => None,
        }
    }

    pub fn as_timeline_mut(&mut self) -> Option<&mut Timeline> {
        match self {
            Animation::Timeline(timeline) => Some(timeline),
            Animation::Tween(_) => None,
        }
    }

    /// Resolve durations ahead of the parent's own build
    pub(crate) fn build(&mut self) -> Result<()> {
        match self {
            Animation::Tween(_) => Ok(()),
            Animation::Timeline(timeline) => timeline.build(),
        }
    }
}

impl From<Tween> for Animation {
    fn from(tween: Tween) -> Self {
        Animation::Tween(Box::new(tween))
    }
}

impl From<Timeline> for Animation {
    fn from(timeline: Timeline) -> Self {
        Animation::Timeline(timeline)
    }
}

impl Playback for Animation {
    fn state(&self) -> &AnimationState {
        match self {
            Animation::Tween(tween) => tween.state(),
            Animation::Timeline(timeline) => timeline.state(),
        }
    }

    fn state_mut(&mut self) -> &mut AnimationState {
        match self {
            Animation::Tween(tween) => tween.state_mut(),
            Animation::Timeline(timeline) => timeline.state_mut(),
        }
    }

    fn unstarted(&mut self) -> Result<()> {
        match self {
            Animation::Tween(tween) => tween.unstarted(),
            Animation::Timeline(timeline) => timeline.unstarted(),
        }
    }

    fn initialize_override(&mut self) {
        match self {
            Animation::Tween(tween) => tween.initialize_override(),
            Animation::Timeline(timeline) => timeline.initialize_override(),
        }
    }

    fn update_override(&mut self, step: i32, last_step: i32, is_iteration_step: bool, delta: f32) {
        match self {
            Animation::Tween(tween) => {
                tween.update_override(step, last_step, is_iteration_step, delta)
            }
            Animation::Timeline(timeline) => {
                timeline.update_override(step, last_step, is_iteration_step, delta)
            }
        }
    }

    fn force_start_values(&mut self) {
        match self {
            Animation::Tween(tween) => tween.force_start_values(),
            Animation::Timeline(timeline) => timeline.force_start_values(),
        }
    }

    fn force_end_values(&mut self) {
        match self {
            Animation::Tween(tween) => tween.force_end_values(),
            Animation::Timeline(timeline) => timeline.force_end_values(),
        }
    }

    fn contains_target(&self, target: &TargetRef, tween_type: Option<i32>) -> bool {
        match self {
            Animation::Tween(tween) => tween.contains_target(target, tween_type),
            Animation::Timeline(timeline) => timeline.contains_target(target, tween_type),
        }
    }

    fn cancel_target(&mut self, target: &TargetRef, tween_type: Option<i32>) -> bool {
        match self {
            Animation::Tween(tween) => tween.cancel_target(target, tween_type),
            Animation::Timeline(timeline) => timeline.cancel_target(target, tween_type),
        }
    }

    fn reset_override(&mut self) {
        match self {
            Animation::Tween(tween) => tween.reset_override(),
            Animation::Timeline(timeline) => timeline.reset_override(),
        }
    }

    fn start(&mut self) -> Result<()> {
        match self {
            Animation::Tween(tween) => tween.start(),
            Animation::Timeline(timeline) => timeline.start(),
        }
    }

    fn update(&mut self, delta: f32) {
        match self {
            Animation::Tween(tween) => tween.update(delta),
            Animation::Timeline(timeline) => timeline.update(delta),
        }
    }

    fn reset(&mut self) {
        match self {
            Animation::Tween(tween) => tween.reset(),
            Animation::Timeline(timeline) => timeline.reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every hook call; stands in for a tween without touching targets.
    #[derive(Default)]
    struct Probe {
        state: AnimationState,
        calls: Vec<(i32, i32, bool)>,
        forced: Vec<&'static str>,
    }

    impl Playback for Probe {
        fn state(&self) -> &AnimationState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut AnimationState {
            &mut self.state
        }

        fn update_override(
            &mut self,
            step: i32,
            last_step: i32,
            is_iteration_step: bool,
            _delta: f32,
        ) {
            self.calls.push((step, last_step, is_iteration_step));
        }

        fn force_start_values(&mut self) {
            self.forced.push("start");
        }

        fn force_end_values(&mut self) {
            self.forced.push("end");
        }

        fn contains_target(&self, _target: &TargetRef, _tween_type: Option<i32>) -> bool {
            false
        }
    }

    fn probe(duration: f32) -> Probe {
        let mut probe = Probe::default();
        probe.state.duration = duration;
        probe
    }

    #[test]
    fn test_update_ignored_until_started() {
        let mut probe = probe(1.0);
        probe.update(0.5);
        assert!(!probe.is_initialized());
        assert!(probe.calls.is_empty());
    }

    #[test]
    fn test_delay_then_run() {
        let mut probe = probe(1.0);
        probe.set_delay(0.5).unwrap();
        probe.start().unwrap();

        probe.update(0.3);
        assert!(!probe.is_initialized());

        probe.update(0.3);
        assert!(probe.is_initialized());
        assert_eq!(probe.state.step(), 0);
        assert!((probe.state.current_time() - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_finishes_past_duration() {
        let mut probe = probe(1.0);
        probe.start().unwrap();

        probe.update(0.6);
        assert!(!probe.is_finished());
        probe.update(0.6);
        assert!(probe.is_finished());
        assert_eq!(probe.state.step(), 1);
        assert_eq!(probe.calls.last(), Some(&(1, 0, false)));
    }

    #[test]
    fn test_exact_boundary_crosses_forward() {
        let mut probe = probe(1.0);
        probe.start().unwrap();

        probe.update(0.5);
        probe.update(0.5);
        assert!(probe.is_finished());
    }

    #[test]
    fn test_repeat_steps_and_yoyo_parity() {
        let mut probe = probe(1.0);
        probe.set_repeat(3, 0.5, true).unwrap();
        probe.start().unwrap();

        // 4 iterations of 1.0 with 3 delays of 0.5
        probe.update(0.0);
        for expected_step in [0, 1, 2, 3, 4, 5, 6] {
            assert_eq!(probe.state.step(), expected_step);
            let reversed = probe.state.is_reverse(probe.state.step());
            let iteration = probe.state.iteration();
            assert_eq!(reversed, expected_step % 2 == 0 && iteration % 2 == 1);
            let remaining = if expected_step % 2 == 0 { 1.0 } else { 0.5 };
            probe.update(remaining);
        }
        assert!(probe.is_finished());
        assert_eq!(probe.state.step(), 7);
        assert!(probe.forced.contains(&"end"));
    }

    #[test]
    fn test_backward_returns_to_before_start() {
        let mut probe = probe(1.0);
        probe.start().unwrap();
        probe.update(1.0);
        assert!(probe.is_finished());

        probe.update(-1.0);
        assert!(probe.is_finished());
        assert_eq!(probe.state.step(), -1);
        assert_eq!(probe.calls.last(), Some(&(-1, 0, false)));
    }

    #[test]
    fn test_forward_relaunch_after_backward_complete() {
        let mut probe = probe(1.0);
        probe.start().unwrap();
        probe.update(1.0);
        probe.update(-1.0);

        probe.update(0.5);
        assert!(!probe.is_finished());
        assert_eq!(probe.state.step(), 0);
        assert!((probe.state.current_time() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_delta_does_not_relaunch() {
        let mut probe = probe(1.0);
        probe.start().unwrap();
        probe.update(1.0);
        probe.update(-1.0);

        probe.update(0.0);
        assert!(probe.is_finished());
        assert_eq!(probe.state.step(), -1);
    }

    #[test]
    fn test_stop_is_immediate() {
        let mut probe = probe(1.0);
        probe.start().unwrap();
        probe.update(0.2);
        probe.stop();
        assert!(probe.is_finished());

        let calls = probe.calls.len();
        probe.update(0.2);
        assert_eq!(probe.calls.len(), calls);
    }

    #[test]
    fn test_equal_slices_land_on_boundary() {
        for slices in [12, 19, 23, 27, 28, 31, 33, 37] {
            let mut probe = probe(1.0);
            probe.start().unwrap();
            for _ in 0..slices {
                probe.update(1.0 / slices as f32);
            }
            assert!(probe.is_finished(), "{slices} slices");
            assert_eq!(probe.calls.last(), Some(&(1, 0, false)));
        }
    }

    #[test]
    fn test_large_repeat_count_rejected() {
        let mut probe = probe(1.0);
        assert!(matches!(
            probe.set_repeat(i32::MAX, 0.0, false),
            Err(TweenError::RepeatCountLimit { given: i32::MAX, .. })
        ));
        assert_eq!(probe.state.repeat_count(), 0);

        probe.set_repeat(MAX_REPEAT_COUNT, 0.0, false).unwrap();
        probe.start().unwrap();
        probe.update(2.5);
        assert_eq!(probe.state.step(), 4);
        assert!(!probe.is_finished());
    }

    #[test]
    fn test_restart_resets_counters() {
        let mut probe = probe(1.0);
        probe.start().unwrap();
        probe.update(2.0);
        assert!(probe.is_finished());

        probe.start().unwrap();
        assert!(!probe.is_finished());
        assert!(!probe.is_initialized());
        assert_eq!(probe.state.step(), -2);
    }

    #[test]
    fn test_infinite_zero_length_rejected() {
        let mut probe = probe(0.0);
        probe.set_repeat(REPEAT_INFINITY, 0.0, false).unwrap();
        assert!(matches!(probe.start(), Err(TweenError::UnboundedRepeat)));
    }

    #[test]
    fn test_negative_delays_rejected() {
        let mut probe = probe(1.0);
        assert!(probe.set_delay(-1.0).is_err());
        assert!(probe.set_repeat(2, -0.5, false).is_err());
        assert_eq!(probe.state.delay(), 0.0);
        assert_eq!(probe.state.repeat_count(), 0);
    }

    #[test]
    fn test_event_order() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();

        let mut probe = probe(1.0).repeat(1, 0.0).unwrap().on(EventMask::ANY, move |event| {
            sink.borrow_mut().push(event)
        });
        probe.start().unwrap();
        probe.update(0.5);
        probe.update(2.0);
        probe.update(-3.0);

        use AnimationEvent::*;
        assert_eq!(
            *events.borrow(),
            vec![
                Begin, Start, End, Start, End, Complete, BackBegin, BackStart, BackEnd, BackStart,
                BackEnd, BackComplete
            ]
        );
    }

    #[test]
    fn test_event_mask_filters() {
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();

        let mut probe = probe(1.0).on(AnimationEvent::Complete, move |_| *sink.borrow_mut() += 1);
        probe.start().unwrap();
        probe.update(0.5);
        assert_eq!(*count.borrow(), 0);
        probe.update(0.5);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_full_duration() {
        let mut probe = probe(2.0);
        probe.set_delay(1.0).unwrap();
        probe.set_repeat(2, 0.5, false).unwrap();
        assert_eq!(probe.state.full_duration(), Some(1.0 + 2.0 + 2.5 * 2.0));

        probe.set_repeat(REPEAT_INFINITY, 0.5, false).unwrap();
        assert_eq!(probe.state.full_duration(), None);
    }

    #[test]
    fn test_event_mask_bits() {
        let mask = AnimationEvent::Begin.mask() | AnimationEvent::BackEnd;
        assert!(mask.contains(AnimationEvent::Begin));
        assert!(mask.contains(AnimationEvent::BackEnd));
        assert!(!mask.contains(AnimationEvent::End));
        assert!(EventMask::ANY_FORWARD.contains(AnimationEvent::Complete));
        assert!(!EventMask::ANY_FORWARD.contains(AnimationEvent::BackStart));
    }
}
