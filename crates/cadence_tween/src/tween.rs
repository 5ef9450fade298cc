//! Tweens: interpolate the attributes of one target through an animator
//!
//! A tween reads its start values from the target when its delay has elapsed,
//! then writes `start + t·(target - start)` (or a spline through its waypoints)
//! on every update, `t` being the eased progress of the current iteration.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::rc::Rc;

use crate::animation::{AnimationEvent, AnimationState, Playback};
use crate::animator::{Animator, AnimatorRegistry, TargetClass, TargetRef};
use crate::easing::Easing;
use crate::error::{Result, TweenError};
use crate::interpolation::Interpolation;

/// Durations below this are treated as instantaneous
const DURATION_EPSILON: f32 = 1e-11;

/// Minimum number of combined attributes a tween can hold
pub const MIN_COMBINED_ATTRS: usize = 3;

/// Buffer sizes of a tween, fixed at construction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweenLimits {
    /// Maximum number of attributes animated together
    #[serde(default = "default_combined_attrs")]
    pub combined_attrs: usize,
    /// Maximum number of waypoints
    #[serde(default)]
    pub waypoints: usize,
}

fn default_combined_attrs() -> usize {
    MIN_COMBINED_ATTRS
}

impl TweenLimits {
    pub fn new(combined_attrs: usize, waypoints: usize) -> Self {
        Self {
            combined_attrs,
            waypoints,
        }
    }

    pub(crate) fn validate(self) -> Result<Self> {
        if self.combined_attrs < MIN_COMBINED_ATTRS {
            return Err(TweenError::InvalidLimits {
                combined_attrs: self.combined_attrs,
            });
        }
        Ok(self)
    }
}

impl Default for TweenLimits {
    fn default() -> Self {
        Self::new(MIN_COMBINED_ATTRS, 0)
    }
}

/// How the tween was set up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenMode {
    /// Animate from the live values to the given targets
    To,
    /// Snap to the given values, then animate back to the live values
    From,
    /// Instantly assign the given values after the delay
    Set,
    /// No target; notifies subscribers
    Call,
    /// No target; placeholder inside a timeline
    Mark,
}

type AttrBuffer = SmallVec<[f32; 4]>;

#[derive(Clone, Copy)]
enum Buffer {
    Start,
    Target,
    Scratch,
}

/// Interpolates the attributes of a target.
pub struct Tween {
    state: AnimationState,
    registry: Option<Rc<AnimatorRegistry>>,

    mode: TweenMode,
    target: Option<TargetRef>,
    target_class: Option<TargetClass>,
    animator: Option<Rc<dyn Animator>>,
    tween_type: i32,
    easing: Option<Easing>,
    interpolation: Option<Interpolation>,

    is_from: bool,
    is_relative: bool,
    limits: TweenLimits,
    combined_attrs_count: usize,
    waypoints_count: usize,

    // As given by the caller: absolute or relative, and the snap values of a `from`
    given_values: AttrBuffer,
    given_waypoints: Vec<f32>,
    // Live values read from the target at initialization
    live_values: AttrBuffer,

    // Endpoints and waypoints resolved from the above
    start_values: AttrBuffer,
    target_values: AttrBuffer,
    waypoints: Vec<f32>,
    animate_buffer: AttrBuffer,
    path_buffer: Vec<f32>,
}

impl Tween {
    /// Build an unconfigured tween with buffers sized by `limits`.
    pub fn new(registry: Option<Rc<AnimatorRegistry>>, limits: TweenLimits) -> Result<Self> {
        Ok(Self::blank(registry, limits.validate()?))
    }

    /// A tween without target that fires `callback` when it starts.
    pub fn call<F: FnMut(AnimationEvent) + 'static>(callback: F) -> Self {
        let mut tween = Self::mark();
        tween.mode = TweenMode::Call;
        tween
            .state
            .subscribe(AnimationEvent::Start.mask(), Box::new(callback));
        tween
    }

    /// A tween without target or effect, used as a placeholder.
    pub fn mark() -> Self {
        let mut tween = Self::blank(None, TweenLimits::default());
        tween.easing = None;
        tween.interpolation = None;
        tween
    }

    fn blank(registry: Option<Rc<AnimatorRegistry>>, limits: TweenLimits) -> Self {
        let mut tween = Self {
            state: AnimationState::new(),
            registry,
            mode: TweenMode::Mark,
            target: None,
            target_class: None,
            animator: None,
            tween_type: -1,
            easing: Some(Easing::default()),
            interpolation: Some(Interpolation::default()),
            is_from: false,
            is_relative: false,
            limits,
            combined_attrs_count: 0,
            waypoints_count: 0,
            given_values: AttrBuffer::new(),
            given_waypoints: Vec::new(),
            live_values: AttrBuffer::new(),
            start_values: AttrBuffer::new(),
            target_values: AttrBuffer::new(),
            waypoints: Vec::new(),
            animate_buffer: AttrBuffer::new(),
            path_buffer: Vec::new(),
        };
        tween.allocate();
        tween
    }

    fn allocate(&mut self) {
        let attrs = self.limits.combined_attrs;
        let waypoints = self.limits.waypoints;
        self.given_values = smallvec![0.0; attrs];
        self.given_waypoints = vec![0.0; waypoints * attrs];
        self.live_values = smallvec![0.0; attrs];
        self.start_values = smallvec![0.0; attrs];
        self.target_values = smallvec![0.0; attrs];
        self.animate_buffer = smallvec![0.0; attrs];
        self.waypoints = vec![0.0; waypoints * attrs];
        self.path_buffer = vec![0.0; waypoints + 2];
    }

    /// Configure the tween for `mode`. Call and mark tweens take no target.
    pub(crate) fn setup(
        &mut self,
        mode: TweenMode,
        target: Option<TargetRef>,
        tween_type: i32,
        duration: f32,
    ) -> Result<()> {
        if duration < 0.0 {
            return Err(TweenError::NegativeDuration(duration));
        }
        self.mode = mode;
        self.target = target;
        self.tween_type = tween_type;
        self.is_from = mode == TweenMode::From;
        self.state.duration = match mode {
            TweenMode::Set | TweenMode::Call | TweenMode::Mark => 0.0,
            TweenMode::To | TweenMode::From => duration,
        };
        Ok(())
    }

    pub(crate) fn set_registry(&mut self, registry: Option<Rc<AnimatorRegistry>>) {
        self.registry = registry;
        self.animator = None;
    }

    /// Reset, reallocating buffers only when `limits` differ from the current ones.
    pub fn reset_with_limits(&mut self, limits: TweenLimits) -> Result<()> {
        let limits = limits.validate()?;
        self.reset();
        if limits != self.limits {
            self.limits = limits;
            self.allocate();
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    fn check_attrs(&self, values: &[f32]) -> Result<()> {
        if values.len() > self.limits.combined_attrs {
            return Err(TweenError::CombinedAttrsLimit {
                given: values.len(),
                limit: self.limits.combined_attrs,
            });
        }
        Ok(())
    }

    /// Absolute target values.
    pub fn set_target(&mut self, values: &[f32]) -> Result<()> {
        self.check_attrs(values)?;
        self.given_values[..values.len()].copy_from_slice(values);
        self.is_relative = false;
        self.resolve_if_initialized();
        Ok(())
    }

    /// Target values relative to the start values.
    ///
    /// The offsets are kept as given and added to the live values on every
    /// initialization, so neither repeated calls nor restarts accumulate them.
    pub fn set_target_relative(&mut self, values: &[f32]) -> Result<()> {
        self.check_attrs(values)?;
        self.given_values[..values.len()].copy_from_slice(values);
        self.is_relative = true;
        self.resolve_if_initialized();
        Ok(())
    }

    /// Append a waypoint the path passes through.
    pub fn add_waypoint(&mut self, values: &[f32]) -> Result<()> {
        self.check_attrs(values)?;
        if self.waypoints_count == self.limits.waypoints {
            return Err(TweenError::WaypointsLimit {
                limit: self.limits.waypoints,
            });
        }
        let row = self.waypoints_count * self.limits.combined_attrs;
        self.given_waypoints[row..row + values.len()].copy_from_slice(values);
        self.waypoints_count += 1;
        self.resolve_if_initialized();
        Ok(())
    }

    pub fn set_easing(&mut self, easing: Option<Easing>) {
        self.easing = easing;
    }

    pub fn set_interpolation(&mut self, interpolation: Option<Interpolation>) {
        self.interpolation = interpolation;
    }

    /// Look the animator up as `class` instead of the target's own type.
    pub fn set_target_class(&mut self, class: TargetClass) -> Result<()> {
        if self.state.is_started {
            return Err(TweenError::AlreadyStarted);
        }
        self.target_class = Some(class);
        self.animator = None;
        Ok(())
    }

    pub fn target(mut self, values: &[f32]) -> Result<Self> {
        self.set_target(values)?;
        Ok(self)
    }

    pub fn target_relative(mut self, values: &[f32]) -> Result<Self> {
        self.set_target_relative(values)?;
        Ok(self)
    }

    pub fn waypoint(mut self, values: &[f32]) -> Result<Self> {
        self.add_waypoint(values)?;
        Ok(self)
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Drop the easing; the tween then only writes at iteration boundaries.
    pub fn no_ease(mut self) -> Self {
        self.easing = None;
        self
    }

    pub fn path(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = Some(interpolation);
        self
    }

    pub fn target_class(mut self, class: TargetClass) -> Result<Self> {
        self.set_target_class(class)?;
        Ok(self)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn mode(&self) -> TweenMode {
        self.mode
    }

    pub fn target_ref(&self) -> Option<&TargetRef> {
        self.target.as_ref()
    }

    pub fn tween_type(&self) -> i32 {
        self.tween_type
    }

    pub fn easing(&self) -> Option<Easing> {
        self.easing
    }

    pub fn interpolation(&self) -> Option<Interpolation> {
        self.interpolation
    }

    pub fn limits(&self) -> TweenLimits {
        self.limits
    }

    pub fn is_relative(&self) -> bool {
        self.is_relative
    }

    pub fn is_from(&self) -> bool {
        self.is_from
    }

    pub fn combined_attrs_count(&self) -> usize {
        self.combined_attrs_count
    }

    pub fn waypoints_count(&self) -> usize {
        self.waypoints_count
    }

    /// Start values of the combined attributes in play
    pub fn start_values(&self) -> &[f32] {
        &self.start_values[..self.combined_attrs_count]
    }

    /// Target values of the combined attributes in play
    pub fn target_values(&self) -> &[f32] {
        &self.target_values[..self.combined_attrs_count]
    }

    pub fn waypoint_values(&self, index: usize) -> Option<&[f32]> {
        if index >= self.waypoints_count {
            return None;
        }
        let row = index * self.limits.combined_attrs;
        Some(&self.waypoints[row..row + self.combined_attrs_count])
    }

    // ------------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------------

    fn resolve_if_initialized(&mut self) {
        if self.state.is_initialized {
            self.resolve_endpoints();
        }
    }

    /// Rebuild the endpoints and waypoints from the given and live values.
    fn resolve_endpoints(&mut self) {
        let stride = self.limits.combined_attrs;
        for i in 0..self.combined_attrs_count {
            let live = self.live_values[i];
            let base = if self.is_relative { live } else { 0.0 };
            let given = self.given_values[i] + base;
            for w in 0..self.waypoints_count {
                let at = w * stride + i;
                self.waypoints[at] = self.given_waypoints[at] + base;
            }
            let (start, target) = if self.is_from { (given, live) } else { (live, given) };
            self.start_values[i] = start;
            self.target_values[i] = target;
        }
    }

    fn write(&self, buffer: Buffer) {
        let (Some(target), Some(animator)) = (&self.target, &self.animator) else {
            return;
        };
        let values = match buffer {
            Buffer::Start => &self.start_values,
            Buffer::Target => &self.target_values,
            Buffer::Scratch => &self.animate_buffer,
        };
        target.animate(animator.as_ref(), self.tween_type, &values[..self.combined_attrs_count]);
    }

    fn interpolate(&mut self, t: f32) {
        let count = self.combined_attrs_count;
        let stride = self.limits.combined_attrs;
        let waypoints = self.waypoints_count;

        match self.interpolation {
            Some(path) if waypoints > 0 => {
                for i in 0..count {
                    self.path_buffer[0] = self.start_values[i];
                    for w in 0..waypoints {
                        self.path_buffer[w + 1] = self.waypoints[w * stride + i];
                    }
                    self.path_buffer[waypoints + 1] = self.target_values[i];
                    self.animate_buffer[i] = path.compute(t, &self.path_buffer[..waypoints + 2]);
                }
            }
            _ => {
                for i in 0..count {
                    self.animate_buffer[i] =
                        self.start_values[i] * (1.0 - t) + self.target_values[i] * t;
                }
            }
        }
    }
}

impl Playback for Tween {
    fn state(&self) -> &AnimationState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AnimationState {
        &mut self.state
    }

    /// Resolves the animator and reads how many attributes the target exposes.
    fn unstarted(&mut self) -> Result<()> {
        let Some(target) = &self.target else {
            return Ok(());
        };

        let animator = match &self.animator {
            Some(animator) => animator.clone(),
            None => {
                let class = self.target_class.unwrap_or(target.class());
                let animator = match &self.registry {
                    Some(registry) => registry.resolve(target, self.target_class)?,
                    None => {
                        return Err(TweenError::NoAnimator {
                            type_name: class.name(),
                        })
                    }
                };
                tracing::debug!(class = class.name(), "resolved animator");
                self.animator = Some(animator.clone());
                animator
            }
        };

        let count = target.retrieve(animator.as_ref(), self.tween_type, &mut self.animate_buffer);
        if count > self.limits.combined_attrs {
            return Err(TweenError::CombinedAttrsLimit {
                given: count,
                limit: self.limits.combined_attrs,
            });
        }
        self.combined_attrs_count = count;
        Ok(())
    }

    fn initialize_override(&mut self) {
        let (Some(target), Some(animator)) = (&self.target, &self.animator) else {
            return;
        };
        let count = target.retrieve(animator.as_ref(), self.tween_type, &mut self.live_values);
        self.combined_attrs_count = count.min(self.limits.combined_attrs);
        self.resolve_endpoints();
    }

    fn update_override(&mut self, step: i32, last_step: i32, is_iteration_step: bool, delta: f32) {
        if self.target.is_none() {
            return;
        }

        // Leaving an iteration: snap to the exact boundary
        if !is_iteration_step {
            let reversed = self.state.is_reverse(last_step);
            if step > last_step {
                self.write(if reversed { Buffer::Start } else { Buffer::Target });
            } else if step < last_step {
                self.write(if reversed { Buffer::Target } else { Buffer::Start });
            }
            return;
        }

        let Some(easing) = self.easing else {
            return;
        };
        let reversed = self.state.is_reverse(step);
        let duration = self.state.duration;

        if duration < DURATION_EPSILON {
            // Snap to the edge the direction of travel enters from; zero counts as forward
            let forward = delta >= 0.0;
            self.write(if forward != reversed { Buffer::Start } else { Buffer::Target });
            return;
        }

        let time = if reversed {
            duration - self.state.current_time
        } else {
            self.state.current_time
        };
        let t = easing.apply(time / duration);
        self.interpolate(t);
        self.write(Buffer::Scratch);
    }

    fn force_start_values(&mut self) {
        if self.state.is_initialized {
            self.write(Buffer::Start);
        }
    }

    fn force_end_values(&mut self) {
        if self.state.is_initialized {
            self.write(Buffer::Target);
        }
    }

    fn contains_target(&self, target: &TargetRef, tween_type: Option<i32>) -> bool {
        let Some(own) = &self.target else {
            return false;
        };
        own.ptr_eq(target) && tween_type.map_or(true, |tween_type| tween_type == self.tween_type)
    }

    fn reset_override(&mut self) {
        self.mode = TweenMode::Mark;
        self.target = None;
        self.target_class = None;
        self.animator = None;
        self.tween_type = -1;
        self.easing = Some(Easing::default());
        self.interpolation = Some(Interpolation::default());
        self.is_from = false;
        self.is_relative = false;
        self.combined_attrs_count = 0;
        self.waypoints_count = 0;
        self.given_values.fill(0.0);
        self.given_waypoints.fill(0.0);
        self.live_values.fill(0.0);
        self.start_values.fill(0.0);
        self.target_values.fill(0.0);
        self.waypoints.fill(0.0);
    }
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("target", &self.target)
            .field("tween_type", &self.tween_type)
            .field("easing", &self.easing)
            .field("limits", &self.limits)
            .field("combined_attrs_count", &self.combined_attrs_count)
            .field("waypoints_count", &self.waypoints_count)
            .field("start_values", &self.start_values())
            .field("target_values", &self.target_values())
            .finish()
    }
}
