//! Tween engine error types

use thiserror::Error;

/// Contract violations reported by the tween engine.
///
/// Every fallible operation checks its arguments before touching any state, so an
/// `Err` always leaves the animation exactly as it was.
#[derive(Error, Debug)]
pub enum TweenError {
    /// Duration must not be negative
    #[error("Duration can't be negative: {0}")]
    NegativeDuration(f32),

    /// Delay must not be negative
    #[error("Delay can't be negative: {0}")]
    NegativeDelay(f32),

    /// Repeat delay must not be negative
    #[error("Repeat delay can't be negative: {0}")]
    NegativeRepeatDelay(f32),

    /// Buffer limits out of range
    #[error("Invalid tween limits: combined attributes must be >= 3 (got {combined_attrs})")]
    InvalidLimits { combined_attrs: usize },

    /// More values than the combined attribute limit
    #[error("You cannot set more than {limit} combined attributes (got {given})")]
    CombinedAttrsLimit { given: usize, limit: usize },

    /// Waypoint buffer is full
    #[error("You cannot add more than {limit} waypoints")]
    WaypointsLimit { limit: usize },

    /// No animator could be resolved for the target
    #[error("No animator was found for the target type {type_name}, and it doesn't animate itself")]
    NoAnimator { type_name: &'static str },

    /// Configuration change after the animation was started
    #[error("You can't change the target class of a started tween")]
    AlreadyStarted,

    /// A timeline child repeats forever
    #[error("You can't push an object with infinite repetitions in a timeline")]
    InfiniteRepeatInTimeline,

    /// Repeat count beyond what the step counter can hold
    #[error("You cannot repeat more than {limit} times (got {given})")]
    RepeatCountLimit { given: i32, limit: i32 },

    /// Infinite repeat of a zero-length cycle would never consume time
    #[error("Infinite repetitions need a non-zero duration or repeat delay")]
    UnboundedRepeat,

    /// Timeline was already built by a start
    #[error("You can't push objects into a timeline once it has been started")]
    TimelineBuilt,

    /// Failed to parse configuration
    #[error("Failed to parse engine config: {0}")]
    Config(#[from] toml::de::Error),

    /// Failed to serialize configuration
    #[error("Failed to serialize engine config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Failed to read configuration
    #[error("Failed to read engine config: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tween engine operations
pub type Result<T> = std::result::Result<T, TweenError>;
