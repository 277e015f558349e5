//! Trajectory-based prefetch intent.
//!
//! Predicts, from raw pointer-motion samples, which navigation target the
//! user is about to activate, and reports it once so the caller can start a
//! prefetch before the pointer arrives.
//!
//! # Key Features
//!
//! - **Velocity smoothing**: exponential moving average with a fast ramp-up
//!   over the first samples
//! - **Ray-cast scoring**: distance along the heading plus weighted
//!   perpendicular offset, inside a distance-shrinking acceptance radius
//! - **Winner-take-all**: at most one trigger per sample, so a dense nav bar
//!   along the path does not fire a burst of prefetches
//! - **Done set**: each id fires once until its observation is released
//! - **Sample-based debounce**: no trigger on the sample right after another
//!
//! # Module Structure
//!
//! ```text
//! intent/
//! ├── mod.rs        # This file - module exports
//! ├── config.rs     # IntentConfig and defaults
//! ├── error.rs      # ConfigError, SinkError
//! ├── target.rs     # TargetId, Target, MotionSample
//! ├── registry.rs   # Eligible list, done set, observations
//! ├── motion.rs     # Velocity smoothing and debounce state
//! ├── scorer.rs     # Ray-cast scoring and winner selection
//! ├── sink.rs       # PrefetchSink trait and test sinks
//! └── engine.rs     # PrefetchIntent - composes the above
//! ```
//!
//! # Example
//!
//! ```
//! use intentfetch::geometry::Rect;
//! use intentfetch::intent::{MotionSample, PrefetchIntent, RecordingSink, Target};
//!
//! let mut intent: PrefetchIntent = PrefetchIntent::with_defaults();
//! let sink = RecordingSink::new();
//!
//! intent.set_targets(vec![
//!     Target::new("/about", Rect::from_origin_size(500.0, 280.0, 100.0, 40.0)),
//! ]);
//!
//! for sample in [
//!     MotionSample::new(100.0, 300.0, 0.0, 0.0),
//!     MotionSample::new(140.0, 300.0, 40.0, 0.0),
//!     MotionSample::new(200.0, 300.0, 60.0, 0.0),
//! ] {
//!     intent.advance_with(sample, &sink).unwrap();
//! }
//!
//! assert_eq!(sink.id_strings(), vec!["/about"]);
//! ```

mod config;
mod engine;
mod error;
mod motion;
mod registry;
mod scorer;
mod sink;
mod target;

// Re-export public types
pub use config::{IntentConfig, DEFAULT_MAX_REACH, DEFAULT_MIN_SPEED, DEFAULT_PERP_WEIGHT};
pub use engine::{ElementKey, PrefetchIntent};
pub use error::{ConfigError, SinkError};
pub use motion::{
    Heading, MotionState, DEBOUNCE_SAMPLES, RAMP_UP_SAMPLES, RAMP_UP_SMOOTHING, STEADY_SMOOTHING,
};
pub use registry::{Observation, TargetRegistry};
pub use scorer::{acceptance_radius, evaluate, select_winner, Candidate, Miss};
pub use sink::{NoopSink, PrefetchSink, RecordingSink};
pub use target::{MotionSample, Target, TargetId};
