//! Pointer tracking adapter.
//!
//! Connects a [`PrefetchIntent`](crate::intent::PrefetchIntent) to the
//! outside world:
//!
//! ```text
//! pointer events ──► PointerThrottle ──► IntentTracker ──► PrefetchSink
//!                     (every Nth)             ▲
//!                                             │ every refresh_interval
//!                                        RectSource
//! ```
//!
//! Hosts either call [`IntentTracker::pointer_moved`] and
//! [`IntentTracker::refresh`] themselves, or hand an event channel to
//! [`IntentTracker::run`] and let it drive both.

mod config;
mod pointer;
mod service;
mod source;

pub use config::{TrackerConfig, DEFAULT_POINTER_STRIDE, DEFAULT_REFRESH_INTERVAL_MS};
pub use pointer::{PointerEvent, PointerThrottle};
pub use service::{IntentTracker, ObserveGuard};
pub use source::{Measurement, RectSource, StaticRectSource};
