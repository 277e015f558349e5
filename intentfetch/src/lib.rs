//! IntentFetch - trajectory-based link prefetching
//!
//! This library predicts which navigation target a pointer is heading for
//! and triggers an idempotent prefetch for it before the pointer arrives.
//!
//! - [`intent`]: the engine (target registry + trajectory scorer)
//! - [`tracker`]: thin adapter that wires an engine to a pointer event
//!   stream and a batched rectangle source
//! - [`config`]: INI configuration file support
//! - [`geometry`]: rectangle and vector primitives

pub mod config;
pub mod geometry;
pub mod intent;
pub mod tracker;
