//! The intent engine.
//!
//! [`PrefetchIntent`] owns one [`TargetRegistry`] and one [`MotionState`]
//! and turns a stream of motion samples into at most one trigger per
//! sample. It is synchronous and single-owner: every call runs to
//! completion, and independent engines share nothing.
//!
//! # Per-sample flow
//!
//! ```text
//! sample ──► smooth velocity ──[speed < min_speed]──► (no trigger)
//!                  │
//!                  ▼
//!        score eligible targets ──[no candidate]──► (no trigger)
//!                  │
//!                  ▼
//!        best score < max_reach && debounce elapsed?
//!                  │ yes
//!                  ▼
//!        mark done + remove ──► record debounce ──► sink(id)
//! ```
//!
//! The winner is marked done *before* the sink runs, so a failing sink can
//! never cause the same id to fire twice.

use std::hash::Hash;

use super::config::IntentConfig;
use super::error::{ConfigError, SinkError};
use super::motion::MotionState;
use super::registry::{Observation, TargetRegistry};
use super::scorer;
use super::sink::PrefetchSink;
use super::target::{MotionSample, Target, TargetId};

/// Default key type for observed resources.
pub type ElementKey = u64;

/// Trajectory-based prefetch intent engine.
///
/// `K` is the caller's resource handle type (a DOM node id, a widget key);
/// it is only ever used as a map key.
///
/// # Example
///
/// ```
/// use intentfetch::geometry::Rect;
/// use intentfetch::intent::{MotionSample, PrefetchIntent, Target};
///
/// let mut intent: PrefetchIntent = PrefetchIntent::with_defaults();
/// intent.set_targets(vec![Target::new("/about", Rect::from_origin_size(500.0, 280.0, 100.0, 40.0))]);
///
/// assert_eq!(intent.advance(MotionSample::new(100.0, 300.0, 0.0, 0.0)), None);
/// assert_eq!(intent.advance(MotionSample::new(140.0, 300.0, 40.0, 0.0)).unwrap().as_str(), "/about");
/// ```
#[derive(Debug)]
pub struct PrefetchIntent<K = ElementKey> {
    config: IntentConfig,
    registry: TargetRegistry<K>,
    motion: MotionState,
}

impl<K: Hash + Eq + Clone> PrefetchIntent<K> {
    /// Create an engine, validating the configuration.
    pub fn new(config: IntentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            registry: TargetRegistry::new(),
            motion: MotionState::new(),
        })
    }

    /// Create an engine with the default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: IntentConfig::default(),
            registry: TargetRegistry::new(),
            motion: MotionState::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Target registry
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the eligible targets. Done ids and empty ids are filtered out.
    pub fn set_targets<I>(&mut self, targets: I) -> usize
    where
        I: IntoIterator<Item = Target>,
    {
        self.registry.set_targets(targets)
    }

    /// Track `resource` under `id`. Release the returned handle with
    /// [`unobserve`](Self::unobserve) to re-arm the id.
    pub fn observe(&mut self, resource: K, id: impl Into<TargetId>) -> Observation<K> {
        self.registry.observe(resource, id.into())
    }

    /// Release an observation. Returns `false` if the handle was stale.
    pub fn unobserve(&mut self, observation: Observation<K>) -> bool {
        self.registry.release(observation)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Motion
    // ─────────────────────────────────────────────────────────────────────────

    /// Process one motion sample and return the id that should be
    /// prefetched, if any.
    ///
    /// The returned id is already marked done and removed from the eligible
    /// list. Use [`advance_with`](Self::advance_with) to also deliver it to a
    /// sink.
    pub fn advance(&mut self, sample: MotionSample) -> Option<TargetId> {
        self.motion.update(&sample);

        let heading = self.motion.heading(self.config.min_speed)?;
        let winner =
            scorer::select_winner(&heading, self.registry.eligible(), self.config.perp_weight)?;

        if winner.score >= self.config.max_reach {
            tracing::trace!(
                id = %winner.target.id,
                score = winner.score,
                max_reach = self.config.max_reach,
                "Best candidate beyond reach"
            );
            return None;
        }

        if !self.motion.debounce_elapsed() {
            tracing::trace!(id = %winner.target.id, "Trigger suppressed by debounce");
            return None;
        }

        let id = winner.target.id.clone();
        let score = winner.score;
        let along = winner.along;
        let perp = winner.perp;

        self.registry.mark_done(&id);
        self.motion.record_trigger();

        tracing::debug!(
            id = %id,
            sample = self.motion.sample_count(),
            score = format!("{:.1}", score),
            along = format!("{:.1}", along),
            perp = format!("{:.1}", perp),
            "Prefetch intent detected"
        );

        Some(id)
    }

    /// Process one motion sample and hand any winner to `sink`.
    ///
    /// Sink errors are returned unchanged; the id stays done regardless.
    pub fn advance_with<S>(
        &mut self,
        sample: MotionSample,
        sink: &S,
    ) -> Result<Option<TargetId>, SinkError>
    where
        S: PrefetchSink + ?Sized,
    {
        let Some(id) = self.advance(sample) else {
            return Ok(None);
        };

        sink.prefetch(&id)?;
        Ok(Some(id))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Introspection
    // ─────────────────────────────────────────────────────────────────────────

    /// The engine configuration.
    pub fn config(&self) -> &IntentConfig {
        &self.config
    }

    /// Current motion state.
    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    /// The underlying registry.
    pub fn registry(&self) -> &TargetRegistry<K> {
        &self.registry
    }

    /// Number of observed resources.
    pub fn tracked_resources(&self) -> usize {
        self.registry.tracked_resources()
    }

    /// Number of ids that triggered and have not been re-armed.
    pub fn done_count(&self) -> usize {
        self.registry.done_count()
    }

    /// Number of targets currently eligible.
    pub fn eligible_count(&self) -> usize {
        self.registry.eligible_count()
    }

    /// Whether `id` has triggered and has not been re-armed.
    pub fn is_done(&self, id: &str) -> bool {
        self.registry.is_done(id)
    }
}

impl<K: Hash + Eq + Clone> Default for PrefetchIntent<K> {
    fn default() -> Self {
        Self::with_defaults()
    }
}
