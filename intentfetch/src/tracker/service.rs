//! Shared intent tracker.
//!
//! Wires one [`PrefetchIntent`] to a pointer event stream, a batched
//! [`RectSource`] and a [`PrefetchSink`]. There is no global instance: the
//! host creates one tracker per page or surface and hands clones of it to
//! whatever delivers events.
//!
//! The engine lives behind a mutex, but the lock is never held while the
//! sink or the rect source runs. A sink may therefore call back into the
//! tracker (for example to refresh targets) without deadlocking.

use std::hash::Hash;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::intent::{
    ConfigError, ElementKey, MotionSample, Observation, PrefetchIntent, PrefetchSink, SinkError,
    Target, TargetId,
};

use super::config::TrackerConfig;
use super::pointer::{PointerEvent, PointerThrottle};
use super::source::RectSource;

/// Cloneable handle to a shared intent engine.
pub struct IntentTracker<K = ElementKey> {
    engine: Arc<Mutex<PrefetchIntent<K>>>,
    throttle: Arc<Mutex<PointerThrottle>>,
    sink: Arc<dyn PrefetchSink>,
    config: TrackerConfig,
}

impl<K> Clone for IntentTracker<K> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            throttle: Arc::clone(&self.throttle),
            sink: Arc::clone(&self.sink),
            config: self.config.clone(),
        }
    }
}

impl<K> std::fmt::Debug for IntentTracker<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentTracker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<K: Hash + Eq + Clone> IntentTracker<K> {
    /// Create a tracker around `engine`, delivering triggers to `sink`.
    pub fn new(
        engine: PrefetchIntent<K>,
        sink: Arc<dyn PrefetchSink>,
        config: TrackerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            throttle: Arc::new(Mutex::new(PointerThrottle::new(config.pointer_stride))),
            sink,
            config,
        })
    }

    /// Feed a raw pointer position.
    ///
    /// Most events are dropped by the throttle; forwarded ones are scored.
    pub fn pointer_moved(&self, x: f64, y: f64) -> Result<Option<TargetId>, SinkError> {
        let sample = self.throttle.lock().sample(PointerEvent::new(x, y));
        match sample {
            Some(sample) => self.submit(sample),
            None => Ok(None),
        }
    }

    /// Score one motion sample, bypassing the throttle.
    pub fn submit(&self, sample: MotionSample) -> Result<Option<TargetId>, SinkError> {
        let triggered = self.engine.lock().advance(sample);
        let Some(id) = triggered else {
            return Ok(None);
        };

        self.sink.prefetch(&id)?;
        Ok(Some(id))
    }

    /// Start tracking `resource` under `id`.
    pub fn observe(&self, resource: K, id: impl Into<TargetId>) -> ObserveGuard<K> {
        let observation = self.engine.lock().observe(resource, id);
        ObserveGuard {
            engine: Arc::downgrade(&self.engine),
            observation,
        }
    }

    /// Re-measure every tracked resource and replace the engine's targets
    /// with the visible ones.
    ///
    /// Does nothing while no resource is tracked. Returns the number of
    /// eligible targets afterwards.
    pub fn refresh<S>(&self, source: &S) -> usize
    where
        S: RectSource<K> + ?Sized,
    {
        let resources: Vec<K> = self.engine.lock().registry().resources().cloned().collect();
        if resources.is_empty() {
            return self.engine.lock().eligible_count();
        }

        let measurements = source.measure(&resources);

        let mut engine = self.engine.lock();
        let targets: Vec<Target> = measurements
            .into_iter()
            .filter(|measurement| measurement.visible)
            .filter_map(|measurement| {
                engine
                    .registry()
                    .resource_id(&measurement.resource)
                    .map(|id| Target::new(id.clone(), measurement.rect))
            })
            .collect();

        let eligible = engine.set_targets(targets);
        tracing::trace!(tracked = resources.len(), eligible, "Target rectangles refreshed");
        eligible
    }

    /// Run a closure against the engine, for introspection.
    pub fn with_engine<R>(&self, f: impl FnOnce(&PrefetchIntent<K>) -> R) -> R {
        f(&self.engine.lock())
    }

    /// The tracker configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

impl<K: Hash + Eq + Clone + Send + 'static> IntentTracker<K> {
    /// Process pointer events and refresh rectangles until cancelled or the
    /// event channel closes.
    ///
    /// Rectangles are refreshed once before the first event is read and
    /// then every `refresh_interval`. Sink failures are logged and do not
    /// stop the loop.
    pub async fn run<S>(
        &self,
        mut events: mpsc::Receiver<PointerEvent>,
        source: Arc<S>,
        cancellation_token: CancellationToken,
    ) where
        S: RectSource<K> + ?Sized,
    {
        tracing::info!(
            pointer_stride = self.config.pointer_stride,
            refresh_ms = self.config.refresh_interval.as_millis() as u64,
            "Intent tracker started"
        );

        // Events already queued are scored against measured rectangles.
        self.refresh(&*source);

        let period = self.config.refresh_interval;
        let mut refresh = tokio::time::interval_at(Instant::now() + period, period);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = cancellation_token.cancelled() => break,

                _ = refresh.tick() => {
                    self.refresh(&*source);
                }

                event_opt = events.recv() => {
                    let Some(event) = event_opt else { break };

                    if let Err(e) = self.pointer_moved(event.x, event.y) {
                        tracing::warn!(error = %e, "Prefetch sink failed");
                    }
                }
            }
        }

        tracing::info!("Intent tracker stopped");
    }
}

/// Observation handle returned by [`IntentTracker::observe`].
///
/// Call [`cancel`](Self::cancel) exactly once when the resource goes away.
/// Cancelling after the tracker has been dropped is a no-op.
#[derive(Debug)]
#[must_use = "dropping the guard without cancelling leaves the resource tracked"]
pub struct ObserveGuard<K = ElementKey> {
    engine: Weak<Mutex<PrefetchIntent<K>>>,
    observation: Observation<K>,
}

impl<K: Hash + Eq + Clone> ObserveGuard<K> {
    /// The observed target id.
    pub fn id(&self) -> &TargetId {
        self.observation.id()
    }

    /// Stop tracking the resource and re-arm its id.
    ///
    /// Returns `false` if the tracker is gone or the handle was stale.
    pub fn cancel(self) -> bool {
        match self.engine.upgrade() {
            Some(engine) => engine.lock().unobserve(self.observation),
            None => false,
        }
    }
}
