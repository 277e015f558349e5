//! Prefetch sink abstraction.
//!
//! The engine decides *when* and *for which id* to prefetch; the sink
//! performs the prefetch. Engines and trackers depend on this trait rather
//! than on a concrete router or HTTP client, so tests can observe triggers
//! with [`RecordingSink`] and production code can plug in anything that
//! starts a fetch.
//!
//! Any `Fn(&TargetId) -> Result<(), SinkError>` closure is a sink.

use parking_lot::Mutex;

use super::error::SinkError;
use super::target::TargetId;

/// Receives prefetch triggers.
///
/// Called synchronously, at most once per id per registration, after the id
/// has already been marked done. Errors are returned to the caller that fed
/// the motion sample.
///
/// # Example
///
/// ```
/// use intentfetch::intent::{PrefetchSink, SinkError, TargetId};
///
/// let sink = |id: &TargetId| -> Result<(), SinkError> {
///     println!("prefetching {}", id);
///     Ok(())
/// };
/// sink.prefetch(&TargetId::from("/about")).unwrap();
/// ```
pub trait PrefetchSink: Send + Sync {
    /// Start a prefetch for `id`.
    fn prefetch(&self, id: &TargetId) -> Result<(), SinkError>;
}

impl<F> PrefetchSink for F
where
    F: Fn(&TargetId) -> Result<(), SinkError> + Send + Sync,
{
    fn prefetch(&self, id: &TargetId) -> Result<(), SinkError> {
        self(id)
    }
}

/// Sink that remembers every id it receives, in order.
///
/// Useful for tests and for the CLI's replay output.
#[derive(Debug, Default)]
pub struct RecordingSink {
    ids: Mutex<Vec<TargetId>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids received so far.
    pub fn ids(&self) -> Vec<TargetId> {
        self.ids.lock().clone()
    }

    /// Ids received so far, as owned strings.
    pub fn id_strings(&self) -> Vec<String> {
        self.ids.lock().iter().map(|id| id.to_string()).collect()
    }

    /// Number of ids received.
    pub fn len(&self) -> usize {
        self.ids.lock().len()
    }

    /// Whether nothing has been received.
    pub fn is_empty(&self) -> bool {
        self.ids.lock().is_empty()
    }

    /// Forget everything received so far.
    pub fn clear(&self) {
        self.ids.lock().clear();
    }
}

impl PrefetchSink for RecordingSink {
    fn prefetch(&self, id: &TargetId) -> Result<(), SinkError> {
        self.ids.lock().push(id.clone());
        Ok(())
    }
}

/// Sink that ignores every trigger.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl PrefetchSink for NoopSink {
    fn prefetch(&self, _id: &TargetId) -> Result<(), SinkError> {
        Ok(())
    }
}
