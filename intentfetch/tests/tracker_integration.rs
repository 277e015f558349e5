//! Integration tests for the intent tracker.
//!
//! These tests drive [`IntentTracker::run`] through its public API:
//! - Pointer events → throttle → engine → sink
//! - Periodic rectangle refresh picking up late registrations
//! - Sink failures that must not stop the loop
//! - Cancellation
//!
//! Run with: `cargo test --test tracker_integration`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use intentfetch::geometry::Rect;
use intentfetch::intent::{PrefetchIntent, PrefetchSink, RecordingSink, SinkError, TargetId};
use intentfetch::tracker::{
    IntentTracker, Measurement, ObserveGuard, PointerEvent, RectSource, StaticRectSource,
    TrackerConfig,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn new_tracker(sink: Arc<dyn PrefetchSink>, stride: u32) -> IntentTracker {
    IntentTracker::new(
        PrefetchIntent::with_defaults(),
        sink,
        TrackerConfig::new().with_pointer_stride(stride),
    )
    .unwrap()
}

fn link(x: f64) -> Rect {
    Rect::from_origin_size(x, 280.0, 100.0, 40.0)
}

/// Horizontal sweep along y=300, 50px per event.
fn sweep() -> Vec<PointerEvent> {
    (0..7)
        .map(|i| PointerEvent::new(100.0 + i as f64 * 50.0, 300.0))
        .collect()
}

/// Two links on the sweep line; the sweep reaches /first then /second.
fn two_links(tracker: &IntentTracker, source: &StaticRectSource<u64>) -> [ObserveGuard; 2] {
    source.set(1, link(300.0));
    source.set(2, link(500.0));
    [tracker.observe(1, "/first"), tracker.observe(2, "/second")]
}

/// Counts how often the tracker measures.
#[derive(Default)]
struct CountingSource {
    inner: StaticRectSource<u64>,
    measures: AtomicUsize,
}

impl RectSource<u64> for CountingSource {
    fn measure(&self, resources: &[u64]) -> Vec<Measurement<u64>> {
        self.measures.fetch_add(1, Ordering::SeqCst);
        self.inner.measure(resources)
    }
}

async fn run_to_completion(
    tracker: &IntentTracker,
    source: Arc<StaticRectSource<u64>>,
    events: Vec<PointerEvent>,
) {
    let (tx, rx) = mpsc::channel(events.len().max(1));
    for event in events {
        tx.send(event).await.unwrap();
    }
    drop(tx);

    tokio::time::timeout(
        Duration::from_secs(5),
        tracker.run(rx, source, CancellationToken::new()),
    )
    .await
    .expect("run should finish once the channel closes");
}

// ============================================================================
// Event flow
// ============================================================================

#[tokio::test]
async fn test_sweep_triggers_each_link_once() {
    let sink = Arc::new(RecordingSink::new());
    let tracker = new_tracker(sink.clone(), 1);
    let source = Arc::new(StaticRectSource::new());
    let _guards = two_links(&tracker, &source);

    run_to_completion(&tracker, source, sweep()).await;

    assert_eq!(sink.id_strings(), vec!["/first", "/second"]);
    tracker.with_engine(|engine| {
        assert_eq!(engine.done_count(), 2);
        assert_eq!(engine.eligible_count(), 0);
    });
}

#[tokio::test]
async fn test_throttled_stream_matches_unthrottled_sweep() {
    let sink = Arc::new(RecordingSink::new());
    let tracker = new_tracker(sink.clone(), 4);
    let source = Arc::new(StaticRectSource::new());
    let _guards = two_links(&tracker, &source);

    // Each position reported four times; only the fourth copy is forwarded.
    let events: Vec<PointerEvent> = sweep()
        .into_iter()
        .flat_map(|event| std::iter::repeat(event).take(4))
        .collect();

    run_to_completion(&tracker, source, events).await;

    assert_eq!(sink.id_strings(), vec!["/first", "/second"]);
    tracker.with_engine(|engine| assert_eq!(engine.motion().sample_count(), 7));
}

#[tokio::test]
async fn test_failing_sink_does_not_stop_loop() {
    let calls = Arc::new(AtomicUsize::new(0));
    let failing = {
        let calls = Arc::clone(&calls);
        move |_: &TargetId| -> Result<(), SinkError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SinkError::new("network unavailable"))
        }
    };

    let tracker = new_tracker(Arc::new(failing), 1);
    let source = Arc::new(StaticRectSource::new());
    let _guards = two_links(&tracker, &source);

    run_to_completion(&tracker, source, sweep()).await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    tracker.with_engine(|engine| {
        assert!(engine.is_done("/first"));
        assert!(engine.is_done("/second"));
    });
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_periodic_refresh_picks_up_new_links() {
    let sink = Arc::new(RecordingSink::new());
    let tracker = new_tracker(sink.clone(), 1);
    let source = Arc::new(StaticRectSource::new());
    let (tx, rx) = mpsc::channel(16);
    let token = CancellationToken::new();

    let handle = {
        let tracker = tracker.clone();
        let source = Arc::clone(&source);
        let token = token.clone();
        tokio::spawn(async move { tracker.run(rx, source, token).await })
    };

    // Registered after the loop started; visible only after a refresh tick.
    let guard = tracker.observe(1, "/about");
    source.set(1, link(500.0));
    tokio::time::sleep(Duration::from_millis(350)).await;
    tracker.with_engine(|engine| assert_eq!(engine.eligible_count(), 1));

    for x in [100.0, 140.0, 200.0, 260.0, 320.0, 380.0] {
        tx.send(PointerEvent::new(x, 300.0)).await.unwrap();
    }
    drop(tx);
    handle.await.unwrap();

    assert_eq!(sink.id_strings(), vec!["/about"]);
    assert!(guard.cancel());
    assert!(!token.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn test_queued_events_scored_after_initial_refresh() {
    let sink = Arc::new(RecordingSink::new());
    let tracker = new_tracker(sink.clone(), 1);
    let source = Arc::new(CountingSource::default());
    let _guard = tracker.observe(1, "/about");
    source.inner.set(1, link(500.0));

    let (tx, rx) = mpsc::channel(16);
    for x in [100.0, 140.0, 200.0, 260.0, 320.0, 380.0] {
        tx.send(PointerEvent::new(x, 300.0)).await.unwrap();
    }
    drop(tx);

    tracker
        .run(rx, Arc::clone(&source), CancellationToken::new())
        .await;

    assert_eq!(sink.id_strings(), vec!["/about"]);
    assert_eq!(source.measures.load(Ordering::SeqCst), 1);
}

#[test]
fn test_hidden_link_dropped_on_refresh() {
    let tracker = new_tracker(Arc::new(RecordingSink::new()), 1);
    let source = Arc::new(StaticRectSource::new());
    let _guards = two_links(&tracker, &source);
    assert_eq!(tracker.refresh(source.as_ref()), 2);

    source.hide(&2);
    assert_eq!(tracker.refresh(source.as_ref()), 1);
    tracker.with_engine(|engine| {
        assert_eq!(engine.registry().eligible()[0].id.as_str(), "/first");
    });
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancel_stops_idle_loop() {
    let tracker = new_tracker(Arc::new(RecordingSink::new()), 1);
    let (_tx, rx) = mpsc::channel::<PointerEvent>(1);
    let token = CancellationToken::new();

    let handle = {
        let tracker = tracker.clone();
        let token = token.clone();
        tokio::spawn(async move {
            tracker
                .run(rx, Arc::new(StaticRectSource::<u64>::new()), token)
                .await
        })
    };

    tokio::task::yield_now().await;
    token.cancel();

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("run should stop after cancellation")
        .unwrap();
}
