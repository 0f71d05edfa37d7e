use super::traits::{Observer, ObserverEvent, ObserverMetric};
use std::sync::atomic::{AtomicU64, Ordering};

/// Keeps running totals and reports them on flush.
pub struct CountingObserver {
    turn_count: AtomicU64,
    event_count: AtomicU64,
    metric_count: AtomicU64,
    error_count: AtomicU64,
}

impl CountingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            turn_count: AtomicU64::new(0),
            event_count: AtomicU64::new(0),
            metric_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
        }
    }

    /// (turns, events, metrics, errors)
    pub fn snapshot_counts(&self) -> (u64, u64, u64, u64) {
        (
            self.turn_count.load(Ordering::Relaxed),
            self.event_count.load(Ordering::Relaxed),
            self.metric_count.load(Ordering::Relaxed),
            self.error_count.load(Ordering::Relaxed),
        )
    }
}

impl Observer for CountingObserver {
    fn record_event(&self, event: &ObserverEvent) {
        self.event_count.fetch_add(1, Ordering::Relaxed);
        match event {
            ObserverEvent::TurnModulated { .. } => {
                self.turn_count.fetch_add(1, Ordering::Relaxed);
            }
            ObserverEvent::Error { .. } => {
                self.error_count.fetch_add(1, Ordering::Relaxed);
            }
            ObserverEvent::Expression { .. } => {}
        }
    }

    fn record_metric(&self, _metric: &ObserverMetric) {
        self.metric_count.fetch_add(1, Ordering::Relaxed);
    }

    fn flush(&self) {
        let (turns, events, metrics, errors) = self.snapshot_counts();
        tracing::debug!(
            turns_total = turns,
            events_total = events,
            metrics_total = metrics,
            errors_total = errors,
            "observer.counting.flush"
        );
    }

    fn name(&self) -> &str {
        "counting"
    }
}
