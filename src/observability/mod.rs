pub mod counting;
pub mod log;
pub mod noop;
pub mod traits;

pub use self::log::LogObserver;
pub use counting::CountingObserver;
pub use noop::NoopObserver;
pub use traits::{Observer, ObserverEvent, ObserverMetric};

use crate::config::ObservabilityConfig;
use crate::core::pipeline::TurnOutcome;

/// Factory: create the right observer from config
pub fn create_observer(config: &ObservabilityConfig) -> Box<dyn Observer> {
    match config.backend.as_str() {
        "log" => Box::new(LogObserver::new()),
        "counting" => Box::new(CountingObserver::new()),
        "none" | "noop" => Box::new(NoopObserver),
        _ => {
            tracing::warn!(
                "Unknown observability backend '{}', falling back to noop",
                config.backend
            );
            Box::new(NoopObserver)
        }
    }
}

/// Report a finished turn: one modulation event, the published expression
/// event and the coherence/intensity readings.
pub fn record_turn(observer: &dyn Observer, outcome: &TurnOutcome, ts: u64) {
    observer.record_event(&ObserverEvent::TurnModulated {
        posture: outcome.posture.id,
        attractor: outcome.attractor.id,
        disposition: outcome.decision.disposition,
        reason_code: outcome.order_focus.reason_code,
    });
    observer.record_event(&ObserverEvent::Expression {
        ts,
        state: outcome.expression.telemetry.state,
        ttl_ms: outcome.expression.telemetry.ttl_ms,
    });
    observer.record_metric(&ObserverMetric::Coherence(outcome.order_focus.coherence));
    observer.record_metric(&ObserverMetric::Intensity(
        outcome.expression.telemetry.intensity,
    ));
}
