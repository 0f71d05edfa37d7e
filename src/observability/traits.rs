use std::time::Duration;

use crate::core::attractors::AttractorId;
use crate::core::constraints::Disposition;
use crate::core::expression::VisualState;
use crate::core::order_focus::ReasonCode;
use crate::core::posture::PostureId;

/// Discrete events emitted around a modulated turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverEvent {
    TurnModulated {
        posture: PostureId,
        attractor: AttractorId,
        disposition: Disposition,
        reason_code: ReasonCode,
    },
    Expression {
        ts: u64,
        state: VisualState,
        ttl_ms: u64,
    },
    Error {
        component: String,
        message: String,
    },
}

/// Numeric measurements taken per turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverMetric {
    TurnLatency(Duration),
    Coherence(f64),
    Intensity(f64),
}

/// Sink for turn events and metrics; implementations must not block.
pub trait Observer: Send + Sync {
    fn record_event(&self, event: &ObserverEvent);

    fn record_metric(&self, metric: &ObserverMetric);

    /// Push out anything buffered. Default is a no-op.
    fn flush(&self) {}

    fn name(&self) -> &str;
}
