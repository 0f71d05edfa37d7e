use super::traits::{Observer, ObserverEvent, ObserverMetric};

/// Forwards every event and metric to `tracing` at info level.
pub struct LogObserver;

impl LogObserver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Observer for LogObserver {
    fn record_event(&self, event: &ObserverEvent) {
        match event {
            ObserverEvent::TurnModulated {
                posture,
                attractor,
                disposition,
                reason_code,
            } => tracing::info!(
                %posture,
                %attractor,
                %disposition,
                %reason_code,
                "turn.modulated"
            ),
            ObserverEvent::Expression { ts, state, ttl_ms } => {
                tracing::info!(ts, %state, ttl_ms, "scing.expression");
            }
            ObserverEvent::Error { component, message } => {
                tracing::warn!(component = component.as_str(), message = message.as_str(), "error");
            }
        }
    }

    fn record_metric(&self, metric: &ObserverMetric) {
        match metric {
            ObserverMetric::TurnLatency(d) => {
                let micros = u64::try_from(d.as_micros()).unwrap_or(u64::MAX);
                tracing::info!(latency_us = micros, "turn.latency");
            }
            ObserverMetric::Coherence(v) => tracing::info!(coherence = v, "turn.coherence"),
            ObserverMetric::Intensity(v) => tracing::info!(intensity = v, "expression.intensity"),
        }
    }

    fn name(&self) -> &str {
        "log"
    }
}
