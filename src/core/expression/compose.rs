use super::language_plan::build_response_plan;
use super::telemetry_plan::build_telemetry;
use super::types::{ExpressionBundle, ExpressionEvent, ExpressionInput};

/// Build the response plan and telemetry frame for one turn.
pub fn compose_expression_bundle(input: &ExpressionInput<'_>) -> ExpressionBundle {
    let response_plan = build_response_plan(
        input.attractor,
        input.gradients,
        input.decision,
        input.options,
    );
    let telemetry = build_telemetry(input.attractor, input.gradients, input.decision, input.context);
    tracing::debug!(
        disposition = %response_plan.disposition,
        state = %telemetry.state,
        intensity = telemetry.intensity,
        "expression.composed"
    );
    ExpressionBundle {
        response_plan,
        telemetry,
    }
}

impl ExpressionBundle {
    /// Stamp the bundle for publication.
    pub fn into_event(self, ts: u64) -> ExpressionEvent {
        ExpressionEvent {
            ts,
            response_plan: self.response_plan,
            telemetry: self.telemetry,
        }
    }
}
