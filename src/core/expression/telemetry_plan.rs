use crate::core::attractors::{AttractorId, AttractorResult};
use crate::core::constraints::Disposition;
use crate::core::context::TurnContext;
use crate::core::gradients::{Gradients, HIGH_GRADIENT};
use crate::core::identity::IdentityDecision;
use crate::core::numeric::{clamp01, indicator};

use super::types::{ColorChannel, Motion, TelemetryFrame, VisualState};

const LOW_CONFIDENCE: f64 = 0.45;
const TTL_DEFAULT_MS: u64 = 5_000;
const TTL_URGENT_MS: u64 = 2_500;
const TTL_HOLD_MS: u64 = 8_000;

fn baseline_state(id: AttractorId) -> VisualState {
    match id {
        AttractorId::Order => VisualState::Focused,
        AttractorId::Insight => VisualState::Thinking,
        AttractorId::Protection => VisualState::Alerting,
        AttractorId::Expression => VisualState::Speaking,
    }
}

/// Dispositions that replace the attractor's visual state outright.
fn disposition_state(disposition: Disposition) -> Option<VisualState> {
    match disposition {
        Disposition::Ask => Some(VisualState::Asking),
        Disposition::Pause => Some(VisualState::Pausing),
        Disposition::Decline => Some(VisualState::Declining),
        Disposition::Act | Disposition::Defer => None,
    }
}

/// Map the turn onto an outward telemetry frame.
pub fn build_telemetry(
    attractor: &AttractorResult,
    gradients: &Gradients,
    decision: &IdentityDecision,
    ctx: &TurnContext,
) -> TelemetryFrame {
    let g = gradients.normalized();
    let disposition = decision.disposition;
    let protection = attractor.id == AttractorId::Protection;
    let holding = matches!(disposition, Disposition::Pause | Disposition::Decline);

    let state = disposition_state(disposition).unwrap_or_else(|| baseline_state(attractor.id));

    let channel = if protection || ctx.has_security_flags {
        ColorChannel::RedvioletAlert
    } else if state == VisualState::Speaking {
        ColorChannel::RainbowSpeak
    } else {
        ColorChannel::AmberThink
    };

    let stress_gain =
        if protection || matches!(state, VisualState::Alerting | VisualState::Declining) {
            0.25
        } else {
            0.1
        };
    let intensity = clamp01(
        0.45 + 0.3 * g.urgency + 0.2 * g.curiosity + stress_gain * g.stress + 0.25 * g.confidence,
    );

    let motion = Motion {
        pulse_rate: clamp01(0.2 + 0.6 * g.urgency + 0.2 * g.stress),
        morph_rate: clamp01(0.15 + 0.7 * g.curiosity + 0.2 * (1.0 - g.confidence)),
        tighten: clamp01(
            0.2 + 0.6 * g.stress
                + 0.3 * indicator(attractor.id == AttractorId::Order)
                + 0.3 * indicator(protection),
        ),
        expand: clamp01(0.15 + 0.7 * g.curiosity - 0.3 * g.stress),
        stillness: clamp01(0.2 + 0.6 * g.confidence + 0.4 * indicator(holding) - 0.3 * g.urgency),
    };

    let mut tags = Vec::new();
    if g.urgency >= HIGH_GRADIENT {
        tags.push("high_urgency".to_string());
    }
    if g.stress >= HIGH_GRADIENT {
        tags.push("high_stress".to_string());
    }
    if g.curiosity >= HIGH_GRADIENT {
        tags.push("high_curiosity".to_string());
    }
    if g.confidence <= LOW_CONFIDENCE {
        tags.push("low_confidence".to_string());
    }
    if protection || disposition == Disposition::Decline {
        tags.push("protection_mode".to_string());
    }

    let ttl_ms = if holding {
        TTL_HOLD_MS
    } else if g.urgency >= HIGH_GRADIENT {
        TTL_URGENT_MS
    } else {
        TTL_DEFAULT_MS
    };

    TelemetryFrame {
        state,
        channel,
        intensity,
        motion,
        tags,
        ttl_ms,
    }
}
