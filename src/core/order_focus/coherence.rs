use crate::core::context::{Level, UserIntent};
use crate::core::gradients::HIGH_GRADIENT;
use crate::core::numeric::{clamp01, indicator};

use super::types::{CoherenceBundle, OrderFocusInput};

const LOW_COLLAPSE: f64 = 0.45;

/// Provided contradiction, or the contradiction implied by the turn itself,
/// whichever is higher.
pub fn compute_contradiction(input: &OrderFocusInput<'_>) -> f64 {
    let provided = input.signals.contradiction.map_or(0.0, clamp01);
    let g = input.gradients.normalized();
    let ctx = input.context;

    let mut inferred = 0.0;
    if input.collapse.confidence() <= LOW_COLLAPSE {
        inferred += 0.35;
    }
    if g.urgency >= HIGH_GRADIENT && g.curiosity >= HIGH_GRADIENT {
        inferred += 0.25;
    }
    if ctx.user_intent == UserIntent::Unknown && ctx.impact() == Level::High {
        inferred += 0.25;
    }

    provided.max(clamp01(inferred))
}

pub fn compute_noise(input: &OrderFocusInput<'_>, oscillation: f64, contradiction: f64) -> f64 {
    let intent = input.context.user_intent;
    clamp01(
        0.1 + 0.3 * (1.0 - input.collapse.confidence())
            + 0.3 * clamp01(contradiction)
            + 0.2 * indicator(intent == UserIntent::Unknown)
            + 0.2 * indicator(intent == UserIntent::Overloaded)
            + 0.15 * clamp01(input.gradients.stress)
            + 0.25 * clamp01(oscillation),
    )
}

pub fn compute_coherence(
    input: &OrderFocusInput<'_>,
    intent_stability: f64,
    contradiction: f64,
    noise: f64,
) -> CoherenceBundle {
    let collapse = input.collapse.confidence();
    let ambiguity = input.ambiguity();
    let stability = clamp01(intent_stability);
    let contradiction = clamp01(contradiction);

    CoherenceBundle {
        order: clamp01(0.6 * collapse + 0.4 * (1.0 - contradiction)),
        focus: clamp01(0.5 * (1.0 - ambiguity) + 0.5 * stability),
        coherence: clamp01(
            0.35 * collapse + 0.25 * (1.0 - ambiguity) + 0.2 * (1.0 - contradiction)
                + 0.2 * stability
                - 0.1 * clamp01(noise),
        ),
    }
}
