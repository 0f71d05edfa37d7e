use crate::core::context::{TurnContext, UserIntent};
use crate::core::gradients::Gradients;
use crate::core::numeric::clamp01;

use super::types::{PostureId, PostureResult};

const POSTURE_STRESS_FLOOR: f64 = 0.45;
const POSTURE_CURIOSITY_LEVEL: f64 = 0.45;
const STRAINED_ACT_DELTA: f64 = 0.05;
const CONFIDENT_ACT_DELTA: f64 = -0.03;

pub fn posture_to_user_intent(posture: PostureId) -> UserIntent {
    match posture {
        PostureId::Exploratory => UserIntent::Exploratory,
        PostureId::Directive | PostureId::Confident | PostureId::Frustrated => {
            UserIntent::Directive
        }
        PostureId::Overloaded => UserIntent::Overloaded,
        PostureId::Unknown => UserIntent::Unknown,
    }
}

/// Replace the context intent with the posture's reading. An `unknown`
/// posture carries no information and leaves the caller's intent alone.
pub fn apply_posture_to_context(ctx: &TurnContext, posture: &PostureResult) -> TurnContext {
    match posture.id {
        PostureId::Unknown => ctx.clone(),
        id => TurnContext {
            user_intent: posture_to_user_intent(id),
            ..ctx.clone()
        },
    }
}

/// Nudge gradients toward what the posture implies. `curiosity_guarded` is set
/// when the turn carries security flags or high system load and keeps the
/// curiosity cap in place.
pub fn apply_posture_to_gradients(
    gradients: &Gradients,
    posture: &PostureResult,
    curiosity_guarded: bool,
) -> Gradients {
    let mut stress = clamp01(gradients.stress);
    let mut curiosity = clamp01(gradients.curiosity);

    if matches!(posture.id, PostureId::Overloaded | PostureId::Frustrated) {
        stress = stress.max(POSTURE_STRESS_FLOOR);
    }
    if posture.id == PostureId::Exploratory && !curiosity_guarded {
        curiosity = curiosity.max(POSTURE_CURIOSITY_LEVEL);
    }
    if curiosity_guarded {
        curiosity = curiosity.min(POSTURE_CURIOSITY_LEVEL);
    }

    Gradients {
        stress,
        curiosity,
        ..gradients.normalized()
    }
}

/// Adjustment to the order/focus act threshold for this posture: strained
/// users need more coherence before acting, a confident directive user on a
/// low-risk turn slightly less.
pub fn posture_act_threshold_delta(posture: PostureId, risk_low: bool) -> f64 {
    match posture {
        PostureId::Overloaded | PostureId::Frustrated => STRAINED_ACT_DELTA,
        PostureId::Confident if risk_low => CONFIDENT_ACT_DELTA,
        _ => 0.0,
    }
}
