use crate::config::CollapseConfig;
use crate::core::attractors::types::{AttractorId, AttractorResult};
use crate::core::context::{Level, TurnContext, UserIntent};
use crate::core::numeric::{clamp_range, clamp01};
use crate::core::policy::{Policy, Structure, Tone, Verbosity};

use super::HIGH_GRADIENT;
use super::types::{CollapseModulation, CollapseParams, Gradients};

/// Largest net step any policy dimension may move in one turn.
pub const MAX_POLICY_SHIFT: i32 = 1;
const MAX_CYCLES_SHIFT: i32 = 1;

const VARIANCE_BOUNDS: (f64, f64) = (0.01, 0.25);
const LOCK_BOUNDS: (f64, f64) = (0.55, 0.95);
const CYCLE_BOUNDS: (u32, u32) = (1, 5);

/// Map gradients to bounded adjustments of the collapse thresholds.
///
/// Urgency collapses faster, curiosity explores longer, stress locks later
/// and confidence locks sooner.
pub fn apply_to_collapse(gradients: &Gradients, cfg: &CollapseConfig) -> CollapseModulation {
    let g = gradients.normalized();
    let max_delta = clamp01(cfg.max_threshold_delta);

    let variance = 0.1 * g.urgency + 0.05 * g.stress - 0.1 * g.curiosity;
    let lock = 0.08 * g.stress - 0.06 * g.confidence;

    let mut cycles = 0;
    if g.urgency >= HIGH_GRADIENT {
        cycles -= 1;
    }
    if g.curiosity >= HIGH_GRADIENT && g.urgency < 0.5 {
        cycles += 1;
    }

    CollapseModulation {
        variance_threshold_delta: clamp_range(variance, -max_delta, max_delta),
        confidence_lock_delta: clamp_range(lock, -max_delta, max_delta),
        max_evaluation_cycles_delta: cycles.clamp(-MAX_CYCLES_SHIFT, MAX_CYCLES_SHIFT),
    }
}

/// Effective collapse tuning for this turn: configured base plus gradient modulation.
pub fn effective_collapse_params(gradients: &Gradients, base: &CollapseConfig) -> CollapseParams {
    let modulation = apply_to_collapse(gradients, base);

    let cycles = i64::from(base.max_evaluation_cycles)
        + i64::from(modulation.max_evaluation_cycles_delta);
    let cycles = cycles.clamp(i64::from(CYCLE_BOUNDS.0), i64::from(CYCLE_BOUNDS.1));

    CollapseParams {
        variance_threshold: clamp_range(
            base.variance_threshold + modulation.variance_threshold_delta,
            VARIANCE_BOUNDS.0,
            VARIANCE_BOUNDS.1,
        ),
        confidence_lock: clamp_range(
            base.confidence_lock + modulation.confidence_lock_delta,
            LOCK_BOUNDS.0,
            LOCK_BOUNDS.1,
        ),
        max_evaluation_cycles: u32::try_from(cycles).unwrap_or(CYCLE_BOUNDS.0),
    }
}

/// Adjust an attractor's default policy for the current gradients.
///
/// High time pressure counts as one more verbosity trigger, so `policy` must
/// not already carry a pressure step. Each dimension moves at most
/// [`MAX_POLICY_SHIFT`] step per turn no matter how many triggers fire together.
pub fn apply_to_attractor_policy(
    policy: &Policy,
    gradients: &Gradients,
    ctx: &TurnContext,
    is_protection: bool,
) -> Policy {
    let g = gradients.normalized();
    let flags = ctx.has_security_flags;
    let overloaded = ctx.user_intent == UserIntent::Overloaded;
    let stressed = g.stress >= HIGH_GRADIENT;
    let urgent = g.urgency >= HIGH_GRADIENT;
    let curious = g.curiosity >= HIGH_GRADIENT;
    let pressured = ctx.time_pressure_or(Level::Low) == Level::High;

    let mut next = *policy;

    if overloaded && !is_protection {
        next.verbosity = Verbosity::Minimal;
        next.structure = Structure::Checklist;
    } else {
        let mut shift = 0;
        if urgent {
            shift -= 1;
        }
        if pressured {
            shift -= 1;
        }
        if stressed {
            shift -= 1;
        }
        if curious && !is_protection {
            shift += 1;
        }
        next.verbosity = next
            .verbosity
            .shift(shift.clamp(-MAX_POLICY_SHIFT, MAX_POLICY_SHIFT));
    }

    if flags || stressed {
        next.tone = if is_protection {
            Tone::Guarded
        } else {
            Tone::Formal
        };
    } else if urgent {
        next.tone = match next.tone {
            Tone::Creative => Tone::Neutral,
            Tone::Guarded => Tone::Formal,
            other => other,
        };
    } else if curious && !is_protection {
        next.tone = Tone::Creative;
    }

    if overloaded || stressed {
        next.structure = Structure::Checklist;
    } else if curious && !urgent && !is_protection {
        next.structure = Structure::Hybrid;
    }

    let mut risk_shift = 0;
    if flags {
        risk_shift += 1;
    }
    if stressed {
        risk_shift += 1;
    }
    if curious && !flags && !is_protection {
        risk_shift -= 1;
    }
    next.risk_posture = next
        .risk_posture
        .shift(risk_shift.clamp(-MAX_POLICY_SHIFT, MAX_POLICY_SHIFT));

    next
}

/// [`apply_to_attractor_policy`] for a whole selection result.
pub fn apply_gradients_to_attractor_result(
    result: &AttractorResult,
    gradients: &Gradients,
    ctx: &TurnContext,
) -> AttractorResult {
    AttractorResult {
        policy: apply_to_attractor_policy(
            &result.policy,
            gradients,
            ctx,
            result.id == AttractorId::Protection,
        ),
        ..result.clone()
    }
}
