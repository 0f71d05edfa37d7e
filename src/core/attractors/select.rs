use std::cmp::Ordering;

use crate::core::cognition::CollapseResult;
use crate::core::context::{Level, TurnContext, UserIntent};
use crate::core::gradients::{Gradients, apply_gradients_to_attractor_result};
use crate::core::numeric::clamp01;
use crate::core::policy::{Structure, Verbosity};

use super::registry::default_policy;
use super::scoring::{compute_needs, score_attractors};
use super::types::{AttractorId, AttractorInput, AttractorResult, AttractorScore};

const TIE_EPSILON: f64 = 1e-12;
const RISK_OVERRIDE: f64 = 0.7;
const CLARITY_OVERRIDE: f64 = 0.7;
const LOW_COLLAPSE: f64 = 0.5;
const LOW_COLLAPSE_CAP: f64 = 0.65;

fn by_score_then_tie_break(a: &AttractorScore, b: &AttractorScore) -> Ordering {
    if (b.score - a.score).abs() > TIE_EPSILON {
        b.score.total_cmp(&a.score)
    } else {
        a.id.tie_break_rank().cmp(&b.id.tie_break_rank())
    }
}

/// Highest score; near-equal scores resolve protection > order > insight > expression.
pub fn pick_by_tie_break(scores: &[AttractorScore]) -> Option<&AttractorScore> {
    scores.iter().min_by(|a, b| by_score_then_tie_break(a, b))
}

fn capped_confidence(baseline: f64, collapse: f64) -> f64 {
    if collapse < LOW_COLLAPSE {
        clamp01(baseline.min(LOW_COLLAPSE_CAP))
    } else {
        clamp01(baseline)
    }
}

fn score_for(scores: &[AttractorScore], id: AttractorId) -> Option<f64> {
    scores.iter().find(|s| s.id == id).map(|s| s.score)
}

/// Verbosity step the selector takes for time pressure.
fn pressure_shift(ctx: &TurnContext) -> i32 {
    if ctx.time_pressure_or(Level::Low) == Level::High {
        -1
    } else {
        0
    }
}

fn apply_policy_modifiers(
    result: AttractorResult,
    ctx: &TurnContext,
    verbosity_shift: i32,
) -> AttractorResult {
    let high_pressure = ctx.time_pressure_or(Level::Low) == Level::High;
    let mut policy = result.policy;

    if ctx.user_intent == UserIntent::Overloaded && result.id != AttractorId::Protection {
        policy.structure = Structure::Checklist;
        policy.verbosity = Verbosity::Minimal;
    }
    policy.verbosity = policy.verbosity.shift(verbosity_shift);
    if ctx.user_intent == UserIntent::Exploratory
        && result.id == AttractorId::Insight
        && !high_pressure
    {
        policy.verbosity = Verbosity::Expanded;
    }

    AttractorResult { policy, ..result }
}

/// Pick an attractor from precomputed scores.
///
/// Security flags or a high risk need force protection; a high clarity need
/// on a confident collapse forces order; otherwise the top score wins.
pub fn select_attractor(scores: &[AttractorScore], input: &AttractorInput<'_>) -> AttractorResult {
    select_with_shift(scores, input, pressure_shift(input.context))
}

fn select_with_shift(
    scores: &[AttractorScore],
    input: &AttractorInput<'_>,
    verbosity_shift: i32,
) -> AttractorResult {
    let needs = compute_needs(input);
    let collapse = input.collapse.confidence();
    let ctx = input.context;

    if ctx.has_security_flags || needs.risk >= RISK_OVERRIDE {
        let baseline = score_for(scores, AttractorId::Protection).unwrap_or(needs.risk);
        return AttractorResult {
            id: AttractorId::Protection,
            confidence: capped_confidence(baseline, collapse),
            policy: default_policy(AttractorId::Protection),
        };
    }

    if needs.clarity >= CLARITY_OVERRIDE && collapse >= CLARITY_OVERRIDE {
        let baseline = score_for(scores, AttractorId::Order).unwrap_or(needs.clarity);
        let result = AttractorResult {
            id: AttractorId::Order,
            confidence: capped_confidence(baseline, collapse),
            policy: default_policy(AttractorId::Order),
        };
        return apply_policy_modifiers(result, ctx, verbosity_shift);
    }

    let (id, score) = pick_by_tie_break(scores).map_or((AttractorId::Protection, 0.0), |s| {
        (s.id, s.score)
    });
    let result = AttractorResult {
        id,
        confidence: capped_confidence(score, collapse),
        policy: default_policy(id),
    };
    apply_policy_modifiers(result, ctx, verbosity_shift)
}

fn score_and_select(
    collapse: &CollapseResult,
    ctx: &TurnContext,
    verbosity_shift: i32,
) -> AttractorResult {
    let input = AttractorInput {
        collapse,
        context: ctx,
    };
    let scores = score_attractors(&input);
    let result = select_with_shift(&scores, &input, verbosity_shift);
    tracing::debug!(
        attractor = %result.id,
        confidence = result.confidence,
        "attractor.selected"
    );
    result
}

/// Score and select in one step.
pub fn collapse_to_attractor(collapse: &CollapseResult, ctx: &TurnContext) -> AttractorResult {
    score_and_select(collapse, ctx, pressure_shift(ctx))
}

/// [`collapse_to_attractor`] followed by gradient policy modulation. Gradients
/// never change which attractor wins.
///
/// Selection leaves the pressure step to the gradient limiter, which counts it
/// with the other triggers so the turn moves each dimension at most one step
/// from the attractor's default.
pub fn collapse_to_attractor_with_gradients(
    collapse: &CollapseResult,
    ctx: &TurnContext,
    gradients: &Gradients,
) -> AttractorResult {
    let base = score_and_select(collapse, ctx, 0);
    apply_gradients_to_attractor_result(&base, gradients, ctx)
}
