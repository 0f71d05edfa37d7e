use crate::config::IdentityGateConfig;
use crate::core::attractors::AttractorId;
use crate::core::constraints::{ConstraintSet, Disposition, MaxLength};
use crate::core::context::{Level, TurnContext, UserIntent};
use crate::core::gradients::HIGH_GRADIENT;
use crate::core::numeric::clamp01;
use crate::core::policy::{RiskPosture, Structure, Tone};

use super::types::{IdentityConstraints, IdentityDecision, IdentityInput, IdentityTrait, OutputLimits};

const FLAGGED_RISK: f64 = 1.0;
const RESTRICTED_RISK: f64 = 0.75;
const BASELINE_RISK: f64 = 0.25;

const DEFER_CONFIDENCE: f64 = 0.65;
const PAUSE_CONFIDENCE: f64 = 0.8;
const ASK_CONFIDENCE: f64 = 0.75;
const TIGHTENED_CONFIDENCE_CAP: f64 = 0.85;
const ASSERTIVE_ASSUMPTIONS_BELOW: f64 = 0.6;

fn compute_risk(input: &IdentityInput<'_>) -> f64 {
    if input.context.has_security_flags {
        FLAGGED_RISK
    } else if input.attractor.policy.risk_posture == RiskPosture::Restricted {
        RESTRICTED_RISK
    } else {
        BASELINE_RISK
    }
}

fn compute_ambiguity(input: &IdentityInput<'_>) -> f64 {
    input
        .context
        .ambiguity
        .map_or_else(|| 1.0 - input.collapse.confidence(), clamp01)
}

fn compute_instability(input: &IdentityInput<'_>) -> f64 {
    input.context.contradiction.map_or(0.0, clamp01)
}

fn is_assertive(input: &IdentityInput<'_>, risk: f64, cfg: &IdentityGateConfig) -> bool {
    input.context.user_intent == UserIntent::Directive
        || matches!(input.attractor.id, AttractorId::Order | AttractorId::Protection)
        || risk >= cfg.high_risk
        || clamp01(input.gradients.urgency) >= HIGH_GRADIENT
}

/// The stable trait set; `assertive` joins when the turn calls for it.
pub fn resolve_identity_traits(
    input: &IdentityInput<'_>,
    cfg: &IdentityGateConfig,
) -> Vec<IdentityTrait> {
    let mut traits = vec![
        IdentityTrait::Calm,
        IdentityTrait::Restrained,
        IdentityTrait::PrecisionDriven,
        IdentityTrait::RiskAware,
        IdentityTrait::NonSubmissive,
    ];
    if is_assertive(input, compute_risk(input), cfg) {
        traits.push(IdentityTrait::Assertive);
    }
    traits
}

/// Shape the decision for its disposition: the limits and guard rails each
/// non-acting disposition carries on its own.
fn shape_for_disposition(mut decision: IdentityDecision, ctx: &TurnContext) -> IdentityDecision {
    let limits = &mut decision.output_limits;
    let rails = &mut decision.constraints;
    limits.max_length = limits
        .max_length
        .stricter(decision.disposition.length_ceiling());

    match decision.disposition {
        Disposition::Act => {}
        Disposition::Ask => {
            limits.max_options = limits.max_options.min(1);
            rails.enforce_directness = true;
            rails.enforce_structure = Some(Structure::Checklist);
        }
        Disposition::Pause => {
            if ctx.is_overloaded() {
                rails.enforce_structure = Some(Structure::Checklist);
                rails.enforce_tone = Some(Tone::Formal);
            }
        }
        Disposition::Defer => {
            rails.enforce_structure = Some(Structure::Checklist);
            rails.enforce_tone = Some(Tone::Formal);
        }
        Disposition::Decline => {
            rails.enforce_structure = Some(Structure::Checklist);
            rails.enforce_tone = Some(Tone::Guarded);
        }
    }
    decision
}

/// Run the ordered identity rules. The first rule that matches decides the
/// disposition; acting turns then pick up the assertive and overload limits.
pub fn evaluate_identity_constraints(
    input: &IdentityInput<'_>,
    cfg: &IdentityGateConfig,
) -> IdentityDecision {
    let ctx = input.context;
    let collapse = input.collapse.confidence();
    let impact = ctx.impact();
    let risk = compute_risk(input);
    let ambiguity = compute_ambiguity(input);
    let instability = compute_instability(input);
    let urgency = clamp01(input.gradients.urgency);
    let assertive = is_assertive(input, risk, cfg);

    let base_constraints = IdentityConstraints {
        forbid_over_explain: urgency >= HIGH_GRADIENT || ctx.is_overloaded(),
        enforce_directness: ctx.is_directive()
            || matches!(input.attractor.id, AttractorId::Order | AttractorId::Protection),
        ..IdentityConstraints::default()
    };
    let base_limits = OutputLimits {
        max_options: cfg.max_options.max(1),
        max_length: MaxLength::Medium,
        require_concrete_dates: false,
        require_explicit_assumptions: collapse < cfg.assumptions_below,
    };

    let ruled = |disposition: Disposition, confidence: f64| IdentityDecision {
        disposition,
        confidence: clamp01(confidence),
        constraints: base_constraints,
        output_limits: base_limits,
    };

    let mut decision = if ctx.disallowed {
        ruled(Disposition::Decline, 1.0)
    } else if risk >= cfg.high_risk
        && impact == Level::High
        && collapse < cfg.defer_confidence_below
    {
        ruled(Disposition::Defer, DEFER_CONFIDENCE)
    } else if instability >= cfg.contradiction_pause
        || (ambiguity >= cfg.ambiguity_pause && ctx.is_unknown())
    {
        ruled(Disposition::Pause, PAUSE_CONFIDENCE)
    } else if ambiguity >= cfg.ambiguity_ask && impact != Level::Low && risk < cfg.high_risk {
        ruled(Disposition::Ask, ASK_CONFIDENCE)
    } else {
        let mut act = ruled(
            Disposition::Act,
            0.5 * collapse + 0.5 * clamp01(input.attractor.confidence),
        );
        if assertive {
            act.constraints.enforce_structure = Some(Structure::Checklist);
            act.output_limits.max_options = act
                .output_limits
                .max_options
                .min(cfg.assertive_max_options.max(1));
            act.output_limits.max_length = MaxLength::Short;
            if act.confidence < ASSERTIVE_ASSUMPTIONS_BELOW {
                act.output_limits.require_explicit_assumptions = true;
            }
        }
        act
    };

    if ctx.is_overloaded()
        && !matches!(decision.disposition, Disposition::Decline | Disposition::Defer)
    {
        decision.constraints.enforce_structure = Some(Structure::Checklist);
        decision.output_limits.max_length = MaxLength::Short;
    }

    decision = shape_for_disposition(decision, ctx);

    if let Some(posture) = input.posture_constraints {
        decision.output_limits = decision
            .output_limits
            .clamp_to(&ConstraintSet::from(*posture));
    }

    tracing::debug!(
        disposition = %decision.disposition,
        confidence = decision.confidence,
        risk,
        ambiguity,
        "identity.gated"
    );
    decision
}

impl IdentityDecision {
    /// Move to a stricter disposition; a looser one leaves the decision as is.
    /// Limits only ever tighten.
    pub fn tighten_to(&self, disposition: Disposition, ctx: &TurnContext) -> Self {
        let target = self.disposition.stricter(disposition);
        if target == self.disposition {
            return *self;
        }
        let tightened = Self {
            disposition: target,
            confidence: clamp01(self.confidence.min(TIGHTENED_CONFIDENCE_CAP)),
            ..*self
        };
        shape_for_disposition(tightened, ctx)
    }
}
