//! One conversational turn through every modulation stage.
//!
//! `run_turn` is pure: the only state it sees is the snapshot the caller
//! passes in, and the same snapshot and config always produce the same
//! outcome.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ModulationConfig;
use crate::error::SnapshotError;

use super::attractors::{AttractorResult, collapse_to_attractor_with_gradients};
use super::cognition::{CollapseInput, CollapseResult, HeuristicEvaluator, cognitive_collapse};
use super::constraints::{ConstraintSet, Disposition};
use super::context::{Level, SensorReadings, TurnContext};
use super::expression::{ExpressionBundle, ExpressionInput, PlanOptions, compose_expression_bundle};
use super::gradients::{
    GradientMode, Gradients, derive_gradients, effective_collapse_params, gradient_mode,
    with_collapse_confidence,
};
use super::identity::{IdentityDecision, IdentityInput, evaluate_identity_constraints};
use super::order_focus::{
    DispositionBias, OrderFocusHistory, OrderFocusInput, OrderFocusSignals, OrderFocusState,
    gate_order_focus,
};
use super::posture::{
    InteractionStats, PostureHistory, PostureInput, PostureResult, apply_posture_to_context,
    apply_posture_to_gradients, extract_signals, score_postures, select_posture_with_context,
};

/// Largest history list a snapshot may carry.
pub const MAX_HISTORY_ENTRIES: usize = 256;

/// Everything the caller knows about one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TurnSnapshot {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub interaction: InteractionStats,
    #[serde(default)]
    pub sensors: SensorReadings,
    #[serde(default)]
    pub context: TurnContext,
    #[serde(default)]
    pub posture_history: PostureHistory,
    #[serde(default)]
    pub signals: OrderFocusSignals,
    #[serde(default)]
    pub history: OrderFocusHistory,
    /// A collapse resolved upstream; when absent the collapse engine runs on
    /// `candidates`
    #[serde(default)]
    pub collapse: Option<CollapseResult>,
    #[serde(default)]
    pub candidates: Vec<Value>,
    #[serde(default)]
    pub max_hypotheses: Option<usize>,
    #[serde(default)]
    pub now_ms: Option<u64>,
    #[serde(default)]
    pub code_fence_allowed: bool,
}

impl TurnSnapshot {
    /// Decode a snapshot and reject history lists beyond the bounded window.
    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(raw)?;
        snapshot.check_bounds()?;
        Ok(snapshot)
    }

    fn check_bounds(&self) -> Result<(), SnapshotError> {
        let lists = [
            ("history.intents", self.history.intents.len()),
            ("history.constraints", self.history.constraints.len()),
            ("posture_history.last_postures", self.posture_history.last_postures.len()),
        ];
        for (field, len) in lists {
            if len > MAX_HISTORY_ENTRIES {
                return Err(SnapshotError::Field {
                    field: field.to_string(),
                    reason: format!("{len} entries exceeds the limit of {MAX_HISTORY_ENTRIES}"),
                });
            }
        }
        Ok(())
    }

    /// Reference time for staleness and history windows: the explicit clock,
    /// else the newest timestamp the snapshot carries, else zero.
    pub fn reference_time(&self) -> u64 {
        self.now_ms
            .or(self.signals.last_input_ts)
            .or_else(|| self.history.intents.iter().map(|e| e.ts).max())
            .unwrap_or(0)
    }
}

/// Every intermediate and final result of a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub posture: PostureResult,
    pub gradients: Gradients,
    pub gradient_mode: GradientMode,
    pub collapse: CollapseResult,
    pub attractor: AttractorResult,
    /// The identity gate's own verdict, before order/focus tightening
    pub identity: IdentityDecision,
    pub order_focus: OrderFocusState,
    /// Final decision after the stricter disposition wins
    pub decision: IdentityDecision,
    pub expression: ExpressionBundle,
}

/// Stricter of the identity disposition and the order/focus bias.
pub fn merge_dispositions(identity: Disposition, bias: DispositionBias) -> Disposition {
    identity.stricter(bias.into())
}

fn resolve_collapse(
    snapshot: &TurnSnapshot,
    gradients: &Gradients,
    cfg: &ModulationConfig,
) -> CollapseResult {
    if let Some(collapse) = &snapshot.collapse {
        return collapse.clone();
    }
    let input = CollapseInput {
        input: Value::String(snapshot.text.clone()),
        candidates: snapshot.candidates.clone(),
        max_hypotheses: snapshot.max_hypotheses,
        params: effective_collapse_params(gradients, &cfg.collapse),
    };
    cognitive_collapse(&input, &HeuristicEvaluator::new(), &cfg.collapse)
}

/// Run one turn through posture, gradients, collapse, attractor, identity,
/// order/focus and expression.
pub fn run_turn(snapshot: &TurnSnapshot, cfg: &ModulationConfig) -> TurnOutcome {
    let now = snapshot.reference_time();
    let raw_ctx = &snapshot.context;

    let posture_input = PostureInput {
        text: &snapshot.text,
        interaction: &snapshot.interaction,
        sensors: &snapshot.sensors,
        time_pressure: raw_ctx.time_pressure,
        has_security_flags: raw_ctx.has_security_flags,
        now_ms: snapshot.now_ms,
    };
    let features = extract_signals(&posture_input, &cfg.posture);
    let scores = score_postures(&features);
    let posture = select_posture_with_context(
        &scores,
        &snapshot.posture_history,
        snapshot.now_ms,
        raw_ctx.time_pressure,
        &cfg.posture,
    );

    let ctx = apply_posture_to_context(raw_ctx, &posture);
    let base = derive_gradients(&ctx, &snapshot.sensors, &cfg.gradients);
    let guarded = ctx.has_security_flags || ctx.system_load == Some(Level::High);
    let base = apply_posture_to_gradients(&base, &posture, guarded);

    let collapse = resolve_collapse(snapshot, &base, cfg);
    let gradients = with_collapse_confidence(base, collapse.confidence(), &cfg.gradients);
    let mode = gradient_mode(&gradients, ctx.has_security_flags);

    let attractor = collapse_to_attractor_with_gradients(&collapse, &ctx, &gradients);

    let identity = evaluate_identity_constraints(
        &IdentityInput {
            collapse: &collapse,
            attractor: &attractor,
            gradients: &gradients,
            context: &ctx,
            posture_constraints: Some(&posture.constraints),
        },
        &cfg.identity,
    );

    let order_focus = gate_order_focus(
        &OrderFocusInput {
            collapse: &collapse,
            attractor: &attractor,
            gradients: &gradients,
            context: &ctx,
            posture: Some(posture.id),
            signals: &snapshot.signals,
            history: &snapshot.history,
        },
        now,
        &cfg.order_focus,
    );

    let disposition = merge_dispositions(identity.disposition, order_focus.disposition_bias);
    let decision = identity.tighten_to(disposition, &ctx);

    let constraints = ConstraintSet::from(posture.constraints).intersect(
        &snapshot
            .history
            .active_constraints(now, cfg.order_focus.history_max_age_ms),
    );
    let expression = compose_expression_bundle(&ExpressionInput {
        attractor: &attractor,
        gradients: &gradients,
        decision: &decision,
        context: &ctx,
        options: PlanOptions {
            code_fence_allowed: snapshot.code_fence_allowed,
            constraints: Some(constraints),
        },
    });

    tracing::debug!(
        posture = %posture.id,
        attractor = %attractor.id,
        identity = %identity.disposition,
        bias = %order_focus.disposition_bias,
        disposition = %decision.disposition,
        "turn.modulated"
    );

    TurnOutcome {
        posture,
        gradients,
        gradient_mode: mode,
        collapse,
        attractor,
        identity,
        order_focus,
        decision,
        expression,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attractors::AttractorId;
    use crate::core::cognition::CollapseReason;
    use crate::core::order_focus::{ConstraintEvent, IntentEntry};

    fn snapshot(json: &str) -> TurnSnapshot {
        TurnSnapshot::from_json(json).unwrap()
    }

    #[test]
    fn final_decision_is_never_looser_than_either_gate() {
        let outcome = run_turn(&snapshot("{}"), &ModulationConfig::default());
        let bias: Disposition = outcome.order_focus.disposition_bias.into();
        assert!(outcome.decision.disposition >= outcome.identity.disposition);
        assert!(outcome.decision.disposition >= bias);
        assert_eq!(outcome.expression.response_plan.disposition, outcome.decision.disposition);
    }

    #[test]
    fn merge_takes_stricter_side() {
        assert_eq!(merge_dispositions(Disposition::Act, DispositionBias::Pause), Disposition::Pause);
        assert_eq!(merge_dispositions(Disposition::Decline, DispositionBias::Act), Disposition::Decline);
        assert_eq!(merge_dispositions(Disposition::Ask, DispositionBias::Ask), Disposition::Ask);
    }

    #[test]
    fn provided_collapse_is_used_verbatim() {
        let snap = snapshot(
            r#"{"text": "ship it now", "collapse": {"confidence": 0.9, "collapse_reason": "max_confidence"}}"#,
        );
        let outcome = run_turn(&snap, &ModulationConfig::default());
        assert_eq!(outcome.collapse.collapse_reason, CollapseReason::MaxConfidence);
        assert!((outcome.collapse.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_collapse_runs_engine_on_candidates() {
        let snap = snapshot(r#"{"text": "compare options", "candidates": ["a", {"b": 2}]}"#);
        let outcome = run_turn(&snap, &ModulationConfig::default());
        assert!(outcome.collapse.selected.id.starts_with('h'));
        assert!(outcome.collapse.confidence > 0.0);
    }

    #[test]
    fn disallowed_turn_declines() {
        let snap = snapshot(r#"{"text": "do it", "context": {"disallowed": true}}"#);
        let outcome = run_turn(&snap, &ModulationConfig::default());
        assert_eq!(outcome.decision.disposition, Disposition::Decline);
        assert_eq!(
            outcome.expression.telemetry.state,
            crate::core::expression::VisualState::Declining
        );
    }

    #[test]
    fn security_flags_select_protection() {
        let snap = snapshot(
            r#"{"text": "rotate credentials", "context": {"has_security_flags": true},
                "collapse": {"confidence": 0.8}}"#,
        );
        let outcome = run_turn(&snap, &ModulationConfig::default());
        assert_eq!(outcome.attractor.id, AttractorId::Protection);
        assert_eq!(outcome.gradient_mode, GradientMode::Guarded);
    }

    #[test]
    fn reference_time_falls_back_to_snapshot_timestamps() {
        let mut snap = TurnSnapshot::default();
        assert_eq!(snap.reference_time(), 0);
        snap.history.intents = vec![
            IntentEntry {
                ts: 10,
                label: "directive".into(),
            },
            IntentEntry {
                ts: 30,
                label: "directive".into(),
            },
        ];
        assert_eq!(snap.reference_time(), 30);
        snap.signals.last_input_ts = Some(40);
        assert_eq!(snap.reference_time(), 40);
        snap.now_ms = Some(50);
        assert_eq!(snap.reference_time(), 50);
    }

    #[test]
    fn oversized_history_is_rejected() {
        let mut snap = TurnSnapshot::default();
        snap.history.constraints = vec![
            ConstraintEvent {
                ts: 0,
                constraints: ConstraintSet::default(),
            };
            MAX_HISTORY_ENTRIES + 1
        ];
        let raw = serde_json::to_string(&snap).unwrap();
        let err = TurnSnapshot::from_json(&raw).unwrap_err();
        assert!(err.to_string().contains("history.constraints"));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = TurnSnapshot::from_json("{\"text\": 5}").unwrap_err();
        assert!(matches!(err, SnapshotError::Decode(_)));
    }

    #[test]
    fn run_turn_is_deterministic() {
        let snap = snapshot(
            r#"{"text": "What if we compare a few options?", "now_ms": 1000000,
                "candidates": [{"plan": "a"}, {"plan": "b"}, "c"],
                "context": {"domain": "design"}}"#,
        );
        let cfg = ModulationConfig::default();
        let a = serde_json::to_string(&run_turn(&snap, &cfg)).unwrap();
        let b = serde_json::to_string(&run_turn(&snap, &cfg)).unwrap();
        assert_eq!(a, b);
    }
}
