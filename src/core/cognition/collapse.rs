use serde_json::{Value, json};
use std::cmp::Ordering;

use crate::config::CollapseConfig;
use crate::core::gradients::CollapseParams;
use crate::core::numeric::{canonical_json, clamp01, fnv1a32};

use super::types::{
    CollapseInput, CollapseReason, CollapseResult, ConfidenceSignal, Hypothesis, HypothesisSet,
};

const SYNTHESIZED_VARIANTS: usize = 4;
const INITIAL_CONFIDENCE: f64 = 0.5;
const NEUTRAL_HINT: f64 = 0.5;

/// Scores a hypothesis for one evaluation cycle.
///
/// Implementations must be pure: the engine calls them once per hypothesis
/// per cycle and relies on identical input giving identical output.
pub trait ConfidenceEvaluator: Send + Sync {
    fn evaluate(&self, hypothesis: &Hypothesis, input: &Value, cycle: u32) -> ConfidenceSignal;
}

/// Predicate deciding whether a payload satisfies the request constraints.
pub type ConstraintCheck = Box<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Default evaluator: favors well-formed payloads and, when a constraint
/// check is supplied, payloads that pass it.
#[derive(Default)]
pub struct HeuristicEvaluator {
    constraint: Option<ConstraintCheck>,
}

impl HeuristicEvaluator {
    pub fn new() -> Self {
        Self { constraint: None }
    }

    pub fn with_constraint(constraint: ConstraintCheck) -> Self {
        Self {
            constraint: Some(constraint),
        }
    }
}

impl ConfidenceEvaluator for HeuristicEvaluator {
    fn evaluate(&self, hypothesis: &Hypothesis, input: &Value, _cycle: u32) -> ConfidenceSignal {
        let payload = &hypothesis.payload;
        let alignment = if payload.is_object() || payload.is_string() {
            0.6
        } else {
            0.5
        };
        let coherence = if payload.is_null() { 0.3 } else { 0.6 };
        let constraint_satisfaction = self
            .constraint
            .as_ref()
            .map_or(NEUTRAL_HINT, |check| if check(payload, input) { 1.0 } else { 0.0 });

        ConfidenceSignal::Hints {
            alignment: Some(alignment),
            coherence: Some(coherence),
            constraint_satisfaction: Some(constraint_satisfaction),
        }
    }
}

fn signal_to_confidence(signal: ConfidenceSignal) -> f64 {
    match signal {
        ConfidenceSignal::Score(score) => clamp01(score),
        ConfidenceSignal::Hints {
            alignment,
            coherence,
            constraint_satisfaction,
        } => {
            let hint = |v: Option<f64>| v.filter(|x| x.is_finite()).map_or(NEUTRAL_HINT, clamp01);
            clamp01((hint(alignment) + hint(coherence) + hint(constraint_satisfaction)) / 3.0)
        }
    }
}

/// Confidence desc, stability desc, id asc.
fn rank(a: &Hypothesis, b: &Hypothesis) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| b.stability.total_cmp(&a.stability))
        .then_with(|| a.id.cmp(&b.id))
}

fn pick_max(hypotheses: &[Hypothesis]) -> Hypothesis {
    hypotheses
        .iter()
        .min_by(|a, b| rank(a, b))
        .cloned()
        .unwrap_or_default()
}

/// Spawn the initial hypothesis set.
///
/// Explicit candidates are ordered by the FNV-1a hash of their canonical
/// JSON (index breaks ties) and truncated to the hypothesis limit, so the
/// working set does not depend on the caller's candidate order.
pub fn generate_hypotheses(input: &CollapseInput, cfg: &CollapseConfig) -> HypothesisSet {
    let limit = input
        .max_hypotheses
        .unwrap_or(cfg.max_parallel_hypotheses)
        .min(cfg.max_parallel_hypotheses)
        .max(1);

    let hypotheses: Vec<Hypothesis> = if input.candidates.is_empty() {
        (0..SYNTHESIZED_VARIANTS.min(limit))
            .map(|idx| Hypothesis {
                id: format!("h{idx}"),
                payload: json!({ "input": input.input, "variant": idx }),
                confidence: INITIAL_CONFIDENCE,
                stability: 1.0,
            })
            .collect()
    } else {
        let mut order: Vec<(u32, usize)> = input
            .candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (fnv1a32(&canonical_json(c)), i))
            .collect();
        order.sort_unstable();
        order
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(spawn_idx, (_, candidate_idx))| Hypothesis {
                id: format!("h{spawn_idx}"),
                payload: input.candidates[candidate_idx].clone(),
                confidence: INITIAL_CONFIDENCE,
                stability: 1.0,
            })
            .collect()
    };

    HypothesisSet {
        hypotheses,
        variance: 0.0,
        collapsed: false,
    }
}

/// Re-score one hypothesis; stability is one minus the confidence change.
pub fn evaluate_confidence(
    hypothesis: &Hypothesis,
    input: &Value,
    cycle: u32,
    evaluator: &dyn ConfidenceEvaluator,
) -> Hypothesis {
    let previous = clamp01(hypothesis.confidence);
    let next = signal_to_confidence(evaluator.evaluate(hypothesis, input, cycle));
    Hypothesis {
        confidence: next,
        stability: clamp01(1.0 - (next - previous).abs()),
        ..hypothesis.clone()
    }
}

/// Population variance of hypothesis confidences; zero for one or none.
#[allow(clippy::cast_precision_loss)]
pub fn calculate_variance(hypotheses: &[Hypothesis]) -> f64 {
    let n = hypotheses.len();
    if n <= 1 {
        return 0.0;
    }
    let n = n as f64;
    let mean = hypotheses.iter().map(|h| clamp01(h.confidence)).sum::<f64>() / n;
    hypotheses
        .iter()
        .map(|h| {
            let d = clamp01(h.confidence) - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

/// Collapse the set if any trigger fires; `None` means keep evaluating.
pub fn attempt_collapse(
    set: &mut HypothesisSet,
    evaluation_cycles: u32,
    params: &CollapseParams,
) -> Option<CollapseResult> {
    let best = pick_max(&set.hypotheses);
    if set.collapsed {
        return Some(CollapseResult {
            confidence: best.confidence,
            selected: best,
            collapse_reason: CollapseReason::Timeout,
        });
    }

    let variance_trigger = set.variance <= clamp01(params.variance_threshold);
    let confidence_trigger = best.confidence >= clamp01(params.confidence_lock);
    let timeout_trigger = evaluation_cycles >= params.max_evaluation_cycles.max(1);

    let collapse_reason = if variance_trigger {
        CollapseReason::VarianceThreshold
    } else if confidence_trigger {
        CollapseReason::MaxConfidence
    } else if timeout_trigger {
        CollapseReason::Timeout
    } else {
        return None;
    };

    set.collapsed = true;
    Some(CollapseResult {
        confidence: best.confidence,
        selected: best,
        collapse_reason,
    })
}

/// Run the full generate / evaluate / collapse loop.
pub fn cognitive_collapse(
    input: &CollapseInput,
    evaluator: &dyn ConfidenceEvaluator,
    cfg: &CollapseConfig,
) -> CollapseResult {
    let mut set = generate_hypotheses(input, cfg);
    let max_cycles = input.params.max_evaluation_cycles.max(1);

    for cycle in 1..=max_cycles {
        set.hypotheses = set
            .hypotheses
            .iter()
            .map(|h| evaluate_confidence(h, &input.input, cycle, evaluator))
            .collect();
        set.variance = calculate_variance(&set.hypotheses);

        if let Some(result) = attempt_collapse(&mut set, cycle, &input.params) {
            tracing::debug!(
                cycle,
                reason = %result.collapse_reason,
                confidence = result.confidence,
                "collapse.resolved"
            );
            return result;
        }
    }

    set.variance = calculate_variance(&set.hypotheses);
    attempt_collapse(&mut set, max_cycles, &input.params).unwrap_or_else(|| {
        let selected = pick_max(&set.hypotheses);
        CollapseResult {
            confidence: selected.confidence,
            selected,
            collapse_reason: CollapseReason::Timeout,
        }
    })
}
