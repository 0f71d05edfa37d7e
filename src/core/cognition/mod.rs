pub mod collapse;
pub mod types;

pub use collapse::{
    ConfidenceEvaluator, ConstraintCheck, HeuristicEvaluator, attempt_collapse,
    calculate_variance, cognitive_collapse, evaluate_confidence, generate_hypotheses,
};
pub use types::{
    CollapseInput, CollapseReason, CollapseResult, ConfidenceSignal, Hypothesis, HypothesisSet,
};
