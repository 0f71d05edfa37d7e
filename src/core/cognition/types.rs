use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

use crate::core::gradients::CollapseParams;

// Hypothesis — one candidate decision under evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default = "default_stability")]
    pub stability: f64,
}

fn default_stability() -> f64 {
    1.0
}

impl Default for Hypothesis {
    fn default() -> Self {
        Self {
            id: String::new(),
            payload: Value::Null,
            confidence: 0.0,
            stability: default_stability(),
        }
    }
}

// HypothesisSet — working set for one collapse run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisSet {
    pub hypotheses: Vec<Hypothesis>,
    pub variance: f64,
    pub collapsed: bool,
}

// CollapseReason — which trigger resolved the collapse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CollapseReason {
    VarianceThreshold,
    MaxConfidence,
    #[default]
    Timeout,
}

/// A resolved decision, read-only input to the attractor selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CollapseResult {
    #[serde(default)]
    pub selected: Hypothesis,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub collapse_reason: CollapseReason,
}

impl CollapseResult {
    /// Collapse confidence, clamped and NaN-free.
    pub fn confidence(&self) -> f64 {
        crate::core::numeric::clamp01(self.confidence)
    }
}

// ConfidenceSignal — what an evaluator reports for a hypothesis
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfidenceSignal {
    Score(f64),
    Hints {
        alignment: Option<f64>,
        coherence: Option<f64>,
        constraint_satisfaction: Option<f64>,
    },
}

/// Everything the collapse engine needs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct CollapseInput {
    /// Raw request context handed to evaluators and synthesized variants
    pub input: Value,
    /// Explicit candidates; when empty, variants of `input` are synthesized
    pub candidates: Vec<Value>,
    pub max_hypotheses: Option<usize>,
    pub params: CollapseParams,
}
