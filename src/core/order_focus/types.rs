use serde::{Deserialize, Serialize};
use strum::Display;

use crate::core::attractors::AttractorResult;
use crate::core::cognition::CollapseResult;
use crate::core::constraints::{ConstraintSet, Disposition};
use crate::core::context::TurnContext;
use crate::core::gradients::Gradients;
use crate::core::posture::PostureId;

// IntentEntry — one timestamped intent label from recent turns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentEntry {
    pub ts: u64,
    pub label: String,
}

// ConstraintEvent — a constraint set the user established at `ts`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintEvent {
    pub ts: u64,
    #[serde(default)]
    pub constraints: ConstraintSet,
}

/// Caller-owned bounded history window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OrderFocusHistory {
    #[serde(default)]
    pub intents: Vec<IntentEntry>,
    #[serde(default)]
    pub constraints: Vec<ConstraintEvent>,
}

impl OrderFocusHistory {
    /// Intersection of constraint events no older than `max_age_ms`.
    pub fn active_constraints(&self, now_ms: u64, max_age_ms: u64) -> ConstraintSet {
        ConstraintSet::intersect_all(
            self.constraints
                .iter()
                .filter(|event| now_ms.saturating_sub(event.ts) <= max_age_ms)
                .map(|event| &event.constraints),
        )
    }
}

// OrderFocusSignals — short-term signals from the conversation surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OrderFocusSignals {
    #[serde(default)]
    pub ambiguity: Option<f64>,
    #[serde(default)]
    pub contradiction: Option<f64>,
    #[serde(default)]
    pub last_input_ts: Option<u64>,
    #[serde(default)]
    pub last_intent_label: Option<String>,
}

// DispositionBias — the gate's advisory disposition; it never declines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DispositionBias {
    Act,
    Ask,
    Pause,
    Defer,
}

impl From<DispositionBias> for Disposition {
    fn from(bias: DispositionBias) -> Self {
        match bias {
            DispositionBias::Act => Self::Act,
            DispositionBias::Ask => Self::Ask,
            DispositionBias::Pause => Self::Pause,
            DispositionBias::Defer => Self::Defer,
        }
    }
}

// ReasonCode — why the gate chose its bias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReasonCode {
    Stable,
    Ambiguous,
    Conflicted,
    Oscillating,
    StaleInputs,
    Risky,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderFocusState {
    pub order: f64,
    pub focus: f64,
    pub coherence: f64,
    pub intent_stability: f64,
    pub contradiction: f64,
    pub noise: f64,
    pub disposition_bias: DispositionBias,
    pub reason_code: ReasonCode,
}

// IntentStability — stability score and the oscillation it was penalized by
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntentStability {
    pub stability: f64,
    pub oscillation: f64,
}

// CoherenceBundle — the three coherence readings the gate combines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoherenceBundle {
    pub order: f64,
    pub focus: f64,
    pub coherence: f64,
}

/// Borrowed view over what the order/focus gate reads.
#[derive(Debug, Clone, Copy)]
pub struct OrderFocusInput<'a> {
    pub collapse: &'a CollapseResult,
    pub attractor: &'a AttractorResult,
    pub gradients: &'a Gradients,
    pub context: &'a TurnContext,
    pub posture: Option<PostureId>,
    pub signals: &'a OrderFocusSignals,
    pub history: &'a OrderFocusHistory,
}

impl OrderFocusInput<'_> {
    /// The label recent history is compared against.
    pub fn current_label(&self) -> String {
        self.signals
            .last_intent_label
            .clone()
            .unwrap_or_else(|| self.context.user_intent.to_string())
    }

    /// Ambiguity from signals, then context, then the collapse's uncertainty.
    pub fn ambiguity(&self) -> f64 {
        self.signals
            .ambiguity
            .or(self.context.ambiguity)
            .map_or_else(|| 1.0 - self.collapse.confidence(), crate::core::numeric::clamp01)
    }
}
