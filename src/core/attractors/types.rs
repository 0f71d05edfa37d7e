use serde::{Deserialize, Serialize};
use strum::Display;

use crate::core::cognition::CollapseResult;
use crate::core::context::TurnContext;
use crate::core::policy::Policy;

// AttractorId — the four behavioral modes a turn can settle into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttractorId {
    Order,
    Insight,
    Expression,
    Protection,
}

impl AttractorId {
    /// Scoring order.
    pub const ALL: [Self; 4] = [Self::Order, Self::Insight, Self::Protection, Self::Expression];

    /// Preference when scores tie, most conservative first.
    pub const TIE_BREAK_ORDER: [Self; 4] =
        [Self::Protection, Self::Order, Self::Insight, Self::Expression];

    pub fn tie_break_rank(self) -> usize {
        Self::TIE_BREAK_ORDER
            .iter()
            .position(|id| *id == self)
            .unwrap_or(Self::TIE_BREAK_ORDER.len())
    }
}

// NeedVector — what the turn asks for, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NeedVector {
    pub clarity: f64,
    pub novelty: f64,
    pub risk: f64,
    pub communication: f64,
}

// AttractorScore — one scored candidate; reasons are internal diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractorScore {
    pub id: AttractorId,
    pub score: f64,
    #[serde(default)]
    pub reasons: Vec<String>,
}

// AttractorResult — the selected attractor and its delivery policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractorResult {
    pub id: AttractorId,
    pub confidence: f64,
    pub policy: Policy,
}

/// Borrowed view over what attractor selection reads.
#[derive(Debug, Clone, Copy)]
pub struct AttractorInput<'a> {
    pub collapse: &'a CollapseResult,
    pub context: &'a TurnContext,
}
