use serde::{Deserialize, Serialize};
use strum::Display;

use crate::core::attractors::AttractorResult;
use crate::core::constraints::{ConstraintSet, Disposition, MaxLength};
use crate::core::context::TurnContext;
use crate::core::gradients::Gradients;
use crate::core::identity::IdentityDecision;
use crate::core::policy::{Structure, Tone, Verbosity};

/// Event name consumers subscribe to for expression updates.
pub const EXPRESSION_EVENT_NAME: &str = "scing.expression";

// SectionId — building blocks of a response plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SectionId {
    Goal,
    Steps,
    Constraints,
    Assumptions,
    Next,
    Safety,
    Question,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSection {
    pub id: SectionId,
    pub enabled: bool,
    pub max_bullets: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimits {
    pub max_options: u32,
    pub max_length: MaxLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HeadingStyle {
    None,
    Minimal,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BulletStyle {
    Dash,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formatting {
    pub heading_style: HeadingStyle,
    pub bullet_style: BulletStyle,
    pub code_fence_allowed: bool,
}

// LexicalRules — wording rules for whoever renders the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalRules {
    pub forbid_phrases: Vec<String>,
    pub require_imperatives: bool,
    pub forbid_time_estimates: bool,
    pub forbid_over_hedging: bool,
    pub require_concrete_dates: bool,
}

/// A structural template for the reply; rendering is left to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePlan {
    pub disposition: Disposition,
    pub structure: Structure,
    pub tone: Tone,
    pub verbosity: Verbosity,
    pub limits: PlanLimits,
    pub sections: Vec<ResponseSection>,
    pub formatting: Formatting,
    pub lexical_rules: LexicalRules,
}

impl ResponsePlan {
    pub fn section(&self, id: SectionId) -> Option<&ResponseSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn enabled_sections(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.sections.iter().filter(|s| s.enabled).map(|s| s.id)
    }
}

// VisualState — outward state shown by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VisualState {
    Idle,
    Thinking,
    Speaking,
    Alerting,
    Focused,
    Pausing,
    Asking,
    Declining,
    Executing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ColorChannel {
    AmberThink,
    RainbowSpeak,
    RedvioletAlert,
    NeutralCalm,
}

// Motion — animation hints, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub pulse_rate: f64,
    pub morph_rate: f64,
    pub tighten: f64,
    pub expand: f64,
    pub stillness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    pub state: VisualState,
    pub channel: ColorChannel,
    pub intensity: f64,
    pub motion: Motion,
    pub tags: Vec<String>,
    pub ttl_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionBundle {
    pub response_plan: ResponsePlan,
    pub telemetry: TelemetryFrame,
}

/// A timestamped bundle, published under [`EXPRESSION_EVENT_NAME`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionEvent {
    pub ts: u64,
    pub response_plan: ResponsePlan,
    pub telemetry: TelemetryFrame,
}

/// Render-side options the caller controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanOptions {
    pub code_fence_allowed: bool,
    /// Extra restrictions (posture, user-established) intersected into the plan
    pub constraints: Option<ConstraintSet>,
}

/// Borrowed view over what the composer reads.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionInput<'a> {
    pub attractor: &'a AttractorResult,
    pub gradients: &'a Gradients,
    pub decision: &'a IdentityDecision,
    pub context: &'a TurnContext,
    pub options: PlanOptions,
}
