use serde::{Deserialize, Serialize};
use strum::Display;

use crate::core::attractors::AttractorResult;
use crate::core::cognition::CollapseResult;
use crate::core::constraints::{ConstraintSet, Disposition, MaxLength};
use crate::core::context::TurnContext;
use crate::core::gradients::Gradients;
use crate::core::policy::{Structure, Tone};
use crate::core::posture::PostureConstraints;

// IdentityTrait — stable character traits the gate reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IdentityTrait {
    Calm,
    Restrained,
    PrecisionDriven,
    RiskAware,
    NonSubmissive,
    Assertive,
}

/// Behavioral guard rails. `None` for structure or tone means "inherit the
/// attractor policy".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConstraints {
    pub forbid_begging: bool,
    pub forbid_panic: bool,
    pub forbid_over_explain: bool,
    pub enforce_directness: bool,
    #[serde(default)]
    pub enforce_structure: Option<Structure>,
    #[serde(default)]
    pub enforce_tone: Option<Tone>,
    pub silence_allowed: bool,
}

impl Default for IdentityConstraints {
    fn default() -> Self {
        Self {
            forbid_begging: true,
            forbid_panic: true,
            forbid_over_explain: false,
            enforce_directness: false,
            enforce_structure: None,
            enforce_tone: None,
            silence_allowed: true,
        }
    }
}

// OutputLimits — size and content limits for the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLimits {
    pub max_options: u32,
    pub max_length: MaxLength,
    #[serde(default)]
    pub require_concrete_dates: bool,
    #[serde(default)]
    pub require_explicit_assumptions: bool,
}

impl Default for OutputLimits {
    fn default() -> Self {
        Self {
            max_options: 5,
            max_length: MaxLength::Medium,
            require_concrete_dates: false,
            require_explicit_assumptions: false,
        }
    }
}

impl OutputLimits {
    /// Tighten by a constraint set, keeping the stricter of each limit.
    pub fn clamp_to(&self, set: &ConstraintSet) -> Self {
        let merged = ConstraintSet::from(*self).intersect(set);
        Self {
            max_options: merged.max_options.unwrap_or(self.max_options),
            max_length: merged.max_length.unwrap_or(self.max_length),
            require_concrete_dates: merged.require_concrete_dates,
            require_explicit_assumptions: merged.require_explicit_assumptions,
        }
    }
}

impl From<OutputLimits> for ConstraintSet {
    fn from(limits: OutputLimits) -> Self {
        Self {
            max_options: Some(limits.max_options),
            max_length: Some(limits.max_length),
            require_concrete_dates: limits.require_concrete_dates,
            require_explicit_assumptions: limits.require_explicit_assumptions,
            ..Self::default()
        }
    }
}

/// The identity gate's verdict for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdentityDecision {
    pub disposition: Disposition,
    pub confidence: f64,
    pub constraints: IdentityConstraints,
    pub output_limits: OutputLimits,
}

/// Borrowed view over what the identity gate reads.
#[derive(Debug, Clone, Copy)]
pub struct IdentityInput<'a> {
    pub collapse: &'a CollapseResult,
    pub attractor: &'a AttractorResult,
    pub gradients: &'a Gradients,
    pub context: &'a TurnContext,
    pub posture_constraints: Option<&'a PostureConstraints>,
}
