use serde::{Deserialize, Serialize};
use strum::Display;

use crate::core::constraints::{ConstraintSet, MaxLength};
use crate::core::context::{Level, SensorReadings};

// PostureId — classified short-term user stance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PostureId {
    Directive,
    Exploratory,
    Overloaded,
    Frustrated,
    Confident,
    Unknown,
}

impl PostureId {
    /// Fixed tie-break order: the most protective reading wins a tie.
    pub const TIE_BREAK_ORDER: [Self; 6] = [
        Self::Overloaded,
        Self::Frustrated,
        Self::Directive,
        Self::Exploratory,
        Self::Confident,
        Self::Unknown,
    ];
}

// InteractionStats — text-shape and pacing features supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct InteractionStats {
    /// Overrides the measured text length when present
    #[serde(default)]
    pub message_length_chars: Option<usize>,
    #[serde(default)]
    pub messages_last_2_min: u32,
    #[serde(default)]
    pub repeated_phrases: u32,
    /// Overrides the measured caps ratio when present
    #[serde(default)]
    pub caps_ratio: Option<f64>,
}

// PostureInput — everything the feature extractor looks at
#[derive(Debug, Clone, Copy)]
pub struct PostureInput<'a> {
    pub text: &'a str,
    pub interaction: &'a InteractionStats,
    pub sensors: &'a SensorReadings,
    pub time_pressure: Option<Level>,
    pub has_security_flags: bool,
    pub now_ms: Option<u64>,
}

// PostureFeatures — extracted boolean cues and scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureFeatures {
    pub message_length_chars: usize,
    pub is_very_short: bool,
    pub is_very_long: bool,
    pub rapid_fire: bool,
    pub high_caps: bool,
    pub repetition: bool,
    pub directive_hit: bool,
    pub exploratory_hit: bool,
    pub overload_hit: bool,
    pub frustration_hit: bool,
    pub confidence_hit: bool,
    pub tension: f64,
    pub speed: f64,
    pub time_pressure: Level,
    pub has_security_flags: bool,
    pub now_ms: Option<u64>,
}

impl PostureFeatures {
    pub fn any_strong_cue(&self) -> bool {
        self.directive_hit
            || self.exploratory_hit
            || self.overload_hit
            || self.frustration_hit
            || self.confidence_hit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostureScore {
    pub id: PostureId,
    pub score: f64,
}

// PostureSignals — delivery preferences implied by a posture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostureSignals {
    pub brevity_preference: f64,
    pub structure_preference: f64,
    pub tolerance_for_options: f64,
    pub urgency_cue: f64,
    pub friction_cue: f64,
}

// PostureConstraints — hard limits a posture asks the composer to respect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostureConstraints {
    pub max_options: u32,
    pub max_length: MaxLength,
    pub ask_single_question: bool,
    pub prefer_checklist: bool,
}

impl From<PostureConstraints> for ConstraintSet {
    fn from(c: PostureConstraints) -> Self {
        Self {
            max_options: Some(c.max_options),
            max_length: Some(c.max_length),
            ask_single_question: c.ask_single_question,
            prefer_checklist: c.prefer_checklist,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureResult {
    pub id: PostureId,
    pub confidence: f64,
    pub signals: PostureSignals,
    pub constraints: PostureConstraints,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostureEntry {
    pub ts: u64,
    pub id: PostureId,
}

/// Recent postures, owned and bounded by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PostureHistory {
    #[serde(default)]
    pub last_postures: Vec<PostureEntry>,
}
