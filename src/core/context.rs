use serde::{Deserialize, Serialize};
use strum::Display;

use super::numeric::clamp01;

// Level — coarse three-step scale used for time pressure, impact and load
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Level {
    Low,
    Medium,
    High,
}

// UserIntent — caller-supplied (or posture-derived) reading of the request
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserIntent {
    Directive,
    Exploratory,
    Overloaded,
    #[default]
    Unknown,
}

// SensorReadings — optional lightweight sensor scalars, each nominally in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SensorReadings {
    #[serde(default)]
    pub voice_tension: Option<f64>,
    #[serde(default)]
    pub voice_rate: Option<f64>,
    #[serde(default)]
    pub bio_stress: Option<f64>,
}

impl SensorReadings {
    pub fn voice_tension(&self) -> f64 {
        self.voice_tension.map_or(0.0, clamp01)
    }

    pub fn voice_rate(&self) -> f64 {
        self.voice_rate.map_or(0.0, clamp01)
    }

    pub fn bio_stress(&self) -> f64 {
        self.bio_stress.map_or(0.0, clamp01)
    }
}

/// Per-turn conversational context.
///
/// Every field is optional on the wire; absent values are interpreted by each
/// stage with its own conservative default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TurnContext {
    #[serde(default)]
    pub user_intent: UserIntent,
    #[serde(default)]
    pub time_pressure: Option<Level>,
    #[serde(default)]
    pub has_security_flags: bool,
    #[serde(default)]
    pub request_impact: Option<Level>,
    #[serde(default)]
    pub ambiguity: Option<f64>,
    #[serde(default)]
    pub contradiction: Option<f64>,
    #[serde(default)]
    pub disallowed: bool,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub system_load: Option<Level>,
    #[serde(default)]
    pub recent_errors: Option<u32>,
}

impl TurnContext {
    /// Time pressure with the given fallback for stages that disagree on the default.
    pub fn time_pressure_or(&self, fallback: Level) -> Level {
        self.time_pressure.unwrap_or(fallback)
    }

    /// Request impact, `medium` when unspecified.
    pub fn impact(&self) -> Level {
        self.request_impact.unwrap_or(Level::Medium)
    }

    pub fn is_directive(&self) -> bool {
        self.user_intent == UserIntent::Directive
    }

    pub fn is_overloaded(&self) -> bool {
        self.user_intent == UserIntent::Overloaded
    }

    pub fn is_unknown(&self) -> bool {
        self.user_intent == UserIntent::Unknown
    }
}
