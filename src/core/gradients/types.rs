use serde::{Deserialize, Serialize};
use strum::Display;

use crate::core::numeric::clamp01;

// Gradients — four bounded continuous scalars, each finite and in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gradients {
    pub stress: f64,
    pub curiosity: f64,
    pub urgency: f64,
    pub confidence: f64,
}

impl Gradients {
    /// Build from raw values, folding non-finite input to zero and clamping.
    pub fn new(stress: f64, curiosity: f64, urgency: f64, confidence: f64) -> Self {
        Self {
            stress: clamp01(stress),
            curiosity: clamp01(curiosity),
            urgency: clamp01(urgency),
            confidence: clamp01(confidence),
        }
    }

    /// Re-clamp every field; used on values that crossed a serialization boundary.
    pub fn normalized(self) -> Self {
        Self::new(self.stress, self.curiosity, self.urgency, self.confidence)
    }
}

// GradientMode — dominant gradient regime for a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GradientMode {
    Guarded,
    Urgent,
    Exploratory,
    Stable,
}

// CollapseModulation — bounded deltas applied to the collapse parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollapseModulation {
    pub variance_threshold_delta: f64,
    pub confidence_lock_delta: f64,
    pub max_evaluation_cycles_delta: i32,
}

// CollapseParams — effective tuning for one collapse run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollapseParams {
    pub variance_threshold: f64,
    pub confidence_lock: f64,
    pub max_evaluation_cycles: u32,
}
