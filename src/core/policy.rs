//! Delivery policy vocabulary shared by attractors, identity and expression.

use serde::{Deserialize, Serialize};
use strum::Display;

// Verbosity — ordered minimal < standard < expanded
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Verbosity {
    Minimal,
    Standard,
    Expanded,
}

impl Verbosity {
    const LEVELS: [Self; 3] = [Self::Minimal, Self::Standard, Self::Expanded];

    /// Move along the scale by `delta` steps, saturating at both ends.
    pub fn shift(self, delta: i32) -> Self {
        shift_level(&Self::LEVELS, self, delta)
    }
}

// Tone — delivery register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tone {
    Neutral,
    Formal,
    Creative,
    Guarded,
}

// Structure — layout of the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Structure {
    Checklist,
    Narrative,
    Hybrid,
}

// RiskPosture — ordered open < cautious < restricted
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskPosture {
    Open,
    Cautious,
    Restricted,
}

impl RiskPosture {
    const LEVELS: [Self; 3] = [Self::Open, Self::Cautious, Self::Restricted];

    pub fn shift(self, delta: i32) -> Self {
        shift_level(&Self::LEVELS, self, delta)
    }
}

// Policy — default delivery policy carried by an attractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub verbosity: Verbosity,
    pub tone: Tone,
    pub structure: Structure,
    pub risk_posture: RiskPosture,
}

fn shift_level<T: Copy + PartialEq>(levels: &[T], current: T, delta: i32) -> T {
    let index = levels.iter().position(|l| *l == current).unwrap_or(0);
    let max = levels.len().saturating_sub(1);
    let moved = if delta.is_negative() {
        index.saturating_sub(delta.unsigned_abs() as usize)
    } else {
        index.saturating_add(delta.unsigned_abs() as usize).min(max)
    };
    levels[moved]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_shift_saturates() {
        assert_eq!(Verbosity::Expanded.shift(-1), Verbosity::Standard);
        assert_eq!(Verbosity::Minimal.shift(-1), Verbosity::Minimal);
        assert_eq!(Verbosity::Standard.shift(4), Verbosity::Expanded);
        assert_eq!(Verbosity::Standard.shift(0), Verbosity::Standard);
    }

    #[test]
    fn risk_posture_shift_saturates() {
        assert_eq!(RiskPosture::Open.shift(1), RiskPosture::Cautious);
        assert_eq!(RiskPosture::Restricted.shift(1), RiskPosture::Restricted);
        assert_eq!(RiskPosture::Open.shift(-1), RiskPosture::Open);
    }

    #[test]
    fn policy_serializes_snake_case() {
        let policy = Policy {
            verbosity: Verbosity::Standard,
            tone: Tone::Guarded,
            structure: Structure::Checklist,
            risk_posture: RiskPosture::Restricted,
        };
        let json = serde_json::to_string(&policy).unwrap();
        assert_eq!(
            json,
            r#"{"verbosity":"standard","tone":"guarded","structure":"checklist","risk_posture":"restricted"}"#
        );
    }
}
