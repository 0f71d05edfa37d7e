use crate::core::policy::{Policy, RiskPosture, Structure, Tone, Verbosity};

use super::types::{AttractorId, NeedVector};

// AttractorEntry — static description, default policy and scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttractorEntry {
    pub id: AttractorId,
    pub description: &'static str,
    pub policy: Policy,
    pub weights: NeedVector,
}

const ORDER: AttractorEntry = AttractorEntry {
    id: AttractorId::Order,
    description: "Structured execution and clarity-first response shaping.",
    policy: Policy {
        verbosity: Verbosity::Standard,
        tone: Tone::Formal,
        structure: Structure::Checklist,
        risk_posture: RiskPosture::Cautious,
    },
    weights: NeedVector {
        clarity: 0.9,
        novelty: 0.15,
        risk: 0.25,
        communication: 0.35,
    },
};

const INSIGHT: AttractorEntry = AttractorEntry {
    id: AttractorId::Insight,
    description: "Synthesis, exploration and recombination of concepts.",
    policy: Policy {
        verbosity: Verbosity::Expanded,
        tone: Tone::Creative,
        structure: Structure::Hybrid,
        risk_posture: RiskPosture::Open,
    },
    weights: NeedVector {
        clarity: 0.25,
        novelty: 0.9,
        risk: 0.1,
        communication: 0.45,
    },
};

const PROTECTION: AttractorEntry = AttractorEntry {
    id: AttractorId::Protection,
    description: "Risk-averse posture prioritizing safety and constraints.",
    policy: Policy {
        verbosity: Verbosity::Minimal,
        tone: Tone::Guarded,
        structure: Structure::Checklist,
        risk_posture: RiskPosture::Restricted,
    },
    weights: NeedVector {
        clarity: 0.2,
        novelty: 0.05,
        risk: 1.0,
        communication: 0.15,
    },
};

const EXPRESSION: AttractorEntry = AttractorEntry {
    id: AttractorId::Expression,
    description: "Communication and rapport for stakeholder alignment.",
    policy: Policy {
        verbosity: Verbosity::Standard,
        tone: Tone::Neutral,
        structure: Structure::Narrative,
        risk_posture: RiskPosture::Open,
    },
    weights: NeedVector {
        clarity: 0.25,
        novelty: 0.3,
        risk: 0.05,
        communication: 0.9,
    },
};

pub fn registry_entry(id: AttractorId) -> &'static AttractorEntry {
    match id {
        AttractorId::Order => &ORDER,
        AttractorId::Insight => &INSIGHT,
        AttractorId::Protection => &PROTECTION,
        AttractorId::Expression => &EXPRESSION,
    }
}

/// Default delivery policy for an attractor.
pub fn default_policy(id: AttractorId) -> Policy {
    registry_entry(id).policy
}
