use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::core::context::{Level, UserIntent};
use crate::core::numeric::{canonical_json, clamp01};

use super::registry::registry_entry;
use super::types::{AttractorId, AttractorInput, AttractorScore, NeedVector};

// ── Domain hints ─────────────────────────────────────────────────

static CREATIVE_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"design|creative|art|story|narrative|brand|marketing|architecture|strategy|research")
        .expect("valid creative domain regex")
});
static TECHNICAL_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"engineering|devops|data|ml|ai|product").expect("valid technical domain regex")
});
static COMMUNICATION_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"stakeholder|proposal|brief|pitch|docs|documentation|explain|teach|training|alignment",
    )
    .expect("valid communication domain regex")
});

// ── Payload risk buckets ─────────────────────────────────────────

static HARM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"safety|harm|injury|weapon|explosive|poison").expect("valid harm regex")
});
static CREDENTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"password|passwd|secret|token|apikey|api_key|private[_-]?key|credential|oauth|bearer",
    )
    .expect("valid credential regex")
});
static PAYMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"payment|bank|wire|transfer|invoice|credit[_-]?card|crypto|wallet|funds|money")
        .expect("valid payment regex")
});
static COMPLIANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"gdpr|hipaa|sox|pci|compliance|legal|contract|audit")
        .expect("valid compliance regex")
});
static DESTRUCTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"delete|drop\s+table|rm\s+-rf|format\s+disk|terminate|irreversible|production|prod\b",
    )
    .expect("valid destructive regex")
});

fn domain_novelty_hint(domain: Option<&str>) -> f64 {
    let Some(d) = domain.map(str::to_lowercase).filter(|d| !d.is_empty()) else {
        return 0.0;
    };
    if CREATIVE_DOMAIN_RE.is_match(&d) {
        0.75
    } else if TECHNICAL_DOMAIN_RE.is_match(&d) {
        0.35
    } else {
        0.15
    }
}

fn domain_communication_hint(domain: Option<&str>) -> f64 {
    let Some(d) = domain.map(str::to_lowercase).filter(|d| !d.is_empty()) else {
        return 0.2;
    };
    if COMMUNICATION_DOMAIN_RE.is_match(&d) {
        0.75
    } else {
        0.25
    }
}

/// Risk carried by the selected payload, from its canonical JSON text.
/// A null payload carries none; every bucket that matches competes and the
/// highest wins.
pub fn payload_risk_hint(payload: &Value) -> f64 {
    if payload.is_null() {
        return 0.0;
    }
    let text = canonical_json(payload).to_lowercase();
    if text.is_empty() {
        return 0.0;
    }

    let buckets: [(&LazyLock<Regex>, f64); 5] = [
        (&HARM_RE, 1.0),
        (&CREDENTIAL_RE, 0.9),
        (&PAYMENT_RE, 0.85),
        (&COMPLIANCE_RE, 0.75),
        (&DESTRUCTIVE_RE, 0.75),
    ];
    buckets
        .iter()
        .find(|(re, _)| re.is_match(&text))
        .map_or(0.1, |(_, risk)| *risk)
}

/// Derive the need vector for a turn.
pub fn compute_needs(input: &AttractorInput<'_>) -> NeedVector {
    let ctx = input.context;
    let collapse = input.collapse.confidence();
    let low_band = collapse < 0.5;
    let medium_band = (0.45..=0.75).contains(&collapse);
    let high_band = collapse >= 0.7;

    let intent = ctx.user_intent;
    let high_pressure = ctx.time_pressure_or(Level::Low) == Level::High;
    let directive = intent == UserIntent::Directive;
    let exploratory = intent == UserIntent::Exploratory;
    let unclear = matches!(intent, UserIntent::Unknown | UserIntent::Overloaded);
    let ambiguous = unclear || ctx.domain.is_none();
    let domain = ctx.domain.as_deref();

    let mut clarity = if ambiguous { 0.35 } else { 0.1 };
    if directive {
        clarity += 0.45;
        if high_band {
            clarity += 0.2;
        }
    }
    if high_pressure {
        clarity += 0.1;
    }

    let mut novelty = if exploratory { 0.55 } else { 0.1 };
    if medium_band {
        novelty += 0.25;
    }
    novelty += domain_novelty_hint(domain) * 0.25;

    let mut risk = payload_risk_hint(&input.collapse.selected.payload) * 0.75;
    if ctx.has_security_flags {
        risk += 0.95;
    }
    if low_band && directive {
        risk += 0.2;
    }
    if high_pressure {
        risk += 0.1;
    }

    let mut communication = if unclear { 0.6 } else { 0.2 };
    if exploratory {
        communication += 0.15;
    }
    communication += domain_communication_hint(domain) * 0.35;

    NeedVector {
        clarity: clamp01(clarity),
        novelty: clamp01(novelty),
        risk: clamp01(risk),
        communication: clamp01(communication),
    }
}

fn weighted_score(needs: &NeedVector, weights: &NeedVector) -> f64 {
    let total = weights.clarity + weights.novelty + weights.risk + weights.communication;
    if total <= 0.0 {
        return 0.0;
    }
    let raw = needs.clarity * weights.clarity
        + needs.novelty * weights.novelty
        + needs.risk * weights.risk
        + needs.communication * weights.communication;
    clamp01(raw / total)
}

/// Score every attractor against the turn's needs.
pub fn score_attractors(input: &AttractorInput<'_>) -> Vec<AttractorScore> {
    let needs = compute_needs(input);
    AttractorId::ALL
        .iter()
        .map(|&id| {
            let score = weighted_score(&needs, &registry_entry(id).weights);
            AttractorScore {
                id,
                score,
                reasons: vec![
                    format!("needs.clarity={:.3}", needs.clarity),
                    format!("needs.novelty={:.3}", needs.novelty),
                    format!("needs.risk={:.3}", needs.risk),
                    format!("needs.comm={:.3}", needs.communication),
                    format!("score={score:.3}"),
                ],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cognition::{CollapseResult, Hypothesis};
    use crate::core::context::TurnContext;
    use serde_json::json;

    fn collapse(confidence: f64, payload: Value) -> CollapseResult {
        CollapseResult {
            selected: Hypothesis {
                id: "h0".into(),
                payload,
                confidence,
                stability: 1.0,
            },
            confidence,
            ..CollapseResult::default()
        }
    }

    fn score_of(scores: &[AttractorScore], id: AttractorId) -> f64 {
        scores.iter().find(|s| s.id == id).map_or(-1.0, |s| s.score)
    }

    #[test]
    fn payload_risk_buckets() {
        assert_eq!(payload_risk_hint(&Value::Null), 0.0);
        assert!((payload_risk_hint(&json!({"note": "rotate the API_KEY"})) - 0.9).abs() < 1e-12);
        assert!((payload_risk_hint(&json!("wire the funds")) - 0.85).abs() < 1e-12);
        assert!((payload_risk_hint(&json!("run the GDPR audit")) - 0.75).abs() < 1e-12);
        assert!((payload_risk_hint(&json!("rm  -rf /tmp")) - 0.75).abs() < 1e-12);
        assert!((payload_risk_hint(&json!("delete the weapon list")) - 1.0).abs() < 1e-12);
        assert!((payload_risk_hint(&json!("draft a haiku")) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn domain_hints() {
        assert!((domain_novelty_hint(Some("Brand Design")) - 0.75).abs() < 1e-12);
        assert!((domain_novelty_hint(Some("devops")) - 0.35).abs() < 1e-12);
        assert_eq!(domain_novelty_hint(None), 0.0);
        assert!((domain_communication_hint(Some("stakeholder brief")) - 0.75).abs() < 1e-12);
        assert!((domain_communication_hint(None) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn directive_high_confidence_needs_clarity() {
        let c = collapse(0.9, Value::Null);
        let ctx = TurnContext {
            user_intent: UserIntent::Directive,
            ..TurnContext::default()
        };
        let needs = compute_needs(&AttractorInput {
            collapse: &c,
            context: &ctx,
        });
        assert!((needs.clarity - 1.0).abs() < 1e-12);
        assert!((needs.novelty - 0.1).abs() < 1e-12);
        assert_eq!(needs.risk, 0.0);
        assert!((needs.communication - 0.27).abs() < 1e-12);
    }

    #[test]
    fn security_flags_saturate_risk() {
        let c = collapse(0.6, json!("status report"));
        let ctx = TurnContext {
            has_security_flags: true,
            ..TurnContext::default()
        };
        let needs = compute_needs(&AttractorInput {
            collapse: &c,
            context: &ctx,
        });
        assert!((needs.risk - 1.0).abs() < 1e-12);
    }

    #[test]
    fn exploratory_design_turn_favors_insight() {
        let c = collapse(0.6, json!("sketch"));
        let ctx = TurnContext {
            user_intent: UserIntent::Exploratory,
            domain: Some("design research".into()),
            ..TurnContext::default()
        };
        let scores = score_attractors(&AttractorInput {
            collapse: &c,
            context: &ctx,
        });
        assert_eq!(scores.len(), 4);
        let insight = score_of(&scores, AttractorId::Insight);
        assert!((insight - 1.118_125 / 1.7).abs() < 1e-9);
        assert!(insight > score_of(&scores, AttractorId::Order));
        assert!(insight > score_of(&scores, AttractorId::Expression));
        assert!(insight > score_of(&scores, AttractorId::Protection));
        assert_eq!(scores[0].reasons.len(), 5);
    }
}
