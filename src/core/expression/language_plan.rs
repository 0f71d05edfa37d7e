use crate::core::attractors::{AttractorId, AttractorResult, default_policy};
use crate::core::constraints::{ConstraintSet, Disposition};
use crate::core::gradients::{Gradients, HIGH_GRADIENT};
use crate::core::identity::IdentityDecision;
use crate::core::policy::{Structure, Tone, Verbosity};

use super::types::{
    BulletStyle, Formatting, HeadingStyle, LexicalRules, PlanLimits, PlanOptions, ResponsePlan,
    ResponseSection, SectionId,
};

const ASSUMPTIONS_INDEX: usize = 1;

const FORBID_PHRASES: &[&str] = &[
    r"\bsorry\b",
    r"\bI\s+can\s*not\b",
    r"\bI\s+can't\b",
    r"\b(?:sit\s+tight|wait|give\s+me\s+time|give\s+me\s+a\s+moment|give\s+me\s+a\s+minute)\b",
    r"\b(?:I'm\s+excited|I'm\s+thrilled)\b",
];

fn baseline_sections(id: AttractorId) -> &'static [SectionId] {
    match id {
        AttractorId::Order => &[
            SectionId::Goal,
            SectionId::Steps,
            SectionId::Constraints,
            SectionId::Next,
        ],
        AttractorId::Insight => &[
            SectionId::Goal,
            SectionId::Assumptions,
            SectionId::Steps,
            SectionId::Next,
        ],
        AttractorId::Protection => &[SectionId::Safety, SectionId::Constraints, SectionId::Next],
        AttractorId::Expression => &[SectionId::Goal, SectionId::Steps, SectionId::Next],
    }
}

// DispositionShape — layout a non-acting disposition imposes
struct DispositionShape {
    structure: Structure,
    tone: Option<Tone>,
    verbosity: Verbosity,
    sections: &'static [SectionId],
}

fn shape_for(disposition: Disposition) -> Option<DispositionShape> {
    let shape = match disposition {
        Disposition::Act => return None,
        Disposition::Pause => DispositionShape {
            structure: Structure::Checklist,
            tone: Some(Tone::Formal),
            verbosity: Verbosity::Minimal,
            sections: &[SectionId::Goal, SectionId::Question, SectionId::Next],
        },
        Disposition::Ask => DispositionShape {
            structure: Structure::Checklist,
            tone: None,
            verbosity: Verbosity::Minimal,
            sections: &[SectionId::Question, SectionId::Next],
        },
        Disposition::Decline => DispositionShape {
            structure: Structure::Checklist,
            tone: Some(Tone::Guarded),
            verbosity: Verbosity::Minimal,
            sections: &[SectionId::Safety, SectionId::Next],
        },
        Disposition::Defer => DispositionShape {
            structure: Structure::Checklist,
            tone: Some(Tone::Formal),
            verbosity: Verbosity::Standard,
            sections: &[SectionId::Constraints, SectionId::Steps, SectionId::Next],
        },
    };
    Some(shape)
}

fn max_bullets(verbosity: Verbosity) -> u32 {
    match verbosity {
        Verbosity::Minimal => 3,
        Verbosity::Standard => 6,
        Verbosity::Expanded => 10,
    }
}

fn sections_from(ids: &[SectionId]) -> Vec<ResponseSection> {
    ids.iter()
        .map(|&id| ResponseSection {
            id,
            enabled: true,
            max_bullets: 0,
        })
        .collect()
}

fn ensure_enabled_question(sections: &mut Vec<ResponseSection>) {
    match sections.iter_mut().find(|s| s.id == SectionId::Question) {
        Some(section) => section.enabled = true,
        None => sections.insert(
            0,
            ResponseSection {
                id: SectionId::Question,
                enabled: true,
                max_bullets: 0,
            },
        ),
    }
}

/// Turn the attractor policy and identity decision into a response plan.
///
/// Layers apply in a fixed order: attractor baseline, identity guard rails,
/// disposition layout, extra constraints, gradient verbosity shift (skipped
/// when the attractor policy has already moved off its default), the
/// assumptions section, and finally bullet and formatting rules.
pub fn build_response_plan(
    attractor: &AttractorResult,
    gradients: &Gradients,
    decision: &IdentityDecision,
    opts: PlanOptions,
) -> ResponsePlan {
    let disposition = decision.disposition;
    let rails = &decision.constraints;
    let extra = opts.constraints.unwrap_or_default();

    let mut structure = rails.enforce_structure.unwrap_or(attractor.policy.structure);
    let mut tone = rails.enforce_tone.unwrap_or(attractor.policy.tone);
    let mut verbosity = attractor.policy.verbosity;
    let mut sections = sections_from(baseline_sections(attractor.id));

    if let Some(shape) = shape_for(disposition) {
        structure = shape.structure;
        tone = shape.tone.unwrap_or(tone);
        verbosity = shape.verbosity;
        sections = sections_from(shape.sections);
    }

    let merged = ConstraintSet::from(decision.output_limits)
        .intersect(&ConstraintSet::for_disposition(disposition))
        .intersect(&extra);
    let mut limits = PlanLimits {
        max_options: merged
            .max_options
            .unwrap_or(decision.output_limits.max_options),
        max_length: merged
            .max_length
            .unwrap_or(decision.output_limits.max_length),
    };

    if extra.prefer_checklist {
        structure = Structure::Checklist;
    }
    if extra.ask_single_question && matches!(disposition, Disposition::Ask | Disposition::Pause) {
        limits.max_options = limits.max_options.min(1);
        ensure_enabled_question(&mut sections);
    }

    // A policy that already left its default has spent this turn's step.
    if attractor.policy.verbosity == default_policy(attractor.id).verbosity {
        let g = gradients.normalized();
        let mut shift = 0;
        if g.urgency >= HIGH_GRADIENT || g.stress >= HIGH_GRADIENT {
            shift -= 1;
        }
        if g.curiosity >= HIGH_GRADIENT
            && attractor.id != AttractorId::Protection
            && disposition == Disposition::Act
        {
            shift += 1;
        }
        verbosity = verbosity.shift(shift.clamp(-1, 1));
    }

    let need_assumptions = (decision.output_limits.require_explicit_assumptions
        || extra.require_explicit_assumptions)
        && disposition != Disposition::Ask;
    if need_assumptions {
        if !sections.iter().any(|s| s.id == SectionId::Assumptions) {
            let at = ASSUMPTIONS_INDEX.min(sections.len());
            sections.insert(
                at,
                ResponseSection {
                    id: SectionId::Assumptions,
                    enabled: true,
                    max_bullets: 0,
                },
            );
        }
    } else {
        for section in sections.iter_mut().filter(|s| s.id == SectionId::Assumptions) {
            section.enabled = false;
        }
    }

    let bullets = max_bullets(verbosity);
    for section in &mut sections {
        section.max_bullets = bullets;
    }

    let numbered = structure == Structure::Checklist
        && matches!(disposition, Disposition::Act | Disposition::Defer);

    ResponsePlan {
        disposition,
        structure,
        tone,
        verbosity,
        limits,
        sections,
        formatting: Formatting {
            heading_style: if verbosity == Verbosity::Minimal {
                HeadingStyle::Minimal
            } else {
                HeadingStyle::Strong
            },
            bullet_style: if numbered {
                BulletStyle::Number
            } else {
                BulletStyle::Dash
            },
            code_fence_allowed: opts.code_fence_allowed,
        },
        lexical_rules: LexicalRules {
            forbid_phrases: FORBID_PHRASES.iter().map(ToString::to_string).collect(),
            require_imperatives: rails.enforce_directness,
            forbid_time_estimates: true,
            forbid_over_hedging: true,
            require_concrete_dates: decision.output_limits.require_concrete_dates
                || extra.require_concrete_dates,
        },
    }
}
