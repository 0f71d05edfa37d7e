use crate::config::PostureConfig;
use crate::core::constraints::MaxLength;
use crate::core::context::Level;
use crate::core::numeric::{clamp01, round_to_u32};

use super::types::{
    PostureConstraints, PostureEntry, PostureFeatures, PostureHistory, PostureId, PostureResult,
    PostureScore, PostureSignals,
};

const BASE_SCORE: f64 = 0.2;
const HIGH_TENSION: f64 = 0.7;
const OPTIONS_RANGE: (u32, u32) = (1, 5);

/// How many options the phrasing suggests the user is willing to weigh.
fn inferred_option_tolerance(f: &PostureFeatures) -> f64 {
    let mut v = 0.35;
    if f.exploratory_hit {
        v += 0.35;
    }
    if f.is_very_long {
        v += 0.2;
    }
    if f.directive_hit {
        v -= 0.2;
    }
    if f.rapid_fire {
        v -= 0.1;
    }
    clamp01(v)
}

fn raw_score(id: PostureId, f: &PostureFeatures) -> f64 {
    let urgency_high = f.time_pressure == Level::High;
    let tense = f.tension >= HIGH_TENSION;
    let mut score = BASE_SCORE;
    let mut add = |cond: bool, weight: f64| {
        if cond {
            score += weight;
        }
    };

    match id {
        PostureId::Exploratory => {
            add(f.exploratory_hit, 0.3);
            add(f.is_very_long && !urgency_high, 0.15);
            add(inferred_option_tolerance(f) >= 0.7, 0.1);
        }
        PostureId::Directive => {
            add(f.directive_hit, 0.35);
            add(urgency_high, 0.2);
            add(f.is_very_short, 0.1);
        }
        PostureId::Overloaded => {
            add(f.overload_hit, 0.35);
            add(f.rapid_fire, 0.2);
            add(f.is_very_long, 0.1);
            add(tense, 0.15);
        }
        PostureId::Confident => {
            add(f.confidence_hit, 0.35);
            add(!f.repetition && !f.rapid_fire, 0.2);
            add(
                !f.is_very_long && f.message_length_chars >= 80 && f.directive_hit,
                0.1,
            );
        }
        PostureId::Frustrated => {
            add(f.frustration_hit, 0.35);
            add(f.high_caps, 0.2);
            add(f.repetition, 0.15);
            add(tense, 0.15);
        }
        PostureId::Unknown => {
            add(!f.any_strong_cue(), 0.25);
            add(f.is_very_short && !f.directive_hit, 0.2);
        }
    }
    clamp01(score)
}

/// Score every posture; the result is listed in tie-break order.
pub fn score_postures(features: &PostureFeatures) -> Vec<PostureScore> {
    PostureId::TIE_BREAK_ORDER
        .iter()
        .map(|&id| PostureScore {
            id,
            score: raw_score(id, features),
        })
        .collect()
}

fn score_of(scores: &[PostureScore], id: PostureId) -> f64 {
    scores
        .iter()
        .find(|s| s.id == id)
        .map_or(0.0, |s| clamp01(s.score))
}

fn pick_top(scores: &[PostureScore], eps: f64) -> PostureScore {
    let best = scores
        .iter()
        .map(|s| clamp01(s.score))
        .fold(0.0_f64, f64::max);
    PostureId::TIE_BREAK_ORDER
        .iter()
        .find_map(|&id| {
            scores
                .iter()
                .find(|s| s.id == id && (best - clamp01(s.score)).abs() <= eps)
                .map(|s| PostureScore {
                    id,
                    score: clamp01(s.score),
                })
        })
        .unwrap_or(PostureScore {
            id: PostureId::Unknown,
            score: 0.0,
        })
}

/// Timestamp-sorted, windowed view of the caller's posture history.
fn normalize_history(history: &PostureHistory, window: usize) -> Vec<PostureEntry> {
    let mut clean = history.last_postures.clone();
    clean.sort_by_key(|entry| entry.ts);
    let skip = clean.len().saturating_sub(window);
    clean.split_off(skip)
}

/// Delivery preferences for a posture under the given time pressure.
pub fn derive_signals(id: PostureId, time_pressure: Level) -> PostureSignals {
    let urgency_cue = match time_pressure {
        Level::High => 0.8,
        Level::Medium => 0.5,
        Level::Low => 0.3,
    };
    let signals = |brevity, structure, tolerance, urgency, friction| PostureSignals {
        brevity_preference: brevity,
        structure_preference: structure,
        tolerance_for_options: tolerance,
        urgency_cue: urgency,
        friction_cue: friction,
    };

    match id {
        PostureId::Exploratory => signals(0.2, 0.5, 0.85, urgency_cue, 0.2),
        PostureId::Directive => signals(0.7, 0.85, 0.35, urgency_cue.max(0.6), 0.3),
        PostureId::Overloaded => signals(0.95, 0.95, 0.1, 0.5, 0.6),
        PostureId::Confident => signals(0.65, 0.7, 0.25, 0.3, 0.1),
        PostureId::Frustrated => signals(0.85, 0.9, 0.15, urgency_cue.max(0.7), 0.9),
        PostureId::Unknown => signals(0.6, 0.75, 0.35, 0.4, 0.3),
    }
}

/// Output constraints implied by a posture's signals.
pub fn derive_constraints(signals: &PostureSignals, id: PostureId) -> PostureConstraints {
    let brevity = clamp01(signals.brevity_preference);
    let max_length = if brevity >= 0.85 {
        MaxLength::Short
    } else if brevity >= 0.55 {
        MaxLength::Medium
    } else {
        MaxLength::Long
    };

    PostureConstraints {
        max_options: round_to_u32(
            1.0 + 5.0 * clamp01(signals.tolerance_for_options),
            OPTIONS_RANGE.0,
            OPTIONS_RANGE.1,
        ),
        max_length,
        ask_single_question: matches!(
            id,
            PostureId::Overloaded | PostureId::Frustrated | PostureId::Unknown
        ) || brevity >= 0.85,
        prefer_checklist: clamp01(signals.structure_preference) >= 0.75,
    }
}

/// Pick a posture with hysteresis against the most recent one.
///
/// The held posture survives unless the challenger scores at least
/// `min_confidence_to_switch` and beats it by `hysteresis_margin`. When
/// `now_ms` is known, a held posture older than `max_history_age_ms` no
/// longer resists. Signals are derived for medium time pressure; use
/// [`select_posture_with_context`] to honor the turn's actual pressure.
pub fn select_posture(
    scores: &[PostureScore],
    history: &PostureHistory,
    now_ms: Option<u64>,
    cfg: &PostureConfig,
) -> PostureResult {
    let top = pick_top(scores, cfg.tie_epsilon);
    let recent = normalize_history(history, cfg.history_window);

    let held = recent.last().filter(|entry| match now_ms {
        Some(now) => now.saturating_sub(entry.ts) <= cfg.max_history_age_ms,
        None => true,
    });

    let chosen = match held {
        Some(entry) if entry.id != top.id => {
            let held_score = score_of(scores, entry.id);
            let margin = top.score - held_score;
            if top.score >= cfg.min_confidence_to_switch && margin >= cfg.hysteresis_margin {
                top
            } else {
                tracing::debug!(
                    held = %entry.id,
                    challenger = %top.id,
                    margin,
                    "posture.hysteresis_hold"
                );
                PostureScore {
                    id: entry.id,
                    score: held_score,
                }
            }
        }
        _ => top,
    };

    let signals = derive_signals(chosen.id, Level::Medium);
    PostureResult {
        id: chosen.id,
        confidence: clamp01(chosen.score),
        constraints: derive_constraints(&signals, chosen.id),
        signals,
    }
}

/// [`select_posture`] with signals derived for the turn's time pressure
/// (`medium` when unknown).
pub fn select_posture_with_context(
    scores: &[PostureScore],
    history: &PostureHistory,
    now_ms: Option<u64>,
    time_pressure: Option<Level>,
    cfg: &PostureConfig,
) -> PostureResult {
    let base = select_posture(scores, history, now_ms, cfg);
    let signals = derive_signals(base.id, time_pressure.unwrap_or(Level::Medium));
    PostureResult {
        constraints: derive_constraints(&signals, base.id),
        signals,
        ..base
    }
}
