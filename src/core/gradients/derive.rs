use crate::config::GradientsConfig;
use crate::core::context::{Level, SensorReadings, TurnContext, UserIntent};
use crate::core::numeric::clamp01;

use super::HIGH_GRADIENT;
use super::types::{GradientMode, Gradients};

const OVERLOAD_STRESS: f64 = 0.45;
const ERRORS_WEIGHT: f64 = 0.25;
const LOAD_WEIGHT: f64 = 0.25;
const BIO_STRESS_WEIGHT: f64 = 0.35;
const VOICE_TENSION_WEIGHT: f64 = 0.25;
const ERRORS_SATURATE_AT: f64 = 5.0;

const HIGH_PRESSURE_URGENCY: f64 = 0.6;
const MEDIUM_PRESSURE_URGENCY: f64 = 0.2;
const DIRECTIVE_URGENCY: f64 = 0.25;

const EXPLORATORY_CURIOSITY: f64 = 0.45;
const SAFE_CURIOSITY: f64 = 0.15;
const MEDIUM_BAND_CURIOSITY: f64 = 0.1;
const MEDIUM_BAND: (f64, f64) = (0.45, 0.7);

fn load_score(load: Option<Level>) -> f64 {
    match load {
        Some(Level::High) => 1.0,
        Some(Level::Medium) => 0.5,
        Some(Level::Low) | None => 0.0,
    }
}

fn errors_score(recent_errors: Option<u32>) -> f64 {
    match recent_errors {
        Some(n) if n > 0 => clamp01(f64::from(n) / ERRORS_SATURATE_AT),
        _ => 0.0,
    }
}

/// Derive the four gradients from context and optional sensors.
///
/// Absent inputs fall back to neutral values (intent unknown, time pressure
/// low, no sensors). Curiosity is hard-capped whenever security flags are
/// raised or the system is under high load.
pub fn derive_gradients(
    ctx: &TurnContext,
    sensors: &SensorReadings,
    cfg: &GradientsConfig,
) -> Gradients {
    let intent = ctx.user_intent;
    let flags = ctx.has_security_flags;

    let mut stress = cfg.default_stress;
    if intent == UserIntent::Overloaded {
        stress += OVERLOAD_STRESS;
    }
    stress += errors_score(ctx.recent_errors) * ERRORS_WEIGHT;
    stress += load_score(ctx.system_load) * LOAD_WEIGHT;
    stress += sensors.bio_stress() * BIO_STRESS_WEIGHT;
    stress += sensors.voice_tension() * VOICE_TENSION_WEIGHT;
    if flags {
        stress = stress.max(cfg.security_stress_floor);
    }

    let mut urgency = cfg.default_urgency;
    match ctx.time_pressure_or(Level::Low) {
        Level::High => urgency += HIGH_PRESSURE_URGENCY,
        Level::Medium => urgency += MEDIUM_PRESSURE_URGENCY,
        Level::Low => {}
    }
    if intent == UserIntent::Directive {
        urgency += DIRECTIVE_URGENCY;
    }

    // Stays neutral until a collapse confidence is blended in.
    let confidence = clamp01(cfg.default_confidence);

    let mut curiosity = cfg.default_curiosity;
    if intent == UserIntent::Exploratory {
        curiosity += EXPLORATORY_CURIOSITY;
    }
    if !flags {
        curiosity += SAFE_CURIOSITY;
    }
    if (MEDIUM_BAND.0..=MEDIUM_BAND.1).contains(&confidence) {
        curiosity += MEDIUM_BAND_CURIOSITY;
    }
    if flags || ctx.system_load == Some(Level::High) {
        curiosity = curiosity.min(cfg.curiosity_safety_cap);
    }

    let gradients = Gradients::new(stress, curiosity, urgency, confidence);
    tracing::debug!(
        stress = gradients.stress,
        curiosity = gradients.curiosity,
        urgency = gradients.urgency,
        "gradients.derived"
    );
    gradients
}

/// Blend an external collapse confidence into the gradient confidence.
pub fn with_collapse_confidence(
    gradients: Gradients,
    collapse_confidence: f64,
    cfg: &GradientsConfig,
) -> Gradients {
    let weight = clamp01(cfg.collapse_confidence_weight);
    let blended =
        weight * clamp01(collapse_confidence) + (1.0 - weight) * clamp01(gradients.confidence);
    Gradients {
        confidence: clamp01(blended),
        ..gradients
    }
}

/// Dominant regime, checked in priority order guarded > urgent > exploratory.
pub fn gradient_mode(gradients: &Gradients, has_security_flags: bool) -> GradientMode {
    if has_security_flags || gradients.stress >= HIGH_GRADIENT {
        GradientMode::Guarded
    } else if gradients.urgency >= HIGH_GRADIENT {
        GradientMode::Urgent
    } else if gradients.curiosity >= HIGH_GRADIENT {
        GradientMode::Exploratory
    } else {
        GradientMode::Stable
    }
}
