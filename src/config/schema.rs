use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

// ── Top-level config ──────────────────────────────────────────────

/// Tuning knobs for every modulation stage.
///
/// Stages never read this from disk themselves: the caller loads it once and
/// passes the relevant section into each pure stage function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModulationConfig {
    /// Path to config.toml - computed at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub gradients: GradientsConfig,

    #[serde(default)]
    pub collapse: CollapseConfig,

    #[serde(default)]
    pub posture: PostureConfig,

    #[serde(default)]
    pub identity: IdentityGateConfig,

    #[serde(default)]
    pub order_focus: OrderFocusConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl ModulationConfig {
    /// Reject thresholds that would make a stage's rule table incoherent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit_fields = [
            ("gradients.default_stress", self.gradients.default_stress),
            ("gradients.default_curiosity", self.gradients.default_curiosity),
            ("gradients.default_urgency", self.gradients.default_urgency),
            ("gradients.default_confidence", self.gradients.default_confidence),
            ("gradients.security_stress_floor", self.gradients.security_stress_floor),
            ("gradients.curiosity_safety_cap", self.gradients.curiosity_safety_cap),
            (
                "gradients.collapse_confidence_weight",
                self.gradients.collapse_confidence_weight,
            ),
            ("collapse.variance_threshold", self.collapse.variance_threshold),
            ("collapse.confidence_lock", self.collapse.confidence_lock),
            ("collapse.max_threshold_delta", self.collapse.max_threshold_delta),
            ("posture.high_caps_ratio", self.posture.high_caps_ratio),
            ("posture.hysteresis_margin", self.posture.hysteresis_margin),
            (
                "posture.min_confidence_to_switch",
                self.posture.min_confidence_to_switch,
            ),
            ("identity.high_risk", self.identity.high_risk),
            (
                "identity.defer_confidence_below",
                self.identity.defer_confidence_below,
            ),
            ("identity.contradiction_pause", self.identity.contradiction_pause),
            ("identity.ambiguity_pause", self.identity.ambiguity_pause),
            ("identity.ambiguity_ask", self.identity.ambiguity_ask),
            ("order_focus.act_threshold", self.order_focus.act_threshold),
            ("order_focus.ask_threshold", self.order_focus.ask_threshold),
            ("order_focus.stability_act_min", self.order_focus.stability_act_min),
            (
                "order_focus.contradiction_pause",
                self.order_focus.contradiction_pause,
            ),
            (
                "order_focus.risk_coherence_floor",
                self.order_focus.risk_coherence_floor,
            ),
            ("order_focus.oscillation_pause", self.order_focus.oscillation_pause),
            ("order_focus.noise_high", self.order_focus.noise_high),
            ("order_focus.stale_penalty", self.order_focus.stale_penalty),
        ];
        for (name, value) in unit_fields {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.order_focus.ask_threshold > self.order_focus.act_threshold {
            return Err(ConfigError::Validation(
                "order_focus.ask_threshold must not exceed order_focus.act_threshold".into(),
            ));
        }
        if self.posture.very_short_chars >= self.posture.very_long_chars {
            return Err(ConfigError::Validation(
                "posture.very_short_chars must be below posture.very_long_chars".into(),
            ));
        }
        if self.collapse.max_evaluation_cycles == 0 || self.collapse.max_parallel_hypotheses == 0 {
            return Err(ConfigError::Validation(
                "collapse cycles and hypothesis count must be at least 1".into(),
            ));
        }
        if self.posture.history_window == 0 || self.order_focus.history_window == 0 {
            return Err(ConfigError::Validation(
                "history windows must hold at least one entry".into(),
            ));
        }
        Ok(())
    }
}

// ── Gradients ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientsConfig {
    /// Baseline stress before context and sensor nudges
    #[serde(default = "default_stress")]
    pub default_stress: f64,
    #[serde(default = "default_curiosity")]
    pub default_curiosity: f64,
    #[serde(default = "default_urgency")]
    pub default_urgency: f64,
    /// Neutral confidence used until a collapse confidence is blended in
    #[serde(default = "default_confidence")]
    pub default_confidence: f64,
    /// Stress never drops below this while security flags are raised
    #[serde(default = "default_security_stress_floor")]
    pub security_stress_floor: f64,
    /// Curiosity ceiling under security flags or high system load
    #[serde(default = "default_curiosity_safety_cap")]
    pub curiosity_safety_cap: f64,
    /// Weight of the external collapse confidence in the blend (prior gets the rest)
    #[serde(default = "default_collapse_confidence_weight")]
    pub collapse_confidence_weight: f64,
}

fn default_stress() -> f64 {
    0.15
}
fn default_curiosity() -> f64 {
    0.2
}
fn default_urgency() -> f64 {
    0.2
}
fn default_confidence() -> f64 {
    0.5
}
fn default_security_stress_floor() -> f64 {
    0.35
}
fn default_curiosity_safety_cap() -> f64 {
    0.45
}
fn default_collapse_confidence_weight() -> f64 {
    0.65
}

impl Default for GradientsConfig {
    fn default() -> Self {
        Self {
            default_stress: default_stress(),
            default_curiosity: default_curiosity(),
            default_urgency: default_urgency(),
            default_confidence: default_confidence(),
            security_stress_floor: default_security_stress_floor(),
            curiosity_safety_cap: default_curiosity_safety_cap(),
            collapse_confidence_weight: default_collapse_confidence_weight(),
        }
    }
}

// ── Collapse ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollapseConfig {
    /// Collapse once confidence variance across hypotheses falls to this value
    #[serde(default = "default_variance_threshold")]
    pub variance_threshold: f64,
    /// Collapse once the best hypothesis reaches this confidence
    #[serde(default = "default_confidence_lock")]
    pub confidence_lock: f64,
    #[serde(default = "default_max_evaluation_cycles")]
    pub max_evaluation_cycles: u32,
    #[serde(default = "default_max_parallel_hypotheses")]
    pub max_parallel_hypotheses: usize,
    /// Largest per-turn gradient adjustment to either threshold
    #[serde(default = "default_max_threshold_delta")]
    pub max_threshold_delta: f64,
}

fn default_variance_threshold() -> f64 {
    0.05
}
fn default_confidence_lock() -> f64 {
    0.85
}
fn default_max_evaluation_cycles() -> u32 {
    3
}
fn default_max_parallel_hypotheses() -> usize {
    5
}
fn default_max_threshold_delta() -> f64 {
    0.05
}

impl Default for CollapseConfig {
    fn default() -> Self {
        Self {
            variance_threshold: default_variance_threshold(),
            confidence_lock: default_confidence_lock(),
            max_evaluation_cycles: default_max_evaluation_cycles(),
            max_parallel_hypotheses: default_max_parallel_hypotheses(),
            max_threshold_delta: default_max_threshold_delta(),
        }
    }
}

// ── Posture ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureConfig {
    #[serde(default = "default_very_short_chars")]
    pub very_short_chars: usize,
    #[serde(default = "default_very_long_chars")]
    pub very_long_chars: usize,
    /// Messages in the last two minutes that count as a burst
    #[serde(default = "default_rapid_fire_messages")]
    pub rapid_fire_messages: u32,
    #[serde(default = "default_high_caps_ratio")]
    pub high_caps_ratio: f64,
    #[serde(default = "default_repeat_phrase_high")]
    pub repeat_phrase_high: u32,
    /// Number of recent postures considered for hysteresis
    #[serde(default = "default_posture_history_window")]
    pub history_window: usize,
    /// Score margin a challenger needs over the held posture
    #[serde(default = "default_hysteresis_margin")]
    pub hysteresis_margin: f64,
    #[serde(default = "default_min_confidence_to_switch")]
    pub min_confidence_to_switch: f64,
    /// A held posture older than this no longer resists switching
    #[serde(default = "default_max_posture_age_ms")]
    pub max_history_age_ms: u64,
    #[serde(default = "default_tie_epsilon")]
    pub tie_epsilon: f64,
}

fn default_very_short_chars() -> usize {
    20
}
fn default_very_long_chars() -> usize {
    400
}
fn default_rapid_fire_messages() -> u32 {
    5
}
fn default_high_caps_ratio() -> f64 {
    0.5
}
fn default_repeat_phrase_high() -> u32 {
    2
}
fn default_posture_history_window() -> usize {
    5
}
fn default_hysteresis_margin() -> f64 {
    0.25
}
fn default_min_confidence_to_switch() -> f64 {
    0.55
}
fn default_max_posture_age_ms() -> u64 {
    600_000
}
fn default_tie_epsilon() -> f64 {
    1e-9
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            very_short_chars: default_very_short_chars(),
            very_long_chars: default_very_long_chars(),
            rapid_fire_messages: default_rapid_fire_messages(),
            high_caps_ratio: default_high_caps_ratio(),
            repeat_phrase_high: default_repeat_phrase_high(),
            history_window: default_posture_history_window(),
            hysteresis_margin: default_hysteresis_margin(),
            min_confidence_to_switch: default_min_confidence_to_switch(),
            max_history_age_ms: default_max_posture_age_ms(),
            tie_epsilon: default_tie_epsilon(),
        }
    }
}

// ── Identity gate ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityGateConfig {
    /// Risk at or above this is treated as high risk
    #[serde(default = "default_high_risk")]
    pub high_risk: f64,
    /// High-risk, high-impact requests defer below this collapse confidence
    #[serde(default = "default_defer_confidence_below")]
    pub defer_confidence_below: f64,
    #[serde(default = "default_identity_contradiction_pause")]
    pub contradiction_pause: f64,
    /// Ambiguity that pauses a request whose intent is unknown
    #[serde(default = "default_ambiguity_pause")]
    pub ambiguity_pause: f64,
    #[serde(default = "default_ambiguity_ask")]
    pub ambiguity_ask: f64,
    /// Collapse confidence below which assumptions must be stated
    #[serde(default = "default_assumptions_below")]
    pub assumptions_below: f64,
    #[serde(default = "default_identity_max_options")]
    pub max_options: u32,
    #[serde(default = "default_assertive_max_options")]
    pub assertive_max_options: u32,
}

fn default_high_risk() -> f64 {
    0.7
}
fn default_defer_confidence_below() -> f64 {
    0.6
}
fn default_identity_contradiction_pause() -> f64 {
    0.7
}
fn default_ambiguity_pause() -> f64 {
    0.75
}
fn default_ambiguity_ask() -> f64 {
    0.7
}
fn default_assumptions_below() -> f64 {
    0.55
}
fn default_identity_max_options() -> u32 {
    5
}
fn default_assertive_max_options() -> u32 {
    3
}

impl Default for IdentityGateConfig {
    fn default() -> Self {
        Self {
            high_risk: default_high_risk(),
            defer_confidence_below: default_defer_confidence_below(),
            contradiction_pause: default_identity_contradiction_pause(),
            ambiguity_pause: default_ambiguity_pause(),
            ambiguity_ask: default_ambiguity_ask(),
            assumptions_below: default_assumptions_below(),
            max_options: default_identity_max_options(),
            assertive_max_options: default_assertive_max_options(),
        }
    }
}

// ── Order / focus gate ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFocusConfig {
    /// Coherence needed (with stable intent) to lean toward acting
    #[serde(default = "default_act_threshold")]
    pub act_threshold: f64,
    #[serde(default = "default_ask_threshold")]
    pub ask_threshold: f64,
    #[serde(default = "default_stability_act_min")]
    pub stability_act_min: f64,
    #[serde(default = "default_of_contradiction_pause")]
    pub contradiction_pause: f64,
    /// Risky turns defer when coherence is below this floor
    #[serde(default = "default_risk_coherence_floor")]
    pub risk_coherence_floor: f64,
    #[serde(default = "default_oscillation_pause")]
    pub oscillation_pause: f64,
    #[serde(default = "default_noise_high")]
    pub noise_high: f64,
    #[serde(default = "default_stale_after_ms")]
    pub stale_after_ms: u64,
    #[serde(default = "default_stale_penalty")]
    pub stale_penalty: f64,
    /// Most recent intent labels considered
    #[serde(default = "default_intent_history_window")]
    pub history_window: usize,
    /// Intent labels older than this are ignored
    #[serde(default = "default_intent_history_max_age_ms")]
    pub history_max_age_ms: u64,
}

fn default_act_threshold() -> f64 {
    0.7
}
fn default_ask_threshold() -> f64 {
    0.45
}
fn default_stability_act_min() -> f64 {
    0.6
}
fn default_of_contradiction_pause() -> f64 {
    0.7
}
fn default_risk_coherence_floor() -> f64 {
    0.6
}
fn default_oscillation_pause() -> f64 {
    0.6
}
fn default_noise_high() -> f64 {
    0.6
}
fn default_stale_after_ms() -> u64 {
    300_000
}
fn default_stale_penalty() -> f64 {
    0.15
}
fn default_intent_history_window() -> usize {
    8
}
fn default_intent_history_max_age_ms() -> u64 {
    120_000
}

impl Default for OrderFocusConfig {
    fn default() -> Self {
        Self {
            act_threshold: default_act_threshold(),
            ask_threshold: default_ask_threshold(),
            stability_act_min: default_stability_act_min(),
            contradiction_pause: default_of_contradiction_pause(),
            risk_coherence_floor: default_risk_coherence_floor(),
            oscillation_pause: default_oscillation_pause(),
            noise_high: default_noise_high(),
            stale_after_ms: default_stale_after_ms(),
            stale_penalty: default_stale_penalty(),
            history_window: default_intent_history_window(),
            history_max_age_ms: default_intent_history_max_age_ms(),
        }
    }
}

// ── Observability ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// "log" | "counting" | "none"
    #[serde(default = "default_observer_backend")]
    pub backend: String,
    /// tracing level for the binary: "error" | "warn" | "info" | "debug" | "trace"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_observer_backend() -> String {
    "log".into()
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            backend: default_observer_backend(),
            log_level: default_log_level(),
        }
    }
}
