use crate::config::OrderFocusConfig;
use crate::core::attractors::AttractorId;
use crate::core::context::Level;
use crate::core::numeric::clamp01;
use crate::core::posture::posture_act_threshold_delta;

use super::coherence::{compute_coherence, compute_contradiction, compute_noise};
use super::stability::compute_intent_stability;
use super::types::{DispositionBias, OrderFocusInput, OrderFocusState, ReasonCode};

const RISK_LOW_CONTRADICTION: f64 = 0.5;

fn is_stale(last_input_ts: Option<u64>, now_ms: u64, cfg: &OrderFocusConfig) -> bool {
    last_input_ts.is_some_and(|ts| now_ms.saturating_sub(ts) >= cfg.stale_after_ms)
}

/// Bias the disposition from coherence and intent stability.
///
/// Oscillating intent pauses regardless of anything else. Otherwise risk
/// decides between act and defer, hard contradiction pauses, and coherence
/// picks act, ask or pause. Stale inputs then push toward ask and high noise
/// downgrades act to ask.
pub fn gate_order_focus(
    input: &OrderFocusInput<'_>,
    now_ms: u64,
    cfg: &OrderFocusConfig,
) -> OrderFocusState {
    let ctx = input.context;
    let label = input.current_label();
    let stability = compute_intent_stability(input.history, &label, now_ms, cfg);
    let contradiction = compute_contradiction(input);
    let noise = compute_noise(input, stability.oscillation, contradiction);
    let bundle = compute_coherence(input, stability.stability, contradiction, noise);

    let stale = is_stale(input.signals.last_input_ts, now_ms, cfg);
    let coherence = if stale {
        clamp01(bundle.coherence - cfg.stale_penalty)
    } else {
        bundle.coherence
    };

    let protection = input.attractor.id == AttractorId::Protection;
    let risky = ctx.has_security_flags || protection;
    let risk_low = !risky && contradiction < RISK_LOW_CONTRADICTION;
    let act_threshold = clamp01(
        cfg.act_threshold
            + input.posture.map_or(0.0, |posture| {
                posture_act_threshold_delta(posture, risk_low && ctx.is_directive())
            }),
    );
    let high_pressure = ctx.time_pressure_or(Level::Medium) == Level::High;

    let (mut bias, mut reason) = if stability.oscillation >= cfg.oscillation_pause {
        (DispositionBias::Pause, ReasonCode::Oscillating)
    } else if risky {
        if contradiction >= cfg.contradiction_pause || coherence < cfg.risk_coherence_floor {
            (DispositionBias::Defer, ReasonCode::Risky)
        } else {
            (DispositionBias::Act, ReasonCode::Risky)
        }
    } else if contradiction >= cfg.contradiction_pause {
        let bias = if high_pressure {
            DispositionBias::Ask
        } else {
            DispositionBias::Pause
        };
        (bias, ReasonCode::Conflicted)
    } else if coherence >= act_threshold && stability.stability >= cfg.stability_act_min {
        (DispositionBias::Act, ReasonCode::Stable)
    } else if coherence >= cfg.ask_threshold {
        (DispositionBias::Ask, ReasonCode::Ambiguous)
    } else {
        (DispositionBias::Pause, ReasonCode::Ambiguous)
    };

    if stale && reason != ReasonCode::Oscillating {
        if bias != DispositionBias::Defer {
            bias = DispositionBias::Ask;
        }
        reason = ReasonCode::StaleInputs;
    }

    if noise >= cfg.noise_high && bias == DispositionBias::Act {
        bias = DispositionBias::Ask;
        if reason == ReasonCode::Stable {
            reason = ReasonCode::Ambiguous;
        }
    }

    tracing::debug!(
        bias = %bias,
        reason = %reason,
        coherence,
        stability = stability.stability,
        "order_focus.gated"
    );

    OrderFocusState {
        order: bundle.order,
        focus: bundle.focus,
        coherence,
        intent_stability: stability.stability,
        contradiction,
        noise,
        disposition_bias: bias,
        reason_code: reason,
    }
}
