//! Numeric helpers shared by every modulation stage.
//!
//! All scalar signals in the pipeline live in `[0, 1]`. Non-finite input is
//! folded to zero before clamping so a NaN can never leak into an output.

use serde_json::Value;

/// Clamp to `[0, 1]`, mapping NaN and infinities to `0.0`.
pub fn clamp01(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Clamp to `[lo, hi]`, mapping non-finite input to `lo`.
pub fn clamp_range(value: f64, lo: f64, hi: f64) -> f64 {
    if !value.is_finite() {
        return lo;
    }
    value.clamp(lo, hi)
}

/// Clamp an optional scalar, treating `None` as `0.0`.
pub fn clamp01_opt(value: Option<f64>) -> f64 {
    value.map_or(0.0, clamp01)
}

/// `1.0` when the flag is set, `0.0` otherwise.
pub fn indicator(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

/// Canonical JSON encoding: object keys are sorted (`serde_json::Map` is a
/// `BTreeMap` without the `preserve_order` feature), so equal values always
/// encode to identical strings.
pub fn canonical_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// 32-bit FNV-1a hash.
pub fn fnv1a32(input: &str) -> u32 {
    const OFFSET: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
    input.bytes().fold(OFFSET, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(PRIME)
    })
}

/// Round a value in `[lo, hi]` to the nearest integer step.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_to_u32(value: f64, lo: u32, hi: u32) -> u32 {
    let clamped = clamp_range(value, f64::from(lo), f64::from(hi));
    clamped.round() as u32
}
