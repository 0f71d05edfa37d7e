use crate::config::PostureConfig;
use crate::core::context::Level;
use crate::core::numeric::clamp01;

use super::types::{PostureFeatures, PostureInput};

const DIRECTIVE_VERBS: &[&str] = &[
    "do",
    "build",
    "implement",
    "ship",
    "execute",
    "generate",
    "fix",
    "now",
];
const EXPLORATORY_MARKERS: &[&str] = &[
    "what if", "could", "ideas", "options", "compare", "why", "explain",
];
const OVERLOAD_MARKERS: &[&str] = &[
    "too much",
    "overwhelmed",
    "confused",
    "lost",
    "can't track",
    "cant track",
];
const FRUSTRATION_MARKERS: &[&str] = &[
    "why isn't",
    "still",
    "wasting",
    "ridiculous",
    "broken",
    "come on",
];
const CONFIDENCE_MARKERS: &[&str] = &["exactly", "perfect", "that's it", "proceed", "locked", "go"];

/// Lower-case, fold typographic apostrophes, turn every other non-word
/// character into a space and pad both ends, so markers can be matched as
/// ` marker ` on word boundaries.
fn normalize_for_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    let mut last_space = true;
    for ch in text.chars().flat_map(char::to_lowercase) {
        let mapped = match ch {
            '\u{2019}' | '\u{2018}' | '\'' => '\'',
            c if c.is_alphanumeric() => c,
            _ => ' ',
        };
        if mapped == ' ' {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(mapped);
            last_space = false;
        }
    }
    if !last_space {
        out.push(' ');
    }
    out
}

fn has_any(normalized: &str, markers: &[&str]) -> bool {
    markers
        .iter()
        .any(|marker| normalized.contains(&format!(" {marker} ")))
}

/// Share of upper-case letters among ASCII letters; `0.0` when there are none.
#[allow(clippy::cast_precision_loss)]
fn caps_ratio(text: &str) -> f64 {
    let (letters, caps) = text
        .chars()
        .filter(char::is_ascii_alphabetic)
        .fold((0usize, 0usize), |(letters, caps), ch| {
            (letters + 1, caps + usize::from(ch.is_ascii_uppercase()))
        });
    if letters == 0 {
        0.0
    } else {
        caps as f64 / letters as f64
    }
}

/// Pure feature extraction for the posture classifier.
pub fn extract_signals(input: &PostureInput<'_>, cfg: &PostureConfig) -> PostureFeatures {
    let text = input.text;
    let interaction = input.interaction;

    let message_length_chars = interaction
        .message_length_chars
        .unwrap_or_else(|| text.chars().count());
    let caps = interaction
        .caps_ratio
        .filter(|r| r.is_finite())
        .unwrap_or_else(|| caps_ratio(text));

    let normalized = normalize_for_markers(text);
    let sensors = input.sensors;

    PostureFeatures {
        message_length_chars,
        is_very_short: message_length_chars <= cfg.very_short_chars,
        is_very_long: message_length_chars >= cfg.very_long_chars,
        rapid_fire: interaction.messages_last_2_min >= cfg.rapid_fire_messages,
        high_caps: caps >= cfg.high_caps_ratio,
        repetition: interaction.repeated_phrases >= cfg.repeat_phrase_high,
        directive_hit: has_any(&normalized, DIRECTIVE_VERBS),
        exploratory_hit: has_any(&normalized, EXPLORATORY_MARKERS),
        overload_hit: has_any(&normalized, OVERLOAD_MARKERS),
        frustration_hit: has_any(&normalized, FRUSTRATION_MARKERS),
        confidence_hit: has_any(&normalized, CONFIDENCE_MARKERS),
        tension: clamp01(sensors.voice_tension().max(sensors.bio_stress())),
        speed: sensors.voice_rate(),
        time_pressure: input.time_pressure.unwrap_or(Level::Medium),
        has_security_flags: input.has_security_flags,
        now_ms: input.now_ms,
    }
}
