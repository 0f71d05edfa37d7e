use crate::config::OrderFocusConfig;
use crate::core::numeric::clamp01;

use super::types::{IntentEntry, IntentStability, OrderFocusHistory};

const EMPTY_HISTORY_STABILITY: f64 = 0.5;
const OSCILLATION_WEIGHT: f64 = 0.5;
const MIN_ENTRIES_FOR_OSCILLATION: usize = 3;

/// Entries within `history_max_age_ms` of `now_ms`, oldest first, limited to
/// the last `history_window`. Entries stamped in the future count as fresh.
fn recent_window<'a>(
    history: &'a OrderFocusHistory,
    now_ms: u64,
    cfg: &OrderFocusConfig,
) -> Vec<&'a IntentEntry> {
    let mut recent: Vec<&IntentEntry> = history
        .intents
        .iter()
        .filter(|entry| now_ms.saturating_sub(entry.ts) <= cfg.history_max_age_ms)
        .collect();
    recent.sort_by_key(|entry| entry.ts);
    let skip = recent.len().saturating_sub(cfg.history_window.max(1));
    recent.split_off(skip)
}

/// Fraction of recent entries matching `current_label`, penalized by how
/// often consecutive labels switch.
#[allow(clippy::cast_precision_loss)]
pub fn compute_intent_stability(
    history: &OrderFocusHistory,
    current_label: &str,
    now_ms: u64,
    cfg: &OrderFocusConfig,
) -> IntentStability {
    let recent = recent_window(history, now_ms, cfg);
    if recent.is_empty() {
        return IntentStability {
            stability: EMPTY_HISTORY_STABILITY,
            oscillation: 0.0,
        };
    }

    let n = recent.len();
    let matches = recent.iter().filter(|e| e.label == current_label).count();
    let match_ratio = matches as f64 / n as f64;

    let oscillation = if n >= MIN_ENTRIES_FOR_OSCILLATION {
        let switches = recent.windows(2).filter(|w| w[0].label != w[1].label).count();
        clamp01(switches as f64 / (n - 1) as f64)
    } else {
        0.0
    };

    IntentStability {
        stability: clamp01(match_ratio - OSCILLATION_WEIGHT * oscillation),
        oscillation,
    }
}
