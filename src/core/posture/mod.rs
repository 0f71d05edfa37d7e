// Posture classifier: text and interaction cues to a discrete user stance,
// with hysteresis against the caller's recent posture history.

pub mod apply;
pub mod classify;
pub mod extract;
pub mod types;

pub use apply::{
    apply_posture_to_context, apply_posture_to_gradients, posture_act_threshold_delta,
    posture_to_user_intent,
};
pub use classify::{
    derive_constraints, derive_signals, score_postures, select_posture,
    select_posture_with_context,
};
pub use extract::extract_signals;
pub use types::*;
