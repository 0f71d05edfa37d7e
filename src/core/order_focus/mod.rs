// Order/focus gate: coherence and intent stability from short-term history,
// biasing the disposition independently of the identity gate.

pub mod coherence;
pub mod gate;
pub mod stability;
pub mod types;

pub use coherence::{compute_coherence, compute_contradiction, compute_noise};
pub use gate::gate_order_focus;
pub use stability::compute_intent_stability;
pub use types::{
    CoherenceBundle, ConstraintEvent, DispositionBias, IntentEntry, IntentStability,
    OrderFocusHistory, OrderFocusInput, OrderFocusSignals, OrderFocusState, ReasonCode,
};
