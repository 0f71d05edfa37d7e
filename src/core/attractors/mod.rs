// Attractor selector: scores the four behavioral modes against the turn's
// needs and resolves one, with deterministic tie-breaking.

pub mod registry;
pub mod scoring;
pub mod select;
pub mod types;

pub use registry::{AttractorEntry, default_policy, registry_entry};
pub use scoring::{compute_needs, payload_risk_hint, score_attractors};
pub use select::{
    collapse_to_attractor, collapse_to_attractor_with_gradients, pick_by_tie_break,
    select_attractor,
};
pub use types::{AttractorId, AttractorInput, AttractorResult, AttractorScore, NeedVector};
