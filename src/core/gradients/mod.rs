// Gradient deriver: context and sensors to bounded continuous scalars, plus
// the adapters that let gradients tune collapse and attractor policy.

pub mod apply;
pub mod derive;
pub mod types;

/// A gradient at or above this value counts as "high" everywhere in the pipeline.
pub const HIGH_GRADIENT: f64 = 0.7;

pub use apply::{
    MAX_POLICY_SHIFT, apply_gradients_to_attractor_result, apply_to_attractor_policy,
    apply_to_collapse, effective_collapse_params,
};
pub use derive::{derive_gradients, gradient_mode, with_collapse_confidence};
pub use types::{CollapseModulation, CollapseParams, GradientMode, Gradients};
