// Identity gate: ordered disposition rules, guard rails and output limits,
// plus the style filter that enforces them on drafted text.

pub mod gating;
pub mod style_rules;
pub mod types;

pub use gating::{evaluate_identity_constraints, resolve_identity_traits};
pub use style_rules::{StyleOptions, apply_style_rules};
pub use types::{
    IdentityConstraints, IdentityDecision, IdentityInput, IdentityTrait, OutputLimits,
};
