// Behavioral modulation stages. Each stage is a pure function of its inputs;
// `pipeline::run_turn` threads one turn through all of them.

pub mod attractors;
pub mod cognition;
pub mod constraints;
pub mod context;
pub mod expression;
pub mod gradients;
pub mod identity;
pub mod numeric;
pub mod order_focus;
pub mod pipeline;
pub mod policy;
pub mod posture;

pub use constraints::{ConstraintSet, Disposition, MaxLength};
pub use context::{Level, SensorReadings, TurnContext, UserIntent};
pub use pipeline::{TurnOutcome, TurnSnapshot, merge_dispositions, run_turn};
