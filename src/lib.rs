#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod core;
pub mod error;
#[doc(hidden)]
pub mod observability;

pub use config::ModulationConfig;
pub use core::identity::{StyleOptions, apply_style_rules};
pub use core::pipeline::{TurnOutcome, TurnSnapshot, merge_dispositions, run_turn};
pub use error::{ConfigError, SnapshotError};
