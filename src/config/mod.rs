pub mod env_overrides;
pub mod loader;
pub mod schema;

pub use env_overrides::CONFIG_PATH_ENV;
pub use schema::{
    CollapseConfig, GradientsConfig, IdentityGateConfig, ModulationConfig, ObservabilityConfig,
    OrderFocusConfig, PostureConfig,
};
