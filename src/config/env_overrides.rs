use super::schema::ModulationConfig;

/// Environment variable naming an alternate config file.
pub const CONFIG_PATH_ENV: &str = "SCING_CONFIG";
const LOG_LEVEL_ENV: &str = "SCING_LOG";
const OBSERVER_ENV: &str = "SCING_OBSERVER";

impl ModulationConfig {
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup; empty values are ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup(LOG_LEVEL_ENV)
            && !level.trim().is_empty()
        {
            self.observability.log_level = level.trim().to_ascii_lowercase();
        }

        if let Some(backend) = lookup(OBSERVER_ENV)
            && !backend.trim().is_empty()
        {
            self.observability.backend = backend.trim().to_ascii_lowercase();
        }
    }
}
