use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::{Path, PathBuf};

use super::schema::ModulationConfig;

const CONFIG_DIR: &str = ".scing";
const CONFIG_FILE: &str = "config.toml";

impl ModulationConfig {
    /// Default location: `~/.scing/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location, writing a default file on first run.
    pub fn load_or_init() -> Result<Self> {
        let config_path = Self::default_path()?;
        if let Some(dir) = config_path.parent()
            && !dir.exists()
        {
            fs::create_dir_all(dir).context("Failed to create .scing directory")?;
        }

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self {
                config_path: config_path.clone(),
                ..Self::default()
            };
            config.save()?;
            Ok(config)
        }
    }

    /// Load from an explicit path. `~` is expanded; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        let config_path = PathBuf::from(expanded);

        let mut config = if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            toml::from_str::<Self>(&contents).context("Failed to parse config file")?
        } else {
            tracing::debug!(path = %config_path.display(), "config file missing, using defaults");
            Self::default()
        };
        config.config_path = config_path;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    /// Render the effective config as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
