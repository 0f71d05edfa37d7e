#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names
)]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod app;
mod cli;

use cli::commands::Cli;
use scing::ModulationConfig;
use scing::config::CONFIG_PATH_ENV;

fn load_config(explicit: Option<PathBuf>) -> Result<ModulationConfig> {
    let path = explicit.or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
    let mut config = match path {
        Some(path) => ModulationConfig::load_from(&path)?,
        None => ModulationConfig::load_or_init()?,
    };
    config.apply_env_overrides();
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.clone())?;

    // Initialize logging; stdout is reserved for command output
    let level = config
        .observability
        .log_level
        .parse::<Level>()
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    app::dispatch::dispatch(cli, config)
}
