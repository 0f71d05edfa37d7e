use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `scing` - deterministic behavioral modulation for conversational turns.
#[derive(Parser, Debug)]
#[command(name = "scing")]
#[command(version = "0.1.0")]
#[command(about = "Modulate one conversational turn into a response plan and telemetry.", long_about = None)]
pub struct Cli {
    /// Config file (defaults to $SCING_CONFIG, then ~/.scing/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a turn snapshot through the pipeline and print the outcome as JSON
    Run {
        /// Snapshot JSON file ("-" reads stdin)
        snapshot: PathBuf,

        /// Reference time in epoch ms when the snapshot carries none
        #[arg(long)]
        now: Option<u64>,

        /// Pretty-print the outcome
        #[arg(long)]
        pretty: bool,

        /// Only print the published expression event
        #[arg(long)]
        expression_only: bool,
    },

    /// Apply the identity style filter to a drafted reply
    Style {
        /// Draft text file ("-" reads stdin)
        draft: PathBuf,

        /// Identity decision JSON file, e.g. the `decision` field of a `run` outcome
        #[arg(long)]
        decision: PathBuf,

        /// Keep apologies in the draft
        #[arg(long)]
        allow_sorry: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_now_and_global_config() {
        let cli = Cli::try_parse_from([
            "scing", "run", "turn.json", "--now", "1700", "--config", "alt.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        match cli.command {
            Commands::Run { snapshot, now, pretty, .. } => {
                assert_eq!(snapshot, PathBuf::from("turn.json"));
                assert_eq!(now, Some(1700));
                assert!(!pretty);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn style_requires_decision() {
        assert!(Cli::try_parse_from(["scing", "style", "draft.txt"]).is_err());
    }
}
