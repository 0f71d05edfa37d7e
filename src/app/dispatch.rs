use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::cli::commands::{Cli, Commands};
use scing::ModulationConfig;
use scing::core::identity::{IdentityDecision, StyleOptions, apply_style_rules};
use scing::core::pipeline::{TurnSnapshot, run_turn};
use scing::observability::{ObserverEvent, ObserverMetric, create_observer, record_turn};

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn wall_clock_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

fn run_snapshot(
    config: &ModulationConfig,
    path: &Path,
    now: Option<u64>,
    pretty: bool,
    expression_only: bool,
) -> Result<()> {
    let observer = create_observer(&config.observability);
    let raw = read_input(path)?;
    let mut snapshot = match TurnSnapshot::from_json(&raw) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            observer.record_event(&ObserverEvent::Error {
                component: "snapshot".into(),
                message: err.to_string(),
            });
            observer.flush();
            return Err(err).context("Invalid turn snapshot");
        }
    };
    if snapshot.now_ms.is_none() {
        snapshot.now_ms = Some(now.unwrap_or_else(wall_clock_ms));
    }

    let started = Instant::now();
    let outcome = run_turn(&snapshot, config);
    observer.record_metric(&ObserverMetric::TurnLatency(started.elapsed()));

    let ts = snapshot.reference_time();
    record_turn(observer.as_ref(), &outcome, ts);
    observer.flush();
    info!(
        posture = %outcome.posture.id,
        disposition = %outcome.decision.disposition,
        "turn complete"
    );

    let rendered = if expression_only {
        let event = outcome.expression.into_event(ts);
        to_json(&event, pretty)?
    } else {
        to_json(&outcome, pretty)?
    };
    println!("{rendered}");
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    out.context("Failed to serialize output")
}

fn style_draft(draft: &Path, decision: &Path, allow_sorry: bool) -> Result<()> {
    let text = read_input(draft)?;
    let decision: IdentityDecision = serde_json::from_str(&read_input(decision)?)
        .context("Failed to parse identity decision")?;
    let styled = apply_style_rules(&text, &decision, StyleOptions { allow_sorry });
    println!("{styled}");
    Ok(())
}

pub fn dispatch(cli: Cli, config: ModulationConfig) -> Result<()> {
    match cli.command {
        Commands::Run {
            snapshot,
            now,
            pretty,
            expression_only,
        } => run_snapshot(&config, &snapshot, now, pretty, expression_only),
        Commands::Style {
            draft,
            decision,
            allow_sorry,
        } => style_draft(&draft, &decision, allow_sorry),
        Commands::Config => {
            println!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
