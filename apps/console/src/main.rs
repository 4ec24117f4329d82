mod config;
mod script;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use planner_core::{
    evaluate, PasswordPolicy, PlanHistory, PublicationGate, SimulatedBackend, SystemClock,
};
use shared::{error::ApiError, protocol::ValidationReport};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::load_settings;

#[derive(Parser, Debug)]
#[command(about = "Drive the schedule planning workflows from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON wizard scenario against the simulated backend.
    Wizard {
        #[arg(long)]
        script: PathBuf,
    },
    /// Evaluate a validation report and publish one version per note.
    Publish {
        #[arg(long)]
        report: PathBuf,
        #[arg(long = "notes", required = true)]
        notes: Vec<String>,
        #[arg(long)]
        revert_to: Option<u32>,
    },
    /// Check a password change against the configured policy.
    Password {
        #[arg(long, default_value = "")]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();
    let settings = load_settings();
    info!(?settings, "console starting");
    let backend = SimulatedBackend::new(Duration::from_millis(settings.submit_delay_ms));

    match cli.command {
        Command::Wizard {
            script: scenario_path,
        } => {
            let raw = fs::read_to_string(&scenario_path)
                .with_context(|| format!("reading scenario {}", scenario_path.display()))?;
            let scenario = script::parse_script(&raw)
                .with_context(|| format!("parsing scenario {}", scenario_path.display()))?;
            let (wizard, reports) =
                script::run_script(&scenario, settings.gating, &backend).await;

            for (index, report) in reports.iter().enumerate() {
                match &report.outcome {
                    Ok(detail) => println!(
                        "{:>2}. {:<12} ok       [{}] {detail}",
                        index + 1,
                        report.action,
                        report.step_after
                    ),
                    Err(err) => println!(
                        "{:>2}. {:<12} rejected [{}] {}",
                        index + 1,
                        report.action,
                        report.step_after,
                        serde_json::to_string(err)?
                    ),
                }
            }
            if let Some(request) = wizard.last_submitted() {
                println!("submitted: {}", serde_json::to_string_pretty(request)?);
            }
        }
        Command::Publish {
            report: report_path,
            notes,
            revert_to,
        } => {
            let raw = fs::read_to_string(&report_path)
                .with_context(|| format!("reading report {}", report_path.display()))?;
            let report: ValidationReport = serde_json::from_str(&raw)
                .with_context(|| format!("parsing report {}", report_path.display()))?;
            println!("evaluation: {}", serde_json::to_string(&evaluate(&report))?);
            for item in report.blocking_items() {
                println!("  blocking: {} {:?}", item.title, item.details);
            }

            let mut history = PlanHistory::new();
            for note in &notes {
                let mut gate = PublicationGate::new();
                match gate.publish(&report, note, &backend, &SystemClock).await {
                    Ok((record, ack)) => {
                        let version =
                            history.record_publication(&record, settings.author.as_str());
                        println!("published v{} as {}", version.number, ack.reference);
                    }
                    Err(err) => {
                        let err = ApiError::from(&err);
                        println!("not published: {}", serde_json::to_string(&err)?);
                    }
                }
            }
            if let Some(number) = revert_to {
                match history.revert_to(number, settings.author.as_str(), chrono::Utc::now()) {
                    Ok(version) => println!("reverted to v{number}, now v{}", version.number),
                    Err(err) => {
                        let err = ApiError::from(&err);
                        println!("revert refused: {}", serde_json::to_string(&err)?);
                    }
                }
            }
            for version in history.versions() {
                println!("{}", serde_json::to_string(version)?);
            }
        }
        Command::Password {
            current,
            new,
            confirm,
        } => {
            let policy = PasswordPolicy {
                min_length: settings.password_min_length,
                ..PasswordPolicy::default()
            };
            for rule in policy.unmet_rules(&new) {
                println!("  missing: {}", rule.describe());
            }
            println!("strength: {:?}", policy.strength(&new));
            match policy.validate_change(&current, &new, &confirm) {
                Ok(()) => println!("password change accepted"),
                Err(err) => println!("password change refused: {err}"),
            }
        }
    }

    Ok(())
}
