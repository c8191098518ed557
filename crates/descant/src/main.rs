//! Descant binary: compose a first-species counterpoint for a cantus
//! firmus by looping an LLM melody oracle against the rule checker.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use counterpoint::{Checker, Voice};
use descant::config::DescantConfig;
use descant::provider::OpenAiOracle;
use descant::refine::{RefineOutcome, Refiner};
use descant::render::{ScoreRenderer, TextScore};

/// First-species counterpoint against an LLM melody oracle
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Cantus firmus as comma-separated MIDI note numbers
    #[arg(long, default_value = "60,62,65,64,65,67,69,67,64,62,60")]
    cantus: String,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured model
    #[arg(long)]
    model: Option<String>,

    /// Override the configured API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override the attempt budget
    #[arg(long)]
    attempts: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DescantConfig::load(path)?,
        None => DescantConfig::default(),
    };
    config.apply_env();

    if let Some(model) = args.model {
        config.oracle.model = model;
    }
    if let Some(base_url) = args.base_url {
        config.oracle.base_url = base_url;
    }
    if let Some(attempts) = args.attempts {
        config.refine.max_attempts = attempts;
    }

    let cantus = parse_cantus(&args.cantus)?;

    info!(
        model = %config.oracle.model,
        attempts = config.refine.max_attempts,
        measures = cantus.len(),
        "descant starting"
    );

    let oracle = OpenAiOracle::new(config.oracle.clone())?;
    let refiner = Refiner::new(oracle, Checker::new(config.checks), config.refine);

    let outcome = refiner.run(&cantus).await;
    let renderer = TextScore;

    match &outcome {
        RefineOutcome::Accepted {
            composition,
            attempts,
        } => {
            info!(attempts = *attempts, "no counterpoint issues found");
            println!("{}", renderer.render(composition, &outcome.status_label()));
            Ok(ExitCode::SUCCESS)
        }
        RefineOutcome::Exhausted {
            composition,
            report,
            attempts,
        } => {
            info!(
                attempts = *attempts,
                "returning best effort with outstanding violations"
            );
            println!("{}", renderer.render(composition, &outcome.status_label()));
            println!("\noutstanding violations:\n{}", report.feedback());
            Ok(ExitCode::from(2))
        }
        RefineOutcome::OracleFailed { error, attempts } => {
            eprintln!("oracle failed after {attempts} attempts: {error}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn parse_cantus(input: &str) -> Result<Voice> {
    let notes = input
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<i32>()
                .with_context(|| format!("invalid MIDI note '{}'", part.trim()))
        })
        .collect::<Result<Vec<i32>>>()?;
    Ok(Voice::from_midi(&notes))
}
