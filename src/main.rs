//! Tap Replay entry point
//!
//! Command-line front end for the replay verifier: verify submissions,
//! inspect runs, and generate autopilot traces.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tap_replay::sim::{Autopilot, replay};
use tap_replay::{Limits, Rules, Submission, judge};

#[derive(Parser)]
#[command(name = "tap-replay", about = "Replay verifier for tap-timing score submissions")]
struct Cli {
    /// Rule set JSON (partial documents override the reference rules)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a submission JSON file ("-" reads stdin) and print the verdict
    Verify {
        submission: PathBuf,
    },

    /// Replay a trace and print the full run report
    Report {
        #[arg(long)]
        seed: String,

        /// Comma-separated tap timestamps in ms
        #[arg(long, value_delimiter = ',')]
        taps: Vec<f64>,
    },

    /// Play a seed with the autopilot and print the resulting submission
    Autoplay {
        #[arg(long)]
        seed: String,

        #[arg(long, default_value_t = 30_000.0)]
        duration_ms: f64,

        /// Max reaction delay per tap, in steps
        #[arg(long, default_value_t = 0)]
        jitter: u32,

        #[arg(long, default_value_t = 0)]
        jitter_seed: u64,
    },

    /// Print the active rule set
    Rules,
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn load_rules(path: Option<&Path>) -> Result<Rules> {
    let Some(path) = path else {
        return Ok(Rules::default());
    };
    let json = read_input(path)?;
    let rules = Rules::from_json(&json)
        .with_context(|| format!("invalid rule set in {}", path.display()))?;
    log::info!("Loaded rule set from {}", path.display());
    Ok(rules)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let rules = load_rules(cli.rules.as_deref())?;

    match cli.command {
        Commands::Verify { submission } => {
            let json = read_input(&submission)?;
            let submission = Submission::from_json(&json)
                .with_context(|| format!("invalid submission in {}", submission.display()))?;
            let verdict = judge(&rules, &Limits::default(), &submission)?;
            print_json(&verdict)
        }

        Commands::Report { seed, taps } => print_json(&replay(&rules, &seed, &taps)),

        Commands::Autoplay {
            seed,
            duration_ms,
            jitter,
            jitter_seed,
        } => {
            let run = Autopilot::new(&rules)
                .with_jitter(jitter, jitter_seed)
                .run(&seed, duration_ms);
            if let Some(outcome) = run.outcome {
                log::warn!(
                    "Autopilot died on seed {:?} at {} ms: {:?} (score {})",
                    seed,
                    run.ended_at_ms,
                    outcome,
                    run.score
                );
            }
            let report = replay(&rules, &seed, &run.taps);
            log::info!(
                "Autopilot: seed={:?} taps={} outcome={:?} score={}",
                seed,
                run.taps.len(),
                report.outcome,
                report.score
            );
            print_json(&serde_json::json!({
                "seed": seed,
                "taps": run.taps,
                "claimed_score": report.score,
            }))
        }

        Commands::Rules => print_json(&rules),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
