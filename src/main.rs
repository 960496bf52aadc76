use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::time::Duration;
use weightlab::grid::{WeightGrid, Weights};
use weightlab::sweep::{
    render_export_block, render_leaderboard, run_sweep, score_weights, SweepConfig,
};
use weightlab::util::{format_weight, parse_weight_csv, spaced_values, stepped_values};

#[derive(Parser, Debug)]
#[command(name = "weightlab")]
#[command(
    about = "Brute-force weight grid sweep for an external game command scored by exit status"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Enumerate the full weight grid and rank configurations by mean outcome
    Sweep {
        /// Lowest candidate value on every axis
        #[arg(long, default_value_t = 0.1)]
        min: f64,
        /// Highest candidate value on every axis
        #[arg(long, default_value_t = 2.0)]
        max: f64,
        /// Number of evenly spaced candidate values between min and max
        #[arg(long, default_value_t = 20)]
        values: usize,
        /// Candidate spacing by fixed step instead of evenly spaced count
        #[arg(long)]
        step: Option<f64>,
        /// Explicit candidate list, comma separated (overrides range flags)
        #[arg(long)]
        candidates: Option<String>,
        /// Trials per configuration
        #[arg(long, default_value_t = 100)]
        runs: usize,
        /// Wall-clock limit per trial, seconds
        #[arg(long, default_value_t = 10.0)]
        timeout_secs: f64,
        /// Configurations between progress lines
        #[arg(long, default_value_t = 1000)]
        progress_every: usize,
        /// Leaderboard size
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// External game command invoked once per trial
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
    /// Run repeated trials for a single explicit configuration
    Trial {
        /// Five weight values, comma separated
        #[arg(long)]
        weights: String,
        #[arg(long, default_value_t = 1)]
        runs: usize,
        #[arg(long, default_value_t = 10.0)]
        timeout_secs: f64,
        /// External game command invoked once per trial
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
    /// Print the grid a sweep would enumerate, without running anything
    Grid {
        #[arg(long, default_value_t = 0.1)]
        min: f64,
        #[arg(long, default_value_t = 2.0)]
        max: f64,
        #[arg(long, default_value_t = 20)]
        values: usize,
        #[arg(long)]
        step: Option<f64>,
        #[arg(long)]
        candidates: Option<String>,
        /// Number of leading configurations to preview
        #[arg(long, default_value_t = 5)]
        preview: usize,
    },
}

fn main() -> Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    match Cli::parse().command {
        Commands::Sweep {
            min,
            max,
            values,
            step,
            candidates,
            runs,
            timeout_secs,
            progress_every,
            top,
            command,
        } => {
            let grid = WeightGrid::uniform(resolve_candidates(
                candidates.as_deref(),
                step,
                min,
                max,
                values,
            )?)?;
            let config = SweepConfig {
                grid,
                command,
                runs_per_config: runs,
                trial_timeout: trial_timeout(timeout_secs)?,
                progress_every,
            };

            println!("configs={}", config.grid.len());
            println!("runs_per_config={}", config.runs_per_config);
            println!("total_trials={}", config.grid.len() * config.runs_per_config);
            println!("timeout_secs={timeout_secs}");
            println!("command={}", config.command.join(" "));

            let report = run_sweep(&config)?;
            print!("{}", render_leaderboard(&report, top));
            print!("{}", render_export_block(&report.best().weights));
        }
        Commands::Trial {
            weights,
            runs,
            timeout_secs,
            command,
        } => {
            if runs == 0 {
                return Err(anyhow!("trial requires at least one run"));
            }
            let weights = parse_trial_weights(&weights)?;
            let result = score_weights(&weights, &command, runs, trial_timeout(timeout_secs)?);

            println!("weights={}", result.weights.describe());
            println!("runs={}", result.outcomes.len());
            println!(
                "outcomes={}",
                result
                    .outcomes
                    .iter()
                    .map(|code| code.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            );
            println!("mean={:.2}", result.mean);
        }
        Commands::Grid {
            min,
            max,
            values,
            step,
            candidates,
            preview,
        } => {
            let candidate_values =
                resolve_candidates(candidates.as_deref(), step, min, max, values)?;
            let grid = WeightGrid::uniform(candidate_values)?;

            println!(
                "candidates={}",
                grid.axis(0)
                    .iter()
                    .map(|value| format_weight(*value))
                    .collect::<Vec<_>>()
                    .join(",")
            );
            println!("axis_size={}", grid.axis(0).len());
            println!("configs={}", grid.len());
            if preview > 0 {
                println!("preview:");
                for (idx, weights) in grid.iter().take(preview).enumerate() {
                    println!("  {}. {}", idx + 1, weights.describe());
                }
            }
        }
    }

    Ok(())
}

fn resolve_candidates(
    candidates: Option<&str>,
    step: Option<f64>,
    min: f64,
    max: f64,
    values: usize,
) -> Result<Vec<f64>> {
    if let Some(csv) = candidates {
        return parse_weight_csv(csv);
    }
    if let Some(step) = step {
        return stepped_values(min, max, step);
    }
    spaced_values(min, max, values)
}

fn parse_trial_weights(input: &str) -> Result<Weights> {
    let values = parse_weight_csv(input)?;
    let values: [f64; 5] = values
        .try_into()
        .map_err(|values: Vec<f64>| anyhow!("expected 5 weight values, got {}", values.len()))?;
    Ok(Weights(values))
}

fn trial_timeout(timeout_secs: f64) -> Result<Duration> {
    if !(timeout_secs > 0.0) || !timeout_secs.is_finite() {
        return Err(anyhow!("--timeout-secs must be > 0, got {timeout_secs}"));
    }
    Ok(Duration::from_secs_f64(timeout_secs))
}
