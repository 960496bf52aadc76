//! Sweep orchestration: enumerate the weight grid, score every
//! configuration by repeated external trials, and rank the results.

use crate::grid::{WeightGrid, Weights};
use crate::runner::{run_trial, TrialOutcome};
use anyhow::{anyhow, Result};
use log::warn;
use std::fmt::Write as _;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct SweepConfig {
    pub grid: WeightGrid,
    pub command: Vec<String>,
    pub runs_per_config: usize,
    pub trial_timeout: Duration,
    pub progress_every: usize,
}

/// One fully scored configuration: the raw outcome sequence in trial order
/// plus its arithmetic mean. Never mutated after creation.
#[derive(Clone, Debug)]
pub struct ConfigResult {
    pub weights: Weights,
    pub outcomes: Vec<i32>,
    pub mean: f64,
}

/// All configuration results, stably sorted by mean outcome descending
/// (ties keep visitation order).
#[derive(Clone, Debug)]
pub struct SweepReport {
    pub results: Vec<ConfigResult>,
    pub total_configs: usize,
    pub runs_per_config: usize,
}

impl SweepReport {
    pub fn best(&self) -> &ConfigResult {
        // Grids are non-empty by construction, so the sorted set never is.
        &self.results[0]
    }
}

/// Score one configuration: `runs` sequential trials, each failure or
/// timeout recorded as a zero outcome rather than aborting the sweep.
pub fn score_weights(
    weights: &Weights,
    command: &[String],
    runs: usize,
    timeout: Duration,
) -> ConfigResult {
    let mut outcomes = Vec::with_capacity(runs);
    for _ in 0..runs {
        let outcome = match run_trial(command, weights, timeout) {
            Ok(TrialOutcome::Exited(code)) => code,
            Ok(TrialOutcome::TimedOut) => {
                warn!(
                    "trial timed out after {:.1}s for weights={}",
                    timeout.as_secs_f64(),
                    weights.describe()
                );
                0
            }
            Err(err) => {
                warn!("trial failed for weights={}: {err:#}", weights.describe());
                0
            }
        };
        outcomes.push(outcome);
    }

    let sum: i64 = outcomes.iter().map(|&code| i64::from(code)).sum();
    let mean = sum as f64 / outcomes.len() as f64;
    ConfigResult {
        weights: *weights,
        outcomes,
        mean,
    }
}

/// Run the full sweep: every grid configuration exactly once, in enumeration
/// order, one child process at a time. Emits a progress line after every
/// `progress_every` configurations.
pub fn run_sweep(config: &SweepConfig) -> Result<SweepReport> {
    if config.command.is_empty() {
        return Err(anyhow!("sweep requires an external command"));
    }
    if config.runs_per_config == 0 {
        return Err(anyhow!("sweep requires at least one run per configuration"));
    }
    if config.trial_timeout.is_zero() {
        return Err(anyhow!("trial timeout must be nonzero"));
    }

    let total = config.grid.len();
    let mut results: Vec<ConfigResult> = Vec::with_capacity(total);
    // Running best threaded through the fold; strict `>` keeps the
    // first-seen configuration on ties.
    let mut best: Option<(usize, f64)> = None;

    for weights in &config.grid {
        let result = score_weights(
            &weights,
            &config.command,
            config.runs_per_config,
            config.trial_timeout,
        );
        if best.map_or(true, |(_, mean)| result.mean > mean) {
            best = Some((results.len(), result.mean));
        }
        results.push(result);

        let visited = results.len();
        if config.progress_every > 0 && visited % config.progress_every == 0 {
            if let Some((idx, mean)) = best {
                println!(
                    "progress={visited}/{total} best={} best_mean={mean:.2}",
                    results[idx].weights.describe()
                );
            }
        }
    }

    results.sort_by(|a, b| b.mean.total_cmp(&a.mean));

    Ok(SweepReport {
        results,
        total_configs: total,
        runs_per_config: config.runs_per_config,
    })
}

const BANNER: &str = "====================================================================";

/// Top-N block listing each configuration's mean and every weight value.
pub fn render_leaderboard(report: &SweepReport, top: usize) -> String {
    let mut out = String::new();
    let shown = top.min(report.results.len());
    let _ = writeln!(out, "{BANNER}");
    let _ = writeln!(out, "TOP {shown} RESULTS:");
    let _ = writeln!(out, "{BANNER}");
    for (rank, result) in report.results.iter().take(shown).enumerate() {
        let _ = writeln!(out, "{}. avg_score={:.2}", rank + 1, result.mean);
        for (name, value) in result.weights.env_overlay() {
            let _ = writeln!(out, "   {name}={value}");
        }
    }
    out
}

/// The best configuration as environment assignments ready to paste into a
/// shell.
pub fn render_export_block(weights: &Weights) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{BANNER}");
    let _ = writeln!(out, "BEST CONFIGURATION:");
    let _ = writeln!(out, "{BANNER}");
    for (name, value) in weights.env_overlay() {
        let _ = writeln!(out, "export {name}={value}");
    }
    out
}
