use crate::grid::Weights;
use anyhow::{anyhow, Context, Result};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Termination of one external invocation. The exit status is the trial's
/// numeric outcome; higher is treated as better, no conventional 0=success
/// semantics are assumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialOutcome {
    Exited(i32),
    TimedOut,
}

/// Run the external command once with the configuration's weight variables
/// overlaid on the inherited environment. Stdout and stderr are discarded;
/// the process is killed once `timeout` elapses.
pub fn run_trial(command: &[String], weights: &Weights, timeout: Duration) -> Result<TrialOutcome> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| anyhow!("trial command is empty"))?;

    let mut child = Command::new(program)
        .args(args)
        .envs(weights.env_overlay())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))?;

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child
            .try_wait()
            .with_context(|| format!("failed waiting on {program}"))?
        {
            return match status.code() {
                Some(code) => Ok(TrialOutcome::Exited(code)),
                None => Err(anyhow!("{program} was terminated by a signal")),
            };
        }
        if Instant::now() >= deadline {
            // kill can race a natural exit; reap either way so no zombie
            // outlives the trial.
            let _ = child.kill();
            let _ = child.wait();
            return Ok(TrialOutcome::TimedOut);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
