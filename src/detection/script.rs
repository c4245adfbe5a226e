//! Secondary detection strategy: discovery script execution.
//!
//! Runs the recipe's `preInstall.requireAtDiscovery` body through a
//! [`ScriptRunner`] and classifies the host from the exit code. Scripts
//! follow the upstream catalog convention: exit 0 means installable,
//! 131 means the technology was detected but the recipe does not apply,
//! 132 means the host is unsupported, anything else means unavailable.
//!
//! A script that cannot be launched is an unavailable recipe, not a
//! fatal error; one broken recipe must never abort the whole run.

use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;
use tracing::warn;

use crate::context::RunContext;
use crate::detection::status::DetectionStatus;
use crate::detection::DetectionStatusProvider;
use crate::error::{OutfitterError, Result};
use crate::recipe::Recipe;

/// Discovery script exit code for "technology present, recipe not applicable".
const DETECTED_EXIT: i32 = 131;
/// Discovery script exit code for "host explicitly unsupported".
const UNSUPPORTED_EXIT: i32 = 132;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Executes a discovery script body and yields its exit code.
pub trait ScriptRunner {
    /// Run the script to completion. Returns the exit code, or `None`
    /// if the script was killed by a signal or by the timeout.
    fn run(&self, ctx: &RunContext, script: &str) -> Result<Option<i32>>;
}

/// Default runner: writes the script to a scratch file and executes it
/// through the platform shell.
///
/// The scratch file is removed and the child handle reaped on every
/// exit path, including timeout and cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellScriptRunner;

impl ScriptRunner for ShellScriptRunner {
    fn run(&self, ctx: &RunContext, script: &str) -> Result<Option<i32>> {
        ctx.check_cancelled()?;

        let mut file = NamedTempFile::new()?;
        file.write_all(script.as_bytes())?;
        file.flush()?;

        let mut child = shell_command(file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status.code()),
                Ok(None) => {}
                Err(e) => {
                    reap(&mut child);
                    return Err(e.into());
                }
            }

            if ctx.is_cancelled() {
                reap(&mut child);
                return Err(OutfitterError::Cancelled);
            }

            if started.elapsed() >= ctx.script_timeout() {
                warn!(
                    "discovery script exceeded {:?} timeout, killing",
                    ctx.script_timeout()
                );
                reap(&mut child);
                return Ok(None);
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn shell_command(script_path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(script_path);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg(script_path);
        cmd
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Secondary detection strategy: run the recipe's discovery script.
#[derive(Debug, Clone, Default)]
pub struct ScriptEvaluator<R = ShellScriptRunner> {
    runner: R,
}

impl ScriptEvaluator<ShellScriptRunner> {
    pub fn new() -> Self {
        Self {
            runner: ShellScriptRunner,
        }
    }
}

impl<R: ScriptRunner> ScriptEvaluator<R> {
    /// Use a custom script runner (tests, sandboxed execution).
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: ScriptRunner> DetectionStatusProvider for ScriptEvaluator<R> {
    fn detection_status(&self, ctx: &RunContext, recipe: &Recipe) -> Result<DetectionStatus> {
        // No script declared: nothing to refute the primary result.
        let Some(script) = recipe.discovery_script() else {
            return Ok(DetectionStatus::Available);
        };

        match self.runner.run(ctx, script) {
            Ok(Some(0)) => Ok(DetectionStatus::Available),
            Ok(Some(DETECTED_EXIT)) => Ok(DetectionStatus::Detected),
            Ok(Some(UNSUPPORTED_EXIT)) => Ok(DetectionStatus::Unsupported),
            Ok(_) => Ok(DetectionStatus::Unavailable),
            Err(OutfitterError::Cancelled) => Err(OutfitterError::Cancelled),
            Err(e) => {
                warn!(
                    "discovery script for '{}' could not run: {e}",
                    recipe.name
                );
                Ok(DetectionStatus::Unavailable)
            }
        }
    }
}
