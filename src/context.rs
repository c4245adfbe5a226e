//! Per-run execution context.
//!
//! A [`RunContext`] travels through the whole detection traversal so a
//! caller can abort an in-flight run: the detector checks it between
//! nodes, the process evaluator checks it before scanning, and the
//! script runner polls it while a discovery script is executing.
//!
//! Cloning a context yields a handle to the same cancellation flag, so
//! one clone can be handed to a signal handler while the original
//! drives the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{OutfitterError, Result};

/// Default wall-clock budget for a single discovery script.
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Cancellation flag and timeout budget for one detection run.
#[derive(Debug, Clone)]
pub struct RunContext {
    cancelled: Arc<AtomicBool>,
    script_timeout: Duration,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(DEFAULT_SCRIPT_TIMEOUT)
    }
}

impl RunContext {
    /// Create a context with the given per-script timeout.
    pub fn new(script_timeout: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            script_timeout,
        }
    }

    /// Request cancellation of the run this context belongs to.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Error out if cancellation has been requested.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(OutfitterError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Wall-clock budget for a single discovery script.
    pub fn script_timeout(&self) -> Duration {
        self.script_timeout
    }
}
