//! Recipe detection: statuses, strategies, and the detector.
//!
//! Two strategies share one capability. The primary
//! [`ProcessEvaluator`] scans the live process list; the secondary
//! [`ScriptEvaluator`] runs the recipe's discovery script. The
//! [`RecipeDetector`] walks a recipe dependency graph post-order,
//! applies the two-stage protocol per node, and memoizes evaluation by
//! recipe name so shared dependencies are probed once per run.

pub mod detector;
pub mod process;
pub mod script;
pub mod status;

pub use detector::{DetectionFailure, DetectionSummary, RecipeDetector};
pub use process::{ProcessEvaluator, ProcessInfo, ProcessSnapshot, HostProcessSnapshot};
pub use script::{ScriptEvaluator, ScriptRunner, ShellScriptRunner};
pub use status::DetectionStatus;

use crate::context::RunContext;
use crate::error::Result;
use crate::recipe::Recipe;

/// Capability shared by the detection strategies: classify one recipe.
///
/// Implementations are stateless with respect to recipe data; they only
/// read. An expected-negative outcome is a status value, not an error;
/// `Err` is reserved for genuine execution failures (unreadable process
/// list, cancellation).
pub trait DetectionStatusProvider {
    fn detection_status(&self, ctx: &RunContext, recipe: &Recipe) -> Result<DetectionStatus>;
}
