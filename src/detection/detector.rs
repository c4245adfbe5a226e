//! Recipe detection orchestration.
//!
//! The detector walks a recipe graph post-order, applies the two-stage
//! strategy protocol per node, and memoizes evaluation by recipe name.
//! One detector instance holds the memo for exactly one run; build a
//! fresh detector (and `reset_detection` a reused graph) to run again.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::bundle::{NodeId, RecipeGraph};
use crate::context::RunContext;
use crate::detection::process::ProcessEvaluator;
use crate::detection::script::ScriptEvaluator;
use crate::detection::status::DetectionStatus;
use crate::detection::DetectionStatusProvider;
use crate::error::{OutfitterError, Result};
use crate::recipe::Recipe;

/// A strategy failure recorded for one recipe during a run.
///
/// The recipe stays memo-marked so an unrecoverable host condition is
/// not retried through every dependent; its node keeps no status.
#[derive(Debug)]
pub struct DetectionFailure {
    pub recipe: String,
    pub error: OutfitterError,
}

/// Counts and failures accumulated over one whole-graph run.
#[derive(Debug, Default)]
pub struct DetectionSummary {
    /// Distinct recipes evaluated (strategy passes performed).
    pub evaluated: usize,
    pub available: usize,
    pub detected: usize,
    pub unsupported: usize,
    pub unavailable: usize,
    pub failures: Vec<DetectionFailure>,
}

/// Walks bundle recipe graphs and annotates each node with a status.
pub struct RecipeDetector<P = ProcessEvaluator, S = ScriptEvaluator> {
    process_evaluator: P,
    script_evaluator: S,
    // Same recipe (by name) is evaluated at most once per run.
    evaluated: HashSet<String>,
    failures: Vec<DetectionFailure>,
}

impl RecipeDetector {
    pub fn new() -> Self {
        Self::with_evaluators(ProcessEvaluator::new(), ScriptEvaluator::new())
    }
}

impl Default for RecipeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, S> RecipeDetector<P, S>
where
    P: DetectionStatusProvider,
    S: DetectionStatusProvider,
{
    /// Build a detector over custom strategies. The strategy set is
    /// closed: a primary (process) and a secondary (script) evaluator.
    pub fn with_evaluators(process_evaluator: P, script_evaluator: S) -> Self {
        Self {
            process_evaluator,
            script_evaluator,
            evaluated: HashSet::new(),
            failures: Vec::new(),
        }
    }

    /// Detect a bundle recipe and everything it depends on.
    ///
    /// Dependencies are fully evaluated before the dependent, in
    /// declaration order. A re-entry for an already-evaluated recipe
    /// name is an idempotent no-op, which both bounds strategy
    /// invocations by the number of distinct recipes and terminates
    /// traversal over cyclic graphs.
    ///
    /// A dependency's strategy failure is recorded (see
    /// [`failures`](Self::failures)) and does not stop its siblings or
    /// the dependent; a failure for `node` itself is returned.
    /// Cancellation aborts the whole walk.
    pub fn detect_bundle_recipe(
        &mut self,
        ctx: &RunContext,
        graph: &mut RecipeGraph,
        node: NodeId,
    ) -> Result<()> {
        ctx.check_cancelled()?;

        let name = graph.node(node).recipe.name.clone();
        if self.evaluated.contains(&name) {
            return Ok(());
        }
        // Marked before recursing: a node reachable from itself sees
        // the mark and stops.
        self.evaluated.insert(name);

        let dependencies = graph.node(node).dependencies.clone();
        for dep in dependencies {
            if let Err(err) = self.detect_bundle_recipe(ctx, graph, dep) {
                if matches!(err, OutfitterError::Cancelled) {
                    return Err(err);
                }
                let dep_name = graph.node(dep).recipe.name.clone();
                warn!("detection failed for dependency '{dep_name}': {err}");
                self.failures.push(DetectionFailure {
                    recipe: dep_name,
                    error: err,
                });
            }
        }

        ctx.check_cancelled()?;
        let recipe = graph.node(node).recipe.clone();
        let status = self.detect_recipe(ctx, &recipe)?;
        debug!("recipe '{}' detected as {status}", recipe.name);
        graph.node_mut(node).add_detection_status(status);
        Ok(())
    }

    /// Two-stage protocol for a single recipe.
    ///
    /// The primary result is provisional only when it is the available
    /// status AND a discovery script is declared; any other primary
    /// result is final and the secondary strategy never runs.
    fn detect_recipe(&self, ctx: &RunContext, recipe: &Recipe) -> Result<DetectionStatus> {
        let status = self
            .process_evaluator
            .detection_status(ctx, recipe)
            .map_err(|e| strategy_failure(recipe, e))?;

        if status.is_available() && recipe.discovery_script().is_some() {
            return self
                .script_evaluator
                .detection_status(ctx, recipe)
                .map_err(|e| strategy_failure(recipe, e));
        }

        Ok(status)
    }

    /// Run detection over every node in the graph and summarize.
    ///
    /// Visiting every node id covers all roots as well as cycle-only
    /// components that have none; the memo keeps the cost at one
    /// evaluation per distinct recipe.
    pub fn detect_all(
        &mut self,
        ctx: &RunContext,
        graph: &mut RecipeGraph,
    ) -> Result<DetectionSummary> {
        let ids: Vec<NodeId> = graph.node_ids().collect();
        self.detect_roots(ctx, graph, &ids)
    }

    /// Run detection starting from the given roots and summarize what
    /// the traversal touched.
    ///
    /// Strategy failures are collected into the summary; only
    /// cancellation aborts the run.
    pub fn detect_roots(
        &mut self,
        ctx: &RunContext,
        graph: &mut RecipeGraph,
        roots: &[NodeId],
    ) -> Result<DetectionSummary> {
        for &node in roots {
            if let Err(err) = self.detect_bundle_recipe(ctx, graph, node) {
                if matches!(err, OutfitterError::Cancelled) {
                    return Err(err);
                }
                let name = graph.node(node).recipe.name.clone();
                warn!("detection failed for recipe '{name}': {err}");
                self.failures.push(DetectionFailure {
                    recipe: name,
                    error: err,
                });
            }
        }

        let mut summary = DetectionSummary {
            evaluated: self.evaluated.len(),
            failures: std::mem::take(&mut self.failures),
            ..DetectionSummary::default()
        };
        for node in graph.nodes() {
            match node.detection_status() {
                Some(DetectionStatus::Available) => summary.available += 1,
                Some(DetectionStatus::Detected) => summary.detected += 1,
                Some(DetectionStatus::Unsupported) => summary.unsupported += 1,
                Some(DetectionStatus::Unavailable) => summary.unavailable += 1,
                None => {}
            }
        }
        Ok(summary)
    }

    /// Failures recorded so far for dependency nodes.
    pub fn failures(&self) -> &[DetectionFailure] {
        &self.failures
    }
}

fn strategy_failure(recipe: &Recipe, err: OutfitterError) -> OutfitterError {
    match err {
        OutfitterError::Cancelled => OutfitterError::Cancelled,
        other => OutfitterError::DetectionFailed {
            recipe: recipe.name.clone(),
            message: other.to_string(),
        },
    }
}
