//! Primary detection strategy: process scan.
//!
//! Reports a recipe as available when any running process matches one of
//! the recipe's `process_match` patterns. The host process list comes
//! from a [`ProcessSnapshot`] provider so tests can substitute a fixed
//! snapshot; the default provider shells out to the platform process
//! lister.

#[cfg(not(target_os = "linux"))]
use std::process::Command;

use regex::Regex;
use tracing::{trace, warn};

use crate::context::RunContext;
use crate::detection::status::DetectionStatus;
use crate::detection::DetectionStatusProvider;
use crate::error::{OutfitterError, Result};
use crate::recipe::Recipe;

/// One entry in a host process snapshot.
///
/// Name resolution can fail for short-lived or restricted processes;
/// such entries carry no name and are skipped by the scan rather than
/// failing it.
#[derive(Debug, Clone)]
pub struct ProcessInfo {
    pid: u32,
    name: Option<String>,
}

impl ProcessInfo {
    pub fn new(pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: Some(name.into()),
        }
    }

    /// An entry whose name could not be resolved.
    pub fn unnamed(pid: u32) -> Self {
        Self { pid, name: None }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// The process name, if it could be resolved.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Supplies the current host process list.
pub trait ProcessSnapshot {
    fn processes(&self, ctx: &RunContext) -> Result<Vec<ProcessInfo>>;
}

/// Default snapshot provider.
///
/// On Linux the snapshot comes from `/proc` directly, with no external
/// binary involved; elsewhere it shells out to the platform process
/// lister (`ps`, or `tasklist` on Windows).
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProcessSnapshot;

impl ProcessSnapshot for HostProcessSnapshot {
    #[cfg(target_os = "linux")]
    fn processes(&self, ctx: &RunContext) -> Result<Vec<ProcessInfo>> {
        ctx.check_cancelled()?;

        let entries = std::fs::read_dir("/proc").map_err(|e| {
            OutfitterError::ProcessListUnavailable {
                message: format!("/proc unreadable: {e}"),
            }
        })?;

        let mut procs = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            let Ok(pid) = entry.file_name().to_string_lossy().parse::<u32>() else {
                continue;
            };
            // comm can vanish or be unreadable for short-lived or
            // restricted processes; that entry just has no name.
            let name = std::fs::read_to_string(entry.path().join("comm"))
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
            procs.push(match name {
                Some(name) => ProcessInfo::new(pid, name),
                None => ProcessInfo::unnamed(pid),
            });
        }
        Ok(procs)
    }

    #[cfg(not(target_os = "linux"))]
    fn processes(&self, ctx: &RunContext) -> Result<Vec<ProcessInfo>> {
        ctx.check_cancelled()?;

        let output = list_command()
            .output()
            .map_err(|e| OutfitterError::ProcessListUnavailable {
                message: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(OutfitterError::ProcessListUnavailable {
                message: format!("process lister exited with {:?}", output.status.code()),
            });
        }

        Ok(parse_process_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

#[cfg(not(target_os = "linux"))]
fn list_command() -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("tasklist");
        cmd.args(["/nh", "/fo", "csv"]);
        cmd
    } else {
        let mut cmd = Command::new("ps");
        cmd.args(["-axo", "pid=,comm="]);
        cmd
    }
}

/// Parse `ps -axo pid=,comm=` output: one `<pid> <name>` pair per line.
///
/// A line with an unparsable pid is dropped; a parsable pid with no
/// name yields an unnamed entry.
#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn parse_process_list(raw: &str) -> Vec<ProcessInfo> {
    raw.lines()
        .filter_map(|line| {
            let trimmed = line.trim_start();
            let mut parts = trimmed.splitn(2, char::is_whitespace);
            let pid: u32 = parts.next()?.parse().ok()?;
            match parts.next().map(str::trim).filter(|n| !n.is_empty()) {
                Some(name) => Some(ProcessInfo::new(pid, name)),
                None => Some(ProcessInfo::unnamed(pid)),
            }
        })
        .collect()
}

/// Parse `tasklist /nh /fo csv` output: `"name","pid",...` per line.
#[cfg(target_os = "windows")]
fn parse_process_list(raw: &str) -> Vec<ProcessInfo> {
    raw.lines()
        .filter_map(|line| {
            let mut fields = line.split("\",\"");
            let name = fields.next()?.trim_start_matches('"');
            let pid: u32 = fields.next()?.trim_end_matches('"').parse().ok()?;
            if name.is_empty() {
                Some(ProcessInfo::unnamed(pid))
            } else {
                Some(ProcessInfo::new(pid, name))
            }
        })
        .collect()
}

/// Primary detection strategy: scan the live process list.
#[derive(Debug, Clone, Default)]
pub struct ProcessEvaluator<N = HostProcessSnapshot> {
    snapshot: N,
}

impl ProcessEvaluator<HostProcessSnapshot> {
    pub fn new() -> Self {
        Self {
            snapshot: HostProcessSnapshot,
        }
    }
}

impl<N: ProcessSnapshot> ProcessEvaluator<N> {
    /// Use a custom snapshot provider (tests, alternate platforms).
    pub fn with_snapshot(snapshot: N) -> Self {
        Self { snapshot }
    }
}

impl<N: ProcessSnapshot> DetectionStatusProvider for ProcessEvaluator<N> {
    fn detection_status(&self, ctx: &RunContext, recipe: &Recipe) -> Result<DetectionStatus> {
        // No process criteria: nothing can contradict availability, and
        // the snapshot is not worth taking.
        if recipe.process_match.is_empty() {
            return Ok(DetectionStatus::Available);
        }

        let mut patterns = Vec::with_capacity(recipe.process_match.len());
        for raw in &recipe.process_match {
            match Regex::new(raw) {
                Ok(re) => patterns.push(re),
                Err(e) => {
                    warn!("recipe '{}': invalid process pattern '{raw}': {e}", recipe.name);
                }
            }
        }
        if patterns.is_empty() {
            return Ok(DetectionStatus::Unavailable);
        }

        for process in self.snapshot.processes(ctx)? {
            let Some(name) = process.name() else {
                trace!("skipping process {} with unresolvable name", process.pid());
                continue;
            };
            if patterns.iter().any(|re| re.is_match(name)) {
                trace!(
                    "recipe '{}' matched process '{}' ({})",
                    recipe.name,
                    name,
                    process.pid()
                );
                return Ok(DetectionStatus::Available);
            }
        }

        Ok(DetectionStatus::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSnapshot(Vec<ProcessInfo>);

    impl ProcessSnapshot for FixedSnapshot {
        fn processes(&self, _ctx: &RunContext) -> Result<Vec<ProcessInfo>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSnapshot;

    impl ProcessSnapshot for BrokenSnapshot {
        fn processes(&self, _ctx: &RunContext) -> Result<Vec<ProcessInfo>> {
            Err(OutfitterError::ProcessListUnavailable {
                message: "ps not found".into(),
            })
        }
    }

    fn recipe_matching(patterns: &[&str]) -> Recipe {
        let mut recipe = Recipe::named("mysql");
        recipe.process_match = patterns.iter().map(|p| p.to_string()).collect();
        recipe
    }

    #[test]
    fn no_criteria_is_available_without_a_snapshot() {
        let evaluator = ProcessEvaluator::with_snapshot(BrokenSnapshot);
        let status = evaluator
            .detection_status(&RunContext::default(), &Recipe::named("infra"))
            .unwrap();
        assert_eq!(status, DetectionStatus::Available);
    }

    #[test]
    fn matching_process_is_available() {
        let snapshot = FixedSnapshot(vec![
            ProcessInfo::new(1, "systemd"),
            ProcessInfo::new(812, "mysqld"),
        ]);
        let evaluator = ProcessEvaluator::with_snapshot(snapshot);

        let status = evaluator
            .detection_status(&RunContext::default(), &recipe_matching(&["^mysqld$"]))
            .unwrap();
        assert_eq!(status, DetectionStatus::Available);
    }

    #[test]
    fn zero_matches_is_unavailable_not_an_error() {
        let snapshot = FixedSnapshot(vec![ProcessInfo::new(1, "systemd")]);
        let evaluator = ProcessEvaluator::with_snapshot(snapshot);

        let status = evaluator
            .detection_status(&RunContext::default(), &recipe_matching(&["mysqld"]))
            .unwrap();
        assert_eq!(status, DetectionStatus::Unavailable);
    }

    #[test]
    fn unresolvable_names_are_skipped_not_fatal() {
        let snapshot = FixedSnapshot(vec![
            ProcessInfo::unnamed(42),
            ProcessInfo::new(812, "mysqld"),
        ]);
        let evaluator = ProcessEvaluator::with_snapshot(snapshot);

        let status = evaluator
            .detection_status(&RunContext::default(), &recipe_matching(&["mysqld"]))
            .unwrap();
        assert_eq!(status, DetectionStatus::Available);
    }

    #[test]
    fn snapshot_failure_propagates() {
        let evaluator = ProcessEvaluator::with_snapshot(BrokenSnapshot);
        let result =
            evaluator.detection_status(&RunContext::default(), &recipe_matching(&["mysqld"]));
        assert!(matches!(
            result,
            Err(OutfitterError::ProcessListUnavailable { .. })
        ));
    }

    #[test]
    fn invalid_patterns_are_skipped() {
        let snapshot = FixedSnapshot(vec![ProcessInfo::new(812, "mysqld")]);
        let evaluator = ProcessEvaluator::with_snapshot(snapshot);

        let status = evaluator
            .detection_status(
                &RunContext::default(),
                &recipe_matching(&["[unclosed", "mysqld"]),
            )
            .unwrap();
        assert_eq!(status, DetectionStatus::Available);
    }

    #[test]
    fn only_invalid_patterns_is_unavailable() {
        let evaluator = ProcessEvaluator::with_snapshot(BrokenSnapshot);
        let status = evaluator
            .detection_status(&RunContext::default(), &recipe_matching(&["[unclosed"]))
            .unwrap();
        assert_eq!(status, DetectionStatus::Unavailable);
    }

    #[test]
    fn cancelled_context_aborts_default_snapshot() {
        let ctx = RunContext::default();
        ctx.cancel();
        let result = HostProcessSnapshot.processes(&ctx);
        assert!(matches!(result, Err(OutfitterError::Cancelled)));
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    #[test]
    fn parses_ps_output() {
        let raw = "    1 systemd\n  812 mysqld\n  999\nnot-a-pid bash\n";
        let procs = parse_process_list(raw);

        assert_eq!(procs.len(), 3);
        assert_eq!(procs[0].pid(), 1);
        assert_eq!(procs[0].name(), Some("systemd"));
        assert_eq!(procs[1].name(), Some("mysqld"));
        assert_eq!(procs[2].pid(), 999);
        assert_eq!(procs[2].name(), None);
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn default_snapshot_lists_this_process() {
        let procs = HostProcessSnapshot.processes(&RunContext::default()).unwrap();
        let me = std::process::id();
        assert!(procs.iter().any(|p| p.pid() == me));
    }
}
