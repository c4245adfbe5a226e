//! Detection report assembly and rendering.
//!
//! After a run, the annotated graph is flattened into a
//! [`DetectionReport`] the CLI can render as a table or as pretty
//! JSON. The report is the consumer-facing result; the engine itself
//! defines no wire format.

use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;

use crate::bundle::RecipeGraph;
use crate::detection::{DetectionStatus, DetectionSummary};
use crate::error::{OutfitterError, Result};
use crate::packs::Pack;

/// One recipe row in the report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    /// `None` when a strategy failure left the recipe unclassified.
    pub status: Option<DetectionStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

/// A strategy failure, flattened for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ReportFailure {
    pub recipe: String,
    pub message: String,
}

/// The consumer-facing result of one detection run.
#[derive(Debug, Serialize)]
pub struct DetectionReport {
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<ReportEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ReportFailure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub packs: Vec<Pack>,
}

impl DetectionReport {
    /// Flatten an annotated graph and its run summary into a report.
    pub fn from_graph(graph: &RecipeGraph, summary: &DetectionSummary, packs: Vec<Pack>) -> Self {
        let entries = graph
            .nodes()
            .iter()
            .map(|node| ReportEntry {
                name: node.recipe.name.clone(),
                display_name: node.recipe.display_name.clone(),
                status: node.detection_status(),
                dependencies: node.recipe.dependencies.clone(),
            })
            .collect();

        let failures = summary
            .failures
            .iter()
            .map(|f| ReportFailure {
                recipe: f.recipe.clone(),
                message: f.error.to_string(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            entries,
            failures,
            packs,
        }
    }

    /// Recipes classified as installable.
    pub fn available(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(|e| e.status == Some(DetectionStatus::Available))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| OutfitterError::Other(e.into()))
    }

    /// Render as a box-drawing table with styled status cells.
    pub fn render_table(&self) -> String {
        let headers = ["RECIPE", "STATUS", "DEPENDS ON"];
        let rows: Vec<[String; 3]> = self
            .entries
            .iter()
            .map(|entry| {
                [
                    entry.name.clone(),
                    entry
                        .status
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "FAILED".to_string()),
                    entry.dependencies.join(", "),
                ]
            })
            .collect();

        let mut widths = headers.map(str::len);
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        let border = |left: char, mid: char, right: char| {
            let mut s = String::new();
            s.push(left);
            for (i, width) in widths.iter().enumerate() {
                s.push_str(&"─".repeat(width + 2));
                s.push(if i < widths.len() - 1 { mid } else { right });
            }
            s.push('\n');
            s
        };

        let mut out = String::new();
        out.push_str(&border('┌', '┬', '┐'));
        out.push('│');
        for (i, header) in headers.iter().enumerate() {
            out.push_str(&format!(" {:width$} │", header, width = widths[i]));
        }
        out.push('\n');
        out.push_str(&border('├', '┼', '┤'));

        for (row, entry) in rows.iter().zip(&self.entries) {
            out.push('│');
            for (i, cell) in row.iter().enumerate() {
                // Pad before styling so ANSI codes don't skew widths.
                let padded = format!("{:width$}", cell, width = widths[i]);
                let cell = if i == 1 {
                    style_status(entry.status, &padded)
                } else {
                    padded
                };
                out.push_str(&format!(" {cell} │"));
            }
            out.push('\n');
        }
        out.push_str(&border('└', '┴', '┘'));

        if !self.failures.is_empty() {
            out.push('\n');
            for failure in &self.failures {
                out.push_str(&format!(
                    "{} {}: {}\n",
                    style("✗").red(),
                    failure.recipe,
                    failure.message
                ));
            }
        }

        if !self.packs.is_empty() {
            out.push('\n');
            out.push_str("Packs:\n");
            for pack in &self.packs {
                let label = if pack.display_name.is_empty() {
                    &pack.name
                } else {
                    &pack.display_name
                };
                out.push_str(&format!("  • {} ({})\n", label, pack.recipes.join(", ")));
            }
        }

        out
    }
}

fn style_status(status: Option<DetectionStatus>, padded: &str) -> String {
    match status {
        Some(DetectionStatus::Available) => style(padded).green().to_string(),
        Some(DetectionStatus::Detected) => style(padded).yellow().to_string(),
        Some(DetectionStatus::Unsupported) => style(padded).red().to_string(),
        Some(DetectionStatus::Unavailable) => style(padded).dim().to_string(),
        None => style(padded).red().bold().to_string(),
    }
}
