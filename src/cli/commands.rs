//! Command implementations.
//!
//! This is the install-orchestration layer over the engine: load the
//! catalog through a [`RecipeSource`], assemble the graph, run the
//! detector, and render the annotated result.

use std::io;
use std::time::Duration;

use clap::CommandFactory;
use tracing::debug;

use crate::bundle::{builder::lint_catalog, RecipeGraph};
use crate::cli::args::{Cli, Commands, CompletionsArgs, DetectArgs, OutputFormat};
use crate::context::RunContext;
use crate::detection::RecipeDetector;
use crate::error::{OutfitterError, Result};
use crate::packs::{FilePackSource, Pack, PackFetcher};
use crate::recipe::source::{FileRecipeSource, RecipeSource};
use crate::recipe::Recipe;
use crate::report::DetectionReport;

/// Exit code for validation findings, distinct from hard errors.
const EXIT_FINDINGS: i32 = 2;

/// Dispatch the parsed CLI to a command, returning the process exit code.
pub fn dispatch(cli: &Cli) -> Result<i32> {
    let source = FileRecipeSource::new(&cli.recipes_dir);
    match &cli.command {
        None => detect(&source, &DetectArgs::default()),
        Some(Commands::Detect(args)) => detect(&source, args),
        Some(Commands::Validate) => validate(&source),
        Some(Commands::List) => list(&source),
        Some(Commands::Completions(args)) => completions(args),
    }
}

fn detect(source: &dyn RecipeSource, args: &DetectArgs) -> Result<i32> {
    let recipes = source.load()?;
    debug!("loaded {} recipes", recipes.len());

    let mut graph = RecipeGraph::assemble(recipes)?;
    let ctx = RunContext::new(Duration::from_secs(args.script_timeout));
    let mut detector = RecipeDetector::new();

    let summary = if args.only.is_empty() {
        detector.detect_all(&ctx, &mut graph)?
    } else {
        detect_only(&mut detector, &ctx, &mut graph, &args.only)?
    };

    let packs = match &args.packs {
        Some(path) => fetch_packs(path, &ctx, &graph)?,
        None => Vec::new(),
    };

    let report = DetectionReport::from_graph(&graph, &summary, packs);
    match args.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Table => print!("{}", report.render_table()),
    }

    Ok(if report.failures.is_empty() { 0 } else { 1 })
}

/// Detect the named recipes (and, through the traversal, everything
/// they depend on).
fn detect_only(
    detector: &mut RecipeDetector,
    ctx: &RunContext,
    graph: &mut RecipeGraph,
    only: &[String],
) -> Result<crate::detection::DetectionSummary> {
    let mut roots = Vec::with_capacity(only.len());
    for name in only {
        let id = graph
            .lookup(name)
            .ok_or_else(|| OutfitterError::UnknownRecipe { name: name.clone() })?;
        roots.push(id);
    }
    detector.detect_roots(ctx, graph, &roots)
}

/// Packs are matched against the recipes that came out installable.
fn fetch_packs(path: &std::path::Path, ctx: &RunContext, graph: &RecipeGraph) -> Result<Vec<Pack>> {
    let available: Vec<Recipe> = graph
        .nodes()
        .iter()
        .filter(|n| n.detection_status().is_some_and(|s| s.is_available()))
        .map(|n| n.recipe.clone())
        .collect();
    FilePackSource::new(path).fetch_packs(ctx, &available)
}

fn validate(source: &dyn RecipeSource) -> Result<i32> {
    let recipes = source.load()?;
    let findings = lint_catalog(&recipes);

    if findings.is_empty() {
        println!("{} recipes, no problems found", recipes.len());
        return Ok(0);
    }

    for finding in &findings {
        println!("{} {finding}", console::style("✗").red());
    }
    Ok(EXIT_FINDINGS)
}

fn list(source: &dyn RecipeSource) -> Result<i32> {
    let recipes = source.load()?;

    for recipe in &recipes {
        println!("{}", console::style(&recipe.name).bold());
        if !recipe.display_name.is_empty() {
            println!("  {}", recipe.display_name);
        }
        if !recipe.dependencies.is_empty() {
            println!("  depends on: {}", recipe.dependencies.join(", "));
        }
        if !recipe.process_match.is_empty() {
            println!("  process match: {}", recipe.process_match.join(", "));
        }
        if recipe.discovery_script().is_some() {
            println!("  discovery script: yes");
        }
    }

    Ok(0)
}

fn completions(args: &CompletionsArgs) -> Result<i32> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "outfitter", &mut io::stdout());
    Ok(0)
}
