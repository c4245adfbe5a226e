//! Outfitter - host-side install detection for integration recipes.
//!
//! Outfitter reads a catalog of installable "recipes" (agent and
//! integration install definitions), assembles their declared dependency
//! edges into a graph, and determines for each recipe whether it is
//! installable on the current host using a two-stage detection protocol:
//! a cheap process scan, followed by the recipe's discovery script when
//! the scan looks positive.
//!
//! # Modules
//!
//! - [`bundle`] - Recipe dependency graph (arena of bundle nodes)
//! - [`cli`] - Command-line interface and command implementations
//! - [`context`] - Per-run cancellation and timeout context
//! - [`detection`] - Detection statuses, strategies, and the detector
//! - [`error`] - Error types and result aliases
//! - [`packs`] - Observability pack metadata lookup
//! - [`recipe`] - Recipe data model and catalog loading
//! - [`report`] - Detection report assembly and rendering
//!
//! # Example
//!
//! ```
//! use outfitter::bundle::RecipeGraph;
//! use outfitter::context::RunContext;
//! use outfitter::detection::RecipeDetector;
//! use outfitter::recipe::Recipe;
//!
//! let recipes = vec![Recipe::named("infra"), {
//!     let mut r = Recipe::named("mysql");
//!     r.dependencies = vec!["infra".to_string()];
//!     r
//! }];
//!
//! let mut graph = RecipeGraph::assemble(recipes).unwrap();
//! let ctx = RunContext::default();
//! let mut detector = RecipeDetector::new();
//! let summary = detector.detect_all(&ctx, &mut graph).unwrap();
//! assert_eq!(summary.evaluated, 2);
//! ```

pub mod bundle;
pub mod cli;
pub mod context;
pub mod detection;
pub mod error;
pub mod packs;
pub mod recipe;
pub mod report;

pub use error::{OutfitterError, Result};
