//! Observability pack metadata.
//!
//! Packs are bundles of dashboards and alerts that decorate recipes
//! once installed. The engine only needs their metadata to enrich the
//! detection report; retrieval goes through the [`PackFetcher`] trait
//! so the network-backed catalog can live in downstream tooling while
//! this crate ships a file-backed source.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::context::RunContext;
use crate::error::{OutfitterError, Result};
use crate::recipe::Recipe;

/// Metadata for one observability pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pack {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Names of the recipes this pack decorates.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipes: Vec<String>,
}

impl Pack {
    /// Whether this pack decorates any of the given recipes.
    pub fn covers_any(&self, recipes: &[Recipe]) -> bool {
        self.recipes
            .iter()
            .any(|name| recipes.iter().any(|r| &r.name == name))
    }
}

/// Retrieves pack metadata for a set of recipes.
pub trait PackFetcher {
    fn fetch_packs(&self, ctx: &RunContext, recipes: &[Recipe]) -> Result<Vec<Pack>>;
}

/// Reads a pack catalog from one YAML file on disk and filters it to
/// the packs covering the given recipes.
#[derive(Debug, Clone)]
pub struct FilePackSource {
    path: PathBuf,
}

/// On-disk catalog shape: a `packs` list.
#[derive(Debug, Default, Deserialize)]
struct PackCatalog {
    #[serde(default)]
    packs: Vec<Pack>,
}

impl FilePackSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PackFetcher for FilePackSource {
    fn fetch_packs(&self, ctx: &RunContext, recipes: &[Recipe]) -> Result<Vec<Pack>> {
        ctx.check_cancelled()?;

        let raw = fs::read_to_string(&self.path)?;
        let catalog: PackCatalog =
            serde_yaml::from_str(&raw).map_err(|e| OutfitterError::PackParseError {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        Ok(catalog
            .packs
            .into_iter()
            .filter(|pack| pack.covers_any(recipes))
            .collect())
    }
}
