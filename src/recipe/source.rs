//! Recipe catalog loading.
//!
//! The engine consumes recipes through the [`RecipeSource`] trait and
//! calls it exactly once before a detection run begins. The default
//! implementation reads YAML files from a directory; remote catalog
//! fetching is deliberately out of scope and lives behind the same
//! trait in downstream tooling.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OutfitterError, Result};
use crate::recipe::Recipe;

/// Supplies the flat set of recipe definitions for a detection run.
pub trait RecipeSource {
    fn load(&self) -> Result<Vec<Recipe>>;
}

/// Loads every `*.yml` / `*.yaml` file in a directory, one recipe per
/// file, in file-name order.
#[derive(Debug, Clone)]
pub struct FileRecipeSource {
    dir: PathBuf,
}

impl FileRecipeSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RecipeSource for FileRecipeSource {
    fn load(&self) -> Result<Vec<Recipe>> {
        if !self.dir.is_dir() {
            return Err(OutfitterError::RecipeDirNotFound {
                path: self.dir.clone(),
            });
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_recipe_file(path))
            .collect();
        // Sorted so a run over the same catalog is deterministic.
        paths.sort();

        let mut recipes = Vec::with_capacity(paths.len());
        for path in paths {
            let raw = fs::read_to_string(&path)?;
            let recipe: Recipe =
                serde_yaml::from_str(&raw).map_err(|e| OutfitterError::RecipeParseError {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            tracing::debug!("loaded recipe '{}' from {}", recipe.name, path.display());
            recipes.push(recipe);
        }

        Ok(recipes)
    }
}

fn is_recipe_file(path: &Path) -> bool {
    path.is_file()
        && matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yml") | Some("yaml")
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_recipe(dir: &Path, file: &str, body: &str) {
        fs::write(dir.join(file), body).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let source = FileRecipeSource::new("/definitely/not/here");
        assert!(matches!(
            source.load(),
            Err(OutfitterError::RecipeDirNotFound { .. })
        ));
    }

    #[test]
    fn loads_recipes_in_file_name_order() {
        let temp = TempDir::new().unwrap();
        write_recipe(temp.path(), "b-nginx.yml", "name: nginx");
        write_recipe(temp.path(), "a-infra.yaml", "name: infra");

        let recipes = FileRecipeSource::new(temp.path()).load().unwrap();

        let names: Vec<_> = recipes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["infra", "nginx"]);
    }

    #[test]
    fn ignores_non_yaml_files() {
        let temp = TempDir::new().unwrap();
        write_recipe(temp.path(), "infra.yml", "name: infra");
        write_recipe(temp.path(), "README.md", "# not a recipe");
        write_recipe(temp.path(), "notes.txt", "name: bogus");

        let recipes = FileRecipeSource::new(temp.path()).load().unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "infra");
    }

    #[test]
    fn parse_failure_names_the_offending_file() {
        let temp = TempDir::new().unwrap();
        write_recipe(temp.path(), "broken.yml", "name: [unclosed");

        let err = FileRecipeSource::new(temp.path()).load().unwrap_err();
        match err {
            OutfitterError::RecipeParseError { path, .. } => {
                assert!(path.ends_with("broken.yml"));
            }
            other => panic!("expected RecipeParseError, got {other:?}"),
        }
    }

    #[test]
    fn empty_directory_loads_no_recipes() {
        let temp = TempDir::new().unwrap();
        let recipes = FileRecipeSource::new(temp.path()).load().unwrap();
        assert!(recipes.is_empty());
    }
}
