//! Graph assembly and catalog validation.
//!
//! Assembly turns a flat recipe list plus declared dependency names
//! into a [`RecipeGraph`], rejecting malformed input (empty names,
//! duplicate names, unresolved dependency references) before any
//! detection starts. Cycles are NOT rejected here: the detector's
//! memoization keeps traversal finite over them, and `find_cycle`
//! exists so the `validate` command can still report them.

use std::collections::HashMap;

use crate::bundle::{BundleRecipe, NodeId, RecipeGraph};
use crate::error::{OutfitterError, Result};
use crate::recipe::Recipe;

impl RecipeGraph {
    /// Build a graph from a flat recipe list, resolving declared
    /// dependency names to node ids.
    pub fn assemble(recipes: Vec<Recipe>) -> Result<Self> {
        let mut index: HashMap<String, NodeId> = HashMap::with_capacity(recipes.len());
        let mut nodes: Vec<BundleRecipe> = Vec::with_capacity(recipes.len());

        for recipe in recipes {
            if recipe.name.trim().is_empty() {
                return Err(OutfitterError::CatalogValidationError {
                    message: "recipe with empty name".to_string(),
                });
            }
            if index.contains_key(&recipe.name) {
                return Err(OutfitterError::CatalogValidationError {
                    message: format!("duplicate recipe name '{}'", recipe.name),
                });
            }
            index.insert(recipe.name.clone(), nodes.len());
            nodes.push(BundleRecipe::new(recipe));
        }

        for id in 0..nodes.len() {
            // Duplicate declarations are kept; evaluation de-duplicates.
            let deps: Result<Vec<NodeId>> = nodes[id]
                .recipe
                .dependencies
                .iter()
                .map(|name| {
                    index
                        .get(name)
                        .copied()
                        .ok_or_else(|| OutfitterError::UnresolvedDependency {
                            recipe: nodes[id].recipe.name.clone(),
                            dependency: name.clone(),
                        })
                })
                .collect();
            nodes[id].dependencies = deps?;
        }

        Ok(Self { nodes, index })
    }

    /// Find a dependency cycle, returning the recipe names along it.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Unvisited,
            Visiting,
            Visited,
        }

        fn dfs(
            node: NodeId,
            graph: &RecipeGraph,
            state: &mut [State],
            path: &mut Vec<NodeId>,
        ) -> Option<Vec<String>> {
            state[node] = State::Visiting;
            path.push(node);

            for &dep in &graph.node(node).dependencies {
                match state[dep] {
                    State::Visiting => {
                        let start = path.iter().position(|&n| n == dep).unwrap();
                        let mut cycle: Vec<String> = path[start..]
                            .iter()
                            .map(|&n| graph.node(n).name().to_string())
                            .collect();
                        cycle.push(graph.node(dep).name().to_string());
                        return Some(cycle);
                    }
                    State::Unvisited => {
                        if let Some(cycle) = dfs(dep, graph, state, path) {
                            return Some(cycle);
                        }
                    }
                    State::Visited => {}
                }
            }

            path.pop();
            state[node] = State::Visited;
            None
        }

        let mut state = vec![State::Unvisited; self.len()];
        let mut path = Vec::new();
        for node in self.node_ids() {
            if state[node] == State::Unvisited {
                if let Some(cycle) = dfs(node, self, &mut state, &mut path) {
                    return Some(cycle);
                }
            }
        }
        None
    }
}

/// Lint a recipe catalog without assembling it.
///
/// Returns one human-readable finding per problem, covering everything
/// `assemble` rejects plus issues detection would only surface later
/// (self-dependencies, cycles, invalid process patterns).
pub fn lint_catalog(recipes: &[Recipe]) -> Vec<String> {
    let mut findings = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for recipe in recipes {
        if recipe.name.trim().is_empty() {
            findings.push("recipe with empty name".to_string());
            continue;
        }
        *seen.entry(recipe.name.as_str()).or_default() += 1;
    }

    for (name, count) in &seen {
        if *count > 1 {
            findings.push(format!("duplicate recipe name '{name}'"));
        }
    }

    for recipe in recipes {
        for dep in &recipe.dependencies {
            if dep == &recipe.name {
                findings.push(format!("recipe '{}' depends on itself", recipe.name));
            } else if !seen.contains_key(dep.as_str()) {
                findings.push(format!(
                    "recipe '{}' depends on unknown recipe '{dep}'",
                    recipe.name
                ));
            }
        }
        for pattern in &recipe.process_match {
            if let Err(e) = regex::Regex::new(pattern) {
                findings.push(format!(
                    "recipe '{}': invalid process pattern '{pattern}': {e}",
                    recipe.name
                ));
            }
        }
    }

    // Cycle check only once the name-level findings are clean enough to
    // assemble.
    if findings.is_empty() {
        if let Ok(graph) = RecipeGraph::assemble(recipes.to_vec()) {
            if let Some(cycle) = graph.find_cycle() {
                findings.push(format!("dependency cycle: {}", cycle.join(" -> ")));
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dependent(name: &str, deps: &[&str]) -> Recipe {
        let mut recipe = Recipe::named(name);
        recipe.dependencies = deps.iter().map(|d| d.to_string()).collect();
        recipe
    }

    #[test]
    fn assemble_resolves_dependency_names() {
        let graph = RecipeGraph::assemble(vec![
            Recipe::named("infra"),
            dependent("mysql", &["infra"]),
        ])
        .unwrap();

        let mysql = graph.lookup("mysql").unwrap();
        let infra = graph.lookup("infra").unwrap();
        assert_eq!(graph.node(mysql).dependencies, vec![infra]);
    }

    #[test]
    fn assemble_keeps_duplicate_dependency_declarations() {
        let graph = RecipeGraph::assemble(vec![
            Recipe::named("infra"),
            dependent("mysql", &["infra", "infra"]),
        ])
        .unwrap();

        let mysql = graph.lookup("mysql").unwrap();
        assert_eq!(graph.node(mysql).dependencies.len(), 2);
    }

    #[test]
    fn assemble_rejects_empty_names() {
        let result = RecipeGraph::assemble(vec![Recipe::named("  ")]);
        assert!(matches!(
            result,
            Err(OutfitterError::CatalogValidationError { .. })
        ));
    }

    #[test]
    fn assemble_rejects_duplicate_names() {
        let result = RecipeGraph::assemble(vec![Recipe::named("infra"), Recipe::named("infra")]);
        assert!(matches!(
            result,
            Err(OutfitterError::CatalogValidationError { .. })
        ));
    }

    #[test]
    fn assemble_rejects_unresolved_dependencies() {
        let result = RecipeGraph::assemble(vec![dependent("mysql", &["infra"])]);
        match result {
            Err(OutfitterError::UnresolvedDependency { recipe, dependency }) => {
                assert_eq!(recipe, "mysql");
                assert_eq!(dependency, "infra");
            }
            other => panic!("expected UnresolvedDependency, got {other:?}"),
        }
    }

    #[test]
    fn assemble_allows_cycles() {
        let graph =
            RecipeGraph::assemble(vec![dependent("a", &["b"]), dependent("b", &["a"])]).unwrap();
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn find_cycle_none_on_dag() {
        let graph = RecipeGraph::assemble(vec![
            Recipe::named("infra"),
            dependent("mysql", &["infra"]),
            dependent("app", &["mysql", "infra"]),
        ])
        .unwrap();
        assert!(graph.find_cycle().is_none());
    }

    #[test]
    fn find_cycle_reports_self_reference() {
        let graph = RecipeGraph::assemble(vec![dependent("a", &["a"])]).unwrap();
        let cycle = graph.find_cycle().unwrap();
        assert_eq!(cycle, vec!["a", "a"]);
    }

    #[test]
    fn find_cycle_reports_mutual_reference() {
        let graph =
            RecipeGraph::assemble(vec![dependent("a", &["b"]), dependent("b", &["a"])]).unwrap();
        let cycle = graph.find_cycle().unwrap();
        assert_eq!(cycle.first(), cycle.last());
        assert!(cycle.len() >= 3);
    }

    #[test]
    fn lint_reports_all_name_findings() {
        let mut bad_pattern = Recipe::named("nginx");
        bad_pattern.process_match = vec!["[unclosed".to_string()];

        let findings = lint_catalog(&[
            Recipe::named(""),
            dependent("mysql", &["ghost"]),
            dependent("self", &["self"]),
            bad_pattern,
        ]);

        assert!(findings.iter().any(|f| f.contains("empty name")));
        assert!(findings.iter().any(|f| f.contains("ghost")));
        assert!(findings.iter().any(|f| f.contains("depends on itself")));
        assert!(findings.iter().any(|f| f.contains("invalid process pattern")));
    }

    #[test]
    fn lint_reports_cycles_on_otherwise_clean_catalogs() {
        let findings = lint_catalog(&[dependent("a", &["b"]), dependent("b", &["a"])]);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("dependency cycle"));
    }

    #[test]
    fn lint_clean_catalog_is_empty() {
        let findings = lint_catalog(&[Recipe::named("infra"), dependent("mysql", &["infra"])]);
        assert!(findings.is_empty());
    }
}
