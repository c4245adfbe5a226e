//! Recipe data model.
//!
//! A [`Recipe`] is an immutable install definition loaded from the
//! catalog. The detection engine only reads the fields that drive the
//! two-stage protocol (`process_match` and the pre-install discovery
//! script); the remaining metadata is carried for rendering and for the
//! install layer.
//!
//! Catalog files use the camelCase key style of the upstream install
//! catalogs (`processMatch`, `preInstall.requireAtDiscovery`).

pub mod source;

use serde::{Deserialize, Serialize};

/// An installable integration definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Recipe {
    /// Unique name; the identity key for dependency edges and memoization.
    pub name: String,

    /// Human-facing name for tables and summaries.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Regex patterns matched against running process names.
    ///
    /// Empty means the recipe has no process criteria and passes the
    /// primary probe by default.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_match: Vec<String>,

    /// Names of recipes that must be evaluated before this one.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// OS identifiers this recipe targets. Informational; detection
    /// does not interpret them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub install_targets: Vec<String>,

    pub pre_install: PreInstall,
}

/// Pre-install stage descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreInstall {
    /// Discovery script body. Non-empty triggers the secondary probe
    /// after a positive process scan.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub require_at_discovery: String,
}

impl Recipe {
    /// Create a bare recipe with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The display name, falling back to the recipe name.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    /// The discovery script body, if one is declared.
    pub fn discovery_script(&self) -> Option<&str> {
        let script = self.pre_install.require_at_discovery.trim();
        if script.is_empty() {
            None
        } else {
            Some(script)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_sets_only_the_name() {
        let recipe = Recipe::named("mysql");
        assert_eq!(recipe.name, "mysql");
        assert!(recipe.dependencies.is_empty());
        assert!(recipe.discovery_script().is_none());
    }

    #[test]
    fn label_falls_back_to_name() {
        let mut recipe = Recipe::named("mysql");
        assert_eq!(recipe.label(), "mysql");

        recipe.display_name = "MySQL Server".to_string();
        assert_eq!(recipe.label(), "MySQL Server");
    }

    #[test]
    fn discovery_script_ignores_whitespace_only_bodies() {
        let mut recipe = Recipe::named("mysql");
        recipe.pre_install.require_at_discovery = "  \n\t ".to_string();
        assert!(recipe.discovery_script().is_none());

        recipe.pre_install.require_at_discovery = "exit 0\n".to_string();
        assert_eq!(recipe.discovery_script(), Some("exit 0"));
    }

    #[test]
    fn deserializes_camel_case_catalog_keys() {
        let yaml = r#"
name: mysql
displayName: MySQL Server
processMatch:
  - mysqld
dependencies:
  - infra
installTargets:
  - linux
preInstall:
  requireAtDiscovery: |
    command -v mysql
"#;
        let recipe: Recipe = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(recipe.name, "mysql");
        assert_eq!(recipe.display_name, "MySQL Server");
        assert_eq!(recipe.process_match, vec!["mysqld"]);
        assert_eq!(recipe.dependencies, vec!["infra"]);
        assert_eq!(recipe.install_targets, vec!["linux"]);
        assert_eq!(recipe.discovery_script(), Some("command -v mysql"));
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        // Upstream catalogs carry install metadata this engine never reads.
        let yaml = r#"
name: nginx
repository: https://example.invalid/nginx
install:
  version: "3"
"#;
        let recipe: Recipe = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(recipe.name, "nginx");
    }
}
