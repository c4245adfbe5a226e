//! Recipe dependency graph.
//!
//! The graph is an arena of [`BundleRecipe`] nodes indexed by
//! [`NodeId`], with dependency edges stored as indices. Multiple
//! parents may point at the same dependency node, so the structure is a
//! DAG rather than a tree; a cycle introduced by a catalog author is
//! representable too, and the detector's memoization keeps traversal
//! finite over it.

pub mod builder;

use std::collections::HashMap;

use crate::detection::status::DetectionStatus;
use crate::recipe::Recipe;

/// Index of a node in the graph arena.
pub type NodeId = usize;

/// One recipe plus its resolved dependency edges and the detection
/// result accumulated during a run.
#[derive(Debug, Clone)]
pub struct BundleRecipe {
    pub recipe: Recipe,
    /// Resolved dependencies, in declaration order. Duplicates are kept
    /// as declared; evaluation de-duplicates, not the structure.
    pub dependencies: Vec<NodeId>,
    detection_status: Option<DetectionStatus>,
}

impl BundleRecipe {
    pub fn new(recipe: Recipe) -> Self {
        Self {
            recipe,
            dependencies: Vec::new(),
            detection_status: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.recipe.name
    }

    /// Record this node's detection status. The first write wins; the
    /// detector writes at most once per run.
    pub fn add_detection_status(&mut self, status: DetectionStatus) {
        if self.detection_status.is_some() {
            tracing::debug!(
                "detection status for '{}' already recorded, keeping first result",
                self.recipe.name
            );
            return;
        }
        self.detection_status = Some(status);
    }

    pub fn detection_status(&self) -> Option<DetectionStatus> {
        self.detection_status
    }
}

/// Arena of bundle nodes with a name index.
#[derive(Debug, Clone, Default)]
pub struct RecipeGraph {
    nodes: Vec<BundleRecipe>,
    index: HashMap<String, NodeId>,
}

impl RecipeGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &BundleRecipe {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut BundleRecipe {
        &mut self.nodes[id]
    }

    pub fn nodes(&self) -> &[BundleRecipe] {
        &self.nodes
    }

    /// All node ids in catalog order. Returned by value so callers can
    /// mutate the graph while iterating.
    pub fn node_ids(&self) -> std::ops::Range<NodeId> {
        0..self.nodes.len()
    }

    /// Look up a node by recipe name.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Nodes that no other node depends on, in catalog order.
    ///
    /// A cycle-only component has no root; whole-graph traversal covers
    /// it by visiting every node id.
    pub fn roots(&self) -> Vec<NodeId> {
        let mut is_dependency = vec![false; self.nodes.len()];
        for node in &self.nodes {
            for &dep in &node.dependencies {
                is_dependency[dep] = true;
            }
        }
        self.node_ids().filter(|&id| !is_dependency[id]).collect()
    }

    /// Clear all detection statuses so the graph can host a fresh run.
    pub fn reset_detection(&mut self) {
        for node in &mut self.nodes {
            node.detection_status = None;
        }
    }
}
