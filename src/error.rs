//! Error types for Outfitter operations.
//!
//! This module defines [`OutfitterError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - "Recipe not available on this host" is never an error; it is a
//!   [`DetectionStatus`](crate::detection::DetectionStatus) value
//! - Use `OutfitterError` for failures that need distinct handling
//! - Use `anyhow::Error` (via `OutfitterError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Outfitter operations.
#[derive(Debug, Error)]
pub enum OutfitterError {
    /// Recipe directory not found at the expected location.
    #[error("Recipe directory not found: {path}")]
    RecipeDirNotFound { path: PathBuf },

    /// Failed to parse a recipe definition file.
    #[error("Failed to parse recipe at {path}: {message}")]
    RecipeParseError { path: PathBuf, message: String },

    /// Failed to parse a pack catalog file.
    #[error("Failed to parse pack catalog at {path}: {message}")]
    PackParseError { path: PathBuf, message: String },

    /// Invalid recipe catalog structure or values.
    #[error("Invalid recipe catalog: {message}")]
    CatalogValidationError { message: String },

    /// A recipe declares a dependency that no loaded recipe provides.
    #[error("Recipe '{recipe}' depends on unknown recipe '{dependency}'")]
    UnresolvedDependency { recipe: String, dependency: String },

    /// A recipe name was requested that the graph does not contain.
    #[error("Unknown recipe: {name}")]
    UnknownRecipe { name: String },

    /// The host process list could not be read.
    #[error("Process list unavailable: {message}")]
    ProcessListUnavailable { message: String },

    /// A detection strategy failed for a specific recipe.
    #[error("Detection failed for recipe '{recipe}': {message}")]
    DetectionFailed { recipe: String, message: String },

    /// The detection run was cancelled by the caller.
    #[error("Detection run cancelled")]
    Cancelled,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Outfitter operations.
pub type Result<T> = std::result::Result<T, OutfitterError>;
