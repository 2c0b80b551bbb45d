// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Recipe resolution.
//!
//! A `RecipeConfig` may carry its content inline or reference a location.
//! The retriever resolves the location form; the result is always a
//! `Recipe` with materialized content, so parsers never do I/O.

use crate::error::ValidationError;
use std::fs;
use std::path::PathBuf;
use wharf_core::RecipeConfig;

/// A recipe with resolved content, ready for parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub type_name: String,
    pub content_type: Option<String>,
    pub content: String,
}

impl Recipe {
    /// Resolve a recipe config, fetching located content via `retriever`.
    pub fn resolve(
        config: &RecipeConfig,
        retriever: &dyn RecipeRetriever,
    ) -> Result<Self, ValidationError> {
        let content = match (&config.content, &config.location) {
            (Some(content), _) => content.clone(),
            (None, Some(location)) => retriever.fetch(location)?,
            (None, None) => return Err(ValidationError::EmptyRecipe),
        };
        Ok(Self {
            type_name: config.type_name.clone(),
            content_type: config.content_type.clone(),
            content,
        })
    }
}

/// Fetches recipe content referenced by location.
pub trait RecipeRetriever: Send + Sync {
    fn fetch(&self, location: &str) -> Result<String, ValidationError>;
}

/// Retriever that resolves locations against a base directory.
#[derive(Debug, Clone, Default)]
pub struct FileRetriever {
    base_dir: Option<PathBuf>,
}

impl FileRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rooted(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }
}

impl RecipeRetriever for FileRetriever {
    fn fetch(&self, location: &str) -> Result<String, ValidationError> {
        let path = match &self.base_dir {
            Some(base) => base.join(location),
            None => PathBuf::from(location),
        };
        fs::read_to_string(&path).map_err(|e| ValidationError::RecipeUnavailable {
            location: location.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Retriever for deployments that only accept inline recipes.
#[derive(Debug, Clone, Default)]
pub struct InlineOnlyRetriever;

impl RecipeRetriever for InlineOnlyRetriever {
    fn fetch(&self, location: &str) -> Result<String, ValidationError> {
        Err(ValidationError::RecipeUnavailable {
            location: location.to_string(),
            reason: "located recipes are disabled".to_string(),
        })
    }
}

#[cfg(test)]
#[path = "recipe_tests.rs"]
mod tests;
