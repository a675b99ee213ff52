//! Compiler configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::vocab::DEFAULT_PROPERTY_NS;

/// Optional compilation features that depend on store capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFeatures {
    /// Expand categories with subcategories through `rdfs:subClassOf*`.
    pub subclass_closure: bool,
    /// Expand properties with subproperties through `rdfs:subPropertyOf*`.
    pub subproperty_closure: bool,
    /// Resolve page values that are redirects.
    pub redirects: bool,
    /// Make every `LIKE` comparison case-insensitive.
    pub no_case: bool,
}

impl Default for QueryFeatures {
    fn default() -> Self {
        Self {
            subclass_closure: true,
            subproperty_closure: true,
            redirects: true,
            no_case: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub result_variable: String,
    pub features: QueryFeatures,
    /// IRI prefix prepended to encoded page titles (`""` renders `<Title>`).
    pub page_iri_base: String,
    /// IRI bound to the `property:` prefix in SELECT queries.
    pub property_namespace: String,
    /// How many times one concept may be expanded inside itself.
    pub max_concept_depth: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            result_variable: "result".to_string(),
            features: QueryFeatures::default(),
            page_iri_base: String::new(),
            property_namespace: DEFAULT_PROPERTY_NS.to_string(),
            max_concept_depth: 1,
        }
    }
}

impl CompilerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to parse compiler config JSON")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read compiler config {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("invalid compiler config {}", path.display()))
    }
}
