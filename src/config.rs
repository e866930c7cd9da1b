//! Load-time configuration.
//!
//! Everything the load pipeline would otherwise read from global state is
//! collected in a [`LoadContext`] and passed explicitly.

use crate::error::Result;
use crate::transform::ModelTransformer;
use crate::types::Identifier;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// User-facing configuration flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Bake every JSON model through the extended path, even plain vanilla ones.
    pub load_vanilla_models: bool,
}

impl ExtensionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

/// A model registered under `target` whose baked form is `template` run
/// through `transformer`.
#[derive(Debug, Clone)]
pub struct DerivedModelRule {
    pub target: Identifier,
    pub template: Identifier,
    pub transformer: Arc<dyn ModelTransformer>,
}

/// Derived-model rules, populated by whoever sets up the load.
#[derive(Debug, Clone, Default)]
pub struct DerivedModelRegistry {
    rules: Vec<DerivedModelRule>,
}

impl DerivedModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        target: impl Into<Identifier>,
        template: impl Into<Identifier>,
        transformer: Arc<dyn ModelTransformer>,
    ) {
        self.rules.push(DerivedModelRule {
            target: target.into(),
            template: template.into(),
            transformer,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn rules(&self) -> impl Iterator<Item = &DerivedModelRule> {
        self.rules.iter()
    }
}

/// Read-only context threaded through loading and bake-path selection.
#[derive(Debug, Clone, Default)]
pub struct LoadContext {
    pub config: ExtensionConfig,
    pub derived: DerivedModelRegistry,
}

impl LoadContext {
    pub fn new(config: ExtensionConfig, derived: DerivedModelRegistry) -> Self {
        Self { config, derived }
    }
}
