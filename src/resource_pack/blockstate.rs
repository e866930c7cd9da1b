//! Blockstate definition parsing.
//!
//! Blockstates map property strings to one or more weighted model variants.
//! Only the `variants` form is read; `multipart` definitions load as empty.

use crate::types::{BakeSettings, Identifier};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A blockstate definition from blockstates/*.json.
#[derive(Debug, Clone, Default)]
pub struct BlockstateDefinition {
    /// Property string -> weighted variant list.
    pub variants: BTreeMap<String, Vec<ModelVariant>>,
}

impl<'de> Deserialize<'de> for BlockstateDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawBlockstate {
            #[serde(default)]
            variants: Option<BTreeMap<String, VariantValue>>,
        }

        let raw = RawBlockstate::deserialize(deserializer)?;
        let variants = raw
            .variants
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, v.into_vec()))
            .collect();
        Ok(BlockstateDefinition { variants })
    }
}

/// A variant value can be a single model or an array of weighted models.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum VariantValue {
    Single(ModelVariant),
    Multiple(Vec<ModelVariant>),
}

impl VariantValue {
    fn into_vec(self) -> Vec<ModelVariant> {
        match self {
            VariantValue::Single(v) => vec![v],
            VariantValue::Multiple(v) => v,
        }
    }
}

/// A model variant reference with optional rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelVariant {
    /// Model resource location (e.g., "block/stone" or "minecraft:block/stone").
    pub model: String,
    /// X rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub x: i32,
    /// Y rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub y: i32,
    /// Weight for random selection (default 1).
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl ModelVariant {
    /// Get the full resource location for the model.
    pub fn model_location(&self) -> Identifier {
        Identifier::new(&self.model)
    }

    pub fn bake_settings(&self) -> BakeSettings {
        BakeSettings::new(self.x, self.y)
    }
}
