//! Resource pack loading and parsing.
//!
//! This module handles loading Minecraft resource packs (ZIP files or directories)
//! and parsing the parts the model pipeline consumes: blockstates, models and
//! textures.

pub mod loader;
pub mod blockstate;
pub mod extension;
pub mod model;
pub mod texture;

pub use blockstate::{BlockstateDefinition, ModelVariant};
pub use extension::{ExtensionData, FaceExtension};
pub use model::{GuiLight, JsonModel, ModelElement, ModelFace, ModelOverride, TextureEntry};
pub use texture::TextureData;

use std::collections::HashMap;

/// A loaded Minecraft resource pack.
#[derive(Debug, Default, Clone)]
pub struct ResourcePack {
    /// Blockstate definitions by namespace and block ID.
    /// Key: namespace (e.g., "minecraft"), Value: map of block_id to definition.
    pub blockstates: HashMap<String, HashMap<String, BlockstateDefinition>>,

    /// Model definitions by namespace and model path.
    pub models: HashMap<String, HashMap<String, JsonModel>>,

    /// Texture data by namespace and texture path.
    pub textures: HashMap<String, HashMap<String, TextureData>>,
}

impl ResourcePack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a blockstate definition by full resource location (e.g., "minecraft:stone").
    pub fn get_blockstate(&self, resource_location: &str) -> Option<&BlockstateDefinition> {
        let (namespace, path) = parse_resource_location(resource_location);
        self.blockstates
            .get(namespace)
            .and_then(|ns| ns.get(path))
    }

    /// Get a model by full resource location (e.g., "minecraft:block/stone").
    pub fn get_model(&self, resource_location: &str) -> Option<&JsonModel> {
        let (namespace, path) = parse_resource_location(resource_location);
        self.models.get(namespace).and_then(|ns| ns.get(path))
    }

    /// Get a texture by full resource location (e.g., "minecraft:block/stone").
    pub fn get_texture(&self, resource_location: &str) -> Option<&TextureData> {
        let (namespace, path) = parse_resource_location(resource_location);
        self.textures.get(namespace).and_then(|ns| ns.get(path))
    }

    pub fn add_blockstate(
        &mut self,
        namespace: &str,
        block_id: &str,
        definition: BlockstateDefinition,
    ) {
        self.blockstates
            .entry(namespace.to_string())
            .or_default()
            .insert(block_id.to_string(), definition);
    }

    pub fn add_model(&mut self, namespace: &str, model_path: &str, model: JsonModel) {
        self.models
            .entry(namespace.to_string())
            .or_default()
            .insert(model_path.to_string(), model);
    }

    pub fn add_texture(&mut self, namespace: &str, texture_path: &str, texture: TextureData) {
        self.textures
            .entry(namespace.to_string())
            .or_default()
            .insert(texture_path.to_string(), texture);
    }

    /// Iterate all models as `(namespace:path, model)` pairs.
    pub fn iter_models(&self) -> impl Iterator<Item = (String, &JsonModel)> {
        self.models.iter().flat_map(|(namespace, models)| {
            models
                .iter()
                .map(move |(path, model)| (format!("{}:{}", namespace, path), model))
        })
    }

    /// Iterate all blockstates as `(namespace:block, definition)` pairs.
    pub fn iter_blockstates(&self) -> impl Iterator<Item = (String, &BlockstateDefinition)> {
        self.blockstates.iter().flat_map(|(namespace, defs)| {
            defs.iter()
                .map(move |(block, def)| (format!("{}:{}", namespace, block), def))
        })
    }

    /// Iterate all textures as `(namespace:path, texture)` pairs.
    pub fn iter_textures(&self) -> impl Iterator<Item = (String, &TextureData)> {
        self.textures.iter().flat_map(|(namespace, textures)| {
            textures
                .iter()
                .map(move |(path, texture)| (format!("{}:{}", namespace, path), texture))
        })
    }

    pub fn blockstate_count(&self) -> usize {
        self.blockstates.values().map(|m| m.len()).sum()
    }

    pub fn model_count(&self) -> usize {
        self.models.values().map(|m| m.len()).sum()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.values().map(|m| m.len()).sum()
    }
}

/// Parse a resource location into namespace and path.
/// "minecraft:block/stone" -> ("minecraft", "block/stone")
/// "block/stone" -> ("minecraft", "block/stone")
fn parse_resource_location(resource_location: &str) -> (&str, &str) {
    if let Some((namespace, path)) = resource_location.split_once(':') {
        (namespace, path)
    } else {
        (crate::types::DEFAULT_NAMESPACE, resource_location)
    }
}
