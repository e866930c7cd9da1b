//! # JSON Model Extensions
//!
//! A model pipeline for Minecraft-style JSON block and item models, with an
//! optional per-model extension payload.
//!
//! ## Overview
//!
//! Models are loaded into an arena graph, their parent chains are resolved
//! and linked, and each model is baked through either the host path or the
//! extended path. Derived models are registered as lazy delegates: their
//! baked form is a transformer applied to another baked model, computed the
//! first time it is rendered.
//!
//! ## Quick Start
//!
//! ```ignore
//! use json_model_extensions::{load_models, load_resource_pack, LoadContext};
//!
//! let pack = load_resource_pack("path/to/pack.zip")?;
//! let manager = load_models(&pack, LoadContext::default())?;
//! let stone = manager.get(&"block/stone".into());
//! ```
//!
//! ## Derived Models
//!
//! ```ignore
//! use json_model_extensions::{DerivedModelRegistry, RetexturedModelTransformer};
//! use std::sync::Arc;
//!
//! let mut derived = DerivedModelRegistry::new();
//! derived.add(
//!     "minecraft:granite_stairs#facing=east",
//!     "minecraft:stone_stairs#facing=east",
//!     Arc::new(RetexturedModelTransformer::from_pairs([("block/stone", "block/granite")])),
//! );
//! ```

pub mod error;
pub mod types;
pub mod config;
pub mod resource_pack;
pub mod resolver;
pub mod transform;
pub mod bake;
pub mod atlas;

// Re-export main types for convenience
pub use error::{ModelError, Result};
pub use types::{Axis, BakeSettings, Direction, Identifier, SpriteIdentifier};
pub use config::{DerivedModelRegistry, ExtensionConfig, LoadContext};
pub use resource_pack::{BlockstateDefinition, ExtensionData, JsonModel, ModelElement, ResourcePack};
pub use resolver::{ModelGraph, NodeId, UnbakedModel};
pub use transform::{IdentityTransformer, ModelTransformer, RetexturedModelTransformer};
pub use bake::{
    BakedModel, BakedModelManager, BakedQuad, LazyForwardingModel, LazyModelDelegate, ModelBakery,
    RenderContext,
};
pub use atlas::SpriteAtlas;

use std::sync::Arc;

/// Load a resource pack from a file path (ZIP or directory).
pub fn load_resource_pack<P: AsRef<std::path::Path>>(path: P) -> Result<ResourcePack> {
    resource_pack::loader::load_from_path(path)
}

/// Load a resource pack from the bytes of a ZIP archive.
pub fn load_resource_pack_from_bytes(data: &[u8]) -> Result<ResourcePack> {
    resource_pack::loader::load_from_bytes(data)
}

/// Resolve and bake every model and blockstate in `pack`.
pub fn load_models(pack: &ResourcePack, context: LoadContext) -> Result<Arc<BakedModelManager>> {
    let mut bakery = ModelBakery::from_pack(pack, context);
    bakery.resolve_all()?;
    let atlas = SpriteAtlas::from_pack(pack);
    bakery.bake_all(&atlas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::{ModelFace, TextureData};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_load_models_from_pack() {
        let mut pack = ResourcePack::new();
        let mut stone = JsonModel::new().with_texture("all", "block/stone");
        stone.elements.push(
            ModelElement::new([0.0; 3], [16.0; 3]).with_face(Direction::Up, ModelFace::new("#all")),
        );
        pack.add_model("minecraft", "block/stone", stone);
        pack.add_texture("minecraft", "block/stone", TextureData::solid(16, 16, [120, 120, 120, 255]));
        pack.add_blockstate(
            "minecraft",
            "stone",
            serde_json::from_str(r#"{"variants": {"": {"model": "block/stone"}}}"#).unwrap(),
        );

        let manager = load_models(&pack, LoadContext::default()).unwrap();
        assert!(manager.is_published());
        assert_eq!(manager.len(), 2);

        let model = manager.get(&Identifier::new("stone#"));
        assert!(model.is_vanilla_adapter());
        // No cullface: the face is an unculled quad.
        let mut random = StdRng::seed_from_u64(0);
        assert!(model.quads(Some(Direction::Up), &mut random).is_empty());
        assert_eq!(model.quads(None, &mut random).len(), 1);
    }
}
