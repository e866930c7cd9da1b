//! Sprite lookup.
//!
//! Stitching is the host's job; the bake pipeline only needs to turn a
//! [`SpriteIdentifier`] into a sprite with pixel data, falling back to the
//! missing sprite for anything not registered.

use crate::resource_pack::{ResourcePack, TextureData};
use crate::types::{Identifier, SpriteIdentifier};
use std::collections::HashMap;
use std::sync::Arc;

/// A texture registered in an atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub id: SpriteIdentifier,
    pub data: TextureData,
}

impl Sprite {
    pub fn width(&self) -> u32 {
        self.data.width
    }

    pub fn height(&self) -> u32 {
        self.data.height
    }
}

/// Sprites by identifier, with a missing-sprite fallback.
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    sprites: HashMap<SpriteIdentifier, Arc<Sprite>>,
    missing: Arc<Sprite>,
}

impl Default for SpriteAtlas {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteAtlas {
    pub fn new() -> Self {
        Self {
            sprites: HashMap::new(),
            missing: Arc::new(Sprite {
                id: SpriteIdentifier::missing(),
                data: TextureData::placeholder(),
            }),
        }
    }

    /// Register every texture of a pack on the block atlas.
    pub fn from_pack(pack: &ResourcePack) -> Self {
        let mut atlas = Self::new();
        for (location, texture) in pack.iter_textures() {
            atlas.insert(SpriteIdentifier::block(Identifier::new(location)), texture.clone());
        }
        atlas
    }

    pub fn insert(&mut self, id: SpriteIdentifier, data: TextureData) {
        self.sprites.insert(id.clone(), Arc::new(Sprite { id, data }));
    }

    pub fn contains(&self, id: &SpriteIdentifier) -> bool {
        self.sprites.contains_key(id)
    }

    /// The sprite for `id`, or the missing sprite.
    pub fn get(&self, id: &SpriteIdentifier) -> Arc<Sprite> {
        self.sprites
            .get(id)
            .cloned()
            .unwrap_or_else(|| self.missing.clone())
    }

    pub fn missing(&self) -> Arc<Sprite> {
        self.missing.clone()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}
