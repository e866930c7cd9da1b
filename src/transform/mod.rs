//! Model transformers and derivation.
//!
//! A transformer turns a template baked model into a variant of it. The
//! retexture transformer re-points every sprite listed in its remap table;
//! models that know how to rebuild themselves implement [`DerivableModel`]
//! and are re-derived under a [`TransformContext`].

use crate::bake::BakedModel;
use crate::types::{Identifier, SpriteIdentifier};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A pure `(BakedModel) -> BakedModel` function plus the textures it needs.
pub trait ModelTransformer: Send + Sync + fmt::Debug {
    /// Produce the transformed variant of `template`.
    fn transform(&self, template: Arc<dyn BakedModel>) -> Arc<dyn BakedModel>;

    /// Textures that must be stitched before any transform runs.
    fn textures(&self) -> Vec<Identifier>;

    /// Downcast used by the lazy delegate to special-case flat item generation.
    fn as_retexture(&self) -> Option<&RetexturedModelTransformer> {
        None
    }
}

/// A baked model that can rebuild itself under a transform context.
pub trait DerivableModel {
    fn derive(&self, context: &TransformContext) -> Arc<dyn BakedModel>;
}

/// Context handed to [`DerivableModel::derive`].
#[derive(Debug, Clone, Default)]
pub struct TransformContext {
    sprite_map: BTreeMap<SpriteIdentifier, SpriteIdentifier>,
}

impl TransformContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that replaces block-atlas textures per `texture_map`.
    pub fn retexture(texture_map: &BTreeMap<Identifier, Identifier>) -> Self {
        let sprite_map = texture_map
            .iter()
            .map(|(from, to)| {
                (
                    SpriteIdentifier::block(from.clone()),
                    SpriteIdentifier::block(to.clone()),
                )
            })
            .collect();
        Self { sprite_map }
    }

    /// Sprite a derived quad should use in place of `sprite`.
    pub fn remap_sprite(&self, sprite: &SpriteIdentifier) -> SpriteIdentifier {
        self.sprite_map
            .get(sprite)
            .cloned()
            .unwrap_or_else(|| sprite.clone())
    }

    pub fn is_identity(&self) -> bool {
        self.sprite_map.is_empty()
    }
}

/// Returns the template unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransformer;

impl ModelTransformer for IdentityTransformer {
    fn transform(&self, template: Arc<dyn BakedModel>) -> Arc<dyn BakedModel> {
        template
    }

    fn textures(&self) -> Vec<Identifier> {
        Vec::new()
    }
}

/// Replaces textures of a template model, keyed by texture identifier.
#[derive(Debug, Clone, Default)]
pub struct RetexturedModelTransformer {
    texture_map: BTreeMap<Identifier, Identifier>,
    context: TransformContext,
}

impl RetexturedModelTransformer {
    pub fn new(texture_map: BTreeMap<Identifier, Identifier>) -> Self {
        let context = TransformContext::retexture(&texture_map);
        Self {
            texture_map,
            context,
        }
    }

    /// Build from `(from, to)` pairs.
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<Identifier>,
        B: Into<Identifier>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        )
    }

    pub fn texture_map(&self) -> &BTreeMap<Identifier, Identifier> {
        &self.texture_map
    }

    /// Replacement for `texture`, or `None` when it is not remapped.
    pub fn remap(&self, texture: &Identifier) -> Option<&Identifier> {
        self.texture_map.get(texture)
    }

    pub fn context(&self) -> &TransformContext {
        &self.context
    }
}

impl ModelTransformer for RetexturedModelTransformer {
    fn transform(&self, template: Arc<dyn BakedModel>) -> Arc<dyn BakedModel> {
        match template.as_derivable() {
            Some(derivable) => derivable.derive(&self.context),
            None => template,
        }
    }

    fn textures(&self) -> Vec<Identifier> {
        self.texture_map.values().cloned().collect()
    }

    fn as_retexture(&self) -> Option<&RetexturedModelTransformer> {
        Some(self)
    }
}
