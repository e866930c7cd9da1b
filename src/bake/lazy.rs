//! A baked model computed on first use.

use super::{BakedModel, BakedQuad, BlockContext, ItemContext, ModelOverrideList, RenderContext};
use crate::transform::DerivableModel;
use crate::types::{Direction, SpriteIdentifier};
use rand::RngCore;
use std::fmt;
use std::sync::{Arc, OnceLock};

type Producer = Box<dyn Fn() -> Arc<dyn BakedModel> + Send + Sync>;

/// Forwards every call to a model produced on first access.
///
/// The producer runs at most once per successful evaluation: concurrent
/// first callers block until the winner publishes, and everyone observes the
/// same `Arc`. If the producer panics, the panic reaches the calling thread
/// and the cell stays empty, so a later access runs the producer again.
pub struct LazyForwardingModel {
    producer: Producer,
    wrapped: OnceLock<Arc<dyn BakedModel>>,
}

impl LazyForwardingModel {
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn() -> Arc<dyn BakedModel> + Send + Sync + 'static,
    {
        Self {
            producer: Box::new(producer),
            wrapped: OnceLock::new(),
        }
    }

    /// The wrapped model, computing it if this is the first access.
    pub fn delegate(&self) -> &Arc<dyn BakedModel> {
        self.wrapped.get_or_init(|| (self.producer)())
    }

    pub fn is_computed(&self) -> bool {
        self.wrapped.get().is_some()
    }
}

impl fmt::Debug for LazyForwardingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyForwardingModel")
            .field("wrapped", &self.wrapped.get())
            .finish_non_exhaustive()
    }
}

impl BakedModel for LazyForwardingModel {
    fn quads(&self, face: Option<Direction>, random: &mut dyn RngCore) -> Vec<BakedQuad> {
        self.delegate().quads(face, random)
    }

    fn use_ambient_occlusion(&self) -> bool {
        self.delegate().use_ambient_occlusion()
    }

    fn has_depth(&self) -> bool {
        self.delegate().has_depth()
    }

    fn is_side_lit(&self) -> bool {
        self.delegate().is_side_lit()
    }

    fn particle_sprite(&self) -> SpriteIdentifier {
        self.delegate().particle_sprite()
    }

    fn overrides(&self) -> &ModelOverrideList {
        self.delegate().overrides()
    }

    fn is_builtin(&self) -> bool {
        self.delegate().is_builtin()
    }

    fn is_vanilla_adapter(&self) -> bool {
        self.delegate().is_vanilla_adapter()
    }

    fn emit_block_quads(
        &self,
        block: &BlockContext,
        random: &mut dyn RngCore,
        context: &mut dyn RenderContext,
    ) {
        self.delegate().emit_block_quads(block, random, context);
    }

    fn emit_item_quads(
        &self,
        item: &ItemContext,
        random: &mut dyn RngCore,
        context: &mut dyn RenderContext,
    ) {
        self.delegate().emit_item_quads(item, random, context);
    }

    // Deriving through a lazy template forces it.
    fn as_derivable(&self) -> Option<&dyn DerivableModel> {
        self.delegate().as_derivable()
    }
}
