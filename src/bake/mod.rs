//! Baked models and the bake pipeline.
//!
//! A [`BakedModel`] is the renderer-facing form of a model: it hands out
//! quads per face and can emit itself into a [`RenderContext`]. Models that
//! behave exactly like a plain host model report themselves as vanilla
//! adapters, which lets [`emit_block_model`] and [`emit_item_model`] take the
//! batched path instead of per-model dispatch.

pub mod bakery;
pub mod classify;
pub mod delegate;
pub mod extended;
pub mod geometry;
pub mod item_generator;
pub mod lazy;
pub mod simple;
pub mod weighted;

pub use bakery::ModelBakery;
pub use classify::{select_bake_path, BakePath};
pub use delegate::LazyModelDelegate;
pub use extended::ExtendedBakedModel;
pub use geometry::{bake_face, BakedQuad, Vertex};
pub use lazy::LazyForwardingModel;
pub use simple::SimpleBakedModel;
pub use weighted::{WeightedBakedModel, WeightedBuilder};

use crate::error::{ModelError, Result};
use crate::resolver::{ModelGraph, NodeId};
use crate::transform::DerivableModel;
use crate::types::{Direction, Identifier, SpriteIdentifier};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// The renderer-facing capability surface of a model.
pub trait BakedModel: Send + Sync + fmt::Debug {
    /// Quads for one cull face, or the unculled quads when `face` is `None`.
    fn quads(&self, face: Option<Direction>, random: &mut dyn RngCore) -> Vec<BakedQuad>;

    fn use_ambient_occlusion(&self) -> bool;

    /// Whether the model renders as a 3D block in GUIs.
    fn has_depth(&self) -> bool;

    fn is_side_lit(&self) -> bool;

    fn particle_sprite(&self) -> SpriteIdentifier;

    fn overrides(&self) -> &ModelOverrideList;

    /// Whether the model is drawn by a block entity renderer instead of quads.
    fn is_builtin(&self) -> bool {
        false
    }

    /// Whether emission is equivalent to the host's plain quad path.
    fn is_vanilla_adapter(&self) -> bool {
        true
    }

    fn emit_block_quads(
        &self,
        _block: &BlockContext,
        random: &mut dyn RngCore,
        context: &mut dyn RenderContext,
    ) {
        emit_all_quads(self, random, context);
    }

    fn emit_item_quads(
        &self,
        _item: &ItemContext,
        random: &mut dyn RngCore,
        context: &mut dyn RenderContext,
    ) {
        emit_all_quads(self, random, context);
    }

    /// Derivation hook; `None` for models that cannot rebuild themselves.
    fn as_derivable(&self) -> Option<&dyn DerivableModel> {
        None
    }
}

fn emit_all_quads<M: BakedModel + ?Sized>(
    model: &M,
    random: &mut dyn RngCore,
    context: &mut dyn RenderContext,
) {
    for quad in collect_quads(model, random) {
        context.emit(quad);
    }
}

/// Every quad of `model`, culled faces first.
///
/// Each face query gets a generator reseeded from one draw of `random`, so
/// random pools pick the same member for every face.
fn collect_quads<M: BakedModel + ?Sized>(model: &M, random: &mut dyn RngCore) -> Vec<BakedQuad> {
    let seed = random.next_u64();
    let faces = Direction::ALL.into_iter().map(Some).chain(std::iter::once(None));

    let mut quads = Vec::new();
    for face in faces {
        let mut face_random = StdRng::seed_from_u64(seed);
        quads.extend(model.quads(face, &mut face_random));
    }
    quads
}

/// Receives quads from a model.
pub trait RenderContext {
    fn emit(&mut self, quad: BakedQuad);

    /// Batched path used for vanilla adapters.
    fn emit_batch(&mut self, quads: Vec<BakedQuad>) {
        for quad in quads {
            self.emit(quad);
        }
    }
}

/// Render context that keeps every quad, counting how each one arrived.
#[derive(Debug, Default)]
pub struct QuadCollector {
    pub quads: Vec<BakedQuad>,
    pub batched: usize,
    pub dispatched: usize,
}

impl QuadCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Textures of every collected quad, in emission order.
    pub fn textures(&self) -> Vec<&Identifier> {
        self.quads.iter().map(|quad| &quad.sprite.texture).collect()
    }
}

impl RenderContext for QuadCollector {
    fn emit(&mut self, quad: BakedQuad) {
        self.dispatched += 1;
        self.quads.push(quad);
    }

    fn emit_batch(&mut self, quads: Vec<BakedQuad>) {
        self.batched += quads.len();
        self.quads.extend(quads);
    }
}

/// Where a block model is being rendered.
#[derive(Debug, Clone, Default)]
pub struct BlockContext {
    pub position: [i32; 3],
    /// Blockstate string, e.g. `minecraft:furnace[facing=north]`.
    pub state: String,
}

/// Item predicates available to override resolution.
#[derive(Debug, Clone, Default)]
pub struct ItemContext {
    pub predicates: BTreeMap<String, f32>,
}

impl ItemContext {
    pub fn with_predicate(mut self, name: impl Into<String>, value: f32) -> Self {
        self.predicates.insert(name.into(), value);
        self
    }
}

/// Emit a block model, taking the batched path for vanilla adapters.
pub fn emit_block_model(
    model: &dyn BakedModel,
    block: &BlockContext,
    random: &mut dyn RngCore,
    context: &mut dyn RenderContext,
) {
    if model.is_vanilla_adapter() {
        context.emit_batch(collect_quads(model, random));
    } else {
        model.emit_block_quads(block, random, context);
    }
}

/// Emit an item model, taking the batched path for vanilla adapters.
pub fn emit_item_model(
    model: &dyn BakedModel,
    item: &ItemContext,
    random: &mut dyn RngCore,
    context: &mut dyn RenderContext,
) {
    if model.is_vanilla_adapter() {
        context.emit_batch(collect_quads(model, random));
    } else {
        model.emit_item_quads(item, random, context);
    }
}

/// A compiled item override.
#[derive(Debug, Clone)]
pub struct CompiledOverride {
    pub predicate: BTreeMap<String, f32>,
    pub model: Identifier,
}

impl CompiledOverride {
    fn matches(&self, item: &ItemContext) -> bool {
        self.predicate.iter().all(|(name, threshold)| {
            item.predicates
                .get(name)
                .map(|value| value >= threshold)
                .unwrap_or(false)
        })
    }
}

/// Item overrides with their targets checked against the model graph.
#[derive(Debug, Clone, Default)]
pub struct ModelOverrideList {
    overrides: Vec<CompiledOverride>,
}

impl ModelOverrideList {
    pub fn empty() -> &'static ModelOverrideList {
        static EMPTY: ModelOverrideList = ModelOverrideList {
            overrides: Vec::new(),
        };
        &EMPTY
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Model to use for `item`; the last matching override wins.
    pub fn resolve(&self, item: &ItemContext) -> Option<&Identifier> {
        self.overrides
            .iter()
            .rev()
            .find(|o| o.matches(item))
            .map(|o| &o.model)
    }
}

/// Compile the overrides `node` inherits, dropping unknown targets.
pub fn compile_overrides(graph: &ModelGraph, node: NodeId) -> ModelOverrideList {
    let overrides = graph
        .overrides(node)
        .iter()
        .filter_map(|o| {
            if graph.lookup(&o.model).is_none() {
                warn!(
                    "Model {} has an override for missing model {}",
                    graph.id(node),
                    o.model
                );
                return None;
            }
            Some(CompiledOverride {
                predicate: o.predicate.clone(),
                model: o.model.clone(),
            })
        })
        .collect();
    ModelOverrideList { overrides }
}

/// The live set of baked models, published once per load.
#[derive(Debug)]
pub struct BakedModelManager {
    models: OnceLock<HashMap<Identifier, Arc<dyn BakedModel>>>,
    missing: Arc<dyn BakedModel>,
}

impl Default for BakedModelManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BakedModelManager {
    pub fn new() -> Self {
        Self {
            models: OnceLock::new(),
            missing: Arc::new(SimpleBakedModel::missing()),
        }
    }

    /// Make the baked models visible to lookups.
    pub fn publish(&self, models: HashMap<Identifier, Arc<dyn BakedModel>>) -> Result<()> {
        let count = models.len();
        self.models
            .set(models)
            .map_err(|_| ModelError::AlreadyPublished)?;
        debug!("Published {} baked models", count);
        Ok(())
    }

    pub fn is_published(&self) -> bool {
        self.models.get().is_some()
    }

    /// The baked model for `id`, or the missing model.
    pub fn get(&self, id: &Identifier) -> Arc<dyn BakedModel> {
        self.try_get(id).unwrap_or_else(|| self.missing.clone())
    }

    pub fn try_get(&self, id: &Identifier) -> Option<Arc<dyn BakedModel>> {
        self.models.get().and_then(|models| models.get(id)).cloned()
    }

    pub fn missing_model(&self) -> Arc<dyn BakedModel> {
        self.missing.clone()
    }

    pub fn len(&self) -> usize {
        self.models.get().map(HashMap::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
