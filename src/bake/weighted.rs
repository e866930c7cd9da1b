//! Weighted random model pools.

use super::{BakedModel, BakedQuad, BlockContext, ItemContext, ModelOverrideList, RenderContext};
use crate::transform::{DerivableModel, TransformContext};
use crate::types::{Direction, SpriteIdentifier};
use log::warn;
use rand::RngCore;
use std::sync::Arc;

/// One member of a pool.
#[derive(Debug, Clone)]
pub struct WeightedEntry {
    pub model: Arc<dyn BakedModel>,
    pub weight: u32,
}

/// Picks one member per render, proportionally to the weights.
///
/// A pool always holds at least two members with non-zero weights whose sum
/// fits in a `u32`; [`WeightedBuilder`] only builds pools that do.
#[derive(Debug, Clone)]
pub struct WeightedBakedModel {
    entries: Vec<WeightedEntry>,
    total_weight: u32,
    vanilla: bool,
}

impl WeightedBakedModel {
    fn from_entries(entries: Vec<WeightedEntry>, vanilla: bool) -> Self {
        let total_weight = entries.iter().map(|e| e.weight).sum();
        Self {
            entries,
            total_weight,
            vanilla,
        }
    }

    pub fn entries(&self) -> &[WeightedEntry] {
        &self.entries
    }

    pub fn total_weight(&self) -> u32 {
        self.total_weight
    }

    /// Member for a weight value in `0..total_weight`.
    pub fn entry_at(&self, value: u32) -> &Arc<dyn BakedModel> {
        let mut remaining = value;
        for entry in &self.entries {
            if remaining < entry.weight {
                return &entry.model;
            }
            remaining -= entry.weight;
        }
        // `value` is below the total, so the loop always returns.
        &self.entries[self.entries.len() - 1].model
    }

    /// Draw a member.
    pub fn select(&self, random: &mut dyn RngCore) -> &Arc<dyn BakedModel> {
        let value = (random.next_u64() as i32).unsigned_abs() % self.total_weight;
        self.entry_at(value)
    }

    fn first(&self) -> &Arc<dyn BakedModel> {
        &self.entries[0].model
    }
}

impl BakedModel for WeightedBakedModel {
    fn quads(&self, face: Option<Direction>, random: &mut dyn RngCore) -> Vec<BakedQuad> {
        self.select(random).quads(face, random)
    }

    fn use_ambient_occlusion(&self) -> bool {
        self.first().use_ambient_occlusion()
    }

    fn has_depth(&self) -> bool {
        self.first().has_depth()
    }

    fn is_side_lit(&self) -> bool {
        self.first().is_side_lit()
    }

    fn particle_sprite(&self) -> SpriteIdentifier {
        self.first().particle_sprite()
    }

    fn overrides(&self) -> &ModelOverrideList {
        self.first().overrides()
    }

    fn is_builtin(&self) -> bool {
        self.first().is_builtin()
    }

    fn is_vanilla_adapter(&self) -> bool {
        self.vanilla
    }

    fn emit_block_quads(
        &self,
        block: &BlockContext,
        random: &mut dyn RngCore,
        context: &mut dyn RenderContext,
    ) {
        let model = self.select(random).clone();
        model.emit_block_quads(block, random, context);
    }

    fn emit_item_quads(
        &self,
        item: &ItemContext,
        random: &mut dyn RngCore,
        context: &mut dyn RenderContext,
    ) {
        let model = self.select(random).clone();
        model.emit_item_quads(item, random, context);
    }

    fn as_derivable(&self) -> Option<&dyn DerivableModel> {
        Some(self)
    }
}

impl DerivableModel for WeightedBakedModel {
    /// Derive every derivable member; weights are kept as they are.
    ///
    /// The derived pool is a vanilla adapter only if every original member was.
    fn derive(&self, context: &TransformContext) -> Arc<dyn BakedModel> {
        Arc::new(self.derive_pool(context))
    }
}

impl WeightedBakedModel {
    fn derive_pool(&self, context: &TransformContext) -> WeightedBakedModel {
        let mut vanilla = true;
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                vanilla &= entry.model.is_vanilla_adapter();
                let model = match entry.model.as_derivable() {
                    Some(derivable) => derivable.derive(context),
                    None => entry.model.clone(),
                };
                WeightedEntry {
                    model,
                    weight: entry.weight,
                }
            })
            .collect();
        WeightedBakedModel::from_entries(entries, vanilla)
    }
}

/// Collects pool members.
#[derive(Debug, Default)]
pub struct WeightedBuilder {
    entries: Vec<WeightedEntry>,
    total_weight: u32,
}

impl WeightedBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member; zero weights can never be drawn and are skipped.
    ///
    /// A member that would push the total weight past `u32::MAX` is dropped.
    pub fn add(&mut self, model: Arc<dyn BakedModel>, weight: u32) -> &mut Self {
        if weight == 0 {
            return self;
        }
        match self.total_weight.checked_add(weight) {
            Some(total) => {
                self.total_weight = total;
                self.entries.push(WeightedEntry { model, weight });
            }
            None => warn!(
                "Dropping pool member of weight {}: total weight would overflow",
                weight
            ),
        }
        self
    }

    /// `None` when empty, the member itself when there is only one.
    pub fn build(self) -> Option<Arc<dyn BakedModel>> {
        let mut entries = self.entries;
        match entries.len() {
            0 => None,
            1 => entries.pop().map(|entry| entry.model),
            _ => {
                let vanilla = entries.iter().all(|e| e.model.is_vanilla_adapter());
                Some(Arc::new(WeightedBakedModel::from_entries(entries, vanilla)))
            }
        }
    }
}
