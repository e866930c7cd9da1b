//! Unbaked model standing for a transformed copy of another model.

use super::item_generator::{bake_generated_item, generate_item_model, remap_textures};
use super::lazy::LazyForwardingModel;
use super::simple::SimpleBakedModel;
use super::{compile_overrides, BakedModel, BakedModelManager};
use crate::atlas::SpriteAtlas;
use crate::resolver::{ModelGraph, GENERATION_MARKER};
use crate::transform::{ModelTransformer, RetexturedModelTransformer};
use crate::types::{BakeSettings, Identifier, SpriteIdentifier};
use log::debug;
use std::sync::Arc;

/// A model whose baked form is `transformer` applied to the live baked
/// `template_id`, computed on first render.
#[derive(Debug)]
pub struct LazyModelDelegate {
    template_id: Identifier,
    transformer: Arc<dyn ModelTransformer>,
    lazy: Arc<LazyForwardingModel>,
}

impl LazyModelDelegate {
    pub fn new(
        template_id: Identifier,
        transformer: Arc<dyn ModelTransformer>,
        manager: Arc<BakedModelManager>,
    ) -> Self {
        // The manager owns the published delegates, so hold it weakly.
        let lazy = {
            let template_id = template_id.clone();
            let transformer = transformer.clone();
            let manager = Arc::downgrade(&manager);
            LazyForwardingModel::new(move || {
                debug!("Deriving model from template {}", template_id);
                let template: Arc<dyn BakedModel> = match manager.upgrade() {
                    Some(manager) => manager.get(&template_id),
                    None => Arc::new(SimpleBakedModel::missing()),
                };
                transformer.transform(template)
            })
        };

        Self {
            template_id,
            transformer,
            lazy: Arc::new(lazy),
        }
    }

    pub fn template_id(&self) -> &Identifier {
        &self.template_id
    }

    pub fn transformer(&self) -> &Arc<dyn ModelTransformer> {
        &self.transformer
    }

    /// No declared model dependencies; the template is loaded by whoever
    /// registered this delegate.
    pub fn model_dependencies(&self) -> Vec<Identifier> {
        Vec::new()
    }

    /// The transformer's textures on the block atlas.
    pub fn texture_dependencies(&self) -> Vec<SpriteIdentifier> {
        self.transformer
            .textures()
            .into_iter()
            .map(SpriteIdentifier::block)
            .collect()
    }

    /// Bake entry point.
    ///
    /// A retexture of a flat generated item is generated and baked right
    /// away from the remapped definition. Everything else bakes to the lazy
    /// forwarding model.
    pub fn bake(
        &self,
        graph: &ModelGraph,
        atlas: &SpriteAtlas,
        settings: &BakeSettings,
        model_id: &Identifier,
    ) -> Arc<dyn BakedModel> {
        if let Some(retexture) = self.transformer.as_retexture() {
            if let Some(baked) = self.bake_generated(retexture, graph, atlas, settings, model_id) {
                return baked;
            }
        }
        self.lazy.clone()
    }

    fn bake_generated(
        &self,
        retexture: &RetexturedModelTransformer,
        graph: &ModelGraph,
        atlas: &SpriteAtlas,
        settings: &BakeSettings,
        model_id: &Identifier,
    ) -> Option<Arc<dyn BakedModel>> {
        let template = graph.lookup(&self.template_id)?;
        graph.json(template)?;
        if !graph.root_is(template, GENERATION_MARKER) {
            return None;
        }

        let remapped = remap_textures(graph, template, retexture);
        let generated = generate_item_model(&remapped, atlas);
        let mut baked = bake_generated_item(generated, model_id, atlas, settings);
        baked.overrides = compile_overrides(graph, template);
        Some(Arc::new(baked))
    }

    /// Whether the lazy path has been evaluated.
    pub fn is_computed(&self) -> bool {
        self.lazy.is_computed()
    }
}
