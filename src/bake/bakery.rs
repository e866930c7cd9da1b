//! The load pipeline: derived-model installation, resolution and baking.

use super::classify::{select_bake_path, BakePath};
use super::extended::ModelSource;
use super::item_generator::{bake_generated_item, generate_item_model, remap_textures};
use super::simple::{bake_vanilla, SimpleBakedModel};
use super::weighted::WeightedBuilder;
use super::{compile_overrides, BakedModel, BakedModelManager, LazyModelDelegate};
use crate::atlas::SpriteAtlas;
use crate::config::{DerivedModelRule, LoadContext};
use crate::error::{ModelError, Result};
use crate::resolver::{
    compute_texture_dependencies, ModelGraph, NodeId, TextureDependencies, UnbakedModel,
    BLOCK_ENTITY_MARKER, GENERATION_MARKER,
};
use crate::resource_pack::{BlockstateDefinition, ModelVariant, ResourcePack};
use crate::transform::RetexturedModelTransformer;
use crate::types::{BakeSettings, Identifier};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Drives one load: owns the unbaked graph and the blockstate variants, and
/// publishes the baked result into a [`BakedModelManager`].
///
/// Call [`resolve_all`](Self::resolve_all) before [`bake_all`](Self::bake_all);
/// baking reads the parent links resolution records.
#[derive(Debug)]
pub struct ModelBakery {
    graph: ModelGraph,
    blockstates: BTreeMap<Identifier, Vec<ModelVariant>>,
    context: LoadContext,
    manager: Arc<BakedModelManager>,
}

impl ModelBakery {
    /// Create a bakery over `graph` and install the context's derived models.
    pub fn new(graph: ModelGraph, context: LoadContext) -> Self {
        let mut bakery = Self {
            graph,
            blockstates: BTreeMap::new(),
            context,
            manager: Arc::new(BakedModelManager::new()),
        };
        bakery.install_derived_models();
        bakery
    }

    /// Create a bakery from every model and blockstate in a resource pack.
    pub fn from_pack(pack: &ResourcePack, context: LoadContext) -> Self {
        let mut bakery = Self::new(ModelGraph::from_pack(pack), context);
        for (block, definition) in pack.iter_blockstates() {
            bakery.add_blockstate(&block, definition);
        }
        bakery
    }

    /// Register every variant of a blockstate as `block#variant`.
    pub fn add_blockstate(&mut self, block: &str, definition: &BlockstateDefinition) {
        let block = Identifier::new(block);
        for (variant, models) in &definition.variants {
            self.blockstates
                .insert(block.with_variant(variant), models.clone());
        }
    }

    pub fn graph(&self) -> &ModelGraph {
        &self.graph
    }

    pub fn context(&self) -> &LoadContext {
        &self.context
    }

    pub fn manager(&self) -> &Arc<BakedModelManager> {
        &self.manager
    }

    fn install_derived_models(&mut self) {
        let rules: Vec<DerivedModelRule> = self.context.derived.rules().cloned().collect();
        let templates: HashMap<&Identifier, &Identifier> = rules
            .iter()
            .map(|rule| (&rule.target, &rule.template))
            .collect();

        let mut installed = Vec::new();
        for rule in &rules {
            if derives_from_itself(&templates, rule) {
                warn!(
                    "Skipping derived model {}: its template {} derives from it",
                    rule.target, rule.template
                );
                continue;
            }
            installed.push(rule);
        }

        for rule in installed {
            if self.graph.lookup(&rule.target).is_some() {
                debug!("Derived model {} replaces a loaded model", rule.target);
            }
            let delegate = LazyModelDelegate::new(
                rule.template.clone(),
                rule.transformer.clone(),
                self.manager.clone(),
            );
            self.graph
                .insert(rule.target.clone(), UnbakedModel::Delegate(Arc::new(delegate)));
            debug!("Installed derived model {} from {}", rule.target, rule.template);
        }
    }

    /// Walk every model's parent chain and collect the textures the load needs.
    ///
    /// Missing parents, cycles and unresolvable textures are reported and
    /// recovered from. A JSON model whose parent is not a JSON model aborts
    /// the load.
    pub fn resolve_all(&mut self) -> Result<TextureDependencies> {
        let mut deps = TextureDependencies::new();
        let nodes: Vec<NodeId> = self.graph.node_ids().collect();
        for node in nodes {
            compute_texture_dependencies(&mut self.graph, node, &mut deps)?;
        }

        for (model, reference) in &deps.errors {
            warn!("Unable to resolve texture reference {} in {}", reference, model);
        }
        debug!(
            "Resolved {} models needing {} sprites",
            self.graph.len(),
            deps.sprites.len()
        );
        Ok(deps)
    }

    /// Bake the model registered under `id`.
    pub fn bake(
        &self,
        id: &Identifier,
        atlas: &SpriteAtlas,
        settings: &BakeSettings,
    ) -> Result<Arc<dyn BakedModel>> {
        let node = self
            .graph
            .lookup(id)
            .ok_or_else(|| ModelError::ModelNotFound(id.to_string()))?;
        Ok(self.bake_node(node, atlas, settings))
    }

    /// Bake one node of the graph.
    pub fn bake_node(
        &self,
        node: NodeId,
        atlas: &SpriteAtlas,
        settings: &BakeSettings,
    ) -> Arc<dyn BakedModel> {
        let graph = &self.graph;
        let id = graph.id(node);

        let model = match &graph.node(node).model {
            UnbakedModel::Delegate(delegate) => {
                return delegate.bake(graph, atlas, settings, id);
            }
            UnbakedModel::Json(model) => model,
        };

        if graph.root_is(node, GENERATION_MARKER) {
            let remapped = remap_textures(graph, node, &RetexturedModelTransformer::default());
            let generated = generate_item_model(&remapped, atlas);
            let mut baked = bake_generated_item(generated, id, atlas, settings);
            baked.overrides = compile_overrides(graph, node);
            return Arc::new(baked);
        }

        let particle = atlas
            .get(&graph.resolve_sprite_or_missing(node, "#particle"))
            .id
            .clone();

        if graph.root_is(node, BLOCK_ENTITY_MARKER) {
            return Arc::new(SimpleBakedModel::builtin(
                particle,
                graph.is_side_lit(node),
                compile_overrides(graph, node),
            ));
        }

        let path = select_bake_path(graph, node, &self.context);
        debug!("Baking {} through the {:?} path", id, path);
        match path {
            BakePath::Vanilla => Arc::new(bake_vanilla(graph, node, atlas, settings, true)),
            BakePath::Extended => {
                let extension = model.extension.clone().unwrap_or_default();
                Arc::new(extension.build_model(
                    compile_overrides(graph, node),
                    true,
                    particle,
                    settings,
                    id,
                    ModelSource { graph, node, atlas },
                ))
            }
        }
    }

    /// Bake every model and blockstate variant and publish the result.
    ///
    /// Returns the manager the derived models read their templates from.
    pub fn bake_all(&self, atlas: &SpriteAtlas) -> Result<Arc<BakedModelManager>> {
        let mut models: HashMap<Identifier, Arc<dyn BakedModel>> = HashMap::new();
        let settings = BakeSettings::default();
        for node in self.graph.node_ids() {
            let id = self.graph.id(node);
            if self.graph.is_marker(id) {
                continue;
            }
            models.insert(id.clone(), self.bake_node(node, atlas, &settings));
        }

        let mut rotated: HashMap<(NodeId, i32, i32), Arc<dyn BakedModel>> = HashMap::new();
        for (id, variants) in &self.blockstates {
            if models.contains_key(id) {
                debug!("Blockstate variant {} is replaced by a derived model", id);
                continue;
            }

            let mut builder = WeightedBuilder::new();
            for variant in variants {
                let location = variant.model_location();
                let Some(node) = self.graph.lookup(&location) else {
                    warn!("Missing model {} referenced by {}", location, id);
                    continue;
                };
                let settings = variant.bake_settings();
                let baked = rotated
                    .entry((node, settings.x, settings.y))
                    .or_insert_with(|| self.bake_node(node, atlas, &settings))
                    .clone();
                builder.add(baked, variant.weight);
            }

            match builder.build() {
                Some(model) => {
                    models.insert(id.clone(), model);
                }
                None => warn!("Blockstate variant {} has no usable models", id),
            }
        }

        info!("Baked {} models", models.len());
        self.manager.publish(models)?;
        Ok(self.manager.clone())
    }
}

/// Whether following rule templates from `rule` leads back to its own target.
fn derives_from_itself(templates: &HashMap<&Identifier, &Identifier>, rule: &DerivedModelRule) -> bool {
    let mut seen = HashSet::new();
    let mut current = &rule.template;
    loop {
        if current == &rule.target {
            return true;
        }
        if !seen.insert(current) {
            return false;
        }
        match templates.get(current) {
            Some(&next) => current = next,
            None => return false,
        }
    }
}
