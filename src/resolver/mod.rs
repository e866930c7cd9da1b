//! The unbaked model graph.
//!
//! Every loaded model lives in a [`ModelGraph`] arena and is addressed by
//! [`NodeId`]. Parent relationships are not owned references: a JSON model
//! names its parent by identifier, and the parent-chain walk later records
//! the resolved node in the child. Loading is two-phase: insert every node
//! first, then run the walk (see [`parent_chain`]).

pub mod parent_chain;
pub mod textures;

pub use parent_chain::{resolve_parent_chain, GraphAnomaly, ParentChain};
pub use textures::{compute_texture_dependencies, TextureDependencies};

use crate::bake::LazyModelDelegate;
use crate::resource_pack::{ExtensionData, JsonModel, ResourcePack};
use crate::types::Identifier;
use log::warn;
use std::collections::HashMap;
use std::sync::Arc;

/// Identifier of the flat item generation marker model.
pub const GENERATION_MARKER: &str = "minecraft:builtin/generated";

/// Identifier of the block entity marker model.
pub const BLOCK_ENTITY_MARKER: &str = "minecraft:builtin/entity";

/// Index of a node in a [`ModelGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The kinds of unbaked model the graph can hold.
#[derive(Debug, Clone)]
pub enum UnbakedModel {
    /// A model parsed from JSON.
    Json(JsonModel),
    /// A lazily transformed copy of another model.
    Delegate(Arc<LazyModelDelegate>),
}

impl UnbakedModel {
    pub fn as_json(&self) -> Option<&JsonModel> {
        match self {
            UnbakedModel::Json(model) => Some(model),
            UnbakedModel::Delegate(_) => None,
        }
    }

    pub fn as_json_mut(&mut self) -> Option<&mut JsonModel> {
        match self {
            UnbakedModel::Json(model) => Some(model),
            UnbakedModel::Delegate(_) => None,
        }
    }

    /// Models that must be loaded before this one can bake.
    pub fn model_dependencies(&self) -> Vec<Identifier> {
        match self {
            UnbakedModel::Json(model) => model.parent_location().into_iter().collect(),
            UnbakedModel::Delegate(delegate) => delegate.model_dependencies(),
        }
    }
}

/// A model and the identifier it was registered under.
#[derive(Debug, Clone)]
pub struct ModelNode {
    pub id: Identifier,
    pub model: UnbakedModel,
}

/// Arena of unbaked models.
#[derive(Debug, Clone)]
pub struct ModelGraph {
    nodes: Vec<ModelNode>,
    index: HashMap<Identifier, NodeId>,
}

impl Default for ModelGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelGraph {
    /// Create a graph holding only the built-in marker models.
    pub fn new() -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        };
        graph.insert_json(Identifier::new(GENERATION_MARKER), JsonModel::new());
        graph.insert_json(Identifier::new(BLOCK_ENTITY_MARKER), JsonModel::new());
        graph
    }

    /// Build a graph from every model in a resource pack.
    pub fn from_pack(pack: &ResourcePack) -> Self {
        let mut graph = Self::new();
        let mut models: Vec<_> = pack.iter_models().collect();
        models.sort_by(|a, b| a.0.cmp(&b.0));

        for (id, model) in models {
            let id = Identifier::new(id);
            if graph.is_marker(&id) {
                warn!("Ignoring model {} that shadows a built-in marker", id);
                continue;
            }
            graph.insert_json(id, model.clone());
        }
        graph
    }

    /// Register a model, replacing any model already registered under `id`.
    pub fn insert(&mut self, id: Identifier, model: UnbakedModel) -> NodeId {
        if let Some(&node) = self.index.get(&id) {
            self.nodes[node.0].model = model;
            return node;
        }

        let node = NodeId(self.nodes.len());
        self.nodes.push(ModelNode {
            id: id.clone(),
            model,
        });
        self.index.insert(id, node);
        node
    }

    pub fn insert_json(&mut self, id: Identifier, model: JsonModel) -> NodeId {
        self.insert(id, UnbakedModel::Json(model))
    }

    /// The model lookup function: identifier -> node.
    pub fn lookup(&self, id: &Identifier) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    pub fn node(&self, node: NodeId) -> &ModelNode {
        &self.nodes[node.0]
    }

    pub fn id(&self, node: NodeId) -> &Identifier {
        &self.nodes[node.0].id
    }

    pub fn json(&self, node: NodeId) -> Option<&JsonModel> {
        self.nodes.get(node.0).and_then(|n| n.model.as_json())
    }

    /// Extension payload of a JSON model, if it carries one.
    pub fn extension(&self, node: NodeId) -> Option<&ExtensionData> {
        self.json(node).and_then(|model| model.extension.as_ref())
    }

    pub(crate) fn json_mut(&mut self, node: NodeId) -> Option<&mut JsonModel> {
        self.nodes.get_mut(node.0).and_then(|n| n.model.as_json_mut())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn is_marker(&self, id: &Identifier) -> bool {
        id.as_str() == GENERATION_MARKER || id.as_str() == BLOCK_ENTITY_MARKER
    }

    /// Resolved parent of a JSON node.
    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.json(node).and_then(JsonModel::parent_link)
    }

    /// The node followed by its resolved ancestors.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |&n| self.parent_of(n)).take(self.nodes.len())
    }

    /// The last node reachable through resolved parent links.
    pub fn root_model(&self, node: NodeId) -> NodeId {
        self.ancestors(node).last().unwrap_or(node)
    }

    /// Whether the root of `node`'s chain is the marker registered as `marker`.
    pub fn root_is(&self, node: NodeId, marker: &str) -> bool {
        self.id(self.root_model(node)).as_str() == marker
    }

    /// Elements of the nearest ancestor (inclusive) that defines any.
    pub fn elements(&self, node: NodeId) -> &[crate::resource_pack::ModelElement] {
        self.ancestors(node)
            .filter_map(|n| self.json(n))
            .find(|model| model.has_elements())
            .map(|model| model.elements.as_slice())
            .unwrap_or(&[])
    }

    /// Ambient occlusion flag, inherited when a model leaves it unset.
    pub fn ambient_occlusion(&self, node: NodeId) -> bool {
        self.ancestors(node)
            .filter_map(|n| self.json(n))
            .find_map(|model| model.ambient_occlusion)
            .unwrap_or(true)
    }

    /// Whether the model is lit from the side in GUIs, inherited when unset.
    pub fn is_side_lit(&self, node: NodeId) -> bool {
        self.ancestors(node)
            .filter_map(|n| self.json(n))
            .find_map(|model| model.gui_light)
            .map(|light| light == crate::resource_pack::GuiLight::Side)
            .unwrap_or(true)
    }

    /// Item overrides of the nearest ancestor (inclusive) that defines any.
    pub fn overrides(&self, node: NodeId) -> &[crate::resource_pack::ModelOverride] {
        self.ancestors(node)
            .filter_map(|n| self.json(n))
            .find(|model| !model.overrides.is_empty())
            .map(|model| model.overrides.as_slice())
            .unwrap_or(&[])
    }

    /// Record `parent` as the resolved parent of `child`.
    ///
    /// The identity link is always set. A JSON model without a payload is
    /// given an empty one, adopting the version of the payload on the other
    /// side of the link. The extension link is set when both versions match;
    /// a mismatch is reported and leaves the extension link unset.
    pub fn link_parent(&mut self, child: NodeId, parent: NodeId) -> Option<GraphAnomaly> {
        let child_version = self.extension(child).map(|ext| ext.version);
        let parent_version = self.extension(parent).map(|ext| ext.version);
        let version = child_version.or(parent_version).unwrap_or_default();

        let parent_version = match self.json_mut(parent) {
            Some(model) => {
                model
                    .extension
                    .get_or_insert_with(|| ExtensionData::new(version))
                    .version
            }
            None => version,
        };
        let child_id = self.id(child).clone();
        let parent_id = self.id(parent).clone();

        let model = self.json_mut(child)?;
        model.parent_link = Some(parent);

        let ext = model
            .extension
            .get_or_insert_with(|| ExtensionData::new(version));
        if ext.version != parent_version {
            let anomaly = GraphAnomaly::VersionMismatch {
                model: child_id,
                version: ext.version,
                parent: parent_id,
                parent_version,
            };
            warn!("{}", anomaly);
            return Some(anomaly);
        }

        ext.parent = Some(parent);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::{ModelElement, ModelFace};
    use crate::types::Direction;

    #[test]
    fn test_new_graph_has_markers() {
        let graph = ModelGraph::new();
        assert_eq!(graph.len(), 2);
        assert!(graph.lookup(&Identifier::new("builtin/generated")).is_some());
        assert!(graph.lookup(&Identifier::new("builtin/entity")).is_some());
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut graph = ModelGraph::new();
        let a = graph.insert_json(Identifier::new("block/a"), JsonModel::new());
        let b = graph.insert_json(Identifier::new("block/a"), JsonModel::new().with_parent("block/b"));
        assert_eq!(a, b);
        assert!(graph.json(a).unwrap().parent.is_some());
    }

    #[test]
    fn test_inherited_properties_follow_links() {
        let mut graph = ModelGraph::new();
        let mut parent_model = JsonModel::new();
        parent_model.ambient_occlusion = Some(false);
        parent_model.elements.push(
            ModelElement::new([0.0; 3], [16.0; 3]).with_face(Direction::Up, ModelFace::new("#all")),
        );
        let parent = graph.insert_json(Identifier::new("block/parent"), parent_model);
        let child = graph.insert_json(
            Identifier::new("block/child"),
            JsonModel::new().with_parent("block/parent"),
        );

        // Unlinked: nothing is inherited yet.
        assert!(graph.elements(child).is_empty());
        assert!(graph.ambient_occlusion(child));

        graph.link_parent(child, parent);
        assert_eq!(graph.elements(child).len(), 1);
        assert!(!graph.ambient_occlusion(child));
        assert_eq!(graph.root_model(child), parent);
    }
}
