//! Extension payloads layered onto JSON models.
//!
//! A model-level [`ExtensionData`] is versioned; it inherits from the payload
//! of its parent model only when both share the same version. Face-level
//! [`FaceExtension`] data decorates a single element face.

use crate::resolver::{ModelGraph, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Model-level extension payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtensionData {
    /// Payload format version.
    #[serde(default)]
    pub version: u32,

    /// Texture slot -> material name.
    #[serde(default)]
    pub materials: HashMap<String, String>,

    /// Texture slot -> quad tag.
    #[serde(default)]
    pub tags: HashMap<String, i32>,

    /// Node whose payload this one inherits from.
    #[serde(skip)]
    pub(crate) parent: Option<NodeId>,
}

impl ExtensionData {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            ..Default::default()
        }
    }

    pub fn with_material(mut self, slot: impl Into<String>, material: impl Into<String>) -> Self {
        self.materials.insert(slot.into(), material.into());
        self
    }

    pub fn with_tag(mut self, slot: impl Into<String>, tag: i32) -> Self {
        self.tags.insert(slot.into(), tag);
        self
    }

    /// Node this payload inherits from, if the versions matched at link time.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Whether this payload itself defines nothing.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty() && self.tags.is_empty()
    }

    /// Whether this payload and every payload it inherits from are empty.
    pub fn hierarchy_is_empty(&self, graph: &ModelGraph) -> bool {
        self.hierarchy(graph).all(ExtensionData::is_empty)
    }

    /// Material for a texture slot, child payloads overriding parents.
    pub fn material<'a>(&'a self, graph: &'a ModelGraph, slot: &str) -> Option<&'a str> {
        self.hierarchy(graph)
            .find_map(|ext| ext.materials.get(slot))
            .map(String::as_str)
    }

    /// Tag for a texture slot, child payloads overriding parents.
    pub fn tag(&self, graph: &ModelGraph, slot: &str) -> Option<i32> {
        self.hierarchy(graph).find_map(|ext| ext.tags.get(slot).copied())
    }

    /// This payload followed by its ancestors along the extension links.
    pub fn hierarchy<'a>(&'a self, graph: &'a ModelGraph) -> impl Iterator<Item = &'a ExtensionData> + 'a {
        // Bounded by the graph size.
        let limit = graph.len() + 1;
        std::iter::successors(Some(self), move |ext| {
            ext.parent
                .and_then(|node| graph.json(node))
                .and_then(|model| model.extension.as_ref())
        })
        .take(limit)
    }
}

/// Per-face extension overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaceExtension {
    /// Extra texture layers drawn over the base face, as texture references.
    #[serde(default)]
    pub layers: Vec<String>,

    /// ARGB color multiplied into the face.
    #[serde(default)]
    pub color: Option<u32>,

    /// Whether the face ignores world lighting.
    #[serde(default)]
    pub emissive: Option<bool>,

    /// Texture slot whose material and tag apply to this face.
    #[serde(default)]
    pub material: Option<String>,
}

impl FaceExtension {
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
            && self.color.is_none()
            && self.emissive.is_none()
            && self.material.is_none()
    }

    /// Face color as normalized RGBA.
    pub fn color_rgba(&self) -> Option<[f32; 4]> {
        self.color.map(|argb| {
            let channel = |shift: u32| ((argb >> shift) & 0xFF) as f32 / 255.0;
            [channel(16), channel(8), channel(0), channel(24)]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::JsonModel;
    use crate::types::Identifier;

    #[test]
    fn test_face_extension_emptiness() {
        assert!(FaceExtension::default().is_empty());

        let ext = FaceExtension {
            emissive: Some(false),
            ..Default::default()
        };
        assert!(!ext.is_empty());
    }

    #[test]
    fn test_color_rgba() {
        let ext = FaceExtension {
            color: Some(0x80FF0000),
            ..Default::default()
        };
        let rgba = ext.color_rgba().unwrap();
        assert_eq!(rgba[0], 1.0);
        assert_eq!(rgba[1], 0.0);
        assert!((rgba[3] - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_material_lookup_walks_extension_parents() {
        let mut graph = ModelGraph::new();
        let parent = graph.insert_json(
            Identifier::new("block/glowing"),
            JsonModel::new().with_extension(ExtensionData::new(1).with_material("all", "glow").with_tag("all", 7)),
        );
        let child = graph.insert_json(
            Identifier::new("block/child"),
            JsonModel::new()
                .with_parent("block/glowing")
                .with_extension(ExtensionData::new(1).with_material("side", "matte")),
        );
        graph.link_parent(child, parent);

        let ext = graph.json(child).unwrap().extension.as_ref().unwrap();
        assert_eq!(ext.material(&graph, "side"), Some("matte"));
        assert_eq!(ext.material(&graph, "all"), Some("glow"));
        assert_eq!(ext.tag(&graph, "all"), Some(7));
        assert_eq!(ext.material(&graph, "top"), None);
        assert!(!ext.hierarchy_is_empty(&graph));
    }

    #[test]
    fn test_empty_hierarchy() {
        let mut graph = ModelGraph::new();
        let parent = graph.insert_json(
            Identifier::new("block/base"),
            JsonModel::new().with_extension(ExtensionData::new(0)),
        );
        let child = graph.insert_json(
            Identifier::new("block/child"),
            JsonModel::new()
                .with_parent("block/base")
                .with_extension(ExtensionData::new(0)),
        );
        graph.link_parent(child, parent);

        let ext = graph.json(child).unwrap().extension.as_ref().unwrap();
        assert!(ext.hierarchy_is_empty(&graph));
        assert_eq!(ext.hierarchy(&graph).count(), 2);
    }

    #[test]
    fn test_inheritance_passes_through_models_without_payload() {
        let mut graph = ModelGraph::new();
        let base = graph.insert_json(
            Identifier::new("block/glowing"),
            JsonModel::new().with_extension(ExtensionData::new(1).with_material("all", "glow")),
        );
        let middle = graph.insert_json(
            Identifier::new("block/middle"),
            JsonModel::new().with_parent("block/glowing"),
        );
        let child = graph.insert_json(
            Identifier::new("block/child"),
            JsonModel::new()
                .with_parent("block/middle")
                .with_extension(ExtensionData::new(1)),
        );
        assert!(graph.link_parent(child, middle).is_none());
        assert!(graph.link_parent(middle, base).is_none());

        assert_eq!(graph.extension(middle).unwrap().version, 1);
        let ext = graph.extension(child).unwrap();
        assert_eq!(ext.hierarchy(&graph).count(), 3);
        assert_eq!(ext.material(&graph, "all"), Some("glow"));
    }
}
