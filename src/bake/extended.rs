//! The extended bake path.
//!
//! Builds a model from a JSON definition plus its extension payload: face
//! extension layers become extra quads, and each quad picks up the color,
//! emissive flag, material and tag its face and payload hierarchy define.

use super::geometry::{bake_face, BakedQuad};
use super::simple::SimpleBakedModel;
use super::{BakedModel, ModelOverrideList};
use crate::atlas::SpriteAtlas;
use crate::resolver::{ModelGraph, NodeId};
use crate::resource_pack::{ExtensionData, ModelFace};
use crate::transform::{DerivableModel, TransformContext};
use crate::types::{BakeSettings, Direction, Identifier, SpriteIdentifier};
use rand::RngCore;
use std::sync::Arc;

/// Where an extended model's definition and sprites come from.
#[derive(Debug, Clone, Copy)]
pub struct ModelSource<'a> {
    pub graph: &'a ModelGraph,
    pub node: NodeId,
    pub atlas: &'a SpriteAtlas,
}

impl ModelSource<'_> {
    fn sprite(&self, reference: &str) -> SpriteIdentifier {
        let resolved = self.graph.resolve_sprite_or_missing(self.node, reference);
        self.atlas.get(&resolved).id.clone()
    }
}

/// A model baked through the extension pipeline.
#[derive(Debug, Clone)]
pub struct ExtendedBakedModel {
    id: Identifier,
    geometry: SimpleBakedModel,
}

impl ExtendedBakedModel {
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn quad_count(&self) -> usize {
        self.geometry.quad_count()
    }

    pub fn all_quads(&self) -> impl Iterator<Item = &BakedQuad> {
        self.geometry.all_quads()
    }
}

impl BakedModel for ExtendedBakedModel {
    fn quads(&self, face: Option<Direction>, random: &mut dyn RngCore) -> Vec<BakedQuad> {
        self.geometry.quads(face, random)
    }

    fn use_ambient_occlusion(&self) -> bool {
        self.geometry.ambient_occlusion
    }

    fn has_depth(&self) -> bool {
        self.geometry.has_depth
    }

    fn is_side_lit(&self) -> bool {
        self.geometry.side_lit
    }

    fn particle_sprite(&self) -> SpriteIdentifier {
        self.geometry.particle.clone()
    }

    fn overrides(&self) -> &ModelOverrideList {
        &self.geometry.overrides
    }

    fn is_vanilla_adapter(&self) -> bool {
        false
    }

    fn as_derivable(&self) -> Option<&dyn DerivableModel> {
        Some(self)
    }
}

impl DerivableModel for ExtendedBakedModel {
    fn derive(&self, context: &TransformContext) -> Arc<dyn BakedModel> {
        let mut geometry = SimpleBakedModel {
            general: Vec::new(),
            faces: Default::default(),
            particle: context.remap_sprite(&self.geometry.particle),
            ..self.geometry.clone()
        };
        for quad in self.geometry.all_quads() {
            geometry.add_quad(quad.with_sprite(context.remap_sprite(&quad.sprite)));
        }
        Arc::new(ExtendedBakedModel {
            id: self.id.clone(),
            geometry,
        })
    }
}

impl ExtensionData {
    /// Construct the baked model for a definition carrying this payload.
    pub fn build_model(
        &self,
        overrides: ModelOverrideList,
        has_depth: bool,
        particle: SpriteIdentifier,
        settings: &BakeSettings,
        model_id: &Identifier,
        source: ModelSource<'_>,
    ) -> ExtendedBakedModel {
        let graph = source.graph;
        let mut geometry = SimpleBakedModel {
            ambient_occlusion: graph.ambient_occlusion(source.node),
            has_depth,
            side_lit: graph.is_side_lit(source.node),
            particle,
            overrides,
            ..SimpleBakedModel::missing()
        };

        for element in graph.elements(source.node) {
            for direction in Direction::ALL {
                let Some(face) = element.faces.get(&direction) else {
                    continue;
                };
                let base = bake_face(element, direction, face, source.sprite(&face.texture), settings);
                let base = self.decorate(base, face, graph);

                for layer in &face.extension.layers {
                    geometry.add_quad(base.with_sprite(source.sprite(layer)));
                }
                geometry.add_quad(base);
            }
        }

        ExtendedBakedModel {
            id: model_id.clone(),
            geometry,
        }
    }

    /// Apply face extension data and the payload's material and tag.
    fn decorate(&self, mut quad: BakedQuad, face: &ModelFace, graph: &ModelGraph) -> BakedQuad {
        let extension = &face.extension;
        let slot = extension
            .material
            .as_deref()
            .unwrap_or_else(|| face.texture.trim_start_matches('#'));

        quad.material = self.material(graph, slot).map(str::to_string);
        quad.tag = self.tag(graph, slot);
        quad.emissive = extension.emissive.unwrap_or(false);
        match extension.color_rgba() {
            Some(color) => quad.with_color(color),
            None => quad,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::{FaceExtension, JsonModel, ModelElement, TextureData};

    fn atlas(textures: &[&str]) -> SpriteAtlas {
        let mut atlas = SpriteAtlas::new();
        for texture in textures {
            atlas.insert(SpriteIdentifier::block(*texture), TextureData::placeholder());
        }
        atlas
    }

    fn glowing_graph() -> (ModelGraph, NodeId) {
        let mut graph = ModelGraph::new();
        let parent = graph.insert_json(
            Identifier::new("block/glow_base"),
            JsonModel::new().with_extension(ExtensionData::new(1).with_material("all", "glow").with_tag("all", 3)),
        );

        let mut up = ModelFace::new("#all");
        up.extension = FaceExtension {
            layers: vec!["#overlay".to_string()],
            color: Some(0xFF00FF00),
            emissive: Some(true),
            material: None,
        };
        let mut model = JsonModel::new()
            .with_parent("block/glow_base")
            .with_texture("all", "block/stone")
            .with_texture("overlay", "block/glow_overlay")
            .with_extension(ExtensionData::new(1));
        model.elements.push(
            ModelElement::new([0.0; 3], [16.0; 3])
                .with_face(Direction::Up, up)
                .with_face(Direction::Down, ModelFace::new("#all")),
        );
        let child = graph.insert_json(Identifier::new("block/glowing_stone"), model);
        graph.link_parent(child, parent);
        (graph, child)
    }

    fn build(graph: &ModelGraph, node: NodeId, atlas: &SpriteAtlas) -> ExtendedBakedModel {
        let ext = graph.json(node).unwrap().extension.clone().unwrap();
        ext.build_model(
            ModelOverrideList::default(),
            true,
            SpriteIdentifier::block("block/stone"),
            &BakeSettings::default(),
            graph.id(node),
            ModelSource { graph, node, atlas },
        )
    }

    #[test]
    fn test_layers_become_extra_quads() {
        let (graph, node) = glowing_graph();
        let model = build(&graph, node, &atlas(&["block/stone", "block/glow_overlay"]));

        assert_eq!(model.quad_count(), 3);
        assert!(!model.is_vanilla_adapter());

        let overlay: Vec<_> = model
            .all_quads()
            .filter(|q| q.sprite == SpriteIdentifier::block("block/glow_overlay"))
            .collect();
        assert_eq!(overlay.len(), 1);
        assert!(overlay[0].emissive);
        assert_eq!(overlay[0].vertices[0].color, [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_material_comes_from_extension_parent() {
        let (graph, node) = glowing_graph();
        let model = build(&graph, node, &atlas(&["block/stone", "block/glow_overlay"]));

        for quad in model.all_quads() {
            assert_eq!(quad.material.as_deref(), Some("glow"));
            assert_eq!(quad.tag, Some(3));
        }
        let down: Vec<_> = model.all_quads().filter(|q| q.face == Direction::Down).collect();
        assert!(!down[0].emissive);
    }

    #[test]
    fn test_derive_remaps_sprites() {
        let (graph, node) = glowing_graph();
        let model = build(&graph, node, &atlas(&["block/stone", "block/glow_overlay"]));

        let context = TransformContext::retexture(
            &[(Identifier::new("block/stone"), Identifier::new("block/granite"))]
                .into_iter()
                .collect(),
        );
        let derived = model.derive(&context);
        let textures = crate::bake::test_support::textures_of(derived.as_ref());

        assert_eq!(textures.len(), 3);
        assert!(!textures.contains(&"minecraft:block/stone".to_string()));
        assert!(textures.contains(&"minecraft:block/granite".to_string()));
        assert_eq!(derived.particle_sprite(), SpriteIdentifier::block("block/granite"));
    }
}
