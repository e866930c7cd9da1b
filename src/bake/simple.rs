//! The host's plain bake path.

use super::geometry::{bake_face, BakedQuad};
use super::{compile_overrides, BakedModel, ModelOverrideList};
use crate::atlas::SpriteAtlas;
use crate::resolver::{ModelGraph, NodeId};
use crate::types::{BakeSettings, Direction, SpriteIdentifier};
use rand::RngCore;
use std::collections::HashMap;

/// A baked model with fixed quads, as produced by the host.
#[derive(Debug, Clone)]
pub struct SimpleBakedModel {
    /// Quads without a cull face.
    pub general: Vec<BakedQuad>,
    /// Quads culled by a neighbor in the keyed direction.
    pub faces: HashMap<Direction, Vec<BakedQuad>>,
    pub ambient_occlusion: bool,
    pub has_depth: bool,
    pub side_lit: bool,
    pub particle: SpriteIdentifier,
    pub overrides: ModelOverrideList,
    pub builtin: bool,
}

impl SimpleBakedModel {
    /// Model drawn for anything that failed to resolve.
    pub fn missing() -> Self {
        Self {
            general: Vec::new(),
            faces: HashMap::new(),
            ambient_occlusion: true,
            has_depth: true,
            side_lit: true,
            particle: SpriteIdentifier::missing(),
            overrides: ModelOverrideList::default(),
            builtin: false,
        }
    }

    /// Placeholder for models drawn by a block entity renderer.
    pub fn builtin(particle: SpriteIdentifier, side_lit: bool, overrides: ModelOverrideList) -> Self {
        Self {
            particle,
            side_lit,
            overrides,
            builtin: true,
            ..Self::missing()
        }
    }

    pub fn add_quad(&mut self, quad: BakedQuad) {
        match quad.cull_face {
            Some(face) => self.faces.entry(face).or_default().push(quad),
            None => self.general.push(quad),
        }
    }

    pub fn quad_count(&self) -> usize {
        self.general.len() + self.faces.values().map(Vec::len).sum::<usize>()
    }

    /// Every quad, culled ones first in direction order.
    pub fn all_quads(&self) -> impl Iterator<Item = &BakedQuad> {
        Direction::ALL
            .iter()
            .filter_map(|face| self.faces.get(face))
            .flatten()
            .chain(self.general.iter())
    }
}

impl BakedModel for SimpleBakedModel {
    fn quads(&self, face: Option<Direction>, _random: &mut dyn RngCore) -> Vec<BakedQuad> {
        match face {
            Some(face) => self.faces.get(&face).cloned().unwrap_or_default(),
            None => self.general.clone(),
        }
    }

    fn use_ambient_occlusion(&self) -> bool {
        self.ambient_occlusion
    }

    fn has_depth(&self) -> bool {
        self.has_depth
    }

    fn is_side_lit(&self) -> bool {
        self.side_lit
    }

    fn particle_sprite(&self) -> SpriteIdentifier {
        self.particle.clone()
    }

    fn overrides(&self) -> &ModelOverrideList {
        &self.overrides
    }

    fn is_builtin(&self) -> bool {
        self.builtin
    }
}

/// Bake `node` the way the host does, without any extension data.
pub fn bake_vanilla(
    graph: &ModelGraph,
    node: NodeId,
    atlas: &SpriteAtlas,
    settings: &BakeSettings,
    has_depth: bool,
) -> SimpleBakedModel {
    let mut model = SimpleBakedModel {
        ambient_occlusion: graph.ambient_occlusion(node),
        has_depth,
        side_lit: graph.is_side_lit(node),
        particle: atlas
            .get(&graph.resolve_sprite_or_missing(node, "#particle"))
            .id
            .clone(),
        overrides: compile_overrides(graph, node),
        ..SimpleBakedModel::missing()
    };

    for element in graph.elements(node) {
        for direction in Direction::ALL {
            let Some(face) = element.faces.get(&direction) else {
                continue;
            };
            let sprite = atlas
                .get(&graph.resolve_sprite_or_missing(node, &face.texture))
                .id
                .clone();
            model.add_quad(bake_face(element, direction, face, sprite, settings));
        }
    }

    model
}
