//! Texture slot resolution and texture-dependency computation.

use super::{resolve_parent_chain, ModelGraph, NodeId, ParentChain, UnbakedModel};
use crate::error::Result;
use crate::resource_pack::TextureEntry;
use crate::types::SpriteIdentifier;
use std::collections::BTreeSet;

/// Maximum `#slot` indirections followed before giving up.
const MAX_TEXTURE_DEPTH: usize = 10;

/// Sprites a set of models needs, plus the slots that failed to resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureDependencies {
    pub sprites: BTreeSet<SpriteIdentifier>,
    /// `(model id, texture reference)` pairs that could not be resolved.
    pub errors: BTreeSet<(String, String)>,
}

impl TextureDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: TextureDependencies) {
        self.sprites.extend(other.sprites);
        self.errors.extend(other.errors);
    }
}

/// Collect the texture dependencies of one model into `deps`.
///
/// For JSON models this first walks the parent chain (linking parents as a
/// side effect), then resolves every face texture and every face-extension
/// layer against the now-linked hierarchy. A delegate contributes its
/// transformer's textures.
pub fn compute_texture_dependencies(
    graph: &mut ModelGraph,
    node: NodeId,
    deps: &mut TextureDependencies,
) -> Result<ParentChain> {
    if let UnbakedModel::Delegate(delegate) = &graph.node(node).model {
        deps.sprites.extend(delegate.texture_dependencies());
        return Ok(ParentChain {
            visited: vec![node],
            anomalies: Vec::new(),
        });
    }

    let chain = resolve_parent_chain(graph, node)?;
    let graph = &*graph;
    let model_id = graph.id(node).to_string();

    let require = |reference: &str, deps: &mut TextureDependencies| {
        match graph.resolve_sprite(node, reference) {
            Some(sprite) => {
                deps.sprites.insert(sprite);
            }
            None => {
                deps.errors.insert((model_id.clone(), reference.to_string()));
            }
        }
    };

    for element in graph.elements(node) {
        for face in element.faces.values() {
            require(&face.texture, deps);
            for layer in &face.extension.layers {
                require(layer, deps);
            }
        }
    }

    if let Some(particle) = graph.resolve_sprite(node, "#particle") {
        deps.sprites.insert(particle);
    }

    Ok(chain)
}

impl ModelGraph {
    /// Look up a texture slot in `node` and then its resolved ancestors.
    pub fn texture_entry(&self, node: NodeId, slot: &str) -> Option<&TextureEntry> {
        self.ancestors(node)
            .filter_map(|n| self.json(n))
            .find_map(|model| model.textures.get(slot))
    }

    /// Resolve a texture reference (`#slot` or a direct texture path) to a sprite.
    ///
    /// Follows chains like `#side -> #all -> block/stone` across the whole
    /// hierarchy. Returns `None` for unknown slots and overly deep chains.
    pub fn resolve_sprite(&self, node: NodeId, reference: &str) -> Option<SpriteIdentifier> {
        let mut slot = match reference.strip_prefix('#') {
            Some(slot) => slot,
            None => return Some(SpriteIdentifier::block(reference)),
        };

        for _ in 0..MAX_TEXTURE_DEPTH {
            match self.texture_entry(node, slot)? {
                TextureEntry::Sprite(sprite) => return Some(sprite.clone()),
                TextureEntry::Reference(next) => slot = next.as_str(),
            }
        }
        None
    }

    /// Like [`resolve_sprite`](Self::resolve_sprite), falling back to the missing texture.
    pub fn resolve_sprite_or_missing(&self, node: NodeId, reference: &str) -> SpriteIdentifier {
        self.resolve_sprite(node, reference)
            .unwrap_or_else(SpriteIdentifier::missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::{FaceExtension, JsonModel, ModelElement, ModelFace};
    use crate::types::{Direction, Identifier};

    fn cube_all() -> JsonModel {
        let mut face = ModelFace::new("#all");
        face.extension = FaceExtension {
            layers: vec!["#overlay".to_string()],
            ..Default::default()
        };
        let mut model = JsonModel::new().with_texture("particle", "#all");
        model.elements.push(
            ModelElement::new([0.0; 3], [16.0; 3])
                .with_face(Direction::Up, face)
                .with_face(Direction::Down, ModelFace::new("#all")),
        );
        model
    }

    #[test]
    fn test_resolve_texture_chain_across_parents() {
        let mut graph = ModelGraph::new();
        graph.insert_json(Identifier::new("block/cube_all"), cube_all());
        let stone = graph.insert_json(
            Identifier::new("block/stone"),
            JsonModel::new()
                .with_parent("block/cube_all")
                .with_texture("all", "block/stone"),
        );

        let mut deps = TextureDependencies::new();
        compute_texture_dependencies(&mut graph, stone, &mut deps).unwrap();

        // particle -> #all -> block/stone
        assert_eq!(
            graph.resolve_sprite(stone, "#particle"),
            Some(SpriteIdentifier::block("block/stone"))
        );
        assert!(deps.sprites.contains(&SpriteIdentifier::block("block/stone")));
        // The overlay layer has no slot anywhere in the hierarchy.
        assert_eq!(
            deps.errors,
            [("minecraft:block/stone".to_string(), "#overlay".to_string())]
                .into_iter()
                .collect()
        );
    }

    #[test]
    fn test_extension_layers_add_dependencies() {
        let mut graph = ModelGraph::new();
        graph.insert_json(Identifier::new("block/cube_all"), cube_all());
        let glowing = graph.insert_json(
            Identifier::new("block/glowing_stone"),
            JsonModel::new()
                .with_parent("block/cube_all")
                .with_texture("all", "block/stone")
                .with_texture("overlay", "block/glow_overlay"),
        );

        let mut deps = TextureDependencies::new();
        compute_texture_dependencies(&mut graph, glowing, &mut deps).unwrap();

        assert!(deps.errors.is_empty());
        assert!(deps.sprites.contains(&SpriteIdentifier::block("block/glow_overlay")));
        assert_eq!(deps.sprites.len(), 2);
    }

    #[test]
    fn test_direct_and_missing_references() {
        let mut graph = ModelGraph::new();
        let model = graph.insert_json(
            Identifier::new("block/loop"),
            JsonModel::new()
                .with_texture("a", "#b")
                .with_texture("b", "#a"),
        );

        assert_eq!(
            graph.resolve_sprite(model, "block/dirt"),
            Some(SpriteIdentifier::block("block/dirt"))
        );
        assert_eq!(graph.resolve_sprite(model, "#a"), None);
        assert_eq!(graph.resolve_sprite(model, "#missing"), None);
        assert!(graph.resolve_sprite_or_missing(model, "#missing").is_missing());
    }
}
