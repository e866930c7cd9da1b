//! Flat item generation.
//!
//! Turns a `layerN` texture definition into a 3D paper-cutout model: one
//! front/back slab per layer plus a thin edge face for every opaque pixel
//! that borders a transparent one. The geometry depends on the pixels of
//! the layer textures, so a retextured item has to be generated again from
//! the remapped definition.

use super::simple::{bake_vanilla, SimpleBakedModel};
use crate::atlas::SpriteAtlas;
use crate::resolver::{ModelGraph, NodeId, GENERATION_MARKER};
use crate::resource_pack::{GuiLight, JsonModel, ModelElement, ModelFace, TextureEntry};
use crate::transform::RetexturedModelTransformer;
use crate::types::{BakeSettings, Direction, Identifier, SpriteIdentifier};
use std::collections::HashMap;

/// Layer slots are read in order until the first gap.
const MAX_LAYERS: usize = 5;

/// Copy of `node`'s definition with every texture slot resolved and remapped.
///
/// The result inherits directly from the generation marker, so it can be
/// generated and baked without the rest of its chain.
pub fn remap_textures(
    graph: &ModelGraph,
    node: NodeId,
    transformer: &RetexturedModelTransformer,
) -> JsonModel {
    let mut slots: Vec<&String> = graph
        .ancestors(node)
        .filter_map(|n| graph.json(n))
        .flat_map(|model| model.textures.keys())
        .collect();
    slots.sort();
    slots.dedup();

    let mut textures = HashMap::new();
    for slot in slots {
        let Some(mut sprite) = graph.resolve_sprite(node, &format!("#{}", slot)) else {
            continue;
        };
        if let Some(target) = transformer.remap(&sprite.texture) {
            sprite = SpriteIdentifier::new(sprite.atlas.clone(), target.clone());
        }
        textures.insert(slot.clone(), TextureEntry::Sprite(sprite));
    }

    let template = graph.json(node);
    JsonModel {
        parent: Some(GENERATION_MARKER.to_string()),
        gui_light: graph
            .ancestors(node)
            .filter_map(|n| graph.json(n))
            .find_map(|model| model.gui_light),
        textures,
        display: template.and_then(|model| model.display.clone()),
        ..JsonModel::default()
    }
}

/// Generate the layered item geometry for a flat item definition.
pub fn generate_item_model(model: &JsonModel, atlas: &SpriteAtlas) -> JsonModel {
    let mut generated = JsonModel {
        parent: model.parent.clone(),
        ambient_occlusion: Some(false),
        gui_light: Some(model.gui_light.unwrap_or(GuiLight::Front)),
        textures: model.textures.clone(),
        display: model.display.clone(),
        overrides: model.overrides.clone(),
        ..JsonModel::default()
    };

    for layer in 0..MAX_LAYERS {
        let slot = format!("layer{}", layer);
        let Some(entry) = model.textures.get(&slot) else {
            break;
        };
        let reference = format!("#{}", slot);
        generated.elements.push(layer_slab(&reference, layer as i32));

        if let TextureEntry::Sprite(sprite) = entry {
            let sprite = atlas.get(sprite);
            let data = &sprite.data;
            generated
                .elements
                .extend(edge_elements(&reference, layer as i32, data.width, data.height, |x, y| {
                    data.is_opaque(x, y)
                }));
        }
    }

    if !generated.textures.contains_key("particle") {
        if let Some(layer0) = model.textures.get("layer0") {
            generated
                .textures
                .insert("particle".to_string(), layer0.clone());
        }
    }

    generated
}

/// Bake a generated definition whose only parent is the generation marker.
pub fn bake_generated_item(
    model: JsonModel,
    model_id: &Identifier,
    atlas: &SpriteAtlas,
    settings: &BakeSettings,
) -> SimpleBakedModel {
    let mut scratch = ModelGraph::new();
    let node = scratch.insert_json(model_id.clone(), model);
    if let Some(marker) = scratch.lookup(&Identifier::new(GENERATION_MARKER)) {
        scratch.link_parent(node, marker);
    }
    bake_vanilla(&scratch, node, atlas, settings, false)
}

/// Front and back faces of one layer.
fn layer_slab(reference: &str, tint: i32) -> ModelElement {
    let face = |uv: [f32; 4]| ModelFace {
        uv: Some(uv),
        tintindex: tint,
        ..ModelFace::new(reference)
    };
    ModelElement::new([0.0, 0.0, 7.5], [16.0, 16.0, 8.5])
        .with_face(Direction::South, face([0.0, 0.0, 16.0, 16.0]))
        .with_face(Direction::North, face([16.0, 0.0, 0.0, 16.0]))
}

/// One zero-thickness edge face per opaque pixel side that borders transparency.
fn edge_elements<F>(reference: &str, tint: i32, width: u32, height: u32, is_opaque: F) -> Vec<ModelElement>
where
    F: Fn(i32, i32) -> bool,
{
    let mut elements = Vec::new();
    if width == 0 || height == 0 {
        return elements;
    }
    let (sx, sy) = (16.0 / width as f32, 16.0 / height as f32);

    for py in 0..height as i32 {
        for px in 0..width as i32 {
            if !is_opaque(px, py) {
                continue;
            }

            let x0 = px as f32 * sx;
            let x1 = (px + 1) as f32 * sx;
            // Image rows grow downward, model Y grows upward.
            let y0 = 16.0 - (py + 1) as f32 * sy;
            let y1 = 16.0 - py as f32 * sy;
            let uv = [x0, py as f32 * sy, x1, (py + 1) as f32 * sy];

            let edges = [
                (px - 1, py, Direction::West, [x0, y0, 7.5], [x0, y1, 8.5]),
                (px + 1, py, Direction::East, [x1, y0, 7.5], [x1, y1, 8.5]),
                (px, py - 1, Direction::Up, [x0, y1, 7.5], [x1, y1, 8.5]),
                (px, py + 1, Direction::Down, [x0, y0, 7.5], [x1, y0, 8.5]),
            ];
            for (nx, ny, direction, from, to) in edges {
                if is_opaque(nx, ny) {
                    continue;
                }
                let face = ModelFace {
                    uv: Some(uv),
                    tintindex: tint,
                    ..ModelFace::new(reference)
                };
                elements.push(ModelElement::new(from, to).with_face(direction, face));
            }
        }
    }

    elements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::TextureData;

    fn face_count(model: &JsonModel) -> usize {
        model.elements.iter().map(|e| e.faces.len()).sum()
    }

    #[test]
    fn test_opaque_square_edge_count() {
        // 2x2 opaque: 2 slab faces + 8 perimeter edges.
        let mut atlas = SpriteAtlas::new();
        atlas.insert(SpriteIdentifier::block("item/square"), TextureData::solid(2, 2, [255, 0, 0, 255]));
        let model = JsonModel::new().with_texture("layer0", "item/square");

        let generated = generate_item_model(&model, &atlas);
        assert_eq!(face_count(&generated), 10);
        assert_eq!(
            generated.textures.get("particle"),
            Some(&TextureEntry::Sprite(SpriteIdentifier::block("item/square")))
        );
        assert_eq!(generated.gui_light, Some(GuiLight::Front));
    }

    #[test]
    fn test_transparent_pixels_have_no_edges() {
        // Top-right pixel transparent.
        let mut data = TextureData::solid(2, 2, [255, 0, 0, 255]);
        data.set_pixel(1, 0, [0, 0, 0, 0]);
        let edges = edge_elements("#layer0", 0, 2, 2, |x, y| data.is_opaque(x, y));

        // TL: W, U, E; BL: W, D; BR: E, D, U.
        assert_eq!(edges.len(), 8);
    }

    #[test]
    fn test_layers_stop_at_first_gap_and_carry_tint() {
        let model = JsonModel::new()
            .with_texture("layer0", "item/a")
            .with_texture("layer1", "item/b")
            .with_texture("layer3", "item/d");

        // Unknown sprites fall back to the 16x16 missing texture, which is fully opaque.
        let generated = generate_item_model(&model, &SpriteAtlas::new());
        let slabs: Vec<_> = generated
            .elements
            .iter()
            .filter(|e| e.faces.contains_key(&Direction::South) && e.from[2] == 7.5 && e.to[2] == 8.5 && e.faces.len() == 2)
            .collect();
        assert_eq!(slabs.len(), 2);
        assert_eq!(slabs[1].faces[&Direction::South].tintindex, 1);
        assert!(!generated
            .elements
            .iter()
            .flat_map(|e| e.faces.values())
            .any(|f| f.texture == "#layer3"));
    }

    #[test]
    fn test_remap_resolves_through_parents() {
        let mut graph = ModelGraph::new();
        let generated = graph.lookup(&Identifier::new(GENERATION_MARKER)).unwrap();
        let handheld = graph.insert_json(
            Identifier::new("item/handheld"),
            JsonModel::new()
                .with_parent(GENERATION_MARKER)
                .with_texture("particle", "#layer0"),
        );
        let sword = graph.insert_json(
            Identifier::new("item/iron_sword"),
            JsonModel::new()
                .with_parent("item/handheld")
                .with_texture("layer0", "item/iron_sword"),
        );
        graph.link_parent(handheld, generated);
        graph.link_parent(sword, handheld);

        let transformer = RetexturedModelTransformer::from_pairs([("item/iron_sword", "item/gold_sword")]);
        let remapped = remap_textures(&graph, sword, &transformer);

        let gold = TextureEntry::Sprite(SpriteIdentifier::block("item/gold_sword"));
        assert_eq!(remapped.textures.get("layer0"), Some(&gold));
        assert_eq!(remapped.textures.get("particle"), Some(&gold));
        assert_eq!(remapped.parent_location(), Some(Identifier::new(GENERATION_MARKER)));
    }
}
