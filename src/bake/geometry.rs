//! Baked quad geometry.

use crate::resource_pack::{ModelElement, ModelFace};
use crate::types::{BakeSettings, Direction, SpriteIdentifier};
use glam::Vec3;

/// A vertex of a baked quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in block space (0 to 1).
    pub position: [f32; 3],
    /// Normal vector.
    pub normal: [f32; 3],
    /// Sprite-local texture coordinates (0 to 1).
    pub uv: [f32; 2],
    /// Vertex color (RGBA).
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new([0.0; 3], [0.0, 1.0, 0.0], [0.0; 2])
    }
}

/// One renderer-ready quad.
#[derive(Debug, Clone, PartialEq)]
pub struct BakedQuad {
    pub vertices: [Vertex; 4],
    /// Direction the quad faces after bake rotation.
    pub face: Direction,
    /// Neighbor direction that hides this quad, if any.
    pub cull_face: Option<Direction>,
    pub sprite: SpriteIdentifier,
    /// Tint index for biome coloring (-1 = no tint).
    pub tint_index: i32,
    pub shade: bool,
    /// Material name from the extension hierarchy.
    pub material: Option<String>,
    /// Quad tag from the extension hierarchy.
    pub tag: Option<i32>,
    /// Whether the quad ignores world lighting.
    pub emissive: bool,
}

impl BakedQuad {
    pub fn has_tint(&self) -> bool {
        self.tint_index >= 0
    }

    /// Copy of this quad drawing `sprite` instead.
    pub fn with_sprite(&self, sprite: SpriteIdentifier) -> Self {
        Self {
            sprite,
            ..self.clone()
        }
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        for vertex in &mut self.vertices {
            vertex.color = color;
        }
        self
    }
}

/// Bake one element face into a quad.
///
/// Applies the face UV rotation, the element rotation and finally the
/// whole-model bake rotation. The cull face is rotated with the model.
pub fn bake_face(
    element: &ModelElement,
    direction: Direction,
    face: &ModelFace,
    sprite: SpriteIdentifier,
    settings: &BakeSettings,
) -> BakedQuad {
    let (positions, uvs) = face_vertices(
        direction,
        element.normalized_from(),
        element.normalized_to(),
        face.normalized_uv(),
        face.rotation,
    );

    let normal = settings.apply(Vec3::from(direction.normal()));
    let vertices = std::array::from_fn(|i| {
        let mut position = Vec3::from(positions[i]);
        if let Some(rotation) = &element.rotation {
            position = rotation.apply(position);
        }
        let position = settings.apply(position) + Vec3::splat(0.5);
        Vertex::new(position.into(), normal.into(), uvs[i])
    });

    BakedQuad {
        vertices,
        face: direction.rotate_by(settings),
        cull_face: face.cullface.map(|cull| cull.rotate_by(settings)),
        sprite,
        tint_index: face.tintindex,
        shade: element.shade,
        material: None,
        tag: None,
        emissive: false,
    }
}

/// The four corners of a face and their UVs, in CCW order.
fn face_vertices(
    direction: Direction,
    from: [f32; 3],
    to: [f32; 3],
    uv: [f32; 4],
    rotation: i32,
) -> ([[f32; 3]; 4], [[f32; 2]; 4]) {
    let (u1, v1, u2, v2) = (uv[0], uv[1], uv[2], uv[3]);
    // top-left, top-right, bottom-right, bottom-left
    let uvs = rotate_uvs([[u1, v1], [u2, v1], [u2, v2], [u1, v2]], rotation);

    let positions = match direction {
        Direction::Down => [
            [from[0], from[1], to[2]],
            [to[0], from[1], to[2]],
            [to[0], from[1], from[2]],
            [from[0], from[1], from[2]],
        ],
        Direction::Up => [
            [from[0], to[1], from[2]],
            [to[0], to[1], from[2]],
            [to[0], to[1], to[2]],
            [from[0], to[1], to[2]],
        ],
        Direction::North => [
            [to[0], to[1], from[2]],
            [from[0], to[1], from[2]],
            [from[0], from[1], from[2]],
            [to[0], from[1], from[2]],
        ],
        Direction::South => [
            [from[0], to[1], to[2]],
            [to[0], to[1], to[2]],
            [to[0], from[1], to[2]],
            [from[0], from[1], to[2]],
        ],
        Direction::West => [
            [from[0], to[1], from[2]],
            [from[0], to[1], to[2]],
            [from[0], from[1], to[2]],
            [from[0], from[1], from[2]],
        ],
        Direction::East => [
            [to[0], to[1], to[2]],
            [to[0], to[1], from[2]],
            [to[0], from[1], from[2]],
            [to[0], from[1], to[2]],
        ],
    };

    (positions, uvs)
}

fn rotate_uvs(uvs: [[f32; 2]; 4], rotation: i32) -> [[f32; 2]; 4] {
    let steps = ((rotation / 90) % 4 + 4) % 4;
    let mut result = uvs;
    for _ in 0..steps {
        result = [result[3], result[0], result[1], result[2]];
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_cube() -> ModelElement {
        ModelElement::new([0.0; 3], [16.0; 3])
    }

    #[test]
    fn test_rotate_uvs() {
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        assert_eq!(rotate_uvs(uvs, 0), uvs);

        let rotated_90 = rotate_uvs(uvs, 90);
        assert_eq!(rotated_90[0], uvs[3]);
        assert_eq!(rotated_90[1], uvs[0]);

        let rotated_180 = rotate_uvs(uvs, 180);
        assert_eq!(rotated_180[0], uvs[2]);
        assert_eq!(rotated_180[2], uvs[0]);
    }

    #[test]
    fn test_bake_up_face_in_block_space() {
        let quad = bake_face(
            &full_cube(),
            Direction::Up,
            &ModelFace::new("#all"),
            SpriteIdentifier::block("block/stone"),
            &BakeSettings::default(),
        );

        assert_eq!(quad.face, Direction::Up);
        assert!(quad.vertices.iter().all(|v| (v.position[1] - 1.0).abs() < 1e-6));
        assert_eq!(quad.vertices[0].normal, [0.0, 1.0, 0.0]);
        assert!(!quad.has_tint());
    }

    #[test]
    fn test_bake_settings_rotate_face_and_cull_face() {
        let mut face = ModelFace::new("#side");
        face.cullface = Some(Direction::North);
        let quad = bake_face(
            &full_cube(),
            Direction::North,
            &face,
            SpriteIdentifier::block("block/furnace_front"),
            &BakeSettings::new(0, 90),
        );

        assert_eq!(quad.face, Direction::East);
        assert_eq!(quad.cull_face, Some(Direction::East));
        assert!(quad.vertices.iter().all(|v| (v.position[0] - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_with_sprite_keeps_geometry() {
        let quad = bake_face(
            &full_cube(),
            Direction::South,
            &ModelFace::new("#all"),
            SpriteIdentifier::block("block/stone"),
            &BakeSettings::default(),
        );
        let retextured = quad.with_sprite(SpriteIdentifier::block("block/granite"));
        assert_eq!(retextured.vertices, quad.vertices);
        assert_eq!(retextured.sprite.texture.as_str(), "minecraft:block/granite");
    }
}
