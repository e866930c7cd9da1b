//! JSON model parsing.
//!
//! Models define geometry with cuboid elements and name their textures
//! through slots. A model may inherit from a parent and may carry an
//! extension payload under the `jmx` key, both at model and face level.

use super::extension::{ExtensionData, FaceExtension};
use crate::resolver::NodeId;
use crate::types::{Direction, ElementRotation, Identifier, SpriteIdentifier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A parsed model from models/*.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonModel {
    /// Parent model to inherit from.
    #[serde(default)]
    pub parent: Option<String>,

    /// Whether to use ambient occlusion; inherited when absent.
    #[serde(default, rename = "ambientocclusion")]
    pub ambient_occlusion: Option<bool>,

    /// GUI lighting mode; inherited when absent.
    #[serde(default)]
    pub gui_light: Option<GuiLight>,

    /// Texture slot definitions.
    #[serde(default)]
    pub textures: HashMap<String, TextureEntry>,

    /// Model elements (cuboids).
    #[serde(default)]
    pub elements: Vec<ModelElement>,

    /// Display transforms, passed through untouched.
    #[serde(default)]
    pub display: Option<serde_json::Value>,

    /// Item model overrides.
    #[serde(default)]
    pub overrides: Vec<ModelOverride>,

    /// Extension payload.
    #[serde(default, rename = "jmx")]
    pub extension: Option<ExtensionData>,

    /// Resolved parent, set by the parent-chain walk.
    #[serde(skip)]
    pub(crate) parent_link: Option<NodeId>,
}

impl JsonModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the full parent resource location.
    pub fn parent_location(&self) -> Option<Identifier> {
        self.parent.as_deref().map(Identifier::new)
    }

    /// Resolved parent node, if the chain walk has linked one.
    pub fn parent_link(&self) -> Option<NodeId> {
        self.parent_link
    }

    /// Check if this model has its own elements (not inherited).
    pub fn has_elements(&self) -> bool {
        !self.elements.is_empty()
    }

    /// Whether any face of this model's own elements carries extension data.
    pub fn has_face_extensions(&self) -> bool {
        self.elements
            .iter()
            .flat_map(|element| element.faces.values())
            .any(|face| !face.extension.is_empty())
    }

    /// Builder-style helper used by loaders and tests.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_texture(mut self, slot: impl Into<String>, value: impl Into<String>) -> Self {
        self.textures
            .insert(slot.into(), TextureEntry::from(value.into()));
        self
    }

    pub fn with_extension(mut self, extension: ExtensionData) -> Self {
        self.extension = Some(extension);
        self
    }
}

/// GUI lighting mode of an item model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuiLight {
    Front,
    Side,
}

/// A texture slot value: either a concrete texture or another slot name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TextureEntry {
    Sprite(SpriteIdentifier),
    Reference(String),
}

impl From<String> for TextureEntry {
    fn from(value: String) -> Self {
        match value.strip_prefix('#') {
            Some(slot) => TextureEntry::Reference(slot.to_string()),
            None => TextureEntry::Sprite(SpriteIdentifier::block(value)),
        }
    }
}

impl From<TextureEntry> for String {
    fn from(value: TextureEntry) -> Self {
        match value {
            TextureEntry::Sprite(sprite) => sprite.texture.into(),
            TextureEntry::Reference(slot) => format!("#{}", slot),
        }
    }
}

/// A cuboid element within a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelElement {
    /// Minimum corner (0-16 range).
    pub from: [f32; 3],
    /// Maximum corner (0-16 range).
    pub to: [f32; 3],
    /// Optional rotation.
    #[serde(default)]
    pub rotation: Option<ElementRotation>,
    /// Whether this element receives shade.
    #[serde(default = "default_shade")]
    pub shade: bool,
    /// Face definitions.
    #[serde(default)]
    pub faces: HashMap<Direction, ModelFace>,
}

fn default_shade() -> bool {
    true
}

impl ModelElement {
    pub fn new(from: [f32; 3], to: [f32; 3]) -> Self {
        Self {
            from,
            to,
            rotation: None,
            shade: true,
            faces: HashMap::new(),
        }
    }

    pub fn with_face(mut self, direction: Direction, face: ModelFace) -> Self {
        self.faces.insert(direction, face);
        self
    }

    /// Convert from Minecraft coordinates (0-16) to normalized (-0.5 to 0.5).
    pub fn normalized_from(&self) -> [f32; 3] {
        [
            self.from[0] / 16.0 - 0.5,
            self.from[1] / 16.0 - 0.5,
            self.from[2] / 16.0 - 0.5,
        ]
    }

    pub fn normalized_to(&self) -> [f32; 3] {
        [
            self.to[0] / 16.0 - 0.5,
            self.to[1] / 16.0 - 0.5,
            self.to[2] / 16.0 - 0.5,
        ]
    }
}

/// A face of a model element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFace {
    /// UV coordinates [u1, v1, u2, v2] in 0-16 range.
    #[serde(default)]
    pub uv: Option<[f32; 4]>,
    /// Texture reference (e.g., "#side" or "block/stone").
    pub texture: String,
    /// Face direction for culling.
    #[serde(default)]
    pub cullface: Option<Direction>,
    /// UV rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub rotation: i32,
    /// Tint index for biome coloring (-1 = no tint).
    #[serde(default = "default_tint_index")]
    pub tintindex: i32,
    /// Per-face extension overrides.
    #[serde(default, rename = "jmx")]
    pub extension: FaceExtension,
}

fn default_tint_index() -> i32 {
    -1
}

impl ModelFace {
    pub fn new(texture: impl Into<String>) -> Self {
        Self {
            uv: None,
            texture: texture.into(),
            cullface: None,
            rotation: 0,
            tintindex: -1,
            extension: FaceExtension::default(),
        }
    }

    /// Get normalized UV coordinates (0-1 range), defaulting to the full texture.
    pub fn normalized_uv(&self) -> [f32; 4] {
        let uv = self.uv.unwrap_or([0.0, 0.0, 16.0, 16.0]);
        [uv[0] / 16.0, uv[1] / 16.0, uv[2] / 16.0, uv[3] / 16.0]
    }
}

/// An item override: use `model` when every predicate reaches its threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelOverride {
    #[serde(default)]
    pub predicate: BTreeMap<String, f32>,
    pub model: Identifier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_model() {
        let json = r##"{
            "parent": "block/cube_all",
            "textures": {
                "all": "block/stone",
                "particle": "#all"
            }
        }"##;

        let model: JsonModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.parent_location(), Some(Identifier::new("minecraft:block/cube_all")));
        assert_eq!(
            model.textures.get("all"),
            Some(&TextureEntry::Sprite(SpriteIdentifier::block("block/stone")))
        );
        assert_eq!(
            model.textures.get("particle"),
            Some(&TextureEntry::Reference("all".to_string()))
        );
        assert!(model.extension.is_none());
        assert!(model.parent_link().is_none());
    }

    #[test]
    fn test_parse_model_with_extensions() {
        let json = r##"{
            "jmx": { "version": 1, "materials": { "all": "glow" } },
            "elements": [
                {
                    "from": [0, 0, 0],
                    "to": [16, 16, 16],
                    "faces": {
                        "up": { "texture": "#all", "jmx": { "layers": ["#overlay"], "emissive": true } },
                        "down": { "texture": "#all" }
                    }
                }
            ]
        }"##;

        let model: JsonModel = serde_json::from_str(json).unwrap();
        let ext = model.extension.as_ref().unwrap();
        assert_eq!(ext.version, 1);
        assert_eq!(ext.materials.get("all").map(String::as_str), Some("glow"));

        let faces = &model.elements[0].faces;
        assert!(!faces[&Direction::Up].extension.is_empty());
        assert!(faces[&Direction::Down].extension.is_empty());
        assert!(model.has_face_extensions());
    }

    #[test]
    fn test_parse_overrides() {
        let json = r#"{
            "overrides": [
                { "predicate": { "pulling": 1 }, "model": "item/bow_pulling_0" }
            ]
        }"#;

        let model: JsonModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.overrides.len(), 1);
        assert_eq!(model.overrides[0].model, Identifier::new("item/bow_pulling_0"));
        assert_eq!(model.overrides[0].predicate["pulling"], 1.0);
    }

    #[test]
    fn test_texture_entry_round_trips_through_string() {
        assert_eq!(String::from(TextureEntry::from("#side".to_string())), "#side");
        assert_eq!(
            String::from(TextureEntry::from("block/dirt".to_string())),
            "minecraft:block/dirt"
        );
    }

    #[test]
    fn test_face_uv_normalization() {
        let mut face = ModelFace::new("#test");
        face.uv = Some([0.0, 0.0, 8.0, 8.0]);
        assert_eq!(face.normalized_uv(), [0.0, 0.0, 0.5, 0.5]);
        assert_eq!(ModelFace::new("#test").normalized_uv(), [0.0, 0.0, 1.0, 1.0]);
    }
}
