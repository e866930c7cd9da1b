//! Shared types used throughout the library.

mod direction;
mod transform;

pub use direction::{Axis, Direction};
pub use transform::{BakeSettings, ElementRotation};

use serde::{Deserialize, Serialize};

/// Namespace used when a resource location omits one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A namespaced resource location, e.g. `minecraft:block/stone`.
///
/// Identifiers are always stored in normalized `namespace:path` form, so two
/// spellings of the same location compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    pub fn new(location: impl AsRef<str>) -> Self {
        let location = location.as_ref();
        if location.contains(':') {
            Self(location.to_string())
        } else {
            Self(format!("{}:{}", DEFAULT_NAMESPACE, location))
        }
    }

    /// Identifier of a single blockstate variant, e.g. `minecraft:furnace#facing=north`.
    pub fn with_variant(&self, variant: &str) -> Self {
        Self(format!("{}#{}", self.0, variant))
    }

    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map(|(ns, _)| ns).unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn path(&self) -> &str {
        self.0.split_once(':').map(|(_, path)| path).unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A texture located inside a specific atlas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteIdentifier {
    pub atlas: Identifier,
    pub texture: Identifier,
}

impl SpriteIdentifier {
    /// The atlas all block and item model textures are stitched into.
    pub const BLOCK_ATLAS: &'static str = "minecraft:textures/atlas/blocks.png";

    /// Texture used when a slot cannot be resolved.
    pub const MISSING_TEXTURE: &'static str = "minecraft:missingno";

    pub fn new(atlas: impl Into<Identifier>, texture: impl Into<Identifier>) -> Self {
        Self {
            atlas: atlas.into(),
            texture: texture.into(),
        }
    }

    /// A texture on the block atlas.
    pub fn block(texture: impl Into<Identifier>) -> Self {
        Self::new(Self::BLOCK_ATLAS, texture)
    }

    pub fn missing() -> Self {
        Self::block(Self::MISSING_TEXTURE)
    }

    pub fn is_missing(&self) -> bool {
        self.texture.as_str() == Self::MISSING_TEXTURE
    }
}

impl std::fmt::Display for SpriteIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.texture, self.atlas)
    }
}
