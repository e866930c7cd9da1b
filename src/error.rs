//! Error types for model loading and baking.

use thiserror::Error;

/// Result type alias using ModelError.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Main error type for model loading, resolution and baking.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Failed to read or parse a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read or process an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid resource pack structure.
    #[error("Invalid resource pack: {0}")]
    InvalidResourcePack(String),

    /// A JSON model names a parent that is not a JSON model.
    #[error("Model {model} has parent {parent}, but a block model parent has to be a block model")]
    ParentKind { model: String, parent: String },

    /// No unbaked model is registered under the identifier.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The baked model set was already published for this load.
    #[error("Baked models have already been published")]
    AlreadyPublished,
}
