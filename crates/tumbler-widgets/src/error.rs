//! Error types for tumbler-widgets.

use thiserror::Error;

/// Failure reported for a thumb image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// The provider could not decode the image bytes.
    #[error("image decode failed: {0}")]
    Decode(String),

    /// The decode was cancelled before it completed.
    #[error("image decode cancelled")]
    Cancelled,

    /// The image format is not supported by the provider.
    #[error("unsupported image: {0}")]
    Unsupported(String),
}

/// Errors raised while loading or validating a toggle style.
#[derive(Debug, Error)]
pub enum StyleError {
    /// Malformed YAML style document.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Malformed JSON style document.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A geometry constant is out of range.
    #[error("invalid geometry: {field} = {value}")]
    InvalidGeometry {
        /// Offending field name
        field: &'static str,
        /// Offending value
        value: f32,
    },
}
