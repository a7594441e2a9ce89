//! Catalog errors

use thiserror::Error;

/// Errors from loading, saving or editing the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Event already exists: {0}")]
    DuplicateEvent(String),

    #[error("Event '{0}' has no usable shape (radius <= 0 and size is zero)")]
    UnsetShape(String),

    #[error("Catalog version {found} is newer than supported version {supported}")]
    VersionMismatch { found: u32, supported: u32 },
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
