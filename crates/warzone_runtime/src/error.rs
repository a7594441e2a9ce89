//! Runtime errors

use thiserror::Error;
use warzone_catalog::CatalogError;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{0}")]
    Usage(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scenario: {0}")]
    Scenario(#[from] toml::de::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
