//! Zone engine errors

use crate::ids::{EntityId, ZoneId};
use thiserror::Error;
use warzone_catalog::CatalogError;

/// Why a lifecycle operation did not go through
///
/// Lifecycle entry points report these as `false` plus a debug log; they are
/// never surfaced to players.
#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("Invalid position")]
    InvalidPosition,

    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Event '{0}' is disabled")]
    Disabled(String),

    #[error("Event '{0}' has no usable shape")]
    EmptyShape(String),

    #[error("Zone {0} is already active")]
    AlreadyActive(ZoneId),

    #[error("Zone {0} is not active")]
    NotActive(ZoneId),

    #[error("Zone provider refused zone {0}")]
    ProviderRefused(ZoneId),

    #[error("Vetoed by observer: zone {0}")]
    Vetoed(ZoneId),

    #[error("Zone {0} cannot follow a host (shape has no anchor)")]
    UnsupportedParent(ZoneId),

    #[error("Host {0} not found")]
    MissingHost(EntityId),
}

/// Result type for lifecycle internals
pub type ZoneResult<T> = Result<T, ZoneError>;

/// Admin command failures; `Display` is the text shown to the administrator
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No event named '{0}'")]
    UnknownEvent(String),

    #[error("An event named '{0}' already exists")]
    AlreadyExists(String),

    #[error("'{0}' is not a user-defined event")]
    NotUserEvent(String),

    #[error("'{0}' is not running")]
    NotActive(String),

    #[error("'{0}' is already running")]
    AlreadyActive(String),

    #[error("'{0}' needs a position to start")]
    MissingPosition(String),

    #[error("Edit rejected: '{0}' would have neither a radius nor a size")]
    UnsetShape(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Failed to start '{name}': {source}")]
    StartFailed {
        name: String,
        #[source]
        source: ZoneError,
    },

    #[error("Could not save: {0}")]
    Catalog(#[from] CatalogError),
}
