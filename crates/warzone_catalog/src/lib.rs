//! Warzone Catalog - Event Definitions and Persistence
//!
//! Static and administrator-edited configuration for every event family
//! that can own a combat zone.
//!
//! # Features
//!
//! - `EventDefinition`: timing, shape and integration flags per event
//! - `ZoneShape`: sphere or box with optional parent anchor capability
//! - `EventCatalog`: name -> definition, with per-family trigger rules
//! - `UserEventStore`: administrator-placed persistent and timed events
//! - `PluginConfig`: TOML configuration for delay rules and startup pacing
//!
//! # Example
//!
//! ```ignore
//! use warzone_catalog::prelude::*;
//!
//! let mut catalog = EventCatalog::load_or_default("warzone_catalog.json")?;
//! catalog.ensure_defaults();
//! let bradley = catalog.get(event_names::BRADLEY_APC).unwrap();
//! assert!(bradley.shape.volume().is_some());
//! ```

pub mod catalog;
pub mod config;
pub mod definition;
pub mod error;
pub mod rules;
pub mod shape;
pub mod store;

pub mod prelude {
    pub use crate::catalog::{event_names, EventCatalog, CATALOG_VERSION};
    pub use crate::config::{GeneralConfig, PluginConfig, PvpDelayConfig, StartupConfig, SupplyConfig};
    pub use crate::definition::{BotSettings, CommandFilter, CommandMode, DomeSettings, EventDefinition};
    pub use crate::error::{CatalogError, CatalogResult};
    pub use crate::rules::{CargoPhase, CargoRules, CrateRules, CrateStop, DeathRules, DropRules, DropStop, FamilyRules};
    pub use crate::shape::{AnchorOffset, ParentAnchor, ZoneShape, ZoneVolume};
    pub use crate::store::{AutoEvent, TimedEvent, UserEventStore};
}

pub use prelude::*;
