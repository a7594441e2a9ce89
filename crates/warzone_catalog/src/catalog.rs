//! Event catalog: event name -> definition, plus family rules

use crate::definition::EventDefinition;
use crate::error::{CatalogError, CatalogResult};
use crate::rules::FamilyRules;
use crate::shape::ZoneShape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use warzone_math::Vec3;

/// Current catalog format version
pub const CATALOG_VERSION: u32 = 1;

/// Names of the built-in event families
pub mod event_names {
    pub const BRADLEY_APC: &str = "BradleyAPC";
    pub const PATROL_HELICOPTER: &str = "PatrolHelicopter";
    pub const HACKABLE_CRATE: &str = "HackableCrate";
    pub const SUPPLY_DROP: &str = "SupplyDrop";
    pub const SUPPLY_SIGNAL: &str = "SupplySignal";
    pub const CARGO_SHIP: &str = "CargoShip";
    pub const POWER_SWITCH: &str = "PowerSwitch";
}

/// Every event definition known to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCatalog {
    pub version: u32,
    pub events: BTreeMap<String, EventDefinition>,
    #[serde(default)]
    pub rules: FamilyRules,
}

impl EventCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            version: CATALOG_VERSION,
            events: BTreeMap::new(),
            rules: FamilyRules::default(),
        }
    }

    /// Create a catalog holding the built-in families
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.ensure_defaults();
        catalog
    }

    /// Insert any built-in family that is missing; returns how many were added
    pub fn ensure_defaults(&mut self) -> usize {
        let mut added = 0;
        for (name, definition) in builtin_definitions() {
            if !self.events.contains_key(name) {
                self.events.insert(name.to_string(), definition);
                added += 1;
            }
        }
        added
    }

    pub fn get(&self, name: &str) -> Option<&EventDefinition> {
        self.events.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut EventDefinition> {
        self.events.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    /// Add a new definition; fails if the name is taken
    pub fn insert(&mut self, name: impl Into<String>, definition: EventDefinition) -> CatalogResult<()> {
        let name = name.into();
        if self.events.contains_key(&name) {
            return Err(CatalogError::DuplicateEvent(name));
        }
        self.events.insert(name, definition);
        Ok(())
    }

    /// Add or replace a definition
    pub fn upsert(&mut self, name: impl Into<String>, definition: EventDefinition) {
        self.events.insert(name.into(), definition);
    }

    pub fn remove(&mut self, name: &str) -> CatalogResult<EventDefinition> {
        self.events
            .remove(name)
            .ok_or_else(|| CatalogError::UnknownEvent(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let bytes = fs::read(path.as_ref())?;
        let catalog: Self = serde_json::from_slice(&bytes)?;

        if catalog.version > CATALOG_VERSION {
            return Err(CatalogError::VersionMismatch {
                found: catalog.version,
                supported: CATALOG_VERSION,
            });
        }

        for (name, definition) in &catalog.events {
            if let Err(e) = definition.validate(name) {
                log::warn!("{}; zones for it will be skipped", e);
            }
        }

        Ok(catalog)
    }

    /// Load from a JSON file, falling back to the built-in defaults if it does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No catalog at {}, using built-in defaults", path.display());
            return Ok(Self::with_defaults());
        }
        let mut catalog = Self::load(path)?;
        let added = catalog.ensure_defaults();
        if added > 0 {
            log::info!("Added {} missing built-in event definitions", added);
        }
        Ok(catalog)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> CatalogResult<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_definitions() -> Vec<(&'static str, EventDefinition)> {
    use event_names::*;

    let parented = |radius: f32| ZoneShape::sphere(radius).with_anchor(Vec3::ZERO);

    vec![
        (BRADLEY_APC, EventDefinition::new(ZoneShape::sphere(100.0)).with_duration(600.0)),
        (PATROL_HELICOPTER, EventDefinition::new(ZoneShape::sphere(100.0)).with_duration(600.0)),
        (HACKABLE_CRATE, EventDefinition::new(parented(100.0))),
        (SUPPLY_DROP, EventDefinition::new(parented(100.0))),
        (SUPPLY_SIGNAL, EventDefinition::new(parented(100.0))),
        (CARGO_SHIP, EventDefinition::new(ZoneShape::cube(Vec3::new(25.0, 70.0, 180.0), 0.0).with_anchor(Vec3::new(0.0, 5.5, -10.0))).without_domes()),
        (POWER_SWITCH, EventDefinition::new(parented(150.0))),
    ]
}
