//! Administrator-defined events
//!
//! Definitions for user events live in the catalog like any other event;
//! this store only keeps what is specific to them: where a persistent
//! event sits and whether it starts at boot, or how long a one-shot
//! event lasts.

use crate::error::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use warzone_math::Vec3;

/// Persistent event placed at a fixed position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoEvent {
    pub position: Vec3,
    pub autostart: bool,
}

/// One-shot event started at the requester's position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserEventStore {
    #[serde(default)]
    pub auto_events: BTreeMap<String, AutoEvent>,
    #[serde(default)]
    pub timed_events: BTreeMap<String, TimedEvent>,
}

impl UserEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if either table holds `name`
    pub fn contains(&self, name: &str) -> bool {
        self.auto_events.contains_key(name) || self.timed_events.contains_key(name)
    }

    pub fn add_auto(&mut self, name: impl Into<String>, position: Vec3, autostart: bool) -> CatalogResult<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(CatalogError::DuplicateEvent(name));
        }
        self.auto_events.insert(name, AutoEvent { position, autostart });
        Ok(())
    }

    pub fn add_timed(&mut self, name: impl Into<String>, duration: f32) -> CatalogResult<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(CatalogError::DuplicateEvent(name));
        }
        self.timed_events.insert(name, TimedEvent { duration });
        Ok(())
    }

    /// Remove from whichever table holds `name`
    pub fn remove(&mut self, name: &str) -> CatalogResult<()> {
        let removed = self.auto_events.remove(name).is_some() | self.timed_events.remove(name).is_some();
        if removed {
            Ok(())
        } else {
            Err(CatalogError::UnknownEvent(name.to_string()))
        }
    }

    /// Persistent events flagged to start at boot
    pub fn autostart_events(&self) -> impl Iterator<Item = (&str, &AutoEvent)> {
        self.auto_events
            .iter()
            .filter(|(_, e)| e.autostart)
            .map(|(name, e)| (name.as_str(), e))
    }

    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let bytes = fs::read(path.as_ref())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Load, or start empty if the file does not exist yet
    pub fn load_or_default(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> CatalogResult<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }
}
