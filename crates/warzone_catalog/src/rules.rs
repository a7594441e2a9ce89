//! Per-family trigger rules
//!
//! These decide *when* a family's zone starts and stops; the matching
//! `EventDefinition` decides what the zone looks like.

use serde::{Deserialize, Serialize};

/// When a hackable crate zone is torn down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CrateStop {
    /// `timer` seconds after the crate unlocks
    #[default]
    UnlockElapsed,
    /// `timer` seconds after the crate is first looted
    LootElapsed,
    /// When the crate entity is destroyed
    Killed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrateRules {
    /// Create on spawn instead of when hacking starts
    pub start_on_spawn: bool,
    pub stop: CrateStop,
    /// Seconds used by the elapsed stop triggers
    pub timer: f32,
    /// Skip crates that already have a live owner
    pub exclude_owned: bool,
    /// Skip crates riding a cargo vessel (the vessel has its own zone)
    pub exclude_on_cargo: bool,
}

impl Default for CrateRules {
    fn default() -> Self {
        Self {
            start_on_spawn: false,
            stop: CrateStop::UnlockElapsed,
            timer: 300.0,
            exclude_owned: true,
            exclude_on_cargo: true,
        }
    }
}

/// When a supply drop zone is torn down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DropStop {
    /// `timer` seconds after the first loot
    #[default]
    Looted,
    /// When the capsule entity is destroyed
    Killed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropRules {
    /// Create on spawn (anchored at ground height) instead of on landing
    pub start_on_spawn: bool,
    pub stop: DropStop,
    pub timer: f32,
}

impl Default for DropRules {
    fn default() -> Self {
        Self {
            start_on_spawn: false,
            stop: DropStop::Looted,
            timer: 300.0,
        }
    }
}

/// Movement phase of a cargo vessel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CargoPhase {
    Spawned,
    Approaching,
    Docked,
    Departing,
    Egress,
}

/// Which cargo phases should have a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoRules {
    pub spawned: bool,
    pub approaching: bool,
    pub docked: bool,
    pub departing: bool,
    pub egress: bool,
}

impl CargoRules {
    pub fn wants_zone(&self, phase: CargoPhase) -> bool {
        match phase {
            CargoPhase::Spawned => self.spawned,
            CargoPhase::Approaching => self.approaching,
            CargoPhase::Docked => self.docked,
            CargoPhase::Departing => self.departing,
            CargoPhase::Egress => self.egress,
        }
    }
}

impl Default for CargoRules {
    fn default() -> Self {
        Self {
            spawned: true,
            approaching: true,
            docked: true,
            departing: true,
            egress: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DeathRules {
    /// Only create a zone when an actor landed the killing blow
    pub require_actor_killer: bool,
}

/// All family rules, persisted alongside the definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FamilyRules {
    #[serde(default)]
    pub hackable_crate: CrateRules,
    #[serde(default)]
    pub supply_drop: DropRules,
    #[serde(default)]
    pub cargo_ship: CargoRules,
    #[serde(default)]
    pub death: DeathRules,
}
