//! Per-family event state machines
//!
//! Each family turns world signals into lifecycle calls. Zone ids of
//! entity-bound families derive from the entity id, so replaying the same
//! signals (for example during the startup scan) never duplicates a zone.

mod cargo_ship;
mod crate_hack;
mod custom;
mod death;
mod monument;
mod power_switch;
mod supply_drop;

pub use cargo_ship::CargoMachine;
pub use crate_hack::{CrateMachine, CrateState};
pub use custom::user_zone_id;
pub use death::{DeathFamily, DEFAULT_DEATH_LIFETIME};
pub use monument::feature_zone_id;
pub(crate) use monument::feature_placement;
pub use supply_drop::{DropMachine, SignalRecord};

use crate::ids::{EntityId, ZoneId};
use std::collections::{BTreeSet, HashMap, HashSet};
use warzone_geometry::MapFeature;

/// Live state of every entity-bound machine
#[derive(Debug, Default)]
pub struct MachineState {
    pub crates: HashMap<EntityId, CrateMachine>,
    pub drops: HashMap<EntityId, DropMachine>,
    pub signals: Vec<SignalRecord>,
    pub cargo: HashMap<EntityId, CargoMachine>,
    pub switches: HashSet<EntityId>,
    pub features: HashMap<ZoneId, MapFeature>,
    /// Feature names whose derived geometry may still grow this scan
    pub(crate) deriving: BTreeSet<String>,
    /// Catalog edits from geometry derivation not yet saved
    pub(crate) catalog_dirty: bool,
}

impl MachineState {
    pub fn clear(&mut self) {
        self.crates.clear();
        self.drops.clear();
        self.signals.clear();
        self.cargo.clear();
        self.switches.clear();
        self.features.clear();
        self.deriving.clear();
    }
}
