use crate::ids::{EntityId, ZoneId};
use crate::lifecycle::CreateRequest;
use crate::manager::{TimerKey, ZoneManager};
use crate::services::{EntityInfo, EntityKind};
use serde::{Deserialize, Serialize};
use warzone_catalog::{event_names, CrateStop};

/// Progress of a hackable crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CrateState {
    Spawned,
    Hacking,
    Unlocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrateMachine {
    pub state: CrateState,
    pub looted: bool,
}

impl ZoneManager {
    pub fn on_crate_spawned(&mut self, crate_id: EntityId) {
        if self.machines.crates.contains_key(&crate_id) {
            return;
        }
        let Some(info) = self.services.world.entity(crate_id) else {
            log::debug!("Crate {} vanished before it could be tracked", crate_id);
            return;
        };
        if !self.crate_eligible(&info) {
            return;
        }
        self.machines.crates.insert(
            crate_id,
            CrateMachine {
                state: CrateState::Spawned,
                looted: false,
            },
        );
        if self.ctx.catalog.rules.hackable_crate.start_on_spawn {
            self.start_crate_zone(&info);
        }
    }

    pub fn on_crate_hack_started(&mut self, crate_id: EntityId) {
        self.on_crate_spawned(crate_id);
        let Some(machine) = self.machines.crates.get_mut(&crate_id) else {
            return;
        };
        machine.state = machine.state.max(CrateState::Hacking);

        if !self.ctx.catalog.rules.hackable_crate.start_on_spawn {
            if let Some(info) = self.services.world.entity(crate_id) {
                self.start_crate_zone(&info);
            }
        }
    }

    pub fn on_crate_unlocked(&mut self, crate_id: EntityId) {
        let Some(machine) = self.machines.crates.get_mut(&crate_id) else {
            return;
        };
        machine.state = CrateState::Unlocked;

        let rules = &self.ctx.catalog.rules.hackable_crate;
        if rules.stop == CrateStop::UnlockElapsed {
            let timer = rules.timer;
            self.request_delete(&ZoneId::for_entity(crate_id), Some(timer));
        }
    }

    pub fn on_crate_looted(&mut self, crate_id: EntityId) {
        let Some(machine) = self.machines.crates.get_mut(&crate_id) else {
            return;
        };
        if machine.looted {
            return;
        }
        machine.looted = true;

        let rules = &self.ctx.catalog.rules.hackable_crate;
        if rules.stop == CrateStop::LootElapsed {
            let timer = rules.timer;
            self.request_delete(&ZoneId::for_entity(crate_id), Some(timer));
        }
    }

    /// The crate entity is being destroyed; the zone must let go of it first
    pub fn on_crate_killed(&mut self, crate_id: EntityId) {
        self.machines.crates.remove(&crate_id);
        let zone = ZoneId::for_entity(crate_id);
        self.unparent_zone(&zone);

        let stop_on_kill = self.ctx.catalog.rules.hackable_crate.stop == CrateStop::Killed;
        if stop_on_kill || !self.scheduler.is_armed(&TimerKey::Delete(zone.clone())) {
            self.request_delete(&zone, None);
        }
    }

    fn crate_eligible(&self, info: &EntityInfo) -> bool {
        let rules = &self.ctx.catalog.rules.hackable_crate;
        if rules.exclude_owned && info.owner.is_some() {
            log::debug!("Crate {} has an owner; no zone", info.id);
            return false;
        }
        if rules.exclude_on_cargo {
            let on_cargo = info
                .parent
                .and_then(|parent| self.services.world.entity(parent))
                .is_some_and(|parent| matches!(parent.kind, EntityKind::CargoShip { .. }));
            if on_cargo {
                log::debug!("Crate {} rides a cargo vessel; no zone", info.id);
                return false;
            }
        }
        true
    }

    fn start_crate_zone(&mut self, info: &EntityInfo) -> bool {
        let request = CreateRequest::new(event_names::HACKABLE_CRATE, info.position)
            .with_zone_id(ZoneId::for_entity(info.id))
            .parented_to(info.id, true);
        self.create_zone(request)
    }
}
