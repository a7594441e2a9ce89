use crate::ids::{EntityId, ZoneId};
use crate::lifecycle::CreateRequest;
use crate::manager::{TimerKey, ZoneManager};
use warzone_catalog::{event_names, CargoPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CargoMachine {
    pub phase: CargoPhase,
}

impl ZoneManager {
    pub fn on_cargo_spawned(&mut self, ship: EntityId) {
        if self.machines.cargo.contains_key(&ship) {
            return;
        }
        self.machines.cargo.insert(
            ship,
            CargoMachine {
                phase: CargoPhase::Spawned,
            },
        );
        self.reconcile_cargo(ship);
    }

    pub fn on_cargo_phase(&mut self, ship: EntityId, phase: CargoPhase) {
        self.machines
            .cargo
            .entry(ship)
            .or_insert(CargoMachine { phase })
            .phase = phase;
        self.reconcile_cargo(ship);
    }

    /// The vessel left the map; its zone goes with it
    pub fn on_cargo_removed(&mut self, ship: EntityId) {
        self.machines.cargo.remove(&ship);
        let zone = ZoneId::for_entity(ship);
        self.scheduler.cancel(&TimerKey::StartDelay(zone.clone()));
        self.unparent_zone(&zone);
        self.delete_zone(&zone);
    }

    /// Act only where the wanted state differs from the actual one
    fn reconcile_cargo(&mut self, ship: EntityId) {
        let Some(machine) = self.machines.cargo.get(&ship) else {
            return;
        };
        let wanted = self.ctx.catalog.rules.cargo_ship.wants_zone(machine.phase);
        let zone = ZoneId::for_entity(ship);
        let active = self.ctx.is_active(&zone);
        let stopping = self.is_stopping(&zone);

        match (wanted, active) {
            (true, false) => {
                let Some(info) = self.services.world.entity(ship) else {
                    return;
                };
                let request = CreateRequest::new(event_names::CARGO_SHIP, info.position)
                    .with_zone_id(zone)
                    .with_yaw(info.yaw)
                    .parented_to(ship, true);
                self.create_zone(request);
            }
            (true, true) if stopping => {
                self.scheduler.cancel(&TimerKey::Delete(zone.clone()));
                self.parent_to_entity(&zone, ship, true, 0.0);
                log::debug!("Cargo zone {} kept; stop cancelled", zone);
            }
            (false, true) if !stopping => {
                self.request_delete(&zone, None);
            }
            (false, false) => {
                self.scheduler.cancel(&TimerKey::StartDelay(zone));
            }
            _ => {}
        }
    }
}
