use crate::ids::{EntityId, ZoneId};
use crate::lifecycle::CreateRequest;
use crate::manager::{TimerKey, ZoneManager};
use warzone_catalog::{event_names, DropStop};
use warzone_math::Vec3;

/// A supply signal waiting for its drop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRecord {
    pub position: Vec3,
    pub thrown_at: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropMachine {
    /// `SupplyDrop` or `SupplySignal`
    pub event: &'static str,
    pub landed: bool,
    pub looted: bool,
}

impl ZoneManager {
    /// A supply signal was thrown; the next drop nearby belongs to it
    pub fn on_signal_thrown(&mut self, position: Vec3) {
        self.prune_signals();
        self.machines.signals.push(SignalRecord {
            position,
            thrown_at: self.now(),
        });
    }

    /// Forget signals older than the matching window
    fn prune_signals(&mut self) {
        let now = self.now();
        let max_age = self.config.supply.signal_window_secs;
        self.machines.signals.retain(|s| now - s.thrown_at <= max_age);
    }

    pub fn on_drop_spawned(&mut self, drop: EntityId) {
        if self.machines.drops.contains_key(&drop) {
            return;
        }
        let Some(info) = self.services.world.entity(drop) else {
            return;
        };

        self.prune_signals();
        let radius = self.config.supply.signal_window_radius;
        let matched = self
            .machines
            .signals
            .iter()
            .position(|s| s.position.distance_2d(info.position) <= radius);
        let event = match matched {
            Some(index) => {
                self.machines.signals.remove(index);
                event_names::SUPPLY_SIGNAL
            }
            None => event_names::SUPPLY_DROP,
        };

        self.machines.drops.insert(
            drop,
            DropMachine {
                event,
                landed: false,
                looted: false,
            },
        );

        if self.ctx.catalog.rules.supply_drop.start_on_spawn {
            let ground = self.services.world.ground_height(info.position);
            let request = CreateRequest::new(event, info.position.with_y(ground)).with_zone_id(ZoneId::for_entity(drop));
            self.create_zone(request);
        }
    }

    pub fn on_drop_landed(&mut self, drop: EntityId) {
        let Some(machine) = self.machines.drops.get_mut(&drop) else {
            return;
        };
        machine.landed = true;
        let event = machine.event;
        let zone = ZoneId::for_entity(drop);

        if self.ctx.catalog.rules.supply_drop.start_on_spawn {
            self.anchor_drop_zone(drop, &zone);
        } else if let Some(info) = self.services.world.entity(drop) {
            let request = CreateRequest::new(event, info.position)
                .with_zone_id(zone)
                .parented_to(drop, true);
            self.create_zone(request);
        }
    }

    pub fn on_drop_looted(&mut self, drop: EntityId) {
        let Some(machine) = self.machines.drops.get_mut(&drop) else {
            return;
        };
        if machine.looted {
            return;
        }
        machine.looted = true;

        let rules = &self.ctx.catalog.rules.supply_drop;
        if rules.stop == DropStop::Looted {
            let timer = rules.timer;
            self.request_delete(&ZoneId::for_entity(drop), Some(timer));
        }
    }

    pub fn on_drop_killed(&mut self, drop: EntityId) {
        self.machines.drops.remove(&drop);
        let zone = ZoneId::for_entity(drop);
        self.unparent_zone(&zone);

        let stop_on_kill = self.ctx.catalog.rules.supply_drop.stop == DropStop::Killed;
        if stop_on_kill || !self.scheduler.is_armed(&TimerKey::Delete(zone.clone())) {
            self.request_delete(&zone, None);
        }
    }

    /// Re-anchor ground-level drop zones once their capsule is close enough
    pub(crate) fn poll_falling_drops(&mut self) {
        if !self.ctx.catalog.rules.supply_drop.start_on_spawn || self.machines.drops.is_empty() {
            return;
        }
        let anchor_height = self.config.supply.ground_anchor_height;
        let falling: Vec<EntityId> = self
            .machines
            .drops
            .iter()
            .filter(|(_, machine)| !machine.landed)
            .map(|(id, _)| *id)
            .collect();

        for drop in falling {
            let zone = ZoneId::for_entity(drop);
            if !self.ctx.is_active(&zone) || self.ctx.parent_of(&zone).is_some() {
                continue;
            }
            let Some(info) = self.services.world.entity(drop) else {
                continue;
            };
            let ground = self.services.world.ground_height(info.position);
            if info.position.y - ground <= anchor_height {
                self.anchor_drop_zone(drop, &zone);
            }
        }
    }

    fn anchor_drop_zone(&mut self, drop: EntityId, zone: &ZoneId) {
        if self.ctx.is_active(zone) && self.ctx.parent_of(zone).is_none() {
            self.parent_to_entity(zone, drop, false, 0.0);
        }
    }
}
