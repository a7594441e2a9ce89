//! PvP delay: a grace period after leaving a zone
//!
//! While delayed, an actor can still fight the people of the zone it left.
//! The record ends on expiry, respawn, or entering any managed zone.

use crate::events::{DelayEndReason, ZoneNotification};
use crate::hooks::HookCategory;
use crate::ids::{ActorId, ZoneId};
use crate::manager::{TimerAction, TimerKey, ZoneManager};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct DelayRecord {
    /// Zone the actor left
    pub zone: ZoneId,
    /// Event that owned the zone
    pub event: String,
    pub seconds: f32,
}

/// At most one record per actor
#[derive(Debug, Default)]
pub struct DelayTracker {
    records: HashMap<ActorId, DelayRecord>,
}

impl DelayTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, actor: ActorId) -> Option<&DelayRecord> {
        self.records.get(&actor)
    }

    pub fn is_delayed(&self, actor: ActorId) -> bool {
        self.records.contains_key(&actor)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ActorId, &DelayRecord)> {
        self.records.iter()
    }

    /// Delayed actors in ascending order
    pub fn actors(&self) -> Vec<ActorId> {
        let mut actors: Vec<ActorId> = self.records.keys().copied().collect();
        actors.sort();
        actors
    }

    pub(crate) fn insert(&mut self, actor: ActorId, record: DelayRecord) -> Option<DelayRecord> {
        self.records.insert(actor, record)
    }

    pub(crate) fn remove(&mut self, actor: ActorId) -> Option<DelayRecord> {
        self.records.remove(&actor)
    }
}

impl ZoneManager {
    pub fn on_zone_enter(&mut self, actor: ActorId, zone: &ZoneId) {
        let Some(event) = self.ctx.event_of(zone).map(str::to_string) else {
            return;
        };
        self.end_delay(actor, DelayEndReason::ReEntered);

        let holster = self.ctx.definition(&event).map_or(0.0, |def| def.holster_time);
        if holster > 0.0 {
            self.services.world.holster_weapon(actor, holster);
        }
        self.services.notify(ZoneNotification::ActorEnteredZone {
            actor,
            zone: zone.clone(),
            event,
        });
    }

    pub fn on_zone_exit(&mut self, actor: ActorId, zone: &ZoneId) {
        let Some(event) = self.ctx.event_of(zone).map(str::to_string) else {
            return;
        };
        self.exit_zone(actor, zone, &event);
        self.recompute_hooks();
    }

    pub fn on_actor_respawn(&mut self, actor: ActorId) {
        self.end_delay(actor, DelayEndReason::Respawned);
    }

    /// Exit handling without a hook recompute; also used for the exits
    /// synthesized when a zone is deleted
    pub(crate) fn exit_zone(&mut self, actor: ActorId, zone: &ZoneId, event: &str) {
        let delay = self
            .ctx
            .definition(event)
            .filter(|def| def.has_pvp_delay())
            .map(|def| def.pvp_delay_time);
        let still_inside = self
            .services
            .zones
            .list_actor_zone_ids(actor)
            .iter()
            .any(|other| other != zone && self.ctx.is_active(other));

        let delay = delay.filter(|_| !self.shutting_down && !still_inside);
        self.services.notify(ZoneNotification::ActorExitedZone {
            actor,
            zone: zone.clone(),
            event: event.to_string(),
            delay,
        });
        if let Some(seconds) = delay {
            self.begin_delay(actor, zone, event, seconds);
        }
    }

    fn begin_delay(&mut self, actor: ActorId, zone: &ZoneId, event: &str, seconds: f32) {
        let record = DelayRecord {
            zone: zone.clone(),
            event: event.to_string(),
            seconds,
        };
        if let Some(previous) = self.delays.insert(actor, record) {
            log::debug!("{} delay from zone {} replaced", actor, previous.zone);
        }
        self.scheduler
            .arm(TimerKey::PvpDelay(actor), seconds, TimerAction::DelayExpired(actor));

        if self.delay_delegated() {
            if let Some(exclusion) = self.services.exclusion.as_mut() {
                if !exclusion.exclude_actor(actor, seconds) {
                    log::debug!("Exclusion API refused {}", actor);
                }
            }
        }

        self.services.notify(ZoneNotification::ActorEnteredDelay {
            actor,
            zone: zone.clone(),
            event: event.to_string(),
            seconds,
        });
    }

    /// End the actor's delay, if any
    pub fn end_delay(&mut self, actor: ActorId, reason: DelayEndReason) -> bool {
        let Some(record) = self.delays.remove(actor) else {
            return false;
        };
        self.scheduler.cancel(&TimerKey::PvpDelay(actor));

        if reason != DelayEndReason::Expired && self.delay_delegated() {
            if let Some(exclusion) = self.services.exclusion.as_mut() {
                exclusion.clear_actor(actor);
            }
        }

        self.services.notify(ZoneNotification::ActorExitedDelay {
            actor,
            zone: record.zone,
            event: record.event,
            reason,
        });
        self.recompute_hooks();
        true
    }

    /// Damage query hook: `Some(true)` authorizes, `None` defers to the
    /// default rules
    pub fn can_damage(&self, attacker: ActorId, victim: ActorId) -> Option<bool> {
        if !self.hooks.is_enabled(HookCategory::DamageArbitration) {
            return None;
        }
        let rules = &self.config.pvp_delay;
        let zones = &self.services.zones;
        let attacker_delay = self.delays.get(attacker);
        let victim_delay = self.delays.get(victim);

        if rules.victim_delayed_attacker_in_zone {
            if let Some(record) = victim_delay {
                if zones.is_actor_in_zone(&record.zone, attacker) {
                    return Some(true);
                }
            }
        }
        if rules.both_delayed_same_zone {
            if let (Some(a), Some(v)) = (attacker_delay, victim_delay) {
                if a.zone == v.zone {
                    return Some(true);
                }
            }
        }
        if rules.attacker_delayed_victim_in_zone {
            if let Some(record) = attacker_delay {
                if zones.is_actor_in_zone(&record.zone, victim) {
                    return Some(true);
                }
            }
        }
        None
    }
}
