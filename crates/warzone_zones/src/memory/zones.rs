use crate::ids::{ActorId, ZoneId};
use crate::services::{ZoneHandle, ZoneProvider};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use warzone_catalog::ZoneVolume;
use warzone_math::Vec3;

/// Membership change of one actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneTransition {
    Entered(ZoneId),
    Exited(ZoneId),
}

#[derive(Debug, Default)]
struct ZoneTable {
    zones: BTreeMap<ZoneId, ZoneHandle>,
    actors: BTreeMap<ActorId, Vec3>,
    refused: HashSet<ZoneId>,
    pending: Vec<(ActorId, ZoneTransition)>,
    create_calls: Vec<(ZoneId, ZoneVolume, Vec3)>,
    erase_calls: Vec<ZoneId>,
}

impl ZoneTable {
    fn memberships(&self, actor: ActorId) -> BTreeSet<ZoneId> {
        let Some(&position) = self.actors.get(&actor) else {
            return BTreeSet::new();
        };
        self.zones
            .iter()
            .filter(|(_, handle)| handle.volume.contains_point(handle.position, position))
            .map(|(zone, _)| zone.clone())
            .collect()
    }

    /// Replace a zone's placement and queue the membership changes it causes
    fn place_zone(&mut self, zone: &ZoneId, handle: Option<ZoneHandle>) {
        let before = self.zones.get(zone).copied();
        match handle {
            Some(handle) => self.zones.insert(zone.clone(), handle),
            None => self.zones.remove(zone),
        };

        let inside = |h: Option<ZoneHandle>, p: Vec3| h.is_some_and(|h| h.volume.contains_point(h.position, p));
        let changes: Vec<(ActorId, ZoneTransition)> = self
            .actors
            .iter()
            .filter_map(|(&actor, &p)| match (inside(before, p), inside(handle, p)) {
                (false, true) => Some((actor, ZoneTransition::Entered(zone.clone()))),
                (true, false) => Some((actor, ZoneTransition::Exited(zone.clone()))),
                _ => None,
            })
            .collect();
        self.pending.extend(changes);
    }
}

/// Zone provider doing real sphere/box containment
///
/// Membership changes caused by actor or zone movement are queued and
/// handed out by [`take_transitions`](Self::take_transitions). Erasing a
/// zone queues nothing; the engine reports those exits itself.
#[derive(Debug, Clone, Default)]
pub struct MemoryZoneProvider {
    inner: Arc<Mutex<ZoneTable>>,
}

impl MemoryZoneProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_actor_position(&self, actor: ActorId, position: Vec3) {
        let mut table = self.inner.lock();
        let before = table.memberships(actor);
        table.actors.insert(actor, position);
        let after = table.memberships(actor);

        let exits = before.difference(&after).cloned().map(ZoneTransition::Exited);
        let entries = after.difference(&before).cloned().map(ZoneTransition::Entered);
        let changes: Vec<(ActorId, ZoneTransition)> = exits.chain(entries).map(|t| (actor, t)).collect();
        table.pending.extend(changes);
    }

    pub fn remove_actor(&self, actor: ActorId) {
        let mut table = self.inner.lock();
        let exits: Vec<(ActorId, ZoneTransition)> = table
            .memberships(actor)
            .into_iter()
            .map(|zone| (actor, ZoneTransition::Exited(zone)))
            .collect();
        table.actors.remove(&actor);
        table.pending.extend(exits);
    }

    pub fn actor_position(&self, actor: ActorId) -> Option<Vec3> {
        self.inner.lock().actors.get(&actor).copied()
    }

    /// Move a zone, as when it follows a host
    pub fn set_zone_position(&self, zone: &ZoneId, position: Vec3) {
        let mut table = self.inner.lock();
        if let Some(handle) = table.zones.get(zone).copied() {
            table.place_zone(zone, Some(ZoneHandle { position, ..handle }));
        }
    }

    /// Drain queued membership changes
    pub fn take_transitions(&self) -> Vec<(ActorId, ZoneTransition)> {
        std::mem::take(&mut self.inner.lock().pending)
    }

    /// Refuse future creates of `zone`
    pub fn refuse(&self, zone: impl Into<ZoneId>) {
        self.inner.lock().refused.insert(zone.into());
    }

    pub fn zone(&self, zone: &ZoneId) -> Option<ZoneHandle> {
        self.inner.lock().zones.get(zone).copied()
    }

    pub fn zone_count(&self) -> usize {
        self.inner.lock().zones.len()
    }

    pub fn create_calls(&self) -> Vec<(ZoneId, ZoneVolume, Vec3)> {
        self.inner.lock().create_calls.clone()
    }

    pub fn erase_calls(&self) -> Vec<ZoneId> {
        self.inner.lock().erase_calls.clone()
    }
}

impl ZoneProvider for MemoryZoneProvider {
    fn create_or_update(&mut self, id: &ZoneId, volume: ZoneVolume, position: Vec3) -> bool {
        let mut table = self.inner.lock();
        table.create_calls.push((id.clone(), volume, position));
        if table.refused.contains(id) {
            return false;
        }
        table.place_zone(id, Some(ZoneHandle { position, volume }));
        true
    }

    fn erase(&mut self, id: &ZoneId) -> bool {
        let mut table = self.inner.lock();
        table.erase_calls.push(id.clone());
        table.zones.remove(id).is_some()
    }

    fn get_by_handle(&self, id: &ZoneId) -> Option<ZoneHandle> {
        self.zone(id)
    }

    fn list_occupants(&self, id: &ZoneId) -> Vec<ActorId> {
        let table = self.inner.lock();
        let Some(handle) = table.zones.get(id) else {
            return Vec::new();
        };
        table
            .actors
            .iter()
            .filter(|(_, p)| handle.volume.contains_point(handle.position, **p))
            .map(|(&actor, _)| actor)
            .collect()
    }

    fn list_actor_zone_ids(&self, actor: ActorId) -> Vec<ZoneId> {
        self.inner.lock().memberships(actor).into_iter().collect()
    }

    fn is_actor_in_zone(&self, id: &ZoneId, actor: ActorId) -> bool {
        let table = self.inner.lock();
        match (table.zones.get(id), table.actors.get(&actor)) {
            (Some(handle), Some(&p)) => handle.volume.contains_point(handle.position, p),
            _ => false,
        }
    }
}
