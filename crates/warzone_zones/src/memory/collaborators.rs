use crate::events::{VetoRequest, ZoneNotification};
use crate::hooks::Listener;
use crate::ids::{ActorId, EntityId, ZoneId};
use crate::services::{BotProvider, DomeProvider, ExclusionApi, ListenerHost, SafeZoneMapping, ZoneObserver};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use warzone_math::Vec3;

#[derive(Debug, Default)]
struct MappingTable {
    labels: BTreeMap<ZoneId, String>,
    adds: usize,
}

/// Safe-zone mapping that just remembers labels
#[derive(Debug, Clone, Default)]
pub struct MemoryMapping {
    inner: Arc<Mutex<MappingTable>>,
}

impl MemoryMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(&self, zone: &ZoneId) -> Option<String> {
        self.inner.lock().labels.get(zone).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total `add_or_update` calls
    pub fn add_count(&self) -> usize {
        self.inner.lock().adds
    }
}

impl SafeZoneMapping for MemoryMapping {
    fn add_or_update(&mut self, id: &ZoneId, label: &str) -> bool {
        let mut table = self.inner.lock();
        table.adds += 1;
        table.labels.insert(id.clone(), label.to_string());
        true
    }

    fn remove(&mut self, id: &ZoneId) -> bool {
        self.inner.lock().labels.remove(id).is_some()
    }
}

#[derive(Debug, Default)]
struct BotTable {
    groups: BTreeMap<ZoneId, (Vec3, String)>,
    failing: bool,
}

/// NPC spawner keeping one group per zone
#[derive(Debug, Clone, Default)]
pub struct MemoryBots {
    inner: Arc<Mutex<BotTable>>,
}

impl MemoryBots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call fail
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().failing = failing;
    }

    pub fn group_count(&self) -> usize {
        self.inner.lock().groups.len()
    }

    pub fn has_group(&self, zone: &ZoneId) -> bool {
        self.inner.lock().groups.contains_key(zone)
    }

    pub fn profile(&self, zone: &ZoneId) -> Option<String> {
        self.inner.lock().groups.get(zone).map(|(_, profile)| profile.clone())
    }
}

impl BotProvider for MemoryBots {
    fn add_group_spawn(&mut self, position: Vec3, profile: &str, group: &ZoneId) -> Result<(), String> {
        let mut table = self.inner.lock();
        if table.failing {
            return Err(format!("bot spawner offline, cannot add group {group}"));
        }
        table.groups.insert(group.clone(), (position, profile.to_string()));
        Ok(())
    }

    fn remove_group_spawn(&mut self, group: &ZoneId) -> Result<(), String> {
        let mut table = self.inner.lock();
        if table.failing {
            return Err(format!("bot spawner offline, cannot remove group {group}"));
        }
        match table.groups.remove(group) {
            Some(_) => Ok(()),
            None => Err(format!("no bot group {group}")),
        }
    }
}

/// A spawned dome as the dome provider sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomeRecord {
    pub position: Vec3,
    pub radius: f32,
    pub darkness: u8,
    pub parent: Option<EntityId>,
}

#[derive(Debug, Default)]
struct DomeTable {
    domes: BTreeMap<ZoneId, DomeRecord>,
    destroyed: Vec<ZoneId>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDomes {
    inner: Arc<Mutex<DomeTable>>,
}

impl MemoryDomes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dome(&self, zone: &ZoneId) -> Option<DomeRecord> {
        self.inner.lock().domes.get(zone).copied()
    }

    pub fn count(&self) -> usize {
        self.inner.lock().domes.len()
    }

    /// Zones whose domes were shrunk away, oldest first
    pub fn destroyed(&self) -> Vec<ZoneId> {
        self.inner.lock().destroyed.clone()
    }
}

impl DomeProvider for MemoryDomes {
    fn spawn(&mut self, zone: &ZoneId, position: Vec3, radius: f32, darkness: u8) -> bool {
        let record = DomeRecord {
            position,
            radius,
            darkness,
            parent: None,
        };
        self.inner.lock().domes.insert(zone.clone(), record);
        true
    }

    fn parent(&mut self, zone: &ZoneId, host: EntityId, _offset: Vec3) -> bool {
        match self.inner.lock().domes.get_mut(zone) {
            Some(record) => {
                record.parent = Some(host);
                true
            }
            None => false,
        }
    }

    fn unparent(&mut self, zone: &ZoneId) {
        if let Some(record) = self.inner.lock().domes.get_mut(zone) {
            record.parent = None;
        }
    }

    fn shrink_and_destroy(&mut self, zone: &ZoneId) {
        let mut table = self.inner.lock();
        if table.domes.remove(zone).is_some() {
            table.destroyed.push(zone.clone());
        }
    }
}

#[derive(Debug, Default)]
struct ListenerTable {
    subscribed: HashSet<Listener>,
    toggles: usize,
}

/// Listener host counting every (un)subscribe call
#[derive(Debug, Clone, Default)]
pub struct MemoryListeners {
    inner: Arc<Mutex<ListenerTable>>,
}

impl MemoryListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_subscribed(&self, listener: Listener) -> bool {
        self.inner.lock().subscribed.contains(&listener)
    }

    pub fn toggle_count(&self) -> usize {
        self.inner.lock().toggles
    }
}

impl ListenerHost for MemoryListeners {
    fn set_subscribed(&mut self, listener: Listener, subscribed: bool) {
        let mut table = self.inner.lock();
        table.toggles += 1;
        if subscribed {
            table.subscribed.insert(listener);
        } else {
            table.subscribed.remove(&listener);
        }
    }
}

#[derive(Debug, Default)]
struct ExclusionTable {
    excluded: BTreeMap<ActorId, f32>,
    cleared: Vec<ActorId>,
    refusing: bool,
}

/// Exclusion API recording who is currently excluded
#[derive(Debug, Clone, Default)]
pub struct MemoryExclusion {
    inner: Arc<Mutex<ExclusionTable>>,
}

impl MemoryExclusion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_refusing(&self, refusing: bool) {
        self.inner.lock().refusing = refusing;
    }

    pub fn excluded(&self, actor: ActorId) -> Option<f32> {
        self.inner.lock().excluded.get(&actor).copied()
    }

    pub fn cleared(&self) -> Vec<ActorId> {
        self.inner.lock().cleared.clone()
    }
}

impl ExclusionApi for MemoryExclusion {
    fn exclude_actor(&mut self, actor: ActorId, seconds: f32) -> bool {
        let mut table = self.inner.lock();
        if table.refusing {
            return false;
        }
        table.excluded.insert(actor, seconds);
        true
    }

    fn clear_actor(&mut self, actor: ActorId) {
        let mut table = self.inner.lock();
        table.excluded.remove(&actor);
        table.cleared.push(actor);
    }
}

#[derive(Debug, Default)]
struct ObserverLog {
    notifications: Vec<ZoneNotification>,
    vetoes: Vec<VetoRequest>,
    veto_create: BTreeSet<String>,
    veto_delete: BTreeSet<String>,
}

/// Observer keeping every notification and vetoing configured events
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    inner: Arc<Mutex<ObserverLog>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Veto creation of zones for `event`
    pub fn veto_create(&self, event: &str) {
        self.inner.lock().veto_create.insert(event.to_string());
    }

    pub fn veto_delete(&self, event: &str) {
        self.inner.lock().veto_delete.insert(event.to_string());
    }

    pub fn allow_all(&self) {
        let mut log = self.inner.lock();
        log.veto_create.clear();
        log.veto_delete.clear();
    }

    pub fn notifications(&self) -> Vec<ZoneNotification> {
        self.inner.lock().notifications.clone()
    }

    /// Veto requests seen, whether refused or not
    pub fn veto_requests(&self) -> Vec<VetoRequest> {
        self.inner.lock().vetoes.clone()
    }

    pub fn clear(&self) {
        let mut log = self.inner.lock();
        log.notifications.clear();
        log.vetoes.clear();
    }
}

impl ZoneObserver for RecordingObserver {
    fn notify(&mut self, notification: &ZoneNotification) {
        self.inner.lock().notifications.push(notification.clone());
    }

    fn veto(&mut self, request: &VetoRequest) -> bool {
        let mut log = self.inner.lock();
        log.vetoes.push(request.clone());
        match request {
            VetoRequest::Create { event, .. } => log.veto_create.contains(event),
            VetoRequest::Delete { event, .. } => log.veto_delete.contains(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_share_state() {
        let bots = MemoryBots::new();
        let mut engine_side = bots.clone();
        let zone = ZoneId::from("z");
        engine_side.add_group_spawn(Vec3::ZERO, "scientists", &zone).unwrap();
        assert!(bots.has_group(&zone));
        assert_eq!(bots.profile(&zone).as_deref(), Some("scientists"));

        bots.set_failing(true);
        assert!(engine_side.remove_group_spawn(&zone).is_err());
    }

    #[test]
    fn test_dome_lifecycle() {
        let mut domes = MemoryDomes::new();
        let zone = ZoneId::from("d");
        assert!(!domes.parent(&zone, EntityId(1), Vec3::ZERO));
        domes.spawn(&zone, Vec3::ZERO, 50.0, 3);
        assert!(domes.parent(&zone, EntityId(1), Vec3::ZERO));
        assert_eq!(domes.dome(&zone).and_then(|d| d.parent), Some(EntityId(1)));

        domes.shrink_and_destroy(&zone);
        assert_eq!(domes.count(), 0);
        assert_eq!(domes.destroyed(), vec![zone]);
    }
}
