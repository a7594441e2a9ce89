use super::zones::{MemoryZoneProvider, ZoneTransition};
use crate::ids::{ActorId, EntityId, ZoneId};
use crate::services::{EntityInfo, EntityKind, HostWorld, ZoneHandle};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use warzone_geometry::{EnvironmentQuery, MapFeature, StaticEnvironment};
use warzone_math::{OrientedBox, Quat, Vec3};

#[derive(Debug, Default)]
struct WorldTable {
    entities: BTreeMap<EntityId, EntityInfo>,
    features: Vec<MapFeature>,
    environment: StaticEnvironment,
    ground: f32,
    attachments: BTreeMap<ZoneId, (EntityId, Vec3)>,
    holstered: Vec<(ActorId, f32)>,
    shown: Vec<(ActorId, ZoneId, f32)>,
}

impl WorldTable {
    fn attached_position(&self, host: EntityId, offset: Vec3) -> Option<Vec3> {
        let info = self.entities.get(&host)?;
        Some(info.position + Quat::from_yaw_degrees(info.yaw).rotate(offset))
    }
}

/// Flat in-memory world
///
/// Entities are kept in id order, which is also the enumeration order the
/// startup scan sees. Zones attached to an entity follow it through the
/// shared [`MemoryZoneProvider`].
#[derive(Debug, Clone)]
pub struct MemoryWorld {
    inner: Arc<Mutex<WorldTable>>,
    zones: MemoryZoneProvider,
}

impl MemoryWorld {
    pub fn new(zones: MemoryZoneProvider) -> Self {
        Self {
            inner: Arc::new(Mutex::new(WorldTable::default())),
            zones,
        }
    }

    pub fn zones(&self) -> &MemoryZoneProvider {
        &self.zones
    }

    pub fn spawn(&self, info: EntityInfo) {
        self.inner.lock().entities.insert(info.id, info);
    }

    /// Remove an entity; zones attached to it stay where they are
    pub fn despawn(&self, id: EntityId) -> Option<EntityInfo> {
        let mut table = self.inner.lock();
        table.attachments.retain(|_, (host, _)| *host != id);
        table.entities.remove(&id)
    }

    pub fn set_kind(&self, id: EntityId, kind: EntityKind) {
        if let Some(info) = self.inner.lock().entities.get_mut(&id) {
            info.kind = kind;
        }
    }

    /// Move an entity and every zone attached to it
    pub fn move_entity(&self, id: EntityId, position: Vec3, yaw: f32) {
        let moved: Vec<(ZoneId, Vec3)> = {
            let mut table = self.inner.lock();
            let Some(info) = table.entities.get_mut(&id) else {
                return;
            };
            info.position = position;
            info.yaw = yaw;
            let table = &*table;
            table
                .attachments
                .iter()
                .filter(|(_, (host, _))| *host == id)
                .filter_map(|(zone, (host, offset))| {
                    table.attached_position(*host, *offset).map(|p| (zone.clone(), p))
                })
                .collect()
        };
        for (zone, p) in moved {
            self.zones.set_zone_position(&zone, p);
        }
    }

    pub fn add_feature(&self, feature: MapFeature) {
        self.inner.lock().features.push(feature);
    }

    pub fn add_volume(&self, volume: OrientedBox) {
        self.inner.lock().environment.push(volume);
    }

    pub fn set_ground_height(&self, height: f32) {
        self.inner.lock().ground = height;
    }

    pub fn set_actor_position(&self, actor: ActorId, position: Vec3) {
        self.zones.set_actor_position(actor, position);
    }

    pub fn take_transitions(&self) -> Vec<(ActorId, ZoneTransition)> {
        self.zones.take_transitions()
    }

    pub fn attachment(&self, zone: &ZoneId) -> Option<(EntityId, Vec3)> {
        self.inner.lock().attachments.get(zone).copied()
    }

    pub fn holstered(&self) -> Vec<(ActorId, f32)> {
        self.inner.lock().holstered.clone()
    }

    pub fn shown(&self) -> Vec<(ActorId, ZoneId, f32)> {
        self.inner.lock().shown.clone()
    }
}

impl HostWorld for MemoryWorld {
    fn entity(&self, id: EntityId) -> Option<EntityInfo> {
        self.inner.lock().entities.get(&id).copied()
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        self.inner.lock().entities.keys().copied().collect()
    }

    fn map_features(&self) -> Vec<MapFeature> {
        self.inner.lock().features.clone()
    }

    fn no_build_volumes(&self, center: Vec3, radius: f32) -> Vec<OrientedBox> {
        self.inner.lock().environment.no_build_volumes(center, radius)
    }

    fn ground_height(&self, _position: Vec3) -> f32 {
        self.inner.lock().ground
    }

    fn actor_position(&self, actor: ActorId) -> Option<Vec3> {
        self.zones.actor_position(actor)
    }

    fn attach_zone(&mut self, zone: &ZoneId, host: EntityId, offset: Vec3) -> bool {
        let position = {
            let mut table = self.inner.lock();
            let Some(position) = table.attached_position(host, offset) else {
                return false;
            };
            table.attachments.insert(zone.clone(), (host, offset));
            position
        };
        self.zones.set_zone_position(zone, position);
        true
    }

    fn detach_zone(&mut self, zone: &ZoneId) {
        self.inner.lock().attachments.remove(zone);
    }

    fn holster_weapon(&mut self, actor: ActorId, seconds: f32) {
        self.inner.lock().holstered.push((actor, seconds));
    }

    fn show_zone(&mut self, actor: ActorId, zone: &ZoneId, _handle: ZoneHandle, seconds: f32) {
        self.inner.lock().shown.push((actor, zone.clone(), seconds));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ZoneProvider;
    use warzone_catalog::ZoneVolume;

    #[test]
    fn test_attached_zone_follows_host() {
        let mut zones = MemoryZoneProvider::new();
        let mut world = MemoryWorld::new(zones.clone());
        let ship = EntityId(9);
        world.spawn(EntityInfo::new(ship, EntityKind::Other, Vec3::ZERO));

        let zone = ZoneId::from("9");
        zones.create_or_update(&zone, ZoneVolume::Sphere { radius: 5.0 }, Vec3::ZERO);
        assert!(world.attach_zone(&zone, ship, Vec3::new(0.0, 0.0, 10.0)));
        assert!(zones.zone(&zone).unwrap().position.distance(Vec3::new(0.0, 0.0, 10.0)) < 1e-4);

        world.move_entity(ship, Vec3::new(100.0, 0.0, 0.0), 90.0);
        let moved = zones.zone(&zone).unwrap().position;
        assert!((moved.distance_2d(Vec3::new(100.0, 0.0, 0.0)) - 10.0).abs() < 1e-3);

        world.detach_zone(&zone);
        world.move_entity(ship, Vec3::ZERO, 0.0);
        assert_eq!(zones.zone(&zone).unwrap().position, moved);
    }

    #[test]
    fn test_attach_to_missing_host() {
        let mut world = MemoryWorld::new(MemoryZoneProvider::new());
        assert!(!world.attach_zone(&ZoneId::from("x"), EntityId(1), Vec3::ZERO));
        assert!(world.attachment(&ZoneId::from("x")).is_none());
    }

    #[test]
    fn test_entities_enumerate_in_id_order() {
        let world = MemoryWorld::new(MemoryZoneProvider::new());
        world.spawn(EntityInfo::new(EntityId(5), EntityKind::Other, Vec3::ZERO));
        world.spawn(EntityInfo::new(EntityId(2), EntityKind::BradleyApc, Vec3::ZERO));
        assert_eq!(world.entity_ids(), vec![EntityId(2), EntityId(5)]);
    }
}
