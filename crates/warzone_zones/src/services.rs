//! Collaborator contracts
//!
//! The engine never touches the game world directly. Everything it needs
//! goes through these traits, bundled in [`Services`] and owned by the
//! [`ZoneManager`](crate::manager::ZoneManager).

use crate::events::{VetoRequest, ZoneNotification};
use crate::hooks::Listener;
use crate::ids::{ActorId, EntityId, ZoneId};
use crate::machines::CrateState;
use crate::memory::{MemoryBots, MemoryDomes, MemoryListeners, MemoryMapping};
use serde::{Deserialize, Serialize};
use warzone_catalog::{CargoPhase, ZoneVolume};
use warzone_geometry::{EnvironmentQuery, MapFeature};
use warzone_math::{OrientedBox, Vec3};

/// A materialized zone as the provider sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneHandle {
    pub position: Vec3,
    pub volume: ZoneVolume,
}

/// Spatial containment engine
pub trait ZoneProvider {
    /// Create the zone, or refresh it if it already exists
    fn create_or_update(&mut self, id: &ZoneId, volume: ZoneVolume, position: Vec3) -> bool;
    fn erase(&mut self, id: &ZoneId) -> bool;
    fn get_by_handle(&self, id: &ZoneId) -> Option<ZoneHandle>;
    fn list_occupants(&self, id: &ZoneId) -> Vec<ActorId>;
    fn list_actor_zone_ids(&self, actor: ActorId) -> Vec<ZoneId>;
    fn is_actor_in_zone(&self, id: &ZoneId, actor: ActorId) -> bool;
}

/// Damage / safe-zone rule engine
pub trait SafeZoneMapping {
    fn add_or_update(&mut self, id: &ZoneId, label: &str) -> bool;
    fn remove(&mut self, id: &ZoneId) -> bool;
}

/// NPC group spawner
pub trait BotProvider {
    fn add_group_spawn(&mut self, position: Vec3, profile: &str, group: &ZoneId) -> Result<(), String>;
    fn remove_group_spawn(&mut self, group: &ZoneId) -> Result<(), String>;
}

/// Decorative dome entities drawn around sphere zones
pub trait DomeProvider {
    fn spawn(&mut self, zone: &ZoneId, position: Vec3, radius: f32, darkness: u8) -> bool;
    fn parent(&mut self, zone: &ZoneId, host: EntityId, offset: Vec3) -> bool;
    fn unparent(&mut self, zone: &ZoneId);
    fn shrink_and_destroy(&mut self, zone: &ZoneId);
}

/// What kind of world entity something is, with the state its machine needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    BradleyApc,
    PatrolHelicopter,
    HackableCrate {
        state: CrateState,
        #[serde(default)]
        looted: bool,
    },
    SupplyDrop { landed: bool, looted: bool },
    CargoShip { phase: CargoPhase },
    PowerSwitch { powered: bool },
    Other,
}

/// Snapshot of a world entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityInfo {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec3,
    /// Heading in degrees
    pub yaw: f32,
    pub owner: Option<ActorId>,
    pub parent: Option<EntityId>,
}

impl EntityInfo {
    pub fn new(id: EntityId, kind: EntityKind, position: Vec3) -> Self {
        Self {
            id,
            kind,
            position,
            yaw: 0.0,
            owner: None,
            parent: None,
        }
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn with_owner(mut self, owner: ActorId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// The game world around the engine
pub trait HostWorld {
    fn entity(&self, id: EntityId) -> Option<EntityInfo>;
    /// Every live entity, in the host's enumeration order
    fn entity_ids(&self) -> Vec<EntityId>;
    fn map_features(&self) -> Vec<MapFeature>;
    fn no_build_volumes(&self, center: Vec3, radius: f32) -> Vec<OrientedBox>;
    fn ground_height(&self, position: Vec3) -> f32;
    fn actor_position(&self, actor: ActorId) -> Option<Vec3>;
    /// Make the zone follow `host` at `offset`
    fn attach_zone(&mut self, zone: &ZoneId, host: EntityId, offset: Vec3) -> bool;
    fn detach_zone(&mut self, zone: &ZoneId);
    fn holster_weapon(&mut self, actor: ActorId, seconds: f32);
    /// Draw the zone outline for one actor
    fn show_zone(&mut self, actor: ActorId, zone: &ZoneId, handle: ZoneHandle, seconds: f32);
}

/// Adapts a [`HostWorld`] to the geometry deriver's query contract
pub struct WorldEnvironment<'a>(pub &'a dyn HostWorld);

impl EnvironmentQuery for WorldEnvironment<'_> {
    fn no_build_volumes(&self, center: Vec3, radius: f32) -> Vec<OrientedBox> {
        self.0.no_build_volumes(center, radius)
    }
}

/// External "exclude actor from restrictions" API
pub trait ExclusionApi {
    fn exclude_actor(&mut self, actor: ActorId, seconds: f32) -> bool;
    fn clear_actor(&mut self, actor: ActorId);
}

/// Host-side listener (un)subscription
pub trait ListenerHost {
    fn set_subscribed(&mut self, listener: Listener, subscribed: bool);
}

/// Receives notifications and may veto zone creation or deletion
pub trait ZoneObserver {
    fn notify(&mut self, notification: &ZoneNotification);

    /// Return `true` to cancel the operation
    fn veto(&mut self, _request: &VetoRequest) -> bool {
        false
    }
}

/// Every collaborator the engine drives
pub struct Services {
    pub zones: Box<dyn ZoneProvider>,
    pub world: Box<dyn HostWorld>,
    pub mapping: Box<dyn SafeZoneMapping>,
    pub bots: Box<dyn BotProvider>,
    pub domes: Box<dyn DomeProvider>,
    pub listeners: Box<dyn ListenerHost>,
    pub exclusion: Option<Box<dyn ExclusionApi>>,
    pub observers: Vec<Box<dyn ZoneObserver>>,
}

impl Services {
    /// Create with in-memory defaults for everything but zones and world
    pub fn new(zones: impl ZoneProvider + 'static, world: impl HostWorld + 'static) -> Self {
        Self {
            zones: Box::new(zones),
            world: Box::new(world),
            mapping: Box::new(MemoryMapping::new()),
            bots: Box::new(MemoryBots::new()),
            domes: Box::new(MemoryDomes::new()),
            listeners: Box::new(MemoryListeners::new()),
            exclusion: None,
            observers: Vec::new(),
        }
    }

    pub fn with_mapping(mut self, mapping: impl SafeZoneMapping + 'static) -> Self {
        self.mapping = Box::new(mapping);
        self
    }

    pub fn with_bots(mut self, bots: impl BotProvider + 'static) -> Self {
        self.bots = Box::new(bots);
        self
    }

    pub fn with_domes(mut self, domes: impl DomeProvider + 'static) -> Self {
        self.domes = Box::new(domes);
        self
    }

    pub fn with_listeners(mut self, listeners: impl ListenerHost + 'static) -> Self {
        self.listeners = Box::new(listeners);
        self
    }

    pub fn with_exclusion(mut self, exclusion: impl ExclusionApi + 'static) -> Self {
        self.exclusion = Some(Box::new(exclusion));
        self
    }

    pub fn with_observer(mut self, observer: impl ZoneObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub(crate) fn notify(&mut self, notification: ZoneNotification) {
        for observer in &mut self.observers {
            observer.notify(&notification);
        }
    }

    /// True if any observer vetoes; every observer is asked
    pub(crate) fn vetoed(&mut self, request: &VetoRequest) -> bool {
        let mut vetoed = false;
        for observer in &mut self.observers {
            vetoed |= observer.veto(request);
        }
        vetoed
    }
}
