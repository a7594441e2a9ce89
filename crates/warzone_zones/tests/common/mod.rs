//! Shared harness: a zone manager wired to in-memory collaborators

#![allow(dead_code)]

use warzone_catalog::{EventCatalog, EventDefinition, PluginConfig, UserEventStore, ZoneShape};
use warzone_math::Vec3;
use warzone_zones::prelude::*;

pub struct Harness {
    pub manager: ZoneManager,
    pub zones: MemoryZoneProvider,
    pub world: MemoryWorld,
    pub mapping: MemoryMapping,
    pub bots: MemoryBots,
    pub domes: MemoryDomes,
    pub listeners: MemoryListeners,
    pub exclusion: MemoryExclusion,
    pub observer: RecordingObserver,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_catalog(EventCatalog::with_defaults())
    }

    pub fn with_catalog(catalog: EventCatalog) -> Self {
        Self::build(catalog, UserEventStore::new(), PluginConfig::default(), false)
    }

    pub fn build(catalog: EventCatalog, store: UserEventStore, config: PluginConfig, exclusion_api: bool) -> Self {
        Self::build_with_context(ZoneContext::new(catalog, store), config, exclusion_api)
    }

    pub fn build_with_context(ctx: ZoneContext, config: PluginConfig, exclusion_api: bool) -> Self {
        let zones = MemoryZoneProvider::new();
        let world = MemoryWorld::new(zones.clone());
        let mapping = MemoryMapping::new();
        let bots = MemoryBots::new();
        let domes = MemoryDomes::new();
        let listeners = MemoryListeners::new();
        let exclusion = MemoryExclusion::new();
        let observer = RecordingObserver::new();

        let mut services = Services::new(zones.clone(), world.clone())
            .with_mapping(mapping.clone())
            .with_bots(bots.clone())
            .with_domes(domes.clone())
            .with_listeners(listeners.clone())
            .with_observer(observer.clone());
        if exclusion_api {
            services = services.with_exclusion(exclusion.clone());
        }

        let manager = ZoneManager::new(ctx, services, config);
        Self {
            manager,
            zones,
            world,
            mapping,
            bots,
            domes,
            listeners,
            exclusion,
            observer,
        }
    }

    /// Forward queued membership changes to the manager
    pub fn pump(&mut self) {
        for (actor, transition) in self.world.take_transitions() {
            match transition {
                ZoneTransition::Entered(zone) => self.manager.on_zone_enter(actor, &zone),
                ZoneTransition::Exited(zone) => self.manager.on_zone_exit(actor, &zone),
            }
        }
    }

    pub fn move_actor(&mut self, actor: ActorId, position: Vec3) {
        self.world.set_actor_position(actor, position);
        self.pump();
    }

    pub fn tick(&mut self, seconds: f32) {
        self.manager.update(seconds);
        self.pump();
    }

    pub fn create(&mut self, event: &str, zone: &str, position: Vec3) -> bool {
        let created = self
            .manager
            .create_zone(CreateRequest::new(event, position).with_zone_id(zone));
        self.pump();
        created
    }

    pub fn count_notifications(&self, pred: impl Fn(&ZoneNotification) -> bool) -> usize {
        self.observer.notifications().iter().filter(|n| pred(n)).count()
    }
}

/// Catalog with only the given extra definitions on top of the built-ins
pub fn catalog_with(events: &[(&str, EventDefinition)]) -> EventCatalog {
    let mut catalog = EventCatalog::with_defaults();
    for (name, definition) in events {
        catalog.upsert(*name, definition.clone());
    }
    catalog
}

pub fn sphere(radius: f32) -> EventDefinition {
    EventDefinition::new(ZoneShape::sphere(radius)).without_domes()
}
