//! Owned registries shared by every engine component

use crate::ids::{EntityId, ZoneId, ZoneIdGenerator};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::PathBuf;
use warzone_catalog::{CatalogResult, EventCatalog, EventDefinition, UserEventStore};

/// Opt-in cross-cutting behaviours scoped to a set of zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluginCategory {
    LootLock,
    BackpackDrop,
    RestoreOnDeath,
}

impl PluginCategory {
    pub const ALL: [PluginCategory; 3] = [Self::LootLock, Self::BackpackDrop, Self::RestoreOnDeath];

    /// Whether zones of `definition` belong to this category
    pub fn opted_in(self, definition: &EventDefinition) -> bool {
        match self {
            Self::LootLock => definition.loot_lock,
            Self::BackpackDrop => definition.backpack_drop,
            Self::RestoreOnDeath => definition.block_restore_on_death,
        }
    }
}

/// Catalog, store and live zone registries
#[derive(Debug, Default)]
pub struct ZoneContext {
    pub catalog: EventCatalog,
    pub store: UserEventStore,
    catalog_path: Option<PathBuf>,
    store_path: Option<PathBuf>,
    active: BTreeMap<ZoneId, String>,
    categories: HashMap<PluginCategory, BTreeSet<ZoneId>>,
    domes: HashSet<ZoneId>,
    parents: HashMap<ZoneId, EntityId>,
    ids: ZoneIdGenerator,
}

impl ZoneContext {
    pub fn new(catalog: EventCatalog, store: UserEventStore) -> Self {
        Self {
            catalog,
            store,
            ..Default::default()
        }
    }

    /// Persist catalog and store edits to these files
    pub fn with_paths(mut self, catalog: impl Into<PathBuf>, store: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(catalog.into());
        self.store_path = Some(store.into());
        self
    }

    pub fn definition(&self, event: &str) -> Option<&EventDefinition> {
        self.catalog.get(event)
    }

    pub fn next_zone_id(&mut self) -> ZoneId {
        self.ids.next_id()
    }

    // Active zones

    pub fn is_active(&self, zone: &ZoneId) -> bool {
        self.active.contains_key(zone)
    }

    pub fn event_of(&self, zone: &ZoneId) -> Option<&str> {
        self.active.get(zone).map(String::as_str)
    }

    pub fn active_zones(&self) -> impl Iterator<Item = (&ZoneId, &str)> {
        self.active.iter().map(|(zone, event)| (zone, event.as_str()))
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Zones currently running `event`
    pub fn zones_of(&self, event: &str) -> Vec<ZoneId> {
        self.active
            .iter()
            .filter(|(_, e)| e.as_str() == event)
            .map(|(zone, _)| zone.clone())
            .collect()
    }

    /// Record `zone` as running `event`; re-registering updates its categories
    pub(crate) fn register(&mut self, zone: ZoneId, event: &str, definition: &EventDefinition) {
        for category in PluginCategory::ALL {
            let members = self.categories.entry(category).or_default();
            if category.opted_in(definition) {
                members.insert(zone.clone());
            } else {
                members.remove(&zone);
            }
        }
        self.active.insert(zone, event.to_string());
    }

    pub(crate) fn unregister(&mut self, zone: &ZoneId) -> Option<String> {
        for members in self.categories.values_mut() {
            members.remove(zone);
        }
        self.domes.remove(zone);
        self.parents.remove(zone);
        self.active.remove(zone)
    }

    // Category sets

    pub fn category(&self, category: PluginCategory) -> Option<&BTreeSet<ZoneId>> {
        self.categories.get(&category)
    }

    pub fn category_len(&self, category: PluginCategory) -> usize {
        self.categories.get(&category).map_or(0, BTreeSet::len)
    }

    pub fn in_category(&self, category: PluginCategory, zone: &ZoneId) -> bool {
        self.categories
            .get(&category)
            .is_some_and(|members| members.contains(zone))
    }

    // Domes and parents

    pub fn has_dome(&self, zone: &ZoneId) -> bool {
        self.domes.contains(zone)
    }

    pub fn dome_count(&self) -> usize {
        self.domes.len()
    }

    pub(crate) fn add_dome(&mut self, zone: ZoneId) {
        self.domes.insert(zone);
    }

    pub(crate) fn take_dome(&mut self, zone: &ZoneId) -> bool {
        self.domes.remove(zone)
    }

    pub fn parent_of(&self, zone: &ZoneId) -> Option<EntityId> {
        self.parents.get(zone).copied()
    }

    pub(crate) fn set_parent(&mut self, zone: ZoneId, host: EntityId) {
        self.parents.insert(zone, host);
    }

    pub(crate) fn take_parent(&mut self, zone: &ZoneId) -> Option<EntityId> {
        self.parents.remove(zone)
    }

    // Persistence

    pub fn save_catalog(&self) -> CatalogResult<()> {
        match &self.catalog_path {
            Some(path) => self.catalog.save(path),
            None => Ok(()),
        }
    }

    pub fn save_store(&self) -> CatalogResult<()> {
        match &self.store_path {
            Some(path) => self.store.save(path),
            None => Ok(()),
        }
    }
}
