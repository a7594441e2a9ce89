use crate::ids::ZoneId;
use crate::lifecycle::CreateRequest;
use crate::manager::ZoneManager;
use crate::services::WorldEnvironment;
use warzone_catalog::{EventDefinition, ZoneShape};
use warzone_geometry::MapFeature;
use warzone_math::Vec3;

/// Zone id of one instance of a map feature
pub fn feature_zone_id(feature: &MapFeature) -> ZoneId {
    let p = feature.transform.position;
    ZoneId::new(format!("{}@{:.0},{:.0}", feature.name, p.x, p.z))
}

/// World position and heading of a feature's zone
pub(crate) fn feature_placement(feature: &MapFeature, definition: &EventDefinition) -> (Vec3, f32) {
    let offset = definition.shape.anchor.map_or(Vec3::ZERO, |anchor| anchor.0);
    (feature.transform.transform_point(offset), feature.transform.yaw())
}

impl ZoneManager {
    /// Create the zone of a map feature, deriving its geometry first when
    /// the definition asks for it
    pub fn start_map_feature(&mut self, feature: &MapFeature) -> bool {
        let created = self.start_feature_zone(feature);
        self.settle_feature_geometry();
        self.persist_catalog_if_dirty();
        created
    }

    /// Feature zone for the startup scan; derived geometry keeps growing
    /// until the scan settles it
    pub(crate) fn start_feature_zone(&mut self, feature: &MapFeature) -> bool {
        let name = feature.name.as_str();
        if !self.ctx.catalog.contains(name) {
            let mut definition = EventDefinition::new(ZoneShape::default()).with_auto_geometry();
            definition.enabled = false;
            self.ctx.catalog.upsert(name, definition);
            self.machines.catalog_dirty = true;
            log::info!("Added disabled definition for map feature '{}'", name);
        }

        if self.ctx.definition(name).is_some_and(|def| def.auto_geometry) {
            let derived = self
                .deriver
                .derive(feature, &WorldEnvironment(self.services.world.as_ref()));
            match (derived, self.ctx.catalog.get_mut(name)) {
                (Some(geometry), Some(definition)) => {
                    definition.shape = geometry.into_shape();
                    self.machines.deriving.insert(name.to_string());
                    self.machines.catalog_dirty = true;
                    log::debug!("Derived zone geometry for '{}'", name);
                }
                _ => log::warn!("No geometry found for map feature '{}'; keeping configured shape", name),
            }
        }

        let zone = feature_zone_id(feature);
        self.machines.features.insert(zone.clone(), feature.clone());
        match self.ctx.definition(name) {
            Some(definition) if definition.enabled => {
                let (position, yaw) = feature_placement(feature, definition);
                let request = CreateRequest::new(name, position)
                    .with_zone_id(zone)
                    .with_yaw(yaw)
                    .without_start_delay();
                self.create_zone(request)
            }
            _ => false,
        }
    }

    /// Stop deriving geometry for features seen this scan and fit their
    /// zones to the final envelope
    pub(crate) fn settle_feature_geometry(&mut self) {
        let names = std::mem::take(&mut self.machines.deriving);
        for name in names {
            if let Some(definition) = self.ctx.catalog.get_mut(&name) {
                definition.auto_geometry = false;
                self.machines.catalog_dirty = true;
                log::info!("Derived zone geometry for '{}'", name);
            }
            for zone in self.ctx.zones_of(&name) {
                let placement = match (self.machines.features.get(&zone), self.ctx.definition(&name)) {
                    (Some(feature), Some(definition)) => feature_placement(feature, definition),
                    _ => continue,
                };
                if let Err(e) = self.refresh_zone(&zone, placement.0, placement.1) {
                    log::debug!("Could not fit zone {} to derived geometry: {}", zone, e);
                }
            }
        }
    }

    /// Save catalog edits made by geometry derivation
    pub(crate) fn persist_catalog_if_dirty(&mut self) {
        if !self.machines.catalog_dirty {
            return;
        }
        match self.ctx.save_catalog() {
            Ok(()) => self.machines.catalog_dirty = false,
            Err(e) => log::error!("Failed to save catalog: {}", e),
        }
    }
}
