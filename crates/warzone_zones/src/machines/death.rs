use crate::ids::ActorId;
use crate::lifecycle::{CreateOutcome, CreateRequest};
use crate::manager::ZoneManager;
use serde::{Deserialize, Serialize};
use warzone_catalog::event_names;
use warzone_math::Vec3;

/// Lifetime used when a death family's definition carries none
pub const DEFAULT_DEATH_LIFETIME: f32 = 600.0;

/// Vehicles whose destruction opens a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathFamily {
    BradleyApc,
    PatrolHelicopter,
}

impl DeathFamily {
    pub fn event_name(self) -> &'static str {
        match self {
            Self::BradleyApc => event_names::BRADLEY_APC,
            Self::PatrolHelicopter => event_names::PATROL_HELICOPTER,
        }
    }
}

impl ZoneManager {
    /// A vehicle was destroyed at `position`
    pub fn on_vehicle_killed(&mut self, family: DeathFamily, position: Vec3, killer: Option<ActorId>) -> bool {
        if self.ctx.catalog.rules.death.require_actor_killer && killer.is_none() {
            log::debug!("{} died without an actor killer", family.event_name());
            return false;
        }

        let event = family.event_name();
        let request = CreateRequest::new(event, position).with_fallback_lifetime(DEFAULT_DEATH_LIFETIME);
        match self.try_create_zone(request) {
            Ok(CreateOutcome::Created(_)) => true,
            Ok(CreateOutcome::Deferred(zone)) => {
                log::debug!("Zone {} for {} deferred by start delay", zone, event);
                false
            }
            Err(e) => {
                log::debug!("Not creating zone for {}: {}", event, e);
                false
            }
        }
    }
}
