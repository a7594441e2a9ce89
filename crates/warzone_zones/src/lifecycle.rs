//! Zone lifecycle: the only place zones are created, parented and deleted

use crate::error::{ZoneError, ZoneResult};
use crate::events::{VetoRequest, ZoneNotification};
use crate::ids::{is_valid_position, EntityId, ZoneId};
use crate::manager::{TimerAction, TimerKey, ZoneManager};
use warzone_catalog::{ZoneShape, ZoneVolume};
use warzone_math::Vec3;

/// Host a new zone should follow once created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentSpec {
    pub host: EntityId,
    /// Delete the zone if the host cannot be followed
    pub delete_on_failure: bool,
    /// Seconds to wait before parenting
    pub delay: f32,
}

/// Everything needed to create one zone
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub event: String,
    pub position: Vec3,
    /// Generated when absent
    pub zone: Option<ZoneId>,
    /// Overrides the definition's shape
    pub shape: Option<ZoneShape>,
    /// Heading of whatever the zone sits on; defaults to the parent's
    pub yaw: Option<f32>,
    pub honor_start_delay: bool,
    pub parent: Option<ParentSpec>,
    /// Lifetime used when the definition has no duration
    pub fallback_lifetime: Option<f32>,
}

impl CreateRequest {
    pub fn new(event: impl Into<String>, position: Vec3) -> Self {
        Self {
            event: event.into(),
            position,
            zone: None,
            shape: None,
            yaw: None,
            honor_start_delay: true,
            parent: None,
            fallback_lifetime: None,
        }
    }

    pub fn with_zone_id(mut self, zone: impl Into<ZoneId>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn with_shape(mut self, shape: ZoneShape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = Some(yaw);
        self
    }

    pub fn with_fallback_lifetime(mut self, seconds: f32) -> Self {
        self.fallback_lifetime = Some(seconds);
        self
    }

    pub fn without_start_delay(mut self) -> Self {
        self.honor_start_delay = false;
        self
    }

    pub fn parented_to(mut self, host: EntityId, delete_on_failure: bool) -> Self {
        self.parent = Some(ParentSpec {
            host,
            delete_on_failure,
            delay: 0.0,
        });
        self
    }
}

/// Successful outcome of a create
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(ZoneId),
    /// Re-armed behind the definition's start delay
    Deferred(ZoneId),
}

/// Turn a cube to the heading of whatever it sits on
fn oriented(volume: ZoneVolume, shape: &ZoneShape, yaw: f32) -> ZoneVolume {
    match volume {
        ZoneVolume::Cube { size, .. } => ZoneVolume::Cube {
            size,
            rotation: shape.effective_rotation(yaw),
        },
        sphere => sphere,
    }
}

impl ZoneManager {
    /// Create a zone; `true` only if it exists when this returns
    pub fn create_zone(&mut self, request: CreateRequest) -> bool {
        let event = request.event.clone();
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

    pub fn try_create_zone(&mut self, mut request: CreateRequest) -> ZoneResult<CreateOutcome> {
        if !is_valid_position(request.position) {
            return Err(ZoneError::InvalidPosition);
        }
        let definition = self
            .ctx
            .definition(&request.event)
            .cloned()
            .ok_or_else(|| ZoneError::UnknownEvent(request.event.clone()))?;
        if !definition.enabled {
            return Err(ZoneError::Disabled(request.event));
        }

        let shape = request.shape.clone().unwrap_or_else(|| definition.shape.clone());
        let Some(volume) = shape.volume() else {
            log::warn!("Event '{}' has neither a radius nor a size; skipping", request.event);
            return Err(ZoneError::EmptyShape(request.event));
        };

        let zone = match &request.zone {
            Some(zone) => zone.clone(),
            None => self.ctx.next_zone_id(),
        };
        if self.ctx.is_active(&zone) {
            return Err(ZoneError::AlreadyActive(zone));
        }

        let start_key = TimerKey::StartDelay(zone.clone());
        if request.honor_start_delay && definition.start_delay > 0.0 {
            request.zone = Some(zone.clone());
            request.honor_start_delay = false;
            self.scheduler
                .arm(start_key, definition.start_delay, TimerAction::Create(request));
            return Ok(CreateOutcome::Deferred(zone));
        }
        self.scheduler.cancel(&start_key);

        let position = request.position;
        let veto = VetoRequest::Create {
            zone: zone.clone(),
            event: request.event.clone(),
            position,
        };
        if self.services.vetoed(&veto) {
            self.services.notify(ZoneNotification::CreationVetoed {
                zone: zone.clone(),
                event: request.event,
            });
            return Err(ZoneError::Vetoed(zone));
        }

        let host_yaw = request
            .parent
            .and_then(|p| self.services.world.entity(p.host))
            .map(|host| host.yaw);
        let yaw = request.yaw.or(host_yaw).unwrap_or(0.0);
        let volume = oriented(volume, &shape, yaw);

        if !self.services.zones.create_or_update(&zone, volume, position) {
            return Err(ZoneError::ProviderRefused(zone));
        }

        self.ctx.register(zone.clone(), &request.event, &definition);
        self.recompute_hooks();

        // Side effects below are best-effort
        if definition.domes.enabled {
            if let ZoneVolume::Sphere { radius } = volume {
                if self
                    .services
                    .domes
                    .spawn(&zone, position, radius, definition.domes.darkness)
                {
                    self.ctx.add_dome(zone.clone());
                } else {
                    log::debug!("Dome provider refused zone {}", zone);
                }
            }
        }
        if definition.bots.enabled {
            if let Err(e) = self
                .services
                .bots
                .add_group_spawn(position, &definition.bots.profile, &zone)
            {
                log::debug!("Bot spawn for zone {} failed: {}", zone, e);
            }
        }
        if !self.services.mapping.add_or_update(&zone, &definition.mapping) {
            log::debug!("Safe-zone mapping refused zone {}", zone);
        }
        let lifetime = definition
            .positive_duration()
            .or(request.fallback_lifetime.filter(|seconds| *seconds > 0.0));
        if let Some(duration) = lifetime {
            self.request_delete(&zone, Some(duration));
        }

        log::info!("Created zone {} for {} at {}", zone, request.event, position);
        self.services.notify(ZoneNotification::ZoneCreated {
            zone: zone.clone(),
            event: request.event,
        });

        if let Some(parent) = request.parent {
            self.parent_to_entity(&zone, parent.host, parent.delete_on_failure, parent.delay);
            if !self.ctx.is_active(&zone) {
                return Err(ZoneError::MissingHost(parent.host));
            }
        }

        Ok(CreateOutcome::Created(zone))
    }

    /// Schedule or perform deletion.
    ///
    /// A positive `duration` (re)arms the zone's delete timer. Otherwise the
    /// stop delay applies: with one, the zone is detached now and deleted
    /// when it elapses; without, it is deleted immediately.
    pub fn request_delete(&mut self, zone: &ZoneId, duration: Option<f32>) -> bool {
        if !self.ctx.is_active(zone) {
            if self.scheduler.cancel(&TimerKey::StartDelay(zone.clone())).is_some() {
                log::debug!("Cancelled pending start of zone {}", zone);
            }
            return false;
        }

        let key = TimerKey::Delete(zone.clone());
        if let Some(duration) = duration.filter(|d| *d > 0.0) {
            self.scheduler
                .arm(key, duration, TimerAction::RequestDelete(zone.clone()));
            return true;
        }

        let stop_delay = self
            .ctx
            .event_of(zone)
            .and_then(|event| self.ctx.definition(event))
            .map_or(0.0, |def| def.stop_delay);
        if stop_delay > 0.0 {
            if self.is_stopping(zone) {
                return true;
            }
            self.unparent_zone(zone);
            self.scheduler
                .arm(key, stop_delay, TimerAction::Delete(zone.clone()));
            log::debug!("Zone {} stopping in {}s", zone, stop_delay);
            return true;
        }

        self.delete_zone(zone)
    }

    /// Whether the zone is detached and waiting for its final deletion
    pub fn is_stopping(&self, zone: &ZoneId) -> bool {
        matches!(
            self.scheduler.action(&TimerKey::Delete(zone.clone())),
            Some(TimerAction::Delete(_))
        )
    }

    /// Delete now; a no-op returning `false` for inactive zones
    pub fn delete_zone(&mut self, zone: &ZoneId) -> bool {
        match self.remove_zone(zone, true) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Not deleting zone {}: {}", zone, e);
                false
            }
        }
    }

    pub(crate) fn remove_zone(&mut self, zone: &ZoneId, honor_veto: bool) -> ZoneResult<()> {
        let event = self
            .ctx
            .event_of(zone)
            .map(str::to_string)
            .ok_or_else(|| ZoneError::NotActive(zone.clone()))?;

        if honor_veto {
            let veto = VetoRequest::Delete {
                zone: zone.clone(),
                event: event.clone(),
            };
            if self.services.vetoed(&veto) {
                self.services.notify(ZoneNotification::DeletionVetoed {
                    zone: zone.clone(),
                    event,
                });
                return Err(ZoneError::Vetoed(zone.clone()));
            }
        }

        let bots = self.ctx.definition(&event).is_some_and(|def| def.bots.enabled);
        if self.ctx.take_dome(zone) {
            self.services.domes.shrink_and_destroy(zone);
        }
        if bots {
            if let Err(e) = self.services.bots.remove_group_spawn(zone) {
                log::debug!("Bot despawn for zone {} failed: {}", zone, e);
            }
        }
        if !self.services.mapping.remove(zone) {
            log::debug!("Safe-zone mapping had no entry for zone {}", zone);
        }

        // Membership is unreliable once the zone is erased
        let occupants = self.services.zones.list_occupants(zone);
        if self.ctx.take_parent(zone).is_some() {
            self.services.world.detach_zone(zone);
        }
        if !self.services.zones.erase(zone) {
            return Err(ZoneError::ProviderRefused(zone.clone()));
        }

        for actor in occupants {
            self.exit_zone(actor, zone, &event);
        }
        self.ctx.unregister(zone);
        self.recompute_hooks();
        self.scheduler.cancel(&TimerKey::Delete(zone.clone()));
        self.scheduler.cancel(&TimerKey::Parent(zone.clone()));

        log::info!("Deleted zone {} ({})", zone, event);
        self.services.notify(ZoneNotification::ZoneDeleted {
            zone: zone.clone(),
            event,
        });
        Ok(())
    }

    /// Re-apply the current definition to a live zone in place.
    ///
    /// The zone keeps its id, registrations and timers; occupants only see
    /// an exit if the new volume no longer contains them.
    pub(crate) fn refresh_zone(&mut self, zone: &ZoneId, position: Vec3, yaw: f32) -> ZoneResult<()> {
        let event = self
            .ctx
            .event_of(zone)
            .map(str::to_string)
            .ok_or_else(|| ZoneError::NotActive(zone.clone()))?;
        let definition = self
            .ctx
            .definition(&event)
            .cloned()
            .ok_or_else(|| ZoneError::UnknownEvent(event.clone()))?;
        if !definition.enabled {
            return Err(ZoneError::Disabled(event));
        }
        let volume = definition
            .shape
            .volume()
            .ok_or_else(|| ZoneError::EmptyShape(event.clone()))?;
        let volume = oriented(volume, &definition.shape, yaw);

        if !self.services.zones.create_or_update(zone, volume, position) {
            return Err(ZoneError::ProviderRefused(zone.clone()));
        }
        self.ctx.register(zone.clone(), &event, &definition);
        self.recompute_hooks();

        if !self.services.mapping.add_or_update(zone, &definition.mapping) {
            log::debug!("Safe-zone mapping refused zone {}", zone);
        }
        if self.ctx.take_dome(zone) {
            self.services.domes.shrink_and_destroy(zone);
        }
        if let (true, ZoneVolume::Sphere { radius }) = (definition.domes.enabled, volume) {
            if self
                .services
                .domes
                .spawn(zone, position, radius, definition.domes.darkness)
            {
                self.ctx.add_dome(zone.clone());
            }
        }
        if let Some(host) = self.ctx.take_parent(zone) {
            if let Err(e) = self.try_parent(zone, host) {
                log::debug!("Refreshed zone {} no longer follows {}: {}", zone, host, e);
                self.services.world.detach_zone(zone);
            }
        }

        log::info!("Refreshed zone {} ({})", zone, event);
        Ok(())
    }

    /// Make the zone and its dome follow `host`
    pub fn parent_to_entity(&mut self, zone: &ZoneId, host: EntityId, delete_on_failure: bool, delay: f32) -> bool {
        if delay > 0.0 {
            self.scheduler.arm(
                TimerKey::Parent(zone.clone()),
                delay,
                TimerAction::Parent {
                    zone: zone.clone(),
                    host,
                    delete_on_failure,
                },
            );
            return true;
        }

        match self.try_parent(zone, host) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Cannot parent zone {} to {}: {}", zone, host, e);
                if delete_on_failure && self.ctx.is_active(zone) {
                    self.delete_zone(zone);
                }
                false
            }
        }
    }

    fn try_parent(&mut self, zone: &ZoneId, host: EntityId) -> ZoneResult<()> {
        let event = self
            .ctx
            .event_of(zone)
            .ok_or_else(|| ZoneError::NotActive(zone.clone()))?;
        let offset = self
            .ctx
            .definition(event)
            .and_then(|def| def.shape.parent_anchor())
            .map(|anchor| anchor.anchor_offset())
            .ok_or_else(|| ZoneError::UnsupportedParent(zone.clone()))?;

        if self.services.world.entity(host).is_none() {
            return Err(ZoneError::MissingHost(host));
        }
        if !self.services.world.attach_zone(zone, host, offset) {
            return Err(ZoneError::ProviderRefused(zone.clone()));
        }
        if self.ctx.has_dome(zone) && !self.services.domes.parent(zone, host, offset) {
            log::debug!("Dome for zone {} could not follow {}", zone, host);
        }
        self.ctx.set_parent(zone.clone(), host);
        Ok(())
    }

    /// Detach zone and dome from whatever they follow
    pub fn unparent_zone(&mut self, zone: &ZoneId) {
        if self.ctx.take_parent(zone).is_some() {
            self.services.world.detach_zone(zone);
        }
        if self.ctx.has_dome(zone) {
            self.services.domes.unparent(zone);
        }
    }
}
