use crate::error::CommandError;
use crate::ids::ZoneId;
use crate::lifecycle::{CreateOutcome, CreateRequest};
use crate::manager::{TimerKey, ZoneManager};
use warzone_math::Vec3;

/// Zone id of an administrator-defined event
pub fn user_zone_id(name: &str) -> ZoneId {
    ZoneId::new(format!("user:{}", name))
}

impl ZoneManager {
    /// Start a user event. Persistent events use their stored position
    /// unless one is given; one-shot events need one and stop on their own.
    pub fn start_user_event(&mut self, name: &str, position: Option<Vec3>) -> Result<CreateOutcome, CommandError> {
        if !self.ctx.catalog.contains(name) {
            return Err(CommandError::UnknownEvent(name.to_string()));
        }
        let zone = user_zone_id(name);
        if self.ctx.is_active(&zone) {
            return Err(CommandError::AlreadyActive(name.to_string()));
        }

        let (request, lifetime) = if let Some(auto) = self.ctx.store.auto_events.get(name) {
            (CreateRequest::new(name, position.unwrap_or(auto.position)), None)
        } else if let Some(timed) = self.ctx.store.timed_events.get(name) {
            let position = position.ok_or_else(|| CommandError::MissingPosition(name.to_string()))?;
            (CreateRequest::new(name, position).without_start_delay(), Some(timed.duration))
        } else {
            return Err(CommandError::NotUserEvent(name.to_string()));
        };

        let outcome = self
            .try_create_zone(request.with_zone_id(zone.clone()))
            .map_err(|source| CommandError::StartFailed {
                name: name.to_string(),
                source,
            })?;
        if let Some(lifetime) = lifetime {
            self.request_delete(&zone, Some(lifetime));
        }
        Ok(outcome)
    }

    /// Stop a running user event, honouring its stop delay
    pub fn stop_user_event(&mut self, name: &str) -> Result<(), CommandError> {
        let zone = user_zone_id(name);
        if !self.ctx.is_active(&zone) {
            if self.scheduler.cancel(&TimerKey::StartDelay(zone)).is_some() {
                return Ok(());
            }
            return Err(CommandError::NotActive(name.to_string()));
        }
        self.request_delete(&zone, None);
        Ok(())
    }
}
