//! Administrator command surface
//!
//! Commands arrive already parsed. Each returns the text to show the
//! administrator, or a [`CommandError`] whose `Display` is the failure text.

use crate::error::CommandError;
use crate::ids::{ActorId, ZoneId};
use crate::lifecycle::CreateOutcome;
use crate::machines::{feature_placement, user_zone_id};
use crate::manager::{TimerKey, ZoneManager};
use crate::services::ZoneHandle;
use serde::{Deserialize, Serialize};
use warzone_catalog::{EventDefinition, ZoneShape};
use warzone_math::Vec3;

/// Largest radius `show` will search
pub const MAX_SHOW_RADIUS: f32 = 1000.0;
/// Longest time `show` keeps outlines up
pub const MAX_SHOW_SECONDS: f32 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserEventKind {
    /// Fixed position, optionally started at boot
    Auto { position: Vec3, autostart: bool },
    /// Started where the administrator stands, stops after `duration`
    Timed { duration: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum EditField {
    Enabled(bool),
    Radius(f32),
    Size(Vec3),
    Rotation(f32),
    /// Zero or less removes the lifetime
    Duration(f32),
    StartDelay(f32),
    StopDelay(f32),
    /// Zero or less disables the delay
    PvpDelay(f32),
    Mapping(String),
    AutoStart(bool),
    Position(Vec3),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AdminCommand {
    Add { name: String, kind: UserEventKind },
    Remove { name: String },
    Start {
        name: String,
        #[serde(default)]
        position: Option<Vec3>,
    },
    Stop { name: String },
    Edit { name: String, field: EditField },
    List,
    /// Outline active zones near `actor`
    Show { actor: ActorId, radius: f32, seconds: f32 },
}

fn non_negative(field: &'static str, value: f32) -> Result<f32, CommandError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CommandError::InvalidValue {
            field,
            value: value.to_string(),
        })
    }
}

impl ZoneManager {
    pub fn execute_command(&mut self, command: AdminCommand) -> Result<String, CommandError> {
        match command {
            AdminCommand::Add { name, kind } => self.add_user_event(name, kind),
            AdminCommand::Remove { name } => self.remove_user_event(&name),
            AdminCommand::Start { name, position } => match self.start_user_event(&name, position)? {
                CreateOutcome::Created(zone) => Ok(format!("Started '{}' (zone {})", name, zone)),
                CreateOutcome::Deferred(_) => {
                    let delay = self.ctx.definition(&name).map_or(0.0, |def| def.start_delay);
                    Ok(format!("'{}' starts in {}s", name, delay))
                }
            },
            AdminCommand::Stop { name } => {
                self.stop_user_event(&name)?;
                Ok(format!("Stopped '{}'", name))
            }
            AdminCommand::Edit { name, field } => self.edit_event(&name, field),
            AdminCommand::List => Ok(self.list_user_events()),
            AdminCommand::Show { actor, radius, seconds } => self.show_zones(actor, radius, seconds),
        }
    }

    fn add_user_event(&mut self, name: String, kind: UserEventKind) -> Result<String, CommandError> {
        if self.ctx.catalog.contains(&name) || self.ctx.store.contains(&name) {
            return Err(CommandError::AlreadyExists(name));
        }

        let autostart = match kind {
            UserEventKind::Auto { position, autostart } => {
                self.ctx.store.add_auto(name.clone(), position, autostart)?;
                autostart
            }
            UserEventKind::Timed { duration } => {
                if duration <= 0.0 {
                    return Err(CommandError::InvalidValue {
                        field: "duration",
                        value: duration.to_string(),
                    });
                }
                self.ctx.store.add_timed(name.clone(), duration)?;
                false
            }
        };
        self.ctx
            .catalog
            .insert(name.clone(), EventDefinition::new(ZoneShape::default()))?;
        self.ctx.save_catalog()?;
        self.ctx.save_store()?;

        if autostart {
            self.start_user_event(&name, None)?;
        }
        Ok(format!("Added '{}'", name))
    }

    fn remove_user_event(&mut self, name: &str) -> Result<String, CommandError> {
        if !self.ctx.store.contains(name) {
            return Err(if self.ctx.catalog.contains(name) {
                CommandError::NotUserEvent(name.to_string())
            } else {
                CommandError::UnknownEvent(name.to_string())
            });
        }

        let zone = user_zone_id(name);
        self.scheduler.cancel(&TimerKey::StartDelay(zone.clone()));
        if self.ctx.is_active(&zone) {
            self.delete_zone(&zone);
        }
        self.ctx.store.remove(name)?;
        self.ctx.catalog.remove(name)?;
        self.ctx.save_catalog()?;
        self.ctx.save_store()?;
        Ok(format!("Removed '{}'", name))
    }

    fn edit_event(&mut self, name: &str, field: EditField) -> Result<String, CommandError> {
        let mut definition = self
            .ctx
            .definition(name)
            .cloned()
            .ok_or_else(|| CommandError::UnknownEvent(name.to_string()))?;

        let mut note = "";
        match field {
            EditField::Enabled(enabled) => definition.enabled = enabled,
            EditField::Radius(radius) => definition.shape.radius = non_negative("radius", radius)?,
            EditField::Size(size) => {
                definition.shape.size = size.abs();
                // A radius would hide the new size
                if !size.is_zero() && definition.shape.radius > 0.0 {
                    definition.shape.radius = 0.0;
                    note = "radius cleared, ";
                }
            }
            EditField::Rotation(degrees) => definition.shape.rotation = degrees.rem_euclid(360.0),
            EditField::Duration(seconds) => definition.duration = (seconds > 0.0).then_some(seconds),
            EditField::StartDelay(seconds) => definition.start_delay = non_negative("start delay", seconds)?,
            EditField::StopDelay(seconds) => definition.stop_delay = non_negative("stop delay", seconds)?,
            EditField::PvpDelay(seconds) => {
                definition.pvp_delay_enabled = seconds > 0.0;
                if seconds > 0.0 {
                    definition.pvp_delay_time = seconds;
                }
            }
            EditField::Mapping(label) => definition.mapping = label,
            EditField::AutoStart(autostart) => {
                let auto = self
                    .ctx
                    .store
                    .auto_events
                    .get_mut(name)
                    .ok_or_else(|| CommandError::NotUserEvent(name.to_string()))?;
                auto.autostart = autostart;
                self.ctx.save_store()?;
                return Ok(format!("'{}' autostart is now {}", name, autostart));
            }
            EditField::Position(position) => {
                let auto = self
                    .ctx
                    .store
                    .auto_events
                    .get_mut(name)
                    .ok_or_else(|| CommandError::NotUserEvent(name.to_string()))?;
                auto.position = position;
                self.ctx.save_store()?;
                let restarted = self.restart_event_zones(name);
                return Ok(format!("Moved '{}' ({} zones restarted)", name, restarted));
            }
        }

        if definition.shape.is_unset() {
            return Err(CommandError::UnsetShape(name.to_string()));
        }
        self.ctx.catalog.upsert(name, definition);
        self.ctx.save_catalog()?;
        let restarted = self.restart_event_zones(name);
        Ok(format!("Updated '{}' ({}{} zones restarted)", name, note, restarted))
    }

    /// Apply an edit to every running zone of `event` in place
    fn restart_event_zones(&mut self, event: &str) -> usize {
        let mut restarted = 0;
        for zone in self.ctx.zones_of(event) {
            let Some((position, yaw)) = self.zone_placement(&zone, event) else {
                continue;
            };
            match self.refresh_zone(&zone, position, yaw) {
                Ok(()) => restarted += 1,
                Err(e) => {
                    log::debug!("Zone {} cannot take the edit ({}); deleting it", zone, e);
                    self.delete_zone(&zone);
                }
            }
        }
        restarted
    }

    /// Where a running zone of `event` belongs under its current definition
    fn zone_placement(&self, zone: &ZoneId, event: &str) -> Option<(Vec3, f32)> {
        if let (Some(feature), Some(definition)) = (self.machines.features.get(zone), self.ctx.definition(event)) {
            return Some(feature_placement(feature, definition));
        }
        let handle = self.services.zones.get_by_handle(zone)?;
        let position = match self.ctx.store.auto_events.get(event) {
            Some(auto) if *zone == user_zone_id(event) => auto.position,
            _ => handle.position,
        };
        let yaw = self
            .ctx
            .parent_of(zone)
            .and_then(|host| self.services.world.entity(host))
            .map_or(0.0, |host| host.yaw);
        Some((position, yaw))
    }

    fn list_user_events(&self) -> String {
        let status = |name: &str| {
            if self.ctx.is_active(&user_zone_id(name)) {
                "running"
            } else {
                "stopped"
            }
        };

        let mut lines = Vec::new();
        for (name, auto) in &self.ctx.store.auto_events {
            lines.push(format!(
                "{} [auto at {}, autostart {}] {}",
                name,
                auto.position,
                auto.autostart,
                status(name)
            ));
        }
        for (name, timed) in &self.ctx.store.timed_events {
            lines.push(format!("{} [timed {}s] {}", name, timed.duration, status(name)));
        }

        if lines.is_empty() {
            "No user-defined events".to_string()
        } else {
            lines.join("\n")
        }
    }

    fn show_zones(&mut self, actor: ActorId, radius: f32, seconds: f32) -> Result<String, CommandError> {
        let origin = self
            .services
            .world
            .actor_position(actor)
            .ok_or_else(|| CommandError::InvalidValue {
                field: "actor",
                value: actor.to_string(),
            })?;
        let radius = non_negative("radius", radius)?.min(MAX_SHOW_RADIUS);
        let seconds = non_negative("seconds", seconds)?.clamp(1.0, MAX_SHOW_SECONDS);

        let nearby: Vec<(ZoneId, ZoneHandle)> = self
            .ctx
            .active_zones()
            .filter_map(|(zone, _)| self.services.zones.get_by_handle(zone).map(|h| (zone.clone(), h)))
            .filter(|(_, handle)| handle.position.distance(origin) <= radius + handle.volume.reach())
            .collect();

        for (zone, handle) in &nearby {
            self.services.world.show_zone(actor, zone, *handle, seconds);
        }
        Ok(format!("Showing {} zones within {}m", nearby.len(), radius))
    }
}
