//! Event definitions

use crate::error::{CatalogError, CatalogResult};
use crate::shape::ZoneShape;
use serde::{Deserialize, Serialize};

/// How a command list is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CommandMode {
    /// Listed commands are blocked, everything else is allowed
    #[default]
    Deny,
    /// Only listed commands are allowed
    Allow,
}

/// Command restrictions applied to actors inside the zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CommandFilter {
    pub mode: CommandMode,
    /// Command names, compared case-insensitively and without a leading '/'
    pub commands: Vec<String>,
    /// Keep applying the filter while the actor is PvP-delayed from this event
    pub applies_during_delay: bool,
}

impl CommandFilter {
    /// True if the filter has nothing to check
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether `command` is blocked by this filter
    pub fn blocks(&self, command: &str) -> bool {
        if self.commands.is_empty() {
            return false;
        }
        let command = normalize_command(command);
        let listed = self
            .commands
            .iter()
            .any(|c| normalize_command(c) == command);
        match self.mode {
            CommandMode::Deny => listed,
            CommandMode::Allow => !listed,
        }
    }
}

fn normalize_command(command: &str) -> String {
    command
        .trim()
        .trim_start_matches('/')
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// NPC group spawned inside the zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BotSettings {
    pub enabled: bool,
    pub profile: String,
}

/// Decorative domes drawn around sphere zones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomeSettings {
    pub enabled: bool,
    /// Number of stacked spheres (higher is darker)
    pub darkness: u8,
}

impl Default for DomeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            darkness: 8,
        }
    }
}

/// Configuration of one event family
///
/// Field order is the serialization order; keep it stable so saved
/// catalogs diff cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub enabled: bool,
    /// Seconds between the trigger and the zone appearing
    #[serde(default)]
    pub start_delay: f32,
    /// Seconds between the stop trigger and the zone disappearing
    #[serde(default)]
    pub stop_delay: f32,
    /// Zone lifetime after creation; `None` means the family decides
    #[serde(default)]
    pub duration: Option<f32>,
    /// Seconds weapons stay holstered after entering the zone
    #[serde(default)]
    pub holster_time: f32,
    #[serde(default)]
    pub pvp_delay_enabled: bool,
    #[serde(default)]
    pub pvp_delay_time: f32,
    /// Safe-zone mapping label ("exclusive" damage rules)
    #[serde(default = "default_mapping")]
    pub mapping: String,
    #[serde(default)]
    pub command_filter: CommandFilter,
    /// Lock loot to the player that earned it
    #[serde(default)]
    pub loot_lock: bool,
    /// Force backpacks to drop on death
    #[serde(default)]
    pub backpack_drop: bool,
    /// Prevent inventory restore on death
    #[serde(default)]
    pub block_restore_on_death: bool,
    #[serde(default)]
    pub bots: BotSettings,
    #[serde(default)]
    pub domes: DomeSettings,
    pub shape: ZoneShape,
    /// Derive the shape from the environment on next startup
    #[serde(default)]
    pub auto_geometry: bool,
}

fn default_mapping() -> String {
    "exclusive".to_string()
}

impl EventDefinition {
    /// Create an enabled definition with the given shape
    pub fn new(shape: ZoneShape) -> Self {
        Self {
            enabled: true,
            start_delay: 0.0,
            stop_delay: 0.0,
            duration: None,
            holster_time: 0.0,
            pvp_delay_enabled: false,
            pvp_delay_time: 10.0,
            mapping: default_mapping(),
            command_filter: CommandFilter::default(),
            loot_lock: false,
            backpack_drop: false,
            block_restore_on_death: false,
            bots: BotSettings::default(),
            domes: DomeSettings::default(),
            shape,
            auto_geometry: false,
        }
    }

    /// Set the zone lifetime
    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Set start and stop delays
    pub fn with_delays(mut self, start: f32, stop: f32) -> Self {
        self.start_delay = start;
        self.stop_delay = stop;
        self
    }

    /// Enable PvP delay after leaving the zone
    pub fn with_pvp_delay(mut self, seconds: f32) -> Self {
        self.pvp_delay_enabled = true;
        self.pvp_delay_time = seconds;
        self
    }

    /// Set the command filter
    pub fn with_command_filter(mut self, filter: CommandFilter) -> Self {
        self.command_filter = filter;
        self
    }

    /// Disable dome visuals
    pub fn without_domes(mut self) -> Self {
        self.domes.enabled = false;
        self
    }

    /// Mark for geometry derivation on next startup
    pub fn with_auto_geometry(mut self) -> Self {
        self.auto_geometry = true;
        self
    }

    /// Whether leaving the zone starts a PvP delay
    pub fn has_pvp_delay(&self) -> bool {
        self.pvp_delay_enabled && self.pvp_delay_time > 0.0
    }

    /// Lifetime if the definition carries one
    pub fn positive_duration(&self) -> Option<f32> {
        self.duration.filter(|d| *d > 0.0)
    }

    /// Check the definition can be materialized
    pub fn validate(&self, name: &str) -> CatalogResult<()> {
        if self.shape.is_unset() {
            return Err(CatalogError::UnsetShape(name.to_string()));
        }
        Ok(())
    }
}

impl Default for EventDefinition {
    fn default() -> Self {
        Self::new(ZoneShape::default())
    }
}
