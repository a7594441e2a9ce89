//! Plugin configuration
//!
//! # Example Config File
//!
//! ```toml
//! [general]
//! verbose = false
//! catalog_path = "data/warzone_catalog.json"
//! store_path = "data/warzone_user_events.json"
//!
//! [pvp_delay]
//! victim_delayed_attacker_in_zone = true
//! both_delayed_same_zone = true
//! attacker_delayed_victim_in_zone = true
//! prefer_exclusion_api = true
//!
//! [startup]
//! initial_batch = 32
//! min_batch = 4
//! max_batch = 512
//! frame_budget_ms = 5
//! verbose_pause_ms = 250
//!
//! [supply]
//! signal_window_secs = 10.0
//! signal_window_radius = 20.0
//! ground_anchor_height = 15.0
//! ```

use crate::error::CatalogResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log every startup item and pause between batches so the log keeps up
    pub verbose: bool,
    pub catalog_path: String,
    pub store_path: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            catalog_path: "data/warzone_catalog.json".to_string(),
            store_path: "data/warzone_user_events.json".to_string(),
        }
    }
}

/// Which damage is authorized while actors are PvP-delayed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PvpDelayConfig {
    /// Delayed victim can be hit by attackers inside the zone they left
    pub victim_delayed_attacker_in_zone: bool,
    /// Two actors delayed from the same zone can hit each other
    pub both_delayed_same_zone: bool,
    /// Delayed attacker can hit victims inside the zone they left
    pub attacker_delayed_victim_in_zone: bool,
    /// Hand delays to an external exclusion API when one is present
    pub prefer_exclusion_api: bool,
}

impl PvpDelayConfig {
    /// All three rules on: the external exclusion API can stand in for the query hook
    pub fn all_rules_enabled(&self) -> bool {
        self.victim_delayed_attacker_in_zone
            && self.both_delayed_same_zone
            && self.attacker_delayed_victim_in_zone
    }
}

impl Default for PvpDelayConfig {
    fn default() -> Self {
        Self {
            victim_delayed_attacker_in_zone: true,
            both_delayed_same_zone: true,
            attacker_delayed_victim_in_zone: true,
            prefer_exclusion_api: true,
        }
    }
}

/// Pacing of the startup scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    pub initial_batch: usize,
    pub min_batch: usize,
    pub max_batch: usize,
    /// Time a batch may take before the next one is shrunk
    pub frame_budget_ms: u64,
    /// Pause between batches in verbose mode
    pub verbose_pause_ms: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            initial_batch: 32,
            min_batch: 4,
            max_batch: 512,
            frame_budget_ms: 5,
            verbose_pause_ms: 250,
        }
    }
}

/// Supply signal matching and drop anchoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplyConfig {
    /// A signal older than this no longer claims a drop
    pub signal_window_secs: f32,
    /// Horizontal distance between signal and drop for a match
    pub signal_window_radius: f32,
    /// Height above ground at which a falling drop's zone re-anchors to it
    pub ground_anchor_height: f32,
}

impl Default for SupplyConfig {
    fn default() -> Self {
        Self {
            signal_window_secs: 10.0,
            signal_window_radius: 20.0,
            ground_anchor_height: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PluginConfig {
    pub general: GeneralConfig,
    pub pvp_delay: PvpDelayConfig,
    pub startup: StartupConfig,
    pub supply: SupplyConfig,
}

impl PluginConfig {
    /// Parse from a TOML string
    pub fn parse(content: &str) -> CatalogResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load from a TOML file, or use defaults if it does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
