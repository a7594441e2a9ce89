//! Warzone Zones - Ephemeral PvP combat zones
//!
//! Opens a combat zone when something happens in the world (a vehicle is
//! destroyed, a crate is hacked, a supply drop lands, a cargo ship docks)
//! and closes it again on a timer or when the triggering entity goes away.
//!
//! # Features
//!
//! - Zone lifecycle: create, delayed delete, parenting to moving hosts
//! - Per-family event state machines driven by world notifications
//! - PvP-delay tracking for actors leaving a zone
//! - Demand-driven listener subscription
//! - Time-budgeted startup scan over existing world state
//! - Administrator commands for user-placed events
//!
//! # Example
//!
//! ```ignore
//! use warzone_zones::prelude::*;
//!
//! let zones = MemoryZoneProvider::new();
//! let world = MemoryWorld::new(zones.clone());
//! let services = Services::new(zones, world);
//! let mut manager = ZoneManager::new(ZoneContext::new(catalog, store), services, config);
//!
//! manager.begin_startup();
//! loop {
//!     manager.update(dt);
//! }
//! ```

pub mod commands;
pub mod context;
pub mod error;
pub mod events;
pub mod hooks;
pub mod ids;
pub mod integration;
pub mod lifecycle;
pub mod machines;
pub mod manager;
pub mod memory;
pub mod pvp_delay;
pub mod scheduler;
pub mod services;
pub mod startup;

pub mod prelude {
    pub use crate::commands::{AdminCommand, EditField, UserEventKind, MAX_SHOW_RADIUS, MAX_SHOW_SECONDS};
    pub use crate::context::{PluginCategory, ZoneContext};
    pub use crate::error::{CommandError, ZoneError, ZoneResult};
    pub use crate::events::{DelayEndReason, VetoRequest, ZoneNotification};
    pub use crate::hooks::{HookCategory, HookDemand, HookSubscriptions, Listener};
    pub use crate::ids::{is_valid_position, ActorId, EntityId, ZoneId, ZoneIdGenerator, INVALID_POSITION};
    pub use crate::lifecycle::{CreateOutcome, CreateRequest, ParentSpec};
    pub use crate::machines::{
        feature_zone_id, user_zone_id, CargoMachine, CrateMachine, CrateState, DeathFamily, DropMachine, SignalRecord,
        DEFAULT_DEATH_LIFETIME,
    };
    pub use crate::manager::{TimerAction, TimerKey, ZoneManager};
    pub use crate::memory::{
        DomeRecord, MemoryBots, MemoryDomes, MemoryExclusion, MemoryListeners, MemoryMapping, MemoryWorld,
        MemoryZoneProvider, RecordingObserver, ZoneTransition,
    };
    pub use crate::pvp_delay::{DelayRecord, DelayTracker};
    pub use crate::scheduler::Scheduler;
    pub use crate::services::{
        BotProvider, DomeProvider, EntityInfo, EntityKind, ExclusionApi, HostWorld, ListenerHost, SafeZoneMapping,
        Services, WorldEnvironment, ZoneHandle, ZoneObserver, ZoneProvider,
    };
    pub use crate::startup::{ScanStage, StartupScan};
}

pub use prelude::*;
