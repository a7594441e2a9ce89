//! Demand-driven listener subscription
//!
//! Each hook category groups listeners that are only worth running while
//! some live state needs them. The tracked flag of a category is a pure
//! function of the current demand: recomputing with unchanged inputs never
//! touches the listener host.

use crate::context::{PluginCategory, ZoneContext};
use crate::pvp_delay::DelayTracker;
use crate::services::ListenerHost;
use serde::{Deserialize, Serialize};

/// Host callbacks the engine can (un)subscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Listener {
    ActorCommand,
    LootAccess,
    BackpackDrop,
    RestoreOnDeath,
    DamageQuery,
    ZoneEnter,
    ZoneExit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookCategory {
    CommandInterception,
    LootLock,
    BackpackDrop,
    RestoreOnDeath,
    DamageArbitration,
    ZoneTransit,
}

impl HookCategory {
    pub const ALL: [HookCategory; 6] = [
        Self::CommandInterception,
        Self::LootLock,
        Self::BackpackDrop,
        Self::RestoreOnDeath,
        Self::DamageArbitration,
        Self::ZoneTransit,
    ];

    pub fn listeners(self) -> &'static [Listener] {
        match self {
            Self::CommandInterception => &[Listener::ActorCommand],
            Self::LootLock => &[Listener::LootAccess],
            Self::BackpackDrop => &[Listener::BackpackDrop],
            Self::RestoreOnDeath => &[Listener::RestoreOnDeath],
            Self::DamageArbitration => &[Listener::DamageQuery],
            Self::ZoneTransit => &[Listener::ZoneEnter, Listener::ZoneExit],
        }
    }

    fn index(self) -> usize {
        match self {
            Self::CommandInterception => 0,
            Self::LootLock => 1,
            Self::BackpackDrop => 2,
            Self::RestoreOnDeath => 3,
            Self::DamageArbitration => 4,
            Self::ZoneTransit => 5,
        }
    }
}

impl From<PluginCategory> for HookCategory {
    fn from(category: PluginCategory) -> Self {
        match category {
            PluginCategory::LootLock => Self::LootLock,
            PluginCategory::BackpackDrop => Self::BackpackDrop,
            PluginCategory::RestoreOnDeath => Self::RestoreOnDeath,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct HookState {
    enabled: bool,
    flips: u32,
}

/// Tracked enabled flag per hook category
#[derive(Debug, Default)]
pub struct HookSubscriptions {
    states: [HookState; 6],
}

impl HookSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self, category: HookCategory) -> bool {
        self.states[category.index()].enabled
    }

    /// How many times the category has been toggled
    pub fn flip_count(&self, category: HookCategory) -> u32 {
        self.states[category.index()].flips
    }

    /// Flip every listener in `category` if the desired state differs;
    /// returns whether anything changed
    pub fn set_desired(&mut self, category: HookCategory, needed: bool, host: &mut dyn ListenerHost) -> bool {
        let state = &mut self.states[category.index()];
        if state.enabled == needed {
            return false;
        }
        for &listener in category.listeners() {
            host.set_subscribed(listener, needed);
        }
        state.enabled = needed;
        state.flips += 1;
        log::debug!(
            "{} {:?} hooks",
            if needed { "Subscribed" } else { "Unsubscribed" },
            category
        );
        true
    }

    /// Apply a freshly measured demand
    pub fn recompute(&mut self, demand: &HookDemand, host: &mut dyn ListenerHost) {
        self.set_desired(HookCategory::CommandInterception, demand.commands, host);
        self.set_desired(HookCategory::LootLock, demand.loot_lock, host);
        self.set_desired(HookCategory::BackpackDrop, demand.backpack_drop, host);
        self.set_desired(HookCategory::RestoreOnDeath, demand.restore_on_death, host);
        self.set_desired(HookCategory::DamageArbitration, demand.damage, host);
        self.set_desired(HookCategory::ZoneTransit, demand.transit, host);
    }
}

/// Aggregate demand for every hook category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookDemand {
    pub commands: bool,
    pub loot_lock: bool,
    pub backpack_drop: bool,
    pub restore_on_death: bool,
    pub damage: bool,
    pub transit: bool,
}

impl HookDemand {
    /// Measure demand from live state; linear in active delays plus active zones
    pub fn measure(ctx: &ZoneContext, delays: &DelayTracker, delegated: bool) -> Self {
        let filtered = |event: &str, during_delay: bool| {
            ctx.definition(event).is_some_and(|def| {
                !def.command_filter.is_empty() && (!during_delay || def.command_filter.applies_during_delay)
            })
        };

        let commands = delays.iter().any(|(_, record)| filtered(&record.event, true))
            || ctx.active_zones().any(|(_, event)| filtered(event, false));

        Self {
            commands,
            loot_lock: ctx.category_len(PluginCategory::LootLock) > 0,
            backpack_drop: ctx.category_len(PluginCategory::BackpackDrop) > 0,
            restore_on_death: ctx.category_len(PluginCategory::RestoreOnDeath) > 0,
            damage: !delegated && !delays.is_empty(),
            transit: ctx.active_count() > 0,
        }
    }
}
