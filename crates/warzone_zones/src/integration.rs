//! Query hooks answered for other server plugins

use crate::context::PluginCategory;
use crate::hooks::HookCategory;
use crate::ids::ActorId;
use crate::manager::ZoneManager;

impl ZoneManager {
    /// Loot should only be accessible to the player that earned it
    pub fn should_lock_loot(&self, actor: ActorId) -> bool {
        self.in_plugin_category(actor, PluginCategory::LootLock)
    }

    /// Backpacks should drop when the actor dies
    pub fn should_drop_backpack(&self, actor: ActorId) -> bool {
        self.in_plugin_category(actor, PluginCategory::BackpackDrop)
    }

    /// Inventory restore on death should be skipped
    pub fn should_block_restore(&self, actor: ActorId) -> bool {
        self.in_plugin_category(actor, PluginCategory::RestoreOnDeath)
    }

    fn in_plugin_category(&self, actor: ActorId, category: PluginCategory) -> bool {
        if !self.hooks.is_enabled(category.into()) {
            return false;
        }
        self.services
            .zones
            .list_actor_zone_ids(actor)
            .iter()
            .any(|zone| self.ctx.in_category(category, zone))
    }

    /// Returns `true` if the command must be blocked for this actor
    pub fn on_actor_command(&self, actor: ActorId, command: &str) -> bool {
        if !self.hooks.is_enabled(HookCategory::CommandInterception) {
            return false;
        }

        let blocked_in_zone = self
            .services
            .zones
            .list_actor_zone_ids(actor)
            .iter()
            .filter_map(|zone| self.ctx.event_of(zone))
            .filter_map(|event| self.ctx.definition(event))
            .any(|def| def.command_filter.blocks(command));
        if blocked_in_zone {
            return true;
        }

        self.delays
            .get(actor)
            .and_then(|record| self.ctx.definition(&record.event))
            .is_some_and(|def| def.command_filter.applies_during_delay && def.command_filter.blocks(command))
    }
}
