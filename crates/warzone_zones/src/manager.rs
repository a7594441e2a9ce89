//! Zone manager: owns the engine state and drives it on one thread

use crate::context::ZoneContext;
use crate::events::DelayEndReason;
use crate::hooks::{HookDemand, HookSubscriptions};
use crate::ids::{ActorId, EntityId, ZoneId};
use crate::lifecycle::CreateRequest;
use crate::machines::MachineState;
use crate::pvp_delay::DelayTracker;
use crate::scheduler::Scheduler;
use crate::services::Services;
use crate::startup::StartupScan;
use warzone_catalog::{EventCatalog, PluginConfig};
use warzone_geometry::GeometryDeriver;

/// Key of a pending timer; one timer per key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Both deletion stages of a zone share this key
    Delete(ZoneId),
    StartDelay(ZoneId),
    PvpDelay(ActorId),
    Parent(ZoneId),
}

/// What a timer does when it fires
#[derive(Debug, Clone)]
pub enum TimerAction {
    Create(CreateRequest),
    /// Lifetime over; applies the stop delay next
    RequestDelete(ZoneId),
    Delete(ZoneId),
    Parent {
        zone: ZoneId,
        host: EntityId,
        delete_on_failure: bool,
    },
    DelayExpired(ActorId),
}

/// Combat zone engine
///
/// Single-threaded: every signal, timer and startup step runs on the
/// caller's thread from the `on_*` methods and [`update`](Self::update).
pub struct ZoneManager {
    pub(crate) ctx: ZoneContext,
    pub(crate) services: Services,
    pub(crate) scheduler: Scheduler<TimerKey, TimerAction>,
    pub(crate) hooks: HookSubscriptions,
    pub(crate) delays: DelayTracker,
    pub(crate) machines: MachineState,
    pub(crate) deriver: GeometryDeriver,
    pub(crate) startup: Option<StartupScan>,
    pub(crate) config: PluginConfig,
    pub(crate) shutting_down: bool,
}

impl ZoneManager {
    pub fn new(ctx: ZoneContext, services: Services, config: PluginConfig) -> Self {
        Self {
            ctx,
            services,
            scheduler: Scheduler::new(),
            hooks: HookSubscriptions::new(),
            delays: DelayTracker::new(),
            machines: MachineState::default(),
            deriver: GeometryDeriver::new(),
            startup: None,
            config,
            shutting_down: false,
        }
    }

    pub fn context(&self) -> &ZoneContext {
        &self.ctx
    }

    /// Definitions are read at use time, so edits apply to the next zone
    pub fn catalog_mut(&mut self) -> &mut EventCatalog {
        &mut self.ctx.catalog
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn hooks(&self) -> &HookSubscriptions {
        &self.hooks
    }

    pub fn delays(&self) -> &DelayTracker {
        &self.delays
    }

    /// Engine clock in seconds
    pub fn now(&self) -> f32 {
        self.scheduler.now()
    }

    pub fn is_zone_active(&self, zone: &ZoneId) -> bool {
        self.ctx.is_active(zone)
    }

    pub fn active_zone_count(&self) -> usize {
        self.ctx.active_count()
    }

    pub fn is_timer_armed(&self, key: &TimerKey) -> bool {
        self.scheduler.is_armed(key)
    }

    pub fn timer_remaining(&self, key: &TimerKey) -> Option<f32> {
        self.scheduler.remaining(key)
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// Supply signals still waiting for a drop
    pub fn pending_signals(&self) -> usize {
        self.machines.signals.len()
    }

    /// Advance the clock by `dt` seconds, fire due timers, then poll
    /// falling drops and the startup scan
    pub fn update(&mut self, dt: f32) {
        self.scheduler.advance(dt);
        while let Some((_, action)) = self.scheduler.pop_due() {
            self.dispatch(action);
        }
        self.poll_falling_drops();
        self.advance_startup(dt);
    }

    fn dispatch(&mut self, action: TimerAction) {
        match action {
            TimerAction::Create(request) => {
                self.create_zone(request);
            }
            TimerAction::RequestDelete(zone) => {
                self.request_delete(&zone, None);
            }
            TimerAction::Delete(zone) => {
                self.delete_zone(&zone);
            }
            TimerAction::Parent { zone, host, delete_on_failure } => {
                self.parent_to_entity(&zone, host, delete_on_failure, 0.0);
            }
            TimerAction::DelayExpired(actor) => {
                self.end_delay(actor, DelayEndReason::Expired);
            }
        }
    }

    /// External exclusion API stands in for the damage query hook
    pub(crate) fn delay_delegated(&self) -> bool {
        self.services.exclusion.is_some()
            && self.config.pvp_delay.prefer_exclusion_api
            && self.config.pvp_delay.all_rules_enabled()
    }

    pub(crate) fn recompute_hooks(&mut self) {
        let demand = HookDemand::measure(&self.ctx, &self.delays, self.delay_delegated());
        self.hooks.recompute(&demand, self.services.listeners.as_mut());
    }

    /// Cancel the startup scan, drop timers, destroy every zone and delay
    pub fn shutdown(&mut self) {
        if self.startup.take().is_some() {
            log::info!("Startup scan cancelled");
        }
        self.shutting_down = true;
        self.scheduler.clear();

        let zones: Vec<ZoneId> = self.ctx.active_zones().map(|(zone, _)| zone.clone()).collect();
        for zone in &zones {
            if let Err(e) = self.remove_zone(zone, false) {
                log::warn!("Dropping zone {} during shutdown: {}", zone, e);
                self.ctx.unregister(zone);
            }
        }

        for actor in self.delays.actors() {
            self.end_delay(actor, DelayEndReason::Shutdown);
        }

        self.machines.clear();
        self.deriver.clear();
        self.recompute_hooks();
        self.shutting_down = false;
        log::info!("Shutdown complete ({} zones removed)", zones.len());
    }
}
