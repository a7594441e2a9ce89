//! Startup scan
//!
//! Re-derives zones for events that already exist when the engine starts:
//! map features first, then live world entities, then auto-start user
//! events. Work is split into batches run from [`ZoneManager::update`];
//! the batch size grows while batches fit the frame budget and shrinks
//! when they do not. Everything goes through the runtime creation paths,
//! so a rescan never duplicates a zone.

use crate::error::CommandError;
use crate::ids::EntityId;
use crate::machines::CrateState;
use crate::manager::ZoneManager;
use crate::services::EntityKind;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use warzone_catalog::{CargoPhase, StartupConfig};
use warzone_geometry::MapFeature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStage {
    MapFeatures,
    WorldEntities,
    UserEvents,
    Done,
}

impl ScanStage {
    fn next(self) -> Self {
        match self {
            Self::MapFeatures => Self::WorldEntities,
            Self::WorldEntities => Self::UserEvents,
            Self::UserEvents | Self::Done => Self::Done,
        }
    }
}

#[derive(Debug)]
enum ScanItem {
    Feature(MapFeature),
    Entity(EntityId),
    UserEvent(String),
}

#[derive(Debug)]
pub struct StartupScan {
    stage: ScanStage,
    loaded: bool,
    queue: VecDeque<ScanItem>,
    batch: usize,
    min_batch: usize,
    max_batch: usize,
    budget: Duration,
    pause: f32,
    processed: usize,
}

impl StartupScan {
    pub fn new(config: &StartupConfig) -> Self {
        let min_batch = config.min_batch.max(1);
        let max_batch = config.max_batch.max(min_batch);
        Self {
            stage: ScanStage::MapFeatures,
            loaded: false,
            queue: VecDeque::new(),
            batch: config.initial_batch.clamp(min_batch, max_batch),
            min_batch,
            max_batch,
            budget: Duration::from_millis(config.frame_budget_ms),
            pause: 0.0,
            processed: 0,
        }
    }

    pub fn stage(&self) -> ScanStage {
        self.stage
    }

    pub fn batch_size(&self) -> usize {
        self.batch
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Grow the batch when the last one fit the budget, shrink it otherwise
    fn adapt(&mut self, elapsed: Duration) {
        self.batch = if elapsed <= self.budget {
            (self.batch * 2).min(self.max_batch)
        } else {
            (self.batch / 2).max(self.min_batch)
        };
    }
}

impl ZoneManager {
    /// Start the startup scan; a running scan is left alone
    pub fn begin_startup(&mut self) {
        if self.startup.is_some() {
            return;
        }
        log::info!("Startup scan started");
        self.startup = Some(StartupScan::new(&self.config.startup));
    }

    pub fn is_starting_up(&self) -> bool {
        self.startup.is_some()
    }

    pub fn startup_stage(&self) -> Option<ScanStage> {
        self.startup.as_ref().map(StartupScan::stage)
    }

    /// Run the rest of the scan now, ignoring pacing
    pub fn finish_startup(&mut self) {
        while let Some(scan) = self.startup.as_mut() {
            scan.pause = 0.0;
            self.advance_startup(0.0);
        }
    }

    pub(crate) fn advance_startup(&mut self, dt: f32) {
        let Some(mut scan) = self.startup.take() else {
            return;
        };
        if scan.pause > 0.0 {
            scan.pause -= dt;
            self.startup = Some(scan);
            return;
        }

        let started = Instant::now();
        let mut handled = 0;
        while handled < scan.batch && scan.stage != ScanStage::Done {
            if !scan.loaded {
                self.load_stage(&mut scan);
            }
            match scan.queue.pop_front() {
                Some(item) => {
                    self.resume_item(item);
                    handled += 1;
                }
                None => self.finish_stage(&mut scan),
            }
        }
        scan.processed += handled;

        if scan.stage == ScanStage::Done {
            log::info!("Startup scan complete: {} items", scan.processed);
            return;
        }

        scan.adapt(started.elapsed());
        if self.config.general.verbose {
            scan.pause = self.config.startup.verbose_pause_ms as f32 / 1000.0;
            log::info!(
                "Startup scan: {:?}, {} items so far, next batch {}",
                scan.stage,
                scan.processed,
                scan.batch
            );
        }
        self.startup = Some(scan);
    }

    fn load_stage(&mut self, scan: &mut StartupScan) {
        scan.loaded = true;
        match scan.stage {
            ScanStage::MapFeatures => {
                scan.queue
                    .extend(self.services.world.map_features().into_iter().map(ScanItem::Feature));
            }
            ScanStage::WorldEntities => {
                scan.queue
                    .extend(self.services.world.entity_ids().into_iter().map(ScanItem::Entity));
            }
            ScanStage::UserEvents => {
                let names = self
                    .ctx
                    .store
                    .autostart_events()
                    .map(|(name, _)| ScanItem::UserEvent(name.to_string()));
                scan.queue.extend(names);
            }
            ScanStage::Done => {}
        }
        log::debug!("Startup stage {:?}: {} items", scan.stage, scan.queue.len());
    }

    fn finish_stage(&mut self, scan: &mut StartupScan) {
        if scan.stage == ScanStage::MapFeatures {
            self.settle_feature_geometry();
            self.persist_catalog_if_dirty();
        }
        scan.stage = scan.stage.next();
        scan.loaded = false;
    }

    fn resume_item(&mut self, item: ScanItem) {
        let verbose = self.config.general.verbose;
        match item {
            ScanItem::Feature(feature) => {
                let created = self.start_feature_zone(&feature);
                if verbose {
                    log::info!("Map feature '{}': zone {}", feature.name, if created { "created" } else { "skipped" });
                }
            }
            ScanItem::Entity(id) => self.resume_entity(id, verbose),
            ScanItem::UserEvent(name) => match self.start_user_event(&name, None) {
                Ok(_) => {
                    if verbose {
                        log::info!("Started user event '{}'", name);
                    }
                }
                Err(CommandError::AlreadyActive(_)) => {}
                Err(e) => log::warn!("Skipping user event '{}': {}", name, e),
            },
        }
    }

    fn resume_entity(&mut self, id: EntityId, verbose: bool) {
        let Some(info) = self.services.world.entity(id) else {
            log::warn!("Entity {} vanished during startup; skipping", id);
            return;
        };
        if verbose {
            log::info!("Resuming {} ({:?})", id, info.kind);
        }
        match info.kind {
            EntityKind::HackableCrate { state, looted } => {
                self.on_crate_spawned(id);
                if state >= CrateState::Hacking {
                    self.on_crate_hack_started(id);
                }
                if state == CrateState::Unlocked {
                    self.on_crate_unlocked(id);
                }
                if looted {
                    self.on_crate_looted(id);
                }
            }
            EntityKind::SupplyDrop { landed, looted } => {
                self.on_drop_spawned(id);
                if landed {
                    self.on_drop_landed(id);
                }
                if looted {
                    self.on_drop_looted(id);
                }
            }
            EntityKind::CargoShip { phase } => {
                self.on_cargo_spawned(id);
                if phase != CargoPhase::Spawned {
                    self.on_cargo_phase(id, phase);
                }
            }
            EntityKind::PowerSwitch { powered: true } => self.on_switch_toggled(id, true),
            EntityKind::PowerSwitch { powered: false }
            | EntityKind::BradleyApc
            | EntityKind::PatrolHelicopter
            | EntityKind::Other => {}
        }
    }
}
