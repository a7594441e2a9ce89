//! Scripted world timelines
//!
//! A scenario sets up a world (entities, map features, no-build volumes)
//! and lists timed signals. The runner advances the manager at a fixed
//! tick and delivers each signal once its time is reached.
//!
//! ```toml
//! tick = 0.5
//! run_for = 30.0
//!
//! [[world.entities]]
//! id = 555
//! kind = { HackableCrate = { state = "Spawned" } }
//! position = { x = 100.0, y = 50.0, z = 100.0 }
//!
//! [[step]]
//! at = 2.0
//! signal = { kind = "crate_hack_started", entity = 555 }
//! ```

use crate::error::{RuntimeError, RuntimeResult};
use serde::Deserialize;
use std::path::Path;
use warzone_catalog::CargoPhase;
use warzone_geometry::MapFeature;
use warzone_math::{OrientedBox, Vec3};
use warzone_zones::prelude::*;

fn default_tick() -> f32 {
    0.5
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntitySpec {
    pub id: u64,
    pub kind: EntityKind,
    pub position: Vec3,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub owner: Option<u64>,
    #[serde(default)]
    pub parent: Option<u64>,
}

impl EntitySpec {
    fn info(&self) -> EntityInfo {
        let mut info = EntityInfo::new(EntityId(self.id), self.kind, self.position).with_yaw(self.yaw);
        if let Some(owner) = self.owner {
            info = info.with_owner(ActorId(owner));
        }
        if let Some(parent) = self.parent {
            info = info.with_parent(EntityId(parent));
        }
        info
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorldSpec {
    pub ground_height: f32,
    pub entities: Vec<EntitySpec>,
    pub features: Vec<MapFeature>,
    pub volumes: Vec<OrientedBox>,
}

/// World signal delivered to the manager
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Signal {
    VehicleKilled {
        family: DeathFamily,
        position: Vec3,
        #[serde(default)]
        killer: Option<u64>,
    },
    CrateSpawned { entity: u64 },
    CrateHackStarted { entity: u64 },
    CrateUnlocked { entity: u64 },
    CrateLooted { entity: u64 },
    CrateKilled { entity: u64 },
    SignalThrown { position: Vec3 },
    DropSpawned { entity: u64 },
    DropLanded { entity: u64 },
    DropLooted { entity: u64 },
    DropKilled { entity: u64 },
    CargoSpawned { entity: u64 },
    CargoPhase { entity: u64, phase: CargoPhase },
    CargoRemoved { entity: u64 },
    SwitchToggled { entity: u64, powered: bool },
    /// Spawn an entity mid-run
    Spawn { entity: EntitySpec },
    Despawn { entity: u64 },
    MoveEntity {
        entity: u64,
        position: Vec3,
        #[serde(default)]
        yaw: f32,
    },
    MoveActor { actor: u64, position: Vec3 },
    RemoveActor { actor: u64 },
    Respawn { actor: u64 },
    Admin { command: AdminCommand },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub at: f32,
    pub signal: Signal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_tick")]
    pub tick: f32,
    /// Seconds to keep ticking after the last step
    #[serde(default)]
    pub run_for: f32,
    #[serde(default)]
    pub world: WorldSpec,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn parse(content: &str) -> RuntimeResult<Self> {
        let mut scenario: Scenario = toml::from_str(content)?;
        if !(scenario.tick.is_finite() && scenario.tick > 0.0) {
            return Err(RuntimeError::Usage(format!("tick must be positive, got {}", scenario.tick)));
        }
        scenario.steps.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> RuntimeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Populate the world before the startup scan runs
    pub fn seed(&self, world: &MemoryWorld) {
        world.set_ground_height(self.world.ground_height);
        for entity in &self.world.entities {
            world.spawn(entity.info());
        }
        for feature in &self.world.features {
            world.add_feature(feature.clone());
        }
        for volume in &self.world.volumes {
            world.add_volume(*volume);
        }
    }

    /// Play every step, then `run_for` more seconds
    pub fn run(&self, manager: &mut ZoneManager, world: &MemoryWorld) {
        let mut runner = Runner {
            manager,
            world,
            tick: self.tick,
        };
        for step in &self.steps {
            runner.advance_to(step.at);
            log::debug!("t={:.1}s {:?}", step.at, step.signal);
            runner.deliver(&step.signal);
        }
        let end = self.steps.last().map_or(0.0, |s| s.at) + self.run_for;
        runner.advance_to(end);
    }
}

struct Runner<'a> {
    manager: &'a mut ZoneManager,
    world: &'a MemoryWorld,
    tick: f32,
}

impl Runner<'_> {
    fn advance_to(&mut self, at: f32) {
        while self.manager.now() + self.tick <= at {
            self.manager.update(self.tick);
            self.pump();
        }
        let rest = at - self.manager.now();
        if rest > 0.0 {
            self.manager.update(rest);
            self.pump();
        }
    }

    /// Forward membership changes from the zone provider
    fn pump(&mut self) {
        for (actor, transition) in self.world.take_transitions() {
            match transition {
                ZoneTransition::Entered(zone) => self.manager.on_zone_enter(actor, &zone),
                ZoneTransition::Exited(zone) => self.manager.on_zone_exit(actor, &zone),
            }
        }
    }

    fn deliver(&mut self, signal: &Signal) {
        let m = &mut *self.manager;
        match signal.clone() {
            Signal::VehicleKilled { family, position, killer } => {
                m.on_vehicle_killed(family, position, killer.map(ActorId));
            }
            Signal::CrateSpawned { entity } => m.on_crate_spawned(EntityId(entity)),
            Signal::CrateHackStarted { entity } => m.on_crate_hack_started(EntityId(entity)),
            Signal::CrateUnlocked { entity } => m.on_crate_unlocked(EntityId(entity)),
            Signal::CrateLooted { entity } => m.on_crate_looted(EntityId(entity)),
            Signal::CrateKilled { entity } => {
                m.on_crate_killed(EntityId(entity));
                self.world.despawn(EntityId(entity));
            }
            Signal::SignalThrown { position } => m.on_signal_thrown(position),
            Signal::DropSpawned { entity } => m.on_drop_spawned(EntityId(entity)),
            Signal::DropLanded { entity } => m.on_drop_landed(EntityId(entity)),
            Signal::DropLooted { entity } => m.on_drop_looted(EntityId(entity)),
            Signal::DropKilled { entity } => {
                m.on_drop_killed(EntityId(entity));
                self.world.despawn(EntityId(entity));
            }
            Signal::CargoSpawned { entity } => m.on_cargo_spawned(EntityId(entity)),
            Signal::CargoPhase { entity, phase } => {
                self.world.set_kind(EntityId(entity), EntityKind::CargoShip { phase });
                m.on_cargo_phase(EntityId(entity), phase);
            }
            Signal::CargoRemoved { entity } => {
                m.on_cargo_removed(EntityId(entity));
                self.world.despawn(EntityId(entity));
            }
            Signal::SwitchToggled { entity, powered } => {
                self.world.set_kind(EntityId(entity), EntityKind::PowerSwitch { powered });
                m.on_switch_toggled(EntityId(entity), powered);
            }
            Signal::Spawn { entity } => self.world.spawn(entity.info()),
            Signal::Despawn { entity } => {
                self.world.despawn(EntityId(entity));
            }
            Signal::MoveEntity { entity, position, yaw } => self.world.move_entity(EntityId(entity), position, yaw),
            Signal::MoveActor { actor, position } => self.world.set_actor_position(ActorId(actor), position),
            Signal::RemoveActor { actor } => self.world.zones().remove_actor(ActorId(actor)),
            Signal::Respawn { actor } => m.on_actor_respawn(ActorId(actor)),
            Signal::Admin { command } => match m.execute_command(command) {
                Ok(reply) => log::info!("admin: {}", reply),
                Err(e) => log::warn!("admin: {}", e),
            },
        }
        self.pump();
    }
}
