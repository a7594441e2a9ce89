//! Integration tests for the per-family event state machines

mod common;

use common::Harness;
use warzone_catalog::{event_names, CargoPhase, CrateStop, DropStop, EventDefinition, ZoneShape, ZoneVolume};
use warzone_math::Vec3;
use warzone_zones::prelude::*;

fn crate_at(h: &Harness, id: u64, position: Vec3) -> EntityId {
    let id = EntityId(id);
    h.world.spawn(EntityInfo::new(
        id,
        EntityKind::HackableCrate {
            state: CrateState::Spawned,
            looted: false,
        },
        position,
    ));
    id
}

#[test]
fn test_hackable_crate_zone() {
    let mut h = Harness::new();
    h.manager.catalog_mut().upsert(
        event_names::HACKABLE_CRATE,
        EventDefinition::new(ZoneShape::sphere(20.0).with_anchor(Vec3::ZERO)),
    );
    let id = crate_at(&h, 555, Vec3::new(100.0, 50.0, 100.0));
    let zone = ZoneId::from("555");

    h.manager.on_crate_spawned(id);
    assert!(!h.manager.is_zone_active(&zone));

    h.manager.on_crate_hack_started(id);
    let handle = h.zones.zone(&zone).unwrap();
    assert_eq!(handle.position, Vec3::new(100.0, 50.0, 100.0));
    assert_eq!(handle.volume, ZoneVolume::Sphere { radius: 20.0 });
    assert_eq!(h.world.attachment(&zone), Some((id, Vec3::ZERO)));

    h.manager.on_crate_unlocked(id);
    assert_eq!(h.manager.timer_remaining(&TimerKey::Delete(zone.clone())), Some(300.0));

    // Looting does nothing under the unlock rule
    h.manager.on_crate_looted(id);
    assert_eq!(h.manager.timer_remaining(&TimerKey::Delete(zone.clone())), Some(300.0));

    h.tick(300.0);
    assert!(!h.manager.is_zone_active(&zone));
}

#[test]
fn test_crate_killed_before_unlock() {
    let mut h = Harness::new();
    let id = crate_at(&h, 10, Vec3::ZERO);
    let zone = ZoneId::for_entity(id);

    h.manager.on_crate_hack_started(id);
    assert!(h.manager.is_zone_active(&zone));

    h.manager.on_crate_killed(id);
    assert!(!h.manager.is_zone_active(&zone));
}

#[test]
fn test_crate_killed_after_unlock_keeps_timer() {
    let mut h = Harness::new();
    let id = crate_at(&h, 11, Vec3::ZERO);
    let zone = ZoneId::for_entity(id);

    h.manager.on_crate_hack_started(id);
    h.manager.on_crate_unlocked(id);
    h.manager.on_crate_killed(id);

    assert!(h.manager.is_zone_active(&zone));
    assert!(h.world.attachment(&zone).is_none());
    h.tick(300.0);
    assert!(!h.manager.is_zone_active(&zone));
}

#[test]
fn test_crate_loot_rule() {
    let mut h = Harness::new();
    h.manager.catalog_mut().rules.hackable_crate.stop = CrateStop::LootElapsed;
    h.manager.catalog_mut().rules.hackable_crate.timer = 60.0;
    let id = crate_at(&h, 12, Vec3::ZERO);
    let zone = ZoneId::for_entity(id);

    h.manager.on_crate_hack_started(id);
    h.manager.on_crate_unlocked(id);
    assert!(!h.manager.is_timer_armed(&TimerKey::Delete(zone.clone())));

    h.manager.on_crate_looted(id);
    h.tick(30.0);
    // Only the first loot counts
    h.manager.on_crate_looted(id);
    h.tick(30.0);
    assert!(!h.manager.is_zone_active(&zone));
}

#[test]
fn test_ineligible_crates() {
    let mut h = Harness::new();
    let ship = EntityId(1);
    h.world.spawn(EntityInfo::new(
        ship,
        EntityKind::CargoShip {
            phase: CargoPhase::Spawned,
        },
        Vec3::ZERO,
    ));
    let owned = EntityId(2);
    h.world.spawn(
        EntityInfo::new(owned, EntityKind::HackableCrate { state: CrateState::Spawned, looted: false }, Vec3::ZERO)
            .with_owner(ActorId(9)),
    );
    let riding = EntityId(3);
    h.world.spawn(
        EntityInfo::new(riding, EntityKind::HackableCrate { state: CrateState::Spawned, looted: false }, Vec3::ZERO)
            .with_parent(ship),
    );

    h.manager.on_crate_hack_started(owned);
    h.manager.on_crate_hack_started(riding);
    assert!(!h.manager.is_zone_active(&ZoneId::for_entity(owned)));
    assert!(!h.manager.is_zone_active(&ZoneId::for_entity(riding)));
}

#[test]
fn test_cargo_phase_reconciliation() {
    let mut h = Harness::new();
    let rules = &mut h.manager.catalog_mut().rules.cargo_ship;
    rules.docked = false;
    let ship = EntityId(42);
    h.world.spawn(
        EntityInfo::new(ship, EntityKind::CargoShip { phase: CargoPhase::Spawned }, Vec3::new(0.0, 0.0, 0.0))
            .with_yaw(90.0),
    );
    let zone = ZoneId::for_entity(ship);

    h.manager.on_cargo_spawned(ship);
    assert!(h.manager.is_zone_active(&zone));
    assert_eq!(h.manager.context().parent_of(&zone), Some(ship));

    h.manager.on_cargo_phase(ship, CargoPhase::Approaching);
    assert_eq!(h.zones.create_calls().len(), 1);

    h.manager.on_cargo_phase(ship, CargoPhase::Docked);
    assert!(!h.manager.is_zone_active(&zone));

    h.manager.on_cargo_phase(ship, CargoPhase::Departing);
    assert!(h.manager.is_zone_active(&zone));
    h.manager.on_cargo_phase(ship, CargoPhase::Egress);
    assert_eq!(h.zones.create_calls().len(), 2);

    match h.zones.zone(&zone).unwrap().volume {
        ZoneVolume::Cube { rotation, .. } => assert_eq!(rotation, 90.0),
        ZoneVolume::Sphere { .. } => panic!("cargo zones are boxes"),
    }

    h.manager.on_cargo_removed(ship);
    assert!(!h.manager.is_zone_active(&zone));
}

#[test]
fn test_cargo_stop_cancelled_by_phase() {
    let mut h = Harness::new();
    h.manager.catalog_mut().rules.cargo_ship.docked = false;
    if let Some(def) = h.manager.catalog_mut().get_mut(event_names::CARGO_SHIP) {
        def.stop_delay = 30.0;
    }
    let ship = EntityId(43);
    h.world
        .spawn(EntityInfo::new(ship, EntityKind::CargoShip { phase: CargoPhase::Spawned }, Vec3::ZERO));
    let zone = ZoneId::for_entity(ship);

    h.manager.on_cargo_spawned(ship);
    h.manager.on_cargo_phase(ship, CargoPhase::Docked);
    assert!(h.manager.is_stopping(&zone));
    assert!(h.world.attachment(&zone).is_none());

    h.tick(10.0);
    h.manager.on_cargo_phase(ship, CargoPhase::Departing);
    assert!(!h.manager.is_stopping(&zone));
    assert!(h.world.attachment(&zone).is_some());

    h.tick(60.0);
    assert!(h.manager.is_zone_active(&zone));
    assert_eq!(h.zones.create_calls().len(), 1);
}

#[test]
fn test_vehicle_death() {
    let mut h = Harness::new();
    assert!(h
        .manager
        .on_vehicle_killed(DeathFamily::BradleyApc, Vec3::new(1.0, 0.0, 1.0), Some(ActorId(5))));
    assert_eq!(h.manager.active_zone_count(), 1);

    h.manager.catalog_mut().rules.death.require_actor_killer = true;
    assert!(!h
        .manager
        .on_vehicle_killed(DeathFamily::PatrolHelicopter, Vec3::ZERO, None));
    assert_eq!(h.manager.active_zone_count(), 1);

    h.tick(600.0);
    assert_eq!(h.manager.active_zone_count(), 0);
}

#[test]
fn test_death_without_duration_uses_fallback() {
    let mut h = Harness::new();
    if let Some(def) = h.manager.catalog_mut().get_mut(event_names::PATROL_HELICOPTER) {
        def.duration = None;
    }
    assert!(h
        .manager
        .on_vehicle_killed(DeathFamily::PatrolHelicopter, Vec3::ZERO, None));

    h.tick(DEFAULT_DEATH_LIFETIME - 1.0);
    assert_eq!(h.manager.active_zone_count(), 1);
    h.tick(1.0);
    assert_eq!(h.manager.active_zone_count(), 0);
}

#[test]
fn test_delayed_death_zone_still_expires() {
    let mut h = Harness::new();
    if let Some(def) = h.manager.catalog_mut().get_mut(event_names::BRADLEY_APC) {
        def.duration = None;
        def.start_delay = 5.0;
    }
    assert!(!h
        .manager
        .on_vehicle_killed(DeathFamily::BradleyApc, Vec3::ZERO, Some(ActorId(1))));
    assert_eq!(h.manager.active_zone_count(), 0);

    h.tick(5.0);
    assert_eq!(h.manager.active_zone_count(), 1);
    h.tick(DEFAULT_DEATH_LIFETIME - 1.0);
    assert_eq!(h.manager.active_zone_count(), 1);
    h.tick(1.0);
    assert_eq!(h.manager.active_zone_count(), 0);
    assert_eq!(h.manager.pending_timers(), 0);
}

#[test]
fn test_supply_signal_claims_drop() {
    let mut h = Harness::new();
    let signalled = EntityId(20);
    let plain = EntityId(21);
    h.world.spawn(EntityInfo::new(
        signalled,
        EntityKind::SupplyDrop { landed: false, looted: false },
        Vec3::new(5.0, 200.0, 5.0),
    ));
    h.world.spawn(EntityInfo::new(
        plain,
        EntityKind::SupplyDrop { landed: false, looted: false },
        Vec3::new(5.0, 200.0, 8.0),
    ));

    h.manager.on_signal_thrown(Vec3::ZERO);
    h.tick(2.0);
    h.manager.on_drop_spawned(signalled);
    h.manager.on_drop_spawned(plain);
    h.manager.on_drop_landed(signalled);
    h.manager.on_drop_landed(plain);

    let events: Vec<String> = h
        .observer
        .notifications()
        .iter()
        .filter_map(|n| match n {
            ZoneNotification::ZoneCreated { event, .. } => Some(event.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(events, vec![event_names::SUPPLY_SIGNAL, event_names::SUPPLY_DROP]);
}

#[test]
fn test_unclaimed_signals_expire() {
    let mut h = Harness::new();
    let window = h.manager.config().supply.signal_window_secs;
    for i in 0..50 {
        h.manager.on_signal_thrown(Vec3::new(i as f32 * 100.0, 0.0, 0.0));
    }
    assert_eq!(h.manager.pending_signals(), 50);

    h.tick(window + 1.0);
    h.manager.on_signal_thrown(Vec3::ZERO);
    assert_eq!(h.manager.pending_signals(), 1);
}

#[test]
fn test_stale_signal_is_ignored() {
    let mut h = Harness::new();
    let drop = EntityId(22);
    h.world.spawn(EntityInfo::new(
        drop,
        EntityKind::SupplyDrop { landed: false, looted: false },
        Vec3::ZERO,
    ));

    h.manager.on_signal_thrown(Vec3::ZERO);
    h.tick(11.0);
    h.manager.on_drop_spawned(drop);
    h.manager.on_drop_landed(drop);

    assert_eq!(
        h.manager.context().event_of(&ZoneId::for_entity(drop)),
        Some(event_names::SUPPLY_DROP)
    );
}

#[test]
fn test_drop_created_on_spawn_anchors_when_low() {
    let mut h = Harness::new();
    h.manager.catalog_mut().rules.supply_drop.start_on_spawn = true;
    h.world.set_ground_height(10.0);
    let drop = EntityId(23);
    h.world.spawn(EntityInfo::new(
        drop,
        EntityKind::SupplyDrop { landed: false, looted: false },
        Vec3::new(0.0, 300.0, 0.0),
    ));
    let zone = ZoneId::for_entity(drop);

    h.manager.on_drop_spawned(drop);
    assert_eq!(h.zones.zone(&zone).unwrap().position, Vec3::new(0.0, 10.0, 0.0));
    h.tick(1.0);
    assert!(h.world.attachment(&zone).is_none());

    h.world.move_entity(drop, Vec3::new(0.0, 20.0, 0.0), 0.0);
    h.tick(1.0);
    assert_eq!(h.world.attachment(&zone), Some((drop, Vec3::ZERO)));
}

#[test]
fn test_drop_looted_then_killed() {
    let mut h = Harness::new();
    h.manager.catalog_mut().rules.supply_drop.timer = 120.0;
    let drop = EntityId(24);
    h.world.spawn(EntityInfo::new(
        drop,
        EntityKind::SupplyDrop { landed: true, looted: false },
        Vec3::ZERO,
    ));
    let zone = ZoneId::for_entity(drop);

    h.manager.on_drop_spawned(drop);
    h.manager.on_drop_landed(drop);
    h.manager.on_drop_looted(drop);
    h.manager.on_drop_killed(drop);

    // The loot timer survives the capsule
    assert!(h.manager.is_zone_active(&zone));
    h.tick(120.0);
    assert!(!h.manager.is_zone_active(&zone));
}

#[test]
fn test_drop_killed_rule() {
    let mut h = Harness::new();
    h.manager.catalog_mut().rules.supply_drop.stop = DropStop::Killed;
    let drop = EntityId(25);
    h.world.spawn(EntityInfo::new(
        drop,
        EntityKind::SupplyDrop { landed: true, looted: false },
        Vec3::ZERO,
    ));

    h.manager.on_drop_spawned(drop);
    h.manager.on_drop_landed(drop);
    h.manager.on_drop_looted(drop);
    assert!(!h.manager.is_timer_armed(&TimerKey::Delete(ZoneId::for_entity(drop))));

    h.manager.on_drop_killed(drop);
    assert!(!h.manager.is_zone_active(&ZoneId::for_entity(drop)));
}

#[test]
fn test_power_switch() {
    let mut h = Harness::new();
    let switch = EntityId(30);
    h.world
        .spawn(EntityInfo::new(switch, EntityKind::PowerSwitch { powered: false }, Vec3::ZERO));
    let zone = ZoneId::for_entity(switch);

    h.manager.on_switch_toggled(switch, true);
    assert!(h.manager.is_zone_active(&zone));
    h.manager.on_switch_toggled(switch, true);
    assert_eq!(h.zones.create_calls().len(), 1);

    h.manager.on_switch_toggled(switch, false);
    assert!(!h.manager.is_zone_active(&zone));
}

#[test]
fn test_switch_off_during_start_delay() {
    let mut h = Harness::new();
    if let Some(def) = h.manager.catalog_mut().get_mut(event_names::POWER_SWITCH) {
        def.start_delay = 10.0;
    }
    let switch = EntityId(31);
    h.world
        .spawn(EntityInfo::new(switch, EntityKind::PowerSwitch { powered: false }, Vec3::ZERO));
    let zone = ZoneId::for_entity(switch);

    h.manager.on_switch_toggled(switch, true);
    assert!(h.manager.is_timer_armed(&TimerKey::StartDelay(zone.clone())));
    h.tick(4.0);
    h.manager.on_switch_toggled(switch, false);
    assert!(!h.manager.is_timer_armed(&TimerKey::StartDelay(zone.clone())));

    h.tick(10.0);
    assert!(!h.manager.is_zone_active(&zone));
    assert!(h.zones.create_calls().is_empty());
}
