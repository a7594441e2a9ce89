//! Integration tests for PvP delays, hook subscriptions and query hooks

mod common;

use common::{catalog_with, sphere, Harness};
use warzone_catalog::{CommandFilter, CommandMode, EventCatalog, PluginConfig, UserEventStore};
use warzone_math::Vec3;
use warzone_zones::prelude::*;

const INSIDE: Vec3 = Vec3::new(0.0, 0.0, 0.0);
const OUTSIDE: Vec3 = Vec3::new(200.0, 0.0, 0.0);

fn delayed_arena() -> EventCatalog {
    catalog_with(&[("Arena", sphere(50.0).with_pvp_delay(10.0))])
}

#[test]
fn test_delay_round_trip() {
    let mut h = Harness::with_catalog(delayed_arena());
    let actor = ActorId(1);
    h.create("Arena", "a1", INSIDE);
    h.move_actor(actor, INSIDE);
    assert!(!h.manager.delays().is_delayed(actor));

    h.move_actor(actor, OUTSIDE);
    let record = h.manager.delays().get(actor).unwrap();
    assert_eq!(record.zone, ZoneId::from("a1"));
    assert_eq!(record.event, "Arena");
    assert!(h.manager.hooks().is_enabled(HookCategory::DamageArbitration));

    h.tick(9.9);
    assert!(h.manager.delays().is_delayed(actor));
    h.tick(0.1);
    assert!(!h.manager.delays().is_delayed(actor));
    assert!(!h.manager.hooks().is_enabled(HookCategory::DamageArbitration));

    assert_eq!(
        h.count_notifications(|n| matches!(
            n,
            ZoneNotification::ActorExitedDelay {
                reason: DelayEndReason::Expired,
                ..
            }
        )),
        1
    );
}

#[test]
fn test_reentry_ends_delay() {
    let mut h = Harness::with_catalog(delayed_arena());
    let actor = ActorId(1);
    h.create("Arena", "a1", INSIDE);
    h.move_actor(actor, INSIDE);
    h.move_actor(actor, OUTSIDE);
    h.move_actor(actor, INSIDE);

    assert!(!h.manager.delays().is_delayed(actor));
    assert!(!h.manager.is_timer_armed(&TimerKey::PvpDelay(actor)));
    assert_eq!(
        h.count_notifications(|n| matches!(
            n,
            ZoneNotification::ActorExitedDelay {
                reason: DelayEndReason::ReEntered,
                ..
            }
        )),
        1
    );
}

#[test]
fn test_respawn_ends_delay() {
    let mut h = Harness::with_catalog(delayed_arena());
    let actor = ActorId(1);
    h.create("Arena", "a1", INSIDE);
    h.move_actor(actor, INSIDE);
    h.move_actor(actor, OUTSIDE);

    h.manager.on_actor_respawn(actor);
    assert!(h.manager.delays().is_empty());
}

#[test]
fn test_no_delay_while_inside_another_zone() {
    let mut h = Harness::with_catalog(delayed_arena());
    let actor = ActorId(1);
    h.create("Arena", "a1", INSIDE);
    h.create("Arena", "a2", Vec3::new(60.0, 0.0, 0.0));

    h.move_actor(actor, Vec3::new(30.0, 0.0, 0.0));
    h.move_actor(actor, Vec3::new(80.0, 0.0, 0.0));
    assert!(!h.manager.delays().is_delayed(actor));

    h.move_actor(actor, OUTSIDE);
    assert_eq!(h.manager.delays().get(actor).map(|r| r.zone.as_str()), Some("a2"));
}

#[test]
fn test_zone_deletion_starts_delay_for_occupants() {
    let mut h = Harness::with_catalog(delayed_arena());
    let actor = ActorId(3);
    h.create("Arena", "a1", INSIDE);
    h.move_actor(actor, INSIDE);

    h.manager.delete_zone(&ZoneId::from("a1"));
    assert!(h.manager.delays().is_delayed(actor));
    assert!(h.observer.notifications().iter().any(|n| matches!(
        n,
        ZoneNotification::ActorExitedZone {
            delay: Some(_),
            ..
        }
    )));
}

#[test]
fn test_holster_on_entry() {
    let mut holstering = sphere(50.0);
    holstering.holster_time = 3.0;
    let mut h = Harness::with_catalog(catalog_with(&[("Arena", holstering)]));
    h.create("Arena", "a1", INSIDE);
    h.move_actor(ActorId(4), INSIDE);

    assert_eq!(h.world.holstered(), vec![(ActorId(4), 3.0)]);
}

#[test]
fn test_can_damage_rules() {
    let mut h = Harness::with_catalog(delayed_arena());
    let (delayed, inside, bystander) = (ActorId(1), ActorId(2), ActorId(3));
    assert_eq!(h.manager.can_damage(inside, delayed), None);

    h.create("Arena", "a1", INSIDE);
    h.move_actor(delayed, INSIDE);
    h.move_actor(inside, INSIDE);
    h.move_actor(bystander, OUTSIDE);
    h.move_actor(delayed, OUTSIDE);

    assert_eq!(h.manager.can_damage(inside, delayed), Some(true));
    assert_eq!(h.manager.can_damage(delayed, inside), Some(true));
    assert_eq!(h.manager.can_damage(bystander, delayed), None);
    assert_eq!(h.manager.can_damage(delayed, bystander), None);
}

#[test]
fn test_both_delayed_from_same_zone() {
    let mut h = Harness::with_catalog(delayed_arena());
    h.create("Arena", "a1", INSIDE);
    for actor in [ActorId(1), ActorId(2)] {
        h.move_actor(actor, INSIDE);
        h.move_actor(actor, OUTSIDE);
    }
    assert_eq!(h.manager.can_damage(ActorId(1), ActorId(2)), Some(true));
}

#[test]
fn test_disabled_rule_defers() {
    let mut config = PluginConfig::default();
    config.pvp_delay.victim_delayed_attacker_in_zone = false;
    let mut h = Harness::build(delayed_arena(), UserEventStore::new(), config, false);
    h.create("Arena", "a1", INSIDE);
    h.move_actor(ActorId(1), INSIDE);
    h.move_actor(ActorId(2), INSIDE);
    h.move_actor(ActorId(1), OUTSIDE);

    assert_eq!(h.manager.can_damage(ActorId(2), ActorId(1)), None);
    assert_eq!(h.manager.can_damage(ActorId(1), ActorId(2)), Some(true));
}

#[test]
fn test_exclusion_api_replaces_damage_hook() {
    let mut h = Harness::build(delayed_arena(), UserEventStore::new(), PluginConfig::default(), true);
    let actor = ActorId(1);
    h.create("Arena", "a1", INSIDE);
    h.move_actor(actor, INSIDE);
    h.move_actor(actor, OUTSIDE);

    assert_eq!(h.exclusion.excluded(actor), Some(10.0));
    assert!(!h.manager.hooks().is_enabled(HookCategory::DamageArbitration));

    h.move_actor(actor, INSIDE);
    assert_eq!(h.exclusion.cleared(), vec![actor]);

    // Expiry leaves the external API to time out on its own
    h.move_actor(actor, OUTSIDE);
    h.tick(10.0);
    assert_eq!(h.exclusion.cleared(), vec![actor]);
}

#[test]
fn test_hooks_follow_demand() {
    let mut h = Harness::with_catalog(catalog_with(&[("Arena", sphere(50.0))]));
    assert_eq!(h.listeners.toggle_count(), 0);

    h.create("Arena", "a1", INSIDE);
    assert!(h.listeners.is_subscribed(Listener::ZoneEnter));
    assert!(h.listeners.is_subscribed(Listener::ZoneExit));
    let toggles = h.listeners.toggle_count();

    h.create("Arena", "a2", OUTSIDE);
    h.move_actor(ActorId(1), INSIDE);
    h.move_actor(ActorId(1), OUTSIDE);
    h.manager.delete_zone(&ZoneId::from("a1"));
    assert_eq!(h.listeners.toggle_count(), toggles);

    h.manager.delete_zone(&ZoneId::from("a2"));
    assert!(!h.listeners.is_subscribed(Listener::ZoneEnter));
    assert_eq!(h.manager.hooks().flip_count(HookCategory::ZoneTransit), 2);
}

#[test]
fn test_plugin_category_queries() {
    let mut locked = sphere(50.0);
    locked.loot_lock = true;
    locked.block_restore_on_death = true;
    let mut h = Harness::with_catalog(catalog_with(&[("Locked", locked), ("Open", sphere(50.0))]));
    let actor = ActorId(1);
    assert!(!h.manager.should_lock_loot(actor));

    h.create("Locked", "l", INSIDE);
    h.create("Open", "o", OUTSIDE);
    assert!(h.manager.hooks().is_enabled(HookCategory::LootLock));
    assert!(!h.manager.hooks().is_enabled(HookCategory::BackpackDrop));

    h.move_actor(actor, INSIDE);
    assert!(h.manager.should_lock_loot(actor));
    assert!(h.manager.should_block_restore(actor));
    assert!(!h.manager.should_drop_backpack(actor));

    h.move_actor(actor, OUTSIDE);
    assert!(!h.manager.should_lock_loot(actor));

    h.manager.delete_zone(&ZoneId::from("l"));
    assert!(!h.manager.hooks().is_enabled(HookCategory::LootLock));
}

#[test]
fn test_command_filter_inside_and_during_delay() {
    let filter = CommandFilter {
        mode: CommandMode::Deny,
        commands: vec!["tp".to_string()],
        applies_during_delay: true,
    };
    let filtered = sphere(50.0).with_pvp_delay(10.0).with_command_filter(filter);
    let mut h = Harness::with_catalog(catalog_with(&[("Filtered", filtered)]));
    let actor = ActorId(1);

    h.create("Filtered", "f", INSIDE);
    assert!(h.manager.hooks().is_enabled(HookCategory::CommandInterception));
    h.move_actor(actor, INSIDE);
    assert!(h.manager.on_actor_command(actor, "/tp home"));
    assert!(!h.manager.on_actor_command(actor, "/kit"));

    h.move_actor(actor, OUTSIDE);
    h.manager.delete_zone(&ZoneId::from("f"));
    assert!(h.manager.hooks().is_enabled(HookCategory::CommandInterception));
    assert!(h.manager.on_actor_command(actor, "TP"));

    h.tick(10.0);
    assert!(!h.manager.on_actor_command(actor, "tp"));
    assert!(!h.manager.hooks().is_enabled(HookCategory::CommandInterception));
}

#[test]
fn test_allow_list_filter() {
    let filter = CommandFilter {
        mode: CommandMode::Allow,
        commands: vec!["help".to_string()],
        applies_during_delay: false,
    };
    let mut h = Harness::with_catalog(catalog_with(&[("Strict", sphere(50.0).with_command_filter(filter))]));
    h.create("Strict", "s", INSIDE);
    h.move_actor(ActorId(1), INSIDE);

    assert!(!h.manager.on_actor_command(ActorId(1), "/help"));
    assert!(h.manager.on_actor_command(ActorId(1), "/home"));
    assert!(!h.manager.on_actor_command(ActorId(2), "/home"));
}
