//! Integration tests for administrator commands

mod common;

use common::Harness;
use warzone_catalog::{event_names, ZoneVolume};
use warzone_math::Vec3;
use warzone_zones::prelude::*;

const CAMP: Vec3 = Vec3::new(300.0, 0.0, 300.0);

fn add_camp(h: &mut Harness, autostart: bool) -> Result<String, CommandError> {
    h.manager.execute_command(AdminCommand::Add {
        name: "camp".to_string(),
        kind: UserEventKind::Auto {
            position: CAMP,
            autostart,
        },
    })
}

fn edit(h: &mut Harness, field: EditField) -> Result<String, CommandError> {
    h.manager.execute_command(AdminCommand::Edit {
        name: "camp".to_string(),
        field,
    })
}

#[test]
fn test_add_with_autostart() {
    let mut h = Harness::new();
    assert_eq!(add_camp(&mut h, true).unwrap(), "Added 'camp'");

    let zone = user_zone_id("camp");
    assert_eq!(zone.as_str(), "user:camp");
    assert_eq!(h.zones.zone(&zone).unwrap().position, CAMP);
    assert!(h.manager.context().catalog.contains("camp"));
}

#[test]
fn test_add_rejects_duplicates() {
    let mut h = Harness::new();
    add_camp(&mut h, false).unwrap();

    assert!(matches!(add_camp(&mut h, false), Err(CommandError::AlreadyExists(_))));
    let builtin = h.manager.execute_command(AdminCommand::Add {
        name: event_names::CARGO_SHIP.to_string(),
        kind: UserEventKind::Timed { duration: 60.0 },
    });
    assert!(matches!(builtin, Err(CommandError::AlreadyExists(_))));

    let zero = h.manager.execute_command(AdminCommand::Add {
        name: "blink".to_string(),
        kind: UserEventKind::Timed { duration: 0.0 },
    });
    assert!(matches!(zero, Err(CommandError::InvalidValue { field: "duration", .. })));
}

#[test]
fn test_start_and_stop() {
    let mut h = Harness::new();
    add_camp(&mut h, false).unwrap();
    let start = || AdminCommand::Start {
        name: "camp".to_string(),
        position: None,
    };

    let message = h.manager.execute_command(start()).unwrap();
    assert!(message.starts_with("Started 'camp'"));
    assert!(matches!(h.manager.execute_command(start()), Err(CommandError::AlreadyActive(_))));

    let stop = || AdminCommand::Stop { name: "camp".to_string() };
    h.manager.execute_command(stop()).unwrap();
    assert!(!h.manager.is_zone_active(&user_zone_id("camp")));
    assert!(matches!(h.manager.execute_command(stop()), Err(CommandError::NotActive(_))));
}

#[test]
fn test_timed_event_needs_position_and_expires() {
    let mut h = Harness::new();
    h.manager
        .execute_command(AdminCommand::Add {
            name: "skirmish".to_string(),
            kind: UserEventKind::Timed { duration: 90.0 },
        })
        .unwrap();

    let missing = h.manager.execute_command(AdminCommand::Start {
        name: "skirmish".to_string(),
        position: None,
    });
    assert!(matches!(missing, Err(CommandError::MissingPosition(_))));

    h.manager
        .execute_command(AdminCommand::Start {
            name: "skirmish".to_string(),
            position: Some(Vec3::new(5.0, 0.0, 5.0)),
        })
        .unwrap();
    let zone = user_zone_id("skirmish");
    assert!(h.manager.is_zone_active(&zone));

    h.tick(89.0);
    assert!(h.manager.is_zone_active(&zone));
    h.tick(1.0);
    assert!(!h.manager.is_zone_active(&zone));
}

#[test]
fn test_start_builtin_is_rejected() {
    let mut h = Harness::new();
    let result = h.manager.execute_command(AdminCommand::Start {
        name: event_names::BRADLEY_APC.to_string(),
        position: Some(Vec3::ZERO),
    });
    assert!(matches!(result, Err(CommandError::NotUserEvent(_))));

    let result = h.manager.execute_command(AdminCommand::Start {
        name: "nothing".to_string(),
        position: None,
    });
    assert!(matches!(result, Err(CommandError::UnknownEvent(_))));
}

#[test]
fn test_edit_restarts_running_zones() {
    let mut h = Harness::new();
    add_camp(&mut h, true).unwrap();
    let zone = user_zone_id("camp");

    let message = edit(&mut h, EditField::Radius(40.0)).unwrap();
    assert_eq!(message, "Updated 'camp' (1 zones restarted)");
    assert_eq!(h.zones.zone(&zone).unwrap().volume, ZoneVolume::Sphere { radius: 40.0 });
    assert_eq!(h.zones.create_calls().len(), 2);

    edit(&mut h, EditField::Position(Vec3::new(0.0, 0.0, 50.0))).unwrap();
    assert_eq!(h.zones.zone(&zone).unwrap().position, Vec3::new(0.0, 0.0, 50.0));
}

#[test]
fn test_edit_validation() {
    let mut h = Harness::new();
    add_camp(&mut h, false).unwrap();

    assert!(matches!(
        edit(&mut h, EditField::Radius(-5.0)),
        Err(CommandError::InvalidValue { field: "radius", .. })
    ));
    assert!(matches!(edit(&mut h, EditField::Radius(0.0)), Err(CommandError::UnsetShape(_))));
    assert_eq!(h.manager.context().definition("camp").unwrap().shape.radius, 100.0);

    edit(&mut h, EditField::PvpDelay(15.0)).unwrap();
    let def = h.manager.context().definition("camp").unwrap();
    assert!(def.pvp_delay_enabled);
    assert_eq!(def.pvp_delay_time, 15.0);

    edit(&mut h, EditField::Duration(0.0)).unwrap();
    assert_eq!(h.manager.context().definition("camp").unwrap().duration, None);

    let unknown = h.manager.execute_command(AdminCommand::Edit {
        name: "ghost".to_string(),
        field: EditField::Enabled(false),
    });
    assert!(matches!(unknown, Err(CommandError::UnknownEvent(_))));

    let builtin = h.manager.execute_command(AdminCommand::Edit {
        name: event_names::BRADLEY_APC.to_string(),
        field: EditField::AutoStart(true),
    });
    assert!(matches!(builtin, Err(CommandError::NotUserEvent(_))));
}

#[test]
fn test_remove() {
    let mut h = Harness::new();
    add_camp(&mut h, true).unwrap();

    let message = h
        .manager
        .execute_command(AdminCommand::Remove { name: "camp".to_string() })
        .unwrap();
    assert_eq!(message, "Removed 'camp'");
    assert_eq!(h.manager.active_zone_count(), 0);
    assert!(!h.manager.context().catalog.contains("camp"));

    let builtin = h.manager.execute_command(AdminCommand::Remove {
        name: event_names::CARGO_SHIP.to_string(),
    });
    assert!(matches!(builtin, Err(CommandError::NotUserEvent(_))));
    let unknown = h
        .manager
        .execute_command(AdminCommand::Remove { name: "camp".to_string() });
    assert!(matches!(unknown, Err(CommandError::UnknownEvent(_))));
}

#[test]
fn test_list() {
    let mut h = Harness::new();
    assert_eq!(h.manager.execute_command(AdminCommand::List).unwrap(), "No user-defined events");

    add_camp(&mut h, true).unwrap();
    h.manager
        .execute_command(AdminCommand::Add {
            name: "skirmish".to_string(),
            kind: UserEventKind::Timed { duration: 90.0 },
        })
        .unwrap();

    let listing = h.manager.execute_command(AdminCommand::List).unwrap();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("camp [auto"));
    assert!(lines[0].ends_with("running"));
    assert_eq!(lines[1], "skirmish [timed 90s] stopped");
}

#[test]
fn test_show_nearby_zones() {
    let mut h = Harness::new();
    add_camp(&mut h, true).unwrap();
    let admin = ActorId(99);
    h.move_actor(admin, CAMP);

    let message = h
        .manager
        .execute_command(AdminCommand::Show {
            actor: admin,
            radius: 10.0,
            seconds: 120.0,
        })
        .unwrap();
    assert_eq!(message, "Showing 1 zones within 10m");
    assert_eq!(h.world.shown(), vec![(admin, user_zone_id("camp"), MAX_SHOW_SECONDS)]);

    let nobody = h.manager.execute_command(AdminCommand::Show {
        actor: ActorId(1),
        radius: 10.0,
        seconds: 5.0,
    });
    assert!(matches!(nobody, Err(CommandError::InvalidValue { field: "actor", .. })));
}

#[test]
fn test_commands_parse_from_toml() {
    let start: AdminCommand = toml::from_str(
        r#"
        command = "start"
        name = "camp"
        position = { x = 1.0, y = 2.0, z = 3.0 }
        "#,
    )
    .unwrap();
    assert_eq!(
        start,
        AdminCommand::Start {
            name: "camp".to_string(),
            position: Some(Vec3::new(1.0, 2.0, 3.0)),
        }
    );

    let edit: AdminCommand = toml::from_str(
        r#"
        command = "edit"
        name = "camp"
        field = { field = "stop_delay", value = 30.0 }
        "#,
    )
    .unwrap();
    assert_eq!(
        edit,
        AdminCommand::Edit {
            name: "camp".to_string(),
            field: EditField::StopDelay(30.0),
        }
    );
}

#[test]
fn test_edit_keeps_occupants_inside() {
    let mut h = Harness::new();
    add_camp(&mut h, true).unwrap();
    edit(&mut h, EditField::PvpDelay(10.0)).unwrap();
    let actor = ActorId(1);
    h.move_actor(actor, CAMP);

    let message = edit(&mut h, EditField::Radius(60.0)).unwrap();
    assert_eq!(message, "Updated 'camp' (1 zones restarted)");
    h.pump();
    assert!(!h.manager.delays().is_delayed(actor));
    assert_eq!(
        h.count_notifications(|n| matches!(n, ZoneNotification::ActorExitedZone { .. })),
        0
    );

    // Moving the zone away is a real exit
    edit(&mut h, EditField::Position(Vec3::new(0.0, 0.0, 50.0))).unwrap();
    h.pump();
    assert!(h.manager.delays().is_delayed(actor));
}

#[test]
fn test_size_edit_replaces_radius() {
    let mut h = Harness::new();
    add_camp(&mut h, true).unwrap();
    let size = Vec3::new(20.0, 10.0, 20.0);

    let message = edit(&mut h, EditField::Size(size)).unwrap();
    assert_eq!(message, "Updated 'camp' (radius cleared, 1 zones restarted)");
    let shape = &h.manager.context().definition("camp").unwrap().shape;
    assert_eq!(shape.radius, 0.0);
    assert_eq!(shape.size, size);
    assert_eq!(
        h.zones.zone(&user_zone_id("camp")).unwrap().volume,
        ZoneVolume::Cube { size, rotation: 0.0 }
    );
}
