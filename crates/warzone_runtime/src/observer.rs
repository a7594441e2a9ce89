//! Observer that logs every notification and keeps tallies for the summary

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use warzone_zones::{ZoneNotification, ZoneObserver};

/// Notification counts by kind
#[derive(Debug, Clone, Default)]
pub struct Tally(Arc<Mutex<BTreeMap<&'static str, usize>>>);

impl Tally {
    pub fn lines(&self) -> Vec<String> {
        self.0
            .lock()
            .iter()
            .map(|(kind, n)| format!("{:<18} {}", kind, n))
            .collect()
    }
}

pub struct LoggingObserver {
    tally: Tally,
}

impl LoggingObserver {
    pub fn new(tally: Tally) -> Self {
        Self { tally }
    }
}

fn kind(notification: &ZoneNotification) -> &'static str {
    match notification {
        ZoneNotification::ZoneCreated { .. } => "zone created",
        ZoneNotification::ZoneDeleted { .. } => "zone deleted",
        ZoneNotification::CreationVetoed { .. } => "creation vetoed",
        ZoneNotification::DeletionVetoed { .. } => "deletion vetoed",
        ZoneNotification::ActorEnteredZone { .. } => "actor entered",
        ZoneNotification::ActorExitedZone { .. } => "actor exited",
        ZoneNotification::ActorEnteredDelay { .. } => "delay started",
        ZoneNotification::ActorExitedDelay { .. } => "delay ended",
    }
}

impl ZoneObserver for LoggingObserver {
    fn notify(&mut self, notification: &ZoneNotification) {
        match notification {
            ZoneNotification::ActorEnteredZone { actor, zone, .. } => {
                log::info!("{} entered zone {}", actor, zone)
            }
            ZoneNotification::ActorExitedZone { actor, zone, delay, .. } => match delay {
                Some(seconds) => log::info!("{} left zone {} ({}s PvP delay)", actor, zone, seconds),
                None => log::info!("{} left zone {}", actor, zone),
            },
            ZoneNotification::ActorExitedDelay { actor, reason, .. } => {
                log::info!("{} delay ended ({:?})", actor, reason)
            }
            other => log::debug!("{:?}", other),
        }

        *self.tally.0.lock().entry(kind(notification)).or_default() += 1;
    }
}
