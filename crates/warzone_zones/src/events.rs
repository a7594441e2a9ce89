//! Notifications emitted to observers

use crate::ids::{ActorId, ZoneId};
use warzone_math::Vec3;

/// Why a PvP delay ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayEndReason {
    Expired,
    ReEntered,
    Respawned,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ZoneNotification {
    ZoneCreated { zone: ZoneId, event: String },
    ZoneDeleted { zone: ZoneId, event: String },
    CreationVetoed { zone: ZoneId, event: String },
    DeletionVetoed { zone: ZoneId, event: String },
    ActorEnteredZone { actor: ActorId, zone: ZoneId, event: String },
    /// `delay` is set when leaving started a PvP delay
    ActorExitedZone { actor: ActorId, zone: ZoneId, event: String, delay: Option<f32> },
    ActorEnteredDelay { actor: ActorId, zone: ZoneId, event: String, seconds: f32 },
    ActorExitedDelay { actor: ActorId, zone: ZoneId, event: String, reason: DelayEndReason },
}

impl ZoneNotification {
    /// Zone the notification is about
    pub fn zone(&self) -> &ZoneId {
        match self {
            Self::ZoneCreated { zone, .. }
            | Self::ZoneDeleted { zone, .. }
            | Self::CreationVetoed { zone, .. }
            | Self::DeletionVetoed { zone, .. }
            | Self::ActorEnteredZone { zone, .. }
            | Self::ActorExitedZone { zone, .. }
            | Self::ActorEnteredDelay { zone, .. }
            | Self::ActorExitedDelay { zone, .. } => zone,
        }
    }
}

/// Pre-operation veto point
#[derive(Debug, Clone, PartialEq)]
pub enum VetoRequest {
    Create { zone: ZoneId, event: String, position: Vec3 },
    Delete { zone: ZoneId, event: String },
}
