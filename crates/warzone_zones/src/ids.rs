//! Zone, actor and entity identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use warzone_math::Vec3;

/// Position handed in by callers that could not resolve a real one
pub const INVALID_POSITION: Vec3 = Vec3::new(f32::MIN, f32::MIN, f32::MIN);

/// Check a position is usable for zone placement
#[inline]
pub fn is_valid_position(position: Vec3) -> bool {
    position != INVALID_POSITION
        && position.x.is_finite()
        && position.y.is_finite()
        && position.z.is_finite()
}

/// Name of a zone as known to the zone provider
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Zone owned by a world entity; stable across restarts
    pub fn for_entity(entity: EntityId) -> Self {
        Self(entity.0.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZoneId({})", self.0)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ZoneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A connected player
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// A world entity (vehicle, crate, capsule, switch)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Generates ids for zones that are not tied to an entity
#[derive(Debug, Default)]
pub struct ZoneIdGenerator {
    next: u64,
}

impl ZoneIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> ZoneId {
        self.next += 1;
        ZoneId(format!("warzone-{}", self.next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_monotonic() {
        let mut ids = ZoneIdGenerator::new();
        assert_eq!(ids.next_id().as_str(), "warzone-1");
        assert_eq!(ids.next_id().as_str(), "warzone-2");
    }

    #[test]
    fn test_invalid_position() {
        assert!(!is_valid_position(INVALID_POSITION));
        assert!(!is_valid_position(Vec3::new(f32::NAN, 0.0, 0.0)));
        assert!(is_valid_position(Vec3::new(100.0, 50.0, 100.0)));
    }

    #[test]
    fn test_entity_zone_id() {
        assert_eq!(ZoneId::for_entity(EntityId(555)), ZoneId::from("555"));
    }
}
