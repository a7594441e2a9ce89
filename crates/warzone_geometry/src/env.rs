//! Environment query contract

use warzone_math::{OrientedBox, Vec3};

/// Read access to the world's static collision volumes
pub trait EnvironmentQuery {
    /// No-build volumes whose center lies within `radius` of `center`,
    /// in the host's enumeration order
    fn no_build_volumes(&self, center: Vec3, radius: f32) -> Vec<OrientedBox>;
}

/// Fixed list of volumes, enumerated in insertion order
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    volumes: Vec<OrientedBox>,
}

impl StaticEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_volume(mut self, volume: OrientedBox) -> Self {
        self.volumes.push(volume);
        self
    }

    pub fn push(&mut self, volume: OrientedBox) {
        self.volumes.push(volume);
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }
}

impl EnvironmentQuery for StaticEnvironment {
    fn no_build_volumes(&self, center: Vec3, radius: f32) -> Vec<OrientedBox> {
        self.volumes
            .iter()
            .filter(|v| v.center.distance(center) <= radius)
            .copied()
            .collect()
    }
}

impl FromIterator<OrientedBox> for StaticEnvironment {
    fn from_iter<I: IntoIterator<Item = OrientedBox>>(iter: I) -> Self {
        Self {
            volumes: iter.into_iter().collect(),
        }
    }
}
