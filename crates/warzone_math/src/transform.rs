//! Rigid transforms (position + rotation)

use crate::quaternion::Quat;
use crate::vector::Vec3;

/// World placement of a map feature, host entity or zone
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Create a new transform
    #[inline]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Create from position and a heading in degrees
    #[inline]
    pub fn from_position_yaw(position: Vec3, yaw: f32) -> Self {
        Self { position, rotation: Quat::from_yaw_degrees(yaw) }
    }

    /// Transform a local-space point into world space
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation.rotate(point)
    }

    /// Transform a world-space point into local space
    #[inline]
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse().rotate(point - self.position)
    }

    /// Heading of this transform in degrees
    #[inline]
    pub fn yaw(&self) -> f32 {
        self.rotation.yaw_degrees()
    }
}
