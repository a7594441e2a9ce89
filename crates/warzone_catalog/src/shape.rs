//! Zone shapes
//!
//! A zone is either a sphere or a box. Exactly one of the two is active:
//! a positive radius selects the sphere, otherwise a non-zero size selects
//! the box. A shape with neither is "unset" and cannot be materialized.

use serde::{Deserialize, Serialize};
use warzone_math::{OrientedBox, Sphere, Vec3};

/// Offset from a host entity's origin at which a parented zone is anchored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorOffset(pub Vec3);

/// Capability of shapes that can follow a moving host
pub trait ParentAnchor {
    /// Local-space offset from the host origin
    fn anchor_offset(&self) -> Vec3;
}

impl ParentAnchor for AnchorOffset {
    fn anchor_offset(&self) -> Vec3 {
        self.0
    }
}

/// Persisted zone shape of an event definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneShape {
    /// Sphere radius (active when > 0)
    #[serde(default)]
    pub radius: f32,
    /// Box size (active when radius <= 0 and size is non-zero)
    #[serde(default)]
    pub size: Vec3,
    /// Box heading in degrees, relative to the host or feature heading
    #[serde(default)]
    pub rotation: f32,
    /// Ignore the host heading and use `rotation` as an absolute heading
    #[serde(default)]
    pub fixed_rotation: bool,
    /// Present only on shapes that can be parented to a moving host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<AnchorOffset>,
}

/// Resolved volume handed to the zone provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ZoneVolume {
    Sphere { radius: f32 },
    Cube { size: Vec3, rotation: f32 },
}

impl ZoneShape {
    /// Create a sphere shape
    pub fn sphere(radius: f32) -> Self {
        Self {
            radius,
            size: Vec3::ZERO,
            rotation: 0.0,
            fixed_rotation: false,
            anchor: None,
        }
    }

    /// Create a box shape
    pub fn cube(size: Vec3, rotation: f32) -> Self {
        Self {
            radius: 0.0,
            size,
            rotation,
            fixed_rotation: false,
            anchor: None,
        }
    }

    /// Make the shape parentable, anchored at `offset` from the host origin
    pub fn with_anchor(mut self, offset: Vec3) -> Self {
        self.anchor = Some(AnchorOffset(offset));
        self
    }

    /// Use an absolute heading instead of following the host
    pub fn with_fixed_rotation(mut self) -> Self {
        self.fixed_rotation = true;
        self
    }

    /// Resolve the active volume, or `None` if the shape is unset
    pub fn volume(&self) -> Option<ZoneVolume> {
        if self.radius > 0.0 {
            Some(ZoneVolume::Sphere { radius: self.radius })
        } else if !self.size.is_zero() {
            Some(ZoneVolume::Cube { size: self.size, rotation: self.rotation })
        } else {
            None
        }
    }

    /// True if neither a positive radius nor a non-zero size is set
    pub fn is_unset(&self) -> bool {
        self.volume().is_none()
    }

    /// Parenting capability, if this shape supports following a host
    pub fn parent_anchor(&self) -> Option<&dyn ParentAnchor> {
        self.anchor.as_ref().map(|a| a as &dyn ParentAnchor)
    }

    /// Heading of the box given the heading of whatever it is placed on
    pub fn effective_rotation(&self, host_yaw: f32) -> f32 {
        if self.fixed_rotation {
            self.rotation
        } else {
            self.rotation + host_yaw
        }
    }
}

impl Default for ZoneShape {
    fn default() -> Self {
        Self::sphere(100.0)
    }
}

impl ZoneVolume {
    /// Radius of sphere volumes
    pub fn radius(&self) -> Option<f32> {
        match self {
            Self::Sphere { radius } => Some(*radius),
            Self::Cube { .. } => None,
        }
    }

    /// Check if a point is inside this volume placed at `center`
    pub fn contains_point(&self, center: Vec3, point: Vec3) -> bool {
        match *self {
            Self::Sphere { radius } => Sphere::new(center, radius).contains_point(point),
            Self::Cube { size, rotation } => {
                OrientedBox::new(center, size, rotation).contains_point(point)
            }
        }
    }

    /// Rough horizontal reach, used for proximity listings
    pub fn reach(&self) -> f32 {
        match *self {
            Self::Sphere { radius } => radius,
            Self::Cube { size, .. } => Vec3::new(size.x, 0.0, size.z).length() * 0.5,
        }
    }
}
