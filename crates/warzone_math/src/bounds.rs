//! Bounding volumes for zone containment and environment queries

use crate::quaternion::Quat;
use crate::vector::Vec3;

/// Axis-Aligned Bounding Box
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an empty (inverted) AABB
    pub const EMPTY: Self = Self {
        min: Vec3::new(f32::MAX, f32::MAX, f32::MAX),
        max: Vec3::new(f32::MIN, f32::MIN, f32::MIN),
    };

    /// Create from min and max points
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create from center and half-extents
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center point
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size (full extents)
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if the AABB is valid (min <= max)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Expand to include a point
    pub fn expand_to_include(self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Union of two AABBs
    #[inline]
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Check if a point is inside
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x
            && point.y >= self.min.y && point.y <= self.max.y
            && point.z >= self.min.z && point.z <= self.max.z
    }
}

/// Bounding sphere
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    #[inline]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }
}

/// Box rotated around the vertical axis
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientedBox {
    pub center: Vec3,
    /// Full extents
    pub size: Vec3,
    /// Heading in degrees
    pub yaw: f32,
}

impl OrientedBox {
    #[inline]
    pub const fn new(center: Vec3, size: Vec3, yaw: f32) -> Self {
        Self { center, size, yaw }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    #[inline]
    pub fn volume(&self) -> f32 {
        self.size.abs().product()
    }

    /// Check if a world-space point is inside
    pub fn contains_point(&self, point: Vec3) -> bool {
        let local = Quat::from_yaw_degrees(self.yaw).inverse().rotate(point - self.center);
        let half = self.half_extents().abs();
        local.x.abs() <= half.x && local.y.abs() <= half.y && local.z.abs() <= half.z
    }

    /// The eight world-space corners
    pub fn corners(&self) -> [Vec3; 8] {
        let rotation = Quat::from_yaw_degrees(self.yaw);
        let h = self.half_extents();
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let local = Vec3::new(
                if i & 1 == 0 { -h.x } else { h.x },
                if i & 2 == 0 { -h.y } else { h.y },
                if i & 4 == 0 { -h.z } else { h.z },
            );
            *corner = self.center + rotation.rotate(local);
        }
        corners
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oriented_box_contains() {
        let b = OrientedBox::new(Vec3::ZERO, Vec3::new(10.0, 2.0, 2.0), 90.0);
        // Rotated 90 degrees: long axis now runs along Z
        assert!(b.contains_point(Vec3::new(0.0, 0.0, 4.5)));
        assert!(!b.contains_point(Vec3::new(4.5, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_union() {
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_half_extents(Vec3::new(4.0, 0.0, 0.0), Vec3::ONE);
        let u = a.union(&b);
        assert_eq!(u.size(), Vec3::new(6.0, 2.0, 2.0));
        assert_eq!(u.center(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_sphere_contains() {
        let s = Sphere::new(Vec3::new(100.0, 50.0, 100.0), 20.0);
        assert!(s.contains_point(Vec3::new(110.0, 50.0, 100.0)));
        assert!(!s.contains_point(Vec3::new(130.0, 50.0, 100.0)));
    }
}
