//! # warzone_math - Zone Placement Math
//!
//! Small math toolkit for placing and testing combat zones:
//! vectors, yaw rotations, rigid transforms and the bounding volumes
//! that zone shapes and geometry derivation are built from.

pub mod vector;
pub mod quaternion;
pub mod transform;
pub mod bounds;

pub use vector::*;
pub use quaternion::*;
pub use transform::*;
pub use bounds::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

/// Approximate float equality with an absolute tolerance
#[inline]
pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

pub mod prelude {
    pub use crate::vector::Vec3;
    pub use crate::quaternion::Quat;
    pub use crate::transform::Transform;
    pub use crate::bounds::{Aabb, OrientedBox, Sphere};
    pub use crate::{approx_eq, degrees, radians};
}
