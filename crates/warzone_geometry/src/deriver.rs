//! Geometry derivation
//!
//! Candidates come from [`EnvironmentQuery::no_build_volumes`] around the
//! feature origin. They are ranked closest first, then largest; the best
//! one (or, for underwater clusters, all of them) becomes the zone.
//! Results for the same feature key accumulate into a maximal envelope.

use crate::env::EnvironmentQuery;
use crate::feature::{FeatureClass, MapFeature};
use std::collections::HashMap;
use warzone_catalog::ZoneShape;
use warzone_math::{consts, Aabb, OrientedBox, Vec3};

/// Distances closer than this are treated as equal when ranking
pub const DISTANCE_TOLERANCE: f32 = 1e-3;

/// A ranked no-build volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub volume: OrientedBox,
    /// Distance from the feature origin to the volume center
    pub distance: f32,
}

/// Rank volumes around `origin`: closest first, then largest.
///
/// The sort is stable, so candidates tied on both keys keep the order
/// the environment enumerated them in.
pub fn rank_candidates(origin: Vec3, volumes: Vec<OrientedBox>) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = volumes
        .into_iter()
        .map(|volume| Candidate {
            distance: volume.center.distance(origin),
            volume,
        })
        .collect();

    candidates.sort_by(|a, b| {
        distance_bucket(a.distance)
            .cmp(&distance_bucket(b.distance))
            .then_with(|| b.volume.volume().total_cmp(&a.volume.volume()))
    });
    candidates
}

#[inline]
fn distance_bucket(distance: f32) -> i64 {
    (distance / DISTANCE_TOLERANCE).round() as i64
}

/// Zone geometry in the feature's local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DerivedGeometry {
    Box { offset: Vec3, size: Vec3, rotation: f32 },
    Sphere { offset: Vec3, radius: f32 },
}

impl DerivedGeometry {
    /// Offset of the zone center from the feature origin
    pub fn offset(&self) -> Vec3 {
        match *self {
            Self::Box { offset, .. } | Self::Sphere { offset, .. } => offset,
        }
    }

    pub fn volume(&self) -> f32 {
        match *self {
            Self::Box { size, .. } => size.abs().product(),
            Self::Sphere { radius, .. } => 4.0 / 3.0 * consts::PI * radius * radius * radius,
        }
    }

    /// Grow to cover `other` as well
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Sphere { offset: a_offset, radius: a }, Self::Sphere { offset: b_offset, radius: b }) => {
                if b > a {
                    Self::Sphere { offset: b_offset, radius: b }
                } else {
                    Self::Sphere { offset: a_offset, radius: a }
                }
            }
            (
                Self::Box { size: a_size, .. },
                Self::Box { size: b_size, .. },
            ) => {
                let (offset, rotation) = if other.volume() > self.volume() {
                    (other.offset(), other.rotation())
                } else {
                    (self.offset(), self.rotation())
                };
                Self::Box {
                    offset,
                    size: a_size.abs().max(b_size.abs()),
                    rotation,
                }
            }
            _ if other.volume() > self.volume() => other,
            _ => self,
        }
    }

    fn rotation(&self) -> f32 {
        match *self {
            Self::Box { rotation, .. } => rotation,
            Self::Sphere { .. } => 0.0,
        }
    }

    /// Persistable shape; the anchor holds the offset from the feature origin
    pub fn into_shape(self) -> ZoneShape {
        match self {
            Self::Box { offset, size, rotation } => ZoneShape::cube(size, rotation).with_anchor(offset),
            Self::Sphere { offset, radius } => ZoneShape::sphere(radius).with_anchor(offset),
        }
    }
}

/// Accumulates derived envelopes per feature key
#[derive(Debug, Default)]
pub struct GeometryDeriver {
    envelopes: HashMap<String, DerivedGeometry>,
}

impl GeometryDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive geometry for `feature`, merged with earlier results for the same key
    pub fn derive(&mut self, feature: &MapFeature, env: &dyn EnvironmentQuery) -> Option<DerivedGeometry> {
        let fresh = derive_once(feature, env)?;
        let merged = match self.envelopes.get(feature.key()) {
            Some(previous) => previous.merge(fresh),
            None => fresh,
        };
        self.envelopes.insert(feature.key().to_string(), merged);
        Some(merged)
    }

    /// Current envelope for a feature key
    pub fn envelope(&self, key: &str) -> Option<&DerivedGeometry> {
        self.envelopes.get(key)
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    pub fn clear(&mut self) {
        self.envelopes.clear();
    }
}

fn derive_once(feature: &MapFeature, env: &dyn EnvironmentQuery) -> Option<DerivedGeometry> {
    if feature.class == FeatureClass::CustomVolume {
        if let Some(bounds) = feature.bounds {
            return from_local_bounds(bounds);
        }
    }

    let origin = feature.transform.position;
    let radius = feature.class.search_radius().max(1.0);
    let candidates = rank_candidates(origin, env.no_build_volumes(origin, radius));
    log::debug!(
        "Geometry for '{}' ({:?}): {} candidates",
        feature.name,
        feature.class,
        candidates.len()
    );

    if candidates.is_empty() {
        return feature.bounds.and_then(from_local_bounds);
    }

    if feature.class.envelopes_all() {
        let local = candidates.iter().fold(Aabb::EMPTY, |acc, c| {
            c.volume
                .corners()
                .iter()
                .fold(acc, |acc, &corner| acc.expand_to_include(feature.transform.inverse_transform_point(corner)))
        });
        return from_local_bounds(local);
    }

    let best = candidates[0].volume;
    let offset = feature.transform.inverse_transform_point(best.center);

    if feature.class == FeatureClass::TransitDwelling {
        let radius = Vec3::new(best.size.x, 0.0, best.size.z).length() * 0.5;
        return Some(DerivedGeometry::Sphere { offset, radius });
    }

    Some(DerivedGeometry::Box {
        offset,
        size: best.size.abs(),
        rotation: (best.yaw - feature.transform.yaw()).rem_euclid(360.0),
    })
}

fn from_local_bounds(bounds: Aabb) -> Option<DerivedGeometry> {
    if !bounds.is_valid() || bounds.size().is_zero() {
        return None;
    }
    Some(DerivedGeometry::Box {
        offset: bounds.center(),
        size: bounds.size(),
        rotation: 0.0,
    })
}
