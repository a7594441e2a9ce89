//! Map feature descriptions

use serde::{Deserialize, Serialize};
use warzone_math::{Aabb, Transform};

/// How a map feature's zone geometry is found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureClass {
    /// Surface monument; the closest no-build volume is its footprint
    GenericFootprint,
    /// Authored volume; the feature's own bounds are used as-is
    CustomVolume,
    /// Tunnel entrance building
    TransitEntrance,
    /// Underground tunnel dwelling, zoned as a sphere
    TransitDwelling,
    /// Several modules that together form one facility
    UnderwaterCluster,
}

impl FeatureClass {
    /// Radius of the environment query around the feature origin
    pub fn search_radius(self) -> f32 {
        match self {
            Self::GenericFootprint => 120.0,
            Self::CustomVolume => 0.0,
            Self::TransitEntrance => 30.0,
            Self::TransitDwelling => 60.0,
            Self::UnderwaterCluster => 150.0,
        }
    }

    /// Whether every candidate contributes, not just the best one
    pub fn envelopes_all(self) -> bool {
        matches!(self, Self::UnderwaterCluster)
    }
}

/// An authored location on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFeature {
    /// Event name the feature's zone is registered under
    pub name: String,
    pub class: FeatureClass,
    pub transform: Transform,
    /// Authored local-space bounds, when the map provides them
    #[serde(default)]
    pub bounds: Option<Aabb>,
}

impl MapFeature {
    pub fn new(name: impl Into<String>, class: FeatureClass, transform: Transform) -> Self {
        Self {
            name: name.into(),
            class,
            transform,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Instances sharing a key share one definition and one envelope
    pub fn key(&self) -> &str {
        &self.name
    }
}
