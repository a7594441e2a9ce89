//! Warzone Geometry - Zone placement for map features
//!
//! Location-triggered events sit on authored map features (monuments,
//! transit tunnels, underwater facilities). Their zone shape is derived
//! from the "no-build" collision volumes the environment reports around
//! the feature.
//!
//! # Features
//!
//! - Feature classification (footprint, custom volume, transit, underwater)
//! - Candidate ranking: closest first, then largest
//! - Envelope accumulation across repeated derivations of the same feature
//!
//! # Example
//!
//! ```ignore
//! use warzone_geometry::prelude::*;
//!
//! let mut deriver = GeometryDeriver::new();
//! if let Some(geometry) = deriver.derive(&feature, &environment) {
//!     definition.shape = geometry.into_shape();
//! }
//! ```

pub mod deriver;
pub mod env;
pub mod feature;

pub mod prelude {
    pub use crate::deriver::{rank_candidates, Candidate, DerivedGeometry, GeometryDeriver, DISTANCE_TOLERANCE};
    pub use crate::env::{EnvironmentQuery, StaticEnvironment};
    pub use crate::feature::{FeatureClass, MapFeature};
}

pub use prelude::*;
