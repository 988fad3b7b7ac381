//! Geographic layer system for the hemisphere views.
//!
//! This module provides the gnomonic projection, horizon clipping, the
//! graticule, path generation and loading of country boundary data.

mod clip;
mod graticule;
mod layer;
mod path;
mod projection;
mod rotation;
mod topology;

pub use graticule::Graticule;
pub use layer::{GeoFeature, WorldDataset};
pub use path::{FillMesh, PathGenerator, ProjectedPath};
pub use projection::{GnomonicProjection, DEFAULT_CLIP_ANGLE};
pub use rotation::{format_coordinates, Rotation};
