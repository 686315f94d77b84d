//! Types specific to moc-geometry

mod bounding_box;
mod error;
mod ids;
mod point;

pub use bounding_box::BoundingBox;
pub use error::{ConstructionError, ContainmentError, Error, Result};
pub use ids::{CellId, LatticeId, SurfaceId, UniverseId};
pub use point::Point;
