//! Regions of the plane

use crate::types::{BoundingBox, Point};

/// A region of the plane
pub trait Region {
    /// Is the point inside the closed region?
    fn contains(&self, point: Point) -> bool;

    /// Axis-aligned box enclosing the region, with infinite sides where it is unbounded
    fn bounding_box(&self) -> BoundingBox;
}
