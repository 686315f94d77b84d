//! Point location

use crate::geometry::Location;
use crate::types::{CellId, ContainmentError, Point};

/// Something that can resolve a point to the innermost cell containing it
pub trait Locate {
    /// Resolve a point, recording every level of the hierarchy that was crossed
    ///
    /// The point is given in the frame of `self`. Points outside the modelled domain are an
    /// error; the search never falls back to an arbitrary cell.
    fn locate(&self, point: Point) -> Result<Location, ContainmentError>;

    /// The innermost cell containing a point
    fn find_cell(&self, point: Point) -> Result<CellId, ContainmentError> {
        self.locate(point).map(|location| location.cell())
    }
}
