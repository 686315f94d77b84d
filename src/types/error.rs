//! Error types

use crate::types::{CellId, LatticeId, Point, SurfaceId, UniverseId};

/// Errors raised while assembling a geometry
///
/// These are fatal: a geometry is never created from a builder that reported one.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    /// A circle was given a zero, negative or non-finite radius
    #[error("Circle radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    /// A surface was given a non-finite parameter
    #[error("Surface parameters must be finite")]
    NonFiniteParameter,
    /// A general plane with a zero normal
    #[error("Plane normal (a, b) must be non-zero")]
    DegeneratePlane,
    /// A lattice was given a zero, negative or non-finite pitch
    #[error("Lattice widths must be positive and finite, got ({0}, {1})")]
    InvalidWidth(f64, f64),
    /// A lattice offset was not finite
    #[error("Lattice offset must be finite")]
    InvalidOffset,
    /// A lattice was given an array without rows or columns
    #[error("Lattice {0} was given an empty array of universes")]
    EmptyLattice(LatticeId),
    /// The rows of a lattice array differ in length
    #[error("Row {row} of {lattice} has {found} universes, expected {expected}")]
    RaggedLattice {
        /// The lattice
        lattice: LatticeId,
        /// Index of the offending row
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        found: usize,
    },
    /// A lattice was used before its universes were set
    #[error("{0} has no universes")]
    LatticeWithoutUniverses(LatticeId),
    /// A lattice was used before its widths were set
    #[error("{0} has no width")]
    LatticeWithoutWidth(LatticeId),
    /// A cell was never given a fill
    #[error("{0} has no fill")]
    UnfilledCell(CellId),
    /// A cell is subdivided into rings without a circle bounding it from the inside
    #[error("{0} has rings but is not bounded by the negative side of a circle")]
    RingsWithoutCircle(CellId),
    /// The operation would make a universe or lattice contain itself
    #[error("Filling {0} would create a cycle")]
    Cycle(String),
    /// A material is missing from a library
    #[error("Unknown material: {0}")]
    UnknownMaterial(String),
    /// An id that does not belong to this builder
    #[error("Unknown surface: {0}")]
    UnknownSurface(SurfaceId),
    /// An id that does not belong to this builder
    #[error("Unknown cell: {0}")]
    UnknownCell(CellId),
    /// An id that does not belong to this builder
    #[error("Unknown universe: {0}")]
    UnknownUniverse(UniverseId),
    /// An id that does not belong to this builder
    #[error("Unknown lattice: {0}")]
    UnknownLattice(LatticeId),
    /// A placement landed outside the lattice
    #[error(transparent)]
    Placement(#[from] ContainmentError),
}

/// Errors raised by point location queries
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ContainmentError {
    /// No cell of a universe contains the point
    #[error("No cell in {universe} contains the point {point}")]
    NoCellFound {
        /// The universe searched
        universe: UniverseId,
        /// The point in the universe's frame
        point: Point,
    },
    /// The point lies outside the extent of a lattice
    #[error("The point {point} is outside of {lattice}")]
    OutsideLattice {
        /// The lattice
        lattice: LatticeId,
        /// The point in the lattice's frame
        point: Point,
    },
    /// A subregion was requested for a point outside the cell
    #[error("The point {point} is not inside {cell}")]
    NotInCell {
        /// The cell
        cell: CellId,
        /// The point
        point: Point,
    },
    /// A subregion was requested for a cell without rings or sectors
    #[error("{0} is not subdivided into rings or sectors")]
    NoSubdivision(CellId),
    /// A flat source region id beyond the number of regions
    #[error("Flat source region {0} does not exist")]
    UnknownFsr(usize),
}

/// Generic error type
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Construction error
    #[error("Construction error: {0}")]
    Construction(#[from] ConstructionError),
    /// Containment error
    #[error("Containment error: {0}")]
    Containment(#[from] ContainmentError),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
