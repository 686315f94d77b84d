//! Constructive solid geometry primitives
//!
//! Surfaces split the plane into two half-spaces, cells intersect half-spaces, universes
//! collect cells and lattices arrange universes on a regular grid.

mod cell;
mod lattice;
mod surface;
mod universe;

pub(crate) use cell::halfspaces_bounding_box;
pub use cell::{Cell, Fill};
pub use lattice::{Lattice, LatticeLayout};
pub use surface::{BoundaryType, Halfspace, HalfspaceRef, Surface, SurfaceKind};
pub use universe::Universe;
