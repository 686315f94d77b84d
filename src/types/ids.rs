//! Handles to entities owned by a geometry builder or geometry
//!
//! Ids are indices into the arenas of the builder that created them. Sharing an id
//! shares the entity: a universe placed at many lattice positions is stored once.

use std::fmt;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// The index of this entity in its arena
            pub fn index(&self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", $label, self.0)
            }
        }
    };
}

entity_id!(
    /// Handle to a surface
    SurfaceId,
    "surface"
);
entity_id!(
    /// Handle to a cell
    CellId,
    "cell"
);
entity_id!(
    /// Handle to a universe
    UniverseId,
    "universe"
);
entity_id!(
    /// Handle to a lattice
    LatticeId,
    "lattice"
);
