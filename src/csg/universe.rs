//! Universes

use crate::types::CellId;
use std::fmt;

/// An ordered collection of cells that together tile a domain
///
/// Cells are searched in insertion order and the first cell containing a point wins.
/// Overlapping cells are a modelling error that is only found by
/// [crate::geometry::Geometry::check_overlaps].
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    name: String,
    cells: Vec<CellId>,
}

impl Universe {
    /// Create an empty universe
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: vec![],
        }
    }

    /// The name of the universe
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cells of the universe in search order
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    /// Add a cell, ignoring cells that are already present
    pub(crate) fn add_cell(&mut self, cell: CellId) -> bool {
        if self.cells.contains(&cell) {
            false
        } else {
            self.cells.push(cell);
            true
        }
    }

    pub(crate) fn remove_cell(&mut self, cell: CellId) {
        self.cells.retain(|c| *c != cell);
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "universe \"{}\" with {} cells", self.name, self.cells.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cells_keep_insertion_order() {
        let mut universe = Universe::new("pin");
        assert!(universe.add_cell(CellId(3)));
        assert!(universe.add_cell(CellId(1)));
        assert!(!universe.add_cell(CellId(3)));
        assert_eq!(universe.cells(), &[CellId(3), CellId(1)]);
        universe.remove_cell(CellId(3));
        assert_eq!(universe.cells(), &[CellId(1)]);
    }

    #[test]
    fn test_display() {
        let mut universe = Universe::new("pin cell");
        universe.add_cell(CellId(0));
        universe.add_cell(CellId(4));
        assert_eq!(universe.to_string(), "universe \"pin cell\" with 2 cells");
    }
}
