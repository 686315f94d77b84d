//! Resolution of points through the geometry hierarchy

use crate::csg::Fill;
use crate::geometry::Geometry;
use crate::types::{CellId, ContainmentError, LatticeId, Point, UniverseId};

/// One level of the hierarchy crossed while resolving a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Level {
    /// A cell was chosen in a universe
    Universe {
        /// The universe
        universe: UniverseId,
        /// The first cell of the universe containing the point
        cell: CellId,
        /// The point in the universe's frame
        point: Point,
    },
    /// A lattice cell was chosen in a lattice
    Lattice {
        /// The lattice
        lattice: LatticeId,
        /// The lattice index along x
        i: usize,
        /// The lattice index along y
        j: usize,
        /// The point in the lattice's frame
        point: Point,
    },
}

/// The result of resolving a point
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    levels: Vec<Level>,
    cell: CellId,
    point: Point,
    fsr: usize,
}

impl Location {
    /// The innermost cell, which is filled with a material
    pub fn cell(&self) -> CellId {
        self.cell
    }

    /// The point in the frame of the innermost cell
    pub fn local_point(&self) -> Point {
        self.point
    }

    /// Every level crossed, outermost first
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// The nesting depth: the number of universes crossed
    pub fn depth(&self) -> usize {
        self.levels
            .iter()
            .filter(|level| matches!(level, Level::Universe { .. }))
            .count()
    }

    /// The flat source region containing the point
    ///
    /// Region ids are numbered from the universe or lattice where the search started, so
    /// they are global ids when the search started at the root.
    pub fn fsr_id(&self) -> usize {
        self.fsr
    }
}

impl Geometry {
    pub(crate) fn locate_in_universe(
        &self,
        universe: UniverseId,
        point: Point,
    ) -> Result<Location, ContainmentError> {
        let mut levels = vec![];
        let (cell, point, fsr) = self.descend_universe(universe, point, 0, &mut levels)?;
        Ok(Location {
            levels,
            cell,
            point,
            fsr,
        })
    }

    pub(crate) fn locate_in_lattice(
        &self,
        lattice: LatticeId,
        point: Point,
    ) -> Result<Location, ContainmentError> {
        let mut levels = vec![];
        let (cell, point, fsr) = self.descend_lattice(lattice, point, 0, &mut levels)?;
        Ok(Location {
            levels,
            cell,
            point,
            fsr,
        })
    }

    fn descend_universe(
        &self,
        universe: UniverseId,
        point: Point,
        fsr: usize,
        levels: &mut Vec<Level>,
    ) -> Result<(CellId, Point, usize), ContainmentError> {
        let cells = self.universes[universe.index()].cells();
        let (position, cell_id) = cells
            .iter()
            .enumerate()
            .find(|(_, id)| self.cells[id.index()].contains(&self.surfaces, point))
            .ok_or(ContainmentError::NoCellFound { universe, point })?;

        levels.push(Level::Universe {
            universe,
            cell: *cell_id,
            point,
        });
        let fsr = fsr + self.fsrs.cell_offset(universe, position);
        let cell = &self.cells[cell_id.index()];
        match cell.fill() {
            Fill::Material(_) => {
                let subregion = if cell.num_subregions() > 0 {
                    cell.subregion_index(*cell_id, &self.surfaces, point)?
                } else {
                    0
                };
                Ok((*cell_id, point, fsr + subregion))
            }
            Fill::Universe(inner) => self.descend_universe(*inner, point, fsr, levels),
            Fill::Lattice(lattice) => self.descend_lattice(*lattice, point, fsr, levels),
        }
    }

    fn descend_lattice(
        &self,
        lattice_id: LatticeId,
        point: Point,
        fsr: usize,
        levels: &mut Vec<Level>,
    ) -> Result<(CellId, Point, usize), ContainmentError> {
        let lattice = &self.lattices[lattice_id.index()];
        let layout = lattice.layout();
        let (i, j) = layout.lattice_index(lattice_id, point)?;
        levels.push(Level::Lattice {
            lattice: lattice_id,
            i,
            j,
            point,
        });
        let universe = lattice.universes()[i][j];
        let fsr = fsr + self.fsrs.lattice_offset(lattice_id, i * layout.num_y() + j);
        self.descend_universe(universe, layout.local_point(i, j, point), fsr, levels)
    }
}
