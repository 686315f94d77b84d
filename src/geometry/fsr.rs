//! Flat source regions
//!
//! Every material cell reached from the root contributes one region per ring and sector
//! subdivision, or a single region when it is not subdivided. Regions are numbered
//! depth first: the cells of a universe in search order, the positions of a lattice in
//! `i`-major order. A universe shared by several lattice positions is counted once
//! per position.

use crate::csg::{Cell, Fill, Lattice, Universe};
use crate::geometry::Geometry;
use crate::material::Material;
use crate::types::{CellId, ContainmentError, LatticeId, Point, UniverseId};
use std::sync::Arc;

/// Region offsets of every cell of every universe and every position of every lattice
#[derive(Debug, Clone)]
pub(crate) struct FsrMap {
    universe_counts: Vec<usize>,
    cell_offsets: Vec<Vec<usize>>,
    lattice_counts: Vec<usize>,
    lattice_offsets: Vec<Vec<usize>>,
}

impl FsrMap {
    /// Count regions bottom up
    ///
    /// The graph must be acyclic.
    pub(crate) fn new(cells: &[Cell], universes: &[Universe], lattices: &[Lattice]) -> Self {
        let mut builder = FsrMapBuilder {
            cells,
            universes,
            lattices,
            universe_counts: vec![None; universes.len()],
            lattice_counts: vec![None; lattices.len()],
        };
        for index in 0..universes.len() {
            builder.universe_count(UniverseId(index));
        }
        for index in 0..lattices.len() {
            builder.lattice_count(LatticeId(index));
        }
        let universe_counts: Vec<usize> = builder
            .universe_counts
            .iter()
            .map(|c| c.unwrap_or(0))
            .collect();
        let lattice_counts: Vec<usize> = builder
            .lattice_counts
            .iter()
            .map(|c| c.unwrap_or(0))
            .collect();

        let fill_count = |fill: &Fill, cell: &Cell| match fill {
            Fill::Material(_) => cell.num_subregions().max(1),
            Fill::Universe(u) => universe_counts[u.index()],
            Fill::Lattice(l) => lattice_counts[l.index()],
        };
        let cell_offsets = universes
            .iter()
            .map(|universe| {
                exclusive_prefix_sum(universe.cells().iter().map(|id| {
                    let cell = &cells[id.index()];
                    fill_count(cell.fill(), cell)
                }))
            })
            .collect();
        let lattice_offsets = lattices
            .iter()
            .map(|lattice| {
                exclusive_prefix_sum(lattice.iter().map(|(_, u)| universe_counts[u.index()]))
            })
            .collect();

        Self {
            universe_counts,
            cell_offsets,
            lattice_counts,
            lattice_offsets,
        }
    }

    pub(crate) fn universe_count(&self, universe: UniverseId) -> usize {
        self.universe_counts[universe.index()]
    }

    pub(crate) fn lattice_count(&self, lattice: LatticeId) -> usize {
        self.lattice_counts[lattice.index()]
    }

    pub(crate) fn cell_offset(&self, universe: UniverseId, position: usize) -> usize {
        self.cell_offsets[universe.index()][position]
    }

    pub(crate) fn lattice_offset(&self, lattice: LatticeId, flat_index: usize) -> usize {
        self.lattice_offsets[lattice.index()][flat_index]
    }
}

fn exclusive_prefix_sum(counts: impl Iterator<Item = usize>) -> Vec<usize> {
    counts
        .scan(0, |total, count| {
            let offset = *total;
            *total += count;
            Some(offset)
        })
        .collect()
}

/// Position of the last offset not greater than `value`
fn last_offset_at_most(offsets: &[usize], value: usize) -> Option<usize> {
    offsets.partition_point(|offset| *offset <= value).checked_sub(1)
}

struct FsrMapBuilder<'a> {
    cells: &'a [Cell],
    universes: &'a [Universe],
    lattices: &'a [Lattice],
    universe_counts: Vec<Option<usize>>,
    lattice_counts: Vec<Option<usize>>,
}

impl FsrMapBuilder<'_> {
    fn universe_count(&mut self, universe: UniverseId) -> usize {
        if let Some(count) = self.universe_counts[universe.index()] {
            return count;
        }
        let universes = self.universes;
        let cells = self.cells;
        let count = universes[universe.index()]
            .cells()
            .iter()
            .map(|id| {
                let cell = &cells[id.index()];
                match cell.fill() {
                    Fill::Material(_) => cell.num_subregions().max(1),
                    Fill::Universe(inner) => self.universe_count(*inner),
                    Fill::Lattice(lattice) => self.lattice_count(*lattice),
                }
            })
            .sum();
        self.universe_counts[universe.index()] = Some(count);
        count
    }

    fn lattice_count(&mut self, lattice: LatticeId) -> usize {
        if let Some(count) = self.lattice_counts[lattice.index()] {
            return count;
        }
        let lattices = self.lattices;
        let count = lattices[lattice.index()]
            .iter()
            .map(|(_, universe)| self.universe_count(universe))
            .sum();
        self.lattice_counts[lattice.index()] = Some(count);
        count
    }
}

impl Geometry {
    /// The number of flat source regions in the geometry
    pub fn num_fsrs(&self) -> usize {
        self.fsrs.universe_count(self.root)
    }

    /// The cell containing a flat source region, and the subregion of that cell
    pub fn fsr_cell(&self, fsr_id: usize) -> Result<(CellId, usize), ContainmentError> {
        if fsr_id >= self.num_fsrs() {
            return Err(ContainmentError::UnknownFsr(fsr_id));
        }
        let unknown = || ContainmentError::UnknownFsr(fsr_id);
        let mut remaining = fsr_id;
        let mut universe = self.root;
        loop {
            let offsets = &self.fsrs.cell_offsets[universe.index()];
            let position = last_offset_at_most(offsets, remaining).ok_or_else(unknown)?;
            remaining -= offsets[position];
            let cell_id = self.universes[universe.index()].cells()[position];
            universe = match self.cells[cell_id.index()].fill() {
                Fill::Material(_) => return Ok((cell_id, remaining)),
                Fill::Universe(inner) => *inner,
                Fill::Lattice(lattice_id) => {
                    let offsets = &self.fsrs.lattice_offsets[lattice_id.index()];
                    let flat = last_offset_at_most(offsets, remaining).ok_or_else(unknown)?;
                    remaining -= offsets[flat];
                    let lattice = &self.lattices[lattice_id.index()];
                    let num_y = lattice.layout().num_y();
                    lattice.universes()[flat / num_y][flat % num_y]
                }
            };
        }
    }

    /// The material of a flat source region
    pub fn fsr_material(&self, fsr_id: usize) -> Result<Arc<Material>, ContainmentError> {
        let (cell, _) = self.fsr_cell(fsr_id)?;
        match self.cells[cell.index()].fill() {
            Fill::Material(material) => Ok(material.clone()),
            _ => Err(ContainmentError::UnknownFsr(fsr_id)),
        }
    }

    /// The flat source region containing a point
    pub fn fsr_id(&self, point: Point) -> Result<usize, ContainmentError> {
        self.locate_in_universe(self.root, point)
            .map(|location| location.fsr_id())
    }
}
