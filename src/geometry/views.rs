//! Borrowed views of the entities of a geometry

use crate::csg::{Cell, Fill, HalfspaceRef, Lattice, LatticeLayout};
use crate::geometry::{Geometry, Location};
use crate::traits::{Locate, Region};
use crate::types::{BoundingBox, CellId, ContainmentError, LatticeId, Point, UniverseId};
use itertools::Itertools;

/// A cell of a geometry
#[derive(Debug, Clone, Copy)]
pub struct CellView<'a> {
    geometry: &'a Geometry,
    id: CellId,
}

impl<'a> CellView<'a> {
    pub(crate) fn new(geometry: &'a Geometry, id: CellId) -> Self {
        Self { geometry, id }
    }

    /// The id of the cell
    pub fn id(&self) -> CellId {
        self.id
    }

    fn cell(&self) -> &'a Cell {
        &self.geometry.cells[self.id.index()]
    }

    /// The name of the cell
    pub fn name(&self) -> &'a str {
        self.cell().name()
    }

    /// The fill of the cell
    pub fn fill(&self) -> &'a Fill {
        self.cell().fill()
    }

    /// The half-spaces bounding the cell
    pub fn halfspaces(&self) -> &'a [HalfspaceRef] {
        self.cell().halfspaces()
    }

    /// Number of rings
    pub fn num_rings(&self) -> usize {
        self.cell().num_rings()
    }

    /// Number of sectors
    pub fn num_sectors(&self) -> usize {
        self.cell().num_sectors()
    }

    /// Number of ring and sector subregions, 0 if the cell is not subdivided
    pub fn num_subregions(&self) -> usize {
        self.cell().num_subregions()
    }

    /// The ring and sector subregion containing a point
    pub fn subregion_index(&self, point: Point) -> Result<usize, ContainmentError> {
        self.cell()
            .subregion_index(self.id, &self.geometry.surfaces, point)
    }
}

impl Region for CellView<'_> {
    fn contains(&self, point: Point) -> bool {
        self.cell().contains(&self.geometry.surfaces, point)
    }

    fn bounding_box(&self) -> BoundingBox {
        self.cell().bounding_box(&self.geometry.surfaces)
    }
}

/// A universe of a geometry
#[derive(Debug, Clone, Copy)]
pub struct UniverseView<'a> {
    geometry: &'a Geometry,
    id: UniverseId,
}

impl<'a> UniverseView<'a> {
    pub(crate) fn new(geometry: &'a Geometry, id: UniverseId) -> Self {
        Self { geometry, id }
    }

    /// The id of the universe
    pub fn id(&self) -> UniverseId {
        self.id
    }

    /// The name of the universe
    pub fn name(&self) -> &'a str {
        self.geometry.universes[self.id.index()].name()
    }

    /// The cells of the universe in search order
    pub fn cells(&self) -> impl Iterator<Item = CellView<'a>> + 'a {
        let geometry = self.geometry;
        geometry.universes[self.id.index()]
            .cells()
            .iter()
            .map(move |id| CellView::new(geometry, *id))
    }

    /// The union of the bounding boxes of the cells
    pub fn bounding_box(&self) -> BoundingBox {
        self.geometry.universe_bounding_box(self.id)
    }

    /// The number of flat source regions in one instance of the universe
    pub fn num_fsrs(&self) -> usize {
        self.geometry.fsrs.universe_count(self.id)
    }
}

impl Locate for UniverseView<'_> {
    fn locate(&self, point: Point) -> Result<Location, ContainmentError> {
        self.geometry.locate_in_universe(self.id, point)
    }
}

/// A lattice of a geometry
#[derive(Debug, Clone, Copy)]
pub struct LatticeView<'a> {
    geometry: &'a Geometry,
    id: LatticeId,
}

impl<'a> LatticeView<'a> {
    pub(crate) fn new(geometry: &'a Geometry, id: LatticeId) -> Self {
        Self { geometry, id }
    }

    fn lattice(&self) -> &'a Lattice {
        &self.geometry.lattices[self.id.index()]
    }

    /// The id of the lattice
    pub fn id(&self) -> LatticeId {
        self.id
    }

    /// The name of the lattice
    pub fn name(&self) -> &'a str {
        self.lattice().name()
    }

    /// The extent and pitch of the lattice
    pub fn layout(&self) -> &'a LatticeLayout {
        self.lattice().layout()
    }

    /// The universe at a lattice position
    pub fn universe(&self, i: usize, j: usize) -> Option<UniverseView<'a>> {
        self.lattice()
            .universe(i, j)
            .map(|id| UniverseView::new(self.geometry, id))
    }

    /// The distinct universes of the lattice, in `i`-major order of first appearance
    pub fn unique_universes(&self) -> Vec<UniverseId> {
        self.lattice()
            .iter()
            .map(|(_, universe)| universe)
            .unique()
            .collect()
    }

    /// Index of the lattice cell containing a point in the lattice's frame
    pub fn lattice_index(&self, point: Point) -> Result<(usize, usize), ContainmentError> {
        self.layout().lattice_index(self.id, point)
    }

    /// The number of flat source regions in one instance of the lattice
    pub fn num_fsrs(&self) -> usize {
        self.geometry.fsrs.lattice_count(self.id)
    }
}

impl Locate for LatticeView<'_> {
    fn locate(&self, point: Point) -> Result<Location, ContainmentError> {
        self.geometry.locate_in_lattice(self.id, point)
    }
}
