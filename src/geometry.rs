//! Geometry creation and point location
//!
//! A [GeometryBuilder] owns every surface, cell, universe and lattice while they are
//! linked together. [GeometryBuilder::create_geometry] validates the result and turns
//! it into an immutable [Geometry], which answers point location queries from any
//! number of threads.

mod builder;
mod fsr;
mod graph;
mod location;
mod overlap;
mod views;

pub use builder::GeometryBuilder;
pub use location::{Level, Location};
pub use overlap::Overlap;
pub use views::{CellView, LatticeView, UniverseView};

use crate::csg::{BoundaryType, Cell, Fill, HalfspaceRef, Lattice, Surface, Universe};
use crate::material::Material;
use crate::options::GeometryOptions;
use crate::traits::Locate;
use crate::types::{
    BoundingBox, CellId, ContainmentError, LatticeId, Point, SurfaceId, UniverseId,
};
use fsr::FsrMap;
use itertools::Itertools;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::collections::HashSet;
use std::sync::Arc;

/// Boundary conditions on the four sides of the geometry's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryTypes {
    /// Side at minimum x
    pub min_x: BoundaryType,
    /// Side at maximum x
    pub max_x: BoundaryType,
    /// Side at minimum y
    pub min_y: BoundaryType,
    /// Side at maximum y
    pub max_y: BoundaryType,
}

/// A finished geometry
///
/// The geometry cannot be modified. All queries take `&self` and hold no hidden state,
/// so a geometry can be shared between threads.
#[derive(Debug, Clone)]
pub struct Geometry {
    surfaces: Vec<Surface>,
    cells: Vec<Cell>,
    universes: Vec<Universe>,
    lattices: Vec<Lattice>,
    root: UniverseId,
    options: GeometryOptions,
    fsrs: FsrMap,
}

impl Geometry {
    /// The root universe
    pub fn root(&self) -> UniverseId {
        self.root
    }

    /// The options used to create the geometry
    pub fn options(&self) -> &GeometryOptions {
        &self.options
    }

    /// The bounding box of the root universe
    pub fn bounding_box(&self) -> BoundingBox {
        self.universe_bounding_box(self.root)
    }

    pub(crate) fn universe_bounding_box(&self, universe: UniverseId) -> BoundingBox {
        self.universes[universe.index()]
            .cells()
            .iter()
            .fold(BoundingBox::empty(), |bounds, id| {
                bounds.union(&self.cells[id.index()].bounding_box(&self.surfaces))
            })
    }

    /// Get a surface
    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.index())
    }

    /// Get a cell
    pub fn cell(&self, id: CellId) -> Option<CellView<'_>> {
        (id.index() < self.cells.len()).then(|| CellView::new(self, id))
    }

    /// Get a universe
    pub fn universe(&self, id: UniverseId) -> Option<UniverseView<'_>> {
        (id.index() < self.universes.len()).then(|| UniverseView::new(self, id))
    }

    /// Get a lattice
    pub fn lattice(&self, id: LatticeId) -> Option<LatticeView<'_>> {
        (id.index() < self.lattices.len()).then(|| LatticeView::new(self, id))
    }

    /// The number of surfaces
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// The number of cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The number of universes
    pub fn universe_count(&self) -> usize {
        self.universes.len()
    }

    /// The number of lattices
    pub fn lattice_count(&self) -> usize {
        self.lattices.len()
    }

    /// Find a surface by name
    pub fn find_surface(&self, name: &str) -> Option<SurfaceId> {
        self.surfaces
            .iter()
            .position(|s| s.name() == name)
            .map(SurfaceId)
    }

    /// Find a cell by name
    pub fn find_cell_by_name(&self, name: &str) -> Option<CellId> {
        self.cells.iter().position(|c| c.name() == name).map(CellId)
    }

    /// Find a universe by name
    pub fn find_universe(&self, name: &str) -> Option<UniverseId> {
        self.universes
            .iter()
            .position(|u| u.name() == name)
            .map(UniverseId)
    }

    /// Find a lattice by name
    pub fn find_lattice(&self, name: &str) -> Option<LatticeId> {
        self.lattices
            .iter()
            .position(|l| l.name() == name)
            .map(LatticeId)
    }

    /// Resolve many points in parallel
    pub fn find_cells(&self, points: &[Point]) -> Vec<Result<CellId, ContainmentError>> {
        points
            .par_iter()
            .map(|point| self.find_cell(*point))
            .collect()
    }

    /// Every cell reachable from the root, in depth-first order without repetition
    pub fn all_cells(&self) -> Vec<CellId> {
        let mut universes = vec![];
        let mut cells = vec![];
        self.collect(self.root, &mut HashSet::new(), &mut universes, &mut cells);
        cells.into_iter().unique().collect()
    }

    /// Every universe reachable from the root, the root first, in depth-first order
    /// without repetition
    pub fn all_universes(&self) -> Vec<UniverseId> {
        let mut universes = vec![];
        let mut cells = vec![];
        self.collect(self.root, &mut HashSet::new(), &mut universes, &mut cells);
        universes
    }

    fn collect(
        &self,
        universe: UniverseId,
        seen: &mut HashSet<UniverseId>,
        universes: &mut Vec<UniverseId>,
        cells: &mut Vec<CellId>,
    ) {
        if !seen.insert(universe) {
            return;
        }
        universes.push(universe);
        for id in self.universes[universe.index()].cells() {
            cells.push(*id);
            match self.cells[id.index()].fill() {
                Fill::Material(_) => {}
                Fill::Universe(inner) => self.collect(*inner, seen, universes, cells),
                Fill::Lattice(lattice) => {
                    for (_, inner) in self.lattices[lattice.index()].iter() {
                        self.collect(inner, seen, universes, cells);
                    }
                }
            }
        }
    }

    /// Every material reachable from the root, without repetition
    pub fn materials(&self) -> Vec<Arc<Material>> {
        self.all_cells()
            .into_iter()
            .filter_map(|id| match self.cells[id.index()].fill() {
                Fill::Material(material) => Some(material.clone()),
                _ => None,
            })
            .unique_by(|material| material.name().to_string())
            .collect()
    }

    /// The boundary conditions of the surfaces defining each side of the bounding box
    ///
    /// Sides without a bounding surface are reported as [BoundaryType::Interface].
    pub fn boundary_types(&self) -> BoundaryTypes {
        let bounds = self.bounding_box();
        let mut types = BoundaryTypes {
            min_x: BoundaryType::Interface,
            max_x: BoundaryType::Interface,
            min_y: BoundaryType::Interface,
            max_y: BoundaryType::Interface,
        };
        for h in self.root_halfspaces() {
            let surface = &self.surfaces[h.surface.index()];
            let extent = surface.halfspace_bounds(h.halfspace);
            let boundary = surface.boundary_type();
            if extent.min_x.is_finite() && extent.min_x == bounds.min_x {
                types.min_x = boundary;
            }
            if extent.max_x.is_finite() && extent.max_x == bounds.max_x {
                types.max_x = boundary;
            }
            if extent.min_y.is_finite() && extent.min_y == bounds.min_y {
                types.min_y = boundary;
            }
            if extent.max_y.is_finite() && extent.max_y == bounds.max_y {
                types.max_y = boundary;
            }
        }
        types
    }

    /// The boundary condition of the root surface a point lies on, if any
    pub fn boundary_type_at(&self, point: Point) -> Option<BoundaryType> {
        let threshold = self.options.on_surface_threshold();
        self.root_halfspaces()
            .map(|h| &self.surfaces[h.surface.index()])
            .find(|surface| surface.distance(point) <= threshold)
            .map(|surface| surface.boundary_type())
    }

    fn root_halfspaces(&self) -> impl Iterator<Item = &HalfspaceRef> + '_ {
        self.universes[self.root.index()]
            .cells()
            .iter()
            .flat_map(|id| self.cells[id.index()].halfspaces())
    }
}

impl Locate for Geometry {
    fn locate(&self, point: Point) -> Result<Location, ContainmentError> {
        self.locate_in_universe(self.root, point)
    }
}
