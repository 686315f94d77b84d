//! Geometry builder

use crate::csg::{
    halfspaces_bounding_box, BoundaryType, Cell, Fill, Halfspace, HalfspaceRef, Lattice,
    LatticeLayout, Surface, SurfaceKind, Universe,
};
use crate::geometry::fsr::FsrMap;
use crate::geometry::graph::{find_cycle, reaches, Node};
use crate::geometry::Geometry;
use crate::options::GeometryOptions;
use crate::types::{
    BoundingBox, CellId, ConstructionError, LatticeId, Point, SurfaceId, UniverseId,
};
use itertools::Itertools;
use log::{debug, info, warn};
use std::collections::HashSet;

/// A cell whose fill may not be known yet
#[derive(Debug, Clone)]
struct CellDraft {
    name: String,
    halfspaces: Vec<HalfspaceRef>,
    num_rings: usize,
    num_sectors: usize,
    fill: Option<Fill>,
}

/// A lattice whose width and universes may not be known yet
#[derive(Debug, Clone)]
struct LatticeDraft {
    name: String,
    width: Option<(f64, f64)>,
    offset: Point,
    universes: Option<Vec<Vec<UniverseId>>>,
}

impl LatticeDraft {
    fn layout(&self, id: LatticeId) -> Result<LatticeLayout, ConstructionError> {
        let universes = self
            .universes
            .as_ref()
            .ok_or(ConstructionError::LatticeWithoutUniverses(id))?;
        let (width_x, width_y) = self
            .width
            .ok_or(ConstructionError::LatticeWithoutWidth(id))?;
        Ok(LatticeLayout::new(
            universes.len(),
            universes[0].len(),
            width_x,
            width_y,
            self.offset,
        ))
    }
}

/// Builder for a [Geometry]
///
/// Entities are created by the builder and referred to by id. Ids can be shared
/// freely: a universe placed at many lattice positions is stored once. Every setter
/// checks its arguments, and a fill that would make a universe or lattice contain
/// itself is rejected without being applied.
#[derive(Debug, Clone, Default)]
pub struct GeometryBuilder {
    surfaces: Vec<Surface>,
    cells: Vec<CellDraft>,
    universes: Vec<Universe>,
    lattices: Vec<LatticeDraft>,
}

impl GeometryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface
    pub fn create_surface(
        &mut self,
        name: impl Into<String>,
        kind: SurfaceKind,
    ) -> Result<SurfaceId, ConstructionError> {
        self.surfaces.push(Surface::new(name, kind)?);
        Ok(SurfaceId(self.surfaces.len() - 1))
    }

    /// Add the plane `x = x0`
    pub fn create_x_plane(
        &mut self,
        name: impl Into<String>,
        x: f64,
    ) -> Result<SurfaceId, ConstructionError> {
        self.create_surface(name, SurfaceKind::XPlane { x })
    }

    /// Add the plane `y = y0`
    pub fn create_y_plane(
        &mut self,
        name: impl Into<String>,
        y: f64,
    ) -> Result<SurfaceId, ConstructionError> {
        self.create_surface(name, SurfaceKind::YPlane { y })
    }

    /// Add the plane `a x + b y + c = 0`
    pub fn create_plane(
        &mut self,
        name: impl Into<String>,
        a: f64,
        b: f64,
        c: f64,
    ) -> Result<SurfaceId, ConstructionError> {
        self.create_surface(name, SurfaceKind::Plane { a, b, c })
    }

    /// Add a circle
    pub fn create_circle(
        &mut self,
        name: impl Into<String>,
        x: f64,
        y: f64,
        radius: f64,
    ) -> Result<SurfaceId, ConstructionError> {
        self.create_surface(
            name,
            SurfaceKind::Circle {
                center: Point::new(x, y),
                radius,
            },
        )
    }

    /// Set the boundary condition of a surface
    pub fn set_boundary_type(
        &mut self,
        surface: SurfaceId,
        boundary: BoundaryType,
    ) -> Result<(), ConstructionError> {
        self.surfaces
            .get_mut(surface.index())
            .ok_or(ConstructionError::UnknownSurface(surface))?
            .set_boundary_type(boundary);
        Ok(())
    }

    /// Add a cell without half-spaces or fill
    pub fn create_cell(&mut self, name: impl Into<String>) -> CellId {
        self.cells.push(CellDraft {
            name: name.into(),
            halfspaces: vec![],
            num_rings: 0,
            num_sectors: 0,
            fill: None,
        });
        CellId(self.cells.len() - 1)
    }

    /// Restrict a cell to one side of a surface
    pub fn add_surface(
        &mut self,
        cell: CellId,
        halfspace: Halfspace,
        surface: SurfaceId,
    ) -> Result<(), ConstructionError> {
        self.check_surface(surface)?;
        self.cell_mut(cell)?
            .halfspaces
            .push(HalfspaceRef { surface, halfspace });
        Ok(())
    }

    /// Set the fill of a cell, replacing any previous fill
    pub fn set_fill(&mut self, cell: CellId, fill: impl Into<Fill>) -> Result<(), ConstructionError> {
        let fill = fill.into();
        self.check_cell(cell)?;
        if let Some(child) = Node::of_fill(&fill) {
            self.check_node(child)?;
            let closes_cycle = self
                .universes
                .iter()
                .enumerate()
                .filter(|(_, universe)| universe.cells().contains(&cell))
                .any(|(index, _)| self.reaches(child, Node::Universe(UniverseId(index))));
            if closes_cycle {
                return Err(ConstructionError::Cycle(cell.to_string()));
            }
        }
        self.cells[cell.index()].fill = Some(fill);
        Ok(())
    }

    /// Set the number of equal-area rings of a cell
    pub fn set_num_rings(&mut self, cell: CellId, num_rings: usize) -> Result<(), ConstructionError> {
        self.cell_mut(cell)?.num_rings = num_rings;
        Ok(())
    }

    /// Set the number of equal-angle sectors of a cell
    pub fn set_num_sectors(
        &mut self,
        cell: CellId,
        num_sectors: usize,
    ) -> Result<(), ConstructionError> {
        self.cell_mut(cell)?.num_sectors = num_sectors;
        Ok(())
    }

    /// Add an empty universe
    pub fn create_universe(&mut self, name: impl Into<String>) -> UniverseId {
        self.universes.push(Universe::new(name));
        UniverseId(self.universes.len() - 1)
    }

    /// Append a cell to a universe
    ///
    /// Cells are searched in the order they were added. Adding a cell twice has no effect.
    pub fn add_cell(&mut self, universe: UniverseId, cell: CellId) -> Result<(), ConstructionError> {
        self.check_universe(universe)?;
        self.check_cell(cell)?;
        if let Some(child) = self.cells[cell.index()].fill.as_ref().and_then(Node::of_fill) {
            if self.reaches(child, Node::Universe(universe)) {
                return Err(ConstructionError::Cycle(universe.to_string()));
            }
        }
        if !self.universes[universe.index()].add_cell(cell) {
            debug!("{cell} is already in {universe}");
        }
        Ok(())
    }

    /// Remove a cell from a universe
    pub fn remove_cell(&mut self, universe: UniverseId, cell: CellId) -> Result<(), ConstructionError> {
        self.check_universe(universe)?;
        self.check_cell(cell)?;
        self.universes[universe.index()].remove_cell(cell);
        Ok(())
    }

    /// Add a lattice without width or universes
    pub fn create_lattice(&mut self, name: impl Into<String>) -> LatticeId {
        self.lattices.push(LatticeDraft {
            name: name.into(),
            width: None,
            offset: Point::origin(),
            universes: None,
        });
        LatticeId(self.lattices.len() - 1)
    }

    /// Set the pitch of a lattice
    pub fn set_width(
        &mut self,
        lattice: LatticeId,
        width_x: f64,
        width_y: f64,
    ) -> Result<(), ConstructionError> {
        let valid = |w: f64| w.is_finite() && w > 0.0;
        if !valid(width_x) || !valid(width_y) {
            return Err(ConstructionError::InvalidWidth(width_x, width_y));
        }
        self.lattice_mut(lattice)?.width = Some((width_x, width_y));
        Ok(())
    }

    /// Shift a lattice away from the origin of the cell it fills
    pub fn set_offset(&mut self, lattice: LatticeId, x: f64, y: f64) -> Result<(), ConstructionError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ConstructionError::InvalidOffset);
        }
        self.lattice_mut(lattice)?.offset = Point::new(x, y);
        Ok(())
    }

    /// Set every universe of a lattice
    ///
    /// The array is indexed `[i][j]`, with `i` along x and `j` along y, and fixes the
    /// dimensions of the lattice.
    pub fn set_universes(
        &mut self,
        lattice: LatticeId,
        universes: Vec<Vec<UniverseId>>,
    ) -> Result<(), ConstructionError> {
        self.check_lattice(lattice)?;
        let expected = universes.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(ConstructionError::EmptyLattice(lattice));
        }
        if let Some((row, found)) = universes
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != expected)
        {
            return Err(ConstructionError::RaggedLattice {
                lattice,
                row,
                expected,
                found,
            });
        }
        for universe in universes.iter().flatten().unique() {
            self.check_placement(lattice, *universe)?;
        }
        debug!(
            "Setting {}x{} universes of {lattice}",
            universes.len(),
            expected
        );
        self.lattices[lattice.index()].universes = Some(universes);
        Ok(())
    }

    /// The extent and pitch of a lattice whose width and universes are set
    pub fn lattice_layout(&self, lattice: LatticeId) -> Result<LatticeLayout, ConstructionError> {
        self.check_lattice(lattice)?;
        self.lattices[lattice.index()].layout(lattice)
    }

    /// Place a universe in every lattice cell covered by a rectangle
    ///
    /// The rectangle is spanned by two opposite corners, given in any order in the frame
    /// of the lattice. Returns the positions that were assigned.
    pub fn place_region(
        &mut self,
        lattice: LatticeId,
        corner_a: Point,
        corner_b: Point,
        universe: UniverseId,
    ) -> Result<Vec<(usize, usize)>, ConstructionError> {
        let layout = self.lattice_layout(lattice)?;
        self.check_placement(lattice, universe)?;
        let indices = layout.region_indices(lattice, corner_a, corner_b)?;
        self.assign(lattice, &indices, universe);
        debug!(
            "Placed {universe} at {} positions of {lattice} between {corner_a} and {corner_b}",
            indices.len()
        );
        Ok(indices)
    }

    /// Place a universe in the lattice cell containing a point
    pub fn place_point(
        &mut self,
        lattice: LatticeId,
        point: Point,
        universe: UniverseId,
    ) -> Result<(usize, usize), ConstructionError> {
        let layout = self.lattice_layout(lattice)?;
        self.check_placement(lattice, universe)?;
        let index = layout.lattice_index(lattice, point)?;
        self.assign(lattice, &[index], universe);
        debug!("Placed {universe} at {index:?} of {lattice}");
        Ok(index)
    }

    /// The union of the bounding boxes of the cells of a universe
    pub fn universe_bounding_box(
        &self,
        universe: UniverseId,
    ) -> Result<BoundingBox, ConstructionError> {
        self.check_universe(universe)?;
        Ok(self.universes[universe.index()]
            .cells()
            .iter()
            .fold(BoundingBox::empty(), |bounds, id| {
                bounds.union(&halfspaces_bounding_box(
                    &self.surfaces,
                    &self.cells[id.index()].halfspaces,
                ))
            }))
    }

    /// Validate the builder and create the geometry
    ///
    /// Every cell must have a fill and every lattice a width and universes. Cells
    /// split into rings must be bounded by the negative side of a circle.
    pub fn create_geometry(
        self,
        root: UniverseId,
        options: GeometryOptions,
    ) -> Result<Geometry, ConstructionError> {
        self.check_universe(root)?;
        let nodes: Vec<Node> = (0..self.universes.len())
            .map(|index| Node::Universe(UniverseId(index)))
            .chain((0..self.lattices.len()).map(|index| Node::Lattice(LatticeId(index))))
            .collect();
        if let Some(node) = find_cycle(&nodes, |node| self.children(node)) {
            return Err(ConstructionError::Cycle(node.to_string()));
        }

        let GeometryBuilder {
            surfaces,
            cells,
            universes,
            lattices,
        } = self;

        let lattices = lattices
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                let layout = draft.layout(LatticeId(index))?;
                let lattice = Lattice::new(
                    draft.name,
                    layout,
                    draft.universes.unwrap_or_default(),
                );
                debug!("Built {lattice}");
                Ok(lattice)
            })
            .collect::<Result<Vec<_>, ConstructionError>>()?;

        let cells = cells
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                let id = CellId(index);
                let fill = draft.fill.ok_or(ConstructionError::UnfilledCell(id))?;
                let cell = Cell::new(
                    draft.name,
                    draft.halfspaces,
                    draft.num_rings,
                    draft.num_sectors,
                    fill,
                );
                if cell.num_rings() > 0 && cell.ring_bounds(&surfaces).is_none() {
                    return Err(ConstructionError::RingsWithoutCircle(id));
                }
                Ok(cell)
            })
            .collect::<Result<Vec<_>, ConstructionError>>()?;

        debug!("Root is {}", universes[root.index()]);
        let root_surfaces: HashSet<SurfaceId> = universes[root.index()]
            .cells()
            .iter()
            .flat_map(|id| cells[id.index()].halfspaces())
            .map(|h| h.surface)
            .collect();
        for (index, surface) in surfaces.iter().enumerate() {
            let boundary = surface.boundary_type();
            if boundary != BoundaryType::Interface && !root_surfaces.contains(&SurfaceId(index)) {
                warn!(
                    "Surface \"{}\" has boundary type {boundary:?} but does not bound the root universe",
                    surface.name()
                );
            }
        }

        let fsrs = FsrMap::new(&cells, &universes, &lattices);
        let geometry = Geometry {
            surfaces,
            cells,
            universes,
            lattices,
            root,
            options,
            fsrs,
        };
        info!(
            "Created geometry with {} surfaces, {} cells, {} universes, {} lattices and {} flat source regions",
            geometry.surface_count(),
            geometry.cell_count(),
            geometry.universe_count(),
            geometry.lattice_count(),
            geometry.num_fsrs()
        );
        if geometry.options.check_overlaps() {
            geometry.check_overlaps();
        }
        Ok(geometry)
    }

    fn children(&self, node: Node) -> Vec<Node> {
        match node {
            Node::Universe(universe) => self.universes[universe.index()]
                .cells()
                .iter()
                .filter_map(|id| self.cells[id.index()].fill.as_ref().and_then(Node::of_fill))
                .collect(),
            Node::Lattice(lattice) => self.lattices[lattice.index()]
                .universes
                .iter()
                .flatten()
                .flatten()
                .unique()
                .map(|universe| Node::Universe(*universe))
                .collect(),
        }
    }

    fn reaches(&self, from: Node, target: Node) -> bool {
        reaches(from, target, |node| self.children(node))
    }

    /// Check that a universe can be placed in a lattice
    fn check_placement(&self, lattice: LatticeId, universe: UniverseId) -> Result<(), ConstructionError> {
        self.check_universe(universe)?;
        if self.reaches(Node::Universe(universe), Node::Lattice(lattice)) {
            Err(ConstructionError::Cycle(lattice.to_string()))
        } else {
            Ok(())
        }
    }

    fn assign(&mut self, lattice: LatticeId, indices: &[(usize, usize)], universe: UniverseId) {
        if let Some(grid) = self.lattices[lattice.index()].universes.as_mut() {
            for (i, j) in indices {
                grid[*i][*j] = universe;
            }
        }
    }

    fn check_surface(&self, surface: SurfaceId) -> Result<(), ConstructionError> {
        if surface.index() < self.surfaces.len() {
            Ok(())
        } else {
            Err(ConstructionError::UnknownSurface(surface))
        }
    }

    fn check_cell(&self, cell: CellId) -> Result<(), ConstructionError> {
        if cell.index() < self.cells.len() {
            Ok(())
        } else {
            Err(ConstructionError::UnknownCell(cell))
        }
    }

    fn check_universe(&self, universe: UniverseId) -> Result<(), ConstructionError> {
        if universe.index() < self.universes.len() {
            Ok(())
        } else {
            Err(ConstructionError::UnknownUniverse(universe))
        }
    }

    fn check_lattice(&self, lattice: LatticeId) -> Result<(), ConstructionError> {
        if lattice.index() < self.lattices.len() {
            Ok(())
        } else {
            Err(ConstructionError::UnknownLattice(lattice))
        }
    }

    fn check_node(&self, node: Node) -> Result<(), ConstructionError> {
        match node {
            Node::Universe(universe) => self.check_universe(universe),
            Node::Lattice(lattice) => self.check_lattice(lattice),
        }
    }

    fn cell_mut(&mut self, cell: CellId) -> Result<&mut CellDraft, ConstructionError> {
        self.cells
            .get_mut(cell.index())
            .ok_or(ConstructionError::UnknownCell(cell))
    }

    fn lattice_mut(&mut self, lattice: LatticeId) -> Result<&mut LatticeDraft, ConstructionError> {
        self.lattices
            .get_mut(lattice.index())
            .ok_or(ConstructionError::UnknownLattice(lattice))
    }
}
