//! Cells

use crate::csg::surface::{Halfspace, HalfspaceRef, Surface};
use crate::material::Material;
use crate::types::{BoundingBox, CellId, ContainmentError, LatticeId, Point, UniverseId};
use std::f64::consts::TAU;
use std::sync::Arc;

/// The content of a cell
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    /// A homogeneous material
    Material(Arc<Material>),
    /// A universe, sharing the coordinate frame of the cell
    Universe(UniverseId),
    /// A lattice, centered on the origin of the cell's frame
    Lattice(LatticeId),
}

impl From<Arc<Material>> for Fill {
    fn from(material: Arc<Material>) -> Self {
        Fill::Material(material)
    }
}

impl From<UniverseId> for Fill {
    fn from(universe: UniverseId) -> Self {
        Fill::Universe(universe)
    }
}

impl From<LatticeId> for Fill {
    fn from(lattice: LatticeId) -> Self {
        Fill::Lattice(lattice)
    }
}

/// A cell: the intersection of a set of half-spaces, with a fill
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    name: String,
    halfspaces: Vec<HalfspaceRef>,
    num_rings: usize,
    num_sectors: usize,
    fill: Fill,
}

/// Circle used to split a cell into rings and sectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RingBounds {
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl Cell {
    /// Create a cell
    pub(crate) fn new(
        name: impl Into<String>,
        halfspaces: Vec<HalfspaceRef>,
        num_rings: usize,
        num_sectors: usize,
        fill: Fill,
    ) -> Self {
        Self {
            name: name.into(),
            halfspaces,
            num_rings,
            num_sectors,
            fill,
        }
    }

    /// The name of the cell
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The half-spaces whose intersection is the cell
    pub fn halfspaces(&self) -> &[HalfspaceRef] {
        &self.halfspaces
    }

    /// Number of equal-area rings
    pub fn num_rings(&self) -> usize {
        self.num_rings
    }

    /// Number of equal-angle sectors
    pub fn num_sectors(&self) -> usize {
        self.num_sectors
    }

    /// The fill
    pub fn fill(&self) -> &Fill {
        &self.fill
    }

    /// The number of subregions the cell is split into, 0 if it is not subdivided
    pub fn num_subregions(&self) -> usize {
        match (self.num_rings, self.num_sectors) {
            (0, s) => s,
            (r, 0) => r,
            (r, s) => r * s,
        }
    }

    /// Is the point inside every half-space of the cell?
    pub(crate) fn contains(&self, surfaces: &[Surface], point: Point) -> bool {
        self.halfspaces
            .iter()
            .all(|h| surfaces[h.surface.index()].contains(point, h.halfspace))
    }

    pub(crate) fn bounding_box(&self, surfaces: &[Surface]) -> BoundingBox {
        halfspaces_bounding_box(surfaces, &self.halfspaces)
    }

    /// The annulus that rings subdivide
    ///
    /// The outer circle is the smallest circle bounding the cell from the negative side;
    /// the inner circle is the largest concentric circle bounding it from the positive side.
    pub(crate) fn ring_bounds(&self, surfaces: &[Surface]) -> Option<RingBounds> {
        let (center, outer_radius) = self
            .circles(surfaces, Halfspace::Negative)
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        let inner_radius = self
            .circles(surfaces, Halfspace::Positive)
            .filter(|(c, r)| *c == center && *r < outer_radius)
            .map(|(_, r)| r)
            .fold(0.0, f64::max);
        Some(RingBounds {
            center,
            inner_radius,
            outer_radius,
        })
    }

    fn circles<'a>(
        &'a self,
        surfaces: &'a [Surface],
        halfspace: Halfspace,
    ) -> impl Iterator<Item = (Point, f64)> + 'a {
        self.halfspaces
            .iter()
            .filter(move |h| h.halfspace == halfspace)
            .filter_map(|h| surfaces[h.surface.index()].as_circle())
    }

    fn sector_center(&self, surfaces: &[Surface]) -> Point {
        if let Some(bounds) = self.ring_bounds(surfaces) {
            bounds.center
        } else if let Some((center, _)) = self.circles(surfaces, Halfspace::Positive).next() {
            center
        } else {
            Point::origin()
        }
    }

    /// Index of the ring and sector subregion containing a point
    pub(crate) fn subregion_index(
        &self,
        id: CellId,
        surfaces: &[Surface],
        point: Point,
    ) -> Result<usize, ContainmentError> {
        if !self.contains(surfaces, point) {
            return Err(ContainmentError::NotInCell { cell: id, point });
        }
        if self.num_subregions() == 0 {
            return Err(ContainmentError::NoSubdivision(id));
        }

        let ring = if self.num_rings > 0 {
            let bounds = self
                .ring_bounds(surfaces)
                .ok_or(ContainmentError::NoSubdivision(id))?;
            let r_in2 = bounds.inner_radius * bounds.inner_radius;
            let r_out2 = bounds.outer_radius * bounds.outer_radius;
            let fraction = (point.distance_squared(bounds.center) - r_in2) / (r_out2 - r_in2);
            clamp_index(fraction * self.num_rings as f64, self.num_rings)
        } else {
            0
        };

        let sector = if self.num_sectors > 0 {
            let center = self.sector_center(surfaces);
            let theta = (point.y - center.y).atan2(point.x - center.x).rem_euclid(TAU);
            clamp_index(theta / TAU * self.num_sectors as f64, self.num_sectors)
        } else {
            0
        };

        Ok(ring * self.num_sectors.max(1) + sector)
    }
}

fn clamp_index(value: f64, count: usize) -> usize {
    if value <= 0.0 {
        0
    } else {
        (value.floor() as usize).min(count - 1)
    }
}

/// Intersection of the extents of a set of half-spaces
pub(crate) fn halfspaces_bounding_box(
    surfaces: &[Surface],
    halfspaces: &[HalfspaceRef],
) -> BoundingBox {
    halfspaces
        .iter()
        .fold(BoundingBox::infinite(), |bounds, h| {
            bounds.intersection(&surfaces[h.surface.index()].halfspace_bounds(h.halfspace))
        })
}
