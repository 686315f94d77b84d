//! Lattices
//!
//! A lattice is centered on the origin of the cell it fills, shifted by an optional
//! offset. Index `i` runs along x and `j` along y, and both start at the edge with the
//! largest coordinate: `i = floor((max_x - x) / width_x)`. Every placement computed from
//! a physical coordinate relies on this convention.

use crate::types::{BoundingBox, ContainmentError, LatticeId, Point, UniverseId};
use itertools::iproduct;
use std::fmt;

/// Quotients closer than this to an integer are treated as lying on a grid line
const ON_LATTICE_CELL_THRESH: f64 = 1e-9;

/// The extent and pitch of a lattice, without its universes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeLayout {
    num_x: usize,
    num_y: usize,
    width_x: f64,
    width_y: f64,
    offset: Point,
}

impl LatticeLayout {
    /// Create a layout
    pub(crate) fn new(
        num_x: usize,
        num_y: usize,
        width_x: f64,
        width_y: f64,
        offset: Point,
    ) -> Self {
        Self {
            num_x,
            num_y,
            width_x,
            width_y,
            offset,
        }
    }

    /// Number of lattice cells along x
    pub fn num_x(&self) -> usize {
        self.num_x
    }

    /// Number of lattice cells along y
    pub fn num_y(&self) -> usize {
        self.num_y
    }

    /// Width of a lattice cell along x
    pub fn width_x(&self) -> f64 {
        self.width_x
    }

    /// Width of a lattice cell along y
    pub fn width_y(&self) -> f64 {
        self.width_y
    }

    /// Offset of the lattice center from the origin of its containing cell
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// The extent of the lattice
    pub fn bounds(&self) -> BoundingBox {
        let half_x = 0.5 * self.num_x as f64 * self.width_x;
        let half_y = 0.5 * self.num_y as f64 * self.width_y;
        BoundingBox::new(
            self.offset.x - half_x,
            self.offset.x + half_x,
            self.offset.y - half_y,
            self.offset.y + half_y,
        )
    }

    /// Grid coordinates of a point, before flooring
    fn quotients(&self, point: Point) -> (f64, f64) {
        let bounds = self.bounds();
        (
            (bounds.max_x - point.x) / self.width_x,
            (bounds.max_y - point.y) / self.width_y,
        )
    }

    /// Index of the lattice cell containing a point
    ///
    /// A point on the closed minimum edge belongs to the last cell. Points outside the
    /// lattice are an error, never clamped.
    pub fn lattice_index(
        &self,
        id: LatticeId,
        point: Point,
    ) -> Result<(usize, usize), ContainmentError> {
        let (qx, qy) = self.quotients(point);
        let outside = || ContainmentError::OutsideLattice { lattice: id, point };
        let i = grid_index(qx, self.num_x).ok_or_else(outside)?;
        let j = grid_index(qy, self.num_y).ok_or_else(outside)?;
        Ok((i, j))
    }

    /// Flat index of the lattice cell containing a point, `i * num_y + j`
    pub fn lattice_cell(&self, id: LatticeId, point: Point) -> Result<usize, ContainmentError> {
        let (i, j) = self.lattice_index(id, point)?;
        Ok(i * self.num_y + j)
    }

    /// Center of a lattice cell
    pub fn cell_center(&self, i: usize, j: usize) -> Point {
        let bounds = self.bounds();
        Point::new(
            bounds.max_x - (i as f64 + 0.5) * self.width_x,
            bounds.max_y - (j as f64 + 0.5) * self.width_y,
        )
    }

    /// Translate a point into the frame of a lattice cell
    pub fn local_point(&self, i: usize, j: usize, point: Point) -> Point {
        point - self.cell_center(i, j)
    }

    /// Indices of all lattice cells covered by the rectangle spanned by two corners
    ///
    /// The corners may be given in any order. Because indices increase as coordinates
    /// decrease, the index range of each axis is normalized before iterating. A
    /// degenerate rectangle covers the single lattice cell containing it.
    pub fn region_indices(
        &self,
        id: LatticeId,
        corner_a: Point,
        corner_b: Point,
    ) -> Result<Vec<(usize, usize)>, ContainmentError> {
        self.lattice_index(id, corner_a)?;
        self.lattice_index(id, corner_b)?;
        let (ax, ay) = self.quotients(corner_a);
        let (bx, by) = self.quotients(corner_b);
        let (i_start, i_end) = index_range(ax, bx, self.num_x);
        let (j_start, j_end) = index_range(ay, by, self.num_y);
        Ok(iproduct!(i_start..i_end, j_start..j_end).collect())
    }
}

fn snap(quotient: f64) -> f64 {
    let nearest = quotient.round();
    if (quotient - nearest).abs() < ON_LATTICE_CELL_THRESH {
        nearest
    } else {
        quotient
    }
}

fn grid_index(quotient: f64, count: usize) -> Option<usize> {
    if !quotient.is_finite() || quotient < -ON_LATTICE_CELL_THRESH {
        return None;
    }
    let index = quotient.max(0.0).floor() as usize;
    if index < count {
        Some(index)
    } else if index == count && snap(quotient) == count as f64 {
        Some(count - 1)
    } else {
        None
    }
}

/// Half-open index range between two grid coordinates, at least one cell wide
fn index_range(a: f64, b: f64, count: usize) -> (usize, usize) {
    let (a, b) = (snap(a), snap(b));
    let (low, high) = (a.min(b), a.max(b));
    let start = (low.max(0.0).floor() as usize).min(count - 1);
    let end = (high.ceil() as usize).clamp(start + 1, count);
    (start, end)
}

/// A regular grid of universes
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    name: String,
    layout: LatticeLayout,
    universes: Vec<Vec<UniverseId>>,
}

impl Lattice {
    pub(crate) fn new(
        name: impl Into<String>,
        layout: LatticeLayout,
        universes: Vec<Vec<UniverseId>>,
    ) -> Self {
        Self {
            name: name.into(),
            layout,
            universes,
        }
    }

    /// The name of the lattice
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The extent and pitch of the lattice
    pub fn layout(&self) -> &LatticeLayout {
        &self.layout
    }

    /// The universe at a lattice position
    pub fn universe(&self, i: usize, j: usize) -> Option<UniverseId> {
        self.universes.get(i).and_then(|column| column.get(j)).copied()
    }

    /// All universes, indexed `[i][j]`
    pub fn universes(&self) -> &[Vec<UniverseId>] {
        &self.universes
    }

    /// Iterate over `((i, j), universe)` in `i`-major order
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), UniverseId)> + '_ {
        self.universes.iter().enumerate().flat_map(|(i, column)| {
            column
                .iter()
                .enumerate()
                .map(move |(j, universe)| ((i, j), *universe))
        })
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lattice \"{}\" of {}x{} cells with pitch {}x{} centered at {}",
            self.name,
            self.layout.num_x,
            self.layout.num_y,
            self.layout.width_x,
            self.layout.width_y,
            self.layout.offset
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    const ID: LatticeId = LatticeId(0);

    fn subcritical_layout() -> LatticeLayout {
        LatticeLayout::new(100, 100, 0.1, 0.1, Point::origin())
    }

    #[test]
    fn test_bounds() {
        let layout = LatticeLayout::new(2, 4, 2.0, 0.5, Point::new(1.0, 0.0));
        let bounds = layout.bounds();
        assert_relative_eq!(bounds.min_x, -1.0);
        assert_relative_eq!(bounds.max_x, 3.0);
        assert_relative_eq!(bounds.min_y, -1.0);
        assert_relative_eq!(bounds.max_y, 1.0);
    }

    #[test]
    fn test_index_starts_at_max_edge() {
        let layout = LatticeLayout::new(2, 2, 1.0, 1.0, Point::origin());
        assert_eq!(layout.lattice_index(ID, Point::new(0.5, 0.5)), Ok((0, 0)));
        assert_eq!(layout.lattice_index(ID, Point::new(-0.5, 0.5)), Ok((1, 0)));
        assert_eq!(layout.lattice_index(ID, Point::new(0.5, -0.5)), Ok((0, 1)));
        assert_eq!(layout.lattice_index(ID, Point::new(-0.5, -0.5)), Ok((1, 1)));
        assert_eq!(layout.lattice_cell(ID, Point::new(-0.5, 0.5)), Ok(2));
    }

    #[test]
    fn test_index_edges() {
        let layout = LatticeLayout::new(2, 2, 1.0, 1.0, Point::origin());
        assert_eq!(layout.lattice_index(ID, Point::new(1.0, 1.0)), Ok((0, 0)));
        assert_eq!(layout.lattice_index(ID, Point::new(-1.0, -1.0)), Ok((1, 1)));
        assert_eq!(layout.lattice_index(ID, Point::new(0.0, 0.0)), Ok((1, 1)));
        for p in [
            Point::new(1.01, 0.0),
            Point::new(-1.01, 0.0),
            Point::new(0.0, 1.5),
            Point::new(0.0, -3.0),
            Point::new(f64::NAN, 0.0),
        ] {
            assert!(matches!(
                layout.lattice_index(ID, p),
                Err(ContainmentError::OutsideLattice { .. })
            ));
        }
    }

    #[test]
    fn test_center_round_trip() {
        for layout in [
            subcritical_layout(),
            LatticeLayout::new(3, 5, 1.26, 0.7, Point::new(-0.3, 2.0)),
        ] {
            for (i, j) in iproduct!(0..layout.num_x(), 0..layout.num_y()) {
                let center = layout.cell_center(i, j);
                assert_eq!(layout.lattice_index(ID, center), Ok((i, j)));
                let local = layout.local_point(i, j, center);
                assert_relative_eq!(local.x, 0.0, epsilon = 1e-12);
                assert_relative_eq!(local.y, 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_source_placement_index() {
        let layout = subcritical_layout();
        assert_eq!(layout.lattice_index(ID, Point::new(2.45, 2.45)), Ok((25, 25)));
        assert_eq!(layout.lattice_index(ID, Point::new(-4.95, 4.95)), Ok((99, 0)));
    }

    #[test]
    fn test_region_indices() {
        let layout = subcritical_layout();
        let expected: Vec<(usize, usize)> = iproduct!(45..55, 45..55).collect();
        let indices = layout
            .region_indices(ID, Point::new(-0.5, -0.5), Point::new(0.5, 0.5))
            .unwrap();
        assert_eq!(indices, expected);

        // Corner order does not matter
        let reversed = layout
            .region_indices(ID, Point::new(0.5, 0.5), Point::new(-0.5, -0.5))
            .unwrap();
        assert_eq!(reversed, expected);
        let mixed = layout
            .region_indices(ID, Point::new(0.5, -0.5), Point::new(-0.5, 0.5))
            .unwrap();
        assert_eq!(mixed, expected);
    }

    #[test]
    fn test_region_partial_cells() {
        let layout = LatticeLayout::new(4, 4, 1.0, 1.0, Point::origin());
        let indices = layout
            .region_indices(ID, Point::new(-0.5, 0.2), Point::new(0.5, 0.4))
            .unwrap();
        assert_eq!(indices, vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn test_degenerate_region() {
        let layout = subcritical_layout();
        let point = Point::new(2.45, 2.45);
        assert_eq!(layout.region_indices(ID, point, point), Ok(vec![(25, 25)]));
        let corner = Point::new(-5.0, -5.0);
        assert_eq!(layout.region_indices(ID, corner, corner), Ok(vec![(99, 99)]));
    }

    #[test]
    fn test_region_outside() {
        let layout = subcritical_layout();
        assert_eq!(
            layout.region_indices(ID, Point::new(4.0, 4.0), Point::new(6.0, 4.5)),
            Err(ContainmentError::OutsideLattice {
                lattice: ID,
                point: Point::new(6.0, 4.5)
            })
        );
    }

    #[test]
    fn test_region_corner_on_rounded_edge() {
        let layout = subcritical_layout();
        let corner = Point::new(5.0 + 1e-14, 0.0);
        assert_eq!(layout.lattice_index(ID, corner), Ok((0, 50)));
        let indices = layout
            .region_indices(ID, corner, Point::new(4.0, 1.0))
            .unwrap();
        let expected: Vec<(usize, usize)> = iproduct!(0..10, 40..50).collect();
        assert_eq!(indices, expected);
        // Further out is still rejected
        assert!(layout
            .region_indices(ID, Point::new(5.0 + 1e-6, 0.0), Point::new(4.0, 1.0))
            .is_err());
    }

    #[test]
    fn test_lattice_iteration() {
        let a = UniverseId(0);
        let b = UniverseId(1);
        let lattice = Lattice::new(
            "2x2",
            LatticeLayout::new(2, 2, 1.0, 1.0, Point::origin()),
            vec![vec![a, b], vec![a, a]],
        );
        assert_eq!(lattice.universe(0, 1), Some(b));
        assert_eq!(lattice.universe(2, 0), None);
        let entries: Vec<_> = lattice.iter().collect();
        assert_eq!(
            entries,
            vec![((0, 0), a), ((0, 1), b), ((1, 0), a), ((1, 1), a)]
        );
    }

    #[test]
    fn test_display() {
        let lattice = Lattice::new(
            "assembly",
            LatticeLayout::new(2, 3, 1.26, 0.5, Point::new(0.5, 0.0)),
            vec![vec![UniverseId(0); 3]; 2],
        );
        assert_eq!(
            lattice.to_string(),
            "lattice \"assembly\" of 2x3 cells with pitch 1.26x0.5 centered at (0.5, 0)"
        );
    }
}
