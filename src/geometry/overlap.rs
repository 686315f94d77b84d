//! Detection of overlapping cells
//!
//! Point location accepts the first cell of a universe containing a point, so
//! overlapping cells silently shadow each other. Sampling the geometry at random points
//! and testing every cell at every level finds such modelling errors.

use crate::csg::Fill;
use crate::geometry::Geometry;
use crate::types::{CellId, Point, UniverseId};
use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::collections::HashSet;

/// Several cells of one universe containing the same point
#[derive(Debug, Clone, PartialEq)]
pub struct Overlap {
    /// The universe
    pub universe: UniverseId,
    /// Every cell of the universe containing the point, in search order
    pub cells: Vec<CellId>,
    /// The point, in the universe's frame
    pub point: Point,
}

impl Geometry {
    /// Overlaps met while resolving a point from the root
    ///
    /// The search follows the first matching cell at each level, as point location does.
    pub fn overlaps_at(&self, point: Point) -> Vec<Overlap> {
        let mut overlaps = vec![];
        let mut universe = self.root;
        let mut point = point;
        loop {
            let matches: Vec<CellId> = self.universes[universe.index()]
                .cells()
                .iter()
                .copied()
                .filter(|id| self.cells[id.index()].contains(&self.surfaces, point))
                .collect();
            let Some(first) = matches.first().copied() else {
                return overlaps;
            };
            if matches.len() > 1 {
                overlaps.push(Overlap {
                    universe,
                    cells: matches,
                    point,
                });
            }
            universe = match self.cells[first.index()].fill() {
                Fill::Material(_) => return overlaps,
                Fill::Universe(inner) => *inner,
                Fill::Lattice(lattice_id) => {
                    let lattice = &self.lattices[lattice_id.index()];
                    let layout = lattice.layout();
                    let Ok((i, j)) = layout.lattice_index(*lattice_id, point) else {
                        return overlaps;
                    };
                    point = layout.local_point(i, j, point);
                    lattice.universes()[i][j]
                }
            };
        }
    }

    /// Sample the bounding box of the geometry for overlapping cells
    ///
    /// Each distinct overlap (universe and set of cells) is reported once, with the
    /// first sample point that found it, and logged as a warning. Nothing is sampled if
    /// the bounding box is empty or unbounded.
    pub fn check_overlaps(&self) -> Vec<Overlap> {
        let bounds = self.bounding_box();
        if !bounds.is_bounded() || bounds.is_empty() {
            warn!("Skipping overlap check: the root universe is empty or unbounded");
            return vec![];
        }
        let mut rng = StdRng::seed_from_u64(self.options.seed());
        let points: Vec<Point> = (0..self.options.overlap_samples())
            .map(|_| {
                Point::new(
                    bounds.min_x + rng.gen::<f64>() * bounds.width_x(),
                    bounds.min_y + rng.gen::<f64>() * bounds.width_y(),
                )
            })
            .collect();

        let found: Vec<Vec<Overlap>> = points
            .par_iter()
            .map(|point| self.overlaps_at(*point))
            .collect();

        let mut seen = HashSet::new();
        let overlaps: Vec<Overlap> = found
            .into_iter()
            .flatten()
            .filter(|overlap| seen.insert((overlap.universe, overlap.cells.clone())))
            .collect();
        for overlap in &overlaps {
            warn!(
                "Cells {:?} of {} overlap at {}",
                overlap.cells, overlap.universe, overlap.point
            );
        }
        overlaps
    }
}
