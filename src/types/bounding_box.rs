//! Axis-aligned bounding boxes

use crate::types::Point;

/// An axis-aligned box in the xy-plane
///
/// Unbounded sides are stored as infinities, so the box of a half-plane such as
/// `x >= 1` is `[1, inf) x (-inf, inf)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum x coordinate
    pub min_x: f64,
    /// Maximum x coordinate
    pub max_x: f64,
    /// Minimum y coordinate
    pub min_y: f64,
    /// Maximum y coordinate
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a bounding box
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// The whole plane
    pub fn infinite() -> Self {
        Self::new(
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
        )
    }

    /// The empty box, the identity of [BoundingBox::union]
    pub fn empty() -> Self {
        Self::new(
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        )
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.min_x.min(other.min_x),
            self.max_x.max(other.max_x),
            self.min_y.min(other.min_y),
            self.max_y.max(other.max_y),
        )
    }

    /// Intersection of both boxes
    pub fn intersection(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.min_x.max(other.min_x),
            self.max_x.min(other.max_x),
            self.min_y.max(other.min_y),
            self.max_y.min(other.max_y),
        )
    }

    /// Is the box empty?
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Are all four sides finite?
    pub fn is_bounded(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
    }

    /// Does the closed box contain a point?
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Width along x
    pub fn width_x(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Width along y
    pub fn width_y(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center of the box
    pub fn center(&self) -> Point {
        Point::new(
            0.5 * (self.min_x + self.max_x),
            0.5 * (self.min_y + self.max_y),
        )
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::infinite()
    }
}
