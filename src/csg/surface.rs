//! Surfaces and half-spaces

use crate::types::{BoundingBox, ConstructionError, Point, SurfaceId};

/// Boundary condition applied where a particle reaches a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundaryType {
    /// Particles are reflected back into the geometry
    Reflective,
    /// Particles leak out of the geometry
    Vacuum,
    /// Internal surface between two cells
    #[default]
    Interface,
}

/// One of the two sides of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Halfspace {
    /// The side where the surface function is non-positive
    Negative,
    /// The side where the surface function is non-negative
    Positive,
}

impl Halfspace {
    /// The sign of the half-space
    pub fn sign(&self) -> f64 {
        match self {
            Halfspace::Negative => -1.0,
            Halfspace::Positive => 1.0,
        }
    }

    /// The other side
    pub fn opposite(&self) -> Halfspace {
        match self {
            Halfspace::Negative => Halfspace::Positive,
            Halfspace::Positive => Halfspace::Negative,
        }
    }
}

impl TryFrom<i32> for Halfspace {
    type Error = i32;
    fn try_from(sign: i32) -> Result<Self, i32> {
        match sign {
            -1 => Ok(Halfspace::Negative),
            1 => Ok(Halfspace::Positive),
            _ => Err(sign),
        }
    }
}

/// A half-space of a surface referenced by a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HalfspaceRef {
    /// The surface
    pub surface: SurfaceId,
    /// The side of the surface
    pub halfspace: Halfspace,
}

/// The shape of a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceKind {
    /// The line `x = x0`
    XPlane {
        /// Position along x
        x: f64,
    },
    /// The line `y = y0`
    YPlane {
        /// Position along y
        y: f64,
    },
    /// The line `a x + b y + c = 0`
    Plane {
        /// Coefficient of x
        a: f64,
        /// Coefficient of y
        b: f64,
        /// Constant term
        c: f64,
    },
    /// A circle
    Circle {
        /// Center
        center: Point,
        /// Radius
        radius: f64,
    },
}

/// A surface
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    name: String,
    kind: SurfaceKind,
    boundary: BoundaryType,
}

impl Surface {
    /// Create a surface, checking its parameters
    pub(crate) fn new(
        name: impl Into<String>,
        kind: SurfaceKind,
    ) -> Result<Self, ConstructionError> {
        match kind {
            SurfaceKind::XPlane { x: value } | SurfaceKind::YPlane { y: value } => {
                if !value.is_finite() {
                    return Err(ConstructionError::NonFiniteParameter);
                }
            }
            SurfaceKind::Plane { a, b, c } => {
                if !(a.is_finite() && b.is_finite() && c.is_finite()) {
                    return Err(ConstructionError::NonFiniteParameter);
                }
                if a == 0.0 && b == 0.0 {
                    return Err(ConstructionError::DegeneratePlane);
                }
            }
            SurfaceKind::Circle { center, radius } => {
                if !(center.x.is_finite() && center.y.is_finite()) {
                    return Err(ConstructionError::NonFiniteParameter);
                }
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(ConstructionError::InvalidRadius(radius));
                }
            }
        }
        Ok(Self {
            name: name.into(),
            kind,
            boundary: BoundaryType::default(),
        })
    }

    /// The name of the surface
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shape of the surface
    pub fn kind(&self) -> &SurfaceKind {
        &self.kind
    }

    /// The boundary condition
    pub fn boundary_type(&self) -> BoundaryType {
        self.boundary
    }

    pub(crate) fn set_boundary_type(&mut self, boundary: BoundaryType) {
        self.boundary = boundary;
    }

    /// Evaluate the implicit function of the surface at a point
    pub fn evaluate(&self, point: Point) -> f64 {
        match self.kind {
            SurfaceKind::XPlane { x } => point.x - x,
            SurfaceKind::YPlane { y } => point.y - y,
            SurfaceKind::Plane { a, b, c } => a * point.x + b * point.y + c,
            SurfaceKind::Circle { center, radius } => {
                point.distance_squared(center) - radius * radius
            }
        }
    }

    /// Is the point in the given half-space?
    ///
    /// Points on the surface belong to both half-spaces.
    pub fn contains(&self, point: Point, halfspace: Halfspace) -> bool {
        halfspace.sign() * self.evaluate(point) >= 0.0
    }

    /// Unsigned distance from a point to the surface
    pub fn distance(&self, point: Point) -> f64 {
        match self.kind {
            SurfaceKind::XPlane { x } => (point.x - x).abs(),
            SurfaceKind::YPlane { y } => (point.y - y).abs(),
            SurfaceKind::Plane { a, b, c } => (a * point.x + b * point.y + c).abs() / a.hypot(b),
            SurfaceKind::Circle { center, radius } => (point.distance(center) - radius).abs(),
        }
    }

    /// The circle's center and radius, if this surface is a circle
    pub fn as_circle(&self) -> Option<(Point, f64)> {
        match self.kind {
            SurfaceKind::Circle { center, radius } => Some((center, radius)),
            _ => None,
        }
    }

    /// Axis-aligned extent of one of the half-spaces
    pub fn halfspace_bounds(&self, halfspace: Halfspace) -> BoundingBox {
        let mut bounds = BoundingBox::infinite();
        match (self.kind, halfspace) {
            (SurfaceKind::XPlane { x }, Halfspace::Positive) => bounds.min_x = x,
            (SurfaceKind::XPlane { x }, Halfspace::Negative) => bounds.max_x = x,
            (SurfaceKind::YPlane { y }, Halfspace::Positive) => bounds.min_y = y,
            (SurfaceKind::YPlane { y }, Halfspace::Negative) => bounds.max_y = y,
            (SurfaceKind::Plane { a, b, c }, _) => {
                // Only planes normal to an axis bound a half-space
                let s = halfspace.sign();
                if b == 0.0 {
                    if s * a > 0.0 {
                        bounds.min_x = -c / a;
                    } else {
                        bounds.max_x = -c / a;
                    }
                } else if a == 0.0 {
                    if s * b > 0.0 {
                        bounds.min_y = -c / b;
                    } else {
                        bounds.max_y = -c / b;
                    }
                }
            }
            (SurfaceKind::Circle { center, radius }, Halfspace::Negative) => {
                bounds = BoundingBox::new(
                    center.x - radius,
                    center.x + radius,
                    center.y - radius,
                    center.y + radius,
                );
            }
            (SurfaceKind::Circle { .. }, Halfspace::Positive) => {}
        }
        bounds
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plane_halfspaces() {
        let left = Surface::new("left", SurfaceKind::XPlane { x: -2.0 }).unwrap();
        assert!(left.contains(Point::new(-1.0, 7.0), Halfspace::Positive));
        assert!(!left.contains(Point::new(-3.0, 7.0), Halfspace::Positive));
        assert!(left.contains(Point::new(-3.0, 7.0), Halfspace::Negative));

        // Points on the surface belong to both sides
        assert!(left.contains(Point::new(-2.0, 0.0), Halfspace::Positive));
        assert!(left.contains(Point::new(-2.0, 0.0), Halfspace::Negative));

        let top = Surface::new("top", SurfaceKind::YPlane { y: 2.0 }).unwrap();
        assert!(top.contains(Point::new(100.0, 1.5), Halfspace::Negative));
        assert!(!top.contains(Point::new(100.0, 2.5), Halfspace::Negative));
    }

    #[test]
    fn test_circle_halfspaces() {
        let pin = Surface::new(
            "pin",
            SurfaceKind::Circle {
                center: Point::new(1.0, 1.0),
                radius: 0.4,
            },
        )
        .unwrap();
        assert!(pin.contains(Point::new(1.3, 1.0), Halfspace::Negative));
        assert!(!pin.contains(Point::new(1.3, 1.3), Halfspace::Negative));
        assert!(pin.contains(Point::new(1.3, 1.3), Halfspace::Positive));
        assert_relative_eq!(pin.evaluate(Point::new(1.0, 1.0)), -0.16, epsilon = 1e-14);
        assert_relative_eq!(pin.distance(Point::new(2.0, 1.0)), 0.6, epsilon = 1e-14);
    }

    #[test]
    fn test_general_plane() {
        let diagonal = Surface::new(
            "diagonal",
            SurfaceKind::Plane {
                a: 1.0,
                b: -1.0,
                c: 0.0,
            },
        )
        .unwrap();
        assert!(diagonal.contains(Point::new(2.0, 1.0), Halfspace::Positive));
        assert!(diagonal.contains(Point::new(1.0, 2.0), Halfspace::Negative));
        assert_relative_eq!(
            diagonal.distance(Point::new(1.0, 0.0)),
            std::f64::consts::FRAC_1_SQRT_2,
            epsilon = 1e-14
        );
        assert!(!diagonal.halfspace_bounds(Halfspace::Positive).is_bounded());
        assert_eq!(diagonal.halfspace_bounds(Halfspace::Positive), BoundingBox::infinite());

        let vertical = Surface::new(
            "vertical",
            SurfaceKind::Plane {
                a: -2.0,
                b: 0.0,
                c: 4.0,
            },
        )
        .unwrap();
        // -2x + 4 >= 0 is x <= 2
        assert_eq!(vertical.halfspace_bounds(Halfspace::Positive).max_x, 2.0);
        assert_eq!(vertical.halfspace_bounds(Halfspace::Negative).min_x, 2.0);
    }

    #[test]
    fn test_halfspace_bounds() {
        let right = Surface::new("right", SurfaceKind::XPlane { x: 2.0 }).unwrap();
        assert_eq!(right.halfspace_bounds(Halfspace::Negative).max_x, 2.0);
        assert_eq!(right.halfspace_bounds(Halfspace::Negative).min_x, f64::NEG_INFINITY);
        let pin = Surface::new(
            "pin",
            SurfaceKind::Circle {
                center: Point::origin(),
                radius: 0.5,
            },
        )
        .unwrap();
        assert_eq!(
            pin.halfspace_bounds(Halfspace::Negative),
            BoundingBox::new(-0.5, 0.5, -0.5, 0.5)
        );
        assert_eq!(pin.halfspace_bounds(Halfspace::Positive), BoundingBox::infinite());
    }

    #[test]
    fn test_invalid_parameters() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Surface::new(
                    "bad",
                    SurfaceKind::Circle {
                        center: Point::origin(),
                        radius
                    }
                ),
                Err(ConstructionError::InvalidRadius(_))
            ));
        }
        assert_eq!(
            Surface::new("bad", SurfaceKind::XPlane { x: f64::NAN }),
            Err(ConstructionError::NonFiniteParameter)
        );
        assert_eq!(
            Surface::new(
                "bad",
                SurfaceKind::Plane {
                    a: 0.0,
                    b: 0.0,
                    c: 1.0
                }
            ),
            Err(ConstructionError::DegeneratePlane)
        );
    }

    #[test]
    fn test_halfspace_from_sign() {
        assert_eq!(Halfspace::try_from(-1), Ok(Halfspace::Negative));
        assert_eq!(Halfspace::try_from(1), Ok(Halfspace::Positive));
        assert_eq!(Halfspace::try_from(0), Err(0));
        assert_eq!(Halfspace::Negative.opposite(), Halfspace::Positive);
    }
}
