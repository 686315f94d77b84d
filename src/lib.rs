//! Constructive solid geometry for method of characteristics reactor simulations
//!
//! Geometries are built from surfaces, cells, universes and lattices with a
//! [geometry::GeometryBuilder], then queried to find the cell and flat source region
//! containing a point.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod csg;
pub mod geometry;
pub mod material;
pub mod options;
pub mod shapes;
pub mod traits;
pub mod types;
