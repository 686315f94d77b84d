//! Definition of sample geometries.

use crate::csg::{BoundaryType, Halfspace};
use crate::geometry::{Geometry, GeometryBuilder};
use crate::material::{Material, MaterialLibrary};
use crate::options::GeometryOptions;
use crate::types::{ConstructionError, Point, SurfaceId, UniverseId};
use log::info;

/// The materials used by the sample geometries
///
/// Only the names of the C5G7 benchmark materials are provided; cross sections are
/// left to the solver.
pub fn c5g7_materials() -> MaterialLibrary {
    [
        "UO2",
        "MOX-4.3%",
        "MOX-7%",
        "MOX-8.7%",
        "Fission Chamber",
        "Guide Tube",
        "Water",
    ]
    .into_iter()
    .map(Material::new)
    .collect()
}

/// Add a square box `[-half_width, half_width]^2` to the builder and return its four
/// surfaces as (left, right, bottom, top)
fn add_box(
    builder: &mut GeometryBuilder,
    half_width: f64,
    boundary: BoundaryType,
) -> Result<[SurfaceId; 4], ConstructionError> {
    let surfaces = [
        builder.create_x_plane("left", -half_width)?,
        builder.create_x_plane("right", half_width)?,
        builder.create_y_plane("bottom", -half_width)?,
        builder.create_y_plane("top", half_width)?,
    ];
    for surface in surfaces {
        builder.set_boundary_type(surface, boundary)?;
    }
    Ok(surfaces)
}

/// A pin cell universe: a fuel disc split into 3 rings and 8 sectors inside moderator
/// split into 8 sectors
fn add_pin(
    builder: &mut GeometryBuilder,
    materials: &MaterialLibrary,
    name: &str,
    radius: f64,
) -> Result<UniverseId, ConstructionError> {
    let circle = builder.create_circle(format!("{name} pin"), 0.0, 0.0, radius)?;

    let fuel = builder.create_cell(format!("{name} pin fuel"));
    builder.set_num_rings(fuel, 3)?;
    builder.set_num_sectors(fuel, 8)?;
    builder.set_fill(fuel, materials.get("UO2")?)?;
    builder.add_surface(fuel, Halfspace::Negative, circle)?;

    let moderator = builder.create_cell(format!("{name} pin moderator"));
    builder.set_num_sectors(moderator, 8)?;
    builder.set_fill(moderator, materials.get("Water")?)?;
    builder.add_surface(moderator, Halfspace::Positive, circle)?;

    let pin = builder.create_universe(format!("{name} pin cell"));
    builder.add_cell(pin, fuel)?;
    builder.add_cell(pin, moderator)?;
    Ok(pin)
}

/// A 2x2 core of 2x2 pin lattices
///
/// Each assembly holds a large pin twice, a medium pin and a small pin. The core fills
/// the box `[-2, 2]^2`, which has reflective boundaries.
pub fn nested_lattice(materials: &MaterialLibrary) -> Result<Geometry, ConstructionError> {
    let mut builder = GeometryBuilder::new();
    let [left, right, bottom, top] = add_box(&mut builder, 2.0, BoundaryType::Reflective)?;

    let large = add_pin(&mut builder, materials, "large", 0.4)?;
    let medium = add_pin(&mut builder, materials, "medium", 0.3)?;
    let small = add_pin(&mut builder, materials, "small", 0.2)?;

    let lattice = builder.create_lattice("2x2 lattice");
    builder.set_width(lattice, 1.0, 1.0)?;
    builder.set_universes(lattice, vec![vec![large, medium], vec![large, small]])?;
    let lattice_cell = builder.create_cell("lattice cell");
    builder.set_fill(lattice_cell, lattice)?;
    let assembly = builder.create_universe("2x2 lattice");
    builder.add_cell(assembly, lattice_cell)?;

    let core = builder.create_lattice("2x2 core");
    builder.set_width(core, 2.0, 2.0)?;
    builder.set_universes(core, vec![vec![assembly; 2]; 2])?;

    let root_cell = builder.create_cell("root cell");
    builder.add_surface(root_cell, Halfspace::Positive, left)?;
    builder.add_surface(root_cell, Halfspace::Negative, right)?;
    builder.add_surface(root_cell, Halfspace::Positive, bottom)?;
    builder.add_surface(root_cell, Halfspace::Negative, top)?;
    builder.set_fill(root_cell, core)?;
    let root = builder.create_universe("root universe");
    builder.add_cell(root, root_cell)?;

    builder.create_geometry(root, GeometryOptions::default())
}

/// A 100x100 lattice of water with a fuel block and a source
///
/// The lattice fills the box `[-5, 5]^2`, which has vacuum boundaries, and is sized from
/// the bounding box of the root universe. The source occupies the lattice cell containing
/// `(2.5, 2.5)` and fuel covers `[-0.5, 0.5]^2`.
pub fn subcritical(materials: &MaterialLibrary) -> Result<Geometry, ConstructionError> {
    let num_x = 100;
    let num_y = 100;

    let mut builder = GeometryBuilder::new();
    let [left, right, bottom, top] = add_box(&mut builder, 5.0, BoundaryType::Vacuum)?;

    let mut homogeneous = |name: &str, material: &str| -> Result<UniverseId, ConstructionError> {
        let cell = builder.create_cell(name);
        builder.set_fill(cell, materials.get(material)?)?;
        let universe = builder.create_universe(name);
        builder.add_cell(universe, cell)?;
        Ok(universe)
    };
    let water = homogeneous("water", "Water")?;
    let fuel = homogeneous("fuel", "UO2")?;
    let source = homogeneous("source", "Water")?;

    let root_cell = builder.create_cell("root cell");
    builder.add_surface(root_cell, Halfspace::Positive, left)?;
    builder.add_surface(root_cell, Halfspace::Negative, right)?;
    builder.add_surface(root_cell, Halfspace::Positive, bottom)?;
    builder.add_surface(root_cell, Halfspace::Negative, top)?;
    let root = builder.create_universe("root universe");
    builder.add_cell(root, root_cell)?;

    let bounds = builder.universe_bounding_box(root)?;
    let lattice = builder.create_lattice(format!("{num_x}x{num_y} lattice"));
    builder.set_width(
        lattice,
        bounds.width_x() / num_x as f64,
        bounds.width_y() / num_y as f64,
    )?;
    builder.set_universes(lattice, vec![vec![water; num_y]; num_x])?;
    builder.place_point(lattice, Point::new(2.5, 2.5), source)?;
    builder.place_region(lattice, Point::new(-0.5, -0.5), Point::new(0.5, 0.5), fuel)?;
    info!("Created a {num_x}x{num_y} lattice");
    builder.set_fill(root_cell, lattice)?;

    builder.create_geometry(root, GeometryOptions::default())
}
