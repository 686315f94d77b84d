use approx::assert_relative_eq;
use moc_geometry::csg::{BoundaryType, Fill, Halfspace};
use moc_geometry::geometry::{BoundaryTypes, Geometry, GeometryBuilder, Level};
use moc_geometry::material::Material;
use moc_geometry::options::GeometryOptions;
use moc_geometry::shapes::{c5g7_materials, nested_lattice, subcritical};
use moc_geometry::traits::{Locate, Region};
use moc_geometry::types::{ConstructionError, ContainmentError, Point};
use paste::paste;

/// A regular grid of points strictly inside the bounding box of a geometry
fn sample_points(geometry: &Geometry, n: usize) -> Vec<Point> {
    let bounds = geometry.bounding_box();
    let dx = bounds.width_x() / n as f64;
    let dy = bounds.width_y() / n as f64;
    (0..n)
        .flat_map(|i| {
            (0..n).map(move |j| {
                Point::new(
                    bounds.min_x + (i as f64 + 0.37) * dx,
                    bounds.min_y + (j as f64 + 0.61) * dy,
                )
            })
        })
        .collect()
}

macro_rules! sample_tests {
    ($(($shape:ident, $num_fsrs:expr, $half_width:expr, $boundary:ident)),+) => {
        $(
            paste! {
                #[test]
                fn [<test_ $shape _bounding_box>]() {
                    let geometry = $shape(&c5g7_materials()).unwrap();
                    let bounds = geometry.bounding_box();
                    assert_relative_eq!(bounds.min_x, -$half_width);
                    assert_relative_eq!(bounds.max_x, $half_width);
                    assert_relative_eq!(bounds.min_y, -$half_width);
                    assert_relative_eq!(bounds.max_y, $half_width);
                }

                #[test]
                fn [<test_ $shape _boundary_types>]() {
                    let geometry = $shape(&c5g7_materials()).unwrap();
                    assert_eq!(
                        geometry.boundary_types(),
                        BoundaryTypes {
                            min_x: BoundaryType::$boundary,
                            max_x: BoundaryType::$boundary,
                            min_y: BoundaryType::$boundary,
                            max_y: BoundaryType::$boundary,
                        }
                    );
                    assert_eq!(
                        geometry.boundary_type_at(Point::new($half_width, 0.3)),
                        Some(BoundaryType::$boundary)
                    );
                    assert_eq!(geometry.boundary_type_at(Point::new(0.3, 0.3)), None);
                }

                #[test]
                fn [<test_ $shape _num_fsrs>]() {
                    let geometry = $shape(&c5g7_materials()).unwrap();
                    assert_eq!(geometry.num_fsrs(), $num_fsrs);
                    for fsr in 0..geometry.num_fsrs() {
                        let (cell, subregion) = geometry.fsr_cell(fsr).unwrap();
                        let cell = geometry.cell(cell).unwrap();
                        assert!(subregion < cell.num_subregions().max(1));
                        assert!(matches!(cell.fill(), Fill::Material(_)));
                    }
                    assert_eq!(
                        geometry.fsr_cell($num_fsrs),
                        Err(ContainmentError::UnknownFsr($num_fsrs))
                    );
                }

                #[test]
                fn [<test_ $shape _fsr_round_trip>]() {
                    let geometry = $shape(&c5g7_materials()).unwrap();
                    for point in sample_points(&geometry, 41) {
                        let location = geometry.locate(point).unwrap();
                        let (cell, subregion) = geometry.fsr_cell(location.fsr_id()).unwrap();
                        assert_eq!(cell, location.cell());
                        let view = geometry.cell(cell).unwrap();
                        if view.num_subregions() > 0 {
                            assert_eq!(view.subregion_index(location.local_point()), Ok(subregion));
                        } else {
                            assert_eq!(subregion, 0);
                        }
                        let material = geometry.fsr_material(location.fsr_id()).unwrap();
                        assert_eq!(view.fill(), &Fill::Material(material));
                    }
                }

                #[test]
                fn [<test_ $shape _locate_is_idempotent>]() {
                    let geometry = $shape(&c5g7_materials()).unwrap();
                    for point in sample_points(&geometry, 17) {
                        assert_eq!(geometry.locate(point), geometry.locate(point));
                    }
                }

                #[test]
                fn [<test_ $shape _find_cells_matches_locate>]() {
                    let geometry = $shape(&c5g7_materials()).unwrap();
                    let mut points = sample_points(&geometry, 23);
                    points.push(Point::new(3.0 * $half_width, 0.0));
                    let cells = geometry.find_cells(&points);
                    assert_eq!(cells.len(), points.len());
                    for (point, cell) in points.iter().zip(cells) {
                        assert_eq!(cell, geometry.find_cell(*point));
                    }
                }

                #[test]
                fn [<test_ $shape _closed_edges>]() {
                    let geometry = $shape(&c5g7_materials()).unwrap();
                    for point in [
                        Point::new($half_width, $half_width),
                        Point::new(-$half_width, -$half_width),
                        Point::new(-$half_width, $half_width),
                    ] {
                        assert!(geometry.locate(point).is_ok());
                    }
                    let outside = Point::new(0.0, 2.0 * $half_width);
                    assert_eq!(
                        geometry.find_cell(outside),
                        Err(ContainmentError::NoCellFound {
                            universe: geometry.root(),
                            point: outside
                        })
                    );
                }
            }
        )*
    };
}

sample_tests!(
    (nested_lattice, 512, 2.0, Reflective),
    (subcritical, 10000, 5.0, Vacuum)
);

#[test]
fn test_geometry_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Geometry>();
}

#[test]
fn test_nested_center_resolves_into_pin() {
    let geometry = nested_lattice(&c5g7_materials()).unwrap();
    let location = geometry.locate(Point::new(0.0, 0.0)).unwrap();
    assert_eq!(location.depth(), 3);
    assert_eq!(location.levels().len(), 5);

    let Some(Level::Universe { universe, .. }) = location.levels().last() else {
        panic!("The innermost level is not a universe");
    };
    assert_eq!(geometry.universe(*universe).unwrap().name(), "large pin cell");
    assert_eq!(
        geometry.cell(location.cell()).unwrap().name(),
        "large pin moderator"
    );
    let local = location.local_point();
    assert_relative_eq!(local.x, 0.5);
    assert_relative_eq!(local.y, 0.5);
}

#[test]
fn test_nested_pin_positions() {
    let geometry = nested_lattice(&c5g7_materials()).unwrap();
    let name = |x: f64, y: f64| {
        let cell = geometry.find_cell(Point::new(x, y)).unwrap();
        geometry.cell(cell).unwrap().name().to_string()
    };
    // Every assembly has large pins at j = 0, a medium pin at (0, 1) and a small
    // pin at (1, 1), with index 0 at the largest coordinate
    assert_eq!(name(1.5, 1.5), "large pin fuel");
    assert_eq!(name(0.5, 1.5), "large pin fuel");
    assert_eq!(name(1.75, 0.5), "medium pin fuel");
    assert_eq!(name(0.75, 0.5), "small pin moderator");
    assert_eq!(name(0.5, 0.5), "small pin fuel");
    assert_eq!(name(-0.5, -0.5), "large pin fuel");

    let core = geometry
        .lattice(geometry.find_lattice("2x2 core").unwrap())
        .unwrap();
    assert_eq!(core.lattice_index(Point::new(-1.5, 1.5)), Ok((1, 0)));
    assert_eq!(core.num_fsrs(), 512);
    // The root universe holds a single cell, so region ids agree
    let from_core = core.locate(Point::new(1.5, 1.5)).unwrap();
    let from_root = geometry.locate(Point::new(1.5, 1.5)).unwrap();
    assert_eq!(from_core.cell(), from_root.cell());
    assert_eq!(from_core.fsr_id(), from_root.fsr_id());
    assert_eq!(from_core.depth() + 1, from_root.depth());
}

#[test]
fn test_nested_pin_subregions() {
    let geometry = nested_lattice(&c5g7_materials()).unwrap();
    let pin = geometry
        .universe(geometry.find_universe("large pin cell").unwrap())
        .unwrap();
    assert_eq!(pin.num_fsrs(), 32);

    // The outer fuel ring of the first sector, then the moderator in the second sector
    let fuel = pin.locate(Point::new(0.39, 0.01)).unwrap();
    assert_eq!(fuel.fsr_id(), 16);
    let moderator = pin.locate(Point::new(0.3, 0.4)).unwrap();
    assert_eq!(moderator.fsr_id(), 25);
}

#[test]
fn test_subcritical_fuel_block() {
    let geometry = subcritical(&c5g7_materials()).unwrap();
    let lattice = geometry
        .lattice(geometry.find_lattice("100x100 lattice").unwrap())
        .unwrap();
    let layout = lattice.layout();
    for i in 40..60 {
        for j in 40..60 {
            let center = layout.cell_center(i, j);
            let cell = geometry.find_cell(center).unwrap();
            let expected = if (45..55).contains(&i) && (45..55).contains(&j) {
                "fuel"
            } else {
                "water"
            };
            assert_eq!(geometry.cell(cell).unwrap().name(), expected);
        }
    }
    let fuel_cells = geometry
        .find_cells(
            &(0..100)
                .flat_map(|i| (0..100).map(move |j| (i, j)))
                .map(|(i, j)| layout.cell_center(i, j))
                .collect::<Vec<_>>(),
        )
        .into_iter()
        .filter(|cell| geometry.cell(*cell.as_ref().unwrap()).unwrap().name() == "fuel")
        .count();
    assert_eq!(fuel_cells, 100);
}

#[test]
fn test_cycle_is_rejected() {
    let mut builder = GeometryBuilder::new();
    let outer = builder.create_universe("outer");
    let inner = builder.create_universe("inner");
    let lattice = builder.create_lattice("lattice");
    builder.set_width(lattice, 1.0, 1.0).unwrap();
    builder.set_universes(lattice, vec![vec![inner]]).unwrap();

    let holder = builder.create_cell("holder");
    builder.set_fill(holder, lattice).unwrap();
    builder.add_cell(outer, holder).unwrap();

    let back = builder.create_cell("back");
    builder.set_fill(back, outer).unwrap();
    assert!(matches!(
        builder.add_cell(inner, back),
        Err(ConstructionError::Cycle(_))
    ));
    assert!(matches!(
        builder.place_point(lattice, Point::origin(), outer),
        Err(ConstructionError::Cycle(_))
    ));

    // The rejected operations left a valid geometry behind
    builder.set_fill(back, Material::new("Water")).unwrap();
    builder.add_cell(inner, back).unwrap();
    let mut options = GeometryOptions::default();
    options.set_check_overlaps(false);
    let geometry = builder.create_geometry(outer, options).unwrap();
    assert_eq!(geometry.num_fsrs(), 1);
    assert_eq!(geometry.find_cell(Point::new(0.2, -0.4)), Ok(back));
}

#[test]
fn test_unfilled_cell_is_rejected() {
    let mut builder = GeometryBuilder::new();
    let circle = builder.create_circle("circle", 0.0, 0.0, 1.0).unwrap();
    let inside = builder.create_cell("inside");
    builder.add_surface(inside, Halfspace::Negative, circle).unwrap();
    let root = builder.create_universe("root");
    builder.add_cell(root, inside).unwrap();
    assert_eq!(
        builder
            .create_geometry(root, GeometryOptions::default())
            .unwrap_err(),
        ConstructionError::UnfilledCell(inside)
    );
}

#[test]
fn test_lattice_offset() {
    let mut builder = GeometryBuilder::new();
    let water = builder.create_cell("water");
    builder.set_fill(water, Material::new("Water")).unwrap();
    let pin = builder.create_universe("pin");
    builder.add_cell(pin, water).unwrap();

    let lattice = builder.create_lattice("shifted");
    builder.set_width(lattice, 1.0, 1.0).unwrap();
    builder.set_offset(lattice, 10.0, 0.0).unwrap();
    builder.set_universes(lattice, vec![vec![pin; 2]; 2]).unwrap();
    let holder = builder.create_cell("holder");
    builder.set_fill(holder, lattice).unwrap();
    let root = builder.create_universe("root");
    builder.add_cell(root, holder).unwrap();
    let geometry = builder
        .create_geometry(root, GeometryOptions::default())
        .unwrap();

    let location = geometry.locate(Point::new(10.5, -0.5)).unwrap();
    assert_eq!(location.cell(), water);
    assert!(matches!(
        location.levels()[1],
        Level::Lattice { i: 0, j: 1, .. }
    ));
    assert_eq!(
        geometry.find_cell(Point::new(0.0, 0.0)),
        Err(ContainmentError::OutsideLattice {
            lattice,
            point: Point::new(0.0, 0.0)
        })
    );
    assert!(geometry.cell(holder).unwrap().contains(Point::new(0.0, 0.0)));
}
