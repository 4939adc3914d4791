mod support;

use approx::assert_relative_eq;
use support::{radial_range, small_config};
use tpms::{
    ConfigError, CoordinateMapping, Cylindrical, Part, Spherical, Tpms, TpmsError, TwistedCylindrical,
    float_types::{PI, Real, TAU},
};

#[test]
fn test_cylinder_closes_the_revolution() {
    let config = small_config().with_repeat_cell([1, 0, 1]);
    let tube = Tpms::with_mapping(config, Cylindrical::new(1.0).unwrap()).unwrap();

    assert_eq!(tube.config().repeat_cell, [1, 6, 1]);
    assert_relative_eq!(tube.mapping().unit_theta() * 6.0, TAU, epsilon = 1e-12);
    assert_eq!(tube.mapping().cells_per_revolution(), 6);

    let sheet = tube.sheet().unwrap();
    assert!(!sheet.is_empty());
    assert_eq!(sheet.boundary_edge_count(), 0, "seam left open edges");
    assert!(sheet.is_closed());
    assert!(sheet.volume() > 0.0);

    let (inner, outer) = radial_range(sheet);
    assert!(inner >= 0.5 - 1e-9, "inner radius {inner}");
    assert!(outer <= 1.5 + 1e-9, "outer radius {outer}");

    let density = tube.relative_density().unwrap();
    assert!(density > 0.0 && density < 1.0, "density {density}");
}

#[test]
fn test_cylinder_domain_is_the_annulus() {
    let config = small_config().with_repeat_cell([1, 0, 1]);
    let tube = Tpms::with_mapping(config, Cylindrical::new(1.0).unwrap()).unwrap();
    let annulus = PI * (1.5 * 1.5 - 0.5 * 0.5);
    assert_relative_eq!(tube.mapping().domain_volume(tube.lattice()), annulus, epsilon = 1e-9);

    let sheet = tube.sheet().unwrap().volume();
    let lower = tube.lower_skeletal().unwrap().volume();
    let upper = tube.upper_skeletal().unwrap().volume();
    // The faceted ring is slightly smaller than the true annulus
    assert_relative_eq!(sheet + lower + upper, tube.lattice().volume().abs(), epsilon = 1e-6);
    assert_relative_eq!(sheet + lower + upper, annulus, max_relative = 0.02);
}

#[test]
fn test_cylinder_closure_for_various_sizes() {
    for radius in [0.7, 1.0, 2.3] {
        for cell in [0.5, 1.0, 1.7] {
            let mut mapping = Cylindrical::new(radius).unwrap();
            let mut repeat = [1, 0, 1];
            mapping.fit(&[cell; 3].into(), &mut repeat).unwrap();
            assert!(repeat[1] >= 1);
            assert_relative_eq!(mapping.unit_theta() * repeat[1] as Real, TAU, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_cylinder_clamps_excess_repeat() {
    let config = small_config().with_resolution(4).with_repeat_cell([1, 40, 1]);
    let tube = Tpms::with_mapping(config, Cylindrical::new(1.0).unwrap()).unwrap();
    assert_eq!(tube.config().repeat_cell[1], 6);
}

#[test]
fn test_partial_arc_is_closed_solid() {
    let config = small_config().with_repeat_cell([1, 3, 1]);
    let arc = Tpms::with_mapping(config, Cylindrical::new(1.0).unwrap()).unwrap();
    assert_eq!(arc.config().repeat_cell, [1, 3, 1]);

    let sheet = arc.sheet().unwrap();
    assert!(sheet.is_closed());
    // Three of six cells span theta in [-pi/2, pi/2]
    assert!(sheet.points.iter().all(|p| p.x >= -1e-9));
}

#[test]
fn test_twisted_cylinder() {
    let config = small_config()
        .with_part(Part::UpperSkeletal)
        .with_repeat_cell([1, 0, 1]);
    let twisted = Tpms::with_mapping(config, TwistedCylindrical::new(1.0, 0.5).unwrap()).unwrap();
    assert_eq!(twisted.config().repeat_cell[1], 6);
    assert_eq!(twisted.mapping().twist_rate(), 0.5);

    let mesh = twisted.mesh().unwrap();
    assert!(!mesh.is_empty());
    assert!(mesh.is_closed(), "twisted seam left open edges");

    let density = twisted.relative_density().unwrap();
    assert!(density > 0.0 && density < 1.0, "density {density}");
}

#[test]
fn test_sphere_fills_both_angles() {
    let config = small_config().with_resolution(8).with_repeat_cell([1, 0, 0]);
    let sphere = Tpms::with_mapping(config, Spherical::new(1.0).unwrap()).unwrap();

    assert_eq!(sphere.config().repeat_cell, [1, 3, 6]);
    assert_relative_eq!(sphere.mapping().unit_theta() * 3.0, PI, epsilon = 1e-12);
    assert_relative_eq!(sphere.mapping().unit_phi() * 6.0, TAU, epsilon = 1e-12);

    for p in sphere.lattice().points() {
        let r = p.coords.norm();
        assert!((0.5 - 1e-9..=1.5 + 1e-9).contains(&r), "point at radius {r}");
    }

    let shell = 4.0 / 3.0 * PI * (1.5 * 1.5 * 1.5 - 0.5 * 0.5 * 0.5);
    let domain = sphere.mapping().domain_volume(sphere.lattice());
    assert_relative_eq!(domain, shell, max_relative = 0.1);

    let density = sphere.relative_density().unwrap();
    assert!(density > 0.0 && density < 1.0, "density {density}");
}

#[test]
fn test_sphere_parts_pinch_only_at_the_axis() {
    let config = small_config().with_repeat_cell([1, 0, 0]);
    let sphere = Tpms::with_mapping(config, Spherical::new(1.0).unwrap()).unwrap();

    let sheet = sphere.sheet().unwrap();
    let lower = sphere.lower_skeletal().unwrap();
    let upper = sphere.upper_skeletal().unwrap();
    let total = sheet.volume() + lower.volume() + upper.volume();
    assert_relative_eq!(total, sphere.lattice().volume().abs(), epsilon = 1e-6);

    // Angle between neighbouring lattice rows, and the widest that first
    // row of cells around the axis gets
    let step = sphere.lattice().spacing().y * sphere.mapping().unit_theta();
    let first_ring = 1.5 * step.sin() + 1e-9;

    for (name, mesh) in [("sheet", sheet), ("lower", lower), ("upper", upper)] {
        for (&(a, b), &count) in mesh.edge_counts().iter() {
            if count == 2 {
                continue;
            }
            let off_axis = [a, b]
                .map(|i| {
                    let p = mesh.points[i as usize];
                    p.x.hypot(p.y)
                })
                .into_iter()
                .fold(0.0, Real::max);
            assert!(
                off_axis <= first_ring,
                "{name}: edge shared by {count} triangles at {off_axis} from the axis"
            );
        }
    }
}

#[test]
fn test_invalid_mappings() {
    assert_eq!(Cylindrical::new(0.0).unwrap_err(), ConfigError::InvalidRadius(0.0));
    assert!(matches!(Spherical::new(-1.0), Err(ConfigError::InvalidRadius(_))));
    assert!(matches!(
        TwistedCylindrical::new(1.0, Real::NAN),
        Err(ConfigError::InvalidTwistRate(_))
    ));

    // Zero repeat on a non-angular axis stays an error
    let config = small_config().with_repeat_cell([0, 0, 1]);
    assert!(matches!(
        Tpms::with_mapping(config, Cylindrical::new(1.0).unwrap()),
        Err(TpmsError::Config(ConfigError::InvalidRepeat { .. }))
    ));
}
