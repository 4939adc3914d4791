// main.rs
//
// Generates one of each part and mapping and writes them as STL files into
// `stl/`, printing the relative density of each.

use std::fs;
use tpms::{
    Cylindrical, Part, Spherical, Tpms, TpmsConfig, TwistedCylindrical,
    errors::TpmsError, mapping::CoordinateMapping,
};

fn write_part<M: CoordinateMapping>(tpms: &Tpms<M>, part: Part, name: &str) -> Result<(), TpmsError> {
    let mesh = tpms.part(part)?;
    println!(
        "{name}: {} points, {} triangles",
        mesh.point_count(),
        mesh.triangle_count()
    );
    #[cfg(feature = "stl-io")]
    let _ = fs::write(format!("stl/{name}.stl"), mesh.to_stl_ascii(name));
    Ok(())
}

fn main() -> Result<(), TpmsError> {
    // Ensure the /stl folder exists
    let _ = fs::create_dir_all("stl");

    // Default gyroid cube: all five parts from one sampled lattice
    let gyroid = Tpms::new(TpmsConfig::default())?;
    for part in Part::ALL {
        write_part(&gyroid, part, &format!("gyroid_{part}"))?;
    }
    println!("gyroid sheet density: {:.4}", gyroid.relative_density()?);

    // Same lattice, thicker shell
    let thick = gyroid.with_offset(0.8)?;
    write_part(&thick, Part::Sheet, "gyroid_sheet_thick")?;
    println!("thick gyroid sheet density: {:.4}", thick.relative_density()?);

    // Graded shell: thickness grows along z
    let graded = Tpms::new(
        TpmsConfig::default()
            .with_surface("schwarzP")
            .with_repeat_cell([2, 2, 2])
            .with_offset(tpms::Offset::field(|p| 0.3 + 0.4 * (p.z + 1.0))),
    )?;
    write_part(&graded, Part::Sheet, "schwarz_p_graded")?;

    // Cylindrical tube, angular repeat filled to close the ring
    let tube = Tpms::with_mapping(
        TpmsConfig::default()
            .with_surface("schwarzD")
            .with_repeat_cell([1, 0, 2])
            .with_resolution(15),
        Cylindrical::new(1.5)?,
    )?;
    write_part(&tube, Part::Sheet, "schwarz_d_tube")?;
    println!(
        "tube: {} cells around, density {:.4}",
        tube.config().repeat_cell[1],
        tube.relative_density()?
    );

    // Twisted tube
    let twisted = Tpms::with_mapping(
        TpmsConfig::default()
            .with_part(Part::UpperSkeletal)
            .with_repeat_cell([1, 0, 3])
            .with_resolution(12),
        TwistedCylindrical::new(1.5, 0.3)?,
    )?;
    write_part(&twisted, Part::UpperSkeletal, "gyroid_twisted_skeletal")?;

    // Spherical shell
    let sphere = Tpms::with_mapping(
        TpmsConfig::default()
            .with_surface("neovius")
            .with_repeat_cell([1, 0, 0])
            .with_resolution(12),
        Spherical::new(2.0)?,
    )?;
    write_part(&sphere, Part::Sheet, "neovius_sphere")?;
    println!("sphere density: {:.4}", sphere.relative_density()?);

    // Dual contour of the bare surface
    #[cfg(feature = "surface-nets")]
    {
        let nets = Tpms::new(
            TpmsConfig::default()
                .with_part(Part::Surface)
                .with_surface("fischerKochS")
                .with_contour(tpms::ContourMethod::SurfaceNets),
        )?;
        write_part(&nets, Part::Surface, "fischer_koch_s_surface_nets")?;
    }

    Ok(())
}
