//! Coordinate mappings from cell-local lattice space to physical space.
//!
//! A mapping is fitted once against the configured cell size and repeat
//! counts. Angular mappings derive a step that tiles a whole revolution and
//! may rewrite the angular repeat count so the lattice closes on itself.

use crate::errors::ConfigError;
use crate::float_types::{FRAC_PI_2, PI, Real, TAU};
use crate::lattice::Lattice;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;
use tracing::{debug, warn};

/// Strategy placing the lattice in physical space.
pub trait CoordinateMapping: Clone + Debug + Send + Sync {
    /// Derive angular steps from the cell size and correct `repeat_cell` in
    /// place. Called once before any point is mapped.
    fn fit(&mut self, cell_size: &Vector3<Real>, repeat_cell: &mut [usize; 3]) -> Result<(), ConfigError>;

    /// Position of a cell-local point in physical space.
    fn map_to_physical(&self, local: &Point3<Real>) -> Point3<Real>;

    /// Volume of the periodic domain the lattice tiles; the denominator of
    /// the relative density.
    fn domain_volume(&self, lattice: &Lattice) -> Real;
}

/// Cell size and repeat counts a mapping was fitted against.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CellFrame {
    cell_size: Vector3<Real>,
    repeat_cell: [usize; 3],
}

impl Default for CellFrame {
    fn default() -> Self {
        Self {
            cell_size: Vector3::repeat(1.0),
            repeat_cell: [1; 3],
        }
    }
}

impl CellFrame {
    fn repeat_product(&self) -> Real {
        self.repeat_cell.iter().map(|&n| n as Real).product()
    }
}

fn validate_radius(radius: Real) -> Result<Real, ConfigError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(ConfigError::InvalidRadius(radius))
    }
}

/// Split `span` radians into whole cells of roughly `cell_angle` radians.
/// Returns the cell count and the adjusted step.
fn angular_step(span: Real, cell_angle: Real) -> (usize, Real) {
    let count = (span / cell_angle).round();
    let count = if count.is_finite() && count >= 1.0 { count as usize } else { 1 };
    (count, span / count as Real)
}

/// Clamp an angular repeat count to the count that closes the revolution.
/// Zero means "fill the revolution".
fn clamp_repeat(repeat: &mut usize, closing: usize, axis: &'static str) {
    if *repeat == 0 {
        debug!(axis, repeat = closing, "Auto-filled angular repeat count");
        *repeat = closing;
    } else if *repeat > closing {
        warn!(
            axis,
            requested = *repeat,
            clamped = closing,
            "Angular repeat count exceeds one revolution, clamping"
        );
        *repeat = closing;
    }
}

/// Identity mapping: the lattice is an axis-aligned box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Planar {
    frame: CellFrame,
}

impl Planar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CoordinateMapping for Planar {
    fn fit(&mut self, cell_size: &Vector3<Real>, repeat_cell: &mut [usize; 3]) -> Result<(), ConfigError> {
        self.frame = CellFrame {
            cell_size: *cell_size,
            repeat_cell: *repeat_cell,
        };
        Ok(())
    }

    #[inline]
    fn map_to_physical(&self, local: &Point3<Real>) -> Point3<Real> {
        *local
    }

    fn domain_volume(&self, _lattice: &Lattice) -> Real {
        self.frame.cell_size.product() * self.frame.repeat_product()
    }
}

/// Wraps the lattice Y axis around the Z axis.
///
/// Local `x` becomes the radial offset from `radius`, local `y` the angle and
/// local `z` the height.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylindrical {
    radius: Real,
    unit_theta: Real,
    frame: CellFrame,
}

impl Cylindrical {
    pub fn new(radius: Real) -> Result<Self, ConfigError> {
        Ok(Self {
            radius: validate_radius(radius)?,
            unit_theta: TAU,
            frame: CellFrame::default(),
        })
    }

    pub const fn radius(&self) -> Real {
        self.radius
    }

    /// Angle spanned by one cell after fitting.
    pub const fn unit_theta(&self) -> Real {
        self.unit_theta
    }

    /// Cells needed to close a full revolution.
    pub fn cells_per_revolution(&self) -> usize {
        (TAU / self.unit_theta).round() as usize
    }
}

/// Fit shared by the straight and the twisted cylinder.
fn fit_cylinder(
    radius: Real,
    cell_size: &Vector3<Real>,
    repeat_cell: &mut [usize; 3],
) -> (Real, CellFrame) {
    let (closing, unit_theta) = angular_step(TAU, cell_size.y / radius);
    clamp_repeat(&mut repeat_cell[1], closing, "y");
    (
        unit_theta,
        CellFrame {
            cell_size: *cell_size,
            repeat_cell: *repeat_cell,
        },
    )
}

fn cylinder_domain_volume(radius: Real, unit_theta: Real, frame: &CellFrame) -> Real {
    radius * frame.cell_size.x * unit_theta * frame.cell_size.z * frame.repeat_product()
}

#[inline]
fn cylinder_point(rho: Real, theta: Real, z: Real) -> Point3<Real> {
    let (sin, cos) = theta.sin_cos();
    Point3::new(rho * cos, rho * sin, z)
}

impl CoordinateMapping for Cylindrical {
    fn fit(&mut self, cell_size: &Vector3<Real>, repeat_cell: &mut [usize; 3]) -> Result<(), ConfigError> {
        (self.unit_theta, self.frame) = fit_cylinder(self.radius, cell_size, repeat_cell);
        Ok(())
    }

    fn map_to_physical(&self, local: &Point3<Real>) -> Point3<Real> {
        let theta = local.y / self.frame.cell_size.y * self.unit_theta;
        cylinder_point(local.x + self.radius, theta, local.z)
    }

    fn domain_volume(&self, _lattice: &Lattice) -> Real {
        cylinder_domain_volume(self.radius, self.unit_theta, &self.frame)
    }
}

/// [`Cylindrical`] with the angle advancing linearly along the height.
#[derive(Debug, Clone, PartialEq)]
pub struct TwistedCylindrical {
    radius: Real,
    twist_rate: Real,
    unit_theta: Real,
    frame: CellFrame,
}

impl TwistedCylindrical {
    /// `twist_rate` is in radians per unit of height.
    pub fn new(radius: Real, twist_rate: Real) -> Result<Self, ConfigError> {
        if !twist_rate.is_finite() {
            return Err(ConfigError::InvalidTwistRate(twist_rate));
        }
        Ok(Self {
            radius: validate_radius(radius)?,
            twist_rate,
            unit_theta: TAU,
            frame: CellFrame::default(),
        })
    }

    pub const fn radius(&self) -> Real {
        self.radius
    }

    pub const fn twist_rate(&self) -> Real {
        self.twist_rate
    }

    pub const fn unit_theta(&self) -> Real {
        self.unit_theta
    }
}

impl CoordinateMapping for TwistedCylindrical {
    fn fit(&mut self, cell_size: &Vector3<Real>, repeat_cell: &mut [usize; 3]) -> Result<(), ConfigError> {
        (self.unit_theta, self.frame) = fit_cylinder(self.radius, cell_size, repeat_cell);
        Ok(())
    }

    fn map_to_physical(&self, local: &Point3<Real>) -> Point3<Real> {
        let theta = local.y / self.frame.cell_size.y * self.unit_theta + self.twist_rate * local.z;
        cylinder_point(local.x + self.radius, theta, local.z)
    }

    fn domain_volume(&self, _lattice: &Lattice) -> Real {
        cylinder_domain_volume(self.radius, self.unit_theta, &self.frame)
    }
}

/// Wraps the lattice around a sphere: local `y` is the polar angle, local
/// `z` the azimuth and local `x` the radial offset from `radius`.
///
/// A closed sphere collapses whole lattice rows onto the polar axis. The
/// density denominator is the lattice's own volume, so it inherits that
/// distortion. Solids are not manifold next to the axis: the azimuthal
/// wedges meeting there carry their own field values at the same welded
/// points, and edges touching the axis may be shared by four or more
/// triangles. Part volumes still partition the lattice volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Spherical {
    radius: Real,
    unit_theta: Real,
    unit_phi: Real,
    frame: CellFrame,
}

impl Spherical {
    pub fn new(radius: Real) -> Result<Self, ConfigError> {
        Ok(Self {
            radius: validate_radius(radius)?,
            unit_theta: PI,
            unit_phi: TAU,
            frame: CellFrame::default(),
        })
    }

    pub const fn radius(&self) -> Real {
        self.radius
    }

    /// Polar angle spanned by one cell; whole cells tile half a revolution.
    pub const fn unit_theta(&self) -> Real {
        self.unit_theta
    }

    /// Azimuth spanned by one cell; whole cells tile a full revolution.
    pub const fn unit_phi(&self) -> Real {
        self.unit_phi
    }
}

impl CoordinateMapping for Spherical {
    fn fit(&mut self, cell_size: &Vector3<Real>, repeat_cell: &mut [usize; 3]) -> Result<(), ConfigError> {
        let (theta_closing, unit_theta) = angular_step(PI, cell_size.y / self.radius);
        clamp_repeat(&mut repeat_cell[1], theta_closing, "y");
        let (phi_closing, unit_phi) = angular_step(TAU, cell_size.z / self.radius);
        clamp_repeat(&mut repeat_cell[2], phi_closing, "z");

        self.unit_theta = unit_theta;
        self.unit_phi = unit_phi;
        self.frame = CellFrame {
            cell_size: *cell_size,
            repeat_cell: *repeat_cell,
        };
        Ok(())
    }

    fn map_to_physical(&self, local: &Point3<Real>) -> Point3<Real> {
        let rho = local.x + self.radius;
        let theta = local.y / self.frame.cell_size.y * self.unit_theta + FRAC_PI_2;
        let phi = local.z / self.frame.cell_size.z * self.unit_phi;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        Point3::new(
            rho * sin_theta * cos_phi,
            rho * sin_theta * sin_phi,
            rho * cos_theta,
        )
    }

    fn domain_volume(&self, lattice: &Lattice) -> Real {
        lattice.volume().abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cylinder_fills_revolution() {
        let mut mapping = Cylindrical::new(1.0).unwrap();
        let mut repeat = [1, 0, 1];
        mapping.fit(&Vector3::repeat(1.0), &mut repeat).unwrap();
        assert_eq!(repeat, [1, 6, 1]);
        assert_relative_eq!(repeat[1] as Real * mapping.unit_theta(), TAU, epsilon = 1e-12);
        assert_eq!(mapping.cells_per_revolution(), 6);
    }

    #[test]
    fn test_cylinder_clamps_excess_repeat() {
        let mut mapping = Cylindrical::new(2.0).unwrap();
        let mut repeat = [1, 50, 2];
        mapping.fit(&Vector3::repeat(1.0), &mut repeat).unwrap();
        assert_eq!(repeat, [1, 13, 2]);

        let mut partial = [1, 4, 1];
        mapping.fit(&Vector3::repeat(1.0), &mut partial).unwrap();
        assert_eq!(partial, [1, 4, 1]);
    }

    #[test]
    fn test_huge_cells_still_close() {
        let mut mapping = Cylindrical::new(0.1).unwrap();
        let mut repeat = [1, 0, 1];
        mapping.fit(&Vector3::repeat(5.0), &mut repeat).unwrap();
        assert_eq!(repeat[1], 1);
        assert_relative_eq!(mapping.unit_theta(), TAU);
    }

    #[test]
    fn test_cylinder_seam_points_coincide() {
        let mut mapping = Cylindrical::new(1.0).unwrap();
        let cell = Vector3::new(1.0, 0.8, 1.0);
        let mut repeat = [1, 0, 1];
        mapping.fit(&cell, &mut repeat).unwrap();
        let half = 0.5 * cell.y * repeat[1] as Real;
        let a = mapping.map_to_physical(&Point3::new(0.2, -half, 0.3));
        let b = mapping.map_to_physical(&Point3::new(0.2, half, 0.3));
        assert_relative_eq!((a - b).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_twist_rotates_with_height() {
        let mut straight = Cylindrical::new(1.0).unwrap();
        let mut twisted = TwistedCylindrical::new(1.0, 0.5).unwrap();
        let mut repeat = [1, 0, 1];
        straight.fit(&Vector3::repeat(1.0), &mut repeat.clone()).unwrap();
        twisted.fit(&Vector3::repeat(1.0), &mut repeat).unwrap();

        let flat = Point3::new(0.1, 0.2, 0.0);
        assert_relative_eq!(straight.map_to_physical(&flat), twisted.map_to_physical(&flat));

        let raised = Point3::new(0.0, 0.0, 0.4);
        let p = twisted.map_to_physical(&raised);
        assert_relative_eq!(p.y.atan2(p.x), 0.2, epsilon = 1e-12);
        assert_relative_eq!(p.z, 0.4);
    }

    #[test]
    fn test_sphere_closure() {
        let mut mapping = Spherical::new(1.0).unwrap();
        let mut repeat = [1, 0, 0];
        mapping.fit(&Vector3::repeat(1.0), &mut repeat).unwrap();
        assert_eq!(repeat, [1, 3, 6]);
        assert_relative_eq!(repeat[1] as Real * mapping.unit_theta(), PI, epsilon = 1e-12);
        assert_relative_eq!(repeat[2] as Real * mapping.unit_phi(), TAU, epsilon = 1e-12);

        let p = mapping.map_to_physical(&Point3::new(0.5, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(1.5, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_new_mappings_start_unfitted() {
        let cylinder = Cylindrical::new(1.0).unwrap();
        assert_eq!(cylinder.unit_theta(), TAU);
        assert_eq!(cylinder.cells_per_revolution(), 1);

        let twisted = TwistedCylindrical::new(1.0, 0.0).unwrap();
        assert_eq!(twisted.unit_theta(), TAU);

        let sphere = Spherical::new(1.0).unwrap();
        assert_eq!((sphere.unit_theta(), sphere.unit_phi()), (PI, TAU));
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(Cylindrical::new(0.0).unwrap_err(), ConfigError::InvalidRadius(0.0));
        assert!(Spherical::new(Real::NAN).is_err());
        assert!(matches!(
            TwistedCylindrical::new(1.0, Real::INFINITY),
            Err(ConfigError::InvalidTwistRate(_))
        ));
    }

    #[test]
    fn test_planar_domain_volume() {
        let mut mapping = Planar::new();
        let mut repeat = [2, 1, 3];
        mapping.fit(&Vector3::new(1.0, 2.0, 0.5), &mut repeat).unwrap();
        let samples = crate::lattice::axis_samples(&Vector3::new(1.0, 2.0, 0.5), repeat, 3).unwrap();
        let lattice = Lattice::from_axis_samples(&samples);
        assert_relative_eq!(mapping.domain_volume(&lattice), 6.0);
        assert_relative_eq!(lattice.volume(), 6.0, epsilon = 1e-9);
    }
}
