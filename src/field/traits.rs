//! Traits defining field sampling operations for dependency inversion

use crate::config::{AxisSwap, Offset};
use crate::float_types::Real;
use crate::mapping::CoordinateMapping;
use crate::surfaces::SurfaceFn;
use nalgebra::{Point3, Vector3};

/// Core field sampling operations
pub trait FieldOps {
    /// Map every cell-local lattice point to physical space
    fn map_points<M: CoordinateMapping>(
        &self,
        local: &[Point3<Real>],
        mapping: &M,
    ) -> Vec<Point3<Real>>;

    /// Evaluate `surface` at every cell-local point
    fn sample_surface(
        &self,
        local: &[Point3<Real>],
        surface: SurfaceFn,
        axis_swap: AxisSwap,
        cell_size: &Vector3<Real>,
        phase_shift: &Vector3<Real>,
    ) -> Vec<Real>;

    /// Shell thickness at every physical point
    fn sample_thickness(&self, physical: &[Point3<Real>], offset: &Offset) -> Vec<Real>;
}
