//! Parallel implementation of field sampling

use super::traits::FieldOps;
use super::{SurfaceSampler, thickness_at};
use crate::config::{AxisSwap, Offset};
use crate::float_types::Real;
use crate::mapping::CoordinateMapping;
use crate::surfaces::SurfaceFn;
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

/// Parallel implementation of `FieldOps`
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelFieldOps;

impl ParallelFieldOps {
    pub const fn new() -> Self {
        Self
    }
}

impl FieldOps for ParallelFieldOps {
    fn map_points<M: CoordinateMapping>(
        &self,
        local: &[Point3<Real>],
        mapping: &M,
    ) -> Vec<Point3<Real>> {
        local.par_iter().map(|p| mapping.map_to_physical(p)).collect()
    }

    fn sample_surface(
        &self,
        local: &[Point3<Real>],
        surface: SurfaceFn,
        axis_swap: AxisSwap,
        cell_size: &Vector3<Real>,
        phase_shift: &Vector3<Real>,
    ) -> Vec<Real> {
        let sampler = SurfaceSampler::new(surface, axis_swap, cell_size, phase_shift);
        local.par_iter().map(|p| sampler.sample(p)).collect()
    }

    fn sample_thickness(&self, physical: &[Point3<Real>], offset: &Offset) -> Vec<Real> {
        physical.par_iter().map(|p| thickness_at(offset, p)).collect()
    }
}
