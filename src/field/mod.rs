//! Field evaluation over the lattice.
//!
//! The base field is the catalog surface evaluated at
//! `k * (local + phase_shift)` with `k = 2π / cell_size`, its arguments
//! permuted by the axis swap. The two offset fields shift it by half the
//! shell thickness in either direction.

pub mod serial;
pub mod traits;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use serial::SerialFieldOps;
pub use traits::FieldOps;

#[cfg(feature = "parallel")]
pub use parallel::ParallelFieldOps;

use crate::config::{AxisSwap, Offset};
use crate::float_types::{Real, TAU};
use crate::surfaces::SurfaceFn;
use nalgebra::{Point3, Vector3};

/// Backend picked by the `parallel` feature.
#[cfg(not(feature = "parallel"))]
pub(crate) fn default_ops() -> SerialFieldOps {
    SerialFieldOps::new()
}

/// Backend picked by the `parallel` feature.
#[cfg(feature = "parallel")]
pub(crate) fn default_ops() -> ParallelFieldOps {
    ParallelFieldOps::new()
}

/// A surface function with its frequency, phase and axis swap applied.
#[derive(Clone, Copy)]
pub struct SurfaceSampler {
    surface: SurfaceFn,
    axis_swap: AxisSwap,
    wave_number: Vector3<Real>,
    phase_shift: Vector3<Real>,
}

impl SurfaceSampler {
    pub fn new(
        surface: SurfaceFn,
        axis_swap: AxisSwap,
        cell_size: &Vector3<Real>,
        phase_shift: &Vector3<Real>,
    ) -> Self {
        Self {
            surface,
            axis_swap,
            wave_number: cell_size.map(|size| TAU / size),
            phase_shift: *phase_shift,
        }
    }

    /// Field value at a cell-local point.
    #[inline]
    pub fn sample(&self, local: &Point3<Real>) -> Real {
        let scaled = (local.coords + self.phase_shift).component_mul(&self.wave_number);
        let [a, b, c] = self.axis_swap.apply([scaled.x, scaled.y, scaled.z]);
        (self.surface)(a, b, c)
    }
}

#[inline]
pub(crate) fn thickness_at(offset: &Offset, physical: &Point3<Real>) -> Real {
    match offset {
        Offset::Uniform(thickness) => *thickness,
        Offset::Field(thickness) => thickness(physical),
    }
}

/// `(lower_surface, upper_surface)` = `surface ± thickness / 2`.
pub fn offset_fields(surface: &[Real], thickness: &[Real]) -> (Vec<Real>, Vec<Real>) {
    surface
        .iter()
        .zip(thickness)
        .map(|(&value, &t)| (value + 0.5 * t, value - 0.5 * t))
        .unzip()
}
