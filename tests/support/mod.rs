//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use tpms::{TpmsConfig, float_types::Real, mesh::Mesh};

/// Default configuration at a resolution that keeps debug-build tests quick.
pub fn small_config() -> TpmsConfig {
    TpmsConfig::default().with_resolution(10)
}

/// Returns the bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]` of a mesh.
pub fn bounding_box(mesh: &Mesh) -> [Real; 6] {
    let mut bounds = [Real::MAX, Real::MAX, Real::MAX, Real::MIN, Real::MIN, Real::MIN];
    for p in &mesh.points {
        for axis in 0..3 {
            bounds[axis] = bounds[axis].min(p[axis]);
            bounds[axis + 3] = bounds[axis + 3].max(p[axis]);
        }
    }
    bounds
}

/// `(min, max)` distance of the mesh points from the Z axis.
pub fn radial_range(mesh: &Mesh) -> (Real, Real) {
    mesh.points
        .iter()
        .map(|p| p.x.hypot(p.y))
        .fold((Real::MAX, Real::MIN), |(lo, hi), r| (lo.min(r), hi.max(r)))
}
