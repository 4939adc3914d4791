//! Dual contouring of the base field with `fast-surface-nets`

use super::ensure_finite;
use crate::errors::ExtractionError;
use crate::float_types::Real;
use crate::lattice::{GridShape, Lattice, ScalarField};
use crate::mapping::CoordinateMapping;
use crate::mesh::Mesh;
use fast_surface_nets::{SurfaceNetsBuffer, surface_nets as fsn_surface_nets};
use nalgebra::{Point3, Vector3};
use tracing::debug;

/// Zero level set of the base field, one vertex per crossed cell, mapped to
/// physical space. Triangles are wound so normals point towards increasing
/// field values.
pub(crate) fn surface_nets<M: CoordinateMapping>(
    lattice: &Lattice,
    mapping: &M,
) -> Result<Mesh, ExtractionError> {
    ensure_finite(lattice, &[ScalarField::Surface])?;
    let shape = GridShape::of(lattice).ok_or(ExtractionError::TooManyVertices(u32::MAX as usize))?;

    let field: Vec<f32> = lattice.surface().iter().map(|&v| v as f32).collect();
    let mut buffer = SurfaceNetsBuffer::default();
    fsn_surface_nets(
        &field,
        &shape,
        [0, 0, 0],
        [shape.nx - 1, shape.ny - 1, shape.nz - 1],
        &mut buffer,
    );

    let origin = lattice.origin();
    let spacing = lattice.spacing();
    let to_vector = |v: [f32; 3]| Vector3::new(v[0] as Real, v[1] as Real, v[2] as Real);

    let mut points = Vec::with_capacity(buffer.positions.len());
    let mut surface = Vec::with_capacity(buffer.positions.len());
    for &position in &buffer.positions {
        let grid = to_vector(position);
        let local: Point3<Real> = origin + spacing.component_mul(&grid);
        points.push(mapping.map_to_physical(&local));
        surface.push(lattice.interpolate(ScalarField::Surface, grid.into()));
    }

    let triangles = buffer
        .indices
        .chunks_exact(3)
        .map(|tri| {
            let [a, b, c] = [tri[0], tri[1], tri[2]];
            let corners = [a, b, c].map(|i| to_vector(buffer.positions[i as usize]));
            let winding = (corners[1] - corners[0]).cross(&(corners[2] - corners[0]));
            let gradient = [a, b, c]
                .iter()
                .map(|&i| to_vector(buffer.normals[i as usize]))
                .sum::<Vector3<Real>>();
            if winding.dot(&gradient) < 0.0 { [a, c, b] } else { [a, b, c] }
        })
        .collect();

    let mesh = Mesh::from_parts(points, triangles, surface);
    debug!(
        points = mesh.point_count(),
        triangles = mesh.triangle_count(),
        "Surface nets contour"
    );
    Ok(mesh)
}
