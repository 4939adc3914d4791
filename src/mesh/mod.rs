//! Indexed triangle mesh produced by the extractor

use crate::errors::{ExtractionError, TpmsError};
use crate::float_types::{
    Real,
    parry3d::{
        bounding_volume::Aabb,
        shape::{Shape, TriMesh},
    },
};
use nalgebra::{Point3, Quaternion, Unit, Vector3};

pub mod manifold;

/// Name of the per-point scalar attribute carried through extraction.
pub const SURFACE_ATTRIBUTE: &str = "surface";

/// Triangle mesh with a per-point `surface` attribute.
///
/// Solid parts are wound counter-clockwise seen from outside and are closed
/// on planar and cylindrical lattices. On a [`Spherical`] lattice the
/// polar axis pinches solids, so edges next to the axis may be shared by
/// more than two triangles.
///
/// [`Spherical`]: crate::mapping::Spherical
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Point positions in physical space
    pub points: Vec<Point3<Real>>,
    /// Point indices, three per triangle
    pub triangles: Vec<[u32; 3]>,
    surface: Vec<Real>,
}

impl Mesh {
    /// Build a mesh from raw parts. `surface` holds one value per point.
    pub fn from_parts(
        points: Vec<Point3<Real>>,
        triangles: Vec<[u32; 3]>,
        surface: Vec<Real>,
    ) -> Self {
        debug_assert_eq!(points.len(), surface.len());
        Self {
            points,
            triangles,
            surface,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Per-point attribute by name. Only `"surface"` exists.
    pub fn point_data(&self, name: &str) -> Option<&[Real]> {
        (name == SURFACE_ATTRIBUTE).then_some(self.surface.as_slice())
    }

    /// `(min, max)` of the `surface` attribute, for colour ramps.
    pub fn scalar_range(&self) -> Option<(Real, Real)> {
        self.surface.iter().fold(None, |range, &value| match range {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
    }

    /// Corner positions of triangle `index`.
    #[inline]
    pub fn triangle(&self, index: usize) -> [Point3<Real>; 3] {
        self.triangles[index].map(|i| self.points[i as usize])
    }

    /// Iterate over triangle corner positions.
    pub fn triangle_points(&self) -> impl Iterator<Item = [Point3<Real>; 3]> + '_ {
        self.triangles
            .iter()
            .map(|tri| tri.map(|i| self.points[i as usize]))
    }

    /// Unit normal of every triangle, following its winding.
    pub fn face_normals(&self) -> Vec<Vector3<Real>> {
        self.triangle_points()
            .map(|[a, b, c]| {
                (b - a)
                    .cross(&(c - a))
                    .try_normalize(Real::EPSILON)
                    .unwrap_or_else(Vector3::zeros)
            })
            .collect()
    }

    /// Enclosed volume by the divergence theorem; positive for outward
    /// winding. Meaningful only for closed meshes.
    pub fn volume(&self) -> Real {
        self.triangle_points()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)))
            .sum::<Real>()
            / 6.0
    }

    pub fn surface_area(&self) -> Real {
        self.triangle_points()
            .map(|[a, b, c]| 0.5 * (b - a).cross(&(c - a)).norm())
            .sum()
    }

    /// Append `other` after `self`; points are not merged.
    ///
    /// ## Errors
    /// [`ExtractionError::TooManyVertices`] when the combined point count
    /// does not fit 32-bit indices.
    pub fn concat(&self, other: &Mesh) -> Result<Mesh, ExtractionError> {
        let base = index_base(self.points.len(), other.points.len())?;
        let mut points = Vec::with_capacity(self.points.len() + other.points.len());
        points.extend_from_slice(&self.points);
        points.extend_from_slice(&other.points);

        let mut surface = Vec::with_capacity(points.len());
        surface.extend_from_slice(&self.surface);
        surface.extend_from_slice(&other.surface);

        let mut triangles = Vec::with_capacity(self.triangles.len() + other.triangles.len());
        triangles.extend_from_slice(&self.triangles);
        triangles.extend(other.triangles.iter().map(|tri| tri.map(|i| i + base)));

        Ok(Mesh {
            points,
            triangles,
            surface,
        })
    }

    /// Axis-aligned bounds of all points; an inverted box when empty.
    pub fn bounding_box(&self) -> Aabb {
        if self.points.is_empty() {
            return Aabb::new_invalid();
        }
        Aabb::from_points(&self.points)
    }

    /// Convert to a Parry `TriMesh`.
    ///
    /// ## Errors
    /// Parry rejects meshes without triangles.
    pub fn to_trimesh(&self) -> Result<TriMesh, TpmsError> {
        Ok(TriMesh::new(self.points.clone(), self.triangles.clone())?)
    }

    /// Mass, centre of mass and principal inertia frame at the given density,
    /// treating the mesh as a solid.
    pub fn mass_properties(
        &self,
        density: Real,
    ) -> Result<(Real, Point3<Real>, Unit<Quaternion<Real>>), TpmsError> {
        let trimesh = self.to_trimesh()?;
        let mp = trimesh.mass_properties(density);
        Ok((mp.mass(), mp.local_com, mp.principal_inertia_local_frame))
    }
}

/// Index offset of the second mesh in a concatenation.
fn index_base(first: usize, second: usize) -> Result<u32, ExtractionError> {
    let too_many = || ExtractionError::TooManyVertices(u32::MAX as usize);
    let total = first.checked_add(second).ok_or_else(too_many)?;
    u32::try_from(total).map_err(|_| too_many())?;
    u32::try_from(first).map_err(|_| too_many())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Axis-aligned box `[0,x]×[0,y]×[0,z]`, outward wound.
    pub(crate) fn cuboid(x: Real, y: Real, z: Real) -> Mesh {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(x, 0.0, 0.0),
            Point3::new(x, y, 0.0),
            Point3::new(0.0, y, 0.0),
            Point3::new(0.0, 0.0, z),
            Point3::new(x, 0.0, z),
            Point3::new(x, y, z),
            Point3::new(0.0, y, z),
        ];
        let triangles = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ];
        let surface = points.iter().map(|p| p.z).collect();
        Mesh::from_parts(points, triangles, surface)
    }

    #[test]
    fn test_cuboid_volume_and_area() {
        let mesh = cuboid(1.0, 2.0, 3.0);
        assert_relative_eq!(mesh.volume(), 6.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.surface_area(), 22.0, epsilon = 1e-12);
        let aabb = mesh.bounding_box();
        assert_relative_eq!(aabb.maxs, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_concat_offsets_indices() {
        let a = cuboid(1.0, 1.0, 1.0);
        let b = cuboid(2.0, 2.0, 2.0);
        let both = a.concat(&b).unwrap();
        assert_eq!(both.point_count(), 16);
        assert_eq!(both.triangle_count(), 24);
        assert_eq!(both.triangles[12], [8, 10, 9]);
        assert_relative_eq!(both.volume(), 9.0, epsilon = 1e-12);
        assert_eq!(both.point_data("surface").map(<[Real]>::len), Some(16));
    }

    #[test]
    fn test_concat_rejects_index_overflow() {
        let limit = u32::MAX as usize;
        assert_eq!(index_base(8, 8), Ok(8));
        assert_eq!(index_base(limit - 2, 2), Ok(u32::MAX - 2));
        assert_eq!(
            index_base(limit - 2, 3),
            Err(ExtractionError::TooManyVertices(limit))
        );
        assert!(index_base(usize::MAX, 1).is_err());
    }

    #[test]
    fn test_point_data_and_range() {
        let mesh = cuboid(1.0, 1.0, 2.5);
        assert!(mesh.point_data("normals").is_none());
        assert_eq!(mesh.scalar_range(), Some((0.0, 2.5)));
        assert_eq!(Mesh::default().scalar_range(), None);
    }

    #[test]
    fn test_mass_properties_of_cuboid() {
        let mesh = cuboid(2.0, 2.0, 2.0);
        let (mass, com, _) = mesh.mass_properties(0.5).expect("non-empty mesh");
        assert_relative_eq!(mass, 4.0, epsilon = 1e-9);
        assert_relative_eq!(com, Point3::new(1.0, 1.0, 1.0), epsilon = 1e-9);
        assert!(Mesh::default().to_trimesh().is_err());
    }
}
