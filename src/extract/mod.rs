//! Geometry extraction: solids by half-space clipping, surfaces by
//! iso-contouring.
//!
//! Every lattice cell is split into six tetrahedra ([`KUHN_TETS`]). A solid
//! part clips each tetrahedron against its half-spaces in turn, keeps the
//! faces that only one piece owns, welds coincident points (angular seams
//! close here), drops faces that became duplicates and fan-triangulates the
//! rest.

mod clip;
#[cfg(feature = "surface-nets")]
mod contour;

#[cfg(feature = "surface-nets")]
pub(crate) use contour::surface_nets;

use crate::errors::ExtractionError;
use crate::float_types::{Real, tolerance};
use crate::lattice::{KUHN_TETS, Lattice, ScalarField, tet_signed_volume};
use crate::mesh::Mesh;
pub(crate) use clip::HalfSpace;
use clip::{Polytope, VertexPool, dedup_cycle, face_key};
use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use tracing::debug;

/// Pieces thinner than this fraction of their tetrahedron are dropped.
const FLAT_PIECE_RATIO: Real = 1e-12;

/// `upper_surface <= 0` and `lower_surface >= 0`: the shell between both offsets.
pub(crate) const SHEET: &[HalfSpace] = &[
    HalfSpace::AtMost(ScalarField::UpperSurface),
    HalfSpace::AtLeast(ScalarField::LowerSurface),
];
pub(crate) const LOWER_SKELETAL: &[HalfSpace] = &[HalfSpace::AtMost(ScalarField::LowerSurface)];
pub(crate) const UPPER_SKELETAL: &[HalfSpace] = &[HalfSpace::AtLeast(ScalarField::UpperSurface)];

/// First non-finite sample among `fields`.
pub(crate) fn ensure_finite(lattice: &Lattice, fields: &[ScalarField]) -> Result<(), ExtractionError> {
    for &field in fields {
        if let Some(index) = lattice.field(field).iter().position(|v| !v.is_finite()) {
            return Err(ExtractionError::NonFiniteScalar {
                field: field.name(),
                index,
            });
        }
    }
    Ok(())
}

/// Tetrahedra of every cell, as lattice point ids.
fn tetrahedra(lattice: &Lattice) -> impl Iterator<Item = [usize; 4]> + '_ {
    lattice.cells().flat_map(move |(i, j, k)| {
        let corners = lattice.cell_corners(i, j, k);
        KUHN_TETS.map(|tet| tet.map(|corner| corners[corner]))
    })
}

/// Longest edge of a tetrahedron, cubed; scale for flatness tests.
fn tet_scale(points: &[Point3<Real>; 4]) -> Real {
    let mut longest: Real = 0.0;
    for a in 0..4 {
        for b in a + 1..4 {
            longest = longest.max((points[a] - points[b]).norm());
        }
    }
    longest * longest * longest
}

/// Faces keyed by vertex set, in insertion order.
#[derive(Default)]
struct FaceCounter {
    faces: Vec<(Vec<usize>, Vec<usize>)>,
    counts: HashMap<Vec<usize>, u32>,
}

impl FaceCounter {
    fn add(&mut self, face: Vec<usize>) {
        let key = face_key(&face);
        let count = self.counts.entry(key.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            self.faces.push((key, face));
        }
    }

    /// Faces seen exactly once.
    fn unique(self) -> Vec<Vec<usize>> {
        let counts = self.counts;
        self.faces
            .into_iter()
            .filter(|(key, _)| counts.get(key) == Some(&1))
            .map(|(_, face)| face)
            .collect()
    }
}

/// Merge points closer than `tol`. Returns the welded positions and
/// attribute values plus the pool id -> welded index map.
fn weld(
    pool: &VertexPool<'_>,
    faces: &[Vec<usize>],
    tol: Real,
) -> (Vec<Point3<Real>>, Vec<Real>, HashMap<usize, usize>) {
    let quantize = |p: &Point3<Real>| -> [i64; 3] {
        [p.x, p.y, p.z].map(|c| (c / tol).floor() as i64)
    };

    let mut points: Vec<Point3<Real>> = Vec::new();
    let mut surface: Vec<Real> = Vec::new();
    let mut grid: HashMap<[i64; 3], Vec<usize>> = HashMap::new();
    let mut remap: HashMap<usize, usize> = HashMap::new();
    let tol_sq = tol * tol;

    for &id in faces.iter().flatten() {
        if remap.contains_key(&id) {
            continue;
        }
        let p = pool.position(id);
        let q = quantize(&p);

        let mut found = None;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = grid.get(&[q[0] + dx, q[1] + dy, q[2] + dz]) else {
                        continue;
                    };
                    if let Some(&hit) = bucket.iter().find(|&&w| (points[w] - p).norm_squared() <= tol_sq) {
                        found = Some(hit);
                        break 'search;
                    }
                }
            }
        }

        let welded = found.unwrap_or_else(|| {
            points.push(p);
            surface.push(pool.value(id, ScalarField::Surface));
            grid.entry(q).or_default().push(points.len() - 1);
            points.len() - 1
        });
        remap.insert(id, welded);
    }

    (points, surface, remap)
}

/// Turn pool faces into a compact triangle mesh.
///
/// `cancel_duplicates` drops every face that occurs more than once after
/// welding (solids); otherwise repeats are collapsed to one (surfaces).
fn assemble(
    pool: &VertexPool<'_>,
    faces: Vec<Vec<usize>>,
    weld_tolerance: Real,
    cancel_duplicates: bool,
) -> Result<Mesh, ExtractionError> {
    let (points, surface, remap) = weld(pool, &faces, weld_tolerance);

    let welded = faces
        .into_iter()
        .filter_map(|face| dedup_cycle(face.iter().map(|id| remap[id]).collect()));
    let faces: Vec<Vec<usize>> = if cancel_duplicates {
        let mut counter = FaceCounter::default();
        welded.for_each(|face| counter.add(face));
        counter.unique()
    } else {
        let mut seen = HashSet::new();
        welded.filter(|face| seen.insert(face_key(face))).collect()
    };

    // Compact to the points still referenced.
    let mut compact: Vec<Option<u32>> = vec![None; points.len()];
    let mut mesh_points = Vec::new();
    let mut mesh_surface = Vec::new();
    let mut triangles = Vec::new();
    for face in &faces {
        let mut ids = Vec::with_capacity(face.len());
        for &w in face {
            let id = match compact[w] {
                Some(id) => id,
                None => {
                    let id = u32::try_from(mesh_points.len())
                        .map_err(|_| ExtractionError::TooManyVertices(u32::MAX as usize))?;
                    compact[w] = Some(id);
                    mesh_points.push(points[w]);
                    mesh_surface.push(surface[w]);
                    id
                },
            };
            ids.push(id);
        }
        for pair in ids[1..].windows(2) {
            triangles.push([ids[0], pair[0], pair[1]]);
        }
    }

    Ok(Mesh::from_parts(mesh_points, triangles, mesh_surface))
}

fn weld_tolerance(lattice: &Lattice) -> Real {
    tolerance() * lattice.spacing().abs().min()
}

/// Closed boundary of the lattice region where every half-space holds.
pub(crate) fn clip_solid(lattice: &Lattice, halves: &[HalfSpace]) -> Result<Mesh, ExtractionError> {
    let mut fields: Vec<ScalarField> = halves.iter().map(|half| half.field()).collect();
    fields.push(ScalarField::Surface);
    ensure_finite(lattice, &fields)?;

    let mut pool = VertexPool::new(lattice);
    let mut counter = FaceCounter::default();
    let mut pieces = 0usize;

    for tet in tetrahedra(lattice) {
        let corners = tet.map(|id| lattice.points()[id]);
        let tet_volume = tet_signed_volume(&corners[0], &corners[1], &corners[2], &corners[3]).abs();
        if tet_volume <= FLAT_PIECE_RATIO * tet_scale(&corners) {
            continue;
        }

        let mut polytope = Polytope::tetrahedron(tet);
        for &half in halves {
            let clipped = polytope.clip(&mut pool, half);
            polytope = clipped.polytope;
            if let Some(cap) = clipped.cap {
                let key = face_key(&cap);
                if !polytope.faces.iter().any(|face| face_key(face) == key) {
                    polytope.faces.push(cap);
                }
            }
            if polytope.is_empty() {
                break;
            }
        }
        if polytope.is_empty() || polytope.volume(&pool) <= FLAT_PIECE_RATIO * tet_volume {
            continue;
        }

        polytope.orient_outward(&pool);
        pieces += 1;
        polytope.faces.into_iter().for_each(|face| counter.add(face));
    }

    let boundary = counter.unique();
    let mesh = assemble(&pool, boundary, weld_tolerance(lattice), true)?;
    debug!(
        pieces,
        cut_vertices = pool.len() - lattice.len(),
        points = mesh.point_count(),
        triangles = mesh.triangle_count(),
        "Clipped lattice"
    );
    Ok(mesh)
}

/// Zero level set of the base field by marching tetrahedra, wound so normals
/// point towards increasing field values.
pub(crate) fn marching_tetrahedra(lattice: &Lattice) -> Result<Mesh, ExtractionError> {
    ensure_finite(lattice, &[ScalarField::Surface])?;

    let half = HalfSpace::AtMost(ScalarField::Surface);
    let mut pool = VertexPool::new(lattice);
    let mut caps = Vec::new();

    for tet in tetrahedra(lattice) {
        let corners = tet.map(|id| lattice.points()[id]);
        let tet_volume = tet_signed_volume(&corners[0], &corners[1], &corners[2], &corners[3]).abs();
        if tet_volume <= FLAT_PIECE_RATIO * tet_scale(&corners) {
            continue;
        }

        let clipped = Polytope::tetrahedron(tet).clip(&mut pool, half);
        let Some(cap) = clipped.cap else {
            continue;
        };
        let mut polytope = clipped.polytope;
        if polytope.is_empty() || polytope.volume(&pool) <= FLAT_PIECE_RATIO * tet_volume {
            continue;
        }
        // Orient the cap as part of the kept piece: outward means uphill.
        polytope.faces.push(cap);
        polytope.orient_outward(&pool);
        caps.extend(polytope.faces.pop());
    }

    let mesh = assemble(&pool, caps, weld_tolerance(lattice), false)?;
    debug!(
        points = mesh.point_count(),
        triangles = mesh.triangle_count(),
        "Contoured lattice"
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::PI;
    use crate::lattice::axis_samples;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn box_lattice(resolution: usize, field: impl Fn(&Point3<Real>) -> Real) -> Lattice {
        let samples = axis_samples(&Vector3::repeat(1.0), [1, 1, 1], resolution).unwrap();
        let mut lattice = Lattice::from_axis_samples(&samples);
        let values: Vec<Real> = lattice.local_points().iter().map(&field).collect();
        lattice.set_surface(values.clone());
        lattice.set_offset_fields(values.clone(), values);
        lattice
    }

    fn ball(p: &Point3<Real>) -> Real {
        p.coords.norm_squared() - 0.35 * 0.35
    }

    #[test]
    fn test_half_space_clip_is_exact() {
        let lattice = box_lattice(12, |p| p.x - 0.1);
        let mesh = clip_solid(&lattice, &[HalfSpace::AtMost(ScalarField::LowerSurface)]).unwrap();
        assert!(mesh.is_closed());
        assert!(mesh.is_consistently_wound());
        assert_relative_eq!(mesh.volume(), 0.6, epsilon = 1e-9);

        let other = clip_solid(&lattice, &[HalfSpace::AtLeast(ScalarField::LowerSurface)]).unwrap();
        assert_relative_eq!(other.volume(), 0.4, epsilon = 1e-9);
    }

    #[test]
    fn test_clip_whole_lattice() {
        let lattice = box_lattice(5, |_| -1.0);
        let mesh = clip_solid(&lattice, &[HalfSpace::AtMost(ScalarField::LowerSurface)]).unwrap();
        assert!(mesh.is_closed());
        assert_relative_eq!(mesh.volume(), 1.0, epsilon = 1e-9);

        let none = clip_solid(&lattice, &[HalfSpace::AtLeast(ScalarField::LowerSurface)]).unwrap();
        assert!(none.is_empty());
        assert_eq!(none.point_count(), 0);
    }

    #[test]
    fn test_ball_solid_matches_contour() {
        let lattice = box_lattice(16, ball);
        let solid = clip_solid(&lattice, &[HalfSpace::AtMost(ScalarField::Surface)]).unwrap();
        let surface = marching_tetrahedra(&lattice).unwrap();

        let exact = 4.0 / 3.0 * PI * 0.35 * 0.35 * 0.35;
        assert!(solid.is_closed());
        assert!(surface.is_closed());
        assert_relative_eq!(solid.volume(), exact, max_relative = 0.05);
        // The ball lies inside the box, so its boundary is exactly the contour.
        assert_relative_eq!(solid.volume(), surface.volume(), max_relative = 1e-9);
        assert_relative_eq!(solid.surface_area(), surface.surface_area(), max_relative = 1e-9);
    }

    #[test]
    fn test_contour_attribute_is_zero() {
        let lattice = box_lattice(10, ball);
        let surface = marching_tetrahedra(&lattice).unwrap();
        let (lo, hi) = surface.scalar_range().unwrap();
        assert_relative_eq!(lo, 0.0, epsilon = 1e-12);
        assert_relative_eq!(hi, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_clip_carries_attribute() {
        let lattice = box_lattice(8, |p| p.z);
        let mesh = clip_solid(&lattice, &[HalfSpace::AtMost(ScalarField::Surface)]).unwrap();
        let values = mesh.point_data("surface").unwrap();
        for (p, &value) in mesh.points.iter().zip(values) {
            assert_relative_eq!(value, p.z, epsilon = 1e-12);
            assert!(value <= 1e-12);
        }
    }

    #[test]
    fn test_non_finite_field_is_reported() {
        let mut lattice = box_lattice(4, |p| p.x);
        let mut lower = lattice.lower_surface().to_vec();
        lower[7] = Real::NAN;
        let upper = lattice.upper_surface().to_vec();
        lattice.set_offset_fields(lower, upper);
        let err = clip_solid(&lattice, LOWER_SKELETAL).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::NonFiniteScalar {
                field: "lower_surface",
                index: 7
            }
        );
        assert!(marching_tetrahedra(&lattice).is_ok());
    }
}
