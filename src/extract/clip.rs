//! Half-space clipping of convex polytopes built on the lattice.
//!
//! Vertex ids below `lattice.len()` are lattice points; higher ids are cut
//! vertices created on the edge between two existing vertices. Cut vertices
//! are keyed by their parent edge and the field that cut it, so two cells
//! clipping the same edge share one vertex.

use crate::float_types::Real;
use crate::lattice::{Lattice, ScalarField};
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

/// Which side of a field's zero level set survives a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HalfSpace {
    /// Keep `field >= 0`
    AtLeast(ScalarField),
    /// Keep `field <= 0`
    AtMost(ScalarField),
}

impl HalfSpace {
    pub(crate) const fn field(self) -> ScalarField {
        match self {
            HalfSpace::AtLeast(field) | HalfSpace::AtMost(field) => field,
        }
    }

    /// Value that is non-negative on the kept side.
    #[inline]
    const fn signed(self, value: Real) -> Real {
        match self {
            HalfSpace::AtLeast(_) => value,
            HalfSpace::AtMost(_) => -value,
        }
    }
}

#[inline]
const fn slot(field: ScalarField) -> usize {
    match field {
        ScalarField::Surface => 0,
        ScalarField::LowerSurface => 1,
        ScalarField::UpperSurface => 2,
    }
}

#[derive(Debug, Clone, Copy)]
struct CutVertex {
    position: Point3<Real>,
    fields: [Real; 3],
}

/// Lattice points plus every cut vertex created so far.
pub(crate) struct VertexPool<'a> {
    lattice: &'a Lattice,
    cuts: Vec<CutVertex>,
    by_edge: HashMap<(usize, usize, u8), usize>,
}

impl<'a> VertexPool<'a> {
    pub(crate) fn new(lattice: &'a Lattice) -> Self {
        Self {
            lattice,
            cuts: Vec::new(),
            by_edge: HashMap::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lattice.len() + self.cuts.len()
    }

    #[inline]
    pub(crate) fn position(&self, id: usize) -> Point3<Real> {
        match id.checked_sub(self.lattice.len()) {
            None => self.lattice.points()[id],
            Some(cut) => self.cuts[cut].position,
        }
    }

    #[inline]
    pub(crate) fn value(&self, id: usize, field: ScalarField) -> Real {
        match id.checked_sub(self.lattice.len()) {
            None => self.lattice.field(field)[id],
            Some(cut) => self.cuts[cut].fields[slot(field)],
        }
    }

    /// Vertex where `field` crosses zero on edge `ab`.
    ///
    /// The endpoints must straddle zero. An endpoint that is exactly zero is
    /// returned as is.
    fn cut(&mut self, a: usize, b: usize, field: ScalarField) -> usize {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let v_lo = self.value(lo, field);
        let v_hi = self.value(hi, field);
        if v_lo == 0.0 {
            return lo;
        }
        if v_hi == 0.0 {
            return hi;
        }

        let key = (lo, hi, slot(field) as u8);
        if let Some(&id) = self.by_edge.get(&key) {
            return id;
        }

        let t = v_lo / (v_lo - v_hi);
        let p_lo = self.position(lo);
        let p_hi = self.position(hi);
        let mut fields = [ScalarField::Surface, ScalarField::LowerSurface, ScalarField::UpperSurface]
            .map(|f| {
                let from = self.value(lo, f);
                from + t * (self.value(hi, f) - from)
            });
        fields[slot(field)] = 0.0;

        let id = self.len();
        self.cuts.push(CutVertex {
            position: p_lo + (p_hi - p_lo) * t,
            fields,
        });
        self.by_edge.insert(key, id);
        id
    }
}

/// Convex polytope as a list of faces; face winding is arbitrary until
/// [`Polytope::orient_outward`].
#[derive(Debug, Clone, Default)]
pub(crate) struct Polytope {
    pub(crate) faces: Vec<Vec<usize>>,
}

/// Outcome of one clip: surviving faces and the ordered cut face, if the
/// plane crossed the interior.
pub(crate) struct Clipped {
    pub(crate) polytope: Polytope,
    pub(crate) cap: Option<Vec<usize>>,
}

/// Sorted vertex ids; equal for two faces over the same vertices.
pub(crate) fn face_key(face: &[usize]) -> Vec<usize> {
    let mut key = face.to_vec();
    key.sort_unstable();
    key
}

/// Drop consecutive repeats, including across the wrap. `None` when fewer
/// than three vertices are left.
pub(crate) fn dedup_cycle<T: PartialEq>(mut face: Vec<T>) -> Option<Vec<T>> {
    face.dedup();
    while face.len() > 1 && face.first() == face.last() {
        face.pop();
    }
    (face.len() >= 3).then_some(face)
}

impl Polytope {
    pub(crate) fn tetrahedron(ids: [usize; 4]) -> Self {
        let [a, b, c, d] = ids;
        Self {
            faces: vec![vec![a, b, c], vec![a, b, d], vec![a, c, d], vec![b, c, d]],
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Unique vertex ids in order of first appearance.
    fn vertices(&self) -> Vec<usize> {
        let mut seen = Vec::new();
        for &id in self.faces.iter().flatten() {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }

    fn centroid(&self, pool: &VertexPool<'_>) -> Point3<Real> {
        let vertices = self.vertices();
        let sum = vertices
            .iter()
            .fold(Vector3::zeros(), |acc, &id| acc + pool.position(id).coords);
        Point3::from(sum / vertices.len().max(1) as Real)
    }

    /// Clip against one half-space, Sutherland-Hodgman style per face.
    pub(crate) fn clip(self, pool: &mut VertexPool<'_>, half: HalfSpace) -> Clipped {
        let field = half.field();
        let mut faces = Vec::with_capacity(self.faces.len() + 1);

        for face in self.faces {
            let n = face.len();
            let mut out = Vec::with_capacity(n + 2);
            for i in 0..n {
                let a = face[i];
                let b = face[(i + 1) % n];
                let a_in = half.signed(pool.value(a, field)) >= 0.0;
                let b_in = half.signed(pool.value(b, field)) >= 0.0;
                if a_in {
                    out.push(a);
                }
                if a_in != b_in {
                    out.push(pool.cut(a, b, field));
                }
            }
            if let Some(out) = dedup_cycle(out) {
                faces.push(out);
            }
        }

        let polytope = Polytope { faces };
        let on_plane: Vec<usize> = polytope
            .vertices()
            .into_iter()
            .filter(|&id| pool.value(id, field) == 0.0)
            .collect();
        let cap = order_around_centroid(pool, on_plane);
        Clipped { polytope, cap }
    }

    /// Wind every face counter-clockwise seen from outside.
    pub(crate) fn orient_outward(&mut self, pool: &VertexPool<'_>) {
        let center = self.centroid(pool);
        for face in &mut self.faces {
            let normal = newell_normal(pool, face);
            let face_center = face
                .iter()
                .fold(Vector3::zeros(), |acc, &id| acc + pool.position(id).coords)
                / face.len() as Real;
            if normal.dot(&(face_center - center.coords)) < 0.0 {
                face.reverse();
            }
        }
    }

    /// Unsigned volume, from fans around the centroid.
    pub(crate) fn volume(&self, pool: &VertexPool<'_>) -> Real {
        let center = self.centroid(pool);
        let mut total = 0.0;
        for face in &self.faces {
            let p0 = pool.position(face[0]);
            for pair in face[1..].windows(2) {
                let p1 = pool.position(pair[0]);
                let p2 = pool.position(pair[1]);
                total += crate::lattice::tet_signed_volume(&center, &p0, &p1, &p2).abs();
            }
        }
        total
    }
}

/// Newell's method; robust for slightly non-planar polygons.
pub(crate) fn newell_normal(pool: &VertexPool<'_>, face: &[usize]) -> Vector3<Real> {
    let n = face.len();
    (0..n).fold(Vector3::zeros(), |acc, i| {
        let a = pool.position(face[i]);
        let b = pool.position(face[(i + 1) % n]);
        acc + a.coords.cross(&b.coords)
    })
}

/// Order coplanar vertices by angle around their centroid. `None` when fewer
/// than three or all collinear.
fn order_around_centroid(pool: &VertexPool<'_>, ids: Vec<usize>) -> Option<Vec<usize>> {
    if ids.len() < 3 {
        return None;
    }
    let points: Vec<Point3<Real>> = ids.iter().map(|&id| pool.position(id)).collect();
    let center = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / points.len() as Real;
    let center = Point3::from(center);

    let u = points
        .iter()
        .map(|p| p - center)
        .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))?;
    let normal = points
        .iter()
        .map(|p| u.cross(&(p - center)))
        .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))?;
    if normal.norm_squared() <= Real::EPSILON * u.norm_squared() * u.norm_squared() {
        return None;
    }
    let v = normal.cross(&u);

    let mut ordered: Vec<(Real, usize)> = ids
        .into_iter()
        .zip(&points)
        .map(|(id, p)| {
            let d = p - center;
            (d.dot(&v).atan2(d.dot(&u)), id)
        })
        .collect();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));
    Some(ordered.into_iter().map(|(_, id)| id).collect())
}
