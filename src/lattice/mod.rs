//! Structured sampling lattice and the scalar fields attached to it.
//!
//! Points are stored x fastest, then y, then z: the point at lattice index
//! `(i, j, k)` lives at linear index `(k * ny + j) * nx + i`. The field
//! evaluator, the clip extractor and the surface-nets grid shape all rely on
//! this ordering.

#[cfg(feature = "surface-nets")]
pub mod shape;

#[cfg(feature = "surface-nets")]
pub use shape::GridShape;

use crate::config::Axis;
use crate::errors::ConfigError;
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};
use std::fmt::{self, Display};

/// The three named fields every lattice carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    Surface,
    LowerSurface,
    UpperSurface,
}

impl ScalarField {
    pub const fn name(self) -> &'static str {
        match self {
            ScalarField::Surface => "surface",
            ScalarField::LowerSurface => "lower_surface",
            ScalarField::UpperSurface => "upper_surface",
        }
    }
}

impl Display for ScalarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cell corner offsets, bit 0 = +x, bit 1 = +y, bit 2 = +z.
pub(crate) const CORNER_OFFSETS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [0, 1, 0],
    [1, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [0, 1, 1],
    [1, 1, 1],
];

/// Kuhn split of a cell into six tetrahedra along the 0-7 diagonal.
///
/// Every tetrahedron has positive orientation in a right-handed cell, and
/// the split conforms across neighbouring cells.
pub(crate) const KUHN_TETS: [[usize; 4]; 6] = [
    [0, 1, 3, 7],
    [0, 2, 6, 7],
    [0, 4, 5, 7],
    [0, 3, 2, 7],
    [0, 5, 1, 7],
    [0, 6, 4, 7],
];

/// `count` evenly spaced values over `[start, end]`, both ends included.
fn linspace(start: Real, end: Real, count: usize) -> Vec<Real> {
    if count == 1 {
        return vec![start];
    }
    let step = (end - start) / (count - 1) as Real;
    (0..count)
        .map(|i| if i + 1 == count { end } else { start + i as Real * step })
        .collect()
}

/// Per-axis sample positions of a lattice centred on the origin.
///
/// Axis `a` gets `resolution * repeat_cell[a]` samples spanning
/// `±0.5 * cell_size[a] * repeat_cell[a]`.
pub fn axis_samples(
    cell_size: &Vector3<Real>,
    repeat_cell: [usize; 3],
    resolution: usize,
) -> Result<[Vec<Real>; 3], ConfigError> {
    let mut samples: [Vec<Real>; 3] = Default::default();
    for axis in Axis::ALL {
        let a = axis.index();
        let count = resolution * repeat_cell[a];
        if count < 2 {
            return Err(ConfigError::TooFewSamples { axis, samples: count });
        }
        let half = 0.5 * cell_size[a] * repeat_cell[a] as Real;
        samples[a] = linspace(-half, half, count);
    }
    Ok(samples)
}

/// Sampled lattice: point positions before and after the coordinate mapping
/// and the scalar fields derived from the surface function.
#[derive(Debug, Clone)]
pub struct Lattice {
    dims: [usize; 3],
    origin: Point3<Real>,
    spacing: Vector3<Real>,
    local_points: Vec<Point3<Real>>,
    points: Vec<Point3<Real>>,
    surface: Vec<Real>,
    lower_surface: Vec<Real>,
    upper_surface: Vec<Real>,
    surface_samplings: usize,
    offset_samplings: usize,
}

impl Lattice {
    /// Outer product of the per-axis samples. Physical points start out equal
    /// to the cell-local ones and all fields are zero.
    pub fn from_axis_samples(samples: &[Vec<Real>; 3]) -> Self {
        let dims = [samples[0].len(), samples[1].len(), samples[2].len()];
        let first = |a: usize| samples[a].first().copied().unwrap_or(0.0);
        let step = |a: usize| match samples[a].as_slice() {
            [a0, a1, ..] => a1 - a0,
            _ => 0.0,
        };
        let origin = Point3::new(first(0), first(1), first(2));
        let spacing = Vector3::new(step(0), step(1), step(2));

        let mut local_points = Vec::with_capacity(dims[0] * dims[1] * dims[2]);
        for &z in &samples[2] {
            for &y in &samples[1] {
                for &x in &samples[0] {
                    local_points.push(Point3::new(x, y, z));
                }
            }
        }
        let len = local_points.len();

        Self {
            dims,
            origin,
            spacing,
            points: local_points.clone(),
            local_points,
            surface: vec![0.0; len],
            lower_surface: vec![0.0; len],
            upper_surface: vec![0.0; len],
            surface_samplings: 0,
            offset_samplings: 0,
        }
    }

    /// Sample counts `[nx, ny, nz]`.
    pub const fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Number of lattice points.
    pub fn len(&self) -> usize {
        self.local_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.local_points.is_empty()
    }

    /// Number of hexahedral cells.
    pub fn cell_count(&self) -> usize {
        self.dims.iter().map(|n| n.saturating_sub(1)).product()
    }

    /// Linear index of lattice index `(i, j, k)`.
    #[inline]
    pub const fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (k * self.dims[1] + j) * self.dims[0] + i
    }

    /// Cell-local position of the first sample.
    pub const fn origin(&self) -> Point3<Real> {
        self.origin
    }

    /// Distance between neighbouring samples along each axis, in cell-local space.
    pub const fn spacing(&self) -> Vector3<Real> {
        self.spacing
    }

    /// Sample positions before the coordinate mapping.
    pub fn local_points(&self) -> &[Point3<Real>] {
        &self.local_points
    }

    /// Sample positions in physical space.
    pub fn points(&self) -> &[Point3<Real>] {
        &self.points
    }

    pub fn surface(&self) -> &[Real] {
        &self.surface
    }

    pub fn lower_surface(&self) -> &[Real] {
        &self.lower_surface
    }

    pub fn upper_surface(&self) -> &[Real] {
        &self.upper_surface
    }

    pub fn field(&self, field: ScalarField) -> &[Real] {
        match field {
            ScalarField::Surface => &self.surface,
            ScalarField::LowerSurface => &self.lower_surface,
            ScalarField::UpperSurface => &self.upper_surface,
        }
    }

    /// How many times the base surface field has been sampled.
    pub const fn surface_samplings(&self) -> usize {
        self.surface_samplings
    }

    /// How many times the offset fields have been (re)computed.
    pub const fn offset_samplings(&self) -> usize {
        self.offset_samplings
    }

    pub(crate) fn set_points(&mut self, points: Vec<Point3<Real>>) {
        debug_assert_eq!(points.len(), self.len());
        self.points = points;
    }

    pub(crate) fn set_surface(&mut self, surface: Vec<Real>) {
        debug_assert_eq!(surface.len(), self.len());
        self.surface = surface;
        self.surface_samplings += 1;
    }

    pub(crate) fn set_offset_fields(&mut self, lower_surface: Vec<Real>, upper_surface: Vec<Real>) {
        debug_assert_eq!(lower_surface.len(), self.len());
        debug_assert_eq!(upper_surface.len(), self.len());
        self.lower_surface = lower_surface;
        self.upper_surface = upper_surface;
        self.offset_samplings += 1;
    }

    /// Linear indices of the eight corners of cell `(i, j, k)`, ordered as
    /// [`CORNER_OFFSETS`].
    #[inline]
    pub(crate) fn cell_corners(&self, i: usize, j: usize, k: usize) -> [usize; 8] {
        CORNER_OFFSETS.map(|[di, dj, dk]| self.index(i + di, j + dj, k + dk))
    }

    /// Iterate over every cell's lower corner `(i, j, k)`, x fastest.
    pub(crate) fn cells(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        let [nx, ny, nz] = self.dims.map(|n| n.saturating_sub(1));
        (0..nz).flat_map(move |k| (0..ny).flat_map(move |j| (0..nx).map(move |i| (i, j, k))))
    }

    /// Signed volume enclosed by the physical lattice, summed over the Kuhn
    /// tetrahedra of every cell. Mappings that mirror space flip the sign.
    pub fn volume(&self) -> Real {
        let mut total = 0.0;
        for (i, j, k) in self.cells() {
            let corners = self.cell_corners(i, j, k);
            for tet in KUHN_TETS {
                let [a, b, c, d] = tet.map(|corner| self.points[corners[corner]]);
                total += tet_signed_volume(&a, &b, &c, &d);
            }
        }
        total
    }

    /// Trilinear interpolation of a field at fractional lattice coordinates.
    /// Coordinates outside the lattice are clamped to it.
    pub fn interpolate(&self, field: ScalarField, at: [Real; 3]) -> Real {
        let values = self.field(field);
        let mut base = [0usize; 3];
        let mut frac: [Real; 3] = [0.0; 3];
        for a in 0..3 {
            let upper = self.dims[a].saturating_sub(1);
            let clamped = at[a].clamp(0.0, upper as Real);
            let cell = (clamped.floor() as usize).min(upper.saturating_sub(1));
            base[a] = cell;
            frac[a] = clamped - cell as Real;
        }

        let mut value = 0.0;
        for [di, dj, dk] in CORNER_OFFSETS {
            let i = (base[0] + di).min(self.dims[0] - 1);
            let j = (base[1] + dj).min(self.dims[1] - 1);
            let k = (base[2] + dk).min(self.dims[2] - 1);
            let weight = [di, dj, dk]
                .iter()
                .zip(frac)
                .map(|(&d, t)| if d == 1 { t } else { 1.0 - t })
                .product::<Real>();
            value += weight * values[self.index(i, j, k)];
        }
        value
    }
}

/// Signed volume of tetrahedron `abcd`, positive when `d` is on the side of
/// `abc` that its right-handed normal points away from.
#[inline]
pub(crate) fn tet_signed_volume(
    a: &Point3<Real>,
    b: &Point3<Real>,
    c: &Point3<Real>,
    d: &Point3<Real>,
) -> Real {
    (b - a).dot(&(c - a).cross(&(d - a))) / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_samples_span_and_count() {
        let samples =
            axis_samples(&Vector3::new(1.0, 2.0, 0.5), [2, 1, 3], 5).expect("valid lattice");
        assert_eq!(samples[0].len(), 10);
        assert_eq!(samples[1].len(), 5);
        assert_eq!(samples[2].len(), 15);
        assert_relative_eq!(samples[0][0], -1.0);
        assert_relative_eq!(samples[0][9], 1.0);
        assert_relative_eq!(samples[1][0], -1.0);
        assert_relative_eq!(samples[2][14], 0.75);
        assert_relative_eq!(samples[1][2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_axis_samples_too_few() {
        let err = axis_samples(&Vector3::repeat(1.0), [1, 1, 1], 1).unwrap_err();
        assert_eq!(err, ConfigError::TooFewSamples { axis: Axis::X, samples: 1 });
    }

    #[test]
    fn test_point_ordering_is_x_fastest() {
        let samples = axis_samples(&Vector3::repeat(1.0), [1, 1, 1], 3).unwrap();
        let lattice = Lattice::from_axis_samples(&samples);
        let p = lattice.local_points()[lattice.index(2, 1, 0)];
        assert_relative_eq!(p.x, 0.5);
        assert_relative_eq!(p.y, 0.0);
        assert_relative_eq!(p.z, -0.5);
        assert_eq!(lattice.index(1, 0, 0), 1);
        assert_eq!(lattice.index(0, 1, 0), 3);
        assert_eq!(lattice.index(0, 0, 1), 9);
        assert_eq!(lattice.cell_count(), 8);
    }

    #[test]
    fn test_kuhn_tets_fill_the_cell() {
        let unit = CORNER_OFFSETS.map(|[x, y, z]| Point3::new(x as Real, y as Real, z as Real));
        let mut total = 0.0;
        for tet in KUHN_TETS {
            let [a, b, c, d] = tet.map(|corner| unit[corner]);
            let volume = tet_signed_volume(&a, &b, &c, &d);
            assert!(volume > 0.0);
            total += volume;
        }
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_planar_lattice_volume_is_box_volume() {
        let samples = axis_samples(&Vector3::new(1.0, 2.0, 3.0), [2, 1, 1], 4).unwrap();
        let lattice = Lattice::from_axis_samples(&samples);
        assert_relative_eq!(lattice.volume(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_interpolate_is_exact_for_linear_fields() {
        let samples = axis_samples(&Vector3::repeat(1.0), [1, 1, 1], 4).unwrap();
        let mut lattice = Lattice::from_axis_samples(&samples);
        let field = lattice
            .local_points()
            .iter()
            .map(|p| 2.0 * p.x - p.y + 0.5 * p.z)
            .collect();
        lattice.set_surface(field);

        let at = [1.5, 0.25, 2.0];
        let p = lattice.origin() + lattice.spacing().component_mul(&Vector3::from(at));
        let expected = 2.0 * p.x - p.y + 0.5 * p.z;
        assert_relative_eq!(lattice.interpolate(ScalarField::Surface, at), expected, epsilon = 1e-12);
        assert_eq!(lattice.surface_samplings(), 1);
    }
}
