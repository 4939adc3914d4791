//! Lattice shape as seen by the surface-nets backend

use super::Lattice;

/// Sample counts of a [`Lattice`], with the same x-fastest linearization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub nx: u32,
    pub ny: u32,
    pub nz: u32,
}

impl GridShape {
    /// `None` when the lattice has more points than `u32` can index.
    pub fn of(lattice: &Lattice) -> Option<Self> {
        let [nx, ny, nz] = lattice.dims();
        let len = u32::try_from(lattice.len()).ok()?;
        let shape = Self {
            nx: u32::try_from(nx).ok()?,
            ny: u32::try_from(ny).ok()?,
            nz: u32::try_from(nz).ok()?,
        };
        (len == shape.nx * shape.ny * shape.nz).then_some(shape)
    }
}

impl fast_surface_nets::ndshape::Shape<3> for GridShape {
    type Coord = u32;

    #[inline]
    fn as_array(&self) -> [Self::Coord; 3] {
        [self.nx, self.ny, self.nz]
    }

    fn size(&self) -> Self::Coord {
        self.nx * self.ny * self.nz
    }

    fn usize(&self) -> usize {
        self.size() as usize
    }

    fn linearize(&self, coords: [Self::Coord; 3]) -> u32 {
        let [x, y, z] = coords;
        (z * self.ny + y) * self.nx + x
    }

    fn delinearize(&self, i: u32) -> [Self::Coord; 3] {
        let x = i % self.nx;
        let yz = i / self.nx;
        [x, yz % self.ny, yz / self.ny]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::axis_samples;
    use fast_surface_nets::ndshape::Shape;
    use nalgebra::Vector3;

    #[test]
    fn test_linearize_matches_lattice_index() {
        let samples = axis_samples(&Vector3::repeat(1.0), [2, 1, 1], 3).unwrap();
        let lattice = Lattice::from_axis_samples(&samples);
        let shape = GridShape::of(&lattice).unwrap();
        assert_eq!(shape.as_array(), [6, 3, 3]);
        assert_eq!(shape.linearize([4, 2, 1]) as usize, lattice.index(4, 2, 1));
        assert_eq!(shape.delinearize(shape.linearize([4, 2, 1])), [4, 2, 1]);
        assert_eq!(shape.usize(), lattice.len());
    }
}
