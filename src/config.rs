//! Generation parameters.
//!
//! A [`TpmsConfig`] is built once per generation run and never mutated by the
//! generator, apart from angular repeat counts that a
//! [`CoordinateMapping`](crate::mapping::CoordinateMapping) fits to close a
//! revolution.
//!
//! ```
//! use tpms::{Part, TpmsConfig};
//!
//! let config = TpmsConfig::default()
//!     .with_part(Part::UpperSkeletal)
//!     .with_surface("schwarzP")
//!     .with_resolution(12)
//!     .with_offset(0.5);
//! assert_eq!(config.repeat_cell, [1, 1, 1]);
//! ```

use crate::errors::ConfigError;
use crate::float_types::Real;
use crate::surfaces::{self, SurfaceFn};
use nalgebra::{Point3, Vector3};
use std::fmt::{self, Debug, Display};
use std::str::FromStr;
use std::sync::Arc;

/// Below this many samples per cell high-frequency surfaces alias.
pub const RECOMMENDED_MIN_RESOLUTION: usize = 10;

/// Which derived geometry a generator reports as its main mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Part {
    /// Shell between the two offset surfaces
    #[default]
    Sheet,
    /// Solid on the `lower_surface <= 0` side
    LowerSkeletal,
    /// Solid on the `upper_surface >= 0` side
    UpperSkeletal,
    /// Both skeletal solids, appended
    Skeletals,
    /// Zero level set of the base field
    Surface,
}

impl Part {
    pub const ALL: [Part; 5] = [
        Part::Sheet,
        Part::LowerSkeletal,
        Part::UpperSkeletal,
        Part::Skeletals,
        Part::Surface,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Part::Sheet => "sheet",
            Part::LowerSkeletal => "lower_skeletal",
            Part::UpperSkeletal => "upper_skeletal",
            Part::Skeletals => "skeletals",
            Part::Surface => "surface",
        }
    }
}

impl Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Part {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Part::ALL
            .into_iter()
            .find(|part| part.name() == s)
            .ok_or_else(|| ConfigError::UnknownPart(s.to_string()))
    }
}

/// A lattice axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    const fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Permutation applied to the surface arguments before evaluation.
///
/// `Yxz` feeds the Y argument where the surface function expects X, the X
/// argument where it expects Y, and leaves Z in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisSwap {
    #[default]
    Xyz,
    Xzy,
    Yxz,
    Yzx,
    Zxy,
    Zyx,
}

impl AxisSwap {
    pub const ALL: [AxisSwap; 6] = [
        AxisSwap::Xyz,
        AxisSwap::Xzy,
        AxisSwap::Yxz,
        AxisSwap::Yzx,
        AxisSwap::Zxy,
        AxisSwap::Zyx,
    ];

    /// Source axis for each surface argument slot.
    pub const fn order(self) -> [Axis; 3] {
        use Axis::*;
        match self {
            AxisSwap::Xyz => [X, Y, Z],
            AxisSwap::Xzy => [X, Z, Y],
            AxisSwap::Yxz => [Y, X, Z],
            AxisSwap::Yzx => [Y, Z, X],
            AxisSwap::Zxy => [Z, X, Y],
            AxisSwap::Zyx => [Z, Y, X],
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AxisSwap::Xyz => "XYZ",
            AxisSwap::Xzy => "XZY",
            AxisSwap::Yxz => "YXZ",
            AxisSwap::Yzx => "YZX",
            AxisSwap::Zxy => "ZXY",
            AxisSwap::Zyx => "ZYX",
        }
    }

    /// Reorder per-axis arguments into surface argument slots.
    #[inline]
    pub fn apply(self, args: [Real; 3]) -> [Real; 3] {
        self.order().map(|axis| args[axis.index()])
    }
}

impl Display for AxisSwap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AxisSwap {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AxisSwap::ALL
            .into_iter()
            .find(|swap| swap.name() == s)
            .ok_or_else(|| ConfigError::InvalidAxisSwap(s.to_string()))
    }
}

/// Per-point shell thickness, evaluated at physical positions.
pub type ThicknessFn = dyn Fn(&Point3<Real>) -> Real + Send + Sync;

/// Shell thickness: one value for the whole lattice, or a function of position.
#[derive(Clone)]
pub enum Offset {
    Uniform(Real),
    Field(Arc<ThicknessFn>),
}

impl Offset {
    /// Wrap a closure as a field-valued thickness.
    pub fn field<F>(thickness: F) -> Self
    where
        F: Fn(&Point3<Real>) -> Real + Send + Sync + 'static,
    {
        Offset::Field(Arc::new(thickness))
    }
}

impl Default for Offset {
    fn default() -> Self {
        Offset::Uniform(0.3)
    }
}

impl From<Real> for Offset {
    fn from(thickness: Real) -> Self {
        Offset::Uniform(thickness)
    }
}

impl Debug for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Uniform(thickness) => f.debug_tuple("Uniform").field(thickness).finish(),
            Offset::Field(_) => f.write_str("Field(..)"),
        }
    }
}

/// Iso-contouring backend for [`Part::Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContourMethod {
    /// Cut faces of the lattice tetrahedra; vertices lie on lattice edges
    #[default]
    MarchingTetrahedra,
    /// Dual contouring with one vertex per crossed cell
    #[cfg(feature = "surface-nets")]
    SurfaceNets,
}

/// Everything a generation run needs, apart from the coordinate mapping.
#[derive(Debug, Clone)]
pub struct TpmsConfig {
    /// Part reported by [`Tpms::mesh`](crate::Tpms::mesh)
    pub part: Part,
    /// Catalog name, see [`surfaces::names`]
    pub surface: String,
    pub axis_swap: AxisSwap,
    /// Size of one unit cell along each axis
    pub cell_size: Vector3<Real>,
    /// Cells per axis. Zero on an angular axis means "close the revolution".
    pub repeat_cell: [usize; 3],
    /// Samples per cell along each axis
    pub resolution: usize,
    pub offset: Offset,
    pub phase_shift: Vector3<Real>,
    pub contour: ContourMethod,
}

impl Default for TpmsConfig {
    fn default() -> Self {
        Self {
            part: Part::Sheet,
            surface: "gyroid".to_string(),
            axis_swap: AxisSwap::Xyz,
            cell_size: Vector3::new(1.0, 1.0, 1.0),
            repeat_cell: [1, 1, 1],
            resolution: 20,
            offset: Offset::default(),
            phase_shift: Vector3::zeros(),
            contour: ContourMethod::default(),
        }
    }
}

impl TpmsConfig {
    pub fn with_part(mut self, part: Part) -> Self {
        self.part = part;
        self
    }

    pub fn with_surface(mut self, surface: impl Into<String>) -> Self {
        self.surface = surface.into();
        self
    }

    pub const fn with_axis_swap(mut self, axis_swap: AxisSwap) -> Self {
        self.axis_swap = axis_swap;
        self
    }

    pub fn with_cell_size(mut self, cell_size: impl Into<Vector3<Real>>) -> Self {
        self.cell_size = cell_size.into();
        self
    }

    /// Same cell size along every axis.
    pub fn with_uniform_cell_size(self, cell_size: Real) -> Self {
        self.with_cell_size(Vector3::repeat(cell_size))
    }

    pub const fn with_repeat_cell(mut self, repeat_cell: [usize; 3]) -> Self {
        self.repeat_cell = repeat_cell;
        self
    }

    pub const fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_offset(mut self, offset: impl Into<Offset>) -> Self {
        self.offset = offset.into();
        self
    }

    pub fn with_phase_shift(mut self, phase_shift: impl Into<Vector3<Real>>) -> Self {
        self.phase_shift = phase_shift.into();
        self
    }

    pub const fn with_contour(mut self, contour: ContourMethod) -> Self {
        self.contour = contour;
        self
    }

    /// Validate everything that does not depend on the coordinate mapping and
    /// resolve the surface function.
    pub(crate) fn validate(&self) -> Result<SurfaceFn, ConfigError> {
        for axis in Axis::ALL {
            let value = self.cell_size[axis.index()];
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidCellSize { axis, value });
            }
            let value = self.phase_shift[axis.index()];
            if !value.is_finite() {
                return Err(ConfigError::InvalidPhaseShift { axis, value });
            }
        }
        if self.resolution == 0 {
            return Err(ConfigError::InvalidResolution(self.resolution));
        }
        if let Offset::Uniform(thickness) = self.offset {
            if !thickness.is_finite() {
                return Err(ConfigError::InvalidThickness(thickness));
            }
        }
        surfaces::lookup(&self.surface)
            .ok_or_else(|| ConfigError::UnknownSurface(self.surface.clone()))
    }

    /// Validate repeat counts once the mapping had a chance to fill them in.
    pub(crate) fn validate_repeat(&self) -> Result<(), ConfigError> {
        for axis in Axis::ALL {
            let value = self.repeat_cell[axis.index()];
            if value == 0 {
                return Err(ConfigError::InvalidRepeat { axis, value });
            }
            let samples = value * self.resolution;
            if samples < 2 {
                return Err(ConfigError::TooFewSamples { axis, samples });
            }
        }
        Ok(())
    }
}
