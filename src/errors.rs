//! Configuration and extraction errors

use crate::config::{Axis, Part};
use crate::float_types::{Real, parry3d::shape::TriMeshBuilderError};
use thiserror::Error;

/// Caller mistakes, detected eagerly while building a [`Tpms`](crate::Tpms).
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The surface name is not in the catalog
    #[error("unknown surface '{0}'")]
    UnknownSurface(String),

    /// The part name is not one of `sheet`, `lower_skeletal`, `upper_skeletal`, `skeletals`, `surface`
    #[error("unknown part '{0}'")]
    UnknownPart(String),

    /// The axis swap is not a permutation of "XYZ"
    #[error("axis swap must be a permutation of 'XYZ', got '{0}'")]
    InvalidAxisSwap(String),

    /// A cell size component is zero, negative or not finite
    #[error("cell size along {axis} must be positive and finite, got {value}")]
    InvalidCellSize {
        /// Offending axis.
        axis: Axis,
        /// Offending value.
        value: Real,
    },

    /// Zero samples per cell
    #[error("resolution must be at least 1, got {0}")]
    InvalidResolution(usize),

    /// A repeat count is zero on an axis that cannot be auto-filled
    #[error("repeat count along {axis} must be at least 1, got {value}")]
    InvalidRepeat {
        /// Offending axis.
        axis: Axis,
        /// Offending value.
        value: usize,
    },

    /// `resolution * repeat` leaves fewer than two samples on an axis
    #[error("lattice needs at least 2 samples along {axis}, got {samples}")]
    TooFewSamples {
        /// Offending axis.
        axis: Axis,
        /// Number of samples the configuration would produce.
        samples: usize,
    },

    /// Cylinder or sphere radius is zero, negative or not finite
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(Real),

    /// Twist rate is not finite
    #[error("twist rate must be finite, got {0}")]
    InvalidTwistRate(Real),

    /// A phase shift component is not finite
    #[error("phase shift along {axis} must be finite, got {value}")]
    InvalidPhaseShift {
        /// Offending axis.
        axis: Axis,
        /// Offending value.
        value: Real,
    },

    /// The uniform shell thickness is not finite
    #[error("shell thickness must be finite, got {0}")]
    InvalidThickness(Real),
}

/// Failures of the clip / contour pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ExtractionError {
    /// A lattice field holds NaN or an infinity (usually a field-valued offset)
    #[error("field '{field}' is not finite at lattice point {index}")]
    NonFiniteScalar {
        /// Name of the lattice field.
        field: &'static str,
        /// Linear lattice index of the first bad sample.
        index: usize,
    },

    /// Vertex ids are 32 bit; the lattice produced more vertices than that
    #[error("extraction produced more than {0} vertices")]
    TooManyVertices(usize),
}

/// Everything the generator can report.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TpmsError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A derived part failed to extract; other parts stay usable
    #[error("failed to extract {part}: {source}")]
    Extraction {
        /// The part being extracted.
        part: Part,
        /// Underlying failure.
        #[source]
        source: ExtractionError,
    },

    /// Indicates an inconsistency while building a Parry triangle mesh
    #[error(transparent)]
    TriMesh(#[from] TriMeshBuilderError),
}
