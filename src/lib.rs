//! **Triply periodic minimal surface (TPMS)** lattices.
//!
//! A periodic scalar field from a fixed [catalog](surfaces) is sampled on a
//! structured lattice, optionally wrapped onto a cylinder or a sphere, and
//! clipped into a thin *sheet*, two *skeletal* solids, or contoured into the
//! bare zero-level *surface*. The relative density of the selected part is
//! its volume over the volume of the periodic domain.
//!
//! ```
//! use tpms::{Cylindrical, Part, Tpms, TpmsConfig};
//!
//! let config = TpmsConfig::default()
//!     .with_part(Part::Sheet)
//!     .with_surface("gyroid")
//!     .with_resolution(10)
//!     .with_repeat_cell([1, 0, 1]);
//! let tube = Tpms::with_mapping(config, Cylindrical::new(1.0)?)?;
//! assert_eq!(tube.config().repeat_cell[1], 6);
//! assert!(!tube.sheet()?.is_empty());
//! # Ok::<(), tpms::errors::TpmsError>(())
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` export
//! - **surface-nets**: dual contouring of the `surface` part using [fast-surface-nets](https://crates.io/crates/fast-surface-nets)
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for lattice mapping and field sampling

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod config;
pub mod errors;
mod extract;
pub mod field;
pub mod float_types;
mod io;
pub mod lattice;
pub mod mapping;
pub mod mesh;
pub mod surfaces;
pub mod tpms;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use config::{AxisSwap, ContourMethod, Offset, Part, TpmsConfig};
pub use errors::{ConfigError, ExtractionError, TpmsError};
pub use mapping::{CoordinateMapping, Cylindrical, Planar, Spherical, TwistedCylindrical};
pub use mesh::Mesh;
pub use tpms::Tpms;
