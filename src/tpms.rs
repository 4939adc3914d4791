//! The generator: one sampled lattice and the parts derived from it.

use crate::config::{ContourMethod, Offset, Part, RECOMMENDED_MIN_RESOLUTION, TpmsConfig};
use crate::errors::{ConfigError, ExtractionError, TpmsError};
use crate::extract;
use crate::field::{self, FieldOps};
use crate::float_types::Real;
use crate::lattice::{Lattice, axis_samples};
use crate::mapping::{CoordinateMapping, Planar};
use crate::mesh::Mesh;
use std::sync::OnceLock;
use tracing::{info, warn};

/// Memoized parts. A failed extraction is cached too, so every call for
/// that part reports the same error.
#[derive(Debug, Clone, Default)]
struct PartCache {
    sheet: OnceLock<Result<Mesh, ExtractionError>>,
    lower_skeletal: OnceLock<Result<Mesh, ExtractionError>>,
    upper_skeletal: OnceLock<Result<Mesh, ExtractionError>>,
    surface: OnceLock<Result<Mesh, ExtractionError>>,
    skeletals: OnceLock<Mesh>,
    relative_density: OnceLock<Real>,
}

/// Triply periodic minimal surface lattice.
///
/// Construction validates the configuration, fits the mapping and samples
/// every field; parts are extracted on first access and cached.
///
/// ```
/// use tpms::{Tpms, TpmsConfig};
///
/// let tpms = Tpms::new(TpmsConfig::default().with_resolution(10))?;
/// let density = tpms.relative_density()?;
/// assert!(density > 0.0 && density < 1.0);
/// # Ok::<(), tpms::errors::TpmsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Tpms<M: CoordinateMapping = Planar> {
    config: TpmsConfig,
    mapping: M,
    lattice: Lattice,
    parts: PartCache,
}

impl Tpms<Planar> {
    /// Generator on the planar (identity) mapping.
    pub fn new(config: TpmsConfig) -> Result<Self, TpmsError> {
        Self::with_mapping(config, Planar::new())
    }
}

fn sample_offset<O: FieldOps>(ops: &O, lattice: &mut Lattice, offset: &Offset) {
    let thickness = ops.sample_thickness(lattice.points(), offset);
    let (lower, upper) = field::offset_fields(lattice.surface(), &thickness);
    lattice.set_offset_fields(lower, upper);
}

impl<M: CoordinateMapping> Tpms<M> {
    /// Generator on any coordinate mapping.
    ///
    /// Angular repeat counts in `config` may be rewritten by the mapping; the
    /// stored [`config`](Self::config) holds the counts actually used.
    pub fn with_mapping(mut config: TpmsConfig, mut mapping: M) -> Result<Self, TpmsError> {
        let surface_fn = config.validate()?;
        mapping.fit(&config.cell_size, &mut config.repeat_cell)?;
        config.validate_repeat()?;
        if config.resolution < RECOMMENDED_MIN_RESOLUTION {
            warn!(
                resolution = config.resolution,
                recommended = RECOMMENDED_MIN_RESOLUTION,
                "Low resolution, the surface may alias"
            );
        }

        let samples = axis_samples(&config.cell_size, config.repeat_cell, config.resolution)?;
        let mut lattice = Lattice::from_axis_samples(&samples);

        let ops = field::default_ops();
        let points = ops.map_points(lattice.local_points(), &mapping);
        lattice.set_points(points);
        let surface = ops.sample_surface(
            lattice.local_points(),
            surface_fn,
            config.axis_swap,
            &config.cell_size,
            &config.phase_shift,
        );
        lattice.set_surface(surface);
        sample_offset(&ops, &mut lattice, &config.offset);

        info!(
            surface = %config.surface,
            part = %config.part,
            swap = %config.axis_swap,
            dims = ?lattice.dims(),
            repeat = ?config.repeat_cell,
            "Sampled TPMS lattice"
        );

        Ok(Self {
            config,
            mapping,
            lattice,
            parts: PartCache::default(),
        })
    }

    /// Same lattice with a different shell thickness. Only the two offset
    /// fields are recomputed; the base field is reused as is.
    pub fn with_offset(&self, offset: impl Into<Offset>) -> Result<Self, TpmsError> {
        let offset = offset.into();
        if let Offset::Uniform(thickness) = offset {
            if !thickness.is_finite() {
                return Err(ConfigError::InvalidThickness(thickness).into());
            }
        }

        let mut lattice = self.lattice.clone();
        sample_offset(&field::default_ops(), &mut lattice, &offset);
        Ok(Self {
            config: self.config.clone().with_offset(offset),
            mapping: self.mapping.clone(),
            lattice,
            parts: PartCache::default(),
        })
    }

    pub const fn config(&self) -> &TpmsConfig {
        &self.config
    }

    pub const fn mapping(&self) -> &M {
        &self.mapping
    }

    pub const fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    fn cached<'a>(
        part: Part,
        cell: &'a OnceLock<Result<Mesh, ExtractionError>>,
        extract: impl FnOnce() -> Result<Mesh, ExtractionError>,
    ) -> Result<&'a Mesh, TpmsError> {
        cell.get_or_init(extract)
            .as_ref()
            .map_err(|source| TpmsError::Extraction {
                part,
                source: source.clone(),
            })
    }

    /// Shell between the two offset surfaces.
    pub fn sheet(&self) -> Result<&Mesh, TpmsError> {
        Self::cached(Part::Sheet, &self.parts.sheet, || {
            extract::clip_solid(&self.lattice, extract::SHEET)
        })
    }

    /// Solid where `lower_surface <= 0`.
    pub fn lower_skeletal(&self) -> Result<&Mesh, TpmsError> {
        Self::cached(Part::LowerSkeletal, &self.parts.lower_skeletal, || {
            extract::clip_solid(&self.lattice, extract::LOWER_SKELETAL)
        })
    }

    /// Solid where `upper_surface >= 0`.
    pub fn upper_skeletal(&self) -> Result<&Mesh, TpmsError> {
        Self::cached(Part::UpperSkeletal, &self.parts.upper_skeletal, || {
            extract::clip_solid(&self.lattice, extract::UPPER_SKELETAL)
        })
    }

    /// Lower then upper skeletal, appended without merging points.
    pub fn skeletals(&self) -> Result<&Mesh, TpmsError> {
        if let Some(mesh) = self.parts.skeletals.get() {
            return Ok(mesh);
        }
        let mesh = self
            .lower_skeletal()?
            .concat(self.upper_skeletal()?)
            .map_err(|source| TpmsError::Extraction {
                part: Part::Skeletals,
                source,
            })?;
        Ok(self.parts.skeletals.get_or_init(|| mesh))
    }

    /// Zero level set of the base field.
    pub fn surface(&self) -> Result<&Mesh, TpmsError> {
        Self::cached(Part::Surface, &self.parts.surface, || match self.config.contour {
            ContourMethod::MarchingTetrahedra => extract::marching_tetrahedra(&self.lattice),
            #[cfg(feature = "surface-nets")]
            ContourMethod::SurfaceNets => extract::surface_nets(&self.lattice, &self.mapping),
        })
    }

    /// Part selected by [`TpmsConfig::part`].
    pub fn mesh(&self) -> Result<&Mesh, TpmsError> {
        self.part(self.config.part)
    }

    pub fn part(&self, part: Part) -> Result<&Mesh, TpmsError> {
        match part {
            Part::Sheet => self.sheet(),
            Part::LowerSkeletal => self.lower_skeletal(),
            Part::UpperSkeletal => self.upper_skeletal(),
            Part::Skeletals => self.skeletals(),
            Part::Surface => self.surface(),
        }
    }

    /// Volume of the configured part over the volume of the domain it tiles.
    pub fn relative_density(&self) -> Result<Real, TpmsError> {
        if let Some(&density) = self.parts.relative_density.get() {
            return Ok(density);
        }
        let density = self.mesh()?.volume() / self.mapping.domain_volume(&self.lattice);
        Ok(*self.parts.relative_density.get_or_init(|| density))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Cylindrical;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_generator_is_send_sync() {
        assert_send_sync::<Tpms>();
        assert_send_sync::<Tpms<Cylindrical>>();
    }

    #[test]
    fn test_mapping_rewrites_repeat() {
        let config = TpmsConfig::default().with_resolution(4).with_repeat_cell([1, 0, 1]);
        let tpms = Tpms::with_mapping(config, Cylindrical::new(1.0).unwrap()).unwrap();
        assert_eq!(tpms.config().repeat_cell, [1, 6, 1]);
        assert_eq!(tpms.lattice().dims(), [4, 24, 4]);
    }

    #[test]
    fn test_planar_zero_repeat_is_rejected() {
        let config = TpmsConfig::default().with_repeat_cell([1, 0, 1]);
        assert!(matches!(
            Tpms::new(config),
            Err(TpmsError::Config(ConfigError::InvalidRepeat { .. }))
        ));
    }

    #[test]
    fn test_failed_part_is_cached() {
        let config = TpmsConfig::default()
            .with_resolution(6)
            .with_offset(Offset::field(|p| if p.x > 0.0 { Real::NAN } else { 0.3 }));
        let tpms = Tpms::new(config).unwrap();
        let first = tpms.sheet().unwrap_err();
        let second = tpms.sheet().unwrap_err();
        assert_eq!(first, second);
        assert!(matches!(first, TpmsError::Extraction { part: Part::Sheet, .. }));
    }
}
