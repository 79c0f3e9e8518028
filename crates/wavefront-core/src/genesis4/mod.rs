//! openPMD wavefront -> Genesis4 `dfl` field arrays and field files.
//!
//! The field keeps its `(nx, ny, nz)` layout; only the units change, from V/m
//! to the Genesis4 amplitude `E * gridsize / sqrt(2 Z0)`.

#[cfg(feature = "hdf5")]
mod hdf5_file;
mod memory;
mod writer;

#[cfg(feature = "hdf5")]
pub use hdf5_file::{Hdf5FieldContainer, Hdf5FieldStore, read_genesis4_field_file};
pub use memory::{MemoryFieldContainer, MemoryFieldFile, MemoryFieldStore, SliceDatasets};
pub use writer::{
    FIELD_IMAG, FIELD_REAL, FieldContainer, FieldContainerReader, FieldStore, GRIDPOINTS, GRIDSIZE,
    METADATA_NAMES, REFPOSITION, SLICECOUNT, SLICESPACING, ScalarValue, WAVELENGTH,
    read_genesis4_field, slice_group_name, write_dfl_to_container, write_dfl_to_genesis4_field,
};

use crate::common::constants::{genesis4_field_factor, wavelength_from_photon_energy_ev};
use crate::domain::{Polarization, WavefrontError, WavefrontResult};
use crate::field::{ComplexField3, FieldShape, SliceWindow};
use crate::source::{
    GridSpacing, PHOTON_ENERGY, TIME_OFFSET, WavefrontSource, ensure_any_component,
    extract_component, present_shape,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Field file metadata (`ncar`, `dgrid`, `ntail`, `xlamds`, `nslice`, `zsep`
/// in Genesis 2 terms).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Genesis4Params {
    pub gridpoints: usize,
    pub gridsize: f64,
    pub refposition: f64,
    pub wavelength: f64,
    pub slicecount: usize,
    pub slicespacing: f64,
}

impl Genesis4Params {
    pub fn from_wavefront<S>(source: &S) -> WavefrontResult<Self>
    where
        S: WavefrontSource + ?Sized,
    {
        let attributes = source.field_attributes()?;
        let spacing = GridSpacing::from_attributes(&attributes)?;
        let gridsize = spacing.transverse_cell_size()?;
        let refposition = attributes.scalar(TIME_OFFSET)?;
        let wavelength = wavelength_from_photon_energy_ev(attributes.scalar(PHOTON_ENERGY)?);

        let shape = present_shape(source)?;
        if !shape.is_square() {
            return Err(WavefrontError::NonSquareGrid {
                nx: shape.nx,
                ny: shape.ny,
            });
        }

        Ok(Self {
            gridpoints: shape.nx,
            gridsize,
            refposition,
            wavelength,
            slicecount: shape.nz,
            slicespacing: spacing.z,
        })
    }

    pub const fn field_shape(&self) -> FieldShape {
        FieldShape::new(self.gridpoints, self.gridpoints, self.slicecount)
    }
}

/// Converted field per polarization; absent components stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Genesis4Dfl {
    pub x: Option<ComplexField3>,
    pub y: Option<ComplexField3>,
    pub params: Genesis4Params,
}

impl Genesis4Dfl {
    pub fn component(&self, component: Polarization) -> Option<&ComplexField3> {
        match component {
            Polarization::X => self.x.as_ref(),
            Polarization::Y => self.y.as_ref(),
        }
    }
}

/// `<prefix>_x.h5` / `<prefix>_y.h5`.
pub fn genesis4_field_path(prefix: &str, component: Polarization) -> PathBuf {
    PathBuf::from(format!("{prefix}_{component}.h5"))
}

/// Convert every present polarization component to Genesis4 units.
pub fn genesis4_dfl_from_wavefront<S>(source: &S) -> WavefrontResult<Genesis4Dfl>
where
    S: WavefrontSource + ?Sized,
{
    ensure_any_component(source)?;
    let params = Genesis4Params::from_wavefront(source)?;
    debug!(?params, "derived Genesis4 field parameters");

    let mut dfl = Genesis4Dfl {
        x: None,
        y: None,
        params,
    };
    for component in Polarization::ALL {
        let Some(extracted) = extract_component(source, component, &SliceWindow::full())? else {
            continue;
        };

        let factor = genesis4_field_factor(extracted.unit_si, params.gridsize);
        debug!(%component, factor, "scaling field to Genesis4 units");
        let converted = Some(extracted.field.scaled(factor));
        match component {
            Polarization::X => dfl.x = converted,
            Polarization::Y => dfl.y = converted,
        }
    }

    Ok(dfl)
}

/// Convert like [`genesis4_dfl_from_wavefront`] and write each present
/// component to `<prefix>_<component>.h5` in `store`.
pub fn genesis4_dfl_from_wavefront_to_files<S, F>(
    source: &S,
    store: &F,
    prefix: &str,
) -> WavefrontResult<Genesis4Dfl>
where
    S: WavefrontSource + ?Sized,
    F: FieldStore + ?Sized,
{
    let dfl = genesis4_dfl_from_wavefront(source)?;
    for component in Polarization::ALL {
        if let Some(field) = dfl.component(component) {
            let path = genesis4_field_path(prefix, component);
            write_dfl_to_genesis4_field(store, &path, field, &dfl.params)?;
        }
    }

    Ok(dfl)
}

#[cfg(test)]
mod tests {
    use super::{Genesis4Params, genesis4_dfl_from_wavefront, genesis4_field_path};
    use crate::common::constants::Z0;
    use crate::domain::{Polarization, WavefrontError};
    use crate::field::{ComplexField3, FieldShape};
    use crate::source::{Attributes, GRID_SPACING, InMemoryWavefront, PHOTON_ENERGY, TIME_OFFSET};
    use num_complex::Complex64;

    fn attributes() -> Attributes {
        Attributes::new("electricField")
            .with(GRID_SPACING, [5.0e-6, 5.0e-6, 2.0e-8])
            .with(TIME_OFFSET, 1.5e-6)
            .with(PHOTON_ENERGY, 1_000.0)
    }

    fn field(shape: FieldShape) -> ComplexField3 {
        ComplexField3::from_fn(shape, |ix, iy, iz| {
            Complex64::new(ix as f64 + 1.0, (iy * 3 + iz) as f64)
        })
    }

    #[test]
    fn params_come_from_attributes_and_shape() {
        let source = InMemoryWavefront::new(attributes()).with_component(
            Polarization::X,
            field(FieldShape::new(4, 4, 3)),
            1.0,
        );
        let params = Genesis4Params::from_wavefront(&source).expect("params");

        assert_eq!(params.gridpoints, 4);
        assert_eq!(params.slicecount, 3);
        assert_eq!(params.gridsize, 5.0e-6);
        assert_eq!(params.slicespacing, 2.0e-8);
        assert_eq!(params.refposition, 1.5e-6);
        assert!((params.wavelength - 12.398_425e-10).abs() < 1.0e-22);
    }

    #[test]
    fn each_component_uses_its_own_unit_si() {
        let shape = FieldShape::new(3, 3, 2);
        let source = InMemoryWavefront::new(attributes())
            .with_component(Polarization::X, field(shape), 2.0)
            .with_component(Polarization::Y, field(shape), 4.0);
        let dfl = genesis4_dfl_from_wavefront(&source).expect("conversion");

        let base = 5.0e-6 / (2.0 * Z0).sqrt();
        let x = dfl.x.expect("x should convert");
        let y = dfl.y.expect("y should convert");
        let expected = field(shape)[(2, 1, 1)] * (2.0 * base);
        assert!((x[(2, 1, 1)] - expected).norm() < 1.0e-18);
        assert!((y[(2, 1, 1)] - expected * 2.0).norm() < 1.0e-18);
    }

    #[test]
    fn rectangular_grids_are_rejected() {
        let source = InMemoryWavefront::new(attributes()).with_component(
            Polarization::Y,
            field(FieldShape::new(4, 2, 3)),
            1.0,
        );
        let error = genesis4_dfl_from_wavefront(&source).expect_err("grid should be square");
        assert!(matches!(error, WavefrontError::NonSquareGrid { nx: 4, ny: 2 }));
    }

    #[test]
    fn missing_components_fail_before_attribute_reads() {
        let source = InMemoryWavefront::new(Attributes::new("electricField"));
        let error = genesis4_dfl_from_wavefront(&source).expect_err("no components");
        assert!(matches!(error, WavefrontError::MissingComponents));
    }

    #[test]
    fn field_paths_append_component_suffix() {
        assert_eq!(
            genesis4_field_path("out/genesis4_field", Polarization::Y),
            std::path::PathBuf::from("out/genesis4_field_y.h5")
        );
    }
}
