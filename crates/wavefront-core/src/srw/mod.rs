//! openPMD wavefront -> SRW flat field arrays and wavefront construction
//! arguments.

mod layout;
mod wavefront;

pub use layout::{
    SrwArray, SrwElementType, complex_to_srw_array, srw_array_alloc, srw_array_to_complex,
};
pub use wavefront::{
    PRESENTATION_TIME, SrwWavefront, SrwWavefrontArgs, SrwWavefrontAttrs, SrwWavefrontFactory,
    SrwWavefrontRecord, SrwWavefrontRecordFactory, UNIT_SQRT_W_PER_MM2,
};

use crate::common::constants::{C_LIGHT, joules_to_ev, srw_field_factor};
use crate::domain::{Polarization, WavefrontError, WavefrontResult};
use crate::field::{FieldShape, ResolvedWindow, SliceWindow};
use crate::source::{
    GridOffset, GridSpacing, PHOTON_ENERGY, PHOTON_ENERGY_UNIT_SI, WavefrontSource,
    extract_component, present_shape,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Caller-selected storage type and longitudinal window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SrwConversionOptions {
    #[serde(rename = "elementType")]
    pub element_type: SrwElementType,
    pub window: SliceWindow,
}

impl SrwConversionOptions {
    pub fn with_element_type(mut self, element_type: SrwElementType) -> Self {
        self.element_type = element_type;
        self
    }

    pub fn with_window(mut self, window: SliceWindow) -> Self {
        self.window = window;
        self
    }
}

/// Everything the SRW wavefront constructor needs, before construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SrwWavefrontInputs {
    pub ar_ex: SrwArray,
    pub ar_ey: SrwArray,
    pub args: SrwWavefrontArgs,
    pub attrs: SrwWavefrontAttrs,
}

/// Convert both polarization components and derive the constructor
/// arguments. An absent component is replaced by zeros of equal length.
pub fn srw_wfr_inputs_from_wavefront<S>(
    source: &S,
    options: &SrwConversionOptions,
) -> WavefrontResult<SrwWavefrontInputs>
where
    S: WavefrontSource + ?Sized,
{
    let shape = present_shape(source)?;
    let window = options.window.resolve(shape.nz)?;
    if window.is_empty() {
        return Err(WavefrontError::EmptyWindow { len: shape.nz });
    }

    let ar_ex = convert_component(source, Polarization::X, options)?;
    let ar_ey = convert_component(source, Polarization::Y, options)?;
    let (ar_ex, ar_ey) = match (ar_ex, ar_ey) {
        (Some(ar_ex), Some(ar_ey)) => (ar_ex, ar_ey),
        (Some(ar_ex), None) => {
            let ar_ey = backfill(Polarization::Y, &ar_ex, options.element_type)?;
            (ar_ex, ar_ey)
        }
        (None, Some(ar_ey)) => {
            let ar_ex = backfill(Polarization::X, &ar_ey, options.element_type)?;
            (ar_ex, ar_ey)
        }
        (None, None) => return Err(WavefrontError::MissingComponents),
    };

    let attributes = source.field_attributes()?;
    let photon_energy_ev = joules_to_ev(
        attributes.scalar(PHOTON_ENERGY)? * attributes.scalar(PHOTON_ENERGY_UNIT_SI)?,
    );
    let spacing = GridSpacing::from_attributes(&attributes)?;
    let offset = GridOffset::from_attributes(&attributes)?;
    let args = wavefront_args(options.element_type, shape, &spacing, &offset, &window);
    debug!(?args, photon_energy_ev, "derived SRW wavefront arguments");

    Ok(SrwWavefrontInputs {
        ar_ex,
        ar_ey,
        args,
        attrs: SrwWavefrontAttrs::time_domain(photon_energy_ev),
    })
}

/// Convert and hand the arrays to `factory`, then assign the auxiliary
/// attributes on the constructed wavefront.
pub fn srw_wfr_from_wavefront<S, F>(
    source: &S,
    options: &SrwConversionOptions,
    factory: &F,
) -> WavefrontResult<F::Wavefront>
where
    S: WavefrontSource + ?Sized,
    F: SrwWavefrontFactory + ?Sized,
{
    let SrwWavefrontInputs {
        ar_ex,
        ar_ey,
        args,
        attrs,
    } = srw_wfr_inputs_from_wavefront(source, options)?;

    let mut wavefront = factory.construct(ar_ex, ar_ey, &args)?;
    wavefront.apply_attrs(&attrs);
    Ok(wavefront)
}

fn convert_component<S>(
    source: &S,
    component: Polarization,
    options: &SrwConversionOptions,
) -> WavefrontResult<Option<SrwArray>>
where
    S: WavefrontSource + ?Sized,
{
    let Some(extracted) = extract_component(source, component, &options.window)? else {
        return Ok(None);
    };

    let factor = srw_field_factor(extracted.unit_si);
    debug!(%component, factor, "scaling field to SRW units");
    let field = extracted.field.scaled(factor);
    complex_to_srw_array(&field, options.element_type).map(Some)
}

fn backfill(
    component: Polarization,
    present: &SrwArray,
    element_type: SrwElementType,
) -> WavefrontResult<SrwArray> {
    warn!(
        %component,
        len = present.len(),
        "field component absent, substituting zeros"
    );
    srw_array_alloc(element_type, present.len())
}

/// Transverse bounds span the full grid; the time bounds span the selected
/// slices only.
fn wavefront_args(
    element_type: SrwElementType,
    shape: FieldShape,
    spacing: &GridSpacing,
    offset: &GridOffset,
    window: &ResolvedWindow,
) -> SrwWavefrontArgs {
    let axis_max = |points: usize, delta: f64, min: f64| (points as f64 - 1.0) * delta + min;
    let zmin = window.start as f64 * spacing.z + offset.z;
    let zmax = window.last().unwrap_or(window.start) as f64 * spacing.z + offset.z;

    SrwWavefrontArgs {
        type_e: element_type,
        e_start: 0.0,
        e_fin: (zmax - zmin) / C_LIGHT,
        ne: window.count,
        x_start: offset.x,
        x_fin: axis_max(shape.nx, spacing.x, offset.x),
        nx: shape.nx,
        y_start: offset.y,
        y_fin: axis_max(shape.ny, spacing.y, offset.y),
        ny: shape.ny,
        z_start: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        SrwConversionOptions, SrwElementType, SrwWavefrontRecordFactory, srw_array_to_complex,
        srw_wfr_from_wavefront, srw_wfr_inputs_from_wavefront,
    };
    use crate::common::constants::{C_LIGHT, Z0};
    use crate::domain::{Polarization, WavefrontError};
    use crate::field::{ComplexField3, FieldShape, SliceWindow};
    use crate::numerics::NumericTolerance;
    use crate::source::{
        Attributes, GRID_GLOBAL_OFFSET, GRID_SPACING, InMemoryWavefront, PHOTON_ENERGY,
        PHOTON_ENERGY_UNIT_SI,
    };
    use num_complex::Complex64;

    const ELECTRON_VOLT: f64 = 1.602_176_634e-19;

    fn attributes() -> Attributes {
        Attributes::new("electricField")
            .with(GRID_SPACING, [1.0e-6, 2.0e-6, 3.0e-7])
            .with(GRID_GLOBAL_OFFSET, [-1.0e-6, -2.0e-6, 0.0])
            .with(PHOTON_ENERGY, 8_000.0)
            .with(PHOTON_ENERGY_UNIT_SI, ELECTRON_VOLT)
    }

    fn field(shape: FieldShape) -> ComplexField3 {
        ComplexField3::from_fn(shape, |ix, iy, iz| {
            Complex64::new((ix + 2 * iy) as f64, iz as f64 + 0.5)
        })
    }

    fn x_only(shape: FieldShape) -> InMemoryWavefront {
        InMemoryWavefront::new(attributes()).with_component(Polarization::X, field(shape), 2.0)
    }

    #[test]
    fn flat_arrays_hold_scaled_windowed_field() {
        let shape = FieldShape::new(3, 2, 10);
        let options = SrwConversionOptions::default()
            .with_element_type(SrwElementType::Double)
            .with_window(SliceWindow::new(Some(-5), None, Some(1)));
        let inputs = srw_wfr_inputs_from_wavefront(&x_only(shape), &options).expect("conversion");

        assert_eq!(inputs.ar_ex.len(), 2 * 3 * 2 * 5);
        assert_eq!(inputs.args.ne, 5);

        let factor = 2.0 / (2.0 * Z0).sqrt() / 1_000.0;
        let restored = srw_array_to_complex(&inputs.ar_ex, shape.with_nz(5)).expect("inverse");
        let expected = ComplexField3::from_fn(shape.with_nz(5), |ix, iy, iz| {
            field(shape)[(ix, iy, iz + 5)] * factor
        });
        assert!(restored.approx_eq(&expected, NumericTolerance::new(0.0, 1.0e-12)));
    }

    #[test]
    fn absent_component_is_backfilled_with_zeros() {
        let options = SrwConversionOptions::default();
        let inputs = srw_wfr_inputs_from_wavefront(&x_only(FieldShape::new(2, 2, 3)), &options)
            .expect("conversion");

        assert_eq!(inputs.ar_ey.len(), inputs.ar_ex.len());
        assert_eq!(inputs.ar_ey.element_type(), SrwElementType::Float);
        assert!(inputs.ar_ey.is_all_zero());
        assert!(!inputs.ar_ex.is_all_zero());
    }

    #[test]
    fn args_describe_full_transverse_grid_and_window() {
        let shape = FieldShape::new(3, 2, 10);
        let options = SrwConversionOptions::default()
            .with_window(SliceWindow::new(Some(2), Some(9), Some(3)));
        let inputs = srw_wfr_inputs_from_wavefront(&x_only(shape), &options).expect("conversion");
        let args = inputs.args;

        assert_eq!(args.type_e, SrwElementType::Float);
        assert_eq!((args.nx, args.ny, args.ne), (3, 2, 3));
        assert_eq!(args.x_start, -1.0e-6);
        assert!((args.x_fin - 1.0e-6).abs() < 1.0e-18);
        assert!((args.y_fin - 0.0).abs() < 1.0e-18);
        // slices 2, 5, 8
        let expected_e_fin = 6.0 * 3.0e-7 / C_LIGHT;
        assert!((args.e_fin - expected_e_fin).abs() < 1.0e-24);
        assert_eq!(args.e_start, 0.0);
        assert_eq!(args.z_start, 0.0);

        assert!((inputs.attrs.avg_phot_en - 8_000.0).abs() < 1.0e-9);
        assert_eq!(inputs.attrs.pres_ft, 1);
        assert_eq!(inputs.attrs.unit_el_fld, 2);
    }

    #[test]
    fn factory_receives_arrays_and_attrs() {
        let options = SrwConversionOptions::default();
        let wavefront = srw_wfr_from_wavefront(
            &x_only(FieldShape::new(2, 2, 2)),
            &options,
            &SrwWavefrontRecordFactory,
        )
        .expect("construction");

        assert_eq!(wavefront.ar_ex.len(), 16);
        assert_eq!(wavefront.args.ne, 2);
        let attrs = wavefront.attrs.expect("attributes should be applied");
        assert_eq!(attrs.pres_ft, 1);
    }

    #[test]
    fn empty_window_is_rejected() {
        let options =
            SrwConversionOptions::default().with_window(SliceWindow::new(Some(4), Some(2), None));
        let error = srw_wfr_inputs_from_wavefront(&x_only(FieldShape::new(2, 2, 6)), &options)
            .expect_err("window is empty");
        assert!(matches!(error, WavefrontError::EmptyWindow { len: 6 }));
    }

    #[test]
    fn missing_components_are_rejected() {
        let source = InMemoryWavefront::new(attributes());
        let error = srw_wfr_inputs_from_wavefront(&source, &SrwConversionOptions::default())
            .expect_err("no components");
        assert!(matches!(error, WavefrontError::MissingComponents));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: SrwConversionOptions =
            serde_json::from_str(r#"{"elementType":"d","window":{"start":-5}}"#)
                .expect("options should parse");
        assert_eq!(options.element_type, SrwElementType::Double);
        assert_eq!(options.window, SliceWindow::new(Some(-5), None, None));

        let defaults: SrwConversionOptions =
            serde_json::from_str("{}").expect("empty options should parse");
        assert_eq!(defaults, SrwConversionOptions::default());
    }
}
