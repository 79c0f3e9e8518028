//! Read-side capability over an openPMD `electricField` record.

mod attributes;
mod memory;
#[cfg(feature = "hdf5")]
mod openpmd;

pub use attributes::{
    AttributeValue, Attributes, GRID_GLOBAL_OFFSET, GRID_SPACING, GridOffset, GridSpacing,
    PHOTON_ENERGY, PHOTON_ENERGY_UNIT_SI, TIME_OFFSET, UNIT_SI,
};
pub use memory::InMemoryWavefront;
#[cfg(feature = "hdf5")]
pub use openpmd::{DEFAULT_ITERATION, OpenPmdWavefront};

use crate::domain::{Polarization, WavefrontError, WavefrontResult};
use crate::field::{ComplexField3, FieldShape, SliceWindow};
use tracing::debug;

pub trait WavefrontSource {
    /// Attributes of the `electricField` record itself.
    fn field_attributes(&self) -> WavefrontResult<Attributes>;

    fn has_component(&self, component: Polarization) -> bool;

    fn component_attributes(&self, component: Polarization) -> WavefrontResult<Attributes>;

    fn component_shape(&self, component: Polarization) -> WavefrontResult<FieldShape>;

    fn read_component(&self, component: Polarization) -> WavefrontResult<ComplexField3>;

    /// Read only the longitudinal slices selected by `window`.
    fn read_component_window(
        &self,
        component: Polarization,
        window: &SliceWindow,
    ) -> WavefrontResult<ComplexField3> {
        let field = self.read_component(component)?;
        if window.is_full() {
            return Ok(field);
        }

        let resolved = window.resolve(field.shape().nz)?;
        field.select_slices(&resolved)
    }
}

/// One polarization component as stored in the source, before unit conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentField {
    pub component: Polarization,
    pub field: ComplexField3,
    /// Factor converting stored samples to V/m.
    pub unit_si: f64,
}

pub fn component_unit_si<S>(source: &S, component: Polarization) -> WavefrontResult<f64>
where
    S: WavefrontSource + ?Sized,
{
    source.component_attributes(component)?.scalar(UNIT_SI)
}

/// Read `component` restricted to `window`, or `None` when it is absent.
pub fn extract_component<S>(
    source: &S,
    component: Polarization,
    window: &SliceWindow,
) -> WavefrontResult<Option<ComponentField>>
where
    S: WavefrontSource + ?Sized,
{
    if !source.has_component(component) {
        debug!(%component, "field component absent");
        return Ok(None);
    }

    let unit_si = component_unit_si(source, component)?;
    let field = source.read_component_window(component, window)?;
    debug!(%component, shape = %field.shape(), unit_si, "extracted field component");

    Ok(Some(ComponentField {
        component,
        field,
        unit_si,
    }))
}

/// Shape of the first present component, `x` before `y`.
pub fn present_shape<S>(source: &S) -> WavefrontResult<FieldShape>
where
    S: WavefrontSource + ?Sized,
{
    let component = Polarization::ALL
        .into_iter()
        .find(|component| source.has_component(*component))
        .ok_or(WavefrontError::MissingComponents)?;
    source.component_shape(component)
}

pub fn ensure_any_component<S>(source: &S) -> WavefrontResult<()>
where
    S: WavefrontSource + ?Sized,
{
    if Polarization::ALL
        .into_iter()
        .any(|component| source.has_component(component))
    {
        Ok(())
    } else {
        Err(WavefrontError::MissingComponents)
    }
}
