use super::{AttributeValue, Attributes, WavefrontSource};
use crate::domain::{ELECTRIC_FIELD_RECORD, Polarization, WavefrontError, WavefrontResult};
use crate::field::{ComplexField3, FieldShape};
use hdf5::types::VarLenUnicode;
use hdf5::{Dataset, File, Group, H5Type, Location};
use num_complex::Complex64;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

pub const DEFAULT_ITERATION: &str = "000000";

/// Compound layout openPMD-api uses for complex datasets in HDF5.
#[derive(H5Type, Debug, Clone, Copy, PartialEq)]
#[repr(C)]
struct H5Complex {
    r: f64,
    i: f64,
}

/// `electricField` record of one iteration of an openPMD HDF5 file.
#[derive(Debug)]
pub struct OpenPmdWavefront {
    file: File,
    record: Group,
    location: String,
}

impl OpenPmdWavefront {
    /// Open `data/<iteration>/meshes/electricField` in the file at `path`.
    pub fn open(path: impl AsRef<Path>, iteration: &str) -> WavefrontResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let location = format!("data/{iteration}/meshes/{ELECTRIC_FIELD_RECORD}");
        if !file.link_exists(&location) {
            return Err(WavefrontError::container(
                path,
                format!("no '{location}' record"),
            ));
        }

        let record = file.group(&location)?;
        debug!(path = %path.display(), %location, "opened openPMD wavefront");
        Ok(Self {
            file,
            record,
            location,
        })
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(self.file.filename())
    }

    fn component_dataset(&self, component: Polarization) -> WavefrontResult<Dataset> {
        if !self.has_component(component) {
            return Err(WavefrontError::ComponentNotFound {
                location: self.component_location(component),
            });
        }

        Ok(self.record.dataset(component.as_str())?)
    }

    fn component_location(&self, component: Polarization) -> String {
        format!("{}/{component}", self.location)
    }
}

impl WavefrontSource for OpenPmdWavefront {
    fn field_attributes(&self) -> WavefrontResult<Attributes> {
        read_attributes(&self.record, &self.location)
    }

    fn has_component(&self, component: Polarization) -> bool {
        self.record.link_exists(component.as_str())
    }

    fn component_attributes(&self, component: Polarization) -> WavefrontResult<Attributes> {
        let dataset = self.component_dataset(component)?;
        read_attributes(&dataset, &self.component_location(component))
    }

    fn component_shape(&self, component: Polarization) -> WavefrontResult<FieldShape> {
        let dataset = self.component_dataset(component)?;
        FieldShape::from_dims(&dataset.shape())
    }

    fn read_component(&self, component: Polarization) -> WavefrontResult<ComplexField3> {
        let dataset = self.component_dataset(component)?;
        let shape = FieldShape::from_dims(&dataset.shape())?;
        let data = dataset
            .read_raw::<H5Complex>()?
            .into_iter()
            .map(|value| Complex64::new(value.r, value.i))
            .collect();
        ComplexField3::new(shape, data)
    }
}

/// Numeric attributes become scalars or vectors, strings become text, and
/// anything else is skipped.
fn read_attributes(node: &Location, location: &str) -> WavefrontResult<Attributes> {
    let mut attributes = Attributes::new(location);
    for name in node.attr_names()? {
        let attr = node.attr(&name)?;
        let value = if let Ok(values) = attr.read_raw::<f64>() {
            if attr.shape().is_empty() {
                values.first().copied().map(AttributeValue::Scalar)
            } else {
                Some(AttributeValue::Vector(values))
            }
        } else if let Ok(text) = attr.read_scalar::<VarLenUnicode>() {
            Some(AttributeValue::Text(text.to_string()))
        } else {
            None
        };

        match value {
            Some(value) => attributes.insert(name, value),
            None => trace!(%location, %name, "skipping attribute of unsupported type"),
        }
    }
    Ok(attributes)
}
