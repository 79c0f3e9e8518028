use crate::domain::{WavefrontError, WavefrontResult};
use std::collections::BTreeMap;

pub const GRID_SPACING: &str = "gridSpacing";
pub const GRID_GLOBAL_OFFSET: &str = "gridGlobalOffset";
pub const PHOTON_ENERGY: &str = "photonEnergy";
pub const PHOTON_ENERGY_UNIT_SI: &str = "photonEnergyUnitSI";
pub const TIME_OFFSET: &str = "timeOffset";
pub const UNIT_SI: &str = "unitSI";

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Scalar(f64),
    Vector(Vec<f64>),
    Text(String),
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for AttributeValue {
    fn from(value: Vec<f64>) -> Self {
        Self::Vector(value)
    }
}

impl<const N: usize> From<[f64; N]> for AttributeValue {
    fn from(value: [f64; N]) -> Self {
        Self::Vector(value.to_vec())
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Attribute map of one openPMD node, tagged with its location for errors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    location: String,
    values: BTreeMap<String, AttributeValue>,
}

impl Attributes {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn get(&self, name: &str) -> WavefrontResult<&AttributeValue> {
        self.values
            .get(name)
            .ok_or_else(|| WavefrontError::missing_attribute(&self.location, name))
    }

    /// Numeric scalar; a one-element vector is accepted as a scalar.
    pub fn scalar(&self, name: &str) -> WavefrontResult<f64> {
        match self.get(name)? {
            AttributeValue::Scalar(value) => Ok(*value),
            AttributeValue::Vector(values) if values.len() == 1 => Ok(values[0]),
            _ => Err(WavefrontError::attribute_type(
                &self.location,
                name,
                "a numeric scalar",
            )),
        }
    }

    pub fn vector(&self, name: &str) -> WavefrontResult<&[f64]> {
        match self.get(name)? {
            AttributeValue::Vector(values) => Ok(values),
            _ => Err(WavefrontError::attribute_type(
                &self.location,
                name,
                "a numeric vector",
            )),
        }
    }

    pub fn axis_triple(&self, name: &str) -> WavefrontResult<[f64; 3]> {
        match self.vector(name)? {
            [x, y, z] => Ok([*x, *y, *z]),
            _ => Err(WavefrontError::attribute_type(
                &self.location,
                name,
                "a 3-element per-axis vector",
            )),
        }
    }
}

/// Per-axis `gridSpacing` of the electric field mesh, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpacing {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GridSpacing {
    pub fn from_attributes(attributes: &Attributes) -> WavefrontResult<Self> {
        let [x, y, z] = attributes.axis_triple(GRID_SPACING)?;
        Ok(Self { x, y, z })
    }

    /// Side of the square transverse cell. Genesis4 only handles square cells.
    pub fn transverse_cell_size(&self) -> WavefrontResult<f64> {
        if self.x != self.y {
            return Err(WavefrontError::UnequalTransverseSpacing {
                dx: self.x,
                dy: self.y,
            });
        }

        Ok(self.x)
    }
}

/// Per-axis `gridGlobalOffset` (position of the first sample).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOffset {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GridOffset {
    pub fn from_attributes(attributes: &Attributes) -> WavefrontResult<Self> {
        let [x, y, z] = attributes.axis_triple(GRID_GLOBAL_OFFSET)?;
        Ok(Self { x, y, z })
    }
}
