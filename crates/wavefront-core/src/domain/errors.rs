use std::path::PathBuf;

pub type WavefrontResult<T> = Result<T, WavefrontError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WavefrontErrorCategory {
    InputValidationError,
    IoSystemError,
    ComputationError,
    InternalError,
}

impl WavefrontErrorCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ComputationError => "ComputationError",
            Self::InternalError => "InternalError",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WavefrontError {
    #[error("missing field components: neither 'x' nor 'y' is present in electricField")]
    MissingComponents,
    #[error("component '{location}' is not present in the record")]
    ComponentNotFound { location: String },
    #[error("missing attribute '{name}' on {location}")]
    MissingAttribute { location: String, name: String },
    #[error("attribute '{name}' on {location} is not {expected}")]
    AttributeType {
        location: String,
        name: String,
        expected: &'static str,
    },
    #[error("{context}: shape mismatch, expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: String,
        actual: String,
    },
    #[error("transverse grid must be square, got {nx}x{ny}")]
    NonSquareGrid { nx: usize, ny: usize },
    #[error("transverse grid spacing must be equal, got dx={dx:e} dy={dy:e}")]
    UnequalTransverseSpacing { dx: f64, dy: f64 },
    #[error("invalid slice window: {reason}")]
    InvalidWindow { reason: String },
    #[error("slice window selects no longitudinal slices out of {len}")]
    EmptyWindow { len: usize },
    #[error("{name}={value} does not fit in a 32-bit integer")]
    IntegerOverflow { name: &'static str, value: usize },
    #[error("failed to allocate {len} zero-filled elements")]
    Allocation { len: usize },
    #[error("field container '{}': {message}", .path.display())]
    Container { path: PathBuf, message: String },
    #[error("failed to encode SRW keyword arguments: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {source}")]
    Hdf5 {
        #[from]
        source: hdf5::Error,
    },
}

impl WavefrontError {
    pub fn missing_attribute(location: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingAttribute {
            location: location.into(),
            name: name.into(),
        }
    }

    pub fn attribute_type(
        location: impl Into<String>,
        name: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::AttributeType {
            location: location.into(),
            name: name.into(),
            expected,
        }
    }

    pub fn container(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Container {
            path: path.into(),
            message: message.into(),
        }
    }

    pub const fn category(&self) -> WavefrontErrorCategory {
        match self {
            Self::MissingComponents
            | Self::ComponentNotFound { .. }
            | Self::MissingAttribute { .. }
            | Self::AttributeType { .. }
            | Self::ShapeMismatch { .. }
            | Self::NonSquareGrid { .. }
            | Self::UnequalTransverseSpacing { .. }
            | Self::InvalidWindow { .. }
            | Self::EmptyWindow { .. }
            | Self::IntegerOverflow { .. } => WavefrontErrorCategory::InputValidationError,
            Self::Container { .. } => WavefrontErrorCategory::IoSystemError,
            #[cfg(feature = "hdf5")]
            Self::Hdf5 { .. } => WavefrontErrorCategory::IoSystemError,
            Self::Allocation { .. } => WavefrontErrorCategory::ComputationError,
            Self::Serialization { .. } => WavefrontErrorCategory::InternalError,
        }
    }

    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::MissingComponents => "INPUT.MISSING_COMPONENTS",
            Self::ComponentNotFound { .. } => "INPUT.MISSING_COMPONENT",
            Self::MissingAttribute { .. } => "INPUT.MISSING_ATTRIBUTE",
            Self::AttributeType { .. } => "INPUT.ATTRIBUTE_TYPE",
            Self::ShapeMismatch { .. } => "INPUT.SHAPE_MISMATCH",
            Self::NonSquareGrid { .. } => "INPUT.NON_SQUARE_GRID",
            Self::UnequalTransverseSpacing { .. } => "INPUT.GRID_SPACING",
            Self::InvalidWindow { .. } => "INPUT.SLICE_WINDOW",
            Self::EmptyWindow { .. } => "INPUT.EMPTY_WINDOW",
            Self::IntegerOverflow { .. } => "INPUT.INTEGER_OVERFLOW",
            Self::Allocation { .. } => "RUN.ALLOCATION",
            Self::Container { .. } => "IO.FIELD_CONTAINER",
            #[cfg(feature = "hdf5")]
            Self::Hdf5 { .. } => "IO.HDF5",
            Self::Serialization { .. } => "SYS.SERIALIZATION",
        }
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder(), self)
    }
}
