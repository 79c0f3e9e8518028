pub mod errors;

pub use errors::{WavefrontError, WavefrontErrorCategory, WavefrontResult};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// openPMD record holding the complex electric field of a wavefront.
pub const ELECTRIC_FIELD_RECORD: &str = "electricField";

/// Transverse polarization component of the electric field record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarization {
    X,
    Y,
}

impl Polarization {
    pub const ALL: [Self; 2] = [Self::X, Self::Y];

    /// Component name inside the `electricField` record.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

impl Display for Polarization {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}
