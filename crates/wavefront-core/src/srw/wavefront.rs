use super::layout::{SrwArray, SrwElementType};
use crate::domain::WavefrontResult;
use serde::{Deserialize, Serialize};

/// Time-domain presentation (`presFT`).
pub const PRESENTATION_TIME: i32 = 1;
/// Field in sqrt(W/mm^2) for the time domain (`unitElFld`).
pub const UNIT_SQRT_W_PER_MM2: i32 = 2;

/// Keyword arguments of the SRW wavefront constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SrwWavefrontArgs {
    #[serde(rename = "_typeE")]
    pub type_e: SrwElementType,
    #[serde(rename = "_eStart")]
    pub e_start: f64,
    #[serde(rename = "_eFin")]
    pub e_fin: f64,
    #[serde(rename = "_ne")]
    pub ne: usize,
    #[serde(rename = "_xStart")]
    pub x_start: f64,
    #[serde(rename = "_xFin")]
    pub x_fin: f64,
    #[serde(rename = "_nx")]
    pub nx: usize,
    #[serde(rename = "_yStart")]
    pub y_start: f64,
    #[serde(rename = "_yFin")]
    pub y_fin: f64,
    #[serde(rename = "_ny")]
    pub ny: usize,
    #[serde(rename = "_zStart")]
    pub z_start: f64,
}

impl SrwWavefrontArgs {
    /// JSON object keyed by the constructor's keyword names.
    pub fn to_keyword_json(&self) -> WavefrontResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Attributes assigned onto a constructed SRW wavefront.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SrwWavefrontAttrs {
    #[serde(rename = "avgPhotEn")]
    pub avg_phot_en: f64,
    #[serde(rename = "presFT")]
    pub pres_ft: i32,
    #[serde(rename = "unitElFld")]
    pub unit_el_fld: i32,
}

impl SrwWavefrontAttrs {
    pub const fn time_domain(avg_phot_en: f64) -> Self {
        Self {
            avg_phot_en,
            pres_ft: PRESENTATION_TIME,
            unit_el_fld: UNIT_SQRT_W_PER_MM2,
        }
    }

    pub fn to_keyword_json(&self) -> WavefrontResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Wavefront object that accepts the auxiliary attributes after construction.
pub trait SrwWavefrontRecord {
    fn apply_attrs(&mut self, attrs: &SrwWavefrontAttrs);
}

/// Builds a wavefront object from the two flat field arrays.
pub trait SrwWavefrontFactory {
    type Wavefront: SrwWavefrontRecord;

    fn construct(
        &self,
        ar_ex: SrwArray,
        ar_ey: SrwArray,
        args: &SrwWavefrontArgs,
    ) -> WavefrontResult<Self::Wavefront>;
}

/// Plain wavefront record holding everything the SRW constructor receives.
#[derive(Debug, Clone, PartialEq)]
pub struct SrwWavefront {
    pub ar_ex: SrwArray,
    pub ar_ey: SrwArray,
    pub args: SrwWavefrontArgs,
    pub attrs: Option<SrwWavefrontAttrs>,
}

impl SrwWavefrontRecord for SrwWavefront {
    fn apply_attrs(&mut self, attrs: &SrwWavefrontAttrs) {
        self.attrs = Some(*attrs);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SrwWavefrontRecordFactory;

impl SrwWavefrontFactory for SrwWavefrontRecordFactory {
    type Wavefront = SrwWavefront;

    fn construct(
        &self,
        ar_ex: SrwArray,
        ar_ey: SrwArray,
        args: &SrwWavefrontArgs,
    ) -> WavefrontResult<Self::Wavefront> {
        Ok(SrwWavefront {
            ar_ex,
            ar_ey,
            args: *args,
            attrs: None,
        })
    }
}
