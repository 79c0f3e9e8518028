pub mod common;
pub mod domain;
pub mod field;
pub mod genesis4;
pub mod numerics;
pub mod source;
pub mod srw;

pub use domain::{Polarization, WavefrontError, WavefrontErrorCategory, WavefrontResult};
pub use field::{ComplexField3, FieldShape, SliceWindow};
pub use genesis4::{
    Genesis4Dfl, Genesis4Params, genesis4_dfl_from_wavefront, genesis4_dfl_from_wavefront_to_files,
    write_dfl_to_genesis4_field,
};
pub use source::{InMemoryWavefront, WavefrontSource};
pub use srw::{
    SrwConversionOptions, SrwElementType, SrwWavefrontInputs, srw_wfr_from_wavefront,
    srw_wfr_inputs_from_wavefront,
};
