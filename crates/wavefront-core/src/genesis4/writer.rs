use super::Genesis4Params;
use crate::domain::{WavefrontError, WavefrontResult};
use crate::field::{ComplexField3, FieldShape};
use num_complex::Complex64;
use std::path::Path;
use tracing::{debug, info, warn};

pub const GRIDPOINTS: &str = "gridpoints";
pub const GRIDSIZE: &str = "gridsize";
pub const REFPOSITION: &str = "refposition";
pub const WAVELENGTH: &str = "wavelength";
pub const SLICECOUNT: &str = "slicecount";
pub const SLICESPACING: &str = "slicespacing";
pub const FIELD_REAL: &str = "field-real";
pub const FIELD_IMAG: &str = "field-imag";

/// Root metadata datasets in the order Genesis4 writes them.
pub const METADATA_NAMES: [&str; 6] = [
    GRIDPOINTS,
    GRIDSIZE,
    REFPOSITION,
    WAVELENGTH,
    SLICECOUNT,
    SLICESPACING,
];

/// Singleton root dataset value with its storage type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    Int32(i32),
    Float64(f64),
}

impl ScalarValue {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int32(value) => f64::from(value),
            Self::Float64(value) => value,
        }
    }

    pub fn as_i32(self) -> Option<i32> {
        match self {
            Self::Int32(value) => Some(value),
            Self::Float64(_) => None,
        }
    }
}

/// Group name of 0-based slice `index`: `slice000001` for the first slice.
pub fn slice_group_name(index: usize) -> String {
    format!("slice{:06}", index + 1)
}

/// An open, writable Genesis4 field container.
pub trait FieldContainer {
    fn write_scalar(&mut self, name: &str, value: ScalarValue) -> WavefrontResult<()>;

    /// Create `group` holding the `field-real` and `field-imag` datasets.
    fn write_slice(&mut self, group: &str, real: &[f64], imag: &[f64]) -> WavefrontResult<()>;

    /// Flush and release the container.
    fn close(self) -> WavefrontResult<()>
    where
        Self: Sized;
}

/// Creates containers by destination path.
pub trait FieldStore {
    type Container: FieldContainer;

    /// Create `path`, replacing any existing container there.
    fn create(&self, path: &Path) -> WavefrontResult<Self::Container>;

    /// Remove whatever a failed write left at `path`.
    fn discard(&self, path: &Path) -> WavefrontResult<()>;
}

pub trait FieldContainerReader {
    fn read_scalar(&self, name: &str) -> WavefrontResult<ScalarValue>;

    fn read_slice(&self, group: &str) -> WavefrontResult<(Vec<f64>, Vec<f64>)>;
}

/// Write `dfl` with its metadata to a new container at `path`.
///
/// The container is released on every path. When any write fails after the
/// container was created, the partial container is discarded and the write
/// error is returned.
pub fn write_dfl_to_genesis4_field<F>(
    store: &F,
    path: &Path,
    dfl: &ComplexField3,
    params: &Genesis4Params,
) -> WavefrontResult<()>
where
    F: FieldStore + ?Sized,
{
    validate_layout(dfl, params)?;

    let mut container = store.create(path)?;
    let result = match write_dfl_to_container(&mut container, dfl, params) {
        Ok(()) => container.close(),
        Err(error) => {
            drop(container);
            Err(error)
        }
    };

    if let Err(error) = result {
        warn!(path = %path.display(), %error, "discarding partial Genesis4 field file");
        if let Err(discard_error) = store.discard(path) {
            warn!(
                path = %path.display(),
                error = %discard_error,
                "failed to discard partial field file"
            );
        }
        return Err(error);
    }

    info!(
        path = %path.display(),
        gridpoints = params.gridpoints,
        slicecount = params.slicecount,
        "wrote Genesis4 field file"
    );
    Ok(())
}

/// Write metadata and slice groups into an already open container.
pub fn write_dfl_to_container<C>(
    container: &mut C,
    dfl: &ComplexField3,
    params: &Genesis4Params,
) -> WavefrontResult<()>
where
    C: FieldContainer + ?Sized,
{
    validate_layout(dfl, params)?;

    let metadata = [
        ScalarValue::Int32(to_i32(GRIDPOINTS, params.gridpoints)?),
        ScalarValue::Float64(params.gridsize),
        ScalarValue::Float64(params.refposition),
        ScalarValue::Float64(params.wavelength),
        ScalarValue::Int32(to_i32(SLICECOUNT, params.slicecount)?),
        ScalarValue::Float64(params.slicespacing),
    ];
    for (name, value) in METADATA_NAMES.into_iter().zip(metadata) {
        container.write_scalar(name, value)?;
    }

    let column_len = params.gridpoints * params.gridpoints;
    let mut real = Vec::with_capacity(column_len);
    let mut imag = Vec::with_capacity(column_len);
    for index in 0..params.slicecount {
        real.clear();
        imag.clear();
        for value in dfl.slice_column(index) {
            real.push(value.re);
            imag.push(value.im);
        }
        container.write_slice(&slice_group_name(index), &real, &imag)?;
    }

    debug!(
        slices = params.slicecount,
        column_len, "wrote Genesis4 slice groups"
    );
    Ok(())
}

/// Rebuild the parameters and the `(gridpoints, gridpoints, slicecount)` field
/// from a Genesis4 field container.
pub fn read_genesis4_field<R>(reader: &R) -> WavefrontResult<(Genesis4Params, ComplexField3)>
where
    R: FieldContainerReader + ?Sized,
{
    let gridpoints = read_count(reader, GRIDPOINTS)?;
    let slicecount = read_count(reader, SLICECOUNT)?;
    let params = Genesis4Params {
        gridpoints,
        gridsize: reader.read_scalar(GRIDSIZE)?.as_f64(),
        refposition: reader.read_scalar(REFPOSITION)?.as_f64(),
        wavelength: reader.read_scalar(WAVELENGTH)?.as_f64(),
        slicecount,
        slicespacing: reader.read_scalar(SLICESPACING)?.as_f64(),
    };

    let shape = params.field_shape();
    let column_len = shape.transverse_len();
    let mut data = vec![Complex64::new(0.0, 0.0); shape.len()];
    for index in 0..slicecount {
        let group = slice_group_name(index);
        let (real, imag) = reader.read_slice(&group)?;
        if real.len() != column_len || imag.len() != column_len {
            return Err(WavefrontError::ShapeMismatch {
                context: "Genesis4 slice group",
                expected: format!("{column_len} samples in {group}"),
                actual: format!("{} real / {} imag", real.len(), imag.len()),
            });
        }

        for (row, (re, im)) in real.into_iter().zip(imag).enumerate() {
            data[row * slicecount + index] = Complex64::new(re, im);
        }
    }

    Ok((params, ComplexField3::new(shape, data)?))
}

fn read_count<R>(reader: &R, name: &'static str) -> WavefrontResult<usize>
where
    R: FieldContainerReader + ?Sized,
{
    let value = reader.read_scalar(name)?;
    value
        .as_i32()
        .and_then(|count| usize::try_from(count).ok())
        .ok_or_else(|| WavefrontError::attribute_type("Genesis4 field file", name, "a count"))
}

fn validate_layout(dfl: &ComplexField3, params: &Genesis4Params) -> WavefrontResult<()> {
    let expected: FieldShape = params.field_shape();
    if dfl.shape() != expected {
        return Err(WavefrontError::ShapeMismatch {
            context: "Genesis4 field",
            expected: expected.to_string(),
            actual: dfl.shape().to_string(),
        });
    }

    to_i32(GRIDPOINTS, params.gridpoints)?;
    to_i32(SLICECOUNT, params.slicecount)?;
    Ok(())
}

fn to_i32(name: &'static str, value: usize) -> WavefrontResult<i32> {
    i32::try_from(value).map_err(|_| WavefrontError::IntegerOverflow { name, value })
}

#[cfg(test)]
mod tests {
    use super::{ScalarValue, slice_group_name, to_i32};

    #[test]
    fn slice_groups_are_one_based_and_zero_padded() {
        assert_eq!(slice_group_name(0), "slice000001");
        assert_eq!(slice_group_name(41), "slice000042");
        assert_eq!(slice_group_name(999_998), "slice999999");
    }

    #[test]
    fn scalar_values_keep_storage_type() {
        assert_eq!(ScalarValue::Int32(7).as_i32(), Some(7));
        assert_eq!(ScalarValue::Int32(7).as_f64(), 7.0);
        assert_eq!(ScalarValue::Float64(7.0).as_i32(), None);
    }

    #[test]
    fn counts_beyond_i32_are_rejected() {
        assert_eq!(to_i32("gridpoints", 128).expect("fits"), 128);
        assert!(to_i32("slicecount", i32::MAX as usize + 1).is_err());
    }
}
