use crate::domain::{WavefrontError, WavefrontResult};
use crate::field::{ComplexField3, FieldShape};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage type of SRW flat field arrays, named by its array typecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SrwElementType {
    #[default]
    #[serde(rename = "f")]
    Float,
    #[serde(rename = "d")]
    Double,
}

impl SrwElementType {
    pub const fn typecode(self) -> char {
        match self {
            Self::Float => 'f',
            Self::Double => 'd',
        }
    }
}

impl Display for SrwElementType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.typecode())
    }
}

/// Flat real array with interleaved real and imaginary parts.
#[derive(Debug, Clone, PartialEq)]
pub enum SrwArray {
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl SrwArray {
    pub const fn element_type(&self) -> SrwElementType {
        match self {
            Self::Float(_) => SrwElementType::Float,
            Self::Double(_) => SrwElementType::Double,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Float(values) => values.len(),
            Self::Double(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        match self {
            Self::Float(values) => values.get(index).map(|value| f64::from(*value)),
            Self::Double(values) => values.get(index).copied(),
        }
    }

    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Self::Float(values) => values.iter().map(|value| f64::from(*value)).collect(),
            Self::Double(values) => values.clone(),
        }
    }

    pub fn is_all_zero(&self) -> bool {
        match self {
            Self::Float(values) => values.iter().all(|value| *value == 0.0),
            Self::Double(values) => values.iter().all(|value| *value == 0.0),
        }
    }
}

/// Zero-filled array of exactly `len` elements.
///
/// The buffer is reserved in one fallible step, so an oversized request
/// surfaces as [`WavefrontError::Allocation`] instead of aborting.
pub fn srw_array_alloc(element_type: SrwElementType, len: usize) -> WavefrontResult<SrwArray> {
    let array = match element_type {
        SrwElementType::Float => SrwArray::Float(zeroed(len)?),
        SrwElementType::Double => SrwArray::Double(zeroed(len)?),
    };
    Ok(array)
}

/// Reorder `field` from `(x, y, z)` to `(y, x, z)`, flatten it with `z`
/// fastest and interleave real and imaginary parts.
pub fn complex_to_srw_array(
    field: &ComplexField3,
    element_type: SrwElementType,
) -> WavefrontResult<SrwArray> {
    let array = match element_type {
        SrwElementType::Float => SrwArray::Float(interleave(field, |value| value as f32)?),
        SrwElementType::Double => SrwArray::Double(interleave(field, |value| value)?),
    };
    Ok(array)
}

/// Inverse of [`complex_to_srw_array`]; `shape` is the `(nx, ny, nz)` shape of
/// the field before the transposition.
pub fn srw_array_to_complex(array: &SrwArray, shape: FieldShape) -> WavefrontResult<ComplexField3> {
    let expected = interleaved_len(shape.len())?;
    if array.len() != expected {
        return Err(WavefrontError::ShapeMismatch {
            context: "SRW flat array",
            expected: format!("{expected} values for {shape}"),
            actual: format!("{} values", array.len()),
        });
    }

    let values = array.to_f64_vec();
    let data = values
        .chunks_exact(2)
        .map(|pair| Complex64::new(pair[0], pair[1]))
        .collect();
    let transposed = ComplexField3::new(shape.transposed_xy(), data)?;
    Ok(transposed.transpose_xy())
}

fn interleave<T, F>(field: &ComplexField3, cast: F) -> WavefrontResult<Vec<T>>
where
    F: Fn(f64) -> T,
{
    let shape = field.shape();
    let len = interleaved_len(shape.len())?;
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|_| WavefrontError::Allocation { len })?;

    for iy in 0..shape.ny {
        for ix in 0..shape.nx {
            for iz in 0..shape.nz {
                let value = field[(ix, iy, iz)];
                values.push(cast(value.re));
                values.push(cast(value.im));
            }
        }
    }
    Ok(values)
}

fn zeroed<T: Copy + Default>(len: usize) -> WavefrontResult<Vec<T>> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|_| WavefrontError::Allocation { len })?;
    values.resize(len, T::default());
    Ok(values)
}

fn interleaved_len(complex_len: usize) -> WavefrontResult<usize> {
    complex_len
        .checked_mul(2)
        .ok_or(WavefrontError::IntegerOverflow {
            name: "SRW flat array length",
            value: complex_len,
        })
}

#[cfg(test)]
mod tests {
    use super::{
        SrwArray, SrwElementType, complex_to_srw_array, srw_array_alloc, srw_array_to_complex,
    };
    use crate::domain::WavefrontError;
    use crate::field::{ComplexField3, FieldShape};
    use num_complex::Complex64;

    fn sample(shape: FieldShape) -> ComplexField3 {
        ComplexField3::from_fn(shape, |ix, iy, iz| {
            Complex64::new((100 * ix + 10 * iy + iz) as f64, -((ix + iy + iz) as f64))
        })
    }

    #[test]
    fn layout_is_y_major_with_interleaved_parts() {
        let field = sample(FieldShape::new(2, 3, 2));
        let array = complex_to_srw_array(&field, SrwElementType::Double)
            .expect("conversion should succeed");

        assert_eq!(array.len(), 2 * 2 * 3 * 2);
        // flat complex index k = (iy * nx + ix) * nz + iz
        let k = (2 * 2 + 1) * 2 + 1;
        assert_eq!(array.get(2 * k), Some(121.0));
        assert_eq!(array.get(2 * k + 1), Some(-4.0));
        assert_eq!(array.get(0), Some(0.0));
        assert_eq!(array.get(2), Some(1.0));
    }

    #[test]
    fn float_storage_casts_each_part() {
        let field = sample(FieldShape::new(1, 1, 2));
        let array =
            complex_to_srw_array(&field, SrwElementType::Float).expect("conversion should succeed");

        assert_eq!(array, SrwArray::Float(vec![0.0, 0.0, 1.0, -1.0]));
        assert_eq!(array.element_type(), SrwElementType::Float);
    }

    #[test]
    fn inverse_restores_xyz_axis_order() {
        let shape = FieldShape::new(3, 2, 4);
        let field = sample(shape);
        let array = complex_to_srw_array(&field, SrwElementType::Double)
            .expect("conversion should succeed");

        let restored = srw_array_to_complex(&array, shape).expect("inverse should succeed");
        assert_eq!(restored, field);
    }

    #[test]
    fn inverse_rejects_wrong_length() {
        let error = srw_array_to_complex(&SrwArray::Double(vec![0.0; 6]), FieldShape::new(2, 2, 1))
            .expect_err("length should not match");
        assert!(matches!(error, WavefrontError::ShapeMismatch { .. }));
    }

    #[test]
    fn large_allocations_are_exact_and_zeroed() {
        let len = 10_000_000 + 12_345;
        let array = srw_array_alloc(SrwElementType::Float, len).expect("allocation should succeed");

        assert_eq!(array.len(), len);
        assert_eq!(array.element_type(), SrwElementType::Float);
        assert!(array.is_all_zero());
    }

    #[test]
    fn empty_allocation_is_empty() {
        let array = srw_array_alloc(SrwElementType::Double, 0).expect("allocation should succeed");
        assert!(array.is_empty());
    }

    #[test]
    fn typecodes_match_array_module() {
        assert_eq!(SrwElementType::Float.typecode(), 'f');
        assert_eq!(SrwElementType::Double.to_string(), "d");
        assert_eq!(
            serde_json::to_string(&SrwElementType::Double).expect("typecode should serialize"),
            "\"d\""
        );
    }
}
