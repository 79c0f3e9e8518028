use super::Genesis4Params;
use super::writer::{
    FIELD_IMAG, FIELD_REAL, FieldContainer, FieldContainerReader, FieldStore, ScalarValue,
    read_genesis4_field,
};
use crate::domain::{WavefrontError, WavefrontResult};
use crate::field::ComplexField3;
use hdf5::File;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Genesis4 field files on disk through libhdf5.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hdf5FieldStore;

impl FieldStore for Hdf5FieldStore {
    type Container = Hdf5FieldContainer;

    fn create(&self, path: &Path) -> WavefrontResult<Self::Container> {
        let file = File::create(path)?;
        Ok(Hdf5FieldContainer {
            file,
            path: path.to_path_buf(),
        })
    }

    fn discard(&self, path: &Path) -> WavefrontResult<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(WavefrontError::container(path, error.to_string())),
        }
    }
}

/// Writable Genesis4 field file; the handle is released on drop.
#[derive(Debug)]
pub struct Hdf5FieldContainer {
    file: File,
    path: PathBuf,
}

impl FieldContainer for Hdf5FieldContainer {
    fn write_scalar(&mut self, name: &str, value: ScalarValue) -> WavefrontResult<()> {
        match value {
            ScalarValue::Int32(value) => self
                .file
                .new_dataset::<i32>()
                .shape(1)
                .create(name)?
                .write_raw(&[value])?,
            ScalarValue::Float64(value) => self
                .file
                .new_dataset::<f64>()
                .shape(1)
                .create(name)?
                .write_raw(&[value])?,
        }
        Ok(())
    }

    fn write_slice(&mut self, group: &str, real: &[f64], imag: &[f64]) -> WavefrontResult<()> {
        let slice = self.file.create_group(group)?;
        slice
            .new_dataset::<f64>()
            .shape(real.len())
            .create(FIELD_REAL)?
            .write_raw(real)?;
        slice
            .new_dataset::<f64>()
            .shape(imag.len())
            .create(FIELD_IMAG)?
            .write_raw(imag)?;
        Ok(())
    }

    fn close(self) -> WavefrontResult<()> {
        self.file
            .flush()
            .map_err(|error| WavefrontError::container(&self.path, error.to_string()))
    }
}

struct Hdf5FieldReader {
    file: File,
}

impl FieldContainerReader for Hdf5FieldReader {
    fn read_scalar(&self, name: &str) -> WavefrontResult<ScalarValue> {
        let dataset = self.file.dataset(name)?;
        let value = if dataset.dtype()?.is::<i32>() {
            ScalarValue::Int32(first_value(name, dataset.read_raw::<i32>()?)?)
        } else {
            ScalarValue::Float64(first_value(name, dataset.read_raw::<f64>()?)?)
        };
        Ok(value)
    }

    fn read_slice(&self, group: &str) -> WavefrontResult<(Vec<f64>, Vec<f64>)> {
        let slice = self.file.group(group)?;
        let real = slice.dataset(FIELD_REAL)?.read_raw::<f64>()?;
        let imag = slice.dataset(FIELD_IMAG)?.read_raw::<f64>()?;
        Ok((real, imag))
    }
}

fn first_value<T: Copy>(name: &str, values: Vec<T>) -> WavefrontResult<T> {
    values
        .first()
        .copied()
        .ok_or_else(|| WavefrontError::attribute_type("Genesis4 field file", name, "a singleton"))
}

/// Read a Genesis4 field file back into its parameters and field.
pub fn read_genesis4_field_file(
    path: impl AsRef<Path>,
) -> WavefrontResult<(Genesis4Params, ComplexField3)> {
    let reader = Hdf5FieldReader {
        file: File::open(path)?,
    };
    read_genesis4_field(&reader)
}
