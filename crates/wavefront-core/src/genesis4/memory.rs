use super::writer::{FieldContainer, FieldContainerReader, FieldStore, ScalarValue};
use crate::domain::{WavefrontError, WavefrontResult};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SliceDatasets {
    pub real: Vec<f64>,
    pub imag: Vec<f64>,
}

/// In-process image of one Genesis4 field file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemoryFieldFile {
    scalars: BTreeMap<String, ScalarValue>,
    slices: BTreeMap<String, SliceDatasets>,
}

impl MemoryFieldFile {
    pub fn scalar(&self, name: &str) -> Option<ScalarValue> {
        self.scalars.get(name).copied()
    }

    pub fn slice(&self, group: &str) -> Option<&SliceDatasets> {
        self.slices.get(group)
    }

    pub fn slice_names(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    pub fn slice_count(&self) -> usize {
        self.slices.len()
    }
}

impl FieldContainerReader for MemoryFieldFile {
    fn read_scalar(&self, name: &str) -> WavefrontResult<ScalarValue> {
        self.scalar(name)
            .ok_or_else(|| WavefrontError::missing_attribute("Genesis4 field file", name))
    }

    fn read_slice(&self, group: &str) -> WavefrontResult<(Vec<f64>, Vec<f64>)> {
        self.slice(group)
            .map(|slice| (slice.real.clone(), slice.imag.clone()))
            .ok_or_else(|| WavefrontError::missing_attribute("Genesis4 field file", group))
    }
}

/// Field store keeping every written file in memory, keyed by path.
///
/// Clones share the same set of files.
#[derive(Debug, Clone, Default)]
pub struct MemoryFieldStore {
    files: Rc<RefCell<BTreeMap<PathBuf, MemoryFieldFile>>>,
}

impl MemoryFieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<MemoryFieldFile> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files.borrow().contains_key(path.as_ref())
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }
}

impl FieldStore for MemoryFieldStore {
    type Container = MemoryFieldContainer;

    fn create(&self, path: &Path) -> WavefrontResult<Self::Container> {
        self.files.borrow_mut().remove(path);
        Ok(MemoryFieldContainer {
            files: Rc::clone(&self.files),
            path: path.to_path_buf(),
            file: MemoryFieldFile::default(),
        })
    }

    fn discard(&self, path: &Path) -> WavefrontResult<()> {
        self.files.borrow_mut().remove(path);
        Ok(())
    }
}

/// Open in-memory container; becomes visible in its store on `close`.
#[derive(Debug)]
pub struct MemoryFieldContainer {
    files: Rc<RefCell<BTreeMap<PathBuf, MemoryFieldFile>>>,
    path: PathBuf,
    file: MemoryFieldFile,
}

impl FieldContainer for MemoryFieldContainer {
    fn write_scalar(&mut self, name: &str, value: ScalarValue) -> WavefrontResult<()> {
        if self.file.scalars.contains_key(name) {
            return Err(WavefrontError::container(
                &self.path,
                format!("dataset '{name}' already exists"),
            ));
        }

        self.file.scalars.insert(name.to_string(), value);
        Ok(())
    }

    fn write_slice(&mut self, group: &str, real: &[f64], imag: &[f64]) -> WavefrontResult<()> {
        if self.file.slices.contains_key(group) {
            return Err(WavefrontError::container(
                &self.path,
                format!("group '{group}' already exists"),
            ));
        }

        self.file.slices.insert(
            group.to_string(),
            SliceDatasets {
                real: real.to_vec(),
                imag: imag.to_vec(),
            },
        );
        Ok(())
    }

    fn close(self) -> WavefrontResult<()> {
        self.files.borrow_mut().insert(self.path, self.file);
        Ok(())
    }
}
