//! Recording stores.
//!
//! A store holds one `samples × (channels + 1)` array per subject-hour; the
//! last column is the seizure indicator. Arrays are visited in discovery
//! order and the subject id is the array name's prefix before the configured
//! delimiter (`chb01_03` -> `chb01`). New backends implement
//! [`RecordingStore`].

use crate::error::{Result, SeizureError};
use crate::types::Recording;
use ndarray::Array2;
use std::path::Path;

pub mod text;
#[cfg(feature = "hdf5")]
pub mod h5;

pub use text::TextStore;
#[cfg(feature = "hdf5")]
pub use h5::Hdf5Store;

/// Common interface of all store backends.
///
/// Backends hold their underlying handle for their lifetime and release it
/// on drop.
pub trait RecordingStore {
    /// Array names in discovery order
    fn entries(&self) -> Result<Vec<String>>;

    /// Read one array as a `samples × columns` matrix
    fn read(&self, entry: &str) -> Result<Array2<f64>>;

    /// Backend name (e.g. "HDF5", "text")
    fn format_name(&self) -> &str;

    /// Read every array as a [`Recording`], in discovery order
    fn load_all(&self, subject_delimiter: &str) -> Result<Vec<Recording>> {
        let entries = self.entries()?;
        log::info!("Reading {} arrays from {} store", entries.len(), self.format_name());

        entries
            .iter()
            .map(|entry| {
                let matrix = self.read(entry)?;
                let subject = subject_from_name(entry, subject_delimiter);
                log::debug!(
                    "Loaded '{}' (subject {}): {} samples × {} columns",
                    entry,
                    subject,
                    matrix.nrows(),
                    matrix.ncols()
                );
                Recording::from_matrix(subject, entry.clone(), matrix)
            })
            .collect()
    }
}

/// Subject id of an array: its base name up to the first `delimiter`.
pub fn subject_from_name(name: &str, delimiter: &str) -> String {
    let base = name.rsplit('/').next().unwrap_or(name);
    base.split(delimiter).next().unwrap_or(base).to_string()
}

/// Factory for opening a store based on its path
pub struct StoreFactory;

impl StoreFactory {
    /// Directories and glob patterns open as text stores; `.h5`/`.hdf5`
    /// files as HDF5 stores (requires the `hdf5` feature).
    pub fn open(path: &Path) -> Result<Box<dyn RecordingStore>> {
        if path.is_dir() || path.to_string_lossy().contains(['*', '?', '[']) {
            return Ok(Box::new(TextStore::open(path)?));
        }

        if !path.exists() {
            return Err(SeizureError::StoreRead(format!(
                "store not found: {}",
                path.display()
            )));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "h5" | "hdf5" | "he5" => Self::open_hdf5(path),
            "csv" | "txt" => Ok(Box::new(TextStore::open(path)?)),
            other => Err(SeizureError::StoreRead(format!(
                "unsupported store type '{}' for {}",
                other,
                path.display()
            ))),
        }
    }

    #[cfg(feature = "hdf5")]
    fn open_hdf5(path: &Path) -> Result<Box<dyn RecordingStore>> {
        Ok(Box::new(Hdf5Store::open(path)?))
    }

    #[cfg(not(feature = "hdf5"))]
    fn open_hdf5(path: &Path) -> Result<Box<dyn RecordingStore>> {
        Err(SeizureError::StoreRead(format!(
            "{} is an HDF5 store but this build lacks the 'hdf5' feature",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_from_name() {
        assert_eq!(subject_from_name("chb01_03", "_"), "chb01");
        assert_eq!(subject_from_name("/patients/chb12_27", "_"), "chb12");
        assert_eq!(subject_from_name("p7-h2", "-"), "p7");
        assert_eq!(subject_from_name("single", "_"), "single");
    }

    #[test]
    fn test_missing_store() {
        let result = StoreFactory::open(Path::new("/nonexistent/store.h5"));
        assert!(matches!(result, Err(SeizureError::StoreRead(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.edf");
        std::fs::write(&path, b"").unwrap();
        assert!(StoreFactory::open(&path).is_err());
    }
}
