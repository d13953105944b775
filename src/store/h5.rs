use super::RecordingStore;
use crate::error::{Result, SeizureError};
use hdf5::File as H5File;
use ndarray::Array2;
use std::path::Path;

/// HDF5 file holding one 2-D dataset per subject-hour.
///
/// Datasets are discovered depth-first, in group member order. The file
/// handle is closed when the store is dropped.
pub struct Hdf5Store {
    path: String,
    file: H5File,
}

impl Hdf5Store {
    pub fn open(path: &Path) -> Result<Self> {
        let file = H5File::open(path).map_err(|e| {
            SeizureError::StoreRead(format!("failed to open {}: {}", path.display(), e))
        })?;
        log::info!("Opened HDF5 store {}", path.display());
        Ok(Self {
            path: path.display().to_string(),
            file,
        })
    }

    fn collect_datasets(
        &self,
        group: &hdf5::Group,
        prefix: &str,
        out: &mut Vec<String>,
    ) -> Result<()> {
        let members = group.member_names().map_err(|e| self.read_error(prefix, e))?;
        for member in members {
            let member_path = format!("{}/{}", prefix, member);
            if let Ok(dataset) = group.dataset(&member) {
                if dataset.ndim() == 2 {
                    out.push(member_path);
                } else {
                    log::debug!("Skipping {}: {}-D dataset", member_path, dataset.ndim());
                }
            } else if let Ok(child) = group.group(&member) {
                self.collect_datasets(&child, &member_path, out)?;
            }
        }
        Ok(())
    }

    fn read_error(&self, entry: &str, e: hdf5::Error) -> SeizureError {
        SeizureError::StoreRead(format!("{}:{}: {}", self.path, entry, e))
    }
}

impl RecordingStore for Hdf5Store {
    fn entries(&self) -> Result<Vec<String>> {
        let mut out = Vec::new();
        self.collect_datasets(&self.file, "", &mut out)?;
        if out.is_empty() {
            return Err(SeizureError::StoreRead(format!(
                "no 2-D datasets found in {}",
                self.path
            )));
        }
        Ok(out)
    }

    fn read(&self, entry: &str) -> Result<Array2<f64>> {
        let dataset = self.file.dataset(entry).map_err(|e| self.read_error(entry, e))?;
        let shape = dataset.shape();
        if shape.len() != 2 {
            return Err(SeizureError::StoreRead(format!(
                "{}:{}: expected a 2-D array, got {}-D",
                self.path,
                entry,
                shape.len()
            )));
        }
        let values: Vec<f64> = dataset.read_raw().map_err(|e| self.read_error(entry, e))?;
        Array2::from_shape_vec((shape[0], shape[1]), values)
            .map_err(|e| SeizureError::StoreRead(format!("{}:{}: {}", self.path, entry, e)))
    }

    fn format_name(&self) -> &str {
        "HDF5"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(path: &Path) {
        let file = H5File::create(path).unwrap();

        let top: Vec<f64> = vec![
            1.0, 2.0, 0.0, //
            3.0, 4.0, 0.0, //
            5.0, 6.0, 1.0, //
            7.0, 8.0, 1.0,
        ];
        file.new_dataset::<f64>()
            .shape((4, 3))
            .create("s1_01")
            .unwrap()
            .write_raw(&top)
            .unwrap();

        let group = file.create_group("deeper").unwrap();
        group
            .new_dataset::<f64>()
            .shape((2, 3))
            .create("s2_01")
            .unwrap()
            .write_raw(&[0.5, 0.5, 0.0, 0.25, 0.75, 1.0])
            .unwrap();
        group
            .new_dataset::<f64>()
            .shape(4)
            .create("flat")
            .unwrap()
            .write_raw(&[1.0, 2.0, 3.0, 4.0])
            .unwrap();
    }

    #[test]
    fn test_nested_groups_and_non_matrix_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.h5");
        write_fixture(&path);

        let store = Hdf5Store::open(&path).unwrap();
        assert_eq!(store.format_name(), "HDF5");
        assert_eq!(store.entries().unwrap(), vec!["/deeper/s2_01", "/s1_01"]);

        let matrix = store.read("/s1_01").unwrap();
        assert_eq!(matrix.dim(), (4, 3));
        assert_eq!(matrix[[2, 1]], 6.0);

        let recordings = store.load_all("_").unwrap();
        assert_eq!(recordings[0].subject, "s2");
        assert_eq!(recordings[0].seizure_flags(), &[false, true]);
        assert_eq!(recordings[1].subject, "s1");
        assert_eq!(recordings[1].num_channels(), 2);

        assert!(matches!(
            store.read("/deeper/flat"),
            Err(SeizureError::StoreRead(_))
        ));
    }

    #[test]
    fn test_store_without_matrices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.h5");
        H5File::create(&path).unwrap().create_group("nothing").unwrap();

        let store = Hdf5Store::open(&path).unwrap();
        assert!(matches!(store.entries(), Err(SeizureError::StoreRead(_))));
    }
}
