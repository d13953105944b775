use super::RecordingStore;
use crate::error::{Result, SeizureError};
use crate::mmap_utils::mmap_file;
use crate::parser::parse_matrix_from_bytes;
use ndarray::Array2;
use std::path::{Path, PathBuf};

const TEXT_EXTENSIONS: &[&str] = &["csv", "txt"];

/// Directory (or glob pattern) of delimited text files, one per subject-hour.
///
/// Entries are the file stems, ordered by path.
pub struct TextStore {
    root: String,
    files: Vec<(String, PathBuf)>,
}

impl TextStore {
    /// Open a directory, a single file, or a glob pattern such as
    /// `data/chb*.csv`
    pub fn open(path: &Path) -> Result<Self> {
        let root = path.display().to_string();

        let mut paths: Vec<PathBuf> = if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            let patterns: Vec<String> = if path.is_dir() {
                TEXT_EXTENSIONS
                    .iter()
                    .map(|ext| path.join(format!("*.{}", ext)).display().to_string())
                    .collect()
            } else {
                vec![root.clone()]
            };

            let mut found = Vec::new();
            for pattern in &patterns {
                let entries = glob::glob(pattern).map_err(|e| {
                    SeizureError::StoreRead(format!("invalid pattern '{}': {}", pattern, e))
                })?;
                for entry in entries {
                    let p = entry.map_err(|e| SeizureError::StoreRead(e.to_string()))?;
                    if p.is_file() {
                        found.push(p);
                    }
                }
            }
            found
        };

        paths.sort();
        paths.dedup();

        if paths.is_empty() {
            return Err(SeizureError::StoreRead(format!(
                "no .csv or .txt recordings found at {}",
                root
            )));
        }

        let files: Vec<(String, PathBuf)> = paths
            .into_iter()
            .map(|p| {
                let name = p
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("recording")
                    .to_string();
                (name, p)
            })
            .collect();

        for (i, (name, path)) in files.iter().enumerate() {
            if let Some((_, other)) = files[..i].iter().find(|(n, _)| n == name) {
                return Err(SeizureError::StoreRead(format!(
                    "{} and {} both map to entry '{}'",
                    other.display(),
                    path.display(),
                    name
                )));
            }
        }

        Ok(Self { root, files })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    fn path_of(&self, entry: &str) -> Result<&Path> {
        self.files
            .iter()
            .find(|(name, _)| name == entry)
            .map(|(_, p)| p.as_path())
            .ok_or_else(|| SeizureError::StoreRead(format!("no entry '{}' in {}", entry, self.root)))
    }
}

impl RecordingStore for TextStore {
    fn entries(&self) -> Result<Vec<String>> {
        Ok(self.files.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read(&self, entry: &str) -> Result<Array2<f64>> {
        let path = self.path_of(entry)?;
        if std::fs::metadata(path)?.len() == 0 {
            return Err(SeizureError::StoreRead(format!(
                "{} is empty",
                path.display()
            )));
        }
        let mmap = mmap_file(path)?;
        parse_matrix_from_bytes(&mmap, &path.display().to_string())
    }

    fn format_name(&self) -> &str {
        "text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_directory_discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("chb02_01.csv"), "1,2,0\n3,4,1\n").unwrap();
        fs::write(dir.path().join("chb01_02.txt"), "5 6 0\n").unwrap();
        fs::write(dir.path().join("chb01_01.csv"), "7,8,0\n").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let store = TextStore::open(dir.path()).unwrap();
        assert_eq!(
            store.entries().unwrap(),
            vec!["chb01_01", "chb01_02", "chb02_01"]
        );

        let recordings = store.load_all("_").unwrap();
        assert_eq!(recordings.len(), 3);
        assert_eq!(recordings[0].subject, "chb01");
        assert_eq!(recordings[2].subject, "chb02");
        assert_eq!(recordings[2].seizure_flags(), &[false, true]);
    }

    #[test]
    fn test_glob_pattern() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a_1.csv"), "1,2,0\n").unwrap();
        fs::write(dir.path().join("b_1.csv"), "1,2,0\n").unwrap();
        let pattern = dir.path().join("a_*.csv");
        let store = TextStore::open(&pattern).unwrap();
        assert_eq!(store.entries().unwrap(), vec!["a_1"]);
    }

    #[test]
    fn test_same_stem_in_two_formats_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("s_1.csv"), "1,2,0\n").unwrap();
        fs::write(dir.path().join("s_1.txt"), "1 2 0\n3 4 1\n").unwrap();
        assert!(matches!(
            TextStore::open(dir.path()),
            Err(SeizureError::StoreRead(msg)) if msg.contains("'s_1'")
        ));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            TextStore::open(dir.path()),
            Err(SeizureError::StoreRead(_))
        ));
    }

    #[test]
    fn test_empty_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("s_1.csv"), "").unwrap();
        let store = TextStore::open(dir.path()).unwrap();
        assert!(matches!(store.read("s_1"), Err(SeizureError::StoreRead(_))));
        assert!(store.read("missing").is_err());
    }
}
