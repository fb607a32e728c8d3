//! Plain-text persistence of the weight vector.
//!
//! The file holds one weight per line, formatted with six decimals, in
//! feature order:
//!
//! ```text
//! 0.125000
//! -0.731552
//! ...
//! ```
//!
//! Saving writes the file name plus `.tmp` and renames it over the target, so a
//! failed save leaves the previous file untouched. Loading does not know the
//! expected length; the caller checks it.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write as _},
    num::ParseFloatError,
    path::{Path, PathBuf},
};

/// Default location of the weight file, relative to the working directory.
pub const DEFAULT_PATH: &str = "agent_weights/weights.txt";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum WeightStoreError {
    #[display("weight file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[display("failed to access weight file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: io::Error,
    },
    #[display("invalid weight on line {line} of {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        source: ParseFloatError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightStore {
    path: PathBuf,
}

impl Default for WeightStore {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

impl WeightStore {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every weight in the file. Blank lines are skipped.
    pub fn load(&self) -> Result<Vec<f64>, WeightStoreError> {
        let content = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                WeightStoreError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                WeightStoreError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        let mut weights = vec![];
        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let weight = line.parse().map_err(|source| WeightStoreError::Parse {
                path: self.path.clone(),
                line: i + 1,
                source,
            })?;
            weights.push(weight);
        }
        log::debug!(
            "Loaded {} weights from {}",
            weights.len(),
            self.path.display()
        );
        Ok(weights)
    }

    /// Writes `weights`, creating the parent directory if needed.
    pub fn save(&self, weights: &[f64]) -> Result<(), WeightStoreError> {
        let io_error = |source| WeightStoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let temp_path = self.temp_path();
        {
            let file = File::create(&temp_path).map_err(io_error)?;
            let mut writer = BufWriter::new(file);
            for weight in weights {
                writeln!(writer, "{weight:.6}").map_err(io_error)?;
            }
            let file = writer.into_inner().map_err(|e| io_error(e.into_error()))?;
            file.sync_all().map_err(io_error)?;
        }
        fs::rename(&temp_path, &self.path).map_err(io_error)?;

        log::debug!(
            "Saved {} weights to {}",
            weights.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Sibling the weights are written to before replacing the real file.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_round_trip_within_six_decimals() {
        let dir = TempDir::new().unwrap();
        let store = WeightStore::new(dir.path().join("nested/weights.txt"));
        let weights = [0.5, -0.123_456_789, 1e-7, 42.0, -0.999_999_9];

        store.save(&weights).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.len(), weights.len());
        for (l, w) in loaded.iter().zip(weights) {
            assert!((l - w).abs() <= 1e-6, "{l} != {w}");
        }
        assert!(!dir.path().join("nested/weights.txt.tmp").exists());
    }

    #[test]
    fn test_file_format() {
        let dir = TempDir::new().unwrap();
        let store = WeightStore::new(dir.path().join("weights.txt"));
        store.save(&[1.0, -0.25]).unwrap();
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "1.000000\n-0.250000\n");
    }

    #[test]
    fn test_save_replaces_previous_file() {
        let dir = TempDir::new().unwrap();
        let store = WeightStore::new(dir.path().join("weights.txt"));
        store.save(&[1.0, 2.0, 3.0]).unwrap();
        store.save(&[4.0]).unwrap();
        assert_eq!(store.load().unwrap(), vec![4.0]);
    }

    #[test]
    fn test_failed_save_keeps_tmp_named_file() {
        let dir = TempDir::new().unwrap();
        let store = WeightStore::new(dir.path().join("weights.tmp"));
        store.save(&[1.0, 2.0]).unwrap();

        // block the temporary sibling so the next write cannot start
        fs::create_dir(dir.path().join("weights.tmp.tmp")).unwrap();
        assert!(matches!(store.save(&[3.0]), Err(WeightStoreError::Io { .. })));
        assert_eq!(store.load().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = WeightStore::new(dir.path().join("absent.txt"));
        assert!(matches!(store.load(), Err(WeightStoreError::NotFound { .. })));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weights.txt");
        fs::write(&path, "0.1\n\nnot-a-number\n").unwrap();
        let err = WeightStore::new(&path).load().unwrap_err();
        assert!(matches!(err, WeightStoreError::Parse { line: 3, .. }));
        assert!(err.to_string().contains("line 3"));
    }
}
