use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::{LoadError, load_file};
use super::model::Dataset;

// ---------------------------------------------------------------------------
// DatasetService – owns the one-time load of the source file
// ---------------------------------------------------------------------------

/// Loads the dataset on first use and hands out the same shared copy after.
///
/// Created once in `main` and passed to whoever needs the table; the file is
/// never read again for the lifetime of the service.
#[derive(Debug)]
pub struct DatasetService {
    path: PathBuf,
    dataset: OnceCell<Arc<Dataset>>,
}

impl DatasetService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dataset: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file has already been read successfully.
    pub fn is_loaded(&self) -> bool {
        self.dataset.get().is_some()
    }

    /// Return the dataset, reading the file only on the first successful call.
    pub fn load(&self) -> Result<Arc<Dataset>, LoadError> {
        if let Some(ds) = self.dataset.get() {
            return Ok(Arc::clone(ds));
        }

        let dataset = match load_file(&self.path) {
            Ok(ds) => ds,
            Err(e) => {
                log::error!("Failed to load {}: {e}", self.path.display());
                return Err(e);
            }
        };

        log::info!(
            "Loaded {} listings from {} with extra columns {:?}",
            dataset.len(),
            self.path.display(),
            dataset.extra_columns
        );
        let incomplete = dataset.incomplete_rows();
        if incomplete > 0 {
            log::warn!("{incomplete} listings have missing brand, type, year or price values");
        }

        Ok(Arc::clone(self.dataset.get_or_init(|| Arc::new(dataset))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::tests::fixture;

    #[test]
    fn second_load_reuses_the_first_read() {
        let path = fixture(
            "memo.csv",
            "Brand,Bike Type,Year,Price\nHonda,Scooter,2015,300000\n",
        );
        let service = DatasetService::new(&path);
        assert!(!service.is_loaded());

        let first = service.load().unwrap();
        std::fs::remove_file(&path).unwrap();
        let second = service.load().unwrap();

        assert!(service.is_loaded());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let path = std::env::temp_dir().join("bike-dash-missing-service.csv");
        let service = DatasetService::new(&path);

        assert!(matches!(service.load(), Err(LoadError::Io { .. })));
        assert!(!service.is_loaded());
    }
}
