mod reader;
mod writer;

pub use reader::InputReader;
pub use writer::ResultWriter;

use crate::{ResultDataset, Result};
use std::path::{Path, PathBuf};

/// Column headers of the results spreadsheet, in order
pub const RESULT_HEADERS: [&str; 5] = [
    "Device Name",
    "Serial Number",
    "Status",
    "Start Date",
    "End Date",
];

/// Durable sink for the results dataset
pub trait Checkpoint {
    /// Persist the complete dataset, replacing whatever was stored before
    fn save(&mut self, dataset: &ResultDataset) -> Result<()>;
}

/// Results spreadsheet on disk
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load previously saved results.
    ///
    /// A missing file starts a fresh dataset. So does a file that cannot be
    /// read or lacks the serial column, after a warning.
    pub fn load(&self) -> ResultDataset {
        if !self.path.exists() {
            tracing::info!(
                "'{}' not found. Starting a new results file.",
                self.path.display()
            );
            return ResultDataset::new();
        }

        match reader::read_results(&self.path) {
            Ok(dataset) => {
                tracing::info!(
                    "Found {} serial numbers already processed in '{}'",
                    dataset.len(),
                    self.path.display()
                );
                dataset
            }
            Err(e) => {
                tracing::warn!(
                    "Could not use existing results file '{}': {}. Starting fresh.",
                    self.path.display(),
                    e
                );
                ResultDataset::new()
            }
        }
    }
}

impl Checkpoint for ResultStore {
    fn save(&mut self, dataset: &ResultDataset) -> Result<()> {
        ResultWriter::to_file(dataset, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailureKind, ResultRecord, WarrantyDetails, WorkItem};

    fn sample_dataset() -> ResultDataset {
        let laptop = WorkItem::new("ABC123", Some("HP-X1".to_string()), "Laptop-1");
        let desktop = WorkItem::new("XYZ789", None, "Desktop-7");
        ResultDataset::from_records(vec![
            ResultRecord::found(
                &laptop,
                WarrantyDetails {
                    status: "In Warranty".to_string(),
                    start_date: "2022-01-01".to_string(),
                    end_date: "2025-01-01".to_string(),
                },
            ),
            ResultRecord::failure(&desktop, FailureKind::NavigationTimeout),
        ])
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("absent.xlsx"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ResultStore::new(dir.path().join("results.xlsx"));
        let dataset = sample_dataset();

        store.save(&dataset).unwrap();
        let loaded = store.load();

        assert_eq!(loaded, dataset);
        assert_eq!(loaded.records()[1].status, "Navigation Timeout");
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ResultStore::new(dir.path().join("results.xlsx"));
        let dataset = sample_dataset();

        store.save(&dataset).unwrap();
        let first_only = ResultDataset::from_records(vec![dataset.records()[0].clone()]);
        store.save(&first_only).unwrap();

        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn test_load_unreadable_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.xlsx");
        std::fs::write(&path, b"this is not a workbook").unwrap();

        let store = ResultStore::new(path);
        assert!(store.load().is_empty());
    }
}
