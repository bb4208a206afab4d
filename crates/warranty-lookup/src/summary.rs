use crate::batch::BatchReport;
use serde::Serialize;
use std::collections::BTreeMap;
use warranty_core::FailureKind;

/// End-of-run overview of the results dataset
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total_inputs: usize,
    pub already_done: usize,
    pub processed: usize,
    /// Pending items left unprocessed because the run stopped early
    pub remaining: usize,
    pub stopped_early: bool,
    pub total_records: usize,
    /// Records that carry warranty details rather than a failure token
    pub succeeded: usize,
    pub failed: usize,
    /// Record count per status string
    pub status_counts: BTreeMap<String, usize>,
    /// Rows still holding the placeholder status; they indicate a run that
    /// was interrupted by something other than this tool's own error handling
    pub placeholder_rows: usize,
}

impl RunSummary {
    pub fn from_report(report: &BatchReport, total_inputs: usize) -> Self {
        let mut status_counts = BTreeMap::new();
        let mut failed = 0;
        for record in report.dataset.iter() {
            *status_counts.entry(record.status.clone()).or_insert(0) += 1;
            if record.failure_kind().is_some() {
                failed += 1;
            }
        }

        let total_records = report.dataset.len();

        Self {
            total_inputs,
            already_done: report.already_done,
            processed: report.processed,
            remaining: report.pending - report.processed,
            stopped_early: report.stopped_early,
            total_records,
            succeeded: total_records - failed,
            failed,
            status_counts,
            placeholder_rows: report
                .dataset
                .count_status(FailureKind::Processing.as_str()),
        }
    }
}
