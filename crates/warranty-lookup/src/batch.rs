use crate::lookup::run_lookup;
use crate::progress::{NullProgress, Progress};
use warranty_core::store::Checkpoint;
use warranty_core::{
    BrowserSession, Config, FailureKind, ResultDataset, ResultRecord, Result, SessionLauncher,
    WorkItem,
};

/// Outcome of one batch run
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Prior records followed by the records produced in this run
    pub dataset: ResultDataset,
    /// Work items that already had a record before the run
    pub already_done: usize,
    /// Work items that still needed a lookup when the run started
    pub pending: usize,
    /// Lookups performed in this run
    pub processed: usize,
    /// True when the browser could not be re-established and the run ended
    /// before every pending item was looked up
    pub stopped_early: bool,
}

/// Runs lookups for every work item that has no result yet, saving after
/// each one so an interrupted run can be resumed.
pub struct BatchDriver<L: SessionLauncher, C: Checkpoint> {
    config: Config,
    launcher: L,
    checkpoint: C,
    progress: Box<dyn Progress>,
}

impl<L: SessionLauncher, C: Checkpoint> BatchDriver<L, C> {
    pub fn new(config: Config, launcher: L, checkpoint: C) -> Self {
        Self {
            config,
            launcher,
            checkpoint,
            progress: Box::new(NullProgress),
        }
    }

    pub fn with_progress(mut self, progress: impl Progress + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Process the work items that have no record in `prior`.
    ///
    /// Fails only when the first browser session cannot be started. Losing a
    /// session later records the item in flight as
    /// [`FailureKind::SessionLost`] and continues with a fresh session; if no
    /// fresh session can be started the run stops early with its progress
    /// saved.
    pub async fn run(&mut self, work_items: &[WorkItem], prior: ResultDataset) -> Result<BatchReport> {
        let pending = prior.pending(work_items);
        let already_done = work_items.len() - pending.len();

        if pending.is_empty() {
            tracing::info!(
                "All serial numbers already processed or no new serial numbers to check"
            );
            return Ok(BatchReport {
                dataset: prior,
                already_done,
                pending: 0,
                processed: 0,
                stopped_early: false,
            });
        }

        tracing::info!(
            "Found {} total serial number(s); will process {} new/remaining",
            work_items.len(),
            pending.len()
        );

        let mut session = Some(self.launcher.launch().await?);
        let mut dataset = prior;
        let mut processed = 0;
        let mut stopped_early = false;

        self.progress.begin(work_items.len(), already_done);

        for (offset, item) in pending.iter().enumerate() {
            let Some(active) = session.as_mut() else {
                break;
            };

            let position = already_done + offset + 1;
            tracing::info!(
                "Processing {}/{} - Serial Number: {}",
                position,
                work_items.len(),
                item.serial
            );
            self.progress.item_started(position, item);

            let (record, session_lost) = match run_lookup(active, item, &self.config).await {
                Ok(outcome) => (outcome.into_record(item), false),
                Err(e) => {
                    tracing::error!("WebDriver error for SN {}: {}", item.serial, e);
                    (ResultRecord::failure(item, FailureKind::SessionLost), true)
                }
            };

            self.progress.item_finished(&record);
            dataset.push(record);
            processed += 1;
            self.save_incremental(&dataset);

            if session_lost {
                tracing::warn!("The browser session may have been lost. Attempting to re-establish it.");
                if let Some(mut lost) = session.take() {
                    if let Err(e) = lost.shutdown().await {
                        tracing::debug!("Shutting down lost session failed: {}", e);
                    }
                }
                match self.launcher.launch().await {
                    Ok(fresh) => session = Some(fresh),
                    Err(e) => {
                        tracing::error!("Failed to re-establish browser session: {}. Stopping.", e);
                        stopped_early = true;
                        break;
                    }
                }
            }
        }

        if !dataset.is_empty() {
            match self.checkpoint.save(&dataset) {
                Ok(()) => tracing::info!("Final results saved ({} rows)", dataset.len()),
                Err(e) => tracing::error!("Could not perform final save: {}", e),
            }
        }

        if let Some(mut active) = session {
            if let Err(e) = active.shutdown().await {
                tracing::warn!("Browser shutdown failed: {}", e);
            }
        }

        self.progress.finish();

        Ok(BatchReport {
            dataset,
            already_done,
            pending: pending.len(),
            processed,
            stopped_early,
        })
    }

    fn save_incremental(&mut self, dataset: &ResultDataset) {
        match self.checkpoint.save(dataset) {
            Ok(()) => tracing::debug!("Results saved incrementally"),
            Err(e) => tracing::warn!(
                "Could not save incremental results. Is the file open? {}",
                e
            ),
        }
    }
}
