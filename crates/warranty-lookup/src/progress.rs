use warranty_core::{ResultRecord, WorkItem};

/// Human-facing progress reporting for a batch run.
///
/// Purely informational; implementations cannot influence the run.
pub trait Progress {
    /// Called once before the first lookup with the size of the whole input
    /// and how much of it was already completed by earlier runs.
    fn begin(&mut self, _total: usize, _already_done: usize) {}

    /// Called before each lookup; `position` is 1-based within the whole input.
    fn item_started(&mut self, _position: usize, _item: &WorkItem) {}

    /// Called after each lookup with the record that was stored.
    fn item_finished(&mut self, _record: &ResultRecord) {}

    /// Called at the end, whether the batch completed or stopped early.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;

impl Progress for NullProgress {}
