pub mod batch;
pub mod consent;
pub mod lookup;
pub mod progress;
pub mod site;
pub mod summary;
pub mod wait;

pub use batch::{BatchDriver, BatchReport};
pub use consent::attempt_dismiss_consent;
pub use lookup::{LookupOutcome, run_lookup};
pub use progress::{NullProgress, Progress};
pub use summary::RunSummary;
pub use wait::{Probe, first_of, wait_for};
