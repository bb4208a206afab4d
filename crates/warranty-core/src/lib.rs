pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod store;

pub use config::{BrowserOptions, ColumnMap, Config, Timeouts};
pub use error::{Error, Result};
pub use model::{FailureKind, ResultDataset, ResultRecord, WarrantyDetails, WorkItem};
pub use session::{BrowserSession, Condition, FrameScope, Locator, SessionLauncher};
