use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Failed to write spreadsheet: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Required column '{0}' not found in input file")]
    MissingColumn(String),

    #[error("Workbook contains no worksheets: {}", .0.display())]
    EmptyWorkbook(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Element not found: {0}")]
    NotFound(String),

    #[error("Element is no longer attached: {0}")]
    Stale(String),

    #[error("Browser session lost: {0}")]
    SessionLost(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Browser unavailable: {0}")]
    BrowserUnavailable(String),
}

impl Error {
    /// True when the browser session itself is unusable and must be replaced.
    pub fn is_session_loss(&self) -> bool {
        matches!(self, Error::SessionLost(_))
    }

    /// True when the target element was absent or detached from the page.
    pub fn is_missing_element(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::Stale(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
