use crate::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Everything a batch run needs to know, fixed at build time.
#[derive(Debug, Clone)]
pub struct Config {
    /// Spreadsheet holding the serial numbers to check
    pub input_path: PathBuf,
    /// Spreadsheet the results are written to (and resumed from)
    pub output_path: PathBuf,
    /// Warranty lookup page
    pub target_url: String,
    pub columns: ColumnMap,
    pub timeouts: Timeouts,
    pub browser: BrowserOptions,
}

/// Header names of the required input columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub serial: String,
    pub model: String,
    pub device: String,
}

/// Bounded-wait durations used by the lookup workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Wait for each cookie-consent strategy
    pub consent: Duration,
    /// Wait for form controls and the results panel
    pub page: Duration,
    /// Wait for either the model-number prompt or the results panel after submitting
    pub detection: Duration,
    /// Delay between polls while waiting
    pub poll: Duration,
}

/// How the browser is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserOptions {
    pub headless: bool,
    pub window_size: (u32, u32),
    pub user_agent: String,
    /// Explicit Chrome binary; platform defaults are searched when unset
    pub chrome_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("serials.xlsx"),
            output_path: PathBuf::from("warranty_results.xlsx"),
            target_url: "https://support.hp.com/us-en/check-warranty".to_string(),
            columns: ColumnMap::default(),
            timeouts: Timeouts::default(),
            browser: BrowserOptions::default(),
        }
    }
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            serial: "Serial Number".to_string(),
            model: "Model Number".to_string(),
            device: "Device Name".to_string(),
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            consent: Duration::from_secs(10),
            page: Duration::from_secs(60),
            detection: Duration::from_secs(30),
            poll: Duration::from_millis(250),
        }
    }
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: false,
            window_size: (1920, 1080),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/100.0.4896.88 Safari/537.36"
                .to_string(),
            chrome_path: None,
        }
    }
}

impl Config {
    /// Reject configurations the workflow cannot run with
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.target_url)
            .map_err(|e| Error::InvalidConfig(format!("target URL '{}': {}", self.target_url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::InvalidConfig(format!(
                "target URL must be http(s), got '{}'",
                url.scheme()
            )));
        }

        let named = [
            ("consent", self.timeouts.consent),
            ("page", self.timeouts.page),
            ("detection", self.timeouts.detection),
            ("poll", self.timeouts.poll),
        ];
        for (name, value) in named {
            if value.is_zero() {
                return Err(Error::InvalidConfig(format!("{} timeout must be non-zero", name)));
            }
        }

        let columns = [&self.columns.serial, &self.columns.model, &self.columns.device];
        if columns.iter().any(|c| c.trim().is_empty()) {
            return Err(Error::InvalidConfig("column names must not be empty".to_string()));
        }

        Ok(())
    }
}
