use std::collections::HashSet;
use std::fmt;

/// Marker for a field the results panel did not provide
pub const NOT_FOUND: &str = "Not Found";

/// Date marker written on every failure record
pub const ERROR_MARKER: &str = "Error";

/// One serial number to look up, as read from the input spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub serial: String,
    pub model_hint: Option<String>,
    pub device_label: String,
}

impl WorkItem {
    pub fn new(
        serial: impl Into<String>,
        model_hint: Option<String>,
        device_label: impl Into<String>,
    ) -> Self {
        Self {
            serial: serial.into(),
            model_hint,
            device_label: device_label.into(),
        }
    }

    /// Model hint suitable for the disambiguation prompt.
    ///
    /// Empty hints and the `nan` marker that spreadsheet tools write for blank
    /// cells are treated as missing.
    pub fn usable_model_hint(&self) -> Option<&str> {
        self.model_hint
            .as_deref()
            .map(str::trim)
            .filter(|hint| !hint.is_empty() && !hint.eq_ignore_ascii_case("nan"))
    }
}

/// Classified reasons a lookup produced no warranty details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Neither the model-number prompt nor the results panel appeared
    NavigationTimeout,
    /// Unexpected failure while waiting for the post-submit page
    DynamicDetection,
    /// The results panel had no parseable items
    Scraping,
    /// Extracting the panel's items timed out
    ScrapingTimeout,
    /// Any other failure while reading the panel's items
    UnhandledScraping,
    /// The results panel never became visible
    InfoSectionTimeout,
    /// Other failure while waiting for the results panel
    InfoSection,
    /// A bounded wait outside the stages above timed out
    GlobalTimeout,
    /// The browser session became unusable
    SessionLost,
    /// Catch-all for anything else during one lookup
    UnhandledScript,
    /// Initial placeholder status; never written by the workflow
    Processing,
}

impl FailureKind {
    pub const ALL: [FailureKind; 11] = [
        FailureKind::NavigationTimeout,
        FailureKind::DynamicDetection,
        FailureKind::Scraping,
        FailureKind::ScrapingTimeout,
        FailureKind::UnhandledScraping,
        FailureKind::InfoSectionTimeout,
        FailureKind::InfoSection,
        FailureKind::GlobalTimeout,
        FailureKind::SessionLost,
        FailureKind::UnhandledScript,
        FailureKind::Processing,
    ];

    /// Status token stored in the results spreadsheet
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NavigationTimeout => "Navigation Timeout",
            FailureKind::DynamicDetection => "Dynamic Detection Error",
            FailureKind::Scraping => "Scraping Error",
            FailureKind::ScrapingTimeout => "Scraping Timeout",
            FailureKind::UnhandledScraping => "Unhandled Scraping Error",
            FailureKind::InfoSectionTimeout => "Info Section Timeout",
            FailureKind::InfoSection => "Info Section Error",
            FailureKind::GlobalTimeout => "Global Timeout",
            FailureKind::SessionLost => "WebDriver Session Lost",
            FailureKind::UnhandledScript => "Unhandled Script Error",
            FailureKind::Processing => "Processing Error",
        }
    }

    /// Parse a stored status token back into a failure kind
    pub fn from_status(status: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == status)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields scraped from the results panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarrantyDetails {
    pub status: String,
    pub start_date: String,
    pub end_date: String,
}

impl Default for WarrantyDetails {
    fn default() -> Self {
        Self {
            status: NOT_FOUND.to_string(),
            start_date: NOT_FOUND.to_string(),
            end_date: NOT_FOUND.to_string(),
        }
    }
}

impl WarrantyDetails {
    /// Store a labelled value. Returns false for labels the panel may carry
    /// but the results file has no column for.
    pub fn apply(&mut self, label: &str, value: String) -> bool {
        match label {
            "Status" => self.status = value,
            "Start date" => self.start_date = value,
            "End date" => self.end_date = value,
            _ => return false,
        }
        true
    }
}

/// One row of the results spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub device_label: String,
    pub serial: String,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
}

impl ResultRecord {
    pub fn found(item: &WorkItem, details: WarrantyDetails) -> Self {
        Self {
            device_label: item.device_label.clone(),
            serial: item.serial.clone(),
            status: details.status,
            start_date: details.start_date,
            end_date: details.end_date,
        }
    }

    pub fn failure(item: &WorkItem, kind: FailureKind) -> Self {
        Self {
            device_label: item.device_label.clone(),
            serial: item.serial.clone(),
            status: kind.as_str().to_string(),
            start_date: ERROR_MARKER.to_string(),
            end_date: ERROR_MARKER.to_string(),
        }
    }

    /// Failure classification, if the status is one of the failure tokens
    pub fn failure_kind(&self) -> Option<FailureKind> {
        FailureKind::from_status(&self.status)
    }
}

/// Ordered results, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultDataset {
    records: Vec<ResultRecord>,
}

impl ResultDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ResultRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter()
    }

    /// Serials that already have a record
    pub fn completed_serials(&self) -> HashSet<&str> {
        self.records.iter().map(|r| r.serial.as_str()).collect()
    }

    /// Work items without a record yet, in input order
    pub fn pending<'a>(&self, items: &'a [WorkItem]) -> Vec<&'a WorkItem> {
        let done = self.completed_serials();
        items
            .iter()
            .filter(|item| !done.contains(item.serial.as_str()))
            .collect()
    }

    /// Number of records whose status is exactly `status`
    pub fn count_status(&self, status: &str) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }
}
