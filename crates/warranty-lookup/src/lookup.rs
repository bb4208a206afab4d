//! Warranty lookup for a single serial number.
//!
//! The page flow is: submit the serial, then either the results panel shows
//! up directly or the site first asks for the model number. Every expected
//! failure is classified into a [`FailureKind`] at the stage where it happens;
//! only a lost browser session is returned as an error.

use crate::consent::attempt_dismiss_consent;
use crate::site;
use crate::wait::{Probe, first_of, wait_for};
use warranty_core::{
    BrowserSession, Config, Error, FailureKind, ResultRecord, Result, WarrantyDetails, WorkItem,
};

/// Result of looking up one work item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(WarrantyDetails),
    Failed(FailureKind),
}

impl LookupOutcome {
    pub fn into_record(self, item: &WorkItem) -> ResultRecord {
        match self {
            LookupOutcome::Found(details) => ResultRecord::found(item, details),
            LookupOutcome::Failed(kind) => ResultRecord::failure(item, kind),
        }
    }
}

/// Page reached after submitting the serial number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Landing {
    ModelPrompt,
    Results,
}

const LANDING_PROBES: [Probe; 2] = [
    Probe::clickable(site::MODEL_INPUT),
    Probe::visible(site::INFO_SECTION),
];

/// Look up one work item on the vendor site.
///
/// Returns `Err` only when the browser session itself was lost; the caller
/// is expected to replace the session.
pub async fn run_lookup<S: BrowserSession>(
    session: &mut S,
    item: &WorkItem,
    config: &Config,
) -> Result<LookupOutcome> {
    if let Err(e) = submit_serial(session, item, config).await {
        return classify(e, FailureKind::GlobalTimeout, FailureKind::UnhandledScript);
    }

    tracing::info!("Submitted serial number. Checking for product number prompt or direct results...");

    if let Err(e) = resolve_landing(session, item, config).await {
        return classify(e, FailureKind::NavigationTimeout, FailureKind::DynamicDetection);
    }

    scrape_results(session, config).await
}

/// Map a stage error to its failure token, letting session loss through
fn classify(err: Error, on_timeout: FailureKind, otherwise: FailureKind) -> Result<LookupOutcome> {
    if err.is_session_loss() {
        return Err(err);
    }

    let kind = if matches!(err, Error::Timeout(_)) {
        on_timeout
    } else {
        otherwise
    };
    tracing::warn!("{}: {}", kind, err);
    Ok(LookupOutcome::Failed(kind))
}

async fn submit_serial<S: BrowserSession>(
    session: &mut S,
    item: &WorkItem,
    config: &Config,
) -> Result<()> {
    let timeouts = &config.timeouts;

    session.navigate(&config.target_url).await?;

    if !attempt_dismiss_consent(session, timeouts).await {
        tracing::warn!("Cookie banner could not be handled. This might affect subsequent steps.");
    }

    let input = wait_for(session, Probe::clickable(site::SERIAL_INPUT), timeouts.page, timeouts.poll).await?;
    session.clear(&input).await?;
    session.type_text(&input, &item.serial).await?;
    tracing::info!("Entered serial number: {}", item.serial);

    let submit = wait_for(session, Probe::clickable(site::SERIAL_SUBMIT), timeouts.page, timeouts.poll).await?;
    session.js_click(&submit).await?;

    Ok(())
}

/// Wait for whichever page follows the serial submission and answer the
/// model-number prompt when it appears.
async fn resolve_landing<S: BrowserSession>(
    session: &mut S,
    item: &WorkItem,
    config: &Config,
) -> Result<()> {
    let timeouts = &config.timeouts;

    let (index, element) =
        first_of(session, &LANDING_PROBES, timeouts.detection, timeouts.poll).await?;
    let landing = if index == 0 {
        Landing::ModelPrompt
    } else {
        Landing::Results
    };

    match landing {
        Landing::Results => {
            tracing::info!("'Product number' prompt not detected. Direct results page loaded.");
        }
        Landing::ModelPrompt => {
            tracing::info!("'Product number' input field detected.");
            let Some(model) = item.usable_model_hint() else {
                tracing::warn!(
                    "Product/Model number for '{}' is empty or NaN in the input. Cannot fill prompt.",
                    item.serial
                );
                return Ok(());
            };

            session.clear(&element).await?;
            session.type_text(&element, model).await?;
            tracing::info!("Entered product number: {}", model);

            let submit = wait_for(session, Probe::clickable(site::MODEL_SUBMIT), timeouts.page, timeouts.poll).await?;
            session.js_click(&submit).await?;
            tracing::info!("Re-submitted with product number");
        }
    }

    Ok(())
}

async fn scrape_results<S: BrowserSession>(
    session: &mut S,
    config: &Config,
) -> Result<LookupOutcome> {
    let timeouts = &config.timeouts;

    let panel = match wait_for(session, Probe::visible(site::INFO_SECTION), timeouts.page, timeouts.poll).await {
        Ok(panel) => panel,
        Err(e) => return classify(e, FailureKind::InfoSectionTimeout, FailureKind::InfoSection),
    };
    tracing::info!("Main info section confirmed for scraping");

    let items = match session.find_children(&panel, &site::INFO_ITEM).await {
        Ok(items) => items,
        Err(e) if e.is_session_loss() => return Err(e),
        Err(e) => {
            let kind = match e {
                Error::NotFound(_) | Error::Stale(_) => FailureKind::Scraping,
                Error::Timeout(_) => FailureKind::ScrapingTimeout,
                _ => FailureKind::UnhandledScraping,
            };
            tracing::warn!("{}: {}", kind, e);
            return Ok(LookupOutcome::Failed(kind));
        }
    };

    let total = items.len();
    let mut details = WarrantyDetails::default();
    for (idx, info_item) in items.iter().enumerate() {
        tracing::debug!("Scraping data: {}/{}", idx + 1, total);

        match read_info_item(session, info_item).await {
            Ok((label, value)) => {
                if !details.apply(&label, value) {
                    tracing::debug!("Ignoring info item '{}'", label);
                }
            }
            Err(e) if e.is_session_loss() => return Err(e),
            Err(e) if e.is_missing_element() => continue,
            Err(e) => tracing::warn!("Error parsing info-item: {}", e),
        }
    }

    tracing::info!(
        "Scraped warranty status '{}', start '{}', end '{}'",
        details.status,
        details.start_date,
        details.end_date
    );

    Ok(LookupOutcome::Found(details))
}

/// Label and value of one `div.info-item`.
///
/// The value is the non-empty paragraphs joined by newlines, or the whole
/// text when the value has no paragraphs.
async fn read_info_item<S: BrowserSession>(
    session: &mut S,
    info_item: &S::Element,
) -> Result<(String, String)> {
    let label_elem = session.find_child(info_item, &site::INFO_LABEL).await?;
    let text_elem = session.find_child(info_item, &site::INFO_TEXT).await?;
    let label = session.text(&label_elem).await?.trim().to_string();

    let paragraphs = session.find_children(&text_elem, &site::PARAGRAPH).await?;
    let value = if paragraphs.is_empty() {
        session.text(&text_elem).await?.trim().to_string()
    } else {
        let mut lines = Vec::with_capacity(paragraphs.len());
        for p in &paragraphs {
            let line = session.text(p).await?;
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }
        lines.join("\n")
    };

    Ok((label, value))
}
