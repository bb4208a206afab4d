use crate::site;
use crate::wait::{Probe, wait_for};
use warranty_core::{BrowserSession, Error, FrameScope, Result, Timeouts};

/// Dismiss the cookie-consent banner if one is showing.
///
/// Returns whether a consent control was found and activated. Never fails:
/// the caller proceeds either way.
pub async fn attempt_dismiss_consent<S: BrowserSession>(
    session: &mut S,
    timeouts: &Timeouts,
) -> bool {
    tracing::info!("Attempting to handle cookie banner...");

    if let Err(e) = session.leave_frame() {
        tracing::warn!("Could not switch to top-level document initially: {}", e);
    }

    match accept_directly(session, timeouts).await {
        Ok(()) => {
            tracing::info!("Accepted cookie policy directly");
            return true;
        }
        Err(e) if matches!(e, Error::Timeout(_)) || e.is_missing_element() => {}
        Err(e) => tracing::info!("Unexpected error clicking cookie button directly: {}", e),
    }

    match accept_in_overlay(session, timeouts).await {
        Ok(()) => {
            tracing::info!("Accepted cookie policy within consent overlay");
            true
        }
        Err(e) => {
            tracing::info!("Cookie banner not handled: {}", e);
            false
        }
    }
}

async fn accept_directly<S: BrowserSession>(session: &mut S, timeouts: &Timeouts) -> Result<()> {
    let button = wait_for(
        session,
        Probe::clickable(site::CONSENT_BUTTON),
        timeouts.consent,
        timeouts.poll,
    )
    .await?;
    session.click(&button).await?;
    Ok(())
}

async fn accept_in_overlay<S: BrowserSession>(
    session: &mut S,
    timeouts: &Timeouts,
) -> Result<()> {
    let container = wait_for(
        session,
        Probe::present(site::CONSENT_CONTAINER),
        timeouts.consent,
        timeouts.poll,
    )
    .await?;

    let mut scope = FrameScope::enter(session, &container)?;
    let button = wait_for(
        &mut *scope,
        Probe::clickable(site::CONSENT_ACCEPT),
        timeouts.consent,
        timeouts.poll,
    )
    .await?;
    scope.click(&button).await?;
    Ok(())
}
