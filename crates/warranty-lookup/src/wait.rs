use std::time::Duration;
use tokio::time::Instant;
use warranty_core::{BrowserSession, Condition, Error, Locator, Result};

/// A locator together with the state its element must reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub locator: Locator,
    pub condition: Condition,
}

impl Probe {
    pub const fn present(locator: Locator) -> Self {
        Self {
            locator,
            condition: Condition::Present,
        }
    }

    pub const fn visible(locator: Locator) -> Self {
        Self {
            locator,
            condition: Condition::Visible,
        }
    }

    pub const fn clickable(locator: Locator) -> Self {
        Self {
            locator,
            condition: Condition::Clickable,
        }
    }

    fn describe(&self) -> String {
        format!("{} to be {}", self.locator, self.condition)
    }
}

/// Poll until `probe` is satisfied or `timeout` elapses.
pub async fn wait_for<S: BrowserSession>(
    session: &mut S,
    probe: Probe,
    timeout: Duration,
    poll: Duration,
) -> Result<S::Element> {
    first_of(session, &[probe], timeout, poll)
        .await
        .map(|(_, element)| element)
}

/// Poll all `probes` under one shared deadline and return the index of the
/// first one satisfied, with its element.
///
/// Probes are checked in order on every round, so earlier probes win ties.
/// Session-level failures end the wait immediately.
pub async fn first_of<S: BrowserSession>(
    session: &mut S,
    probes: &[Probe],
    timeout: Duration,
    poll: Duration,
) -> Result<(usize, S::Element)> {
    let deadline = Instant::now() + timeout;

    loop {
        for (index, probe) in probes.iter().enumerate() {
            if let Some(element) = session.probe(&probe.locator, probe.condition).await? {
                tracing::debug!("Wait satisfied: {}", probe.describe());
                return Ok((index, element));
            }
        }

        let now = Instant::now();
        if now >= deadline {
            let waited_for = probes
                .iter()
                .map(Probe::describe)
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(Error::Timeout(waited_for));
        }

        tokio::time::sleep(poll.min(deadline - now)).await;
    }
}
