use crate::error::from_cdp;
use crate::{ChromeFinder, ChromeSession, ProfileDir};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::PathBuf;
use warranty_core::{BrowserOptions, Error, Result, SessionLauncher};

/// Starts Chrome instances for the batch driver.
///
/// The binary is located on the first launch, so runs with nothing to do
/// never require Chrome to be installed.
pub struct ChromeSessionLauncher {
    options: BrowserOptions,
    chrome_path: Option<PathBuf>,
}

impl ChromeSessionLauncher {
    pub fn new(options: BrowserOptions) -> Self {
        Self {
            options,
            chrome_path: None,
        }
    }

    fn chrome_path(&mut self) -> Result<PathBuf> {
        if let Some(ref path) = self.chrome_path {
            return Ok(path.clone());
        }
        let path = ChromeFinder::new(self.options.chrome_path.clone()).find()?;
        tracing::info!("Found Chrome at: {}", path.display());
        self.chrome_path = Some(path.clone());
        Ok(path)
    }

    /// Chrome command-line switches besides the profile and window size
    fn build_args(&self) -> Vec<String> {
        vec![
            "--log-level=3".to_string(),
            "--disable-gpu".to_string(),
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-blink-features=AutomationControlled".to_string(),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            format!("--user-agent={}", self.options.user_agent),
        ]
    }
}

#[async_trait]
impl SessionLauncher for ChromeSessionLauncher {
    type Session = ChromeSession;

    async fn launch(&mut self) -> Result<ChromeSession> {
        tracing::info!("Setting up Chrome browser session...");

        let chrome_path = self.chrome_path()?;
        let profile = ProfileDir::temporary()?;
        let (width, height) = self.options.window_size;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .user_data_dir(profile.path())
            .window_size(width, height)
            .args(self.build_args());
        if !self.options.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(Error::BrowserUnavailable)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            Error::BrowserUnavailable(format!("Could not start Chrome: {}", e))
        })?;

        // The handler drives every CDP exchange and must run for the session's lifetime
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(from_cdp(e, "open page"));
            }
        };

        tracing::info!("Chrome session ready");
        Ok(ChromeSession::new(browser, page, handler_task, profile))
    }
}
