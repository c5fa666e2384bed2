use crate::core::{BrowserTrait, Config};
use crate::errors::{Result, ScoutError};
use crate::scanner::{ElementScanner, PageSnapshot, ScanOutcome, ScreenshotStore};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Owns the browser process and the single tab every discovery operation
/// shares. Launch and first navigation happen lazily on the first operation.
///
/// The tab is read-only from this session's point of view; no operation
/// mutates page state, and `&mut self` rules out concurrent scans against
/// the same handle.
pub struct DiscoverySession<B: BrowserTrait> {
    browser: B,
    tab: Option<B::TabHandle>,
    config: Config,
    target_url: String,
}

impl<B: BrowserTrait> DiscoverySession<B> {
    pub fn new(browser: B, config: Config, target_url: impl Into<String>) -> Self {
        Self {
            browser,
            tab: None,
            config,
            target_url: target_url.into(),
        }
    }

    /// Launch the browser and navigate to the target URL, once.
    ///
    /// A navigation timeout or failure is not fatal: the session proceeds
    /// against whatever DOM state exists.
    pub async fn ensure_ready(&mut self) -> Result<()> {
        if self.tab.is_some() {
            return Ok(());
        }

        info!(url = %self.target_url, "launching browser");
        self.browser.launch(&self.config).await?;
        let tab = self.browser.new_tab().await?;

        let timeout = Duration::from_millis(self.config.browser.navigation_timeout_ms);
        match tokio::time::timeout(timeout, self.browser.navigate(&tab, &self.target_url)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "navigation failed, proceeding"),
            Err(_) => warn!("navigation timed out, proceeding"),
        }

        self.tab = Some(tab);
        Ok(())
    }

    fn tab(&self) -> Result<&B::TabHandle> {
        self.tab.as_ref().ok_or(ScoutError::NoActiveTab)
    }

    /// Scan the current page for interactable elements.
    pub async fn scan(&mut self) -> ScanOutcome {
        if let Err(e) = self.ensure_ready().await {
            return ScanOutcome::Degraded {
                reason: e.to_string(),
            };
        }
        match self.tab() {
            Ok(tab) => ElementScanner::scan(&self.browser, tab).await,
            Err(e) => ScanOutcome::Degraded {
                reason: e.to_string(),
            },
        }
    }

    /// Read `{url, title}` of the currently loaded document.
    pub async fn snapshot(&mut self) -> Result<PageSnapshot> {
        self.ensure_ready().await?;
        let tab = self.tab()?;
        ElementScanner::snapshot(&self.browser, tab).await
    }

    /// Capture a full-page screenshot into the host-partitioned assets dir.
    pub async fn capture_screenshot(&mut self) -> Result<PathBuf> {
        self.ensure_ready().await?;
        let store = ScreenshotStore::in_current_dir()?;
        let tab = self.tab()?;
        store.capture(&self.browser, tab).await
    }

    pub async fn close(&mut self) -> Result<()> {
        self.tab = None;
        self.browser.close().await
    }
}
