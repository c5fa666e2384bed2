//! Test doubles for exercising the scan pipeline without a Chrome process.

use crate::core::{BrowserTrait, Config};
use crate::errors::{Result, ScoutError};
use async_trait::async_trait;
use serde_json::Value;

/// A scripted [`BrowserTrait`] implementation that replays canned values.
pub struct StaticBrowser {
    pub url: String,
    pub title: String,
    pub script_payload: Option<String>,
    pub screenshot_bytes: Vec<u8>,
    pub fail_scripts: bool,
}

impl StaticBrowser {
    /// A browser whose page evaluation yields `script_payload`.
    pub fn new(script_payload: impl Into<String>) -> Self {
        Self {
            url: "https://example.com/".to_string(),
            title: "Example Domain".to_string(),
            script_payload: Some(script_payload.into()),
            screenshot_bytes: vec![0x89, b'P', b'N', b'G'],
            fail_scripts: false,
        }
    }

    /// A browser whose page evaluation always fails, as a detached frame would.
    pub fn detached() -> Self {
        Self {
            url: "https://example.com/".to_string(),
            title: String::new(),
            script_payload: None,
            screenshot_bytes: Vec::new(),
            fail_scripts: true,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl BrowserTrait for StaticBrowser {
    type TabHandle = ();

    async fn launch(&mut self, _config: &Config) -> Result<()> {
        Ok(())
    }

    async fn new_tab(&self) -> Result<Self::TabHandle> {
        Ok(())
    }

    async fn navigate(&self, _tab: &Self::TabHandle, _url: &str) -> Result<()> {
        Ok(())
    }

    async fn execute_script(&self, _tab: &Self::TabHandle, script: &str) -> Result<Value> {
        if self.fail_scripts {
            return Err(ScoutError::JavaScriptFailed(
                "execution context was destroyed".to_string(),
            ));
        }
        if script == "document.title" {
            return Ok(Value::String(self.title.clone()));
        }
        match &self.script_payload {
            Some(payload) => Ok(Value::String(payload.clone())),
            None => Ok(Value::Null),
        }
    }

    async fn take_screenshot(&self, _tab: &Self::TabHandle) -> Result<Vec<u8>> {
        if self.screenshot_bytes.is_empty() {
            return Err(ScoutError::ScreenshotFailed("no frame".to_string()));
        }
        Ok(self.screenshot_bytes.clone())
    }

    async fn get_url(&self, _tab: &Self::TabHandle) -> Result<String> {
        Ok(self.url.clone())
    }

    async fn get_title(&self, _tab: &Self::TabHandle) -> Result<String> {
        Ok(self.title.clone())
    }

    fn is_running(&self) -> bool {
        true
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
