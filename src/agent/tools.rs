use crate::browser::DiscoverySession;
use crate::core::BrowserTrait;
use crate::scanner::{PageSnapshot, ScanOutcome};
use serde_json::{json, Value};
use tracing::{error, warn};

pub const TOOL_TAKE_SCREENSHOT: &str = "take_screenshot";
pub const TOOL_GET_INTERACTABLE_ELEMENTS: &str = "get_interactable_elements";
pub const TOOL_GET_PAGE_METADATA: &str = "get_page_metadata";

/// The three observation tools exposed to the discovery agent.
///
/// Every operation is contained: a failure degrades to an empty or blank
/// result instead of propagating, since the agent has no human present to
/// handle an exception.
pub struct DiscoveryTools<B: BrowserTrait> {
    session: DiscoverySession<B>,
}

impl<B: BrowserTrait> DiscoveryTools<B> {
    pub fn new(session: DiscoverySession<B>) -> Self {
        Self { session }
    }

    /// Screenshot the current page; returns the saved path, or an error note
    /// the model can read.
    pub async fn take_screenshot(&mut self) -> String {
        match self.session.capture_screenshot().await {
            Ok(path) => json!({"path": path.display().to_string()}).to_string(),
            Err(e) => {
                error!(error = %e, "screenshot failed");
                json!({"error": e.to_string()}).to_string()
            }
        }
    }

    /// Scan for interactable elements; a degraded scan reads as an empty page.
    pub async fn get_interactable_elements(&mut self) -> String {
        match self.session.scan().await {
            ScanOutcome::Complete(elements) => {
                serde_json::to_string(&elements).unwrap_or_else(|_| "[]".to_string())
            }
            ScanOutcome::Degraded { reason } => {
                error!(%reason, "element scan degraded to empty result");
                "[]".to_string()
            }
        }
    }

    /// Current `{url, title}`, falling back to blank-page defaults.
    pub async fn get_page_metadata(&mut self) -> String {
        let snapshot = match self.session.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "metadata read failed, returning blank defaults");
                PageSnapshot::blank()
            }
        };
        serde_json::to_string(&snapshot)
            .unwrap_or_else(|_| r#"{"url":"about:blank","title":""}"#.to_string())
    }

    pub async fn dispatch(&mut self, name: &str, _arguments: &Value) -> String {
        match name {
            TOOL_TAKE_SCREENSHOT => self.take_screenshot().await,
            TOOL_GET_INTERACTABLE_ELEMENTS => self.get_interactable_elements().await,
            TOOL_GET_PAGE_METADATA => self.get_page_metadata().await,
            other => {
                warn!(tool = other, "unknown tool requested");
                json!({"error": format!("unknown tool: {}", other)}).to_string()
            }
        }
    }

    pub async fn shutdown(&mut self) -> crate::errors::Result<()> {
        self.session.close().await
    }
}

/// Gemini function declarations for the three observation tools.
pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": TOOL_TAKE_SCREENSHOT,
            "description": "Takes a screenshot of the current page and returns the saved file path.",
            "parameters": {"type": "object", "properties": {}}
        }),
        json!({
            "name": TOOL_GET_INTERACTABLE_ELEMENTS,
            "description": "Scans the page for interactable elements, scores them, and returns the list.",
            "parameters": {"type": "object", "properties": {}}
        }),
        json!({
            "name": TOOL_GET_PAGE_METADATA,
            "description": "Returns metadata about the current page (URL, title).",
            "parameters": {"type": "object", "properties": {}}
        }),
    ]
}
