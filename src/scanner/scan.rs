use crate::core::BrowserTrait;
use crate::errors::Result;
use serde::Deserialize;
use tracing::{error, info};

use super::descriptor::{normalize_label, ElementDescriptor, PageSnapshot};
use super::score::{interaction_score, SCORE_GENERIC};

/// Structural/semantic selectors that define the candidate set. Fixed at
/// compile time; not configurable at call time.
pub const CANDIDATE_SELECTORS: [&str; 9] = [
    "button",
    "a",
    "input",
    "select",
    "textarea",
    "[role='button']",
    "[role='link']",
    "[onclick]",
    "[tabindex]:not([tabindex='-1'])",
];

/// Result of one scan pass.
///
/// `Degraded` means the scan could not run at all (detached page, script
/// failure). Callers that only care about "what can I click" treat it as an
/// empty element list via [`ScanOutcome::elements`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Complete(Vec<ElementDescriptor>),
    Degraded { reason: String },
}

impl ScanOutcome {
    pub fn elements(&self) -> &[ElementDescriptor] {
        match self {
            ScanOutcome::Complete(elements) => elements,
            ScanOutcome::Degraded { .. } => &[],
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ScanOutcome::Degraded { .. })
    }
}

/// Raw candidate record produced by the in-page script: visibility-filtered,
/// document order, no normalization applied yet.
#[derive(Debug, Deserialize)]
struct RawCandidate {
    tag: String,
    #[serde(rename = "type", default)]
    type_attr: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    disabled: bool,
}

pub struct ElementScanner;

impl ElementScanner {
    /// Enumerate, filter, and score the interactable elements of the current
    /// page. Never fails fatally: an evaluation error produces a `Degraded`
    /// outcome instead.
    pub async fn scan<B: BrowserTrait>(browser: &B, tab: &B::TabHandle) -> ScanOutcome {
        let script = scan_script();

        let value = match browser.execute_script(tab, &script).await {
            Ok(value) => value,
            Err(e) => {
                error!(error = %e, "element scan failed");
                return ScanOutcome::Degraded {
                    reason: e.to_string(),
                };
            }
        };

        let payload = match value.as_str() {
            Some(payload) => payload.to_string(),
            None => value.to_string(),
        };

        let candidates: Vec<RawCandidate> = match serde_json::from_str(&payload) {
            Ok(candidates) => candidates,
            Err(e) => {
                error!(error = %e, "element scan returned an unreadable payload");
                return ScanOutcome::Degraded {
                    reason: e.to_string(),
                };
            }
        };

        let elements: Vec<ElementDescriptor> = candidates
            .into_iter()
            .enumerate()
            .map(|(index, raw)| ElementDescriptor {
                id: index.to_string(),
                text: normalize_label(&raw.text),
                score: interaction_score(&raw.tag, &raw.type_attr, true).unwrap_or(SCORE_GENERIC),
                tag: raw.tag,
                visible: true,
                disabled: raw.disabled,
            })
            .collect();

        info!(count = elements.len(), "found interactable elements");
        ScanOutcome::Complete(elements)
    }

    /// Read `{url, title}` for the currently loaded document. No caching.
    pub async fn snapshot<B: BrowserTrait>(
        browser: &B,
        tab: &B::TabHandle,
    ) -> Result<PageSnapshot> {
        let url = browser.get_url(tab).await?;
        let title = browser.get_title(tab).await?;
        Ok(PageSnapshot { url, title })
    }
}

/// The in-page payload only enumerates and visibility-filters; id assignment,
/// label normalization, and scoring all happen on the Rust side.
fn scan_script() -> String {
    format!(
        r#"
        (function() {{
            const elements = Array.from(document.querySelectorAll("{selector}"));
            const results = [];

            function isVisible(elem) {{
                if (!elem) return false;
                const style = window.getComputedStyle(elem);
                return style.display !== 'none' &&
                       style.visibility !== 'hidden' &&
                       style.opacity !== '0' &&
                       elem.offsetWidth > 0 &&
                       elem.offsetHeight > 0;
            }}

            for (const el of elements) {{
                if (!isVisible(el)) continue;

                results.push({{
                    tag: el.tagName.toLowerCase(),
                    type: el.getAttribute('type') || '',
                    text: el.innerText || el.value || el.getAttribute('aria-label') || '',
                    disabled: el.disabled || false
                }});
            }}
            return JSON.stringify(results);
        }})()
        "#,
        selector = CANDIDATE_SELECTORS.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticBrowser;

    #[tokio::test]
    async fn visible_button_becomes_the_single_descriptor() {
        // Page: one visible <button>Submit</button>; a display:none input and
        // an opacity:0 link never leave the in-page filter.
        let browser = StaticBrowser::new(
            r#"[{"tag":"button","type":"","text":"Submit","disabled":false}]"#,
        );
        let outcome = ElementScanner::scan(&browser, &()).await;
        let elements = outcome.elements();
        assert_eq!(elements.len(), 1);
        let el = &elements[0];
        assert_eq!(el.id, "0");
        assert_eq!(el.tag, "button");
        assert_eq!(el.score, 10);
        assert_eq!(el.text, "Submit");
        assert!(el.visible);
        assert!(!el.disabled);
    }

    #[tokio::test]
    async fn disabled_input_keeps_its_state_and_score() {
        let browser =
            StaticBrowser::new(r#"[{"tag":"input","type":"text","text":"","disabled":true}]"#);
        let outcome = ElementScanner::scan(&browser, &()).await;
        let elements = outcome.elements();
        assert_eq!(elements.len(), 1);
        assert!(elements[0].disabled);
        assert_eq!(elements[0].score, 8);
    }

    #[tokio::test]
    async fn ids_are_contiguous_in_document_order() {
        let browser = StaticBrowser::new(
            r#"[
                {"tag":"a","type":"","text":"Home","disabled":false},
                {"tag":"input","type":"search","text":"","disabled":false},
                {"tag":"div","type":"","text":"Menu","disabled":false}
            ]"#,
        );
        let outcome = ElementScanner::scan(&browser, &()).await;
        let elements = outcome.elements();
        let ids: Vec<&str> = elements.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["0", "1", "2"]);
        assert_eq!(elements[0].score, 10);
        assert_eq!(elements[1].score, 8);
        assert_eq!(elements[2].score, 5);
        assert!(elements.iter().all(|e| e.visible));
    }

    #[tokio::test]
    async fn long_labels_are_normalized() {
        let raw_text = format!("Very\nlong {}", "x".repeat(80));
        let payload = format!(
            r#"[{{"tag":"a","type":"","text":"{}","disabled":false}}]"#,
            raw_text.replace('\n', "\\n")
        );
        let browser = StaticBrowser::new(payload);
        let outcome = ElementScanner::scan(&browser, &()).await;
        let text = &outcome.elements()[0].text;
        assert!(text.chars().count() <= 50);
        assert!(!text.contains('\n'));
    }

    #[tokio::test]
    async fn failed_evaluation_degrades_instead_of_raising() {
        let browser = StaticBrowser::detached();
        let outcome = ElementScanner::scan(&browser, &()).await;
        assert!(outcome.is_degraded());
        assert!(outcome.elements().is_empty());
    }

    #[tokio::test]
    async fn unreadable_payload_degrades() {
        let browser = StaticBrowser::new("not json");
        let outcome = ElementScanner::scan(&browser, &()).await;
        assert!(outcome.is_degraded());
    }

    #[tokio::test]
    async fn repeat_scans_of_an_unchanged_page_are_identical() {
        let browser = StaticBrowser::new(
            r#"[{"tag":"button","type":"","text":"Go","disabled":false},
                {"tag":"a","type":"","text":"Docs","disabled":false}]"#,
        );
        let first = ElementScanner::scan(&browser, &()).await;
        let second = ElementScanner::scan(&browser, &()).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn snapshot_reflects_live_url_and_title() {
        let browser = StaticBrowser::new("[]");
        let snapshot = ElementScanner::snapshot(&browser, &()).await.unwrap();
        assert_eq!(snapshot.url, "https://example.com/");
        assert_eq!(snapshot.title, "Example Domain");
    }

    #[test]
    fn scan_script_embeds_the_full_candidate_set() {
        let script = scan_script();
        for selector in CANDIDATE_SELECTORS {
            assert!(script.contains(selector));
        }
    }
}
