use serde::{Deserialize, Serialize};

/// Display labels are cut to this many characters before whitespace cleanup.
pub const MAX_LABEL_LENGTH: usize = 50;

/// One candidate interactive element observed on a page at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Unique within a single scan pass only; assigned in document order.
    pub id: String,
    pub text: String,
    pub tag: String,
    pub visible: bool,
    pub disabled: bool,
    pub score: u8,
}

/// Metadata about the page at the moment of capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    pub title: String,
}

impl PageSnapshot {
    /// The collaborator's blank-page defaults, used when the live read fails.
    pub fn blank() -> Self {
        Self {
            url: "about:blank".to_string(),
            title: String::new(),
        }
    }
}

/// Truncate to [`MAX_LABEL_LENGTH`] characters, collapse newlines to spaces,
/// trim surrounding whitespace, applied in that order.
pub fn normalize_label(raw: &str) -> String {
    let truncated: String = raw.chars().take(MAX_LABEL_LENGTH).collect();
    truncated.replace('\n', " ").trim().to_string()
}
