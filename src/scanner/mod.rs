pub mod descriptor;
pub mod scan;
pub mod score;
pub mod screenshot;

pub use descriptor::{normalize_label, ElementDescriptor, PageSnapshot, MAX_LABEL_LENGTH};
pub use scan::{ElementScanner, ScanOutcome, CANDIDATE_SELECTORS};
pub use score::interaction_score;
pub use screenshot::ScreenshotStore;
