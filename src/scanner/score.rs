/// Baseline for anything that matched a candidate selector.
pub const SCORE_GENERIC: u8 = 5;
/// Form fields: input, select, textarea.
pub const SCORE_FORM_FIELD: u8 = 8;
/// Primary actions: button, a, or an explicit submit control.
pub const SCORE_PRIMARY_ACTION: u8 = 10;

/// Interaction-priority score for one candidate element.
///
/// Depends only on the tag name and the `type` attribute (empty string when
/// absent). Invisible elements are never scored. Deterministic and
/// order-independent per element.
pub fn interaction_score(tag: &str, type_attr: &str, visible: bool) -> Option<u8> {
    if !visible {
        return None;
    }

    let tag = tag.to_ascii_lowercase();
    let score = if tag == "button" || tag == "a" || type_attr == "submit" {
        SCORE_PRIMARY_ACTION
    } else if matches!(tag.as_str(), "input" | "select" | "textarea") {
        SCORE_FORM_FIELD
    } else {
        SCORE_GENERIC
    };

    Some(score)
}
