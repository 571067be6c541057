use serde::Deserialize;
use serde_json::Value;

use crate::error::AuditError;
use crate::extract::element::{Element, Rect};

/// Raw element record as emitted by browser_server.js in the `elements`
/// array of an extract response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawElement {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(rename = "ariaLabel", default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub rect: Rect,
    #[serde(default)]
    pub truncated: bool,
}

impl RawElement {
    /// First non-empty of rendered text, placeholder, ARIA label, title,
    /// whitespace-collapsed. None means the element carries no display text
    /// and is dropped.
    pub fn display_text(&self) -> Option<String> {
        [&self.text, &self.placeholder, &self.aria_label, &self.title]
            .into_iter()
            .flatten()
            .find_map(|s| clean_text(s))
    }
}

/// Collapse runs of whitespace to single spaces and trim. Empty after
/// cleanup means no text.
pub fn clean_text(raw: &str) -> Option<String> {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Convert a raw extract payload into matcher-ready elements.
///
/// Drops entries with no display text and entries with degenerate rects, so
/// downstream stages can assume well-formed input. Serials are assigned from
/// `serial_counter`, which the caller threads across both locales of a run.
pub fn build_elements(raw: &Value, serial_counter: &mut u64) -> Result<Vec<Element>, AuditError> {
    let entries = raw["elements"]
        .as_array()
        .ok_or_else(|| AuditError::MissingData("extract response has no 'elements' array".into()))?;

    let raw_elements: Vec<RawElement> =
        serde_json::from_value(Value::Array(entries.clone())).map_err(|e| AuditError::JsonParse {
            context: "extract response elements".into(),
            source: e,
        })?;

    let mut elements = Vec::new();
    for raw_el in raw_elements {
        if raw_el.rect.is_degenerate() {
            continue;
        }
        let Some(text) = raw_el.display_text() else {
            continue;
        };

        elements.push(Element {
            text,
            rect: raw_el.rect,
            is_truncated: raw_el.truncated,
            serial: *serial_counter,
            screenshot_path: None,
        });
        *serial_counter += 1;
    }

    Ok(elements)
}

/// Page title from an extract payload, empty if absent.
pub fn page_title(raw: &Value) -> String {
    raw["title"].as_str().unwrap_or("").to_string()
}
