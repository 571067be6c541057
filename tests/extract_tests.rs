use locale_audit::extract::element::{Element, Rect};
use locale_audit::extract::extractor::{build_elements, clean_text, page_title};
use serde_json::json;

// ============================================================================
// 1. clean_text edge cases
// ============================================================================

#[test]
fn clean_text_filters_and_collapses() {
    assert_eq!(clean_text(""), None, "Empty string");
    assert_eq!(clean_text("   "), None, "Whitespace only");
    assert_eq!(clean_text("  Log   In  "), Some("Log In".into()), "Collapses inner runs and trims");
    assert_eq!(clean_text("Log\n In"), Some("Log In".into()), "Newlines collapse too");
    assert_eq!(clean_text("Ayuda"), Some("Ayuda".into()));
}

// ============================================================================
// 2. Text precedence — text, placeholder, ariaLabel, title
// ============================================================================

#[test]
fn display_text_precedence() {
    let raw = json!({
        "elements": [
            { "text": "Visible", "placeholder": "ph", "ariaLabel": "al", "title": "ti",
              "rect": { "x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0 } },
            { "text": "", "placeholder": "Search here", "ariaLabel": "al",
              "rect": { "x": 0.0, "y": 20.0, "width": 10.0, "height": 10.0 } },
            { "text": "", "placeholder": "", "ariaLabel": "Close dialog",
              "rect": { "x": 0.0, "y": 40.0, "width": 10.0, "height": 10.0 } },
            { "title": "Tooltip only",
              "rect": { "x": 0.0, "y": 60.0, "width": 10.0, "height": 10.0 } }
        ]
    });

    let mut counter = 1;
    let elements = build_elements(&raw, &mut counter).unwrap();

    let texts: Vec<&str> = elements.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Visible", "Search here", "Close dialog", "Tooltip only"]);
}

// ============================================================================
// 3. Filtering — no text, degenerate rects
// ============================================================================

#[test]
fn elements_without_text_are_dropped() {
    let raw = json!({
        "elements": [
            { "text": "Kept", "rect": { "x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0 } },
            { "text": "", "rect": { "x": 0.0, "y": 20.0, "width": 10.0, "height": 10.0 } },
            { "rect": { "x": 0.0, "y": 40.0, "width": 10.0, "height": 10.0 } }
        ]
    });

    let mut counter = 1;
    let elements = build_elements(&raw, &mut counter).unwrap();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].text, "Kept");
}

#[test]
fn degenerate_rects_are_dropped() {
    let raw = json!({
        "elements": [
            { "text": "Zero width", "rect": { "x": 0.0, "y": 0.0, "width": 0.0, "height": 10.0 } },
            { "text": "Zero height", "rect": { "x": 0.0, "y": 0.0, "width": 10.0, "height": 0.0 } },
            { "text": "Negative", "rect": { "x": 0.0, "y": 0.0, "width": -5.0, "height": 10.0 } },
            { "text": "Visible", "rect": { "x": 0.0, "y": 0.0, "width": 1.0, "height": 1.0 } }
        ]
    });

    let mut counter = 1;
    let elements = build_elements(&raw, &mut counter).unwrap();
    assert_eq!(elements.len(), 1, "The matcher must never see a degenerate rect");
    assert_eq!(elements[0].text, "Visible");
}

// ============================================================================
// 4. Serial assignment — monotonic, continues across calls
// ============================================================================

#[test]
fn serials_increase_and_continue_across_locales() {
    let page = |texts: &[&str]| {
        json!({
            "elements": texts.iter().enumerate().map(|(i, t)| json!({
                "text": t,
                "rect": { "x": 0.0, "y": (i as f64) * 20.0, "width": 10.0, "height": 10.0 }
            })).collect::<Vec<_>>()
        })
    };

    let mut counter = 1;
    let first = build_elements(&page(&["A", "B"]), &mut counter).unwrap();
    let second = build_elements(&page(&["C"]), &mut counter).unwrap();

    assert_eq!(first.iter().map(|e| e.serial).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(second[0].serial, 3, "Counter is shared across both locales of a run");
    assert_eq!(counter, 4);
}

#[test]
fn skipped_entries_do_not_consume_serials() {
    let raw = json!({
        "elements": [
            { "text": "", "rect": { "x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0 } },
            { "text": "First real", "rect": { "x": 0.0, "y": 20.0, "width": 10.0, "height": 10.0 } }
        ]
    });

    let mut counter = 1;
    let elements = build_elements(&raw, &mut counter).unwrap();
    assert_eq!(elements[0].serial, 1);
}

// ============================================================================
// 5. Truncation flag and payload errors
// ============================================================================

#[test]
fn truncated_flag_carried_through() {
    let raw = json!({
        "elements": [
            { "text": "Overflowing", "truncated": true,
              "rect": { "x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0 } },
            { "text": "Fits", "truncated": false,
              "rect": { "x": 0.0, "y": 20.0, "width": 10.0, "height": 10.0 } }
        ]
    });

    let mut counter = 1;
    let elements = build_elements(&raw, &mut counter).unwrap();
    assert!(elements[0].is_truncated);
    assert!(!elements[1].is_truncated);
}

#[test]
fn missing_elements_array_is_an_error() {
    let raw = json!({ "title": "No elements key" });
    let mut counter = 1;
    assert!(build_elements(&raw, &mut counter).is_err());
}

#[test]
fn page_title_defaults_to_empty() {
    assert_eq!(page_title(&json!({ "title": "Welcome" })), "Welcome");
    assert_eq!(page_title(&json!({})), "");
}

// ============================================================================
// 6. Element dump roundtrip (offline match input)
// ============================================================================

#[test]
fn element_json_roundtrip() {
    let element = Element {
        text: "Log In".to_string(),
        rect: Rect::new(4.0, 8.0, 50.0, 20.0),
        is_truncated: true,
        serial: 7,
        screenshot_path: Some("issue_7_english_truncation.png".to_string()),
    };

    let json = serde_json::to_string(&element).unwrap();
    let parsed: Element = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, element);
}

#[test]
fn rect_center_and_degeneracy() {
    let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(rect.center(), (25.0, 40.0));
    assert!(!rect.is_degenerate());
    assert!(Rect::new(0.0, 0.0, 0.0, 5.0).is_degenerate());
}
