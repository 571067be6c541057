use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in page pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Center point of the box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// A degenerate rect has no visible area. The extractor filters these;
    /// the matcher assumes it never sees one.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A visible, text-bearing UI unit extracted from a rendered page.
///
/// Read-only input to the matcher. `screenshot_path` is the one field
/// populated later: after matching, when the element is truncated or its
/// pair fails a quality check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// First non-empty of: rendered text, placeholder, ARIA label, title.
    pub text: String,

    /// Bounding box, width > 0 and height > 0.
    pub rect: Rect,

    /// True if rendered content overflows its visible box.
    pub is_truncated: bool,

    /// Unique within a run, increasing in discovery order. The counter is
    /// shared across both locales of one check run.
    pub serial: u64,

    /// Path to a cropped issue screenshot, if one was captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_path: Option<String>,
}
