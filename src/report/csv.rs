use std::path::Path;

use crate::error::AuditError;
use crate::extract::element::Rect;
use crate::report::report_model::AuditReport;

// ============================================================================
// CSV reporter — the tabular artifact reviewers open in a spreadsheet
// ============================================================================

const HEADERS: [&str; 15] = [
    "Serial",
    "Source_Text",
    "Target_Text",
    "Source_Rect",
    "Target_Rect",
    "Source_Screenshot",
    "Target_Screenshot",
    "Score",
    "Flag",
    "Translation_Correct",
    "Capitalization_Issue",
    "Time_Issue",
    "Other_Issue",
    "Explanation",
    "Truncated_In_Target",
];

/// Write the audit rows as CSV with a stable column order.
pub fn write_csv_report(report: &AuditReport, path: &Path) -> Result<(), AuditError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AuditError::Io {
            context: format!("create {}", parent.display()),
            source: e,
        })?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADERS)?;

    for row in &report.rows {
        writer.write_record([
            row.serial.to_string(),
            row.source_text.clone(),
            row.target_text.clone(),
            format_rect(&row.source_rect),
            format_rect(&row.target_rect),
            row.source_screenshot.clone().unwrap_or_else(|| "N/A".to_string()),
            row.target_screenshot.clone().unwrap_or_else(|| "N/A".to_string()),
            format!("{:.2}", row.score),
            row.flag.to_string(),
            yes_no(row.translation_correct),
            row.capitalization_issue.clone().unwrap_or_else(|| "none".to_string()),
            row.time_issue.clone().unwrap_or_else(|| "none".to_string()),
            row.other_issue.clone().unwrap_or_else(|| "none".to_string()),
            row.explanation.clone(),
            yes_no(row.truncated_in_target),
        ])?;
    }

    writer.flush().map_err(|e| AuditError::Io {
        context: format!("flush {}", path.display()),
        source: e,
    })?;
    Ok(())
}

fn format_rect(rect: &Option<Rect>) -> String {
    match rect {
        Some(r) => format!("({}, {}) {}x{}", r.x, r.y, r.width, r.height),
        None => "N/A".to_string(),
    }
}

fn yes_no(value: bool) -> String {
    if value { "Yes".to_string() } else { "No".to_string() }
}
