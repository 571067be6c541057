use crate::report::report_model::AuditReport;
use crate::scoring::judge::ScoreFlag;

// ============================================================================
// Console reporter — formatted terminal output
// ============================================================================

/// Format an audit report for terminal output.
///
/// Produces output like:
/// ```text
/// === Translation Audit: https://example.com ===
///
/// ✗ [Mismatch] #12 "Log In" -> "Entrar" (score 0.42)
/// ⚠ [Review]   #17 "Settings" -> "Configuración" (score 0.80, truncated)
///
/// Unmatched source: 2, unmatched target: 1
///
/// === 40 rows: 37 matched, 2 flagged, 3 unmatched | SSIM 0.91 ===
/// ```
pub fn format_console_report(report: &AuditReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Translation Audit: {} ===\n\n", report.title));

    let mut flagged = 0;
    for row in report.flagged_rows() {
        flagged += 1;
        let marker = match row.flag {
            ScoreFlag::Mismatch => "\u{2717} [Mismatch]",
            ScoreFlag::Review => "\u{26a0} [Review]  ",
            ScoreFlag::Match => "\u{26a0} [Match]   ",
        };

        let truncated = if row.truncated_in_target { ", truncated" } else { "" };
        out.push_str(&format!(
            "{} #{} \"{}\" -> \"{}\" (score {:.2}{})\n",
            marker, row.serial, row.source_text, row.target_text, row.score, truncated
        ));

        for issue in [&row.capitalization_issue, &row.time_issue, &row.other_issue]
            .into_iter()
            .flatten()
        {
            out.push_str(&format!("    [ISSUE] {}\n", issue));
        }
    }

    if flagged > 0 {
        out.push('\n');
    }

    if report.unmatched_source > 0 || report.unmatched_target > 0 {
        out.push_str(&format!(
            "Unmatched source: {}, unmatched target: {}\n\n",
            report.unmatched_source, report.unmatched_target
        ));
    }

    for issue in &report.ui_issues {
        out.push_str(&format!("[UI ISSUE] {}\n", issue));
    }
    if !report.ui_issues.is_empty() {
        out.push('\n');
    }

    // Summary line
    let total = report.rows.len();
    let unmatched = report.unmatched_source + report.unmatched_target;
    out.push_str(&format!(
        "=== {} rows: {} matched, {} flagged, {} unmatched",
        total, report.matched, flagged, unmatched
    ));

    if let Some(ssim) = report.overall_ssim {
        out.push_str(&format!(" | SSIM {:.2}", ssim));
    }

    out.push_str(" ===\n");

    out
}
