use std::path::Path;

use rusqlite::{Connection, params};

use crate::error::AuditError;
use crate::report::report_model::AuditReport;

// ============================================================================
// SQLite reporter — queryable copy of the audit table
// ============================================================================

/// Write the audit rows into a `translation_checks` table, replacing any
/// table left over from a previous run.
pub fn write_sqlite_report(report: &AuditReport, path: &Path) -> Result<(), AuditError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AuditError::Io {
            context: format!("create {}", parent.display()),
            source: e,
        })?;
    }

    let conn = Connection::open(path)?;

    conn.execute("DROP TABLE IF EXISTS translation_checks", [])?;
    conn.execute(
        "CREATE TABLE translation_checks (
            serial               INTEGER NOT NULL,
            source_text          TEXT NOT NULL,
            target_text          TEXT NOT NULL,
            source_rect          TEXT,
            target_rect          TEXT,
            source_screenshot    TEXT,
            target_screenshot    TEXT,
            score                REAL NOT NULL,
            flag                 TEXT NOT NULL,
            translation_correct  INTEGER NOT NULL,
            capitalization_issue TEXT,
            time_issue           TEXT,
            other_issue          TEXT,
            explanation          TEXT NOT NULL,
            truncated_in_target  INTEGER NOT NULL
        )",
        [],
    )?;

    let mut stmt = conn.prepare(
        "INSERT INTO translation_checks (
            serial, source_text, target_text, source_rect, target_rect,
            source_screenshot, target_screenshot, score, flag,
            translation_correct, capitalization_issue, time_issue,
            other_issue, explanation, truncated_in_target
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
    )?;

    for row in &report.rows {
        stmt.execute(params![
            row.serial as i64,
            row.source_text,
            row.target_text,
            row.source_rect.map(|r| format!("({}, {}) {}x{}", r.x, r.y, r.width, r.height)),
            row.target_rect.map(|r| format!("({}, {}) {}x{}", r.x, r.y, r.width, r.height)),
            row.source_screenshot,
            row.target_screenshot,
            row.score,
            row.flag.to_string(),
            row.translation_correct,
            row.capitalization_issue,
            row.time_issue,
            row.other_issue,
            row.explanation,
            row.truncated_in_target,
        ])?;
    }

    Ok(())
}
