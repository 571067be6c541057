use serde::{Deserialize, Serialize};

use crate::extract::element::Rect;
use crate::matching::matcher::{MatchPair, MatchStats};
use crate::scoring::judge::{ScoreFlag, TranslationScore};

// ============================================================================
// Translation audit report — one row per match pair
// ============================================================================

/// One report row: a match pair flattened alongside its fidelity verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Source serial, else target serial, else the 1-based row index.
    pub serial: u64,

    /// "N/A" when the side is absent.
    pub source_text: String,
    pub target_text: String,

    pub source_rect: Option<Rect>,
    pub target_rect: Option<Rect>,

    pub source_screenshot: Option<String>,
    pub target_screenshot: Option<String>,

    pub score: f64,
    pub flag: ScoreFlag,
    pub translation_correct: bool,
    pub capitalization_issue: Option<String>,
    pub time_issue: Option<String>,
    pub other_issue: Option<String>,
    pub explanation: String,

    pub truncated_in_target: bool,
}

impl ReportRow {
    /// Flatten a pair and its verdict. `index` is the 1-based position in
    /// the pair list, the serial of last resort for a fully-degenerate row.
    pub fn from_pair(index: usize, pair: &MatchPair, verdict: &TranslationScore) -> Self {
        let serial = pair
            .source
            .as_ref()
            .map(|e| e.serial)
            .or_else(|| pair.target.as_ref().map(|e| e.serial))
            .unwrap_or(index as u64);

        Self {
            serial,
            source_text: pair
                .source
                .as_ref()
                .map(|e| e.text.clone())
                .unwrap_or_else(|| "N/A".to_string()),
            target_text: pair
                .target
                .as_ref()
                .map(|e| e.text.clone())
                .unwrap_or_else(|| "N/A".to_string()),
            source_rect: pair.source.as_ref().map(|e| e.rect),
            target_rect: pair.target.as_ref().map(|e| e.rect),
            source_screenshot: pair.source.as_ref().and_then(|e| e.screenshot_path.clone()),
            target_screenshot: pair.target.as_ref().and_then(|e| e.screenshot_path.clone()),
            score: verdict.score,
            flag: verdict.flag,
            translation_correct: verdict.translation_correct,
            capitalization_issue: verdict.capitalization_issue.clone(),
            time_issue: verdict.time_issue.clone(),
            other_issue: verdict.other_issue.clone(),
            explanation: verdict.explanation.clone(),
            truncated_in_target: pair.target.as_ref().map(|e| e.is_truncated).unwrap_or(false),
        }
    }
}

/// Aggregated audit for one check run. Consumed by the console, CSV, and
/// SQLite reporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// Page or site under audit, shown in the console banner.
    pub title: String,

    pub rows: Vec<ReportRow>,

    pub matched: usize,
    pub unmatched_source: usize,
    pub unmatched_target: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_ssim: Option<f64>,

    /// Free-form problems collected along the pipeline (failed locale
    /// verification, extraction failures, SSIM below threshold).
    pub ui_issues: Vec<String>,
}

impl AuditReport {
    pub fn new(title: &str, rows: Vec<ReportRow>, stats: &MatchStats) -> Self {
        Self {
            title: title.to_string(),
            rows,
            matched: stats.matched,
            unmatched_source: stats.unmatched_source,
            unmatched_target: stats.unmatched_target,
            overall_ssim: None,
            ui_issues: Vec::new(),
        }
    }

    pub fn with_ssim(mut self, ssim: f64) -> Self {
        self.overall_ssim = Some(ssim);
        self
    }

    pub fn with_issues(mut self, issues: Vec<String>) -> Self {
        self.ui_issues = issues;
        self
    }

    /// Rows a reviewer should look at: flagged below Match, or truncated.
    pub fn flagged_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows
            .iter()
            .filter(|r| r.flag != ScoreFlag::Match || r.truncated_in_target)
    }

    pub fn is_clean(&self) -> bool {
        self.flagged_rows().next().is_none()
            && self.unmatched_source == 0
            && self.unmatched_target == 0
            && self.ui_issues.is_empty()
    }
}
