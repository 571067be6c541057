use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::matching::matcher::MatchStats;

/// One JSONL record in the run trace. Stages: launch, navigate, extract,
/// verify, match, score, ssim, report.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub stage: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmatched_source: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmatched_target: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl TraceEvent {
    pub fn now(stage: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            stage: stage.to_string(),
            locale: None,
            detail: None,
            elements: None,
            matched: None,
            unmatched_source: None,
            unmatched_target: None,
            score: None,
        }
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = Some(locale.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn with_elements(mut self, count: usize) -> Self {
        self.elements = Some(count);
        self
    }

    pub fn with_stats(mut self, stats: &MatchStats) -> Self {
        self.matched = Some(stats.matched);
        self.unmatched_source = Some(stats.unmatched_source);
        self.unmatched_target = Some(stats.unmatched_target);
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}
