#![allow(dead_code)]

use locale_audit::error::AuditError;
use locale_audit::extract::element::{Element, Rect};
use locale_audit::matching::similarity::{SimilarityMatrix, SimilarityOracle};

/// Build a matcher-ready element.
pub fn element(text: &str, x: f64, y: f64, width: f64, height: f64, serial: u64) -> Element {
    Element {
        text: text.to_string(),
        rect: Rect::new(x, y, width, height),
        is_truncated: false,
        serial,
        screenshot_path: None,
    }
}

/// Oracle computing each cell from the text pair, so matrix indexing always
/// agrees with whatever order the matcher scans in.
pub struct FnOracle(pub fn(&str, &str) -> f64);

impl SimilarityOracle for FnOracle {
    fn similarity_matrix(
        &self,
        source_texts: &[String],
        target_texts: &[String],
    ) -> Result<SimilarityMatrix, AuditError> {
        let mut matrix = SimilarityMatrix::zeros(source_texts.len(), target_texts.len());
        for (i, a) in source_texts.iter().enumerate() {
            for (j, b) in target_texts.iter().enumerate() {
                matrix.set(i, j, self.0(a, b));
            }
        }
        Ok(matrix)
    }
}

/// Oracle that always fails, for exercising the degrade-to-zeros path.
pub struct FailingOracle;

impl SimilarityOracle for FailingOracle {
    fn similarity_matrix(
        &self,
        _source_texts: &[String],
        _target_texts: &[String],
    ) -> Result<SimilarityMatrix, AuditError> {
        Err(AuditError::MissingData("oracle offline".into()))
    }
}

/// Similarity 1.0 for equal texts, 0.0 otherwise.
pub fn exact_text_similarity(a: &str, b: &str) -> f64 {
    if a == b { 1.0 } else { 0.0 }
}

/// Similarity 0.9 for every pair.
pub fn always_similar(_a: &str, _b: &str) -> f64 {
    0.9
}
