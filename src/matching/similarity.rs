use serde::{Deserialize, Serialize};

use crate::error::AuditError;

/// Dense row-major similarity matrix: rows are source texts, columns are
/// target texts, values in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    pub fn from_values(rows: usize, cols: usize, values: Vec<f64>) -> Self {
        assert_eq!(values.len(), rows * cols, "matrix shape/value count mismatch");
        Self { rows, cols, values }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Similarity of source `i` and target `j`. Out-of-range reads return
    /// 0.0, the same value the absent-oracle fallback produces.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i >= self.rows || j >= self.cols {
            return 0.0;
        }
        self.values[i * self.cols + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.rows && j < self.cols, "matrix index out of range");
        self.values[i * self.cols + j] = value;
    }
}

/// A collaborator able to score semantic closeness of text pairs, batched:
/// one call yields the full source x target matrix.
pub trait SimilarityOracle {
    fn similarity_matrix(
        &self,
        source_texts: &[String],
        target_texts: &[String],
    ) -> Result<SimilarityMatrix, AuditError>;
}

/// Cosine similarity between two embedding vectors, 0.0 for zero-norm input.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        (dot / (norm_a * norm_b)) as f64
    } else {
        0.0
    }
}

// ============================================================================
// Ollama embeddings backend
// ============================================================================

/// Similarity oracle backed by an Ollama embeddings endpoint.
///
/// Both text slices are embedded in one batched request each, then the
/// matrix is filled with pairwise cosine similarity. Values are clamped to
/// [0, 1] so antipodal embeddings cannot undercut the zero floor the
/// threshold gate assumes.
pub struct EmbeddingOracle {
    pub endpoint: String,
    pub model: String,
}

impl Default for EmbeddingOracle {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/api/embed".to_string(),
            model: "nomic-embed-text".to_string(),
        }
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl EmbeddingOracle {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
        }
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AuditError> {
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| AuditError::Http {
                context: "embeddings request".into(),
                source: e,
            })?;

        let parsed: EmbedResponse = response.json().map_err(|e| AuditError::Http {
            context: "embeddings response".into(),
            source: e,
        })?;

        if parsed.embeddings.len() != texts.len() {
            return Err(AuditError::MissingData(format!(
                "embeddings endpoint returned {} vectors for {} texts",
                parsed.embeddings.len(),
                texts.len()
            )));
        }

        Ok(parsed.embeddings)
    }
}

impl SimilarityOracle for EmbeddingOracle {
    fn similarity_matrix(
        &self,
        source_texts: &[String],
        target_texts: &[String],
    ) -> Result<SimilarityMatrix, AuditError> {
        if source_texts.is_empty() || target_texts.is_empty() {
            return Ok(SimilarityMatrix::zeros(source_texts.len(), target_texts.len()));
        }

        let source_embeddings = self.embed(source_texts)?;
        let target_embeddings = self.embed(target_texts)?;

        let mut matrix = SimilarityMatrix::zeros(source_texts.len(), target_texts.len());
        for (i, a) in source_embeddings.iter().enumerate() {
            for (j, b) in target_embeddings.iter().enumerate() {
                matrix.set(i, j, cosine_similarity(a, b).clamp(0.0, 1.0));
            }
        }

        Ok(matrix)
    }
}
