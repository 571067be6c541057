use crate::extract::element::Element;
use crate::matching::similarity::{SimilarityMatrix, SimilarityOracle};

/// Tunables for the cross-locale matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    /// Pixel distance ceiling between element centers for eligibility.
    pub position_tolerance: f64,

    /// Minimum semantic similarity for eligibility (strict: must exceed).
    pub similarity_threshold: f64,

    /// Weight of the positional distance in the combined score.
    pub distance_weight: f64,

    /// Weight of the semantic similarity in the combined score.
    pub similarity_weight: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            position_tolerance: 100.0,
            similarity_threshold: 0.5,
            distance_weight: 1.0,
            similarity_weight: 1.0,
        }
    }
}

/// One entry of the matcher's output: two elements judged to be the same UI
/// control in each locale, or an element with no counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPair {
    pub source: Option<Element>,
    pub target: Option<Element>,
}

impl MatchPair {
    pub fn is_matched(&self) -> bool {
        self.source.is_some() && self.target.is_some()
    }
}

/// Pair a source-locale element list against a target-locale element list.
///
/// Both lists are sorted into reading order (top-to-bottom, left-to-right)
/// so the result is independent of extraction discovery order and near-ties
/// resolve visually. The similarity matrix is computed once, over the sorted
/// texts, in a single batched oracle call; an absent oracle (or a failing
/// one) degrades to all-zero similarities, which the threshold gate turns
/// into an everything-unmatched result rather than guessed matches.
///
/// Each source element, in sorted order, greedily claims the cheapest
/// not-yet-consumed target among those passing BOTH gates: center distance
/// under `position_tolerance` and similarity above `similarity_threshold`.
/// Cost is `distance_weight * pos_dist - similarity_weight * sem_sim`.
/// Sources with no eligible candidate pair with absent; leftover targets are
/// appended as absent-source pairs. Every input element lands in exactly one
/// pair.
pub fn match_elements(
    mut source: Vec<Element>,
    mut target: Vec<Element>,
    oracle: Option<&dyn SimilarityOracle>,
    config: &MatcherConfig,
) -> Vec<MatchPair> {
    source.sort_by(|a, b| {
        (a.rect.y, a.rect.x)
            .partial_cmp(&(b.rect.y, b.rect.x))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    target.sort_by(|a, b| {
        (a.rect.y, a.rect.x)
            .partial_cmp(&(b.rect.y, b.rect.x))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let similarities = build_similarity_matrix(&source, &target, oracle);

    let mut pairs = Vec::with_capacity(source.len().max(target.len()));
    // Consumed targets leave their slot empty; emptiness is the used-set.
    let mut target_slots: Vec<Option<Element>> = target.into_iter().map(Some).collect();

    for (i, source_el) in source.into_iter().enumerate() {
        let source_center = source_el.rect.center();
        let mut best: Option<(usize, f64)> = None;

        for (j, slot) in target_slots.iter().enumerate() {
            let Some(target_el) = slot.as_ref() else {
                continue;
            };

            let pos_dist = euclidean(source_center, target_el.rect.center());
            let sem_sim = similarities.get(i, j);
            if pos_dist >= config.position_tolerance || sem_sim <= config.similarity_threshold {
                continue;
            }

            let combined = config.distance_weight * pos_dist - config.similarity_weight * sem_sim;
            // Strict less-than: on an exact tie the earlier target in
            // reading order keeps the claim.
            if best.map_or(true, |(_, best_score)| combined < best_score) {
                best = Some((j, combined));
            }
        }

        match best {
            Some((j, _)) => {
                pairs.push(MatchPair {
                    source: Some(source_el),
                    target: target_slots[j].take(),
                });
            }
            None => pairs.push(MatchPair {
                source: Some(source_el),
                target: None,
            }),
        }
    }

    for slot in target_slots {
        if let Some(target_el) = slot {
            pairs.push(MatchPair {
                source: None,
                target: Some(target_el),
            });
        }
    }

    pairs
}

/// Batched similarity computation over the sorted element texts.
///
/// The matrix shares indexing with the candidate scan, so `get(i, j)` is the
/// similarity of sorted source `i` and sorted target `j`. Degrades to zeros
/// when either side is empty, the oracle is absent, or the oracle fails.
fn build_similarity_matrix(
    source: &[Element],
    target: &[Element],
    oracle: Option<&dyn SimilarityOracle>,
) -> SimilarityMatrix {
    if source.is_empty() || target.is_empty() {
        return SimilarityMatrix::zeros(source.len(), target.len());
    }

    let Some(oracle) = oracle else {
        return SimilarityMatrix::zeros(source.len(), target.len());
    };

    let source_texts: Vec<String> = source.iter().map(|e| e.text.clone()).collect();
    let target_texts: Vec<String> = target.iter().map(|e| e.text.clone()).collect();

    match oracle.similarity_matrix(&source_texts, &target_texts) {
        Ok(matrix) if matrix.rows() == source.len() && matrix.cols() == target.len() => matrix,
        Ok(matrix) => {
            eprintln!(
                "Warning: similarity oracle returned a {}x{} matrix for {}x{} texts, ignoring it",
                matrix.rows(),
                matrix.cols(),
                source.len(),
                target.len()
            );
            SimilarityMatrix::zeros(source.len(), target.len())
        }
        Err(e) => {
            eprintln!("Warning: similarity oracle failed ({}), treating all pairs as dissimilar", e);
            SimilarityMatrix::zeros(source.len(), target.len())
        }
    }
}

fn euclidean(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

// ============================================================================
// Pair classification / statistics
// ============================================================================

/// Counts of each pair class, for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchStats {
    pub matched: usize,
    pub unmatched_source: usize,
    pub unmatched_target: usize,
}

impl MatchStats {
    pub fn from_pairs(pairs: &[MatchPair]) -> Self {
        let mut stats = MatchStats::default();
        for pair in pairs {
            match (&pair.source, &pair.target) {
                (Some(_), Some(_)) => stats.matched += 1,
                (Some(_), None) => stats.unmatched_source += 1,
                (None, Some(_)) => stats.unmatched_target += 1,
                (None, None) => {}
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.matched + self.unmatched_source + self.unmatched_target
    }
}
