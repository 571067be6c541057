use std::fmt;

use serde::{Deserialize, Serialize};

/// Scores below this trigger the back-translation fallback and, after
/// matching, an issue screenshot of the target element.
pub const REVIEW_THRESHOLD: f64 = 0.85;

/// The judge's verdict class for one text pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreFlag {
    Match,
    Review,
    Mismatch,
}

impl fmt::Display for ScoreFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreFlag::Match => write!(f, "Match"),
            ScoreFlag::Review => write!(f, "Review"),
            ScoreFlag::Mismatch => write!(f, "Mismatch"),
        }
    }
}

/// Translation fidelity verdict for one matched pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationScore {
    /// Overall fidelity in [0, 1].
    pub score: f64,

    pub flag: ScoreFlag,

    /// Whether the target text is a correct translation.
    pub translation_correct: bool,

    /// Description of a capitalization problem, if any.
    pub capitalization_issue: Option<String>,

    /// Description of a time/date formatting mismatch, if any.
    pub time_issue: Option<String>,

    /// Any other problem the judge noticed.
    pub other_issue: Option<String>,

    /// Free-form reasoning, including fallback notes.
    pub explanation: String,
}

impl TranslationScore {
    /// The degraded verdict used when a pair is missing a side or the judge
    /// call fails: never guess fidelity without evidence.
    pub fn mismatch(explanation: &str) -> Self {
        Self {
            score: 0.0,
            flag: ScoreFlag::Mismatch,
            translation_correct: false,
            capitalization_issue: None,
            time_issue: None,
            other_issue: None,
            explanation: explanation.to_string(),
        }
    }

    /// The neutral verdict used when scoring is disabled: everything is
    /// left for human review, nothing is called a mismatch.
    pub fn unscored() -> Self {
        Self {
            score: 0.0,
            flag: ScoreFlag::Review,
            translation_correct: false,
            capitalization_issue: None,
            time_issue: None,
            other_issue: None,
            explanation: "Scoring disabled (no judge configured).".to_string(),
        }
    }

    pub fn needs_review(&self) -> bool {
        self.score < REVIEW_THRESHOLD
    }
}

/// A collaborator able to judge translation fidelity of a text pair and to
/// back-translate target-locale text for a second opinion.
pub trait TranslationJudge {
    fn score_pair(&self, source_text: &str, target_text: &str) -> TranslationScore;

    /// Back-translate target-locale text into the source locale. None means
    /// the backend could not produce one; the fallback is then skipped.
    fn backtranslate(&self, target_text: &str) -> Option<String>;
}

/// Score a pair, retrying through back-translation when the first verdict is
/// below the review threshold. The better score wins; the explanation
/// records which way the fallback went.
pub fn score_with_fallback(
    judge: &dyn TranslationJudge,
    source_text: &str,
    target_text: &str,
) -> TranslationScore {
    let mut verdict = judge.score_pair(source_text, target_text);
    if !verdict.needs_review() {
        return verdict;
    }

    let Some(back_translation) = judge.backtranslate(target_text) else {
        return verdict;
    };

    let retry = judge.score_pair(source_text, &back_translation);
    if retry.score > verdict.score {
        verdict.score = retry.score;
        verdict.flag = retry.flag;
        verdict.explanation.push_str(&format!(
            "\nBack-translation check (improved score): {}",
            back_translation
        ));
    } else {
        verdict.explanation.push_str(&format!(
            "\nBack-translation check (no improvement): {}",
            back_translation
        ));
    }
    verdict
}

// ============================================================================
// Ollama judge backend
// ============================================================================

pub struct OllamaJudge {
    pub endpoint: String,
    pub model: String,
    /// Human-readable locale names used in the prompt, e.g. "English".
    pub source_language: String,
    pub target_language: String,
}

impl Default for OllamaJudge {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/api/generate".to_string(),
            model: "qwen2.5:1.5b".to_string(),
            source_language: "English".to_string(),
            target_language: "Spanish".to_string(),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Strict-JSON verdict the model is asked to produce.
#[derive(Deserialize)]
struct ModelScoreResponse {
    score: f64,
    #[serde(default)]
    flag: Option<String>,
    #[serde(default)]
    translation_correct: Option<bool>,
    #[serde(default)]
    capitalization_issue: Option<String>,
    #[serde(default)]
    time_issue: Option<String>,
    #[serde(default)]
    other_issue: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
}

impl OllamaJudge {
    pub fn new(endpoint: &str, model: &str, source_language: &str, target_language: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        }
    }

    fn build_score_prompt(&self, source_text: &str, target_text: &str) -> String {
        format!(
            r#"Evaluate whether the {tgt} text is a precise translation of the {src} text, preserving meaning, tone, and structure. Check for capitalization errors, time/date formatting mismatches, and other issues.

{src}: {source}
{tgt}: {target}

Respond with ONLY valid JSON in exactly this shape:
{{"score": <float 0-1>, "flag": "<Match|Review|Mismatch>", "translation_correct": <true|false>, "capitalization_issue": "<description or empty>", "time_issue": "<description or empty>", "other_issue": "<description or empty>", "explanation": "<one or two sentences>"}}"#,
            src = self.source_language,
            tgt = self.target_language,
            source = source_text,
            target = target_text,
        )
    }

    fn generate(&self, prompt: String) -> Option<String> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt,
            stream: false,
            format: "json",
        };

        let client = reqwest::blocking::Client::new();
        let response = client.post(&self.endpoint).json(&request).send().ok()?;
        let parsed: GenerateResponse = response.json().ok()?;
        Some(parsed.response)
    }
}

/// Parse a strict-JSON verdict into a TranslationScore. Used by the Ollama
/// backend and exposed for tests.
pub fn parse_score_response(raw: &str) -> Option<TranslationScore> {
    let parsed: ModelScoreResponse = serde_json::from_str(raw).ok()?;

    let flag = match parsed.flag.as_deref() {
        Some("Match") => ScoreFlag::Match,
        Some("Review") => ScoreFlag::Review,
        _ => ScoreFlag::Mismatch,
    };

    let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());

    Some(TranslationScore {
        score: parsed.score.clamp(0.0, 1.0),
        flag,
        translation_correct: parsed.translation_correct.unwrap_or(false),
        capitalization_issue: non_empty(parsed.capitalization_issue),
        time_issue: non_empty(parsed.time_issue),
        other_issue: non_empty(parsed.other_issue),
        explanation: parsed.explanation.unwrap_or_default(),
    })
}

impl TranslationJudge for OllamaJudge {
    fn score_pair(&self, source_text: &str, target_text: &str) -> TranslationScore {
        if source_text.is_empty() || target_text.is_empty() {
            return TranslationScore::mismatch("Missing text in pair.");
        }

        let prompt = self.build_score_prompt(source_text, target_text);
        match self.generate(prompt).as_deref().and_then(parse_score_response) {
            Some(verdict) => verdict,
            None => TranslationScore::mismatch("Model evaluation failed or returned malformed JSON."),
        }
    }

    fn backtranslate(&self, target_text: &str) -> Option<String> {
        let prompt = format!(
            r#"Provide an accurate {src} back-translation of the {tgt} text, maintaining original meaning and structure.

{tgt}: {target}

Respond with ONLY valid JSON in exactly this shape:
{{"translation": "<the {src} text>"}}"#,
            src = self.source_language,
            tgt = self.target_language,
            target = target_text,
        );

        #[derive(Deserialize)]
        struct BackTranslation {
            translation: String,
        }

        let raw = self.generate(prompt)?;
        let parsed: BackTranslation = serde_json::from_str(&raw).ok()?;
        let trimmed = parsed.translation.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
