// NlpProcessor: per-capability primary-model attempt with deterministic
// fallback, request validation and result aggregation. No model error ever
// escapes this boundary.
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::NlpConfig;
use crate::error::NlpError;
use crate::model::{Attempt, EntitySpan, ModelRegistry};
use crate::nlp::language::LanguageResult;
use crate::nlp::ner::{self, EntityResult};
use crate::nlp::sentiment::{self, SentimentResult};
use crate::nlp::summarization::extractive_summary;
use crate::text::{chunk_text, normalize_whitespace, truncate_chars};

// Hard input bounds handed to the models (chars).
const SENTIMENT_INPUT_LIMIT: usize = 512;
const ENTITY_INPUT_LIMIT: usize = 1000;

// Texts below this trimmed length are not worth summarizing at all; texts
// below the model threshold go straight to the extractive path.
const SHORT_TEXT_THRESHOLD: usize = 50;
const MODEL_SUMMARY_THRESHOLD: usize = 200;

const MAX_SUMMARY_CHUNKS: usize = 3;
const CHUNK_SUMMARY_FLOOR: usize = 20;
const CHUNK_SUMMARY_CAP: usize = 130;

// Span recognizers give no native confidence.
const MODEL_ENTITY_CONFIDENCE: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Summarize,
    Sentiment,
    Entities,
    Language,
}

impl FromStr for Operation {
    type Err = NlpError;

    fn from_str(s: &str) -> Result<Self, NlpError> {
        match s {
            "summarize" => Ok(Operation::Summarize),
            "sentiment" => Ok(Operation::Sentiment),
            "entities" => Ok(Operation::Entities),
            "language" => Ok(Operation::Language),
            other => Err(NlpError::UnknownOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Summarize => "summarize",
            Operation::Sentiment => "sentiment",
            Operation::Entities => "entities",
            Operation::Language => "language",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NlpRequest {
    pub text: String,
    pub operations: Vec<String>,
    #[serde(default)]
    pub max_summary_length: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CapabilityFailure {
    pub operation: Operation,
    pub message: String,
}

// One optional field per capability; absent means not requested. A
// capability that fails even after its fallback lands in `failures`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NlpResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<EntityResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<CapabilityFailure>,
}

pub struct NlpProcessor {
    config: NlpConfig,
    models: ModelRegistry,
}

impl NlpProcessor {
    pub fn new(config: NlpConfig, models: ModelRegistry) -> Self {
        Self { config, models }
    }

    pub fn config(&self) -> &NlpConfig {
        &self.config
    }

    pub fn process(&self, request: &NlpRequest) -> Result<NlpResult, NlpError> {
        if request.text.trim().is_empty() {
            return Err(NlpError::EmptyText);
        }
        if request.operations.is_empty() {
            return Err(NlpError::NoOperations);
        }

        // Validate every operation name before anything runs; duplicates are
        // unioned preserving first-seen order.
        let mut requested: Vec<Operation> = Vec::new();
        for name in &request.operations {
            let operation = name.parse::<Operation>()?;
            if !requested.contains(&operation) {
                requested.push(operation);
            }
        }

        let text = truncate_chars(&request.text, self.config.max_text_length);
        let mut result = NlpResult::default();
        for operation in requested {
            match operation {
                Operation::Summarize => {
                    result.summary = guard(operation, &mut result.failures, || {
                        self.summarize(text, request.max_summary_length)
                    });
                }
                Operation::Sentiment => {
                    result.sentiment = guard(operation, &mut result.failures, || {
                        self.analyze_sentiment(text)
                    });
                }
                Operation::Entities => {
                    result.entities = guard(operation, &mut result.failures, || {
                        self.extract_entities(text)
                    });
                }
                Operation::Language => {
                    result.language = guard(operation, &mut result.failures, || {
                        self.detect_language(text)
                    });
                }
            }
        }
        Ok(result)
    }

    pub fn summarize(&self, text: &str, max_length: Option<usize>) -> String {
        let max_length = max_length.unwrap_or(self.config.summary_max_length);
        if text.trim().chars().count() < SHORT_TEXT_THRESHOLD {
            return text.to_string();
        }
        let cleaned = normalize_whitespace(text);
        if cleaned.chars().count() > MODEL_SUMMARY_THRESHOLD {
            match self.try_model_summary(&cleaned, max_length) {
                Attempt::Success(summary) => return summary,
                Attempt::Unavailable => {
                    debug!("summarizer model unavailable, using extractive fallback")
                }
                Attempt::Failed(reason) => {
                    warn!("model summarization failed, using extractive fallback: {}", reason)
                }
            }
        }
        extractive_summary(&cleaned, max_length, self.config.min_keyword_length)
    }

    fn try_model_summary(&self, cleaned: &str, max_length: usize) -> Attempt<String> {
        let Some(model) = self.models.summarizer() else {
            return Attempt::Unavailable;
        };
        if !model.available() {
            return Attempt::Unavailable;
        }
        let chunks = chunk_text(cleaned, self.config.max_chunk_size);
        if chunks.is_empty() {
            return Attempt::Failed("no chunks produced".to_string());
        }
        // Proportional per-chunk budget; the floor keeps many chunks under a
        // small configured maximum from starving a chunk to nothing.
        let per_chunk = (max_length / chunks.len()).clamp(CHUNK_SUMMARY_FLOOR, CHUNK_SUMMARY_CAP);
        let mut summaries = Vec::new();
        for chunk in chunks.iter().take(MAX_SUMMARY_CHUNKS) {
            match model.summarize(chunk, per_chunk, CHUNK_SUMMARY_FLOOR) {
                Ok(summary) => summaries.push(summary),
                // Partial model output never mixes with fallback output.
                Err(e) => return Attempt::Failed(e.to_string()),
            }
        }
        Attempt::Success(summaries.join(" "))
    }

    pub fn analyze_sentiment(&self, text: &str) -> SentimentResult {
        if text.is_empty() {
            return SentimentResult::empty();
        }
        match self.try_model_sentiment(text) {
            Attempt::Success(result) => return result,
            Attempt::Unavailable => {
                debug!("sentiment model unavailable, using lexicon fallback")
            }
            Attempt::Failed(reason) => {
                warn!("model sentiment failed, using lexicon fallback: {}", reason)
            }
        }
        sentiment::lexicon_sentiment(text)
    }

    fn try_model_sentiment(&self, text: &str) -> Attempt<SentimentResult> {
        let Some(model) = self.models.sentiment() else {
            return Attempt::Unavailable;
        };
        if !model.available() {
            return Attempt::Unavailable;
        }
        let scores = match model.classify(truncate_chars(text, SENTIMENT_INPUT_LIMIT)) {
            Ok(scores) => scores,
            Err(e) => return Attempt::Failed(e.to_string()),
        };
        let Some(best) = scores.into_iter().max_by(|a, b| a.score.total_cmp(&b.score)) else {
            return Attempt::Failed("model returned no class scores".to_string());
        };
        // Fold the unsigned winning-class score onto the signed scale. A
        // label outside the mapping carries no usable polarity and reports
        // neutral.
        let label = self.config.mapped_label(&best.label);
        let (label, score) = match label.as_str() {
            "negative" => (label, -best.score),
            "positive" => (label, best.score),
            _ => ("neutral".to_string(), 0.0),
        };
        Attempt::Success(SentimentResult {
            score,
            label,
            confidence: best.score,
        })
    }

    pub fn extract_entities(&self, text: &str) -> Vec<EntityResult> {
        let mut entities = match self.try_model_entities(text) {
            Attempt::Success(spans) => spans
                .into_iter()
                .map(|span| EntityResult {
                    text: span.text,
                    label: span.label,
                    confidence: MODEL_ENTITY_CONFIDENCE,
                })
                .collect(),
            Attempt::Unavailable => {
                debug!("entity model unavailable, using noun-phrase fallback");
                ner::noun_phrase_entities(text)
            }
            Attempt::Failed(reason) => {
                warn!("model entity extraction failed, using noun-phrase fallback: {}", reason);
                ner::noun_phrase_entities(text)
            }
        };
        // Both paths honor the same cap.
        entities.truncate(self.config.max_entities);
        entities
    }

    fn try_model_entities(&self, text: &str) -> Attempt<Vec<EntitySpan>> {
        let Some(model) = self.models.entities() else {
            return Attempt::Unavailable;
        };
        if !model.available() {
            return Attempt::Unavailable;
        }
        match model.recognize(truncate_chars(text, ENTITY_INPUT_LIMIT)) {
            Ok(spans) => Attempt::Success(spans),
            Err(e) => Attempt::Failed(e.to_string()),
        }
    }

    pub fn detect_language(&self, text: &str) -> LanguageResult {
        match self.models.language() {
            Some(detector) => match detector.detect(text) {
                Ok(code) => LanguageResult::detected(code),
                Err(e) => {
                    debug!("language detection failed, using fixed fallback: {}", e);
                    LanguageResult::fallback()
                }
            },
            None => LanguageResult::fallback(),
        }
    }
}

// Contain a capability that fails even after its fallback; the remaining
// capabilities still run.
fn guard<T>(
    operation: Operation,
    failures: &mut Vec<CapabilityFailure>,
    run: impl FnOnce() -> T,
) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(run)) {
        Ok(value) => Some(value),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "capability processing panicked".to_string());
            warn!("{} capability failed: {}", operation, message);
            failures.push(CapabilityFailure { operation, message });
            None
        }
    }
}
