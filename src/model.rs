// Model providers behind the facade: availability probing, inference
// adapters that normalize each model's raw output shape, and the immutable
// per-process registry. A probe failure pins the capability to fallback-only
// for the process lifetime; a per-call failure degrades that one call.
use std::process::Command;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::NlpConfig;

// Outcome of one primary-model attempt. The facade pattern-matches this
// instead of letting provider errors propagate.
pub enum Attempt<T> {
    Success(T),
    Unavailable,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpan {
    pub text: String,
    pub label: String,
}

pub trait SummaryModel: Send + Sync {
    fn available(&self) -> bool;
    fn summarize(&self, text: &str, max_length: usize, min_length: usize) -> Result<String>;
}

pub trait SentimentModel: Send + Sync {
    fn available(&self) -> bool;
    // Per-class scores; a plain-label model reports a single unit-score class.
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>>;
}

pub trait EntityModel: Send + Sync {
    fn available(&self) -> bool;
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>>;
}

pub trait LanguageModel: Send + Sync {
    fn detect(&self, text: &str) -> Result<String>;
}

// Shared handle to a local Ollama installation. One inference runs at a
// time: local runtimes are memory-bound and not reliably re-entrant, so the
// lock is held for the duration of a single child-process invocation only.
pub struct OllamaRuntime {
    installed: Vec<String>,
    default_model: String,
    inference_lock: Mutex<()>,
}

impl OllamaRuntime {
    // Probe the installation once at startup. Respects OLLAMA_MODEL,
    // otherwise the smallest installed model (fastest) becomes the default.
    pub fn probe() -> Option<Arc<Self>> {
        let installed = installed_models()?;
        if installed.is_empty() {
            return None;
        }
        let default_model =
            std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| installed[0].clone());
        Some(Arc::new(OllamaRuntime {
            installed,
            default_model,
            inference_lock: Mutex::new(()),
        }))
    }

    // Pick the configured model if it is installed (with or without a tag),
    // else the runtime default.
    fn resolve(&self, preferred: &str) -> String {
        self.installed
            .iter()
            .find(|name| name.as_str() == preferred || name.split(':').next() == Some(preferred))
            .cloned()
            .unwrap_or_else(|| self.default_model.clone())
    }

    fn run(&self, model: &str, prompt: &str) -> Result<String> {
        let _guard = self.inference_lock.lock();
        let output = Command::new("ollama")
            .arg("run")
            .arg(model)
            .arg(prompt)
            .output()
            .map_err(|e| anyhow!("failed to invoke ollama: {}", e))?;
        if !output.status.success() {
            return Err(anyhow!(
                "ollama run failed ({}): {}",
                model,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        let response = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if response.is_empty() {
            return Err(anyhow!("empty response from model {}", model));
        }
        Ok(response)
    }
}

// `ollama list` lines look like: NAME  ID  SIZE  MODIFIED. Returns names
// sorted smallest-first; None when the binary is missing or errors.
fn installed_models() -> Option<Vec<String>> {
    let output = Command::new("ollama").arg("list").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let listing = String::from_utf8_lossy(&output.stdout);
    let mut models: Vec<(String, f32)> = Vec::new();
    for line in listing.lines() {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 3 || cols[0] == "NAME" {
            continue;
        }
        if let Some(size) = parse_size(&cols[1..]) {
            models.push((cols[0].to_string(), size));
        }
    }
    models.sort_by(|a, b| a.1.total_cmp(&b.1));
    Some(models.into_iter().map(|(name, _)| name).collect())
}

// Size tokens look like "3.3 GB" or "700 MB".
fn parse_size(cols: &[&str]) -> Option<f32> {
    for pair in cols.windows(2) {
        if let Ok(value) = pair[0].parse::<f32>() {
            let bytes = match pair[1].to_uppercase().as_str() {
                "GB" => value * 1024.0 * 1024.0 * 1024.0,
                "MB" => value * 1024.0 * 1024.0,
                "KB" => value * 1024.0,
                _ => continue,
            };
            return Some(bytes);
        }
    }
    None
}

struct OllamaSummarizer {
    runtime: Arc<OllamaRuntime>,
    model: String,
    max_length: usize,
}

impl SummaryModel for OllamaSummarizer {
    fn available(&self) -> bool {
        true
    }

    fn summarize(&self, text: &str, max_length: usize, min_length: usize) -> Result<String> {
        // The configured tuning caps whatever the caller asks for.
        let max = max_length.min(self.max_length).max(1);
        let min = min_length.clamp(1, max);
        let prompt = format!(
            "Summarize the following text in roughly {} to {} characters. \
             Respond with the summary only, no preamble.\n\n{}",
            min, max, text
        );
        self.runtime.run(&self.model, &prompt)
    }
}

struct OllamaSentiment {
    runtime: Arc<OllamaRuntime>,
    model: String,
}

impl SentimentModel for OllamaSentiment {
    fn available(&self) -> bool {
        true
    }

    fn classify(&self, text: &str) -> Result<Vec<LabelScore>> {
        let prompt = format!(
            "Classify the sentiment of the following text. Respond with exactly \
             one word: POSITIVE, NEGATIVE or NEUTRAL.\n\n{}",
            text
        );
        let response = self.runtime.run(&self.model, &prompt)?;
        let label = parse_sentiment_label(&response)
            .ok_or_else(|| anyhow!("unparseable sentiment response: {:?}", response))?;
        // Plain-label model: a single class with unit score.
        Ok(vec![LabelScore { label, score: 1.0 }])
    }
}

fn parse_sentiment_label(response: &str) -> Option<String> {
    let word = response
        .split_whitespace()
        .next()?
        .trim_matches(|c: char| !c.is_alphabetic());
    if word.is_empty() {
        return None;
    }
    Some(word.to_uppercase())
}

struct OllamaEntities {
    runtime: Arc<OllamaRuntime>,
    model: String,
}

impl EntityModel for OllamaEntities {
    fn available(&self) -> bool {
        true
    }

    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>> {
        let prompt = format!(
            "List the named entities in the following text, one per line, \
             formatted as TEXT|LABEL where LABEL is one of PERSON, ORG, LOC, \
             DATE or MISC. Respond with NONE if there are no entities.\n\n{}",
            text
        );
        let response = self.runtime.run(&self.model, &prompt)?;
        let spans = parse_entity_lines(&response);
        if spans.is_empty() {
            if response.trim().eq_ignore_ascii_case("none") {
                return Ok(Vec::new());
            }
            return Err(anyhow!("unparseable entity response: {:?}", response));
        }
        Ok(spans)
    }
}

fn parse_entity_lines(response: &str) -> Vec<EntitySpan> {
    response
        .lines()
        .filter_map(|line| {
            let (text, label) = line.split_once('|')?;
            let text = text.trim();
            let label = label.trim();
            if text.is_empty() || label.is_empty() {
                return None;
            }
            Some(EntitySpan {
                text: text.to_string(),
                label: label.to_string(),
            })
        })
        .collect()
}

// Trigram-based detection; deterministic, no model download involved.
pub struct WhatlangDetector;

impl LanguageModel for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<String> {
        whatlang::detect(text)
            .map(|info| info.lang().code().to_string())
            .ok_or_else(|| anyhow!("language detection produced no result"))
    }
}

// Read-only set of model handles, resolved once at startup and shared across
// requests without locking.
pub struct ModelRegistry {
    summarizer: Option<Box<dyn SummaryModel>>,
    sentiment: Option<Box<dyn SentimentModel>>,
    entities: Option<Box<dyn EntityModel>>,
    language: Option<Box<dyn LanguageModel>>,
}

impl ModelRegistry {
    pub fn initialize(config: &NlpConfig) -> Self {
        let mut registry = ModelRegistry::disabled();
        match OllamaRuntime::probe() {
            Some(runtime) => {
                debug!(
                    "model runtime ready: summarizer={} (max={}, min={}, sample={}), sentiment={}, entities={}",
                    config.summarizer.name,
                    config.summarizer.max_length,
                    config.summarizer.min_length,
                    config.summarizer.do_sample,
                    config.sentiment_model,
                    config.entity_model,
                );
                registry.summarizer = Some(Box::new(OllamaSummarizer {
                    model: runtime.resolve(&config.summarizer.name),
                    max_length: config.summarizer.max_length,
                    runtime: Arc::clone(&runtime),
                }));
                registry.sentiment = Some(Box::new(OllamaSentiment {
                    model: runtime.resolve(&config.sentiment_model),
                    runtime: Arc::clone(&runtime),
                }));
                registry.entities = Some(Box::new(OllamaEntities {
                    model: runtime.resolve(&config.entity_model),
                    runtime,
                }));
            }
            None => {
                warn!("no local model runtime found; summarization, sentiment and entities run fallback-only");
            }
        }
        registry.language = Some(Box::new(WhatlangDetector));
        registry
    }

    // No providers at all; every capability uses its fallback.
    pub fn disabled() -> Self {
        ModelRegistry {
            summarizer: None,
            sentiment: None,
            entities: None,
            language: None,
        }
    }

    pub fn with_summarizer(mut self, model: Box<dyn SummaryModel>) -> Self {
        self.summarizer = Some(model);
        self
    }

    pub fn with_sentiment(mut self, model: Box<dyn SentimentModel>) -> Self {
        self.sentiment = Some(model);
        self
    }

    pub fn with_entities(mut self, model: Box<dyn EntityModel>) -> Self {
        self.entities = Some(model);
        self
    }

    pub fn with_language(mut self, model: Box<dyn LanguageModel>) -> Self {
        self.language = Some(model);
        self
    }

    pub fn summarizer(&self) -> Option<&dyn SummaryModel> {
        self.summarizer.as_deref()
    }

    pub fn sentiment(&self) -> Option<&dyn SentimentModel> {
        self.sentiment.as_deref()
    }

    pub fn entities(&self) -> Option<&dyn EntityModel> {
        self.entities.as_deref()
    }

    pub fn language(&self) -> Option<&dyn LanguageModel> {
        self.language.as_deref()
    }
}
