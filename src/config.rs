// Runtime configuration: model identifiers, processing limits and the raw
// sentiment label mapping. Loads from JSON; every field has a default so a
// partial file works.
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerTuning {
    pub name: String,
    pub max_length: usize,
    pub min_length: usize,
    pub do_sample: bool,
}

impl Default for SummarizerTuning {
    fn default() -> Self {
        Self {
            name: "mistral".to_string(),
            max_length: 150,
            min_length: 30,
            do_sample: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NlpConfig {
    pub entity_model: String,
    pub sentiment_model: String,
    pub summarizer: SummarizerTuning,

    // Processing limits
    pub max_text_length: usize,
    pub max_chunk_size: usize,
    pub max_entities: usize,
    pub summary_max_length: usize,
    pub min_keyword_length: usize,

    // Raw model label -> positive/neutral/negative
    pub sentiment_labels: HashMap<String, String>,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            entity_model: "mistral".to_string(),
            sentiment_model: "mistral".to_string(),
            summarizer: SummarizerTuning::default(),
            max_text_length: 5000,
            max_chunk_size: 1000,
            max_entities: 10,
            summary_max_length: 150,
            min_keyword_length: 3,
            sentiment_labels: default_label_mapping(),
        }
    }
}

fn default_label_mapping() -> HashMap<String, String> {
    [
        ("LABEL_0", "negative"),
        ("LABEL_1", "neutral"),
        ("LABEL_2", "positive"),
        ("NEGATIVE", "negative"),
        ("NEUTRAL", "neutral"),
        ("POSITIVE", "positive"),
    ]
    .iter()
    .map(|(raw, mapped)| (raw.to_string(), mapped.to_string()))
    .collect()
}

impl NlpConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let config = serde_json::from_reader(file)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    // Unmapped raw labels lowercase through; the facade decides what to do
    // with a label outside the positive/neutral/negative set.
    pub fn mapped_label(&self, raw: &str) -> String {
        self.sentiment_labels
            .get(raw)
            .cloned()
            .unwrap_or_else(|| raw.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_label_mapping() {
        let config = NlpConfig::default();
        assert_eq!(config.mapped_label("LABEL_0"), "negative");
        assert_eq!(config.mapped_label("LABEL_2"), "positive");
        assert_eq!(config.mapped_label("NEUTRAL"), "neutral");
    }

    #[test]
    fn test_unmapped_label_lowercases() {
        let config = NlpConfig::default();
        assert_eq!(config.mapped_label("SURPRISE"), "surprise");
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"max_entities\": 3, \"summarizer\": {{\"name\": \"llama3\"}}}}").unwrap();
        let config = NlpConfig::load(file.path()).unwrap();
        assert_eq!(config.max_entities, 3);
        assert_eq!(config.summarizer.name, "llama3");
        assert_eq!(config.summarizer.max_length, 150);
        assert_eq!(config.max_chunk_size, 1000);
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(NlpConfig::load(Path::new("/nonexistent/config.json")).is_err());
    }
}
