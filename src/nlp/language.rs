// Language identification result and its fixed fallback.
use serde::{Deserialize, Serialize};

pub const FALLBACK_LANGUAGE: &str = "en";
pub const DETECTED_CONFIDENCE: f32 = 0.8;
pub const FALLBACK_CONFIDENCE: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageResult {
    pub code: String,
    pub confidence: f32,
}

impl LanguageResult {
    pub fn detected(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            confidence: DETECTED_CONFIDENCE,
        }
    }

    // Used whenever detection fails for any reason.
    pub fn fallback() -> Self {
        Self {
            code: FALLBACK_LANGUAGE.to_string(),
            confidence: FALLBACK_CONFIDENCE,
        }
    }
}
