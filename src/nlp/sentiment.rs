// Lexicon-based sentiment fallback: signed polarity from positive/negative
// word lists with negation and intensifier handling.
use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: f32,
    pub label: String,
    pub confidence: f32,
}

impl SentimentResult {
    // Result for empty input; no model is consulted.
    pub fn empty() -> Self {
        Self {
            score: 0.0,
            label: "neutral".to_string(),
            confidence: 0.0,
        }
    }
}

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "good", "great", "excellent", "wonderful", "fantastic", "amazing", "awesome",
        "love", "happy", "joy", "pleased", "delighted", "satisfied", "perfect",
        "beautiful", "brilliant", "outstanding", "superb", "impressive", "remarkable",
        "best", "better", "positive", "advantage", "benefit", "success", "successful",
        "win", "winning", "accomplished", "achievement", "enjoy", "pleasant",
        "comfortable", "excited", "exciting", "thrilled", "like", "liked", "favorite",
    ]
    .iter()
    .copied()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bad", "terrible", "awful", "horrible", "poor", "worst", "worse",
        "hate", "angry", "sad", "upset", "disappointed", "dissatisfied", "unhappy",
        "fail", "failure", "failed", "problem", "wrong", "error", "broken",
        "difficult", "struggle", "struggling", "pain", "painful", "hurt", "damage",
        "damaged", "disaster", "negative", "loss", "lose", "losing", "lost",
        "reject", "rejected", "dislike", "unpleasant", "uncomfortable",
        "disappointing", "frustrated", "frustrating",
    ]
    .iter()
    .copied()
    .collect()
});

static INTENSIFIERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["very", "extremely", "absolutely", "really", "incredibly", "highly", "totally"]
        .iter()
        .copied()
        .collect()
});

static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["not", "no", "never", "nothing", "nobody", "nowhere", "neither", "nor", "none"]
        .iter()
        .copied()
        .collect()
});

// Signed polarity in [-1, 1]: (positive - negative) / (positive + negative)
// over the lexicon hits, 0.0 when nothing matches. Negation within the
// previous two words flips a hit; an intensifier directly before weights it.
pub fn lexicon_polarity(text: &str) -> f32 {
    let words: Vec<String> = text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    let mut positive = 0.0f32;
    let mut negative = 0.0f32;

    for i in 0..words.len() {
        let word = words[i].as_str();
        let weight = if i > 0 && INTENSIFIERS.contains(words[i - 1].as_str()) {
            1.5
        } else {
            1.0
        };
        let negated = (i > 0 && NEGATIONS.contains(words[i - 1].as_str()))
            || (i > 1 && NEGATIONS.contains(words[i - 2].as_str()));

        if POSITIVE_WORDS.contains(word) {
            if negated {
                negative += weight;
            } else {
                positive += weight;
            }
        } else if NEGATIVE_WORDS.contains(word) {
            if negated {
                positive += weight;
            } else {
                negative += weight;
            }
        }
    }

    let total = positive + negative;
    if total == 0.0 {
        0.0
    } else {
        (positive - negative) / total
    }
}

pub fn lexicon_sentiment(text: &str) -> SentimentResult {
    let polarity = lexicon_polarity(text);
    if polarity > 0.1 {
        SentimentResult {
            score: polarity,
            label: "positive".to_string(),
            confidence: polarity,
        }
    } else if polarity < -0.1 {
        SentimentResult {
            score: polarity,
            label: "negative".to_string(),
            confidence: -polarity,
        }
    } else {
        // Weak polarity is reported neutral; the neutral label always pins
        // the score to zero, the residual strength stays in the confidence.
        SentimentResult {
            score: 0.0,
            label: "neutral".to_string(),
            confidence: polarity.abs(),
        }
    }
}
