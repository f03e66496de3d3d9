// Noun-phrase entity fallback: capitalized-run detection with stopword and
// alphabetic filtering, tagged with a synthetic label.
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityResult {
    pub text: String,
    pub label: String,
    pub confidence: f32,
}

pub const NOUN_PHRASE_LABEL: &str = "NOUN_PHRASE";
pub const NOUN_PHRASE_CONFIDENCE: f32 = 0.7;

static PHRASE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").unwrap());

// Sentence-initial function words that the capitalization heuristic would
// otherwise promote to phrases.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from",
        "has", "he", "in", "is", "it", "its", "of", "on", "that", "the",
        "to", "was", "will", "with", "this", "but", "they", "have", "had",
        "what", "when", "where", "who", "which", "why", "how", "she", "his",
        "her", "our", "their", "there", "then", "these", "those", "some",
    ]
    .iter()
    .copied()
    .collect()
});

// Extract candidate noun phrases, lowercased, keeping only phrases longer
// than two chars whose letters-only form is fully alphabetic. Order follows
// first appearance; repeats are dropped.
pub fn noun_phrase_entities(text: &str) -> Vec<EntityResult> {
    let mut seen = HashSet::new();
    let mut entities = Vec::new();

    for m in PHRASE_PATTERN.find_iter(text) {
        let phrase = m.as_str().to_lowercase();
        if phrase.chars().count() <= 2 {
            continue;
        }
        if STOP_WORDS.contains(phrase.as_str()) {
            continue;
        }
        if !phrase.chars().filter(|c| *c != ' ').all(|c| c.is_alphabetic()) {
            continue;
        }
        if seen.insert(phrase.clone()) {
            entities.push(EntityResult {
                text: phrase,
                label: NOUN_PHRASE_LABEL.to_string(),
                confidence: NOUN_PHRASE_CONFIDENCE,
            });
        }
    }

    entities
}
