// Text primitives shared by every capability: whitespace normalization,
// sentence splitting, sentence-aware chunking and keyword frequency ranking.
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").unwrap());

static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z0-9']+").unwrap());

// Collapse all whitespace runs (spaces, tabs, newlines) to a single space and
// strip leading/trailing whitespace. Idempotent.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Split text into sentences on terminal punctuation. A trailing fragment
// without terminal punctuation still counts as a sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last_end = 0;
    for m in SENTENCE_PATTERN.find_iter(text) {
        let sentence = m.as_str().trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        last_end = m.end();
    }
    let tail = text[last_end..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

// Greedily accumulate sentences into chunks of at most `max_chunk_size`
// chars. The bound is soft: a single sentence longer than the limit becomes
// its own chunk rather than being split mid-sentence.
pub fn chunk_text(text: &str, max_chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;
    for sentence in split_sentences(text) {
        let sentence_chars = sentence.chars().count();
        if !current.is_empty() && current_chars + 1 + sentence_chars > max_chunk_size {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if current.is_empty() {
            current.push_str(sentence);
            current_chars = sentence_chars;
        } else {
            current.push(' ');
            current.push_str(sentence);
            current_chars += 1 + sentence_chars;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

pub fn tokenize(text: &str) -> Vec<String> {
    WORD_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

// Frequency table of lowercase alphanumeric words, excluding words at or
// below `min_word_length`. Apostrophized forms ("don't") are not counted.
pub fn keyword_frequencies(text: &str, min_word_length: usize) -> HashMap<String, usize> {
    let mut frequencies = HashMap::new();
    for word in tokenize(text) {
        if word.chars().count() > min_word_length && word.chars().all(|c| c.is_alphanumeric()) {
            *frequencies.entry(word).or_insert(0) += 1;
        }
    }
    frequencies
}

// Truncate to at most `max_chars` characters without splitting a char.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_runs() {
        let normalized = normalize_whitespace("  hello \t world\n\nagain  ");
        assert_eq!(normalized, "hello world again");
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize_whitespace("a  b\tc\nd");
        let twice = normalize_whitespace(&once);
        assert_eq!(once, twice);
        assert!(!once.contains("  "));
        assert_eq!(once, once.trim());
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace("   \n\t "), "");
    }

    #[test]
    fn test_split_sentences_basic() {
        let sentences = split_sentences("First one. Second one! Third one?");
        assert_eq!(sentences, vec!["First one.", "Second one!", "Third one?"]);
    }

    #[test]
    fn test_split_sentences_trailing_fragment() {
        let sentences = split_sentences("Terminated here. And a trailing fragment");
        assert_eq!(sentences, vec!["Terminated here.", "And a trailing fragment"]);
    }

    #[test]
    fn test_split_sentences_empty() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_chunk_reconstructs_sentence_sequence() {
        let text = "One sentence here. Another sentence follows. A third one lands. And the last closes.";
        let chunks = chunk_text(text, 45);
        assert!(chunks.len() > 1);
        let rejoined = chunks.join(" ");
        assert_eq!(rejoined, split_sentences(text).join(" "));
    }

    #[test]
    fn test_chunk_respects_bound() {
        let text = "Short one. Another short. Third short. Fourth short.";
        for chunk in chunk_text(text, 30) {
            assert!(chunk.chars().count() <= 30, "chunk too long: {chunk:?}");
        }
    }

    #[test]
    fn test_chunk_oversized_sentence_stays_whole() {
        let text = "This single sentence is far longer than the configured maximum chunk size.";
        let chunks = chunk_text(text, 10);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], text);
    }

    #[test]
    fn test_chunk_empty_input() {
        assert!(chunk_text("", 100).is_empty());
        assert!(chunk_text("   ", 100).is_empty());
    }

    #[test]
    fn test_keyword_frequencies_min_length() {
        let freq = keyword_frequencies("the the cat cat analysis analysis", 3);
        assert!(freq.get("the").is_none());
        assert!(freq.get("cat").is_none());
        assert_eq!(freq.get("analysis"), Some(&2));
    }

    #[test]
    fn test_keyword_frequencies_excludes_apostrophes() {
        let freq = keyword_frequencies("don't don't would would", 3);
        assert!(freq.get("don't").is_none());
        assert_eq!(freq.get("would"), Some(&2));
    }

    #[test]
    fn test_keyword_frequencies_lowercases() {
        let freq = keyword_frequencies("Rust RUST rust", 3);
        assert_eq!(freq.get("rust"), Some(&3));
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        let text = "héllo wörld";
        assert_eq!(truncate_chars(text, 4), "héll");
        assert_eq!(truncate_chars(text, 100), text);
    }
}
