// Capability modules: result types and the deterministic fallback paths.
pub mod language;
pub mod ner;
pub mod sentiment;
pub mod summarization;

pub use language::LanguageResult;
pub use ner::EntityResult;
pub use sentiment::SentimentResult;
pub use summarization::extractive_summary;
