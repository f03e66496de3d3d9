// TextLens: local text analysis with model-first capabilities and
// deterministic fallbacks — extractive summarization, lexicon sentiment,
// noun-phrase entities and language identification.
pub mod config;
pub mod error;
pub mod model;
pub mod nlp;
pub mod processor;
pub mod text;

pub use config::NlpConfig;
pub use error::NlpError;
pub use model::ModelRegistry;
pub use processor::{NlpProcessor, NlpRequest, NlpResult, Operation};
