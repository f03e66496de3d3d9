// Request-validation errors. These reject the whole request up front;
// processing-stage failures never surface here, they degrade to fallbacks
// inside the facade.
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NlpError {
    #[error("text is required")]
    EmptyText,

    #[error("at least one operation is required")]
    NoOperations,

    #[error("unknown operation: {0}. Supported: summarize, sentiment, entities, language")]
    UnknownOperation(String),
}
