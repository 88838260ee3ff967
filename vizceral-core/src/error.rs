use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Malformed edge at index {index}: missing or invalid `{field}`")]
    MalformedEdge { index: usize, field: &'static str },

    #[error("Call count overflow while aggregating {context}")]
    CountOverflow { context: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TranslateError>;
