use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("input is empty or whitespace only")]
    EmptyInput,

    #[error("invalid bare values detected: {}. Every value must be a valid JSON data type (strings need double quotes, e.g. \"unknown\")", tokens.join(", "))]
    MalformedInput { tokens: Vec<String> },

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("unknown input kind: {0}")]
    UnknownKind(String),

    #[error("bracket validation failed: {}", records.join("; "))]
    BracketMismatch { records: Vec<String> },

    #[error("offload executor dropped the response channel")]
    Offload,

    #[error("failed to acquire execution context: {0}")]
    Context(#[from] std::io::Error),
}

impl TransformError {
    pub fn kind(&self) -> &'static str {
        match self {
            TransformError::EmptyInput => "EmptyInputError",
            TransformError::MalformedInput { .. } => "MalformedInputError",
            TransformError::Parse(_) => "ParseError",
            TransformError::UnknownOperation(_) => "UnknownOperationError",
            TransformError::UnknownKind(_) => "UnknownKindError",
            TransformError::BracketMismatch { .. } => "BracketMismatchError",
            TransformError::Offload => "OffloadError",
            TransformError::Context(_) => "ContextError",
        }
    }
}
