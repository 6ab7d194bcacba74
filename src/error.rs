use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuneForgeError {
    #[error("Invalid Symbol: {0} is outside the 29-symbol alphabet")]
    InvalidSymbol(u8),

    #[error("Key must contain at least one symbol")]
    EmptyKey,

    #[error("Degenerate Key Length: period {period} is unusable for a stream of {len} symbols")]
    DegenerateKeyLength { period: usize, len: usize },

    #[error("Length Mismatch: expected {expected} symbols, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),
}

pub type RfResult<T> = Result<T, RuneForgeError>;
