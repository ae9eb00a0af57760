//! Error types for chunked embedding.

/// Errors that can occur while chunking, encoding, or aggregating.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller misuse: non-positive `max_tokens`, no vectors to combine,
    /// mismatched dimensionality, or token offsets that do not fit the text.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The weighted mean is undefined or cannot be normalized.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Failure reported by the tokenizer.
    #[error(transparent)]
    Tokenizer(anyhow::Error),

    /// Failure reported by the encoder.
    #[error(transparent)]
    Encoder(anyhow::Error),
}

/// Result type for chunked embedding operations.
pub type Result<T> = std::result::Result<T, Error>;
