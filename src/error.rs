//! Error types for the assistant session core.

/// Top-level error type for the assistant session and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    /// Remote chat endpoint error (network, status, or response shape).
    #[error("chat error: {0}")]
    Chat(String),

    /// Speech recognition (capture) error.
    #[error("recognition error: {0}")]
    Recognition(String),

    /// Speech synthesis (playback) error.
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Image verdict endpoint error.
    #[error("scan error: {0}")]
    Scan(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AssistError>;
