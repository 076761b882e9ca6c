//! Error types for kifu loading and navigation

/// Kifu engine errors
///
/// A failed command never leaves partially applied state behind: board,
/// hands, cursor and fork selections are unchanged after any `Err`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KifuError {
    /// The supplied record lacks a required field or uses an unknown value
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Cursor target out of range or a fork switch that does not exist
    #[error("invalid navigation: {0}")]
    InvalidNavigation(String),

    /// An invariant the engine relies on was violated
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),
}

impl From<serde_json::Error> for KifuError {
    fn from(e: serde_json::Error) -> Self {
        KifuError::MalformedInput(e.to_string())
    }
}

/// Result type for kifu operations
pub type KifuResult<T> = Result<T, KifuError>;
