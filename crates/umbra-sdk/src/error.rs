//! Error types for shadow handlers

/// Result type for shadow handler code
pub type ShadowResult<T> = Result<T, ShadowError>;

/// Errors raised inside shadow method and constructor handlers
#[derive(Debug, Clone, thiserror::Error)]
pub enum ShadowError {
    /// Type mismatch during value conversion
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type or kind name
        expected: String,
        /// Actual type or kind name
        got: String,
    },

    /// Invalid argument
    #[error("Argument error: {0}")]
    ArgumentError(String),

    /// A call-through or accessor operation failed inside the engine
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// Shadow-specific failure
    #[error("{0}")]
    Custom(String),
}

impl From<String> for ShadowError {
    fn from(s: String) -> Self {
        ShadowError::Custom(s)
    }
}

impl From<&str> for ShadowError {
    fn from(s: &str) -> Self {
        ShadowError::Custom(s.to_string())
    }
}

impl ShadowError {
    /// Build a `TypeMismatch` from expected/got kind names
    pub fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        ShadowError::TypeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }
}
