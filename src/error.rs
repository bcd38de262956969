use thiserror::Error;

/// Main error type for Overlex operations
///
/// Covers the fallible edges of the pipeline: corpus loading, token
/// mapping and report serialization. Violations of store invariants are
/// programming errors and panic instead.
#[derive(Error, Debug)]
pub enum OverlexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corpus '{0}' contains no token lists")]
    EmptyCorpus(String),

    #[error("{kind} offset {value} does not fit the overlay type (largest valid value: {limit})")]
    OffsetOverflow { kind: &'static str, value: u64, limit: u64 },

    #[error("Token '{0}' is not in the dictionary")]
    UnknownToken(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for Overlex operations
pub type Result<T> = std::result::Result<T, OverlexError>;

impl OverlexError {
    /// Check if this error was caused by the input data rather than the
    /// environment or the caller
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            OverlexError::EmptyCorpus(_) | OverlexError::OffsetOverflow { .. } | OverlexError::UnknownToken(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OverlexError::UnknownToken("apple".to_string());
        assert_eq!(err.to_string(), "Token 'apple' is not in the dictionary");

        let err = OverlexError::OffsetOverflow {
            kind: "char",
            value: 70000,
            limit: 65534,
        };
        assert_eq!(
            err.to_string(),
            "char offset 70000 does not fit the overlay type (largest valid value: 65534)"
        );
    }

    #[test]
    fn test_data_errors() {
        assert!(OverlexError::EmptyCorpus("a.json".to_string()).is_data_error());
        assert!(OverlexError::UnknownToken("x".to_string()).is_data_error());
        assert!(!OverlexError::InvalidConfig("bad".to_string()).is_data_error());
    }
}
