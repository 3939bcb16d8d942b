//! Error types for preprocessing operations.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PreprocessingError>;

/// Error type for preprocessing operations.
#[derive(Debug, Error)]
pub enum PreprocessingError {
    /// Two parallel argument lists disagree in length.
    #[error("Length mismatch: {what} has {got} entries, expected {expected}")]
    LengthMismatch {
        what: String,
        expected: usize,
        got: usize,
    },
    /// A named column does not exist in the frame.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    /// A column name is already taken.
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),
    /// Category value not known to a fitted encoder.
    #[error("Unknown category '{value}' in column {column}")]
    UnknownCategory { column: String, value: String },
    /// Train and test frames do not share the same columns.
    #[error("Column mismatch: expected {expected:?}, got {got:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },
    /// A column holds the wrong logical type for the operation.
    #[error("Type mismatch in column {column}: expected {expected}")]
    TypeMismatch { column: String, expected: String },
    /// Shape mismatch between expected and actual dimensions.
    #[error("Invalid shape: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },
    /// Invalid hyperparameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Numerical computation error (singular system, overflow, ...).
    #[error("Numerical error: {0}")]
    NumericalError(String),
    /// A named value is absent from the working set.
    #[error("Missing input: {0}")]
    MissingInput(String),
    /// Malformed delimited input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed configuration document.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_length_mismatch() {
        let err = PreprocessingError::LengthMismatch {
            what: "strategies".to_string(),
            expected: 3,
            got: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("Length mismatch"));
        assert!(msg.contains("strategies"));
    }

    #[test]
    fn test_error_display_unknown_category() {
        let err = PreprocessingError::UnknownCategory {
            column: "color".to_string(),
            value: "green".to_string(),
        };
        assert!(err.to_string().contains("'green'"));
    }

    #[test]
    fn test_error_display_column_mismatch() {
        let err = PreprocessingError::ColumnMismatch {
            expected: vec!["a".to_string()],
            got: vec!["b".to_string()],
        };
        assert!(err.to_string().contains("Column mismatch"));
    }

    #[test]
    fn test_error_display_invalid_parameter() {
        let err = PreprocessingError::InvalidParameter("bad param".to_string());
        assert!(err.to_string().contains("Invalid parameter"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: PreprocessingError = io_err.into();
        assert!(matches!(err, PreprocessingError::Io(_)));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: PreprocessingError = json_err.into();
        assert!(matches!(err, PreprocessingError::Config(_)));
    }

    #[test]
    fn test_error_is_std_error() {
        let err = PreprocessingError::EmptyData("test".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
