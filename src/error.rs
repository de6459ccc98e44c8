//! Error types for iconforge
//!
//! Uses `thiserror` for library errors. Expected per-asset failures never
//! surface as `ForgeError`; they are accumulated into result lists by the
//! processing and validation loops.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for iconforge operations
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Main error type for iconforge operations
#[derive(Error, Debug)]
pub enum ForgeError {
    /// Source directory does not exist
    #[error("source directory not found: {path}")]
    SourceMissing { path: PathBuf },

    /// Icon model descriptor could not be loaded
    #[error("cannot load icon model {path}: {message}")]
    ModelLoad { path: PathBuf, message: String },

    /// Asset path escapes the source root
    #[error("path '{path}' escapes the asset root")]
    PathEscape { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_display_source_missing() {
        let err = ForgeError::SourceMissing {
            path: PathBuf::from("assets"),
        };
        assert_eq!(err.to_string(), "source directory not found: assets");
    }

    #[test]
    fn test_error_display_model_load() {
        let err = ForgeError::ModelLoad {
            path: PathBuf::from("file_icons.model.json"),
            message: "expected value at line 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot load icon model file_icons.model.json: expected value at line 1"
        );
    }
}
