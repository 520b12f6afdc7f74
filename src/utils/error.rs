//! Error Handling Module
//!
//! Defines the error type for manifest parsing, counting and chart output.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for distribution checks
#[derive(Error, Debug)]
pub enum DistributionError {
    /// The data directory does not exist or is not a directory
    #[error("Data directory not found: {0}")]
    DataDirNotFound(PathBuf),

    /// A split manifest is missing from the data directory
    #[error("Manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    /// A manifest line could not be turned into a (path, label) pair
    #[error("Malformed line {line} in '{path}': {content:?}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        content: String,
    },

    /// Manifest format settings are inconsistent
    #[error("Invalid manifest format: {0}")]
    InvalidFormat(String),

    /// Chart rendering or encoding failed
    #[error("Chart error: {0}")]
    Chart(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<image::ImageError> for DistributionError {
    fn from(err: image::ImageError) -> Self {
        DistributionError::Chart(err.to_string())
    }
}

/// Convenience Result type for distribution checks
pub type Result<T> = std::result::Result<T, DistributionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DistributionError::Config("bad delimiter".to_string());
        assert_eq!(format!("{}", err), "Configuration error: bad delimiter");
    }

    #[test]
    fn test_manifest_not_found_mentions_file() {
        let err = DistributionError::ManifestNotFound(PathBuf::from("data/test_data_list.txt"));
        assert!(format!("{}", err).contains("test_data_list.txt"));
    }

    #[test]
    fn test_malformed_line_display() {
        let err = DistributionError::MalformedLine {
            path: PathBuf::from("list.txt"),
            line: 7,
            content: "img7.png".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Malformed line 7 in 'list.txt': \"img7.png\""
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DistributionError = io.into();
        assert!(matches!(err, DistributionError::Io(_)));
    }
}
