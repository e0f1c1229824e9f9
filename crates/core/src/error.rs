//! Error types for s3menu-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for s3menu-core
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for s3menu-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidConfig(String),

    /// Storage service errors
    #[error("Storage operation failed: {0}")]
    Storage(String),

    /// Local file to upload does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Local download directory does not exist
    #[error("Not a directory: {0}")]
    InvalidDirectory(PathBuf),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Menu key or alternative registered twice
    #[error("Selection '{0}' is already registered in this menu")]
    DuplicateSelection(String),

    /// Standard input reached end of file
    #[error("Input closed")]
    InputClosed,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),
}

// Generic SdkError conversion for all S3 operations
impl<E, R> From<aws_sdk_s3::error::SdkError<E, R>> for Error
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    fn from(err: aws_sdk_s3::error::SdkError<E, R>) -> Self {
        Error::Storage(aws_sdk_s3::error::DisplayErrorContext(err).to_string())
    }
}

// ByteStreamError conversion
impl From<aws_sdk_s3::primitives::ByteStreamError> for Error {
    fn from(err: aws_sdk_s3::primitives::ByteStreamError) -> Self {
        Error::Storage(err.to_string())
    }
}
