//! Error types for Tomo Core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using TomoError
pub type Result<T> = std::result::Result<T, TomoError>;

/// Top-level error type for every assembler operation
#[derive(Debug, Error)]
pub enum TomoError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Packaging error: {0}")]
    Packaging(#[from] PackagingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Build cancelled")]
    Cancelled,
}

/// Errors loading an assembler configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Rejected input, detected before the filesystem is touched
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Book title must not be empty")]
    EmptyTitle,

    #[error("Book title has no filename-safe characters: {0:?}")]
    UnsafeTitle(String),

    #[error("Invalid book title: {0}")]
    InvalidTitle(String),

    #[error("Invalid chapter range label: {0}")]
    InvalidRangeLabel(String),

    #[error("Invalid chapter {index}: {reason}")]
    InvalidChapter { index: usize, reason: String },

    #[error("Invalid chapter window: {0}")]
    InvalidWindow(String),
}

/// Failures acquiring or releasing filesystem and network resources
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Failed to manage scratch directory: {0}")]
    ScratchDir(#[source] std::io::Error),

    #[error("Output directory unavailable: {0}")]
    OutputDir(#[source] std::io::Error),

    #[error("Cover unavailable from {url}: {reason}")]
    CoverUnavailable { url: String, reason: String },
}

/// Failures while rendering documents or writing the archive
#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("Failed to render document: {0}")]
    Render(#[from] quick_xml::Error),

    #[error("Missing artifact {path:?}: {source}")]
    MissingArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Zip writer error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to finalize archive at {path:?}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading an archive back
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Invalid archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid XML in {entry}: {reason}")]
    Xml { entry: String, reason: String },

    #[error("Missing required entry: {0}")]
    MissingEntry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
