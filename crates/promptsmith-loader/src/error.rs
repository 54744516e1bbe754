//! Error types for the template loader crate.

use std::path::PathBuf;

/// Errors that can occur while loading template definitions from disk.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// Template file was not found.
    #[error("template file not found: {0}")]
    TemplateNotFound(PathBuf),

    /// No loaded template has the requested name.
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    /// Template directory does not exist or is not a directory.
    #[error("template directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// No directory was given and the loader has none configured.
    #[error("no template directory specified")]
    NoDirectory,

    /// File extension is not one of `.yaml`, `.yml` or `.json`.
    #[error("unsupported template format '{extension}': {path}")]
    UnsupportedFormat {
        /// Path to the rejected file.
        path: PathBuf,
        /// The file's extension (empty if it has none).
        extension: String,
    },

    /// Failed to read a template file.
    #[error("failed to read template file: {path}")]
    Read {
        /// Path to the template that failed to load.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// File content is not a valid template definition.
    #[error("invalid template file {path}: {reason}")]
    Parse {
        /// Path to the template file.
        path: PathBuf,
        /// Parser or validation message.
        reason: String,
    },

    /// Template directory listing failed.
    #[error("failed to list templates in {path}")]
    DirectoryListError {
        /// Path to the template directory.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;
