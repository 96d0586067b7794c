//! Error types and definitions for tfdeps
//!
//! Only problems that prevent a scan from starting or its output from being
//! delivered are errors. Everything that goes wrong inside the scanned tree is
//! a [`crate::models::analysis::Diagnostic`] instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Warning level - analysis continues, result may be incomplete
    Warning,
    /// Error level - the affected file or reference is skipped
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for tfdeps operations
#[derive(Debug, Error)]
pub enum TfdepsError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied { path: PathBuf },

    /// Invalid path errors
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid output format
    #[error("Invalid output format: {format}")]
    InvalidOutputFormat { format: String },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal errors
    #[error("Directory traversal error for {path}: {message}")]
    DirectoryTraversal { path: PathBuf, message: String },

    /// HCL syntax errors
    #[error("Syntax error in {path}: {message}")]
    Syntax { path: PathBuf, message: String },

    /// Generic analysis failure carrying context
    #[error("Analysis error: {message}")]
    Analysis { message: String },

    /// Unknown module requested by name
    #[error("Unknown module: {id}")]
    UnknownModule { id: String },

    /// Thread pool construction failure
    #[error("Parallel execution error: {message}")]
    ParallelExecution { message: String },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// Output directory not found
    #[error("Output directory not found: {path}")]
    OutputDirectoryNotFound { path: PathBuf },
}

impl TfdepsError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TfdepsError::PermissionDenied { .. } => ErrorSeverity::Warning,
            TfdepsError::Syntax { .. } => ErrorSeverity::Warning,
            TfdepsError::UnknownModule { .. } => ErrorSeverity::Warning,

            TfdepsError::Config { .. } => ErrorSeverity::Critical,
            TfdepsError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            TfdepsError::ConfigRead { .. } => ErrorSeverity::Critical,
            TfdepsError::ConfigParse { .. } => ErrorSeverity::Critical,
            TfdepsError::InvalidPath { .. } => ErrorSeverity::Critical,
            TfdepsError::InvalidOutputFormat { .. } => ErrorSeverity::Critical,
            TfdepsError::GlobPattern { .. } => ErrorSeverity::Critical,
            TfdepsError::OutputWrite { .. } => ErrorSeverity::Critical,
            TfdepsError::StdoutWrite { .. } => ErrorSeverity::Critical,
            TfdepsError::OutputDirectoryNotFound { .. } => ErrorSeverity::Critical,

            _ => ErrorSeverity::Error,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            TfdepsError::PermissionDenied { path } => {
                format!("Cannot access '{}' due to permission denied.", path.display())
            }
            TfdepsError::Io { source } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            TfdepsError::InvalidPath { path } => {
                format!("Invalid path: '{}'. Please provide a readable directory.", path.display())
            }
            TfdepsError::ConfigNotFound { path } => {
                format!("Configuration file not found at '{}'.", path.display())
            }
            TfdepsError::Syntax { path, message } => {
                format!("Could not parse '{}': {}", path.display(), message)
            }
            TfdepsError::UnknownModule { id } => {
                format!("No module with id '{}' exists in the scanned tree.", id)
            }
            TfdepsError::OutputDirectoryNotFound { path } => {
                format!("Output directory '{}' does not exist.", path.display())
            }
            _ => self.to_string(),
        }
    }

    /// Get a hint on how to fix the error, when there is an obvious one
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            TfdepsError::InvalidPath { .. } => Some("Check that the path exists and is a directory"),
            TfdepsError::ConfigNotFound { .. } => Some(
                "Create a .tfdeps.toml file with --init or pass an existing file with --config",
            ),
            TfdepsError::PermissionDenied { .. } => Some("Check file permissions"),
            TfdepsError::OutputDirectoryNotFound { .. } => {
                Some("Create the output directory first or specify a different path")
            }
            TfdepsError::UnknownModule { .. } => {
                Some("Module ids are directory paths relative to --path, e.g. network/vpc")
            }
            _ => None,
        }
    }

    /// Create an IO error
    pub fn io_error(source: std::io::Error) -> Self {
        TfdepsError::Io { source }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        TfdepsError::Config {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        TfdepsError::PermissionDenied { path: path.into() }
    }

    /// Create a syntax error for a configuration file
    pub fn syntax_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        TfdepsError::Syntax {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for TfdepsError {
    fn from(err: std::io::Error) -> Self {
        TfdepsError::io_error(err)
    }
}

impl From<glob::PatternError> for TfdepsError {
    fn from(err: glob::PatternError) -> Self {
        TfdepsError::GlobPattern { source: err }
    }
}

impl From<serde_json::Error> for TfdepsError {
    fn from(err: serde_json::Error) -> Self {
        TfdepsError::JsonSerialize { source: err }
    }
}

/// Result type alias for tfdeps operations
pub type Result<T> = std::result::Result<T, TfdepsError>;
