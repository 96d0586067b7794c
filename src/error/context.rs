//! Error context utilities for tfdeps
//!
//! Converts foreign errors into [`TfdepsError`] with a message or the path
//! being worked on.

use crate::error::{Result, TfdepsError};
use std::path::Path;

/// Extension trait for Result to add context to errors
pub trait ResultExt<T, E> {
    /// Add context to an error with a custom message
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;

    /// Add file context to an error
    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|err| TfdepsError::Analysis {
            message: format!("{}: {}", context(), err),
        })
    }

    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|err| {
            let as_dyn: &(dyn std::error::Error + 'static) = &err;
            if let Some(io_err) = as_dyn.downcast_ref::<std::io::Error>() {
                if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                    return TfdepsError::PermissionDenied {
                        path: path.as_ref().to_path_buf(),
                    };
                }
            }

            TfdepsError::DirectoryTraversal {
                path: path.as_ref().to_path_buf(),
                message: format!("{}", err),
            }
        })
    }
}
