//! Error handling for tfdeps
//!
//! Fatal errors, result aliases and error context utilities. Per-file and
//! per-reference problems are not errors; they travel through the report as
//! diagnostics.

pub mod context;
pub mod types;

pub use context::ResultExt;
pub use types::{ErrorSeverity, Result, TfdepsError};
