//! tfdeps - dependency graph analyzer for Terragrunt/Terraform trees
//!
//! The pipeline discovers `terragrunt.hcl` orchestration files and `.tf`
//! module definitions, parses them into a generic document model, extracts
//! declared dependencies and lexical references, merges everything per
//! directory into modules, and builds a directed graph on which circular
//! dependencies, impact and complexity are computed. The resulting
//! [`AnalysisReport`] renders as JSON, Graphviz DOT, Mermaid or HTML.
//!
//! ```no_run
//! use tfdeps::{Analyzer, Settings};
//!
//! let settings = Settings {
//!     scan_path: "live".into(),
//!     ..Settings::default()
//! };
//! let report = Analyzer::new(settings).analyze_at(None)?;
//! for cycle in &report.circular_dependencies {
//!     println!("{}", cycle);
//! }
//! # Ok::<(), tfdeps::TfdepsError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod output;
pub mod parsers;
pub mod utils;

pub use crate::core::{find_cycles, Analyzer};
pub use error::{ErrorSeverity, Result, ResultExt, TfdepsError};
pub use models::{
    analysis::{AnalysisReport, Cycle, Diagnostic, DiagnosticKind},
    config::{OutputFormat, Settings},
    dependency_graph::{DependencyEdge, DependencyGraph, EdgeKind},
    module::Module,
};
pub use output::{create_exporter, Exporter};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
