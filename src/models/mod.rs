//! Data models and structures for tfdeps

pub mod analysis;
pub mod config;
pub mod dependency_graph;
pub mod document;
pub mod module;

pub use analysis::{AnalysisReport, Cycle, Diagnostic, DiagnosticKind};
pub use config::{OutputFormat, PartialSettings, Settings};
pub use dependency_graph::{DependencyEdge, DependencyGraph, EdgeKind};
pub use document::{Block, ConfigFile, Document, FileKind, Value};
pub use module::{DeclaredDependency, Module, ModuleFragment, Reference, ReferenceVia};
