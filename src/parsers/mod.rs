//! Parsing functionality for configuration files
//!
//! This module turns HCL text into documents, projects documents onto module
//! fragments and assembles fragments into the dependency graph.

pub mod extractor;
pub mod grammar;
pub mod graph_builder;
pub mod hcl_parser;
pub mod references;

pub use extractor::extract;
pub use grammar::Grammar;
pub use graph_builder::{BuildOutput, GraphBuilder};
pub use hcl_parser::HclParser;
