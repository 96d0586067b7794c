//! Report rendering and writing
//!
//! An [`Exporter`] turns an [`AnalysisReport`] into text. Every exporter is
//! deterministic: the same report always renders to the same bytes.

mod dot;
mod html;
mod json;
mod mermaid;
mod progress;
mod summary;
mod writers;

pub use self::dot::DotExporter;
pub use self::html::HtmlExporter;
pub use self::json::JsonExporter;
pub use self::mermaid::MermaidExporter;
pub use self::progress::{create_progress_callback, ProgressReporter};
pub use self::summary::{format_impact, format_summary};
pub use self::writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use crate::error::Result;
use crate::models::analysis::AnalysisReport;
use crate::models::config::OutputFormat;

/// Trait for the different report renderers
pub trait Exporter {
    /// Render the report into a string
    fn export(&self, report: &AnalysisReport) -> Result<String>;
}

/// Create an exporter for the output format
pub fn create_exporter(format: OutputFormat) -> Box<dyn Exporter> {
    match format {
        OutputFormat::Json => Box::new(JsonExporter::new(true)),
        OutputFormat::Dot => Box::new(DotExporter::new()),
        OutputFormat::Mermaid => Box::new(MermaidExporter::new()),
        OutputFormat::Html => Box::new(HtmlExporter::new()),
    }
}

/// Quote a string for DOT and JSON-in-script contexts
pub(crate) fn escape_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
