//! JSON exporter

use super::Exporter;
use crate::error::Result;
use crate::models::analysis::AnalysisReport;

/// Full report as JSON
pub struct JsonExporter {
    pub pretty: bool,
}

impl JsonExporter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Exporter for JsonExporter {
    fn export(&self, report: &AnalysisReport) -> Result<String> {
        let mut rendered = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        rendered.push('\n');
        Ok(rendered)
    }
}
