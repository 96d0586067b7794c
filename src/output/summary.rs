//! Human-readable summary for stderr

use crate::models::analysis::{AnalysisReport, ModuleImpact};
use crate::error::ErrorSeverity;
use ansi_term::Colour::{Cyan, Green, Red, Yellow};
use ansi_term::Style;

/// Diagnostics shown before the summary says "and N more"
const DIAGNOSTIC_PREVIEW: usize = 10;

fn paint(use_colors: bool, style: Style, text: impl AsRef<str>) -> String {
    if use_colors {
        style.paint(text.as_ref()).to_string()
    } else {
        text.as_ref().to_string()
    }
}

/// Format the totals, cycles, suggestions and diagnostics of a report
pub fn format_summary(report: &AnalysisReport, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&paint(use_colors, Style::new().bold(), "Dependency Analysis Summary"));
    output.push('\n');
    output.push_str("---------------------------\n");
    output.push_str(&format!("Scan root: {}\n", report.scan_root.display()));
    output.push_str(&format!("Modules: {}\n", report.total_modules));
    output.push_str(&format!(
        "Dependencies: {} ({} inferred)\n",
        report.total_dependencies,
        report.inferred_edge_count()
    ));

    let cycles = format!("Cycles: {}", report.total_cycles);
    if report.has_cycles() {
        output.push_str(&paint(use_colors, Red.bold(), cycles));
    } else {
        output.push_str(&paint(use_colors, Green.normal(), cycles));
    }
    output.push('\n');

    for entry in &report.refactoring_suggestions {
        output.push_str(&format!(
            "  {} {}\n",
            paint(use_colors, Red.normal(), "cycle:"),
            entry.cycle
        ));
        let shown = if verbose { entry.suggestions.len() } else { 1 };
        for suggestion in entry.suggestions.iter().take(shown) {
            output.push_str(&format!("    - {}\n", suggestion.message));
        }
    }

    if !report.impact_analysis.high_impact_modules.is_empty() {
        output.push_str(&paint(use_colors, Cyan.normal(), "High impact modules:"));
        output.push('\n');
        for module in &report.impact_analysis.high_impact_modules {
            output.push_str(&format!(
                "  {} affects {} modules\n",
                module.module, module.impact_count
            ));
        }
    }

    let errors = report.error_count();
    let warnings = report.diagnostics.len() - errors;
    let diagnostics = format!("Diagnostics: {} errors, {} warnings", errors, warnings);
    if errors > 0 {
        output.push_str(&paint(use_colors, Red.normal(), diagnostics));
    } else if warnings > 0 {
        output.push_str(&paint(use_colors, Yellow.normal(), diagnostics));
    } else {
        output.push_str(&diagnostics);
    }
    output.push('\n');

    let limit = if verbose {
        report.diagnostics.len()
    } else {
        DIAGNOSTIC_PREVIEW
    };
    for diagnostic in report.diagnostics.iter().take(limit) {
        let style = match diagnostic.severity {
            ErrorSeverity::Warning => Yellow.normal(),
            _ => Red.normal(),
        };
        output.push_str(&format!(
            "  {}\n",
            paint(use_colors, style, diagnostic.to_string())
        ));
    }
    if report.diagnostics.len() > limit {
        output.push_str(&format!(
            "  ... and {} more (use --verbose to list all)\n",
            report.diagnostics.len() - limit
        ));
    }

    output
}

/// Format the downstream set of one module for `--impact`
pub fn format_impact(id: &str, impact: &ModuleImpact, use_colors: bool) -> String {
    let mut output = format!(
        "{} affects {} module(s)\n",
        paint(use_colors, Style::new().bold(), id),
        impact.impact_count
    );
    for affected in &impact.affected_modules {
        output.push_str(&format!("  {}\n", affected));
    }
    output
}
