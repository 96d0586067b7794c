//! Analysis result structures

use super::dependency_graph::{DependencyEdge, EdgeKind};
use super::document::FileKind;
use crate::error::{ErrorSeverity, Result, TfdepsError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// Modules affecting more than this many others are high impact
pub const HIGH_IMPACT_THRESHOLD: usize = 3;

/// Category of a data-quality problem found in the scanned tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    Filesystem,
    Syntax,
    Grammar,
    Resolution,
    SelfReference,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::Filesystem => "filesystem",
            DiagnosticKind::Syntax => "syntax",
            DiagnosticKind::Grammar => "grammar",
            DiagnosticKind::Resolution => "resolution",
            DiagnosticKind::SelfReference => "self-reference",
        };
        f.write_str(name)
    }
}

/// A problem that degrades the result without aborting the scan
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: ErrorSeverity,
    /// File or directory relative to the scan root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, severity: ErrorSeverity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            path: None,
            module: None,
            message: message.into(),
        }
    }

    pub fn filesystem(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Filesystem, ErrorSeverity::Warning, message).with_path(path)
    }

    pub fn syntax(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Syntax, ErrorSeverity::Error, message).with_path(path)
    }

    pub fn grammar(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Grammar, ErrorSeverity::Warning, message).with_path(path)
    }

    pub fn resolution(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Resolution, ErrorSeverity::Warning, message).with_module(module)
    }

    pub fn self_reference(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::SelfReference, ErrorSeverity::Warning, message)
            .with_module(module)
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }
}

impl Ord for Diagnostic {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.path, &self.module, self.kind, &self.message, self.severity).cmp(&(
            &other.path,
            &other.module,
            other.kind,
            &other.message,
            other.severity,
        ))
    }
}

impl PartialOrd for Diagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        match (&self.path, &self.module) {
            (Some(path), _) => write!(f, " ({})", path),
            (None, Some(module)) => write!(f, " (module {})", module),
            (None, None) => Ok(()),
        }
    }
}

/// A simple cycle in closed form: `[m0, m1, ..., mk, m0]`, where `m0` is the
/// smallest id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cycle(Vec<String>);

impl Cycle {
    /// Build a cycle from its members in path order. The members are rotated
    /// so the smallest id comes first and the first id is repeated at the end.
    pub fn from_members(mut members: Vec<String>) -> Self {
        if let Some(start) = members
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.cmp(b.1))
            .map(|(i, _)| i)
        {
            members.rotate_left(start);
        }
        if let Some(first) = members.first().cloned() {
            members.push(first);
        }
        Cycle(members)
    }

    /// Distinct members without the closing repeat
    pub fn members(&self) -> &[String] {
        match self.0.len() {
            0 => &self.0,
            n => &self.0[..n - 1],
        }
    }

    /// Number of distinct modules on the cycle
    pub fn len(&self) -> usize {
        self.members().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consecutive `(from, to)` pairs, including the closing edge
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.0
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
            .collect()
    }

    /// The edge returning to the first module
    pub fn closing_edge(&self) -> Option<(&str, &str)> {
        self.edges().pop()
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        self.edges().iter().any(|&(a, b)| a == from && b == to)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" -> "))
    }
}

/// Which refactoring rule produced a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    ExtractCommonDependency,
    IndirectLookup,
    Restructure,
}

/// One way to break a cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    /// Modules the suggestion talks about
    pub modules: Vec<String>,
    pub message: String,
}

/// Suggestions for a single cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSuggestions {
    pub cycle: Cycle,
    pub suggestions: Vec<Suggestion>,
}

/// Downstream reach of one module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleImpact {
    pub affected_modules: Vec<String>,
    pub impact_count: usize,
}

/// A module whose change reaches more than [`HIGH_IMPACT_THRESHOLD`] others
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighImpactModule {
    pub module: String,
    pub impact_count: usize,
    pub affected_modules: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactAnalysis {
    pub high_impact_modules: Vec<HighImpactModule>,
    pub module_impact_analysis: BTreeMap<String, ModuleImpact>,
    pub recommendations: Vec<String>,
}

/// Modules bucketed by complexity score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityAnalysis {
    pub high_complexity: Vec<String>,
    pub medium_complexity: Vec<String>,
    pub low_complexity: Vec<String>,
}

impl ComplexityAnalysis {
    /// Add a module to the bucket matching its score
    pub fn classify(&mut self, id: &str, score: usize) {
        let bucket = match score {
            s if s > 10 => &mut self.high_complexity,
            s if s > 5 => &mut self.medium_complexity,
            _ => &mut self.low_complexity,
        };
        bucket.push(id.to_string());
    }
}

/// Per-module entry of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleReport {
    pub source: String,
    pub path: PathBuf,
    /// Upstream module ids, declared and inferred
    pub dependencies: Vec<String>,
    /// Modules that directly consume this one
    pub dependents: Vec<String>,
    pub declared_dependencies: Vec<String>,
    pub inferred_references: Vec<String>,
    pub outputs: Vec<String>,
    pub variables: Vec<String>,
    pub data_sources: Vec<String>,
    pub remote_states: Vec<String>,
    pub resources: Vec<String>,
    pub invocations: BTreeMap<String, String>,
    pub files: Vec<String>,
    pub kinds: Vec<FileKind>,
    pub stub: bool,
    pub complexity_score: usize,
}

/// Complete result of one scan. Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub scan_root: PathBuf,
    pub generated_at: Option<DateTime<Utc>>,
    pub modules: BTreeMap<String, ModuleReport>,
    pub edges: Vec<DependencyEdge>,
    pub circular_dependencies: Vec<Cycle>,
    /// Simple paths between connected pairs, keyed `source->target`
    pub dependency_paths: BTreeMap<String, Vec<Vec<String>>>,
    pub total_modules: usize,
    pub total_dependencies: usize,
    pub total_cycles: usize,
    pub refactoring_suggestions: Vec<CycleSuggestions>,
    pub impact_analysis: ImpactAnalysis,
    pub complexity_analysis: ComplexityAnalysis,
    /// Modules grouped by deployment order, upstream first
    pub deployment_layers: Vec<Vec<String>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisReport {
    pub fn has_cycles(&self) -> bool {
        !self.circular_dependencies.is_empty()
    }

    /// Every `(from, to)` pair that lies on at least one cycle
    pub fn cycle_edges(&self) -> BTreeSet<(String, String)> {
        self.circular_dependencies
            .iter()
            .flat_map(|cycle| {
                cycle
                    .edges()
                    .into_iter()
                    .map(|(a, b)| (a.to_string(), b.to_string()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Modules that lie on at least one cycle
    pub fn cycle_members(&self) -> BTreeSet<&str> {
        self.circular_dependencies
            .iter()
            .flat_map(|cycle| cycle.members().iter().map(String::as_str))
            .collect()
    }

    pub fn is_cycle_edge(&self, edge: &DependencyEdge) -> bool {
        self.circular_dependencies
            .iter()
            .any(|cycle| cycle.contains_edge(&edge.from, &edge.to))
    }

    pub fn inferred_edge_count(&self) -> usize {
        self.edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Inferred)
            .count()
    }

    /// Downstream reach of one module, for `--impact`
    pub fn impact_of(&self, id: &str) -> Result<&ModuleImpact> {
        self.impact_analysis
            .module_impact_analysis
            .get(id)
            .ok_or_else(|| TfdepsError::UnknownModule { id: id.to_string() })
    }

    /// Diagnostics at error severity or above
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity >= ErrorSeverity::Error)
            .count()
    }
}
