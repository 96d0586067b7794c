//! Analysis pipeline
//!
//! Discovery, parsing and extraction, graph building, cycle detection and
//! reporting, in that order. Only parsing runs in parallel; everything after
//! it works on the immutable graph.

use crate::core::cycles::find_cycles;
use crate::core::discovery::FileDiscovery;
use crate::core::impact::{analyze_impact, classify_complexity};
use crate::core::parallel::{process_with_progress, ProgressUpdate};
use crate::core::paths::find_paths;
use crate::core::suggestions::suggest_all;
use crate::error::{Result, TfdepsError};
use crate::models::analysis::{AnalysisReport, Cycle, Diagnostic, ModuleReport};
use crate::models::config::Settings;
use crate::models::dependency_graph::DependencyGraph;
use crate::parsers::extractor;
use crate::parsers::graph_builder::{BuildOutput, GraphBuilder};
use crate::parsers::hcl_parser::HclParser;
use crate::utils::PathResolver;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Runs a complete scan for one set of settings
pub struct Analyzer {
    settings: Settings,
}

impl Analyzer {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Scan the tree, stamping the report with the current time unless
    /// timestamps are disabled.
    pub fn analyze(&self) -> Result<AnalysisReport> {
        self.analyze_with_progress(self.timestamp(), |_| {})
    }

    /// Scan the tree with an explicit timestamp. Two calls with the same
    /// timestamp over the same tree produce identical reports.
    pub fn analyze_at(&self, generated_at: Option<DateTime<Utc>>) -> Result<AnalysisReport> {
        self.analyze_with_progress(generated_at, |_| {})
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.settings.include_timestamp.then(Utc::now)
    }

    /// Scan the tree, reporting parse progress per file
    pub fn analyze_with_progress<P>(
        &self,
        generated_at: Option<DateTime<Utc>>,
        progress: P,
    ) -> Result<AnalysisReport>
    where
        P: Fn(ProgressUpdate) + Send + Sync,
    {
        let root = self.settings.scan_path.as_path();
        if !root.is_dir() {
            return Err(TfdepsError::InvalidPath {
                path: root.to_path_buf(),
            });
        }

        let discovery = FileDiscovery::new(&self.settings)?.discover();
        let resolver = PathResolver::new(root);

        let fragments = process_with_progress(
            discovery.files(),
            self.settings.parallel,
            |(path, kind)| {
                let file = HclParser::parse_file(&path, kind, &resolver);
                extractor::extract(&file, &resolver)
            },
            progress,
        )?;

        let BuildOutput {
            graph,
            mut diagnostics,
        } = GraphBuilder::new(root).build(fragments);
        diagnostics.extend(discovery.diagnostics);
        diagnostics.sort();
        diagnostics.dedup();

        let cycles = find_cycles(&graph);
        for cycle in &cycles {
            tracing::warn!("circular dependency: {}", cycle);
        }

        tracing::info!(
            modules = graph.module_count(),
            edges = graph.edge_count(),
            cycles = cycles.len(),
            diagnostics = diagnostics.len(),
            "analysis finished"
        );

        Ok(build_report(root, generated_at, &graph, cycles, diagnostics))
    }
}

/// Assemble the report from a finished graph
pub fn build_report(
    scan_root: &Path,
    generated_at: Option<DateTime<Utc>>,
    graph: &DependencyGraph,
    cycles: Vec<Cycle>,
    diagnostics: Vec<Diagnostic>,
) -> AnalysisReport {
    let modules = graph
        .modules()
        .iter()
        .map(|(id, module)| {
            let report = ModuleReport {
                source: module.source.clone(),
                path: module.path.clone(),
                dependencies: graph.upstream(id).into_iter().collect(),
                dependents: graph.dependents(id).into_iter().collect(),
                declared_dependencies: module.declared_dependencies.iter().cloned().collect(),
                inferred_references: module.inferred_references.iter().cloned().collect(),
                outputs: module.outputs.iter().cloned().collect(),
                variables: module.variables.iter().cloned().collect(),
                data_sources: module.data_sources.iter().cloned().collect(),
                remote_states: module.remote_states.iter().cloned().collect(),
                resources: module.resources.iter().cloned().collect(),
                invocations: module.invocations.clone(),
                files: module.files.iter().cloned().collect(),
                kinds: module.kinds.iter().copied().collect(),
                stub: module.stub,
                complexity_score: module.complexity_score,
            };
            (id.clone(), report)
        })
        .collect();

    AnalysisReport {
        scan_root: scan_root.to_path_buf(),
        generated_at,
        modules,
        edges: graph.edges().cloned().collect(),
        total_modules: graph.module_count(),
        total_dependencies: graph.edge_count(),
        total_cycles: cycles.len(),
        refactoring_suggestions: suggest_all(graph, &cycles),
        circular_dependencies: cycles,
        dependency_paths: find_paths(graph),
        impact_analysis: analyze_impact(graph),
        complexity_analysis: classify_complexity(graph),
        deployment_layers: graph.deployment_layers(),
        diagnostics,
    }
}
