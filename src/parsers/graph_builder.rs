//! Dependency graph construction from module fragments
//!
//! Building happens in three passes over id-ordered maps:
//!
//! 1. fragments are merged into one [`Module`] per directory,
//! 2. declared dependencies and lexical references are resolved to module ids,
//! 3. every resolved dependency becomes an edge `referenced -> referencing`.
//!
//! The result depends only on the set of fragments, never on their order.

use crate::models::analysis::Diagnostic;
use crate::models::dependency_graph::{DependencyGraph, EdgeKind};
use crate::models::module::{DeclaredDependency, Module, ModuleFragment, Reference, ReferenceVia};
use crate::utils::path_resolver::{self, PathResolver};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Graph plus every diagnostic collected while building it
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub graph: DependencyGraph,
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of resolving one lexical reference
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolution {
    Resolved(String),
    /// Points inside the unit itself (a nested module invocation)
    Internal,
    Unresolved(String),
}

/// One resolved dependency of `module` on `target`
struct Link {
    module: String,
    target: String,
    kind: EdgeKind,
    /// Human description of where the link came from
    origin: String,
}

/// Builds the module graph from extracted fragments
pub struct GraphBuilder {
    resolver: PathResolver,
}

impl GraphBuilder {
    /// Create a new graph builder for a scan root
    pub fn new(root: &Path) -> Self {
        Self {
            resolver: PathResolver::new(root),
        }
    }

    pub fn build(&self, mut fragments: Vec<ModuleFragment>) -> BuildOutput {
        let mut diagnostics = Vec::new();

        fragments.sort_by(|a, b| a.file.cmp(&b.file));
        let mut modules: BTreeMap<String, Module> = BTreeMap::new();
        for mut fragment in fragments {
            diagnostics.append(&mut fragment.diagnostics);
            let id = fragment.module_id.clone();
            modules
                .entry(id.clone())
                .or_insert_with(|| Module::new(id.clone(), self.resolver.module_dir(&id)))
                .absorb(fragment);
        }
        for module in modules.values_mut() {
            module.finalize_source();
        }

        let links = self.resolve_all(&modules, &mut diagnostics);

        let mut reported_self = BTreeSet::new();
        for link in &links {
            if link.module == link.target {
                if reported_self.insert((link.module.clone(), link.kind)) {
                    tracing::warn!(module = %link.module, "module depends on itself");
                    diagnostics.push(Diagnostic::self_reference(
                        link.module.clone(),
                        format!("{} refers to the module itself; edge ignored", link.origin),
                    ));
                }
                continue;
            }
            if let Some(module) = modules.get_mut(&link.module) {
                match link.kind {
                    EdgeKind::Explicit => module.declared_dependencies.insert(link.target.clone()),
                    EdgeKind::Inferred => module.inferred_references.insert(link.target.clone()),
                };
            }
        }
        // inferred references only list what no declaration already covers
        for module in modules.values_mut() {
            let declared = &module.declared_dependencies;
            module.inferred_references.retain(|id| !declared.contains(id));
        }

        let mut graph = DependencyGraph::new();
        for mut module in modules.into_values() {
            module.complexity_score = module.compute_complexity();
            graph.add_module(module);
        }
        for link in links {
            graph.add_edge(&link.target, &link.module, link.kind);
        }

        diagnostics.sort();
        diagnostics.dedup();

        tracing::debug!(
            modules = graph.module_count(),
            edges = graph.edge_count(),
            diagnostics = diagnostics.len(),
            "dependency graph built"
        );

        BuildOutput { graph, diagnostics }
    }

    fn resolve_all(
        &self,
        modules: &BTreeMap<String, Module>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<Link> {
        let mut by_basename: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for id in modules.keys() {
            by_basename
                .entry(path_resolver::basename(id))
                .or_default()
                .push(id);
        }

        let mut links = Vec::new();
        for module in modules.values() {
            // dependency block name -> resolved id; unresolved names map to None
            let mut named: BTreeMap<&str, Option<String>> = BTreeMap::new();

            for declaration in &module.declarations {
                let resolved = self.resolve_declaration(module, declaration, modules, &by_basename);
                match &resolved {
                    Ok(target) => links.push(Link {
                        module: module.id.clone(),
                        target: target.clone(),
                        kind: EdgeKind::Explicit,
                        origin: match &declaration.name {
                            Some(name) => format!("dependency \"{}\"", name),
                            None => format!("dependencies path \"{}\"", declaration.config_path),
                        },
                    }),
                    Err(diagnostic) => {
                        tracing::debug!(module = %module.id, "{}", diagnostic.message);
                        diagnostics.push(diagnostic.clone());
                    }
                }
                if let Some(name) = &declaration.name {
                    named.insert(name, resolved.ok());
                }
            }

            let mut reported = BTreeSet::new();
            for reference in &module.references {
                match self.resolve_reference(module, reference, &named, modules) {
                    Resolution::Resolved(target) => links.push(Link {
                        module: module.id.clone(),
                        target,
                        kind: EdgeKind::Inferred,
                        origin: format!("reference {}", reference.expression),
                    }),
                    Resolution::Internal => {}
                    Resolution::Unresolved(message) => {
                        if reported.insert((reference.via, reference.name.clone())) {
                            tracing::debug!(module = %module.id, "{}", message);
                            diagnostics.push(Diagnostic::resolution(module.id.clone(), message));
                        }
                    }
                }
            }
        }

        links
    }

    fn resolve_declaration(
        &self,
        module: &Module,
        declaration: &DeclaredDependency,
        modules: &BTreeMap<String, Module>,
        by_basename: &BTreeMap<&str, Vec<&str>>,
    ) -> Result<String, Diagnostic> {
        let label = match &declaration.name {
            Some(name) => format!("dependency \"{}\"", name),
            None => "dependencies entry".to_string(),
        };

        let Some(target) = &declaration.target else {
            return Err(Diagnostic::resolution(
                module.id.clone(),
                format!(
                    "{} config_path \"{}\" points outside the scan root",
                    label, declaration.config_path
                ),
            ));
        };

        if modules.contains_key(target) {
            return Ok(target.clone());
        }

        let wanted = path_resolver::basename(target);
        match by_basename.get(wanted).map(Vec::as_slice) {
            Some([only]) => {
                tracing::debug!(
                    module = %module.id,
                    "{} resolved to {} by directory name",
                    label,
                    only
                );
                Ok(only.to_string())
            }
            Some(many) if many.len() > 1 => Err(Diagnostic::resolution(
                module.id.clone(),
                format!(
                    "{} config_path \"{}\" does not match a scanned module and its name is ambiguous: {}",
                    label,
                    declaration.config_path,
                    many.join(", ")
                ),
            )),
            _ => Err(Diagnostic::resolution(
                module.id.clone(),
                format!(
                    "{} config_path \"{}\" does not match any scanned module",
                    label, declaration.config_path
                ),
            )),
        }
    }

    fn resolve_reference(
        &self,
        module: &Module,
        reference: &Reference,
        named: &BTreeMap<&str, Option<String>>,
        modules: &BTreeMap<String, Module>,
    ) -> Resolution {
        let name = reference.name.as_str();
        let mut candidates = BTreeSet::new();
        let mut internal = false;

        if reference.via == ReferenceVia::Module {
            if let Some(source) = module.invocations.get(name) {
                if !path_resolver::is_local_source(source) {
                    return Resolution::Internal;
                }
                match self.resolver.resolve(&module.id, source) {
                    Some(id) if modules.contains_key(&id) => {
                        candidates.insert(id);
                    }
                    _ => internal = true,
                }
            }
        }

        match named.get(name) {
            Some(Some(id)) => {
                candidates.insert(id.clone());
            }
            // The dependency block itself was already reported
            Some(None) => internal = true,
            None => {}
        }

        if reference.via == ReferenceVia::Dependency {
            // `dependency.<name>` can only mean the block of that name
            return match candidates.into_iter().next() {
                Some(id) => Resolution::Resolved(id),
                None if internal => Resolution::Internal,
                None => Resolution::Unresolved(format!(
                    "{} has no matching dependency block",
                    reference.expression
                )),
            };
        }

        if let Some(parent) = path_resolver::parent_id(&module.id) {
            let sibling = if parent == path_resolver::ROOT_MODULE_ID {
                name.to_string()
            } else {
                format!("{}/{}", parent, name)
            };
            if modules.contains_key(&sibling) {
                candidates.insert(sibling);
            }
        }

        let mut candidates = candidates.into_iter();
        match (candidates.next(), candidates.next()) {
            (Some(only), None) => Resolution::Resolved(only),
            (None, _) if internal => Resolution::Internal,
            (None, _) => Resolution::Unresolved(format!(
                "{} does not match a dependency, local module or sibling directory",
                reference.expression
            )),
            (Some(first), Some(second)) => {
                let mut all = vec![first, second];
                all.extend(candidates);
                Resolution::Unresolved(format!(
                    "{} is ambiguous between {}",
                    reference.expression,
                    all.join(", ")
                ))
            }
        }
    }
}
