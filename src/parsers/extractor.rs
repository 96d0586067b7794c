//! Projection of parsed files onto module fragments

use crate::models::analysis::Diagnostic;
use crate::models::document::{ConfigFile, Document, FileKind, Value};
use crate::models::module::{DeclaredDependency, ModuleFragment};
use crate::parsers::references;
use crate::utils::PathResolver;

/// Extract what one file contributes to its directory's module.
///
/// Files that failed to parse still yield a fragment so that their directory
/// shows up as a (stub) node.
pub fn extract(file: &ConfigFile, resolver: &PathResolver) -> ModuleFragment {
    let module_id = resolver.module_id_for_file(&file.path);
    let mut fragment = ModuleFragment {
        module_id,
        file: file.relative_path.clone(),
        kind: Some(file.kind),
        diagnostics: file.diagnostics.clone(),
        stub: file.failed,
        ..Default::default()
    };

    if file.failed {
        return fragment;
    }

    match file.kind {
        FileKind::Orchestration => extract_orchestration(&file.document, resolver, &mut fragment),
        FileKind::ModuleDefinition => extract_module_definition(&file.document, &mut fragment),
    }

    let scan = references::scan(file.document.texts());
    fragment.references.extend(scan.references);
    fragment.data_sources.extend(scan.data_sources);
    fragment.remote_states.extend(scan.remote_states);

    fragment
}

fn extract_orchestration(doc: &Document, resolver: &PathResolver, fragment: &mut ModuleFragment) {
    for block in doc.blocks_of("terraform") {
        if let Some(source) = block.body.attribute("source").and_then(Value::as_text) {
            fragment.source = Some(source.to_string());
        }
    }

    for block in doc.blocks_of("dependency") {
        let name = block.name().unwrap_or_default().to_string();
        match block.body.attribute("config_path") {
            Some(Value::String(path)) => fragment.declared.push(DeclaredDependency {
                name: Some(name),
                config_path: path.clone(),
                target: resolver.resolve(&fragment.module_id, path),
            }),
            Some(other) => fragment.diagnostics.push(
                Diagnostic::resolution(
                    fragment.module_id.clone(),
                    format!(
                        "config_path of dependency \"{}\" is not a literal path: {}",
                        name,
                        other.as_text().unwrap_or("<non-string value>")
                    ),
                )
                .with_path(fragment.file.clone()),
            ),
            None => fragment.diagnostics.push(
                Diagnostic::resolution(
                    fragment.module_id.clone(),
                    format!("dependency \"{}\" has no config_path", name),
                )
                .with_path(fragment.file.clone()),
            ),
        }
    }

    for block in doc.blocks_of("dependencies") {
        let Some(paths) = block.body.attribute("paths") else {
            continue;
        };
        match paths.as_list() {
            Some(items) => {
                for item in items {
                    match item {
                        Value::String(path) => fragment.declared.push(DeclaredDependency {
                            name: None,
                            config_path: path.clone(),
                            target: resolver.resolve(&fragment.module_id, path),
                        }),
                        other => fragment.diagnostics.push(
                            Diagnostic::resolution(
                                fragment.module_id.clone(),
                                format!(
                                    "dependencies.paths entry is not a literal path: {}",
                                    other.as_text().unwrap_or("<non-string value>")
                                ),
                            )
                            .with_path(fragment.file.clone()),
                        ),
                    }
                }
            }
            None => fragment.diagnostics.push(
                Diagnostic::resolution(
                    fragment.module_id.clone(),
                    "dependencies.paths is not a literal list",
                )
                .with_path(fragment.file.clone()),
            ),
        }
    }

    if let Some(inputs) = doc.attribute("inputs").and_then(Value::as_map) {
        fragment.variables.extend(inputs.keys().cloned());
    }
}

fn extract_module_definition(doc: &Document, fragment: &mut ModuleFragment) {
    for block in &doc.blocks {
        match (block.identifier.as_str(), block.labels.as_slice()) {
            ("module", [name]) => {
                let source = block
                    .body
                    .attribute("source")
                    .and_then(Value::as_text)
                    .unwrap_or_default();
                fragment.invocations.insert(name.clone(), source.to_string());
            }
            ("output", [name]) => {
                fragment.outputs.insert(name.clone());
            }
            ("variable", [name]) => {
                fragment.variables.insert(name.clone());
            }
            ("resource", [kind, name]) => {
                fragment.resources.insert(format!("{}.{}", kind, name));
            }
            ("data", [kind, name]) => {
                fragment.data_sources.insert(format!("{}.{}", kind, name));
            }
            _ => {}
        }
    }
}
