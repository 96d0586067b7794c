//! Deployable units and the per-file fragments they are assembled from

use super::analysis::Diagnostic;
use super::document::FileKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// How a reference reached another unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceVia {
    /// `module.<name>.<attr>`
    Module,
    /// `dependency.<name>.outputs.<attr>`
    Dependency,
}

/// A raw lexical match, not yet resolved to a module id
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub via: ReferenceVia,
    pub name: String,
    pub attribute: String,
    /// The matched text, e.g. `module.vpc.vpc_id`
    pub expression: String,
}

/// A `dependency` block or a `dependencies.paths` entry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeclaredDependency {
    /// Block label; `None` for `dependencies { paths = [...] }` entries
    pub name: Option<String>,
    /// The literal `config_path` as written
    pub config_path: String,
    /// Lexically normalized module id, `None` when the path leaves the scan root
    pub target: Option<String>,
}

/// What a single file contributes to its directory's module
#[derive(Debug, Clone, Default)]
pub struct ModuleFragment {
    /// Id of the owning module (directory relative to the root)
    pub module_id: String,
    /// Path of the contributing file relative to the root
    pub file: String,
    pub kind: Option<FileKind>,
    /// `terraform { source = ... }` of an orchestration file
    pub source: Option<String>,
    pub declared: Vec<DeclaredDependency>,
    pub references: Vec<Reference>,
    pub outputs: BTreeSet<String>,
    pub variables: BTreeSet<String>,
    pub data_sources: BTreeSet<String>,
    pub remote_states: BTreeSet<String>,
    pub resources: BTreeSet<String>,
    /// Nested `module "<name>"` invocations and their sources
    pub invocations: BTreeMap<String, String>,
    pub diagnostics: Vec<Diagnostic>,
    /// The file failed to parse; the fragment only marks the directory
    pub stub: bool,
}

/// One deployable unit: every configuration file found in one directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    /// Directory of the unit on disk
    pub path: PathBuf,
    pub source: String,
    pub declared_dependencies: BTreeSet<String>,
    pub inferred_references: BTreeSet<String>,
    pub outputs: BTreeSet<String>,
    pub variables: BTreeSet<String>,
    pub data_sources: BTreeSet<String>,
    pub remote_states: BTreeSet<String>,
    pub resources: BTreeSet<String>,
    pub invocations: BTreeMap<String, String>,
    pub files: BTreeSet<String>,
    pub kinds: BTreeSet<FileKind>,
    /// Every contributing file failed to parse
    pub stub: bool,
    pub complexity_score: usize,

    /// Unresolved declarations, consumed by the graph builder
    #[serde(skip)]
    pub declarations: Vec<DeclaredDependency>,

    /// Unresolved lexical references, consumed by the graph builder
    #[serde(skip)]
    pub references: BTreeSet<Reference>,
}

impl Module {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            stub: true,
            ..Default::default()
        }
    }

    /// Union a fragment into this module.
    ///
    /// Merging is order independent: sets are unioned, and the orchestration
    /// source always wins over an invocation source, which is only settled in
    /// [`Module::finalize_source`].
    pub fn absorb(&mut self, fragment: ModuleFragment) {
        self.files.insert(fragment.file);
        if let Some(kind) = fragment.kind {
            self.kinds.insert(kind);
        }
        self.stub &= fragment.stub;

        if let Some(source) = fragment.source {
            // Two orchestration files cannot share a directory, keep the smallest for determinism
            if self.source.is_empty() || source < self.source {
                self.source = source;
            }
        }

        self.declarations.extend(fragment.declared);
        self.references.extend(fragment.references);
        self.outputs.extend(fragment.outputs);
        self.variables.extend(fragment.variables);
        self.data_sources.extend(fragment.data_sources);
        self.remote_states.extend(fragment.remote_states);
        self.resources.extend(fragment.resources);
        for (name, source) in fragment.invocations {
            self.invocations
                .entry(name)
                .and_modify(|existing| {
                    if source < *existing {
                        *existing = source.clone();
                    }
                })
                .or_insert(source);
        }
    }

    /// Fall back to the single nested invocation's source when the unit has no
    /// orchestration source of its own.
    pub fn finalize_source(&mut self) {
        if self.source.is_empty() && self.invocations.len() == 1 {
            if let Some(source) = self.invocations.values().next() {
                self.source = source.clone();
            }
        }
    }

    /// Upstream modules: declared and inferred, deduplicated
    pub fn dependencies(&self) -> BTreeSet<String> {
        self.declared_dependencies
            .union(&self.inferred_references)
            .cloned()
            .collect()
    }

    /// Weighted count of the unit's moving parts
    pub fn compute_complexity(&self) -> usize {
        1 + 2 * (self.declared_dependencies.len() + self.inferred_references.len())
            + self.variables.len()
            + self.outputs.len()
            + 3 * self.data_sources.len()
            + 2 * self.resources.len()
    }

    /// Last path component of the id; the root module is `.`
    pub fn basename(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(file: &str) -> ModuleFragment {
        ModuleFragment {
            module_id: "app".into(),
            file: file.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_orchestration_source_wins_over_invocation() {
        let mut tf = fragment("app/main.tf");
        tf.kind = Some(FileKind::ModuleDefinition);
        tf.invocations.insert("app".into(), "../modules/app".into());

        let mut hcl = fragment("app/terragrunt.hcl");
        hcl.kind = Some(FileKind::Orchestration);
        hcl.source = Some("git::https://example.com/app.git".into());

        let mut module = Module::new("app", "/tmp/app");
        module.absorb(tf);
        module.absorb(hcl);
        module.finalize_source();

        assert_eq!(module.source, "git::https://example.com/app.git");
        assert_eq!(module.files.len(), 2);
        assert!(!module.stub);
    }

    #[test]
    fn test_single_invocation_provides_source() {
        let mut tf = fragment("app/main.tf");
        tf.invocations.insert("app".into(), "../modules/app".into());

        let mut module = Module::new("app", "/tmp/app");
        module.absorb(tf);
        module.finalize_source();
        assert_eq!(module.source, "../modules/app");

        let mut two = fragment("app/extra.tf");
        two.invocations.insert("other".into(), "../modules/other".into());
        let mut module = Module::new("app", "/tmp/app");
        module.absorb(fragment("app/main.tf"));
        module.absorb(two.clone());
        module.invocations.insert("app".into(), "../modules/app".into());
        module.finalize_source();
        assert_eq!(module.source, "");
    }

    #[test]
    fn test_stub_only_when_every_file_failed() {
        let mut failed = fragment("app/broken.tf");
        failed.stub = true;

        let mut module = Module::new("app", "/tmp/app");
        module.absorb(failed.clone());
        assert!(module.stub);

        module.absorb(fragment("app/ok.tf"));
        assert!(!module.stub);
    }

    #[test]
    fn test_complexity_score() {
        let mut module = Module::new("app", "/tmp/app");
        module.declared_dependencies.insert("vpc".into());
        module.inferred_references.insert("sg".into());
        module.variables.insert("name".into());
        module.outputs.insert("id".into());
        module.data_sources.insert("aws_ami.ubuntu".into());
        module.resources.insert("aws_instance.web".into());

        assert_eq!(module.compute_complexity(), 1 + 4 + 1 + 1 + 3 + 2);
    }

    #[test]
    fn test_basename() {
        assert_eq!(Module::new("env/prod/vpc", "/x").basename(), "vpc");
        assert_eq!(Module::new(".", "/x").basename(), ".");
    }
}
