//! Directory walking and file classification
//!
//! Walks the scan root with `walkdir`, pruning excluded entries and sorting
//! siblings by name so discovery order is stable across runs and platforms.
//! Problems with single entries become filesystem diagnostics; the walk
//! always continues.

use crate::error::Result;
use crate::models::analysis::Diagnostic;
use crate::models::config::Settings;
use crate::models::document::FileKind;
use crate::utils::PathResolver;
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Files found under the scan root, each list sorted by path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Discovery {
    pub orchestration: Vec<PathBuf>,
    pub module_definitions: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Discovery {
    /// Every discovered file with its kind, sorted by path
    pub fn files(&self) -> Vec<(PathBuf, FileKind)> {
        let mut files: Vec<_> = self
            .orchestration
            .iter()
            .map(|p| (p.clone(), FileKind::Orchestration))
            .chain(
                self.module_definitions
                    .iter()
                    .map(|p| (p.clone(), FileKind::ModuleDefinition)),
            )
            .collect();
        files.sort();
        files
    }

    pub fn len(&self) -> usize {
        self.orchestration.len() + self.module_definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Finds orchestration and module-definition files below a root
pub struct FileDiscovery {
    root: PathBuf,
    exclude_patterns: Vec<Pattern>,
    max_depth: Option<usize>,
    follow_links: bool,
    orchestration_file_name: String,
    module_extension: String,
}

impl FileDiscovery {
    /// Create a discovery pass from settings. Fails only on invalid globs.
    pub fn new(settings: &Settings) -> Result<Self> {
        let exclude_patterns = settings
            .exclude_patterns
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            root: settings.scan_path.clone(),
            exclude_patterns,
            max_depth: settings.max_depth,
            follow_links: settings.follow_links,
            orchestration_file_name: settings.orchestration_file_name.clone(),
            module_extension: settings.module_extension.clone(),
        })
    }

    /// Walk the root and classify every file
    pub fn discover(&self) -> Discovery {
        let resolver = PathResolver::new(&self.root);
        let mut discovery = Discovery::default();

        let mut walker = WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry in walker
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry, &resolver))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| resolver.relative_path(p))
                        .unwrap_or_else(|| ".".to_string());
                    let message = match err.loop_ancestor() {
                        Some(ancestor) => format!(
                            "symbolic link loop back to {}",
                            resolver.module_id(ancestor)
                        ),
                        None => match err.io_error() {
                            Some(io) => format!("could not read entry: {}", io),
                            None => err.to_string(),
                        },
                    };
                    tracing::warn!(path = %path, "{}", message);
                    discovery.diagnostics.push(Diagnostic::filesystem(path, message));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            match self.classify(entry.path()) {
                Some(FileKind::Orchestration) => discovery.orchestration.push(entry.into_path()),
                Some(FileKind::ModuleDefinition) => {
                    discovery.module_definitions.push(entry.into_path())
                }
                None => {}
            }
        }

        discovery.orchestration.sort();
        discovery.module_definitions.sort();

        tracing::info!(
            orchestration = discovery.orchestration.len(),
            module_definitions = discovery.module_definitions.len(),
            "discovered configuration files"
        );

        discovery
    }

    /// Kind of a file by name, `None` for unrelated files
    pub fn classify(&self, path: &Path) -> Option<FileKind> {
        let name = path.file_name()?.to_str()?;
        if name == self.orchestration_file_name {
            return Some(FileKind::Orchestration);
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext == self.module_extension => Some(FileKind::ModuleDefinition),
            _ => None,
        }
    }

    /// An entry is excluded when a pattern matches its name or its path
    /// relative to the root.
    fn is_excluded(&self, entry: &DirEntry, resolver: &PathResolver) -> bool {
        let name = entry.file_name().to_string_lossy();
        let relative = resolver.relative_path(entry.path());
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(&name) || pattern.matches(&relative))
    }
}
