//! Module id and relative path resolution
//!
//! Module ids are directory paths relative to the scan root, `/`-separated,
//! with `.` standing for the root itself. All resolution here is lexical: the
//! filesystem is never consulted, so results do not depend on symlinks or on
//! which directories happen to exist.

use std::path::{Component, Path, PathBuf};

/// Id of the module living in the scan root
pub const ROOT_MODULE_ID: &str = ".";

/// Lexical path resolver anchored at the scan root
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Create a new path resolver
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `path` relative to the root, `/`-separated. Paths outside the
    /// root are rendered as given.
    pub fn relative_path(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(relative) => join_components(relative),
            Err(_) => path.to_string_lossy().replace('\\', "/"),
        }
    }

    /// Id of the module owning a directory
    pub fn module_id(&self, dir: &Path) -> String {
        let relative = self.relative_path(dir);
        if relative.is_empty() {
            ROOT_MODULE_ID.to_string()
        } else {
            relative
        }
    }

    /// Id of the module owning a file: its parent directory
    pub fn module_id_for_file(&self, file: &Path) -> String {
        match file.parent() {
            Some(dir) => self.module_id(dir),
            None => ROOT_MODULE_ID.to_string(),
        }
    }

    /// Directory of a module on disk
    pub fn module_dir(&self, id: &str) -> PathBuf {
        if id == ROOT_MODULE_ID {
            self.root.clone()
        } else {
            id.split('/').fold(self.root.clone(), |acc, part| acc.join(part))
        }
    }

    /// Resolve a path written inside module `from_id` to a module id.
    ///
    /// Relative paths are joined to the declaring directory and normalized;
    /// absolute paths must lie under the root. A trailing `*.hcl` file name is
    /// dropped, so `../vpc/terragrunt.hcl` resolves like `../vpc`. Returns
    /// `None` when the path climbs above the root.
    pub fn resolve(&self, from_id: &str, specifier: &str) -> Option<String> {
        let specifier = specifier.trim();
        match specifier.chars().next() {
            Some('/') => {
                let relative = Path::new(specifier).strip_prefix(&self.root).ok()?;
                normalize(ROOT_MODULE_ID, &join_components(relative))
            }
            Some(_) => normalize(from_id, specifier),
            None => None,
        }
    }
}

/// Whether a module `source` points at a path on the local filesystem
pub fn is_local_source(source: &str) -> bool {
    source.starts_with("./") || source.starts_with("../") || source == "." || source == ".."
}

/// Last component of a module id
pub fn basename(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// Parent id of a module id; the root has no parent
pub fn parent_id(id: &str) -> Option<&str> {
    if id == ROOT_MODULE_ID {
        return None;
    }
    Some(match id.rfind('/') {
        Some(pos) => &id[..pos],
        None => ROOT_MODULE_ID,
    })
}

fn normalize(from_id: &str, relative: &str) -> Option<String> {
    let mut parts: Vec<&str> = if from_id == ROOT_MODULE_ID {
        Vec::new()
    } else {
        from_id.split('/').collect()
    };

    let segments: Vec<&str> = relative.split(['/', '\\']).collect();
    let last = segments.len().saturating_sub(1);
    for (i, segment) in segments.into_iter().enumerate() {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            s if i == last && s.ends_with(".hcl") => {}
            s => parts.push(s),
        }
    }

    if parts.is_empty() {
        Some(ROOT_MODULE_ID.to_string())
    } else {
        Some(parts.join("/"))
    }
}

fn join_components(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PathResolver {
        PathResolver::new(Path::new("/infra"))
    }

    #[test]
    fn test_module_ids() {
        let r = resolver();
        assert_eq!(r.module_id(Path::new("/infra")), ".");
        assert_eq!(r.module_id(Path::new("/infra/env/prod/vpc")), "env/prod/vpc");
        assert_eq!(r.module_id_for_file(Path::new("/infra/vpc/main.tf")), "vpc");
        assert_eq!(r.module_id_for_file(Path::new("/infra/terragrunt.hcl")), ".");
        assert_eq!(r.module_dir("env/vpc"), PathBuf::from("/infra/env/vpc"));
        assert_eq!(r.module_dir("."), PathBuf::from("/infra"));
    }

    #[test]
    fn test_resolve_relative_paths() {
        let r = resolver();
        assert_eq!(r.resolve("ec2", "../vpc").as_deref(), Some("vpc"));
        assert_eq!(r.resolve("env/prod/app", "../../shared/./vpc/").as_deref(), Some("env/shared/vpc"));
        assert_eq!(r.resolve("ec2", "../vpc/terragrunt.hcl").as_deref(), Some("vpc"));
        assert_eq!(r.resolve("ec2", "..").as_deref(), Some("."));
        assert_eq!(r.resolve(".", "./modules//vpc").as_deref(), Some("modules/vpc"));
    }

    #[test]
    fn test_resolve_outside_root_fails() {
        let r = resolver();
        assert_eq!(r.resolve("ec2", "../../elsewhere"), None);
        assert_eq!(r.resolve("ec2", "/other/vpc"), None);
        assert_eq!(r.resolve("ec2", "   "), None);
    }

    #[test]
    fn test_resolve_absolute_under_root() {
        assert_eq!(resolver().resolve("ec2", "/infra/vpc").as_deref(), Some("vpc"));
    }

    #[test]
    fn test_id_helpers() {
        assert!(is_local_source("../modules/vpc"));
        assert!(is_local_source("./vpc"));
        assert!(!is_local_source("terraform-aws-modules/vpc/aws"));
        assert!(!is_local_source("git::https://example.com/vpc.git"));

        assert_eq!(basename("env/prod/vpc"), "vpc");
        assert_eq!(parent_id("env/prod/vpc"), Some("env/prod"));
        assert_eq!(parent_id("vpc"), Some("."));
        assert_eq!(parent_id("."), None);
    }
}
