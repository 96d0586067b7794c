//! Lexical reference scanning over expression text

use crate::models::module::{Reference, ReferenceVia};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

// The leading group stops `local.module.x` or `foo_module.x` from matching.
static MODULE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9_.\-])module\.([A-Za-z0-9_\-]+)(?:\[[^\]]*\])?\.([A-Za-z0-9_\-]+)")
        .expect("module reference pattern is valid")
});

static DEPENDENCY_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9_.\-])dependency\.([A-Za-z0-9_\-]+)\.outputs\.([A-Za-z0-9_\-]+)")
        .expect("dependency reference pattern is valid")
});

static REMOTE_STATE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|[^A-Za-z0-9_.\-])data\.terraform_remote_state\.([A-Za-z0-9_\-]+)\.outputs\.([A-Za-z0-9_\-]+)",
    )
    .expect("remote state pattern is valid")
});

static DATA_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9_.\-])data\.([A-Za-z0-9_\-]+)\.([A-Za-z0-9_\-]+)")
        .expect("data source pattern is valid")
});

/// Everything found in a set of text fragments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// `module.*` and `dependency.*` references, deduplicated and sorted
    pub references: BTreeSet<Reference>,
    /// `type.name` of every `data.<type>.<name>` reference
    pub data_sources: BTreeSet<String>,
    /// Names of `data.terraform_remote_state.<name>` references
    pub remote_states: BTreeSet<String>,
}

/// Scan text fragments for cross-unit references
pub fn scan<'a, I>(texts: I) -> ScanResult
where
    I: IntoIterator<Item = &'a str>,
{
    let mut result = ScanResult::default();

    for text in texts {
        for caps in MODULE_REF.captures_iter(text) {
            result.references.insert(Reference {
                via: ReferenceVia::Module,
                name: caps[1].to_string(),
                attribute: caps[2].to_string(),
                expression: format!("module.{}.{}", &caps[1], &caps[2]),
            });
        }

        for caps in DEPENDENCY_REF.captures_iter(text) {
            result.references.insert(Reference {
                via: ReferenceVia::Dependency,
                name: caps[1].to_string(),
                attribute: caps[2].to_string(),
                expression: format!("dependency.{}.outputs.{}", &caps[1], &caps[2]),
            });
        }

        for caps in REMOTE_STATE_REF.captures_iter(text) {
            result.remote_states.insert(caps[1].to_string());
        }

        for caps in DATA_REF.captures_iter(text) {
            result
                .data_sources
                .insert(format!("{}.{}", &caps[1], &caps[2]));
        }
    }

    result
}
