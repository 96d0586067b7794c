//! Generic document model shared by both configuration grammars

use super::analysis::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Which grammar a configuration file follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    /// Terragrunt orchestration file (`terragrunt.hcl`)
    Orchestration,
    /// Terraform module-definition file (`*.tf`)
    ModuleDefinition,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Orchestration => write!(f, "orchestration"),
            FileKind::ModuleDefinition => write!(f, "module-definition"),
        }
    }
}

/// A value in a parsed document.
///
/// Literal values stay typed. Anything that needs evaluation (interpolated
/// templates, traversals, function calls, conditionals, operations and
/// for-expressions) is kept as its source text in [`Value::Expression`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Expression(String),
}

impl Value {
    /// The literal string, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The literal string or the raw expression text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Expression(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Value::Expression(_))
    }

    /// Push every textual leaf of this value onto `out`, depth first.
    /// Map keys are included since computed keys may hold references.
    pub fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Value::String(s) | Value::Expression(s) => out.push(s),
            Value::List(items) => {
                for item in items {
                    item.collect_text(out);
                }
            }
            Value::Map(map) => {
                for (key, value) in map {
                    out.push(key);
                    value.collect_text(out);
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }
}

/// A block with its identifier, labels and nested body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub identifier: String,
    pub labels: Vec<String>,
    pub body: Document,
}

impl Block {
    /// First label, which names the block in both grammars
    pub fn name(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }
}

/// Top-level attributes and blocks of a file, or the body of a block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub attributes: BTreeMap<String, Value>,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.blocks.is_empty()
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// All blocks with the given identifier, in file order
    pub fn blocks_of<'a>(&'a self, identifier: &'a str) -> impl Iterator<Item = &'a Block> + 'a {
        self.blocks.iter().filter(move |b| b.identifier == identifier)
    }

    /// Every textual leaf in the document, including nested block bodies
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        for value in self.attributes.values() {
            value.collect_text(out);
        }
        for block in &self.blocks {
            block.body.collect_text(out);
        }
    }
}

/// One parsed configuration file. Immutable after parsing.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Absolute or root-joined path of the file
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated
    pub relative_path: String,
    pub kind: FileKind,
    pub document: Document,
    /// Empty when parsing succeeded
    pub diagnostics: Vec<Diagnostic>,
    /// The file could not be read or was not valid HCL
    pub failed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texts_walk_nested_values_and_blocks() {
        let mut inner = Document::default();
        inner
            .attributes
            .insert("vpc_id".into(), Value::Expression("module.vpc.vpc_id".into()));

        let mut doc = Document::default();
        doc.attributes.insert(
            "tags".into(),
            Value::Map(BTreeMap::from([(
                "Name".into(),
                Value::List(vec![Value::String("a".into()), Value::Number(1.0)]),
            )])),
        );
        doc.blocks.push(Block {
            identifier: "module".into(),
            labels: vec!["sg".into()],
            body: inner,
        });

        assert_eq!(doc.texts(), vec!["Name", "a", "module.vpc.vpc_id"]);
    }

    #[test]
    fn test_blocks_of_filters_by_identifier() {
        let mut doc = Document::default();
        for (identifier, label) in [("output", "a"), ("variable", "b"), ("output", "c")] {
            doc.blocks.push(Block {
                identifier: identifier.into(),
                labels: vec![label.into()],
                body: Document::default(),
            });
        }

        let names: Vec<_> = doc.blocks_of("output").filter_map(Block::name).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_file_kind_display_matches_serde() {
        assert_eq!(FileKind::ModuleDefinition.to_string(), "module-definition");
        assert_eq!(
            serde_json::to_string(&FileKind::Orchestration).unwrap(),
            "\"orchestration\""
        );
    }
}
