//! Block vocabularies of the two configuration file kinds

use crate::models::document::{Block, FileKind};

/// Allowed label count for a known block type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRule {
    pub identifier: &'static str,
    pub min_labels: usize,
    pub max_labels: usize,
}

const fn rule(identifier: &'static str, min_labels: usize, max_labels: usize) -> BlockRule {
    BlockRule {
        identifier,
        min_labels,
        max_labels,
    }
}

/// Top-level block vocabulary of one file kind
#[derive(Debug)]
pub struct Grammar {
    pub kind: FileKind,
    pub blocks: &'static [BlockRule],
}

pub static ORCHESTRATION: Grammar = Grammar {
    kind: FileKind::Orchestration,
    blocks: &[
        rule("terraform", 0, 0),
        rule("include", 0, 1),
        rule("dependency", 1, 1),
        rule("dependencies", 0, 0),
        rule("locals", 0, 0),
        rule("generate", 1, 1),
        rule("remote_state", 0, 0),
    ],
};

pub static MODULE_DEFINITION: Grammar = Grammar {
    kind: FileKind::ModuleDefinition,
    blocks: &[
        rule("module", 1, 1),
        rule("output", 1, 1),
        rule("variable", 1, 1),
        rule("resource", 2, 2),
        rule("data", 2, 2),
        rule("provider", 1, 1),
        rule("locals", 0, 0),
        rule("terraform", 0, 0),
        rule("moved", 0, 0),
        rule("import", 0, 0),
    ],
};

impl Grammar {
    pub fn for_kind(kind: FileKind) -> &'static Grammar {
        match kind {
            FileKind::Orchestration => &ORCHESTRATION,
            FileKind::ModuleDefinition => &MODULE_DEFINITION,
        }
    }

    pub fn rule(&self, identifier: &str) -> Option<&BlockRule> {
        self.blocks.iter().find(|r| r.identifier == identifier)
    }

    /// Check a top-level block. Unknown block types are accepted as is.
    pub fn check(&self, block: &Block) -> Result<(), String> {
        let Some(rule) = self.rule(&block.identifier) else {
            return Ok(());
        };

        let count = block.labels.len();
        if count < rule.min_labels || count > rule.max_labels {
            let expected = if rule.min_labels == rule.max_labels {
                rule.min_labels.to_string()
            } else {
                format!("{} to {}", rule.min_labels, rule.max_labels)
            };
            return Err(format!(
                "{} block `{}` expects {} label(s), found {}",
                self.kind, block.identifier, expected, count
            ));
        }

        Ok(())
    }
}
