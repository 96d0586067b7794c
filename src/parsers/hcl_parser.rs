//! HCL parsing into the generic document model
//!
//! Both file kinds share one HCL grammar, so parsing is done once with
//! `hcl-rs` and the result is lowered into [`Document`]. The per-kind block
//! vocabulary is checked afterwards by [`Grammar`].

use crate::error::{Result, TfdepsError};
use crate::models::analysis::Diagnostic;
use crate::models::document::{Block, ConfigFile, Document, FileKind, Value};
use crate::parsers::grammar::Grammar;
use crate::utils::PathResolver;
use hcl::expr::{Expression, ObjectKey};
use hcl::{BlockLabel, Body, Structure};
use std::collections::BTreeMap;
use std::path::Path;

/// Parser for orchestration and module-definition files
pub struct HclParser;

impl HclParser {
    /// Parse the HCL text of the file at `path` into a document and the
    /// grammar violations found in it. Blocks violating the grammar are left
    /// out of the document.
    pub fn parse(path: &Path, content: &str, kind: FileKind) -> Result<(Document, Vec<String>)> {
        let body: Body =
            hcl::parse(content).map_err(|e| TfdepsError::syntax_error(path, e.to_string()))?;

        let mut document = lower_body(&body);
        let grammar = Grammar::for_kind(kind);
        let mut violations = Vec::new();

        document.blocks.retain(|block| match grammar.check(block) {
            Ok(()) => true,
            Err(message) => {
                violations.push(message);
                false
            }
        });

        Ok((document, violations))
    }

    /// Read and parse one file. Never fails: read and syntax errors produce an
    /// empty document carrying a single diagnostic.
    pub fn parse_file(path: &Path, kind: FileKind, resolver: &PathResolver) -> ConfigFile {
        let relative_path = resolver.relative_path(path);
        let mut file = ConfigFile {
            path: path.to_path_buf(),
            relative_path: relative_path.clone(),
            kind,
            document: Document::default(),
            diagnostics: Vec::new(),
            failed: false,
        };

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %relative_path, error = %e, "could not read file");
                file.diagnostics.push(Diagnostic::filesystem(
                    relative_path,
                    format!("could not read file: {}", e),
                ));
                file.failed = true;
                return file;
            }
        };

        match Self::parse(Path::new(&relative_path), &content, kind) {
            Ok((document, violations)) => {
                for violation in violations {
                    tracing::debug!(path = %relative_path, "{}", violation);
                    file.diagnostics
                        .push(Diagnostic::grammar(relative_path.clone(), violation));
                }
                file.document = document;
            }
            Err(TfdepsError::Syntax { message, .. }) => {
                tracing::warn!(path = %relative_path, "syntax error: {}", message);
                file.diagnostics.push(Diagnostic::syntax(relative_path, message));
                file.failed = true;
            }
            Err(e) => {
                file.diagnostics
                    .push(Diagnostic::syntax(relative_path, e.to_string()));
                file.failed = true;
            }
        }

        file
    }
}

fn lower_body(body: &Body) -> Document {
    let mut document = Document::default();

    for structure in &body.0 {
        match structure {
            Structure::Attribute(attribute) => {
                document
                    .attributes
                    .insert(attribute.key.as_str().to_string(), lower_expression(&attribute.expr));
            }
            Structure::Block(block) => document.blocks.push(Block {
                identifier: block.identifier.as_str().to_string(),
                labels: block.labels.iter().map(label_text).collect(),
                body: lower_body(&block.body),
            }),
        }
    }

    document
}

fn label_text(label: &BlockLabel) -> String {
    match label {
        BlockLabel::Identifier(ident) => ident.as_str().to_string(),
        BlockLabel::String(text) => text.clone(),
    }
}

fn lower_expression(expr: &Expression) -> Value {
    match expr {
        Expression::Null => Value::Null,
        Expression::Bool(value) => Value::Bool(*value),
        Expression::Number(number) => Value::Number(number.as_f64().unwrap_or_default()),
        Expression::String(text) => Value::String(text.clone()),
        Expression::Array(items) => Value::List(items.iter().map(lower_expression).collect()),
        Expression::Object(object) => {
            let mut map = BTreeMap::new();
            for (key, value) in object {
                let key = match key {
                    ObjectKey::Identifier(ident) => ident.as_str().to_string(),
                    ObjectKey::Expression(expr) => match lower_expression(expr) {
                        Value::String(s) | Value::Expression(s) => s,
                        _ => expr.to_string(),
                    },
                    _ => continue,
                };
                map.insert(key, lower_expression(value));
            }
            Value::Map(map)
        }
        Expression::TemplateExpr(template) => Value::Expression(template.to_string()),
        Expression::Parenthesis(inner) => match lower_expression(inner) {
            Value::Expression(text) => Value::Expression(format!("({})", text)),
            literal => literal,
        },
        other => Value::Expression(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lowers_literals_and_expressions() {
        let content = r#"
            name    = "web"
            count   = 2
            enabled = true
            nothing = null
            tags    = { Env = "prod", Owner = var.owner }
            zones   = ["a", "b"]
            vpc_id  = module.vpc.vpc_id
            label   = "${dependency.vpc.outputs.name}-web"
            merged  = merge(local.tags, { x = 1 })
        "#;

        let (doc, violations) =
            HclParser::parse(Path::new("main.tf"), content, FileKind::ModuleDefinition).unwrap();
        assert!(violations.is_empty());

        assert_eq!(doc.attribute("name"), Some(&Value::String("web".into())));
        assert_eq!(doc.attribute("count"), Some(&Value::Number(2.0)));
        assert_eq!(doc.attribute("enabled"), Some(&Value::Bool(true)));
        assert_eq!(doc.attribute("nothing"), Some(&Value::Null));
        assert_eq!(
            doc.attribute("zones"),
            Some(&Value::List(vec![Value::String("a".into()), Value::String("b".into())]))
        );

        let tags = doc.attribute("tags").and_then(Value::as_map).unwrap();
        assert_eq!(tags.get("Env"), Some(&Value::String("prod".into())));
        assert_eq!(tags.get("Owner"), Some(&Value::Expression("var.owner".into())));

        assert_eq!(
            doc.attribute("vpc_id"),
            Some(&Value::Expression("module.vpc.vpc_id".into()))
        );
        assert_eq!(
            doc.attribute("label"),
            Some(&Value::Expression("${dependency.vpc.outputs.name}-web".into()))
        );
        assert!(doc.attribute("merged").unwrap().is_expression());
    }

    #[test]
    fn test_blocks_and_labels() {
        let content = r#"
            resource "aws_instance" "web" {
              ami = data.aws_ami.ubuntu.id
              lifecycle {
                create_before_destroy = true
              }
            }
            output "id" {
              value = aws_instance.web.id
            }
        "#;

        let (doc, _) =
            HclParser::parse(Path::new("main.tf"), content, FileKind::ModuleDefinition).unwrap();
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[0].labels, vec!["aws_instance", "web"]);
        assert_eq!(doc.blocks[0].body.blocks[0].identifier, "lifecycle");
        assert_eq!(doc.blocks[1].name(), Some("id"));
    }

    #[test]
    fn test_grammar_violations_drop_the_block() {
        let content = r#"
            dependency {
              config_path = "../vpc"
            }
            dependency "db" {
              config_path = "../db"
            }
            custom "a" "b" {}
        "#;

        let (doc, violations) =
            HclParser::parse(Path::new("terragrunt.hcl"), content, FileKind::Orchestration).unwrap();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("dependency"));
        let identifiers: Vec<_> = doc.blocks.iter().map(|b| b.identifier.as_str()).collect();
        assert_eq!(identifiers, vec!["dependency", "custom"]);
    }

    #[test]
    fn test_syntax_error() {
        let result = HclParser::parse(
            Path::new("live/app/main.tf"),
            "module \"x\" {",
            FileKind::ModuleDefinition,
        );
        match result {
            Err(TfdepsError::Syntax { path, .. }) => {
                assert_eq!(path, Path::new("live/app/main.tf"));
            }
            other => panic!("Expected Syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_file_reports_syntax_diagnostic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken").join("main.tf");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "resource \"a\" {{{").unwrap();

        let resolver = PathResolver::new(dir.path());
        let file = HclParser::parse_file(&path, FileKind::ModuleDefinition, &resolver);

        assert!(file.failed);
        assert!(file.document.is_empty());
        assert_eq!(file.relative_path, "broken/main.tf");
        assert_eq!(file.diagnostics.len(), 1);
        assert_eq!(file.diagnostics[0].path.as_deref(), Some("broken/main.tf"));
    }

    #[test]
    fn test_parse_file_missing_file_is_filesystem_diagnostic() {
        let dir = tempdir().unwrap();
        let resolver = PathResolver::new(dir.path());
        let file = HclParser::parse_file(
            &dir.path().join("gone.tf"),
            FileKind::ModuleDefinition,
            &resolver,
        );

        assert!(file.failed);
        assert_eq!(
            file.diagnostics[0].kind,
            crate::models::analysis::DiagnosticKind::Filesystem
        );
    }
}
