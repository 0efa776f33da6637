// src/java/mod.rs
//! Java front end: parses a compilation unit with tree-sitter and runs the
//! rule once per method or constructor body. Each body gets a fresh arena,
//! model and rule instance, so degree caches never outlive a run.

mod lower;
mod scope;

pub use lower::{lower_method, LoweredMethod};
pub use scope::{static_type_of, MethodScope};

use tree_sitter::{Node, Parser};

use crate::config::RuleConfig;
use crate::error::{Result, StrangerError};
use crate::rule::DemeterRule;
use crate::types::Violation;

/// Results for one compilation unit.
#[derive(Debug, Default)]
pub struct SourceAnalysis {
    pub method_count: usize,
    pub violations: Vec<Violation>,
}

/// Parses and analyzes Java sources. One instance per file task; not
/// shareable across threads.
pub struct JavaAnalyzer {
    parser: Parser,
}

impl JavaAnalyzer {
    /// # Errors
    /// Returns an error if the Java grammar cannot be loaded.
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::language())
            .map_err(|e| StrangerError::Grammar(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Analyzes one compilation unit. Unparseable input degrades to an
    /// empty result.
    pub fn analyze(&mut self, source: &str, config: &RuleConfig) -> SourceAnalysis {
        let Some(tree) = self.parser.parse(source, None) else {
            return SourceAnalysis::default();
        };
        let root = tree.root_node();
        let mut methods = Vec::new();
        collect_methods(root, &mut methods);

        let mut analysis = SourceAnalysis::default();
        for method in methods {
            if analyze_method(method, source, config, &mut analysis.violations) {
                analysis.method_count += 1;
            }
        }
        analysis
            .violations
            .sort_by_key(|v| (v.row, v.column));
        analysis
    }
}

/// Runs the rule over one method body. Returns false for bodyless
/// declarations (abstract and interface methods).
fn analyze_method(
    method: Node<'_>,
    source: &str,
    config: &RuleConfig,
    out: &mut Vec<Violation>,
) -> bool {
    let Some(body) = method.child_by_field_name("body") else {
        return false;
    };
    let method_scope = MethodScope::build(enclosing_type(method), method, source);
    let lowered = lower_method(body, &method_scope, source, &config.naming);

    let mut rule = DemeterRule::new(&lowered.arena, &lowered.model, config);
    for &target in &lowered.targets {
        rule.visit(target, out);
    }
    rule.end_of_run();
    true
}

fn collect_methods<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    if matches!(node.kind(), "method_declaration" | "constructor_declaration") {
        out.push(node);
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_methods(child, out);
    }
}

fn enclosing_type(method: Node<'_>) -> Option<Node<'_>> {
    let mut current = method.parent();
    while let Some(node) = current {
        if scope::is_type_declaration(node.kind()) {
            return Some(node);
        }
        current = node.parent();
    }
    None
}
