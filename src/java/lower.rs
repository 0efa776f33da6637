// src/java/lower.rs
//! Lowers one method body from the tree-sitter parse tree into the
//! expression arena and fills the semantic model: variable bindings,
//! reaching definitions, declared types and per-call facts.
//!
//! Lowering is memoized by parse-tree node id, so an expression shared
//! between a call chain and a definition site gets a single arena node,
//! which is the identity the degree cache relies on.

use std::collections::HashMap;

use tree_sitter::Node;

use crate::ast::{
    ArrayAccess, ExprArena, ExprId, ExprKind, FieldAccess, MethodCall, Span, VariableAccess,
};
use crate::config::NamingConfig;
use crate::semantics::{
    AssignmentEntry, CallFacts, ReachingDefinitionSet, SemanticModel, StaticType,
};

use super::scope::{is_type_declaration, static_type_of, DefSite, MethodScope};

/// Everything the rule needs for one method body.
pub struct LoweredMethod {
    pub arena: ExprArena,
    pub model: SemanticModel,
    /// Method calls and field accesses to visit, in traversal order.
    pub targets: Vec<ExprId>,
}

/// Lowers `body` and resolves names against `scope`.
#[must_use]
pub fn lower_method(
    body: Node<'_>,
    scope: &MethodScope<'_>,
    source: &str,
    naming: &NamingConfig,
) -> LoweredMethod {
    let mut lowerer = Lowerer {
        source,
        arena: ExprArena::new(),
        memo: HashMap::new(),
        var_reads: Vec::new(),
        field_accesses: Vec::new(),
        calls: Vec::new(),
        this_nodes: Vec::new(),
        targets: Vec::new(),
    };
    lowerer.collect_targets(body);

    // Definition sites may include expressions outside any call chain
    // (plain initializers); lower them through the same memo.
    let mut entries_by_name: HashMap<&str, Vec<AssignmentEntry>> = HashMap::new();
    for (name, sites) in &scope.def_sites {
        let entries = sites
            .iter()
            .map(|site| match site {
                DefSite::Foreach(node) => AssignmentEntry::ForeachVar {
                    iterable: lowerer.lower_expr(*node),
                },
                DefSite::Assign(node) => AssignmentEntry::Assignment {
                    rhs: lowerer.lower_expr(*node),
                },
            })
            .collect();
        entries_by_name.insert(name.as_str(), entries);
    }

    let Lowerer {
        arena,
        var_reads,
        field_accesses,
        calls,
        this_nodes,
        targets,
        ..
    } = lowerer;

    let mut model = SemanticModel::new();
    bind_variable_reads(&arena, scope, &entries_by_name, &var_reads, &mut model);

    if !scope.class_name.is_empty() {
        for &id in &this_nodes {
            model.set_type(id, StaticType::named(&scope.class_name));
        }
    }
    type_fields_of_this(&arena, scope, &field_accesses, &mut model);
    attach_call_facts(&arena, scope, naming, &calls, &mut model);

    LoweredMethod {
        arena,
        model,
        targets,
    }
}

fn bind_variable_reads(
    arena: &ExprArena,
    scope: &MethodScope<'_>,
    entries_by_name: &HashMap<&str, Vec<AssignmentEntry>>,
    var_reads: &[ExprId],
    model: &mut SemanticModel,
) {
    for &id in var_reads {
        let ExprKind::VariableAccess(read) = &arena[id].kind else {
            continue;
        };
        let name = read.name.as_str();
        let assigned = || entries_by_name.get(name).cloned().unwrap_or_default();
        if let Some(ty) = scope.params.get(name) {
            model.set_type(id, static_type_of(ty));
            let mut entries = vec![AssignmentEntry::FormalParameter];
            entries.extend(assigned());
            model.set_reaching(id, ReachingDefinitionSet::known(entries));
        } else if let Some(ty) = scope.local_types.get(name) {
            model.set_type(id, static_type_of(ty));
            model.set_reaching(id, ReachingDefinitionSet::known(assigned()));
        } else if let Some(ty) = scope.fields.get(name) {
            model.mark_this_field_read(id);
            model.set_type(id, static_type_of(ty));
        }
        // Unresolved names stay unmapped; the evaluator falls back to 0.
    }
}

fn type_fields_of_this(
    arena: &ExprArena,
    scope: &MethodScope<'_>,
    field_accesses: &[ExprId],
    model: &mut SemanticModel,
) {
    for &id in field_accesses {
        let ExprKind::FieldAccess(access) = &arena[id].kind else {
            continue;
        };
        let Some(qualifier) = access.qualifier else {
            continue;
        };
        if !matches!(arena[qualifier].kind, ExprKind::This) {
            continue;
        }
        if let Some(ty) = scope.fields.get(&access.name) {
            model.set_type(id, static_type_of(ty));
        }
    }
}

/// Calls are processed in allocation order, so a chain's inner links are
/// typed before its outer links see them.
fn attach_call_facts(
    arena: &ExprArena,
    scope: &MethodScope<'_>,
    naming: &NamingConfig,
    calls: &[ExprId],
    model: &mut SemanticModel,
) {
    for &id in calls {
        let ExprKind::MethodCall(call) = &arena[id].kind else {
            continue;
        };
        let is_static = call
            .qualifier
            .is_some_and(|q| is_static_receiver(arena, scope, q));
        let declaring = call
            .qualifier
            .and_then(|q| model.static_type(q))
            .cloned();
        // Builders conventionally return themselves; propagating the
        // receiver type keeps whole builder chains at degree 1.
        if let Some(ty) = declaring
            .as_ref()
            .filter(|ty| ty.simple_name.ends_with(&naming.builder_type_suffix))
        {
            model.set_type(id, ty.clone());
        }
        model.set_call_facts(
            id,
            CallFacts {
                resolved: true,
                is_static,
                declaring,
                result: None,
            },
        );
    }
}

/// A capitalized name that resolves to nothing in scope reads as a type
/// reference, which makes the call static.
fn is_static_receiver(arena: &ExprArena, scope: &MethodScope<'_>, qualifier: ExprId) -> bool {
    let ExprKind::VariableAccess(read) = &arena[qualifier].kind else {
        return false;
    };
    !scope.is_known_name(&read.name)
        && read.name.chars().next().is_some_and(char::is_uppercase)
}

struct Lowerer<'s> {
    source: &'s str,
    arena: ExprArena,
    memo: HashMap<usize, ExprId>,
    var_reads: Vec<ExprId>,
    field_accesses: Vec<ExprId>,
    calls: Vec<ExprId>,
    this_nodes: Vec<ExprId>,
    targets: Vec<ExprId>,
}

impl Lowerer<'_> {
    fn collect_targets(&mut self, node: Node<'_>) {
        if matches!(node.kind(), "method_invocation" | "field_access") {
            let id = self.lower_expr(node);
            if !self.targets.contains(&id) {
                self.targets.push(id);
            }
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            // Nested types are analyzed as their own methods.
            if !is_type_declaration(child.kind()) {
                self.collect_targets(child);
            }
        }
    }

    fn lower_expr(&mut self, node: Node<'_>) -> ExprId {
        if let Some(&id) = self.memo.get(&node.id()) {
            return id;
        }
        let id = match node.kind() {
            "parenthesized_expression" => match node.named_child(0) {
                Some(inner) => self.lower_expr(inner),
                None => self.alloc_other(node),
            },
            "method_invocation" => self.lower_call(node),
            "field_access" => self.lower_field_access(node),
            "array_access" => {
                let qualifier = node
                    .child_by_field_name("array")
                    .map(|array| self.lower_expr(array));
                self.arena
                    .alloc(ExprKind::ArrayAccess(ArrayAccess { qualifier }), span_of(node))
            }
            "identifier" => {
                let name = self.text(node);
                let id = self.arena.alloc(
                    ExprKind::VariableAccess(VariableAccess { name }),
                    span_of(node),
                );
                self.var_reads.push(id);
                id
            }
            "this" => {
                let id = self.arena.alloc(ExprKind::This, span_of(node));
                self.this_nodes.push(id);
                id
            }
            _ => self.alloc_other(node),
        };
        self.memo.insert(node.id(), id);
        id
    }

    fn lower_call(&mut self, node: Node<'_>) -> ExprId {
        let qualifier = node
            .child_by_field_name("object")
            .map(|object| self.lower_expr(object));
        let name_node = node.child_by_field_name("name");
        let name = name_node.map(|n| self.text(n)).unwrap_or_default();
        let arg_count = node
            .child_by_field_name("arguments")
            .map_or(0, |args| args.named_child_count());
        let is_statement = node
            .parent()
            .is_some_and(|parent| parent.kind() == "expression_statement");
        let id = self.arena.alloc(
            ExprKind::MethodCall(MethodCall {
                name,
                qualifier,
                arg_count,
                is_statement,
            }),
            span_of(name_node.unwrap_or(node)),
        );
        self.calls.push(id);
        id
    }

    fn lower_field_access(&mut self, node: Node<'_>) -> ExprId {
        let qualifier = node
            .child_by_field_name("object")
            .map(|object| self.lower_expr(object));
        let name_node = node.child_by_field_name("field");
        let name = name_node.map(|n| self.text(n)).unwrap_or_default();
        let id = self.arena.alloc(
            ExprKind::FieldAccess(FieldAccess { name, qualifier }),
            span_of(name_node.unwrap_or(node)),
        );
        self.field_accesses.push(id);
        id
    }

    fn alloc_other(&mut self, node: Node<'_>) -> ExprId {
        let text = self
            .text(node)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        self.arena.alloc(ExprKind::Other(text), span_of(node))
    }

    fn text(&self, node: Node<'_>) -> String {
        node.utf8_text(self.source.as_bytes())
            .unwrap_or("")
            .to_string()
    }
}

fn span_of(node: Node<'_>) -> Span {
    let position = node.start_position();
    Span {
        row: position.row + 1,
        column: position.column,
    }
}
