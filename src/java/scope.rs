// src/java/scope.rs
//! Per-method name resolution, built syntactically: fields of the enclosing
//! class, formal parameters, local declarations and every assignment site.
//! This is the flow-insensitive stand-in for a real reaching-definitions
//! pass; anything it cannot place resolves to "unknown" downstream.

use std::collections::HashMap;

use tree_sitter::Node;

use crate::semantics::StaticType;

/// One syntactic site that writes a variable.
#[derive(Debug, Clone, Copy)]
pub enum DefSite<'t> {
    /// Iterable of an enhanced-for loop binding the variable.
    Foreach(Node<'t>),
    /// Initializer or assignment right-hand side.
    Assign(Node<'t>),
}

/// Names visible in one method body, with their declared types and the
/// sites that write them.
#[derive(Debug)]
pub struct MethodScope<'t> {
    pub class_name: String,
    /// Field name -> declared type text.
    pub fields: HashMap<String, String>,
    /// Parameter name -> declared type text.
    pub params: HashMap<String, String>,
    /// Local name -> declared type text (foreach variables included).
    pub local_types: HashMap<String, String>,
    /// Write sites per name, in source order. Covers locals and reassigned
    /// parameters alike.
    pub def_sites: HashMap<String, Vec<DefSite<'t>>>,
}

impl<'t> MethodScope<'t> {
    #[must_use]
    pub fn build(class_node: Option<Node<'t>>, method: Node<'t>, source: &str) -> Self {
        let mut scope = Self {
            class_name: class_name_of(class_node, source),
            fields: HashMap::new(),
            params: HashMap::new(),
            local_types: HashMap::new(),
            def_sites: HashMap::new(),
        };
        if let Some(class) = class_node {
            scope.collect_fields(class, source);
        }
        scope.collect_params(method, source);
        if let Some(body) = method.child_by_field_name("body") {
            scope.collect_body(body, source);
        }
        scope
    }

    #[must_use]
    pub fn is_known_name(&self, name: &str) -> bool {
        self.params.contains_key(name)
            || self.local_types.contains_key(name)
            || self.fields.contains_key(name)
    }

    fn collect_fields(&mut self, class: Node<'t>, source: &str) {
        let Some(body) = class.child_by_field_name("body") else {
            return;
        };
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            match child.kind() {
                "field_declaration" | "constant_declaration" => {
                    self.collect_field_declaration(child, source);
                }
                // Enum members live one level deeper.
                "enum_body_declarations" => {
                    let mut inner = child.walk();
                    for member in child.named_children(&mut inner) {
                        if member.kind() == "field_declaration" {
                            self.collect_field_declaration(member, source);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn collect_field_declaration(&mut self, decl: Node<'t>, source: &str) {
        let ty = type_text(decl.child_by_field_name("type"), source);
        let mut cursor = decl.walk();
        for declarator in decl.children_by_field_name("declarator", &mut cursor) {
            if let Some(name) = node_text(declarator.child_by_field_name("name"), source) {
                self.fields.insert(name, ty.clone());
            }
        }
    }

    fn collect_params(&mut self, method: Node<'t>, source: &str) {
        let Some(params) = method.child_by_field_name("parameters") else {
            return;
        };
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            match param.kind() {
                "formal_parameter" => {
                    let ty = type_text(param.child_by_field_name("type"), source);
                    if let Some(name) = node_text(param.child_by_field_name("name"), source) {
                        self.params.insert(name, ty);
                    }
                }
                // Varargs bind an array of the element type.
                "spread_parameter" => self.collect_spread_parameter(param, source),
                _ => {}
            }
        }
    }

    fn collect_spread_parameter(&mut self, param: Node<'t>, source: &str) {
        let mut element_type = String::new();
        let mut name = None;
        let mut cursor = param.walk();
        for child in param.named_children(&mut cursor) {
            if child.kind() == "variable_declarator" {
                name = node_text(child.child_by_field_name("name"), source);
            } else if is_type_node(child.kind()) {
                element_type = node_text(Some(child), source).unwrap_or_default();
            }
        }
        if let Some(name) = name {
            self.params.insert(name, format!("{element_type}[]"));
        }
    }

    fn collect_body(&mut self, node: Node<'t>, source: &str) {
        match node.kind() {
            "local_variable_declaration" => self.collect_local_declaration(node, source),
            "enhanced_for_statement" => self.collect_foreach(node, source),
            "assignment_expression" => self.collect_assignment(node, source),
            _ => {}
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            // Nested type declarations have their own methods and scopes;
            // the analyzer visits those separately.
            if !is_type_declaration(child.kind()) {
                self.collect_body(child, source);
            }
        }
    }

    fn collect_local_declaration(&mut self, decl: Node<'t>, source: &str) {
        let ty = type_text(decl.child_by_field_name("type"), source);
        let mut cursor = decl.walk();
        for declarator in decl.children_by_field_name("declarator", &mut cursor) {
            let Some(name) = node_text(declarator.child_by_field_name("name"), source) else {
                continue;
            };
            self.local_types.insert(name.clone(), ty.clone());
            if let Some(value) = declarator.child_by_field_name("value") {
                self.def_sites
                    .entry(name)
                    .or_default()
                    .push(DefSite::Assign(value));
            }
        }
    }

    fn collect_foreach(&mut self, stmt: Node<'t>, source: &str) {
        let Some(name) = node_text(stmt.child_by_field_name("name"), source) else {
            return;
        };
        let ty = type_text(stmt.child_by_field_name("type"), source);
        self.local_types.insert(name.clone(), ty);
        if let Some(value) = stmt.child_by_field_name("value") {
            self.def_sites
                .entry(name)
                .or_default()
                .push(DefSite::Foreach(value));
        }
    }

    fn collect_assignment(&mut self, expr: Node<'t>, source: &str) {
        let Some(left) = expr.child_by_field_name("left") else {
            return;
        };
        if left.kind() != "identifier" {
            return;
        }
        let Some(name) = node_text(Some(left), source) else {
            return;
        };
        if let Some(right) = expr.child_by_field_name("right") {
            self.def_sites
                .entry(name)
                .or_default()
                .push(DefSite::Assign(right));
        }
    }
}

fn class_name_of(class_node: Option<Node<'_>>, source: &str) -> String {
    class_node
        .and_then(|c| node_text(c.child_by_field_name("name"), source))
        .unwrap_or_default()
}

fn node_text(node: Option<Node<'_>>, source: &str) -> Option<String> {
    node.map(|n| n.utf8_text(source.as_bytes()).unwrap_or("").to_string())
}

fn type_text(node: Option<Node<'_>>, source: &str) -> String {
    node_text(node, source).unwrap_or_default()
}

/// Node kinds opening a nested type scope.
#[must_use]
pub fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration"
    )
}

fn is_type_node(kind: &str) -> bool {
    matches!(
        kind,
        "type_identifier"
            | "integral_type"
            | "floating_point_type"
            | "boolean_type"
            | "generic_type"
            | "scoped_type_identifier"
            | "array_type"
    )
}

/// Maps declared type text to the static type the classifier understands.
/// Generic arguments and package qualifiers are stripped; `[]` marks arrays.
#[must_use]
pub fn static_type_of(declared: &str) -> StaticType {
    let trimmed = declared.trim();
    if let Some(element) = trimmed.strip_suffix("[]") {
        return StaticType::array(simple_name(element));
    }
    StaticType::named(simple_name(trimmed))
}

fn simple_name(declared: &str) -> &str {
    let base = declared.split('<').next().unwrap_or(declared).trim();
    base.rsplit('.').next().unwrap_or(base)
}
