// src/semantics/mod.rs
//! Side tables carrying the semantic facts the rule consults: static types,
//! per-call resolution facts, field-of-this predicates and reaching
//! definitions. The Java front end fills these from declared types only;
//! unit tests build them by hand.

mod dataflow;

pub use dataflow::{AssignmentEntry, ReachingDefinitionSet};

use crate::ast::{ExprArena, ExprId, ExprKind};
use std::collections::{HashMap, HashSet};

/// Shape classification of a declared type, driving the classifier's
/// pure-data and never-foreign checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    Primitive,
    BoxedPrimitive,
    Text,
    TextBuilder,
    Collection,
    Iterator,
    Array,
    Object,
}

const PRIMITIVES: &[&str] = &[
    "int", "long", "short", "byte", "char", "float", "double", "boolean",
];

const BOXED: &[&str] = &[
    "Integer", "Long", "Short", "Byte", "Character", "Float", "Double", "Boolean",
];

const TEXT_BUILDERS: &[&str] = &["StringBuilder", "StringBuffer"];

const COLLECTIONS: &[&str] = &[
    "Collection",
    "List",
    "ArrayList",
    "LinkedList",
    "Set",
    "HashSet",
    "LinkedHashSet",
    "TreeSet",
    "Queue",
    "Deque",
    "ArrayDeque",
    "PriorityQueue",
    "Stack",
    "Vector",
];

const ITERATORS: &[&str] = &["Iterator", "ListIterator"];

impl TypeShape {
    /// Classifies a simple type name. Anything unrecognized is a plain
    /// object reference.
    #[must_use]
    pub fn of_simple_name(name: &str) -> Self {
        if PRIMITIVES.contains(&name) {
            Self::Primitive
        } else if BOXED.contains(&name) {
            Self::BoxedPrimitive
        } else if name == "String" {
            Self::Text
        } else if TEXT_BUILDERS.contains(&name) {
            Self::TextBuilder
        } else if COLLECTIONS.contains(&name) {
            Self::Collection
        } else if ITERATORS.contains(&name) {
            Self::Iterator
        } else {
            Self::Object
        }
    }

    /// String, string builders, primitives and boxed primitives carry no
    /// object graph worth protecting.
    #[must_use]
    pub fn is_pure_data(self) -> bool {
        matches!(
            self,
            Self::Primitive | Self::BoxedPrimitive | Self::Text | Self::TextBuilder
        )
    }

    /// Collections and arrays hold data, they are not collaborators.
    #[must_use]
    pub fn is_pure_data_container(self) -> bool {
        matches!(self, Self::Collection | Self::Array)
    }
}

/// Statically declared type of an expression, as far as the front end can
/// tell from declarations alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticType {
    pub simple_name: String,
    pub shape: TypeShape,
}

impl StaticType {
    #[must_use]
    pub fn named(simple_name: &str) -> Self {
        Self {
            simple_name: simple_name.to_string(),
            shape: TypeShape::of_simple_name(simple_name),
        }
    }

    #[must_use]
    pub fn array(element: &str) -> Self {
        Self {
            simple_name: format!("{element}[]"),
            shape: TypeShape::Array,
        }
    }
}

/// Resolution facts for one method call.
#[derive(Debug, Clone)]
pub struct CallFacts {
    /// Overload resolution succeeded. When false the classifier treats the
    /// call as trust-producing rather than flag a spurious violation.
    pub resolved: bool,
    pub is_static: bool,
    /// Type declaring the resolved method (approximated by the receiver's
    /// declared type).
    pub declaring: Option<StaticType>,
    /// Declared result type, where a declaration is in sight.
    pub result: Option<StaticType>,
}

impl Default for CallFacts {
    fn default() -> Self {
        Self {
            resolved: true,
            is_static: false,
            declaring: None,
            result: None,
        }
    }
}

/// Everything the rule knows about one method body beyond the bare tree.
#[derive(Debug, Default)]
pub struct SemanticModel {
    types: HashMap<ExprId, StaticType>,
    calls: HashMap<ExprId, CallFacts>,
    this_field_reads: HashSet<ExprId>,
    reaching: HashMap<ExprId, ReachingDefinitionSet>,
}

impl SemanticModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_type(&mut self, id: ExprId, ty: StaticType) {
        self.types.insert(id, ty);
    }

    pub fn set_call_facts(&mut self, id: ExprId, facts: CallFacts) {
        self.calls.insert(id, facts);
    }

    /// Marks a bare variable read as a reference to a field of the current
    /// instance.
    pub fn mark_this_field_read(&mut self, id: ExprId) {
        self.this_field_reads.insert(id);
    }

    pub fn set_reaching(&mut self, id: ExprId, set: ReachingDefinitionSet) {
        self.reaching.insert(id, set);
    }

    #[must_use]
    pub fn static_type(&self, id: ExprId) -> Option<&StaticType> {
        self.types.get(&id)
    }

    #[must_use]
    pub fn call_facts(&self, id: ExprId) -> Option<&CallFacts> {
        self.calls.get(&id)
    }

    #[must_use]
    pub fn is_this_field_read(&self, id: ExprId) -> bool {
        self.this_field_reads.contains(&id)
    }

    /// Reaching definitions for a variable read. Absent means the flow
    /// analysis could not place the name at all.
    #[must_use]
    pub fn reaching_definitions(&self, id: ExprId) -> Option<&ReachingDefinitionSet> {
        self.reaching.get(&id)
    }

    /// The `length` pseudo-field of an array mirrors the array's trust
    /// level rather than adding a hop.
    #[must_use]
    pub fn is_array_length_access(&self, arena: &ExprArena, id: ExprId) -> bool {
        let ExprKind::FieldAccess(access) = &arena[id].kind else {
            return false;
        };
        if access.name != "length" {
            return false;
        }
        access
            .qualifier
            .and_then(|q| self.static_type(q))
            .is_some_and(|ty| ty.shape == TypeShape::Array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FieldAccess, Span, VariableAccess};

    #[test]
    fn test_shape_classification() {
        assert_eq!(TypeShape::of_simple_name("int"), TypeShape::Primitive);
        assert_eq!(TypeShape::of_simple_name("Integer"), TypeShape::BoxedPrimitive);
        assert_eq!(TypeShape::of_simple_name("String"), TypeShape::Text);
        assert_eq!(TypeShape::of_simple_name("StringBuilder"), TypeShape::TextBuilder);
        assert_eq!(TypeShape::of_simple_name("ArrayList"), TypeShape::Collection);
        assert_eq!(TypeShape::of_simple_name("Iterator"), TypeShape::Iterator);
        assert_eq!(TypeShape::of_simple_name("Widget"), TypeShape::Object);
    }

    #[test]
    fn test_pure_data_shapes() {
        assert!(TypeShape::Text.is_pure_data());
        assert!(TypeShape::Primitive.is_pure_data());
        assert!(!TypeShape::Object.is_pure_data());
        assert!(TypeShape::Collection.is_pure_data_container());
        assert!(TypeShape::Array.is_pure_data_container());
        assert!(!TypeShape::Text.is_pure_data_container());
    }

    #[test]
    fn test_array_length_detection() {
        let mut arena = ExprArena::new();
        let arr = arena.alloc(
            crate::ast::ExprKind::VariableAccess(VariableAccess { name: "xs".into() }),
            Span::default(),
        );
        let length = arena.alloc(
            crate::ast::ExprKind::FieldAccess(FieldAccess {
                name: "length".into(),
                qualifier: Some(arr),
            }),
            Span::default(),
        );

        let mut model = SemanticModel::new();
        assert!(!model.is_array_length_access(&arena, length));

        model.set_type(arr, StaticType::array("int"));
        assert!(model.is_array_length_access(&arena, length));
    }
}
