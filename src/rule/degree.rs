// src/rule/degree.rs
//! Foreign-degree evaluation: a memoized recursive walk over qualifiers and
//! reaching definitions.
//!
//! The cache exists to break recursion on cyclic data-flow graphs and to
//! keep chained evaluation linear: the rule visits every part of a call
//! chain, and each part's degree depends on its qualifier's, so without
//! memoization the cost would be quadratic in chain length.

use std::collections::HashMap;

use crate::ast::{ExprArena, ExprId, ExprKind, FieldAccess, MethodCall};
use crate::config::{Aggregation, NamingConfig};
use crate::rule::classifier::{self, CallClass, ClassifierCtx};
use crate::semantics::{AssignmentEntry, SemanticModel};

/// Cache slot. `InProgress` marks an expression currently being evaluated
/// further up the stack; hitting it again means the data-flow graph loops.
#[derive(Debug, Clone, Copy)]
enum Slot {
    InProgress,
    Done(usize),
}

/// Computes foreign degrees for expressions of one method body. Owns the
/// degree cache; one evaluator instance per analysis run, never shared.
pub struct DegreeEvaluator<'a> {
    arena: &'a ExprArena,
    model: &'a SemanticModel,
    naming: &'a NamingConfig,
    aggregation: Aggregation,
    cache: HashMap<ExprId, Slot>,
}

impl<'a> DegreeEvaluator<'a> {
    #[must_use]
    pub fn new(
        arena: &'a ExprArena,
        model: &'a SemanticModel,
        naming: &'a NamingConfig,
        aggregation: Aggregation,
    ) -> Self {
        Self {
            arena,
            model,
            naming,
            aggregation,
            cache: HashMap::new(),
        }
    }

    /// Number of ownership hops between the enclosing method and the value
    /// this expression denotes. Total: unmodeled shapes come back 0.
    pub fn degree_of(&mut self, id: ExprId) -> usize {
        if let Some(&slot) = self.cache.get(&id) {
            return match slot {
                Slot::Done(degree) => degree,
                // Cycle in the data-flow graph. Clip to trusted rather than
                // let a sentinel leak into degree arithmetic.
                Slot::InProgress => 0,
            };
        }
        self.cache.insert(id, Slot::InProgress);
        let degree = self.compute(id);
        self.cache.insert(id, Slot::Done(degree));
        degree
    }

    /// Entries currently memoized. Stable across repeated queries of the
    /// same expression.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drops all memoized degrees. Called at the end of an analysis run.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    fn compute(&mut self, id: ExprId) -> usize {
        let arena = self.arena;
        match &arena[id].kind {
            ExprKind::MethodCall(call) => self.method_call_degree(id, call),
            ExprKind::FieldAccess(access) => self.field_access_degree(id, access),
            ExprKind::VariableAccess(_) => self.variable_degree(id),
            ExprKind::ArrayAccess(access) => {
                // Indexing mirrors the array's trust level.
                access.qualifier.map_or(0, |q| self.degree_of(q))
            }
            ExprKind::This | ExprKind::Other(_) => 0,
        }
    }

    fn method_call_degree(&mut self, id: ExprId, call: &MethodCall) -> usize {
        // Implicit call on the current instance.
        let Some(qualifier) = call.qualifier else {
            return 0;
        };
        let cx = ClassifierCtx {
            arena: self.arena,
            model: self.model,
            naming: self.naming,
        };
        match classifier::classify(&cx, id, call) {
            CallClass::TrustProducing => 1,
            CallClass::Forwarding => 1 + self.degree_of(qualifier),
            CallClass::ActionFree => self.degree_of(qualifier),
        }
    }

    fn field_access_degree(&mut self, id: ExprId, access: &FieldAccess) -> usize {
        let Some(qualifier) = access.qualifier else {
            return 0;
        };
        if matches!(self.arena[qualifier].kind, ExprKind::This) {
            return 1;
        }
        if self.model.is_array_length_access(self.arena, id) {
            return self.degree_of(qualifier);
        }
        1 + self.degree_of(qualifier)
    }

    fn variable_degree(&mut self, id: ExprId) -> usize {
        if self.model.is_this_field_read(id) {
            return 1;
        }
        let model = self.model;
        let Some(set) = model.reaching_definitions(id) else {
            return 0;
        };
        if !set.fully_known {
            return 0;
        }
        let degrees = set
            .entries
            .iter()
            .map(|entry| self.assignment_degree(*entry))
            .collect::<Vec<_>>();
        match self.aggregation {
            Aggregation::Max => degrees.into_iter().max().unwrap_or(0),
            Aggregation::Min => degrees.into_iter().min().unwrap_or(0),
        }
    }

    fn assignment_degree(&mut self, entry: AssignmentEntry) -> usize {
        match entry {
            AssignmentEntry::FormalParameter => 1,
            AssignmentEntry::ForeachVar { iterable } => self.degree_of(iterable),
            AssignmentEntry::Assignment { rhs } => self.degree_of(rhs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArrayAccess, Span, VariableAccess};
    use crate::semantics::{CallFacts, ReachingDefinitionSet, StaticType};

    /// Hand-built arena + model, standing in for the front end.
    struct Fixture {
        arena: ExprArena,
        model: SemanticModel,
        naming: NamingConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                arena: ExprArena::new(),
                model: SemanticModel::new(),
                naming: NamingConfig::default(),
            }
        }

        fn this(&mut self) -> ExprId {
            self.arena.alloc(ExprKind::This, Span::default())
        }

        fn var(&mut self, name: &str) -> ExprId {
            self.arena.alloc(
                ExprKind::VariableAccess(VariableAccess { name: name.into() }),
                Span::default(),
            )
        }

        /// A variable read bound to a formal parameter.
        fn param(&mut self, name: &str, ty: &str) -> ExprId {
            let id = self.var(name);
            self.model.set_type(id, StaticType::named(ty));
            self.model.set_reaching(
                id,
                ReachingDefinitionSet::known(vec![AssignmentEntry::FormalParameter]),
            );
            id
        }

        fn field(&mut self, qualifier: ExprId, name: &str) -> ExprId {
            self.arena.alloc(
                ExprKind::FieldAccess(FieldAccess {
                    name: name.into(),
                    qualifier: Some(qualifier),
                }),
                Span::default(),
            )
        }

        fn getter(&mut self, qualifier: ExprId, name: &str) -> ExprId {
            let id = self.arena.alloc(
                ExprKind::MethodCall(MethodCall {
                    name: name.into(),
                    qualifier: Some(qualifier),
                    arg_count: 0,
                    is_statement: false,
                }),
                Span::default(),
            );
            self.model.set_call_facts(id, CallFacts::default());
            id
        }

        fn evaluator(&self) -> DegreeEvaluator<'_> {
            DegreeEvaluator::new(&self.arena, &self.model, &self.naming, Aggregation::Max)
        }

        fn degree(&self, id: ExprId) -> usize {
            self.evaluator().degree_of(id)
        }
    }

    #[test]
    fn test_formal_parameter_is_one() {
        let mut fx = Fixture::new();
        let p = fx.param("f", "Foo");
        assert_eq!(fx.degree(p), 1);
    }

    #[test]
    fn test_field_of_this_is_one() {
        let mut fx = Fixture::new();
        let this = fx.this();
        let helper = fx.field(this, "helper");
        assert_eq!(fx.degree(helper), 1);
    }

    #[test]
    fn test_bare_field_read_is_one() {
        let mut fx = Fixture::new();
        let read = fx.var("helper");
        fx.model.mark_this_field_read(read);
        assert_eq!(fx.degree(read), 1);
    }

    #[test]
    fn test_field_chain_counts_hops() {
        // this.f.g.h has degree 3; each plain field access adds one hop.
        let mut fx = Fixture::new();
        let this = fx.this();
        let f = fx.field(this, "f");
        let g = fx.field(f, "g");
        let h = fx.field(g, "h");
        assert_eq!(fx.degree(g), 2);
        assert_eq!(fx.degree(h), 3);
    }

    #[test]
    fn test_getter_chain_from_parameter() {
        let mut fx = Fixture::new();
        let p = fx.param("f", "Foo");
        let bar = fx.getter(p, "getBar");
        let baz = fx.getter(bar, "getBaz");
        assert_eq!(fx.degree(bar), 2);
        assert_eq!(fx.degree(baz), 3);
    }

    #[test]
    fn test_unqualified_call_is_zero() {
        let mut fx = Fixture::new();
        let id = fx.arena.alloc(
            ExprKind::MethodCall(MethodCall {
                name: "helper".into(),
                qualifier: None,
                arg_count: 0,
                is_statement: false,
            }),
            Span::default(),
        );
        assert_eq!(fx.degree(id), 0);
    }

    #[test]
    fn test_static_factory_resets_to_one() {
        // DataFactory.create(deep.chain().here()) is degree 1 no matter
        // what fed its arguments.
        let mut fx = Fixture::new();
        let receiver = fx.var("DataFactory");
        let create = fx.arena.alloc(
            ExprKind::MethodCall(MethodCall {
                name: "create".into(),
                qualifier: Some(receiver),
                arg_count: 3,
                is_statement: false,
            }),
            Span::default(),
        );
        fx.model.set_call_facts(
            create,
            CallFacts {
                is_static: true,
                ..CallFacts::default()
            },
        );
        assert_eq!(fx.degree(create), 1);
    }

    #[test]
    fn test_builder_chain_stays_at_one() {
        let mut fx = Fixture::new();
        let b = fx.param("b", "RequestBuilder");
        let one = fx.getter(b, "withTimeout");
        fx.model.set_type(one, StaticType::named("RequestBuilder"));
        let two = fx.getter(one, "withRetries");
        fx.model.set_type(two, StaticType::named("RequestBuilder"));
        let three = fx.getter(two, "build");
        assert_eq!(fx.degree(three), 1);
    }

    #[test]
    fn test_variable_inherits_assignment_degree() {
        // Data d = DataFactory.create(); d has degree 1.
        let mut fx = Fixture::new();
        let receiver = fx.var("DataFactory");
        let create = fx.getter(receiver, "create");
        fx.model.set_call_facts(
            create,
            CallFacts {
                is_static: true,
                ..CallFacts::default()
            },
        );
        let d = fx.var("d");
        fx.model.set_reaching(
            d,
            ReachingDefinitionSet::known(vec![AssignmentEntry::Assignment { rhs: create }]),
        );
        assert_eq!(fx.degree(d), 1);
    }

    #[test]
    fn test_foreach_variable_inherits_iterable() {
        let mut fx = Fixture::new();
        let this = fx.this();
        let items = fx.field(this, "items");
        let item = fx.var("item");
        fx.model.set_reaching(
            item,
            ReachingDefinitionSet::known(vec![AssignmentEntry::ForeachVar { iterable: items }]),
        );
        assert_eq!(fx.degree(item), 1);
    }

    #[test]
    fn test_aggregation_max_vs_min() {
        let mut fx = Fixture::new();
        let p = fx.param("p", "Foo");
        let far = fx.getter(p, "getBar");
        let v = fx.var("v");
        fx.model.set_reaching(
            v,
            ReachingDefinitionSet::known(vec![
                AssignmentEntry::FormalParameter,
                AssignmentEntry::Assignment { rhs: far },
            ]),
        );

        let mut max_eval =
            DegreeEvaluator::new(&fx.arena, &fx.model, &fx.naming, Aggregation::Max);
        assert_eq!(max_eval.degree_of(v), 2);

        let mut min_eval =
            DegreeEvaluator::new(&fx.arena, &fx.model, &fx.naming, Aggregation::Min);
        assert_eq!(min_eval.degree_of(v), 1);
    }

    #[test]
    fn test_unknown_variable_is_zero() {
        let mut fx = Fixture::new();
        let v = fx.var("mystery");
        assert_eq!(fx.degree(v), 0);
    }

    #[test]
    fn test_not_fully_known_set_is_zero() {
        let mut fx = Fixture::new();
        let v = fx.var("v");
        fx.model.set_reaching(v, ReachingDefinitionSet::unknown());
        assert_eq!(fx.degree(v), 0);
    }

    #[test]
    fn test_empty_reaching_set_is_zero() {
        let mut fx = Fixture::new();
        let v = fx.var("declared_but_never_assigned");
        fx.model.set_reaching(v, ReachingDefinitionSet::known(vec![]));
        assert_eq!(fx.degree(v), 0);
    }

    #[test]
    fn test_array_access_is_transparent() {
        let mut fx = Fixture::new();
        let p = fx.param("xs", "Foo");
        let indexed = fx.arena.alloc(
            ExprKind::ArrayAccess(ArrayAccess {
                qualifier: Some(p),
            }),
            Span::default(),
        );
        assert_eq!(fx.degree(indexed), 1);
    }

    #[test]
    fn test_array_length_is_transparent() {
        let mut fx = Fixture::new();
        let p = fx.param("xs", "Foo");
        fx.model.set_type(p, StaticType::array("int"));
        let len = fx.field(p, "length");
        assert_eq!(fx.degree(len), 1);

        // A non-array "length" field is an ordinary hop.
        let q = fx.param("box", "Box");
        let boxed_len = fx.field(q, "length");
        assert_eq!(fx.degree(boxed_len), 2);
    }

    #[test]
    fn test_cyclic_definitions_terminate() {
        // a = b; b = a; reading either must come back finite.
        let mut fx = Fixture::new();
        let read_b = fx.var("b");
        let read_a = fx.var("a");
        fx.model.set_reaching(
            read_a,
            ReachingDefinitionSet::known(vec![AssignmentEntry::Assignment { rhs: read_b }]),
        );
        fx.model.set_reaching(
            read_b,
            ReachingDefinitionSet::known(vec![AssignmentEntry::Assignment { rhs: read_a }]),
        );
        assert_eq!(fx.degree(read_a), 0);
        assert_eq!(fx.degree(read_b), 0);
    }

    #[test]
    fn test_self_referential_assignment_terminates() {
        // node = node.next(); the rhs chain loops back through the variable.
        let mut fx = Fixture::new();
        let read = fx.var("node");
        let next = fx.getter(read, "next");
        fx.model.set_reaching(
            read,
            ReachingDefinitionSet::known(vec![
                AssignmentEntry::FormalParameter,
                AssignmentEntry::Assignment { rhs: next },
            ]),
        );
        // node: max(1, degree(node.next())); the inner read of node hits the
        // in-progress slot and clips to 0, so node.next() is 1.
        assert_eq!(fx.degree(read), 1);
    }

    #[test]
    fn test_repeated_queries_hit_the_cache() {
        let mut fx = Fixture::new();
        let p = fx.param("f", "Foo");
        let bar = fx.getter(p, "getBar");
        let baz = fx.getter(bar, "getBaz");

        let mut eval = fx.evaluator();
        let first = eval.degree_of(baz);
        let populated = eval.cache_len();
        let second = eval.degree_of(baz);

        assert_eq!(first, second);
        assert_eq!(eval.cache_len(), populated);

        eval.clear();
        assert_eq!(eval.cache_len(), 0);
    }
}
