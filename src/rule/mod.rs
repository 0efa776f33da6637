// src/rule/mod.rs
//! The Law of Demeter rule: "only talk to friends". Computes the foreign
//! degree of every qualified call and field access and reports the first
//! access past the trust radius.

pub mod classifier;
pub mod degree;
pub mod policy;

pub use classifier::{classify, CallClass, ClassifierCtx};
pub use degree::DegreeEvaluator;

use crate::ast::{self, ExprArena, ExprId, ExprKind};
use crate::config::RuleConfig;
use crate::semantics::SemanticModel;
use crate::types::Violation;

/// One rule instance per analysis run. Owns the degree cache through its
/// evaluator; not shareable across concurrent runs.
pub struct DemeterRule<'a> {
    arena: &'a ExprArena,
    evaluator: DegreeEvaluator<'a>,
    trust_radius: usize,
}

impl<'a> DemeterRule<'a> {
    #[must_use]
    pub fn new(arena: &'a ExprArena, model: &'a SemanticModel, config: &'a RuleConfig) -> Self {
        Self {
            arena,
            evaluator: DegreeEvaluator::new(arena, model, &config.naming, config.aggregation),
            trust_radius: config.trust_radius,
        }
    }

    /// Invoked once per qualified method call or field access. Pushes at
    /// most one violation.
    pub fn visit(&mut self, id: ExprId, out: &mut Vec<Violation>) {
        let arena = self.arena;
        match &arena[id].kind {
            ExprKind::MethodCall(call) => {
                let Some(qualifier) = call.qualifier else {
                    return;
                };
                let degree = self.evaluator.degree_of(id);
                if policy::is_reported(degree, self.trust_radius) {
                    out.push(Violation::method_call(
                        arena[id].span,
                        &call.name,
                        &ast::render(arena, qualifier),
                        degree,
                    ));
                }
            }
            ExprKind::FieldAccess(access) => {
                let Some(qualifier) = access.qualifier else {
                    return;
                };
                let degree = self.evaluator.degree_of(id);
                if policy::is_reported(degree, self.trust_radius) {
                    out.push(Violation::field_access(
                        arena[id].span,
                        &access.name,
                        &ast::render(arena, qualifier),
                        degree,
                    ));
                }
            }
            _ => {}
        }
    }

    /// Clears the degree cache. Call when the run is over so a long-lived
    /// process doesn't accumulate entries across runs.
    pub fn end_of_run(&mut self) {
        self.evaluator.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{MethodCall, Span, VariableAccess};
    use crate::semantics::{AssignmentEntry, CallFacts, ReachingDefinitionSet, StaticType};
    use crate::types::AccessKind;

    struct Fixture {
        arena: ExprArena,
        model: SemanticModel,
        config: RuleConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                arena: ExprArena::new(),
                model: SemanticModel::new(),
                config: RuleConfig::default(),
            }
        }

        fn param(&mut self, name: &str, ty: &str) -> ExprId {
            let id = self.arena.alloc(
                ExprKind::VariableAccess(VariableAccess { name: name.into() }),
                Span::default(),
            );
            self.model.set_type(id, StaticType::named(ty));
            self.model.set_reaching(
                id,
                ReachingDefinitionSet::known(vec![AssignmentEntry::FormalParameter]),
            );
            id
        }

        fn getter(&mut self, qualifier: ExprId, name: &str, row: usize) -> ExprId {
            let id = self.arena.alloc(
                ExprKind::MethodCall(MethodCall {
                    name: name.into(),
                    qualifier: Some(qualifier),
                    arg_count: 0,
                    is_statement: false,
                }),
                Span { row, column: 0 },
            );
            self.model.set_call_facts(id, CallFacts::default());
            id
        }

        fn run(&self, targets: &[ExprId]) -> Vec<Violation> {
            let mut rule = DemeterRule::new(&self.arena, &self.model, &self.config);
            let mut out = Vec::new();
            for &id in targets {
                rule.visit(id, &mut out);
            }
            rule.end_of_run();
            out
        }
    }

    #[test]
    fn test_getter_chain_reports_first_crossing_only() {
        let mut fx = Fixture::new();
        let p = fx.param("f", "Foo");
        let bar = fx.getter(p, "getBar", 2);
        let baz = fx.getter(bar, "getBaz", 2);
        let qux = fx.getter(baz, "getQux", 2);

        let out = fx.run(&[bar, baz, qux]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].member, "getBar");
        assert_eq!(out[0].degree, 2);
        assert_eq!(out[0].kind, AccessKind::Call);
        assert_eq!(
            out[0].message,
            "Call to `getBar` on foreign value `f` (degree 2)"
        );
    }

    #[test]
    fn test_wider_radius_moves_the_report_deeper() {
        let mut fx = Fixture::new();
        fx.config.trust_radius = 2;
        let p = fx.param("f", "Foo");
        let bar = fx.getter(p, "getBar", 2);
        let baz = fx.getter(bar, "getBaz", 2);
        let qux = fx.getter(baz, "getQux", 2);

        let out = fx.run(&[bar, baz, qux]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].member, "getBaz");
        assert_eq!(out[0].degree, 3);
    }

    #[test]
    fn test_field_access_message_shape() {
        let mut fx = Fixture::new();
        let p = fx.param("order", "Order");
        let customer = fx.arena.alloc(
            ExprKind::FieldAccess(crate::ast::FieldAccess {
                name: "customer".into(),
                qualifier: Some(p),
            }),
            Span { row: 7, column: 8 },
        );

        let out = fx.run(&[customer]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, AccessKind::Field);
        assert_eq!(out[0].row, 7);
        assert_eq!(
            out[0].message,
            "Access to field `customer` on foreign value `order` (degree 2)"
        );
    }

    #[test]
    fn test_accesses_within_radius_are_silent() {
        let mut fx = Fixture::new();
        let p = fx.param("f", "Foo");
        let bar = fx.getter(p, "getBar", 1);
        fx.config.trust_radius = 2;
        let out = fx.run(&[bar]);
        assert!(out.is_empty());
    }
}
