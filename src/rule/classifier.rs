// src/rule/classifier.rs
//! Call classification based on static facts and naming conventions.
//!
//! Decides, for a single qualified call, whether it hands the caller a new
//! independently-owned value (degree resets to 1), merely exposes a part of
//! its receiver (degree grows by 1), or acts on the receiver without
//! exposing anything (degree unchanged).

use crate::ast::{ExprArena, ExprId, ExprKind, MethodCall};
use crate::config::NamingConfig;
use crate::semantics::{CallFacts, SemanticModel, TypeShape};

/// How a call treats the trust level of its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallClass {
    /// Yields a freshly trusted value; cuts the chain.
    TrustProducing,
    /// Getter-like; adds one hop of foreignness.
    Forwarding,
    /// Acts on the receiver without leaking state; degree unchanged.
    ActionFree,
}

/// Facts the classifier reads. All predicates are pure over this view.
#[derive(Clone, Copy)]
pub struct ClassifierCtx<'a> {
    pub arena: &'a ExprArena,
    pub model: &'a SemanticModel,
    pub naming: &'a NamingConfig,
}

/// Classifies a qualified method call.
#[must_use]
pub fn classify(cx: &ClassifierCtx, id: ExprId, call: &MethodCall) -> CallClass {
    if produces_trusted_data(cx, id, call) {
        return CallClass::TrustProducing;
    }
    if is_getter_like(cx, call) {
        return CallClass::Forwarding;
    }
    CallClass::ActionFree
}

/// A call that hands back trusted data: construction-like calls, calls on
/// the current instance, pure-data results, and the never-foreign allowlist.
/// Failed overload resolution lands here too: better to miss a report than
/// to flag one caused by incomplete type information.
fn produces_trusted_data(cx: &ClassifierCtx, id: ExprId, call: &MethodCall) -> bool {
    let facts = cx.model.call_facts(id);
    let Some(facts) = facts else {
        return true;
    };
    if !facts.resolved || facts.is_static {
        return true;
    }

    is_call_on_this(cx, call)
        || is_factory_call(cx, call)
        || is_builder_receiver(cx, call.qualifier)
        || !is_getter_like(cx, call)
        || is_never_foreign(cx, call)
        || result_is_pure_data(facts)
        || declared_on_data_container(facts)
}

/// Getter-like: named like an accessor or taking no arguments, and actually
/// consumed. A bare statement uses the call for its side effect only.
fn is_getter_like(cx: &ClassifierCtx, call: &MethodCall) -> bool {
    if call.is_statement {
        return false;
    }
    call.arg_count == 0 || has_accessor_name(cx.naming, &call.name)
}

fn has_accessor_name(naming: &NamingConfig, name: &str) -> bool {
    naming.accessor_prefixes.iter().any(|p| name.starts_with(p.as_str()))
}

fn is_call_on_this(cx: &ClassifierCtx, call: &MethodCall) -> bool {
    call.qualifier
        .is_some_and(|q| matches!(cx.arena[q].kind, ExprKind::This))
}

/// Factory heuristic: the receiver's declared type or its reference name
/// carries the configured factory marker.
fn is_factory_call(cx: &ClassifierCtx, call: &MethodCall) -> bool {
    let Some(q) = call.qualifier else {
        return false;
    };
    type_ends_with(cx, q, &cx.naming.factory_type_suffix)
        || name_ends_with(cx, q, &cx.naming.factory_name_suffix)
        || name_is(cx, q, &cx.naming.factory_name)
}

fn is_builder_receiver(cx: &ClassifierCtx, qualifier: Option<ExprId>) -> bool {
    qualifier.is_some_and(|q| type_ends_with(cx, q, &cx.naming.builder_type_suffix))
}

/// Calls that are exactly as trusted as their receiver: iterator stepping,
/// collection/string plumbing, and chained builder/factory stages.
fn is_never_foreign(cx: &ClassifierCtx, call: &MethodCall) -> bool {
    if is_iterator_next(cx, call) {
        return true;
    }
    let receiver_shape = call
        .qualifier
        .and_then(|q| cx.model.static_type(q))
        .map(|ty| ty.shape);
    if matches!(
        receiver_shape,
        Some(TypeShape::Collection | TypeShape::TextBuilder | TypeShape::Text)
    ) {
        return true;
    }
    is_builder_receiver(cx, call.qualifier) || is_factory_call(cx, call)
}

fn is_iterator_next(cx: &ClassifierCtx, call: &MethodCall) -> bool {
    if call.name != "next" || call.arg_count != 0 {
        return false;
    }
    call.qualifier
        .and_then(|q| cx.model.static_type(q))
        .is_some_and(|ty| ty.shape == TypeShape::Iterator)
}

fn result_is_pure_data(facts: &CallFacts) -> bool {
    facts.result.as_ref().is_some_and(|ty| ty.shape.is_pure_data())
}

fn declared_on_data_container(facts: &CallFacts) -> bool {
    facts
        .declaring
        .as_ref()
        .is_some_and(|ty| ty.shape.is_pure_data_container())
}

fn type_ends_with(cx: &ClassifierCtx, id: ExprId, suffix: &str) -> bool {
    cx.model
        .static_type(id)
        .is_some_and(|ty| ty.simple_name.ends_with(suffix))
}

/// Named references are bare variable reads and field accesses.
fn name_ends_with(cx: &ClassifierCtx, id: ExprId, suffix: &str) -> bool {
    reference_name(cx.arena, id).is_some_and(|name| name.ends_with(suffix))
}

fn name_is(cx: &ClassifierCtx, id: ExprId, expected: &str) -> bool {
    reference_name(cx.arena, id).is_some_and(|name| name == expected)
}

fn reference_name(arena: &ExprArena, id: ExprId) -> Option<&str> {
    match &arena[id].kind {
        ExprKind::VariableAccess(v) => Some(&v.name),
        ExprKind::FieldAccess(f) => Some(&f.name),
        _ => None,
    }
}
