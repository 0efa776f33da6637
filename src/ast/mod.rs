// src/ast/mod.rs
//! Arena-indexed expression tree. The degree evaluator only ever sees
//! `ExprId`s, so expression identity is arena identity: two syntactically
//! equal expressions at different source locations are distinct nodes.

mod printer;

pub use printer::render;

use std::ops::Index;

/// Handle into an [`ExprArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(u32);

impl ExprId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Source position of an expression (1-based row, 0-based column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub row: usize,
    pub column: usize,
}

/// One expression node.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    MethodCall(MethodCall),
    FieldAccess(FieldAccess),
    VariableAccess(VariableAccess),
    ArrayAccess(ArrayAccess),
    /// Explicit `this` receiver.
    This,
    /// Anything we don't model (literals, `new` expressions, casts,
    /// arithmetic). Carries a source snippet for diagnostics.
    Other(String),
}

#[derive(Debug, Clone)]
pub struct MethodCall {
    pub name: String,
    /// Receiver expression. `None` means an implicit call on the current
    /// instance (`helper()` rather than `x.helper()`).
    pub qualifier: Option<ExprId>,
    pub arg_count: usize,
    /// The call is a bare expression statement, so its result is unused.
    pub is_statement: bool,
}

#[derive(Debug, Clone)]
pub struct FieldAccess {
    pub name: String,
    pub qualifier: Option<ExprId>,
}

#[derive(Debug, Clone)]
pub struct VariableAccess {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ArrayAccess {
    pub qualifier: Option<ExprId>,
}

/// Owns every expression lowered from one method body.
#[derive(Debug, Default)]
pub struct ExprArena {
    nodes: Vec<Expr>,
}

impl ExprArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Expr { kind, span });
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Index<ExprId> for ExprArena {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Expr {
        &self.nodes[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_returns_distinct_ids() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(ExprKind::This, Span::default());
        let b = arena.alloc(ExprKind::This, Span::default());
        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_index_roundtrip() {
        let mut arena = ExprArena::new();
        let id = arena.alloc(
            ExprKind::VariableAccess(VariableAccess { name: "f".into() }),
            Span { row: 3, column: 8 },
        );
        match &arena[id].kind {
            ExprKind::VariableAccess(v) => assert_eq!(v.name, "f"),
            other => panic!("unexpected kind: {other:?}"),
        }
        assert_eq!(arena[id].span.row, 3);
    }
}
