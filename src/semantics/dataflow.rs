// src/semantics/dataflow.rs
//! Reaching-definition data handed to the degree evaluator. One entry per
//! syntactic site that may have produced a variable's current value.

use crate::ast::ExprId;

/// One concrete origin of a variable's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentEntry {
    /// Bound at the method boundary. Always degree 1: acting on data you
    /// were handed is the one permitted hop.
    FormalParameter,
    /// A foreach loop variable; inherits the trust level of the iterated
    /// collection.
    ForeachVar { iterable: ExprId },
    /// A plain assignment or initializer; inherits the trust level of the
    /// right-hand side.
    Assignment { rhs: ExprId },
}

/// The set of assignment sites that may reach one variable read.
#[derive(Debug, Clone, Default)]
pub struct ReachingDefinitionSet {
    pub entries: Vec<AssignmentEntry>,
    /// False when flow analysis could not exhaustively enumerate origins;
    /// the evaluator then falls back to degree 0.
    pub fully_known: bool,
}

impl ReachingDefinitionSet {
    #[must_use]
    pub fn known(entries: Vec<AssignmentEntry>) -> Self {
        Self {
            entries,
            fully_known: true,
        }
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self {
            entries: Vec::new(),
            fully_known: false,
        }
    }
}
