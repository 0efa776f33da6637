// src/ast/printer.rs
//! Structural pretty-printer for diagnostics. Renders an expression the way
//! it reads in source, without keeping the source around.

use super::{ExprArena, ExprId, ExprKind};

/// Renders `id` as compact Java-like syntax, e.g. `f.getBar()` or
/// `this.items[..]`.
#[must_use]
pub fn render(arena: &ExprArena, id: ExprId) -> String {
    let mut out = String::new();
    write_expr(arena, id, &mut out);
    out
}

fn write_expr(arena: &ExprArena, id: ExprId, out: &mut String) {
    match &arena[id].kind {
        ExprKind::This => out.push_str("this"),
        ExprKind::VariableAccess(v) => out.push_str(&v.name),
        ExprKind::FieldAccess(f) => {
            if let Some(q) = f.qualifier {
                write_expr(arena, q, out);
                out.push('.');
            }
            out.push_str(&f.name);
        }
        ExprKind::MethodCall(call) => {
            if let Some(q) = call.qualifier {
                write_expr(arena, q, out);
                out.push('.');
            }
            out.push_str(&call.name);
            if call.arg_count == 0 {
                out.push_str("()");
            } else {
                out.push_str("(...)");
            }
        }
        ExprKind::ArrayAccess(a) => {
            if let Some(q) = a.qualifier {
                write_expr(arena, q, out);
            }
            out.push_str("[..]");
        }
        ExprKind::Other(text) => out.push_str(text),
    }
}
