//! Parenthesization engine: where explicit grouping is required.
//!
//! # Decision
//!
//! Only semantically required parentheses are added. An operand is wrapped
//! when any of these holds:
//!
//! 1. it binds weaker than its parent (numerically greater precedence);
//! 2. precedences are equal and the operand sits on the side the parent's
//!    associativity does not favor (`a - (b - c)`, `(a ** b) ** c`);
//! 3. precedences are equal and the parent does not chain (strict order);
//! 4. both are prefix operators whose spellings would fuse (`-(-x)`).
//!
//! Explicit [`Expr::Paren`](mt_ir::Expr::Paren) nodes, literals, calls and
//! other atoms never need wrapping.

use mt_ir::{Ast, ExprId};

use crate::lang::Language;
use crate::{Associativity, OperandPosition, OperatorToken};

/// Whether an operand with operator `child` needs parentheses at `position`
/// under `parent`.
pub fn needs_parens(
    parent: &OperatorToken,
    child: &OperatorToken,
    position: OperandPosition,
) -> bool {
    if child.precedence != parent.precedence {
        return child.precedence > parent.precedence;
    }
    if parent.strict_order {
        return true;
    }
    if parent.is_prefix_unary() && child.is_prefix_unary() && fuses(parent.value, child.value) {
        return true;
    }
    match parent.assoc {
        Associativity::Left => position != OperandPosition::Left,
        Associativity::Right => position != OperandPosition::Right,
    }
}

/// `- -x` printed without a space is `--x`.
fn fuses(outer: &str, inner: &str) -> bool {
    outer
        .chars()
        .last()
        .is_some_and(|c| matches!(c, '+' | '-' | '&') && inner.starts_with(c))
}

/// Whether the expression `child` needs parentheses as the `position`
/// operand of an operator printed as `parent` in `lang`.
pub fn wrap_operand(
    lang: &dyn Language,
    ast: &Ast,
    parent: &OperatorToken,
    child: ExprId,
    position: OperandPosition,
) -> bool {
    let Some(child_op) = lang.expr_operator(ast, child) else {
        return false;
    };
    let wrap = needs_parens(parent, &child_op, position);
    tracing::trace!(
        parent = parent.value,
        child = child_op.value,
        ?position,
        wrap,
        "operand grouping"
    );
    wrap
}

/// [`wrap_operand`] with the parent given as an expression. An atom parent
/// never forces grouping.
pub fn expr_needs_parens(
    lang: &dyn Language,
    ast: &Ast,
    parent: ExprId,
    child: ExprId,
    position: OperandPosition,
) -> bool {
    lang.expr_operator(ast, parent)
        .is_some_and(|op| wrap_operand(lang, ast, &op, child, position))
}
