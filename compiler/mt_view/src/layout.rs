//! Program layout queries shared by the viewers.
//!
//! A program's body mixes loose statements with definitions and imports.
//! In translation unit mode the viewers hoist imports, keep definitions at
//! file level and move the loose statements into a synthesized entry point.

use mt_ir::{Ast, Decl, Def, Expr, ExprId, Node, NodeId, Stmt};
use mt_types::TypeScope;

/// The three groups of a program body, each in source order.
#[derive(Debug, Default)]
pub(crate) struct Sections {
    /// Imports, includes and package declarations.
    pub preamble: Vec<NodeId>,
    /// Function and class declarations and definitions.
    pub definitions: Vec<NodeId>,
    /// Everything else.
    pub statements: Vec<NodeId>,
}

impl Sections {
    pub fn split(ast: &Ast, body: &[NodeId]) -> Self {
        let mut sections = Sections::default();
        for &item in body {
            if is_preamble(ast, item) {
                sections.preamble.push(item);
            } else if is_definition(ast, item) {
                sections.definitions.push(item);
            } else {
                sections.statements.push(item);
            }
        }
        sections
    }
}

pub(crate) fn is_preamble(ast: &Ast, id: NodeId) -> bool {
    matches!(
        ast.node(id),
        Node::Decl(Decl::Import { .. } | Decl::Package(_) | Decl::Include { .. })
    )
}

/// Function or class, declared or defined.
pub(crate) fn is_definition(ast: &Ast, id: NodeId) -> bool {
    matches!(
        ast.node(id),
        Node::Def(Def::Function { .. } | Def::Class { .. })
            | Node::Decl(Decl::Function { .. } | Decl::Class { .. })
    )
}

/// The expression a tree consists of, if it is a single expression.
pub(crate) fn lone_expression(ast: &Ast, root: NodeId) -> Option<ExprId> {
    match ast.node(root) {
        Node::Expr(_) => ast.as_expr(root),
        Node::Stmt(Stmt::Expr(expr)) => Some(*expr),
        Node::Def(Def::Program { body, .. }) => match body.as_slice() {
            [only] => lone_expression(ast, *only),
            _ => None,
        },
        _ => None,
    }
}

/// Record the return types of a program's functions before its body is
/// rendered, so calls placed before a definition still infer.
pub(crate) fn declare_functions(ast: &Ast, root: NodeId, scope: &mut TypeScope) {
    let Node::Def(Def::Program { body, .. }) = ast.node(root) else {
        return;
    };
    for &item in body {
        if let Node::Def(Def::Function { decl, .. }) = ast.node(item) {
            mt_types::declare(ast, *decl, scope);
        }
    }
}

/// Whether control never falls off the end of `body`.
pub(crate) fn terminates(ast: &Ast, body: NodeId) -> bool {
    match ast.node(body) {
        Node::Stmt(Stmt::Block(items)) => items.last().is_some_and(|&last| terminates(ast, last)),
        Node::Stmt(Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Return(_)) => true,
        _ => false,
    }
}

/// Whether `body` declares variables directly, which a `case` branch only
/// allows inside its own braces.
pub(crate) fn declares_variables(ast: &Ast, body: NodeId) -> bool {
    match ast.node(body) {
        Node::Stmt(Stmt::Block(items)) => items
            .iter()
            .any(|&item| matches!(ast.node(item), Node::Decl(Decl::Variable { .. }))),
        Node::Decl(Decl::Variable { .. }) => true,
        _ => false,
    }
}

/// Whether an expression is the `null` literal.
pub(crate) fn is_null(ast: &Ast, id: ExprId) -> bool {
    matches!(ast.expr(id), Expr::Null)
}
