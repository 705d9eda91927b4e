//! Type inference.
//!
//! Types are computed structurally per expression kind against a
//! [`TypeScope`]. Anything undecidable is `Type::Unknown`; inference never
//! fails.
//!
//! Inference has one side effect: assignments and variable declarations
//! register the variable's type in the innermost frame. A scope therefore
//! belongs to a single pass over a tree and is rebuilt for the next one.

use mt_ir::{
    AssignOp, Ast, BinaryOp, CollectionKind, Decl, DeclId, Def, Expr, ExprId, Node, NodeId,
    Stmt, Type, UnaryOp,
};

use crate::TypeScope;

/// Type of an expression. Assignments inside it are registered in `scope`.
pub fn infer_expr(ast: &Ast, id: ExprId, scope: &mut TypeScope) -> Type {
    match ast.expr(id) {
        Expr::Int(_) => Type::Int,
        Expr::Float(_) => Type::Float,
        Expr::Bool(_) => Type::Bool,
        Expr::Char(_) => Type::Char,
        Expr::Str { .. } | Expr::Interpolated(_) => Type::Str,
        Expr::Null | Expr::SelfRef | Expr::SuperRef | Expr::Scoped(_) => Type::Unknown,
        Expr::Collection { kind, items } => {
            let item = common_type(ast, items, scope);
            match kind {
                CollectionKind::List => Type::List(Box::new(item)),
                CollectionKind::Array => Type::Array(Box::new(item)),
                CollectionKind::Set => Type::Set(Box::new(item)),
                CollectionKind::Tuple => Type::Tuple(
                    items.iter().map(|&e| infer_expr(ast, e, scope)).collect(),
                ),
            }
        }
        Expr::Dict(entries) => {
            let keys: Vec<_> = entries.iter().map(|&(k, _)| k).collect();
            let values: Vec<_> = entries.iter().map(|&(_, v)| v).collect();
            Type::Dict(
                Box::new(common_type(ast, &keys, scope)),
                Box::new(common_type(ast, &values, scope)),
            )
        }
        Expr::Ident(name) => scope.variable_type(name.as_str()).cloned().unwrap_or(Type::Unknown),
        Expr::Binary { op, left, right } => {
            let left = infer_expr(ast, *left, scope);
            let right = infer_expr(ast, *right, scope);
            binary_type(*op, &left, &right)
        }
        Expr::Unary { op, operand } => {
            let operand = infer_expr(ast, *operand, scope);
            unary_type(*op, operand)
        }
        Expr::Assign { op, target, value } => infer_assignment(ast, *op, *target, *value, scope),
        Expr::Ternary {
            cond,
            then,
            otherwise,
        } => {
            infer_expr(ast, *cond, scope);
            let then = infer_expr(ast, *then, scope);
            let otherwise = infer_expr(ast, *otherwise, scope);
            unify(then, otherwise)
        }
        Expr::CompoundComparison(items) => {
            for &item in items {
                infer_expr(ast, item, scope);
            }
            Type::Bool
        }
        Expr::Paren(inner) => infer_expr(ast, *inner, scope),
        Expr::Call { callee, args } => {
            for &arg in args {
                infer_expr(ast, arg, scope);
            }
            match ast.expr(*callee) {
                Expr::Ident(name) => scope.method_return_type(name.as_str()),
                _ => Type::Unknown,
            }
        }
        Expr::MethodCall { receiver, args, .. } => {
            infer_expr(ast, *receiver, scope);
            for &arg in args {
                infer_expr(ast, arg, scope);
            }
            Type::Unknown
        }
        Expr::Index { target, index } => {
            infer_expr(ast, *index, scope);
            infer_expr(ast, *target, scope)
                .element()
                .cloned()
                .unwrap_or(Type::Unknown)
        }
        Expr::Member { target, .. } => {
            infer_expr(ast, *target, scope);
            Type::Unknown
        }
        Expr::Cast { ty, .. } | Expr::New { ty, .. } => ast.ty(*ty).clone(),
        Expr::NewArray { ty, .. } => Type::Array(Box::new(ast.ty(*ty).clone())),
        Expr::SizeOf(_) => Type::Int,
        Expr::Sequence(items) => items
            .iter()
            .map(|&item| infer_expr(ast, item, scope))
            .last()
            .unwrap_or(Type::Unknown),
    }
}

/// Type of `target op= value`, registering it for a simple target.
///
/// An `Unknown` result never overwrites a known type.
pub fn infer_assignment(
    ast: &Ast,
    op: AssignOp,
    target: ExprId,
    value: ExprId,
    scope: &mut TypeScope,
) -> Type {
    let value_ty = infer_expr(ast, value, scope);
    let ty = match op.binary() {
        None => value_ty,
        Some(binary) => {
            let target_ty = infer_expr(ast, target, scope);
            binary_type(binary, &target_ty, &value_ty)
        }
    };
    if let Expr::Ident(name) = ast.expr(target) {
        register(scope, name.as_str(), ty.clone());
    }
    ty
}

/// Register the variables of a declaration in the innermost frame.
///
/// A declared type wins over the initializer's inferred type. Function
/// declarations record their return type.
pub fn declare(ast: &Ast, id: DeclId, scope: &mut TypeScope) {
    match ast.decl(id) {
        Decl::Variable {
            ty, declarators, ..
        } => {
            let declared = ast.ty(*ty);
            for declarator in declarators {
                let inferred = declarator.init.map(|init| infer_expr(ast, init, scope));
                let ty = match inferred {
                    Some(inferred) if !declared.is_known() => inferred,
                    _ => declared.clone(),
                };
                tracing::trace!(name = %declarator.name, %ty, "declare variable");
                scope.add_variable(declarator.name.clone(), ty);
            }
        }
        Decl::Function { name, ret, .. } => {
            scope.add_method(name.clone(), ast.ty(*ret).clone());
        }
        Decl::Class { .. } | Decl::Import { .. } | Decl::Package(_) | Decl::Include { .. } => {}
    }
}

/// Run inference over a whole subtree, entering a frame for every block,
/// loop variable and function body.
#[tracing::instrument(level = "trace", skip(ast, scope))]
pub fn infer_tree(ast: &Ast, id: NodeId, scope: &mut TypeScope) {
    match ast.node(id) {
        Node::Expr(_) => {
            if let Some(expr) = ast.as_expr(id) {
                infer_expr(ast, expr, scope);
            }
        }
        Node::Stmt(stmt) => infer_stmt(ast, stmt, scope),
        Node::Decl(_) => {
            if let Some(decl) = ast.as_decl(id) {
                declare(ast, decl, scope);
            }
        }
        Node::Def(def) => match def {
            Def::Program { body, .. } => {
                for &item in body {
                    infer_tree(ast, item, scope);
                }
            }
            Def::Function { decl, body } => {
                declare(ast, *decl, scope);
                in_frame(scope, |scope| {
                    if let Decl::Function { params, .. } = ast.decl(*decl) {
                        for param in params {
                            scope.add_variable(param.name.clone(), ast.ty(param.ty).clone());
                        }
                    }
                    infer_tree(ast, body.node(), scope);
                });
            }
            Def::Class { members, .. } => in_frame(scope, |scope| {
                for &member in members {
                    infer_tree(ast, member, scope);
                }
            }),
        },
        Node::Type(_) => {}
    }
}

fn infer_stmt(ast: &Ast, stmt: &Stmt, scope: &mut TypeScope) {
    match stmt {
        Stmt::Block(items) => in_frame(scope, |scope| {
            for &item in items {
                infer_tree(ast, item, scope);
            }
        }),
        Stmt::Expr(expr) => {
            infer_expr(ast, *expr, scope);
        }
        Stmt::Assign { op, target, value } => {
            infer_assignment(ast, *op, *target, *value, scope);
        }
        Stmt::MultiAssign(items) => {
            for &item in items {
                infer_tree(ast, item.node(), scope);
            }
        }
        Stmt::If {
            branches,
            otherwise,
        } => {
            for branch in branches {
                infer_expr(ast, branch.cond, scope);
                infer_tree(ast, branch.body.node(), scope);
            }
            if let Some(otherwise) = otherwise {
                infer_tree(ast, otherwise.node(), scope);
            }
        }
        Stmt::Switch { subject, cases } => {
            infer_expr(ast, *subject, scope);
            for case in cases {
                infer_tree(ast, case.body.node(), scope);
            }
        }
        Stmt::While { cond, body } | Stmt::DoWhile { body, cond } => {
            infer_expr(ast, *cond, scope);
            infer_tree(ast, body.node(), scope);
        }
        Stmt::For {
            init,
            cond,
            update,
            body,
        } => in_frame(scope, |scope| {
            if let Some(init) = init {
                infer_tree(ast, *init, scope);
            }
            if let Some(cond) = cond {
                infer_expr(ast, *cond, scope);
            }
            if let Some(update) = update {
                infer_expr(ast, *update, scope);
            }
            infer_tree(ast, body.node(), scope);
        }),
        Stmt::RangeFor { var, range, body } => in_frame(scope, |scope| {
            let start = infer_expr(ast, range.start, scope);
            let stop = infer_expr(ast, range.stop, scope);
            let counter = start.wider(&stop).unwrap_or(Type::Int);
            scope.add_variable(var.clone(), counter);
            infer_tree(ast, body.node(), scope);
        }),
        Stmt::ForEach {
            var,
            ty,
            iterable,
            body,
        } => in_frame(scope, |scope| {
            let declared = ast.ty(*ty);
            let iterable = infer_expr(ast, *iterable, scope);
            let item = if declared.is_known() {
                declared.clone()
            } else {
                iterable.element().cloned().unwrap_or(Type::Unknown)
            };
            scope.add_variable(var.clone(), item);
            infer_tree(ast, body.node(), scope);
        }),
        Stmt::Infinite { body } => infer_tree(ast, body.node(), scope),
        Stmt::Return(Some(value)) | Stmt::Delete { target: value, .. } => {
            infer_expr(ast, *value, scope);
        }
        Stmt::Return(None) | Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Comment { .. } => {}
    }
}

/// Result type of a binary operator.
pub fn binary_type(op: BinaryOp, left: &Type, right: &Type) -> Type {
    if op.yields_bool() {
        return Type::Bool;
    }
    match op {
        BinaryOp::Add if matches!(left, Type::Str) || matches!(right, Type::Str) => Type::Str,
        BinaryOp::Mul if matches!((left, right), (Type::Str, Type::Int) | (Type::Int, Type::Str)) => {
            Type::Str
        }
        _ if op.is_arithmetic() => left.wider(right).unwrap_or(Type::Unknown),
        _ if op.is_bitwise() => match (left, right) {
            (Type::Int, Type::Int) => Type::Int,
            (Type::Bool, Type::Bool) if !matches!(op, BinaryOp::Shl | BinaryOp::Shr) => Type::Bool,
            _ => Type::Unknown,
        },
        _ => Type::Unknown,
    }
}

/// Result type of a unary operator.
pub fn unary_type(op: UnaryOp, operand: Type) -> Type {
    match op {
        UnaryOp::Not => Type::Bool,
        UnaryOp::Neg | UnaryOp::Plus if operand.is_numeric() => operand,
        UnaryOp::BitNot if matches!(operand, Type::Int) => Type::Int,
        UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec => operand,
        UnaryOp::AddressOf => Type::Pointer(Box::new(operand)),
        UnaryOp::Deref => match operand {
            Type::Pointer(inner) | Type::Reference(inner) => *inner,
            _ => Type::Unknown,
        },
        UnaryOp::Neg | UnaryOp::Plus | UnaryOp::BitNot => Type::Unknown,
    }
}

fn unify(a: Type, b: Type) -> Type {
    if a == b {
        return a;
    }
    a.wider(&b).unwrap_or(Type::Unknown)
}

fn common_type(ast: &Ast, items: &[ExprId], scope: &mut TypeScope) -> Type {
    items
        .iter()
        .map(|&item| infer_expr(ast, item, scope))
        .reduce(unify)
        .unwrap_or(Type::Unknown)
}

fn register(scope: &mut TypeScope, name: &str, ty: Type) {
    let keeps_known = !ty.is_known() && scope.variable_type(name).is_some_and(Type::is_known);
    if !keeps_known {
        tracing::trace!(name, %ty, "register variable type");
        scope.set_variable_type(name, ty);
    }
}

fn in_frame(scope: &mut TypeScope, body: impl FnOnce(&mut TypeScope)) {
    scope.enter();
    body(scope);
    // The frame is still open unless `body` left it.
    if let Err(err) = scope.leave(true) {
        tracing::trace!(%err, "inference frame already closed");
    }
}

#[cfg(test)]
mod tests;
