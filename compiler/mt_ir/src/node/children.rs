//! Child enumeration and identity erasure.
//!
//! Both matches are exhaustive so a new node kind cannot be added without
//! deciding which of its fields are owned children and which are soft
//! references.

use super::{CaseKind, Decl, Def, Expr, Node, Stmt};
use crate::{DeclId, DefId, ExprId, NodeId, StmtId, TypeId};

impl Node {
    /// Visit owned children in source order with the name of the field
    /// holding each. Soft references are not children.
    pub fn for_each_child(&self, mut f: impl FnMut(NodeId, &'static str)) {
        match self {
            Node::Expr(expr) => expr_children(expr, &mut f),
            Node::Stmt(stmt) => stmt_children(stmt, &mut f),
            Node::Decl(decl) => decl_children(decl, &mut f),
            Node::Def(def) => def_children(def, &mut f),
            Node::Type(_) => {}
        }
    }

    /// A copy with every stored identity replaced by `INVALID`.
    ///
    /// Optional references keep their presence, so two skeletons compare
    /// equal exactly when the nodes agree on everything but identities.
    pub(crate) fn erased(&self) -> Node {
        let mut node = self.clone();
        match &mut node {
            Node::Expr(expr) => erase_expr(expr),
            Node::Stmt(stmt) => erase_stmt(stmt),
            Node::Decl(decl) => erase_decl(decl),
            Node::Def(def) => erase_def(def),
            Node::Type(_) => {}
        }
        node
    }
}

fn expr_children(expr: &Expr, f: &mut impl FnMut(NodeId, &'static str)) {
    match expr {
        Expr::Int(_)
        | Expr::Float(_)
        | Expr::Bool(_)
        | Expr::Char(_)
        | Expr::Str { .. }
        | Expr::Null
        | Expr::Ident(_)
        | Expr::Scoped(_)
        | Expr::SelfRef
        | Expr::SuperRef => {}
        Expr::Interpolated(parts) => each(parts, "parts", f),
        Expr::Collection { items, .. } => each(items, "items", f),
        Expr::CompoundComparison(items) => each(items, "comparisons", f),
        Expr::Sequence(items) => each(items, "items", f),
        Expr::Dict(entries) => {
            for (key, value) in entries {
                each(&[*key], "key", f);
                each(&[*value], "value", f);
            }
        }
        Expr::Binary { left, right, .. } => {
            each(&[*left], "left", f);
            each(&[*right], "right", f);
        }
        Expr::Unary { operand, .. } => each(&[*operand], "operand", f),
        Expr::Assign { target, value, .. } => {
            each(&[*target], "target", f);
            each(&[*value], "value", f);
        }
        Expr::Ternary {
            cond,
            then,
            otherwise,
        } => {
            each(&[*cond], "cond", f);
            each(&[*then], "then", f);
            each(&[*otherwise], "otherwise", f);
        }
        Expr::Paren(inner) => each(&[*inner], "inner", f),
        Expr::SizeOf(inner) => each(&[*inner], "value", f),
        Expr::Call { callee, args } => {
            each(&[*callee], "callee", f);
            each(args, "args", f);
        }
        Expr::MethodCall { receiver, args, .. } => {
            each(&[*receiver], "receiver", f);
            each(args, "args", f);
        }
        Expr::Index { target, index } => {
            each(&[*target], "target", f);
            each(&[*index], "index", f);
        }
        Expr::Member { target, .. } => each(&[*target], "target", f),
        Expr::Cast { ty, value } => {
            f(ty.node(), "type");
            f(value.node(), "value");
        }
        Expr::New { ty, args } => {
            f(ty.node(), "type");
            args.iter().for_each(|id| f(id.node(), "args"));
        }
        Expr::NewArray { ty, dims, init } => {
            f(ty.node(), "type");
            dims.iter().for_each(|id| f(id.node(), "dims"));
            if let Some(init) = init {
                f(init.node(), "init");
            }
        }
    }
}

fn stmt_children(stmt: &Stmt, f: &mut impl FnMut(NodeId, &'static str)) {
    match stmt {
        Stmt::Block(items) => items.iter().for_each(|id| f(*id, "body")),
        Stmt::Expr(expr) => f(expr.node(), "expr"),
        Stmt::Assign { target, value, .. } => {
            f(target.node(), "target");
            f(value.node(), "value");
        }
        Stmt::MultiAssign(items) => items.iter().for_each(|id| f(id.node(), "assignments")),
        Stmt::If {
            branches,
            otherwise,
        } => {
            for branch in branches {
                f(branch.cond.node(), "cond");
                f(branch.body.node(), "then");
            }
            if let Some(otherwise) = otherwise {
                f(otherwise.node(), "otherwise");
            }
        }
        Stmt::Switch { subject, cases } => {
            f(subject.node(), "subject");
            for case in cases {
                match case.kind {
                    CaseKind::Match(value) | CaseKind::Fallthrough(value) => {
                        f(value.node(), "case");
                    }
                    CaseKind::Default => {}
                }
                f(case.body.node(), "case_body");
            }
        }
        Stmt::While { cond, body } => {
            f(cond.node(), "cond");
            f(body.node(), "body");
        }
        Stmt::DoWhile { body, cond } => {
            f(body.node(), "body");
            f(cond.node(), "cond");
        }
        Stmt::For {
            init,
            cond,
            update,
            body,
        } => {
            if let Some(init) = init {
                f(*init, "init");
            }
            if let Some(cond) = cond {
                f(cond.node(), "cond");
            }
            if let Some(update) = update {
                f(update.node(), "update");
            }
            f(body.node(), "body");
        }
        Stmt::RangeFor { range, body, .. } => {
            f(range.start.node(), "start");
            f(range.stop.node(), "stop");
            if let Some(step) = range.step {
                f(step.node(), "step");
            }
            f(body.node(), "body");
        }
        Stmt::ForEach {
            ty, iterable, body, ..
        } => {
            f(ty.node(), "type");
            f(iterable.node(), "iterable");
            f(body.node(), "body");
        }
        Stmt::Infinite { body } => f(body.node(), "body"),
        Stmt::Return(value) => {
            if let Some(value) = value {
                f(value.node(), "value");
            }
        }
        Stmt::Delete { target, .. } => f(target.node(), "target"),
        Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Comment { .. } => {}
    }
}

fn decl_children(decl: &Decl, f: &mut impl FnMut(NodeId, &'static str)) {
    match decl {
        Decl::Variable {
            ty, declarators, ..
        } => {
            f(ty.node(), "type");
            for declarator in declarators {
                if let Some(init) = declarator.init {
                    f(init.node(), "init");
                }
            }
        }
        Decl::Function { params, ret, .. } => {
            params.iter().for_each(|p| f(p.ty.node(), "params"));
            f(ret.node(), "return_type");
        }
        Decl::Class { parents, .. } => parents.iter().for_each(|p| f(p.node(), "parents")),
        Decl::Import { .. } | Decl::Package(_) | Decl::Include { .. } => {}
    }
}

fn def_children(def: &Def, f: &mut impl FnMut(NodeId, &'static str)) {
    match def {
        Def::Program { body, .. } => body.iter().for_each(|id| f(*id, "body")),
        Def::Function { decl, body } => {
            f(decl.node(), "declaration");
            f(body.node(), "body");
        }
        Def::Class { decl, members } => {
            f(decl.node(), "declaration");
            members.iter().for_each(|id| f(*id, "members"));
        }
    }
}

fn each(ids: &[ExprId], field: &'static str, f: &mut impl FnMut(NodeId, &'static str)) {
    ids.iter().for_each(|id| f(id.node(), field));
}

fn erase_all(ids: &mut [ExprId]) {
    ids.iter_mut().for_each(|id| *id = ExprId::INVALID);
}

fn erase_expr(expr: &mut Expr) {
    match expr {
        Expr::Int(_)
        | Expr::Float(_)
        | Expr::Bool(_)
        | Expr::Char(_)
        | Expr::Str { .. }
        | Expr::Null
        | Expr::Ident(_)
        | Expr::Scoped(_)
        | Expr::SelfRef
        | Expr::SuperRef => {}
        Expr::Interpolated(items)
        | Expr::Collection { items, .. }
        | Expr::CompoundComparison(items)
        | Expr::Sequence(items) => erase_all(items),
        Expr::Dict(entries) => {
            for entry in entries {
                *entry = (ExprId::INVALID, ExprId::INVALID);
            }
        }
        Expr::Binary { left, right, .. } => {
            *left = ExprId::INVALID;
            *right = ExprId::INVALID;
        }
        Expr::Assign { target, value, .. } => {
            *target = ExprId::INVALID;
            *value = ExprId::INVALID;
        }
        Expr::Index { target, index } => {
            *target = ExprId::INVALID;
            *index = ExprId::INVALID;
        }
        Expr::Unary { operand: inner, .. }
        | Expr::Paren(inner)
        | Expr::SizeOf(inner)
        | Expr::Member { target: inner, .. } => *inner = ExprId::INVALID,
        Expr::Ternary {
            cond,
            then,
            otherwise,
        } => {
            *cond = ExprId::INVALID;
            *then = ExprId::INVALID;
            *otherwise = ExprId::INVALID;
        }
        Expr::Call { callee, args } => {
            *callee = ExprId::INVALID;
            erase_all(args);
        }
        Expr::MethodCall { receiver, args, .. } => {
            *receiver = ExprId::INVALID;
            erase_all(args);
        }
        Expr::Cast { ty, value } => {
            *ty = TypeId::INVALID;
            *value = ExprId::INVALID;
        }
        Expr::New { ty, args } => {
            *ty = TypeId::INVALID;
            erase_all(args);
        }
        Expr::NewArray { ty, dims, init } => {
            *ty = TypeId::INVALID;
            erase_all(dims);
            if let Some(init) = init {
                *init = ExprId::INVALID;
            }
        }
    }
}

fn erase_stmt(stmt: &mut Stmt) {
    match stmt {
        Stmt::Block(items) => items.iter_mut().for_each(|id| *id = NodeId::INVALID),
        Stmt::Expr(expr) => *expr = ExprId::INVALID,
        Stmt::Assign { target, value, .. } => {
            *target = ExprId::INVALID;
            *value = ExprId::INVALID;
        }
        Stmt::MultiAssign(items) => items.iter_mut().for_each(|id| *id = StmtId::INVALID),
        Stmt::If {
            branches,
            otherwise,
        } => {
            for branch in branches {
                branch.cond = ExprId::INVALID;
                branch.body = StmtId::INVALID;
            }
            if let Some(otherwise) = otherwise {
                *otherwise = StmtId::INVALID;
            }
        }
        Stmt::Switch { subject, cases } => {
            *subject = ExprId::INVALID;
            for case in cases {
                match &mut case.kind {
                    CaseKind::Match(value) | CaseKind::Fallthrough(value) => {
                        *value = ExprId::INVALID;
                    }
                    CaseKind::Default => {}
                }
                case.body = StmtId::INVALID;
            }
        }
        Stmt::While { cond, body } | Stmt::DoWhile { body, cond } => {
            *cond = ExprId::INVALID;
            *body = StmtId::INVALID;
        }
        Stmt::For {
            init,
            cond,
            update,
            body,
        } => {
            if let Some(init) = init {
                *init = NodeId::INVALID;
            }
            if let Some(cond) = cond {
                *cond = ExprId::INVALID;
            }
            if let Some(update) = update {
                *update = ExprId::INVALID;
            }
            *body = StmtId::INVALID;
        }
        Stmt::RangeFor { range, body, .. } => {
            range.start = ExprId::INVALID;
            range.stop = ExprId::INVALID;
            if let Some(step) = &mut range.step {
                *step = ExprId::INVALID;
            }
            *body = StmtId::INVALID;
        }
        Stmt::ForEach {
            ty, iterable, body, ..
        } => {
            *ty = TypeId::INVALID;
            *iterable = ExprId::INVALID;
            *body = StmtId::INVALID;
        }
        Stmt::Infinite { body } => *body = StmtId::INVALID,
        Stmt::Break { target } | Stmt::Continue { target } => {
            if let Some(target) = target {
                *target = StmtId::INVALID;
            }
        }
        Stmt::Return(value) => {
            if let Some(value) = value {
                *value = ExprId::INVALID;
            }
        }
        Stmt::Delete { target, .. } => *target = ExprId::INVALID,
        Stmt::Comment { .. } => {}
    }
}

fn erase_decl(decl: &mut Decl) {
    match decl {
        Decl::Variable {
            ty, declarators, ..
        } => {
            *ty = TypeId::INVALID;
            for declarator in declarators {
                if let Some(init) = &mut declarator.init {
                    *init = ExprId::INVALID;
                }
            }
        }
        Decl::Function {
            params, ret, owner, ..
        } => {
            params.iter_mut().for_each(|p| p.ty = TypeId::INVALID);
            *ret = TypeId::INVALID;
            if let Some(owner) = owner {
                *owner = DefId::INVALID;
            }
        }
        Decl::Class { parents, .. } => parents.iter_mut().for_each(|p| *p = TypeId::INVALID),
        Decl::Import { .. } | Decl::Package(_) | Decl::Include { .. } => {}
    }
}

fn erase_def(def: &mut Def) {
    match def {
        Def::Program {
            body,
            main_class,
            entry_point,
        } => {
            body.iter_mut().for_each(|id| *id = NodeId::INVALID);
            if let Some(main_class) = main_class {
                *main_class = DefId::INVALID;
            }
            if let Some(entry_point) = entry_point {
                *entry_point = DefId::INVALID;
            }
        }
        Def::Function { decl, body } => {
            *decl = DeclId::INVALID;
            *body = StmtId::INVALID;
        }
        Def::Class { decl, members } => {
            *decl = DeclId::INVALID;
            members.iter_mut().for_each(|id| *id = NodeId::INVALID);
        }
    }
}
