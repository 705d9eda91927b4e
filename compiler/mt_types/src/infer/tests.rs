#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use mt_ir::{Declarator, Modifiers, Param};
use pretty_assertions::assert_eq;

use super::*;

fn infer(ast: &Ast, id: ExprId) -> Type {
    infer_expr(ast, id, &mut TypeScope::new())
}

#[test]
fn test_literals_have_intrinsic_types() {
    let mut ast = Ast::new();
    let int = ast.int(1);
    let float = ast.float(1.5);
    let text = ast.string("hi");
    let flag = ast.boolean(true);
    assert_eq!(infer(&ast, int), Type::Int);
    assert_eq!(infer(&ast, float), Type::Float);
    assert_eq!(infer(&ast, text), Type::Str);
    assert_eq!(infer(&ast, flag), Type::Bool);
}

#[test]
fn test_unresolved_identifier_is_unknown() {
    let mut ast = Ast::new();
    let x = ast.ident("x");
    assert_eq!(infer(&ast, x), Type::Unknown);
}

#[test]
fn test_arithmetic_widens() {
    let mut ast = Ast::new();
    let one = ast.int(1);
    let two = ast.int(2);
    let half = ast.float(0.5);
    let ints = ast.binary(BinaryOp::Add, one, two);
    let mixed = ast.binary(BinaryOp::Mul, ints, half);
    assert_eq!(infer(&ast, ints), Type::Int);
    assert_eq!(infer(&ast, mixed), Type::Float);
}

#[test]
fn test_comparison_and_logic_are_bool() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.float(2.0);
    let lt = ast.binary(BinaryOp::Lt, a, b);
    let not = ast.unary(UnaryOp::Not, a);
    assert_eq!(infer(&ast, lt), Type::Bool);
    assert_eq!(infer(&ast, not), Type::Bool);
}

#[test]
fn test_string_concatenation() {
    let mut ast = Ast::new();
    let text = ast.string("n = ");
    let n = ast.int(3);
    let concat = ast.binary(BinaryOp::Add, text, n);
    assert_eq!(infer(&ast, concat), Type::Str);
}

#[test]
fn test_assignment_registers_type_in_current_frame() {
    let mut ast = Ast::new();
    let x = ast.ident("x");
    let one = ast.int(1);
    let assign = ast.alloc_expr(Expr::Assign {
        op: AssignOp::Assign,
        target: x,
        value: one,
    });

    let mut scope = TypeScope::new();
    scope.add_variable("x", Type::Unknown);
    scope.enter();
    assert_eq!(infer_expr(&ast, assign, &mut scope), Type::Int);
    assert!(scope.is_declared_locally("x"));
    assert_eq!(scope.variable_type("x"), Some(&Type::Int));
}

#[test]
fn test_unknown_does_not_overwrite_known() {
    let mut ast = Ast::new();
    let x = ast.ident("x");
    let call = ast.call("opaque", vec![]);
    let mut scope = TypeScope::new();
    scope.add_variable("x", Type::Str);
    assert_eq!(
        infer_assignment(&ast, AssignOp::Assign, x, call, &mut scope),
        Type::Unknown
    );
    assert_eq!(scope.variable_type("x"), Some(&Type::Str));
}

#[test]
fn test_augmented_assignment_combines_types() {
    let mut ast = Ast::new();
    let total = ast.ident("total");
    let half = ast.float(0.5);
    let mut scope = TypeScope::new();
    scope.add_variable("total", Type::Int);
    let ty = infer_assignment(&ast, AssignOp::Add, total, half, &mut scope);
    assert_eq!(ty, Type::Float);
    assert_eq!(scope.variable_type("total"), Some(&Type::Float));
}

#[test]
fn test_call_uses_recorded_return_type() {
    let mut ast = Ast::new();
    let call = ast.call("length", vec![]);
    let mut scope = TypeScope::new();
    assert_eq!(infer_expr(&ast, call, &mut scope), Type::Unknown);
    scope.add_method("length", Type::Int);
    assert_eq!(infer_expr(&ast, call, &mut scope), Type::Int);
}

#[test]
fn test_declare_prefers_declared_type() {
    let mut ast = Ast::new();
    let float = ast.alloc_type(Type::Float);
    let unknown = ast.alloc_type(Type::Unknown);
    let one = ast.int(1);
    let two = ast.int(2);
    let declared = ast
        .variable(
            float,
            vec![Declarator {
                name: "a".into(),
                init: Some(one),
            }],
            Modifiers::empty(),
        )
        .unwrap();
    let inferred = ast
        .variable(
            unknown,
            vec![Declarator {
                name: "b".into(),
                init: Some(two),
            }],
            Modifiers::empty(),
        )
        .unwrap();

    let mut scope = TypeScope::new();
    declare(&ast, declared, &mut scope);
    declare(&ast, inferred, &mut scope);
    assert_eq!(scope.variable_type("a"), Some(&Type::Float));
    assert_eq!(scope.variable_type("b"), Some(&Type::Int));
}

#[test]
fn test_infer_tree_scopes_function_bodies() {
    let mut ast = Ast::new();
    let int = ast.alloc_type(Type::Int);
    let bool_ty = ast.alloc_type(Type::Bool);
    let decl = ast.alloc_decl(Decl::Function {
        name: "is_big".into(),
        params: vec![Param {
            name: "n".into(),
            ty: int,
        }],
        ret: bool_ty,
        modifiers: Modifiers::empty(),
        owner: None,
    });
    let local = ast.ident("local");
    let n = ast.ident("n");
    let assign = ast.assign_stmt(local, n);
    let body = ast.block(vec![assign.node()]);
    let function = ast.alloc_def(Def::Function { decl, body });
    let program = ast.program(vec![function.node()], None, Some(function));

    let mut scope = TypeScope::new();
    infer_tree(&ast, program.node(), &mut scope);
    assert_eq!(scope.method_return_type("is_big"), Type::Bool);
    assert_eq!(scope.variable_type("local"), None);
    assert_eq!(scope.depth(), 0);
}

#[test]
fn test_frame_closed_by_body_leaves_scope_at_root() {
    let mut scope = TypeScope::new();
    in_frame(&mut scope, |scope| {
        scope.add_variable("x", Type::Int);
        scope.leave(true).unwrap();
    });
    assert_eq!(scope.depth(), 0);
    assert_eq!(scope.variable_type("x"), None);
}

#[test]
fn test_range_loop_variable_is_int() {
    let mut ast = Ast::new();
    let start = ast.int(0);
    let stop = ast.int(10);
    let i = ast.ident("i");
    let j = ast.ident("j");
    let copy = ast.assign_stmt(j, i);
    let body = ast.block(vec![copy.node()]);
    let outer_j = ast.ident("j");
    let after = ast.expr_stmt(outer_j);
    let range_for = ast.alloc_stmt(Stmt::RangeFor {
        var: "i".into(),
        range: mt_ir::Range {
            start,
            stop,
            step: None,
            inclusive: false,
            descending: false,
        },
        body,
    });
    let program = ast.program(vec![range_for.node(), after.node()], None, None);

    let mut scope = TypeScope::new();
    infer_tree(&ast, program.node(), &mut scope);
    assert_eq!(scope.variable_type("i"), None);
    assert_eq!(infer_expr(&ast, outer_j, &mut scope), Type::Unknown);
}

#[test]
fn test_index_yields_element_type() {
    let mut ast = Ast::new();
    let one = ast.int(1);
    let two = ast.int(2);
    let list = ast.alloc_expr(Expr::Collection {
        kind: CollectionKind::List,
        items: vec![one, two],
    });
    let zero = ast.int(0);
    let index = ast.alloc_expr(Expr::Index {
        target: list,
        index: zero,
    });
    assert_eq!(infer(&ast, list), Type::List(Box::new(Type::Int)));
    assert_eq!(infer(&ast, index), Type::Int);
}

#[test]
fn test_unary_rules() {
    assert_eq!(unary_type(UnaryOp::Neg, Type::Float), Type::Float);
    assert_eq!(unary_type(UnaryOp::Neg, Type::Str), Type::Unknown);
    assert_eq!(
        unary_type(UnaryOp::AddressOf, Type::Int),
        Type::Pointer(Box::new(Type::Int))
    );
    assert_eq!(
        unary_type(UnaryOp::Deref, Type::Pointer(Box::new(Type::Char))),
        Type::Char
    );
}
