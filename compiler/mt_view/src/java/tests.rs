#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use mt_ir::{Ast, Branch, Case, CaseKind, Param, Stmt};
use pretty_assertions::assert_eq;

use super::*;

fn program(mut ast: Ast, body: Vec<NodeId>) -> MeaningTree {
    let root = ast.program(body, None, None);
    MeaningTree::new(ast, root)
}

fn emit(tree: &MeaningTree, params: impl IntoIterator<Item = ConfigParameter>) -> String {
    JavaViewer::new(tree, &Config::new(params)).emit().unwrap()
}

fn expression(ast: Ast, expr: ExprId) -> Result<String, ViewError> {
    let tree = MeaningTree::new(ast, expr);
    JavaViewer::new(&tree, &Config::new([ConfigParameter::ExpressionMode(true)])).emit()
}

#[test]
fn test_tighter_operand_is_not_grouped() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.ident("b");
    let c = ast.ident("c");
    let mul = ast.binary(BinaryOp::Mul, a, b);
    let add = ast.binary(BinaryOp::Add, mul, c);
    assert_eq!(expression(ast, add).unwrap(), "a * b + c");
}

#[test]
fn test_explicit_grouping_is_kept() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.ident("b");
    let c = ast.ident("c");
    let add = ast.binary(BinaryOp::Add, a, b);
    let grouped = ast.paren(add);
    let mul = ast.binary(BinaryOp::Mul, grouped, c);
    assert_eq!(expression(ast, mul).unwrap(), "(a + b) * c");
}

#[test]
fn test_weaker_operand_is_grouped_without_source_parens() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.ident("b");
    let c = ast.ident("c");
    let sub = ast.binary(BinaryOp::Sub, b, c);
    let outer = ast.binary(BinaryOp::Sub, a, sub);
    assert_eq!(expression(ast, outer).unwrap(), "a - (b - c)");
}

#[test]
fn test_power_and_floor_division_become_math_calls() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.ident("b");
    let pow = ast.binary(BinaryOp::Pow, a, b);
    assert_eq!(expression(ast, pow).unwrap(), "Math.pow(a, b)");

    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.ident("b");
    let div = ast.binary(BinaryOp::FloorDiv, a, b);
    assert_eq!(expression(ast, div).unwrap(), "Math.floorDiv(a, b)");
}

#[test]
fn test_containment_is_unsupported() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let xs = ast.ident("xs");
    let contains = ast.binary(BinaryOp::Contains, a, xs);
    assert_eq!(
        expression(ast, contains),
        Err(ViewError::Unsupported {
            language: "java",
            construct: "operator `in`".to_owned(),
        })
    );
}

#[test]
fn test_list_literal() {
    let mut ast = Ast::new();
    let one = ast.int(1);
    let two = ast.int(2);
    let list = ast.alloc_expr(Expr::Collection {
        kind: CollectionKind::List,
        items: vec![one, two],
    });
    assert_eq!(expression(ast, list).unwrap(), "new ArrayList<>(List.of(1, 2))");
}

#[test]
fn test_first_assignment_declares() {
    let mut ast = Ast::new();
    let x = ast.ident("x");
    let one = ast.int(1);
    let first = ast.assign_stmt(x, one);
    let y = ast.ident("y");
    let x_ref = ast.ident("x");
    let two = ast.int(2);
    let sum = ast.binary(BinaryOp::Add, x_ref, two);
    let second = ast.assign_stmt(y, sum);
    let x_again = ast.ident("x");
    let five = ast.int(5);
    let third = ast.assign_stmt(x_again, five);
    let tree = program(ast, vec![first.into(), second.into(), third.into()]);
    assert_eq!(emit(&tree, []), "int x = 1;\nint y = x + 2;\nx = 5;\n");
}

#[test]
fn test_unknown_initializer_uses_var() {
    let mut ast = Ast::new();
    let x = ast.ident("x");
    let call = ast.call("compute", vec![]);
    let assign = ast.assign_stmt(x, call);
    let tree = program(ast, vec![assign.into()]);
    assert_eq!(emit(&tree, []), "var x = compute();\n");
}

#[test]
fn test_auto_declaration_can_be_disabled() {
    let mut ast = Ast::new();
    let x = ast.ident("x");
    let one = ast.int(1);
    let assign = ast.assign_stmt(x, one);
    let tree = program(ast, vec![assign.into()]);
    assert_eq!(
        emit(&tree, [ConfigParameter::AutoVariableDeclaration(false)]),
        "x = 1;\n"
    );
}

#[test]
fn test_translation_unit_wraps_statements_in_main() {
    let mut ast = Ast::new();
    let x = ast.ident("x");
    let one = ast.int(1);
    let assign = ast.assign_stmt(x, one);
    let tree = program(ast, vec![assign.into()]);
    assert_eq!(
        emit(&tree, [ConfigParameter::TranslationUnitMode(true)]),
        "public class Main {\n    public static void main(String[] args) {\n        int x = 1;\n    }\n}\n"
    );
}

#[test]
fn test_translation_unit_hoists_functions_as_static_members() {
    let mut ast = Ast::new();
    let int = ast.alloc_type(Type::Int);
    let decl = ast.alloc_decl(Decl::Function {
        name: "one".into(),
        params: vec![],
        ret: int,
        modifiers: Modifiers::empty(),
        owner: None,
    });
    let value = ast.int(1);
    let ret = ast.return_stmt(Some(value));
    let body = ast.block(vec![ret.into()]);
    let function = ast.alloc_def(Def::Function { decl, body });
    let x = ast.ident("x");
    let call = ast.call("one", vec![]);
    let assign = ast.assign_stmt(x, call);
    let tree = program(ast, vec![function.into(), assign.into()]);
    let expected = "\
public class Main {
    static int one() {
        return 1;
    }

    public static void main(String[] args) {
        int x = one();
    }
}
";
    assert_eq!(emit(&tree, [ConfigParameter::TranslationUnitMode(true)]), expected);
}

#[test]
fn test_function_signature() {
    let mut ast = Ast::new();
    let int = ast.alloc_type(Type::Int);
    let decl = ast.alloc_decl(Decl::Function {
        name: "add".into(),
        params: vec![
            Param {
                name: "a".into(),
                ty: int,
            },
            Param {
                name: "b".into(),
                ty: int,
            },
        ],
        ret: int,
        modifiers: Modifiers::PUBLIC | Modifiers::STATIC,
        owner: None,
    });
    let a = ast.ident("a");
    let b = ast.ident("b");
    let sum = ast.binary(BinaryOp::Add, a, b);
    let ret = ast.return_stmt(Some(sum));
    let body = ast.block(vec![ret.into()]);
    let function = ast.alloc_def(Def::Function { decl, body });
    let tree = program(ast, vec![function.into()]);
    assert_eq!(
        emit(&tree, []),
        "public static int add(int a, int b) {\n    return a + b;\n}\n"
    );
}

#[test]
fn test_if_else_brace_placement() {
    let build = || {
        let mut ast = Ast::new();
        let cond = ast.ident("ready");
        let go = ast.call("go", vec![]);
        let go = ast.expr_stmt(go);
        let then = ast.block(vec![go.into()]);
        let wait = ast.call("wait", vec![]);
        let wait = ast.expr_stmt(wait);
        let otherwise = ast.block(vec![wait.into()]);
        let stmt = ast
            .if_stmt(vec![Branch { cond, body: then }], Some(otherwise))
            .unwrap();
        program(ast, vec![stmt.into()])
    };
    assert_eq!(
        emit(&build(), []),
        "if (ready) {\n    go();\n} else {\n    wait();\n}\n"
    );
    assert_eq!(
        emit(&build(), [ConfigParameter::BracesOnSameLine(false)]),
        "if (ready)\n{\n    go();\n}\nelse\n{\n    wait();\n}\n"
    );
}

#[test]
fn test_switch_closes_cases_with_break() {
    let mut ast = Ast::new();
    let subject = ast.ident("x");
    let one = ast.int(1);
    let two = ast.int(2);
    let f = ast.call("f", vec![]);
    let f = ast.expr_stmt(f);
    let first = ast.block(vec![]);
    let second = ast.block(vec![f.into()]);
    let g = ast.call("g", vec![]);
    let g = ast.expr_stmt(g);
    let fallback = ast.block(vec![g.into()]);
    let switch = ast.alloc_stmt(Stmt::Switch {
        subject,
        cases: vec![
            Case {
                kind: CaseKind::Fallthrough(one),
                body: first,
            },
            Case {
                kind: CaseKind::Match(two),
                body: second,
            },
            Case {
                kind: CaseKind::Default,
                body: fallback,
            },
        ],
    });
    let tree = program(ast, vec![switch.into()]);
    let expected = "\
switch (x) {
    case 1:
    case 2:
        f();
        break;
    default:
        g();
}
";
    assert_eq!(emit(&tree, []), expected);
}

#[test]
fn test_for_each_over_unknown_iterable_uses_var() {
    let mut ast = Ast::new();
    let xs = ast.ident("xs");
    let item = ast.ident("item");
    let call = ast.call("print", vec![item]);
    let call = ast.expr_stmt(call);
    let body = ast.block(vec![call.into()]);
    let unknown = ast.alloc_type(Type::Unknown);
    let each = ast.alloc_stmt(Stmt::ForEach {
        var: "item".into(),
        ty: unknown,
        iterable: xs,
        body,
    });
    let tree = program(ast, vec![each.into()]);
    assert_eq!(
        emit(&tree, []),
        "for (var item : xs) {\n    print(item);\n}\n"
    );
}

#[test]
fn test_delete_is_unsupported() {
    let mut ast = Ast::new();
    let p = ast.ident("p");
    let delete = ast.alloc_stmt(Stmt::Delete {
        target: p,
        array: false,
    });
    let tree = program(ast, vec![delete.into()]);
    let err = JavaViewer::new(&tree, &Config::default()).emit().unwrap_err();
    assert_eq!(err.to_string(), "java has no rendering for delete");
}

#[test]
fn test_imports_and_package() {
    let mut ast = Ast::new();
    let package = ast.alloc_decl(Decl::Package(vec!["com".into(), "example".into()]));
    let import = ast.alloc_decl(Decl::Import {
        path: vec!["java".into(), "util".into()],
        items: ImportItems::All,
        is_static: false,
    });
    let tree = program(ast, vec![package.into(), import.into()]);
    assert_eq!(emit(&tree, []), "package com.example;\nimport java.util.*;\n");
}
