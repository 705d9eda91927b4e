#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use mt_ir::{Branch, Case, CaseKind, Declarator, Param};
use pretty_assertions::assert_eq;

use super::*;

fn program(mut ast: Ast, body: Vec<NodeId>) -> MeaningTree {
    let root = ast.program(body, None, None);
    MeaningTree::new(ast, root)
}

/// Emit with translation unit mode off, so statements stay at top level.
fn emit(tree: &MeaningTree, params: impl IntoIterator<Item = ConfigParameter>) -> String {
    let config = Config::new([ConfigParameter::TranslationUnitMode(false)]).merge(&Config::new(params));
    PythonViewer::new(tree, &config).emit().unwrap()
}

fn expression(ast: Ast, expr: ExprId) -> Result<String, ViewError> {
    let tree = MeaningTree::new(ast, expr);
    PythonViewer::new(&tree, &Config::new([ConfigParameter::ExpressionMode(true)])).emit()
}

fn call_stmt(ast: &mut Ast, name: &str) -> NodeId {
    let call = ast.call(name, vec![]);
    ast.expr_stmt(call).into()
}

#[test]
fn test_operators_use_python_spelling() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.ident("b");
    let c = ast.ident("c");
    let and = ast.binary(BinaryOp::And, a, b);
    let not = ast.unary(UnaryOp::Not, c);
    let or = ast.binary(BinaryOp::Or, and, not);
    assert_eq!(expression(ast, or).unwrap(), "a and b or not c");
}

#[test]
fn test_null_comparison_uses_identity() {
    let mut ast = Ast::new();
    let x = ast.ident("x");
    let null = ast.null();
    let eq = ast.binary(BinaryOp::NotEq, x, null);
    assert_eq!(expression(ast, eq).unwrap(), "x is not None");
}

#[test]
fn test_and_of_adjacent_comparisons_chains() {
    let build = || {
        let mut ast = Ast::new();
        let a = ast.ident("a");
        let b = ast.ident("b");
        let b_again = ast.ident("b");
        let c = ast.ident("c");
        let lt = ast.binary(BinaryOp::Lt, a, b);
        let le = ast.binary(BinaryOp::LtEq, b_again, c);
        let and = ast.binary(BinaryOp::And, lt, le);
        (ast, and)
    };
    let (ast, and) = build();
    assert_eq!(expression(ast, and).unwrap(), "a < b <= c");

    let (ast, and) = build();
    let tree = MeaningTree::new(ast, and);
    let config = Config::new([
        ConfigParameter::ExpressionMode(true),
        ConfigParameter::DisableCompoundComparisonConversion(true),
    ]);
    assert_eq!(
        PythonViewer::new(&tree, &config).emit().unwrap(),
        "a < b and b <= c"
    );
}

#[test]
fn test_unrelated_comparisons_do_not_chain() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.ident("b");
    let c = ast.ident("c");
    let d = ast.ident("d");
    let lt = ast.binary(BinaryOp::Lt, a, b);
    let gt = ast.binary(BinaryOp::Gt, c, d);
    let and = ast.binary(BinaryOp::And, lt, gt);
    assert_eq!(expression(ast, and).unwrap(), "a < b and c > d");
}

#[test]
fn test_ternary_puts_value_first() {
    let mut ast = Ast::new();
    let cond = ast.ident("ok");
    let then = ast.int(1);
    let otherwise = ast.int(2);
    let ternary = ast.alloc_expr(Expr::Ternary {
        cond,
        then,
        otherwise,
    });
    assert_eq!(expression(ast, ternary).unwrap(), "1 if ok else 2");
}

#[test]
fn test_increment_inside_expression_becomes_walrus() {
    let mut ast = Ast::new();
    let i = ast.ident("i");
    let inc = ast.unary(UnaryOp::PreInc, i);
    let call = ast.call("f", vec![inc]);
    let stmt = ast.expr_stmt(call);
    let tree = program(ast, vec![stmt.into()]);
    assert_eq!(emit(&tree, []), "f((i := i + 1))\n");
}

#[test]
fn test_increment_statement_becomes_augmented_assignment() {
    let mut ast = Ast::new();
    let i = ast.ident("i");
    let dec = ast.unary(UnaryOp::PostDec, i);
    let stmt = ast.expr_stmt(dec);
    let tree = program(ast, vec![stmt.into()]);
    assert_eq!(emit(&tree, []), "i -= 1\n");
}

#[test]
fn test_assignment_expression_in_condition() {
    let mut ast = Ast::new();
    let line = ast.ident("line");
    let read = ast.call("read", vec![]);
    let assign = ast.alloc_expr(Expr::Assign {
        op: AssignOp::Assign,
        target: line,
        value: read,
    });
    let body = ast.block(vec![]);
    let loop_ = ast.alloc_stmt(Stmt::While { cond: assign, body });
    let tree = program(ast, vec![loop_.into()]);
    assert_eq!(emit(&tree, []), "while line := read():\n    pass\n");
}

#[test]
fn test_annotated_declaration_when_enabled() {
    let mut ast = Ast::new();
    let x = ast.ident("x");
    let one = ast.int(1);
    let first = ast.assign_stmt(x, one);
    let x_again = ast.ident("x");
    let two = ast.int(2);
    let second = ast.assign_stmt(x_again, two);
    let tree = program(ast, vec![first.into(), second.into()]);
    assert_eq!(
        emit(&tree, [ConfigParameter::AutoVariableDeclaration(true)]),
        "x: int = 1\nx = 2\n"
    );
}

#[test]
fn test_translation_unit_adds_main_guard() {
    let mut ast = Ast::new();
    let print = call_stmt(&mut ast, "hello");
    let tree = program(ast, vec![print]);
    let out = PythonViewer::new(&tree, &Config::default()).emit().unwrap();
    let expected = "\
def main():
    hello()

if __name__ == \"__main__\":
    main()
";
    assert_eq!(out, expected);
}

#[test]
fn test_entry_point_is_called_from_guard() {
    let mut ast = Ast::new();
    let void = ast.alloc_type(Type::Void);
    let decl = ast.alloc_decl(Decl::Function {
        name: "run".into(),
        params: vec![],
        ret: void,
        modifiers: Modifiers::empty(),
        owner: None,
    });
    let body = ast.block(vec![]);
    let run = ast.alloc_def(Def::Function { decl, body });
    let root = ast.program(vec![run.into()], None, Some(run));
    let tree = MeaningTree::new(ast, root);
    let out = PythonViewer::new(&tree, &Config::default()).emit().unwrap();
    let expected = "\
def run() -> None:
    pass

if __name__ == \"__main__\":
    run()
";
    assert_eq!(out, expected);
}

#[test]
fn test_method_takes_self_and_hints() {
    let mut ast = Ast::new();
    let class_decl = ast.alloc_decl(Decl::Class {
        name: "Counter".into(),
        parents: vec![],
        modifiers: Modifiers::empty(),
    });
    let int = ast.alloc_type(Type::Int);
    let class = ast.alloc_def(Def::Class {
        decl: class_decl,
        members: vec![],
    });
    let decl = ast.alloc_decl(Decl::Function {
        name: "add".into(),
        params: vec![Param {
            name: "n".into(),
            ty: int,
        }],
        ret: int,
        modifiers: Modifiers::empty(),
        owner: Some(class),
    });
    let n = ast.ident("n");
    let ret = ast.return_stmt(Some(n));
    let body = ast.block(vec![ret.into()]);
    let method = ast.alloc_def(Def::Function { decl, body });
    let tree = MeaningTree::new(ast, method);
    assert_eq!(
        emit(&tree, []),
        "def add(self, n: int) -> int:\n    return n\n"
    );
}

#[test]
fn test_counting_for_becomes_range() {
    let mut ast = Ast::new();
    let int = ast.alloc_type(Type::Int);
    let zero = ast.int(0);
    let init = ast
        .variable(
            int,
            vec![Declarator {
                name: "i".into(),
                init: Some(zero),
            }],
            Modifiers::empty(),
        )
        .unwrap();
    let i = ast.ident("i");
    let n = ast.ident("n");
    let cond = ast.binary(BinaryOp::Lt, i, n);
    let i_again = ast.ident("i");
    let update = ast.unary(UnaryOp::PostInc, i_again);
    let i_ref = ast.ident("i");
    let print = ast.call("print", vec![i_ref]);
    let print = ast.expr_stmt(print);
    let body = ast.block(vec![print.into()]);
    let for_ = ast.alloc_stmt(Stmt::For {
        init: Some(init.into()),
        cond: Some(cond),
        update: Some(update),
        body,
    });
    let tree = program(ast, vec![for_.into()]);
    assert_eq!(emit(&tree, []), "for i in range(n):\n    print(i)\n");
}

#[test]
fn test_descending_inclusive_range() {
    let mut ast = Ast::new();
    let start = ast.int(10);
    let stop = ast.int(1);
    let body = ast.block(vec![]);
    let range = ast.alloc_stmt(Stmt::RangeFor {
        var: "i".into(),
        range: Range {
            start,
            stop,
            step: None,
            inclusive: true,
            descending: true,
        },
        body,
    });
    let tree = program(ast, vec![range.into()]);
    assert_eq!(emit(&tree, []), "for i in range(10, 0, -1):\n    pass\n");
}

#[test]
fn test_irregular_for_becomes_while() {
    let mut ast = Ast::new();
    let i = ast.ident("i");
    let one = ast.int(1);
    let init = ast.assign_stmt(i, one);
    let i_cond = ast.ident("i");
    let limit = ast.int(100);
    let cond = ast.binary(BinaryOp::Lt, i_cond, limit);
    let i_target = ast.ident("i");
    let two = ast.int(2);
    let update = ast.alloc_expr(Expr::Assign {
        op: AssignOp::Mul,
        target: i_target,
        value: two,
    });
    let body = ast.block(vec![]);
    let for_ = ast.alloc_stmt(Stmt::For {
        init: Some(init.into()),
        cond: Some(cond),
        update: Some(update),
        body,
    });
    let tree = program(ast, vec![for_.into()]);
    assert_eq!(emit(&tree, []), "i = 1\nwhile i < 100:\n    i *= 2\n");
}

#[test]
fn test_do_while_breaks_on_negated_condition() {
    let mut ast = Ast::new();
    let step = call_stmt(&mut ast, "step");
    let body = ast.block(vec![step]);
    let a = ast.ident("a");
    let b = ast.ident("b");
    let cond = ast.binary(BinaryOp::Lt, a, b);
    let loop_ = ast.alloc_stmt(Stmt::DoWhile { body, cond });
    let tree = program(ast, vec![loop_.into()]);
    assert_eq!(
        emit(&tree, []),
        "while True:\n    step()\n    if not a < b:\n        break\n"
    );
}

/// `if <name>: continue` as a one-statement block.
fn continue_if(ast: &mut Ast, name: &str) -> StmtId {
    let cond = ast.ident(name);
    let cont = ast.alloc_stmt(Stmt::Continue { target: None });
    let then = ast.block(vec![cont.into()]);
    let branch = ast.if_stmt(vec![Branch { cond, body: then }], None).unwrap();
    ast.block(vec![branch.into()])
}

#[test]
fn test_continue_in_lowered_for_runs_the_update() {
    let mut ast = Ast::new();
    let i = ast.ident("i");
    let zero = ast.int(0);
    let init = ast.assign_stmt(i, zero);
    let i_cond = ast.ident("i");
    let n = ast.ident("n");
    let limit = ast.call("f", vec![n]);
    let cond = ast.binary(BinaryOp::Lt, i_cond, limit);
    let i_target = ast.ident("i");
    let two = ast.int(2);
    let update = ast.alloc_expr(Expr::Assign {
        op: AssignOp::Mul,
        target: i_target,
        value: two,
    });
    let body = continue_if(&mut ast, "c");
    let for_ = ast.alloc_stmt(Stmt::For {
        init: Some(init.into()),
        cond: Some(cond),
        update: Some(update),
        body,
    });
    let tree = program(ast, vec![for_.into()]);
    let expected = "\
i = 0
while i < f(n):
    if c:
        i *= 2
        continue
    i *= 2
";
    assert_eq!(emit(&tree, []), expected);
}

#[test]
fn test_continue_in_do_while_checks_the_condition() {
    let mut ast = Ast::new();
    let body = continue_if(&mut ast, "c");
    let cond = ast.ident("d");
    let loop_ = ast.alloc_stmt(Stmt::DoWhile { body, cond });
    let tree = program(ast, vec![loop_.into()]);
    let expected = "\
while True:
    if c:
        if not d:
            break
        continue
    if not d:
        break
";
    assert_eq!(emit(&tree, []), expected);
}

#[test]
fn test_continue_in_nested_plain_loop_is_left_alone() {
    let mut ast = Ast::new();
    let inner_body = continue_if(&mut ast, "c");
    let inner_cond = ast.ident("more");
    let inner = ast.alloc_stmt(Stmt::While {
        cond: inner_cond,
        body: inner_body,
    });
    let body = ast.block(vec![inner.into()]);
    let cond = ast.ident("d");
    let loop_ = ast.alloc_stmt(Stmt::DoWhile { body, cond });
    let tree = program(ast, vec![loop_.into()]);
    let expected = "\
while True:
    while more:
        if c:
            continue
    if not d:
        break
";
    assert_eq!(emit(&tree, []), expected);
}

#[test]
fn test_counter_written_in_body_keeps_while_loop() {
    let mut ast = Ast::new();
    let i = ast.ident("i");
    let zero = ast.int(0);
    let init = ast.assign_stmt(i, zero);
    let i_cond = ast.ident("i");
    let n = ast.ident("n");
    let cond = ast.binary(BinaryOp::Lt, i_cond, n);
    let i_update = ast.ident("i");
    let update = ast.unary(UnaryOp::PostInc, i_update);
    let i_body = ast.ident("i");
    let two = ast.int(2);
    let skip = ast.alloc_stmt(Stmt::Assign {
        op: AssignOp::Add,
        target: i_body,
        value: two,
    });
    let body = ast.block(vec![skip.into()]);
    let for_ = ast.alloc_stmt(Stmt::For {
        init: Some(init.into()),
        cond: Some(cond),
        update: Some(update),
        body,
    });
    let tree = program(ast, vec![for_.into()]);
    assert_eq!(
        emit(&tree, []),
        "i = 0\nwhile i < n:\n    i += 2\n    i += 1\n"
    );
}

#[test]
fn test_bound_written_in_body_keeps_while_loop() {
    let mut ast = Ast::new();
    let i = ast.ident("i");
    let zero = ast.int(0);
    let init = ast.assign_stmt(i, zero);
    let i_cond = ast.ident("i");
    let n = ast.ident("n");
    let cond = ast.binary(BinaryOp::Lt, i_cond, n);
    let i_update = ast.ident("i");
    let update = ast.unary(UnaryOp::PostInc, i_update);
    let n_body = ast.ident("n");
    let shrink = ast.unary(UnaryOp::PostDec, n_body);
    let shrink = ast.expr_stmt(shrink);
    let body = ast.block(vec![shrink.into()]);
    let for_ = ast.alloc_stmt(Stmt::For {
        init: Some(init.into()),
        cond: Some(cond),
        update: Some(update),
        body,
    });
    let tree = program(ast, vec![for_.into()]);
    assert_eq!(
        emit(&tree, []),
        "i = 0\nwhile i < n:\n    n -= 1\n    i += 1\n"
    );
}

#[test]
fn test_walrus_outside_conditions_is_grouped() {
    let mut ast = Ast::new();
    let x = ast.ident("x");
    let five = ast.int(5);
    let assign = ast.alloc_expr(Expr::Assign {
        op: AssignOp::Assign,
        target: x,
        value: five,
    });
    let ret = ast.return_stmt(Some(assign));
    let tree = program(ast, vec![ret.into()]);
    assert_eq!(emit(&tree, []), "return (x := 5)\n");

    let mut ast = Ast::new();
    let y = ast.ident("y");
    let x = ast.ident("x");
    let two = ast.int(2);
    let assign = ast.alloc_expr(Expr::Assign {
        op: AssignOp::Pow,
        target: x,
        value: two,
    });
    let sum = ast.binary(BinaryOp::Add, y, assign);
    assert_eq!(expression(ast, sum).unwrap(), "y + (x := x ** 2)");

    let mut ast = Ast::new();
    let x = ast.ident("x");
    let one = ast.int(1);
    let assign = ast.alloc_expr(Expr::Assign {
        op: AssignOp::Assign,
        target: x,
        value: one,
    });
    let call = ast.call("f", vec![assign]);
    assert_eq!(expression(ast, call).unwrap(), "f(x := 1)");
}

#[test]
fn test_switch_becomes_match() {
    let mut ast = Ast::new();
    let subject = ast.ident("x");
    let one = ast.int(1);
    let two = ast.int(2);
    let empty = ast.block(vec![]);
    let f = call_stmt(&mut ast, "f");
    let brk = ast.alloc_stmt(Stmt::Break { target: None });
    let second = ast.block(vec![f, brk.into()]);
    let g = call_stmt(&mut ast, "g");
    let fallback = ast.block(vec![g]);
    let switch = ast.alloc_stmt(Stmt::Switch {
        subject,
        cases: vec![
            Case {
                kind: CaseKind::Fallthrough(one),
                body: empty,
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
match x:
    case 1 | 2:
        f()
    case _:
        g()
";
    assert_eq!(emit(&tree, []), expected);
}

#[test]
fn test_elif_chain() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.ident("b");
    let f = call_stmt(&mut ast, "f");
    let first = ast.block(vec![f]);
    let second = ast.block(vec![]);
    let g = call_stmt(&mut ast, "g");
    let otherwise = ast.block(vec![g]);
    let stmt = ast
        .if_stmt(
            vec![
                Branch {
                    cond: a,
                    body: first,
                },
                Branch {
                    cond: b,
                    body: second,
                },
            ],
            Some(otherwise),
        )
        .unwrap();
    let tree = program(ast, vec![stmt.into()]);
    assert_eq!(
        emit(&tree, []),
        "if a:\n    f()\nelif b:\n    pass\nelse:\n    g()\n"
    );
}

#[test]
fn test_collections() {
    let mut ast = Ast::new();
    let one = ast.int(1);
    let tuple = ast.alloc_expr(Expr::Collection {
        kind: CollectionKind::Tuple,
        items: vec![one],
    });
    assert_eq!(expression(ast, tuple).unwrap(), "(1,)");

    let mut ast = Ast::new();
    let set = ast.alloc_expr(Expr::Collection {
        kind: CollectionKind::Set,
        items: vec![],
    });
    assert_eq!(expression(ast, set).unwrap(), "set()");

    let mut ast = Ast::new();
    let key = ast.string("k");
    let value = ast.boolean(true);
    let dict = ast.alloc_expr(Expr::Dict(vec![(key, value)]));
    assert_eq!(expression(ast, dict).unwrap(), "{\"k\": True}");
}

#[test]
fn test_interpolation_becomes_f_string() {
    let mut ast = Ast::new();
    let hello = ast.string("hi {");
    let name = ast.ident("name");
    let interpolated = ast.alloc_expr(Expr::Interpolated(vec![hello, name]));
    assert_eq!(expression(ast, interpolated).unwrap(), "f\"hi {{{name}\"");
}

#[test]
fn test_pointer_dereference_is_unsupported() {
    let mut ast = Ast::new();
    let p = ast.ident("p");
    let deref = ast.unary(UnaryOp::Deref, p);
    assert_eq!(
        expression(ast, deref),
        Err(ViewError::Unsupported {
            language: "python",
            construct: "operator `*`".to_owned(),
        })
    );
}
