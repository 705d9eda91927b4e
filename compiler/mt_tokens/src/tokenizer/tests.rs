#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use mt_ir::{AssignOp, BinaryOp, Expr, Stmt, UnaryOp};
use pretty_assertions::assert_eq;

use super::*;
use crate::{CstNode, Java, Python, TokenKind};

fn leaf(kind: &str, start: usize, end: usize) -> CstNode {
    CstNode::leaf(kind, start..end)
}

fn operands(tokens: &TokenList, operator: usize, position: OperandPosition) -> Vec<usize> {
    tokens.operands_of(operator, position).collect()
}

// CST mode

#[test]
fn test_binary_operands_are_tagged_by_field() {
    let source = "a * b + c";
    let product = CstNode::branch(
        "binary_expression",
        vec![
            (Some("left"), leaf("identifier", 0, 1)),
            (Some("operator"), leaf("*", 2, 3)),
            (Some("right"), leaf("identifier", 4, 5)),
        ],
    );
    let sum = CstNode::branch(
        "binary_expression",
        vec![
            (Some("left"), product),
            (Some("operator"), leaf("+", 6, 7)),
            (Some("right"), leaf("identifier", 8, 9)),
        ],
    );

    let tokens = Tokenizer::new(&Java).tokenize(source, &sum);
    assert_eq!(tokens.values(), vec!["a", "*", "b", "+", "c"]);
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].operator.unwrap().precedence, 4);
    assert_eq!(operands(&tokens, 3, OperandPosition::Left), vec![0, 1, 2]);
    assert_eq!(operands(&tokens, 3, OperandPosition::Right), vec![4]);
    // The enclosing operator overwrote the inner tags.
    assert_eq!(operands(&tokens, 1, OperandPosition::Left), Vec::<usize>::new());
}

#[test]
fn test_prefix_unary_operand_is_right() {
    let node = CstNode::branch(
        "unary_expression",
        vec![
            (Some("operator"), leaf("-", 0, 1)),
            (Some("operand"), leaf("identifier", 1, 2)),
        ],
    );
    let tokens = Tokenizer::new(&Java).tokenize("-x", &node);
    let op = tokens[0].operator.unwrap();
    assert_eq!(op.position, OperatorPosition::Prefix);
    assert_eq!(op.arity, Arity::Unary);
    assert_eq!(operands(&tokens, 0, OperandPosition::Right), vec![1]);
}

#[test]
fn test_postfix_unary_operand_is_left() {
    let node = CstNode::branch(
        "update_expression",
        vec![(None, leaf("identifier", 0, 1)), (None, leaf("++", 1, 3))],
    );
    let tokens = Tokenizer::new(&Java).tokenize("i++", &node);
    let op = tokens[1].operator.unwrap();
    assert_eq!(op.position, OperatorPosition::Postfix);
    assert_eq!(op, Java.unary(UnaryOp::PostInc).unwrap());
    assert_eq!(operands(&tokens, 1, OperandPosition::Left), vec![0]);
}

#[test]
fn test_ternary_uses_first_part_as_operator() {
    let source = "c ? a : b";
    let node = CstNode::branch(
        "ternary_expression",
        vec![
            (Some("condition"), leaf("identifier", 0, 1)),
            (None, leaf("?", 2, 3)),
            (Some("consequence"), leaf("identifier", 4, 5)),
            (None, leaf(":", 6, 7)),
            (Some("alternative"), leaf("identifier", 8, 9)),
        ],
    );
    let tokens = Tokenizer::new(&Java).tokenize(source, &node);
    assert_eq!(tokens[1].operator.unwrap().arity, Arity::Ternary);
    assert!(tokens[3].is_operator());
    assert_eq!(operands(&tokens, 1, OperandPosition::Left), vec![0]);
    assert_eq!(operands(&tokens, 1, OperandPosition::Center), vec![2]);
    assert_eq!(operands(&tokens, 1, OperandPosition::Right), vec![4]);
}

#[test]
fn test_fieldless_comparison_operands_are_tagged_by_order() {
    let node = CstNode::branch(
        "comparison_operator",
        vec![
            (None, leaf("identifier", 0, 1)),
            (Some("operators"), leaf("<", 2, 3)),
            (None, leaf("identifier", 4, 5)),
        ],
    );
    let tokens = Tokenizer::new(&Python).tokenize("a < b", &node);
    assert!(tokens[1].operator.unwrap().strict_order);
    assert_eq!(operands(&tokens, 1, OperandPosition::Left), vec![0]);
    assert_eq!(operands(&tokens, 1, OperandPosition::Right), vec![2]);
}

#[test]
fn test_chained_comparison_tags_the_first_pair() {
    let node = CstNode::branch(
        "comparison_operator",
        vec![
            (None, leaf("identifier", 0, 1)),
            (Some("operators"), leaf("<", 2, 3)),
            (None, leaf("identifier", 4, 5)),
            (Some("operators"), leaf("<", 6, 7)),
            (None, leaf("identifier", 8, 9)),
        ],
    );
    let tokens = Tokenizer::new(&Python).tokenize("a < b < c", &node);
    assert_eq!(operands(&tokens, 1, OperandPosition::Left), vec![0]);
    assert_eq!(operands(&tokens, 1, OperandPosition::Right), vec![2]);
    assert!(tokens[3].is_operator());
    assert_eq!(tokens[4].operand_of, None);
}

#[test]
fn test_fieldless_conditional_operands_follow_child_order() {
    let source = "x if c else y";
    let node = CstNode::branch(
        "conditional_expression",
        vec![
            (None, leaf("identifier", 0, 1)),
            (None, leaf("if", 2, 4)),
            (None, leaf("identifier", 5, 6)),
            (None, leaf("else", 7, 11)),
            (None, leaf("identifier", 12, 13)),
        ],
    );
    let tokens = Tokenizer::new(&Python).tokenize(source, &node);
    assert_eq!(tokens[1].operator.unwrap().arity, Arity::Ternary);
    assert!(tokens[3].is_operator());
    assert_eq!(operands(&tokens, 1, OperandPosition::Left), vec![0]);
    assert_eq!(operands(&tokens, 1, OperandPosition::Center), vec![2]);
    assert_eq!(operands(&tokens, 1, OperandPosition::Right), vec![4]);
}

#[test]
fn test_missing_operand_fields_tag_nothing() {
    let node = CstNode::branch(
        "binary_expression",
        vec![
            (Some("left"), leaf("identifier", 0, 1)),
            (Some("operator"), leaf("-", 2, 3)),
            (None, leaf("identifier", 4, 5)),
        ],
    );
    let tokens = Tokenizer::new(&Java).tokenize("a - b", &node);
    assert_eq!(operands(&tokens, 1, OperandPosition::Left), vec![0]);
    assert_eq!(tokens[2].operand_of, None);
}

#[test]
fn test_call_leaves_are_classified() {
    let source = "f(x, 1)";
    let args = CstNode::branch(
        "argument_list",
        vec![
            (None, leaf("(", 1, 2)),
            (None, leaf("identifier", 2, 3)),
            (None, leaf(",", 3, 4)),
            (None, leaf("decimal_integer_literal", 5, 6)),
            (None, leaf(")", 6, 7)),
        ],
    );
    let call = CstNode::branch(
        "method_invocation",
        vec![
            (Some("name"), leaf("identifier", 0, 1)),
            (Some("arguments"), args),
        ],
    );
    let tokens = Tokenizer::new(&Java).tokenize(source, &call);
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::CallableIdentifier,
            TokenKind::CallOpenBrace,
            TokenKind::Identifier,
            TokenKind::Comma,
            TokenKind::Const,
            TokenKind::CallCloseBrace,
        ]
    );
}

#[test]
fn test_stop_node_is_one_token_and_blank_leaves_vanish() {
    let source = "\"a b\" ;";
    let string = CstNode::branch(
        "string_literal",
        vec![
            (None, leaf("\"", 0, 1)),
            (None, leaf("string_fragment", 1, 4)),
            (None, leaf("\"", 4, 5)),
        ],
    );
    let statement = CstNode::branch(
        "expression_statement",
        vec![
            (None, string),
            (None, leaf("whitespace", 5, 6)),
            (None, leaf(";", 6, 7)),
            (None, leaf("identifier", 40, 41)),
        ],
    );
    let tokens = Tokenizer::new(&Java).tokenize(source, &statement);
    assert_eq!(tokens.values(), vec!["\"a b\"", ";"]);
    assert_eq!(tokens[0].kind, TokenKind::Const);
    assert_eq!(tokens[1].kind, TokenKind::StatementToken);
}

// Tree mode

#[test]
fn test_tree_binary_operands_are_tagged() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.ident("b");
    let c = ast.ident("c");
    let mul = ast.binary(BinaryOp::Mul, a, b);
    let add = ast.binary(BinaryOp::Add, mul, c);

    let tokens = Tokenizer::new(&Java).tokenize_tree(&ast, add.node()).unwrap();
    assert_eq!(tokens.to_string(), "a * b + c");
    assert_eq!(operands(&tokens, 3, OperandPosition::Left), vec![0, 1, 2]);
    assert_eq!(operands(&tokens, 3, OperandPosition::Right), vec![4]);
}

#[test]
fn test_tree_inserts_required_parens() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.ident("b");
    let c = ast.ident("c");
    let add = ast.binary(BinaryOp::Add, a, b);
    let mul = ast.binary(BinaryOp::Mul, add, c);

    let tokens = Tokenizer::new(&Java).tokenize_tree(&ast, mul.node()).unwrap();
    assert_eq!(tokens.to_string(), "( a + b ) * c");
    assert_eq!(tokens[0].kind, TokenKind::OpenBrace);
    assert_eq!(operands(&tokens, 5, OperandPosition::Left), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_tree_fusing_negations_are_grouped() {
    let mut ast = Ast::new();
    let x = ast.ident("x");
    let inner = ast.unary(UnaryOp::Neg, x);
    let outer = ast.unary(UnaryOp::Neg, inner);
    let tokens = Tokenizer::new(&Java).tokenize_tree(&ast, outer.node()).unwrap();
    assert_eq!(tokens.to_string(), "- ( - x )");
}

#[test]
fn test_tree_ternary_follows_language_layout() {
    let mut ast = Ast::new();
    let cond = ast.ident("c");
    let then = ast.ident("x");
    let otherwise = ast.ident("y");
    let ternary = ast.alloc_expr(Expr::Ternary {
        cond,
        then,
        otherwise,
    });

    let java = Tokenizer::new(&Java).tokenize_tree(&ast, ternary.node()).unwrap();
    assert_eq!(java.to_string(), "c ? x : y");

    let python = Tokenizer::new(&Python)
        .tokenize_tree(&ast, ternary.node())
        .unwrap();
    assert_eq!(python.to_string(), "x if c else y");
    assert_eq!(operands(&python, 1, OperandPosition::Left), vec![0]);
    assert_eq!(operands(&python, 1, OperandPosition::Center), vec![2]);
    assert_eq!(operands(&python, 1, OperandPosition::Right), vec![4]);
}

#[test]
fn test_tree_compound_comparison() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.ident("b");
    let b_again = ast.ident("b");
    let c = ast.ident("c");
    let lt = ast.binary(BinaryOp::Lt, a, b);
    let le = ast.binary(BinaryOp::LtEq, b_again, c);
    let chain = ast.compound_comparison(vec![lt, le]).unwrap();

    let python = Tokenizer::new(&Python).tokenize_tree(&ast, chain.node()).unwrap();
    assert_eq!(python.to_string(), "a < b <= c");

    let java = Tokenizer::new(&Java).tokenize_tree(&ast, chain.node()).unwrap();
    assert_eq!(java.to_string(), "a < b && b <= c");
    assert_eq!(operands(&java, 3, OperandPosition::Left), vec![0, 1, 2]);
    assert_eq!(operands(&java, 3, OperandPosition::Right), vec![4, 5, 6]);
}

#[test]
fn test_tree_unsupported_operator() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.ident("b");
    let pow = ast.binary(BinaryOp::Pow, a, b);
    let err = Tokenizer::new(&Java)
        .tokenize_tree(&ast, pow.node())
        .unwrap_err();
    assert_eq!(
        err,
        TokenError::Unsupported {
            language: "java",
            construct: "**",
        }
    );
    assert_eq!(err.to_string(), "java has no token form for **");

    let python = Tokenizer::new(&Python).tokenize_tree(&ast, pow.node()).unwrap();
    assert_eq!(python.to_string(), "a ** b");
}

#[test]
fn test_tree_statements() {
    let mut ast = Ast::new();
    let x = ast.ident("x");
    let one = ast.int(1);
    let assign = ast.assign_stmt(x, one);
    let java = Tokenizer::new(&Java).tokenize_tree(&ast, assign.node()).unwrap();
    assert_eq!(java.values(), vec!["x", "=", "1", ";"]);
    assert_eq!(java[3].kind, TokenKind::StatementToken);

    let total = ast.ident("total");
    let two = ast.int(2);
    let augmented = ast.alloc_stmt(Stmt::Assign {
        op: AssignOp::Add,
        target: total,
        value: two,
    });
    let python = Tokenizer::new(&Python)
        .tokenize_tree(&ast, augmented.node())
        .unwrap();
    assert_eq!(python.values(), vec!["total", "+=", "2"]);
}

#[test]
fn test_tree_calls_and_access() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.ident("b");
    let one = ast.int(1);
    let call = ast.call("f", vec![a, one]);
    let tokens = Tokenizer::new(&Java).tokenize_tree(&ast, call.node()).unwrap();
    assert_eq!(tokens.to_string(), "f ( a , 1 )");
    assert_eq!(tokens[0].kind, TokenKind::CallableIdentifier);
    assert_eq!(tokens[1].kind, TokenKind::CallOpenBrace);

    let a_again = ast.ident("a");
    let sum = ast.binary(BinaryOp::Add, a_again, b);
    let method = ast.alloc_expr(Expr::MethodCall {
        receiver: sum,
        method: "abs".into(),
        args: vec![],
    });
    let tokens = Tokenizer::new(&Java).tokenize_tree(&ast, method.node()).unwrap();
    assert_eq!(tokens.to_string(), "( a + b ) . abs ( )");
}

#[test]
fn test_tree_rejects_declarations() {
    let mut ast = Ast::new();
    let program = ast.program(vec![], None, None);
    let err = Tokenizer::new(&Java)
        .tokenize_tree(&ast, program.node())
        .unwrap_err();
    assert_eq!(
        err,
        TokenError::Unsupported {
            language: "java",
            construct: "program entry point",
        }
    );
}
