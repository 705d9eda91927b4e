#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;

use super::*;
use crate::{Associativity, OperatorPosition};

#[test]
fn test_lower_precedence_binds_tighter() {
    for lang in [&Java as &dyn Language, &Python, &Cpp] {
        let mul = lang.binary(BinaryOp::Mul).unwrap();
        let add = lang.binary(BinaryOp::Add).unwrap();
        let and = lang.binary(BinaryOp::And).unwrap();
        assert!(mul.precedence < add.precedence, "{}", lang.name());
        assert!(add.precedence < and.precedence, "{}", lang.name());
        assert!(lang.access().precedence < mul.precedence, "{}", lang.name());
    }
}

#[test]
fn test_spellings_differ_per_language() {
    assert_eq!(Java.binary(BinaryOp::And).unwrap().value, "&&");
    assert_eq!(Python.binary(BinaryOp::And).unwrap().value, "and");
    assert_eq!(Python.binary(BinaryOp::RefNotEq).unwrap().value, "is not");
    assert_eq!(Java.binary(BinaryOp::RefEq).unwrap().value, "==");
    assert_eq!(Python.unary(UnaryOp::Not).unwrap().value, "not");
    assert_eq!(Python.assign(AssignOp::Assign).unwrap().value, ":=");
    assert_eq!(Python.assign_statement(AssignOp::Assign).unwrap().value, "=");
    assert_eq!(Java.literal(Literal::Null), Some("null"));
    assert_eq!(Python.literal(Literal::Null), Some("None"));
    assert_eq!(Cpp.literal(Literal::Null), Some("nullptr"));
    assert_eq!(Cpp.scope_separator(), "::");
}

#[test]
fn test_unexpressible_operators_are_absent() {
    assert_eq!(Java.binary(BinaryOp::Pow), None);
    assert_eq!(Java.binary(BinaryOp::FloorDiv), None);
    assert_eq!(Java.binary(BinaryOp::Contains), None);
    assert_eq!(Java.unary(UnaryOp::Deref), None);
    assert_eq!(Python.unary(UnaryOp::PostInc), None);
    assert_eq!(Python.unary(UnaryOp::AddressOf), None);
    assert_eq!(Python.assign(AssignOp::Add), None);
    assert_eq!(Cpp.binary(BinaryOp::Contains), None);
    assert_eq!(Cpp.literal(Literal::SuperRef), None);
    assert!(Cpp.unary(UnaryOp::Deref).is_some());
}

#[test]
fn test_associativity() {
    assert_eq!(Python.binary(BinaryOp::Pow).unwrap().assoc, Associativity::Right);
    assert_eq!(Java.assign(AssignOp::Add).unwrap().assoc, Associativity::Right);
    assert_eq!(Cpp.binary(BinaryOp::Sub).unwrap().assoc, Associativity::Left);
    assert_eq!(
        Cpp.ternary()[0].precedence,
        Cpp.assign(AssignOp::Assign).unwrap().precedence
    );
}

#[test]
fn test_cst_operator_depends_on_parent_kind() {
    let neg = Java.cst_operator("-", "unary_expression").unwrap();
    let sub = Java.cst_operator("-", "binary_expression").unwrap();
    assert_eq!(neg.arity, Arity::Unary);
    assert_eq!(sub.arity, Arity::Binary);
    assert_eq!(Java.cst_operator("-", "argument_list"), None);
    assert_eq!(Java.cst_operator("+=", "assignment_expression").unwrap().value, "+=");
    assert_eq!(Cpp.cst_operator("*", "pointer_expression").unwrap().value, "*");
    assert_eq!(Python.cst_operator("else", "conditional_expression").unwrap().arity, Arity::Ternary);

    let post = Java.postfix_operator("--").unwrap();
    assert_eq!(post.position, OperatorPosition::Postfix);
    assert_eq!(Python.postfix_operator("++"), None);
}

#[test]
fn test_operand_positions_from_fields() {
    assert_eq!(
        Java.operand_position("ternary_expression", "consequence"),
        Some(OperandPosition::Center)
    );
    assert_eq!(
        Python.operand_position("named_expression", "value"),
        Some(OperandPosition::Right)
    );
    assert_eq!(Cpp.operand_position("binary_expression", "operator"), None);
    assert_eq!(Python.operand_position("conditional_expression", "left"), None);
    assert!(Python.positional_operands("comparison_operator"));
    assert!(!Cpp.positional_operands("conditional_expression"));
    assert_eq!(Java.operator_arity("ternary_expression"), Some(Arity::Ternary));
    assert_eq!(Java.operator_arity("block"), None);
}

#[test]
fn test_leaf_classification() {
    let leaf = |text, kind, parent_kind, field| Leaf {
        text,
        kind,
        parent_kind,
        field,
    };
    assert_eq!(
        Python.classify(&leaf("True", "true", Some("expression_statement"), None)),
        TokenKind::Const
    );
    assert_eq!(
        Python.classify(&leaf("return", "return", Some("return_statement"), None)),
        TokenKind::Keyword
    );
    assert_eq!(
        Python.classify(&leaf("print", "identifier", Some("call"), Some("function"))),
        TokenKind::CallableIdentifier
    );
    assert_eq!(
        Python.classify(&leaf("[", "[", Some("subscript"), None)),
        TokenKind::SubscriptOpenBrace
    );
    assert_eq!(
        Python.classify(&leaf("[", "[", Some("list"), None)),
        TokenKind::OpenBrace
    );
    assert_eq!(
        Cpp.classify(&leaf("std::cout", "qualified_identifier", Some("binary_expression"), None)),
        TokenKind::Identifier
    );
    assert_eq!(
        Java.classify(&leaf("3.5", "decimal_floating_point_literal", None, None)),
        TokenKind::Const
    );
    assert_eq!(Java.classify(&leaf("@", "@", None, None)), TokenKind::Unknown);
}

#[test]
fn test_expr_operator() {
    let mut ast = Ast::new();
    let a = ast.ident("a");
    let b = ast.ident("b");
    let sum = ast.binary(BinaryOp::Add, a, b);
    let grouped = ast.paren(sum);
    let call = ast.call("f", vec![]);
    assert_eq!(Java.expr_operator(&ast, sum).unwrap().value, "+");
    assert_eq!(Java.expr_operator(&ast, grouped), None);
    assert_eq!(Java.expr_operator(&ast, call), None);
    assert_eq!(Java.expr_operator(&ast, a), None);
}

#[test]
fn test_expanded_assignment_binds_like_plain_assignment() {
    let mut ast = Ast::new();
    let x = ast.ident("x");
    let two = ast.int(2);
    let pow = ast.alloc_expr(Expr::Assign {
        op: AssignOp::Pow,
        target: x,
        value: two,
    });
    let plain = Java.assign(AssignOp::Assign).unwrap();
    assert_eq!(Java.expr_operator(&ast, pow), Some(plain));
    assert_eq!(Python.expr_operator(&ast, pow).unwrap().value, ":=");
}

#[test]
fn test_quote_string_escapes() {
    assert_eq!(quote_string("plain"), "\"plain\"");
    assert_eq!(quote_string("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
    assert_eq!(quote_string("a\\b\t"), "\"a\\\\b\\t\"");
}
