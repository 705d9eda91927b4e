//! C++ operator table over tree-sitter-cpp node kinds.

use mt_ir::{AssignOp, BinaryOp, UnaryOp};

use super::{Language, Literal, NodeRole, TernaryLayout};
use crate::Associativity::{Left, Right};
use crate::{Arity, OperandPosition, OperatorToken};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cpp;

const POSTFIX: u8 = 2;
const PREFIX: u8 = 3;
const MULTIPLICATIVE: u8 = 5;
const ADDITIVE: u8 = 6;
const SHIFT: u8 = 7;
const RELATIONAL: u8 = 9;
const EQUALITY: u8 = 10;
const BIT_AND: u8 = 11;
const BIT_XOR: u8 = 12;
const BIT_OR: u8 = 13;
const AND: u8 = 14;
const OR: u8 = 15;
/// Shared by `?:` and every assignment.
const ASSIGNMENT: u8 = 16;

const TERNARY: [OperatorToken; 2] = [
    OperatorToken::new("?", ASSIGNMENT, Right, Arity::Ternary),
    OperatorToken::new(":", ASSIGNMENT, Right, Arity::Ternary),
];

static STOP_NODES: &[&str] = &[
    "string_literal",
    "char_literal",
    "raw_string_literal",
    "qualified_identifier",
];

static UNARY_NODES: &[&str] = &["unary_expression", "update_expression", "pointer_expression"];
static BINARY_NODES: &[&str] = &["binary_expression", "assignment_expression"];
static TERNARY_NODES: &[&str] = &["conditional_expression"];

static KEYWORDS: &[&str] = &[
    "auto", "bool", "break", "case", "char", "class", "const", "continue", "default", "delete",
    "do", "double", "else", "for", "if", "include", "int", "namespace", "new", "private",
    "protected", "public", "return", "sizeof", "static", "struct", "switch", "template", "this",
    "typename", "using", "void", "while",
];

impl Language for Cpp {
    fn name(&self) -> &'static str {
        "c++"
    }

    fn binary(&self, op: BinaryOp) -> Option<OperatorToken> {
        let (value, precedence) = match op {
            BinaryOp::Mul => ("*", MULTIPLICATIVE),
            BinaryOp::Div => ("/", MULTIPLICATIVE),
            BinaryOp::Mod => ("%", MULTIPLICATIVE),
            BinaryOp::Add => ("+", ADDITIVE),
            BinaryOp::Sub => ("-", ADDITIVE),
            BinaryOp::Shl => ("<<", SHIFT),
            BinaryOp::Shr => (">>", SHIFT),
            BinaryOp::Lt => ("<", RELATIONAL),
            BinaryOp::LtEq => ("<=", RELATIONAL),
            BinaryOp::Gt => (">", RELATIONAL),
            BinaryOp::GtEq => (">=", RELATIONAL),
            BinaryOp::Eq | BinaryOp::RefEq => ("==", EQUALITY),
            BinaryOp::NotEq | BinaryOp::RefNotEq => ("!=", EQUALITY),
            BinaryOp::BitAnd => ("&", BIT_AND),
            BinaryOp::BitXor => ("^", BIT_XOR),
            BinaryOp::BitOr => ("|", BIT_OR),
            BinaryOp::And => ("&&", AND),
            BinaryOp::Or => ("||", OR),
            BinaryOp::FloorDiv
            | BinaryOp::Pow
            | BinaryOp::Contains
            | BinaryOp::NotContains
            | BinaryOp::InstanceOf => return None,
        };
        Some(OperatorToken::binary(value, precedence, Left))
    }

    fn unary(&self, op: UnaryOp) -> Option<OperatorToken> {
        Some(match op {
            UnaryOp::Neg => OperatorToken::prefix("-", PREFIX),
            UnaryOp::Plus => OperatorToken::prefix("+", PREFIX),
            UnaryOp::Not => OperatorToken::prefix("!", PREFIX),
            UnaryOp::BitNot => OperatorToken::prefix("~", PREFIX),
            UnaryOp::PreInc => OperatorToken::prefix("++", PREFIX),
            UnaryOp::PreDec => OperatorToken::prefix("--", PREFIX),
            UnaryOp::Deref => OperatorToken::prefix("*", PREFIX),
            UnaryOp::AddressOf => OperatorToken::prefix("&", PREFIX),
            UnaryOp::PostInc => OperatorToken::postfix("++", POSTFIX),
            UnaryOp::PostDec => OperatorToken::postfix("--", POSTFIX),
        })
    }

    fn assign(&self, op: AssignOp) -> Option<OperatorToken> {
        match op {
            AssignOp::FloorDiv | AssignOp::Pow => None,
            _ => Some(OperatorToken::binary(op.as_symbol(), ASSIGNMENT, Right)),
        }
    }

    fn ternary(&self) -> [OperatorToken; 2] {
        TERNARY
    }

    fn ternary_layout(&self) -> TernaryLayout {
        TernaryLayout::CondFirst
    }

    fn cast(&self) -> Option<OperatorToken> {
        Some(OperatorToken::prefix("(cast)", PREFIX))
    }

    fn access(&self) -> OperatorToken {
        OperatorToken::postfix(".", POSTFIX)
    }

    fn literal(&self, literal: Literal) -> Option<&'static str> {
        match literal {
            Literal::True => Some("true"),
            Literal::False => Some("false"),
            Literal::Null => Some("nullptr"),
            Literal::SelfRef => Some("this"),
            Literal::SuperRef => None,
        }
    }

    fn chains_comparisons(&self) -> bool {
        false
    }

    fn statement_end(&self) -> Option<&'static str> {
        Some(";")
    }

    fn scope_separator(&self) -> &'static str {
        "::"
    }

    fn stop_nodes(&self) -> &'static [&'static str] {
        STOP_NODES
    }

    fn operator_nodes(&self, arity: Arity) -> &'static [&'static str] {
        match arity {
            Arity::Unary => UNARY_NODES,
            Arity::Binary => BINARY_NODES,
            Arity::Ternary => TERNARY_NODES,
        }
    }

    fn operand_field(&self, node_kind: &str, position: OperandPosition) -> Option<&'static str> {
        match (node_kind, position) {
            ("conditional_expression", OperandPosition::Left) => Some("condition"),
            ("conditional_expression", OperandPosition::Center) => Some("consequence"),
            ("conditional_expression", OperandPosition::Right) => Some("alternative"),
            (kind, OperandPosition::Left) if BINARY_NODES.contains(&kind) => Some("left"),
            (kind, OperandPosition::Right) if BINARY_NODES.contains(&kind) => Some("right"),
            _ => None,
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        KEYWORDS
    }

    fn node_role(&self, kind: &str) -> NodeRole {
        match kind {
            "call_expression" => NodeRole::Call,
            "argument_list" => NodeRole::Arguments,
            "subscript_expression" | "subscript_argument_list" => NodeRole::Subscript,
            _ => NodeRole::Other,
        }
    }
}
