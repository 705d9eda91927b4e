//! Python operator table over tree-sitter-python node kinds.
//!
//! Comparisons chain natively and the walrus operator does not nest
//! without parentheses; both are strict-order.

use mt_ir::{AssignOp, BinaryOp, UnaryOp};

use super::{Language, Literal, NodeRole, TernaryLayout};
use crate::Associativity::{Left, Right};
use crate::{Arity, OperandPosition, OperatorToken};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Python;

const ACCESS: u8 = 1;
const POWER: u8 = 2;
const PREFIX: u8 = 3;
const MULTIPLICATIVE: u8 = 4;
const ADDITIVE: u8 = 5;
const SHIFT: u8 = 6;
const BIT_AND: u8 = 7;
const BIT_XOR: u8 = 8;
const BIT_OR: u8 = 9;
const COMPARISON: u8 = 10;
const NOT: u8 = 11;
const AND: u8 = 12;
const OR: u8 = 13;
const CONDITIONAL: u8 = 14;
const WALRUS: u8 = 15;
/// Statement-level `=` and augmented assignment.
const STATEMENT: u8 = 16;

const TERNARY: [OperatorToken; 2] = [
    OperatorToken::new("if", CONDITIONAL, Right, Arity::Ternary),
    OperatorToken::new("else", CONDITIONAL, Right, Arity::Ternary),
];

static STOP_NODES: &[&str] = &["string", "concatenated_string"];

static UNARY_NODES: &[&str] = &["unary_operator", "not_operator"];
static BINARY_NODES: &[&str] = &[
    "binary_operator",
    "boolean_operator",
    "comparison_operator",
    "named_expression",
];
static TERNARY_NODES: &[&str] = &["conditional_expression"];

static KEYWORDS: &[&str] = &[
    "and", "as", "break", "case", "class", "continue", "def", "del", "elif", "else", "for",
    "from", "if", "import", "in", "is", "lambda", "match", "not", "or", "pass", "return", "while",
];

impl Language for Python {
    fn name(&self) -> &'static str {
        "python"
    }

    fn binary(&self, op: BinaryOp) -> Option<OperatorToken> {
        let comparison = |value| OperatorToken::binary(value, COMPARISON, Left).strict();
        let token = match op {
            BinaryOp::Pow => OperatorToken::binary("**", POWER, Right),
            BinaryOp::Mul => OperatorToken::binary("*", MULTIPLICATIVE, Left),
            BinaryOp::Div => OperatorToken::binary("/", MULTIPLICATIVE, Left),
            BinaryOp::FloorDiv => OperatorToken::binary("//", MULTIPLICATIVE, Left),
            BinaryOp::Mod => OperatorToken::binary("%", MULTIPLICATIVE, Left),
            BinaryOp::Add => OperatorToken::binary("+", ADDITIVE, Left),
            BinaryOp::Sub => OperatorToken::binary("-", ADDITIVE, Left),
            BinaryOp::Shl => OperatorToken::binary("<<", SHIFT, Left),
            BinaryOp::Shr => OperatorToken::binary(">>", SHIFT, Left),
            BinaryOp::BitAnd => OperatorToken::binary("&", BIT_AND, Left),
            BinaryOp::BitXor => OperatorToken::binary("^", BIT_XOR, Left),
            BinaryOp::BitOr => OperatorToken::binary("|", BIT_OR, Left),
            BinaryOp::Eq => comparison("=="),
            BinaryOp::NotEq => comparison("!="),
            BinaryOp::Lt => comparison("<"),
            BinaryOp::LtEq => comparison("<="),
            BinaryOp::Gt => comparison(">"),
            BinaryOp::GtEq => comparison(">="),
            BinaryOp::RefEq => comparison("is"),
            BinaryOp::RefNotEq => comparison("is not"),
            BinaryOp::Contains => comparison("in"),
            BinaryOp::NotContains => comparison("not in"),
            BinaryOp::And => OperatorToken::binary("and", AND, Left),
            BinaryOp::Or => OperatorToken::binary("or", OR, Left),
            // Printed as an `isinstance` call.
            BinaryOp::InstanceOf => return None,
        };
        Some(token)
    }

    fn unary(&self, op: UnaryOp) -> Option<OperatorToken> {
        match op {
            UnaryOp::Neg => Some(OperatorToken::prefix("-", PREFIX)),
            UnaryOp::Plus => Some(OperatorToken::prefix("+", PREFIX)),
            UnaryOp::BitNot => Some(OperatorToken::prefix("~", PREFIX)),
            UnaryOp::Not => Some(OperatorToken::prefix("not", NOT)),
            UnaryOp::PreInc
            | UnaryOp::PreDec
            | UnaryOp::PostInc
            | UnaryOp::PostDec
            | UnaryOp::Deref
            | UnaryOp::AddressOf => None,
        }
    }

    fn assign(&self, op: AssignOp) -> Option<OperatorToken> {
        match op {
            AssignOp::Assign => Some(OperatorToken::binary(":=", WALRUS, Right).strict()),
            _ => None,
        }
    }

    fn assign_statement(&self, op: AssignOp) -> Option<OperatorToken> {
        Some(OperatorToken::binary(op.as_symbol(), STATEMENT, Right))
    }

    fn ternary(&self) -> [OperatorToken; 2] {
        TERNARY
    }

    fn ternary_layout(&self) -> TernaryLayout {
        TernaryLayout::ThenFirst
    }

    fn cast(&self) -> Option<OperatorToken> {
        None
    }

    fn access(&self) -> OperatorToken {
        OperatorToken::postfix(".", ACCESS)
    }

    fn literal(&self, literal: Literal) -> Option<&'static str> {
        Some(match literal {
            Literal::True => "True",
            Literal::False => "False",
            Literal::Null => "None",
            Literal::SelfRef => "self",
            Literal::SuperRef => "super()",
        })
    }

    fn chains_comparisons(&self) -> bool {
        true
    }

    fn statement_end(&self) -> Option<&'static str> {
        None
    }

    fn scope_separator(&self) -> &'static str {
        "."
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
            ("named_expression", OperandPosition::Left) => Some("name"),
            ("named_expression", OperandPosition::Right) => Some("value"),
            ("binary_operator" | "boolean_operator", OperandPosition::Left) => Some("left"),
            ("binary_operator" | "boolean_operator", OperandPosition::Right) => Some("right"),
            _ => None,
        }
    }

    fn positional_operands(&self, node_kind: &str) -> bool {
        matches!(node_kind, "comparison_operator" | "conditional_expression")
    }

    fn keywords(&self) -> &'static [&'static str] {
        KEYWORDS
    }

    fn node_role(&self, kind: &str) -> NodeRole {
        match kind {
            "call" => NodeRole::Call,
            "argument_list" => NodeRole::Arguments,
            "subscript" => NodeRole::Subscript,
            _ => NodeRole::Other,
        }
    }
}
