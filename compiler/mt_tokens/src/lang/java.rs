//! Java operator table over tree-sitter-java node kinds.

use mt_ir::{AssignOp, BinaryOp, UnaryOp};

use super::{Language, Literal, NodeRole, TernaryLayout};
use crate::Associativity::{Left, Right};
use crate::{Arity, OperandPosition, OperatorToken};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Java;

const POSTFIX: u8 = 1;
const PREFIX: u8 = 2;
const MULTIPLICATIVE: u8 = 3;
const ADDITIVE: u8 = 4;
const SHIFT: u8 = 5;
const RELATIONAL: u8 = 6;
const EQUALITY: u8 = 7;
const BIT_AND: u8 = 8;
const BIT_XOR: u8 = 9;
const BIT_OR: u8 = 10;
const AND: u8 = 11;
const OR: u8 = 12;
const CONDITIONAL: u8 = 13;
const ASSIGNMENT: u8 = 14;

const TERNARY: [OperatorToken; 2] = [
    OperatorToken::new("?", CONDITIONAL, Right, Arity::Ternary),
    OperatorToken::new(":", CONDITIONAL, Right, Arity::Ternary),
];

static STOP_NODES: &[&str] = &[
    "string_literal",
    "character_literal",
    "text_block",
    "scoped_identifier",
];

static UNARY_NODES: &[&str] = &["unary_expression", "update_expression"];
static BINARY_NODES: &[&str] = &[
    "binary_expression",
    "assignment_expression",
    "instanceof_expression",
];
static TERNARY_NODES: &[&str] = &["ternary_expression"];

static KEYWORDS: &[&str] = &[
    "abstract", "boolean", "break", "case", "catch", "char", "class", "continue", "default", "do",
    "double", "else", "extends", "final", "for", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "new", "package", "private", "protected", "public", "return", "static",
    "super", "switch", "this", "throw", "try", "var", "void", "while",
];

impl Language for Java {
    fn name(&self) -> &'static str {
        "java"
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
            BinaryOp::InstanceOf => ("instanceof", RELATIONAL),
            BinaryOp::Eq | BinaryOp::RefEq => ("==", EQUALITY),
            BinaryOp::NotEq | BinaryOp::RefNotEq => ("!=", EQUALITY),
            BinaryOp::BitAnd => ("&", BIT_AND),
            BinaryOp::BitXor => ("^", BIT_XOR),
            BinaryOp::BitOr => ("|", BIT_OR),
            BinaryOp::And => ("&&", AND),
            BinaryOp::Or => ("||", OR),
            // Printed as `Math.floorDiv` / `Math.pow` calls, or not at all.
            BinaryOp::FloorDiv | BinaryOp::Pow | BinaryOp::Contains | BinaryOp::NotContains => {
                return None
            }
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
            UnaryOp::PostInc => OperatorToken::postfix("++", POSTFIX),
            UnaryOp::PostDec => OperatorToken::postfix("--", POSTFIX),
            UnaryOp::Deref | UnaryOp::AddressOf => return None,
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
        Some(match literal {
            Literal::True => "true",
            Literal::False => "false",
            Literal::Null => "null",
            Literal::SelfRef => "this",
            Literal::SuperRef => "super",
        })
    }

    fn chains_comparisons(&self) -> bool {
        false
    }

    fn statement_end(&self) -> Option<&'static str> {
        Some(";")
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
            ("ternary_expression", OperandPosition::Left) => Some("condition"),
            ("ternary_expression", OperandPosition::Center) => Some("consequence"),
            ("ternary_expression", OperandPosition::Right) => Some("alternative"),
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
            "method_invocation" => NodeRole::Call,
            "argument_list" => NodeRole::Arguments,
            "array_access" => NodeRole::Subscript,
            _ => NodeRole::Other,
        }
    }
}
