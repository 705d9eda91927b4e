//! Per-language operator tables.
//!
//! Each target language is a unit struct implementing [`Language`]. The
//! tables are plain `match` arms and `static` slices: nothing is built at
//! runtime and nothing is shared mutably.
//!
//! # Design
//!
//! The trait has two halves. The meaning-tree half maps neutral operators
//! to the language's spelling, precedence and associativity; an operator
//! the language cannot express as an operator maps to `None`. The CST half
//! names the grammar node kinds (tree-sitter grammars) the tokenizer needs
//! to recognize operators and their operand fields.
//!
//! Provided methods derive the reverse lookups (leaf text to operator,
//! field name to operand position) from the required tables.

mod cpp;
mod java;
mod python;

pub use cpp::Cpp;
pub use java::Java;
pub use python::Python;

use std::fmt;

use mt_ir::{AssignOp, Ast, BinaryOp, Expr, ExprId, UnaryOp};

use crate::{Arity, OperandPosition, OperatorToken, TokenKind};

/// Literals whose spelling is a keyword.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    True,
    False,
    Null,
    SelfRef,
    SuperRef,
}

/// Order of the three operands of the conditional operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TernaryLayout {
    /// `cond ? then : otherwise`
    CondFirst,
    /// `then if cond else otherwise`
    ThenFirst,
}

/// Grammar roles that change how a leaf is classified.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Call,
    Arguments,
    Subscript,
    Other,
}

/// A CST leaf being classified.
#[derive(Copy, Clone, Debug)]
pub struct Leaf<'a> {
    pub text: &'a str,
    pub kind: &'a str,
    pub parent_kind: Option<&'a str>,
    /// Field the leaf is attached under in its parent.
    pub field: Option<&'a str>,
}

/// Operator table and grammar vocabulary of one language.
pub trait Language: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn binary(&self, op: BinaryOp) -> Option<OperatorToken>;

    fn unary(&self, op: UnaryOp) -> Option<OperatorToken>;

    /// Assignment in expression position.
    fn assign(&self, op: AssignOp) -> Option<OperatorToken>;

    /// Assignment in statement position.
    fn assign_statement(&self, op: AssignOp) -> Option<OperatorToken> {
        self.assign(op)
    }

    /// Both parts of the conditional operator.
    fn ternary(&self) -> [OperatorToken; 2];

    fn ternary_layout(&self) -> TernaryLayout;

    /// Prefix cast, `None` when casts are spelled as calls.
    fn cast(&self) -> Option<OperatorToken>;

    /// Binding strength of member access, calls and indexing.
    fn access(&self) -> OperatorToken;

    fn literal(&self, literal: Literal) -> Option<&'static str>;

    /// `a < b < c` is native syntax.
    fn chains_comparisons(&self) -> bool;

    fn statement_end(&self) -> Option<&'static str>;

    fn scope_separator(&self) -> &'static str;

    /// Node kinds tokenized as a single leaf.
    fn stop_nodes(&self) -> &'static [&'static str];

    fn operator_nodes(&self, arity: Arity) -> &'static [&'static str];

    fn operand_field(&self, node_kind: &str, position: OperandPosition) -> Option<&'static str>;

    /// Operator node kinds whose operands have no field names. The
    /// tokenizer places them by child order around the operator.
    fn positional_operands(&self, _node_kind: &str) -> bool {
        false
    }

    fn keywords(&self) -> &'static [&'static str];

    fn node_role(&self, kind: &str) -> NodeRole;

    /// Arity of an operator node kind, `None` for any other node.
    fn operator_arity(&self, node_kind: &str) -> Option<Arity> {
        [Arity::Unary, Arity::Binary, Arity::Ternary]
            .into_iter()
            .find(|&arity| self.operator_nodes(arity).contains(&node_kind))
    }

    fn operand_position(&self, node_kind: &str, field: &str) -> Option<OperandPosition> {
        [
            OperandPosition::Left,
            OperandPosition::Center,
            OperandPosition::Right,
        ]
        .into_iter()
        .find(|&position| self.operand_field(node_kind, position) == Some(field))
    }

    /// The operator spelled `text` inside a node of kind `parent_kind`.
    ///
    /// Unary nodes resolve to the prefix form; the tokenizer switches to the
    /// postfix form once it sees the operator trailing its operand.
    fn cst_operator(&self, text: &str, parent_kind: &str) -> Option<OperatorToken> {
        match self.operator_arity(parent_kind)? {
            Arity::Unary => UnaryOp::ALL
                .into_iter()
                .filter(|op| !op.is_postfix())
                .find_map(|op| self.unary(op).filter(|t| t.value == text)),
            Arity::Binary => BinaryOp::ALL
                .into_iter()
                .find_map(|op| self.binary(op).filter(|t| t.value == text))
                .or_else(|| {
                    AssignOp::ALL
                        .into_iter()
                        .find_map(|op| self.assign_statement(op).filter(|t| t.value == text))
                }),
            Arity::Ternary => self.ternary().into_iter().find(|t| t.value == text),
        }
    }

    fn postfix_operator(&self, text: &str) -> Option<OperatorToken> {
        UnaryOp::ALL
            .into_iter()
            .filter(|op| op.is_postfix())
            .find_map(|op| self.unary(op).filter(|t| t.value == text))
    }

    /// The operator an expression is printed with, `None` for atoms.
    ///
    /// Negative numeric literals bind like a prefix minus. Explicit
    /// parentheses, calls and constructs printed as calls are atoms.
    fn expr_operator(&self, ast: &Ast, id: ExprId) -> Option<OperatorToken> {
        match ast.expr(id) {
            Expr::Binary { op, .. } => self.binary(*op),
            Expr::Unary { op, .. } => self.unary(*op),
            // Augmented forms without a token are printed expanded, `x = x op v`.
            Expr::Assign { op, .. } => self.assign(*op).or_else(|| self.assign(AssignOp::Assign)),
            Expr::Ternary { .. } => Some(self.ternary()[0]),
            Expr::CompoundComparison(_) => self.binary(if self.chains_comparisons() {
                BinaryOp::Lt
            } else {
                BinaryOp::And
            }),
            Expr::Cast { .. } => self.cast(),
            Expr::Int(value) if *value < 0 => self.unary(UnaryOp::Neg),
            Expr::Float(bits) if f64::from_bits(*bits).is_sign_negative() => {
                self.unary(UnaryOp::Neg)
            }
            _ => None,
        }
    }

    fn classify(&self, leaf: &Leaf<'_>) -> TokenKind {
        let role = leaf.parent_kind.map_or(NodeRole::Other, |k| self.node_role(k));
        let text = leaf.text;
        match text {
            "(" if role == NodeRole::Arguments => TokenKind::CallOpenBrace,
            ")" if role == NodeRole::Arguments => TokenKind::CallCloseBrace,
            "[" if role == NodeRole::Subscript => TokenKind::SubscriptOpenBrace,
            "]" if role == NodeRole::Subscript => TokenKind::SubscriptCloseBrace,
            "(" | "[" => TokenKind::OpenBrace,
            ")" | "]" => TokenKind::CloseBrace,
            "{" => TokenKind::CompoundOpenBrace,
            "}" => TokenKind::CompoundCloseBrace,
            ";" => TokenKind::StatementToken,
            "," => TokenKind::Comma,
            "." | "::" | ":" | "->" => TokenKind::Separator,
            _ if [Literal::True, Literal::False, Literal::Null]
                .into_iter()
                .any(|l| self.literal(l) == Some(text)) =>
            {
                TokenKind::Const
            }
            _ if self.keywords().contains(&text) => TokenKind::Keyword,
            _ if is_literal_kind(leaf.kind)
                || text.starts_with(|c: char| c.is_ascii_digit() || c == '"' || c == '\'') =>
            {
                TokenKind::Const
            }
            _ if is_identifier(text) || leaf.kind.contains("identifier") => {
                if role == NodeRole::Call && matches!(leaf.field, Some("name" | "function")) {
                    TokenKind::CallableIdentifier
                } else {
                    TokenKind::Identifier
                }
            }
            _ => TokenKind::Unknown,
        }
    }
}

fn is_literal_kind(kind: &str) -> bool {
    kind.contains("literal")
        || matches!(
            kind,
            "string" | "concatenated_string" | "integer" | "float" | "number"
        )
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Double-quoted string literal with C-family escapes.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests;
