//! Token model: tokens, operator metadata and operand tags.
//!
//! # Design
//!
//! A [`TokenList`] is a flat sequence. Operands do not point at their
//! operator by reference; they carry the operator's index in the same list
//! ([`OperandOf`]). Promoting a span to an operand only re-tags tokens,
//! it never reorders them.
//!
//! Precedence is project-wide: a lower number binds tighter.

use std::fmt;
use std::ops::{Index, Range};

use crate::TokenError;

/// Lexical role of a token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Operator,
    Const,
    CallableIdentifier,
    Identifier,
    Keyword,
    OpenBrace,
    CloseBrace,
    SubscriptOpenBrace,
    SubscriptCloseBrace,
    CallOpenBrace,
    CallCloseBrace,
    CompoundOpenBrace,
    CompoundCloseBrace,
    StatementToken,
    Separator,
    Comma,
    Unknown,
}

impl TokenKind {
    pub fn is_open_brace(self) -> bool {
        matches!(
            self,
            Self::OpenBrace | Self::SubscriptOpenBrace | Self::CallOpenBrace | Self::CompoundOpenBrace
        )
    }

    pub fn is_close_brace(self) -> bool {
        matches!(
            self,
            Self::CloseBrace
                | Self::SubscriptCloseBrace
                | Self::CallCloseBrace
                | Self::CompoundCloseBrace
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    Unary,
    Binary,
    Ternary,
}

/// Where an operator sits relative to its operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperatorPosition {
    Prefix,
    Infix,
    Postfix,
}

/// Which operand slot a token belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperandPosition {
    Left,
    Right,
    /// Middle operand of a ternary operator.
    Center,
}

/// Operator metadata shared by every occurrence of an operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OperatorToken {
    pub value: &'static str,
    /// Lower binds tighter.
    pub precedence: u8,
    pub assoc: Associativity,
    pub arity: Arity,
    /// Equal-precedence operands must be grouped explicitly; the operator
    /// does not chain (Python comparisons, `:=`).
    pub strict_order: bool,
    pub position: OperatorPosition,
}

impl OperatorToken {
    /// Position is derived from the arity: unary operators are prefix,
    /// everything else infix.
    pub const fn new(value: &'static str, precedence: u8, assoc: Associativity, arity: Arity) -> Self {
        let position = match arity {
            Arity::Unary => OperatorPosition::Prefix,
            Arity::Binary | Arity::Ternary => OperatorPosition::Infix,
        };
        OperatorToken {
            value,
            precedence,
            assoc,
            arity,
            strict_order: false,
            position,
        }
    }

    pub const fn binary(value: &'static str, precedence: u8, assoc: Associativity) -> Self {
        Self::new(value, precedence, assoc, Arity::Binary)
    }

    pub const fn prefix(value: &'static str, precedence: u8) -> Self {
        Self::new(value, precedence, Associativity::Right, Arity::Unary)
    }

    pub const fn postfix(value: &'static str, precedence: u8) -> Self {
        Self::new(value, precedence, Associativity::Left, Arity::Unary).at(OperatorPosition::Postfix)
    }

    /// Both parts of a ternary operator, such as `?` and `:`.
    pub fn ternary(
        parts: &[&'static str],
        precedence: u8,
        assoc: Associativity,
    ) -> Result<[Self; 2], TokenError> {
        match *parts {
            [first, second] => Ok([
                Self::new(first, precedence, assoc, Arity::Ternary),
                Self::new(second, precedence, assoc, Arity::Ternary),
            ]),
            _ => Err(TokenError::MalformedTernary(parts.len())),
        }
    }

    #[must_use]
    pub const fn strict(self) -> Self {
        OperatorToken {
            strict_order: true,
            ..self
        }
    }

    #[must_use]
    pub const fn at(self, position: OperatorPosition) -> Self {
        OperatorToken { position, ..self }
    }

    pub fn is_prefix_unary(&self) -> bool {
        self.arity == Arity::Unary && self.position == OperatorPosition::Prefix
    }
}

/// Tag linking an operand token to its operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OperandOf {
    /// Index of the operator token in the same [`TokenList`].
    pub operator: usize,
    pub position: OperandPosition,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub kind: TokenKind,
    pub operator: Option<OperatorToken>,
    pub operand_of: Option<OperandOf>,
}

impl Token {
    pub fn new(value: impl Into<String>, kind: TokenKind) -> Self {
        Token {
            value: value.into(),
            kind,
            operator: None,
            operand_of: None,
        }
    }

    pub fn operator(op: OperatorToken) -> Self {
        Token {
            value: op.value.to_owned(),
            kind: TokenKind::Operator,
            operator: Some(op),
            operand_of: None,
        }
    }

    pub fn is_operator(&self) -> bool {
        self.operator.is_some()
    }
}

/// Contiguous half-open span `[start, stop)` of a [`TokenList`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TokenGroup {
    pub start: usize,
    pub stop: usize,
}

impl TokenGroup {
    pub fn new(start: usize, stop: usize) -> Self {
        debug_assert!(start <= stop, "token group {start}..{stop} is reversed");
        TokenGroup { start, stop }
    }

    pub fn len(self) -> usize {
        self.stop - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.stop
    }

    pub fn range(self) -> Range<usize> {
        self.start..self.stop
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Append a token, returning its index.
    pub fn push(&mut self, token: Token) -> usize {
        self.tokens.push(token);
        self.tokens.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn values(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.value.as_str()).collect()
    }

    /// The group of tokens pushed since `start`.
    pub fn since(&self, start: usize) -> TokenGroup {
        TokenGroup::new(start, self.tokens.len())
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Token> {
        self.tokens.get_mut(index)
    }

    /// Tag every token of `group` as an operand of the operator at
    /// `operator`. Existing tags are overwritten, so an enclosing operator
    /// tagged later wins.
    pub fn assign_operands(&mut self, group: TokenGroup, operator: usize, position: OperandPosition) {
        for token in &mut self.tokens[group.range()] {
            token.operand_of = Some(OperandOf { operator, position });
        }
    }

    /// Indices of the tokens tagged as `position` operands of `operator`.
    pub fn operands_of(
        &self,
        operator: usize,
        position: OperandPosition,
    ) -> impl Iterator<Item = usize> + '_ {
        let wanted = OperandOf { operator, position };
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.operand_of == Some(wanted))
            .map(|(i, _)| i)
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl fmt::Display for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&token.value)?;
        }
        Ok(())
    }
}
