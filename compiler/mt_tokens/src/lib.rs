//! Operator classification for meaning trees and concrete syntax trees.
//!
//! - [`OperatorToken`], [`Token`], [`TokenList`]: the token model
//! - [`lang`]: static operator tables for Java, Python and C++
//! - [`Tokenizer`]: operand tagging over a concrete syntax tree, or
//!   linearization of a meaning tree
//! - [`parens`]: where explicit grouping is required

mod error;
pub mod lang;
pub mod parens;
mod syntax;
mod token;
mod tokenizer;

pub use error::TokenError;
pub use lang::{Cpp, Java, Language, Python};
pub use syntax::{CstNode, SyntaxNode};
pub use token::{
    Arity, Associativity, OperandOf, OperandPosition, OperatorPosition, OperatorToken, Token,
    TokenGroup, TokenKind, TokenList,
};
pub use tokenizer::Tokenizer;
