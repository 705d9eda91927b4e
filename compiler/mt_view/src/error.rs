//! Errors raised while rendering a tree.

use mt_ir::IrError;
use mt_types::ScopeError;

/// A tree that cannot be rendered in the target language.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The construct has no mapping in the target language.
    #[error("{language} has no rendering for {construct}")]
    Unsupported {
        language: &'static str,
        construct: String,
    },

    #[error("indentation decremented below zero")]
    IndentUnderflow,

    #[error(transparent)]
    Ir(#[from] IrError),

    #[error(transparent)]
    Scope(#[from] ScopeError),
}

/// A configuration parameter that could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown configuration key `{0}`")]
    UnknownKey(String),

    #[error("invalid value `{value}` for `{key}`: expected {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}
