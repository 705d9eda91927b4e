use thiserror::Error;

/// Errors raised while building or linearizing operator tokens.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed ternary operator: expected 2 parts, got {0}")]
    MalformedTernary(usize),

    #[error("{language} has no token form for {construct}")]
    Unsupported {
        language: &'static str,
        construct: &'static str,
    },
}
