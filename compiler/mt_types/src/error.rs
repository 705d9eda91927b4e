use mt_ir::Name;

/// Scope misuse.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("no such variable: {0}")]
    NoSuchVariable(Name),

    #[error("cannot leave the root scope")]
    LeaveRoot,
}
