//! Scoped type environment and type inference for meaning trees.
//!
//! - [`TypeScope`]: stack of [`TypedEntities`] frames
//! - [`infer_expr`], [`infer_assignment`], [`declare`], [`infer_tree`]:
//!   structural inference that registers variables as it goes

mod error;
mod infer;
mod scope;

pub use error::ScopeError;
pub use infer::{binary_type, declare, infer_assignment, infer_expr, infer_tree, unary_type};
pub use scope::{TypeScope, TypedEntities};
