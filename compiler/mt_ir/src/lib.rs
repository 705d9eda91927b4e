//! Meaning tree IR.
//!
//! The language-neutral tree that sits between a source language's parser
//! and a target language's viewer:
//! - `NodeId` identities and category handles (`ExprId`, `StmtId`, ...)
//! - Node kinds in five closed categories
//! - `Ast`, the arena owning every node of a tree
//! - `MeaningTree`, the root handle with walk and parent lookup
//!
//! # Design
//!
//! - **Arena, not pointers**: children are indices into one `Ast`
//! - **Identity is the index**: allocation assigns the next `NodeId`
//! - **Soft references are ids**: a stored `NodeId` stays valid in a clone
//! - **Structural equality ignores identity**: see `Ast::structurally_eq`

mod ast;
mod error;
mod name;
mod node;
mod node_id;
mod operators;
mod tree;

pub use ast::Ast;
pub use error::IrError;
pub use name::Name;
pub use node::{
    Branch, Case, CaseKind, Category, CollectionKind, Decl, Declarator, Def, Expr, ImportItems,
    Modifiers, Node, Param, Range, Stmt, StringKind, Type,
};
pub use node_id::{DeclId, DefId, ExprId, Handle, NodeId, StmtId, TypeId};
pub use operators::{AssignOp, BinaryOp, UnaryOp};
pub use tree::{MeaningTree, NodeInfo, Walk};
