//! Structural equality and hashing.
//!
//! Two subtrees are structurally equal when their nodes agree on every field
//! except stored identities, recursively through owned children. Soft
//! references compare by presence only, so equality is independent of where
//! in its arena a subtree was allocated.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use super::Ast;
use crate::NodeId;

impl Ast {
    /// Compare the subtree at `id` with the subtree at `other_id` of `other`.
    pub fn structurally_eq(&self, id: NodeId, other: &Ast, other_id: NodeId) -> bool {
        if self.node(id).erased() != other.node(other_id).erased() {
            return false;
        }
        let ours = self.children(id);
        let theirs = other.children(other_id);
        ours.len() == theirs.len()
            && ours
                .iter()
                .zip(&theirs)
                .all(|(&(a, field_a), &(b, field_b))| {
                    field_a == field_b && self.structurally_eq(a, other, b)
                })
    }

    /// Feed the structure of the subtree at `id` into `state`.
    ///
    /// Consistent with [`Ast::structurally_eq`].
    pub fn structural_hash<H: Hasher>(&self, id: NodeId, state: &mut H) {
        self.node(id).erased().hash(state);
        for (child, field) in self.children(id) {
            field.hash(state);
            self.structural_hash(child, state);
        }
    }

    /// Structural hash of a subtree as a single value.
    pub fn fingerprint(&self, id: NodeId) -> u64 {
        let mut hasher = FxHasher::default();
        self.structural_hash(id, &mut hasher);
        hasher.finish()
    }
}
