//! Node identities and typed handles into the node arena.
//!
//! A `NodeId` is both the arena index of a node and its stable identity.
//! Identities are handed out in allocation order and never reused, so a
//! soft reference is simply a stored `NodeId`. Cloning an [`Ast`](crate::Ast)
//! clones the whole arena, which keeps every stored identity pointing at the
//! corresponding node of the copy.
//!
//! The category handles (`ExprId`, `StmtId`, ...) wrap a `NodeId` and are only
//! produced by the arena after checking the node's category.

use std::fmt;

/// Identity of a node, doubling as its index in the owning arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel used in erased (identity-free) node skeletons.
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#INVALID")
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

macro_rules! category_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        #[repr(transparent)]
        pub struct $name(NodeId);

        impl $name {
            pub const INVALID: $name = $name(NodeId::INVALID);

            /// Wrap an identity already known to name a node of this category.
            #[inline]
            pub(crate) const fn from_node(id: NodeId) -> Self {
                $name(id)
            }

            /// The underlying node identity.
            #[inline]
            pub const fn node(self) -> NodeId {
                self.0
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0.index()
            }
        }

        impl From<$name> for NodeId {
            #[inline]
            fn from(id: $name) -> NodeId {
                id.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

category_id!(
    /// Handle to an expression node.
    ExprId
);
category_id!(
    /// Handle to a statement node.
    StmtId
);
category_id!(
    /// Handle to a declaration node.
    DeclId
);
category_id!(
    /// Handle to a definition node.
    DefId
);
category_id!(
    /// Handle to a type node.
    TypeId
);

/// A node identity resolved to its category handle.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Handle {
    Expr(ExprId),
    Stmt(StmtId),
    Decl(DeclId),
    Def(DefId),
    Type(TypeId),
}

#[cfg(test)]
mod tests;
