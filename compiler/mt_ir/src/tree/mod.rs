//! The meaning tree handle: one root plus the arena owning it.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{Ast, Expr, Node, NodeId};

/// A node's position as reported by [`MeaningTree::walk`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    pub id: NodeId,
    /// `None` for the root.
    pub parent: Option<NodeId>,
    /// Position among the parent's children; `None` for the root.
    pub index: Option<usize>,
    /// Name of the parent field holding the node; `"root"` for the root.
    pub field: &'static str,
}

/// A language-neutral program tree.
///
/// Equality and hashing are structural and delegate to the root. `Clone` is
/// a deep copy that preserves identities.
#[derive(Clone, Debug)]
pub struct MeaningTree {
    ast: Ast,
    root: NodeId,
}

impl MeaningTree {
    /// Panics if `root` is not a node of `ast`.
    pub fn new(ast: Ast, root: impl Into<NodeId>) -> Self {
        let root = root.into();
        assert!(ast.contains(root), "root {root} is not allocated in the arena");
        Self { ast, root }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Mutable arena access for block editing and appending new nodes.
    #[inline]
    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    pub fn into_ast(self) -> Ast {
        self.ast
    }

    /// Pre-order walk over every node reachable from the root.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            ast: &self.ast,
            stack: vec![NodeInfo {
                id: self.root,
                parent: None,
                index: None,
                field: "root",
            }],
        }
    }

    /// Where `id` sits in this tree, `None` if it is not reachable from the root.
    pub fn find(&self, id: NodeId) -> Option<NodeInfo> {
        self.walk().find(|info| info.id == id)
    }

    /// Parent of `id`.
    ///
    /// This is a linear scan over [`MeaningTree::walk`]. Trees are small and
    /// lookups rare, so no parent index is maintained.
    pub fn find_parent(&self, id: NodeId) -> Option<NodeId> {
        self.find(id).and_then(|info| info.parent)
    }

    /// The tree rooted at a reachable node.
    ///
    /// The whole arena is cloned so identities and soft references keep their
    /// values; nodes outside the new root's subtree are simply unreachable.
    pub fn subtree(&self, id: NodeId) -> Option<MeaningTree> {
        self.find(id).map(|_| MeaningTree {
            ast: self.ast.clone(),
            root: id,
        })
    }
}

impl PartialEq for MeaningTree {
    fn eq(&self, other: &Self) -> bool {
        self.ast.structurally_eq(self.root, &other.ast, other.root)
    }
}

impl Eq for MeaningTree {}

impl Hash for MeaningTree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ast.structural_hash(self.root, state);
    }
}

/// Pre-order iterator returned by [`MeaningTree::walk`].
pub struct Walk<'a> {
    ast: &'a Ast,
    stack: Vec<NodeInfo>,
}

impl Iterator for Walk<'_> {
    type Item = NodeInfo;

    fn next(&mut self) -> Option<NodeInfo> {
        let info = self.stack.pop()?;
        let children = self.ast.children(info.id);
        for (index, &(child, field)) in children.iter().enumerate().rev() {
            self.stack.push(NodeInfo {
                id: child,
                parent: Some(info.id),
                index: Some(index),
                field,
            });
        }
        Some(info)
    }
}

/// Indented outline, one node per line.
impl fmt::Display for MeaningTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth = rustc_hash::FxHashMap::default();
        for info in self.walk() {
            let level = info.parent.map_or(0, |p| depth.get(&p).copied().unwrap_or(0) + 1);
            depth.insert(info.id, level);
            let node = self.ast.node(info.id);
            write!(f, "{:indent$}{}: {}", "", info.field, node.kind_name(), indent = level * 2)?;
            if let Some(detail) = detail(node) {
                write!(f, " {detail}")?;
            }
            writeln!(f, " {}", info.id)?;
        }
        Ok(())
    }
}

fn detail(node: &Node) -> Option<String> {
    match node {
        Node::Expr(expr) => match expr {
            Expr::Int(value) => Some(value.to_string()),
            Expr::Float(bits) => Some(f64::from_bits(*bits).to_string()),
            Expr::Bool(value) => Some(value.to_string()),
            Expr::Char(value) => Some(format!("{value:?}")),
            Expr::Str { value, .. } => Some(format!("{value:?}")),
            Expr::Ident(name) => Some(name.to_string()),
            Expr::Binary { op, .. } => Some(op.as_symbol().to_owned()),
            Expr::Unary { op, .. } => Some(op.as_symbol().to_owned()),
            Expr::Assign { op, .. } => Some(op.as_symbol().to_owned()),
            _ => None,
        },
        Node::Type(ty) => Some(ty.to_string()),
        Node::Stmt(_) | Node::Decl(_) | Node::Def(_) => None,
    }
}
