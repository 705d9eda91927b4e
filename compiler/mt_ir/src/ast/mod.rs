//! Node arena.
//!
//! All nodes of a meaning tree live in one `Ast`. Allocation appends, so a
//! node's index is its identity and identities are never reused.
//!
//! # Cloning
//!
//! `Ast: Clone` is the deep clone. The copy owns fresh nodes with the same
//! identities, and every soft reference (a stored `NodeId`) resolves inside
//! the copy without any re-matching pass.
//!
//! # Mutation
//!
//! Nodes are immutable once allocated, except for block statements which can
//! be edited through [`Ast::block_substitute`] and [`Ast::block_insert`].

mod structural;

use crate::{
    Branch, Decl, DeclId, Declarator, Def, DefId, Expr, ExprId, Handle, IrError, Modifiers, Node,
    NodeId, Stmt, StmtId, Type, TypeId,
};
use crate::{AssignOp, BinaryOp, UnaryOp};

/// Arena owning every node of one tree.
#[derive(Clone, Debug, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a node, assigning the next identity.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = match u32::try_from(self.nodes.len()) {
            Ok(index) if index != u32::MAX => NodeId::new(index),
            _ => panic!("node arena exceeded {} nodes", u32::MAX - 1),
        };
        self.nodes.push(node);
        id
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        ExprId::from_node(self.alloc(Node::Expr(expr)))
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        StmtId::from_node(self.alloc(Node::Stmt(stmt)))
    }

    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        DeclId::from_node(self.alloc(Node::Decl(decl)))
    }

    pub fn alloc_def(&mut self, def: Def) -> DefId {
        DefId::from_node(self.alloc(Node::Def(def)))
    }

    pub fn alloc_type(&mut self, ty: Type) -> TypeId {
        TypeId::from_node(self.alloc(Node::Type(ty)))
    }

    /// Whether `id` names a node of this arena.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Get a node.
    ///
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn try_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        match self.node(id.node()) {
            Node::Expr(expr) => expr,
            other => unreachable!("{id:?} names a {}", other.kind_name()),
        }
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        match self.node(id.node()) {
            Node::Stmt(stmt) => stmt,
            other => unreachable!("{id:?} names a {}", other.kind_name()),
        }
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        match self.node(id.node()) {
            Node::Decl(decl) => decl,
            other => unreachable!("{id:?} names a {}", other.kind_name()),
        }
    }

    #[inline]
    pub fn def(&self, id: DefId) -> &Def {
        match self.node(id.node()) {
            Node::Def(def) => def,
            other => unreachable!("{id:?} names a {}", other.kind_name()),
        }
    }

    #[inline]
    pub fn ty(&self, id: TypeId) -> &Type {
        match self.node(id.node()) {
            Node::Type(ty) => ty,
            other => unreachable!("{id:?} names a {}", other.kind_name()),
        }
    }

    /// Category-checked conversions from a plain identity.
    pub fn as_expr(&self, id: NodeId) -> Option<ExprId> {
        matches!(self.try_node(id), Some(Node::Expr(_))).then(|| ExprId::from_node(id))
    }

    pub fn as_stmt(&self, id: NodeId) -> Option<StmtId> {
        matches!(self.try_node(id), Some(Node::Stmt(_))).then(|| StmtId::from_node(id))
    }

    pub fn as_decl(&self, id: NodeId) -> Option<DeclId> {
        matches!(self.try_node(id), Some(Node::Decl(_))).then(|| DeclId::from_node(id))
    }

    pub fn as_def(&self, id: NodeId) -> Option<DefId> {
        matches!(self.try_node(id), Some(Node::Def(_))).then(|| DefId::from_node(id))
    }

    /// The category handle of a node.
    ///
    /// Panics if `id` was not allocated by this arena.
    pub fn handle(&self, id: NodeId) -> Handle {
        match self.node(id) {
            Node::Expr(_) => Handle::Expr(ExprId::from_node(id)),
            Node::Stmt(_) => Handle::Stmt(StmtId::from_node(id)),
            Node::Decl(_) => Handle::Decl(DeclId::from_node(id)),
            Node::Def(_) => Handle::Def(DefId::from_node(id)),
            Node::Type(_) => Handle::Type(TypeId::from_node(id)),
        }
    }

    /// Owned children of a node in source order.
    pub fn children(&self, id: NodeId) -> smallvec::SmallVec<[(NodeId, &'static str); 4]> {
        let mut out = smallvec::SmallVec::new();
        self.node(id).for_each_child(|child, field| out.push((child, field)));
        out
    }

    // Expression builders

    pub fn int(&mut self, value: i64) -> ExprId {
        self.alloc_expr(Expr::Int(value))
    }

    pub fn float(&mut self, value: f64) -> ExprId {
        self.alloc_expr(Expr::float(value))
    }

    pub fn boolean(&mut self, value: bool) -> ExprId {
        self.alloc_expr(Expr::Bool(value))
    }

    pub fn string(&mut self, value: impl Into<String>) -> ExprId {
        self.alloc_expr(Expr::string(value))
    }

    pub fn null(&mut self) -> ExprId {
        self.alloc_expr(Expr::Null)
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        self.alloc_expr(Expr::ident(name))
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.alloc_expr(Expr::Binary { op, left, right })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.alloc_expr(Expr::Unary { op, operand })
    }

    pub fn paren(&mut self, inner: ExprId) -> ExprId {
        self.alloc_expr(Expr::Paren(inner))
    }

    pub fn call(&mut self, callee: &str, args: Vec<ExprId>) -> ExprId {
        let callee = self.ident(callee);
        self.alloc_expr(Expr::Call { callee, args })
    }

    /// Build `a < b < c` from its adjacent comparisons.
    ///
    /// Requires at least two comparison operands.
    pub fn compound_comparison(&mut self, comparisons: Vec<ExprId>) -> Result<ExprId, IrError> {
        const NODE: &str = "compound comparison";
        if comparisons.len() < 2 {
            return Err(IrError::Malformed {
                node: NODE,
                reason: format!("needs at least 2 comparisons, got {}", comparisons.len()),
            });
        }
        for &id in &comparisons {
            match self.expr(id) {
                Expr::Binary { op, .. } if op.is_comparison() => {}
                other => {
                    return Err(IrError::Malformed {
                        node: NODE,
                        reason: format!("operand is a {}, not a comparison", other.kind_name()),
                    })
                }
            }
        }
        Ok(self.alloc_expr(Expr::CompoundComparison(comparisons)))
    }

    // Statement builders

    pub fn block(&mut self, body: Vec<NodeId>) -> StmtId {
        self.alloc_stmt(Stmt::Block(body))
    }

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.alloc_stmt(Stmt::Expr(expr))
    }

    pub fn assign_stmt(&mut self, target: ExprId, value: ExprId) -> StmtId {
        self.alloc_stmt(Stmt::Assign {
            op: AssignOp::Assign,
            target,
            value,
        })
    }

    pub fn return_stmt(&mut self, value: Option<ExprId>) -> StmtId {
        self.alloc_stmt(Stmt::Return(value))
    }

    /// Build an `if` chain. Requires at least one branch.
    pub fn if_stmt(
        &mut self,
        branches: Vec<Branch>,
        otherwise: Option<StmtId>,
    ) -> Result<StmtId, IrError> {
        if branches.is_empty() {
            return Err(IrError::Malformed {
                node: "if statement",
                reason: "needs at least one branch".to_owned(),
            });
        }
        Ok(self.alloc_stmt(Stmt::If {
            branches,
            otherwise,
        }))
    }

    // Declaration and definition builders

    /// Build a variable declaration. Requires at least one declarator.
    pub fn variable(
        &mut self,
        ty: TypeId,
        declarators: Vec<Declarator>,
        modifiers: Modifiers,
    ) -> Result<DeclId, IrError> {
        if declarators.is_empty() {
            return Err(IrError::Malformed {
                node: "variable declaration",
                reason: "needs at least one declarator".to_owned(),
            });
        }
        Ok(self.alloc_decl(Decl::Variable {
            ty,
            declarators,
            modifiers,
        }))
    }

    /// Build the program root. The soft references must point into `body`.
    pub fn program(
        &mut self,
        body: Vec<NodeId>,
        main_class: Option<DefId>,
        entry_point: Option<DefId>,
    ) -> DefId {
        self.alloc_def(Def::Program {
            body,
            main_class,
            entry_point,
        })
    }

    /// The main class of a program entry point.
    pub fn main_class(&self, program: DefId) -> Result<DefId, IrError> {
        match self.def(program) {
            Def::Program {
                main_class: Some(class),
                ..
            } => Ok(*class),
            _ => Err(IrError::MissingField {
                node: "program entry point",
                field: "main class",
            }),
        }
    }

    /// The entry-point function of a program entry point.
    pub fn entry_point(&self, program: DefId) -> Result<DefId, IrError> {
        match self.def(program) {
            Def::Program {
                entry_point: Some(function),
                ..
            } => Ok(*function),
            _ => Err(IrError::MissingField {
                node: "program entry point",
                field: "entry point",
            }),
        }
    }

    // Block editing

    /// Replace the statement at `index` of a block, returning the old one.
    ///
    /// `node` must be detached: not yet a child of any node. A `node` whose
    /// subtree contains `block` is rejected, since the tree would loop.
    pub fn block_substitute(
        &mut self,
        block: StmtId,
        index: usize,
        node: NodeId,
    ) -> Result<NodeId, IrError> {
        self.check_not_enclosing(block, node)?;
        let body = self.block_body_mut(block)?;
        let len = body.len();
        let slot = body
            .get_mut(index)
            .ok_or(IrError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, node))
    }

    /// Insert a statement before `index` of a block. `index == len` appends.
    ///
    /// `node` must be detached, as for [`Ast::block_substitute`].
    pub fn block_insert(&mut self, block: StmtId, index: usize, node: NodeId) -> Result<(), IrError> {
        self.check_not_enclosing(block, node)?;
        let body = self.block_body_mut(block)?;
        if index > body.len() {
            return Err(IrError::IndexOutOfRange {
                index,
                len: body.len(),
            });
        }
        body.insert(index, node);
        Ok(())
    }

    fn check_not_enclosing(&self, block: StmtId, node: NodeId) -> Result<(), IrError> {
        if !matches!(self.try_node(block.node()), Some(Node::Stmt(Stmt::Block(_)))) {
            return Err(IrError::NotABlock(block.node()));
        }
        if self.try_node(node).is_some() && self.reaches(node, block.node()) {
            return Err(IrError::Malformed {
                node: "block statement",
                reason: format!("inserting {node} would make the block contain itself"),
            });
        }
        Ok(())
    }

    /// Whether `target` is `from` or lies below it.
    fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut stack: smallvec::SmallVec<[NodeId; 16]> = smallvec::smallvec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            stack.extend(self.children(id).into_iter().map(|(child, _)| child));
        }
        false
    }

    fn block_body_mut(&mut self, block: StmtId) -> Result<&mut Vec<NodeId>, IrError> {
        match self.nodes.get_mut(block.index()) {
            Some(Node::Stmt(Stmt::Block(body))) => Ok(body),
            _ => Err(IrError::NotABlock(block.node())),
        }
    }
}
