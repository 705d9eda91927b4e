//! Node kinds of the meaning tree.
//!
//! Every node belongs to exactly one of five categories, each a closed enum.
//! Children are stored as typed handles into the owning [`Ast`](crate::Ast).
//! Handles that are *soft references* rather than owned children are marked
//! as such on their field; they never appear in [`Node::for_each_child`].
//!
//! Floats are stored as `u64` bits so every kind can derive `Hash`.

mod children;
mod types;

pub use types::Type;

use bitflags::bitflags;

use crate::{AssignOp, BinaryOp, DeclId, DefId, ExprId, Name, NodeId, StmtId, TypeId, UnaryOp};

/// Any node of the tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    Expr(Expr),
    Stmt(Stmt),
    Decl(Decl),
    Def(Def),
    Type(Type),
}

/// The five node categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Expression,
    Statement,
    Declaration,
    Definition,
    Type,
}

impl Node {
    pub fn category(&self) -> Category {
        match self {
            Node::Expr(_) => Category::Expression,
            Node::Stmt(_) => Category::Statement,
            Node::Decl(_) => Category::Declaration,
            Node::Def(_) => Category::Definition,
            Node::Type(_) => Category::Type,
        }
    }

    /// Short kind name used in diagnostics and tree outlines.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Expr(e) => e.kind_name(),
            Node::Stmt(s) => s.kind_name(),
            Node::Decl(d) => d.kind_name(),
            Node::Def(d) => d.kind_name(),
            Node::Type(_) => "type",
        }
    }
}

/// Flavor of a string literal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StringKind {
    Plain,
    Raw,
    Multiline,
}

/// Flavor of a collection literal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    List,
    Array,
    Set,
    /// Unmodifiable sequence (a Python tuple).
    Tuple,
}

/// Expressions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    // Literals
    Int(i64),
    /// `f64` bits.
    Float(u64),
    Bool(bool),
    Char(char),
    Str {
        value: String,
        kind: StringKind,
    },
    /// Interpolated string; parts are string literals and embedded expressions.
    Interpolated(Vec<ExprId>),
    Null,
    Collection {
        kind: CollectionKind,
        items: Vec<ExprId>,
    },
    Dict(Vec<(ExprId, ExprId)>),

    // Identifiers
    Ident(Name),
    /// `a::b::c`
    Scoped(Vec<Name>),
    SelfRef,
    SuperRef,

    // Operators
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    /// Assignment used as a value.
    Assign {
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    },
    Ternary {
        cond: ExprId,
        then: ExprId,
        otherwise: ExprId,
    },
    /// `a < b < c`: adjacent comparisons sharing their middle operands.
    CompoundComparison(Vec<ExprId>),

    // Grouping, access and calls
    Paren(ExprId),
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    MethodCall {
        receiver: ExprId,
        method: Name,
        args: Vec<ExprId>,
    },
    Index {
        target: ExprId,
        index: ExprId,
    },
    Member {
        target: ExprId,
        member: Name,
    },

    // Other
    Cast {
        ty: TypeId,
        value: ExprId,
    },
    SizeOf(ExprId),
    New {
        ty: TypeId,
        args: Vec<ExprId>,
    },
    NewArray {
        ty: TypeId,
        dims: Vec<ExprId>,
        init: Option<ExprId>,
    },
    /// Comma-separated expressions.
    Sequence(Vec<ExprId>),
}

impl Expr {
    pub fn float(value: f64) -> Self {
        Expr::Float(value.to_bits())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Str {
            value: value.into(),
            kind: StringKind::Plain,
        }
    }

    pub fn ident(name: impl Into<Name>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Int(_) => "int literal",
            Expr::Float(_) => "float literal",
            Expr::Bool(_) => "bool literal",
            Expr::Char(_) => "char literal",
            Expr::Str { .. } => "string literal",
            Expr::Interpolated(_) => "interpolated string",
            Expr::Null => "null literal",
            Expr::Collection { .. } => "collection literal",
            Expr::Dict(_) => "dictionary literal",
            Expr::Ident(_) => "identifier",
            Expr::Scoped(_) => "scoped identifier",
            Expr::SelfRef => "self reference",
            Expr::SuperRef => "super reference",
            Expr::Binary { .. } => "binary expression",
            Expr::Unary { .. } => "unary expression",
            Expr::Assign { .. } => "assignment expression",
            Expr::Ternary { .. } => "ternary expression",
            Expr::CompoundComparison(_) => "compound comparison",
            Expr::Paren(_) => "parenthesized expression",
            Expr::Call { .. } => "call",
            Expr::MethodCall { .. } => "method call",
            Expr::Index { .. } => "index expression",
            Expr::Member { .. } => "member access",
            Expr::Cast { .. } => "cast",
            Expr::SizeOf(_) => "sizeof",
            Expr::New { .. } => "object construction",
            Expr::NewArray { .. } => "array construction",
            Expr::Sequence(_) => "expression sequence",
        }
    }
}

/// One `if`/`elif` arm.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Branch {
    pub cond: ExprId,
    pub body: StmtId,
}

/// How a `switch` case is selected and left.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CaseKind {
    /// Matches a value and leaves the switch afterwards.
    Match(ExprId),
    /// Matches a value and falls into the next case.
    Fallthrough(ExprId),
    Default,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Case {
    pub kind: CaseKind,
    pub body: StmtId,
}

/// Bounds of a counting loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: ExprId,
    pub stop: ExprId,
    pub step: Option<ExprId>,
    /// `stop` is part of the range.
    pub inclusive: bool,
    /// The loop counts down.
    pub descending: bool,
}

/// Statements.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stmt {
    /// Compound statement. The only node kind that may be edited in place,
    /// through `Ast::block_substitute` and `Ast::block_insert`.
    Block(Vec<NodeId>),
    Expr(ExprId),
    Assign {
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    },
    MultiAssign(Vec<StmtId>),
    If {
        branches: Vec<Branch>,
        otherwise: Option<StmtId>,
    },
    Switch {
        subject: ExprId,
        cases: Vec<Case>,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    DoWhile {
        body: StmtId,
        cond: ExprId,
    },
    /// C-style `for (init; cond; update)`. `init` is a declaration or a statement.
    For {
        init: Option<NodeId>,
        cond: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
    },
    RangeFor {
        var: Name,
        range: Range,
        body: StmtId,
    },
    ForEach {
        var: Name,
        ty: TypeId,
        iterable: ExprId,
        body: StmtId,
    },
    Infinite {
        body: StmtId,
    },
    /// `target` is a soft reference to the enclosing loop being left.
    Break {
        target: Option<StmtId>,
    },
    /// `target` is a soft reference to the enclosing loop being continued.
    Continue {
        target: Option<StmtId>,
    },
    Return(Option<ExprId>),
    Delete {
        target: ExprId,
        array: bool,
    },
    Comment {
        text: String,
        multiline: bool,
    },
}

impl Stmt {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Block(_) => "block",
            Stmt::Expr(_) => "expression statement",
            Stmt::Assign { .. } => "assignment statement",
            Stmt::MultiAssign(_) => "multiple assignment",
            Stmt::If { .. } => "if statement",
            Stmt::Switch { .. } => "switch statement",
            Stmt::While { .. } => "while loop",
            Stmt::DoWhile { .. } => "do-while loop",
            Stmt::For { .. } => "for loop",
            Stmt::RangeFor { .. } => "range for loop",
            Stmt::ForEach { .. } => "for-each loop",
            Stmt::Infinite { .. } => "infinite loop",
            Stmt::Break { .. } => "break",
            Stmt::Continue { .. } => "continue",
            Stmt::Return(_) => "return",
            Stmt::Delete { .. } => "delete",
            Stmt::Comment { .. } => "comment",
        }
    }

    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            Stmt::While { .. }
                | Stmt::DoWhile { .. }
                | Stmt::For { .. }
                | Stmt::RangeFor { .. }
                | Stmt::ForEach { .. }
                | Stmt::Infinite { .. }
        )
    }
}

bitflags! {
    /// Declaration modifiers.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
        const CONST = 1 << 6;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Declarator {
    pub name: Name,
    pub init: Option<ExprId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: Name,
    pub ty: TypeId,
}

/// What an import brings into scope.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImportItems {
    /// The module itself.
    Module,
    /// Named members of the module.
    Members(Vec<Name>),
    /// Every member of the module.
    All,
}

/// Declarations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Decl {
    Variable {
        ty: TypeId,
        declarators: Vec<Declarator>,
        modifiers: Modifiers,
    },
    /// Function or method signature. `owner` is a soft reference to the
    /// class definition a method belongs to.
    Function {
        name: Name,
        params: Vec<Param>,
        ret: TypeId,
        modifiers: Modifiers,
        owner: Option<DefId>,
    },
    Class {
        name: Name,
        parents: Vec<TypeId>,
        modifiers: Modifiers,
    },
    Import {
        path: Vec<Name>,
        items: ImportItems,
        is_static: bool,
    },
    Package(Vec<Name>),
    Include {
        path: String,
        system: bool,
    },
}

impl Decl {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Decl::Variable { .. } => "variable declaration",
            Decl::Function { owner: None, .. } => "function declaration",
            Decl::Function { owner: Some(_), .. } => "method declaration",
            Decl::Class { .. } => "class declaration",
            Decl::Import { .. } => "import",
            Decl::Package(_) => "package declaration",
            Decl::Include { .. } => "include",
        }
    }
}

/// Definitions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Def {
    /// The root of every parsed program. `main_class` and `entry_point` are
    /// soft references into `body`.
    Program {
        body: Vec<NodeId>,
        main_class: Option<DefId>,
        entry_point: Option<DefId>,
    },
    Function {
        decl: DeclId,
        body: StmtId,
    },
    Class {
        decl: DeclId,
        members: Vec<NodeId>,
    },
}

impl Def {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Def::Program { .. } => "program entry point",
            Def::Function { .. } => "function definition",
            Def::Class { .. } => "class definition",
        }
    }
}
