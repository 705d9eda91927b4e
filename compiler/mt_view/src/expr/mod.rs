//! Expression rendering shared by every viewer.
//!
//! [`ExprSyntax`] dispatches over every expression kind. Provided methods
//! render the forms the three targets agree on from the language's
//! operator table; a viewer overrides the hooks where its target differs.
//!
//! # Grouping
//!
//! Operands go through [`ExprSyntax::operand`], which asks the
//! parenthesization engine whether the operand needs explicit grouping
//! under the operator it is printed with.

use mt_ir::{
    AssignOp, Ast, BinaryOp, CollectionKind, Expr, ExprId, IrError, MeaningTree, Name, StringKind,
    Type, TypeId, UnaryOp,
};
use mt_tokens::lang::{quote_string, Literal, TernaryLayout};
use mt_tokens::{parens, Language, OperandPosition, OperatorToken};
use mt_types::TypeScope;

use crate::{ViewContext, ViewError};

pub(crate) trait ExprSyntax<'a> {
    fn lang(&self) -> &'static dyn Language;

    fn tree(&self) -> &'a MeaningTree;

    fn ctx(&self) -> &ViewContext;

    fn scope(&mut self) -> &mut TypeScope;

    fn type_name(&self, ty: &Type) -> Result<String, ViewError>;

    fn collection(
        &mut self,
        id: ExprId,
        kind: CollectionKind,
        items: &[ExprId],
    ) -> Result<String, ViewError>;

    fn dict(&mut self, id: ExprId, entries: &[(ExprId, ExprId)]) -> Result<String, ViewError>;

    fn interpolated(&mut self, parts: &[ExprId]) -> Result<String, ViewError>;

    fn new_array(
        &mut self,
        ty: &Type,
        dims: &[ExprId],
        init: Option<ExprId>,
    ) -> Result<String, ViewError>;

    #[inline]
    fn ast(&self) -> &'a Ast {
        self.tree().ast()
    }

    fn unsupported(&self, construct: impl Into<String>) -> ViewError {
        ViewError::Unsupported {
            language: self.lang().name(),
            construct: construct.into(),
        }
    }

    fn expr(&mut self, id: ExprId) -> Result<String, ViewError> {
        let ast = self.ast();
        match ast.expr(id) {
            Expr::Int(value) => Ok(value.to_string()),
            Expr::Float(bits) => Ok(float_literal(f64::from_bits(*bits))),
            Expr::Bool(true) => self.keyword(id, Literal::True),
            Expr::Bool(false) => self.keyword(id, Literal::False),
            Expr::Char(c) => Ok(self.char_literal(*c)),
            Expr::Str { value, kind } => Ok(self.string_literal(value, *kind)),
            Expr::Interpolated(parts) => self.interpolated(parts),
            Expr::Null => self.keyword(id, Literal::Null),
            Expr::Collection { kind, items } => self.collection(id, *kind, items),
            Expr::Dict(entries) => self.dict(id, entries),
            Expr::Ident(name) => Ok(name.to_string()),
            Expr::Scoped(path) => Ok(join_path(path, self.lang().scope_separator())),
            Expr::SelfRef => self.keyword(id, Literal::SelfRef),
            Expr::SuperRef => self.keyword(id, Literal::SuperRef),
            Expr::Binary { op, left, right } => self.binary(*op, *left, *right),
            Expr::Unary { op, operand } => self.unary(id, *op, *operand),
            Expr::Assign { op, target, value } => self.assign_expr(id, *op, *target, *value),
            Expr::Ternary {
                cond,
                then,
                otherwise,
            } => self.ternary(*cond, *then, *otherwise),
            Expr::CompoundComparison(items) => self.compound_comparison(items),
            Expr::Paren(inner) => Ok(format!("({})", self.expr(*inner)?)),
            Expr::Call { callee, args } => {
                let callee = self.access_target(*callee)?;
                Ok(format!("{callee}({})", self.args(args)?))
            }
            Expr::MethodCall {
                receiver,
                method,
                args,
            } => {
                let receiver = self.access_target(*receiver)?;
                Ok(format!("{receiver}.{method}({})", self.args(args)?))
            }
            Expr::Index { target, index } => {
                let target = self.access_target(*target)?;
                Ok(format!("{target}[{}]", self.expr(*index)?))
            }
            Expr::Member { target, member } => {
                let target = self.access_target(*target)?;
                Ok(format!("{target}.{member}"))
            }
            Expr::Cast { ty, value } => self.cast(*ty, *value),
            Expr::SizeOf(value) => self.size_of(*value),
            Expr::New { ty, args } => self.new_object(ast.ty(*ty), args),
            Expr::NewArray { ty, dims, init } => self.new_array(ast.ty(*ty), dims, *init),
            Expr::Sequence(items) => self.sequence(items),
        }
    }

    fn keyword(&self, id: ExprId, literal: Literal) -> Result<String, ViewError> {
        self.lang()
            .literal(literal)
            .map(str::to_owned)
            .ok_or_else(|| self.unsupported(self.ast().expr(id).kind_name()))
    }

    fn char_literal(&self, c: char) -> String {
        let escaped = match c {
            '\'' => "\\'".to_owned(),
            '\\' => "\\\\".to_owned(),
            '\n' => "\\n".to_owned(),
            '\r' => "\\r".to_owned(),
            '\t' => "\\t".to_owned(),
            '\0' => "\\0".to_owned(),
            _ => c.to_string(),
        };
        format!("'{escaped}'")
    }

    fn string_literal(&self, value: &str, _kind: StringKind) -> String {
        quote_string(value)
    }

    /// Render `child` as the `position` operand of `parent`, grouped when
    /// required.
    fn operand(
        &mut self,
        parent: &OperatorToken,
        child: ExprId,
        position: OperandPosition,
    ) -> Result<String, ViewError> {
        let text = self.expr(child)?;
        if parens::wrap_operand(self.lang(), self.ast(), parent, child, position) {
            Ok(format!("({text})"))
        } else {
            Ok(text)
        }
    }

    fn infix(
        &mut self,
        token: &OperatorToken,
        left: ExprId,
        right: ExprId,
    ) -> Result<String, ViewError> {
        let left = self.operand(token, left, OperandPosition::Left)?;
        let right = self.operand(token, right, OperandPosition::Right)?;
        Ok(format!("{left} {} {right}", token.value))
    }

    /// Callee, receiver or indexed value of an access.
    fn access_target(&mut self, target: ExprId) -> Result<String, ViewError> {
        let access = self.lang().access();
        self.operand(&access, target, OperandPosition::Left)
    }

    fn args(&mut self, args: &[ExprId]) -> Result<String, ViewError> {
        let mut out = Vec::with_capacity(args.len());
        for &arg in args {
            out.push(self.expr(arg)?);
        }
        Ok(out.join(", "))
    }

    fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> Result<String, ViewError> {
        match self.binary_operator(op, left, right) {
            Some(token) => self.infix(&token, left, right),
            None => Err(self.unsupported(format!("operator `{}`", op.as_symbol()))),
        }
    }

    /// The token a binary operator is printed with, given its operands.
    fn binary_operator(
        &self,
        op: BinaryOp,
        _left: ExprId,
        _right: ExprId,
    ) -> Option<OperatorToken> {
        self.lang().binary(op)
    }

    fn unary(&mut self, _id: ExprId, op: UnaryOp, operand: ExprId) -> Result<String, ViewError> {
        let Some(token) = self.lang().unary(op) else {
            return Err(self.unsupported(format!("operator `{}`", op.as_symbol())));
        };
        self.apply_unary(&token, op, operand)
    }

    /// `operand` under a prefix or postfix `token`. Word operators are
    /// followed by a space.
    fn apply_unary(
        &mut self,
        token: &OperatorToken,
        op: UnaryOp,
        operand: ExprId,
    ) -> Result<String, ViewError> {
        if op.is_postfix() {
            let text = self.operand(token, operand, OperandPosition::Left)?;
            return Ok(format!("{text}{}", token.value));
        }
        let text = self.operand(token, operand, OperandPosition::Right)?;
        let space = if token.value.ends_with(char::is_alphabetic) {
            " "
        } else {
            ""
        };
        Ok(format!("{}{space}{text}", token.value))
    }

    fn assign_expr(
        &mut self,
        _id: ExprId,
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    ) -> Result<String, ViewError> {
        match self.lang().assign(op) {
            Some(token) => self.infix(&token, target, value),
            None => {
                let plain = self.lang().assign(AssignOp::Assign);
                self.expanded_assignment(plain, op, target, value)
            }
        }
    }

    /// `target = target op value` for an augmented assignment the target
    /// language has no operator for.
    fn expanded_assignment(
        &mut self,
        plain: Option<OperatorToken>,
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    ) -> Result<String, ViewError> {
        let (Some(plain), Some(binary)) = (plain, op.binary()) else {
            return Err(self.unsupported(format!("operator `{}`", op.as_symbol())));
        };
        let target_text = self.expr(target)?;
        let value_text = self.binary(binary, target, value)?;
        Ok(format!("{target_text} {} {value_text}", plain.value))
    }

    fn ternary(
        &mut self,
        cond: ExprId,
        then: ExprId,
        otherwise: ExprId,
    ) -> Result<String, ViewError> {
        let [first, second] = self.lang().ternary();
        let (lead, middle) = match self.lang().ternary_layout() {
            TernaryLayout::CondFirst => (cond, then),
            TernaryLayout::ThenFirst => (then, cond),
        };
        let lead = self.operand(&first, lead, OperandPosition::Left)?;
        let middle = self.operand(&first, middle, OperandPosition::Center)?;
        let last = self.operand(&first, otherwise, OperandPosition::Right)?;
        Ok(format!(
            "{lead} {} {middle} {} {last}",
            first.value, second.value
        ))
    }

    /// `a < b < c` where comparisons chain, `a < b && b < c` elsewhere.
    fn compound_comparison(&mut self, items: &[ExprId]) -> Result<String, ViewError> {
        if self.lang().chains_comparisons() {
            return self.chain(items);
        }
        let Some(and) = self.lang().binary(BinaryOp::And) else {
            return Err(self.unsupported("compound comparison"));
        };
        let mut parts = Vec::with_capacity(items.len());
        for (i, &item) in items.iter().enumerate() {
            let position = if i == 0 {
                OperandPosition::Left
            } else {
                OperandPosition::Right
            };
            parts.push(self.operand(&and, item, position)?);
        }
        Ok(parts.join(&format!(" {} ", and.value)))
    }

    /// Chain adjacent comparisons, printing each shared operand once.
    fn chain(&mut self, items: &[ExprId]) -> Result<String, ViewError> {
        let ast = self.ast();
        let mut out = String::new();
        for (i, &item) in items.iter().enumerate() {
            let Expr::Binary { op, left, right } = ast.expr(item) else {
                return Err(IrError::Malformed {
                    node: "compound comparison",
                    reason: format!("operand is a {}", ast.expr(item).kind_name()),
                }
                .into());
            };
            let Some(token) = self.binary_operator(*op, *left, *right) else {
                return Err(self.unsupported(format!("operator `{}`", op.as_symbol())));
            };
            if i == 0 {
                out.push_str(&self.operand(&token, *left, OperandPosition::Left)?);
            }
            out.push_str(&format!(" {} ", token.value));
            out.push_str(&self.operand(&token, *right, OperandPosition::Right)?);
        }
        Ok(out)
    }

    fn cast(&mut self, ty: TypeId, value: ExprId) -> Result<String, ViewError> {
        let Some(token) = self.lang().cast() else {
            return Err(self.unsupported("cast"));
        };
        let ty = self.type_name(self.ast().ty(ty))?;
        let value = self.operand(&token, value, OperandPosition::Right)?;
        Ok(format!("({ty}) {value}"))
    }

    fn size_of(&mut self, _value: ExprId) -> Result<String, ViewError> {
        Err(self.unsupported("sizeof"))
    }

    fn new_object(&mut self, ty: &Type, args: &[ExprId]) -> Result<String, ViewError> {
        let ty = self.type_name(ty)?;
        Ok(format!("new {ty}({})", self.args(args)?))
    }

    fn sequence(&mut self, items: &[ExprId]) -> Result<String, ViewError> {
        self.args(items)
    }

    /// Type of a literal or value, registering any assignment inside it.
    fn inferred(&mut self, id: ExprId) -> Type {
        let ast = self.ast();
        mt_types::infer_expr(ast, id, self.scope())
    }
}

/// Shortest round-tripping spelling that still reads as a float.
pub(crate) fn float_literal(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains(['.', 'e', 'E']) {
        format!("{text}.0")
    } else {
        text
    }
}

pub(crate) fn join_path(path: &[Name], separator: &str) -> String {
    path.iter()
        .map(Name::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}
