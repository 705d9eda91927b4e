//! Meaning-tree linearization.

use mt_ir::{Ast, Expr, ExprId, Node, NodeId, Stmt, StmtId};

use crate::lang::{quote_string, Language, Literal, TernaryLayout};
use crate::parens::wrap_operand;
use crate::{OperandPosition, OperatorToken, Token, TokenError, TokenGroup, TokenKind, TokenList};

pub(super) fn linearize(
    lang: &dyn Language,
    ast: &Ast,
    node: NodeId,
) -> Result<TokenList, TokenError> {
    let mut linearizer = Linearizer {
        lang,
        ast,
        tokens: TokenList::new(),
    };
    match ast.node(node) {
        Node::Expr(_) => {
            if let Some(expr) = ast.as_expr(node) {
                linearizer.expr(expr)?;
            }
        }
        Node::Stmt(_) => {
            if let Some(stmt) = ast.as_stmt(node) {
                linearizer.stmt(stmt)?;
            }
        }
        other => return Err(linearizer.unsupported(other.kind_name())),
    }
    Ok(linearizer.tokens)
}

struct Linearizer<'a> {
    lang: &'a dyn Language,
    ast: &'a Ast,
    tokens: TokenList,
}

impl Linearizer<'_> {
    fn unsupported(&self, construct: &'static str) -> TokenError {
        TokenError::Unsupported {
            language: self.lang.name(),
            construct,
        }
    }

    fn push(&mut self, value: impl Into<String>, kind: TokenKind) -> usize {
        self.tokens.push(Token::new(value, kind))
    }

    fn literal(&mut self, literal: Literal, construct: &'static str) -> Result<(), TokenError> {
        let text = self
            .lang
            .literal(literal)
            .ok_or_else(|| self.unsupported(construct))?;
        let kind = match literal {
            Literal::SelfRef | Literal::SuperRef => TokenKind::Keyword,
            Literal::True | Literal::False | Literal::Null => TokenKind::Const,
        };
        self.push(text, kind);
        Ok(())
    }

    fn stmt(&mut self, id: StmtId) -> Result<(), TokenError> {
        match self.ast.stmt(id) {
            Stmt::Expr(expr) => {
                self.expr(*expr)?;
            }
            Stmt::Assign { op, target, value } => {
                let token = self
                    .lang
                    .assign_statement(*op)
                    .ok_or_else(|| self.unsupported(op.as_symbol()))?;
                self.infix(token, *target, *value)?;
            }
            Stmt::Return(value) => {
                self.push("return", TokenKind::Keyword);
                if let Some(value) = value {
                    self.expr(*value)?;
                }
            }
            Stmt::Block(items) => {
                let braced = self.lang.statement_end().is_some();
                if braced {
                    self.push("{", TokenKind::CompoundOpenBrace);
                }
                for &item in items {
                    let stmt = self
                        .ast
                        .as_stmt(item)
                        .ok_or_else(|| self.unsupported(self.ast.node(item).kind_name()))?;
                    self.stmt(stmt)?;
                }
                if braced {
                    self.push("}", TokenKind::CompoundCloseBrace);
                }
                return Ok(());
            }
            other => return Err(self.unsupported(other.kind_name())),
        }
        if let Some(end) = self.lang.statement_end() {
            self.push(end, TokenKind::StatementToken);
        }
        Ok(())
    }

    fn expr(&mut self, id: ExprId) -> Result<TokenGroup, TokenError> {
        let start = self.tokens.len();
        match self.ast.expr(id) {
            Expr::Int(value) => {
                self.push(value.to_string(), TokenKind::Const);
            }
            Expr::Float(bits) => {
                self.push(format!("{:?}", f64::from_bits(*bits)), TokenKind::Const);
            }
            Expr::Str { value, .. } => {
                self.push(quote_string(value), TokenKind::Const);
            }
            Expr::Bool(true) => self.literal(Literal::True, "boolean literal")?,
            Expr::Bool(false) => self.literal(Literal::False, "boolean literal")?,
            Expr::Null => self.literal(Literal::Null, "null literal")?,
            Expr::SelfRef => self.literal(Literal::SelfRef, "self reference")?,
            Expr::SuperRef => self.literal(Literal::SuperRef, "super reference")?,
            Expr::Ident(name) => {
                self.push(name.as_str(), TokenKind::Identifier);
            }
            Expr::Scoped(parts) => {
                let joined = parts
                    .iter()
                    .map(mt_ir::Name::as_str)
                    .collect::<Vec<_>>()
                    .join(self.lang.scope_separator());
                self.push(joined, TokenKind::Identifier);
            }
            Expr::Binary { op, left, right } => {
                let token = self
                    .lang
                    .binary(*op)
                    .ok_or_else(|| self.unsupported(op.as_symbol()))?;
                self.infix(token, *left, *right)?;
            }
            Expr::Assign { op, target, value } => {
                let token = self
                    .lang
                    .assign(*op)
                    .ok_or_else(|| self.unsupported(op.as_symbol()))?;
                self.infix(token, *target, *value)?;
            }
            Expr::Unary { op, operand } => {
                let token = self
                    .lang
                    .unary(*op)
                    .ok_or_else(|| self.unsupported(op.as_symbol()))?;
                if token.is_prefix_unary() {
                    let index = self.tokens.push(Token::operator(token));
                    let group = self.operand(&token, *operand, OperandPosition::Right)?;
                    self.tokens
                        .assign_operands(group, index, OperandPosition::Right);
                } else {
                    let group = self.operand(&token, *operand, OperandPosition::Left)?;
                    let index = self.tokens.push(Token::operator(token));
                    self.tokens
                        .assign_operands(group, index, OperandPosition::Left);
                }
            }
            Expr::Ternary {
                cond,
                then,
                otherwise,
            } => self.ternary(*cond, *then, *otherwise)?,
            Expr::CompoundComparison(items) => self.compound_comparison(items)?,
            Expr::Paren(inner) => {
                self.push("(", TokenKind::OpenBrace);
                self.expr(*inner)?;
                self.push(")", TokenKind::CloseBrace);
            }
            Expr::Call { callee, args } => {
                if let Expr::Ident(name) = self.ast.expr(*callee) {
                    self.push(name.as_str(), TokenKind::CallableIdentifier);
                } else {
                    self.access_target(*callee)?;
                }
                self.arguments(args)?;
            }
            Expr::MethodCall {
                receiver,
                method,
                args,
            } => {
                self.access_target(*receiver)?;
                self.push(".", TokenKind::Separator);
                self.push(method.as_str(), TokenKind::CallableIdentifier);
                self.arguments(args)?;
            }
            Expr::Index { target, index } => {
                self.access_target(*target)?;
                self.push("[", TokenKind::SubscriptOpenBrace);
                self.expr(*index)?;
                self.push("]", TokenKind::SubscriptCloseBrace);
            }
            Expr::Member { target, member } => {
                self.access_target(*target)?;
                self.push(".", TokenKind::Separator);
                self.push(member.as_str(), TokenKind::Identifier);
            }
            Expr::Char(_)
            | Expr::Interpolated(_)
            | Expr::Collection { .. }
            | Expr::Dict(_)
            | Expr::Cast { .. }
            | Expr::SizeOf(_)
            | Expr::New { .. }
            | Expr::NewArray { .. }
            | Expr::Sequence(_) => return Err(self.unsupported(self.ast.expr(id).kind_name())),
        }
        Ok(self.tokens.since(start))
    }

    /// `child` as an operand of `parent`, wrapped when grouping is required.
    fn operand(
        &mut self,
        parent: &OperatorToken,
        child: ExprId,
        position: OperandPosition,
    ) -> Result<TokenGroup, TokenError> {
        let start = self.tokens.len();
        if wrap_operand(self.lang, self.ast, parent, child, position) {
            self.push("(", TokenKind::OpenBrace);
            self.expr(child)?;
            self.push(")", TokenKind::CloseBrace);
        } else {
            self.expr(child)?;
        }
        Ok(self.tokens.since(start))
    }

    fn infix(&mut self, token: OperatorToken, left: ExprId, right: ExprId) -> Result<(), TokenError> {
        let left = self.operand(&token, left, OperandPosition::Left)?;
        let index = self.tokens.push(Token::operator(token));
        let right = self.operand(&token, right, OperandPosition::Right)?;
        self.tokens.assign_operands(left, index, OperandPosition::Left);
        self.tokens.assign_operands(right, index, OperandPosition::Right);
        Ok(())
    }

    fn ternary(&mut self, cond: ExprId, then: ExprId, otherwise: ExprId) -> Result<(), TokenError> {
        let [first, second] = self.lang.ternary();
        let (left, center) = match self.lang.ternary_layout() {
            TernaryLayout::CondFirst => (cond, then),
            TernaryLayout::ThenFirst => (then, cond),
        };
        let left = self.operand(&first, left, OperandPosition::Left)?;
        let index = self.tokens.push(Token::operator(first));
        let center = self.operand(&first, center, OperandPosition::Center)?;
        self.tokens.push(Token::operator(second));
        let right = self.operand(&first, otherwise, OperandPosition::Right)?;
        self.tokens.assign_operands(left, index, OperandPosition::Left);
        self.tokens.assign_operands(center, index, OperandPosition::Center);
        self.tokens.assign_operands(right, index, OperandPosition::Right);
        Ok(())
    }

    /// Chained natively where the language allows it, otherwise joined
    /// with logical and.
    fn compound_comparison(&mut self, items: &[ExprId]) -> Result<(), TokenError> {
        let start = self.tokens.len();
        let Some((&first, rest)) = items.split_first() else {
            return Err(self.unsupported("compound comparison"));
        };

        if self.lang.chains_comparisons() {
            let mut previous = None;
            for &item in items {
                let Expr::Binary { op, left, right } = self.ast.expr(item) else {
                    return Err(self.unsupported("compound comparison"));
                };
                let token = self
                    .lang
                    .binary(*op)
                    .ok_or_else(|| self.unsupported(op.as_symbol()))?;
                let left = match previous {
                    Some(group) => group,
                    None => self.operand(&token, *left, OperandPosition::Left)?,
                };
                let index = self.tokens.push(Token::operator(token));
                let right = self.operand(&token, *right, OperandPosition::Right)?;
                self.tokens.assign_operands(left, index, OperandPosition::Left);
                self.tokens.assign_operands(right, index, OperandPosition::Right);
                previous = Some(right);
            }
            return Ok(());
        }

        let and = self
            .lang
            .binary(mt_ir::BinaryOp::And)
            .ok_or_else(|| self.unsupported("compound comparison"))?;
        let mut left = self.operand(&and, first, OperandPosition::Left)?;
        for &item in rest {
            let index = self.tokens.push(Token::operator(and));
            let right = self.operand(&and, item, OperandPosition::Right)?;
            self.tokens.assign_operands(left, index, OperandPosition::Left);
            self.tokens.assign_operands(right, index, OperandPosition::Right);
            left = self.tokens.since(start);
        }
        Ok(())
    }

    fn access_target(&mut self, target: ExprId) -> Result<TokenGroup, TokenError> {
        let access = self.lang.access();
        self.operand(&access, target, OperandPosition::Left)
    }

    fn arguments(&mut self, args: &[ExprId]) -> Result<(), TokenError> {
        self.push("(", TokenKind::CallOpenBrace);
        for (i, &arg) in args.iter().enumerate() {
            if i > 0 {
                self.push(",", TokenKind::Comma);
            }
            self.expr(arg)?;
        }
        self.push(")", TokenKind::CallCloseBrace);
        Ok(())
    }
}
