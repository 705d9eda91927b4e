//! Operator classification tokenizer.
//!
//! Two sources produce the same [`TokenList`] shape:
//!
//! - [`Tokenizer::tokenize`] walks a concrete syntax tree over the source
//!   text. Leaves become tokens; operator nodes tag their operand spans.
//! - [`Tokenizer::tokenize_tree`] linearizes a meaning-tree expression or
//!   simple statement in the target language, inserting the grouping the
//!   [`parens`](crate::parens) engine requires.
//!
//! # Operand tagging
//!
//! An operator node collects one contiguous group per child. Children under
//! an operand field become operands at that field's position; the first
//! single-token operator group is the operator. Tags are written after the
//! children were tokenized, so an enclosing operator overwrites the tags of
//! its nested operators' tokens.

mod tree;

use mt_ir::{Ast, NodeId};
use smallvec::SmallVec;

use crate::lang::{Language, Leaf};
use crate::{
    Arity, OperandPosition, OperatorPosition, SyntaxNode, Token, TokenError, TokenGroup, TokenList,
};

/// Tokenizer for one language.
#[derive(Copy, Clone, Debug)]
pub struct Tokenizer<'l> {
    lang: &'l dyn Language,
}

impl<'l> Tokenizer<'l> {
    pub fn new(lang: &'l dyn Language) -> Self {
        Tokenizer { lang }
    }

    pub fn language(&self) -> &'l dyn Language {
        self.lang
    }

    /// Tokenize `source` along its concrete syntax tree.
    #[tracing::instrument(level = "trace", skip_all, fields(language = self.lang.name()))]
    pub fn tokenize<N: SyntaxNode>(&self, source: &str, root: N) -> TokenList {
        let mut tokens = TokenList::new();
        self.collect(source, root, None, None, &mut tokens);
        tracing::debug!(count = tokens.len(), "tokenized source");
        tokens
    }

    /// Linearize the expression or simple statement at `node`.
    #[tracing::instrument(level = "trace", skip_all, fields(language = self.lang.name()))]
    pub fn tokenize_tree(&self, ast: &Ast, node: NodeId) -> Result<TokenList, TokenError> {
        let tokens = tree::linearize(self.lang, ast, node)?;
        tracing::debug!(count = tokens.len(), "tokenized tree");
        Ok(tokens)
    }

    fn collect<N: SyntaxNode>(
        &self,
        source: &str,
        node: N,
        parent_kind: Option<&str>,
        field: Option<&str>,
        tokens: &mut TokenList,
    ) -> TokenGroup {
        let start = tokens.len();
        let kind = node.kind();
        if node.child_count() == 0 || self.lang.stop_nodes().contains(&kind) {
            self.push_leaf(source, node, parent_kind, field, tokens);
            return tokens.since(start);
        }
        match self.lang.operator_arity(kind) {
            Some(Arity::Unary) => self.collect_unary(source, node, tokens),
            Some(Arity::Binary | Arity::Ternary) => self.collect_operator(source, node, tokens),
            None => {
                for i in 0..node.child_count() {
                    if let Some(child) = node.child(i) {
                        self.collect(source, child, Some(kind), node.field_name(i), tokens);
                    }
                }
            }
        }
        tokens.since(start)
    }

    fn push_leaf<N: SyntaxNode>(
        &self,
        source: &str,
        node: N,
        parent_kind: Option<&str>,
        field: Option<&str>,
        tokens: &mut TokenList,
    ) {
        let Some(text) = source.get(node.byte_range()) else {
            tracing::trace!(kind = node.kind(), "leaf outside of source text");
            return;
        };
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let operator = parent_kind.and_then(|parent| self.lang.cst_operator(text, parent));
        let token = match operator {
            Some(op) => Token::operator(op),
            None => {
                let leaf = Leaf {
                    text,
                    kind: node.kind(),
                    parent_kind,
                    field,
                };
                Token::new(text, self.lang.classify(&leaf))
            }
        };
        tokens.push(token);
    }

    fn collect_operator<N: SyntaxNode>(&self, source: &str, node: N, tokens: &mut TokenList) {
        let kind = node.kind();
        let positional = self.lang.positional_operands(kind);
        let mut operator = None;
        let mut operands: SmallVec<[(OperandPosition, TokenGroup); 3]> = SmallVec::new();
        let mut unplaced: SmallVec<[TokenGroup; 3]> = SmallVec::new();
        for i in 0..node.child_count() {
            let Some(child) = node.child(i) else {
                continue;
            };
            let field = node.field_name(i);
            let group = self.collect(source, child, Some(kind), field, tokens);
            if let Some(position) = field.and_then(|f| self.lang.operand_position(kind, f)) {
                operands.push((position, group));
            } else if group.len() == 1 && tokens[group.start].is_operator() {
                operator.get_or_insert(group.start);
            } else if positional && !group.is_empty() {
                unplaced.push(group);
            }
        }
        let Some(operator) = operator else {
            tracing::trace!(kind, "operator node without an operator token");
            return;
        };
        if positional {
            place_by_order(self.lang.operator_arity(kind), operator, &unplaced, &mut operands);
        }
        for (position, group) in operands {
            tokens.assign_operands(group, operator, position);
        }
    }

    fn collect_unary<N: SyntaxNode>(&self, source: &str, node: N, tokens: &mut TokenList) {
        let kind = node.kind();
        let start = tokens.len();
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                self.collect(source, child, Some(kind), node.field_name(i), tokens);
            }
        }
        let group = tokens.since(start);
        if group.len() < 2 {
            return;
        }
        if tokens[group.start].is_operator() {
            let operand = TokenGroup::new(group.start + 1, group.stop);
            tokens.assign_operands(operand, group.start, OperandPosition::Right);
        } else if tokens[group.stop - 1].is_operator() {
            let operator = group.stop - 1;
            if let Some(token) = tokens.get_mut(operator) {
                let postfix = self.lang.postfix_operator(&token.value);
                token.operator = token
                    .operator
                    .map(|op| postfix.unwrap_or(op.at(OperatorPosition::Postfix)));
            }
            let operand = TokenGroup::new(group.start, operator);
            tokens.assign_operands(operand, operator, OperandPosition::Left);
        }
    }
}

/// Positions for operands that carry no field name: in child order for a
/// ternary, the nearest groups around the operator otherwise. Further
/// groups of a chain (`a < b < c`) stay untagged.
fn place_by_order(
    arity: Option<Arity>,
    operator: usize,
    groups: &[TokenGroup],
    operands: &mut SmallVec<[(OperandPosition, TokenGroup); 3]>,
) {
    if arity == Some(Arity::Ternary) {
        let positions = [
            OperandPosition::Left,
            OperandPosition::Center,
            OperandPosition::Right,
        ];
        operands.extend(positions.into_iter().zip(groups.iter().copied()));
        return;
    }
    if let Some(&left) = groups.iter().rev().find(|g| g.stop <= operator) {
        operands.push((OperandPosition::Left, left));
    }
    if let Some(&right) = groups.iter().find(|g| g.start > operator) {
        operands.push((OperandPosition::Right, right));
    }
}

#[cfg(test)]
mod tests;
