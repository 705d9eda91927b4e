//! Concrete syntax tree boundary.
//!
//! The tokenizer walks any [`SyntaxNode`]. Parsers either implement the
//! trait for their own node handles (tree-sitter nodes do, behind the
//! `tree-sitter` feature) or convert into the owned [`CstNode`].

#[cfg(feature = "tree-sitter")]
mod ts;

use std::ops::Range;

/// A node of a concrete syntax tree, addressed by a cheap handle.
pub trait SyntaxNode: Copy {
    /// Grammar kind, e.g. `binary_expression`.
    fn kind(&self) -> &str;

    fn child_count(&self) -> usize;

    fn child(&self, index: usize) -> Option<Self>;

    /// Field name under which the child at `index` is attached, if any.
    fn field_name(&self, index: usize) -> Option<&str>;

    /// Byte span of the node in the source text.
    fn byte_range(&self) -> Range<usize>;
}

/// Owned concrete syntax tree node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CstNode {
    kind: String,
    range: Range<usize>,
    children: Vec<(Option<String>, CstNode)>,
}

impl CstNode {
    pub fn leaf(kind: impl Into<String>, range: Range<usize>) -> Self {
        CstNode {
            kind: kind.into(),
            range,
            children: Vec::new(),
        }
    }

    /// An inner node spanning its first to its last child.
    pub fn branch(kind: impl Into<String>, children: Vec<(Option<&str>, CstNode)>) -> Self {
        let start = children.first().map_or(0, |(_, c)| c.range.start);
        let end = children.last().map_or(start, |(_, c)| c.range.end);
        CstNode {
            kind: kind.into(),
            range: start..end,
            children: children
                .into_iter()
                .map(|(field, child)| (field.map(str::to_owned), child))
                .collect(),
        }
    }
}

impl<'a> SyntaxNode for &'a CstNode {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> Option<&'a CstNode> {
        self.children.get(index).map(|(_, child)| child)
    }

    fn field_name(&self, index: usize) -> Option<&str> {
        self.children.get(index).and_then(|(field, _)| field.as_deref())
    }

    fn byte_range(&self) -> Range<usize> {
        self.range.clone()
    }
}
