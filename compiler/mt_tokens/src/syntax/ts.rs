use std::ops::Range;

use super::SyntaxNode;

impl SyntaxNode for ::tree_sitter::Node<'_> {
    fn kind(&self) -> &str {
        ::tree_sitter::Node::kind(self)
    }

    fn child_count(&self) -> usize {
        ::tree_sitter::Node::child_count(self)
    }

    fn child(&self, index: usize) -> Option<Self> {
        ::tree_sitter::Node::child(self, index)
    }

    fn field_name(&self, index: usize) -> Option<&str> {
        u32::try_from(index)
            .ok()
            .and_then(|index| self.field_name_for_child(index))
    }

    fn byte_range(&self) -> Range<usize> {
        ::tree_sitter::Node::byte_range(self)
    }
}
