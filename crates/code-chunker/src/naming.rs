use crate::syntax::{child_by_field, SyntaxTree};
use tree_sitter::Node;

/// Name of a class/function definition node, resolved through the language's
/// name field. `None` when the grammar produced no usable name.
pub fn definition_name(tree: &SyntaxTree<'_>, node: Node<'_>) -> Option<String> {
    let field = tree.profile().name_field(node.kind());
    let name_node = child_by_field(node, field)?;
    trailing_identifier(tree, name_node)
}

/// Follow member/path accesses down to the last identifier:
/// `self.store.save` → `save`, `Vec::<T>::new` → `new`, `Foo<T>` → `Foo`.
pub fn trailing_identifier(tree: &SyntaxTree<'_>, node: Node<'_>) -> Option<String> {
    let profile = tree.profile();
    let mut current = node;
    loop {
        if current.named_child_count() == 0 {
            let text = tree.text(current).trim();
            return (!text.is_empty()).then(|| text.to_string());
        }
        let field = profile.member_field(current.kind())?;
        current = child_by_field(current, field)?;
    }
}
