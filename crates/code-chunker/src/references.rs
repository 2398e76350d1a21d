use crate::naming::{definition_name, trailing_identifier};
use crate::profile::NodeRole;
use crate::syntax::{child_by_field, SyntaxTree};
use crate::types::ChunkReferences;
use tree_sitter::Node;

/// Accumulates call and class references over one or more subtrees.
///
/// Calls contribute their callee's trailing identifier; class definitions and
/// instantiation expressions contribute the class name.
pub struct ReferenceCollector<'a, 'src> {
    tree: &'a SyntaxTree<'src>,
    references: ChunkReferences,
}

impl<'a, 'src> ReferenceCollector<'a, 'src> {
    pub fn new(tree: &'a SyntaxTree<'src>) -> Self {
        Self {
            tree,
            references: ChunkReferences::default(),
        }
    }

    /// Depth-first visit of `root` and all its descendants
    pub fn visit(&mut self, root: Node<'_>) {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            self.record(node);

            let mut cursor = node.walk();
            let children: Vec<_> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }

    /// Finish collection. `own_name` is removed from both sets so a class never
    /// references itself.
    pub fn finish(mut self, own_name: Option<&str>) -> ChunkReferences {
        if let Some(name) = own_name {
            self.references.class_instances.remove(name);
            self.references.function_calls.remove(name);
        }
        self.references
    }

    fn record(&mut self, node: Node<'_>) {
        let profile = self.tree.profile();
        let kind = node.kind();

        if let Some(field) = profile.call_field(kind) {
            if let Some(name) =
                child_by_field(node, field).and_then(|callee| trailing_identifier(self.tree, callee))
            {
                self.references.function_calls.insert(name);
            }
        }

        if let Some(field) = profile.instantiation_field(kind) {
            if let Some(name) =
                child_by_field(node, field).and_then(|ty| trailing_identifier(self.tree, ty))
            {
                self.references.class_instances.insert(name);
            }
        }

        if profile.role_of(kind) == NodeRole::Class {
            if let Some(name) = definition_name(self.tree, node) {
                self.references.class_instances.insert(name);
            }
        }
    }
}

/// References of a single subtree
pub fn collect_references(
    tree: &SyntaxTree<'_>,
    node: Node<'_>,
    own_name: Option<&str>,
) -> ChunkReferences {
    let mut collector = ReferenceCollector::new(tree);
    collector.visit(node);
    collector.finish(own_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::syntax::{BundledGrammars, SyntaxParser};
    use pretty_assertions::assert_eq;

    fn refs_of_first(language: Language, code: &str, own: Option<&str>) -> ChunkReferences {
        let mut parser = SyntaxParser::new(&BundledGrammars, language).unwrap();
        let tree = parser.parse(code).unwrap();
        let node = tree.top_level_nodes()[0];
        collect_references(&tree, node, own)
    }

    fn set(items: &[&str]) -> std::collections::BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn python_calls_and_nested_classes() {
        let code = r#"class Library:
    class Shelf:
        pass

    def add(self, title):
        book = Book(title)
        self.books.append(book)
        print(len(self.books))
"#;
        let refs = refs_of_first(Language::Python, code, Some("Library"));
        assert_eq!(refs.function_calls, set(&["Book", "append", "len", "print"]));
        assert_eq!(refs.class_instances, set(&["Shelf"]));
    }

    #[test]
    fn javascript_new_expression_is_a_class_instance() {
        let code = "function load() {\n  const api = new ApiClient(url);\n  return api.fetchAll();\n}\n";
        let refs = refs_of_first(Language::JavaScript, code, None);
        assert_eq!(refs.function_calls, set(&["fetchAll"]));
        assert_eq!(refs.class_instances, set(&["ApiClient"]));
    }

    #[test]
    fn rust_struct_expressions_and_paths() {
        let code = "fn origin() -> Point {\n    let p = Point { x: 0, y: 0 };\n    Vec::new();\n    p.normalize()\n}\n";
        let refs = refs_of_first(Language::Rust, code, None);
        assert_eq!(refs.function_calls, set(&["new", "normalize"]));
        assert_eq!(refs.class_instances, set(&["Point"]));
    }
}
