//! Class/function location extraction for the symbol index.
//!
//! Unlike segmentation this keeps methods nested under their class and skips
//! logical blocks and imports entirely. Names are unqualified, so a function
//! inside `mod a` and one at file level share a key; the later one wins.

use crate::naming::definition_name;
use crate::segmenter::{classify, Segment};
use crate::syntax::{child_by_field, end_point, named_children, start_point, SyntaxTree};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tree_sitter::Node;

/// Location of a named definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub name: String,
    pub file_path: String,
    pub start_byte: usize,
    pub end_byte: usize,
    /// 0-based `(row, column)`
    pub start_point: (usize, usize),
    /// 0-based `(row, column)`
    pub end_point: (usize, usize),
}

impl SymbolEntry {
    fn from_node(name: String, file_path: &str, node: Node<'_>) -> Self {
        Self {
            name,
            file_path: file_path.to_string(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_point: start_point(node),
            end_point: end_point(node),
        }
    }

    /// 1-based inclusive line span
    pub const fn line_span(&self) -> (usize, usize) {
        (self.start_point.0 + 1, self.end_point.0 + 1)
    }
}

/// A class entry with its methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSymbol {
    #[serde(flatten)]
    pub entry: SymbolEntry,
    #[serde(default)]
    pub methods: BTreeMap<String, SymbolEntry>,
}

/// Definitions found in one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSymbols {
    pub classes: BTreeMap<String, ClassSymbol>,
    pub functions: BTreeMap<String, SymbolEntry>,
}

impl FileSymbols {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.functions.is_empty()
    }
}

/// Extract classes (with methods) and functions from a parsed file, looking
/// inside module and namespace bodies.
pub fn extract_symbols(tree: &SyntaxTree<'_>, file_path: &str) -> FileSymbols {
    let mut extraction = Extraction {
        tree,
        file_path,
        symbols: FileSymbols::default(),
        extension_only: HashSet::new(),
    };
    extraction.visit(&tree.top_level_nodes());
    extraction.symbols
}

struct Extraction<'a, 'src> {
    tree: &'a SyntaxTree<'src>,
    file_path: &'a str,
    symbols: FileSymbols,
    /// Classes so far only known from an extension block (`impl` before `struct`)
    extension_only: HashSet<String>,
}

impl Extraction<'_, '_> {
    fn visit(&mut self, nodes: &[Node<'_>]) {
        let (tree, file_path) = (self.tree, self.file_path);
        for &node in nodes {
            match classify(tree, node) {
                Segment::Class { definition } => {
                    let Some(name) = definition_name(tree, definition) else {
                        continue;
                    };
                    let methods = class_methods(tree, definition, file_path);
                    let entry = SymbolEntry::from_node(name.clone(), file_path, node);
                    let is_extension = tree.profile().is_extension(definition.kind());
                    self.add_class(name, entry, methods, is_extension);
                }
                Segment::Function {
                    name: Some(name), ..
                } => {
                    let entry = SymbolEntry::from_node(name.clone(), file_path, node);
                    self.symbols.functions.insert(name, entry);
                }
                Segment::Container { body } => self.visit(&named_children(body)),
                _ => {}
            }
        }
    }

    fn add_class(
        &mut self,
        name: String,
        entry: SymbolEntry,
        methods: BTreeMap<String, SymbolEntry>,
        is_extension: bool,
    ) {
        match self.symbols.classes.get_mut(&name) {
            Some(existing) if is_extension => existing.methods.extend(methods),
            Some(existing) if self.extension_only.remove(&name) => {
                existing.entry = entry;
                existing.methods.extend(methods);
            }
            _ => {
                if is_extension {
                    self.extension_only.insert(name.clone());
                }
                self.symbols.classes.insert(name, ClassSymbol { entry, methods });
            }
        }
    }
}

fn class_methods(
    tree: &SyntaxTree<'_>,
    definition: Node<'_>,
    file_path: &str,
) -> BTreeMap<String, SymbolEntry> {
    let mut methods = BTreeMap::new();
    let profile = tree.profile();
    let body = child_by_field(definition, "body").or_else(|| {
        named_children(definition)
            .into_iter()
            .find(|child| profile.is_class_body(child.kind()))
    });
    let Some(body) = body else {
        return methods;
    };

    for member in named_children(body) {
        if let Segment::Function {
            name: Some(name), ..
        } = classify(tree, member)
        {
            let entry = SymbolEntry::from_node(name.clone(), file_path, member);
            methods.insert(name, entry);
        }
    }
    methods
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::syntax::{BundledGrammars, SyntaxParser};
    use pretty_assertions::assert_eq;

    fn symbols(language: Language, code: &str) -> FileSymbols {
        let mut parser = SyntaxParser::new(&BundledGrammars, language).unwrap();
        let tree = parser.parse(code).unwrap();
        extract_symbols(&tree, "src/file")
    }

    #[test]
    fn python_methods_nest_under_class() {
        let code = r#"import os

class Library:
    def __init__(self):
        self.books = []

    @property
    def size(self):
        return len(self.books)

def helper():
    pass

x = helper()
"#;
        let found = symbols(Language::Python, code);

        assert_eq!(found.classes.keys().collect::<Vec<_>>(), vec!["Library"]);
        assert_eq!(found.functions.keys().collect::<Vec<_>>(), vec!["helper"]);

        let library = &found.classes["Library"];
        assert_eq!(
            library.methods.keys().collect::<Vec<_>>(),
            vec!["__init__", "size"]
        );
        assert_eq!(library.entry.line_span(), (3, 9));

        let helper = &found.functions["helper"];
        assert_eq!(&code[helper.start_byte..helper.end_byte], "def helper():\n    pass");
    }

    #[test]
    fn rust_impl_methods_merge_into_struct() {
        let code = "struct Point { x: i32 }\n\nimpl Point {\n    fn new() -> Self { Point { x: 0 } }\n    fn x(&self) -> i32 { self.x }\n}\n\nfn main() {}\n";
        let found = symbols(Language::Rust, code);

        let point = &found.classes["Point"];
        assert_eq!(point.entry.start_point, (0, 0));
        assert_eq!(point.methods.keys().collect::<Vec<_>>(), vec!["new", "x"]);
        assert!(found.functions.contains_key("main"));
    }

    #[test]
    fn rust_impl_before_struct_keeps_methods() {
        let code = "impl Point {\n    fn len(&self) -> i32 { 0 }\n}\n\nstruct Point;\n";
        let found = symbols(Language::Rust, code);

        let point = &found.classes["Point"];
        assert_eq!(point.entry.start_point, (4, 0));
        assert_eq!(point.methods.keys().collect::<Vec<_>>(), vec!["len"]);
    }

    #[test]
    fn extracts_methods_inside_module_impl() {
        let code = "mod api {\n    pub struct Car;\n\n    impl Car {\n        pub fn drive(&self) {}\n        fn stop(&self) {}\n    }\n\n    pub mod nested {\n        pub fn park() {}\n    }\n}\n\nmod external;\n";
        let found = symbols(Language::Rust, code);

        let car = &found.classes["Car"];
        assert_eq!(car.entry.start_point, (1, 4));
        assert_eq!(car.methods.keys().collect::<Vec<_>>(), vec!["drive", "stop"]);
        assert_eq!(found.functions.keys().collect::<Vec<_>>(), vec!["park"]);
    }

    #[test]
    fn typescript_namespace_members_are_indexed() {
        let code = "namespace Shapes {\n  export class Circle {\n    area() { return 0; }\n  }\n  export function unit() { return new Circle(); }\n}\n\nenum Color { Red, Green }\n";
        let found = symbols(Language::TypeScript, code);

        assert_eq!(
            found.classes.keys().collect::<Vec<_>>(),
            vec!["Circle", "Color"]
        );
        assert!(found.classes["Circle"].methods.contains_key("area"));
        assert!(found.classes["Color"].methods.is_empty());
        assert_eq!(found.functions.keys().collect::<Vec<_>>(), vec!["unit"]);
    }

    #[test]
    fn javascript_class_methods_and_exports() {
        let code = "export class Cart {\n  add(item) { this.items.push(item); }\n  total() { return 0; }\n}\nexport function checkout(cart) {}\nconst render = () => null;\n";
        let found = symbols(Language::JavaScript, code);

        assert_eq!(
            found.classes["Cart"].methods.keys().collect::<Vec<_>>(),
            vec!["add", "total"]
        );
        assert_eq!(
            found.functions.keys().collect::<Vec<_>>(),
            vec!["checkout", "render"]
        );
    }
}
