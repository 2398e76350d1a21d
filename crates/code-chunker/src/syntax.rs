//! Syntax tree adapter over tree-sitter.
//!
//! Grammars are obtained from an injected [`GrammarProvider`]; a
//! [`SyntaxParser`] is built per file and dropped with it, so no parser state
//! outlives a single chunking call.

use crate::error::{ChunkerError, Result};
use crate::language::Language;
use crate::profile::LanguageProfile;
use tree_sitter::{Node, Parser, Tree};

/// Capability that turns a language identifier into a grammar
pub trait GrammarProvider: Send + Sync {
    /// Grammar for `language`, or `None` when this provider cannot parse it
    fn grammar(&self, language: Language) -> Option<tree_sitter::Language>;
}

/// Grammars compiled into this crate
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledGrammars;

impl GrammarProvider for BundledGrammars {
    fn grammar(&self, language: Language) -> Option<tree_sitter::Language> {
        Some(language.tree_sitter_language())
    }
}

/// Parser bound to one language
pub struct SyntaxParser {
    parser: Parser,
    language: Language,
}

impl SyntaxParser {
    pub fn new(grammars: &dyn GrammarProvider, language: Language) -> Result<Self> {
        let grammar = grammars
            .grammar(language)
            .ok_or_else(|| ChunkerError::unsupported_language(language.as_str()))?;

        let mut parser = Parser::new();
        parser
            .set_language(&grammar)
            .map_err(|e| ChunkerError::incompatible_grammar(e.to_string()))?;

        Ok(Self { parser, language })
    }

    /// Parse source text. Syntax errors produce a best-effort tree, not an error.
    pub fn parse<'src>(&mut self, source: &'src str) -> Result<SyntaxTree<'src>> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ChunkerError::parse("Failed to parse source code"))?;

        Ok(SyntaxTree {
            tree,
            source,
            language: self.language,
        })
    }
}

/// A parsed file together with the text it was parsed from
pub struct SyntaxTree<'src> {
    tree: Tree,
    source: &'src str,
    language: Language,
}

impl<'src> SyntaxTree<'src> {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Ordered top-level node sequence
    pub fn top_level_nodes(&self) -> Vec<Node<'_>> {
        children(self.root())
    }

    pub const fn source(&self) -> &'src str {
        self.source
    }

    pub const fn language(&self) -> Language {
        self.language
    }

    pub fn profile(&self) -> &'static LanguageProfile {
        self.language.profile()
    }

    /// Exact source slice covered by `node`
    pub fn text(&self, node: Node<'_>) -> &'src str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or_default()
    }

    pub fn has_errors(&self) -> bool {
        self.root().has_error()
    }
}

/// All children, in source order
pub fn children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Named children, in source order
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

pub fn child_by_field<'t>(node: Node<'t>, field: &str) -> Option<Node<'t>> {
    node.child_by_field_name(field)
}

/// 0-based `(row, column)` of the node start
pub fn start_point(node: Node<'_>) -> (usize, usize) {
    let point = node.start_position();
    (point.row, point.column)
}

/// 0-based `(row, column)` of the node end
pub fn end_point(node: Node<'_>) -> (usize, usize) {
    let point = node.end_position();
    (point.row, point.column)
}
