//! Top-level segmentation of a parsed file into typed chunks.
//!
//! The file's top-level nodes are scanned left to right. Runs of imports
//! collapse into one chunk, classes and functions become one chunk each, and
//! everything else is grouped into logical blocks: at most one control-flow
//! statement per block, or a capped run of assignments/expressions. Module and
//! namespace bodies are segmented in place with the same rules.

use crate::config::ChunkerConfig;
use crate::naming::{definition_name, trailing_identifier};
use crate::profile::{DocstringStyle, NodeRole, ParameterStyle};
use crate::references::{collect_references, ReferenceCollector};
use crate::syntax::{child_by_field, named_children, SyntaxTree};
use crate::types::{ChunkMetadata, ChunkType, CodeChunk};
use tree_sitter::Node;

pub const IMPORT_CHUNK_NAME: &str = "import_statements";
pub const STANDALONE_CHUNK_NAME: &str = "standalone_code";

const FUNCTION_VALUE_KINDS: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

/// What a top-level node contributes to segmentation
#[derive(Debug, Clone)]
pub(crate) enum Segment<'t> {
    Import,
    Class {
        definition: Node<'t>,
    },
    Function {
        definition: Node<'t>,
        name: Option<String>,
    },
    ControlFlow {
        kind: &'static str,
    },
    Statement,
    /// Members of `body` are segmented as if they were top-level
    Container {
        body: Node<'t>,
    },
    Other,
}

/// Classify a node, looking through decorators/exports to the definition
/// they wrap.
pub(crate) fn classify<'t>(tree: &SyntaxTree<'_>, node: Node<'t>) -> Segment<'t> {
    let profile = tree.profile();
    match profile.role_of(node.kind()) {
        NodeRole::Import => Segment::Import,
        NodeRole::Class => Segment::Class { definition: node },
        NodeRole::Function => Segment::Function {
            definition: node,
            name: definition_name(tree, node),
        },
        NodeRole::ControlFlow => Segment::ControlFlow { kind: node.kind() },
        NodeRole::Statement => function_binding(tree, node)
            .or_else(|| statement_container(tree, node))
            .unwrap_or(Segment::Statement),
        NodeRole::Wrapper => {
            let inner = profile
                .wrapper_field(node.kind())
                .and_then(|field| child_by_field(node, field));
            match inner.map(|inner| classify(tree, inner)) {
                Some(Segment::Import) | Some(Segment::Other) => Segment::Other,
                Some(segment) => segment,
                None => Segment::Statement,
            }
        }
        NodeRole::Container => match child_by_field(node, "body") {
            Some(body) => Segment::Container { body },
            // `mod foo;`
            None => Segment::Other,
        },
        NodeRole::Other => Segment::Other,
    }
}

/// `const Foo = (a, b) => {...}` with exactly one declarator
fn function_binding<'t>(tree: &SyntaxTree<'_>, node: Node<'t>) -> Option<Segment<'t>> {
    if !tree.profile().function_bindings {
        return None;
    }

    let declarators: Vec<_> = named_children(node)
        .into_iter()
        .filter(|child| child.kind() == "variable_declarator")
        .collect();
    let [declarator] = declarators.as_slice() else {
        return None;
    };

    let value = child_by_field(*declarator, "value")?;
    if !FUNCTION_VALUE_KINDS.contains(&value.kind()) {
        return None;
    }

    let name = child_by_field(*declarator, "name").and_then(|n| trailing_identifier(tree, n));
    Some(Segment::Function {
        definition: value,
        name,
    })
}

/// `namespace A {}` parses as an expression statement around the namespace
fn statement_container<'t>(tree: &SyntaxTree<'_>, node: Node<'t>) -> Option<Segment<'t>> {
    let children = named_children(node);
    let [inner] = children.as_slice() else {
        return None;
    };
    match classify(tree, *inner) {
        container @ Segment::Container { .. } => Some(container),
        _ => None,
    }
}

/// Converts one parsed file into an ordered chunk sequence
pub struct Segmenter<'a, 'src> {
    config: &'a ChunkerConfig,
    tree: &'a SyntaxTree<'src>,
    file_path: &'a str,
}

impl<'a, 'src> Segmenter<'a, 'src> {
    pub fn new(config: &'a ChunkerConfig, tree: &'a SyntaxTree<'src>, file_path: &'a str) -> Self {
        Self {
            config,
            tree,
            file_path,
        }
    }

    pub fn segment(&self) -> Vec<CodeChunk> {
        let mut chunks = Vec::new();
        self.segment_nodes(&self.tree.top_level_nodes(), &mut chunks);

        if chunks.is_empty() && self.config.standalone_fallback {
            chunks.extend(self.standalone_chunk());
        }

        chunks
    }

    fn segment_nodes(&self, nodes: &[Node<'_>], chunks: &mut Vec<CodeChunk>) {
        let mut i = 0;

        while i < nodes.len() {
            let node = nodes[i];
            match classify(self.tree, node) {
                Segment::Import => {
                    let (chunk, next) = self.import_run(nodes, i);
                    chunks.push(chunk);
                    i = next;
                }
                Segment::Class { definition } => {
                    chunks.extend(self.class_chunk(node, definition));
                    i += 1;
                }
                Segment::Function { definition, name } => {
                    chunks.extend(self.function_chunk(node, definition, name));
                    i += 1;
                }
                Segment::Container { body } => {
                    self.segment_nodes(&named_children(body), chunks);
                    i += 1;
                }
                Segment::ControlFlow { .. } | Segment::Statement | Segment::Other => {
                    match self.logical_block(nodes, i) {
                        Some((chunk, next)) => {
                            chunks.push(chunk);
                            i = next;
                        }
                        None => i += 1,
                    }
                }
            }
        }
    }

    fn import_run(&self, nodes: &[Node<'_>], start: usize) -> (CodeChunk, usize) {
        let mut end = start;
        while end < nodes.len() && matches!(classify(self.tree, nodes[end]), Segment::Import) {
            end += 1;
        }

        let run = &nodes[start..end];
        let content = run
            .iter()
            .map(|node| self.tree.text(*node))
            .collect::<Vec<_>>()
            .join("\n");

        let chunk = self.chunk(
            run[0],
            run[run.len() - 1],
            content,
            ChunkMetadata::new(ChunkType::Import, IMPORT_CHUNK_NAME),
        );
        (chunk, end)
    }

    fn class_chunk(&self, outer: Node<'_>, definition: Node<'_>) -> Option<CodeChunk> {
        let Some(name) = definition_name(self.tree, definition) else {
            log::debug!(
                "Skipping unnamed {} at {}:{}",
                definition.kind(),
                self.file_path,
                outer.start_position().row + 1
            );
            return None;
        };

        let references = collect_references(self.tree, outer, Some(&name));
        let metadata = ChunkMetadata::new(ChunkType::Class, name)
            .docstring(self.docstring(outer, definition))
            .references(references);

        Some(self.chunk(outer, outer, self.tree.text(outer).to_string(), metadata))
    }

    fn function_chunk(
        &self,
        outer: Node<'_>,
        definition: Node<'_>,
        name: Option<String>,
    ) -> Option<CodeChunk> {
        let Some(name) = name else {
            log::debug!(
                "Skipping unnamed {} at {}:{}",
                definition.kind(),
                self.file_path,
                outer.start_position().row + 1
            );
            return None;
        };

        let references = collect_references(self.tree, outer, None);
        let metadata = ChunkMetadata::new(ChunkType::Function, name)
            .docstring(self.docstring(outer, definition))
            .parameters(self.parameters(definition))
            .references(references);

        Some(self.chunk(outer, outer, self.tree.text(outer).to_string(), metadata))
    }

    /// Group statements starting at `start` into one logical block.
    ///
    /// Returns the chunk and the index of the first node not consumed, or
    /// `None` when `nodes[start]` cannot open a block.
    fn logical_block(&self, nodes: &[Node<'_>], start: usize) -> Option<(CodeChunk, usize)> {
        let first_end = nodes[start].end_byte();
        let mut fragments: Vec<&str> = Vec::new();
        let mut context: Option<&'static str> = None;
        let mut last = nodes[start];
        let mut references = ReferenceCollector::new(self.tree);
        let mut end = start;

        while end < nodes.len() {
            let node = nodes[end];

            // Already covered by the first fragment
            if end > start && node.start_byte() < first_end {
                end += 1;
                continue;
            }

            match classify(self.tree, node) {
                Segment::ControlFlow { kind } => {
                    if context.is_some() {
                        break;
                    }
                    context = Some(kind);
                }
                Segment::Statement => {
                    if context.is_none()
                        && !fragments.is_empty()
                        && fragments.len() >= self.config.max_block_fragments
                    {
                        break;
                    }
                }
                Segment::Import
                | Segment::Class { .. }
                | Segment::Function { .. }
                | Segment::Container { .. }
                | Segment::Other => break,
            }

            fragments.push(self.tree.text(node));
            references.visit(node);
            last = node;
            end += 1;
        }

        if fragments.is_empty() {
            return None;
        }

        let name = match context {
            Some(kind) => format!("{kind}_block"),
            None => self.block_name_from_text(fragments[0]),
        };

        let mut metadata =
            ChunkMetadata::new(ChunkType::LogicalBlock, name).references(references.finish(None));
        if let Some(kind) = context {
            metadata = metadata.block_context(kind);
        }

        let chunk = self.chunk(nodes[start], last, fragments.join("\n"), metadata);
        Some((chunk, end))
    }

    fn block_name_from_text(&self, fragment: &str) -> String {
        let first_line = fragment.trim().lines().next().unwrap_or_default();
        let head: String = first_line
            .chars()
            .take(self.config.block_name_chars)
            .collect();
        format!("{}_block", head.replace(' ', "_").to_lowercase())
    }

    fn standalone_chunk(&self) -> Option<CodeChunk> {
        let source = self.tree.source();
        if source.trim().is_empty() {
            return None;
        }

        let root = self.tree.root();
        let metadata = ChunkMetadata::new(ChunkType::Standalone, STANDALONE_CHUNK_NAME)
            .references(collect_references(self.tree, root, None));

        let mut chunk = self.chunk(root, root, source.to_string(), metadata);
        chunk.start_line = 1;
        chunk.end_line = source.lines().count().max(1);
        chunk.start_byte = 0;
        chunk.end_byte = source.len();
        Some(chunk)
    }

    fn chunk(
        &self,
        first: Node<'_>,
        last: Node<'_>,
        content: String,
        metadata: ChunkMetadata,
    ) -> CodeChunk {
        let start_line = first.start_position().row + 1;
        let end = last.end_position();
        // A node ending at column 0 stops at the end of the previous line
        let end_line = if end.column == 0 && end.row > first.start_position().row {
            end.row
        } else {
            end.row + 1
        };

        CodeChunk::new(
            self.file_path.to_string(),
            start_line,
            end_line,
            content,
            metadata.language(self.tree.language().as_str()),
        )
        .with_byte_range(first.start_byte(), last.end_byte())
    }

    fn docstring(&self, outer: Node<'_>, definition: Node<'_>) -> Option<String> {
        let profile = self.tree.profile();
        match profile.docstring_style {
            DocstringStyle::BodyString => {
                let body = child_by_field(definition, "body")?;
                let first = named_children(body)
                    .into_iter()
                    .find(|child| !profile.is_comment(child.kind()))?;
                if first.kind() != "expression_statement" {
                    return None;
                }
                let literal = first.named_child(0)?;
                if !profile.is_string(literal.kind()) {
                    return None;
                }
                clean_string_literal(self.tree.text(literal))
            }
            DocstringStyle::LeadingComments(prefixes) => {
                leading_doc_comments(self.tree.source(), outer.start_position().row, prefixes)
            }
        }
    }

    fn parameters(&self, definition: Node<'_>) -> Vec<String> {
        // Arrow functions with a single bare parameter: `x => x * 2`
        if let Some(single) = child_by_field(definition, "parameter") {
            return vec![self.tree.text(single).to_string()];
        }

        let Some(list) = child_by_field(definition, "parameters") else {
            return Vec::new();
        };

        let profile = self.tree.profile();
        named_children(list)
            .into_iter()
            .filter(|param| !profile.is_comment(param.kind()))
            .filter_map(|param| match profile.parameter_style {
                ParameterStyle::Identifiers => self.identifier_parameter(param),
                ParameterStyle::Patterns => self.pattern_parameter(param),
            })
            .collect()
    }

    fn identifier_parameter(&self, param: Node<'_>) -> Option<String> {
        if param.kind() == "identifier" {
            return Some(self.tree.text(param).to_string());
        }
        if let Some(name) = child_by_field(param, "name").or_else(|| child_by_field(param, "left")) {
            return self.binding_name(name);
        }
        self.binding_name(param)
    }

    fn pattern_parameter(&self, param: Node<'_>) -> Option<String> {
        if let Some(pattern) = child_by_field(param, "pattern") {
            return self.binding_name(pattern);
        }
        match param.kind() {
            "self_parameter" => Some("self".to_string()),
            "identifier" => Some(self.tree.text(param).to_string()),
            _ => None,
        }
    }

    /// Identifier bound by a (possibly wrapped) parameter pattern.
    /// Destructuring patterns keep their full text.
    fn binding_name(&self, node: Node<'_>) -> Option<String> {
        if node.named_child_count() == 0 {
            let text = self.tree.text(node).trim();
            let is_identifier = !text.is_empty()
                && text
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '$');
            return is_identifier.then(|| text.to_string());
        }

        let identifiers: Vec<_> = named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "identifier")
            .collect();
        match identifiers.as_slice() {
            [only] => Some(self.tree.text(*only).to_string()),
            _ => Some(self.tree.text(node).trim().to_string()),
        }
    }
}

/// Strip quotes, string prefixes and surrounding whitespace from a literal
fn clean_string_literal(raw: &str) -> Option<String> {
    let cleaned = raw
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Contiguous doc comments directly above `row`; attribute lines in between
/// are skipped. A multi-line block comment counts when its opening line
/// starts with one of `prefixes`.
fn leading_doc_comments(source: &str, row: usize, prefixes: &[&str]) -> Option<String> {
    let lines: Vec<&str> = source.lines().collect();
    if row == 0 || row > lines.len() {
        return None;
    }

    let doc_prefix = |line: &str| prefixes.iter().find(|p| line.starts_with(**p)).copied();
    let mut doc_lines = Vec::new();
    let mut above = lines[..row].iter().rev().map(|line| line.trim());

    while let Some(trimmed) = above.next() {
        if trimmed.starts_with("#[") {
            continue;
        }
        if let Some(prefix) = doc_prefix(trimmed) {
            doc_lines.push(strip_comment_markers(&trimmed[prefix.len()..]));
            continue;
        }
        if !trimmed.ends_with("*/") || trimmed.starts_with("/*") {
            break;
        }

        // Closing line of a block comment: read up to its opener
        let mut block = vec![strip_comment_markers(trimmed)];
        let opener = loop {
            match above.next() {
                Some(line) if line.starts_with("/*") => break Some(line),
                Some(line) => block.push(strip_comment_markers(line)),
                None => break None,
            }
        };
        let Some((opener, prefix)) = opener.and_then(|line| Some((line, doc_prefix(line)?))) else {
            break;
        };
        block.push(strip_comment_markers(&opener[prefix.len()..]));
        doc_lines.extend(block.into_iter().filter(|line| !line.is_empty()));
    }

    doc_lines.reverse();
    let joined = doc_lines.join("\n").trim().to_string();
    (!joined.is_empty()).then_some(joined)
}

fn strip_comment_markers(text: &str) -> &str {
    text.trim()
        .trim_end_matches("*/")
        .trim_start_matches('*')
        .trim()
}
