use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Separator used when list fields are flattened into scalar record values
pub const LIST_SEPARATOR: &str = ",";

/// A semantic code chunk with metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeChunk {
    /// Source file path
    pub file_path: String,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Byte offset of the first covered node
    pub start_byte: usize,

    /// Byte offset just past the last covered node
    pub end_byte: usize,

    /// The chunk source text
    pub content: String,

    /// Rich metadata about this chunk
    pub metadata: ChunkMetadata,
}

impl CodeChunk {
    /// Create a new code chunk
    #[must_use]
    pub const fn new(
        file_path: String,
        start_line: usize,
        end_line: usize,
        content: String,
        metadata: ChunkMetadata,
    ) -> Self {
        Self {
            file_path,
            start_line,
            end_line,
            start_byte: 0,
            end_byte: 0,
            content,
            metadata,
        }
    }

    /// Builder: set the byte span
    #[must_use]
    pub const fn with_byte_range(mut self, start_byte: usize, end_byte: usize) -> Self {
        self.start_byte = start_byte;
        self.end_byte = end_byte;
        self
    }

    #[must_use]
    pub const fn chunk_type(&self) -> ChunkType {
        self.metadata.chunk_type
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check if chunk contains a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// Stable identifier for stores that key records by id
    #[must_use]
    pub fn record_id(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.file_path,
            self.metadata.chunk_type.as_str(),
            self.metadata.name,
            self.start_line
        )
    }

    /// Flatten into scalar key/value pairs; list fields are joined with
    /// [`LIST_SEPARATOR`] and absent values become empty strings.
    #[must_use]
    pub fn to_flat_record(&self) -> BTreeMap<String, String> {
        let meta = &self.metadata;

        let mut record = BTreeMap::new();
        record.insert("type".to_string(), meta.chunk_type.as_str().to_string());
        record.insert("name".to_string(), meta.name.clone());
        record.insert("file_path".to_string(), self.file_path.clone());
        record.insert("code".to_string(), self.content.clone());
        record.insert("language".to_string(), meta.language.clone().unwrap_or_default());
        record.insert("docstring".to_string(), meta.docstring.clone().unwrap_or_default());
        record.insert("summary".to_string(), meta.summary.clone().unwrap_or_default());
        record.insert(
            "block_context".to_string(),
            meta.block_context.clone().unwrap_or_default(),
        );
        record.insert("parameters".to_string(), join_list(&meta.parameters));
        record.insert(
            "function_calls".to_string(),
            join_list(&meta.references.function_calls),
        );
        record.insert(
            "class_instances".to_string(),
            join_list(&meta.references.class_instances),
        );
        record.insert("start_line".to_string(), self.start_line.to_string());
        record.insert("end_line".to_string(), self.end_line.to_string());
        record
    }
}

fn join_list<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Metadata about a code chunk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    /// Chunk type
    pub chunk_type: ChunkType,

    /// Symbol name, or a synthesized name for imports and logical blocks
    pub name: String,

    /// Programming language
    pub language: Option<String>,

    /// Documentation/docstring if available
    pub docstring: Option<String>,

    /// Ordered parameter names (functions only)
    #[serde(default)]
    pub parameters: Vec<String>,

    /// Calls and class names found inside the chunk
    #[serde(default)]
    pub references: ChunkReferences,

    /// Control-flow node kind a logical block is anchored on
    pub block_context: Option<String>,

    /// Natural-language description from the summarization capability
    pub summary: Option<String>,
}

impl ChunkMetadata {
    pub fn new(chunk_type: ChunkType, name: impl Into<String>) -> Self {
        Self {
            chunk_type,
            name: name.into(),
            language: None,
            docstring: None,
            parameters: Vec::new(),
            references: ChunkReferences::default(),
            block_context: None,
            summary: None,
        }
    }

    /// Builder: set language
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Builder: set docstring
    #[must_use]
    pub fn docstring(mut self, docstring: Option<String>) -> Self {
        self.docstring = docstring;
        self
    }

    /// Builder: set parameters
    #[must_use]
    pub fn parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Builder: set references
    #[must_use]
    pub fn references(mut self, references: ChunkReferences) -> Self {
        self.references = references;
        self
    }

    /// Builder: set block context
    #[must_use]
    pub fn block_context(mut self, context: impl Into<String>) -> Self {
        self.block_context = Some(context.into());
        self
    }
}

/// Names referenced from inside a chunk
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkReferences {
    pub function_calls: BTreeSet<String>,
    pub class_instances: BTreeSet<String>,
}

impl ChunkReferences {
    pub fn is_empty(&self) -> bool {
        self.function_calls.is_empty() && self.class_instances.is_empty()
    }
}

/// Type of code chunk based on semantic meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    /// Run of consecutive import statements
    Import,
    /// Class definition
    Class,
    /// Function definition
    Function,
    /// Control-flow statement or short run of assignments/expressions
    LogicalBlock,
    /// Whole-file fallback when nothing else was recognized
    Standalone,
}

impl ChunkType {
    /// Check if this is a named declaration
    #[must_use]
    pub const fn is_declaration(self) -> bool {
        matches!(self, Self::Class | Self::Function)
    }

    /// Check if chunks of this type may never overlap one another
    #[must_use]
    pub const fn is_exclusive(self) -> bool {
        matches!(self, Self::Import | Self::Class | Self::Function)
    }

    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Class => "class",
            Self::Function => "function",
            Self::LogicalBlock => "logical_block",
            Self::Standalone => "standalone",
        }
    }
}
