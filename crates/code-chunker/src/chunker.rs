use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::language::Language;
use crate::segmenter::Segmenter;
use crate::summary::{attach_summaries, Summarizer};
use crate::symbols::{extract_symbols, FileSymbols};
use crate::syntax::{BundledGrammars, GrammarProvider, SyntaxParser};
use crate::types::{ChunkType, CodeChunk};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Main chunker interface for processing code.
///
/// Holds no parser state: every call builds a parser for the file's language
/// from the injected [`GrammarProvider`], so one `Chunker` can be shared across
/// worker threads.
#[derive(Clone)]
pub struct Chunker {
    config: ChunkerConfig,
    grammars: Arc<dyn GrammarProvider>,
    summarizer: Option<Arc<dyn Summarizer>>,
}

impl Chunker {
    /// Create a new chunker with configuration
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate().map_err(ChunkerError::invalid_config)?;
        Ok(Self {
            config,
            grammars: Arc::new(BundledGrammars),
            summarizer: None,
        })
    }

    /// Replace the grammar source
    #[must_use]
    pub fn with_grammars(mut self, grammars: Arc<dyn GrammarProvider>) -> Self {
        self.grammars = grammars;
        self
    }

    /// Summarize chunks with `summarizer`; imports get a fixed summary
    #[must_use]
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Chunk code from a string; the language comes from `file_path`'s extension
    pub fn chunk_str(&self, content: &str, file_path: Option<&str>) -> Result<Vec<CodeChunk>> {
        let file_path = file_path.unwrap_or("unknown");
        let language = Language::from_path(file_path)
            .ok_or_else(|| ChunkerError::unsupported_language(file_path))?;

        self.chunk_with_language(content, file_path, language)
    }

    /// Chunk code from a file
    pub fn chunk_file(&self, path: impl AsRef<Path>) -> Result<Vec<CodeChunk>> {
        let path = path.as_ref();
        let display = path.to_string_lossy();
        self.chunk_file_as(path, &display)
    }

    /// Chunk a file, recording `display_path` as every chunk's `file_path`
    pub fn chunk_file_as(&self, path: impl AsRef<Path>, display_path: &str) -> Result<Vec<CodeChunk>> {
        let path = path.as_ref();
        let language = Language::from_path(path)
            .ok_or_else(|| ChunkerError::unsupported_language(path.display().to_string()))?;
        let content = std::fs::read_to_string(path)?;

        self.chunk_with_language(&content, display_path, language)
    }

    /// Chunk code with explicit language
    pub fn chunk_with_language(
        &self,
        content: &str,
        file_path: &str,
        language: Language,
    ) -> Result<Vec<CodeChunk>> {
        if !self.config.allows(language) {
            return Err(ChunkerError::unsupported_language(language.as_str()));
        }

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut parser = SyntaxParser::new(self.grammars.as_ref(), language)?;
        let tree = parser.parse(content)?;
        if tree.has_errors() {
            log::debug!("{file_path}: syntax errors, chunking best-effort tree");
        }

        let mut chunks = Segmenter::new(&self.config, &tree, file_path).segment();

        if let Some(summarizer) = &self.summarizer {
            attach_summaries(&mut chunks, summarizer.as_ref());
        }

        Ok(chunks)
    }

    /// Class/function locations of one file
    pub fn extract_symbols(
        &self,
        content: &str,
        file_path: &str,
        language: Language,
    ) -> Result<FileSymbols> {
        if !self.config.allows(language) {
            return Err(ChunkerError::unsupported_language(language.as_str()));
        }

        let mut parser = SyntaxParser::new(self.grammars.as_ref(), language)?;
        let tree = parser.parse(content)?;
        Ok(extract_symbols(&tree, file_path))
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Get statistics about chunking
    #[must_use]
    pub fn get_stats(chunks: &[CodeChunk]) -> ChunkingStats {
        let mut by_type = BTreeMap::new();
        for chunk in chunks {
            *by_type.entry(chunk.chunk_type()).or_insert(0) += 1;
        }

        ChunkingStats {
            total_chunks: chunks.len(),
            total_lines: chunks.iter().map(CodeChunk::line_count).sum(),
            by_type,
            documented: chunks
                .iter()
                .filter(|chunk| chunk.metadata.docstring.is_some())
                .count(),
            summarized: chunks
                .iter()
                .filter(|chunk| chunk.metadata.summary.is_some())
                .count(),
        }
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            config: ChunkerConfig::default(),
            grammars: Arc::new(BundledGrammars),
            summarizer: None,
        }
    }
}

impl std::fmt::Debug for Chunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunker")
            .field("config", &self.config)
            .field("summarizer", &self.summarizer.is_some())
            .finish_non_exhaustive()
    }
}

/// Statistics about chunking results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub total_lines: usize,
    pub by_type: BTreeMap<ChunkType, usize>,
    pub documented: usize,
    pub summarized: usize,
}

impl ChunkingStats {
    #[must_use]
    pub fn count(&self, chunk_type: ChunkType) -> usize {
        self.by_type.get(&chunk_type).copied().unwrap_or(0)
    }
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} | Lines: {} | Imports: {} | Classes: {} | Functions: {} | Blocks: {} | Documented: {}",
            self.total_chunks,
            self.total_lines,
            self.count(ChunkType::Import),
            self.count(ChunkType::Class),
            self.count(ChunkType::Function),
            self.count(ChunkType::LogicalBlock),
            self.documented
        )
    }
}
