//! # coderag chunker
//!
//! Structural, syntax-tree-driven chunking of source files for code retrieval.
//!
//! A file is parsed with tree-sitter and its top-level nodes are segmented into
//! typed chunks: grouped imports, classes, functions and "logical blocks" of
//! related statements. Every chunk carries its location, docstring, parameters
//! and the calls/classes it references.
//!
//! ## Architecture
//!
//! ```text
//! Source Code
//!     │
//!     ├──> Language Detection (from extension)
//!     │
//!     ├──> Tree-sitter Parsing (injected GrammarProvider)
//!     │
//!     ├──> Segmentation
//!     │    ├─> Import runs
//!     │    ├─> Classes / functions (through decorators and exports)
//!     │    └─> Logical blocks (control flow, capped statement runs)
//!     │
//!     └──> Metadata
//!          ├─> Docstrings, parameters
//!          ├─> Referenced calls and classes
//!          └─> Optional summaries (injected Summarizer)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use coderag_chunker::{ChunkType, Chunker};
//!
//! let chunker = Chunker::default();
//!
//! let code = r#"
//! import os
//!
//! def process_data(path, limit=10):
//!     """Read and clean a file."""
//!     return open(path).read()[:limit]
//! "#;
//!
//! let chunks = chunker.chunk_str(code, Some("example.py")).unwrap();
//! assert_eq!(chunks[0].chunk_type(), ChunkType::Import);
//! assert_eq!(chunks[1].name(), "process_data");
//! assert_eq!(chunks[1].metadata.parameters, vec!["path", "limit"]);
//! ```

mod chunker;
mod config;
mod error;
mod language;
mod naming;
mod profile;
mod references;
mod segmenter;
mod summary;
mod symbols;
mod syntax;
mod types;

pub use chunker::{Chunker, ChunkingStats};
pub use config::ChunkerConfig;
pub use error::{ChunkerError, Result};
pub use language::Language;
pub use profile::{DocstringStyle, FieldLink, LanguageProfile, NodeRole, ParameterStyle, WrapperKind};
pub use references::{collect_references, ReferenceCollector};
pub use segmenter::{Segmenter, IMPORT_CHUNK_NAME, STANDALONE_CHUNK_NAME};
pub use summary::{attach_summaries, Summarizer, IMPORT_SUMMARY};
pub use symbols::{extract_symbols, ClassSymbol, FileSymbols, SymbolEntry};
pub use syntax::{BundledGrammars, GrammarProvider, SyntaxParser, SyntaxTree};
pub use types::{ChunkMetadata, ChunkReferences, ChunkType, CodeChunk, LIST_SEPARATOR};
