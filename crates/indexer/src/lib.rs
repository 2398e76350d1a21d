//! # coderag indexer
//!
//! Directory-level drivers for the chunker.
//!
//! ## Pipeline
//!
//! ```text
//! Directory
//!     │
//!     ├──> File Scanner (registry-known extensions, sorted walk)
//!     │      └─> Source files
//!     │
//!     ├──> Batch Processor (rayon pool, one file per task)
//!     │      └─> file path → chunks
//!     │
//!     └──> Symbol Index (parallel extraction, ordered merge)
//!            └─> name → file + byte range
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use coderag_indexer::{process_directory, SymbolIndex};
//!
//! fn main() -> coderag_indexer::Result<()> {
//!     let chunks = process_directory("/path/to/project", Some(4))?;
//!     for (file, file_chunks) in &chunks {
//!         println!("{file}: {} chunks", file_chunks.len());
//!     }
//!
//!     let index = SymbolIndex::build("/path/to/project")?;
//!     println!("{}", index.read_snippet("main")?);
//!     Ok(())
//! }
//! ```

mod batch;
mod config;
mod error;
mod limits;
mod scanner;
mod stats;
mod symbol_index;

pub use batch::{process_directory, process_directory_with_stats, ChunkMap, DirectoryProcessor};
pub use config::BatchConfig;
pub use error::{IndexerError, Result};
pub use limits::{resolve_concurrency, CONCURRENCY_ENV};
pub use scanner::{relative_path, FileScanner, ScanOptions};
pub use stats::BatchStats;
pub use symbol_index::{SymbolCollision, SymbolIndex, SymbolKind};
