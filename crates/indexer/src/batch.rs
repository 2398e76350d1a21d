use crate::config::BatchConfig;
use crate::error::{IndexerError, Result};
use crate::scanner::{relative_path, FileScanner};
use crate::stats::BatchStats;
use coderag_chunker::{Chunker, CodeChunk, GrammarProvider, Language, Summarizer};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Project-relative file path → that file's chunks, in path order
pub type ChunkMap = BTreeMap<String, Vec<CodeChunk>>;

/// Chunk every supported file under `root` with default settings.
///
/// `concurrency` overrides the worker count. A file that cannot be read or
/// parsed maps to an empty list; only an invalid `root` is an error.
pub fn process_directory(root: impl AsRef<Path>, concurrency: Option<usize>) -> Result<ChunkMap> {
    process_directory_with_stats(root, concurrency).map(|(chunks, _)| chunks)
}

/// [`process_directory`] plus run statistics
pub fn process_directory_with_stats(
    root: impl AsRef<Path>,
    concurrency: Option<usize>,
) -> Result<(ChunkMap, BatchStats)> {
    let config = BatchConfig {
        concurrency,
        ..Default::default()
    };
    DirectoryProcessor::new(config)?.process_with_stats(root)
}

/// Batch chunker over a directory tree
pub struct DirectoryProcessor {
    config: BatchConfig,
    chunker: Chunker,
}

struct FileOutcome {
    relative: String,
    language: Language,
    lines: usize,
    result: std::result::Result<Vec<CodeChunk>, String>,
}

impl DirectoryProcessor {
    pub fn new(config: BatchConfig) -> Result<Self> {
        config.validate()?;
        let chunker = Chunker::new(config.chunker.clone())?;
        Ok(Self { config, chunker })
    }

    #[must_use]
    pub fn with_grammars(mut self, grammars: Arc<dyn GrammarProvider>) -> Self {
        self.chunker = self.chunker.with_grammars(grammars);
        self
    }

    #[must_use]
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.chunker = self.chunker.with_summarizer(summarizer);
        self
    }

    pub const fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn process(&self, root: impl AsRef<Path>) -> Result<ChunkMap> {
        self.process_with_stats(root).map(|(chunks, _)| chunks)
    }

    pub fn process_with_stats(&self, root: impl AsRef<Path>) -> Result<(ChunkMap, BatchStats)> {
        let root = validate_root(root.as_ref())?;
        let started = Instant::now();
        let files = discover(&root, &self.config, &self.chunker);

        let mut chunk_map = ChunkMap::new();
        let mut stats = BatchStats::new();
        if files.is_empty() {
            log::info!("No supported files under {}", root.display());
            return Ok((chunk_map, stats));
        }

        let workers = self.config.worker_count().min(files.len());
        let pool = build_pool(workers)?;
        log::debug!("Chunking {} files on {workers} workers", files.len());

        let outcomes: Vec<FileOutcome> = pool.install(|| {
            files
                .par_iter()
                .map(|(path, language)| self.process_file(&root, path, *language))
                .collect()
        });

        for outcome in outcomes {
            match outcome.result {
                Ok(chunks) => {
                    stats.add_file(outcome.language.as_str(), outcome.lines);
                    stats.add_chunks(chunks.len());
                    chunk_map.insert(outcome.relative, chunks);
                }
                Err(reason) => {
                    log::warn!("Failed to chunk {}: {reason}", outcome.relative);
                    stats.add_error(format!("{}: {reason}", outcome.relative));
                    chunk_map.insert(outcome.relative, Vec::new());
                }
            }
        }

        stats.time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::info!("Processed {}: {stats}", root.display());
        Ok((chunk_map, stats))
    }

    fn process_file(&self, root: &Path, path: &Path, language: Language) -> FileOutcome {
        let relative = relative_path(root, path);

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                return FileOutcome {
                    relative,
                    language,
                    lines: 0,
                    result: Err(e.to_string()),
                }
            }
        };
        let lines = content.lines().count();

        let result = catch_unwind(AssertUnwindSafe(|| {
            self.chunker
                .chunk_with_language(&content, &relative, language)
        }));
        let result = match result {
            Ok(Ok(chunks)) => Ok(chunks),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err("chunking panicked".to_string()),
        };

        FileOutcome {
            relative,
            language,
            lines,
            result,
        }
    }
}

pub(crate) fn validate_root(root: &Path) -> Result<PathBuf> {
    if !root.is_dir() {
        return Err(IndexerError::InvalidPath(root.display().to_string()));
    }
    Ok(root.to_path_buf())
}

/// Supported files the chunker's language filter accepts, in walk order
pub(crate) fn discover(
    root: &Path,
    config: &BatchConfig,
    chunker: &Chunker,
) -> Vec<(PathBuf, Language)> {
    FileScanner::with_options(root, config.scan.clone())
        .scan()
        .into_iter()
        .filter_map(|path| {
            let language = Language::from_path(&path)?;
            chunker.config().allows(language).then_some((path, language))
        })
        .collect()
}

/// Batch-scoped pool; dropped with the run
pub(crate) fn build_pool(workers: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("coderag-worker-{i}"))
        .build()
        .map_err(|e| IndexerError::ThreadPool(e.to_string()))
}
