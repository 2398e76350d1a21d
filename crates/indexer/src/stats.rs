use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics about a directory batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Number of files processed
    pub files: usize,

    /// Number of chunks created
    pub chunks: usize,

    /// Total lines of code
    pub total_lines: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// Files per language
    pub languages: BTreeMap<String, usize>,

    /// Files that failed, with the reason
    pub errors: Vec<String>,
}

impl BatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, language: &str, lines: usize) {
        self.files += 1;
        self.total_lines += lines;
        *self.languages.entry(language.to_string()).or_insert(0) += 1;
    }

    pub fn add_chunks(&mut self, count: usize) {
        self.chunks += count;
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub fn failed(&self) -> usize {
        self.errors.len()
    }
}

impl std::fmt::Display for BatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Files: {} | Chunks: {} | Lines: {} | Failed: {} | {}ms",
            self.files,
            self.chunks,
            self.total_lines,
            self.failed(),
            self.time_ms
        )
    }
}
