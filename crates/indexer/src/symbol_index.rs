use crate::batch::{build_pool, discover, validate_root};
use crate::config::BatchConfig;
use crate::error::{IndexerError, Result};
use crate::scanner::relative_path;
use coderag_chunker::{Chunker, ClassSymbol, FileSymbols, SymbolEntry};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Class,
    Function,
}

/// A definition replaced by a same-named one from a later file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolCollision {
    pub kind: SymbolKind,
    pub name: String,
    /// File whose definition was dropped
    pub shadowed: String,
    /// File whose definition is kept
    pub kept: String,
}

/// Project-wide name → location table.
///
/// Names are unqualified: when two files define the same top-level class or
/// function, the file walked last wins and the loser is listed in
/// [`SymbolIndex::collisions`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolIndex {
    pub root: PathBuf,
    pub classes: BTreeMap<String, ClassSymbol>,
    pub functions: BTreeMap<String, SymbolEntry>,
    pub collisions: Vec<SymbolCollision>,
}

impl SymbolIndex {
    /// Index every supported file under `root` with default settings
    pub fn build(root: impl AsRef<Path>) -> Result<Self> {
        Self::build_with_config(root, &BatchConfig::default())
    }

    pub fn build_with_config(root: impl AsRef<Path>, config: &BatchConfig) -> Result<Self> {
        config.validate()?;
        let root = validate_root(root.as_ref())?;
        let chunker = Chunker::new(config.chunker.clone())?;
        let files = discover(&root, config, &chunker);

        let mut index = Self {
            root: root.clone(),
            ..Default::default()
        };
        if files.is_empty() {
            return Ok(index);
        }

        let pool = build_pool(config.worker_count().min(files.len()))?;
        let extracted: Vec<Option<FileSymbols>> = pool.install(|| {
            files
                .par_iter()
                .map(|(path, language)| {
                    let relative = relative_path(&root, path);
                    let symbols = std::fs::read_to_string(path)
                        .map_err(IndexerError::from)
                        .and_then(|content| {
                            chunker
                                .extract_symbols(&content, &relative, *language)
                                .map_err(IndexerError::from)
                        });
                    match symbols {
                        Ok(symbols) => Some(symbols),
                        Err(e) => {
                            log::warn!("Failed to extract symbols from {relative}: {e}");
                            None
                        }
                    }
                })
                .collect()
        });

        // Merge in walk order so later files overwrite earlier ones
        for symbols in extracted.into_iter().flatten() {
            index.merge(symbols);
        }

        log::info!(
            "Indexed {} classes and {} functions under {} ({} collisions)",
            index.classes.len(),
            index.functions.len(),
            root.display(),
            index.collisions.len()
        );
        Ok(index)
    }

    fn merge(&mut self, symbols: FileSymbols) {
        for (name, class) in symbols.classes {
            let kept = class.entry.file_path.clone();
            if let Some(previous) = self.classes.insert(name.clone(), class) {
                self.record_collision(SymbolKind::Class, name, previous.entry.file_path, kept);
            }
        }
        for (name, function) in symbols.functions {
            let kept = function.file_path.clone();
            if let Some(previous) = self.functions.insert(name.clone(), function) {
                self.record_collision(SymbolKind::Function, name, previous.file_path, kept);
            }
        }
    }

    fn record_collision(&mut self, kind: SymbolKind, name: String, shadowed: String, kept: String) {
        log::debug!("{kind:?} `{name}` in {shadowed} shadowed by {kept}");
        self.collisions.push(SymbolCollision {
            kind,
            name,
            shadowed,
            kept,
        });
    }

    /// Find a definition by name: functions first, then classes, then
    /// methods of any class.
    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.functions
            .get(name)
            .or_else(|| self.classes.get(name).map(|class| &class.entry))
            .or_else(|| {
                self.classes
                    .values()
                    .find_map(|class| class.methods.get(name))
            })
    }

    /// Current source text of a definition, read from disk
    pub fn read_snippet(&self, name: &str) -> Result<String> {
        let entry = self
            .lookup(name)
            .ok_or_else(|| IndexerError::SymbolNotFound(name.to_string()))?;

        let bytes = std::fs::read(self.root.join(&entry.file_path))?;
        let slice = bytes.get(entry.start_byte..entry.end_byte).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("{} changed since it was indexed", entry.file_path),
            )
        })?;

        String::from_utf8(slice.to_vec())
            .map_err(|e| IndexerError::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
            + self
                .classes
                .values()
                .map(|class| 1 + class.methods.len())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lookup_prefers_functions_then_classes_then_methods() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("shop.py"),
            "class Cart:\n    def total(self):\n        return 0\n\n    def Cart(self):\n        pass\n\ndef checkout():\n    pass\n",
        )
        .unwrap();
        fs::write(temp.path().join("total.py"), "def total():\n    return 1\n").unwrap();

        let index = SymbolIndex::build(temp.path()).unwrap();

        assert_eq!(index.lookup("total").unwrap().file_path, "total.py");
        assert_eq!(index.lookup("Cart").unwrap().start_point, (0, 0));
        assert_eq!(index.lookup("checkout").unwrap().file_path, "shop.py");
        assert!(index.lookup("missing").is_none());
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn read_snippet_returns_exact_source() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(
            temp.path().join("src/lib.rs"),
            "struct Point;\n\nimpl Point {\n    fn norm(&self) -> f64 {\n        0.0\n    }\n}\n",
        )
        .unwrap();

        let index = SymbolIndex::build(temp.path()).unwrap();

        assert_eq!(
            index.read_snippet("norm").unwrap(),
            "fn norm(&self) -> f64 {\n        0.0\n    }"
        );
        assert_eq!(index.read_snippet("Point").unwrap(), "struct Point;");
        assert!(matches!(
            index.read_snippet("nothing"),
            Err(IndexerError::SymbolNotFound(_))
        ));
    }
}
