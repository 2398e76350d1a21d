use crate::types::{ChunkType, CodeChunk};

/// Fixed summary of a grouped import chunk; imports are never sent out
pub const IMPORT_SUMMARY: &str = "Combined import statements";

/// External capability that describes a chunk of source code in prose.
///
/// Calls are blocking; timeouts and retries belong to the implementation.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, source: &str) -> anyhow::Result<String>;
}

impl<F> Summarizer for F
where
    F: Fn(&str) -> anyhow::Result<String> + Send + Sync,
{
    fn summarize(&self, source: &str) -> anyhow::Result<String> {
        self(source)
    }
}

/// Attach summaries to every chunk. Import chunks get [`IMPORT_SUMMARY`]
/// without a call. A failed call leaves that chunk's summary empty and never
/// fails the batch.
pub fn attach_summaries(chunks: &mut [CodeChunk], summarizer: &dyn Summarizer) {
    for chunk in chunks.iter_mut() {
        if chunk.metadata.chunk_type == ChunkType::Import {
            chunk.metadata.summary = Some(IMPORT_SUMMARY.to_string());
            continue;
        }
        match summarizer.summarize(&chunk.content) {
            Ok(summary) if !summary.trim().is_empty() => {
                chunk.metadata.summary = Some(summary.trim().to_string());
            }
            Ok(_) => chunk.metadata.summary = None,
            Err(e) => {
                log::warn!(
                    "Summarization failed for {} ({}): {e:#}",
                    chunk.metadata.name,
                    chunk.file_path
                );
                chunk.metadata.summary = None;
            }
        }
    }
}
