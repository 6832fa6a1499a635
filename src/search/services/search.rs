//! Service layer for chunk upsert and tiered search.

use crate::search::{
    domain::{ChunkDraft, SemanticChunk, cosine_similarity, parse_embedding},
    ports::{SemanticChunkRepository, SemanticChunkRepositoryError},
};
use crate::task::domain::TaskId;
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use mockable::Clock;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Service-level errors for semantic search operations.
#[derive(Debug, Error)]
pub enum SemanticSearchError {
    /// Chunk repository operation failed.
    #[error(transparent)]
    Chunks(#[from] SemanticChunkRepositoryError),
    /// Task lookup failed while backfilling references.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

/// Result type for semantic search service operations.
pub type SemanticSearchResult<T> = Result<T, SemanticSearchError>;

/// Chunk upsert and tiered search service.
#[derive(Clone)]
pub struct SemanticSearchService<C>
where
    C: Clock + Send + Sync,
{
    chunks: Arc<dyn SemanticChunkRepository>,
    tasks: Arc<dyn TaskRepository>,
    clock: Arc<C>,
}

impl<C> SemanticSearchService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new semantic search service.
    #[must_use]
    pub const fn new(
        chunks: Arc<dyn SemanticChunkRepository>,
        tasks: Arc<dyn TaskRepository>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            chunks,
            tasks,
            clock,
        }
    }

    /// Upserts a batch of chunks for a task.
    ///
    /// Empty chunks are dropped; duplicate keys within the batch keep the
    /// last occurrence; the repository reference is backfilled from the
    /// owning task; each survivor merges in place by `(task_id,
    /// chunk_key)`. Returns the number of chunks written.
    ///
    /// # Errors
    ///
    /// Returns [`SemanticSearchError`] when persistence fails.
    pub async fn upsert_chunks(
        &self,
        task_id: TaskId,
        drafts: Vec<ChunkDraft>,
    ) -> SemanticSearchResult<usize> {
        let repository_id = match self.tasks.find_by_id(task_id).await? {
            Some(task) => Some(task.repository_id()),
            None => {
                debug!(%task_id, "chunk upsert for unknown task");
                None
            }
        };

        let mut deduped: HashMap<String, SemanticChunk> = HashMap::new();
        for draft in drafts {
            if let Some(mut chunk) = SemanticChunk::build(task_id, draft, &*self.clock) {
                if let Some(owner) = repository_id {
                    chunk.backfill_repository(owner);
                }
                deduped.insert(chunk.chunk_key().to_owned(), chunk);
            }
        }

        let written = deduped.len();
        for chunk in deduped.into_values() {
            self.chunks.merge(&chunk).await?;
        }
        Ok(written)
    }

    /// Searches a task's chunks through the three-tier fallback.
    ///
    /// 1. With a parseable query embedding: cosine ranking over chunks of
    ///    equal dimensionality, best score first, recency breaking ties.
    /// 2. Otherwise with query text: case-insensitive substring match over
    ///    content, source reference, and key, most recent first.
    /// 3. Otherwise: most recently updated chunks.
    ///
    /// Each tier yields to the next when it matches nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SemanticSearchError::Chunks`] when the listing fails.
    pub async fn search_chunks(
        &self,
        task_id: TaskId,
        query_text: Option<&str>,
        query_embedding_payload: Option<&str>,
        limit: usize,
    ) -> SemanticSearchResult<Vec<SemanticChunk>> {
        let chunks = self.chunks.list_by_task(task_id).await?;

        if let Some(query_vector) = query_embedding_payload.and_then(parse_embedding) {
            let ranked = rank_by_similarity(&chunks, &query_vector, limit);
            if !ranked.is_empty() {
                return Ok(ranked);
            }
        }

        if let Some(needle) = query_text.map(str::trim).filter(|text| !text.is_empty()) {
            let matched = filter_by_text(&chunks, needle, limit);
            if !matched.is_empty() {
                return Ok(matched);
            }
        }

        let mut recent = chunks;
        recent.sort_by(|a, b| b.updated_at_utc().cmp(&a.updated_at_utc()));
        recent.truncate(limit);
        Ok(recent)
    }
}

fn rank_by_similarity(
    chunks: &[SemanticChunk],
    query_vector: &[f32],
    limit: usize,
) -> Vec<SemanticChunk> {
    let mut scored: Vec<(f64, &SemanticChunk)> = chunks
        .iter()
        .filter_map(|chunk| {
            chunk
                .embedding()
                .and_then(|embedding| cosine_similarity(query_vector, embedding))
                .map(|score| (score, chunk))
        })
        .collect();
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.1.updated_at_utc().cmp(&a.1.updated_at_utc()))
    });
    scored
        .into_iter()
        .take(limit)
        .map(|(_, chunk)| chunk.clone())
        .collect()
}

fn filter_by_text(chunks: &[SemanticChunk], needle: &str, limit: usize) -> Vec<SemanticChunk> {
    let lowered = needle.to_lowercase();
    let mut matched: Vec<SemanticChunk> = chunks
        .iter()
        .filter(|chunk| {
            chunk.content().to_lowercase().contains(&lowered)
                || chunk.source_ref().to_lowercase().contains(&lowered)
                || chunk.chunk_key().to_lowercase().contains(&lowered)
        })
        .cloned()
        .collect();
    matched.sort_by(|a, b| b.updated_at_utc().cmp(&a.updated_at_utc()));
    matched.truncate(limit);
    matched
}
