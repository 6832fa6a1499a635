//! Semantic chunk record and embedding parsing.

use crate::run::domain::RunId;
use crate::task::domain::{RepositoryId, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Raw chunk payload as submitted for upsert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkDraft {
    /// Explicit chunk key; defaults to `source_ref:chunk_index`.
    pub chunk_key: Option<String>,
    /// Where the content came from (file path, run artefact, URL).
    pub source_ref: String,
    /// Position of this chunk within its source.
    pub chunk_index: u32,
    /// Chunk text; empty chunks are dropped.
    pub content: String,
    /// Run the chunk was extracted from, if any.
    pub run_id: Option<RunId>,
    /// Embedding vector as a JSON array or comma-separated floats.
    pub embedding_payload: Option<String>,
    /// Token count reported by the embedder.
    pub token_count: Option<u32>,
}

impl ChunkDraft {
    /// Creates a draft for a source position.
    #[must_use]
    pub fn new(
        source_ref: impl Into<String>,
        chunk_index: u32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            chunk_key: None,
            source_ref: source_ref.into(),
            chunk_index,
            content: content.into(),
            run_id: None,
            embedding_payload: None,
            token_count: None,
        }
    }

    /// Overrides the default chunk key.
    #[must_use]
    pub fn with_chunk_key(mut self, chunk_key: impl Into<String>) -> Self {
        self.chunk_key = Some(chunk_key.into());
        self
    }

    /// Attaches the originating run.
    #[must_use]
    pub const fn with_run(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Attaches an embedding payload.
    #[must_use]
    pub fn with_embedding(mut self, payload: impl Into<String>) -> Self {
        self.embedding_payload = Some(payload.into());
        self
    }

    /// Attaches a token count.
    #[must_use]
    pub const fn with_token_count(mut self, token_count: u32) -> Self {
        self.token_count = Some(token_count);
        self
    }
}

/// A stored semantic chunk, keyed by `(task_id, chunk_key)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticChunk {
    task_id: TaskId,
    chunk_key: String,
    repository_id: Option<RepositoryId>,
    run_id: Option<RunId>,
    source_ref: String,
    chunk_index: u32,
    content: String,
    content_hash: String,
    embedding: Option<Vec<f32>>,
    embedding_dimensions: Option<usize>,
    token_count: Option<u32>,
    updated_at_utc: DateTime<Utc>,
}

impl SemanticChunk {
    /// Builds a storable chunk from a draft.
    ///
    /// Returns `None` when the content is empty after trimming — empty
    /// chunks carry nothing worth indexing.
    #[must_use]
    pub fn build(task_id: TaskId, draft: ChunkDraft, clock: &impl Clock) -> Option<Self> {
        if draft.content.trim().is_empty() {
            return None;
        }
        let chunk_key = draft
            .chunk_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map_or_else(
                || format!("{}:{}", draft.source_ref, draft.chunk_index),
                str::to_owned,
            );
        let embedding = draft
            .embedding_payload
            .as_deref()
            .and_then(parse_embedding);
        let embedding_dimensions = embedding.as_ref().map(Vec::len);
        let content_hash = format!("{:x}", Sha256::digest(draft.content.as_bytes()));

        Some(Self {
            task_id,
            chunk_key,
            repository_id: None,
            run_id: draft.run_id,
            source_ref: draft.source_ref,
            chunk_index: draft.chunk_index,
            content: draft.content,
            content_hash,
            embedding,
            embedding_dimensions,
            token_count: draft.token_count,
            updated_at_utc: clock.utc(),
        })
    }

    /// Backfills the repository reference from the owning task.
    pub fn backfill_repository(&mut self, repository_id: RepositoryId) {
        if self.repository_id.is_none() {
            self.repository_id = Some(repository_id);
        }
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the chunk key, unique within the task.
    #[must_use]
    pub fn chunk_key(&self) -> &str {
        &self.chunk_key
    }

    /// Returns the repository reference, if known.
    #[must_use]
    pub const fn repository_id(&self) -> Option<RepositoryId> {
        self.repository_id
    }

    /// Returns the originating run, if any.
    #[must_use]
    pub const fn run_id(&self) -> Option<RunId> {
        self.run_id
    }

    /// Returns the source reference.
    #[must_use]
    pub fn source_ref(&self) -> &str {
        &self.source_ref
    }

    /// Returns the chunk position within its source.
    #[must_use]
    pub const fn chunk_index(&self) -> u32 {
        self.chunk_index
    }

    /// Returns the chunk text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the SHA-256 hash of the content.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Returns the parsed embedding, if one was supplied.
    #[must_use]
    pub fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref()
    }

    /// Returns the embedding dimensionality, if an embedding exists.
    #[must_use]
    pub const fn embedding_dimensions(&self) -> Option<usize> {
        self.embedding_dimensions
    }

    /// Returns the reported token count, if any.
    #[must_use]
    pub const fn token_count(&self) -> Option<u32> {
        self.token_count
    }

    /// Returns when the chunk was last written.
    #[must_use]
    pub const fn updated_at_utc(&self) -> DateTime<Utc> {
        self.updated_at_utc
    }
}

/// Parses an embedding payload.
///
/// Accepts a JSON number array (`[0.1, 0.2]`) or comma-separated floats
/// (`0.1, 0.2`). Returns `None` for empty, malformed, or non-finite
/// input.
#[must_use]
pub fn parse_embedding(payload: &str) -> Option<Vec<f32>> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed: Option<Vec<f32>> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).ok()
    } else {
        trimmed
            .split(',')
            .map(|field| field.trim().parse::<f32>().ok())
            .collect()
    };
    parsed
        .filter(|values| !values.is_empty())
        .filter(|values| values.iter().all(|value| value.is_finite()))
}
