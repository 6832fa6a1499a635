//! Domain-focused tests for chunk building and similarity.

use crate::search::domain::{ChunkDraft, SemanticChunk, cosine_similarity, parse_embedding};
use crate::task::domain::TaskId;
use crate::test_support::FixedClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> FixedClock {
    FixedClock::at(2024, 7, 1, 6, 0, 0)
}

#[rstest]
fn empty_content_is_dropped(clock: FixedClock) {
    let chunk = SemanticChunk::build(TaskId::new(), ChunkDraft::new("src/lib.rs", 0, "  "), &clock);
    assert!(chunk.is_none());
}

#[rstest]
fn key_defaults_to_source_and_index(clock: FixedClock) {
    let chunk = SemanticChunk::build(
        TaskId::new(),
        ChunkDraft::new("src/lib.rs", 3, "pub fn main() {}"),
        &clock,
    )
    .expect("non-empty chunk");

    assert_eq!(chunk.chunk_key(), "src/lib.rs:3");
}

#[rstest]
fn explicit_key_overrides_default(clock: FixedClock) {
    let chunk = SemanticChunk::build(
        TaskId::new(),
        ChunkDraft::new("src/lib.rs", 3, "content").with_chunk_key("custom-key"),
        &clock,
    )
    .expect("non-empty chunk");

    assert_eq!(chunk.chunk_key(), "custom-key");
}

#[rstest]
fn embedding_dimensions_follow_parsed_vector(clock: FixedClock) {
    let chunk = SemanticChunk::build(
        TaskId::new(),
        ChunkDraft::new("notes.md", 0, "vectorised").with_embedding("[1.0, 0.0, 0.5]"),
        &clock,
    )
    .expect("non-empty chunk");

    assert_eq!(chunk.embedding_dimensions(), Some(3));
    assert_eq!(chunk.embedding().map(<[f32]>::len), Some(3));
}

#[rstest]
fn identical_content_hashes_identically(clock: FixedClock) {
    let first = SemanticChunk::build(
        TaskId::new(),
        ChunkDraft::new("a.rs", 0, "same content"),
        &clock,
    )
    .expect("non-empty chunk");
    let second = SemanticChunk::build(
        TaskId::new(),
        ChunkDraft::new("b.rs", 1, "same content"),
        &clock,
    )
    .expect("non-empty chunk");

    assert_eq!(first.content_hash(), second.content_hash());
}

#[rstest]
#[case("[1.0, 0.0, 0.5]", Some(vec![1.0, 0.0, 0.5]))]
#[case("1.0, 0.0, 0.5", Some(vec![1.0, 0.0, 0.5]))]
#[case("1.0,0.0", Some(vec![1.0, 0.0]))]
#[case("", None)]
#[case("[]", None)]
#[case("not numbers", None)]
#[case("[1.0, \"two\"]", None)]
fn embedding_payload_parsing(#[case] payload: &str, #[case] expected: Option<Vec<f32>>) {
    assert_eq!(parse_embedding(payload), expected);
}

#[rstest]
fn cosine_of_identical_vectors_is_one() {
    let score = cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]).expect("defined");
    assert_eq!(score, 1.0);
}

#[rstest]
fn cosine_of_orthogonal_vectors_is_zero() {
    let score = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).expect("defined");
    assert_eq!(score, 0.0);
}

#[rstest]
fn cosine_is_undefined_for_mismatched_or_zero_vectors() {
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), None);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), None);
    assert_eq!(cosine_similarity(&[], &[]), None);
}
