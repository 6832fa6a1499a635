//! In-memory adapters for the search ports.

mod chunk;

pub use chunk::InMemorySemanticChunkRepository;
