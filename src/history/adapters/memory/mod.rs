//! In-memory adapters for the history ports.

mod history;

pub use history::{InMemoryAiSummaryRepository, InMemoryPromptEntryRepository};
