//! Prompt entries and AI summaries attached to tasks.
//!
//! Thin append-only records: the prompts operators and runners exchanged
//! for a task, and the AI-generated summaries of its runs. They matter to
//! the control plane because retention treats their timestamps as task
//! activity, and cascade deletion removes them with their task.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
