//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// A cron task was given an expression that does not parse.
    #[error("invalid cron expression '{0}'")]
    InvalidCronExpression(String),

    /// A cron task is missing its schedule expression.
    #[error("cron tasks require a schedule expression")]
    MissingCronExpression,

    /// A non-cron task carries a schedule expression.
    #[error("{0} tasks must not carry a schedule expression")]
    UnexpectedCronExpression(super::TaskKind),

    /// The concurrency limit is zero.
    #[error("concurrency limit must be at least 1")]
    InvalidConcurrencyLimit,
}

/// Error returned while parsing task kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task kind: {0}")]
pub struct ParseTaskKindError(pub String);
