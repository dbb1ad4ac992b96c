//! Import error types

use thiserror::Error;

/// Why a single batch item was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemProblem {
    #[error("missing title/task")]
    MissingTitle,

    #[error("missing day")]
    MissingDay,

    #[error("invalid day: \"{0}\"")]
    InvalidDay(String),
}

/// A rejected batch item: 1-based position plus the reason
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Task {index}: {reason}")]
pub struct ParseError {
    pub index: usize,
    pub reason: ItemProblem,
}

impl ParseError {
    pub fn new(index: usize, reason: ItemProblem) -> Self {
        Self { index, reason }
    }
}

/// Batch-level failures; fatal for the whole import
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no input")]
    NoInput,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected array or object with tasks property")]
    InvalidShape,

    #[error("no tasks found")]
    Empty,

    #[error("no valid tasks found. {first_error}")]
    NoValidTasks { first_error: ParseError, skipped: usize },
}

impl ImportError {
    /// Whether the input itself could not be read as a batch
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            ImportError::NoInput | ImportError::InvalidJson(_) | ImportError::InvalidShape | ImportError::Empty
        )
    }
}
