//! Planner error types

use thiserror::Error;

use crate::import::ImportError;

/// Errors from planner operations
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Ambiguous task reference '{reference}': matches {}", .candidates.join(", "))]
    AmbiguousId { reference: String, candidates: Vec<String> },

    #[error("Task title cannot be empty")]
    EmptyTitle,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Undo window expired")]
    UndoExpired,

    #[error("Invalid week document: {0}")]
    InvalidWeek(String),

    #[error("Report not found: {0}")]
    ReportNotFound(String),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<eyre::Report> for PlannerError {
    fn from(err: eyre::Report) -> Self {
        PlannerError::Store(format!("{:#}", err))
    }
}

/// Result alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
