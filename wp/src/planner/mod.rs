//! The weekly planner: task operations, undo, rollover and reports
//!
//! All state lives in a [`keystore::KeyValueStore`] as JSON documents, so a
//! planner can run against files on disk or entirely in memory.

mod error;
mod repository;
mod service;

pub use error::{PlannerError, PlannerResult};
pub use repository::{DayStore, REPORTS_KEY, Removed, TASKS_KEY, TaskRepository, UNDO_KEY, UndoEntry, WEEK_START_KEY};
pub use service::{
    DEFAULT_UNDO_WINDOW_SECS, ImportSummary, NewTask, Planner, PlannerOptions, StatusFilter, TaskEdit, TaskFilter,
};
