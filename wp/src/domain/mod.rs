//! Domain types for Weekplan
//!
//! Canonical enumerations (day, priority, category, period), the ephemeral
//! `TaskDraft` produced by the parser and importer, and the persisted `Task`
//! and `Week` document.

mod attributes;
mod day;
mod draft;
mod id;
mod priority;
mod task;

pub use attributes::{Category, Period};
pub use day::Day;
pub use draft::{SubtaskDraft, TaskDraft};
pub use id::{IdResolver, generate_id};
pub use priority::Priority;
pub use task::{Subtask, Task, Week};
pub(crate) use task::string_or_number;
