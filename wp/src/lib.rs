//! Weekplan - weekly task planner
//!
//! Tasks are filed under the days of a single week. They can be entered as
//! free text ("team meeting monday and gym tuesday evening"), imported as a
//! JSON batch, or created field by field.
//!
//! # Modules
//!
//! - [`domain`] - Days, task attributes, drafts and the stored week document
//! - [`parser`] - Natural-language prompt parsing into drafts
//! - [`import`] - JSON batch unwrapping and per-item validation
//! - [`planner`] - Task operations, undo, week rollover
//! - [`stats`] - Completion statistics and grades
//! - [`reports`] - Weekly report snapshots
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod import;
pub mod parser;
pub mod planner;
pub mod reports;
pub mod stats;

// Re-export commonly used types
pub use config::Config;
pub use domain::{Category, Day, Period, Priority, Subtask, SubtaskDraft, Task, TaskDraft, Week};
pub use import::{BatchOutcome, ImportError, ParseError, RawTaskItem, validate_batch};
pub use parser::parse_prompt;
pub use planner::{DayStore, Planner, PlannerError, PlannerOptions, TaskFilter};
pub use reports::WeeklyReport;
pub use stats::{WeekStats, performance_grade};
