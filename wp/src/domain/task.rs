//! Persisted tasks and the day-bucketed week document
//!
//! Field names follow the stored JSON (`dueDate`, `createdAt`). Loading is
//! lenient: documents written by older versions may carry numeric ids, empty
//! due dates or enumeration values outside the current vocabulary, which fall
//! back to defaults instead of rejecting the whole week.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::attributes::{Category, Period};
use super::day::Day;
use super::draft::{SubtaskDraft, TaskDraft};
use super::id::generate_id;
use super::priority::Priority;

/// A checklist entry inside a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: generate_id(&text),
            text,
            completed: false,
        }
    }
}

impl From<SubtaskDraft> for Subtask {
    fn from(draft: SubtaskDraft) -> Self {
        Self {
            id: generate_id(&draft.text),
            text: draft.text,
            completed: draft.completed,
        }
    }
}

/// A task filed under one day of the week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Display title
    pub title: String,

    /// Whether the task is done
    #[serde(default)]
    pub completed: bool,

    #[serde(default, deserialize_with = "lenient")]
    pub priority: Priority,

    #[serde(default, deserialize_with = "lenient")]
    pub category: Category,

    #[serde(default, deserialize_with = "lenient")]
    pub period: Period,

    /// Optional calendar due date
    #[serde(default, deserialize_with = "optional_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    #[serde(default)]
    pub subtasks: Vec<Subtask>,

    /// Creation timestamp; absent for tasks created by very old versions
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a task with a generated ID and default attributes
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        let title = title.into();
        Self {
            id: generate_id(&title),
            title,
            completed: false,
            priority: Priority::default(),
            category: Category::default(),
            period: Period::default(),
            due_date: None,
            description: String::new(),
            notes: String::new(),
            subtasks: Vec::new(),
            created_at: Some(now),
        }
    }

    /// Turn a draft into a fresh, incomplete task
    pub fn from_draft(draft: TaskDraft, now: DateTime<Utc>) -> Self {
        let mut task = Self::new(draft.title, now);
        task.priority = draft.priority;
        task.category = draft.category;
        task.period = draft.period;
        task.subtasks = draft.subtasks.into_iter().map(Subtask::from).collect();
        task
    }

    /// Copy of this task for a new week: new IDs, nothing completed, no due date
    pub fn renewed(&self, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(&self.title),
            title: self.title.clone(),
            completed: false,
            priority: self.priority,
            category: self.category,
            period: self.period,
            due_date: None,
            description: self.description.clone(),
            notes: self.notes.clone(),
            subtasks: self
                .subtasks
                .iter()
                .map(|s| Subtask {
                    id: generate_id(&s.text),
                    text: s.text.clone(),
                    completed: false,
                })
                .collect(),
            created_at: Some(now),
        }
    }

    /// Number of completed subtasks
    pub fn subtasks_done(&self) -> usize {
        self.subtasks.iter().filter(|s| s.completed).count()
    }
}

/// All tasks of the week, bucketed by day
///
/// Serializes as `{ "monday": [...], ..., "sunday": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Week {
    days: BTreeMap<Day, Vec<Task>>,
}

impl Default for Week {
    fn default() -> Self {
        Self::empty()
    }
}

impl Week {
    /// A week with all seven day lists present and empty
    pub fn empty() -> Self {
        Self {
            days: Day::ALL.into_iter().map(|day| (day, Vec::new())).collect(),
        }
    }

    /// Days without a list, in week order
    pub fn missing_days(&self) -> Vec<Day> {
        Day::ALL.into_iter().filter(|day| !self.days.contains_key(day)).collect()
    }

    /// Tasks filed under `day`
    pub fn day(&self, day: Day) -> &[Task] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable list for `day`, created when missing
    pub fn day_mut(&mut self, day: Day) -> &mut Vec<Task> {
        self.days.entry(day).or_default()
    }

    /// Replace the list for `day`
    pub fn set_day(&mut self, day: Day, tasks: Vec<Task>) {
        self.days.insert(day, tasks);
    }

    /// Iterate every task with its day, Monday first
    pub fn iter(&self) -> impl Iterator<Item = (Day, &Task)> {
        self.days
            .iter()
            .flat_map(|(day, tasks)| tasks.iter().map(move |task| (*day, task)))
    }

    /// Total number of tasks
    pub fn total(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    /// Find a task by exact ID: (day, index within the day)
    pub fn locate(&self, id: &str) -> Option<(Day, usize)> {
        self.days
            .iter()
            .find_map(|(day, tasks)| tasks.iter().position(|t| t.id == id).map(|index| (*day, index)))
    }
}

/// Accept either a JSON string or a number (older documents used millisecond ids)
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected string or number id, got {}", other))),
    }
}

/// Parse a known enumeration value, falling back to its default
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(|s| s.parse().ok()).unwrap_or_default())
}

/// Empty strings and unparseable dates are treated as "no due date"
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}
