//! Task drafts produced by the prompt parser and the batch importer

use serde::{Deserialize, Serialize};

use super::attributes::{Category, Period};
use super::day::Day;
use super::priority::Priority;

/// A checklist entry carried by an imported draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskDraft {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl SubtaskDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

/// A normalized, not-yet-persisted task
///
/// Every field holds a legal value; drafts are never built with an empty title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub day: Day,
    pub priority: Priority,
    pub category: Category,
    pub period: Period,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<SubtaskDraft>,
}

impl TaskDraft {
    /// Create a draft with default priority, category and period
    pub fn new(title: impl Into<String>, day: Day) -> Self {
        Self {
            title: title.into(),
            day,
            priority: Priority::default(),
            category: Category::default(),
            period: Period::default(),
            subtasks: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    pub fn with_subtasks(mut self, subtasks: Vec<SubtaskDraft>) -> Self {
        self.subtasks = subtasks;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults() {
        let draft = TaskDraft::new("Standup", Day::Monday);
        assert_eq!(draft.priority, Priority::Low);
        assert_eq!(draft.category, Category::Other);
        assert_eq!(draft.period, Period::Morning);
        assert!(draft.subtasks.is_empty());
    }

    #[test]
    fn test_draft_serde_wire_shape() {
        let draft = TaskDraft::new("Gym", Day::Tuesday)
            .with_category(Category::Health)
            .with_period(Period::EarlyMorning);
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "title": "Gym",
                "day": "tuesday",
                "priority": "low",
                "category": "health",
                "period": "early-morning"
            })
        );
    }
}
