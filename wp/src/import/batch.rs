//! JSON batch validation
//!
//! Externally supplied task lists are loosely shaped: the title may be called
//! `title` or `task`, optional fields may hold anything. Items are read into
//! [`RawTaskItem`] (every field optional, non-string values treated as absent)
//! and validated one by one. Bad required fields reject the item; bad optional
//! fields fall back to defaults.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{ImportError, ItemProblem, ParseError};
use crate::domain::{Day, SubtaskDraft, TaskDraft};

/// Template shown to users preparing an import
pub const IMPORT_TEMPLATE: &str = r#"[{
  "task": "Your task here",
  "day": "monday",
  "priority": "low",
  "category": "work",
  "period": "morning",
  "subtasks": ["Subtask 1", "Subtask 2"]
}]"#;

/// One loosely-typed task as found in an import batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawTaskItem {
    #[serde(default, deserialize_with = "text_field")]
    pub title: Option<String>,

    /// Alias for `title`
    #[serde(default, deserialize_with = "text_field")]
    pub task: Option<String>,

    #[serde(default, deserialize_with = "text_field")]
    pub day: Option<String>,

    #[serde(default, deserialize_with = "text_field")]
    pub priority: Option<String>,

    #[serde(default, deserialize_with = "text_field")]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "text_field")]
    pub period: Option<String>,

    #[serde(default, deserialize_with = "subtask_entries")]
    pub subtasks: Vec<SubtaskDraft>,
}

impl RawTaskItem {
    /// Read an item from any JSON value; non-objects become an empty item
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// `title` when present and non-blank, else `task`
    fn resolved_title(&self) -> Option<&str> {
        non_blank(&self.title).or_else(|| non_blank(&self.task))
    }

    fn validate(&self) -> Result<TaskDraft, ItemProblem> {
        let title = self.resolved_title().ok_or(ItemProblem::MissingTitle)?;
        let raw_day = self.day.as_deref().filter(|d| !d.is_empty()).ok_or(ItemProblem::MissingDay)?;
        let day: Day = raw_day
            .parse()
            .map_err(|_| ItemProblem::InvalidDay(raw_day.to_string()))?;

        Ok(TaskDraft::new(title, day)
            .with_priority(optional_enum(&self.priority))
            .with_category(optional_enum(&self.category))
            .with_period(optional_enum(&self.period))
            .with_subtasks(self.subtasks.clone()))
    }
}

impl From<&TaskDraft> for RawTaskItem {
    fn from(draft: &TaskDraft) -> Self {
        Self {
            title: Some(draft.title.clone()),
            task: None,
            day: Some(draft.day.to_string()),
            priority: Some(draft.priority.to_string()),
            category: Some(draft.category.to_string()),
            period: Some(draft.period.to_string()),
            subtasks: draft.subtasks.clone(),
        }
    }
}

/// Result of validating a batch: accepted drafts and rejected items, both in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub valid: Vec<TaskDraft>,
    pub errors: Vec<ParseError>,
}

/// Validate every item independently
pub fn validate_batch(items: &[RawTaskItem]) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (i, item) in items.iter().enumerate() {
        match item.validate() {
            Ok(draft) => outcome.valid.push(draft),
            Err(reason) => {
                let error = ParseError::new(i + 1, reason);
                debug!(%error, "validate_batch: item rejected");
                outcome.errors.push(error);
            }
        }
    }

    debug!(
        valid = outcome.valid.len(),
        errors = outcome.errors.len(),
        "validate_batch: done"
    );
    outcome
}

/// Accept a top-level array or an object with a `tasks` array
pub fn unwrap_batch(value: &Value) -> Result<Vec<RawTaskItem>, ImportError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("tasks") {
            Some(Value::Array(items)) => items,
            _ => return Err(ImportError::InvalidShape),
        },
        _ => return Err(ImportError::InvalidShape),
    };

    if items.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(items.iter().map(RawTaskItem::from_value).collect())
}

/// Parse JSON text into batch items
pub fn parse_batch(text: &str) -> Result<Vec<RawTaskItem>, ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::NoInput);
    }
    let value: Value = serde_json::from_str(text)?;
    unwrap_batch(&value)
}

/// Parse and validate; refuses a batch in which nothing is valid
pub fn import_batch(text: &str) -> Result<BatchOutcome, ImportError> {
    let items = parse_batch(text)?;
    let outcome = validate_batch(&items);

    if outcome.valid.is_empty() {
        let skipped = outcome.errors.len();
        if let Some(first_error) = outcome.errors.into_iter().next() {
            warn!(skipped, "import_batch: no valid tasks");
            return Err(ImportError::NoValidTasks { first_error, skipped });
        }
        return Err(ImportError::Empty);
    }
    Ok(outcome)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Lower-case and parse, falling back to the field default
fn optional_enum<T: std::str::FromStr + Default>(value: &Option<String>) -> T {
    value
        .as_deref()
        .and_then(|s| s.to_lowercase().parse().ok())
        .unwrap_or_default()
}

/// Keep strings, treat every other JSON type as absent
fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Subtasks may be plain strings or `{ "text": ..., "completed": ... }` objects
fn subtask_entries<'de, D>(deserializer: D) -> Result<Vec<SubtaskDraft>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(text) => Some(SubtaskDraft::new(text)),
            Value::Object(map) => {
                let text = map.get("text").and_then(Value::as_str).unwrap_or_default().to_string();
                let completed = map.get("completed").and_then(Value::as_bool).unwrap_or(false);
                Some(SubtaskDraft { text, completed })
            }
            _ => None,
        })
        .filter(|s| !s.text.trim().is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Period, Priority};
    use serde_json::json;

    fn items(value: Value) -> Vec<RawTaskItem> {
        unwrap_batch(&value).unwrap()
    }

    #[test]
    fn test_standup_normalized() {
        let outcome = validate_batch(&items(json!([{"title": "Standup", "day": "Monday", "priority": "HIGH"}])));
        assert_eq!(
            outcome.valid,
            vec![TaskDraft::new("Standup", Day::Monday).with_priority(Priority::High)]
        );
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.valid[0].category, Category::Other);
        assert_eq!(outcome.valid[0].period, Period::Morning);
    }

    #[test]
    fn test_missing_title_and_invalid_day() {
        let outcome = validate_batch(&items(json!([{"day": "monday"}, {"title": "X", "day": "funday"}])));
        assert!(outcome.valid.is_empty());
        assert_eq!(
            outcome.errors,
            vec![
                ParseError::new(1, ItemProblem::MissingTitle),
                ParseError::new(2, ItemProblem::InvalidDay("funday".to_string())),
            ]
        );
        assert_eq!(outcome.errors[1].to_string(), "Task 2: invalid day: \"funday\"");
    }

    #[test]
    fn test_missing_day() {
        let outcome = validate_batch(&items(json!([{"task": "Run"}, {"task": "Run", "day": ""}])));
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors.iter().all(|e| e.reason == ItemProblem::MissingDay));
    }

    #[test]
    fn test_task_alias_and_title_preference() {
        let outcome = validate_batch(&items(json!([
            {"task": "From task", "day": "tuesday"},
            {"title": "From title", "task": "Ignored", "day": "wednesday"},
            {"title": "", "task": "Fallback", "day": "thursday"},
        ])));
        let titles: Vec<&str> = outcome.valid.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["From task", "From title", "Fallback"]);
    }

    #[test]
    fn test_invalid_optional_fields_default_silently() {
        let outcome = validate_batch(&items(json!([{
            "title": "Plan trip",
            "day": "FRIDAY",
            "priority": "urgent",
            "category": "Travel",
            "period": "Evening"
        }])));
        assert!(outcome.errors.is_empty());
        let draft = &outcome.valid[0];
        assert_eq!(draft.day, Day::Friday);
        assert_eq!(draft.priority, Priority::Low);
        assert_eq!(draft.category, Category::Other);
        assert_eq!(draft.period, Period::Evening);
    }

    #[test]
    fn test_title_kept_as_supplied() {
        let outcome = validate_batch(&items(json!([{"title": "  lowercase title ", "day": "monday"}])));
        assert_eq!(outcome.valid[0].title, "  lowercase title ");

        let outcome = validate_batch(&items(json!([{"title": "   ", "day": "monday"}])));
        assert_eq!(outcome.errors[0].reason, ItemProblem::MissingTitle);
    }

    #[test]
    fn test_non_string_fields_treated_as_absent() {
        let outcome = validate_batch(&items(json!([
            {"title": 42, "day": "monday"},
            {"title": "Numbers", "day": 3},
            "just a string",
            {"title": "Ok", "day": "sunday", "priority": 1},
        ])));
        assert_eq!(outcome.valid.len(), 1);
        assert_eq!(outcome.valid[0].priority, Priority::Low);
        let reasons: Vec<ItemProblem> = outcome.errors.into_iter().map(|e| e.reason).collect();
        assert_eq!(
            reasons,
            vec![ItemProblem::MissingTitle, ItemProblem::MissingDay, ItemProblem::MissingTitle]
        );
    }

    #[test]
    fn test_subtasks_strings_and_objects() {
        let outcome = validate_batch(&items(json!([{
            "task": "Launch",
            "day": "monday",
            "subtasks": ["Write notes", {"text": "Review", "completed": true}, {"done": true}, 7, ""]
        }])));
        assert_eq!(
            outcome.valid[0].subtasks,
            vec![
                SubtaskDraft::new("Write notes"),
                SubtaskDraft {
                    text: "Review".to_string(),
                    completed: true
                },
            ]
        );
    }

    #[test]
    fn test_unwrap_batch_shapes() {
        assert_eq!(unwrap_batch(&json!({"tasks": [{"title": "A"}]})).unwrap().len(), 1);
        assert!(matches!(unwrap_batch(&json!({"items": []})), Err(ImportError::InvalidShape)));
        assert!(matches!(unwrap_batch(&json!({"tasks": "nope"})), Err(ImportError::InvalidShape)));
        assert!(matches!(unwrap_batch(&json!("text")), Err(ImportError::InvalidShape)));
        assert!(matches!(unwrap_batch(&json!([])), Err(ImportError::Empty)));
        assert!(matches!(unwrap_batch(&json!({"tasks": []})), Err(ImportError::Empty)));
    }

    #[test]
    fn test_parse_batch_errors() {
        assert!(matches!(parse_batch("  "), Err(ImportError::NoInput)));
        assert!(matches!(parse_batch("[{"), Err(ImportError::InvalidJson(_))));
    }

    #[test]
    fn test_import_batch_refuses_all_invalid() {
        let err = import_batch(r#"[{"day": "monday"}, {"title": "x"}]"#).unwrap_err();
        match err {
            ImportError::NoValidTasks { first_error, skipped } => {
                assert_eq!(first_error, ParseError::new(1, ItemProblem::MissingTitle));
                assert_eq!(skipped, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_import_batch_partial() {
        let outcome = import_batch(r#"{"tasks": [{"title": "A", "day": "monday"}, {"title": "B"}]}"#).unwrap();
        assert_eq!(outcome.valid.len(), 1);
        assert_eq!(outcome.errors, vec![ParseError::new(2, ItemProblem::MissingDay)]);
    }

    #[test]
    fn test_revalidating_valid_output_is_stable() {
        let first = validate_batch(&items(json!([
            {"title": "Standup", "day": "Monday", "priority": "HIGH"},
            {"task": "Swim", "day": "saturday", "period": "EARLY-MORNING", "category": "Health"},
            {"day": "monday"},
        ])));
        let rewrapped: Vec<RawTaskItem> = first.valid.iter().map(RawTaskItem::from).collect();
        let second = validate_batch(&rewrapped);
        assert_eq!(second.valid, first.valid);
        assert!(second.errors.is_empty());
    }

    #[test]
    fn test_template_is_importable() {
        let outcome = import_batch(IMPORT_TEMPLATE).unwrap();
        assert_eq!(outcome.valid.len(), 1);
        assert_eq!(outcome.valid[0].category, Category::Work);
        assert_eq!(outcome.valid[0].subtasks.len(), 2);
    }
}
