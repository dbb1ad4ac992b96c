//! Planner documents on top of a key-value store

use chrono::{DateTime, NaiveDate, Utc};
use keystore::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::PlannerResult;
use crate::domain::{Day, Task, Week};
use crate::reports::WeeklyReport;

/// Key of the week document
pub const TASKS_KEY: &str = "weeklyTasks";
/// Key of the saved reports, newest first
pub const REPORTS_KEY: &str = "weeklyReports";
/// Key of the ISO date of the active week's Monday
pub const WEEK_START_KEY: &str = "lastWeekStart";
/// Key of the pending undo entry
pub const UNDO_KEY: &str = "undo";

/// Per-day task persistence
pub trait DayStore {
    fn load_day(&self, day: Day) -> PlannerResult<Vec<Task>>;

    fn save_day(&self, day: Day, tasks: Vec<Task>) -> PlannerResult<()>;

    fn load_week(&self) -> PlannerResult<Week> {
        let mut week = Week::empty();
        for day in Day::ALL {
            week.set_day(day, self.load_day(day)?);
        }
        Ok(week)
    }

    fn save_week(&self, week: &Week) -> PlannerResult<()> {
        for day in Day::ALL {
            self.save_day(day, week.day(day).to_vec())?;
        }
        Ok(())
    }
}

/// What a clear operation removed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum Removed {
    /// Tasks taken from the front of one day
    Day { day: Day, tasks: Vec<Task> },
    /// The whole week as it was before clearing
    Week { backup: Week },
}

impl Removed {
    pub fn len(&self) -> usize {
        match self {
            Removed::Day { tasks, .. } => tasks.len(),
            Removed::Week { backup } => backup.total(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Single-step undo record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoEntry {
    pub removed: Removed,
    pub created_at: DateTime<Utc>,
}

/// Typed access to the planner documents
pub struct TaskRepository<K: KeyValueStore> {
    kv: K,
}

impl<K: KeyValueStore> TaskRepository<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Underlying store
    pub fn store(&self) -> &K {
        &self.kv
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> PlannerResult<Option<T>> {
        Ok(self.kv.get_json(key)?)
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> PlannerResult<()> {
        debug!(key, "TaskRepository::write");
        Ok(self.kv.set_json(key, value)?)
    }

    pub fn load_undo(&self) -> PlannerResult<Option<UndoEntry>> {
        self.read(UNDO_KEY)
    }

    pub fn save_undo(&self, entry: &UndoEntry) -> PlannerResult<()> {
        self.write(UNDO_KEY, entry)
    }

    pub fn clear_undo(&self) -> PlannerResult<()> {
        Ok(self.kv.remove(UNDO_KEY)?)
    }

    pub fn load_reports(&self) -> PlannerResult<Vec<WeeklyReport>> {
        Ok(self.read(REPORTS_KEY)?.unwrap_or_default())
    }

    pub fn save_reports(&self, reports: &[WeeklyReport]) -> PlannerResult<()> {
        self.write(REPORTS_KEY, &reports)
    }

    pub fn week_start(&self) -> PlannerResult<Option<NaiveDate>> {
        self.read(WEEK_START_KEY)
    }

    pub fn set_week_start(&self, start: NaiveDate) -> PlannerResult<()> {
        self.write(WEEK_START_KEY, &start)
    }
}

impl<K: KeyValueStore> DayStore for TaskRepository<K> {
    fn load_day(&self, day: Day) -> PlannerResult<Vec<Task>> {
        Ok(self.load_week()?.day(day).to_vec())
    }

    fn save_day(&self, day: Day, tasks: Vec<Task>) -> PlannerResult<()> {
        let mut week = self.load_week()?;
        week.set_day(day, tasks);
        self.save_week(&week)
    }

    /// Missing days in a stored document read as empty
    fn load_week(&self) -> PlannerResult<Week> {
        let stored: Option<Week> = self.read(TASKS_KEY)?;
        let mut week = Week::empty();
        if let Some(stored) = stored {
            for day in Day::ALL {
                week.set_day(day, stored.day(day).to_vec());
            }
        }
        Ok(week)
    }

    fn save_week(&self, week: &Week) -> PlannerResult<()> {
        self.write(TASKS_KEY, week)
    }
}
