//! Planner operations over the stored week

use chrono::{DateTime, Duration, NaiveDate, Utc};
use keystore::KeyValueStore;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::error::{PlannerError, PlannerResult};
use super::repository::{DayStore, Removed, TaskRepository, UndoEntry};
use crate::domain::{Category, Day, IdResolver, Period, Priority, Task, TaskDraft, Week};
use crate::import::{ParseError, import_batch};
use crate::reports::{DEFAULT_REPORTS_KEPT, WeeklyReport, push_report, week_start};
use crate::stats::WeekStats;

/// Seconds an undo entry stays usable by default
pub const DEFAULT_UNDO_WINDOW_SECS: u64 = 600;

/// Behavior knobs for the planner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerOptions {
    /// How long a clear can be undone; `None` never expires
    pub undo_window: Option<Duration>,
    /// Number of weekly reports kept
    pub reports_keep: usize,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            undo_window: Some(Duration::seconds(DEFAULT_UNDO_WINDOW_SECS as i64)),
            reports_keep: DEFAULT_REPORTS_KEPT,
        }
    }
}

/// Fields of a manually entered task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub priority: Priority,
    pub category: Category,
    pub period: Period,
    pub due_date: Option<NaiveDate>,
    pub description: String,
    pub notes: String,
}

/// Changes to an existing task; `None` leaves the field as is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub period: Option<Period>,
    pub due_date: Option<NaiveDate>,
    /// Remove the due date
    pub clear_due_date: bool,
    pub description: Option<String>,
    pub notes: Option<String>,
}

impl TaskEdit {
    fn apply(self, task: &mut Task) -> PlannerResult<()> {
        if let Some(title) = self.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(PlannerError::EmptyTitle);
            }
            task.title = title.to_string();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(period) = self.period {
            task.period = period;
        }
        if self.clear_due_date {
            task.due_date = None;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(notes) = self.notes {
            task.notes = notes;
        }
        Ok(())
    }
}

/// Completion-state filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
    /// High priority tasks, done or not
    High,
}

impl StatusFilter {
    fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
            StatusFilter::High => task.priority == Priority::High,
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown filter: {}. Use: all, active, completed, or high", s)),
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Listing criteria; all present criteria must hold
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub day: Option<Day>,
    pub status: StatusFilter,
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, day: Day, task: &Task) -> bool {
        if self.day.is_some_and(|d| d != day) {
            return false;
        }
        if !self.status.matches(task) {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let term = term.to_lowercase();
                task.title.to_lowercase().contains(&term) || task.description.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

/// Result of a JSON import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub added: Vec<(Day, Task)>,
    pub errors: Vec<ParseError>,
}

/// The weekly planner
pub struct Planner<K: KeyValueStore> {
    repo: TaskRepository<K>,
    options: PlannerOptions,
}

impl<K: KeyValueStore> Planner<K> {
    pub fn new(store: K, options: PlannerOptions) -> Self {
        Self {
            repo: TaskRepository::new(store),
            options,
        }
    }

    pub fn repository(&self) -> &TaskRepository<K> {
        &self.repo
    }

    /// Store drafts as new tasks, each under its draft's day
    pub fn add_drafts(&self, drafts: Vec<TaskDraft>, now: DateTime<Utc>) -> PlannerResult<Vec<(Day, Task)>> {
        debug!(count = drafts.len(), "add_drafts: called");
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let mut week = self.repo.load_week()?;
        let mut added = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let day = draft.day;
            let task = Task::from_draft(draft, now);
            week.day_mut(day).push(task.clone());
            added.push((day, task));
        }
        self.repo.save_week(&week)?;

        info!(count = added.len(), "Added tasks");
        Ok(added)
    }

    /// Add one task from explicit fields
    pub fn add_task(&self, day: Day, new: NewTask, now: DateTime<Utc>) -> PlannerResult<Task> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(PlannerError::EmptyTitle);
        }

        let mut task = Task::new(title, now);
        task.priority = new.priority;
        task.category = new.category;
        task.period = new.period;
        task.due_date = new.due_date;
        task.description = new.description;
        task.notes = new.notes;

        let mut tasks = self.repo.load_day(day)?;
        tasks.push(task.clone());
        self.repo.save_day(day, tasks)?;

        info!(id = %task.id, %day, "Added task");
        Ok(task)
    }

    /// Every task, or only those of `day`, in day order
    pub fn list(&self, day: Option<Day>) -> PlannerResult<Vec<(Day, Task)>> {
        self.filter(&TaskFilter {
            day,
            ..Default::default()
        })
    }

    pub fn filter(&self, filter: &TaskFilter) -> PlannerResult<Vec<(Day, Task)>> {
        let week = self.repo.load_week()?;
        Ok(week
            .iter()
            .filter(|(day, task)| filter.matches(*day, task))
            .map(|(day, task)| (day, task.clone()))
            .collect())
    }

    /// Look up a task by full ID, ID prefix or title-slug fragment
    pub fn find(&self, reference: &str) -> PlannerResult<(Day, Task)> {
        let week = self.repo.load_week()?;
        let (day, index) = resolve(&week, reference)?;
        Ok((day, week.day(day)[index].clone()))
    }

    /// Flip completion
    pub fn toggle(&self, reference: &str) -> PlannerResult<(Day, Task)> {
        self.update(reference, |task| {
            task.completed = !task.completed;
            Ok(())
        })
    }

    /// Change the given fields; completion is left alone
    pub fn edit(&self, reference: &str, edit: TaskEdit) -> PlannerResult<(Day, Task)> {
        self.update(reference, |task| edit.apply(task))
    }

    fn update<F>(&self, reference: &str, change: F) -> PlannerResult<(Day, Task)>
    where
        F: FnOnce(&mut Task) -> PlannerResult<()>,
    {
        let mut week = self.repo.load_week()?;
        let (day, index) = resolve(&week, reference)?;
        let task = &mut week.day_mut(day)[index];
        change(task)?;
        let updated = task.clone();
        self.repo.save_week(&week)?;

        debug!(id = %updated.id, completed = updated.completed, "update: saved");
        Ok((day, updated))
    }

    pub fn delete(&self, reference: &str) -> PlannerResult<(Day, Task)> {
        let mut week = self.repo.load_week()?;
        let (day, index) = resolve(&week, reference)?;
        let task = week.day_mut(day).remove(index);
        self.repo.save_week(&week)?;

        info!(id = %task.id, %day, "Deleted task");
        Ok((day, task))
    }

    /// Move a task to `to`, at `position` (0-based, clamped) or at the end
    ///
    /// Returns the day the task came from. A same-day move without a position
    /// changes nothing.
    pub fn move_task(&self, reference: &str, to: Day, position: Option<usize>) -> PlannerResult<(Day, Task)> {
        let mut week = self.repo.load_week()?;
        let (from, index) = resolve(&week, reference)?;

        if from == to && position.is_none() {
            debug!(%from, "move_task: same day without position, nothing to do");
            return Ok((from, week.day(from)[index].clone()));
        }

        let task = week.day_mut(from).remove(index);
        let target = week.day_mut(to);
        let at = position.unwrap_or(target.len()).min(target.len());
        target.insert(at, task.clone());
        self.repo.save_week(&week)?;

        info!(id = %task.id, %from, %to, at, "Moved task");
        Ok((from, task))
    }

    /// Remove the first `count` tasks of `day` (all when `None`)
    ///
    /// Returns how many were removed; removing anything replaces the pending
    /// undo entry.
    pub fn clear_day(&self, day: Day, count: Option<usize>, now: DateTime<Utc>) -> PlannerResult<usize> {
        let mut tasks = self.repo.load_day(day)?;
        let n = count.unwrap_or(tasks.len()).min(tasks.len());
        if n == 0 {
            debug!(%day, "clear_day: nothing to remove");
            return Ok(0);
        }

        let removed: Vec<Task> = tasks.drain(..n).collect();
        self.repo.save_day(day, tasks)?;
        self.repo.save_undo(&UndoEntry {
            removed: Removed::Day { day, tasks: removed },
            created_at: now,
        })?;

        info!(%day, removed = n, "Cleared tasks");
        Ok(n)
    }

    /// Empty every day; the previous week becomes the undo entry
    pub fn clear_all(&self, now: DateTime<Utc>) -> PlannerResult<usize> {
        let week = self.repo.load_week()?;
        let total = week.total();
        if total == 0 {
            return Ok(0);
        }

        self.repo.save_undo(&UndoEntry {
            removed: Removed::Week { backup: week },
            created_at: now,
        })?;
        self.repo.save_week(&Week::empty())?;

        info!(removed = total, "Cleared week");
        Ok(total)
    }

    /// Put back what the last clear removed; returns the number of restored tasks
    pub fn undo(&self, now: DateTime<Utc>) -> PlannerResult<usize> {
        let entry = self.repo.load_undo()?.ok_or(PlannerError::NothingToUndo)?;

        if let Some(window) = self.options.undo_window
            && now - entry.created_at > window
        {
            warn!(created_at = %entry.created_at, "undo: entry expired, discarding");
            self.repo.clear_undo()?;
            return Err(PlannerError::UndoExpired);
        }

        let restored = entry.removed.len();
        match entry.removed {
            Removed::Day { day, mut tasks } => {
                tasks.extend(self.repo.load_day(day)?);
                self.repo.save_day(day, tasks)?;
            }
            Removed::Week { backup } => self.repo.save_week(&backup)?,
        }
        self.repo.clear_undo()?;

        info!(restored, "Undo applied");
        Ok(restored)
    }

    /// Start the week over with the same tasks: all open, new IDs, no due dates
    pub fn fresh_week(&self, now: DateTime<Utc>) -> PlannerResult<usize> {
        let week = self.repo.load_week()?;
        let mut fresh = Week::empty();
        for day in Day::ALL {
            fresh.set_day(day, week.day(day).iter().map(|t| t.renewed(now)).collect());
        }
        self.repo.save_week(&fresh)?;

        info!(tasks = fresh.total(), "Started fresh week");
        Ok(fresh.total())
    }

    pub fn export_week(&self) -> PlannerResult<Week> {
        self.repo.load_week()
    }

    /// Replace the whole week; all seven days must be present
    pub fn restore_week(&self, week: Week) -> PlannerResult<()> {
        let missing = week.missing_days();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(Day::as_str).collect();
            return Err(PlannerError::InvalidWeek(format!("missing days: {}", names.join(", "))));
        }

        self.repo.save_week(&week)?;
        info!(tasks = week.total(), "Restored week");
        Ok(())
    }

    /// Validate a JSON batch and add its valid tasks
    pub fn import_json(&self, text: &str, now: DateTime<Utc>) -> PlannerResult<ImportSummary> {
        let outcome = import_batch(text)?;
        let added = self.add_drafts(outcome.valid, now)?;
        Ok(ImportSummary {
            added,
            errors: outcome.errors,
        })
    }

    pub fn stats(&self) -> PlannerResult<WeekStats> {
        Ok(WeekStats::from_week(&self.repo.load_week()?))
    }

    /// Snapshot the current week's statistics as a report
    pub fn save_report(&self, today: NaiveDate, now: DateTime<Utc>) -> PlannerResult<WeeklyReport> {
        let start = self.repo.week_start()?.unwrap_or_else(|| week_start(today));
        let report = WeeklyReport::new(start, self.stats()?, now);
        self.store_report(report.clone())?;
        Ok(report)
    }

    fn store_report(&self, report: WeeklyReport) -> PlannerResult<()> {
        let mut reports = self.repo.load_reports()?;
        info!(id = %report.id, week_start = %report.week_start, "Saving report");
        push_report(&mut reports, report, self.options.reports_keep);
        self.repo.save_reports(&reports)
    }

    /// Saved reports, newest first
    pub fn reports(&self) -> PlannerResult<Vec<WeeklyReport>> {
        self.repo.load_reports()
    }

    pub fn find_report(&self, reference: &str) -> PlannerResult<WeeklyReport> {
        self.repo
            .load_reports()?
            .into_iter()
            .find(|r| r.matches(reference))
            .ok_or_else(|| PlannerError::ReportNotFound(reference.to_string()))
    }

    pub fn delete_report(&self, reference: &str) -> PlannerResult<WeeklyReport> {
        let mut reports = self.repo.load_reports()?;
        let index = reports
            .iter()
            .position(|r| r.matches(reference))
            .ok_or_else(|| PlannerError::ReportNotFound(reference.to_string()))?;
        let report = reports.remove(index);
        self.repo.save_reports(&reports)?;

        info!(id = %report.id, "Deleted report");
        Ok(report)
    }

    /// Close out a finished week
    ///
    /// When the stored week start is older than the week containing `today`,
    /// the stored week is reported and emptied. The current week start is
    /// stored in every case.
    pub fn rollover(&self, today: NaiveDate, now: DateTime<Utc>) -> PlannerResult<Option<WeeklyReport>> {
        let current = week_start(today);
        let stored = self.repo.week_start()?;
        debug!(?stored, %current, "rollover: called");

        let report = match stored {
            Some(stored) if stored != current => {
                let report = WeeklyReport::new(stored, self.stats()?, now);
                self.store_report(report.clone())?;
                self.repo.save_week(&Week::empty())?;
                info!(from = %stored, to = %current, "Rolled over to new week");
                Some(report)
            }
            _ => None,
        };

        if stored != Some(current) {
            self.repo.set_week_start(current)?;
        }
        Ok(report)
    }
}

/// Resolve a reference to (day, index) within `week`
fn resolve(week: &Week, reference: &str) -> PlannerResult<(Day, usize)> {
    let reference = reference.trim().to_lowercase();
    let ids: HashMap<String, String> = week.iter().map(|(_, t)| (t.id.clone(), t.title.clone())).collect();

    let id = IdResolver::new(&ids)
        .resolve(&reference)
        .map_err(|candidates| PlannerError::AmbiguousId {
            reference: reference.clone(),
            candidates,
        })?
        .ok_or_else(|| PlannerError::TaskNotFound(reference.clone()))?;

    week.locate(&id).ok_or(PlannerError::TaskNotFound(reference))
}
