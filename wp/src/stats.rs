//! Week statistics and performance grading

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{Category, Day, Priority, Week};

/// Totals for a single day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    pub total: usize,
    pub completed: usize,
    /// Completion percentage, rounded
    pub rate: u32,
}

/// Aggregate statistics over a week
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub active_tasks: usize,
    /// Completion percentage, rounded; 0 for an empty week
    pub completion_rate: u32,
    pub by_day: BTreeMap<Day, DayStats>,
    /// Only categories that occur are present
    pub by_category: BTreeMap<Category, usize>,
    /// Every priority is present, possibly with zero
    pub by_priority: BTreeMap<Priority, usize>,
}

impl WeekStats {
    pub fn from_week(week: &Week) -> Self {
        let mut stats = Self {
            by_priority: Priority::ALL.into_iter().map(|p| (p, 0)).collect(),
            ..Default::default()
        };

        for day in Day::ALL {
            let tasks = week.day(day);
            let completed = tasks.iter().filter(|t| t.completed).count();

            for task in tasks {
                *stats.by_category.entry(task.category).or_default() += 1;
                *stats.by_priority.entry(task.priority).or_default() += 1;
            }

            stats.total_tasks += tasks.len();
            stats.completed_tasks += completed;
            stats.by_day.insert(
                day,
                DayStats {
                    total: tasks.len(),
                    completed,
                    rate: percent(completed, tasks.len()),
                },
            );
        }

        stats.active_tasks = stats.total_tasks - stats.completed_tasks;
        stats.completion_rate = percent(stats.completed_tasks, stats.total_tasks);
        stats
    }

    /// Grade for the overall completion rate
    pub fn grade(&self) -> Grade {
        performance_grade(self.completion_rate)
    }
}

/// Letter grade with an encouragement message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub grade: &'static str,
    pub message: &'static str,
}

/// Map a completion percentage to a grade
pub fn performance_grade(rate: u32) -> Grade {
    let (grade, message) = match rate {
        90.. => ("A+", "Outstanding"),
        80..=89 => ("A", "Excellent"),
        70..=79 => ("B", "Great Job"),
        60..=69 => ("C", "Good Work"),
        50..=59 => ("D", "Keep Trying"),
        _ => ("F", "Needs Improvement"),
    };
    Grade { grade, message }
}

/// Rounded percentage with halves rounding up; 0 when `total` is 0
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * part + total) / (2 * total)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;
    use chrono::Utc;

    fn task(title: &str, completed: bool, priority: Priority, category: Category) -> Task {
        let mut task = Task::new(title, Utc::now());
        task.completed = completed;
        task.priority = priority;
        task.category = category;
        task
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(5, 5), 100);
    }

    #[test]
    fn test_grades() {
        assert_eq!(performance_grade(100).grade, "A+");
        assert_eq!(performance_grade(90).grade, "A+");
        assert_eq!(performance_grade(89).grade, "A");
        assert_eq!(performance_grade(70).message, "Great Job");
        assert_eq!(performance_grade(60).grade, "C");
        assert_eq!(performance_grade(50).grade, "D");
        assert_eq!(performance_grade(49).message, "Needs Improvement");
    }

    #[test]
    fn test_empty_week_stats() {
        let stats = WeekStats::from_week(&Week::empty());
        assert_eq!(stats.total_tasks, 0);
        assert_eq!(stats.completion_rate, 0);
        assert_eq!(stats.by_day.len(), 7);
        assert!(stats.by_category.is_empty());
        assert_eq!(stats.by_priority.get(&Priority::High), Some(&0));
        assert_eq!(stats.grade().grade, "F");
    }

    #[test]
    fn test_week_stats_counts() {
        let mut week = Week::empty();
        week.day_mut(Day::Monday).extend([
            task("Standup", true, Priority::High, Category::Work),
            task("Gym", false, Priority::Low, Category::Health),
        ]);
        week.day_mut(Day::Friday)
            .push(task("Report", true, Priority::High, Category::Work));

        let stats = WeekStats::from_week(&week);
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.completed_tasks, 2);
        assert_eq!(stats.active_tasks, 1);
        assert_eq!(stats.completion_rate, 67);
        assert_eq!(
            stats.by_day[&Day::Monday],
            DayStats {
                total: 2,
                completed: 1,
                rate: 50
            }
        );
        assert_eq!(stats.by_day[&Day::Tuesday], DayStats::default());
        assert_eq!(stats.by_category.get(&Category::Work), Some(&2));
        assert_eq!(stats.by_category.get(&Category::Personal), None);
        assert_eq!(stats.by_priority[&Priority::High], 2);
        assert_eq!(stats.by_priority[&Priority::Medium], 0);
    }

    #[test]
    fn test_week_stats_serde_shape() {
        let value = serde_json::to_value(WeekStats::from_week(&Week::empty())).unwrap();
        assert!(value.get("totalTasks").is_some());
        assert!(value["byDay"].get("monday").is_some());
        assert_eq!(value["byPriority"]["low"], 0);
    }
}
