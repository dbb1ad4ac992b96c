//! Weekly report snapshots

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{generate_id, string_or_number};
use crate::stats::WeekStats;

/// Default number of reports kept
pub const DEFAULT_REPORTS_KEPT: usize = 10;

/// The Monday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// The Sunday closing the week that starts on `start`
pub fn week_end(start: NaiveDate) -> NaiveDate {
    start + Days::new(6)
}

/// Statistics frozen at the end of a week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub stats: WeekStats,
    pub saved_at: DateTime<Utc>,
}

impl WeeklyReport {
    pub fn new(start: NaiveDate, stats: WeekStats, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(&format!("week {}", start)),
            week_start: start,
            week_end: week_end(start),
            stats,
            saved_at: now,
        }
    }

    /// Whether `reference` names this report: ID, ID prefix or week start date
    pub fn matches(&self, reference: &str) -> bool {
        !reference.is_empty() && (self.id.starts_with(reference) || self.week_start.to_string() == reference)
    }
}

/// Put `report` first and drop the oldest beyond `keep`
pub fn push_report(reports: &mut Vec<WeeklyReport>, report: WeeklyReport, keep: usize) {
    reports.insert(0, report);
    reports.truncate(keep.max(1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Week;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2026-10-16 is a Friday
        assert_eq!(week_start(date(2026, 10, 16)), date(2026, 10, 12));
        assert_eq!(week_start(date(2026, 10, 12)), date(2026, 10, 12));
        // Sunday belongs to the week that started six days earlier
        assert_eq!(week_start(date(2026, 10, 18)), date(2026, 10, 12));
        assert_eq!(week_end(date(2026, 10, 12)), date(2026, 10, 18));
    }

    #[test]
    fn test_report_new_and_matches() {
        let report = WeeklyReport::new(date(2026, 10, 5), WeekStats::from_week(&Week::empty()), Utc::now());
        assert_eq!(report.week_end, date(2026, 10, 11));
        assert!(report.id.ends_with("-week-2026-10-05"));
        assert!(report.matches("2026-10-05"));
        assert!(report.matches(&report.id[..6]));
        assert!(!report.matches("2026-10-12"));
        assert!(!report.matches(""));
    }

    #[test]
    fn test_push_report_keeps_newest() {
        let mut reports = Vec::new();
        for day in 1..=12 {
            let report = WeeklyReport::new(date(2026, 1, day), WeekStats::default(), Utc::now());
            push_report(&mut reports, report, DEFAULT_REPORTS_KEPT);
        }
        assert_eq!(reports.len(), DEFAULT_REPORTS_KEPT);
        assert_eq!(reports[0].week_start, date(2026, 1, 12));
        assert_eq!(reports[9].week_start, date(2026, 1, 3));
    }

    #[test]
    fn test_report_serde_shape() {
        let report = WeeklyReport::new(date(2026, 10, 5), WeekStats::default(), Utc::now());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["weekStart"], "2026-10-05");
        assert_eq!(value["weekEnd"], "2026-10-11");
        assert!(value.get("savedAt").is_some());
    }
}
