//! Natural-language prompt parsing
//!
//! Turns a sentence like "gym tomorrow evening high priority" into task
//! drafts. Parsing is rule based: relative days are resolved first, the text
//! is split into clauses, and each clause is scanned against the keyword
//! tables for a day, priority, category and period. Whatever is left after
//! removing keywords and stop words becomes the title.

use regex::Captures;
use tracing::debug;

use super::keywords::{
    CATEGORY_GROUPS, DAY_GROUPS, DAY_REFERENCE, PERIOD_GROUPS, PRIORITY_GROUPS, SEGMENT_SEPARATOR, TITLE_NOISE, TODAY,
    TOMORROW, WEEKEND, first_match,
};
use crate::domain::{Day, TaskDraft};

/// Parse free text into zero or more drafts
///
/// `today` anchors `today`, `tomorrow` and `weekend`. Text without any day
/// reference yields no drafts; this never fails.
pub fn parse_prompt(text: &str, today: Day) -> Vec<TaskDraft> {
    debug!(%text, %today, "parse_prompt: called");

    let resolved = resolve_relative_days(text, today);

    if WEEKEND.is_match(&resolved) {
        let remainder = WEEKEND.replace_all(&resolved, " ");
        let drafts: Vec<TaskDraft> = Day::ALL
            .into_iter()
            .filter(Day::is_weekend)
            .filter_map(|day| build_draft(&remainder, day))
            .collect();
        debug!(count = drafts.len(), "parse_prompt: weekend drafts");
        return drafts;
    }

    let segments = split_segments(&resolved);
    debug!(?segments, "parse_prompt: segments");

    if let [segment] = segments.as_slice() {
        let days = detect_days(segment);
        if days.len() >= 2 {
            debug!(?days, "parse_prompt: one clause naming several days");
            return days.into_iter().filter_map(|day| build_draft(segment, day)).collect();
        }
    }

    let drafts: Vec<TaskDraft> = segments
        .iter()
        .filter_map(|segment| {
            let Some(day) = first_match(&DAY_GROUPS, segment) else {
                debug!(%segment, "parse_prompt: no day, discarding clause");
                return None;
            };
            build_draft(segment, day)
        })
        .collect();

    debug!(count = drafts.len(), "parse_prompt: returning drafts");
    drafts
}

/// Every distinct day named in `text`, in day-table order
pub fn detect_days(text: &str) -> Vec<Day> {
    DAY_GROUPS.iter().filter(|g| g.matches(text)).map(|g| g.value).collect()
}

/// Replace `today` and `tomorrow` with canonical day names
fn resolve_relative_days(text: &str, today: Day) -> String {
    let text = TODAY.replace_all(text, today.as_str());
    TOMORROW.replace_all(&text, today.next().as_str()).into_owned()
}

/// Split on clause separators, dropping empty clauses
fn split_segments(text: &str) -> Vec<String> {
    SEGMENT_SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the draft for one clause filed under `day`; `None` when no title remains
fn build_draft(segment: &str, day: Day) -> Option<TaskDraft> {
    let title = clean_title(segment)?;
    let draft = TaskDraft::new(title, day)
        .with_priority(first_match(&PRIORITY_GROUPS, segment).unwrap_or_default())
        .with_category(first_match(&CATEGORY_GROUPS, segment).unwrap_or_default())
        .with_period(first_match(&PERIOD_GROUPS, segment).unwrap_or_default());
    debug!(?draft, "build_draft: built");
    Some(draft)
}

/// Strip day references, priority and period keywords and stop words
fn clean_title(segment: &str) -> Option<String> {
    let without_days = DAY_REFERENCE.replace_all(segment, " ");
    let without_noise = TITLE_NOISE.replace_all(&without_days, |caps: &Captures| {
        let matched = &caps[0];
        if matched.starts_with('-') || matched.ends_with('-') {
            matched.to_string()
        } else {
            " ".to_string()
        }
    });
    let collapsed = without_noise.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_matches(|c: char| c.is_whitespace() || matches!(c, '.' | '!' | '?' | ':' | ';' | '-'));

    if trimmed.is_empty() {
        return None;
    }
    Some(capitalize_first(trimmed))
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Period, Priority};

    #[test]
    fn test_tomorrow_evening_high_priority() {
        let drafts = parse_prompt("gym tomorrow evening high priority", Day::Wednesday);
        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.day, Day::Thursday);
        assert_eq!(draft.priority, Priority::High);
        assert_eq!(draft.period, Period::Evening);
        assert_eq!(draft.category, Category::Health);
        assert_eq!(draft.title, "Gym");
    }

    #[test]
    fn test_two_clauses_two_days() {
        let drafts = parse_prompt("team meeting monday and gym tuesday evening", Day::Sunday);
        assert_eq!(
            drafts,
            vec![
                TaskDraft::new("Team meeting", Day::Monday).with_category(Category::Work),
                TaskDraft::new("Gym", Day::Tuesday)
                    .with_category(Category::Health)
                    .with_period(Period::Evening),
            ]
        );
    }

    #[test]
    fn test_weekend_yields_saturday_and_sunday() {
        let drafts = parse_prompt("clean house this weekend", Day::Monday);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].day, Day::Saturday);
        assert_eq!(drafts[1].day, Day::Sunday);
        assert_eq!(drafts[0].title, "Clean house");
        assert_eq!(drafts[1].title, "Clean house");
    }

    #[test]
    fn test_weekend_short_circuits_splitting() {
        let drafts = parse_prompt("laundry and groceries weekend", Day::Monday);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title, "Laundry and groceries");
    }

    #[test]
    fn test_no_day_means_no_drafts() {
        assert!(parse_prompt("buy milk", Day::Monday).is_empty());
        assert!(parse_prompt("", Day::Monday).is_empty());
        assert!(parse_prompt("visit the monastery", Day::Monday).is_empty());
    }

    #[test]
    fn test_clause_without_day_is_dropped() {
        let drafts = parse_prompt("buy milk, dentist friday", Day::Monday);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "Dentist");
        assert_eq!(drafts[0].day, Day::Friday);
        assert_eq!(drafts[0].category, Category::Health);
    }

    #[test]
    fn test_only_keywords_gives_no_title() {
        assert!(parse_prompt("monday morning", Day::Monday).is_empty());
        assert!(parse_prompt("tomorrow at the high priority", Day::Monday).is_empty());
    }

    #[test]
    fn test_single_clause_multiple_days_shares_attributes() {
        let drafts = parse_prompt("yoga mon wed fri early morning", Day::Sunday);
        let days: Vec<Day> = drafts.iter().map(|d| d.day).collect();
        assert_eq!(days, vec![Day::Monday, Day::Wednesday, Day::Friday]);
        for draft in &drafts {
            assert_eq!(draft.title, "Yoga");
            assert_eq!(draft.category, Category::Health);
            assert_eq!(draft.period, Period::EarlyMorning);
        }
    }

    #[test]
    fn test_today_wraps_from_sunday() {
        let drafts = parse_prompt("Read chapter tomorrow", Day::Sunday);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].day, Day::Monday);
        assert_eq!(drafts[0].category, Category::Study);

        let drafts = parse_prompt("Read chapter today", Day::Sunday);
        assert_eq!(drafts[0].day, Day::Sunday);
    }

    #[test]
    fn test_title_keeps_original_case() {
        let drafts = parse_prompt("call John on Friday afternoon", Day::Monday);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "Call John");
        assert_eq!(drafts[0].period, Period::Afternoon);
    }

    #[test]
    fn test_stop_words_and_priority_stripped() {
        let drafts = parse_prompt("finish the report for client urgent thursday", Day::Monday);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "Finish report client");
        assert_eq!(drafts[0].priority, Priority::High);
        assert_eq!(drafts[0].category, Category::Work);
    }

    #[test]
    fn test_medium_priority() {
        let drafts = parse_prompt("email landlord tue medium priority", Day::Monday);
        assert_eq!(drafts[0].priority, Priority::Medium);
        assert_eq!(drafts[0].title, "Email landlord");
    }

    #[test]
    fn test_hyphenated_words_survive() {
        let drafts = parse_prompt("rock-and-roll class monday", Day::Sunday);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "Rock-and-roll class");

        let drafts = parse_prompt("hotel check-in at the lobby friday", Day::Sunday);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "Hotel check-in lobby");
    }

    #[test]
    fn test_weekends_plural() {
        let drafts = parse_prompt("clean house weekends", Day::Monday);
        let days: Vec<Day> = drafts.iter().map(|d| d.day).collect();
        assert_eq!(days, vec![Day::Saturday, Day::Sunday]);
        assert_eq!(drafts[0].title, "Clean house");
    }

    #[test]
    fn test_detect_days() {
        assert_eq!(detect_days("sun and mon"), vec![Day::Monday, Day::Sunday]);
        assert!(detect_days("nothing here").is_empty());
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("gym"), "Gym");
        assert_eq!(capitalize_first("élan"), "Élan");
        assert_eq!(capitalize_first(""), "");
    }
}
