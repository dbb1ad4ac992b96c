//! Keyword tables for the prompt parser
//!
//! Each table is an ordered list of `(value, patterns)` pairs. Group order and
//! pattern order are significant: the first group with a match wins.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

use crate::domain::{Category, Day, Period, Priority};

pub(crate) const DAY_KEYWORDS: &[(Day, &[&str])] = &[
    (Day::Monday, &["monday", "mon"]),
    (Day::Tuesday, &["tuesday", "tues", "tue"]),
    (Day::Wednesday, &["wednesday", "wed"]),
    (Day::Thursday, &["thursday", "thurs", "thur", "thu"]),
    (Day::Friday, &["friday", "fri"]),
    (Day::Saturday, &["saturday", "sat"]),
    (Day::Sunday, &["sunday", "sun"]),
];

pub(crate) const PRIORITY_KEYWORDS: &[(Priority, &[&str])] = &[
    (
        Priority::High,
        &["high priority", "urgent", "important", "asap", "critical", "high"],
    ),
    (Priority::Medium, &["medium priority", "medium", "moderate"]),
    (Priority::Low, &["low priority", "low", "someday", "whenever"]),
];

pub(crate) const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Work,
        &[
            "work", "meeting", "office", "project", "client", "email", "report", "presentation", "deadline", "standup",
        ],
    ),
    (
        Category::Personal,
        &[
            "personal", "family", "friend", "friends", "mom", "dad", "birthday", "shopping", "groceries", "clean",
            "laundry", "home", "house",
        ],
    ),
    (
        Category::Health,
        &[
            "health", "gym", "workout", "exercise", "run", "running", "yoga", "doctor", "dentist", "meditate", "walk",
        ],
    ),
    (
        Category::Study,
        &[
            "study", "homework", "exam", "class", "lecture", "course", "read", "reading", "learn", "research",
        ],
    ),
];

pub(crate) const PERIOD_KEYWORDS: &[(Period, &[&str])] = &[
    (Period::EarlyMorning, &["early morning", "dawn", "sunrise"]),
    (Period::Morning, &["morning"]),
    (Period::Afternoon, &["afternoon", "noon"]),
    (Period::Evening, &["evening", "tonight"]),
];

/// Relative day words, resolved against the caller's current day
pub(crate) const RELATIVE_DAY_WORDS: &[&str] = &["today", "tomorrow", "weekend"];

/// Words dropped from titles that carry no meaning on their own
pub(crate) const STOP_WORDS: &[&str] = &["on", "at", "in", "for", "the", "a", "an", "with", "category"];

/// How a keyword is located in text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchMode {
    /// Bounded on both sides so `mon` never matches inside `monastery`
    WholeWord,
    /// Plain case-insensitive containment
    Substring,
}

/// One value and the compiled patterns that select it
#[derive(Debug)]
pub(crate) struct KeywordGroup<T> {
    pub value: T,
    patterns: Vec<Regex>,
}

impl<T: Copy> KeywordGroup<T> {
    fn compile(value: T, keywords: &[&str], mode: MatchMode) -> Self {
        Self {
            value,
            patterns: keywords.iter().map(|k| keyword_regex(k, mode)).collect(),
        }
    }

    /// Whether any of the group's patterns occurs in `text`
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}

/// Value of the first group (in table order) matching `text`
pub(crate) fn first_match<T: Copy>(groups: &[KeywordGroup<T>], text: &str) -> Option<T> {
    groups.iter().find(|g| g.matches(text)).map(|g| g.value)
}

fn compile_table<T: Copy>(table: &[(T, &[&str])], mode: impl Fn(T) -> MatchMode) -> Vec<KeywordGroup<T>> {
    table
        .iter()
        .map(|(value, keywords)| KeywordGroup::compile(*value, keywords, mode(*value)))
        .collect()
}

pub(crate) static DAY_GROUPS: LazyLock<Vec<KeywordGroup<Day>>> =
    LazyLock::new(|| compile_table(DAY_KEYWORDS, |_| MatchMode::WholeWord));

pub(crate) static PRIORITY_GROUPS: LazyLock<Vec<KeywordGroup<Priority>>> =
    LazyLock::new(|| compile_table(PRIORITY_KEYWORDS, |_| MatchMode::WholeWord));

pub(crate) static CATEGORY_GROUPS: LazyLock<Vec<KeywordGroup<Category>>> =
    LazyLock::new(|| compile_table(CATEGORY_KEYWORDS, |_| MatchMode::WholeWord));

// Early-morning phrases are matched as substrings, the other periods as whole words
pub(crate) static PERIOD_GROUPS: LazyLock<Vec<KeywordGroup<Period>>> = LazyLock::new(|| {
    compile_table(PERIOD_KEYWORDS, |period| match period {
        Period::EarlyMorning => MatchMode::Substring,
        _ => MatchMode::WholeWord,
    })
});

/// Day names, abbreviations and relative words, with an optional `this`/`next` qualifier
pub(crate) static DAY_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    let words = DAY_KEYWORDS
        .iter()
        .flat_map(|(_, keywords)| keywords.iter().copied())
        .chain(RELATIVE_DAY_WORDS.iter().copied());
    build_regex(&format!(r"\b(?:(?:this|next)\s+)?(?:{})\b", alternation(words)))
});

/// Priority and period keywords plus stop words, all removed from titles
///
/// A hyphen touching the word is part of the match so callers can leave
/// compounds like `check-in` alone.
pub(crate) static TITLE_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    let words = PRIORITY_KEYWORDS
        .iter()
        .flat_map(|(_, keywords)| keywords.iter().copied())
        .chain(std::iter::once("priority"))
        .chain(PERIOD_KEYWORDS.iter().flat_map(|(_, keywords)| keywords.iter().copied()))
        .chain(STOP_WORDS.iter().copied());
    build_regex(&format!(r"-?\b(?:{})\b-?", alternation(words)))
});

pub(crate) static WEEKEND: LazyLock<Regex> = LazyLock::new(|| build_regex(r"\b(?:(?:this|next)\s+)?weekends?\b"));

pub(crate) static TODAY: LazyLock<Regex> = LazyLock::new(|| build_regex(r"\btoday\b"));

pub(crate) static TOMORROW: LazyLock<Regex> = LazyLock::new(|| build_regex(r"\btomorrow\b"));

/// Clause separators: space-delimited `and`, `also`, `then` and commas
pub(crate) static SEGMENT_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| build_regex(r"\s+(?:and|also|then)\s+|\s*,\s*"));

/// Escape a keyword; internal spaces match any run of whitespace
fn keyword_source(keyword: &str) -> String {
    regex::escape(keyword).replace(' ', r"\s+")
}

fn keyword_regex(keyword: &str, mode: MatchMode) -> Regex {
    let source = keyword_source(keyword);
    match mode {
        MatchMode::WholeWord => build_regex(&format!(r"\b{}\b", source)),
        MatchMode::Substring => build_regex(&source),
    }
}

/// Longest keywords first so phrases win over their leading word
fn alternation<'a>(words: impl Iterator<Item = &'a str>) -> String {
    let mut words: Vec<&str> = words.collect();
    words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    words.dedup();
    words.into_iter().map(keyword_source).collect::<Vec<_>>().join("|")
}

fn build_regex(source: &str) -> Regex {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .expect("keyword patterns are escaped and always compile")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_keywords_whole_word() {
        assert_eq!(first_match(&DAY_GROUPS, "visit the monastery"), None);
        assert_eq!(first_match(&DAY_GROUPS, "visit mon"), Some(Day::Monday));
        assert_eq!(first_match(&DAY_GROUPS, "FRIDAY drinks"), Some(Day::Friday));
        assert_eq!(first_match(&DAY_GROUPS, "thurs"), Some(Day::Thursday));
    }

    #[test]
    fn test_first_group_in_table_order_wins() {
        // Friday appears first in the text, Monday first in the table
        assert_eq!(first_match(&DAY_GROUPS, "friday or monday"), Some(Day::Monday));
        assert_eq!(
            first_match(&PRIORITY_GROUPS, "low effort but urgent"),
            Some(Priority::High)
        );
        assert_eq!(
            first_match(&CATEGORY_GROUPS, "gym then work"),
            Some(Category::Work)
        );
    }

    #[test]
    fn test_early_morning_is_substring() {
        assert_eq!(first_match(&PERIOD_GROUPS, "run at sunrise"), Some(Period::EarlyMorning));
        assert_eq!(first_match(&PERIOD_GROUPS, "the early   morning jog"), Some(Period::EarlyMorning));
        assert_eq!(first_match(&PERIOD_GROUPS, "predawn swim"), Some(Period::EarlyMorning));
        assert_eq!(first_match(&PERIOD_GROUPS, "morning swim"), Some(Period::Morning));
        assert_eq!(first_match(&PERIOD_GROUPS, "mornings are hard"), None);
    }

    #[test]
    fn test_alternation_prefers_phrases() {
        let pattern = alternation(["high", "high priority", "a"].into_iter());
        assert!(pattern.starts_with(r"high\s+priority|"));
        assert!(pattern.ends_with("|a"));
    }

    #[test]
    fn test_segment_separator() {
        let parts: Vec<&str> = SEGMENT_SEPARATOR
            .split("gym monday, read tuesday and call mom wed then sleep")
            .collect();
        assert_eq!(parts, vec!["gym monday", "read tuesday", "call mom wed", "sleep"]);

        // Separators only split on whole words
        let parts: Vec<&str> = SEGMENT_SEPARATOR.split("sand castle saturday").collect();
        assert_eq!(parts, vec!["sand castle saturday"]);
        let parts: Vec<&str> = SEGMENT_SEPARATOR.split("rock-and-roll monday").collect();
        assert_eq!(parts, vec!["rock-and-roll monday"]);
    }

    #[test]
    fn test_title_noise_includes_touching_hyphen() {
        let found: Vec<&str> = TITLE_NOISE.find_iter("check-in at noon").map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["-in", "at", "noon"]);
        assert!(WEEKEND.is_match("every weekends"));
        assert!(!WEEKEND.is_match("weekendtrip"));
    }

    #[test]
    fn test_day_reference_strips_qualifier() {
        let stripped = DAY_REFERENCE.replace_all("dinner next friday", " ");
        assert_eq!(stripped.trim(), "dinner");
        let stripped = DAY_REFERENCE.replace_all("Today and TOMORROW", " ");
        assert_eq!(stripped.split_whitespace().collect::<Vec<_>>(), vec!["and"]);
    }
}
