//! Task ID generation and resolution
//!
//! All IDs use the format: `{6-char-hex}-{slug}`
//! Example: `8f3a2c-team-meeting`

use std::collections::HashMap;

/// Longest slug kept in an ID
const MAX_SLUG_LEN: usize = 40;

/// Generate a task ID from its title
pub fn generate_id(title: &str) -> String {
    let uuid = uuid::Uuid::now_v7().simple().to_string();
    // v7 leads with the timestamp; the tail is random
    let hex_suffix = &uuid[uuid.len() - 6..];
    let slug = slugify(title);
    if slug.is_empty() {
        hex_suffix.to_string()
    } else {
        format!("{}-{}", hex_suffix, slug)
    }
}

/// Slugify a title for use in IDs
fn slugify(title: &str) -> String {
    let slug = title
        .to_lowercase()
        .chars()
        // Strip apostrophes entirely, replace other non-alphanumeric with hyphens
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    slug.chars()
        .take(MAX_SLUG_LEN)
        .collect::<String>()
        .trim_end_matches('-')
        .to_string()
}

/// ID resolution for partial matches
pub struct IdResolver<'a> {
    ids: &'a HashMap<String, String>, // id -> title
}

impl<'a> IdResolver<'a> {
    pub fn new(ids: &'a HashMap<String, String>) -> Self {
        Self { ids }
    }

    /// Resolve a partial reference to a full ID
    ///
    /// Returns:
    /// - Ok(Some(id)) if exactly one match (an exact match always wins)
    /// - Ok(None) if no matches
    /// - Err with candidates if ambiguous
    pub fn resolve(&self, reference: &str) -> Result<Option<String>, Vec<String>> {
        if self.ids.contains_key(reference) {
            return Ok(Some(reference.to_string()));
        }

        let mut matches: Vec<String> = self
            .ids
            .keys()
            .filter(|id| Self::matches(id, reference))
            .cloned()
            .collect();
        matches.sort();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(matches),
        }
    }

    /// Check if an ID matches a reference
    fn matches(id: &str, reference: &str) -> bool {
        if reference.is_empty() {
            return false;
        }

        // Hex prefix match
        if id.starts_with(reference) {
            return true;
        }

        // Slug contains match
        if let Some(slug_start) = id.find('-') {
            let slug_part = &id[slug_start + 1..];
            if slug_part.contains(reference) {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id() {
        let id = generate_id("Team Meeting");
        assert!(id.len() > 7);
        assert!(id.ends_with("-team-meeting"));
        assert!(id[..6].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_id_unique_for_same_title() {
        let a = generate_id("Clean house");
        let b = generate_id("Clean house");
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_id_without_slug() {
        let id = generate_id("!!!");
        assert_eq!(id.len(), 6);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Call mom!"), "call-mom");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("don't stop"), "dont-stop");
        let long = slugify("a very long task title that keeps going well past the limit");
        assert!(long.len() <= MAX_SLUG_LEN);
        assert!(!long.ends_with('-'));
    }

    fn sample_ids() -> HashMap<String, String> {
        let mut ids = HashMap::new();
        ids.insert("8f3a2c-team-meeting".to_string(), "Team meeting".to_string());
        ids.insert("01b77e-gym".to_string(), "Gym".to_string());
        ids.insert("01b77f-gym-with-sam".to_string(), "Gym with sam".to_string());
        ids
    }

    #[test]
    fn test_id_resolver_exact() {
        let ids = sample_ids();
        let resolver = IdResolver::new(&ids);
        assert_eq!(resolver.resolve("01b77e-gym").unwrap(), Some("01b77e-gym".to_string()));
    }

    #[test]
    fn test_id_resolver_hex_prefix() {
        let ids = sample_ids();
        let resolver = IdResolver::new(&ids);
        assert_eq!(
            resolver.resolve("8f3a").unwrap(),
            Some("8f3a2c-team-meeting".to_string())
        );
    }

    #[test]
    fn test_id_resolver_slug_match() {
        let ids = sample_ids();
        let resolver = IdResolver::new(&ids);
        assert_eq!(resolver.resolve("meeting").unwrap(), Some("8f3a2c-team-meeting".to_string()));
    }

    #[test]
    fn test_id_resolver_ambiguous() {
        let ids = sample_ids();
        let resolver = IdResolver::new(&ids);
        let candidates = resolver.resolve("gym").unwrap_err();
        assert_eq!(candidates, vec!["01b77e-gym".to_string(), "01b77f-gym-with-sam".to_string()]);
    }

    #[test]
    fn test_id_resolver_no_match() {
        let ids = sample_ids();
        let resolver = IdResolver::new(&ids);
        assert_eq!(resolver.resolve("dentist").unwrap(), None);
        assert_eq!(resolver.resolve("").unwrap(), None);
    }
}
