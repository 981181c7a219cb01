//! Issue-key extraction from free-form text.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Pattern used when a site does not configure its own.
///
/// A project key, a dash and a number without a leading zero. The trailing
/// group rejects `.digit` so version strings like `ABC-1.2` are skipped.
pub const DEFAULT_ISSUE_PATTERN: &str = r"([a-zA-Z][a-zA-Z0-9_]+-[1-9][0-9]*)([^.]|\.[^0-9]|\.$|$)";

static DEFAULT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_ISSUE_PATTERN).expect("default issue pattern compiles")
});

/// Returns the compiled [`DEFAULT_ISSUE_PATTERN`].
#[must_use]
pub fn default_pattern() -> &'static Regex {
    &DEFAULT_PATTERN
}

/// Finds every distinct issue key in `text`.
///
/// Each non-overlapping match of `pattern` contributes the text of capture
/// group 1. Patterns without a capture group, matches where group 1 did not
/// participate, and empty captures contribute nothing.
#[must_use]
pub fn find_issue_keys(text: &str, pattern: &Regex) -> BTreeSet<String> {
    // captures_len counts the implicit whole-match group
    if pattern.captures_len() < 2 {
        return BTreeSet::new();
    }

    let keys: BTreeSet<String> = pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter(|key| !key.as_str().is_empty())
        .map(|key| key.as_str().to_string())
        .collect();

    tracing::debug!(count = keys.len(), "extracted issue keys");
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple() -> Regex {
        Regex::new(r"([A-Z]+-\d+)").unwrap()
    }

    fn keys(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn repeated_keys_collapse() {
        let found = find_issue_keys("PROJ-1 fixed PROJ-1 and PROJ-2", &simple());
        assert_eq!(found, keys(&["PROJ-1", "PROJ-2"]));
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(find_issue_keys("", &simple()).is_empty());
        assert!(find_issue_keys("", default_pattern()).is_empty());
    }

    #[test]
    fn pattern_without_groups_yields_nothing() {
        let pattern = Regex::new(r"[A-Z]+-\d+").unwrap();
        assert!(find_issue_keys("PROJ-1 PROJ-2", &pattern).is_empty());
    }

    #[test]
    fn non_participating_group_is_skipped() {
        let pattern = Regex::new(r"#(\d+)|todo").unwrap();
        let found = find_issue_keys("todo #12 todo #12 #40", &pattern);
        assert_eq!(found, keys(&["12", "40"]));
    }

    #[test]
    fn empty_captures_are_not_keys() {
        let pattern = Regex::new(r"(x*)").unwrap();
        assert!(find_issue_keys("abc", &pattern).is_empty());

        let pattern = Regex::new(r"([A-Z]*-?\d*)").unwrap();
        assert_eq!(find_issue_keys("see OPS-4 now", &pattern), keys(&["OPS-4"]));
    }

    #[test]
    fn only_first_group_is_read() {
        let pattern = Regex::new(r"([A-Z]+)-(\d+)").unwrap();
        let found = find_issue_keys("ABC-1 DEF-2", &pattern);
        assert_eq!(found, keys(&["ABC", "DEF"]));
    }

    #[test]
    fn every_key_is_a_literal_match_in_text() {
        let text = "[CORE-12] merge; see core-9, WEB-100 and WEB-100.";
        for key in find_issue_keys(text, default_pattern()) {
            assert!(text.contains(&key), "{key} not in text");
        }
    }

    #[test]
    fn default_pattern_finds_adjacent_and_trailing_keys() {
        let found = find_issue_keys("PROJ-1 PROJ-2,OPS-33\nfix for WEB-4", default_pattern());
        assert_eq!(found, keys(&["OPS-33", "PROJ-1", "PROJ-2", "WEB-4"]));
    }

    #[test]
    fn default_pattern_skips_versions_and_leading_zeros() {
        let found =
            find_issue_keys("bump LIB-1.2 and JAVA-0 then close BUG-7.", default_pattern());
        assert_eq!(found, keys(&["BUG-7"]));
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "ZED-3 ALPHA-1 MID-2 ALPHA-1";
        let first = find_issue_keys(text, default_pattern());
        let second = find_issue_keys(text, default_pattern());
        assert_eq!(first, second);
        assert_eq!(first.into_iter().collect::<Vec<_>>(), vec!["ALPHA-1", "MID-2", "ZED-3"]);
    }
}
