//! Canonical form of taxonomy descriptions
//!
//! The same normalization is used when candidates are listed in the prompt
//! and when the oracle's echoed descriptions are matched back to codes, so
//! every call site goes through [`format_description`].

use regex::Regex;
use std::sync::LazyLock;

/// A parenthesized group without nested parentheses
static PARENTHESIZED_GROUP: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\([^()]*\)").ok());

/// Normalize a raw taxonomy description
///
/// Removes the right-most parenthesized group (e.g. a qualifier such as
/// `(acute)` or a code range such as `(A00-B99)`), then collapses runs of
/// whitespace to single spaces and trims.
///
/// The result is stable under re-formatting whenever the raw description has
/// at most one parenthesized group. With two or more groups each pass strips
/// one more, which is why the parser tries an exact match before reformatting.
pub fn format_description(raw: &str) -> String {
    collapse_whitespace(&remove_last_parenthesized(raw))
}

/// Collapse every run of whitespace to a single space and trim both ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn remove_last_parenthesized(text: &str) -> String {
    let last = PARENTHESIZED_GROUP
        .as_ref()
        .and_then(|pattern| pattern.find_iter(text).last());

    match last {
        Some(group) => format!("{}{}", &text[..group.start()], &text[group.end()..]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_trailing_qualifier() {
        assert_eq!(format_description("Burn (third degree)"), "Burn");
        assert_eq!(format_description("Burn (unspecified)"), "Burn");
    }

    #[test]
    fn test_removes_only_right_most_group() {
        assert_eq!(
            format_description("Sepsis (bacterial) of newborn (P36)"),
            "Sepsis (bacterial) of newborn"
        );
    }

    #[test]
    fn test_group_in_the_middle() {
        assert_eq!(
            format_description("Cholera (classical) due to Vibrio cholerae"),
            "Cholera due to Vibrio cholerae"
        );
    }

    #[test]
    fn test_nested_parentheses_only_inner_group_matches() {
        assert_eq!(format_description("Fever (of (unknown) origin)"), "Fever (of origin)");
    }

    #[test]
    fn test_square_brackets_are_kept() {
        assert_eq!(
            format_description("Acute nasopharyngitis [common cold]"),
            "Acute nasopharyngitis [common cold]"
        );
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            format_description("  Typhoid\tfever \n  (enteric)  "),
            "Typhoid fever"
        );
        assert_eq!(collapse_whitespace(" a   b\n\nc "), "a b c");
    }

    #[test]
    fn test_no_group_is_whitespace_only_change() {
        assert_eq!(format_description("Enteroptosis"), "Enteroptosis");
        assert_eq!(format_description(""), "");
    }

    #[test]
    fn test_unbalanced_parentheses_left_alone() {
        assert_eq!(format_description("Open wound (left"), "Open wound (left");
    }

    #[test]
    fn test_reformatting_is_stable() {
        let samples = [
            "Burn (third degree)",
            "Certain infectious and parasitic diseases (A00-B99)",
            "  Gastro-esophageal   reflux disease ",
            "Acute nasopharyngitis [common cold]",
            "Open wound (left",
            "Cholera",
            "",
            "( )",
        ];
        for raw in samples {
            let once = format_description(raw);
            assert_eq!(format_description(&once), once, "input: {raw:?}");
        }
    }

    #[test]
    fn test_deterministic() {
        let raw = "Sepsis (bacterial) of newborn (P36)";
        assert_eq!(format_description(raw), format_description(raw));
    }
}
