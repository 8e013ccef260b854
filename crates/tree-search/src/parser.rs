//! Interpretation of the oracle's free-text reply
//!
//! The reply is expected to hold one `<description>: <judgement>` line per
//! candidate. Parsing is total: anything that does not fit is dropped.

use crate::candidates::CandidateMap;
use crate::formatter::{collapse_whitespace, format_description};
use regex::Regex;
use std::sync::LazyLock;
use taxocode_core::Code;
use tracing::debug;

/// Leading enumeration such as `1.`, `12)` or `a.` followed by whitespace
static ENUMERATION_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?:\d+|[A-Za-z])[.)]\s+").ok());

/// A candidate the oracle judged relevant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub code: Code,
    pub description: String,
}

/// Extract confirmed candidates from a raw oracle reply, in reply order
///
/// Each non-empty line is split on its first colon. The description part is
/// stripped of bullets and looked up in `candidates`, first as-is and then
/// after [`format_description`]; a leading enumeration is removed only when
/// neither lookup matches. A line confirms its
/// candidate iff the judgement part, trimmed and lower-cased, starts with
/// `yes`. Lines without a colon or with an unknown description are dropped.
pub fn parse_confirmations(reply: &str, candidates: &CandidateMap) -> Vec<Confirmation> {
    let mut confirmed = Vec::new();

    for line in reply.lines().filter(|line| !line.trim().is_empty()) {
        let Some((description_part, judgement_part)) = line.split_once(':') else {
            debug!("Dropping oracle line without judgement: {line}");
            continue;
        };

        if !judgement_part.trim().to_lowercase().starts_with("yes") {
            continue;
        }

        let description = collapse_whitespace(strip_bullets(description_part));
        let matched = lookup(&description, candidates)
            .map(|code| (code, description.clone()))
            .or_else(|| {
                // "E. coli infection" must not lose its initial
                let unnumbered = strip_enumeration(&description).to_string();
                lookup(&unnumbered, candidates).map(|code| (code, unnumbered))
            });

        match matched {
            Some((code, description)) => confirmed.push(Confirmation {
                code: code.clone(),
                description,
            }),
            None => debug!("Oracle confirmed unknown description '{description}', dropping"),
        }
    }

    confirmed
}

fn lookup<'a>(description: &str, candidates: &'a CandidateMap) -> Option<&'a Code> {
    candidates
        .code_for(description)
        .or_else(|| candidates.code_for(&format_description(description)))
}

/// Remove bullets and markdown emphasis
fn strip_bullets(text: &str) -> &str {
    text.trim()
        .trim_start_matches(['*', '-', '•'])
        .trim_end_matches('*')
        .trim()
}

/// Remove a leading enumeration such as `2.` or `b)`
fn strip_enumeration(text: &str) -> &str {
    match ENUMERATION_PREFIX.as_ref().and_then(|p| p.find(text)) {
        Some(prefix) => text[prefix.end()..].trim(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn candidates(entries: &[(&str, &str)]) -> CandidateMap {
        let mut map = CandidateMap::new();
        for (description, code) in entries {
            map.insert(description.to_string(), code.to_string());
        }
        map
    }

    fn codes(confirmed: &[Confirmation]) -> Vec<&str> {
        confirmed.iter().map(|c| c.code.as_str()).collect()
    }

    #[test]
    fn test_parses_yes_and_no() {
        let map = candidates(&[
            ("Gastro-esophageal reflux disease", "K21"),
            ("Enteroptosis", "K63.4"),
        ]);
        let reply = "Gastro-esophageal reflux disease: Yes, Patient was prescribed omeprazole.\n\
                     Enteroptosis: No.";

        let confirmed = parse_confirmations(reply, &map);
        assert_eq!(
            confirmed,
            vec![Confirmation {
                code: "K21".to_string(),
                description: "Gastro-esophageal reflux disease".to_string(),
            }]
        );
    }

    #[test]
    fn test_preserves_reply_order() {
        let map = candidates(&[("Alpha", "A"), ("Beta", "B"), ("Gamma", "C")]);
        let reply = "Gamma: yes\nAlpha: YES\nBeta: yes.";
        assert_eq!(codes(&parse_confirmations(reply, &map)), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_strips_bullets_and_numbering() {
        let map = candidates(&[("Enteroptosis", "K63.4"), ("Cholera", "A00"), ("Typhoid", "A01")]);
        let reply = "* Enteroptosis: Yes\n2. Cholera: yes\n**Typhoid**: Yes";
        assert_eq!(
            codes(&parse_confirmations(reply, &map)),
            vec!["K63.4", "A00", "A01"]
        );
    }

    #[test]
    fn test_splits_on_first_colon_only() {
        let map = candidates(&[("Cholera", "A00")]);
        let reply = "Cholera: Yes: noted in history: severe";
        assert_eq!(codes(&parse_confirmations(reply, &map)), vec!["A00"]);
    }

    #[test]
    fn test_description_containing_colon_does_not_match() {
        let map = candidates(&[("Type 2: diabetes", "E11")]);
        assert!(parse_confirmations("Type 2: diabetes: Yes", &map).is_empty());
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let map = candidates(&[("Cholera", "A00")]);
        assert!(parse_confirmations("cholera: Yes", &map).is_empty());
    }

    #[test]
    fn test_judgement_must_start_with_yes() {
        let map = candidates(&[("Cholera", "A00")]);
        assert!(parse_confirmations("Cholera: No, not yes", &map).is_empty());
        assert!(parse_confirmations("Cholera: Possibly yes", &map).is_empty());
        assert_eq!(codes(&parse_confirmations("Cholera:   yes", &map)), vec!["A00"]);
    }

    #[test]
    fn test_reformats_unformatted_echo() {
        let map = candidates(&[("Burn", "T30.0")]);
        let reply = "Burn (third degree): Yes";
        assert_eq!(codes(&parse_confirmations(reply, &map)), vec!["T30.0"]);
    }

    #[test]
    fn test_exact_match_preferred_over_reformatting() {
        let map = candidates(&[("Sepsis (bacterial) of newborn", "P36")]);
        let reply = "Sepsis (bacterial) of newborn: Yes";
        assert_eq!(codes(&parse_confirmations(reply, &map)), vec!["P36"]);
    }

    #[test]
    fn test_collision_resolves_to_surviving_code() {
        let mut map = CandidateMap::new();
        map.insert("Burn".to_string(), "T30.3".to_string());
        map.insert("Burn".to_string(), "T30.0".to_string());
        assert_eq!(codes(&parse_confirmations("Burn: Yes", &map)), vec!["T30.0"]);
    }

    #[test]
    fn test_malformed_reply_yields_nothing() {
        let map = candidates(&[("Cholera", "A00")]);
        assert!(parse_confirmations("", &map).is_empty());
        assert!(parse_confirmations("I cannot help with that.", &map).is_empty());
        assert!(parse_confirmations("\n\n   \n", &map).is_empty());
        assert!(parse_confirmations("Unknown disease: Yes", &map).is_empty());
        assert!(parse_confirmations(":::", &map).is_empty());
    }

    #[test]
    fn test_handles_crlf_line_endings() {
        let map = candidates(&[("Alpha", "A"), ("Beta", "B")]);
        let reply = "Alpha: Yes\r\nBeta: Yes\r\n";
        assert_eq!(codes(&parse_confirmations(reply, &map)), vec!["A", "B"]);
    }

    #[test]
    fn test_initials_are_not_mistaken_for_numbering() {
        let map = candidates(&[
            ("E. coli infection", "B96.2"),
            ("B. fragilis infection", "B96.6"),
        ]);
        let reply = "E. coli infection: Yes\nB. fragilis infection: Yes";
        assert_eq!(
            codes(&parse_confirmations(reply, &map)),
            vec!["B96.2", "B96.6"]
        );

        let numbered = "1. E. coli infection: Yes\n* b) B. fragilis infection: Yes";
        assert_eq!(
            codes(&parse_confirmations(numbered, &map)),
            vec!["B96.2", "B96.6"]
        );
    }

    #[test]
    fn test_strip_bullets() {
        assert_eq!(strip_bullets("  * Cholera "), "Cholera");
        assert_eq!(strip_bullets("- Cholera"), "Cholera");
        assert_eq!(strip_bullets("**Cholera**"), "Cholera");
        assert_eq!(strip_bullets("2. Cholera"), "2. Cholera");
    }

    #[test]
    fn test_strip_enumeration() {
        assert_eq!(strip_enumeration("10) Cholera"), "Cholera");
        assert_eq!(strip_enumeration("b. Cholera"), "Cholera");
        assert_eq!(strip_enumeration("Vitamin D deficiency"), "Vitamin D deficiency");
        assert_eq!(strip_enumeration("A00.1 Cholera"), "A00.1 Cholera");
    }
}
