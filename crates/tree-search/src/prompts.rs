//! Prompt templates for the relevance oracle
//!
//! PRIVATE MODULE - Not exported from crate

use taxocode_core::PromptStyle;

pub const CLASSIFY_PLAIN: &str = include_str!("../assets/prompts/classify_plain.txt");

pub const CLASSIFY_BULLETED: &str = include_str!("../assets/prompts/classify_bulleted.txt");

pub fn format_prompt(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Render the classification prompt for one round
///
/// Candidates are listed one per line in the order given.
pub fn build_classification_prompt(text: &str, candidates: &[String], style: PromptStyle) -> String {
    let (template, listing) = match style {
        PromptStyle::Plain => (CLASSIFY_PLAIN, candidates.join("\n")),
        PromptStyle::Bulleted => (
            CLASSIFY_BULLETED,
            candidates
                .iter()
                .map(|c| format!("* {c}"))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    };

    // Candidates are substituted first so text containing "{candidates}" is left alone
    let with_candidates = format_prompt(template, &[("candidates", &listing)]);
    format_prompt(&with_candidates, &[("text", text)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_prompt() {
        let template = "Hello {name}, you are {age} years old.";
        let vars = [("name", "Alice"), ("age", "30")];
        let result = format_prompt(template, &vars);
        assert_eq!(result, "Hello Alice, you are 30 years old.");
    }

    #[test]
    #[allow(clippy::len_zero)] // const_is_empty conflicts with len_zero for const strings
    fn test_prompts_load() {
        assert!(CLASSIFY_PLAIN.len() > 0);
        assert!(CLASSIFY_BULLETED.len() > 0);
        assert!(CLASSIFY_PLAIN.contains("{candidates}"));
        assert!(CLASSIFY_BULLETED.contains("{text}"));
    }

    #[test]
    fn test_plain_prompt_lists_candidates_in_order() {
        let candidates = vec!["Cholera".to_string(), "Typhoid fever".to_string()];
        let prompt = build_classification_prompt("Patient has diarrhoea.", &candidates, PromptStyle::Plain);

        assert!(prompt.contains("Patient has diarrhoea."));
        assert!(prompt.ends_with("Cholera\nTyphoid fever\n"));
        assert!(!prompt.contains("{candidates}"));
        assert!(!prompt.contains("{text}"));
    }

    #[test]
    fn test_bulleted_prompt_prefixes_candidates() {
        let candidates = vec!["Cholera".to_string(), "Typhoid fever".to_string()];
        let prompt = build_classification_prompt("note", &candidates, PromptStyle::Bulleted);
        assert!(prompt.ends_with("* Cholera\n* Typhoid fever\n"));
    }

    #[test]
    fn test_placeholder_in_text_is_not_expanded() {
        let candidates = vec!["Cholera".to_string()];
        let prompt = build_classification_prompt("see {candidates}", &candidates, PromptStyle::Plain);
        assert!(prompt.contains("see {candidates}"));
    }
}
