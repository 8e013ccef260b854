//! Integration tests for directory batch classification

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use taxocode::{classify_directory, collect_documents, load_config, write_results, ConfigOverrides};
use taxocode_core::{InMemoryTaxonomy, TaxonomyNode};
use taxocode_tree_search::{Oracle, TreeSearchError};
use tempfile::TempDir;

/// Confirms every candidate whose description appears in the text
#[derive(Default)]
struct KeywordOracle {
    calls: AtomicUsize,
}

#[async_trait]
impl Oracle for KeywordOracle {
    async fn classify(
        &self,
        text: &str,
        candidates: &[String],
    ) -> taxocode_tree_search::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.contains("FAIL") {
            return Err(TreeSearchError::Oracle("upstream error".to_string()));
        }
        let text = text.to_lowercase();
        Ok(candidates
            .iter()
            .map(|c| {
                let verdict = if text.contains(&c.to_lowercase()) {
                    "Yes"
                } else {
                    "No"
                };
                format!("{c}: {verdict}")
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

fn taxonomy() -> Arc<InMemoryTaxonomy> {
    Arc::new(
        InMemoryTaxonomy::from_nodes(vec![
            TaxonomyNode::new("A", "Infection (A00-B99)").with_children(["A00", "A01"]),
            TaxonomyNode::new("C", "Neoplasm (C00-D49)").with_children(["C34"]),
            TaxonomyNode::new("A00", "Cholera"),
            TaxonomyNode::new("A01", "Typhoid"),
            TaxonomyNode::new("C34", "Lung neoplasm"),
        ])
        .unwrap(),
    )
}

fn write_documents(docs: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, text) in docs {
        std::fs::write(dir.path().join(name), text).unwrap();
    }
    dir
}

#[tokio::test]
async fn test_classifies_each_document() {
    let dir = write_documents(&[
        ("case_1.txt", "Infection consistent with cholera."),
        ("case_2.txt", "Neoplasm: lung neoplasm confirmed."),
        ("case_3.txt", "Routine visit, nothing of note."),
    ]);
    let oracle = Arc::new(KeywordOracle::default());

    let results = classify_directory(dir.path(), taxonomy(), oracle.clone(), 10, 2, false)
        .await
        .unwrap();

    let expected: BTreeMap<String, Vec<String>> = [
        ("case_1.txt", vec!["A00"]),
        ("case_2.txt", vec!["C34"]),
        ("case_3.txt", vec![]),
    ]
    .into_iter()
    .map(|(name, codes)| {
        (
            name.to_string(),
            codes.into_iter().map(String::from).collect(),
        )
    })
    .collect();
    assert_eq!(results, expected);
    // Two rounds for the two matching documents, one for the other
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_budget_applies_per_document() {
    let dir = write_documents(&[
        ("a.txt", "Infection with cholera."),
        ("b.txt", "Infection with typhoid."),
    ]);
    let oracle = Arc::new(KeywordOracle::default());

    let results = classify_directory(dir.path(), taxonomy(), oracle.clone(), 1, 4, false)
        .await
        .unwrap();

    assert!(results.values().all(|codes| codes.is_empty()));
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failure_names_document() {
    let dir = write_documents(&[("good.txt", "Cholera"), ("bad.txt", "FAIL")]);

    let err = classify_directory(
        dir.path(),
        taxonomy(),
        Arc::new(KeywordOracle::default()),
        10,
        1,
        false,
    )
    .await
    .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("bad.txt"), "{message}");
    assert!(message.contains("upstream error"), "{message}");
}

#[tokio::test]
async fn test_missing_input_dir_is_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let err = classify_directory(
        &missing,
        taxonomy(),
        Arc::new(KeywordOracle::default()),
        10,
        1,
        false,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_collect_documents_skips_subdirectories() {
    let dir = write_documents(&[("b.txt", "x"), ("a.txt", "y")]);
    std::fs::create_dir(dir.path().join("nested")).unwrap();

    let documents = collect_documents(dir.path()).unwrap();
    let names: Vec<_> = documents
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
}

#[test]
fn test_write_results_pretty_json() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("results.json");
    let mut results = BTreeMap::new();
    results.insert("case_1.txt".to_string(), vec!["A00".to_string()]);

    write_results(&output, &results).unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    let parsed: BTreeMap<String, Vec<String>> = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed, results);
    assert!(content.contains('\n'));
}

#[test]
fn test_load_config_applies_overrides_and_validates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[search]\nbudget = 12\n").unwrap();

    let config = load_config(Some(&path), &ConfigOverrides::default()).unwrap();
    assert_eq!(config.search.budget, 12);

    let overrides = ConfigOverrides {
        budget: Some(3),
        ..Default::default()
    };
    let config = load_config(Some(&path), &overrides).unwrap();
    assert_eq!(config.search.budget, 3);

    let bad = ConfigOverrides {
        provider: Some("mystery".to_string()),
        ..Default::default()
    };
    assert!(load_config(Some(&path), &bad).is_err());
}
