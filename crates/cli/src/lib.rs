//! Library interface for the taxocode CLI
//!
//! Batch classification and the config/taxonomy helpers live here so they can
//! be exercised by integration tests; argument parsing stays in main.rs.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{bail, Context};
use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taxocode_core::{Code, InMemoryTaxonomy, Taxonomy};
use taxocode_tree_search::{Oracle, TreeSearchController, TreeSearchRequest};
use tracing::{debug, error, info};

pub use anyhow::Result;
pub use taxocode_core::Config;

/// Command-line values that take precedence over the loaded configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub budget: Option<usize>,
    pub model: Option<String>,
    pub provider: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(budget) = self.budget {
            config.search.budget = budget;
        }
        if let Some(model) = &self.model {
            config.oracle.model = model.clone();
        }
        if let Some(provider) = &self.provider {
            config.oracle.provider = provider.clone();
        }
    }
}

/// Load layered configuration, apply CLI overrides and validate the result
pub fn load_config(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Config> {
    let mut config = Config::load(config_path).context("Failed to load configuration")?;
    overrides.apply(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

pub fn load_taxonomy(path: &Path) -> Result<Arc<InMemoryTaxonomy>> {
    let taxonomy = InMemoryTaxonomy::from_json_file(path)
        .with_context(|| format!("Failed to load taxonomy from {}", path.display()))?;
    info!(
        "Loaded taxonomy {} ({} nodes)",
        path.display(),
        taxonomy.len()
    );
    Ok(Arc::new(taxonomy))
}

/// Regular files directly inside `dir`, sorted by path
pub fn collect_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Input directory {} does not exist", dir.display());
    }

    let mut documents = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory {}", dir.display()))?
    {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        if path.is_file() {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

/// Classify every document in `input_dir`, keyed by file name
///
/// Up to `max_concurrent` documents are in flight at once, each with its own
/// search state. The first failing document aborts the batch.
pub async fn classify_directory(
    input_dir: &Path,
    taxonomy: Arc<dyn Taxonomy>,
    oracle: Arc<dyn Oracle>,
    budget: usize,
    max_concurrent: usize,
    show_progress: bool,
) -> Result<BTreeMap<String, Vec<Code>>> {
    let documents = collect_documents(input_dir)?;
    info!(
        "Classifying {} documents from {} (budget {budget}, concurrency {max_concurrent})",
        documents.len(),
        input_dir.display()
    );

    let controller = Arc::new(TreeSearchController::new(taxonomy, oracle));
    let pb = if show_progress {
        create_progress_bar(documents.len())
    } else {
        ProgressBar::hidden()
    };

    let results: Vec<(String, Vec<Code>)> = stream::iter(documents)
        .map(|path| {
            let controller = Arc::clone(&controller);
            let pb = pb.clone();
            async move {
                let name = document_name(&path);
                let codes = classify_document(&controller, &path, budget)
                    .await
                    .with_context(|| format!("Failed to classify {name}"))?;
                pb.inc(1);
                pb.set_message(name.clone());
                Ok::<_, anyhow::Error>((name, codes))
            }
        })
        .buffer_unordered(max_concurrent.max(1))
        .try_collect()
        .await
        .inspect_err(|e| {
            error!("Batch classification aborted: {e:#}");
            pb.abandon();
        })?;

    pb.finish_with_message("done");
    Ok(results.into_iter().collect())
}

async fn classify_document(
    controller: &TreeSearchController,
    path: &Path,
    budget: usize,
) -> Result<Vec<Code>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let response = controller
        .search(TreeSearchRequest::new(text).with_budget(budget))
        .await?;

    debug!(
        "{}: {} codes in {} rounds",
        path.display(),
        response.codes.len(),
        response.metadata.rounds_used
    );
    Ok(response.codes)
}

/// Write batch results as pretty-printed JSON
pub fn write_results(path: &Path, results: &BTreeMap<String, Vec<Code>>) -> Result<()> {
    let json = serde_json::to_string_pretty(results).context("Failed to serialize results")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write results to {}", path.display()))?;
    info!("Wrote {} results to {}", results.len(), path.display());
    Ok(())
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .map_err(|e| error!("Failed to set progress bar style: {}", e))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb
}
