//! Taxocode CLI - budgeted hierarchical code assignment
//!
//! This binary provides the command-line interface for taxocode.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use taxocode::{
    classify_directory, load_config, load_taxonomy, write_results, ConfigOverrides,
};
use taxocode_core::Taxonomy;
use taxocode_tree_search::{create_oracle, TreeSearchController, TreeSearchRequest};
use tracing::info;

#[derive(Parser)]
#[command(name = "taxocode")]
#[command(about = "Assign taxonomy codes to free text with a budgeted LLM tree search")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by the commands that call the oracle
#[derive(clap::Args)]
struct SearchArgs {
    /// Taxonomy JSON file
    #[arg(long, value_name = "FILE")]
    taxonomy: PathBuf,

    /// Maximum oracle rounds per document
    #[arg(long)]
    budget: Option<usize>,

    /// Model name passed to the oracle
    #[arg(long)]
    model: Option<String>,

    /// Oracle provider (openai or anthropic)
    #[arg(long)]
    provider: Option<String>,
}

impl SearchArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            budget: self.budget,
            model: self.model.clone(),
            provider: self.provider.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every document in a directory
    Classify {
        #[command(flatten)]
        search: SearchArgs,

        /// Directory of UTF-8 text documents
        #[arg(long, value_name = "DIR")]
        input_dir: PathBuf,

        /// Where to write the JSON results
        #[arg(long, value_name = "FILE")]
        output_file: PathBuf,
    },
    /// Classify a single document and print its codes
    Code {
        #[command(flatten)]
        search: SearchArgs,

        /// Document to classify
        document: PathBuf,
    },
    /// Validate a taxonomy file and print its shape
    Inspect {
        /// Taxonomy JSON file
        #[arg(long, value_name = "FILE")]
        taxonomy: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    match cli.command {
        Some(Commands::Classify {
            search,
            input_dir,
            output_file,
        }) => classify(cli.config.as_deref(), &search, &input_dir, &output_file).await,
        Some(Commands::Code { search, document }) => {
            code(cli.config.as_deref(), &search, &document, cli.verbose).await
        }
        Some(Commands::Inspect { taxonomy }) => inspect(&taxonomy),
        None => {
            println!("Run 'taxocode classify --help' to get started, or --help for more options");
            Ok(())
        }
    }
}

/// Initialize logging system
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "taxocode={level},taxocode_core={level},taxocode_tree_search={level}"
        ))
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn classify(
    config_path: Option<&Path>,
    search: &SearchArgs,
    input_dir: &Path,
    output_file: &Path,
) -> Result<()> {
    let config = load_config(config_path, &search.overrides())?;
    let taxonomy = load_taxonomy(&search.taxonomy)?;
    let oracle = create_oracle(&config.oracle, config.search.prompt_style)
        .context("Failed to create oracle")?;

    let results = classify_directory(
        input_dir,
        taxonomy,
        oracle,
        config.search.budget,
        config.batch.max_concurrent_documents,
        true,
    )
    .await?;

    write_results(output_file, &results)?;
    Ok(())
}

async fn code(
    config_path: Option<&Path>,
    search: &SearchArgs,
    document: &Path,
    verbose: bool,
) -> Result<()> {
    let config = load_config(config_path, &search.overrides())?;
    let taxonomy = load_taxonomy(&search.taxonomy)?;
    let oracle = create_oracle(&config.oracle, config.search.prompt_style)
        .context("Failed to create oracle")?;

    let text = std::fs::read_to_string(document)
        .with_context(|| format!("Failed to read {}", document.display()))?;

    let controller = TreeSearchController::new(taxonomy, oracle);
    let response = controller
        .search(TreeSearchRequest::new(text).with_budget(config.search.budget))
        .await
        .with_context(|| format!("Failed to classify {}", document.display()))?;

    info!(
        "Assigned {} codes in {} rounds ({} ms)",
        response.codes.len(),
        response.metadata.rounds_used,
        response.metadata.query_time_ms
    );

    let output = if verbose {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string_pretty(&response.codes)?
    };
    println!("{output}");
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let taxonomy = load_taxonomy(path)?;

    println!("Taxonomy: {}", path.display());
    println!("  Nodes:     {}", taxonomy.len());
    println!("  Top-level: {}", taxonomy.top_level_nodes().len());
    println!("  Max depth: {}", taxonomy.max_depth());
    Ok(())
}
