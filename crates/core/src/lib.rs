//! Core types and traits for the taxocode hierarchical classification system
//!
//! This crate provides the foundational abstractions shared by the search
//! and command-line crates:
//!
//! - **Taxonomy**: the read-only code tree and the lookup trait used to walk it
//! - **Configuration**: layered loading of search, oracle and batch settings
//! - **Error handling**: unified error types
//!

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod taxonomy;

// Re-export main types for convenience
pub use config::{BatchConfig, Config, OracleConfig, PromptStyle, SearchConfig};
pub use error::{Error, Result, ResultExt};
pub use taxonomy::{Code, InMemoryTaxonomy, Taxonomy, TaxonomyNode};
