//! Budgeted hierarchical classification against a code taxonomy
//!
//! This crate assigns leaf codes of a strictly hierarchical taxonomy to a
//! free-text input by walking the tree top-down with a binary relevance
//! oracle (a language model), bounded by a fixed number of oracle rounds.
//!
//! # Public API
//!
//! ## Main Entry Points
//! - [`TreeSearchController`] - Owns the taxonomy and oracle, runs searches
//! - [`run`] - One search with borrowed collaborators, returns codes only
//!
//! ## Request/Response Models
//! - [`TreeSearchRequest`] - Input text and round budget
//! - [`TreeSearchResponse`] - Assigned codes plus [`TreeSearchMetadata`]
//! - [`RoundRecord`] - Per-round frontier and confirmations
//!
//! ## Oracle
//! - [`Oracle`] - Relevance judge trait
//! - [`ChatCompletionsOracle`], [`AnthropicOracle`] - LLM-backed oracles
//! - [`create_oracle`] - Factory from [`taxocode_core::OracleConfig`]
//!
//! ## Reply Handling
//! - [`format_description`] - Canonical description form shared by prompt
//!   construction and reply matching
//! - [`parse_confirmations`] - Oracle reply to confirmed codes
//!
//! ## Error Handling
//! - [`TreeSearchError`] - Error types
//! - [`Result`] - Result type alias

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod candidates;
mod controller;
mod error;
mod formatter;
mod oracle;
mod parser;
mod prompts;
mod types;

pub use candidates::CandidateMap;
pub use controller::{run, TreeSearchController};
pub use error::{Result, TreeSearchError};
pub use formatter::{collapse_whitespace, format_description};
pub use oracle::{create_oracle, AnthropicOracle, ChatCompletionsOracle, Oracle};
pub use parser::{parse_confirmations, Confirmation};
pub use types::{
    RoundRecord, TreeSearchMetadata, TreeSearchRequest, TreeSearchResponse, DEFAULT_BUDGET,
};
