//! Public API types for tree search

use serde::{Deserialize, Serialize};
use taxocode_core::Code;

/// Default maximum number of oracle rounds per search
pub const DEFAULT_BUDGET: usize = 50;

/// Request for a single tree search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSearchRequest {
    /// Free text to classify
    pub text: String,
    /// Maximum number of oracle rounds
    #[serde(default = "default_budget")]
    pub budget: usize,
}

fn default_budget() -> usize {
    DEFAULT_BUDGET
}

impl TreeSearchRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            budget: DEFAULT_BUDGET,
        }
    }

    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }
}

/// Response from a tree search
#[derive(Debug, Clone, Serialize)]
pub struct TreeSearchResponse {
    /// Assigned leaf codes, sorted
    pub codes: Vec<Code>,
    pub metadata: TreeSearchMetadata,
}

/// Metadata about tree search execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSearchMetadata {
    pub query_time_ms: u64,
    /// Oracle calls made
    pub rounds_used: usize,
    pub budget: usize,
    /// The run stopped on the budget with candidates still pending
    pub budget_exhausted: bool,
    /// Confirmed parents never presented to the oracle, in queue order
    pub unexpanded_parents: Vec<Code>,
    /// One entry per oracle call, in call order
    pub rounds: Vec<RoundRecord>,
}

/// What happened in one oracle round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Parent whose children formed the frontier; `None` for the top level
    pub expanded_parent: Option<Code>,
    /// Frontier codes presented, in prompt order
    pub frontier: Vec<Code>,
    /// Codes confirmed by the oracle, in reply order
    pub confirmed: Vec<Code>,
    /// Size of the assigned set after the round
    pub assigned_total: usize,
}
