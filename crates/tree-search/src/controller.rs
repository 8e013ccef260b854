//! Budgeted hierarchical search controller
//!
//! Each round presents one frontier (the top-level nodes, or the children of
//! a single confirmed parent) to the oracle. Confirmed leaves are assigned;
//! confirmed non-leaves join a FIFO queue and are expanded one per round.
//! The loop stops when no frontier is left or the round budget is spent, so
//! the oracle is called at most `budget` times.

use crate::candidates::CandidateMap;
use crate::error::Result;
use crate::oracle::Oracle;
use crate::parser::parse_confirmations;
use crate::types::{RoundRecord, TreeSearchMetadata, TreeSearchRequest, TreeSearchResponse};
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;
use taxocode_core::{Code, Taxonomy};
use tracing::{debug, info, warn};

/// Entry point that owns its collaborators
pub struct TreeSearchController {
    taxonomy: Arc<dyn Taxonomy>,
    oracle: Arc<dyn Oracle>,
}

impl std::fmt::Debug for TreeSearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeSearchController")
            .field("taxonomy", &"<Taxonomy>")
            .field("oracle", &"<Oracle>")
            .finish()
    }
}

impl TreeSearchController {
    pub fn new(taxonomy: Arc<dyn Taxonomy>, oracle: Arc<dyn Oracle>) -> Self {
        Self { taxonomy, oracle }
    }

    /// Classify one text. Independent calls share nothing but the taxonomy
    /// and may run concurrently.
    pub async fn search(&self, request: TreeSearchRequest) -> Result<TreeSearchResponse> {
        search_tree(
            &request.text,
            self.taxonomy.as_ref(),
            self.oracle.as_ref(),
            request.budget,
        )
        .await
    }
}

/// Assign leaf codes to `text` using at most `budget` oracle rounds
///
/// Returns the assigned codes sorted. Empty or whitespace-only text returns
/// an empty list without consulting the oracle. Oracle failures and unknown
/// taxonomy codes abort the run with no partial result.
pub async fn run(
    text: &str,
    taxonomy: &dyn Taxonomy,
    oracle: &dyn Oracle,
    budget: usize,
) -> Result<Vec<Code>> {
    Ok(search_tree(text, taxonomy, oracle, budget).await?.codes)
}

/// Round-based state owned by a single search
#[derive(Debug)]
struct SearchState {
    /// Candidates for the next round
    frontier: Vec<Code>,
    /// Parent whose children are the current frontier
    expanding: Option<Code>,
    /// Confirmed non-leaves awaiting expansion
    parent_queue: VecDeque<Code>,
    /// Confirmed leaves; only grows
    assigned: BTreeSet<Code>,
    rounds_used: usize,
}

impl SearchState {
    fn new(top_level: Vec<Code>) -> Self {
        Self {
            frontier: top_level,
            expanding: None,
            parent_queue: VecDeque::new(),
            assigned: BTreeSet::new(),
            rounds_used: 0,
        }
    }

    fn should_stop(&self, budget: usize) -> bool {
        self.frontier.is_empty() || self.rounds_used >= budget
    }

    fn accept(&mut self, code: Code, is_leaf: bool) {
        if is_leaf {
            self.assigned.insert(code);
        } else if !self.parent_queue.contains(&code) {
            self.parent_queue.push_back(code);
        }
    }

    /// Pop the head of the parent queue and make its children the frontier
    fn advance(&mut self, taxonomy: &dyn Taxonomy) -> Result<()> {
        self.frontier.clear();
        self.expanding = None;

        while let Some(parent) = self.parent_queue.pop_front() {
            let children = taxonomy.children(&parent)?;
            if children.is_empty() {
                warn!("Confirmed parent {parent} has no children, skipping");
                continue;
            }
            self.frontier = children;
            self.expanding = Some(parent);
            break;
        }

        Ok(())
    }

    /// Parents that were confirmed but whose children were never presented
    fn unexpanded_parents(&self) -> Vec<Code> {
        if self.frontier.is_empty() {
            return self.parent_queue.iter().cloned().collect();
        }
        self.expanding
            .iter()
            .chain(self.parent_queue.iter())
            .cloned()
            .collect()
    }
}

async fn search_tree(
    text: &str,
    taxonomy: &dyn Taxonomy,
    oracle: &dyn Oracle,
    budget: usize,
) -> Result<TreeSearchResponse> {
    let start_time = Instant::now();

    if text.trim().is_empty() {
        debug!("Empty input text, nothing to classify");
        return Ok(TreeSearchResponse {
            codes: Vec::new(),
            metadata: TreeSearchMetadata {
                query_time_ms: 0,
                rounds_used: 0,
                budget,
                budget_exhausted: false,
                unexpanded_parents: Vec::new(),
                rounds: Vec::new(),
            },
        });
    }

    let mut state = SearchState::new(taxonomy.top_level_nodes());
    let mut rounds = Vec::new();

    info!(
        "Starting tree search: budget {}, {} top-level candidates",
        budget,
        state.frontier.len()
    );

    while !state.should_stop(budget) {
        let candidates = CandidateMap::from_frontier(&state.frontier, taxonomy)?;

        debug!(
            "Round {}/{}: presenting {} candidates{}",
            state.rounds_used + 1,
            budget,
            candidates.len(),
            state
                .expanding
                .as_ref()
                .map(|p| format!(" (children of {p})"))
                .unwrap_or_default()
        );

        let reply = oracle.classify(text, candidates.descriptions()).await?;
        state.rounds_used += 1;

        let confirmations = parse_confirmations(&reply, &candidates);
        let mut confirmed = Vec::with_capacity(confirmations.len());
        for confirmation in confirmations {
            let is_leaf = taxonomy.is_leaf(&confirmation.code)?;
            confirmed.push(confirmation.code.clone());
            state.accept(confirmation.code, is_leaf);
        }

        debug!(
            "Round {} confirmed {:?} (assigned: {}, queued parents: {})",
            state.rounds_used,
            confirmed,
            state.assigned.len(),
            state.parent_queue.len()
        );

        rounds.push(RoundRecord {
            expanded_parent: state.expanding.clone(),
            frontier: state.frontier.clone(),
            confirmed,
            assigned_total: state.assigned.len(),
        });

        state.advance(taxonomy)?;
    }

    let budget_exhausted = !state.frontier.is_empty();
    let unexpanded_parents = state.unexpanded_parents();
    if budget_exhausted {
        info!(
            "Budget of {} rounds exhausted with {} confirmed parents unexplored",
            budget,
            unexpanded_parents.len()
        );
    }

    let codes: Vec<Code> = state.assigned.into_iter().collect();
    info!(
        "Tree search finished after {} rounds with {} codes",
        state.rounds_used,
        codes.len()
    );

    Ok(TreeSearchResponse {
        codes,
        metadata: TreeSearchMetadata {
            query_time_ms: start_time.elapsed().as_millis() as u64,
            rounds_used: state.rounds_used,
            budget,
            budget_exhausted,
            unexpanded_parents,
            rounds,
        },
    })
}
