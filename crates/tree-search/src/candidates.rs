//! Per-round lookup from formatted description to code

use crate::error::Result;
use crate::formatter::format_description;
use std::collections::HashMap;
use taxocode_core::{Code, Taxonomy};
use tracing::warn;

/// Candidate descriptions of one round, in prompt order, mapped to their codes
///
/// Keys keep their first-insertion position. When two codes format to the
/// same description the later code replaces the earlier one, and the earlier
/// code cannot be confirmed in that round.
#[derive(Debug, Clone, Default)]
pub struct CandidateMap {
    descriptions: Vec<String>,
    codes: HashMap<String, Code>,
}

impl CandidateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format every frontier node's description and map it to its code
    pub fn from_frontier(frontier: &[Code], taxonomy: &dyn Taxonomy) -> Result<Self> {
        let mut map = Self::new();
        for code in frontier {
            let description = format_description(&taxonomy.description(code)?);
            if let Some(displaced) = map.insert(description.clone(), code.clone()) {
                warn!(
                    "Description collision: '{}' maps to both {} and {}; keeping {}",
                    description, displaced, code, code
                );
            }
        }
        Ok(map)
    }

    /// Insert a mapping, returning the code it displaced on collision
    pub fn insert(&mut self, description: String, code: Code) -> Option<Code> {
        match self.codes.insert(description.clone(), code) {
            Some(displaced) => Some(displaced),
            None => {
                self.descriptions.push(description);
                None
            }
        }
    }

    /// Descriptions in prompt order
    pub fn descriptions(&self) -> &[String] {
        &self.descriptions
    }

    pub fn code_for(&self, description: &str) -> Option<&Code> {
        self.codes.get(description)
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}
