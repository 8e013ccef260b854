//! Taxonomy data model and lookup trait
//!
//! A taxonomy is an immutable tree of classification codes. Only leaves are
//! valid final assignments. The [`Taxonomy`] trait is the read-only lookup
//! surface the search controller walks; [`InMemoryTaxonomy`] is the bundled
//! implementation backed by a JSON node list.

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// A taxonomy code, e.g. `"A00.1"`
pub type Code = String;

/// A single node of the taxonomy tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyNode {
    pub code: Code,
    pub description: String,
    #[serde(default)]
    pub children: Vec<Code>,
}

impl TaxonomyNode {
    pub fn new(code: impl Into<Code>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Code>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    /// True iff the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Read-only lookups over an immutable taxonomy
///
/// Implementations must be safe to share between concurrent searches.
/// Unknown codes are reported as [`Error::UnknownCode`].
pub trait Taxonomy: Send + Sync {
    /// Codes of the top-level nodes, in taxonomy order
    fn top_level_nodes(&self) -> Vec<Code>;

    /// Raw (unformatted) description of a code
    fn description(&self, code: &str) -> Result<String>;

    /// Child codes of a code, in taxonomy order
    fn children(&self, code: &str) -> Result<Vec<Code>>;

    /// Whether a code has no children
    fn is_leaf(&self, code: &str) -> Result<bool>;
}

/// On-disk layout of a taxonomy file
#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    nodes: Vec<TaxonomyNode>,
}

/// Taxonomy held entirely in memory, validated to be a strict tree
#[derive(Debug, Clone)]
pub struct InMemoryTaxonomy {
    nodes: HashMap<Code, TaxonomyNode>,
    top_level: Vec<Code>,
}

impl InMemoryTaxonomy {
    /// Build a taxonomy from a flat node list
    ///
    /// Top-level nodes are the nodes no other node lists as a child, in the
    /// order they appear in `nodes`.
    pub fn from_nodes(nodes: Vec<TaxonomyNode>) -> Result<Self> {
        let mut order = Vec::with_capacity(nodes.len());
        let mut by_code: HashMap<Code, TaxonomyNode> = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if node.code.trim().is_empty() {
                return Err(Error::invalid_taxonomy("node with empty code"));
            }
            if by_code.contains_key(&node.code) {
                return Err(Error::invalid_taxonomy(format!(
                    "duplicate code '{}'",
                    node.code
                )));
            }
            order.push(node.code.clone());
            by_code.insert(node.code.clone(), node);
        }

        // Each child must be defined and owned by exactly one parent
        let mut parent_of: HashMap<&str, &str> = HashMap::new();
        for code in &order {
            let node = &by_code[code];
            for child in &node.children {
                if !by_code.contains_key(child) {
                    return Err(Error::invalid_taxonomy(format!(
                        "'{code}' lists undefined child '{child}'"
                    )));
                }
                if let Some(existing) = parent_of.insert(child.as_str(), code.as_str()) {
                    return Err(Error::invalid_taxonomy(format!(
                        "'{child}' has more than one parent ('{existing}' and '{code}')"
                    )));
                }
            }
        }

        let top_level: Vec<Code> = order
            .iter()
            .filter(|code| !parent_of.contains_key(code.as_str()))
            .cloned()
            .collect();

        if top_level.is_empty() {
            return Err(Error::invalid_taxonomy("no top-level nodes"));
        }

        // With single parents, every node reachable from the top means no cycles
        let mut reached: HashSet<&str> = HashSet::with_capacity(by_code.len());
        let mut stack: Vec<&str> = top_level.iter().map(String::as_str).collect();
        while let Some(code) = stack.pop() {
            if !reached.insert(code) {
                continue;
            }
            stack.extend(by_code[code].children.iter().map(String::as_str));
        }
        if reached.len() != by_code.len() {
            let mut orphaned: Vec<&str> = order
                .iter()
                .map(String::as_str)
                .filter(|c| !reached.contains(c))
                .collect();
            orphaned.truncate(5);
            return Err(Error::invalid_taxonomy(format!(
                "nodes unreachable from the top level (cycle?): {}",
                orphaned.join(", ")
            )));
        }

        debug!(
            "Loaded taxonomy with {} nodes ({} top-level)",
            by_code.len(),
            top_level.len()
        );

        Ok(Self {
            nodes: by_code,
            top_level,
        })
    }

    /// Parse a taxonomy from a JSON string of the form `{"nodes": [...]}`
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: TaxonomyFile = serde_json::from_str(content)?;
        Self::from_nodes(file.nodes)
    }

    /// Load a taxonomy from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read taxonomy file {}", path.display()))?;
        Self::from_json_str(&content)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, code: &str) -> Result<&TaxonomyNode> {
        self.nodes
            .get(code)
            .ok_or_else(|| Error::unknown_code(code))
    }

    /// Number of levels from a top-level node down to the deepest leaf
    pub fn max_depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&str, usize)> = self.top_level.iter().map(|c| (c.as_str(), 1)).collect();
        while let Some((code, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Some(node) = self.nodes.get(code) {
                stack.extend(node.children.iter().map(|c| (c.as_str(), depth + 1)));
            }
        }
        deepest
    }
}

impl Taxonomy for InMemoryTaxonomy {
    fn top_level_nodes(&self) -> Vec<Code> {
        self.top_level.clone()
    }

    fn description(&self, code: &str) -> Result<String> {
        Ok(self.node(code)?.description.clone())
    }

    fn children(&self, code: &str) -> Result<Vec<Code>> {
        Ok(self.node(code)?.children.clone())
    }

    fn is_leaf(&self, code: &str) -> Result<bool> {
        Ok(self.node(code)?.is_leaf())
    }
}
