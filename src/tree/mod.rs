//! Reference Tree Module
//!
//! Turns a title query into a bounded tree of references-of-references:
//!
//! ```text
//! query ──search──▶ PaperSummary (first hit)
//!                     │
//!                     └─ references (≤ 10, depth 0)
//!                          └─ their references (≤ 10 each, depth 1)
//!                               └─ ... until depth == max_depth - 1
//! ```
//!
//! Expansion is depth-first and strictly sequential. Reference lists are
//! memoized per session in a [`ReferenceCache`].

pub mod builder;
pub mod cache;

pub use builder::ReferenceTreeBuilder;
pub use cache::ReferenceCache;

use crate::models::{PaperSummary, ReferenceNode};
use serde::Serialize;

/// Maximum number of references expanded under any one node
pub const MAX_CHILDREN: usize = 10;

/// Result of expanding the searched paper
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "references", rename_all = "snake_case")]
pub enum TreeOutcome {
    /// The paper has no deposited references (or no DOI to look them up by)
    NoReferences,
    Populated(Vec<ReferenceNode>),
}

impl TreeOutcome {
    pub fn nodes(&self) -> &[ReferenceNode] {
        match self {
            TreeOutcome::NoReferences => &[],
            TreeOutcome::Populated(nodes) => nodes,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TreeOutcome::NoReferences)
    }
}

/// Counters describing one tree expansion
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreeStats {
    pub nodes: usize,
    pub max_depth_reached: Option<usize>,
    pub remote_fetches: usize,
    pub cache_hits: usize,
    pub pruned_subtrees: usize,
}

/// Everything a finished search produced, ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub paper: PaperSummary,
    pub tree: TreeOutcome,
    pub stats: TreeStats,
}
