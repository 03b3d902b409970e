use super::{ReferenceCache, SearchReport, TreeOutcome, TreeStats, MAX_CHILDREN};
use crate::config::{Config, DEFAULT_MAX_DEPTH, DEFAULT_SEARCH_ROWS};
use crate::crossref::{RawReference, WorkSource};
use crate::models::{PaperSummary, ReferenceNode};
use crate::types::{AppError, AppResult};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One search session: resolves a query and expands its reference tree.
///
/// The builder owns its [`ReferenceCache`]; create one per session and drop
/// it when the session ends.
pub struct ReferenceTreeBuilder {
    source: Arc<dyn WorkSource>,
    cache: ReferenceCache,
    max_depth: usize,
    search_rows: usize,
    stats: TreeStats,
}

impl ReferenceTreeBuilder {
    pub fn new(source: Arc<dyn WorkSource>) -> Self {
        Self {
            source,
            cache: ReferenceCache::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            search_rows: DEFAULT_SEARCH_ROWS,
            stats: TreeStats::default(),
        }
    }

    pub fn from_config(source: Arc<dyn WorkSource>, config: &Config) -> Self {
        Self::new(source)
            .with_max_depth(config.tree.max_depth)
            .with_search_rows(config.crossref.search_rows)
    }

    /// Levels of references to expand. With 0 nothing is fetched.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_search_rows(mut self, rows: usize) -> Self {
        self.search_rows = rows;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    /// Counters of the most recent search or [`build_tree`](Self::build_tree) call
    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Resolve `query` to a paper and expand its references
    pub async fn search(&mut self, query: &str) -> AppResult<SearchReport> {
        self.stats = TreeStats::default();
        let paper = self.resolve(query).await?;

        let tree = if paper.has_id() {
            self.build_tree(&paper.id).await?
        } else {
            warn!(title = ?paper.title, "Best match has no DOI, nothing to expand");
            TreeOutcome::NoReferences
        };

        info!(
            doi = %paper.id,
            nodes = self.stats.nodes,
            remote_fetches = self.stats.remote_fetches,
            cache_hits = self.stats.cache_hits,
            pruned = self.stats.pruned_subtrees,
            "Reference tree ready"
        );

        Ok(SearchReport {
            query: query.trim().to_string(),
            paper,
            tree,
            stats: self.stats.clone(),
        })
    }

    /// Pick the first search hit for `query`
    pub async fn resolve(&self, query: &str) -> AppResult<PaperSummary> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("empty query".to_string()));
        }

        let items = self.source.search_works(query, self.search_rows).await?;
        let best = items
            .first()
            .ok_or_else(|| AppError::NotFound(format!("no results for \"{}\"", query)))?;

        let paper = PaperSummary::from_work(best);
        info!(doi = %paper.id, candidates = items.len(), "Resolved query to paper");
        Ok(paper)
    }

    /// Expand the references of `id` as the root of a tree.
    ///
    /// A failed lookup of `id` itself is an error; failures further down only
    /// drop the affected subtree.
    pub async fn build_tree(&mut self, id: &str) -> AppResult<TreeOutcome> {
        self.stats = TreeStats::default();

        let nodes = self.expand(id, 0).await?;
        if nodes.is_empty() {
            return Ok(TreeOutcome::NoReferences);
        }

        self.stats.nodes = nodes.iter().map(ReferenceNode::size).sum();
        self.stats.max_depth_reached = nodes.iter().map(ReferenceNode::deepest).max();
        Ok(TreeOutcome::Populated(nodes))
    }

    fn expand<'a>(&'a mut self, id: &'a str, depth: usize) -> BoxFuture<'a, AppResult<Vec<ReferenceNode>>> {
        async move {
            if depth >= self.max_depth {
                return Ok(Vec::new());
            }

            let references = self.fetch_references(id).await?;
            let mut nodes = Vec::with_capacity(references.len().min(MAX_CHILDREN));

            for raw in references.iter().take(MAX_CHILDREN) {
                let mut node = ReferenceNode::from_raw(raw, depth);

                if depth + 1 < self.max_depth {
                    if let Some(child_id) = node.id().map(str::to_owned) {
                        match self.expand(&child_id, depth + 1).await {
                            Ok(children) => node.children = children,
                            Err(e) => {
                                warn!(doi = %child_id, depth = depth + 1, error = %e, "Dropping reference subtree");
                                self.stats.pruned_subtrees += 1;
                            }
                        }
                    }
                }

                nodes.push(node);
            }

            Ok(nodes)
        }
        .boxed()
    }

    /// Reference list of `id`, served from the cache when already fetched
    pub async fn fetch_references(&mut self, id: &str) -> AppResult<Arc<Vec<RawReference>>> {
        if let Some(hit) = self.cache.get(id) {
            debug!(doi = %id, count = hit.len(), "Reference cache hit");
            self.stats.cache_hits += 1;
            return Ok(hit);
        }

        self.stats.remote_fetches += 1;
        let references = self.source.fetch_references(id).await?;
        Ok(self.cache.insert(id, references))
    }
}
