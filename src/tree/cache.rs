use crate::crossref::RawReference;
use std::collections::HashMap;
use std::sync::Arc;

/// Reference lists already fetched, keyed by DOI.
///
/// Entries are write-once and never evicted. Only successful fetches are
/// stored, so a missing key means "not fetched yet", never "no references".
#[derive(Debug, Default)]
pub struct ReferenceCache {
    entries: HashMap<String, Arc<Vec<RawReference>>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Arc<Vec<RawReference>>> {
        self.entries.get(id).cloned()
    }

    /// Store a fetched list unless one is already present; returns the stored entry
    pub fn insert(&mut self, id: &str, references: Vec<RawReference>) -> Arc<Vec<RawReference>> {
        self.entries
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(references))
            .clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
