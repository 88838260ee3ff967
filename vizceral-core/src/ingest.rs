// Edge validation and deduplication

use crate::error::{Result, TranslateError};
use crate::model::{Edge, RawEdge};
use std::collections::HashMap;
use tracing::debug;

/// What happens when the same `(parent, child)` pair is seen more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The later edge's counts replace the stored ones.
    Overwrite,
    /// Counts are added together.
    Sum,
}

pub const DEFAULT_DUPLICATE_POLICY: DuplicatePolicy = DuplicatePolicy::Overwrite;

/// Deduplicated edges in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct EdgeSet {
    edges: Vec<Edge>,
    index: HashMap<(String, String), usize>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a Zipkin dependencies JSON array and ingest it with the default policy.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawEdge> = serde_json::from_str(json)?;
        ingest(raw)
    }

    /// Insert an edge, returning `true` if its pair was not present yet.
    pub fn insert(&mut self, edge: Edge, policy: DuplicatePolicy) -> Result<bool> {
        let key = edge.key();
        let Some(slot) = self.index.get(&key).copied() else {
            self.index.insert(key, self.edges.len());
            self.edges.push(edge);
            return Ok(true);
        };

        let existing = &mut self.edges[slot];
        match policy {
            DuplicatePolicy::Overwrite => {
                existing.call_count = edge.call_count;
                existing.error_count = edge.error_count;
            }
            DuplicatePolicy::Sum => {
                existing.call_count = existing
                    .call_count
                    .checked_add(edge.call_count)
                    .ok_or_else(|| overflow(&edge))?;
                existing.error_count = existing
                    .error_count
                    .checked_add(edge.error_count)
                    .ok_or_else(|| overflow(&edge))?;
            }
        }
        Ok(false)
    }

    pub fn get(&self, parent: &str, child: &str) -> Option<&Edge> {
        self.index
            .get(&(parent.to_string(), child.to_string()))
            .map(|&slot| &self.edges[slot])
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }
}

impl<'a> IntoIterator for &'a EdgeSet {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

fn overflow(edge: &Edge) -> TranslateError {
    TranslateError::CountOverflow {
        context: format!("duplicate edge {} -> {}", edge.parent, edge.child),
    }
}

/// Check that a raw edge carries every required field.
pub fn validate(index: usize, raw: RawEdge) -> Result<Edge> {
    let malformed = |field| TranslateError::MalformedEdge { index, field };

    let parent = raw.parent.ok_or_else(|| malformed("parent"))?;
    let child = raw.child.ok_or_else(|| malformed("child"))?;
    let call_count = raw
        .call_count
        .ok_or_else(|| malformed("callCount"))
        .and_then(|c| u64::try_from(c).map_err(|_| malformed("callCount")))?;
    let error_count = match raw.error_count {
        Some(c) => u64::try_from(c).map_err(|_| malformed("errorCount"))?,
        None => 0,
    };

    Ok(Edge {
        parent,
        child,
        call_count,
        error_count,
    })
}

pub fn ingest(raw: Vec<RawEdge>) -> Result<EdgeSet> {
    ingest_with_policy(raw, DEFAULT_DUPLICATE_POLICY)
}

/// Validate and deduplicate raw edges. Any malformed edge aborts the whole batch.
pub fn ingest_with_policy(raw: Vec<RawEdge>, policy: DuplicatePolicy) -> Result<EdgeSet> {
    let total = raw.len();
    let mut set = EdgeSet::new();
    for (index, raw_edge) in raw.into_iter().enumerate() {
        let edge = validate(index, raw_edge)?;
        set.insert(edge, policy)?;
    }
    debug!(
        "Ingested {} edges ({} duplicates, policy {:?})",
        set.len(),
        total - set.len(),
        policy
    );
    Ok(set)
}
