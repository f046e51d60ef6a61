//! Loop Detection
//!
//! Resolution follows imports, re-exports and aliases across libraries that
//! routinely refer to each other. A [`LoopDetector`] is the path of
//! `(scope, key)` pairs visited so far; it is threaded by value through every
//! recursive step, and a step that would revisit a pair is abandoned with an
//! empty result.
//!
//! The path is a persistent list: extending it shares the prefix, so sibling
//! branches never see each other's visits. Every path derived from one query
//! shares a cut counter, which tells the resolution cache whether a result
//! was computed in full.

use crate::scope::Scope;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::trace;
use tsnorm_tree::QIdent;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LoopKey {
    /// A tree node, by identity.
    Node(usize),
    /// A name being resolved.
    Name(QIdent),
}

#[derive(Debug)]
struct Visit {
    scope: u64,
    key: LoopKey,
    prev: Option<Arc<Visit>>,
}

#[derive(Clone, Debug, Default)]
pub struct LoopDetector {
    head: Option<Arc<Visit>>,
    depth: usize,
    cuts: Arc<AtomicUsize>,
}

impl LoopDetector {
    pub fn new() -> Self {
        LoopDetector::default()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Steps abandoned so far by this query, across all of its branches.
    pub fn cuts(&self) -> usize {
        self.cuts.load(Ordering::Relaxed)
    }

    pub fn contains(&self, scope: u64, key: &LoopKey) -> bool {
        let mut cursor = self.head.as_deref();
        while let Some(visit) = cursor {
            if visit.scope == scope && visit.key == *key {
                return true;
            }
            cursor = visit.prev.as_deref();
        }
        false
    }

    /// The path extended with `(scope, key)`, or `None` if that pair is already
    /// on the path.
    pub fn including(&self, scope: &Scope, key: LoopKey) -> Option<LoopDetector> {
        if self.contains(scope.id(), &key) {
            trace!(scope = ?scope, key = ?key, depth = self.depth, "loop detected");
            self.cuts.fetch_add(1, Ordering::Relaxed);
            return None;
        }
        Some(LoopDetector {
            head: Some(Arc::new(Visit {
                scope: scope.id(),
                key,
                prev: self.head.clone(),
            })),
            depth: self.depth + 1,
            cuts: self.cuts.clone(),
        })
    }

    pub fn including_node(&self, scope: &Scope, node_id: usize) -> Option<LoopDetector> {
        self.including(scope, LoopKey::Node(node_id))
    }

    pub fn including_name(&self, scope: &Scope, name: &QIdent) -> Option<LoopDetector> {
        self.including(scope, LoopKey::Name(name.clone()))
    }
}
