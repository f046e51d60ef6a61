//! Resolution Cache
//!
//! Memoizes import expansion, export expansion and mapped-type key evaluation
//! for one pass. Entries are keyed by `(scope id, node id)`: trees are
//! immutable, so a node resolves identically relative to a fixed frame.
//!
//! That only holds for results computed in full. A computation during which
//! the loop detector abandoned a step saw a view shaped by the path it was
//! reached on, so it is returned to its caller but never stored.
//!
//! Each entry keeps its key node alive, so the allocation address used as the
//! node id cannot be reused by a different node while the cache exists.

use crate::expansion::Binding;
use crate::loop_detector::LoopDetector;
use dashmap::DashMap;
use tracing::trace;
use tsnorm_tree::{Ident, Tree};

pub type CacheKey = (u64, usize);

struct Cached<V> {
    _node: Tree,
    value: V,
}

#[derive(Default)]
pub struct ScopeCache {
    imports: DashMap<CacheKey, Cached<Vec<Binding>>>,
    exports: DashMap<CacheKey, Cached<Vec<Binding>>>,
    type_mappings: DashMap<CacheKey, Cached<Option<Vec<Ident>>>>,
}

fn get_or_compute<V: Clone>(
    map: &DashMap<CacheKey, Cached<V>>,
    kind: &'static str,
    key: CacheKey,
    node: &Tree,
    ld: &LoopDetector,
    compute: impl FnOnce() -> V,
) -> V {
    if let Some(hit) = map.get(&key) {
        trace!(kind, scope = key.0, node = key.1, "cache hit");
        return hit.value.clone();
    }
    // Computed outside the map lock: `compute` re-enters the cache.
    let cuts = ld.cuts();
    let value = compute();
    if ld.cuts() != cuts {
        trace!(kind, scope = key.0, node = key.1, "partial result not cached");
        return value;
    }
    map.insert(
        key,
        Cached {
            _node: node.clone(),
            value: value.clone(),
        },
    );
    value
}

impl ScopeCache {
    pub fn new() -> Self {
        ScopeCache::default()
    }

    pub fn imports(
        &self,
        key: CacheKey,
        node: &Tree,
        ld: &LoopDetector,
        compute: impl FnOnce() -> Vec<Binding>,
    ) -> Vec<Binding> {
        get_or_compute(&self.imports, "imports", key, node, ld, compute)
    }

    pub fn exports(
        &self,
        key: CacheKey,
        node: &Tree,
        ld: &LoopDetector,
        compute: impl FnOnce() -> Vec<Binding>,
    ) -> Vec<Binding> {
        get_or_compute(&self.exports, "exports", key, node, ld, compute)
    }

    pub fn type_mappings(
        &self,
        key: CacheKey,
        node: &Tree,
        ld: &LoopDetector,
        compute: impl FnOnce() -> Option<Vec<Ident>>,
    ) -> Option<Vec<Ident>> {
        get_or_compute(&self.type_mappings, "type_mappings", key, node, ld, compute)
    }

    pub fn len(&self) -> usize {
        self.imports.len() + self.exports.len() + self.type_mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.imports.clear();
        self.exports.clear();
        self.type_mappings.clear();
    }
}
