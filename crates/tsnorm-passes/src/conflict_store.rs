//! Bookkeeping for interfaces synthesized during one compilation.

use rustc_hash::FxHashMap;
use std::sync::Arc;
use tsnorm_tree::{Decl, Ident, InterfaceDecl, Member, TypeParam};

/// Interfaces emitted so far, grouped by their case-folded name.
///
/// Names are compared case-insensitively because generated declarations may
/// end up as files on case-insensitive file systems. Structurally identical
/// bodies are shared instead of emitted twice.
#[derive(Debug, Default)]
pub struct ConflictHandlingStore {
    by_name: FxHashMap<String, Vec<Arc<InterfaceDecl>>>,
    /// Emission order.
    order: Vec<Arc<InterfaceDecl>>,
}

fn fold(name: &Ident) -> String {
    name.as_str().to_lowercase()
}

impl ConflictHandlingStore {
    pub fn new() -> Self {
        ConflictHandlingStore::default()
    }

    /// Whether some stored interface already uses `name`, ignoring case.
    pub fn is_taken(&self, name: &Ident) -> bool {
        self.by_name.contains_key(&fold(name))
    }

    /// Name of a stored interface with the same type parameters and members.
    pub fn find_identical(
        &self,
        tparams: &[Arc<TypeParam>],
        members: &[Member],
    ) -> Option<&Ident> {
        self.order
            .iter()
            .find(|i| i.tparams.as_slice() == tparams && i.members.as_slice() == members)
            .map(|i| &i.name)
    }

    pub fn insert(&mut self, iface: Arc<InterfaceDecl>) {
        self.by_name
            .entry(fold(&iface.name))
            .or_default()
            .push(iface.clone());
        self.order.push(iface);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Take every stored interface in emission order, leaving the store empty.
    pub fn drain(&mut self) -> Vec<Decl> {
        self.by_name.clear();
        std::mem::take(&mut self.order)
            .into_iter()
            .map(Decl::Interface)
            .collect()
    }
}
