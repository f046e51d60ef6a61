//! Type parameters a subtree depends on.

use indexmap::IndexMap;
use std::sync::Arc;
use tsnorm_scope::Scope;
use tsnorm_tree::{Ident, Type, TypeParam, referenced_names};

/// In-scope type parameters that `tpe` references, directly or through the
/// bounds and defaults of other referenced type parameters, in declaration
/// order (outermost declaration first).
pub fn type_params_referenced(scope: &Scope, tpe: &Type) -> Vec<Arc<TypeParam>> {
    // Declaration order. An inner declaration shadows an outer one of the
    // same name and takes its place.
    let mut declared: IndexMap<Ident, Arc<TypeParam>> = IndexMap::new();
    let frames: Vec<_> = scope.stack().collect();
    for tree in frames.into_iter().rev() {
        for tp in tree.tparams() {
            declared.insert(tp.name.clone(), tp.clone());
        }
    }

    let mut wanted: Vec<Ident> = Vec::new();
    let mut pending: Vec<Type> = vec![tpe.clone()];
    while let Some(next) = pending.pop() {
        for qname in referenced_names(&next) {
            let Some(name) = qname.single() else {
                continue;
            };
            if wanted.contains(name) {
                continue;
            }
            if let Some(tp) = declared.get(name) {
                wanted.push(name.clone());
                pending.extend(tp.upper_bound.iter().cloned());
                pending.extend(tp.default.iter().cloned());
            }
        }
    }

    declared
        .into_iter()
        .filter(|(name, _)| wanted.contains(name))
        .map(|(_, tp)| tp)
        .collect()
}

#[cfg(test)]
#[path = "tests/type_params_tests.rs"]
mod type_params_tests;
