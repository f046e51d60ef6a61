//! Context disciplines
//!
//! Most passes thread a [`Scope`](tsnorm_scope::Scope) as their context and
//! fall into one of two shapes:
//!
//! - scope-changing: decisions depend on sibling or ancestor declarations
//!   ("does a class with this name already exist?"), so the scope follows the
//!   tree and every visited node is entered;
//! - scope-preserving: local, context-free rewrites that only need the root
//!   (for its library name or cache), so the scope is handed down unchanged.
//!
//! Use one of the macros inside an `impl TreeTransformation` block to pick a
//! discipline.

/// The context is a scope extended with every visited node.
#[macro_export]
macro_rules! scope_follows_tree {
    () => {
        type Ctx = ::tsnorm_scope::Scope;

        fn with_tree(
            &self,
            scope: &::tsnorm_scope::Scope,
            tree: &::tsnorm_tree::Tree,
        ) -> ::tsnorm_scope::Scope {
            scope.enter(tree.clone())
        }
    };
}

/// The context is a scope handed down unchanged.
#[macro_export]
macro_rules! scope_preserved {
    () => {
        type Ctx = ::tsnorm_scope::Scope;

        fn with_tree(
            &self,
            scope: &::tsnorm_scope::Scope,
            _tree: &::tsnorm_tree::Tree,
        ) -> ::tsnorm_scope::Scope {
            scope.clone()
        }
    };
}
