//! Type substitution.
//!
//! [`TypeRewriter`] replaces types by structural match. The substitution is
//! the transformation context: a node that declares a type parameter named
//! like a replaced reference shadows it, so the entry is dropped for that
//! node's subtree.

use crate::pass::LibraryPass;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::trace;
use tsnorm_scope::Scope;
use tsnorm_transform::{
    TransformResult, TreeTransformation, visit_fun_sig, visit_parsed_file, visit_type,
};
use tsnorm_tree::{FunSig, ParsedFile, Tree, Type};

pub type Substitution = Arc<FxHashMap<Type, Type>>;

#[derive(Debug, Clone, Default)]
pub struct TypeRewriter {
    replacements: Substitution,
}

impl TypeRewriter {
    pub fn new(replacements: FxHashMap<Type, Type>) -> Self {
        TypeRewriter {
            replacements: Arc::new(replacements),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    pub fn rewrite_type(&mut self, tpe: Type) -> TransformResult<Type> {
        let ctx = self.replacements.clone();
        visit_type(self, &ctx, tpe)
    }

    pub fn rewrite_sig(&mut self, sig: Arc<FunSig>) -> TransformResult<Arc<FunSig>> {
        let ctx = self.replacements.clone();
        visit_fun_sig(self, &ctx, sig)
    }
}

fn shadows(tree: &Tree, key: &Type) -> bool {
    match key {
        Type::Ref(r) if r.targs.is_empty() => r
            .name
            .single()
            .is_some_and(|name| tree.tparams().iter().any(|tp| &tp.name == name)),
        _ => false,
    }
}

impl TreeTransformation for TypeRewriter {
    type Ctx = Substitution;

    fn with_tree(&self, ctx: &Substitution, tree: &Tree) -> Substitution {
        if tree.tparams().is_empty() || !ctx.keys().any(|k| shadows(tree, k)) {
            return ctx.clone();
        }
        Arc::new(
            ctx.iter()
                .filter(|(k, _)| !shadows(tree, k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    fn leave_type(&mut self, ctx: &Substitution, x: Type) -> TransformResult<Type> {
        match ctx.get(&x) {
            Some(replacement) => {
                trace!(from = ?x, to = ?replacement, "rewrote type");
                Ok(replacement.clone())
            }
            None => Ok(x),
        }
    }
}

impl LibraryPass for TypeRewriter {
    fn name(&self) -> &'static str {
        "type-rewriter"
    }

    fn run(&mut self, _root: &Scope, file: Arc<ParsedFile>) -> TransformResult<Arc<ParsedFile>> {
        if self.replacements.is_empty() {
            return Ok(file);
        }
        let ctx = self.replacements.clone();
        visit_parsed_file(self, &ctx, file)
    }
}
