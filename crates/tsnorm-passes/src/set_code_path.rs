//! Assign code paths from the nesting structure.

use crate::pass::LibraryPass;
use std::sync::Arc;
use tracing::trace;
use tsnorm_scope::Scope;
use tsnorm_transform::{TransformResult, TreeTransformation, visit_parsed_file};
use tsnorm_tree::{CodePath, Decl, Ident, ParsedFile, Tree};

/// Gives every named declaration the code path of its container extended
/// with its own name. Declarations that already carry the right path are
/// left alone.
#[derive(Debug)]
pub struct SetCodePath {
    lib: Ident,
}

impl SetCodePath {
    pub fn new(lib: Ident) -> Self {
        SetCodePath { lib }
    }
}

impl TreeTransformation for SetCodePath {
    type Ctx = CodePath;

    fn with_tree(&self, ctx: &CodePath, tree: &Tree) -> CodePath {
        match tree {
            Tree::File(_) => CodePath::root(self.lib.clone()),
            Tree::Decl(Decl::Global(_) | Decl::Export(_) | Decl::Import(_)) => ctx.clone(),
            Tree::Decl(d) => match d.name() {
                Some(name) => ctx.add(name),
                None => ctx.clone(),
            },
            _ => ctx.clone(),
        }
    }

    fn enter_parsed_file(
        &mut self,
        ctx: &CodePath,
        x: Arc<ParsedFile>,
    ) -> TransformResult<Arc<ParsedFile>> {
        if &x.code_path == ctx {
            return Ok(x);
        }
        Ok(Arc::new(ParsedFile {
            code_path: ctx.clone(),
            ..(*x).clone()
        }))
    }

    fn enter_decl(&mut self, ctx: &CodePath, x: Decl) -> TransformResult<Decl> {
        match x.code_path() {
            Some(current) if current != ctx => {
                trace!(from = ?current, to = ?ctx, "code path");
                Ok(x.with_code_path(ctx.clone()))
            }
            _ => Ok(x),
        }
    }
}

impl LibraryPass for SetCodePath {
    fn name(&self) -> &'static str {
        "set-code-path"
    }

    fn run(&mut self, _root: &Scope, file: Arc<ParsedFile>) -> TransformResult<Arc<ParsedFile>> {
        visit_parsed_file(self, &CodePath::NoPath, file)
    }
}
