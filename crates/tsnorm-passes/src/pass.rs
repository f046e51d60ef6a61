//! The library-level pass interface.

use std::sync::Arc;
use tsnorm_scope::Scope;
use tsnorm_transform::{TransformResult, TreeTransformation, visit_parsed_file};
use tsnorm_tree::ParsedFile;

/// Names of every pass, in the order the pipeline runs them.
pub const PASS_ORDER: &[&str] = &[
    "set-code-path",
    "simplify-types",
    "expand-type-mappings",
    "normalize-functions",
    "extract-classes",
    "forward-ctors",
    "hoisting",
    "extract-interfaces",
    "type-rewriter",
    "keep-first-overload-comment",
];

/// One step of the pipeline: a whole-file rewrite given the library's root
/// scope (not yet entered into the file).
pub trait LibraryPass: Send {
    fn name(&self) -> &'static str;

    fn run(&mut self, root: &Scope, file: Arc<ParsedFile>) -> TransformResult<Arc<ParsedFile>>;
}

/// Run a scope-threaded transformation over `file`.
pub fn run_scoped<T>(t: &mut T, root: &Scope, file: Arc<ParsedFile>) -> TransformResult<Arc<ParsedFile>>
where
    T: TreeTransformation<Ctx = Scope>,
{
    visit_parsed_file(t, root, file)
}
