//! Union and intersection normalization.

use crate::pass::LibraryPass;
use std::sync::Arc;
use tsnorm_scope::Scope;
use tsnorm_transform::{TransformResult, TreeTransformation, visit_parsed_file};
use tsnorm_tree::{ParsedFile, Tree, Type, simplify_intersection, simplify_union};

/// Flattens and deduplicates every union and intersection, bottom-up.
#[derive(Debug, Default)]
pub struct SimplifyTypes;

impl TreeTransformation for SimplifyTypes {
    type Ctx = ();

    fn with_tree(&self, _ctx: &(), _tree: &Tree) {}

    fn leave_type(&mut self, _ctx: &(), x: Type) -> TransformResult<Type> {
        let simplified = match &x {
            Type::Union(u) => simplify_union(u.types.clone()),
            Type::Intersect(i) => simplify_intersection(i.types.clone()),
            _ => return Ok(x),
        };
        // Structural equality: keep the original node when nothing changed.
        if simplified == x {
            Ok(x)
        } else {
            Ok(simplified)
        }
    }
}

impl LibraryPass for SimplifyTypes {
    fn name(&self) -> &'static str {
        "simplify-types"
    }

    fn run(&mut self, _root: &Scope, file: Arc<ParsedFile>) -> TransformResult<Arc<ParsedFile>> {
        visit_parsed_file(self, &(), file)
    }
}
