//! Overload documentation deduplication.

use crate::pass::LibraryPass;
use crate::remove_comment::RemoveComment;
use std::sync::Arc;
use tsnorm_scope::Scope;
use tsnorm_transform::{TransformResult, TreeTransformation, visit_parsed_file};
use tsnorm_tree::{Comments, Decl, Ident, Member, ParsedFile, Tree};

/// Within a run of same-named overloads, drops a comment that repeats one
/// already printed for an earlier overload. Distinct comments are kept.
#[derive(Debug, Default)]
pub struct KeepFirstOverloadComment;

fn dedup_by_name<T: RemoveComment + Clone>(
    items: Vec<T>,
    key: impl Fn(&T) -> Option<(&Ident, &Comments)>,
) -> Vec<T> {
    let mut seen: Vec<(Ident, Comments)> = Vec::new();
    items
        .into_iter()
        .map(|item| {
            let Some((name, comments)) = key(&item) else {
                return item;
            };
            if comments.raw_texts().next().is_none() {
                return item;
            }
            let repeated = seen
                .iter()
                .any(|(n, c)| n == name && c.raw_texts().eq(comments.raw_texts()));
            if repeated {
                item.remove_comment()
            } else {
                seen.push((name.clone(), comments.clone()));
                item
            }
        })
        .collect()
}

impl TreeTransformation for KeepFirstOverloadComment {
    type Ctx = ();

    fn with_tree(&self, _ctx: &(), _tree: &Tree) {}

    fn new_members(
        &mut self,
        _ctx: &(),
        _container: &Tree,
        members: Vec<Decl>,
    ) -> TransformResult<Vec<Decl>> {
        Ok(dedup_by_name(members, |d| match d {
            Decl::Function(f) => Some((&f.name, &f.comments)),
            _ => None,
        }))
    }

    fn new_class_members(
        &mut self,
        _ctx: &(),
        _owner: &Tree,
        members: Vec<Member>,
    ) -> TransformResult<Vec<Member>> {
        Ok(dedup_by_name(members, |m| match m {
            Member::Function(f) => Some((&f.name, &f.comments)),
            _ => None,
        }))
    }
}

impl LibraryPass for KeepFirstOverloadComment {
    fn name(&self) -> &'static str {
        "keep-first-overload-comment"
    }

    fn run(&mut self, _root: &Scope, file: Arc<ParsedFile>) -> TransformResult<Arc<ParsedFile>> {
        visit_parsed_file(self, &(), file)
    }
}
