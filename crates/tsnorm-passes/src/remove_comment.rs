//! Comment stripping for overload groups.

use std::sync::Arc;
use tsnorm_tree::{
    CallMember, Comment, Comments, CtorMember, Decl, FunSig, FunctionMember, Member,
    PropertyMember,
};

/// Nodes whose raw comments can be dropped. Markers survive.
pub trait RemoveComment: Sized {
    fn remove_comment(&self) -> Self;
}

fn markers_only(comments: &Comments) -> Comments {
    Comments {
        items: comments
            .items
            .iter()
            .filter(|c| matches!(c, Comment::Marker(_)))
            .cloned()
            .collect(),
    }
}

impl RemoveComment for Decl {
    fn remove_comment(&self) -> Self {
        match self.comments() {
            Some(comments) => self.with_comments(markers_only(comments)),
            None => self.clone(),
        }
    }
}

impl RemoveComment for Member {
    fn remove_comment(&self) -> Self {
        match self {
            Member::Call(c) => Member::Call(Arc::new(CallMember {
                comments: markers_only(&c.comments),
                ..(**c).clone()
            })),
            Member::Ctor(c) => Member::Ctor(Arc::new(CtorMember {
                comments: markers_only(&c.comments),
                ..(**c).clone()
            })),
            Member::Function(f) => Member::Function(Arc::new(FunctionMember {
                comments: markers_only(&f.comments),
                ..(**f).clone()
            })),
            Member::Property(p) => Member::Property(Arc::new(PropertyMember {
                comments: markers_only(&p.comments),
                ..(**p).clone()
            })),
            Member::Index(_) | Member::Mapped(_) => self.clone(),
        }
    }
}

impl RemoveComment for Arc<FunSig> {
    fn remove_comment(&self) -> Self {
        Arc::new(FunSig {
            comments: markers_only(&self.comments),
            ..(**self).clone()
        })
    }
}

/// Keep the comments of the first item only. Used when one source node is
/// expanded into several, so its documentation is printed once.
pub fn keep_first_only<T: RemoveComment>(items: Vec<T>) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| if i == 0 { item } else { item.remove_comment() })
        .collect()
}
