//! Comment Preservation
//!
//! Comments ride along on declarations, members and some types so the printer
//! can emit them again. They also carry structured markers that passes leave
//! for each other (for example a name hint for an extracted interface).
//!
//! Comments never take part in structural equality: two trees that differ only
//! in their comments compare equal and hash identically. Use
//! [`Comments::same_text`] when the actual content matters.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Structured information attached to a node by a pass.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// Preferred name for an interface extracted from this object type.
    NameHint(String),
    /// Call signatures of a property were expanded into methods.
    ExpandedCallables,
    /// The class was synthesized from a constructor-typed variable.
    ExpandedClass,
    /// The declaration is a trivial alias kept for compatibility.
    IsTrivial,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comment {
    /// Raw comment text including its delimiters.
    Raw(String),
    Marker(Marker),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Comments {
    pub items: Vec<Comment>,
}

impl Comments {
    pub fn none() -> Self {
        Comments { items: Vec::new() }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Comments {
            items: vec![Comment::Raw(text.into())],
        }
    }

    pub fn marker(marker: Marker) -> Self {
        Comments {
            items: vec![Comment::Marker(marker)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Raw comments only, in order.
    pub fn raw_texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|c| match c {
            Comment::Raw(text) => Some(text.as_str()),
            Comment::Marker(_) => None,
        })
    }

    pub fn has_marker(&self, marker: &Marker) -> bool {
        self.items
            .iter()
            .any(|c| matches!(c, Comment::Marker(m) if m == marker))
    }

    pub fn name_hint(&self) -> Option<&str> {
        self.items.iter().find_map(|c| match c {
            Comment::Marker(Marker::NameHint(hint)) => Some(hint.as_str()),
            _ => None,
        })
    }

    pub fn with_marker(&self, marker: Marker) -> Comments {
        if self.has_marker(&marker) {
            return self.clone();
        }
        let mut items = self.items.clone();
        items.push(Comment::Marker(marker));
        Comments { items }
    }

    pub fn concat(&self, other: &Comments) -> Comments {
        let mut items = self.items.clone();
        items.extend(other.items.iter().cloned());
        Comments { items }
    }

    /// Content comparison, including markers.
    pub fn same_text(&self, other: &Comments) -> bool {
        self.items == other.items
    }
}

impl PartialEq for Comments {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Comments {}

impl Hash for Comments {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}
