//! Fresh names for synthesized declarations.

use tsnorm_tree::{Ident, Indexing, Member};

/// Short name fragments describing `members`, in member order, without
/// duplicates.
fn member_fragments(members: &[Member]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for member in members {
        let fragment = match member {
            Member::Call(_) => "Call".to_string(),
            Member::Ctor(_) => "Instantiable".to_string(),
            Member::Function(f) if f.name.is_constructor() => "Instantiable".to_string(),
            Member::Function(f) => f.name.capitalized(),
            Member::Property(p) => p.name.capitalized(),
            Member::Index(i) => match &i.indexing {
                Indexing::Dict { .. } => "Dictionary".to_string(),
                Indexing::Single(name) => match name.last() {
                    Some(last) => last.capitalized(),
                    None => continue,
                },
            },
            Member::Mapped(_) => "Mapped".to_string(),
        };
        let fragment: String = fragment
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
            .collect();
        if !fragment.is_empty() && !out.contains(&fragment) {
            out.push(fragment);
        }
    }
    out
}

/// A name for a declaration synthesized from `members`.
///
/// Candidates are `prefix` followed by the capitalized names of the first
/// one, two, ... members. When every such candidate is taken, numbered
/// variants of the longest one are tried. The first candidate `is_free`
/// accepts wins, so the result depends only on `prefix`, the members and the
/// answers of `is_free`.
pub fn derive_non_conflicting_name(
    prefix: &str,
    members: &[Member],
    mut is_free: impl FnMut(&Ident) -> bool,
) -> Ident {
    let fragments = member_fragments(members);

    let mut longest = prefix.to_string();
    let first = usize::from(!fragments.is_empty() || prefix.is_empty());
    for n in first..=fragments.len() {
        let candidate = format!("{prefix}{}", fragments[..n].concat());
        if candidate.is_empty() {
            continue;
        }
        let ident = Ident::new(&candidate);
        if is_free(&ident) {
            return ident;
        }
        longest = candidate;
    }

    let mut counter: u64 = 1;
    loop {
        let ident = Ident::new(format!("{longest}{counter}"));
        if is_free(&ident) {
            return ident;
        }
        counter += 1;
    }
}

#[cfg(test)]
#[path = "tests/naming_tests.rs"]
mod naming_tests;
